use regex::RegexBuilder;
use serde::{Deserialize, Serialize};

use caixa_core::Movement;

/// One classification rule. `account_code` / `availability` are applied only
/// when non-empty, so a rule can set one field without blanking the other.
///
/// Field names on the wire match the externally-persisted JSON documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rule {
    #[serde(default)]
    pub pattern: String,
    #[serde(default, rename = "conta_contabil")]
    pub account_code: String,
    #[serde(default, rename = "disponibilidade")]
    pub availability: String,
    /// Only meaningful for the regex list.
    #[serde(default = "default_true", rename = "ignore_case")]
    pub ignore_case: bool,
}

fn default_true() -> bool {
    true
}

impl Rule {
    pub fn new(pattern: &str, account_code: &str, availability: &str) -> Self {
        Rule {
            pattern: pattern.to_string(),
            account_code: account_code.to_string(),
            availability: availability.to_string(),
            ignore_case: true,
        }
    }
}

/// The three ordered rule lists, applied prefix → substring → regex.
/// Within each list rules run in order and later matches overwrite earlier
/// ones, cumulatively across the lists.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleSet {
    #[serde(default, rename = "startswith")]
    pub prefix: Vec<Rule>,
    #[serde(default, rename = "contains")]
    pub substring: Vec<Rule>,
    #[serde(default, rename = "regex")]
    pub pattern: Vec<Rule>,
}

impl RuleSet {
    /// Built-in configuration. Callers normally load their own document and
    /// pass it in; this is what ships when they have none yet.
    pub fn default_rules() -> Self {
        RuleSet {
            prefix: vec![
                Rule::new(
                    "Pagto do quarto",
                    "1.01 - Hospedagem",
                    "3.1 - HOTEL (CENTRO DE CUSTO)",
                ),
                Rule::new(
                    "Pagamento da comanda",
                    "1.02 - Frigobar",
                    "3.2 - FRIGOBAR (CENTRO DE CUSTO)",
                ),
            ],
            substring: vec![Rule::new(
                "comanda",
                "1.02 - Frigobar",
                "3.2 - FRIGOBAR (CENTRO DE CUSTO)",
            )],
            pattern: vec![],
        }
    }
}

enum Matcher {
    /// Case-sensitive prefix of the base description.
    Prefix(String),
    /// Case-insensitive substring; stored lower-cased.
    Substring(String),
    Pattern(regex::Regex),
}

struct CompiledRule {
    matcher: Matcher,
    account_code: String,
    availability: String,
}

impl CompiledRule {
    fn matches(&self, text: &str) -> bool {
        match &self.matcher {
            Matcher::Prefix(p) => text.starts_with(p.as_str()),
            Matcher::Substring(p) => text.to_lowercase().contains(p.as_str()),
            Matcher::Pattern(re) => re.is_match(text),
        }
    }
}

/// Rule lists flattened into application order, regexes compiled once.
/// Empty patterns are dropped; invalid regexes are dropped with a warning
/// and never abort the batch.
pub struct RuleEngine {
    rules: Vec<CompiledRule>,
}

impl RuleEngine {
    pub fn new(set: &RuleSet) -> Self {
        let mut rules = Vec::new();

        for rule in &set.prefix {
            let pattern = rule.pattern.trim();
            if pattern.is_empty() {
                continue;
            }
            rules.push(CompiledRule {
                matcher: Matcher::Prefix(pattern.to_string()),
                account_code: rule.account_code.clone(),
                availability: rule.availability.clone(),
            });
        }

        for rule in &set.substring {
            let pattern = rule.pattern.trim();
            if pattern.is_empty() {
                continue;
            }
            rules.push(CompiledRule {
                matcher: Matcher::Substring(pattern.to_lowercase()),
                account_code: rule.account_code.clone(),
                availability: rule.availability.clone(),
            });
        }

        for rule in &set.pattern {
            let pattern = rule.pattern.trim();
            if pattern.is_empty() {
                continue;
            }
            match RegexBuilder::new(pattern)
                .case_insensitive(rule.ignore_case)
                .build()
            {
                Ok(re) => rules.push(CompiledRule {
                    matcher: Matcher::Pattern(re),
                    account_code: rule.account_code.clone(),
                    availability: rule.availability.clone(),
                }),
                Err(error) => {
                    tracing::warn!(pattern, %error, "dropping invalid regex rule");
                }
            }
        }

        RuleEngine { rules }
    }

    /// Assign `account_code` / `availability` to every movement whose base
    /// description matches; the last matching rule wins per field.
    pub fn apply(&self, movements: &mut [Movement]) {
        for rule in &self.rules {
            for movement in movements.iter_mut() {
                if rule.matches(&movement.description_base) {
                    if !rule.account_code.is_empty() {
                        movement.account_code = Some(rule.account_code.clone());
                    }
                    if !rule.availability.is_empty() {
                        movement.availability = Some(rule.availability.clone());
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use caixa_core::OTHER_DESTINATION;

    fn movement(description: &str) -> Movement {
        Movement {
            code: Some(1),
            description_base: description.to_string(),
            description: description.to_string(),
            kind: "Entrada".to_string(),
            amount_text: "R$ 10,00".to_string(),
            amount: Some(rust_decimal::Decimal::new(1000, 2)),
            payment_method: "Dinheiro".to_string(),
            installments: Some(1),
            posted_at: "01/01/2024 09:00:00".to_string(),
            account_code: None,
            availability: None,
            destination: OTHER_DESTINATION.to_string(),
        }
    }

    fn prefix_rule(pattern: &str, account: &str, availability: &str) -> RuleSet {
        RuleSet {
            prefix: vec![Rule::new(pattern, account, availability)],
            ..RuleSet::default()
        }
    }

    #[test]
    fn prefix_match_is_case_sensitive() {
        let engine = RuleEngine::new(&prefix_rule("Pagto", "1.01", "3.1"));

        let mut hit = [movement("Pagto do quarto")];
        engine.apply(&mut hit);
        assert_eq!(hit[0].account_code.as_deref(), Some("1.01"));

        let mut miss = [movement("pagto do quarto")];
        engine.apply(&mut miss);
        assert_eq!(miss[0].account_code, None);
    }

    #[test]
    fn substring_match_is_case_insensitive() {
        let set = RuleSet {
            substring: vec![Rule::new("COMANDA", "1.02", "3.2")],
            ..RuleSet::default()
        };
        let mut movements = [movement("Pagamento da comanda 15")];
        RuleEngine::new(&set).apply(&mut movements);
        assert_eq!(movements[0].account_code.as_deref(), Some("1.02"));
    }

    #[test]
    fn regex_match_respects_per_rule_case_flag() {
        let mut sensitive = Rule::new(r"^sangria", "2.01", "");
        sensitive.ignore_case = false;
        let set = RuleSet {
            pattern: vec![sensitive],
            ..RuleSet::default()
        };
        let engine = RuleEngine::new(&set);

        let mut movements = [movement("Sangria do caixa"), movement("sangria do caixa")];
        engine.apply(&mut movements);
        assert_eq!(movements[0].account_code, None);
        assert_eq!(movements[1].account_code.as_deref(), Some("2.01"));
    }

    #[test]
    fn invalid_regex_is_skipped_other_rules_still_apply() {
        let set = RuleSet {
            substring: vec![Rule::new("quarto", "1.01", "3.1")],
            pattern: vec![Rule::new(r"([unclosed", "9.99", "9.9")],
            ..RuleSet::default()
        };
        let mut movements = [movement("Pagto do quarto")];
        RuleEngine::new(&set).apply(&mut movements);
        assert_eq!(movements[0].account_code.as_deref(), Some("1.01"));
    }

    #[test]
    fn later_list_overwrites_earlier_match() {
        let set = RuleSet {
            substring: vec![Rule::new("quarto", "X", "")],
            pattern: vec![Rule::new("quarto", "Y", "")],
            ..RuleSet::default()
        };
        let mut movements = [movement("Pagto do quarto")];
        RuleEngine::new(&set).apply(&mut movements);
        assert_eq!(movements[0].account_code.as_deref(), Some("Y"));
    }

    #[test]
    fn later_rule_in_same_list_wins() {
        let set = RuleSet {
            substring: vec![Rule::new("quarto", "A", ""), Rule::new("Pagto", "B", "")],
            ..RuleSet::default()
        };
        let mut movements = [movement("Pagto do quarto")];
        RuleEngine::new(&set).apply(&mut movements);
        assert_eq!(movements[0].account_code.as_deref(), Some("B"));
    }

    #[test]
    fn empty_rule_value_leaves_field_untouched() {
        let set = RuleSet {
            prefix: vec![Rule::new("Pagto", "1.01", "3.1")],
            substring: vec![Rule::new("quarto", "", "3.9")],
            ..RuleSet::default()
        };
        let mut movements = [movement("Pagto do quarto")];
        RuleEngine::new(&set).apply(&mut movements);
        // The second rule only carries availability; account_code survives.
        assert_eq!(movements[0].account_code.as_deref(), Some("1.01"));
        assert_eq!(movements[0].availability.as_deref(), Some("3.9"));
    }

    #[test]
    fn blank_pattern_is_inert() {
        let set = RuleSet {
            prefix: vec![Rule::new("   ", "1.01", "3.1")],
            ..RuleSet::default()
        };
        let mut movements = [movement("Pagto do quarto")];
        RuleEngine::new(&set).apply(&mut movements);
        assert_eq!(movements[0].account_code, None);
    }

    #[test]
    fn unmatched_movement_keeps_empty_classification() {
        let engine = RuleEngine::new(&RuleSet::default_rules());
        let mut movements = [movement("Despesa avulsa")];
        engine.apply(&mut movements);
        assert_eq!(movements[0].account_code, None);
        assert_eq!(movements[0].availability, None);
    }

    #[test]
    fn default_rules_classify_room_payment() {
        let engine = RuleEngine::new(&RuleSet::default_rules());
        let mut movements = [movement("Pagto do quarto 101")];
        engine.apply(&mut movements);
        assert_eq!(
            movements[0].account_code.as_deref(),
            Some("1.01 - Hospedagem")
        );
        assert_eq!(
            movements[0].availability.as_deref(),
            Some("3.1 - HOTEL (CENTRO DE CUSTO)")
        );
    }

    #[test]
    fn deserializes_external_document_with_missing_fields() {
        let doc = r#"{
            "startswith": [{"pattern": "Pagto", "conta_contabil": "1.01"}],
            "regex": [{"pattern": "sangria", "disponibilidade": "2.2"}]
        }"#;
        let set: RuleSet = serde_json::from_str(doc).unwrap();
        assert_eq!(set.prefix.len(), 1);
        assert_eq!(set.substring.len(), 0);
        assert!(set.pattern[0].ignore_case);
        assert_eq!(set.prefix[0].availability, "");
    }
}
