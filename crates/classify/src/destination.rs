use serde::{Deserialize, Serialize};

use caixa_core::movement::{Movement, OTHER_DESTINATION};

/// One payment-method mapping entry: any token appearing inside the
/// lower-cased payment text claims the movement for `destination`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DestinationRule {
    #[serde(default, rename = "match")]
    pub match_tokens: Vec<String>,
    #[serde(default, rename = "destino", skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
}

impl DestinationRule {
    pub fn new(tokens: &[&str], destination: &str) -> Self {
        DestinationRule {
            match_tokens: tokens.iter().map(|t| t.to_string()).collect(),
            destination: Some(destination.to_string()),
        }
    }
}

/// Ordered payment-method → destination-account lookup. Unlike the
/// classification rule lists this is first-match-wins.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DestinationMap {
    pub rules: Vec<DestinationRule>,
}

impl DestinationMap {
    /// Built-in map shipped with the tool.
    pub fn default_map() -> Self {
        DestinationMap {
            rules: vec![
                DestinationRule::new(&["vale", "dinheiro"], "CAIXA"),
                DestinationRule::new(
                    &[
                        "pix",
                        "pix qr code",
                        "cartão de débito",
                        "cartao de debito",
                        "cartão de crédito",
                        "cartao de credito",
                    ],
                    "STONE",
                ),
                DestinationRule::new(&["faturamento", "boleto"], "FATURAMENTO"),
            ],
        }
    }
}

/// First rule in list order with a token contained in the lower-cased
/// payment text wins; no match maps to `OUTROS`.
pub fn map_destination(payment_method: &str, map: &DestinationMap) -> String {
    let text = payment_method.trim().to_lowercase();
    for rule in &map.rules {
        for token in &rule.match_tokens {
            if text.contains(token.as_str()) {
                return rule
                    .destination
                    .clone()
                    .unwrap_or_else(|| OTHER_DESTINATION.to_string());
            }
        }
    }
    OTHER_DESTINATION.to_string()
}

/// Fill `destination` on every movement from its payment method.
pub fn assign_destinations(movements: &mut [Movement], map: &DestinationMap) {
    for movement in movements.iter_mut() {
        movement.destination = map_destination(&movement.payment_method, map);
    }
}
