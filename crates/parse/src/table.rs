use std::sync::OnceLock;

use chrono::NaiveDateTime;
use regex::Regex;

use caixa_core::movement::{Movement, OTHER_DESTINATION};
use caixa_core::parse_brl;

macro_rules! re {
    ($name:ident, $pat:expr) => {
        fn $name() -> &'static Regex {
            static R: OnceLock<Regex> = OnceLock::new();
            R.get_or_init(|| Regex::new($pat).expect("invalid regex"))
        }
    };
}

// Seven expected column labels; the user column is optional because reports
// may or may not include it. `(?s)` lets the trailing capture span lines.
re!(re_table_header,
    r"(?is)Código mov\.\s+Descrição\s+(Usuário\s+)?Tipo\s+Valor\s+Forma pagamento\s+Num\. parcelas\s+Lançamento(.*)$");

re!(re_line_break, r"[\r\n]+");
re!(re_tabs, r"\t+");
re!(re_wide_gap, r"\s{2,}");

// Last-resort tokenizer for single-spaced lines.
re!(re_strict_line,
    r"(?i)^(\d+)\s+(.*?)\s+(Reforço|Entrada|Sa[ií]da|Desconto)\s+(R\$\s?[\d.,]+)\s+(.*?)\s+(\d+)\s+(\d{2}/\d{2}/\d{4}\s+\d{2}:\d{2}:\d{2})$");

const POSTED_AT_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Locate the movement table inside the raw report and tokenize each line
/// into a `Movement`.
///
/// No table header means an empty result, not an error. Lines that fail all
/// tokenization strategies are skipped; input order is preserved.
pub fn parse_movements(raw: &str, concat_code: bool) -> Vec<Movement> {
    let Some(caps) = re_table_header().captures(raw) else {
        return Vec::new();
    };
    let body = caps.get(2).map(|m| m.as_str()).unwrap_or_default().trim();

    let mut movements = Vec::new();
    for line in re_line_break()
        .split(body)
        .map(str::trim)
        .filter(|l| !l.is_empty())
    {
        match parse_line(line, concat_code) {
            Some(movement) => movements.push(movement),
            None => tracing::debug!(line, "skipping unrecognized movement line"),
        }
    }
    movements
}

struct RawFields<'a> {
    code: &'a str,
    description: &'a str,
    kind: &'a str,
    amount: &'a str,
    payment_method: &'a str,
    installments: &'a str,
    posted_at: String,
}

fn parse_line(line: &str, concat_code: bool) -> Option<Movement> {
    let fields = tokenize(line)?;

    let code = parse_digits(fields.code);
    let description = match (concat_code, code) {
        (true, Some(c)) => format!("{c} - {}", fields.description),
        _ => fields.description.to_string(),
    };

    Some(Movement {
        code,
        description_base: fields.description.to_string(),
        description,
        kind: fields.kind.to_string(),
        amount_text: fields.amount.to_string(),
        amount: parse_brl(fields.amount),
        payment_method: fields.payment_method.to_string(),
        installments: parse_digits(fields.installments),
        posted_at: fields.posted_at,
        account_code: None,
        availability: None,
        destination: OTHER_DESTINATION.to_string(),
    })
}

/// Fallback strategies in order: runs of tabs, runs of two or more spaces,
/// then the strict full-line pattern. With eight or more tokens the third
/// one is the user column and is discarded; over-split trailing tokens are
/// joined back into the timestamp field.
fn tokenize(line: &str) -> Option<RawFields<'_>> {
    let mut parts: Vec<&str> = re_tabs().split(line).collect();
    if parts.len() < 7 {
        parts = re_wide_gap().split(line).collect();
    }

    if parts.len() >= 8 {
        Some(RawFields {
            code: parts[0].trim(),
            description: parts[1].trim(),
            kind: parts[3].trim(),
            amount: parts[4].trim(),
            payment_method: parts[5].trim(),
            installments: parts[6].trim(),
            posted_at: parts[7..].join(" ").trim().to_string(),
        })
    } else if parts.len() == 7 {
        Some(RawFields {
            code: parts[0].trim(),
            description: parts[1].trim(),
            kind: parts[2].trim(),
            amount: parts[3].trim(),
            payment_method: parts[4].trim(),
            installments: parts[5].trim(),
            posted_at: parts[6..].join(" ").trim().to_string(),
        })
    } else {
        strict_line(line)
    }
}

fn strict_line(line: &str) -> Option<RawFields<'_>> {
    let caps = re_strict_line().captures(line)?;
    let posted_at = caps.get(7)?.as_str();
    // The pattern only checks digit shape; reject 99/99/9999-style tails.
    NaiveDateTime::parse_from_str(posted_at, POSTED_AT_FORMAT).ok()?;

    Some(RawFields {
        code: caps.get(1)?.as_str(),
        description: caps.get(2)?.as_str(),
        kind: caps.get(3)?.as_str(),
        amount: caps.get(4)?.as_str(),
        payment_method: caps.get(5)?.as_str(),
        installments: caps.get(6)?.as_str(),
        posted_at: posted_at.to_string(),
    })
}

/// Digits-only integer coercion; `None` when nothing parses.
fn parse_digits(text: &str) -> Option<i64> {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    digits.parse().ok()
}
