use std::sync::OnceLock;

use regex::Regex;

use caixa_core::{HeaderSummary, HeaderValue};

/// Fields extracted as the free text between `<label>:` and the next
/// `<word>:` token.
const SIMPLE_FIELDS: [&str; 4] = ["Caixa", "Usuário", "Abertura", "Fechamento"];

/// Catalog of named monetary totals a session report may carry. Each is
/// searched independently; whatever is found is kept as a display string.
const MONEY_FIELDS: [&str; 31] = [
    "Crédito",
    "Dinheiro bruto",
    "Faturamento",
    "Fechamento",
    "Saldo bruto",
    "Débito",
    "Fundo de caixa",
    "Prazo",
    "A prazo",
    "Estornos",
    "Total despesas",
    "PIX",
    "Dinheiro líquido",
    "Cheque",
    "Estornado",
    "Total sangria",
    "PIX QR CODE",
    "Hospedagens (dinheiro)",
    "Total boleto",
    "A devolver",
    "Total a devolver",
    "Saldo líquido",
    "Transferência bancária",
    "Total Hospedagens (outras formas)",
    "Desconto",
    "Descontos",
    "Depósito",
    "Total Consumos",
    "Total serviços",
    "Vendas PDV",
    "Total reforço",
];

/// Appended to the input so the simple-field pattern always has a trailing
/// `<word>:` terminator to stop at, even for the last field in the text.
const END_MARKER: &str = " FIM:";

fn simple_patterns() -> &'static Vec<(&'static str, Regex)> {
    static P: OnceLock<Vec<(&'static str, Regex)>> = OnceLock::new();
    P.get_or_init(|| {
        SIMPLE_FIELDS
            .iter()
            .map(|label| {
                let pattern = format!(
                    r"(?i){}:\s*([^\n\r]+?)\s(?:\w+:)",
                    regex::escape(label)
                );
                (*label, Regex::new(&pattern).expect("invalid header pattern"))
            })
            .collect()
    })
}

fn money_patterns() -> &'static Vec<(&'static str, Regex)> {
    static P: OnceLock<Vec<(&'static str, Regex)>> = OnceLock::new();
    P.get_or_init(|| {
        MONEY_FIELDS
            .iter()
            .map(|label| {
                let pattern = format!(r"(?i){}:?\s*R\$\s?[\d.,]+", regex::escape(label));
                (*label, Regex::new(&pattern).expect("invalid amount pattern"))
            })
            .collect()
    })
}

/// Pull the labeled header fields out of the raw report text.
///
/// Monetary fields are stored as `R$ <digits>` display strings, not parsed
/// values; the header is for presentation only. Fields not present in the
/// text are omitted.
pub fn extract_header(raw: &str) -> HeaderSummary {
    let mut summary = HeaderSummary::default();
    let terminated = format!("{raw}{END_MARKER}");

    for (label, re) in simple_patterns() {
        if let Some(caps) = re.captures(&terminated) {
            summary.insert(*label, HeaderValue::Text(caps[1].trim().to_string()));
        }
    }

    for (label, re) in money_patterns() {
        if let Some(found) = re.find(raw) {
            let amount = found
                .as_str()
                .rsplit("R$")
                .next()
                .unwrap_or_default()
                .trim();
            summary.insert(*label, HeaderValue::Text(format!("R$ {amount}")));
        }
    }

    coerce_session_id(&mut summary);
    summary
}

/// The session id becomes a number when its digits parse; otherwise the
/// extracted text is left untouched.
fn coerce_session_id(summary: &mut HeaderSummary) {
    if let Some(HeaderValue::Text(text)) = summary.get("Caixa") {
        let digits: String = text.chars().filter(char::is_ascii_digit).collect();
        if let Ok(n) = digits.parse::<i64>() {
            summary.insert("Caixa", HeaderValue::Number(n));
        }
    }
}
