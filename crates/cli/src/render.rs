use std::path::Path;

use comfy_table::{Cell, Table};

use caixa_core::{format_brl_opt, Brl};
use caixa_report::{LedgerRow, Report, RowKind};

/// Print the whole report as console tables: header fields, the subtotaled
/// detail, the ledger rows and the per-destination summary.
pub fn print_report(report: &Report) {
    if !report.header.is_empty() {
        println!("Resumo do caixa");
        let mut table = Table::new();
        table.set_header(vec!["Campo", "Valor"]);
        for (label, value) in report.header.iter() {
            table.add_row(vec![Cell::new(label), Cell::new(value)]);
        }
        println!("{table}");
    }

    println!("\nMovimentos");
    let mut table = Table::new();
    table.set_header(vec![
        "Código",
        "Descrição",
        "Tipo",
        "Valor",
        "Forma pagamento",
        "Parcelas",
        "Lançamento",
        "Conta Contábil",
        "Disponibilidade",
    ]);
    for row in &report.detail {
        let code = match (row.row, row.code) {
            (RowKind::Movement, Some(code)) => code.to_string(),
            _ => String::new(),
        };
        let installments = row.installments.map(|n| n.to_string()).unwrap_or_default();
        table.add_row(vec![
            Cell::new(code),
            Cell::new(&row.description),
            Cell::new(&row.kind),
            Cell::new(&row.amount_text),
            Cell::new(&row.payment_method),
            Cell::new(installments),
            Cell::new(&row.posted_at),
            Cell::new(&row.account_code),
            Cell::new(&row.availability),
        ]);
    }
    println!("{table}");

    println!("\nLançamentos contábeis");
    let mut table = Table::new();
    table.set_header(ledger_header());
    for row in &report.ledger {
        table.add_row(vec![
            Cell::new(&row.description),
            Cell::new(row.account_code.as_deref().unwrap_or_default()),
            Cell::new(row.availability.as_deref().unwrap_or_default()),
            Cell::new(&row.date),
            Cell::new(format_brl_opt(row.amount)),
            Cell::new(&row.destination),
        ]);
    }
    println!("{table}");

    println!("\nResumo por conta destino");
    let mut table = Table::new();
    table.set_header(vec!["Conta Destino", "Qtde", "Total"]);
    for entry in &report.summary {
        table.add_row(vec![
            Cell::new(&entry.destination),
            Cell::new(entry.count),
            Cell::new(Brl(entry.total)),
        ]);
    }
    println!("{table}");
}

/// Write the ledger rows to `path` as CSV. Amounts use a plain dot-decimal
/// form with two places so spreadsheets import them as numbers.
pub fn write_ledger_csv(rows: &[LedgerRow], path: &Path) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(ledger_header())?;
    for row in rows {
        let amount = row.amount.map(|a| format!("{a:.2}")).unwrap_or_default();
        writer.write_record([
            row.description.as_str(),
            row.account_code.as_deref().unwrap_or_default(),
            row.availability.as_deref().unwrap_or_default(),
            row.date.as_str(),
            amount.as_str(),
            row.destination.as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn ledger_header() -> Vec<&'static str> {
    vec![
        "Descrição",
        "Conta Contábil",
        "Disponibilidade",
        "Data",
        "Valor",
        "Conta Destino",
    ]
}
