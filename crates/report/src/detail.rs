use rust_decimal::Decimal;
use serde::Serialize;

use caixa_core::{format_brl, Movement};

use crate::group::GroupKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RowKind {
    Movement,
    Subtotal,
    GrandTotal,
}

/// One row of the subtotaled detail view. Synthetic rows (subtotals and the
/// grand total) leave the per-movement fields empty; every row carries both
/// the display-formatted amount and the numeric amount.
#[derive(Debug, Clone, Serialize)]
pub struct DetailRow {
    pub row: RowKind,
    pub code: Option<i64>,
    pub description: String,
    pub kind: String,
    pub amount_text: String,
    pub amount: Option<Decimal>,
    pub payment_method: String,
    pub installments: Option<i64>,
    pub posted_at: String,
    pub account_code: String,
    pub availability: String,
}

/// Grand-total label, kept verbatim from the source system's reports.
const GRAND_TOTAL_LABEL: &str = "TOTAL GERAL";

/// Expand sorted movements into a detail sequence with one subtotal row per
/// group at every grouping depth, plus a final grand-total row.
///
/// Groups appear in the order their first member appears. Movements with an
/// unparseable amount contribute nothing to the sums.
pub fn detail_with_subtotals(movements: &[Movement], keys: &[GroupKey]) -> Vec<DetailRow> {
    let members: Vec<&Movement> = movements.iter().collect();
    let mut rows = Vec::with_capacity(movements.len() + 1);
    append_group(&members, keys, 0, &mut rows);

    let grand_total = sum_amounts(&members);
    rows.push(DetailRow {
        row: RowKind::GrandTotal,
        code: None,
        description: GRAND_TOTAL_LABEL.to_string(),
        kind: String::new(),
        amount_text: format_brl(grand_total),
        amount: Some(grand_total),
        payment_method: String::new(),
        installments: None,
        posted_at: String::new(),
        account_code: String::new(),
        availability: String::new(),
    });
    rows
}

fn append_group(members: &[&Movement], keys: &[GroupKey], depth: usize, out: &mut Vec<DetailRow>) {
    if depth == keys.len() {
        out.extend(members.iter().map(|m| movement_row(m)));
        return;
    }

    let key = keys[depth];
    for (label, group) in partition_by(members, key) {
        append_group(&group, keys, depth + 1, out);

        let subtotal = sum_amounts(&group);
        out.push(DetailRow {
            row: RowKind::Subtotal,
            code: None,
            description: format!("Subtotal - {}: {}", key.label(), label),
            kind: String::new(),
            amount_text: format_brl(subtotal),
            amount: Some(subtotal),
            // The source system repeats the group's first payment method on
            // its subtotal rows.
            payment_method: group
                .first()
                .map(|m| m.payment_method.clone())
                .unwrap_or_default(),
            installments: None,
            posted_at: String::new(),
            account_code: String::new(),
            availability: String::new(),
        });
    }
}

/// Stable partition: groups ordered by first appearance of their key value.
fn partition_by<'a>(members: &[&'a Movement], key: GroupKey) -> Vec<(String, Vec<&'a Movement>)> {
    let mut groups: Vec<(String, Vec<&'a Movement>)> = Vec::new();
    for &movement in members {
        let value = key.value(movement).to_string();
        match groups.iter_mut().find(|(label, _)| *label == value) {
            Some((_, group)) => group.push(movement),
            None => groups.push((value, vec![movement])),
        }
    }
    groups
}

fn sum_amounts(members: &[&Movement]) -> Decimal {
    members.iter().filter_map(|m| m.amount).sum()
}

fn movement_row(movement: &Movement) -> DetailRow {
    DetailRow {
        row: RowKind::Movement,
        code: movement.code,
        description: movement.description.clone(),
        kind: movement.kind.clone(),
        amount_text: movement.amount_text.clone(),
        amount: movement.amount,
        payment_method: movement.payment_method.clone(),
        installments: movement.installments,
        posted_at: movement.posted_at.clone(),
        account_code: movement.account_code.clone().unwrap_or_default(),
        availability: movement.availability.clone().unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn movement(code: i64, payment: &str, kind: &str, amount: Option<&str>) -> Movement {
        Movement {
            code: Some(code),
            description_base: format!("mov {code}"),
            description: format!("{code} - mov {code}"),
            kind: kind.to_string(),
            amount_text: amount.map(|a| format!("R$ {a}")).unwrap_or_default(),
            amount: amount.map(|a| dec(&a.replace(',', "."))),
            payment_method: payment.to_string(),
            installments: Some(1),
            posted_at: "01/01/2024 09:00:00".to_string(),
            account_code: None,
            availability: None,
            destination: String::new(),
        }
    }

    fn subtotals(rows: &[DetailRow]) -> Vec<&DetailRow> {
        rows.iter().filter(|r| r.row == RowKind::Subtotal).collect()
    }

    #[test]
    fn empty_keys_yield_rows_plus_grand_total_only() {
        let movements = vec![
            movement(1, "Pix", "Entrada", Some("10,00")),
            movement(2, "Dinheiro", "Entrada", Some("5,00")),
        ];
        let rows = detail_with_subtotals(&movements, &[]);
        assert_eq!(rows.len(), 3);
        assert!(subtotals(&rows).is_empty());
        assert_eq!(rows[2].row, RowKind::GrandTotal);
        assert_eq!(rows[2].description, "TOTAL GERAL");
        assert_eq!(rows[2].amount, Some(dec("15.00")));
        assert_eq!(rows[2].amount_text, "R$ 15,00");
    }

    #[test]
    fn one_key_emits_subtotal_per_group() {
        let movements = vec![
            movement(1, "Dinheiro", "Entrada", Some("150,00")),
            movement(2, "Dinheiro", "Entrada", Some("50,00")),
            movement(3, "Pix", "Entrada", Some("30,00")),
        ];
        let rows = detail_with_subtotals(&movements, &[GroupKey::PaymentMethod]);

        // 3 movements + 2 subtotals + grand total.
        assert_eq!(rows.len(), 6);
        let subs = subtotals(&rows);
        assert_eq!(subs.len(), 2);
        assert_eq!(subs[0].description, "Subtotal - Forma pagamento: Dinheiro");
        assert_eq!(subs[0].amount, Some(dec("200.00")));
        assert_eq!(subs[0].payment_method, "Dinheiro");
        assert_eq!(subs[1].description, "Subtotal - Forma pagamento: Pix");
        assert_eq!(subs[1].amount, Some(dec("30.00")));

        // Subtotal row follows its group's member rows.
        assert_eq!(rows[0].row, RowKind::Movement);
        assert_eq!(rows[1].row, RowKind::Movement);
        assert_eq!(rows[2].row, RowKind::Subtotal);

        assert_eq!(rows.last().unwrap().amount, Some(dec("230.00")));
    }

    #[test]
    fn nested_keys_subtotal_at_each_depth() {
        let movements = vec![
            movement(1, "Dinheiro", "Entrada", Some("10,00")),
            movement(2, "Dinheiro", "Saída", Some("4,00")),
            movement(3, "Pix", "Entrada", Some("6,00")),
        ];
        let rows =
            detail_with_subtotals(&movements, &[GroupKey::PaymentMethod, GroupKey::Kind]);

        let descriptions: Vec<_> = rows.iter().map(|r| r.description.as_str()).collect();
        assert_eq!(
            descriptions,
            vec![
                "1 - mov 1",
                "Subtotal - Tipo: Entrada",
                "2 - mov 2",
                "Subtotal - Tipo: Saída",
                "Subtotal - Forma pagamento: Dinheiro",
                "3 - mov 3",
                "Subtotal - Tipo: Entrada",
                "Subtotal - Forma pagamento: Pix",
                "TOTAL GERAL",
            ]
        );
        // The outer subtotal covers both inner groups.
        assert_eq!(rows[4].amount, Some(dec("14.00")));
    }

    #[test]
    fn subtotal_sums_equal_their_leaf_sums() {
        let movements = vec![
            movement(1, "Pix", "Entrada", Some("1,25")),
            movement(2, "Pix", "Entrada", Some("2,50")),
            movement(3, "Dinheiro", "Entrada", Some("0,25")),
        ];
        let rows = detail_with_subtotals(&movements, &[GroupKey::PaymentMethod]);
        let leaf_sum: Decimal = rows
            .iter()
            .filter(|r| r.row == RowKind::Movement)
            .filter_map(|r| r.amount)
            .sum();
        let grand = rows.last().unwrap().amount.unwrap();
        assert_eq!(leaf_sum, grand);

        let sub_sum: Decimal = subtotals(&rows).iter().filter_map(|r| r.amount).sum();
        assert_eq!(sub_sum, grand);
    }

    #[test]
    fn unparseable_amounts_do_not_poison_totals() {
        let movements = vec![
            movement(1, "Pix", "Entrada", Some("10,00")),
            movement(2, "Pix", "Entrada", None),
        ];
        let rows = detail_with_subtotals(&movements, &[GroupKey::PaymentMethod]);
        assert_eq!(subtotals(&rows)[0].amount, Some(dec("10.00")));
        assert_eq!(rows.last().unwrap().amount, Some(dec("10.00")));
    }

    #[test]
    fn no_movements_still_emit_grand_total_of_zero() {
        let rows = detail_with_subtotals(&[], &[GroupKey::Kind]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].row, RowKind::GrandTotal);
        assert_eq!(rows[0].amount, Some(Decimal::ZERO));
        assert_eq!(rows[0].amount_text, "R$ 0,00");
    }

    #[test]
    fn movement_rows_keep_original_amount_text() {
        let movements = vec![movement(1, "Pix", "Entrada", Some("10,00"))];
        let rows = detail_with_subtotals(&movements, &[]);
        assert_eq!(rows[0].amount_text, "R$ 10,00");
    }
}
