use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use caixa_core::Movement;

/// Grouping keys available for the detail view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupKey {
    PaymentMethod,
    Kind,
}

impl GroupKey {
    /// Column label as it appears in the source report.
    pub fn label(self) -> &'static str {
        match self {
            GroupKey::PaymentMethod => "Forma pagamento",
            GroupKey::Kind => "Tipo",
        }
    }

    pub fn value(self, movement: &Movement) -> &str {
        match self {
            GroupKey::PaymentMethod => &movement.payment_method,
            GroupKey::Kind => &movement.kind,
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for GroupKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "payment-method" | "forma-pagamento" | "forma pagamento" => {
                Ok(GroupKey::PaymentMethod)
            }
            "kind" | "tipo" => Ok(GroupKey::Kind),
            other => Err(format!("unknown group key: '{other}'")),
        }
    }
}

/// Stable sort by the grouping keys in order, then by the posting timestamp
/// text as the final tiebreak.
pub fn sort_movements(movements: &mut [Movement], keys: &[GroupKey]) {
    movements.sort_by(|a, b| {
        keys.iter()
            .map(|k| k.value(a).cmp(k.value(b)))
            .find(|ordering| ordering.is_ne())
            .unwrap_or_else(|| a.posted_at.cmp(&b.posted_at))
    });
}
