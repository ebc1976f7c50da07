use crate::model::Money;
use serde::{Deserialize, Serialize};

/// A ledger entry. Negative amounts are money paid out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub project_id: String,
    #[serde(default)]
    pub linked_task_id: Option<String>,
    pub date: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    pub amount: Money,
    pub payment_method: PaymentMethod,
    pub status: TransactionStatus,
    pub reference: String,
    pub created_at: String,
}

impl Transaction {
    pub fn is_linked_to(&self, task_id: &str) -> bool {
        self.linked_task_id.as_deref() == Some(task_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Completed,
    Pending,
}

labelled_enum!(TransactionStatus, "transaction status" {
    Completed => "completed",
    Pending => "pending",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Bank,
    Cash,
    Credit,
    Check,
    Zelle,
    Venmo,
}

labelled_enum!(PaymentMethod, "payment method" {
    Bank => "bank",
    Cash => "cash",
    Credit => "credit",
    Check => "check",
    Zelle => "zelle",
    Venmo => "venmo",
});

/// Which way money moves. User input is a magnitude; the direction sets the
/// sign stored on the transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Outgoing,
    Incoming,
}

labelled_enum!(Direction, "direction" {
    Outgoing => "out",
    Incoming => "in",
});

impl Direction {
    pub fn apply(self, amount: Money) -> Money {
        match self {
            Self::Outgoing => -amount.abs(),
            Self::Incoming => amount.abs(),
        }
    }
}
