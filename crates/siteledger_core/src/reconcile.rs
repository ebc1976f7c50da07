//! Derives a task's status and progress from the payments linked to it.
//!
//! Everything here is pure. Callers pick the transactions (already filtered
//! by `linked_task_id`, optionally including one that is not stored yet) and
//! write the outcome back themselves.

use crate::model::{Money, Task, TaskStatus, Transaction};

/// The status/progress pair a task should carry after reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reconciliation {
    pub status: TaskStatus,
    pub progress: u8,
}

impl Reconciliation {
    pub fn current(task: &Task) -> Self {
        Self {
            status: task.status,
            progress: task.progress,
        }
    }

    pub fn differs_from(&self, task: &Task) -> bool {
        self.status != task.status || self.progress != task.progress
    }
}

/// Sum of absolute amounts. The sign records direction, not progress.
pub fn total_paid<'a, I>(transactions: I) -> Money
where
    I: IntoIterator<Item = &'a Transaction>,
{
    transactions
        .into_iter()
        .map(|transaction| transaction.amount.abs())
        .sum()
}

/// Applies the one-way transition rule:
///
/// * paid in full and not yet completed: `completed` at 100
/// * something paid while still pending: `in-progress` at the rounded percent
/// * anything else leaves the task untouched
///
/// A completed task never moves back, and an in-progress task keeps its
/// progress until it is paid in full. `contract_value` must be positive; that
/// is checked when the task is created.
pub fn reconcile(task: &Task, transactions: &[Transaction]) -> Reconciliation {
    debug_assert!(task.contract_value.is_positive());

    let paid = total_paid(transactions);

    if paid >= task.contract_value && task.status != TaskStatus::Completed {
        Reconciliation {
            status: TaskStatus::Completed,
            progress: 100,
        }
    } else if paid.is_positive() && task.status == TaskStatus::Pending {
        Reconciliation {
            status: TaskStatus::InProgress,
            progress: rounded_percent(paid, task.contract_value),
        }
    } else {
        Reconciliation::current(task)
    }
}

/// `round(paid / contract * 100)` with halves rounded up, capped at 100.
fn rounded_percent(paid: Money, contract: Money) -> u8 {
    let paid = i128::from(paid.minor());
    let contract = i128::from(contract.minor());
    let percent = (paid * 200 + contract) / (contract * 2);
    percent.clamp(0, 100) as u8
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentSummary {
    pub contract_value: Money,
    pub total_paid: Money,
    pub remaining_balance: Money,
    pub payment_count: usize,
}

impl PaymentSummary {
    /// Paid share of the contract in percent, not capped, for display.
    pub fn payment_percent(&self) -> f64 {
        if !self.contract_value.is_positive() {
            return 0.0;
        }
        self.total_paid.minor() as f64 / self.contract_value.minor() as f64 * 100.0
    }
}

pub fn payment_summary(task: &Task, transactions: &[Transaction]) -> PaymentSummary {
    let total_paid = total_paid(transactions);
    PaymentSummary {
        contract_value: task.contract_value,
        total_paid,
        remaining_balance: task.contract_value - total_paid,
        payment_count: transactions.len(),
    }
}
