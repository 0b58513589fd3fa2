use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Success,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "PENDING",
            PaymentStatus::Success => "SUCCESS",
            PaymentStatus::Failed => "FAILED",
        }
    }

    // A failed payment may be retried; a successful one is settled.
    pub fn can_transition_to(&self, next: PaymentStatus) -> bool {
        use PaymentStatus::*;
        matches!(
            (self, next),
            (Pending, Success) | (Pending, Failed) | (Failed, Pending)
        ) || *self == next
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payment for one appointment; `id` is the appointment's id.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Payment {
    pub id: i64,
    pub total_price: i64,
    pub created_date: DateTime<Utc>,
    pub status: PaymentStatus,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewPayment {
    pub appointment_id: i64,
    pub total_price: i64,
    pub status: Option<PaymentStatus>,
}

impl NewPayment {
    pub fn new(appointment_id: i64, total_price: i64) -> Self {
        Self {
            appointment_id,
            total_price,
            status: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::PaymentStatus::*;
    use super::*;

    #[test]
    fn settled_payment_is_final() {
        assert!(!Success.can_transition_to(Pending));
        assert!(!Success.can_transition_to(Failed));
    }

    #[test]
    fn failed_payment_can_be_retried() {
        assert!(Failed.can_transition_to(Pending));
        assert!(!Failed.can_transition_to(Success));
        assert!(Pending.can_transition_to(Success));
    }
}
