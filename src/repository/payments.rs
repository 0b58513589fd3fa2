use chrono::Utc;
use sqlx::SqlitePool;

use crate::error::{Error, Result};
use crate::model::{NewPayment, Payment, PaymentStatus};

#[derive(Debug, Clone)]
pub struct PaymentRepository {
    pool: SqlitePool,
}

impl PaymentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Records the payment for an existing appointment. Status defaults to
    /// `PENDING`; an appointment has at most one payment.
    pub async fn create(&self, new: NewPayment) -> Result<Payment> {
        let status = new.status.unwrap_or_default();
        let created_date = Utc::now();

        sqlx::query("INSERT INTO payments (id, total_price, created_date, status) VALUES (?, ?, ?, ?)")
            .bind(new.appointment_id)
            .bind(new.total_price)
            .bind(created_date)
            .bind(status)
            .execute(&self.pool)
            .await?;

        tracing::info!(
            appointment_id = new.appointment_id,
            total_price = new.total_price,
            "payment recorded"
        );
        Ok(Payment {
            id: new.appointment_id,
            total_price: new.total_price,
            created_date,
            status,
        })
    }

    /// Payment for the given appointment id.
    pub async fn get(&self, appointment_id: i64) -> Result<Option<Payment>> {
        let payment = sqlx::query_as::<_, Payment>(
            "SELECT id, total_price, created_date, status FROM payments WHERE id = ?",
        )
        .bind(appointment_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(payment)
    }

    pub async fn update_status(&self, id: i64, next: PaymentStatus) -> Result<Payment> {
        let current = self
            .get(id)
            .await?
            .ok_or(Error::NotFound { entity: "payment", id })?;

        if !current.status.can_transition_to(next) {
            return Err(Error::InvalidTransition {
                entity: "payment",
                from: current.status.to_string(),
                to: next.to_string(),
            });
        }
        if current.status == next {
            return Ok(current);
        }
        self.swap_status(current, next).await
    }

    async fn swap_status(&self, current: Payment, next: PaymentStatus) -> Result<Payment> {
        let id = current.id;
        let result = sqlx::query("UPDATE payments SET status = ? WHERE id = ? AND status = ?")
            .bind(next)
            .bind(id)
            .bind(current.status)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            tracing::warn!(payment_id = id, expected = %current.status, "payment status changed underneath");
            return Err(Error::StatusConflict { entity: "payment", id });
        }

        tracing::info!(payment_id = id, from = %current.status, to = %next, "payment status changed");
        Ok(Payment {
            status: next,
            ..current
        })
    }
}
