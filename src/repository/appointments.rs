use chrono::Utc;
use sqlx::SqlitePool;

use crate::error::{Error, Result};
use crate::model::{AppointmentSchedule, AppointmentStatus, NewAppointment};
use crate::repository::DoctorRepository;

const COLUMNS: &str =
    "id, room, date, created_date, status, note, doctor_id, patient_id, booked_by";

#[derive(Debug, Clone)]
pub struct AppointmentRepository {
    pool: SqlitePool,
    doctors: DoctorRepository,
}

impl AppointmentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            doctors: DoctorRepository::new(pool.clone()),
            pool,
        }
    }

    /// Books an appointment. Status defaults to `PENDING`. A dated booking
    /// must fall inside the doctor's working hours.
    pub async fn create(&self, new: NewAppointment) -> Result<AppointmentSchedule> {
        if let Some(at) = new.date {
            // an unknown doctor is left to the foreign key
            if let Some(doctor) = self.doctors.get(new.doctor_id).await? {
                if !doctor.is_on_duty(at) {
                    tracing::debug!(doctor_id = doctor.id, %at, "booking outside working hours");
                    return Err(Error::OutsideWorkingHours {
                        doctor_id: doctor.id,
                        at,
                    });
                }
            }
        }

        let status = new.status.unwrap_or_default();
        let created_date = Utc::now();

        let id = sqlx::query(
            "INSERT INTO appointment_schedules (room, date, created_date, status, note, doctor_id, patient_id, booked_by)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&new.room)
        .bind(new.date)
        .bind(created_date)
        .bind(status)
        .bind(&new.note)
        .bind(new.doctor_id)
        .bind(new.patient_id)
        .bind(new.booked_by)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        tracing::info!(
            appointment_id = id,
            doctor_id = new.doctor_id,
            patient_id = new.patient_id,
            booked_by = new.booked_by,
            "appointment booked"
        );
        Ok(AppointmentSchedule {
            id,
            room: new.room,
            date: new.date,
            created_date,
            status,
            note: new.note,
            doctor_id: new.doctor_id,
            patient_id: new.patient_id,
            booked_by: new.booked_by,
        })
    }

    pub async fn get(&self, id: i64) -> Result<Option<AppointmentSchedule>> {
        let appointment = sqlx::query_as::<_, AppointmentSchedule>(&format!(
            "SELECT {COLUMNS} FROM appointment_schedules WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(appointment)
    }

    pub async fn list_for_doctor(&self, doctor_id: i64) -> Result<Vec<AppointmentSchedule>> {
        self.list_where("doctor_id", doctor_id).await
    }

    pub async fn list_for_patient(&self, patient_id: i64) -> Result<Vec<AppointmentSchedule>> {
        self.list_where("patient_id", patient_id).await
    }

    /// Appointments a user booked, including ones made on behalf of others.
    pub async fn list_booked_by(&self, user_id: i64) -> Result<Vec<AppointmentSchedule>> {
        self.list_where("booked_by", user_id).await
    }

    // `column` is always one of the literals above, never caller input.
    async fn list_where(&self, column: &'static str, id: i64) -> Result<Vec<AppointmentSchedule>> {
        let appointments = sqlx::query_as::<_, AppointmentSchedule>(&format!(
            "SELECT {COLUMNS} FROM appointment_schedules WHERE {column} = ? ORDER BY id"
        ))
        .bind(id)
        .fetch_all(&self.pool)
        .await?;
        Ok(appointments)
    }

    /// Moves the appointment to `next` if the transition is allowed.
    ///
    /// The update only applies while the row still has the status that was
    /// read, so a concurrent change yields [`Error::StatusConflict`].
    pub async fn update_status(
        &self,
        id: i64,
        next: AppointmentStatus,
    ) -> Result<AppointmentSchedule> {
        let current = self
            .get(id)
            .await?
            .ok_or(Error::NotFound { entity: "appointment", id })?;

        if !current.status.can_transition_to(next) {
            return Err(Error::InvalidTransition {
                entity: "appointment",
                from: current.status.to_string(),
                to: next.to_string(),
            });
        }
        if current.status == next {
            return Ok(current);
        }
        self.swap_status(current, next).await
    }

    /// Writes `next` only while the stored status still equals the one in
    /// `current`.
    async fn swap_status(
        &self,
        current: AppointmentSchedule,
        next: AppointmentStatus,
    ) -> Result<AppointmentSchedule> {
        let id = current.id;
        let result =
            sqlx::query("UPDATE appointment_schedules SET status = ? WHERE id = ? AND status = ?")
                .bind(next)
                .bind(id)
                .bind(current.status)
                .execute(&self.pool)
                .await?;
        if result.rows_affected() == 0 {
            tracing::warn!(appointment_id = id, expected = %current.status, "appointment status changed underneath");
            return Err(Error::StatusConflict { entity: "appointment", id });
        }

        tracing::info!(appointment_id = id, from = %current.status, to = %next, "appointment status changed");
        Ok(AppointmentSchedule {
            status: next,
            ..current
        })
    }

    pub async fn accept(&self, id: i64) -> Result<AppointmentSchedule> {
        self.update_status(id, AppointmentStatus::Accept).await
    }

    pub async fn cancel(&self, id: i64) -> Result<AppointmentSchedule> {
        self.update_status(id, AppointmentStatus::Cancel).await
    }

    /// Deletes the appointment and its payment.
    pub async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM appointment_schedules WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(Error::NotFound { entity: "appointment", id });
        }
        Ok(())
    }
}
