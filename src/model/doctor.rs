use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Doctor profile. `id` is the backing user's id (1:1 extension of `users`).
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Doctor {
    pub id: i64,
    pub name: String,
    pub certificate: String,
    pub specialty: String,
    pub experience_years: i32,
    pub time_start: DateTime<Utc>,
    pub time_end: DateTime<Utc>,
    pub hospital_id: i64,
}

impl Doctor {
    /// Whether the time of day of `at` falls inside the doctor's daily
    /// working hours. The window is half-open and may cross midnight.
    pub fn is_on_duty(&self, at: DateTime<Utc>) -> bool {
        if self.time_end - self.time_start >= Duration::days(1) {
            return true;
        }
        let (start, end, t) = (self.time_start.time(), self.time_end.time(), at.time());
        if start < end {
            start <= t && t < end
        } else {
            start <= t || t < end
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewDoctor {
    pub user_id: i64,
    pub name: String,
    pub certificate: String,
    pub specialty: String,
    pub experience_years: i32,
    pub time_start: DateTime<Utc>,
    pub time_end: DateTime<Utc>,
    pub hospital_id: i64,
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn doctor(start: DateTime<Utc>, hours: i64) -> Doctor {
        Doctor {
            id: 1,
            name: "Dr. A".into(),
            certificate: "CERT-1".into(),
            specialty: "Cardiology".into(),
            experience_years: 10,
            time_start: start,
            time_end: start + Duration::hours(hours),
            hospital_id: 1,
        }
    }

    #[test]
    fn on_duty_window_is_half_open() {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        let doctor = doctor(start, 8);
        assert!(doctor.is_on_duty(start));
        assert!(doctor.is_on_duty(start + Duration::hours(4)));
        assert!(!doctor.is_on_duty(start + Duration::hours(8)));
        assert!(!doctor.is_on_duty(start - Duration::minutes(1)));
    }

    #[test]
    fn working_hours_repeat_every_day() {
        let doctor = doctor(Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap(), 8);
        assert!(doctor.is_on_duty(Utc.with_ymd_and_hms(2025, 2, 17, 9, 15, 0).unwrap()));
        assert!(!doctor.is_on_duty(Utc.with_ymd_and_hms(2025, 2, 17, 19, 0, 0).unwrap()));
    }

    #[test]
    fn night_shift_crosses_midnight() {
        let doctor = doctor(Utc.with_ymd_and_hms(2024, 5, 1, 22, 0, 0).unwrap(), 8);
        assert!(doctor.is_on_duty(Utc.with_ymd_and_hms(2024, 7, 9, 23, 30, 0).unwrap()));
        assert!(doctor.is_on_duty(Utc.with_ymd_and_hms(2024, 7, 10, 5, 59, 0).unwrap()));
        assert!(!doctor.is_on_duty(Utc.with_ymd_and_hms(2024, 7, 10, 6, 0, 0).unwrap()));
        assert!(!doctor.is_on_duty(Utc.with_ymd_and_hms(2024, 7, 10, 12, 0, 0).unwrap()));
    }
}
