//! Parameterized-query access layer, one repository per aggregate.

pub mod appointments;
pub mod doctors;
pub mod hospitals;
pub mod patients;
pub mod payments;
pub mod reviews;
pub mod users;

pub use appointments::AppointmentRepository;
pub use doctors::DoctorRepository;
pub use hospitals::HospitalRepository;
pub use patients::PatientRepository;
pub use payments::PaymentRepository;
pub use reviews::ReviewRepository;
pub use users::UserRepository;

use crate::config::Config;
use crate::db::Database;

/// Every repository, built once at startup from the shared pool.
#[derive(Debug, Clone)]
pub struct Repositories {
    pub users: UserRepository,
    pub hospitals: HospitalRepository,
    pub doctors: DoctorRepository,
    pub reviews: ReviewRepository,
    pub patients: PatientRepository,
    pub appointments: AppointmentRepository,
    pub payments: PaymentRepository,
}

impl Repositories {
    pub fn new(db: &Database, config: &Config) -> Self {
        Self::with_password_cost(db, config.password_hash_cost)
    }

    pub fn with_password_cost(db: &Database, hash_cost: u32) -> Self {
        let pool = db.pool().clone();
        Self {
            users: UserRepository::new(pool.clone(), hash_cost),
            hospitals: HospitalRepository::new(pool.clone()),
            doctors: DoctorRepository::new(pool.clone()),
            reviews: ReviewRepository::new(pool.clone()),
            patients: PatientRepository::new(pool.clone()),
            appointments: AppointmentRepository::new(pool.clone()),
            payments: PaymentRepository::new(pool),
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use chrono::{Duration, TimeZone, Utc};

    use super::Repositories;
    use crate::db::Database;
    use crate::model::{Doctor, Hospital, NewDoctor, NewHospital, NewUser, User};

    /// Lowest cost bcrypt accepts; keeps hashing fast in tests.
    pub const TEST_HASH_COST: u32 = 4;

    pub async fn repositories() -> (Database, Repositories) {
        let db = Database::in_memory().await.unwrap();
        db.bootstrap().await.unwrap();
        let repos = Repositories::with_password_cost(&db, TEST_HASH_COST);
        (db, repos)
    }

    /// Deterministic account whose phone, email and password derive from
    /// `username`.
    pub fn new_user(username: &str) -> NewUser {
        let phone: u32 = username.bytes().fold(7u32, |acc, b| {
            acc.wrapping_mul(31).wrapping_add(u32::from(b))
        });
        NewUser::new(
            username,
            username,
            format!("secret-{username}"),
            format!("09{phone:010}"),
            format!("{username}@hop.vn"),
        )
    }

    pub fn new_doctor(user_id: i64, hospital_id: i64) -> NewDoctor {
        let time_start = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap();
        NewDoctor {
            user_id,
            name: format!("Doctor {user_id}"),
            certificate: format!("CERT-{user_id}"),
            specialty: "Cardiology".into(),
            experience_years: 5,
            time_start,
            time_end: time_start + Duration::hours(9),
            hospital_id,
        }
    }

    /// User + hospital + doctor profile linking them.
    pub async fn seed_doctor(repos: &Repositories, username: &str) -> (User, Hospital, Doctor) {
        let user = repos.users.create(new_user(username)).await.unwrap();
        let hospital = repos
            .hospitals
            .create(NewHospital::new("General", "Main St"))
            .await
            .unwrap();
        let doctor = repos
            .doctors
            .create(new_doctor(user.id, hospital.id))
            .await
            .unwrap();
        (user, hospital, doctor)
    }
}
