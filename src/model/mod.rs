pub mod appointment;
pub mod doctor;
pub mod hospital;
pub mod patient;
pub mod payment;
pub mod review;
pub mod user;

pub use appointment::{AppointmentSchedule, AppointmentStatus, NewAppointment};
pub use doctor::{Doctor, NewDoctor};
pub use hospital::{Hospital, NewHospital};
pub use patient::{NewPatient, NewProfilePatient, Patient, ProfilePatient};
pub use payment::{NewPayment, Payment, PaymentStatus};
pub use review::{NewReview, Review};
pub use user::{NewUser, User, UserRole};
