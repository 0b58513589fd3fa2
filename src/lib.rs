//! Data layer for a hospital appointment-booking application: accounts,
//! hospitals, doctors, patients, appointments, reviews and payments stored
//! in SQLite and accessed through explicit repositories.

pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod model;
pub mod repository;
pub mod routes;
pub mod schema;
pub mod session;

pub use config::Config;
pub use db::Database;
pub use error::{Error, Result};
pub use repository::Repositories;
