//! Row models and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A plain create DTO for inserts, built by the API layer after validation
//! - Composite read models where an endpoint returns joined data

pub mod application;
pub mod lease;
pub mod location;
pub mod manager;
pub mod payment;
pub mod property;
pub mod tenant;
