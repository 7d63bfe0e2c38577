//! Domain types and pure business rules for the rental marketplace.
//!
//! This crate has no I/O: persistence lives in `leasehold-db`, outbound
//! provider calls in `leasehold-providers`, and HTTP in `leasehold-api`.

pub mod application;
pub mod catalog;
pub mod error;
pub mod geo;
pub mod identity;
pub mod lease;
pub mod payment;
pub mod search;
pub mod signature;
pub mod status;
pub mod types;
