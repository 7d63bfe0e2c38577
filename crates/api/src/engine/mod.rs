//! Multi-step workflows that span several repositories.
//!
//! Handlers stay thin: they authenticate, validate input, and hand off to
//! these functions, which own the transactions.

pub mod application;
pub mod identity;
pub mod settlement;
