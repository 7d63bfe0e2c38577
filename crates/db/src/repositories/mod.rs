//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that take
//! `&PgPool` for standalone statements or `&mut PgConnection` for steps that
//! must run inside a caller-owned transaction. Lookups needed in both
//! contexts accept any `PgExecutor`.

pub mod application_repo;
pub mod lease_repo;
pub mod location_repo;
pub mod manager_repo;
pub mod payment_repo;
pub mod property_repo;
pub mod tenant_repo;

pub use application_repo::ApplicationRepo;
pub use lease_repo::LeaseRepo;
pub use location_repo::LocationRepo;
pub use manager_repo::ManagerRepo;
pub use payment_repo::PaymentRepo;
pub use property_repo::PropertyRepo;
pub use tenant_repo::TenantRepo;
