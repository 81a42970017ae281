//! Moderation decision persistence.
//!
//! [`PgApprovalStore`] backs the API when `DATABASE_URL` is configured;
//! [`MemoryApprovalStore`] is used otherwise and in tests.

pub mod error;
pub mod memory;
pub mod postgres;
pub mod store;

pub use error::{ApprovalError, Result};
pub use memory::MemoryApprovalStore;
pub use postgres::PgApprovalStore;
pub use store::{ApprovalStore, DEFAULT_APPROVER};
