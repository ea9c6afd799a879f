//! Data Transfer Objects for REST request/response serialization.
//!
//! Ledger records themselves ([`crate::domain::Block`],
//! [`crate::domain::Transaction`], [`crate::domain::MetricsSnapshot`]) are
//! serialized directly; this module holds query parameters and the
//! composite response envelopes.

pub mod common_dto;
pub mod ledger_dto;

pub use common_dto::*;
pub use ledger_dto::*;
