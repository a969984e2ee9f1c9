//! `restock-core`: shared building blocks for the replenishment engine.
//!
//! This crate contains **pure** primitives (no infrastructure concerns):
//! typed identifiers, the validation error model, and the small numeric helpers
//! every analytical crate leans on.

pub mod entity;
pub mod error;
pub mod id;
pub mod numeric;
pub mod value_object;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{ItemId, SupplierId, TenantId};
pub use value_object::ValueObject;
