//! `restoflow-core`: shared domain building blocks.
//!
//! Identifiers, the domain error taxonomy and the aggregate/entity traits the
//! restaurant modules are written against. Nothing in here performs IO.

pub mod aggregate;
pub mod entity;
pub mod error;
pub mod id;

pub use aggregate::{Aggregate, AggregateRoot, ExpectedVersion};
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{AggregateId, TenantId};
