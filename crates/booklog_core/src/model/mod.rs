//! Reading-log domain model.
//!
//! # Responsibility
//! - Define the canonical book record and the ordered collection holding it.
//! - Own field constraints shared by the store, codec and projector.
//!
//! # Invariants
//! - Every record in a `Collection` satisfies `BookRecord` field constraints.
//! - Collection order is insertion order, never display order.

pub mod book;
pub mod collection;
