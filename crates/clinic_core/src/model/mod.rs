//! Domain model for the practitioner-availability core.
//!
//! # Responsibility
//! - Define write-side field sets and read-side records for practitioners,
//!   catalog slots, bookings, and accounts.
//! - Keep validation next to the field sets it guards.
//!
//! # Invariants
//! - Every persisted entity is identified by a store-generated integer id.
//! - Deletion is a hard delete; there are no tombstones.

pub mod account;
pub mod booking;
pub mod practitioner;
pub mod slot;
