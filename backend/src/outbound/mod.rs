//! Outbound adapters implementing the domain's driven ports.
//!
//! - **persistence**: PostgreSQL repositories using Diesel.
//! - **security**: Argon2 password hashing.
//!
//! Adapters translate between domain types and infrastructure
//! representations and hold no business rules.

pub mod persistence;
pub mod security;
