//! nfluential core - shared types library.
//!
//! This crate provides the domain types used across the storefront service:
//! validated email addresses, money amounts, and the opaque identifiers the
//! commerce backend hands out.
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
