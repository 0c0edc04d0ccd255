//! Licensor - centralized license issuance, activation, and validation
//!
//! This library provides the core functionality for the license engine:
//! registry records (brands, products, customers), the license ledger with
//! seat-limit metadata, per-machine activation tracking, and the stateless
//! validation read path.

pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod keygen;
pub mod models;
pub mod pagination;
