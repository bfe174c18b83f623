//! Licensing - entitlement resolution for multi-tenant organizations
//!
//! Parses license payloads from the entitlement authority, stores them per
//! organization, picks the license in force, and falls back to a synthetic
//! full-access license so every caller sees exactly one entitlement.

pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod flagger;
pub mod handlers;
pub mod licensing;
pub mod models;
pub mod upstream;
