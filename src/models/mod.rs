//! Diesel models mirroring `schema.rs` plus request-scoped models.

pub mod activity;
pub mod auth;
pub mod company;
pub mod config;
pub mod contact;
pub mod document;
pub mod import;
pub mod opportunity;
pub mod reminder;
pub mod settings;
pub mod user;
