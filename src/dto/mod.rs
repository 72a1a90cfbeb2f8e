//! DTO modules that bridge services with templates and APIs.

pub mod activity;
pub mod api;
pub mod calendar;
pub mod companies;
pub mod contacts;
pub mod import;
pub mod main;
pub mod opportunities;
pub mod settings;
