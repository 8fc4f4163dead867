//! Locale- and timezone-aware page server
//!
//! Each request to the index page resolves a user (from `login_as`), a
//! locale and a timezone, then renders a greeting with the current time.

pub mod config;
pub mod context;
pub mod handler;
pub mod http;
pub mod i18n;
pub mod kv;
pub mod logger;
pub mod server;
pub mod users;

pub use kv::{to_kv, KvValue};
