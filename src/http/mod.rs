//! HTTP protocol layer module
//!
//! Response builders and query parsing, decoupled from the page logic.

pub mod query;
pub mod response;

// Re-export commonly used types
pub use query::QueryParams;
pub use response::{
    build_404_response, build_405_response, build_413_response, build_health_response,
    build_html_response, build_options_response,
};
