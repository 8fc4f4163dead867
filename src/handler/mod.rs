//! Request handler module
//!
//! Responsible for request routing dispatch and rendering the index page.

pub mod page;
pub mod router;

// Re-export main entry point
pub use router::handle_request;
