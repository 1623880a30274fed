//! # BlogHub Shared
//!
//! Wire types for the HTTP API. Kept free of server dependencies so clients
//! can use them too.

pub mod dto;
pub mod response;

pub use response::ErrorResponse;
