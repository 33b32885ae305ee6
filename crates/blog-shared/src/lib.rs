//! # Blog Shared
//!
//! Wire types shared between the API server and its clients.

pub mod auth;
pub mod dto;
pub mod response;

pub use auth::TokenTriple;
pub use response::{ApiResponse, ErrorResponse};
