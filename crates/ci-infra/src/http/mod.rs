//! REST backend adapter.
//!
//! One reqwest client with a cookie store serves every endpoint, so the
//! session cookie set by `/auth/register` is sent with later calls.

mod client;
mod dto;
mod error;
mod file_transfer;
mod intake_api;

pub use client::{HttpClientConfig, HttpIntakeClient};
