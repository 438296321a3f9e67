//! Request-client capability handed to actions
//!
//! A thin layer over `reqwest` that carries the headers computed for the
//! current invocation and decodes response bodies as JSON.

mod client;
mod error;

pub use client::{HttpClient, HttpResponse};
pub use error::{HttpError, HttpResult};
pub use reqwest::{Method, StatusCode};
