//! HTTP plumbing shared by the site prober and the Telegram sink.
//!
//! This module provides:
//! - Request/response value types ([`HttpRequest`], [`HttpResponse`])
//! - The client seam used for dependency injection ([`HttpClient`])
//! - The production client ([`ReqwestClient`])

mod client;
mod error;
mod request;


pub use client::ReqwestClient;
pub use error::HttpError;
pub use request::{HttpClient, HttpRequest, HttpResponse};
