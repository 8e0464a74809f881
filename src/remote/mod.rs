//! Remote service access: the HTTP client and the worker service around it

pub mod client;
pub mod request;
pub mod service;

pub use client::{BooksmartClient, DEFAULT_API_URL, RemoteService};
pub use request::{ApiError, ApiRequest, ApiResponse, RequestId};
pub use service::RemoteApiService;

#[cfg(any(test, feature = "test-utils"))]
pub use client::mock::MockRemoteService;
