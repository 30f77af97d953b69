//! Typed client for the reqres demo REST API.
//!
//! # Overview
//! Maps each reqres endpoint to one method that issues a single request,
//! asserts the response status and returns the body typed per the contract in
//! [`types`].
//!
//! # Design
//! - `ReqresClient` is stateless: it builds `HttpRequest` values and parses
//!   `HttpResponse` values without touching the network.
//! - `Transport` is the I/O seam; `UreqTransport` is the default.
//! - `ReqresApi` composes the two into one call per endpoint.
//! - A status mismatch is always `ApiError::UnexpectedStatus`. An error
//!   response the caller expected is `Outcome::Failure`, not an error.

pub mod api;
pub mod client;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

pub use api::ReqresApi;
pub use client::{ReqresClient, DEFAULT_BASE_URL};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::{Transport, UreqTransport};
pub use types::{
    AuthRequest, AuthResponse, ErrorResponse, Outcome, Page, PagedResourceList, PagedUserList,
    ResourceEnvelope, ResourceRecord, Support, UserCreateRequest, UserCreateResponse,
    UserEnvelope, UserRecord,
};
