//! Request and response shapes for the reqres API.
//!
//! # Design
//! One shape per distinct endpoint payload. Optional fields are `Option` and
//! are skipped when serializing, so an absent value never reaches the wire as
//! `null`. The mock-server crate declares its own copies of the upstream
//! payloads; the integration tests catch drift between the two.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single user as returned by `/users` and `/users/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserRecord {
    pub id: u64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// The support block attached to single-record responses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Support {
    pub url: String,
    pub text: String,
}

/// Body of `GET /users/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserEnvelope {
    pub data: UserRecord,
    pub support: Support,
}

/// A paginated listing. Pagination fields are kept exactly as the server sent
/// them and are not checked against `data.len()`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Page<T> {
    pub page: u32,
    pub per_page: u32,
    pub total: u32,
    pub total_pages: u32,
    pub data: Vec<T>,
}

pub type PagedUserList = Page<UserRecord>;
pub type PagedResourceList = Page<ResourceRecord>;

/// A colour resource from `/unknown`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResourceRecord {
    pub id: u64,
    pub name: String,
    pub year: u32,
    pub color: String,
    pub pantone_value: String,
}

/// Body of `GET /unknown/{id}`.
///
/// `list` is an independent field: nothing links it to `data`. The public
/// service omits it, so it is optional.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResourceEnvelope {
    pub data: ResourceRecord,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list: Option<PagedResourceList>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub support: Option<Support>,
}

/// Payload for `POST /users`, `PATCH /users/{id}` and `PUT /users/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserCreateRequest {
    pub name: String,
    pub job: String,
}

impl UserCreateRequest {
    pub fn new(name: impl Into<String>, job: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            job: job.into(),
        }
    }
}

/// Echo of a user write. The server fills in `id` and `createdAt` on create
/// and `updatedAt` on patch/replace.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserCreateResponse {
    pub name: String,
    pub job: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Payload for `POST /register` and `POST /login`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthRequest {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl AuthRequest {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: Some(password.into()),
        }
    }

    /// A request that deliberately omits the password.
    pub fn without_password(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: None,
        }
    }
}

/// Successful register/login body. Only registration assigns an `id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub token: String,
}

/// Body of any response whose status is 400 or above.
///
/// Only `error` has a known meaning; every other field is kept as-is.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl ErrorResponse {
    pub fn message(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// Result of an operation whose expected status is chosen by the caller.
///
/// The variant is decided by the status class: a matched status below 400
/// yields `Success`, anything else `Failure`.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Success(T),
    Failure(ErrorResponse),
}

impl<T> Outcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failure(_))
    }

    pub fn success(self) -> Option<T> {
        match self {
            Outcome::Success(value) => Some(value),
            Outcome::Failure(_) => None,
        }
    }

    pub fn failure(self) -> Option<ErrorResponse> {
        match self {
            Outcome::Success(_) => None,
            Outcome::Failure(error) => Some(error),
        }
    }
}
