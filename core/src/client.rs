//! Stateless HTTP request builder and response parser for the reqres API.
//!
//! # Design
//! `ReqresClient` holds only a base URL and the headers attached to every
//! request. Each endpoint is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//!
//! Every `parse_*` method checks the status first. A mismatch fails with
//! `ApiError::UnexpectedStatus` and the body is never looked at. Operations
//! whose expected status is supplied by the caller return an `Outcome`, typed
//! as `ErrorResponse` when the matched status is 400 or above.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{
    AuthRequest, AuthResponse, ErrorResponse, Outcome, PagedResourceList, PagedUserList,
    ResourceEnvelope, UserCreateRequest, UserCreateResponse, UserEnvelope,
};

/// Origin of the public reqres service.
pub const DEFAULT_BASE_URL: &str = "https://reqres.in/api";

const API_KEY_HEADER: &str = "x-api-key";

/// Synchronous, stateless client for the reqres API.
#[derive(Debug, Clone)]
pub struct ReqresClient {
    base_url: String,
    headers: Vec<(String, String)>,
}

impl Default for ReqresClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl ReqresClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            headers: Vec::new(),
        }
    }

    /// Send `key` as `x-api-key` on every request built by this client.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.headers.push((API_KEY_HEADER.to_string(), key.into()));
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_get_user(&self, id: u64) -> HttpRequest {
        self.request(HttpMethod::Get, &format!("/users/{id}"))
    }

    /// Targets a path the service does not route.
    pub fn build_failing_endpoint(&self) -> HttpRequest {
        self.request(HttpMethod::Get, "/users/wrongendpoint")
    }

    pub fn build_list_users(&self, page: u32) -> HttpRequest {
        self.request(HttpMethod::Get, &format!("/users?page={page}"))
    }

    pub fn build_list_resources(&self) -> HttpRequest {
        self.request(HttpMethod::Get, "/unknown")
    }

    pub fn build_get_resource(&self, id: u64) -> HttpRequest {
        self.request(HttpMethod::Get, &format!("/unknown/{id}"))
    }

    pub fn build_list_users_delayed(&self, delay_secs: u32) -> HttpRequest {
        self.request(HttpMethod::Get, &format!("/users?delay={delay_secs}"))
    }

    pub fn build_create_user(&self, input: &UserCreateRequest) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, "/users", input)
    }

    pub fn build_register(&self, input: &AuthRequest) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, "/register", input)
    }

    pub fn build_login(&self, input: &AuthRequest) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, "/login", input)
    }

    pub fn build_patch_user(
        &self,
        id: u64,
        input: &UserCreateRequest,
    ) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Patch, &format!("/users/{id}"), input)
    }

    pub fn build_replace_user(
        &self,
        id: u64,
        input: &UserCreateRequest,
    ) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Put, &format!("/users/{id}"), input)
    }

    pub fn build_delete_user(&self, id: u64) -> HttpRequest {
        self.request(HttpMethod::Delete, &format!("/users/{id}"))
    }

    pub fn parse_get_user(
        &self,
        response: HttpResponse,
        expected: u16,
    ) -> Result<Outcome<UserEnvelope>, ApiError> {
        check_status(&response, expected)?;
        interpret(&response)
    }

    pub fn parse_list_users(&self, response: HttpResponse) -> Result<PagedUserList, ApiError> {
        check_status(&response, 200)?;
        parse_body(&response.body)
    }

    pub fn parse_list_resources(
        &self,
        response: HttpResponse,
    ) -> Result<PagedResourceList, ApiError> {
        check_status(&response, 200)?;
        parse_body(&response.body)
    }

    pub fn parse_get_resource(
        &self,
        response: HttpResponse,
        expected: u16,
    ) -> Result<Outcome<ResourceEnvelope>, ApiError> {
        check_status(&response, expected)?;
        interpret(&response)
    }

    pub fn parse_list_users_delayed(
        &self,
        response: HttpResponse,
    ) -> Result<PagedUserList, ApiError> {
        check_status(&response, 200)?;
        parse_body(&response.body)
    }

    pub fn parse_create_user(&self, response: HttpResponse) -> Result<UserCreateResponse, ApiError> {
        check_status(&response, 201)?;
        parse_body(&response.body)
    }

    pub fn parse_register(
        &self,
        response: HttpResponse,
        expected: u16,
    ) -> Result<Outcome<AuthResponse>, ApiError> {
        check_status(&response, expected)?;
        interpret(&response)
    }

    pub fn parse_login(
        &self,
        response: HttpResponse,
        expected: u16,
    ) -> Result<Outcome<AuthResponse>, ApiError> {
        check_status(&response, expected)?;
        interpret(&response)
    }

    pub fn parse_patch_user(&self, response: HttpResponse) -> Result<UserCreateResponse, ApiError> {
        check_status(&response, 200)?;
        parse_body(&response.body)
    }

    pub fn parse_replace_user(
        &self,
        response: HttpResponse,
    ) -> Result<UserCreateResponse, ApiError> {
        check_status(&response, 200)?;
        parse_body(&response.body)
    }

    /// Delete has no meaningful body, so only the status is checked.
    pub fn parse_delete_user(&self, response: HttpResponse, expected: u16) -> Result<(), ApiError> {
        check_status(&response, expected)
    }

    fn request(&self, method: HttpMethod, path: &str) -> HttpRequest {
        HttpRequest {
            method,
            url: format!("{}{path}", self.base_url),
            headers: self.headers.clone(),
            body: None,
        }
    }

    fn json_request<B: Serialize>(
        &self,
        method: HttpMethod,
        path: &str,
        input: &B,
    ) -> Result<HttpRequest, ApiError> {
        let body =
            serde_json::to_string(input).map_err(|e| ApiError::Serialization(e.to_string()))?;
        let mut request = self.request(method, path);
        request
            .headers
            .push(("content-type".to_string(), "application/json".to_string()));
        request.body = Some(body);
        Ok(request)
    }
}

/// Fail fast when the observed status differs from the expected one.
fn check_status(response: &HttpResponse, expected: u16) -> Result<(), ApiError> {
    if response.status == expected {
        return Ok(());
    }
    Err(ApiError::UnexpectedStatus {
        expected,
        actual: response.status,
    })
}

/// Type a status-matched body by status class.
fn interpret<T: DeserializeOwned>(response: &HttpResponse) -> Result<Outcome<T>, ApiError> {
    if response.is_error_status() {
        return parse_body::<ErrorResponse>(&response.body).map(Outcome::Failure);
    }
    parse_body(&response.body).map(Outcome::Success)
}

fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| ApiError::Deserialization(e.to_string()))
}
