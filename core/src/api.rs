//! One-call façade over `ReqresClient` and a `Transport`.
//!
//! Each method builds a request, runs exactly one round trip and parses the
//! response. `ReqresApi` holds no mutable state, so a single instance can be
//! shared by every test in a session, across threads.

use tracing::debug;

use crate::client::ReqresClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::{Transport, UreqTransport};
use crate::types::{
    AuthRequest, AuthResponse, Outcome, PagedResourceList, PagedUserList, ResourceEnvelope,
    UserCreateRequest, UserCreateResponse, UserEnvelope,
};

#[derive(Debug, Clone)]
pub struct ReqresApi<T = UreqTransport> {
    client: ReqresClient,
    transport: T,
}

impl ReqresApi<UreqTransport> {
    /// Client for `base_url` over a fresh `ureq` agent.
    pub fn with_base_url(base_url: &str) -> Self {
        Self::new(ReqresClient::new(base_url), UreqTransport::new())
    }
}

impl Default for ReqresApi<UreqTransport> {
    fn default() -> Self {
        Self::new(ReqresClient::default(), UreqTransport::new())
    }
}

impl<T: Transport> ReqresApi<T> {
    pub fn new(client: ReqresClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &ReqresClient {
        &self.client
    }

    pub fn get_user(&self, id: u64, expected: u16) -> Result<Outcome<UserEnvelope>, ApiError> {
        let response = self.send(self.client.build_get_user(id))?;
        self.client.parse_get_user(response, expected)
    }

    /// Returns the raw response; no status is enforced.
    pub fn get_failing_endpoint(&self) -> Result<HttpResponse, ApiError> {
        self.send(self.client.build_failing_endpoint())
    }

    pub fn list_users(&self, page: u32) -> Result<PagedUserList, ApiError> {
        let response = self.send(self.client.build_list_users(page))?;
        self.client.parse_list_users(response)
    }

    pub fn list_resources(&self) -> Result<PagedResourceList, ApiError> {
        let response = self.send(self.client.build_list_resources())?;
        self.client.parse_list_resources(response)
    }

    pub fn get_resource(
        &self,
        id: u64,
        expected: u16,
    ) -> Result<Outcome<ResourceEnvelope>, ApiError> {
        let response = self.send(self.client.build_get_resource(id))?;
        self.client.parse_get_resource(response, expected)
    }

    pub fn list_users_delayed(&self, delay_secs: u32) -> Result<PagedUserList, ApiError> {
        let response = self.send(self.client.build_list_users_delayed(delay_secs))?;
        self.client.parse_list_users_delayed(response)
    }

    pub fn create_user(&self, input: &UserCreateRequest) -> Result<UserCreateResponse, ApiError> {
        let response = self.send(self.client.build_create_user(input)?)?;
        self.client.parse_create_user(response)
    }

    pub fn register(
        &self,
        input: &AuthRequest,
        expected: u16,
    ) -> Result<Outcome<AuthResponse>, ApiError> {
        let response = self.send(self.client.build_register(input)?)?;
        self.client.parse_register(response, expected)
    }

    pub fn login(
        &self,
        input: &AuthRequest,
        expected: u16,
    ) -> Result<Outcome<AuthResponse>, ApiError> {
        let response = self.send(self.client.build_login(input)?)?;
        self.client.parse_login(response, expected)
    }

    pub fn patch_user(
        &self,
        id: u64,
        input: &UserCreateRequest,
    ) -> Result<UserCreateResponse, ApiError> {
        let response = self.send(self.client.build_patch_user(id, input)?)?;
        self.client.parse_patch_user(response)
    }

    pub fn replace_user(
        &self,
        id: u64,
        input: &UserCreateRequest,
    ) -> Result<UserCreateResponse, ApiError> {
        let response = self.send(self.client.build_replace_user(id, input)?)?;
        self.client.parse_replace_user(response)
    }

    pub fn delete_user(&self, id: u64, expected: u16) -> Result<(), ApiError> {
        let response = self.send(self.client.build_delete_user(id))?;
        self.client.parse_delete_user(response, expected)
    }

    fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let method = request.method.as_str();
        debug!(method, url = %request.url, "sending request");
        let response = self.transport.execute(request)?;
        debug!(method, status = response.status, "received response");
        Ok(response)
    }
}
