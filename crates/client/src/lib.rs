// devbuilder-client: the remote state gateway for the devstate API.
//
// One async method per mutation; every mutating call resolves with the
// full, fresh document snapshot. The client never applies optimistic
// updates and never retries — a failure terminates the operation and the
// caller decides what to do next.

use std::time::Duration;

use devbuilder_common::types::{CommandGroup, DevfileContent, Document, EventKind, Metadata};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use url::Url;

pub mod error;
pub mod requests;

pub use error::DevstateError;
use requests::{
    ApplyCommandRequest, CompositeCommandRequest, ContainerRequest, ExecCommandRequest,
    ImageRequest, MoveCommandRequest, ResourceRequest, VolumeRequest,
};

const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// HTTP client for one devstate instance.
#[derive(Debug, Clone)]
pub struct DevstateClient {
    http: reqwest::Client,
    /// Base URL without a trailing slash, e.g. `http://127.0.0.1:8080`.
    base: String,
}

impl DevstateClient {
    /// Build a client for the given base URL (scheme + host + port).
    pub fn new(base_url: &str) -> Result<Self, DevstateError> {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, DevstateError> {
        let parsed = Url::parse(base_url)
            .map_err(|error| DevstateError::Api {
                status: 0,
                message: format!("invalid devstate URL `{base_url}`: {error}"),
            })?;
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, base: parsed.as_str().trim_end_matches('/').to_string() })
    }

    /// Base URL this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base
    }

    // ── Bootstrap and whole-document operations ─────────────────────

    /// `GET /api/v1/devfile` — read-only bootstrap of the raw content.
    pub async fn bootstrap_devfile(&self) -> Result<DevfileContent, DevstateError> {
        let url = format!("{}/api/v1/devfile", self.base);
        tracing::debug!(%url, "bootstrap devfile");
        let response = self.http.get(url).send().await?;
        Self::expect_json(response).await
    }

    /// `GET /devfile` — the current document snapshot.
    pub async fn get_devfile(&self) -> Result<Document, DevstateError> {
        let response = self.http.get(self.devstate_url("/devfile")).send().await?;
        Self::expect_json(response).await
    }

    /// `PUT /devfile` — replace the whole document from raw text.
    pub async fn set_devfile_content(&self, content: &str) -> Result<Document, DevstateError> {
        self.put_expect_document("/devfile", &json!({ "content": content })).await
    }

    /// `PUT /metadata`.
    pub async fn set_metadata(&self, metadata: &Metadata) -> Result<Document, DevstateError> {
        self.put_expect_document("/metadata", metadata).await
    }

    // ── Command operations ──────────────────────────────────────────

    /// `POST /command/{name}/setDefault`.
    pub async fn set_default_command(
        &self,
        name: &str,
        group: CommandGroup,
    ) -> Result<Document, DevstateError> {
        self.post_expect_document(
            &format!("/command/{name}/setDefault"),
            &json!({ "group": group.as_str() }),
        )
        .await
    }

    /// `POST /command/{name}/unsetDefault`.
    pub async fn unset_default_command(&self, name: &str) -> Result<Document, DevstateError> {
        self.post_expect_document(&format!("/command/{name}/unsetDefault"), &json!({})).await
    }

    /// `POST /command/{name}/move`.
    pub async fn move_command(
        &self,
        name: &str,
        request: &MoveCommandRequest,
    ) -> Result<Document, DevstateError> {
        self.post_expect_document(&format!("/command/{name}/move"), request).await
    }

    /// `DELETE /command/{name}`.
    pub async fn delete_command(&self, name: &str) -> Result<Document, DevstateError> {
        self.delete_expect_document(&format!("/command/{name}")).await
    }

    /// `POST /execCommand`.
    pub async fn create_exec_command(
        &self,
        request: &ExecCommandRequest,
    ) -> Result<Document, DevstateError> {
        self.post_expect_document("/execCommand", request).await
    }

    /// `PATCH /execCommand/{name}`.
    pub async fn update_exec_command(
        &self,
        request: &ExecCommandRequest,
    ) -> Result<Document, DevstateError> {
        self.patch_expect_document(&format!("/execCommand/{}", request.name), request).await
    }

    /// `POST /applyCommand`.
    pub async fn create_apply_command(
        &self,
        request: &ApplyCommandRequest,
    ) -> Result<Document, DevstateError> {
        self.post_expect_document("/applyCommand", request).await
    }

    /// `PATCH /applyCommand/{name}`.
    pub async fn update_apply_command(
        &self,
        request: &ApplyCommandRequest,
    ) -> Result<Document, DevstateError> {
        self.patch_expect_document(&format!("/applyCommand/{}", request.name), request).await
    }

    /// Image commands reuse the apply-command wire shape; `component`
    /// names an image instead of a resource.
    pub async fn create_image_command(
        &self,
        request: &ApplyCommandRequest,
    ) -> Result<Document, DevstateError> {
        self.create_apply_command(request).await
    }

    pub async fn update_image_command(
        &self,
        request: &ApplyCommandRequest,
    ) -> Result<Document, DevstateError> {
        self.update_apply_command(request).await
    }

    /// `POST /compositeCommand`.
    pub async fn create_composite_command(
        &self,
        request: &CompositeCommandRequest,
    ) -> Result<Document, DevstateError> {
        self.post_expect_document("/compositeCommand", request).await
    }

    /// `PATCH /compositeCommand/{name}`.
    pub async fn update_composite_command(
        &self,
        request: &CompositeCommandRequest,
    ) -> Result<Document, DevstateError> {
        self.patch_expect_document(&format!("/compositeCommand/{}", request.name), request).await
    }

    // ── Component operations ────────────────────────────────────────

    /// `POST /container`.
    pub async fn create_container(
        &self,
        request: &ContainerRequest,
    ) -> Result<Document, DevstateError> {
        self.post_expect_document("/container", request).await
    }

    /// `PATCH /container/{name}`.
    pub async fn update_container(
        &self,
        request: &ContainerRequest,
    ) -> Result<Document, DevstateError> {
        self.patch_expect_document(&format!("/container/{}", request.name), request).await
    }

    /// `DELETE /container/{name}`.
    pub async fn delete_container(&self, name: &str) -> Result<Document, DevstateError> {
        self.delete_expect_document(&format!("/container/{name}")).await
    }

    /// `POST /image`.
    pub async fn create_image(&self, request: &ImageRequest) -> Result<Document, DevstateError> {
        self.post_expect_document("/image", request).await
    }

    /// `PATCH /image/{name}`.
    pub async fn update_image(&self, request: &ImageRequest) -> Result<Document, DevstateError> {
        self.patch_expect_document(&format!("/image/{}", request.name), request).await
    }

    /// `DELETE /image/{name}`.
    pub async fn delete_image(&self, name: &str) -> Result<Document, DevstateError> {
        self.delete_expect_document(&format!("/image/{name}")).await
    }

    /// `POST /resource`.
    pub async fn create_resource(
        &self,
        request: &ResourceRequest,
    ) -> Result<Document, DevstateError> {
        self.post_expect_document("/resource", request).await
    }

    /// `PATCH /resource/{name}`.
    pub async fn update_resource(
        &self,
        request: &ResourceRequest,
    ) -> Result<Document, DevstateError> {
        self.patch_expect_document(&format!("/resource/{}", request.name), request).await
    }

    /// `DELETE /resource/{name}`.
    pub async fn delete_resource(&self, name: &str) -> Result<Document, DevstateError> {
        self.delete_expect_document(&format!("/resource/{name}")).await
    }

    /// `POST /volume`.
    pub async fn create_volume(&self, request: &VolumeRequest) -> Result<Document, DevstateError> {
        self.post_expect_document("/volume", request).await
    }

    /// `PATCH /volume/{name}`.
    pub async fn update_volume(&self, request: &VolumeRequest) -> Result<Document, DevstateError> {
        self.patch_expect_document(&format!("/volume/{}", request.name), request).await
    }

    /// `DELETE /volume/{name}`.
    pub async fn delete_volume(&self, name: &str) -> Result<Document, DevstateError> {
        self.delete_expect_document(&format!("/volume/{name}")).await
    }

    // ── Events and quantity validation ──────────────────────────────

    /// `PUT /events` — replace one lifecycle slot.
    pub async fn update_events(
        &self,
        event: EventKind,
        commands: &[String],
    ) -> Result<Document, DevstateError> {
        self.put_expect_document(
            "/events",
            &json!({ "eventName": event.as_str(), "commands": commands }),
        )
        .await
    }

    /// `POST /quantityValid` — remote check of a quantity string.
    /// A 2xx answer means valid; any other server answer means invalid.
    pub async fn quantity_valid(&self, quantity: &str) -> Result<bool, DevstateError> {
        let response = self
            .http
            .post(self.devstate_url("/quantityValid"))
            .json(&json!({ "quantity": quantity }))
            .send()
            .await?;
        Ok(response.status().is_success())
    }

    // ── Internals ───────────────────────────────────────────────────

    fn devstate_url(&self, path: &str) -> String {
        format!("{}/api/v1/devstate{path}", self.base)
    }

    async fn post_expect_document<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Document, DevstateError> {
        let url = self.devstate_url(path);
        tracing::debug!(%url, "POST devstate");
        let response = self.http.post(url).json(body).send().await?;
        Self::expect_json(response).await
    }

    async fn put_expect_document<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Document, DevstateError> {
        let url = self.devstate_url(path);
        tracing::debug!(%url, "PUT devstate");
        let response = self.http.put(url).json(body).send().await?;
        Self::expect_json(response).await
    }

    async fn patch_expect_document<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Document, DevstateError> {
        let url = self.devstate_url(path);
        tracing::debug!(%url, "PATCH devstate");
        let response = self.http.patch(url).json(body).send().await?;
        Self::expect_json(response).await
    }

    async fn delete_expect_document(&self, path: &str) -> Result<Document, DevstateError> {
        let url = self.devstate_url(path);
        tracing::debug!(%url, "DELETE devstate");
        let response = self.http.delete(url).send().await?;
        Self::expect_json(response).await
    }

    async fn expect_json<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, DevstateError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }
        let body = response.text().await.unwrap_or_default();
        Err(DevstateError::Api {
            status: status.as_u16(),
            message: error::error_message_from_body(status.as_u16(), &body),
        })
    }
}
