// Dependent-entity orchestration: one submission may create several
// entities in one user gesture. Creation is strictly sequential and
// there is no rollback; a dependent that fails leaves the earlier ones
// in place and the error names the entity that failed.

use devbuilder_client::requests::{
    ApplyCommandRequest, CompositeCommandRequest, ContainerRequest, ExecCommandRequest,
    ImageRequest, ResourceRequest, VolumeRequest,
};
use devbuilder_client::{DevstateClient, DevstateError};
use devbuilder_common::types::Document;

use crate::draft::DraftMode;

/// An entity that must exist before the primary entity can reference it.
#[derive(Debug, Clone, PartialEq)]
pub enum DependentEntity {
    Volume(VolumeRequest),
    Container(ContainerRequest),
    Image(ImageRequest),
    Resource(ResourceRequest),
}

impl DependentEntity {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Volume(_) => "volume",
            Self::Container(_) => "container",
            Self::Image(_) => "image",
            Self::Resource(_) => "resource",
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Volume(request) => &request.name,
            Self::Container(request) => &request.name,
            Self::Image(request) => &request.name,
            Self::Resource(request) => &request.name,
        }
    }

    async fn create(&self, client: &DevstateClient) -> Result<Document, DevstateError> {
        match self {
            Self::Volume(request) => client.create_volume(request).await,
            Self::Container(request) => client.create_container(request).await,
            Self::Image(request) => client.create_image(request).await,
            Self::Resource(request) => client.create_resource(request).await,
        }
    }
}

/// The entity a submission ultimately creates or updates.
#[derive(Debug, Clone, PartialEq)]
pub enum PrimaryRequest {
    ExecCommand(ExecCommandRequest),
    ApplyCommand(ApplyCommandRequest),
    /// Same wire shape as apply; `component` names an image.
    ImageCommand(ApplyCommandRequest),
    CompositeCommand(CompositeCommandRequest),
    Container(ContainerRequest),
    Image(ImageRequest),
    Resource(ResourceRequest),
    Volume(VolumeRequest),
}

impl PrimaryRequest {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ExecCommand(_) => "exec command",
            Self::ApplyCommand(_) => "apply command",
            Self::ImageCommand(_) => "image command",
            Self::CompositeCommand(_) => "composite command",
            Self::Container(_) => "container",
            Self::Image(_) => "image",
            Self::Resource(_) => "resource",
            Self::Volume(_) => "volume",
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::ExecCommand(request) => &request.name,
            Self::ApplyCommand(request) | Self::ImageCommand(request) => &request.name,
            Self::CompositeCommand(request) => &request.name,
            Self::Container(request) => &request.name,
            Self::Image(request) => &request.name,
            Self::Resource(request) => &request.name,
            Self::Volume(request) => &request.name,
        }
    }

    async fn create(&self, client: &DevstateClient) -> Result<Document, DevstateError> {
        match self {
            Self::ExecCommand(request) => client.create_exec_command(request).await,
            Self::ApplyCommand(request) => client.create_apply_command(request).await,
            Self::ImageCommand(request) => client.create_image_command(request).await,
            Self::CompositeCommand(request) => client.create_composite_command(request).await,
            Self::Container(request) => client.create_container(request).await,
            Self::Image(request) => client.create_image(request).await,
            Self::Resource(request) => client.create_resource(request).await,
            Self::Volume(request) => client.create_volume(request).await,
        }
    }

    async fn update(&self, client: &DevstateClient) -> Result<Document, DevstateError> {
        match self {
            Self::ExecCommand(request) => client.update_exec_command(request).await,
            Self::ApplyCommand(request) => client.update_apply_command(request).await,
            Self::ImageCommand(request) => client.update_image_command(request).await,
            Self::CompositeCommand(request) => client.update_composite_command(request).await,
            Self::Container(request) => client.update_container(request).await,
            Self::Image(request) => client.update_image(request).await,
            Self::Resource(request) => client.update_resource(request).await,
            Self::Volume(request) => client.update_volume(request).await,
        }
    }
}

/// One complete submission: dependents first, then the primary entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub mode: DraftMode,
    pub primary: PrimaryRequest,
    pub dependents: Vec<DependentEntity>,
}

impl Submission {
    pub fn create(primary: PrimaryRequest, dependents: Vec<DependentEntity>) -> Self {
        Self { mode: DraftMode::Creating, primary, dependents }
    }

    pub fn update(primary: PrimaryRequest) -> Self {
        let original_name = primary.name().to_string();
        Self { mode: DraftMode::Editing { original_name }, primary, dependents: Vec::new() }
    }
}

/// Submission failure, attributed to the entity that failed.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("creating {kind} {name} failed: {source}")]
    Dependent {
        kind: &'static str,
        name: String,
        #[source]
        source: DevstateError,
    },
    #[error(transparent)]
    Primary(#[from] DevstateError),
}

impl SubmitError {
    /// Message suitable for direct display.
    pub fn user_message(&self) -> String {
        match self {
            Self::Dependent { kind, name, source } => {
                format!("creating {kind} {name} failed: {}", source.user_message())
            }
            Self::Primary(source) => source.user_message(),
        }
    }
}

/// Run one submission to completion. Dependents are created one at a
/// time in order; the first failure aborts everything that follows,
/// including the primary request. The returned document is the snapshot
/// from the primary request.
pub async fn submit(
    client: &DevstateClient,
    submission: &Submission,
) -> Result<Document, SubmitError> {
    for dependent in &submission.dependents {
        tracing::debug!(kind = dependent.kind(), name = dependent.name(), "create dependent");
        dependent.create(client).await.map_err(|source| SubmitError::Dependent {
            kind: dependent.kind(),
            name: dependent.name().to_string(),
            source,
        })?;
    }

    tracing::debug!(
        kind = submission.primary.kind(),
        name = submission.primary.name(),
        editing = submission.mode.is_editing(),
        "submit primary"
    );
    let document = match submission.mode {
        DraftMode::Creating => submission.primary.create(client).await?,
        DraftMode::Editing { .. } => submission.primary.update(client).await?,
    };
    Ok(document)
}
