// Request bodies for the devstate mutation endpoints.
//
// These are distinct from the document snapshot types on purpose: several
// request fields use shorter wire names than the document (`memReq` vs
// `memoryRequest`), and requests never carry server-derived state.

use devbuilder_common::types::{
    Annotation, BuildPolicy, Container, Endpoint, Env, Image, Resource, Volume, VolumeMount,
};
use serde::{Deserialize, Serialize};

/// `POST /execCommand` and `PATCH /execCommand/{name}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct ExecCommandRequest {
    pub name: String,
    pub command_line: String,
    pub working_dir: String,
    /// Target container name.
    pub component: String,
    pub hot_reload_capable: bool,
}

/// `POST /applyCommand` and `PATCH /applyCommand/{name}`.
///
/// Image commands share this shape: their `component` is an image name.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ApplyCommandRequest {
    pub name: String,
    pub component: String,
}

/// `POST /compositeCommand` and `PATCH /compositeCommand/{name}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CompositeCommandRequest {
    pub name: String,
    pub parallel: bool,
    pub commands: Vec<String>,
}

/// `POST /container` and `PATCH /container/{name}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct ContainerRequest {
    pub name: String,
    pub image: String,
    pub command: Vec<String>,
    pub args: Vec<String>,
    pub env: Vec<Env>,
    #[serde(rename = "memReq")]
    pub memory_request: String,
    #[serde(rename = "memLimit")]
    pub memory_limit: String,
    #[serde(rename = "cpuReq")]
    pub cpu_request: String,
    #[serde(rename = "cpuLimit")]
    pub cpu_limit: String,
    pub volume_mounts: Vec<VolumeMount>,
    pub configure_sources: bool,
    pub mount_sources: bool,
    pub source_mapping: String,
    pub annotation: Annotation,
    pub endpoints: Vec<Endpoint>,
}

impl ContainerRequest {
    /// Hydrate a request from an existing container (edit mode).
    pub fn from_container(container: &Container) -> Self {
        Self {
            name: container.name.clone(),
            image: container.image.clone(),
            command: container.command.clone(),
            args: container.args.clone(),
            env: container.env.clone(),
            memory_request: container.memory_request.clone(),
            memory_limit: container.memory_limit.clone(),
            cpu_request: container.cpu_request.clone(),
            cpu_limit: container.cpu_limit.clone(),
            volume_mounts: container.volume_mounts.clone(),
            configure_sources: container.configure_sources,
            mount_sources: container.mount_sources,
            source_mapping: container.source_mapping.clone(),
            annotation: container.annotation.clone(),
            endpoints: container.endpoints.clone(),
        }
    }
}

/// `POST /image` and `PATCH /image/{name}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct ImageRequest {
    pub name: String,
    pub image_name: String,
    pub args: Vec<String>,
    pub build_context: String,
    pub root_required: bool,
    /// Dockerfile URI.
    pub uri: String,
    pub auto_build: BuildPolicy,
}

impl ImageRequest {
    pub fn from_image(image: &Image) -> Self {
        Self {
            name: image.name.clone(),
            image_name: image.image_name.clone(),
            args: image.args.clone(),
            build_context: image.build_context.clone(),
            root_required: image.root_required,
            uri: image.uri.clone(),
            auto_build: image.auto_build,
        }
    }
}

/// `POST /resource` and `PATCH /resource/{name}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct ResourceRequest {
    pub name: String,
    pub inlined: String,
    pub uri: String,
    pub deploy_by_default: BuildPolicy,
}

impl ResourceRequest {
    pub fn from_resource(resource: &Resource) -> Self {
        Self {
            name: resource.name.clone(),
            inlined: resource.inlined.clone(),
            uri: resource.uri.clone(),
            deploy_by_default: resource.deploy_by_default,
        }
    }
}

/// `POST /volume` and `PATCH /volume/{name}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct VolumeRequest {
    pub name: String,
    pub ephemeral: bool,
    pub size: String,
}

impl VolumeRequest {
    pub fn from_volume(volume: &Volume) -> Self {
        Self { name: volume.name.clone(), ephemeral: volume.ephemeral, size: volume.size.clone() }
    }
}

/// `POST /command/{name}/move`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct MoveCommandRequest {
    /// Source group, or empty for the ungrouped list.
    pub from_group: String,
    pub from_index: usize,
    /// Destination group, or empty for the ungrouped list.
    pub to_group: String,
    pub to_index: usize,
}
