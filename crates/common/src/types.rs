// Client-side view of the Devfile document owned by the devstate service.
//
// Every mutation against devstate returns the full document; these types
// deserialize that snapshot. All collections default to empty so a
// freshly-created or partially-filled devfile deserializes cleanly.

use serde::{Deserialize, Serialize};

/// Full document snapshot as returned by every devstate mutation.
///
/// The session controller is the only long-lived owner of a `Document`;
/// everything else borrows it read-only and the controller replaces it
/// wholesale after each confirmed mutation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Document {
    /// Raw YAML text of the devfile, serialized server-side.
    pub content: String,
    pub metadata: Metadata,
    pub commands: Vec<Command>,
    pub containers: Vec<Container>,
    pub images: Vec<Image>,
    pub resources: Vec<Resource>,
    pub volumes: Vec<Volume>,
    pub events: Events,
}

/// Devfile metadata block.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct Metadata {
    pub name: String,
    pub version: String,
    pub display_name: String,
    pub description: String,
    pub tags: String,
    pub architectures: String,
    pub icon: String,
    pub global_memory_limit: String,
    pub project_type: String,
    pub language: String,
    pub website: String,
    pub provider: String,
    pub support_url: String,
}

/// A named, typed action exposed by the devfile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Command {
    pub name: String,
    /// Group the command belongs to, if any.
    #[serde(default)]
    pub group: Option<CommandGroup>,
    /// Whether this command is the default for its group.
    #[serde(default, rename = "default")]
    pub is_default: bool,
    #[serde(flatten)]
    pub kind: CommandKind,
}

/// Variant payload of a command.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CommandKind {
    Exec(ExecCommand),
    Apply(ApplyCommand),
    Image(ImageCommand),
    Composite(CompositeCommand),
}

impl CommandKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Exec(_) => "exec",
            Self::Apply(_) => "apply",
            Self::Image(_) => "image",
            Self::Composite(_) => "composite",
        }
    }
}

/// Command group. Ungrouped commands carry no group at all.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum CommandGroup {
    Build,
    Run,
    Test,
    Debug,
    Deploy,
}

impl CommandGroup {
    pub const ALL: [CommandGroup; 5] =
        [Self::Build, Self::Run, Self::Test, Self::Debug, Self::Deploy];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Build => "build",
            Self::Run => "run",
            Self::Test => "test",
            Self::Debug => "debug",
            Self::Deploy => "deploy",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "build" => Some(Self::Build),
            "run" => Some(Self::Run),
            "test" => Some(Self::Test),
            "debug" => Some(Self::Debug),
            "deploy" => Some(Self::Deploy),
            _ => None,
        }
    }
}

impl std::fmt::Display for CommandGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shell command executed inside a container.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct ExecCommand {
    pub command_line: String,
    pub working_dir: String,
    /// Name of the target container.
    pub component: String,
    pub hot_reload_capable: bool,
}

/// Applies a cluster resource.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ApplyCommand {
    /// Name of the target resource.
    pub component: String,
}

/// Builds an image.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ImageCommand {
    /// Name of the target image.
    pub component: String,
}

/// Runs other commands, by name, serially or in parallel.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CompositeCommand {
    pub commands: Vec<String>,
    pub parallel: bool,
}

/// A container component.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct Container {
    pub name: String,
    pub image: String,
    pub command: Vec<String>,
    pub args: Vec<String>,
    pub env: Vec<Env>,
    pub memory_request: String,
    pub memory_limit: String,
    pub cpu_request: String,
    pub cpu_limit: String,
    pub volume_mounts: Vec<VolumeMount>,
    pub endpoints: Vec<Endpoint>,
    pub configure_sources: bool,
    pub mount_sources: bool,
    pub source_mapping: String,
    pub annotation: Annotation,
}

/// Deployment and service annotations attached to a container.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Annotation {
    pub deployment: std::collections::BTreeMap<String, String>,
    pub service: std::collections::BTreeMap<String, String>,
}

/// A single environment variable.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Env {
    pub name: String,
    pub value: String,
}

/// A mount of a named volume at a container path.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct VolumeMount {
    /// Name of the mounted volume.
    pub name: String,
    pub path: String,
}

/// A network endpoint exposed by a container.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    pub name: String,
    pub target_port: u16,
    #[serde(default)]
    pub exposure: Exposure,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub protocol: EndpointProtocol,
    #[serde(default)]
    pub secure: bool,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Exposure {
    #[default]
    Public,
    Internal,
    None,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EndpointProtocol {
    #[default]
    Http,
    Https,
    Ws,
    Wss,
    Tcp,
    Udp,
}

/// An image component built from a Dockerfile.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct Image {
    pub name: String,
    pub image_name: String,
    pub args: Vec<String>,
    pub build_context: String,
    pub root_required: bool,
    /// Dockerfile URI.
    pub uri: String,
    pub auto_build: BuildPolicy,
}

/// A cluster resource component. Exactly one of `uri` / `inlined` is set.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct Resource {
    pub name: String,
    /// Inlined manifest text; empty when the resource is defined by `uri`.
    pub inlined: String,
    /// Manifest URI; empty when the resource is defined by `inlined`.
    pub uri: String,
    pub deploy_by_default: BuildPolicy,
}

/// Policy for automatically building an image or deploying a resource.
/// `Undefined` means "only when not referenced by any command" (orphan).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BuildPolicy {
    Never,
    #[default]
    Undefined,
    Always,
}

impl BuildPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Never => "never",
            Self::Undefined => "undefined",
            Self::Always => "always",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "never" => Some(Self::Never),
            "undefined" => Some(Self::Undefined),
            "always" => Some(Self::Always),
            _ => None,
        }
    }
}

/// A volume component.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Volume {
    pub name: String,
    pub ephemeral: bool,
    /// Validated quantity string, or empty (optional field).
    pub size: String,
}

/// Lifecycle events: each slot is an ordered list of command names.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct Events {
    pub pre_start: Vec<String>,
    pub post_start: Vec<String>,
    pub pre_stop: Vec<String>,
    pub post_stop: Vec<String>,
}

/// The four lifecycle event slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    PreStart,
    PostStart,
    PreStop,
    PostStop,
}

impl EventKind {
    pub const ALL: [EventKind; 4] =
        [Self::PreStart, Self::PostStart, Self::PreStop, Self::PostStop];

    /// Wire name used by the `PUT /events` request body.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PreStart => "preStart",
            Self::PostStart => "postStart",
            Self::PreStop => "preStop",
            Self::PostStop => "postStop",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "preStart" => Some(Self::PreStart),
            "postStart" => Some(Self::PostStart),
            "preStop" => Some(Self::PreStop),
            "postStop" => Some(Self::PostStop),
            _ => None,
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Events {
    /// The command list for one slot.
    pub fn slot(&self, kind: EventKind) -> &[String] {
        match kind {
            EventKind::PreStart => &self.pre_start,
            EventKind::PostStart => &self.post_start,
            EventKind::PreStop => &self.pre_stop,
            EventKind::PostStop => &self.post_stop,
        }
    }
}

/// Response of the read-only bootstrap endpoint `GET /api/v1/devfile`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DevfileContent {
    pub content: String,
}
