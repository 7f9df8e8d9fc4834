// Draft state: a local working copy of one entity plus its validation
// state.
//
// Drafts are built from an explicit mode — `Creating` or `Editing` with
// the original name — never inferred from whether a name field happens
// to be blank. Inline sub-entity selection is the tagged `Selection`
// type; there are no sentinel strings. Remote quantity validation is an
// explicit per-field tri-state so a pending check blocks submission.

use std::collections::BTreeMap;

use devbuilder_client::requests::{
    ApplyCommandRequest, CompositeCommandRequest, ContainerRequest, ExecCommandRequest,
    ImageRequest, ResourceRequest, VolumeRequest,
};
use devbuilder_common::types::{
    Annotation, BuildPolicy, Container, Endpoint, EndpointProtocol, Env, Exposure, Image, Metadata,
    Resource, Volume, VolumeMount,
};
use devbuilder_common::validate::{
    validate_composite_refs, validate_endpoint_name, validate_identifier, validate_required_text,
    validate_target_port, validate_version,
};

use crate::orchestrate::DependentEntity;

/// Whether a draft creates a new entity or edits an existing one.
///
/// Names are immutable once an entity exists, so editing carries the
/// original name and the submit path PATCHes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftMode {
    Creating,
    Editing { original_name: String },
}

impl DraftMode {
    pub fn is_editing(&self) -> bool {
        matches!(self, Self::Editing { .. })
    }
}

/// State of an asynchronous (server-side) field check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AsyncValidity {
    /// A check is in flight; submission is blocked until it lands.
    Pending,
    Valid,
    Invalid(String),
}

/// Reference to a sub-entity: an existing one by name, or a new one to
/// be created as a dependent before the primary entity.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection<D> {
    Existing(String),
    CreateNew(D),
}

impl<D: Named> Selection<D> {
    /// Name the primary entity will reference.
    pub fn name(&self) -> &str {
        match self {
            Self::Existing(name) => name,
            Self::CreateNew(draft) => draft.name(),
        }
    }
}

/// Drafts that carry their entity name.
pub trait Named {
    fn name(&self) -> &str;
}

/// A single field-level validation failure.
pub type FieldErrors = Vec<(String, String)>;

/// Entity payloads that can report their invalid fields.
pub trait EntityDraft {
    fn field_errors(&self) -> FieldErrors;
}

/// A draft of one entity plus its derived validation state.
///
/// The invalid-field set is recomputed on every mutation; submission is
/// allowed only when it is empty and no async check is pending or
/// failed. Re-initializing (`creating`/`editing`) always starts from a
/// clean validation state.
#[derive(Debug, Clone, PartialEq)]
pub struct Draft<T: EntityDraft> {
    mode: DraftMode,
    value: T,
    invalid: BTreeMap<String, String>,
    async_fields: BTreeMap<String, AsyncValidity>,
}

impl<T: EntityDraft> Draft<T> {
    /// Start a creation draft from an empty template.
    pub fn creating(template: T) -> Self {
        let mut draft = Self {
            mode: DraftMode::Creating,
            value: template,
            invalid: BTreeMap::new(),
            async_fields: BTreeMap::new(),
        };
        draft.revalidate();
        draft
    }

    /// Start an edit draft hydrated from an existing entity.
    pub fn editing(original_name: impl Into<String>, value: T) -> Self {
        let mut draft = Self {
            mode: DraftMode::Editing { original_name: original_name.into() },
            value,
            invalid: BTreeMap::new(),
            async_fields: BTreeMap::new(),
        };
        draft.revalidate();
        draft
    }

    pub fn mode(&self) -> &DraftMode {
        &self.mode
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn into_value(self) -> T {
        self.value
    }

    /// Mutate the draft value and recompute the invalid-field set.
    pub fn update(&mut self, mutate: impl FnOnce(&mut T)) {
        mutate(&mut self.value);
        self.revalidate();
    }

    /// Invalid fields, keyed by field path, with their reasons.
    pub fn invalid_fields(&self) -> &BTreeMap<String, String> {
        &self.invalid
    }

    /// Record the outcome (or start) of a remote field check.
    pub fn set_async_validity(&mut self, field: &str, validity: AsyncValidity) {
        self.async_fields.insert(field.to_string(), validity);
    }

    pub fn async_validity(&self, field: &str) -> Option<&AsyncValidity> {
        self.async_fields.get(field)
    }

    /// True when every local rule passes and no remote check is pending
    /// or failed.
    pub fn is_submittable(&self) -> bool {
        self.invalid.is_empty()
            && self.async_fields.values().all(|v| matches!(v, AsyncValidity::Valid))
    }

    /// Every field currently blocking submission, with its reason.
    pub fn blocking_fields(&self) -> Vec<(String, String)> {
        let mut blocking: Vec<(String, String)> =
            self.invalid.iter().map(|(field, message)| (field.clone(), message.clone())).collect();
        for (field, validity) in &self.async_fields {
            match validity {
                AsyncValidity::Valid => {}
                AsyncValidity::Pending => {
                    blocking.push((field.clone(), "validation still pending".to_string()));
                }
                AsyncValidity::Invalid(message) => blocking.push((field.clone(), message.clone())),
            }
        }
        blocking
    }

    fn revalidate(&mut self) {
        self.invalid = self.value.field_errors().into_iter().collect();
    }
}

// ── Volume ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VolumeDraft {
    pub name: String,
    pub ephemeral: bool,
    /// Quantity string; validated remotely, empty is always valid.
    pub size: String,
}

impl VolumeDraft {
    pub fn from_volume(volume: &Volume) -> Self {
        Self { name: volume.name.clone(), ephemeral: volume.ephemeral, size: volume.size.clone() }
    }

    pub fn to_request(&self) -> VolumeRequest {
        VolumeRequest { name: self.name.clone(), ephemeral: self.ephemeral, size: self.size.clone() }
    }
}

impl Named for VolumeDraft {
    fn name(&self) -> &str {
        &self.name
    }
}

impl EntityDraft for VolumeDraft {
    fn field_errors(&self) -> FieldErrors {
        let mut errors = Vec::new();
        push_error(&mut errors, "name", validate_identifier(&self.name));
        errors
    }
}

// ── Resource ────────────────────────────────────────────────────────

/// Which side of the mutually-exclusive resource definition is active.
/// The inactive side is cleared at submit time regardless of content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResourceDefinition {
    Uri,
    #[default]
    Inlined,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceDraft {
    pub name: String,
    pub definition: ResourceDefinition,
    pub uri: String,
    pub inlined: String,
    pub deploy_by_default: BuildPolicy,
}

impl ResourceDraft {
    pub fn from_resource(resource: &Resource) -> Self {
        let definition = if resource.uri.is_empty() {
            ResourceDefinition::Inlined
        } else {
            ResourceDefinition::Uri
        };
        Self {
            name: resource.name.clone(),
            definition,
            uri: resource.uri.clone(),
            inlined: resource.inlined.clone(),
            deploy_by_default: resource.deploy_by_default,
        }
    }

    /// The inactive definition side is cleared, not merely ignored.
    pub fn to_request(&self) -> ResourceRequest {
        let (uri, inlined) = match self.definition {
            ResourceDefinition::Uri => (self.uri.clone(), String::new()),
            ResourceDefinition::Inlined => (String::new(), self.inlined.clone()),
        };
        ResourceRequest {
            name: self.name.clone(),
            uri,
            inlined,
            deploy_by_default: self.deploy_by_default,
        }
    }
}

impl Named for ResourceDraft {
    fn name(&self) -> &str {
        &self.name
    }
}

impl EntityDraft for ResourceDraft {
    fn field_errors(&self) -> FieldErrors {
        let mut errors = Vec::new();
        push_error(&mut errors, "name", validate_identifier(&self.name));
        match self.definition {
            ResourceDefinition::Uri => {
                push_error(&mut errors, "uri", validate_required_text(&self.uri));
            }
            ResourceDefinition::Inlined => {
                push_error(&mut errors, "inlined", validate_required_text(&self.inlined));
            }
        }
        errors
    }
}

// ── Image ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageDraft {
    pub name: String,
    pub image_name: String,
    pub args: Vec<String>,
    pub build_context: String,
    /// Dockerfile URI.
    pub uri: String,
    pub root_required: bool,
    pub auto_build: BuildPolicy,
}

impl ImageDraft {
    pub fn from_image(image: &Image) -> Self {
        Self {
            name: image.name.clone(),
            image_name: image.image_name.clone(),
            args: image.args.clone(),
            build_context: image.build_context.clone(),
            uri: image.uri.clone(),
            root_required: image.root_required,
            auto_build: image.auto_build,
        }
    }

    pub fn to_request(&self) -> ImageRequest {
        ImageRequest {
            name: self.name.clone(),
            image_name: self.image_name.clone(),
            args: self.args.clone(),
            build_context: self.build_context.clone(),
            root_required: self.root_required,
            uri: self.uri.clone(),
            auto_build: self.auto_build,
        }
    }
}

impl Named for ImageDraft {
    fn name(&self) -> &str {
        &self.name
    }
}

impl EntityDraft for ImageDraft {
    fn field_errors(&self) -> FieldErrors {
        let mut errors = Vec::new();
        push_error(&mut errors, "name", validate_identifier(&self.name));
        push_error(&mut errors, "imageName", validate_required_text(&self.image_name));
        push_error(&mut errors, "uri", validate_required_text(&self.uri));
        errors
    }
}

// ── Container ───────────────────────────────────────────────────────

/// Endpoint fields as edited, with the port still free text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EndpointDraft {
    pub name: String,
    pub target_port: String,
    pub exposure: Exposure,
    pub path: String,
    pub protocol: EndpointProtocol,
    pub secure: bool,
}

impl EndpointDraft {
    pub fn from_endpoint(endpoint: &Endpoint) -> Self {
        Self {
            name: endpoint.name.clone(),
            target_port: endpoint.target_port.to_string(),
            exposure: endpoint.exposure,
            path: endpoint.path.clone(),
            protocol: endpoint.protocol,
            secure: endpoint.secure,
        }
    }

    /// Wire form; the port has already passed `validate_target_port`.
    fn to_endpoint(&self) -> Endpoint {
        Endpoint {
            name: self.name.clone(),
            target_port: self.target_port.parse().unwrap_or_default(),
            exposure: self.exposure,
            path: self.path.clone(),
            protocol: self.protocol,
            secure: self.secure,
        }
    }

    fn errors_into(&self, prefix: &str, errors: &mut FieldErrors) {
        push_error_at(errors, prefix, "name", validate_endpoint_name(&self.name));
        push_error_at(errors, prefix, "targetPort", validate_target_port(&self.target_port));
    }
}

/// A volume mount whose volume is either picked or created inline.
#[derive(Debug, Clone, PartialEq)]
pub struct MountDraft {
    pub volume: Selection<VolumeDraft>,
    pub path: String,
}

impl MountDraft {
    fn errors_into(&self, prefix: &str, errors: &mut FieldErrors) {
        push_error_at(errors, prefix, "path", validate_required_text(&self.path));
        match &self.volume {
            Selection::Existing(name) => {
                push_error_at(errors, prefix, "volume", validate_required_text(name));
            }
            Selection::CreateNew(volume) => {
                for (field, message) in volume.field_errors() {
                    errors.push((format!("{prefix}.volume.{field}"), message));
                }
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContainerDraft {
    pub name: String,
    pub image: String,
    pub command: Vec<String>,
    pub args: Vec<String>,
    pub env: Vec<Env>,
    /// Quantity strings; validated remotely, empty is always valid.
    pub memory_request: String,
    pub memory_limit: String,
    pub cpu_request: String,
    pub cpu_limit: String,
    pub mounts: Vec<MountDraft>,
    pub endpoints: Vec<EndpointDraft>,
    pub configure_sources: bool,
    pub mount_sources: bool,
    pub source_mapping: String,
    pub annotation: Annotation,
}

impl ContainerDraft {
    /// Quantity fields whose validity is decided by `POST /quantityValid`.
    pub const QUANTITY_FIELDS: [&'static str; 4] =
        ["memoryRequest", "memoryLimit", "cpuRequest", "cpuLimit"];

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
            mounts: container
                .volume_mounts
                .iter()
                .map(|mount| MountDraft {
                    volume: Selection::Existing(mount.name.clone()),
                    path: mount.path.clone(),
                })
                .collect(),
            endpoints: container.endpoints.iter().map(EndpointDraft::from_endpoint).collect(),
            configure_sources: container.configure_sources,
            mount_sources: container.mount_sources,
            source_mapping: container.source_mapping.clone(),
            annotation: container.annotation.clone(),
        }
    }

    /// The quantity string behind one of `QUANTITY_FIELDS`.
    pub fn quantity(&self, field: &str) -> Option<&str> {
        match field {
            "memoryRequest" => Some(&self.memory_request),
            "memoryLimit" => Some(&self.memory_limit),
            "cpuRequest" => Some(&self.cpu_request),
            "cpuLimit" => Some(&self.cpu_limit),
            _ => None,
        }
    }

    /// Build the container request plus the new volumes it introduces,
    /// in the order the mounts appear in the form.
    pub fn into_submission(self) -> (ContainerRequest, Vec<DependentEntity>) {
        let mut dependents = Vec::new();
        let mut volume_mounts = Vec::new();
        for mount in &self.mounts {
            if let Selection::CreateNew(volume) = &mount.volume {
                dependents.push(DependentEntity::Volume(volume.to_request()));
            }
            volume_mounts
                .push(VolumeMount { name: mount.volume.name().to_string(), path: mount.path.clone() });
        }
        let request = ContainerRequest {
            name: self.name,
            image: self.image,
            command: self.command,
            args: self.args,
            env: self.env,
            memory_request: self.memory_request,
            memory_limit: self.memory_limit,
            cpu_request: self.cpu_request,
            cpu_limit: self.cpu_limit,
            volume_mounts,
            configure_sources: self.configure_sources,
            mount_sources: self.mount_sources,
            source_mapping: self.source_mapping,
            annotation: self.annotation,
            endpoints: self.endpoints.iter().map(EndpointDraft::to_endpoint).collect(),
        };
        (request, dependents)
    }
}

impl Named for ContainerDraft {
    fn name(&self) -> &str {
        &self.name
    }
}

impl EntityDraft for ContainerDraft {
    fn field_errors(&self) -> FieldErrors {
        let mut errors = Vec::new();
        push_error(&mut errors, "name", validate_identifier(&self.name));
        push_error(&mut errors, "image", validate_required_text(&self.image));
        for (index, env) in self.env.iter().enumerate() {
            push_error_at(&mut errors, &format!("env[{index}]"), "name", validate_required_text(&env.name));
            push_error_at(&mut errors, &format!("env[{index}]"), "value", validate_required_text(&env.value));
        }
        for (index, mount) in self.mounts.iter().enumerate() {
            mount.errors_into(&format!("mounts[{index}]"), &mut errors);
        }
        for (index, endpoint) in self.endpoints.iter().enumerate() {
            endpoint.errors_into(&format!("endpoints[{index}]"), &mut errors);
        }
        errors
    }
}

// ── Commands ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct ExecCommandDraft {
    pub name: String,
    pub command_line: String,
    pub working_dir: String,
    pub container: Selection<ContainerDraft>,
    pub hot_reload_capable: bool,
}

impl ExecCommandDraft {
    /// Dependents first (any new volumes the inline container mounts,
    /// then the container itself), then the exec command.
    pub fn into_submission(self) -> (ExecCommandRequest, Vec<DependentEntity>) {
        let component = self.container.name().to_string();
        let dependents = match self.container {
            Selection::Existing(_) => Vec::new(),
            Selection::CreateNew(container) => {
                let (request, mut dependents) = container.into_submission();
                dependents.push(DependentEntity::Container(request));
                dependents
            }
        };
        let request = ExecCommandRequest {
            name: self.name,
            command_line: self.command_line,
            working_dir: self.working_dir,
            component,
            hot_reload_capable: self.hot_reload_capable,
        };
        (request, dependents)
    }
}

impl EntityDraft for ExecCommandDraft {
    fn field_errors(&self) -> FieldErrors {
        let mut errors = Vec::new();
        push_error(&mut errors, "name", validate_identifier(&self.name));
        push_error(&mut errors, "commandLine", validate_required_text(&self.command_line));
        push_error(&mut errors, "workingDir", validate_required_text(&self.working_dir));
        match &self.container {
            Selection::Existing(name) => {
                push_error(&mut errors, "container", validate_required_text(name));
            }
            Selection::CreateNew(container) => {
                for (field, message) in container.field_errors() {
                    errors.push((format!("container.{field}"), message));
                }
            }
        }
        errors
    }
}

/// Draft for apply commands and image commands: both reference one
/// component and share the apply wire shape.
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentCommandTarget {
    Resource(Selection<ResourceDraft>),
    Image(Selection<ImageDraft>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComponentCommandDraft {
    pub name: String,
    pub target: ComponentCommandTarget,
}

impl ComponentCommandDraft {
    pub fn into_submission(self) -> (ApplyCommandRequest, Vec<DependentEntity>) {
        let (component, dependents) = match self.target {
            ComponentCommandTarget::Resource(Selection::Existing(name)) => (name, Vec::new()),
            ComponentCommandTarget::Resource(Selection::CreateNew(resource)) => (
                resource.name.clone(),
                vec![DependentEntity::Resource(resource.to_request())],
            ),
            ComponentCommandTarget::Image(Selection::Existing(name)) => (name, Vec::new()),
            ComponentCommandTarget::Image(Selection::CreateNew(image)) => {
                (image.name.clone(), vec![DependentEntity::Image(image.to_request())])
            }
        };
        (ApplyCommandRequest { name: self.name, component }, dependents)
    }
}

impl EntityDraft for ComponentCommandDraft {
    fn field_errors(&self) -> FieldErrors {
        let mut errors = Vec::new();
        push_error(&mut errors, "name", validate_identifier(&self.name));
        match &self.target {
            ComponentCommandTarget::Resource(Selection::Existing(name)) => {
                push_error(&mut errors, "resource", validate_required_text(name));
            }
            ComponentCommandTarget::Resource(Selection::CreateNew(resource)) => {
                for (field, message) in resource.field_errors() {
                    errors.push((format!("resource.{field}"), message));
                }
            }
            ComponentCommandTarget::Image(Selection::Existing(name)) => {
                push_error(&mut errors, "image", validate_required_text(name));
            }
            ComponentCommandTarget::Image(Selection::CreateNew(image)) => {
                for (field, message) in image.field_errors() {
                    errors.push((format!("image.{field}"), message));
                }
            }
        }
        errors
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompositeCommandDraft {
    pub name: String,
    pub commands: Vec<String>,
    pub parallel: bool,
}

impl CompositeCommandDraft {
    pub fn to_request(&self) -> CompositeCommandRequest {
        CompositeCommandRequest {
            name: self.name.clone(),
            parallel: self.parallel,
            commands: self.commands.clone(),
        }
    }
}

impl EntityDraft for CompositeCommandDraft {
    fn field_errors(&self) -> FieldErrors {
        let mut errors = Vec::new();
        push_error(&mut errors, "name", validate_identifier(&self.name));
        push_error(&mut errors, "commands", validate_composite_refs(&self.commands));
        errors
    }
}

// ── Metadata ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataDraft {
    pub metadata: Metadata,
}

impl EntityDraft for MetadataDraft {
    fn field_errors(&self) -> FieldErrors {
        let mut errors = Vec::new();
        // Both fields are optional; validated only when present.
        if !self.metadata.name.is_empty() {
            push_error(&mut errors, "name", validate_identifier(&self.metadata.name));
        }
        if !self.metadata.version.is_empty() {
            push_error(&mut errors, "version", validate_version(&self.metadata.version));
        }
        errors
    }
}

// ── Helpers ─────────────────────────────────────────────────────────

fn push_error(
    errors: &mut FieldErrors,
    field: &str,
    validity: devbuilder_common::validate::FieldValidity,
) {
    if !validity.valid {
        errors.push((field.to_string(), validity.message));
    }
}

fn push_error_at(
    errors: &mut FieldErrors,
    prefix: &str,
    field: &str,
    validity: devbuilder_common::validate::FieldValidity,
) {
    if !validity.valid {
        errors.push((format!("{prefix}.{field}"), validity.message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_volume() -> VolumeDraft {
        VolumeDraft { name: "shared-data".into(), ephemeral: false, size: "1Gi".into() }
    }

    // ── Draft lifecycle ─────────────────────────────────────────────

    #[test]
    fn creating_from_empty_template_starts_invalid() {
        let draft = Draft::creating(VolumeDraft::default());
        assert!(!draft.is_submittable());
        assert!(draft.invalid_fields().contains_key("name"));
    }

    #[test]
    fn update_recomputes_the_invalid_set() {
        let mut draft = Draft::creating(VolumeDraft::default());
        draft.update(|v| v.name = "shared-data".into());
        assert!(draft.invalid_fields().is_empty());
        assert!(draft.is_submittable());

        draft.update(|v| v.name = "Bad Name".into());
        assert!(!draft.is_submittable());
    }

    #[test]
    fn editing_mode_carries_the_original_name() {
        let volume = Volume { name: "cache".into(), ephemeral: true, size: String::new() };
        let draft = Draft::editing(volume.name.clone(), VolumeDraft::from_volume(&volume));
        assert_eq!(draft.mode(), &DraftMode::Editing { original_name: "cache".into() });
        assert!(draft.mode().is_editing());
        assert!(draft.is_submittable());
    }

    #[test]
    fn reinitializing_from_same_source_yields_identical_drafts() {
        let volume = Volume { name: "cache".into(), ephemeral: true, size: "512Mi".into() };
        let first = Draft::editing(volume.name.clone(), VolumeDraft::from_volume(&volume));
        let second = Draft::editing(volume.name.clone(), VolumeDraft::from_volume(&volume));
        assert_eq!(first, second);
        assert!(first.invalid_fields().is_empty());
    }

    #[test]
    fn reinitializing_clears_previous_session_state() {
        let mut draft = Draft::creating(VolumeDraft::default());
        draft.update(|v| v.name = "Bad Name".into());
        draft.set_async_validity("size", AsyncValidity::Invalid("no such unit".into()));
        assert!(!draft.is_submittable());

        // A fresh draft from a different source starts clean.
        let volume = Volume { name: "cache".into(), ..Default::default() };
        let draft = Draft::editing(volume.name.clone(), VolumeDraft::from_volume(&volume));
        assert!(draft.invalid_fields().is_empty());
        assert!(draft.async_validity("size").is_none());
        assert!(draft.is_submittable());
    }

    // ── Async validity ──────────────────────────────────────────────

    #[test]
    fn pending_async_check_blocks_submission() {
        let mut draft = Draft::creating(valid_volume());
        assert!(draft.is_submittable());

        draft.set_async_validity("size", AsyncValidity::Pending);
        assert!(!draft.is_submittable());

        draft.set_async_validity("size", AsyncValidity::Valid);
        assert!(draft.is_submittable());

        draft.set_async_validity("size", AsyncValidity::Invalid("bad quantity".into()));
        assert!(!draft.is_submittable());
    }

    // ── Resource definition exclusivity ─────────────────────────────

    #[test]
    fn resource_request_clears_the_inactive_definition_side() {
        let draft = ResourceDraft {
            name: "db".into(),
            definition: ResourceDefinition::Uri,
            uri: "deploy/db.yaml".into(),
            inlined: "kind: Deployment".into(),
            deploy_by_default: BuildPolicy::Undefined,
        };
        let request = draft.to_request();
        assert_eq!(request.uri, "deploy/db.yaml");
        assert_eq!(request.inlined, "");

        let draft = ResourceDraft { definition: ResourceDefinition::Inlined, ..draft };
        let request = draft.to_request();
        assert_eq!(request.uri, "");
        assert_eq!(request.inlined, "kind: Deployment");
    }

    #[test]
    fn resource_validation_follows_the_active_mode() {
        let draft = ResourceDraft {
            name: "db".into(),
            definition: ResourceDefinition::Uri,
            uri: String::new(),
            inlined: "kind: Deployment".into(),
            ..Default::default()
        };
        let errors = draft.field_errors();
        assert!(errors.iter().any(|(field, _)| field == "uri"));
        assert!(!errors.iter().any(|(field, _)| field == "inlined"));
    }

    #[test]
    fn resource_hydration_picks_mode_from_populated_side() {
        let resource =
            Resource { name: "db".into(), uri: "deploy/db.yaml".into(), ..Default::default() };
        assert_eq!(ResourceDraft::from_resource(&resource).definition, ResourceDefinition::Uri);

        let resource =
            Resource { name: "db".into(), inlined: "kind: Pod".into(), ..Default::default() };
        assert_eq!(
            ResourceDraft::from_resource(&resource).definition,
            ResourceDefinition::Inlined
        );
    }

    // ── Container drafts ────────────────────────────────────────────

    #[test]
    fn container_submission_extracts_new_volumes_in_mount_order() {
        let draft = ContainerDraft {
            name: "app".into(),
            image: "node:18".into(),
            mounts: vec![
                MountDraft {
                    volume: Selection::CreateNew(VolumeDraft {
                        name: "first".into(),
                        ..Default::default()
                    }),
                    path: "/first".into(),
                },
                MountDraft { volume: Selection::Existing("existing".into()), path: "/old".into() },
                MountDraft {
                    volume: Selection::CreateNew(VolumeDraft {
                        name: "second".into(),
                        ..Default::default()
                    }),
                    path: "/second".into(),
                },
            ],
            ..Default::default()
        };
        let (request, dependents) = draft.into_submission();

        assert_eq!(dependents.len(), 2);
        assert_eq!(dependents[0].name(), "first");
        assert_eq!(dependents[1].name(), "second");
        let mount_names: Vec<_> =
            request.volume_mounts.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(mount_names, ["first", "existing", "second"]);
    }

    #[test]
    fn container_endpoint_errors_are_keyed_by_position() {
        let draft = ContainerDraft {
            name: "app".into(),
            image: "node:18".into(),
            endpoints: vec![
                EndpointDraft {
                    name: "web".into(),
                    target_port: "8080".into(),
                    ..Default::default()
                },
                EndpointDraft {
                    name: "this-name-is-way-too-long".into(),
                    target_port: "0".into(),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        let errors = draft.field_errors();
        assert!(errors.iter().any(|(field, _)| field == "endpoints[1].name"));
        assert!(errors.iter().any(|(field, _)| field == "endpoints[1].targetPort"));
        assert!(!errors.iter().any(|(field, _)| field.starts_with("endpoints[0]")));
    }

    #[test]
    fn container_endpoint_port_beyond_u16_blocks_submission() {
        let mut draft = Draft::creating(ContainerDraft {
            name: "app".into(),
            image: "node:18".into(),
            endpoints: vec![EndpointDraft {
                name: "web".into(),
                target_port: "70000".into(),
                ..Default::default()
            }],
            ..Default::default()
        });
        assert!(!draft.is_submittable());
        assert!(draft.invalid_fields().contains_key("endpoints[0].targetPort"));

        // In range, the port survives the wire conversion intact.
        draft.update(|c| c.endpoints[0].target_port = "65535".into());
        assert!(draft.is_submittable());
        let (request, _) = draft.into_value().into_submission();
        assert_eq!(request.endpoints[0].target_port, 65535);
    }

    #[test]
    fn container_env_entries_must_have_key_and_value() {
        let draft = ContainerDraft {
            name: "app".into(),
            image: "node:18".into(),
            env: vec![Env { name: "PORT".into(), value: String::new() }],
            ..Default::default()
        };
        let errors = draft.field_errors();
        assert!(errors.iter().any(|(field, _)| field == "env[0].value"));
    }

    #[test]
    fn quantity_lookup_covers_all_declared_fields() {
        let draft = ContainerDraft {
            memory_request: "256Mi".into(),
            memory_limit: "1Gi".into(),
            cpu_request: "100m".into(),
            cpu_limit: "500m".into(),
            ..Default::default()
        };
        for field in ContainerDraft::QUANTITY_FIELDS {
            assert!(draft.quantity(field).is_some(), "{field} should resolve");
        }
        assert_eq!(draft.quantity("memoryLimit"), Some("1Gi"));
        assert_eq!(draft.quantity("unknown"), None);
    }

    // ── Command drafts ──────────────────────────────────────────────

    #[test]
    fn exec_submission_with_existing_container_has_no_dependents() {
        let draft = ExecCommandDraft {
            name: "run-app".into(),
            command_line: "npm start".into(),
            working_dir: "/app".into(),
            container: Selection::Existing("runtime".into()),
            hot_reload_capable: false,
        };
        let (request, dependents) = draft.into_submission();
        assert!(dependents.is_empty());
        assert_eq!(request.component, "runtime");
    }

    #[test]
    fn exec_submission_orders_nested_dependents_before_the_container() {
        let container = ContainerDraft {
            name: "runtime".into(),
            image: "node:18".into(),
            mounts: vec![MountDraft {
                volume: Selection::CreateNew(VolumeDraft {
                    name: "deps".into(),
                    ..Default::default()
                }),
                path: "/deps".into(),
            }],
            ..Default::default()
        };
        let draft = ExecCommandDraft {
            name: "run-app".into(),
            command_line: "npm start".into(),
            working_dir: "/app".into(),
            container: Selection::CreateNew(container),
            hot_reload_capable: true,
        };
        let (request, dependents) = draft.into_submission();

        assert_eq!(request.component, "runtime");
        assert_eq!(dependents.len(), 2);
        assert_eq!(dependents[0].kind(), "volume");
        assert_eq!(dependents[0].name(), "deps");
        assert_eq!(dependents[1].kind(), "container");
        assert_eq!(dependents[1].name(), "runtime");
    }

    #[test]
    fn exec_draft_validates_nested_container_fields() {
        let draft = ExecCommandDraft {
            name: "run-app".into(),
            command_line: "npm start".into(),
            working_dir: "/app".into(),
            container: Selection::CreateNew(ContainerDraft::default()),
            hot_reload_capable: false,
        };
        let errors = draft.field_errors();
        assert!(errors.iter().any(|(field, _)| field == "container.name"));
        assert!(errors.iter().any(|(field, _)| field == "container.image"));
    }

    #[test]
    fn component_command_submission_extracts_new_resource() {
        let draft = ComponentCommandDraft {
            name: "deploy-db".into(),
            target: ComponentCommandTarget::Resource(Selection::CreateNew(ResourceDraft {
                name: "db".into(),
                definition: ResourceDefinition::Uri,
                uri: "deploy/db.yaml".into(),
                ..Default::default()
            })),
        };
        let (request, dependents) = draft.into_submission();
        assert_eq!(request.component, "db");
        assert_eq!(dependents.len(), 1);
        assert_eq!(dependents[0].kind(), "resource");
    }

    #[test]
    fn composite_draft_requires_non_empty_references() {
        let mut draft = Draft::creating(CompositeCommandDraft {
            name: "full-build".into(),
            commands: vec![],
            parallel: false,
        });
        assert!(!draft.is_submittable());

        draft.update(|c| c.commands = vec!["compile".into(), String::new()]);
        assert!(!draft.is_submittable());

        draft.update(|c| c.commands = vec!["compile".into(), "package".into()]);
        assert!(draft.is_submittable());
    }

    // ── Metadata draft ──────────────────────────────────────────────

    #[test]
    fn metadata_version_is_validated_only_when_present() {
        let mut draft = Draft::creating(MetadataDraft::default());
        assert!(draft.is_submittable());

        draft.update(|m| m.metadata.version = "v1.0".into());
        assert!(draft.invalid_fields().contains_key("version"));

        draft.update(|m| m.metadata.version = "1.0.4".into());
        assert!(draft.is_submittable());
    }
}
