// `devbuilder container` — create or edit a container.
//
// New volumes can be declared inline with `--new-volume` and referenced
// from `--mount`; they are created before the container, in mount order.

use clap::Args;
use serde::Serialize;

use devbuilder_common::types::Env;
use devbuilder_session::draft::{
    ContainerDraft, Draft, EndpointDraft, MountDraft, Selection, VolumeDraft,
};
use devbuilder_session::orchestrate::{PrimaryRequest, Submission};
use devbuilder_session::project;

use crate::commands::{block_on, check_quantity, ensure_submittable, loaded_session};
use crate::output::{self, OutputFormat};

#[derive(Debug, Args)]
pub struct ContainerArgs {
    /// Container name.
    name: String,
    /// Container image, e.g. `node:18`.
    #[arg(long)]
    image: Option<String>,
    /// Entrypoint command parts (repeatable).
    #[arg(long = "command")]
    command: Vec<String>,
    /// Entrypoint arguments (repeatable).
    #[arg(long = "arg")]
    args: Vec<String>,
    /// Environment variables as `NAME=VALUE` (repeatable).
    #[arg(long)]
    env: Vec<String>,
    /// Memory request quantity, e.g. `256Mi`.
    #[arg(long)]
    mem_req: Option<String>,
    /// Memory limit quantity.
    #[arg(long)]
    mem_limit: Option<String>,
    /// CPU request quantity, e.g. `100m`.
    #[arg(long)]
    cpu_req: Option<String>,
    /// CPU limit quantity.
    #[arg(long)]
    cpu_limit: Option<String>,
    /// Volume mounts as `VOLUME:PATH` (repeatable).
    #[arg(long)]
    mount: Vec<String>,
    /// Declare a volume to create as `NAME` or `NAME:SIZE` (repeatable);
    /// it must be referenced by a `--mount`.
    #[arg(long)]
    new_volume: Vec<String>,
    /// Endpoints as `NAME:PORT` (repeatable).
    #[arg(long)]
    endpoint: Vec<String>,
    /// Mount project sources into the container.
    #[arg(long)]
    mount_sources: Option<bool>,
    /// Source mapping path inside the container.
    #[arg(long)]
    source_mapping: Option<String>,
    /// Edit the existing container instead of creating a new one.
    #[arg(long)]
    edit: bool,
    /// Force JSON output.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContainerResult {
    pub name: String,
    pub action: &'static str,
    pub containers: Vec<String>,
    pub volumes: Vec<String>,
}

pub fn run(args: ContainerArgs) -> anyhow::Result<()> {
    let format = OutputFormat::detect(args.json);
    match block_on(call_container(args)) {
        Ok(result) => {
            output::print_output(format, &result, format_human)?;
            Ok(())
        }
        Err(e) => {
            output::print_anyhow_error(format, &e);
            Err(e)
        }
    }
}

async fn call_container(args: ContainerArgs) -> anyhow::Result<ContainerResult> {
    if args.edit && !args.new_volume.is_empty() {
        anyhow::bail!("--new-volume cannot be combined with --edit");
    }

    let mut session = loaded_session().await?;
    let document = session.document().ok_or_else(|| anyhow::anyhow!("session did not load"))?;

    let mut draft = if args.edit {
        let existing = document
            .containers
            .iter()
            .find(|c| c.name == args.name)
            .ok_or_else(|| anyhow::anyhow!("no container named {}", args.name))?;
        Draft::editing(args.name.clone(), ContainerDraft::from_container(existing))
    } else {
        Draft::creating(ContainerDraft { name: args.name.clone(), ..Default::default() })
    };

    let new_volumes = parse_new_volumes(&args.new_volume)?;
    let mounts = parse_mounts(&args.mount, &new_volumes)?;
    for volume in &new_volumes {
        if !args.mount.iter().any(|m| m.starts_with(&format!("{}:", volume.name))) {
            anyhow::bail!("new volume {} is not referenced by any --mount", volume.name);
        }
    }
    let env = parse_env_vars(&args.env)?;
    let endpoints = parse_endpoints(&args.endpoint)?;

    draft.update(|container| {
        if let Some(image) = &args.image {
            container.image = image.clone();
        }
        if !args.command.is_empty() {
            container.command = args.command.clone();
        }
        if !args.args.is_empty() {
            container.args = args.args.clone();
        }
        if !env.is_empty() {
            container.env = env;
        }
        if let Some(quantity) = &args.mem_req {
            container.memory_request = quantity.clone();
        }
        if let Some(quantity) = &args.mem_limit {
            container.memory_limit = quantity.clone();
        }
        if let Some(quantity) = &args.cpu_req {
            container.cpu_request = quantity.clone();
        }
        if let Some(quantity) = &args.cpu_limit {
            container.cpu_limit = quantity.clone();
        }
        if !mounts.is_empty() {
            container.mounts = mounts;
        }
        if !endpoints.is_empty() {
            container.endpoints = endpoints;
        }
        if let Some(mount_sources) = args.mount_sources {
            container.mount_sources = mount_sources;
        }
        if let Some(source_mapping) = &args.source_mapping {
            container.source_mapping = source_mapping.clone();
        }
    });

    for field in ContainerDraft::QUANTITY_FIELDS {
        let quantity = draft
            .value()
            .quantity(field)
            .map(str::to_string)
            .unwrap_or_default();
        check_quantity(session.client(), &mut draft, field, &quantity).await?;
    }
    let new_volume_sizes: Vec<(usize, String)> = draft
        .value()
        .mounts
        .iter()
        .enumerate()
        .filter_map(|(index, mount)| match &mount.volume {
            Selection::CreateNew(volume) => Some((index, volume.size.clone())),
            Selection::Existing(_) => None,
        })
        .collect();
    for (index, size) in new_volume_sizes {
        check_quantity(session.client(), &mut draft, &format!("mounts[{index}].volume.size"), &size)
            .await?;
    }
    ensure_submittable(&draft)?;

    let action = if args.edit { "updated" } else { "created" };
    let (request, dependents) = draft.into_value().into_submission();
    let submission = if args.edit {
        Submission::update(PrimaryRequest::Container(request))
    } else {
        Submission::create(PrimaryRequest::Container(request), dependents)
    };
    let document = session.submit(&submission).await?;

    Ok(ContainerResult {
        name: args.name,
        action,
        containers: project::container_names(document).iter().map(|n| n.to_string()).collect(),
        volumes: project::volume_names(document).iter().map(|n| n.to_string()).collect(),
    })
}

fn parse_env_vars(specs: &[String]) -> anyhow::Result<Vec<Env>> {
    specs
        .iter()
        .map(|spec| {
            let (name, value) = spec
                .split_once('=')
                .ok_or_else(|| anyhow::anyhow!("--env expects NAME=VALUE, got `{spec}`"))?;
            Ok(Env { name: name.to_string(), value: value.to_string() })
        })
        .collect()
}

fn parse_endpoints(specs: &[String]) -> anyhow::Result<Vec<EndpointDraft>> {
    specs
        .iter()
        .map(|spec| {
            let (name, port) = spec
                .split_once(':')
                .ok_or_else(|| anyhow::anyhow!("--endpoint expects NAME:PORT, got `{spec}`"))?;
            Ok(EndpointDraft {
                name: name.to_string(),
                target_port: port.to_string(),
                ..Default::default()
            })
        })
        .collect()
}

fn parse_new_volumes(specs: &[String]) -> anyhow::Result<Vec<VolumeDraft>> {
    specs
        .iter()
        .map(|spec| match spec.split_once(':') {
            Some((name, size)) => Ok(VolumeDraft {
                name: name.to_string(),
                size: size.to_string(),
                ..Default::default()
            }),
            None => Ok(VolumeDraft { name: spec.clone(), ..Default::default() }),
        })
        .collect()
}

fn parse_mounts(
    specs: &[String],
    new_volumes: &[VolumeDraft],
) -> anyhow::Result<Vec<MountDraft>> {
    specs
        .iter()
        .map(|spec| {
            let (volume, path) = spec
                .split_once(':')
                .ok_or_else(|| anyhow::anyhow!("--mount expects VOLUME:PATH, got `{spec}`"))?;
            let selection = match new_volumes.iter().find(|v| v.name == volume) {
                Some(draft) => Selection::CreateNew(draft.clone()),
                None => Selection::Existing(volume.to_string()),
            };
            Ok(MountDraft { volume: selection, path: path.to_string() })
        })
        .collect()
}

fn format_human(result: &ContainerResult) -> String {
    format!(
        "Container {} {}. Containers: {}",
        result.name,
        result.action,
        result.containers.join(", ")
    )
}
