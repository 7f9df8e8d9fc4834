// `devbuilder resource` — create or edit a cluster resource.
//
// A resource is defined either by a manifest URI or by inlined YAML;
// choosing one clears the other at submit time.

use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use anyhow::Context;
use devbuilder_common::types::BuildPolicy;
use devbuilder_session::draft::{Draft, ResourceDefinition, ResourceDraft};
use devbuilder_session::orchestrate::{PrimaryRequest, Submission};
use devbuilder_session::project;

use crate::commands::{block_on, ensure_submittable, loaded_session};
use crate::output::{self, OutputFormat};

#[derive(Debug, Args)]
pub struct ResourceArgs {
    /// Resource name.
    name: String,
    /// Manifest URI (mutually exclusive with --inlined/--inlined-file).
    #[arg(long, conflicts_with_all = ["inlined", "inlined_file"])]
    uri: Option<String>,
    /// Inlined manifest text.
    #[arg(long, conflicts_with = "inlined_file")]
    inlined: Option<String>,
    /// Read the inlined manifest from a file.
    #[arg(long)]
    inlined_file: Option<PathBuf>,
    /// Deploy-by-default policy: `never`, `undefined` or `always`.
    #[arg(long)]
    deploy_by_default: Option<String>,
    /// Edit the existing resource instead of creating a new one.
    #[arg(long)]
    edit: bool,
    /// Force JSON output.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResourceResult {
    pub name: String,
    pub action: &'static str,
    pub resources: Vec<String>,
}

pub fn run(args: ResourceArgs) -> anyhow::Result<()> {
    let format = OutputFormat::detect(args.json);
    match block_on(call_resource(args)) {
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

async fn call_resource(args: ResourceArgs) -> anyhow::Result<ResourceResult> {
    let deploy_by_default = args
        .deploy_by_default
        .as_deref()
        .map(|s| {
            BuildPolicy::parse(s).ok_or_else(|| {
                anyhow::anyhow!("--deploy-by-default expects never, undefined or always")
            })
        })
        .transpose()?;
    let inlined = match &args.inlined_file {
        Some(path) => Some(
            std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?,
        ),
        None => args.inlined.clone(),
    };

    let mut session = loaded_session().await?;
    let document = session.document().ok_or_else(|| anyhow::anyhow!("session did not load"))?;

    let mut draft = if args.edit {
        let existing = document
            .resources
            .iter()
            .find(|r| r.name == args.name)
            .ok_or_else(|| anyhow::anyhow!("no resource named {}", args.name))?;
        Draft::editing(args.name.clone(), ResourceDraft::from_resource(existing))
    } else {
        Draft::creating(ResourceDraft { name: args.name.clone(), ..Default::default() })
    };

    draft.update(|resource| {
        if let Some(uri) = &args.uri {
            resource.definition = ResourceDefinition::Uri;
            resource.uri = uri.clone();
        }
        if let Some(inlined) = &inlined {
            resource.definition = ResourceDefinition::Inlined;
            resource.inlined = inlined.clone();
        }
        if let Some(policy) = deploy_by_default {
            resource.deploy_by_default = policy;
        }
    });
    ensure_submittable(&draft)?;

    let action = if args.edit { "updated" } else { "created" };
    let request = PrimaryRequest::Resource(draft.value().to_request());
    let submission = if args.edit {
        Submission::update(request)
    } else {
        Submission::create(request, Vec::new())
    };
    let document = session.submit(&submission).await?;

    Ok(ResourceResult {
        name: args.name,
        action,
        resources: project::resource_names(document).iter().map(|n| n.to_string()).collect(),
    })
}

fn format_human(result: &ResourceResult) -> String {
    format!(
        "Resource {} {}. Resources: {}",
        result.name,
        result.action,
        result.resources.join(", ")
    )
}
