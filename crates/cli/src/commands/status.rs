// `devbuilder status` — server URL, metadata and entity summary.

use clap::Args;
use serde::Serialize;

use devbuilder_common::types::Document;

use crate::commands::{block_on, loaded_session};
use crate::output::{self, OutputFormat};

#[derive(Debug, Args)]
pub struct StatusArgs {
    /// Force JSON output.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusResult {
    pub url: String,
    pub name: String,
    pub version: String,
    pub commands: usize,
    pub containers: usize,
    pub images: usize,
    pub resources: usize,
    pub volumes: usize,
}

pub fn run(args: StatusArgs) -> anyhow::Result<()> {
    let format = OutputFormat::detect(args.json);
    match block_on(call_status()) {
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

async fn call_status() -> anyhow::Result<StatusResult> {
    let session = loaded_session().await?;
    let url = session.client().base_url().to_string();
    let document = session.document().ok_or_else(|| anyhow::anyhow!("session did not load"))?;
    Ok(summarize(url, document))
}

fn summarize(url: String, document: &Document) -> StatusResult {
    StatusResult {
        url,
        name: document.metadata.name.clone(),
        version: document.metadata.version.clone(),
        commands: document.commands.len(),
        containers: document.containers.len(),
        images: document.images.len(),
        resources: document.resources.len(),
        volumes: document.volumes.len(),
    }
}

fn format_human(result: &StatusResult) -> String {
    let name = if result.name.is_empty() { "(unnamed)" } else { &result.name };
    let version = if result.version.is_empty() { "-" } else { &result.version };
    format!(
        "{name} {version} @ {}\n  commands: {}  containers: {}  images: {}  resources: {}  volumes: {}",
        result.url,
        result.commands,
        result.containers,
        result.images,
        result.resources,
        result.volumes,
    )
}
