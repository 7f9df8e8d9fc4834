// `devbuilder yaml` — show or replace the raw devfile.

use clap::{Args, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

use anyhow::Context;

use crate::commands::{block_on, loaded_session};
use crate::output::{self, OutputFormat};

#[derive(Subcommand)]
pub enum YamlAction {
    /// Print the current devfile content
    Show(ShowArgs),
    /// Replace the devfile from a file (`-` reads stdin)
    Apply(ApplyArgs),
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Force JSON output.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Args)]
pub struct ApplyArgs {
    /// File to read the devfile from, or `-` for stdin.
    file: PathBuf,
    /// Force JSON output.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct YamlResult {
    pub content: String,
}

pub fn run(action: YamlAction) -> anyhow::Result<()> {
    match action {
        YamlAction::Show(args) => {
            let format = OutputFormat::detect(args.json);
            match block_on(call_show()) {
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
        YamlAction::Apply(args) => {
            let format = OutputFormat::detect(args.json);
            match block_on(call_apply(args.file)) {
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
    }
}

async fn call_show() -> anyhow::Result<YamlResult> {
    let session = loaded_session().await?;
    let document = session.document().ok_or_else(|| anyhow::anyhow!("session did not load"))?;
    Ok(YamlResult { content: document.content.clone() })
}

async fn call_apply(file: PathBuf) -> anyhow::Result<YamlResult> {
    let content = if file.as_os_str() == "-" {
        std::io::read_to_string(std::io::stdin()).context("reading devfile from stdin")?
    } else {
        std::fs::read_to_string(&file).with_context(|| format!("reading {}", file.display()))?
    };

    let mut session = loaded_session().await?;
    let document = session.set_devfile_content(&content).await?;
    Ok(YamlResult { content: document.content.clone() })
}

fn format_human(result: &YamlResult) -> String {
    result.content.trim_end().to_string()
}
