// `devbuilder rm` — delete an entity, with confirmation.

use clap::{Args, ValueEnum};
use serde::Serialize;

use devbuilder_common::types::Document;
use devbuilder_session::controller::SessionController;

use crate::commands::{block_on, loaded_session};
use crate::confirm;
use crate::output::{self, OutputFormat};

#[derive(Debug, Args)]
pub struct RmArgs {
    /// Kind of entity to delete.
    #[arg(value_enum)]
    kind: RmKind,
    /// Entity name.
    name: String,
    /// Skip the confirmation prompt.
    #[arg(long)]
    yes: bool,
    /// Force JSON output.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RmKind {
    Command,
    Container,
    Image,
    Resource,
    Volume,
}

impl RmKind {
    fn as_str(self) -> &'static str {
        match self {
            Self::Command => "command",
            Self::Container => "container",
            Self::Image => "image",
            Self::Resource => "resource",
            Self::Volume => "volume",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RmResult {
    pub kind: &'static str,
    pub name: String,
    pub deleted: bool,
}

pub fn run(args: RmArgs) -> anyhow::Result<()> {
    let format = OutputFormat::detect(args.json);

    if !args.yes {
        let prompt = format!("Delete {} {}?", args.kind.as_str(), args.name);
        if !confirm::confirm(&prompt)? {
            let result = RmResult { kind: args.kind.as_str(), name: args.name, deleted: false };
            output::print_output(format, &result, format_human)?;
            return Ok(());
        }
    }

    match block_on(call_rm(args.kind, args.name)) {
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

async fn call_rm(kind: RmKind, name: String) -> anyhow::Result<RmResult> {
    let mut session = loaded_session().await?;
    delete(&mut session, kind, &name).await?;
    Ok(RmResult { kind: kind.as_str(), name, deleted: true })
}

async fn delete<'a>(
    session: &'a mut SessionController,
    kind: RmKind,
    name: &str,
) -> anyhow::Result<&'a Document> {
    let document = match kind {
        RmKind::Command => session.delete_command(name).await?,
        RmKind::Container => session.delete_container(name).await?,
        RmKind::Image => session.delete_image(name).await?,
        RmKind::Resource => session.delete_resource(name).await?,
        RmKind::Volume => session.delete_volume(name).await?,
    };
    Ok(document)
}

fn format_human(result: &RmResult) -> String {
    if result.deleted {
        format!("Deleted {} {}.", result.kind, result.name)
    } else {
        format!("Kept {} {}.", result.kind, result.name)
    }
}
