// `devbuilder metadata` — update devfile metadata.

use clap::Args;
use serde::Serialize;

use devbuilder_session::draft::{Draft, MetadataDraft};

use crate::commands::{block_on, ensure_submittable, loaded_session};
use crate::output::{self, OutputFormat};

#[derive(Debug, Args)]
pub struct MetadataArgs {
    /// Devfile name (validated as an identifier).
    #[arg(long)]
    name: Option<String>,
    /// Semantic version, e.g. `1.0.4`.
    #[arg(long)]
    version: Option<String>,
    /// Human-readable display name.
    #[arg(long)]
    display_name: Option<String>,
    /// Free-form description.
    #[arg(long)]
    description: Option<String>,
    /// Comma-separated tags.
    #[arg(long)]
    tags: Option<String>,
    /// Project website.
    #[arg(long)]
    website: Option<String>,
    /// Provider name.
    #[arg(long)]
    provider: Option<String>,
    /// Target language.
    #[arg(long)]
    language: Option<String>,
    /// Force JSON output.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetadataResult {
    pub name: String,
    pub version: String,
}

pub fn run(args: MetadataArgs) -> anyhow::Result<()> {
    let format = OutputFormat::detect(args.json);
    match block_on(call_metadata(args)) {
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

async fn call_metadata(args: MetadataArgs) -> anyhow::Result<MetadataResult> {
    let mut session = loaded_session().await?;
    let document = session.document().ok_or_else(|| anyhow::anyhow!("session did not load"))?;

    let mut draft = Draft::editing(
        document.metadata.name.clone(),
        MetadataDraft { metadata: document.metadata.clone() },
    );
    draft.update(|m| {
        if let Some(name) = &args.name {
            m.metadata.name = name.clone();
        }
        if let Some(version) = &args.version {
            m.metadata.version = version.clone();
        }
        if let Some(display_name) = &args.display_name {
            m.metadata.display_name = display_name.clone();
        }
        if let Some(description) = &args.description {
            m.metadata.description = description.clone();
        }
        if let Some(tags) = &args.tags {
            m.metadata.tags = tags.clone();
        }
        if let Some(website) = &args.website {
            m.metadata.website = website.clone();
        }
        if let Some(provider) = &args.provider {
            m.metadata.provider = provider.clone();
        }
        if let Some(language) = &args.language {
            m.metadata.language = language.clone();
        }
    });
    ensure_submittable(&draft)?;

    let metadata = draft.value().metadata.clone();
    let document = session.set_metadata(&metadata).await?;
    Ok(MetadataResult {
        name: document.metadata.name.clone(),
        version: document.metadata.version.clone(),
    })
}

fn format_human(result: &MetadataResult) -> String {
    let name = if result.name.is_empty() { "(unnamed)" } else { &result.name };
    let version = if result.version.is_empty() { "-" } else { &result.version };
    format!("Metadata updated: {name} {version}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn human_format_shows_name_and_version() {
        let result = MetadataResult { name: "my-app".into(), version: "1.0.4".into() };
        assert_eq!(format_human(&result), "Metadata updated: my-app 1.0.4");
    }

    #[test]
    fn human_format_handles_empty_fields() {
        let result = MetadataResult { name: String::new(), version: String::new() };
        assert_eq!(format_human(&result), "Metadata updated: (unnamed) -");
    }
}
