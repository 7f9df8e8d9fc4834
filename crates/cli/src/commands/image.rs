// `devbuilder image` — create or edit an image component.

use clap::Args;
use serde::Serialize;

use devbuilder_common::types::BuildPolicy;
use devbuilder_session::draft::{Draft, ImageDraft};
use devbuilder_session::orchestrate::{PrimaryRequest, Submission};
use devbuilder_session::project;

use crate::commands::{block_on, ensure_submittable, loaded_session};
use crate::output::{self, OutputFormat};

#[derive(Debug, Args)]
pub struct ImageArgs {
    /// Component name.
    name: String,
    /// Image name to build, e.g. `registry.example.com/my-app:latest`.
    #[arg(long)]
    image_name: Option<String>,
    /// Dockerfile URI.
    #[arg(long)]
    uri: Option<String>,
    /// Build context directory.
    #[arg(long)]
    build_context: Option<String>,
    /// Build arguments (repeatable).
    #[arg(long = "arg")]
    args: Vec<String>,
    /// The build requires root privileges.
    #[arg(long)]
    root_required: Option<bool>,
    /// Auto-build policy: `never`, `undefined` or `always`.
    #[arg(long)]
    auto_build: Option<String>,
    /// Edit the existing image instead of creating a new one.
    #[arg(long)]
    edit: bool,
    /// Force JSON output.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageResult {
    pub name: String,
    pub action: &'static str,
    pub images: Vec<String>,
}

pub fn run(args: ImageArgs) -> anyhow::Result<()> {
    let format = OutputFormat::detect(args.json);
    match block_on(call_image(args)) {
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

async fn call_image(args: ImageArgs) -> anyhow::Result<ImageResult> {
    let auto_build = args
        .auto_build
        .as_deref()
        .map(|s| {
            BuildPolicy::parse(s)
                .ok_or_else(|| anyhow::anyhow!("--auto-build expects never, undefined or always"))
        })
        .transpose()?;

    let mut session = loaded_session().await?;
    let document = session.document().ok_or_else(|| anyhow::anyhow!("session did not load"))?;

    let mut draft = if args.edit {
        let existing = document
            .images
            .iter()
            .find(|i| i.name == args.name)
            .ok_or_else(|| anyhow::anyhow!("no image named {}", args.name))?;
        Draft::editing(args.name.clone(), ImageDraft::from_image(existing))
    } else {
        Draft::creating(ImageDraft { name: args.name.clone(), ..Default::default() })
    };

    draft.update(|image| {
        if let Some(image_name) = &args.image_name {
            image.image_name = image_name.clone();
        }
        if let Some(uri) = &args.uri {
            image.uri = uri.clone();
        }
        if let Some(build_context) = &args.build_context {
            image.build_context = build_context.clone();
        }
        if !args.args.is_empty() {
            image.args = args.args.clone();
        }
        if let Some(root_required) = args.root_required {
            image.root_required = root_required;
        }
        if let Some(policy) = auto_build {
            image.auto_build = policy;
        }
    });
    ensure_submittable(&draft)?;

    let action = if args.edit { "updated" } else { "created" };
    let request = PrimaryRequest::Image(draft.value().to_request());
    let submission = if args.edit {
        Submission::update(request)
    } else {
        Submission::create(request, Vec::new())
    };
    let document = session.submit(&submission).await?;

    Ok(ImageResult {
        name: args.name,
        action,
        images: project::image_names(document).iter().map(|n| n.to_string()).collect(),
    })
}

fn format_human(result: &ImageResult) -> String {
    format!("Image {} {}. Images: {}", result.name, result.action, result.images.join(", "))
}
