// `devbuilder volume` — create or edit a volume.

use clap::Args;
use serde::Serialize;

use devbuilder_session::draft::{Draft, VolumeDraft};
use devbuilder_session::orchestrate::{PrimaryRequest, Submission};
use devbuilder_session::project;

use crate::commands::{block_on, check_quantity, ensure_submittable, loaded_session};
use crate::output::{self, OutputFormat};

#[derive(Debug, Args)]
pub struct VolumeArgs {
    /// Volume name.
    name: String,
    /// Storage size, e.g. `1Gi` (validated by the server).
    #[arg(long)]
    size: Option<String>,
    /// Whether the volume is ephemeral.
    #[arg(long)]
    ephemeral: Option<bool>,
    /// Edit the existing volume instead of creating a new one.
    #[arg(long)]
    edit: bool,
    /// Force JSON output.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct VolumeResult {
    pub name: String,
    pub action: &'static str,
    pub volumes: Vec<String>,
}

pub fn run(args: VolumeArgs) -> anyhow::Result<()> {
    let format = OutputFormat::detect(args.json);
    match block_on(call_volume(args)) {
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

async fn call_volume(args: VolumeArgs) -> anyhow::Result<VolumeResult> {
    let mut session = loaded_session().await?;
    let document = session.document().ok_or_else(|| anyhow::anyhow!("session did not load"))?;

    let mut draft = if args.edit {
        let existing = document
            .volumes
            .iter()
            .find(|v| v.name == args.name)
            .ok_or_else(|| anyhow::anyhow!("no volume named {}", args.name))?;
        Draft::editing(args.name.clone(), VolumeDraft::from_volume(existing))
    } else {
        Draft::creating(VolumeDraft { name: args.name.clone(), ..Default::default() })
    };

    draft.update(|volume| {
        if let Some(size) = &args.size {
            volume.size = size.clone();
        }
        if let Some(ephemeral) = args.ephemeral {
            volume.ephemeral = ephemeral;
        }
    });

    let size = draft.value().size.clone();
    check_quantity(session.client(), &mut draft, "size", &size).await?;
    ensure_submittable(&draft)?;

    let action = if args.edit { "updated" } else { "created" };
    let request = PrimaryRequest::Volume(draft.value().to_request());
    let submission = if args.edit {
        Submission::update(request)
    } else {
        Submission::create(request, Vec::new())
    };
    let document = session.submit(&submission).await?;

    Ok(VolumeResult {
        name: args.name,
        action,
        volumes: project::volume_names(document).iter().map(|n| n.to_string()).collect(),
    })
}

fn format_human(result: &VolumeResult) -> String {
    format!("Volume {} {}. Volumes: {}", result.name, result.action, result.volumes.join(", "))
}
