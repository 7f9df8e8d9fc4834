// `devbuilder events` — replace the commands bound to a lifecycle slot.

use clap::Args;
use serde::Serialize;

use devbuilder_common::types::EventKind;

use crate::commands::{block_on, loaded_session};
use crate::output::{self, OutputFormat};

#[derive(Debug, Args)]
pub struct EventsArgs {
    /// Lifecycle slot: preStart, postStart, preStop or postStop.
    slot: String,
    /// Command names to bind, in order. Pass none to clear the slot.
    commands: Vec<String>,
    /// Force JSON output.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct EventsResult {
    pub slot: String,
    pub commands: Vec<String>,
}

pub fn run(args: EventsArgs) -> anyhow::Result<()> {
    let format = OutputFormat::detect(args.json);
    match block_on(call_events(args)) {
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

async fn call_events(args: EventsArgs) -> anyhow::Result<EventsResult> {
    let slot = EventKind::parse(&args.slot).ok_or_else(|| {
        anyhow::anyhow!("unknown event slot `{}`; expected preStart, postStart, preStop or postStop", args.slot)
    })?;

    let mut session = loaded_session().await?;
    let document = session.update_events(slot, &args.commands).await?;
    Ok(EventsResult {
        slot: slot.as_str().to_string(),
        commands: document.events.slot(slot).to_vec(),
    })
}

fn format_human(result: &EventsResult) -> String {
    if result.commands.is_empty() {
        format!("Event {} cleared.", result.slot)
    } else {
        format!("Event {}: {}", result.slot, result.commands.join(", "))
    }
}
