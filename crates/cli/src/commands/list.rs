// `devbuilder list` — list entities of one kind.

use clap::{Args, ValueEnum};
use serde::Serialize;

use devbuilder_common::types::{CommandGroup, Document, EventKind};
use devbuilder_session::project;

use crate::commands::{block_on, loaded_session};
use crate::output::{self, OutputFormat};

#[derive(Debug, Args)]
pub struct ListArgs {
    /// What to list.
    #[arg(value_enum)]
    kind: ListKind,
    /// Force JSON output.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListKind {
    Commands,
    Containers,
    Images,
    Resources,
    Volumes,
    Events,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListResult {
    pub entries: Vec<ListEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListEntry {
    pub name: String,
    /// One-line detail, kind-specific.
    pub detail: String,
}

pub fn run(args: ListArgs) -> anyhow::Result<()> {
    let format = OutputFormat::detect(args.json);
    match block_on(call_list(args.kind)) {
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

async fn call_list(kind: ListKind) -> anyhow::Result<ListResult> {
    let session = loaded_session().await?;
    let document = session.document().ok_or_else(|| anyhow::anyhow!("session did not load"))?;
    Ok(collect(document, kind))
}

fn collect(document: &Document, kind: ListKind) -> ListResult {
    let entries = match kind {
        ListKind::Commands => commands_entries(document),
        ListKind::Containers => document
            .containers
            .iter()
            .map(|c| ListEntry { name: c.name.clone(), detail: c.image.clone() })
            .collect(),
        ListKind::Images => document
            .images
            .iter()
            .map(|i| ListEntry { name: i.name.clone(), detail: i.image_name.clone() })
            .collect(),
        ListKind::Resources => document
            .resources
            .iter()
            .map(|r| {
                let detail = if r.uri.is_empty() { "inlined".to_string() } else { r.uri.clone() };
                ListEntry { name: r.name.clone(), detail }
            })
            .collect(),
        ListKind::Volumes => document
            .volumes
            .iter()
            .map(|v| {
                let mut detail =
                    if v.size.is_empty() { "(no size)".to_string() } else { v.size.clone() };
                if v.ephemeral {
                    detail.push_str(", ephemeral");
                }
                ListEntry { name: v.name.clone(), detail }
            })
            .collect(),
        ListKind::Events => EventKind::ALL
            .iter()
            .map(|kind| ListEntry {
                name: kind.as_str().to_string(),
                detail: document.events.slot(*kind).join(", "),
            })
            .collect(),
    };
    ListResult { entries }
}

/// Commands listed group by group, in-group order preserved, then the
/// ungrouped ones.
fn commands_entries(document: &Document) -> Vec<ListEntry> {
    let mut entries = Vec::new();
    for group in CommandGroup::ALL {
        for command in project::commands_in_group(document, Some(group)) {
            let default = if command.is_default { ", default" } else { "" };
            entries.push(ListEntry {
                name: command.name.clone(),
                detail: format!("{} [{group}{default}]", command.kind.type_name()),
            });
        }
    }
    for command in project::commands_in_group(document, None) {
        entries.push(ListEntry {
            name: command.name.clone(),
            detail: command.kind.type_name().to_string(),
        });
    }
    entries
}

fn format_human(result: &ListResult) -> String {
    if result.entries.is_empty() {
        return "Nothing to list.".into();
    }
    let width = result.entries.iter().map(|e| e.name.len()).max().unwrap_or(0);
    result
        .entries
        .iter()
        .map(|e| {
            if e.detail.is_empty() {
                e.name.clone()
            } else {
                format!("{:width$}  {}", e.name, e.detail)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use devbuilder_common::types::{Command, CommandKind, ExecCommand, Volume};

    fn command(name: &str, group: Option<CommandGroup>, is_default: bool) -> Command {
        Command {
            name: name.into(),
            group,
            is_default,
            kind: CommandKind::Exec(ExecCommand::default()),
        }
    }

    #[test]
    fn commands_list_groups_then_ungrouped() {
        let document = Document {
            commands: vec![
                command("lint", None, false),
                command("run-app", Some(CommandGroup::Run), true),
                command("compile", Some(CommandGroup::Build), false),
            ],
            ..Default::default()
        };
        let result = collect(&document, ListKind::Commands);
        let names: Vec<_> = result.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["compile", "run-app", "lint"]);
        assert!(result.entries[1].detail.contains("run, default"));
        assert_eq!(result.entries[2].detail, "exec");
    }

    #[test]
    fn volumes_list_shows_size_and_ephemeral() {
        let document = Document {
            volumes: vec![
                Volume { name: "cache".into(), ephemeral: true, size: "512Mi".into() },
                Volume { name: "scratch".into(), ..Default::default() },
            ],
            ..Default::default()
        };
        let result = collect(&document, ListKind::Volumes);
        assert_eq!(result.entries[0].detail, "512Mi, ephemeral");
        assert_eq!(result.entries[1].detail, "(no size)");
    }

    #[test]
    fn events_list_always_shows_all_four_slots() {
        let result = collect(&Document::default(), ListKind::Events);
        let names: Vec<_> = result.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["preStart", "postStart", "preStop", "postStop"]);
    }

    #[test]
    fn human_format_aligns_names() {
        let result = ListResult {
            entries: vec![
                ListEntry { name: "app".into(), detail: "node:18".into() },
                ListEntry { name: "database".into(), detail: "postgres:16".into() },
            ],
        };
        let text = format_human(&result);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], format!("{:8}  {}", "app", "node:18"));
        assert_eq!(lines[1], "database  postgres:16");
    }

    #[test]
    fn human_format_empty() {
        let result = collect(&Document::default(), ListKind::Containers);
        assert_eq!(format_human(&result), "Nothing to list.");
    }
}
