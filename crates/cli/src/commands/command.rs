// `devbuilder command` — manage devfile commands.

use clap::{Args, Subcommand};
use serde::Serialize;

use devbuilder_common::types::{CommandGroup, CommandKind, Document};
use devbuilder_client::requests::MoveCommandRequest;
use devbuilder_session::draft::{
    ComponentCommandDraft, ComponentCommandTarget, CompositeCommandDraft, Draft, ExecCommandDraft,
    Selection,
};
use devbuilder_session::orchestrate::{PrimaryRequest, Submission};
use devbuilder_session::project;

use crate::commands::{block_on, ensure_submittable, loaded_session};
use crate::output::{self, OutputFormat};

#[derive(Subcommand)]
pub enum CommandAction {
    /// Create or edit an exec command
    Exec(ExecArgs),
    /// Create or edit an apply command
    Apply(ApplyArgs),
    /// Create or edit an image build command
    Image(ImageCommandArgs),
    /// Create or edit a composite command
    Composite(CompositeArgs),
    /// Mark a command as the default of a group
    Default(DefaultArgs),
    /// Clear the default flag of a command
    Undefault(UndefaultArgs),
    /// Move a command to a new group or position
    Move(MoveArgs),
}

#[derive(Debug, Args)]
pub struct ExecArgs {
    /// Command name.
    name: String,
    /// Shell command line to run.
    #[arg(long)]
    command_line: Option<String>,
    /// Working directory inside the container.
    #[arg(long)]
    working_dir: Option<String>,
    /// Target container name.
    #[arg(long)]
    container: Option<String>,
    /// The command survives source hot reloads.
    #[arg(long)]
    hot_reload: Option<bool>,
    /// Edit the existing command instead of creating a new one.
    #[arg(long)]
    edit: bool,
    /// Force JSON output.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Args)]
pub struct ApplyArgs {
    /// Command name.
    name: String,
    /// Target resource name.
    #[arg(long)]
    resource: Option<String>,
    /// Edit the existing command instead of creating a new one.
    #[arg(long)]
    edit: bool,
    /// Force JSON output.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Args)]
pub struct ImageCommandArgs {
    /// Command name.
    name: String,
    /// Target image component name.
    #[arg(long)]
    image: Option<String>,
    /// Edit the existing command instead of creating a new one.
    #[arg(long)]
    edit: bool,
    /// Force JSON output.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Args)]
pub struct CompositeArgs {
    /// Command name.
    name: String,
    /// Referenced command names, in execution order (repeatable).
    #[arg(long = "command")]
    commands: Vec<String>,
    /// Run the referenced commands in parallel.
    #[arg(long)]
    parallel: Option<bool>,
    /// Edit the existing command instead of creating a new one.
    #[arg(long)]
    edit: bool,
    /// Force JSON output.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Args)]
pub struct DefaultArgs {
    /// Command name.
    name: String,
    /// Group the command is the default of.
    #[arg(long)]
    group: String,
    /// Force JSON output.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Args)]
pub struct UndefaultArgs {
    /// Command name.
    name: String,
    /// Force JSON output.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Args)]
pub struct MoveArgs {
    /// Command name.
    name: String,
    /// Destination group; omit to move to the ungrouped list.
    #[arg(long)]
    to_group: Option<String>,
    /// Destination position within the group.
    #[arg(long, default_value_t = 0)]
    to_index: usize,
    /// Force JSON output.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommandResult {
    pub name: String,
    pub action: &'static str,
    pub commands: Vec<String>,
}

pub fn run(action: CommandAction) -> anyhow::Result<()> {
    match action {
        CommandAction::Exec(args) => dispatch(args.json, call_exec(args)),
        CommandAction::Apply(args) => dispatch(args.json, call_apply(args)),
        CommandAction::Image(args) => dispatch(args.json, call_image(args)),
        CommandAction::Composite(args) => dispatch(args.json, call_composite(args)),
        CommandAction::Default(args) => dispatch(args.json, call_default(args)),
        CommandAction::Undefault(args) => dispatch(args.json, call_undefault(args)),
        CommandAction::Move(args) => dispatch(args.json, call_move(args)),
    }
}

fn dispatch(
    json: bool,
    future: impl std::future::Future<Output = anyhow::Result<CommandResult>>,
) -> anyhow::Result<()> {
    let format = OutputFormat::detect(json);
    match block_on(future) {
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

fn result_for(name: String, action: &'static str, document: &Document) -> CommandResult {
    CommandResult {
        name,
        action,
        commands: project::command_names(document).iter().map(|n| n.to_string()).collect(),
    }
}

async fn call_exec(args: ExecArgs) -> anyhow::Result<CommandResult> {
    let mut session = loaded_session().await?;
    let document = session.document().ok_or_else(|| anyhow::anyhow!("session did not load"))?;

    let mut draft = if args.edit {
        let existing = document
            .commands
            .iter()
            .find(|c| c.name == args.name)
            .ok_or_else(|| anyhow::anyhow!("no command named {}", args.name))?;
        let CommandKind::Exec(exec) = &existing.kind else {
            anyhow::bail!("{} is not an exec command", args.name);
        };
        Draft::editing(
            args.name.clone(),
            ExecCommandDraft {
                name: args.name.clone(),
                command_line: exec.command_line.clone(),
                working_dir: exec.working_dir.clone(),
                container: Selection::Existing(exec.component.clone()),
                hot_reload_capable: exec.hot_reload_capable,
            },
        )
    } else {
        Draft::creating(ExecCommandDraft {
            name: args.name.clone(),
            command_line: String::new(),
            working_dir: String::new(),
            container: Selection::Existing(String::new()),
            hot_reload_capable: false,
        })
    };

    draft.update(|exec| {
        if let Some(command_line) = &args.command_line {
            exec.command_line = command_line.clone();
        }
        if let Some(working_dir) = &args.working_dir {
            exec.working_dir = working_dir.clone();
        }
        if let Some(container) = &args.container {
            exec.container = Selection::Existing(container.clone());
        }
        if let Some(hot_reload) = args.hot_reload {
            exec.hot_reload_capable = hot_reload;
        }
    });
    ensure_submittable(&draft)?;

    let action = if args.edit { "updated" } else { "created" };
    let (request, dependents) = draft.into_value().into_submission();
    let submission = if args.edit {
        Submission::update(PrimaryRequest::ExecCommand(request))
    } else {
        Submission::create(PrimaryRequest::ExecCommand(request), dependents)
    };
    let document = session.submit(&submission).await?;
    Ok(result_for(args.name, action, document))
}

async fn call_apply(args: ApplyArgs) -> anyhow::Result<CommandResult> {
    submit_component_command(
        args.name,
        args.edit,
        |resource| ComponentCommandTarget::Resource(Selection::Existing(resource)),
        args.resource,
        PrimaryRequest::ApplyCommand,
    )
    .await
}

async fn call_image(args: ImageCommandArgs) -> anyhow::Result<CommandResult> {
    submit_component_command(
        args.name,
        args.edit,
        |image| ComponentCommandTarget::Image(Selection::Existing(image)),
        args.image,
        PrimaryRequest::ImageCommand,
    )
    .await
}

async fn submit_component_command(
    name: String,
    edit: bool,
    target_for: impl Fn(String) -> ComponentCommandTarget,
    component: Option<String>,
    wrap: impl FnOnce(devbuilder_client::requests::ApplyCommandRequest) -> PrimaryRequest,
) -> anyhow::Result<CommandResult> {
    let mut session = loaded_session().await?;
    let document = session.document().ok_or_else(|| anyhow::anyhow!("session did not load"))?;

    let existing_component = if edit {
        let existing = document
            .commands
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| anyhow::anyhow!("no command named {name}"))?;
        Some(match &existing.kind {
            CommandKind::Apply(apply) => apply.component.clone(),
            CommandKind::Image(image) => image.component.clone(),
            _ => anyhow::bail!("{name} does not reference a component"),
        })
    } else {
        None
    };

    let target = target_for(component.or(existing_component).unwrap_or_default());
    let draft = if edit {
        Draft::editing(name.clone(), ComponentCommandDraft { name: name.clone(), target })
    } else {
        Draft::creating(ComponentCommandDraft { name: name.clone(), target })
    };
    ensure_submittable(&draft)?;

    let action = if edit { "updated" } else { "created" };
    let (request, dependents) = draft.into_value().into_submission();
    let submission = if edit {
        Submission::update(wrap(request))
    } else {
        Submission::create(wrap(request), dependents)
    };
    let document = session.submit(&submission).await?;
    Ok(result_for(name, action, document))
}

async fn call_composite(args: CompositeArgs) -> anyhow::Result<CommandResult> {
    let mut session = loaded_session().await?;
    let document = session.document().ok_or_else(|| anyhow::anyhow!("session did not load"))?;

    let mut draft = if args.edit {
        let existing = document
            .commands
            .iter()
            .find(|c| c.name == args.name)
            .ok_or_else(|| anyhow::anyhow!("no command named {}", args.name))?;
        let CommandKind::Composite(composite) = &existing.kind else {
            anyhow::bail!("{} is not a composite command", args.name);
        };
        Draft::editing(
            args.name.clone(),
            CompositeCommandDraft {
                name: args.name.clone(),
                commands: composite.commands.clone(),
                parallel: composite.parallel,
            },
        )
    } else {
        Draft::creating(CompositeCommandDraft { name: args.name.clone(), ..Default::default() })
    };

    draft.update(|composite| {
        if !args.commands.is_empty() {
            composite.commands = args.commands.clone();
        }
        if let Some(parallel) = args.parallel {
            composite.parallel = parallel;
        }
    });
    ensure_submittable(&draft)?;

    let action = if args.edit { "updated" } else { "created" };
    let request = PrimaryRequest::CompositeCommand(draft.value().to_request());
    let submission = if args.edit {
        Submission::update(request)
    } else {
        Submission::create(request, Vec::new())
    };
    let document = session.submit(&submission).await?;
    Ok(result_for(args.name, action, document))
}

async fn call_default(args: DefaultArgs) -> anyhow::Result<CommandResult> {
    let group = CommandGroup::parse(&args.group)
        .ok_or_else(|| anyhow::anyhow!("--group expects build, run, test, debug or deploy"))?;
    let mut session = loaded_session().await?;
    let document = session.set_default_command(&args.name, group).await?;
    Ok(result_for(args.name, "set as default", document))
}

async fn call_undefault(args: UndefaultArgs) -> anyhow::Result<CommandResult> {
    let mut session = loaded_session().await?;
    let document = session.unset_default_command(&args.name).await?;
    Ok(result_for(args.name, "no longer default", document))
}

async fn call_move(args: MoveArgs) -> anyhow::Result<CommandResult> {
    let to_group = args
        .to_group
        .as_deref()
        .map(|s| {
            CommandGroup::parse(s)
                .ok_or_else(|| anyhow::anyhow!("--to-group expects build, run, test, debug or deploy"))
        })
        .transpose()?;

    let mut session = loaded_session().await?;
    let document = session.document().ok_or_else(|| anyhow::anyhow!("session did not load"))?;
    let (from_group, from_index) = project::position_of_command(document, &args.name)
        .ok_or_else(|| anyhow::anyhow!("no command named {}", args.name))?;

    let request = MoveCommandRequest {
        from_group: from_group.map(|g| g.as_str().to_string()).unwrap_or_default(),
        from_index,
        to_group: to_group.map(|g| g.as_str().to_string()).unwrap_or_default(),
        to_index: args.to_index,
    };
    let document = session.move_command(&args.name, &request).await?;
    Ok(result_for(args.name, "moved", document))
}

fn format_human(result: &CommandResult) -> String {
    format!(
        "Command {} {}. Commands: {}",
        result.name,
        result.action,
        result.commands.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn human_format_names_the_action() {
        let result = CommandResult {
            name: "run-app".into(),
            action: "created",
            commands: vec!["compile".into(), "run-app".into()],
        };
        assert_eq!(format_human(&result), "Command run-app created. Commands: compile, run-app");
    }

    #[test]
    fn result_lists_commands_from_the_snapshot() {
        use devbuilder_common::types::{Command, ExecCommand};
        let document = Document {
            commands: vec![Command {
                name: "compile".into(),
                group: None,
                is_default: false,
                kind: CommandKind::Exec(ExecCommand::default()),
            }],
            ..Default::default()
        };
        let result = result_for("compile".into(), "created", &document);
        assert_eq!(result.commands, ["compile"]);
    }
}
