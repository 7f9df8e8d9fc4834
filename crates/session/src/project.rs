// Read-side projections over the document snapshot. Pure functions;
// everything tolerates an empty document.

use devbuilder_common::types::{Command, CommandGroup, Document};

/// Names of all containers, in document order.
pub fn container_names(document: &Document) -> Vec<&str> {
    document.containers.iter().map(|c| c.name.as_str()).collect()
}

pub fn image_names(document: &Document) -> Vec<&str> {
    document.images.iter().map(|i| i.name.as_str()).collect()
}

pub fn resource_names(document: &Document) -> Vec<&str> {
    document.resources.iter().map(|r| r.name.as_str()).collect()
}

pub fn volume_names(document: &Document) -> Vec<&str> {
    document.volumes.iter().map(|v| v.name.as_str()).collect()
}

pub fn command_names(document: &Document) -> Vec<&str> {
    document.commands.iter().map(|c| c.name.as_str()).collect()
}

/// Commands in one group (or ungrouped when `group` is `None`), keeping
/// document order. The in-group index of a command is its position in
/// this list.
pub fn commands_in_group<'a>(
    document: &'a Document,
    group: Option<CommandGroup>,
) -> Vec<&'a Command> {
    document.commands.iter().filter(|command| command.group == group).collect()
}

/// Group-and-index position of a command, as the move endpoint expects.
pub fn position_of_command(
    document: &Document,
    name: &str,
) -> Option<(Option<CommandGroup>, usize)> {
    let command = document.commands.iter().find(|command| command.name == name)?;
    let index = commands_in_group(document, command.group)
        .iter()
        .position(|candidate| candidate.name == name)?;
    Some((command.group, index))
}

/// The default command of a group, if one is flagged.
pub fn default_command_for<'a>(
    document: &'a Document,
    group: CommandGroup,
) -> Option<&'a Command> {
    commands_in_group(document, Some(group)).into_iter().find(|command| command.is_default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use devbuilder_common::types::{CommandKind, ExecCommand};

    fn command(name: &str, group: Option<CommandGroup>, is_default: bool) -> Command {
        Command {
            name: name.into(),
            group,
            is_default,
            kind: CommandKind::Exec(ExecCommand::default()),
        }
    }

    fn sample_document() -> Document {
        Document {
            commands: vec![
                command("compile", Some(CommandGroup::Build), true),
                command("lint", None, false),
                command("package", Some(CommandGroup::Build), false),
                command("run-app", Some(CommandGroup::Run), false),
                command("format", None, false),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn empty_document_projects_to_empty_lists() {
        let document = Document::default();
        assert!(container_names(&document).is_empty());
        assert!(command_names(&document).is_empty());
        assert!(commands_in_group(&document, None).is_empty());
        assert!(position_of_command(&document, "anything").is_none());
    }

    #[test]
    fn grouping_preserves_document_order() {
        let document = sample_document();
        let build: Vec<_> =
            commands_in_group(&document, Some(CommandGroup::Build)).iter().map(|c| c.name.as_str()).collect();
        assert_eq!(build, ["compile", "package"]);

        let ungrouped: Vec<_> =
            commands_in_group(&document, None).iter().map(|c| c.name.as_str()).collect();
        assert_eq!(ungrouped, ["lint", "format"]);
    }

    #[test]
    fn position_is_relative_to_the_group() {
        let document = sample_document();
        assert_eq!(
            position_of_command(&document, "package"),
            Some((Some(CommandGroup::Build), 1))
        );
        assert_eq!(position_of_command(&document, "format"), Some((None, 1)));
        assert_eq!(position_of_command(&document, "missing"), None);
    }

    #[test]
    fn default_lookup_finds_the_flagged_command() {
        let document = sample_document();
        assert_eq!(
            default_command_for(&document, CommandGroup::Build).map(|c| c.name.as_str()),
            Some("compile")
        );
        assert!(default_command_for(&document, CommandGroup::Run).is_none());
    }
}
