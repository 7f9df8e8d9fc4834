// CLI subcommand dispatch.

use clap::Subcommand;
use std::future::Future;

use devbuilder_client::DevstateClient;
use devbuilder_session::controller::SessionController;
use devbuilder_session::draft::{AsyncValidity, Draft, EntityDraft};

use crate::config::CliConfig;

pub mod command;
pub mod container;
pub mod events;
pub mod image;
pub mod list;
pub mod metadata;
pub mod quantity;
pub mod resource;
pub mod rm;
pub mod status;
pub mod volume;
pub mod yaml;

#[derive(Subcommand)]
pub enum Command {
    /// Show server, metadata and entity summary
    Status(status::StatusArgs),
    /// List entities of one kind
    List(list::ListArgs),
    /// Create or edit a volume
    Volume(volume::VolumeArgs),
    /// Create or edit a container
    Container(container::ContainerArgs),
    /// Create or edit an image component
    Image(image::ImageArgs),
    /// Create or edit a cluster resource
    Resource(resource::ResourceArgs),
    /// Manage commands (exec, apply, image, composite, defaults, ordering)
    #[command(subcommand)]
    Command(command::CommandAction),
    /// Delete an entity
    Rm(rm::RmArgs),
    /// Replace the commands bound to a lifecycle event
    Events(events::EventsArgs),
    /// Update devfile metadata
    Metadata(metadata::MetadataArgs),
    /// Show or replace the raw devfile
    #[command(subcommand)]
    Yaml(yaml::YamlAction),
    /// Check a resource quantity string against the server
    Quantity(quantity::QuantityArgs),
}

pub fn run(cmd: Command) -> anyhow::Result<()> {
    match cmd {
        Command::Status(args) => status::run(args),
        Command::List(args) => list::run(args),
        Command::Volume(args) => volume::run(args),
        Command::Container(args) => container::run(args),
        Command::Image(args) => image::run(args),
        Command::Resource(args) => resource::run(args),
        Command::Command(action) => command::run(action),
        Command::Rm(args) => rm::run(args),
        Command::Events(args) => events::run(args),
        Command::Metadata(args) => metadata::run(args),
        Command::Yaml(action) => yaml::run(action),
        Command::Quantity(args) => quantity::run(args),
    }
}

/// Run an async command body on a fresh current-thread runtime (or the
/// ambient one, when called from async tests).
pub(crate) fn block_on<F: Future>(future: F) -> F::Output {
    match tokio::runtime::Handle::try_current() {
        Ok(handle) => handle.block_on(future),
        Err(_) => tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("tokio runtime should build")
            .block_on(future),
    }
}

/// Build a session from the loaded config and fetch the initial snapshot.
pub(crate) async fn loaded_session() -> anyhow::Result<SessionController> {
    let config = CliConfig::load();
    let client = config.client()?;
    let mut session = SessionController::new(client);
    session.load().await?;
    Ok(session)
}

/// Bail with every blocking field if the draft is not submittable.
pub(crate) fn ensure_submittable<T: EntityDraft>(draft: &Draft<T>) -> anyhow::Result<()> {
    let blocking = draft.blocking_fields();
    if blocking.is_empty() {
        return Ok(());
    }
    let summary = blocking
        .iter()
        .map(|(field, message)| format!("{field}: {message}"))
        .collect::<Vec<_>>()
        .join("; ");
    anyhow::bail!("invalid input: {summary}")
}

/// Run the remote quantity check for one draft field. An empty quantity
/// is valid without a server round trip.
pub(crate) async fn check_quantity<T: EntityDraft>(
    client: &DevstateClient,
    draft: &mut Draft<T>,
    field: &str,
    quantity: &str,
) -> anyhow::Result<()> {
    if quantity.is_empty() {
        draft.set_async_validity(field, AsyncValidity::Valid);
        return Ok(());
    }
    draft.set_async_validity(field, AsyncValidity::Pending);
    let validity = if client.quantity_valid(quantity).await? {
        AsyncValidity::Valid
    } else {
        AsyncValidity::Invalid(format!("{quantity} is not a valid quantity"))
    };
    draft.set_async_validity(field, validity);
    Ok(())
}
