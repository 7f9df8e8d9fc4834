// Session lifecycle: load the snapshot once, then funnel every mutation
// through the gateway and adopt whatever document comes back. The
// controller never merges or patches locally; the server's snapshot is
// the only source of truth.

use devbuilder_client::requests::MoveCommandRequest;
use devbuilder_client::{DevstateClient, DevstateError};
use devbuilder_common::types::{CommandGroup, Document, EventKind, Metadata};

use crate::orchestrate::{self, Submission, SubmitError};

/// Session state. Until the first snapshot lands every operation that
/// needs a document is unavailable; a failed load stays in `Loading`
/// and reports the error instead of retrying on its own.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Loading,
    Ready(Document),
}

/// Owner of the authoritative document snapshot for one editing session.
#[derive(Debug)]
pub struct SessionController {
    client: DevstateClient,
    state: SessionState,
}

impl SessionController {
    pub fn new(client: DevstateClient) -> Self {
        Self { client, state: SessionState::Loading }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// The current snapshot, if the session has loaded.
    pub fn document(&self) -> Option<&Document> {
        match &self.state {
            SessionState::Loading => None,
            SessionState::Ready(document) => Some(document),
        }
    }

    pub fn client(&self) -> &DevstateClient {
        &self.client
    }

    /// Fetch the initial snapshot. On failure the session stays in
    /// `Loading` and the error is returned to the caller.
    pub async fn load(&mut self) -> Result<&Document, DevstateError> {
        let document = self.client.get_devfile().await?;
        self.adopt(document);
        Ok(self.document_after_adopt())
    }

    /// Replace the local snapshot with a confirmed one from the server.
    pub fn adopt(&mut self, document: Document) {
        self.state = SessionState::Ready(document);
    }

    /// Run a draft submission and adopt the resulting snapshot.
    pub async fn submit(&mut self, submission: &Submission) -> Result<&Document, SubmitError> {
        let document = orchestrate::submit(&self.client, submission).await?;
        self.adopt(document);
        Ok(self.document_after_adopt())
    }

    // ── Direct mutations ────────────────────────────────────────────

    pub async fn delete_command(&mut self, name: &str) -> Result<&Document, DevstateError> {
        let document = self.client.delete_command(name).await?;
        self.adopt(document);
        Ok(self.document_after_adopt())
    }

    pub async fn delete_container(&mut self, name: &str) -> Result<&Document, DevstateError> {
        let document = self.client.delete_container(name).await?;
        self.adopt(document);
        Ok(self.document_after_adopt())
    }

    pub async fn delete_image(&mut self, name: &str) -> Result<&Document, DevstateError> {
        let document = self.client.delete_image(name).await?;
        self.adopt(document);
        Ok(self.document_after_adopt())
    }

    pub async fn delete_resource(&mut self, name: &str) -> Result<&Document, DevstateError> {
        let document = self.client.delete_resource(name).await?;
        self.adopt(document);
        Ok(self.document_after_adopt())
    }

    pub async fn delete_volume(&mut self, name: &str) -> Result<&Document, DevstateError> {
        let document = self.client.delete_volume(name).await?;
        self.adopt(document);
        Ok(self.document_after_adopt())
    }

    pub async fn set_default_command(
        &mut self,
        name: &str,
        group: CommandGroup,
    ) -> Result<&Document, DevstateError> {
        let document = self.client.set_default_command(name, group).await?;
        self.adopt(document);
        Ok(self.document_after_adopt())
    }

    pub async fn unset_default_command(&mut self, name: &str) -> Result<&Document, DevstateError> {
        let document = self.client.unset_default_command(name).await?;
        self.adopt(document);
        Ok(self.document_after_adopt())
    }

    pub async fn move_command(
        &mut self,
        name: &str,
        request: &MoveCommandRequest,
    ) -> Result<&Document, DevstateError> {
        let document = self.client.move_command(name, request).await?;
        self.adopt(document);
        Ok(self.document_after_adopt())
    }

    pub async fn update_events(
        &mut self,
        event: EventKind,
        commands: &[String],
    ) -> Result<&Document, DevstateError> {
        let document = self.client.update_events(event, commands).await?;
        self.adopt(document);
        Ok(self.document_after_adopt())
    }

    pub async fn set_metadata(&mut self, metadata: &Metadata) -> Result<&Document, DevstateError> {
        let document = self.client.set_metadata(metadata).await?;
        self.adopt(document);
        Ok(self.document_after_adopt())
    }

    pub async fn set_devfile_content(
        &mut self,
        content: &str,
    ) -> Result<&Document, DevstateError> {
        let document = self.client.set_devfile_content(content).await?;
        self.adopt(document);
        Ok(self.document_after_adopt())
    }

    fn document_after_adopt(&self) -> &Document {
        match &self.state {
            SessionState::Ready(document) => document,
            SessionState::Loading => unreachable!("a snapshot was just adopted"),
        }
    }
}
