// End-to-end session flows against a stateful in-process devstate mock.
// The mock keeps a real document that grows with each create, so the
// tests observe both the request sequence and the snapshots the session
// adopts.

use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};

use devbuilder_client::requests::VolumeRequest;
use devbuilder_client::DevstateClient;
use devbuilder_session::controller::{SessionController, SessionState};
use devbuilder_session::draft::{
    ContainerDraft, Draft, ExecCommandDraft, MountDraft, Selection, VolumeDraft,
};
use devbuilder_session::orchestrate::{PrimaryRequest, Submission, SubmitError};

#[derive(Default)]
struct DevstateDoc {
    volumes: Vec<serde_json::Value>,
    containers: Vec<serde_json::Value>,
    commands: Vec<serde_json::Value>,
    revision: usize,
}

impl DevstateDoc {
    fn snapshot(&self) -> serde_json::Value {
        serde_json::json!({
            "content": format!("revision-{}", self.revision),
            "volumes": self.volumes,
            "containers": self.containers,
            "commands": self.commands,
        })
    }
}

#[derive(Clone, Default)]
struct MockDevstate {
    doc: Arc<Mutex<DevstateDoc>>,
    calls: Arc<Mutex<Vec<String>>>,
    /// Entity names whose creation the server rejects.
    rejected_names: Arc<Mutex<Vec<String>>>,
}

impl MockDevstate {
    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn reject_name(&self, name: &str) {
        self.rejected_names.lock().unwrap().push(name.to_string());
    }
}

async fn handle(
    State(state): State<MockDevstate>,
    method: Method,
    uri: Uri,
    body: String,
) -> Response {
    let body_json: serde_json::Value =
        serde_json::from_str(&body).unwrap_or(serde_json::Value::Null);
    state.calls.lock().unwrap().push(format!("{method} {}", uri.path()));

    let name = body_json["name"].as_str().unwrap_or_default().to_string();
    if state.rejected_names.lock().unwrap().contains(&name) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "message": format!("{name} already exists") })),
        )
            .into_response();
    }

    let mut doc = state.doc.lock().unwrap();
    match (method.as_str(), uri.path()) {
        ("GET", "/api/v1/devstate/devfile") => {}
        ("POST", "/api/v1/devstate/volume") => {
            doc.volumes.push(body_json);
            doc.revision += 1;
        }
        ("POST", "/api/v1/devstate/container") => {
            doc.containers.push(body_json);
            doc.revision += 1;
        }
        ("POST", "/api/v1/devstate/execCommand") => {
            doc.commands.push(serde_json::json!({
                "name": body_json["name"],
                "type": "exec",
                "commandLine": body_json["commandLine"],
                "component": body_json["component"],
            }));
            doc.revision += 1;
        }
        _ => {
            doc.revision += 1;
        }
    }
    Json(doc.snapshot()).into_response()
}

async fn spawn_mock() -> (MockDevstate, SessionController) {
    let state = MockDevstate::default();
    let app = Router::new().fallback(handle).with_state(state.clone());
    let listener =
        tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("mock listener should bind");
    let addr = listener.local_addr().expect("mock listener should expose local address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("mock devstate should serve");
    });
    let client =
        DevstateClient::new(&format!("http://{addr}")).expect("client should build for mock URL");
    (state, SessionController::new(client))
}

fn container_with_new_volume() -> Draft<ContainerDraft> {
    Draft::creating(ContainerDraft {
        name: "app".into(),
        image: "node:18".into(),
        mounts: vec![MountDraft {
            volume: Selection::CreateNew(VolumeDraft {
                name: "shared-data".into(),
                ephemeral: false,
                size: "1Gi".into(),
            }),
            path: "/data".into(),
        }],
        ..Default::default()
    })
}

#[tokio::test]
async fn failed_initial_load_keeps_the_session_in_loading() {
    // Nothing listens on this port.
    let client = DevstateClient::new("http://127.0.0.1:1").expect("client should build");
    let mut session = SessionController::new(client);

    session.load().await.expect_err("load should fail");
    assert_eq!(session.state(), &SessionState::Loading);
    assert!(session.document().is_none());
}

#[tokio::test]
async fn container_with_inline_volume_creates_both_in_order() {
    let (mock, mut session) = spawn_mock().await;
    session.load().await.expect("load should succeed");

    let draft = container_with_new_volume();
    assert!(draft.is_submittable());

    let (request, dependents) = draft.into_value().into_submission();
    let submission = Submission::create(PrimaryRequest::Container(request), dependents);
    let document = session.submit(&submission).await.expect("submission should succeed");

    // Exactly one volume create, then one container create, strictly in
    // that order after the initial load.
    let calls = mock.calls();
    assert_eq!(
        calls,
        [
            "GET /api/v1/devstate/devfile",
            "POST /api/v1/devstate/volume",
            "POST /api/v1/devstate/container",
        ]
    );

    assert_eq!(document.volumes.len(), 1);
    assert_eq!(document.volumes[0].name, "shared-data");
    assert_eq!(document.volumes[0].size, "1Gi");
    assert_eq!(document.containers.len(), 1);
    assert_eq!(document.containers[0].name, "app");
    assert_eq!(document.containers[0].volume_mounts[0].name, "shared-data");
    assert_eq!(document.containers[0].volume_mounts[0].path, "/data");
}

#[tokio::test]
async fn exec_command_with_inline_container_creates_volume_container_command() {
    let (mock, mut session) = spawn_mock().await;
    session.load().await.expect("load should succeed");

    let draft = ExecCommandDraft {
        name: "run-app".into(),
        command_line: "npm start".into(),
        working_dir: "/app".into(),
        container: Selection::CreateNew(container_with_new_volume().into_value()),
        hot_reload_capable: true,
    };
    let (request, dependents) = draft.into_submission();
    let submission = Submission::create(PrimaryRequest::ExecCommand(request), dependents);
    let document = session.submit(&submission).await.expect("submission should succeed");

    let calls = mock.calls();
    assert_eq!(
        calls[1..],
        [
            "POST /api/v1/devstate/volume",
            "POST /api/v1/devstate/container",
            "POST /api/v1/devstate/execCommand",
        ]
    );
    assert_eq!(document.commands.len(), 1);
    assert_eq!(document.commands[0].name, "run-app");
}

#[tokio::test]
async fn dependent_failure_aborts_everything_after_it() {
    let (mock, mut session) = spawn_mock().await;
    session.load().await.expect("load should succeed");
    mock.reject_name("shared-data");

    let (request, dependents) = container_with_new_volume().into_value().into_submission();
    let submission = Submission::create(PrimaryRequest::Container(request), dependents);
    let error = session.submit(&submission).await.expect_err("submission should fail");

    match &error {
        SubmitError::Dependent { kind, name, .. } => {
            assert_eq!(*kind, "volume");
            assert_eq!(name, "shared-data");
        }
        SubmitError::Primary(_) => panic!("the failing entity was a dependent"),
    }
    assert_eq!(error.user_message(), "creating volume shared-data failed: shared-data already exists");

    // The container create was never attempted.
    let calls = mock.calls();
    assert_eq!(calls, ["GET /api/v1/devstate/devfile", "POST /api/v1/devstate/volume"]);
}

#[tokio::test]
async fn failed_submission_leaves_the_previous_snapshot_in_place() {
    let (mock, mut session) = spawn_mock().await;
    session.load().await.expect("load should succeed");
    let before = session.document().expect("session should be ready").clone();

    mock.reject_name("app");
    let submission = Submission::create(
        PrimaryRequest::Volume(VolumeRequest { name: "app".into(), ..Default::default() }),
        Vec::new(),
    );
    session.submit(&submission).await.expect_err("submission should fail");

    assert_eq!(session.document(), Some(&before));
}

#[tokio::test]
async fn each_confirmed_mutation_replaces_the_snapshot_wholesale() {
    let (_mock, mut session) = spawn_mock().await;
    session.load().await.expect("load should succeed");
    assert_eq!(session.document().map(|d| d.content.as_str()), Some("revision-0"));

    let first = Submission::create(
        PrimaryRequest::Volume(VolumeRequest { name: "a".into(), ..Default::default() }),
        Vec::new(),
    );
    session.submit(&first).await.expect("first submission should succeed");
    assert_eq!(session.document().map(|d| d.content.as_str()), Some("revision-1"));

    let second = Submission::create(
        PrimaryRequest::Volume(VolumeRequest { name: "b".into(), ..Default::default() }),
        Vec::new(),
    );
    session.submit(&second).await.expect("second submission should succeed");
    let document = session.document().expect("session should be ready");
    assert_eq!(document.content, "revision-2");
    assert_eq!(document.volumes.len(), 2);
}

#[tokio::test]
async fn delete_adopts_the_server_snapshot() {
    let (mock, mut session) = spawn_mock().await;
    session.load().await.expect("load should succeed");

    session.delete_volume("cache").await.expect("delete should succeed");
    assert_eq!(session.document().map(|d| d.content.as_str()), Some("revision-1"));
    assert_eq!(mock.calls()[1], "DELETE /api/v1/devstate/volume/cache");
}
