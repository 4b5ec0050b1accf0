//! Controller task: owns the [`ViewController`] and applies requests one at
//! a time, publishing a fresh snapshot after each.
//!
//! Because the task drains a single queue, a navigation that is still
//! loading finishes before the next request is looked at. Snapshots always
//! describe a settled state.

use secrecy::SecretString;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use trunkdesk_core::{Page, RecordId, ViewController};

use crate::action::Action;

#[derive(Debug)]
pub enum ControllerRequest {
    Start,
    Login {
        username: String,
        password: SecretString,
    },
    Logout,
    Navigate(Page),
    Reload,
    OpenAdd,
    OpenEdit(RecordId),
    SetField {
        index: usize,
        value: String,
    },
    Save,
    CancelModal,
    RequestDelete(RecordId),
    ConfirmDelete,
    DeclineDelete,
    DismissBanner,
}

impl ControllerRequest {
    /// Whether the request may hit the network.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Self::Start
                | Self::Login { .. }
                | Self::Navigate(_)
                | Self::Reload
                | Self::Save
                | Self::ConfirmDelete
        )
    }
}

/// Apply one request to the controller.
pub async fn apply(view: &mut ViewController, request: ControllerRequest) {
    match request {
        ControllerRequest::Start => view.start().await,
        ControllerRequest::Login { username, password } => {
            view.login(&username, &password).await;
        }
        ControllerRequest::Logout => view.logout(),
        ControllerRequest::Navigate(page) => view.navigate(page).await,
        ControllerRequest::Reload => view.reload().await,
        ControllerRequest::OpenAdd => view.open_add(),
        ControllerRequest::OpenEdit(id) => view.open_edit(id),
        ControllerRequest::SetField { index, value } => view.set_field(index, value),
        ControllerRequest::Save => view.save().await,
        ControllerRequest::CancelModal => view.cancel_modal(),
        ControllerRequest::RequestDelete(id) => view.request_delete(id),
        ControllerRequest::ConfirmDelete => view.confirm_delete().await,
        ControllerRequest::DeclineDelete => view.decline_delete(),
        ControllerRequest::DismissBanner => view.dismiss_banner(),
    }
}

/// Spawn the controller task and return its request queue.
pub fn spawn_controller(
    view: ViewController,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) -> mpsc::UnboundedSender<ControllerRequest> {
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(run(view, rx, action_tx, cancel));
    tx
}

async fn run(
    mut view: ViewController,
    mut requests: mpsc::UnboundedReceiver<ControllerRequest>,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    info!("controller task started");

    loop {
        let request = tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            next = requests.recv() => match next {
                Some(request) => request,
                None => break,
            },
        };

        debug!(?request, "applying controller request");
        apply(&mut view, request).await;

        if action_tx
            .send(Action::ViewUpdated(Box::new(view.snapshot())))
            .is_err()
        {
            break;
        }
    }

    info!("controller task stopped");
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::sync::Arc;

    use serde_json::json;
    use trunkdesk_core::{ClientConfig, Inventory, PageData, SessionStore};
    use url::Url;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn controller(server: &MockServer) -> ViewController {
        let config = ClientConfig::new(Url::parse(&server.uri()).unwrap());
        let inventory = Inventory::new(&config, Arc::new(SessionStore::in_memory())).unwrap();
        ViewController::new(inventory)
    }

    async fn next_snapshot(rx: &mut mpsc::UnboundedReceiver<Action>) -> trunkdesk_core::ViewSnapshot {
        match rx.recv().await {
            Some(Action::ViewUpdated(snapshot)) => *snapshot,
            other => panic!("expected ViewUpdated, got {other:?}"),
        }
    }

    #[test]
    fn remote_requests_are_flagged() {
        assert!(ControllerRequest::Reload.is_remote());
        assert!(ControllerRequest::Navigate(Page::Dids).is_remote());
        assert!(!ControllerRequest::OpenAdd.is_remote());
        assert!(!ControllerRequest::DismissBanner.is_remote());
    }

    #[tokio::test]
    async fn publishes_snapshot_after_each_request_in_order() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .and(body_json(json!({ "username": "admin", "password": "pw" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "token": "t0k", "username": "admin", "role": "admin"
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/dashboard"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "statsByAreaCode": {},
                "totalNSOTrunks": 0,
                "totalVNOTrunks": 0,
                "totalDIDs": 0
            })))
            .mount(&server)
            .await;

        let (action_tx, mut action_rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let requests = spawn_controller(controller(&server), action_tx, cancel.clone());

        requests.send(ControllerRequest::Start).unwrap();
        requests
            .send(ControllerRequest::Login {
                username: "admin".into(),
                password: SecretString::from("pw"),
            })
            .unwrap();
        requests.send(ControllerRequest::Logout).unwrap();

        assert!(!next_snapshot(&mut action_rx).await.is_authenticated());

        let logged_in = next_snapshot(&mut action_rx).await;
        assert!(logged_in.can_edit());
        assert_eq!(logged_in.page(), Page::Dashboard);
        assert!(matches!(logged_in.data, PageData::Dashboard(_)));

        assert!(!next_snapshot(&mut action_rx).await.is_authenticated());
        cancel.cancel();
    }

    #[tokio::test]
    async fn rejected_login_reports_banner() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let mut view = controller(&server);
        apply(
            &mut view,
            ControllerRequest::Login {
                username: "admin".into(),
                password: SecretString::from("nope"),
            },
        )
        .await;

        let snapshot = view.snapshot();
        assert!(!snapshot.is_authenticated());
        assert_eq!(snapshot.banner.as_deref(), Some("Invalid credentials"));

        apply(&mut view, ControllerRequest::DismissBanner).await;
        assert_eq!(view.snapshot().banner, None);
    }
}
