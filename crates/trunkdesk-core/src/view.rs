// ── View controller ──
//
// Page/modal/confirmation state machine shared by the front ends. Every
// transition takes `&mut self`, so transitions never overlap: a navigation
// cannot land its data on a page the operator has already left.
//
//   Unauthenticated ──login ok──▶ Authenticated(dashboard)
//   Authenticated ──logout──▶ Unauthenticated
//   Authenticated: navigate / open_add / open_edit / save / request_delete ...

use secrecy::SecretString;
use strum::{EnumIter, IntoEnumIterator};
use tracing::{debug, warn};

use crate::dashboard::DashboardStats;
use crate::error::{CoreError, Operation};
use crate::form::EditForm;
use crate::inventory::Inventory;
use crate::model::{EntityKind, RecordId, RecordView, UserIdentity};

// ── Pages ───────────────────────────────────────────────────────────

/// Navigation targets, in menu order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumIter)]
pub enum Page {
    #[default]
    Dashboard,
    Nso,
    Vno,
    Mapping,
    Dids,
    Customers,
}

impl Page {
    /// The entity listed on this page; `None` for the dashboard.
    pub fn entity_kind(self) -> Option<EntityKind> {
        match self {
            Self::Dashboard => None,
            Self::Nso => Some(EntityKind::NsoTrunk),
            Self::Vno => Some(EntityKind::VnoTrunk),
            Self::Mapping => Some(EntityKind::TrunkMapping),
            Self::Dids => Some(EntityKind::Did),
            Self::Customers => Some(EntityKind::Customer),
        }
    }

    pub fn label(self) -> &'static str {
        self.entity_kind().map_or("Dashboard", EntityKind::label)
    }

    /// 0-based position in the menu.
    pub fn index(self) -> usize {
        Self::iter().position(|p| p == self).unwrap_or(0)
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::iter().nth(index)
    }

    pub fn next(self) -> Self {
        Self::from_index(self.index() + 1).unwrap_or(Self::Dashboard)
    }

    pub fn prev(self) -> Self {
        match self.index() {
            0 => Self::Customers,
            i => Self::from_index(i - 1).unwrap_or(Self::Dashboard),
        }
    }
}

// ── State ───────────────────────────────────────────────────────────

/// A delete awaiting the operator's yes/no.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingDelete {
    pub kind: EntityKind,
    pub id: RecordId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedView {
    pub user: UserIdentity,
    pub page: Page,
    pub modal: Option<EditForm>,
    pub pending_delete: Option<PendingDelete>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ViewState {
    #[default]
    Unauthenticated,
    Authenticated(AuthenticatedView),
}

/// What the current page shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PageData {
    #[default]
    Empty,
    Dashboard(DashboardStats),
    Rows {
        kind: EntityKind,
        rows: Vec<RecordView>,
    },
}

/// Immutable copy of everything a front end needs to render.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewSnapshot {
    pub state: ViewState,
    pub data: PageData,
    pub banner: Option<String>,
}

impl ViewSnapshot {
    pub fn authenticated(&self) -> Option<&AuthenticatedView> {
        match &self.state {
            ViewState::Authenticated(view) => Some(view),
            ViewState::Unauthenticated => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated().is_some()
    }

    pub fn page(&self) -> Page {
        self.authenticated().map_or(Page::Dashboard, |v| v.page)
    }

    pub fn can_edit(&self) -> bool {
        self.authenticated().is_some_and(|v| v.user.is_admin())
    }

    pub fn modal(&self) -> Option<&EditForm> {
        self.authenticated().and_then(|v| v.modal.as_ref())
    }

    pub fn pending_delete(&self) -> Option<PendingDelete> {
        self.authenticated().and_then(|v| v.pending_delete)
    }

    pub fn rows(&self) -> &[RecordView] {
        match &self.data {
            PageData::Rows { rows, .. } => rows,
            _ => &[],
        }
    }
}

// ── Controller ──────────────────────────────────────────────────────

pub struct ViewController {
    inventory: Inventory,
    state: ViewState,
    data: PageData,
    banner: Option<String>,
}

impl ViewController {
    pub fn new(inventory: Inventory) -> Self {
        Self {
            inventory,
            state: ViewState::Unauthenticated,
            data: PageData::Empty,
            banner: None,
        }
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn data(&self) -> &PageData {
        &self.data
    }

    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot {
            state: self.state.clone(),
            data: self.data.clone(),
            banner: self.banner.clone(),
        }
    }

    pub fn can_edit(&self) -> bool {
        self.authed().is_some_and(|v| v.user.is_admin())
    }

    fn authed(&self) -> Option<&AuthenticatedView> {
        match &self.state {
            ViewState::Authenticated(view) => Some(view),
            ViewState::Unauthenticated => None,
        }
    }

    fn authed_mut(&mut self) -> Option<&mut AuthenticatedView> {
        match &mut self.state {
            ViewState::Authenticated(view) => Some(view),
            ViewState::Unauthenticated => None,
        }
    }

    fn fail(&mut self, err: &CoreError) {
        warn!(error = %err, source = ?std::error::Error::source(err), "{}", err.banner());
        self.banner = Some(err.banner().to_owned());
    }

    fn enter(&mut self, user: UserIdentity) {
        self.state = ViewState::Authenticated(AuthenticatedView {
            user,
            page: Page::Dashboard,
            modal: None,
            pending_delete: None,
        });
    }

    // ── Session transitions ──────────────────────────────────────────

    /// Resume a persisted session, if there is one, and load the dashboard.
    pub async fn start(&mut self) {
        if let Some(user) = self.inventory.session().restore() {
            self.enter(user);
            self.reload().await;
        }
    }

    pub async fn login(&mut self, username: &str, password: &SecretString) {
        match self.inventory.login(username, password).await {
            Ok(user) => {
                self.banner = None;
                self.enter(user);
                self.reload().await;
            }
            Err(e) => {
                self.state = ViewState::Unauthenticated;
                self.fail(&e);
            }
        }
    }

    pub fn logout(&mut self) {
        self.inventory.logout();
        self.state = ViewState::Unauthenticated;
        self.data = PageData::Empty;
        self.banner = None;
    }

    // ── Navigation ───────────────────────────────────────────────────

    /// Switch pages and fetch fresh data. Open dialogs are dropped.
    pub async fn navigate(&mut self, page: Page) {
        let Some(view) = self.authed_mut() else {
            return;
        };
        view.page = page;
        view.modal = None;
        view.pending_delete = None;
        self.reload().await;
    }

    /// Re-fetch the current page.
    pub async fn reload(&mut self) {
        let Some(page) = self.authed().map(|v| v.page) else {
            return;
        };
        debug!(page = page.label(), "loading page");

        let result = match page.entity_kind() {
            None => self.inventory.dashboard().await.map(PageData::Dashboard),
            Some(kind) => self
                .inventory
                .list_views(kind)
                .await
                .map(|rows| PageData::Rows { kind, rows }),
        };

        match result {
            Ok(data) => self.data = data,
            Err(e) => {
                self.data = PageData::Empty;
                self.fail(&e);
            }
        }
    }

    // ── Edit modal ───────────────────────────────────────────────────

    fn current_kind(&self) -> Option<EntityKind> {
        self.authed().and_then(|v| v.page.entity_kind())
    }

    fn require_admin(&mut self, operation: Operation) -> bool {
        if self.can_edit() {
            return true;
        }
        self.fail(&CoreError::PermissionDenied { operation });
        false
    }

    /// Open the modal with a blank record of the current page's kind.
    pub fn open_add(&mut self) {
        let Some(kind) = self.current_kind() else {
            return;
        };
        if !self.require_admin(Operation::Save) {
            return;
        }
        if let Some(view) = self.authed_mut() {
            view.modal = Some(EditForm::for_add(kind));
        }
    }

    /// Open the modal with a copy of a listed record.
    pub fn open_edit(&mut self, id: RecordId) {
        let Some(kind) = self.current_kind() else {
            return;
        };
        if !self.require_admin(Operation::Save) {
            return;
        }
        let Some(row) = self.snapshot_row(id) else {
            self.fail(&CoreError::NotFound { kind, id });
            return;
        };
        if let Some(view) = self.authed_mut() {
            view.modal = Some(EditForm::for_edit(kind, &row));
        }
    }

    fn snapshot_row(&self, id: RecordId) -> Option<RecordView> {
        match &self.data {
            PageData::Rows { rows, .. } => rows.iter().find(|r| r.id == id).cloned(),
            _ => None,
        }
    }

    pub fn set_field(&mut self, index: usize, value: impl Into<String>) {
        if let Some(form) = self.authed_mut().and_then(|v| v.modal.as_mut()) {
            form.set(index, value);
        }
    }

    /// Save the open form. Success closes the modal and reloads; failure
    /// keeps the modal open with the save banner.
    pub async fn save(&mut self) {
        let Some(form) = self.authed().and_then(|v| v.modal.clone()) else {
            return;
        };
        match self.inventory.save_form(&form).await {
            Ok(id) => {
                debug!(kind = %form.kind, %id, "saved");
                if let Some(view) = self.authed_mut() {
                    view.modal = None;
                }
                self.banner = None;
                self.reload().await;
            }
            Err(e) => self.fail(&e),
        }
    }

    pub fn cancel_modal(&mut self) {
        if let Some(view) = self.authed_mut() {
            view.modal = None;
        }
    }

    // ── Delete confirmation ──────────────────────────────────────────

    /// Ask for confirmation before deleting a row of the current page.
    pub fn request_delete(&mut self, id: RecordId) {
        let Some(kind) = self.current_kind() else {
            return;
        };
        if !self.require_admin(Operation::Delete) {
            return;
        }
        if let Some(view) = self.authed_mut() {
            view.pending_delete = Some(PendingDelete { kind, id });
        }
    }

    pub async fn confirm_delete(&mut self) {
        let Some(pending) = self.authed_mut().and_then(|v| v.pending_delete.take()) else {
            return;
        };
        match self.inventory.delete_kind(pending.kind, pending.id).await {
            Ok(()) => self.reload().await,
            Err(e) => self.fail(&e),
        }
    }

    /// Drop the pending delete. No request, no banner.
    pub fn decline_delete(&mut self) {
        if let Some(view) = self.authed_mut() {
            view.pending_delete = None;
        }
    }

    pub fn dismiss_banner(&mut self) {
        self.banner = None;
    }
}
