//! Business logic shared by the `trunkdesk` CLI and TUI.
//!
//! - **[`SessionStore`]**: the live bearer token and user, mirrored into a
//!   pluggable [`SessionPersistence`] adapter. It is also the API client's
//!   token source.
//!
//! - **[`Inventory`]**: CRUD façade over the five record kinds. Typed access
//!   goes through [`Resource<F>`](inventory::Resource); the kind-erased
//!   [`list_views`](Inventory::list_views) / [`save_form`](Inventory::save_form)
//!   / [`delete_kind`](Inventory::delete_kind) drive generic screens.
//!
//! - **[`dashboard`]**: per-area-code channel utilization, either normalized
//!   from the server or recomputed with [`dashboard::aggregate`].
//!
//! - **[`ViewController`]**: page, modal, and delete-confirmation state
//!   machine. Front ends render its [`ViewSnapshot`].

pub mod config;
pub mod dashboard;
pub mod error;
pub mod form;
pub mod inventory;
pub mod model;
pub mod session;
pub mod view;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{ClientConfig, TlsVerification};
pub use dashboard::{AreaCodeStats, DashboardStats};
pub use error::{CoreError, Operation};
pub use form::{EditForm, FormTarget};
pub use inventory::{Inventory, Resource};
pub use session::{MemorySessionStore, SessionPersistence, SessionStore};
pub use view::{
    AuthenticatedView, Page, PageData, PendingDelete, ViewController, ViewSnapshot, ViewState,
};

pub use model::{
    Customer, CustomerFields, Did, DidFields, DidStatus, EntityFields, EntityKind, FieldKind,
    FieldSpec, NsoTrunk, NsoTrunkFields, Record, RecordId, RecordView, Role, Session, Staged,
    TrunkMapping, TrunkMappingFields, TrunkStatus, TrunkType, UserIdentity, VnoTrunk,
    VnoTrunkFields,
};
