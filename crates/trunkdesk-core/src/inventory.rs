// ── Entity CRUD façade ──
//
// `Inventory` owns the API client and the session. `Resource<F>` gives the
// typed list/create/update/delete for one kind; the kind-erased entry points
// at the bottom let the view layer work straight from the field tables.
// Mutations check the admin role before anything is sent.

use std::marker::PhantomData;
use std::sync::Arc;

use secrecy::SecretString;
use tracing::{debug, warn};
use trunkdesk_api::ApiClient;

use crate::config::ClientConfig;
use crate::dashboard::{self, DashboardStats};
use crate::error::{CoreError, Operation};
use crate::form::{EditForm, FormTarget};
use crate::model::{
    CustomerFields, DidFields, EntityFields, EntityKind, NsoTrunkFields, Record, RecordId,
    RecordView, Staged, TrunkMappingFields, UserIdentity, VnoTrunkFields,
};
use crate::session::SessionStore;

// ── Inventory ───────────────────────────────────────────────────────

/// Entry point for every read and write against the inventory server.
pub struct Inventory {
    client: ApiClient,
    session: Arc<SessionStore>,
}

impl Inventory {
    /// Build a client for `config` whose bearer token comes from `session`.
    pub fn new(config: &ClientConfig, session: Arc<SessionStore>) -> Result<Self, CoreError> {
        let client = ApiClient::new(
            config.base_url.as_str(),
            &config.transport(),
            Arc::clone(&session) as Arc<dyn trunkdesk_api::TokenProvider>,
        )
        .map_err(|e| CoreError::Config {
            message: e.to_string(),
        })?;
        Ok(Self { client, session })
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    // ── Session ──────────────────────────────────────────────────────

    pub async fn login(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<UserIdentity, CoreError> {
        self.session.login(&self.client, username, password).await
    }

    pub fn logout(&self) {
        self.session.clear();
    }

    // ── Typed resources ──────────────────────────────────────────────

    pub fn resource<F: EntityFields>(&self) -> Resource<'_, F> {
        Resource {
            inventory: self,
            _fields: PhantomData,
        }
    }

    pub fn nso_trunks(&self) -> Resource<'_, NsoTrunkFields> {
        self.resource()
    }

    pub fn vno_trunks(&self) -> Resource<'_, VnoTrunkFields> {
        self.resource()
    }

    pub fn customers(&self) -> Resource<'_, CustomerFields> {
        self.resource()
    }

    pub fn mappings(&self) -> Resource<'_, TrunkMappingFields> {
        self.resource()
    }

    pub fn dids(&self) -> Resource<'_, DidFields> {
        self.resource()
    }

    // ── Dashboard ────────────────────────────────────────────────────

    /// Server-computed stats, normalized.
    pub async fn dashboard(&self) -> Result<DashboardStats, CoreError> {
        let wire = self.client.dashboard().await.map_err(CoreError::load)?;
        Ok(DashboardStats::from_wire(&wire))
    }

    /// Stats recomputed locally from the four record lists.
    pub async fn compute_stats(&self) -> Result<DashboardStats, CoreError> {
        let (nso, vno, mappings, dids) =
            (self.nso_trunks(), self.vno_trunks(), self.mappings(), self.dids());
        let (nso, vno, mappings, dids) =
            tokio::try_join!(nso.list(), vno.list(), mappings.list(), dids.list())?;
        Ok(dashboard::aggregate(&nso, &vno, &mappings, &dids))
    }

    // ── Kind-erased entry points ─────────────────────────────────────

    /// List any kind as display rows.
    pub async fn list_views(&self, kind: EntityKind) -> Result<Vec<RecordView>, CoreError> {
        match kind {
            EntityKind::NsoTrunk => self.views::<NsoTrunkFields>().await,
            EntityKind::VnoTrunk => self.views::<VnoTrunkFields>().await,
            EntityKind::Customer => self.views::<CustomerFields>().await,
            EntityKind::TrunkMapping => self.views::<TrunkMappingFields>().await,
            EntityKind::Did => self.views::<DidFields>().await,
        }
    }

    /// Fetch one row by id.
    pub async fn find_view(&self, kind: EntityKind, id: RecordId) -> Result<RecordView, CoreError> {
        self.list_views(kind)
            .await?
            .into_iter()
            .find(|row| row.id == id)
            .ok_or(CoreError::NotFound { kind, id })
    }

    /// Parse and save an edit form; returns the id of the saved record.
    pub async fn save_form(&self, form: &EditForm) -> Result<RecordId, CoreError> {
        match form.kind {
            EntityKind::NsoTrunk => self.save_values::<NsoTrunkFields>(form).await,
            EntityKind::VnoTrunk => self.save_values::<VnoTrunkFields>(form).await,
            EntityKind::Customer => self.save_values::<CustomerFields>(form).await,
            EntityKind::TrunkMapping => self.save_values::<TrunkMappingFields>(form).await,
            EntityKind::Did => self.save_values::<DidFields>(form).await,
        }
    }

    /// Delete a record of any kind. Confirmation is the caller's job.
    pub async fn delete_kind(&self, kind: EntityKind, id: RecordId) -> Result<(), CoreError> {
        self.session.require_admin(Operation::Delete)?;
        self.client
            .remove(kind.path(), id.get())
            .await
            .map_err(|e| {
                warn!(%kind, %id, error = %e, "delete failed");
                CoreError::delete(e)
            })?;
        debug!(%kind, %id, "record deleted");
        Ok(())
    }

    async fn views<F: EntityFields>(&self) -> Result<Vec<RecordView>, CoreError> {
        let records = self.resource::<F>().list().await?;
        Ok(records.iter().map(RecordView::from).collect())
    }

    async fn save_values<F: EntityFields>(&self, form: &EditForm) -> Result<RecordId, CoreError> {
        self.session.require_admin(Operation::Save)?;
        let fields = F::from_values(&form.values)?;
        let staged = match form.target {
            FormTarget::Draft => Staged::Draft(fields),
            FormTarget::Persisted(id) => Staged::Persisted(Record::new(id, fields)),
        };
        let saved = self.resource::<F>().save(staged).await?;
        Ok(saved.id)
    }
}

// ── Resource ────────────────────────────────────────────────────────

/// Typed CRUD for one entity kind.
pub struct Resource<'a, F> {
    inventory: &'a Inventory,
    _fields: PhantomData<F>,
}

impl<F: EntityFields> Resource<'_, F> {
    fn path(&self) -> &'static str {
        F::KIND.path()
    }

    pub async fn list(&self) -> Result<Vec<Record<F>>, CoreError> {
        self.inventory
            .client
            .list(self.path())
            .await
            .map_err(|e| {
                warn!(kind = %F::KIND, error = %e, "list failed");
                CoreError::load(e)
            })
    }

    /// Look a record up by id. The server has no single-record endpoint,
    /// so this lists the collection.
    pub async fn get(&self, id: RecordId) -> Result<Record<F>, CoreError> {
        self.list()
            .await?
            .into_iter()
            .find(|r| r.id == id)
            .ok_or(CoreError::NotFound { kind: F::KIND, id })
    }

    /// Create a record; the returned record carries the server-assigned id.
    pub async fn create(&self, fields: F) -> Result<Record<F>, CoreError> {
        self.inventory.session.require_admin(Operation::Save)?;
        let created = self
            .inventory
            .client
            .create(self.path(), &fields)
            .await
            .map_err(|e| {
                warn!(kind = %F::KIND, error = %e, "create failed");
                CoreError::save(e)
            })?;
        debug!(kind = %F::KIND, id = created.id, "record created");
        Ok(Record::new(RecordId(created.id), fields))
    }

    /// Replace every field of an existing record.
    pub async fn update(&self, id: RecordId, fields: F) -> Result<Record<F>, CoreError> {
        self.inventory.session.require_admin(Operation::Save)?;
        self.inventory
            .client
            .update(self.path(), id.get(), &fields)
            .await
            .map_err(|e| {
                warn!(kind = %F::KIND, %id, error = %e, "update failed");
                CoreError::save(e)
            })?;
        debug!(kind = %F::KIND, %id, "record updated");
        Ok(Record::new(id, fields))
    }

    pub async fn delete(&self, id: RecordId) -> Result<(), CoreError> {
        self.inventory.delete_kind(F::KIND, id).await
    }

    /// Create a draft or update a persisted record.
    pub async fn save(&self, staged: Staged<F>) -> Result<Record<F>, CoreError> {
        match staged {
            Staged::Draft(fields) => self.create(fields).await,
            Staged::Persisted(record) => self.update(record.id, record.fields).await,
        }
    }
}
