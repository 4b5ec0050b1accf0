// Collection endpoints and the dashboard
//
// Every entity collection follows the same REST shape:
//   GET    /api/{collection}        -> [record, ...]
//   POST   /api/{collection}        -> 201 {message, id}
//   PUT    /api/{collection}/{id}   -> {message}
//   DELETE /api/{collection}/{id}   -> {message}

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{Created, DashboardResponse, MessageResponse};

impl ApiClient {
    /// `GET /api/dashboard`
    pub async fn dashboard(&self) -> Result<DashboardResponse, Error> {
        self.get("dashboard").await
    }

    /// `GET /api/{collection}`
    pub async fn list<T: DeserializeOwned>(&self, collection: &str) -> Result<Vec<T>, Error> {
        debug!(collection, "listing records");
        self.get(collection).await
    }

    /// `POST /api/{collection}`, returning the server-assigned id.
    pub async fn create<B: Serialize + Sync>(
        &self,
        collection: &str,
        body: &B,
    ) -> Result<Created, Error> {
        debug!(collection, "creating record");
        self.post(collection, body).await
    }

    /// `PUT /api/{collection}/{id}` with the full field set.
    pub async fn update<B: Serialize + Sync>(
        &self,
        collection: &str,
        id: u64,
        body: &B,
    ) -> Result<MessageResponse, Error> {
        debug!(collection, id, "updating record");
        self.put(&format!("{collection}/{id}"), body).await
    }

    /// `DELETE /api/{collection}/{id}`
    pub async fn remove(&self, collection: &str, id: u64) -> Result<MessageResponse, Error> {
        debug!(collection, id, "deleting record");
        self.delete(&format!("{collection}/{id}")).await
    }
}
