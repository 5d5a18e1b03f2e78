use serde_json::Value;
use tokio::task::JoinHandle;

use crate::client::{Callback, Couch};
use crate::error::CouchError;
use crate::request::Method;
use crate::transport::Transport;

/// Reserved database name listing every database on the server.
pub const ALL_DBS: &str = "_all_dbs";

/// Database lifecycle operations, obtained from [`Couch::db`].
///
/// Independent calls are not ordered: issuing `destroy` right after
/// `create` without awaiting the first does not mean the server sees them in
/// that order.
pub struct Databases<'a, T> {
    client: &'a Couch<T>,
}

impl<'a, T: Transport> Databases<'a, T> {
    pub(crate) fn new(client: &'a Couch<T>) -> Self {
        Self { client }
    }

    /// Creates database `name` (`PUT /{name}`). Fails with `couch:file_exists`
    /// if it already exists.
    pub async fn create(&self, name: &str) -> Result<Value, CouchError> {
        self.client.dispatch(name, Method::Put).await
    }

    /// Fetches information about database `name` (`GET /{name}`).
    pub async fn get(&self, name: &str) -> Result<Value, CouchError> {
        self.client.dispatch(name, Method::Get).await
    }

    /// Deletes database `name` and everything in it (`DELETE /{name}`).
    pub async fn destroy(&self, name: &str) -> Result<Value, CouchError> {
        self.client.dispatch(name, Method::Delete).await
    }

    /// Lists every database on the server (`GET /_all_dbs`).
    pub async fn list(&self) -> Result<Value, CouchError> {
        self.client.dispatch(ALL_DBS, Method::Get).await
    }
}

/// Callback forms. Each spawns onto the current Tokio runtime and panics
/// outside one; see [`Couch::dispatch_with`].
impl<T: Transport + 'static> Databases<'_, T> {
    pub fn create_with(&self, name: &str, callback: Option<Callback>) -> JoinHandle<()> {
        self.client.dispatch_with(name, Method::Put, callback)
    }

    pub fn get_with(&self, name: &str, callback: Option<Callback>) -> JoinHandle<()> {
        self.client.dispatch_with(name, Method::Get, callback)
    }

    pub fn destroy_with(&self, name: &str, callback: Option<Callback>) -> JoinHandle<()> {
        self.client.dispatch_with(name, Method::Delete, callback)
    }

    pub fn list_with(&self, callback: Option<Callback>) -> JoinHandle<()> {
        self.client.dispatch_with(ALL_DBS, Method::Get, callback)
    }
}
