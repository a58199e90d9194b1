//! Storage gateways for regkiosk.
//!
//! The gateway exclusively owns the record collection; views request
//! mutations and re-fetch, never holding anything but transient copies.
//! Two backends are provided: a local single-document store and a remote
//! row-oriented table.

pub mod local;
pub mod remote;

use async_trait::async_trait;

use crate::error::Result;
use crate::registrant::Registrant;

pub use local::LocalGateway;
pub use remote::RemoteGateway;

/// Mediates all reads and writes of the record collection and enforces
/// at-most-one record per registration key.
///
/// `create` is a check-then-act sequence and is not atomic across
/// concurrent callers; the kiosk has a single active submitter by
/// assumption, so the race window is accepted.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Whether a record with the given registration key exists.
    ///
    /// Reflects the latest successful `create`/`delete` at call time; no
    /// stale-read tolerance is attempted beyond what the backend offers.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be queried.
    async fn exists(&self, key: &str) -> Result<bool>;

    /// Append a record, persisting it before returning.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateKey` if a record with the same `id` exists at
    /// call time, or a gateway error if persistence fails.
    async fn create(&self, record: &Registrant) -> Result<()>;

    /// Remove the record matching `id`; a no-op when absent.
    ///
    /// Confirmation happens at the UI boundary before this is called.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be updated.
    async fn delete(&self, id: &str) -> Result<()>;

    /// Clear the entire collection. Irreversible.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be updated.
    async fn delete_all(&self) -> Result<()>;

    /// All records, newest registration first.
    ///
    /// Implementations re-sort on every read rather than trusting the
    /// backend's native order.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be queried.
    async fn list(&self) -> Result<Vec<Registrant>>;
}

/// Sort records newest `registered_at` first.
pub(crate) fn sort_newest_first(records: &mut [Registrant]) {
    records.sort_by(|a, b| b.registered_at.cmp(&a.registered_at));
}
