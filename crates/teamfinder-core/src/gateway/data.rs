//! Table side of the gateway.

use async_trait::async_trait;
use serde_json::Value;

use super::query::{Filter, JoinSpec, Table};
use crate::error::Result;

/// A single row as a JSON object.
pub type Record = Value;

/// CRUD and relational-select operations over the backend tables.
///
/// Implementations apply the backend's own constraints (uniqueness,
/// referential integrity, row-level policies); callers do not re-check them.
#[async_trait]
pub trait DataGateway: Send + Sync {
    /// Returns every row of `table`, ascending by `order_by` when given.
    async fn select_all(&self, table: Table, order_by: Option<&str>) -> Result<Vec<Record>>;

    /// Returns the row whose `id` equals `id`.
    ///
    /// # Returns
    ///
    /// - `Ok(Record)`: The row
    /// - `Err(TeamfinderError::NotFound)`: No such row
    async fn select_one_by_id(&self, table: Table, id: &str) -> Result<Record>;

    /// Returns rows of `table` shaped by `join`, restricted by all `filters`.
    async fn select_joined(
        &self,
        table: Table,
        join: &JoinSpec,
        filters: &[Filter],
    ) -> Result<Vec<Record>>;

    async fn insert(&self, table: Table, record: Record) -> Result<()>;

    /// Applies `partial` to the row whose `id` equals `id`.
    async fn update(&self, table: Table, id: &str, partial: Record) -> Result<()>;

    /// Deletes every row matching all `keys`. Matching nothing is not an error.
    async fn delete_by_keys(&self, table: Table, keys: &[Filter]) -> Result<()>;
}
