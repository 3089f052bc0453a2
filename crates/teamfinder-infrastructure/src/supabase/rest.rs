//! PostgREST table endpoints.

use async_trait::async_trait;
use reqwest::StatusCode;
use teamfinder_core::TeamfinderError;
use teamfinder_core::error::Result;
use teamfinder_core::gateway::{DataGateway, Filter, JoinSpec, Record, Table};

use super::{SupabaseGateway, check};

/// Makes PostgREST answer a single object (406 when no row matches).
const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";
const RETURN_MINIMAL: &str = "return=minimal";

/// `column=eq.value` query pairs.
pub(super) fn eq_params(filters: &[Filter]) -> Vec<(String, String)> {
    filters
        .iter()
        .map(|filter| (filter.column.clone(), format!("eq.{}", filter.value_text())))
        .collect()
}

/// `select` plus optional ascending `order`.
pub(super) fn select_params(select: &str, order_by: Option<&str>) -> Vec<(String, String)> {
    let mut params = vec![("select".to_string(), select.to_string())];
    if let Some(column) = order_by {
        params.push(("order".to_string(), format!("{}.asc", column)));
    }
    params
}

#[async_trait]
impl DataGateway for SupabaseGateway {
    async fn select_all(&self, table: Table, order_by: Option<&str>) -> Result<Vec<Record>> {
        let request = self
            .client
            .get(self.rest_url(table))
            .query(&select_params("*", order_by));
        let response = self.authorize(request).await.send().await?;
        Ok(check(response).await?.json().await?)
    }

    async fn select_one_by_id(&self, table: Table, id: &str) -> Result<Record> {
        let mut params = select_params("*", None);
        params.extend(eq_params(&[Filter::eq("id", id)]));

        let request = self
            .client
            .get(self.rest_url(table))
            .query(&params)
            .header(reqwest::header::ACCEPT, SINGLE_OBJECT);
        let response = self.authorize(request).await.send().await?;

        if response.status() == StatusCode::NOT_ACCEPTABLE {
            return Err(TeamfinderError::not_found(table.name(), id));
        }
        Ok(check(response).await?.json().await?)
    }

    async fn select_joined(
        &self,
        table: Table,
        join: &JoinSpec,
        filters: &[Filter],
    ) -> Result<Vec<Record>> {
        let mut params = select_params(&join.to_select(), None);
        params.extend(eq_params(filters));

        let request = self.client.get(self.rest_url(table)).query(&params);
        let response = self.authorize(request).await.send().await?;
        Ok(check(response).await?.json().await?)
    }

    async fn insert(&self, table: Table, record: Record) -> Result<()> {
        let request = self
            .client
            .post(self.rest_url(table))
            .header("Prefer", RETURN_MINIMAL)
            .json(&record);
        let response = self.authorize(request).await.send().await?;
        check(response).await?;
        tracing::debug!(table = %table, "Inserted row");
        Ok(())
    }

    async fn update(&self, table: Table, id: &str, partial: Record) -> Result<()> {
        let request = self
            .client
            .patch(self.rest_url(table))
            .query(&eq_params(&[Filter::eq("id", id)]))
            .header("Prefer", RETURN_MINIMAL)
            .json(&partial);
        let response = self.authorize(request).await.send().await?;
        check(response).await?;
        tracing::debug!(table = %table, id, "Updated row");
        Ok(())
    }

    async fn delete_by_keys(&self, table: Table, keys: &[Filter]) -> Result<()> {
        if keys.is_empty() {
            return Err(TeamfinderError::validation(
                "Refusing to delete without key filters",
            ));
        }
        let request = self
            .client
            .delete(self.rest_url(table))
            .query(&eq_params(keys))
            .header("Prefer", RETURN_MINIMAL);
        let response = self.authorize(request).await.send().await?;
        check(response).await?;
        tracing::debug!(table = %table, "Deleted rows");
        Ok(())
    }
}
