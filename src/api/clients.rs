//! Client endpoints.

use reqwest::Method;

use super::wire::ClientRecord;
use super::ApiClient;
use crate::error::ApiError;
use crate::model::{Client, ClientPatch, ClientStatus, NewClient};

impl ApiClient {
    /// `GET /api/clients`, optionally filtered by status.
    pub async fn list_clients(
        &self,
        status: Option<ClientStatus>,
    ) -> Result<Vec<Client>, ApiError> {
        let mut builder = self.request(Method::GET, "/api/clients");
        if let Some(status) = status {
            builder = builder.query(&[("status", status.as_str())]);
        }
        let records: Vec<ClientRecord> = self.execute(builder).await?;
        Ok(records.into_iter().map(Client::from).collect())
    }

    /// `GET /api/clients/{id}`.
    pub async fn get_client(&self, id: i64) -> Result<Client, ApiError> {
        let builder = self.request(Method::GET, &format!("/api/clients/{}", id));
        let record: ClientRecord = self.execute(builder).await?;
        Ok(record.into())
    }

    /// `POST /api/clients`.
    pub async fn create_client(&self, body: &NewClient) -> Result<Client, ApiError> {
        let builder = self.request(Method::POST, "/api/clients").json(body);
        let record: ClientRecord = self.execute(builder).await?;
        Ok(record.into())
    }

    /// `PATCH /api/clients/{id}` with a partial body.
    pub async fn update_client(&self, id: i64, patch: &ClientPatch) -> Result<Client, ApiError> {
        let builder = self
            .request(Method::PATCH, &format!("/api/clients/{}", id))
            .json(patch);
        let record: ClientRecord = self.execute(builder).await?;
        Ok(record.into())
    }

    /// `DELETE /api/clients/{id}`.
    pub async fn delete_client(&self, id: i64) -> Result<(), ApiError> {
        let builder = self.request(Method::DELETE, &format!("/api/clients/{}", id));
        self.execute_empty(builder).await
    }
}
