//! Note endpoints.

use reqwest::Method;

use super::wire::NoteRecord;
use super::ApiClient;
use crate::error::ApiError;
use crate::model::{NewNote, Note};

impl ApiClient {
    /// `GET /api/clients/{id}/notes`.
    pub async fn list_notes(&self, client_id: i64) -> Result<Vec<Note>, ApiError> {
        let builder = self.request(Method::GET, &format!("/api/clients/{}/notes", client_id));
        let records: Vec<NoteRecord> = self.execute(builder).await?;
        Ok(records.into_iter().map(Note::from).collect())
    }

    /// `POST /api/clients/{id}/notes`.
    pub async fn create_note(&self, client_id: i64, body: &NewNote) -> Result<Note, ApiError> {
        let builder = self
            .request(Method::POST, &format!("/api/clients/{}/notes", client_id))
            .json(body);
        let record: NoteRecord = self.execute(builder).await?;
        Ok(record.into())
    }

    /// `DELETE /api/notes/{id}`.
    pub async fn delete_note(&self, id: i64) -> Result<(), ApiError> {
        let builder = self.request(Method::DELETE, &format!("/api/notes/{}", id));
        self.execute_empty(builder).await
    }
}
