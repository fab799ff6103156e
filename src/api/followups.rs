//! Followup endpoints.

use reqwest::Method;

use super::wire::FollowupRecord;
use super::ApiClient;
use crate::error::ApiError;
use crate::model::{Followup, FollowupPatch, NewFollowup};

impl ApiClient {
    /// `GET /api/followups`, optionally restricted to today's.
    pub async fn list_followups(&self, today: bool) -> Result<Vec<Followup>, ApiError> {
        let mut builder = self.request(Method::GET, "/api/followups");
        if today {
            builder = builder.query(&[("today", "true")]);
        }
        let records: Vec<FollowupRecord> = self.execute(builder).await?;
        Ok(records.into_iter().map(Followup::from).collect())
    }

    /// `GET /api/clients/{id}/followups`.
    pub async fn list_client_followups(&self, client_id: i64) -> Result<Vec<Followup>, ApiError> {
        let builder = self.request(
            Method::GET,
            &format!("/api/clients/{}/followups", client_id),
        );
        let records: Vec<FollowupRecord> = self.execute(builder).await?;
        Ok(records.into_iter().map(Followup::from).collect())
    }

    /// `POST /api/clients/{id}/followups`.
    pub async fn create_followup(
        &self,
        client_id: i64,
        body: &NewFollowup,
    ) -> Result<Followup, ApiError> {
        let builder = self
            .request(
                Method::POST,
                &format!("/api/clients/{}/followups", client_id),
            )
            .json(body);
        let record: FollowupRecord = self.execute(builder).await?;
        Ok(record.into())
    }

    /// `PATCH /api/followups/{id}` with a partial body.
    pub async fn update_followup(
        &self,
        id: i64,
        patch: &FollowupPatch,
    ) -> Result<Followup, ApiError> {
        let builder = self
            .request(Method::PATCH, &format!("/api/followups/{}", id))
            .json(patch);
        let record: FollowupRecord = self.execute(builder).await?;
        Ok(record.into())
    }

    /// `POST /api/followups/{id}/complete` — distinct from a generic update.
    pub async fn complete_followup(&self, id: i64) -> Result<Followup, ApiError> {
        let builder = self.request(Method::POST, &format!("/api/followups/{}/complete", id));
        let record: FollowupRecord = self.execute(builder).await?;
        Ok(record.into())
    }

    /// `DELETE /api/followups/{id}`.
    pub async fn delete_followup(&self, id: i64) -> Result<(), ApiError> {
        let builder = self.request(Method::DELETE, &format!("/api/followups/{}", id));
        self.execute_empty(builder).await
    }
}
