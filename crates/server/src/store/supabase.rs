//! Supabase PostgREST adapter for the guideline store.
//!
//! Every method is a POST to `{SUPABASE_URL}/rest/v1/rpc/<function>` with
//! the service-role key in both `apikey` and `Authorization` headers.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use shared_types::{GuidelineChunk, OffenceRecord, SentencingMatrixRow};

use super::{GuidelineStore, StoreError};
use crate::config::Settings;

/// PostgreSQL error code for "invalid input syntax" (malformed UUID).
const PG_INVALID_TEXT_REPRESENTATION: &str = "22P02";

pub struct SupabaseStore {
    client: reqwest::Client,
    base_url: String,
    service_key: String,
}

impl SupabaseStore {
    pub fn new(settings: &Settings) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: settings.supabase_url.trim_end_matches('/').to_string(),
            service_key: settings.supabase_service_role_key.clone(),
        }
    }

    /// Call a PostgREST RPC function and deserialize its JSON result.
    #[tracing::instrument(skip(self, payload))]
    async fn rpc<T: DeserializeOwned>(
        &self,
        function: &str,
        payload: Value,
    ) -> Result<T, StoreError> {
        let url = format!("{}/rest/v1/rpc/{}", self.base_url, function);

        let response = self
            .client
            .post(&url)
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| StoreError::Backend(format!("{} request failed: {}", function, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_error(function, status.as_u16(), &body));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| StoreError::Backend(format!("{} returned invalid JSON: {}", function, e)))
    }
}

/// Map a PostgREST error body onto the store error taxonomy. A 22P02 code
/// means the store rejected an identifier as not being a UUID.
fn classify_error(function: &str, status: u16, body: &str) -> StoreError {
    #[derive(Deserialize)]
    struct PostgrestError {
        code: Option<String>,
        message: Option<String>,
    }

    if let Ok(err) = serde_json::from_str::<PostgrestError>(body) {
        let message = err.message.unwrap_or_else(|| body.to_string());
        if err.code.as_deref() == Some(PG_INVALID_TEXT_REPRESENTATION) {
            return StoreError::MalformedId(message);
        }
        return StoreError::Backend(format!("{} failed ({}): {}", function, status, message));
    }
    StoreError::Backend(format!("{} failed ({}): {}", function, status, body))
}

/// Row shape shared by `fetch_offence_by_id` and `search_offences`
/// (the latter adds a trigram similarity score, already consumed for
/// ordering on the store side).
#[derive(Debug, Deserialize)]
struct OffenceRow {
    id: String,
    name: String,
    short_name: String,
    offence_category: String,
    provision: String,
    guideline_url: String,
    legislation_url: String,
    maximum_sentence_type: String,
    maximum_sentence_amount: String,
    minimum_sentence_code: String,
    specified_violent: bool,
    specified_sexual: bool,
    specified_terrorist: bool,
    listed_offence: bool,
    schedule18a_offence: bool,
    schedule19za: bool,
    cta_notification: bool,
    #[serde(default)]
    #[allow(dead_code)]
    score: Option<f64>,
}

impl From<OffenceRow> for OffenceRecord {
    fn from(row: OffenceRow) -> Self {
        OffenceRecord {
            id: row.id,
            name: row.name,
            short_name: row.short_name,
            offence_category: row.offence_category,
            provision: row.provision,
            guideline_url: row.guideline_url,
            legislation_url: row.legislation_url,
            maximum_sentence_type: row.maximum_sentence_type,
            maximum_sentence_amount: row.maximum_sentence_amount,
            minimum_sentence_code: row.minimum_sentence_code,
            specified_violent: row.specified_violent,
            specified_sexual: row.specified_sexual,
            specified_terrorist: row.specified_terrorist,
            listed_offence: row.listed_offence,
            schedule18a_offence: row.schedule18a_offence,
            schedule19za: row.schedule19za,
            cta_notification: row.cta_notification,
        }
    }
}

#[async_trait]
impl GuidelineStore for SupabaseStore {
    async fn fetch_offence_by_id(&self, id: &str) -> Result<Option<OffenceRecord>, StoreError> {
        let rows: Vec<OffenceRow> = self
            .rpc("fetch_offence_by_id", json!({ "offence_id": id }))
            .await?;
        Ok(rows.into_iter().next().map(OffenceRecord::from))
    }

    async fn search_offences(
        &self,
        query: &str,
        limit: i64,
    ) -> Result<Vec<OffenceRecord>, StoreError> {
        let rows: Vec<OffenceRow> = self
            .rpc(
                "search_offences",
                json!({ "query": query, "match_limit": limit }),
            )
            .await?;
        Ok(rows.into_iter().map(OffenceRecord::from).collect())
    }

    async fn fetch_sentencing_matrix(
        &self,
        offence_id: &str,
    ) -> Result<Vec<SentencingMatrixRow>, StoreError> {
        self.rpc("fetch_sentencing_matrix", json!({ "offence_id": offence_id }))
            .await
    }

    async fn search_chunks_text(
        &self,
        query: &str,
        top_k: i64,
        offence_id: Option<&str>,
    ) -> Result<Vec<GuidelineChunk>, StoreError> {
        self.rpc(
            "search_chunks_text",
            json!({ "query": query, "top_k": top_k, "offence_id": offence_id }),
        )
        .await
    }

    async fn search_chunks_hybrid(
        &self,
        query: &str,
        embedding: &[f32],
        top_k: i64,
        offence_id: Option<&str>,
    ) -> Result<Vec<GuidelineChunk>, StoreError> {
        self.rpc(
            "search_chunks_hybrid",
            json!({
                "query": query,
                "embedding": embedding,
                "top_k": top_k,
                "offence_id": offence_id,
            }),
        )
        .await
    }

    async fn store_calculation_audit(
        &self,
        offence_id: &str,
        request: &Value,
        result: &Value,
    ) -> Result<(), StoreError> {
        // PostgREST returns null for void functions; accept any JSON.
        let _: Value = self
            .rpc(
                "store_calculation_audit",
                json!({
                    "offence_id": offence_id,
                    "request_payload": request,
                    "result_payload": result,
                }),
            )
            .await?;
        Ok(())
    }
}
