use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use server::config::Settings;
use server::embedding::Embedder;
use server::state::AppState;
use server::store::{GuidelineStore, StoreError};
use shared_types::{GuidelineChunk, OffenceRecord, SentencingMatrixRow};

// ── Fixture offence ids ─────────────────────────────────────────────

pub const COMMON_ASSAULT_ID: &str = "11111111-1111-1111-1111-111111111111";
pub const DOMESTIC_BURGLARY_ID: &str = "22222222-2222-2222-2222-222222222222";
pub const TRAFFICKING_ID: &str = "33333333-3333-3333-3333-333333333333";
pub const BLADED_ARTICLE_ID: &str = "44444444-4444-4444-4444-444444444444";
pub const MURDER_ID: &str = "55555555-5555-5555-5555-555555555555";
pub const MANSLAUGHTER_ID: &str = "66666666-6666-6666-6666-666666666666";
pub const MISSING_ID: &str = "99999999-9999-9999-9999-999999999999";

fn offence(id: &str, name: &str, category: &str, provision: &str, max: &str) -> OffenceRecord {
    OffenceRecord {
        id: id.to_string(),
        name: name.to_string(),
        short_name: name.to_string(),
        offence_category: category.to_string(),
        provision: provision.to_string(),
        guideline_url: format!("https://guidelines.example.org/{id}"),
        legislation_url: format!("https://legislation.example.org/{id}"),
        maximum_sentence_type: "custody".to_string(),
        maximum_sentence_amount: max.to_string(),
        minimum_sentence_code: String::new(),
        specified_violent: false,
        specified_sexual: false,
        specified_terrorist: false,
        listed_offence: false,
        schedule18a_offence: false,
        schedule19za: false,
        cta_notification: false,
    }
}

pub fn fixture_offences() -> Vec<OffenceRecord> {
    let common_assault = offence(
        COMMON_ASSAULT_ID,
        "Common assault",
        "Assault",
        "Criminal Justice Act 1988 s.39",
        "6 months",
    );

    let mut burglary = offence(
        DOMESTIC_BURGLARY_ID,
        "Domestic burglary",
        "Burglary",
        "Theft Act 1968 s.9",
        "14 years",
    );
    burglary.minimum_sentence_code = "A".to_string();

    let mut trafficking = offence(
        TRAFFICKING_ID,
        "Supplying a Class A drug",
        "Drug offences",
        "Misuse of Drugs Act 1971 s.4(3)",
        "Life",
    );
    trafficking.minimum_sentence_code = "B".to_string();

    let mut bladed = offence(
        BLADED_ARTICLE_ID,
        "Possession of a bladed article",
        "Possession of weapons",
        "Criminal Justice Act 1988 s.139",
        "4 years",
    );
    bladed.minimum_sentence_code = "D".to_string();

    let mut murder = offence(
        MURDER_ID,
        "Murder",
        "Homicide",
        "Common law (murder)",
        "Life",
    );
    murder.specified_violent = true;
    murder.listed_offence = true;

    let mut manslaughter = offence(
        MANSLAUGHTER_ID,
        "Manslaughter",
        "Homicide",
        "Common law (manslaughter)",
        "Life",
    );
    manslaughter.specified_violent = true;

    vec![
        common_assault,
        burglary,
        trafficking,
        bladed,
        murder,
        manslaughter,
    ]
}

fn chunk(
    id: &str,
    guideline_id: &str,
    offence_id: Option<&str>,
    name: &str,
    content: &str,
    vector_score: f64,
    text_score: f64,
) -> GuidelineChunk {
    GuidelineChunk {
        id: id.to_string(),
        guideline_id: guideline_id.to_string(),
        offence_id: offence_id.map(|s| s.to_string()),
        guideline_name: name.to_string(),
        section: None,
        content: content.to_string(),
        url: Some(format!("https://guidelines.example.org/{guideline_id}")),
        score: 0.0,
        vector_score: Some(vector_score),
        text_score: Some(text_score),
    }
}

pub fn fixture_chunks() -> Vec<GuidelineChunk> {
    vec![
        chunk(
            "chunk-1",
            "guideline-assault",
            Some(COMMON_ASSAULT_ID),
            "Assault guideline",
            "Common assault culpability and harm factors",
            0.9,
            0.8,
        ),
        chunk(
            "chunk-2",
            "guideline-linked",
            None,
            "Overarching principles",
            "Assault sentencing overarching principles",
            0.7,
            0.6,
        ),
        chunk(
            "chunk-3",
            "guideline-burglary",
            Some(DOMESTIC_BURGLARY_ID),
            "Burglary guideline",
            "Domestic burglary assault on dwelling factors",
            0.5,
            0.9,
        ),
    ]
}

// ── Fake store ──────────────────────────────────────────────────────

pub struct FakeStore {
    pub offences: Vec<OffenceRecord>,
    pub matrix: HashMap<String, Vec<SentencingMatrixRow>>,
    pub chunks: Vec<GuidelineChunk>,
    /// offence_id -> linked guideline ids (the store-side link table).
    pub links: HashMap<String, Vec<String>>,
    pub audits: Mutex<Vec<(String, Value, Value)>>,
    pub fail_audit: bool,
}

impl FakeStore {
    pub fn seeded() -> Self {
        let mut matrix = HashMap::new();
        matrix.insert(
            COMMON_ASSAULT_ID.to_string(),
            vec![
                SentencingMatrixRow {
                    matrix_id: "m1".to_string(),
                    culpability: "Culpability A".to_string(),
                    harm: "Harm 1".to_string(),
                    starting_point: "26 weeks".to_string(),
                    category_range: "12 - 51 weeks".to_string(),
                },
                SentencingMatrixRow {
                    matrix_id: "m2".to_string(),
                    culpability: "Culpability B".to_string(),
                    harm: "Harm 2".to_string(),
                    starting_point: "Medium community order".to_string(),
                    category_range: "Low - High community order".to_string(),
                },
            ],
        );

        let mut links = HashMap::new();
        links.insert(
            COMMON_ASSAULT_ID.to_string(),
            vec!["guideline-linked".to_string()],
        );

        Self {
            offences: fixture_offences(),
            matrix,
            chunks: fixture_chunks(),
            links,
            audits: Mutex::new(Vec::new()),
            fail_audit: false,
        }
    }

    fn check_uuid(&self, id: &str) -> Result<(), StoreError> {
        Uuid::parse_str(id).map_err(|_| {
            StoreError::MalformedId(format!("invalid input syntax for type uuid: \"{id}\""))
        })?;
        Ok(())
    }

    fn chunk_visible(&self, chunk: &GuidelineChunk, offence_id: Option<&str>) -> bool {
        let Some(offence_id) = offence_id else {
            return true;
        };
        if chunk.offence_id.as_deref() == Some(offence_id) {
            return true;
        }
        self.links
            .get(offence_id)
            .is_some_and(|g| g.contains(&chunk.guideline_id))
    }
}

#[async_trait]
impl GuidelineStore for FakeStore {
    async fn fetch_offence_by_id(&self, id: &str) -> Result<Option<OffenceRecord>, StoreError> {
        self.check_uuid(id)?;
        Ok(self.offences.iter().find(|o| o.id == id).cloned())
    }

    async fn search_offences(
        &self,
        query: &str,
        limit: i64,
    ) -> Result<Vec<OffenceRecord>, StoreError> {
        let q = query.to_lowercase();
        let mut scored: Vec<(f64, OffenceRecord)> = self
            .offences
            .iter()
            .filter_map(|o| {
                let name = o.name.to_lowercase();
                if name.contains(&q)
                    || o.short_name.to_lowercase().contains(&q)
                    || o.provision.to_lowercase().contains(&q)
                {
                    // crude similarity stand-in: query coverage of the name
                    Some((q.len() as f64 / name.len().max(1) as f64, o.clone()))
                } else {
                    None
                }
            })
            .collect();
        scored.sort_by(|a, b| {
            b.0.partial_cmp(&a.0)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.1.name.cmp(&b.1.name))
        });
        Ok(scored
            .into_iter()
            .take(limit as usize)
            .map(|(_, o)| o)
            .collect())
    }

    async fn fetch_sentencing_matrix(
        &self,
        offence_id: &str,
    ) -> Result<Vec<SentencingMatrixRow>, StoreError> {
        self.check_uuid(offence_id)?;
        Ok(self.matrix.get(offence_id).cloned().unwrap_or_default())
    }

    async fn search_chunks_text(
        &self,
        query: &str,
        top_k: i64,
        offence_id: Option<&str>,
    ) -> Result<Vec<GuidelineChunk>, StoreError> {
        let q = query.to_lowercase();
        let mut results: Vec<GuidelineChunk> = self
            .chunks
            .iter()
            .filter(|c| self.chunk_visible(c, offence_id))
            .filter(|c| {
                c.content.to_lowercase().contains(&q)
                    || c.guideline_name.to_lowercase().contains(&q)
                    || q.split_whitespace()
                        .any(|w| c.content.to_lowercase().contains(w))
            })
            .cloned()
            .map(|mut c| {
                c.score = c.text_score.unwrap_or(0.0);
                c.vector_score = None;
                c
            })
            .collect();
        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(top_k as usize);
        Ok(results)
    }

    async fn search_chunks_hybrid(
        &self,
        _query: &str,
        _embedding: &[f32],
        top_k: i64,
        offence_id: Option<&str>,
    ) -> Result<Vec<GuidelineChunk>, StoreError> {
        let mut results: Vec<GuidelineChunk> = self
            .chunks
            .iter()
            .filter(|c| self.chunk_visible(c, offence_id))
            .cloned()
            .map(|mut c| {
                c.score = 0.75 * c.vector_score.unwrap_or(0.0) + 0.25 * c.text_score.unwrap_or(0.0);
                c
            })
            .collect();
        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(top_k as usize);
        Ok(results)
    }

    async fn store_calculation_audit(
        &self,
        offence_id: &str,
        request: &Value,
        result: &Value,
    ) -> Result<(), StoreError> {
        if self.fail_audit {
            return Err(StoreError::Backend("audit table unavailable".to_string()));
        }
        self.audits
            .lock()
            .expect("audit lock")
            .push((offence_id.to_string(), request.clone(), result.clone()));
        Ok(())
    }
}

// ── Fake embedder ───────────────────────────────────────────────────

pub struct FakeEmbedder {
    pub configured: bool,
    pub fail: bool,
}

#[async_trait]
impl Embedder for FakeEmbedder {
    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn embed(&self, _text: &str) -> Result<Vec<f32>, String> {
        if self.fail {
            Err("embedding service returned 500".to_string())
        } else {
            Ok(vec![0.1; 8])
        }
    }
}

// ── App assembly ────────────────────────────────────────────────────

pub fn test_settings() -> Settings {
    Settings {
        supabase_url: "http://localhost:54321".to_string(),
        supabase_service_role_key: "test-service-role-key".to_string(),
        openai_api_key: Some("test-openai-key".to_string()),
        openai_embedding_model: "text-embedding-3-small".to_string(),
        retrieval_top_k: 6,
        enable_vector_search: true,
        port: 0,
    }
}

/// Build a test app over the seeded fake store and a working embedder.
pub fn test_app() -> (Router, Arc<FakeStore>) {
    test_app_with(FakeStore::seeded(), FakeEmbedder { configured: true, fail: false }, test_settings())
}

pub fn test_app_with(
    store: FakeStore,
    embedder: FakeEmbedder,
    settings: Settings,
) -> (Router, Arc<FakeStore>) {
    let store = Arc::new(store);
    let state = AppState {
        store: store.clone(),
        embedder: Arc::new(embedder),
        settings: Arc::new(settings),
    };
    (server::rest::app(state), store)
}

// ── Request helpers ─────────────────────────────────────────────────

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(req)
        .await
        .expect("request should not fail at the transport level");

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

/// POST JSON to a route.
pub async fn post_json(app: &Router, uri: &str, body: &Value) -> (StatusCode, Value) {
    let req = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request builds");
    send(app, req).await
}

/// POST a raw (possibly invalid) body to a route.
pub async fn post_raw(app: &Router, uri: &str, body: &str) -> (StatusCode, Value) {
    let req = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request builds");
    send(app, req).await
}

/// GET a route.
pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let req = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("request builds");
    send(app, req).await
}

/// A valid baseline calculation body; tests override fields as needed.
pub fn calc_body(offence_id: &str) -> Value {
    serde_json::json!({
        "offence_id": offence_id,
        "offence_date": "2024-01-10",
        "conviction_date": "2024-03-01",
        "sentence_date": "2024-04-01",
        "age_at_offence": 30,
        "age_at_conviction": 30,
        "age_at_sentence": 30,
        "plea_stage": "first_stage",
        "sentence_type": "determinate_custodial_sentence",
        "pre_plea_term_months": 12
    })
}
