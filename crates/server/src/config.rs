use std::env;

/// Default embedding model when `OPENAI_EMBEDDING_MODEL` is unset.
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";

/// Default retrieval result count when `RETRIEVAL_TOP_K` is unset.
pub const DEFAULT_RETRIEVAL_TOP_K: i64 = 6;

/// Process-wide settings, read once at startup.
///
/// `SUPABASE_URL` and `SUPABASE_SERVICE_ROLE_KEY` are required; startup
/// fails fast when either is absent. Everything else has a default.
#[derive(Debug, Clone)]
pub struct Settings {
    pub supabase_url: String,
    pub supabase_service_role_key: String,
    /// Absent key degrades retrieval to lexical-only.
    pub openai_api_key: Option<String>,
    pub openai_embedding_model: String,
    pub retrieval_top_k: i64,
    pub enable_vector_search: bool,
    pub port: u16,
}

impl Settings {
    /// Read settings from the environment (and `.env` if present).
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if present (ignored in production where env vars
        // are set directly).
        let _ = dotenvy::dotenv();

        let supabase_url =
            env::var("SUPABASE_URL").map_err(|_| "SUPABASE_URL must be set".to_string())?;
        let supabase_service_role_key = env::var("SUPABASE_SERVICE_ROLE_KEY")
            .map_err(|_| "SUPABASE_SERVICE_ROLE_KEY must be set".to_string())?;

        let openai_api_key = env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty());
        let openai_embedding_model = env::var("OPENAI_EMBEDDING_MODEL")
            .unwrap_or_else(|_| DEFAULT_EMBEDDING_MODEL.to_string());
        let retrieval_top_k = env::var("RETRIEVAL_TOP_K")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_RETRIEVAL_TOP_K);
        let enable_vector_search = env::var("ENABLE_VECTOR_SEARCH")
            .map(|v| parse_bool(&v))
            .unwrap_or(true);
        let port = env::var("PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(8000);

        Ok(Self {
            supabase_url,
            supabase_service_role_key,
            openai_api_key,
            openai_embedding_model,
            retrieval_top_k,
            enable_vector_search,
            port,
        })
    }
}

/// Accepts the usual falsy spellings; anything unrecognised keeps the
/// feature enabled.
fn parse_bool(v: &str) -> bool {
    !matches!(
        v.trim().to_ascii_lowercase().as_str(),
        "false" | "0" | "no" | "off"
    )
}
