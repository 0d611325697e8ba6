use std::sync::Arc;

use crate::config::Settings;
use crate::embedding::Embedder;
use crate::store::GuidelineStore;

/// Shared application state passed to axum handlers via `State`.
///
/// The store and embedder are process-global handles built once at startup
/// and injected here; orchestrators receive them through this state rather
/// than reading module-level globals, keeping the rules engine pure.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn GuidelineStore>,
    pub embedder: Arc<dyn Embedder>,
    pub settings: Arc<Settings>,
}
