//! SnapCloset styling backend
//!
//! Turns photos from a user's closet into outfit ideas: each request runs a
//! fixed set of style variants against a multimodal generation model,
//! saves the generated images and appends every call to an NDJSON log.

pub mod api;
pub mod backend;
pub mod call_log;
pub mod config;
pub mod error;
pub mod images;
pub mod response;
pub mod styling;

pub use error::{AppError, Result};

use std::sync::Arc;

use backend::traits::GenerationClient;
use call_log::CallLogger;
use images::Base64Cache;
use styling::{DirectGenerator, StylingPipeline};

/// Application state shared across all handlers
pub struct AppState {
    pub settings: config::Settings,
    pub pipeline: StylingPipeline,
    pub direct: DirectGenerator,
}

impl AppState {
    /// Wire the pipeline and single-call generator around one client, log and cache
    pub fn new(
        settings: config::Settings,
        client: Arc<dyn GenerationClient>,
        call_log: Arc<dyn CallLogger>,
    ) -> Self {
        let cache = Arc::new(Base64Cache::new(&settings.storage.base64_cache_dir));
        let pipeline =
            StylingPipeline::with_cache(&settings, client.clone(), call_log.clone(), cache.clone());
        let direct = DirectGenerator::new(&settings, client, call_log, cache);
        Self {
            settings,
            pipeline,
            direct,
        }
    }
}
