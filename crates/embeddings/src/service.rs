//! Local sentence embeddings through fastembed (ONNX runtime).

use std::path::PathBuf;
use std::sync::Mutex;

use chatvec_core::constants::DEFAULT_EMBEDDING_MODEL;
use chatvec_core::env_config::{env_string, env_string_or};
use fastembed::{EmbeddingModel, TextEmbedding, TextInitOptions};

use crate::batch::EmbeddingProvider;
use crate::error::EmbeddingError;

/// Model names accepted by [`EmbeddingService`], with their output width.
pub const SUPPORTED_MODELS: [(&str, usize); 5] = [
    ("sentence-transformers/all-MiniLM-L6-v2", 384),
    ("sentence-transformers/all-MiniLM-L12-v2", 384),
    ("BAAI/bge-small-en-v1.5", 384),
    ("BAAI/bge-base-en-v1.5", 768),
    ("intfloat/multilingual-e5-small", 384),
];

/// Output width of a supported model.
#[must_use]
pub fn model_dimension(name: &str) -> Option<usize> {
    SUPPORTED_MODELS.iter().find(|(n, _)| *n == name.trim()).map(|(_, dim)| *dim)
}

fn resolve_model(name: &str) -> Result<EmbeddingModel, EmbeddingError> {
    match name.trim() {
        "sentence-transformers/all-MiniLM-L6-v2" => Ok(EmbeddingModel::AllMiniLML6V2),
        "sentence-transformers/all-MiniLM-L12-v2" => Ok(EmbeddingModel::AllMiniLML12V2),
        "BAAI/bge-small-en-v1.5" => Ok(EmbeddingModel::BGESmallENV15),
        "BAAI/bge-base-en-v1.5" => Ok(EmbeddingModel::BGEBaseENV15),
        "intfloat/multilingual-e5-small" => Ok(EmbeddingModel::MultilingualE5Small),
        other => Err(EmbeddingError::UnknownModel(other.to_owned())),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddingConfig {
    pub model_name: String,
    pub cache_dir: PathBuf,
    pub show_download_progress: bool,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model_name: DEFAULT_EMBEDDING_MODEL.to_owned(),
            cache_dir: default_cache_dir(),
            show_download_progress: false,
        }
    }
}

impl EmbeddingConfig {
    /// Reads `CHATVEC_EMBEDDING_MODEL` and `CHATVEC_MODEL_CACHE_DIR`.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            model_name: env_string_or("CHATVEC_EMBEDDING_MODEL", DEFAULT_EMBEDDING_MODEL),
            cache_dir: env_string("CHATVEC_MODEL_CACHE_DIR")
                .map_or_else(default_cache_dir, PathBuf::from),
            show_download_progress: false,
        }
    }

    #[must_use]
    pub fn with_model(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = model_name.into();
        self
    }
}

fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("chatvec")
        .join("models")
}

/// A loaded embedding model. Build once at startup and share behind an `Arc`.
pub struct EmbeddingService {
    model: Mutex<TextEmbedding>,
    model_name: String,
    dimension: usize,
}

impl EmbeddingService {
    /// Load (downloading on first use) the configured model.
    pub fn new(config: &EmbeddingConfig) -> Result<Self, EmbeddingError> {
        let kind = resolve_model(&config.model_name)?;
        let model_name = config.model_name.trim().to_owned();
        std::fs::create_dir_all(&config.cache_dir).map_err(|e| {
            EmbeddingError::ModelInit(format!(
                "cannot create model cache {}: {e}",
                config.cache_dir.display()
            ))
        })?;

        let options = TextInitOptions::new(kind)
            .with_cache_dir(config.cache_dir.clone())
            .with_show_download_progress(config.show_download_progress);
        let model = TextEmbedding::try_new(options)
            .map_err(|e| EmbeddingError::ModelInit(e.to_string()))?;

        let dimension = model_dimension(&model_name).unwrap_or_default();
        tracing::info!(model = %model_name, dimension, cache_dir = %config.cache_dir.display(), "embedding model loaded");
        Ok(Self { model: Mutex::new(model), model_name, dimension })
    }

    #[must_use]
    pub const fn dimension(&self) -> usize {
        self.dimension
    }
}

impl EmbeddingProvider for EmbeddingService {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn embed_texts(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let mut model = self.model.lock().map_err(|_| EmbeddingError::LockPoisoned)?;
        let inputs: Vec<&str> = texts.iter().map(String::as_str).collect();
        model.embed(inputs, None).map_err(|e| EmbeddingError::Generation(e.to_string()))
    }
}
