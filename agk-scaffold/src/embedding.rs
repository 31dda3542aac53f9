//! Embedding model intelligence.
//!
//! A read-only table of known embedding models and the rules for picking a
//! model and its vector dimensionality. The registry is an ordinary value:
//! build it once with [`EmbeddingRegistry::builtin`] and hand it to the
//! generator, or construct a substitute with [`EmbeddingRegistry::from_records`].

use crate::config::ProjectConfig;
use crate::error::{Result, ScaffoldError};
use serde::Serialize;

pub const MAX_DIMENSIONS: u32 = 4096;
pub const GLOBAL_DEFAULT_DIMENSIONS: u32 = 1536;
pub const OLLAMA_BASE_URL: &str = "http://localhost:11434";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelRecord {
    pub provider: String,
    pub model: String,
    pub dimensions: u32,
    pub base_url: Option<String>,
    pub notes: String,
    pub recommended: bool,
}

impl ModelRecord {
    pub fn new(provider: &str, model: &str, dimensions: u32) -> Self {
        Self {
            provider: provider.to_string(),
            model: model.to_string(),
            dimensions,
            base_url: None,
            notes: String::new(),
            recommended: false,
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = Some(base_url.to_string());
        self
    }

    pub fn with_notes(mut self, notes: &str) -> Self {
        self.notes = notes.to_string();
        self
    }

    pub fn recommended(mut self) -> Self {
        self.recommended = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingRegistry {
    records: Vec<ModelRecord>,
}

impl EmbeddingRegistry {
    /// Registry of the models supported out of the box.
    pub fn builtin() -> Self {
        Self::from_records(vec![
            ModelRecord::new("ollama", "nomic-embed-text:latest", 768)
                .with_base_url(OLLAMA_BASE_URL)
                .with_notes("Excellent general-purpose embedding model with good performance")
                .recommended(),
            ModelRecord::new("ollama", "nomic-embed-text", 768)
                .with_base_url(OLLAMA_BASE_URL)
                .with_notes("Same as nomic-embed-text:latest")
                .recommended(),
            ModelRecord::new("ollama", "mxbai-embed-large", 1024)
                .with_base_url(OLLAMA_BASE_URL)
                .with_notes("Larger model with better quality, requires more resources"),
            ModelRecord::new("ollama", "all-minilm", 384)
                .with_base_url(OLLAMA_BASE_URL)
                .with_notes("Lightweight model, faster but lower quality"),
            ModelRecord::new("openai", "text-embedding-3-small", 1536)
                .with_notes("Cost-effective OpenAI embedding model")
                .recommended(),
            ModelRecord::new("openai", "text-embedding-3-large", 3072)
                .with_notes("Highest quality OpenAI embedding model"),
            ModelRecord::new("openai", "text-embedding-ada-002", 1536)
                .with_notes("Legacy OpenAI embedding model"),
            ModelRecord::new("dummy", "dummy", 1536)
                .with_notes("Testing only, produces non-semantic embeddings"),
        ])
    }

    pub fn from_records(records: Vec<ModelRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[ModelRecord] {
        &self.records
    }

    pub fn models_for<'a>(&'a self, provider: &str) -> impl Iterator<Item = &'a ModelRecord> + 'a {
        let provider = provider.to_lowercase();
        self.records.iter().filter(move |r| r.provider == provider)
    }

    /// Exact match first, then substring containment in either direction so
    /// tagged names like `nomic-embed-text:v1.5` still resolve.
    pub fn lookup(&self, provider: &str, model: &str) -> Result<&ModelRecord> {
        let not_found = || ScaffoldError::ModelNotFound {
            provider: provider.to_string(),
            model: model.to_string(),
        };
        let model_lc = model.to_lowercase();
        if model_lc.is_empty() {
            return Err(not_found());
        }

        if let Some(record) = self.models_for(provider).find(|r| r.model.to_lowercase() == model_lc) {
            return Ok(record);
        }
        self.models_for(provider)
            .find(|r| {
                let known = r.model.to_lowercase();
                model_lc.contains(&known) || known.contains(&model_lc)
            })
            .ok_or_else(not_found)
    }

    /// Dimensionality for a model. Unknown models fall back to a
    /// provider-family heuristic; this never fails.
    pub fn dimensions_for(&self, provider: &str, model: &str) -> u32 {
        if let Ok(record) = self.lookup(provider, model) {
            return record.dimensions;
        }
        let model = model.to_lowercase();
        match provider.to_lowercase().as_str() {
            "ollama" if model.contains("mxbai") => 1024,
            "ollama" => 768,
            "openai" if model.contains("large") => 3072,
            "openai" => 1536,
            _ => GLOBAL_DEFAULT_DIMENSIONS,
        }
    }

    pub fn validate_compatibility(&self, provider: &str, model: &str, memory_backend: &str) -> Result<()> {
        let record = self.lookup(provider, model)?;

        if memory_backend == "weaviate" && record.provider == "dummy" {
            return Err(ScaffoldError::Compatibility(
                "dummy embeddings with weaviate will not provide meaningful similarity search".to_string(),
            ));
        }
        if record.dimensions == 0 || record.dimensions > MAX_DIMENSIONS {
            return Err(ScaffoldError::Compatibility(format!(
                "model {} reports {} dimensions, expected 1..={MAX_DIMENSIONS}",
                record.model, record.dimensions
            )));
        }
        Ok(())
    }

    pub fn recommended_models(&self, provider: &str) -> Vec<&ModelRecord> {
        self.models_for(provider).filter(|r| r.recommended).collect()
    }

    pub fn default_model(provider: &str) -> &'static str {
        match provider.to_lowercase().as_str() {
            "openai" => "text-embedding-3-small",
            "ollama" => "nomic-embed-text:latest",
            "dummy" => "dummy",
            _ => "text-embedding-3-small",
        }
    }

    /// Provider-level settings written to the `[agent_memory.embedding]` section.
    pub fn provider_defaults(provider: &str) -> Vec<(&'static str, toml::Value)> {
        use toml::Value;
        match provider.to_lowercase().as_str() {
            "ollama" => vec![
                ("base_url", Value::String(OLLAMA_BASE_URL.to_string())),
                ("cache_embeddings", Value::Boolean(true)),
                ("max_batch_size", Value::Integer(100)),
                ("timeout_seconds", Value::Integer(30)),
            ],
            "dummy" => vec![
                ("cache_embeddings", Value::Boolean(false)),
                ("max_batch_size", Value::Integer(100)),
                ("timeout_seconds", Value::Integer(5)),
            ],
            _ => vec![
                ("cache_embeddings", Value::Boolean(true)),
                ("max_batch_size", Value::Integer(100)),
                ("timeout_seconds", Value::Integer(30)),
            ],
        }
    }

    /// Fill in the embedding provider, model, dimensions and retrieval
    /// tuning the caller left unset.
    pub fn apply_intelligent_defaults(&self, config: &mut ProjectConfig) {
        if !config.embedding_provider.is_empty() && config.embedding_model.is_empty() {
            config.embedding_model = Self::default_model(&config.embedding_provider).to_string();
        }

        if config.memory_enabled && config.embedding_provider.is_empty() {
            let (provider, model) = match config.memory_provider.as_str() {
                "memory" => ("dummy", "dummy"),
                _ => ("openai", "text-embedding-3-small"),
            };
            config.embedding_provider = provider.to_string();
            config.embedding_model = model.to_string();
        }

        if config.embedding_dimensions == 0 && !config.embedding_provider.is_empty() {
            config.embedding_dimensions =
                self.dimensions_for(&config.embedding_provider, &config.embedding_model);
        }

        if config.rag_enabled {
            if config.rag_chunk_size == 0 {
                config.rag_chunk_size = 1000;
            }
            if config.rag_overlap == 0 {
                config.rag_overlap = 100;
            }
            if config.rag_top_k == 0 {
                config.rag_top_k = 5;
            }
            if config.rag_score_threshold == 0.0 {
                config.rag_score_threshold = 0.7;
            }
        }
    }

    /// Advisory messages about the embedding setup. Never fatal.
    pub fn embedding_warnings(&self, config: &ProjectConfig) -> Vec<String> {
        let mut warnings = Vec::new();
        if !config.memory_enabled {
            return warnings;
        }
        let provider = config.embedding_provider.as_str();
        let model = config.embedding_model.as_str();

        match self.validate_compatibility(provider, model, &config.memory_provider) {
            Ok(()) => {}
            Err(ScaffoldError::ModelNotFound { .. }) => {
                let suggestions: Vec<&str> =
                    self.recommended_models(provider).iter().map(|r| r.model.as_str()).collect();
                let mut message = format!(
                    "Unknown embedding model '{model}' for provider '{provider}', assuming {} dimensions",
                    config.embedding_dimensions
                );
                if !suggestions.is_empty() {
                    message.push_str(&format!(" (recommended: {})", suggestions.join(", ")));
                }
                warnings.push(message);
            }
            Err(e) => warnings.push(e.to_string()),
        }

        match provider {
            "ollama" => {
                warnings.push("Ensure Ollama is running: ollama serve".to_string());
                warnings.push(format!("Ensure the embedding model is installed: ollama pull {model}"));
            }
            "openai" => warnings.push("Ensure OPENAI_API_KEY environment variable is set".to_string()),
            "dummy" => warnings.push(
                "Dummy embeddings are for testing only and do not provide semantic search".to_string(),
            ),
            _ => {}
        }

        if config.memory_provider == "memory" && config.rag_enabled {
            warnings.push(
                "In-memory provider with RAG: data will not persist between restarts".to_string(),
            );
        }
        warnings
    }
}

impl Default for EmbeddingRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
