//! Project configuration consumed by the generator.

use crate::error::{Result, ScaffoldError};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_PROVIDER: &str = "azure";
pub const DEFAULT_ORCHESTRATION_MODE: &str = "sequential";
pub const DEFAULT_VISUALIZE_DIR: &str = "docs/workflows";

/// Declarative description of the project to scaffold.
///
/// Every field except `name` has a default, so a minimal configuration file
/// only needs `name = "demo"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub name: String,
    pub num_agents: usize,
    pub provider: String,
    pub responsible_ai: bool,
    pub error_handler: bool,

    // Tool integration
    pub mcp_enabled: bool,
    pub mcp_production: bool,
    pub with_cache: bool,
    pub with_metrics: bool,
    pub mcp_tools: Vec<String>,
    pub mcp_servers: Vec<String>,
    pub mcp_transport: String,
    pub cache_backend: String,
    pub metrics_port: u16,
    pub with_load_balancer: bool,
    pub connection_pool_size: u32,
    pub retry_policy: String,

    // Orchestration
    pub orchestration_mode: String,
    pub collaborative_agents: Vec<String>,
    pub sequential_agents: Vec<String>,
    pub loop_agent: String,
    pub max_iterations: u32,
    pub orchestration_timeout: u64,
    pub failure_threshold: f64,
    pub max_concurrency: u32,

    // Visualization
    pub visualize: bool,
    pub visualize_output_dir: String,

    // Memory and retrieval
    pub memory_enabled: bool,
    pub memory_provider: String,
    pub embedding_provider: String,
    pub embedding_model: String,
    pub embedding_dimensions: u32,
    pub rag_enabled: bool,
    pub rag_chunk_size: u32,
    pub rag_overlap: u32,
    pub rag_top_k: u32,
    pub rag_score_threshold: f64,
    pub hybrid_search: bool,
    pub session_memory: bool,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            num_agents: 2,
            provider: DEFAULT_PROVIDER.to_string(),
            responsible_ai: false,
            error_handler: false,
            mcp_enabled: false,
            mcp_production: false,
            with_cache: false,
            with_metrics: false,
            mcp_tools: vec!["web_search".to_string(), "summarize".to_string()],
            mcp_servers: vec!["docker".to_string()],
            mcp_transport: "tcp".to_string(),
            cache_backend: "memory".to_string(),
            metrics_port: 8080,
            with_load_balancer: false,
            connection_pool_size: 5,
            retry_policy: "exponential".to_string(),
            orchestration_mode: DEFAULT_ORCHESTRATION_MODE.to_string(),
            collaborative_agents: Vec::new(),
            sequential_agents: Vec::new(),
            loop_agent: String::new(),
            max_iterations: 5,
            orchestration_timeout: 30,
            failure_threshold: 0.5,
            max_concurrency: 10,
            visualize: false,
            visualize_output_dir: DEFAULT_VISUALIZE_DIR.to_string(),
            memory_enabled: false,
            memory_provider: "memory".to_string(),
            embedding_provider: String::new(),
            embedding_model: String::new(),
            embedding_dimensions: 0,
            rag_enabled: false,
            rag_chunk_size: 1000,
            rag_overlap: 100,
            rag_top_k: 5,
            rag_score_threshold: 0.7,
            hybrid_search: false,
            session_memory: false,
        }
    }
}

impl ProjectConfig {
    /// Default configuration for a named project.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| ScaffoldError::Config(e.to_string()))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ScaffoldError::io(path, e))?;
        Self::from_toml_str(&content)
    }

    /// Whether the memory backend needs an external store (and therefore
    /// container and schema files).
    pub fn requires_infrastructure(&self) -> bool {
        self.memory_enabled && matches!(self.memory_provider.as_str(), "pgvector" | "weaviate")
    }

    /// Default chat model for the configured LLM provider.
    pub fn default_llm_model(&self) -> &'static str {
        match self.provider.as_str() {
            "openai" | "azure" => "gpt-4",
            "ollama" => "llama2",
            "mock" => "mock-model",
            _ => "gpt-4",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_toml() {
        let config = ProjectConfig::from_toml_str(r#"name = "demo""#).unwrap();
        assert_eq!(config.name, "demo");
        assert_eq!(config.num_agents, 2);
        assert_eq!(config.orchestration_mode, "sequential");
        assert_eq!(config.orchestration_timeout, 30);
        assert!(config.embedding_provider.is_empty());
    }

    #[test]
    fn test_full_toml() {
        let config = ProjectConfig::from_toml_str(
            r#"
name = "research-bot"
num_agents = 3
provider = "ollama"
orchestration_mode = "mixed"
collaborative_agents = ["researcher", "analyzer"]
sequential_agents = ["writer"]
memory_enabled = true
memory_provider = "pgvector"
embedding_provider = "ollama"
embedding_model = "nomic-embed-text"
rag_enabled = true
"#,
        )
        .unwrap();
        assert_eq!(config.provider, "ollama");
        assert_eq!(config.collaborative_agents, vec!["researcher", "analyzer"]);
        assert!(config.requires_infrastructure());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = ProjectConfig::from_toml_str("name = ").unwrap_err();
        assert!(matches!(err, ScaffoldError::Config(_)));
    }

    #[test]
    fn test_default_llm_model() {
        let mut config = ProjectConfig::new("demo");
        assert_eq!(config.default_llm_model(), "gpt-4");
        config.provider = "ollama".into();
        assert_eq!(config.default_llm_model(), "llama2");
        config.provider = "mock".into();
        assert_eq!(config.default_llm_model(), "mock-model");
    }

    #[test]
    fn test_in_memory_backend_needs_no_infrastructure() {
        let config = ProjectConfig { memory_enabled: true, ..ProjectConfig::new("demo") };
        assert!(!config.requires_infrastructure());
    }
}
