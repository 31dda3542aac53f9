//! Configuration validation and sanitization.
//!
//! Runs before anything touches the filesystem. Every problem found is
//! collected so the caller sees the whole list at once.

use crate::config::ProjectConfig;
use crate::embedding::{EmbeddingRegistry, MAX_DIMENSIONS};
use crate::error::{Result, ScaffoldError};
use crate::naming;
use crate::orchestration::{OrchestrationDescriptor, OrchestrationMode};
use regex::Regex;
use std::collections::HashMap;
use std::path::{Component, Path};
use std::sync::OnceLock;

pub const LLM_PROVIDERS: &[&str] = &["openai", "azure", "ollama", "mock"];
pub const MEMORY_PROVIDERS: &[&str] = &["memory", "pgvector", "weaviate"];
pub const EMBEDDING_PROVIDERS: &[&str] = &["openai", "ollama", "dummy"];
pub const CACHE_BACKENDS: &[&str] = &["memory", "redis"];
pub const RETRY_POLICIES: &[&str] = &["exponential", "linear", "fixed"];

const MAX_LOOP_ITERATIONS: u32 = 100;
const MAX_CONCURRENCY: u32 = 100;

static MODEL_NAME_REGEX: OnceLock<Regex> = OnceLock::new();

// Model names are written into SQL comments, env files and scripts.
fn model_name_regex() -> &'static Regex {
    MODEL_NAME_REGEX
        .get_or_init(|| Regex::new(r"^[A-Za-z0-9._:/-]+$").expect("Invalid regex pattern"))
}

/// A single validation finding
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    pub code: ValidationCode,
    pub message: String,
    /// Offending value or field
    pub context: Option<String>,
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ctx) = &self.context {
            write!(f, "[{}] {}: {}", self.code, ctx, self.message)
        } else {
            write!(f, "[{}] {}", self.code, self.message)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationCode {
    /// Project name was empty or rewritten
    InvalidName,
    /// Unknown LLM, memory or embedding provider
    InvalidProvider,
    /// Unknown orchestration mode
    InvalidMode,
    /// Option given without the feature it depends on
    ConflictingOption,
    /// Unknown enumerated value
    InvalidValue,
    /// Numeric option outside its range
    OutOfRange,
    InvalidAgentName,
    DuplicateAgentName,
    InvalidPath,
    /// Advisory note about the embedding setup
    Embedding,
}

impl std::fmt::Display for ValidationCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidName => write!(f, "INVALID_NAME"),
            Self::InvalidProvider => write!(f, "INVALID_PROVIDER"),
            Self::InvalidMode => write!(f, "INVALID_MODE"),
            Self::ConflictingOption => write!(f, "CONFLICTING_OPTION"),
            Self::InvalidValue => write!(f, "INVALID_VALUE"),
            Self::OutOfRange => write!(f, "OUT_OF_RANGE"),
            Self::InvalidAgentName => write!(f, "INVALID_AGENT_NAME"),
            Self::DuplicateAgentName => write!(f, "DUPLICATE_AGENT_NAME"),
            Self::InvalidPath => write!(f, "INVALID_PATH"),
            Self::Embedding => write!(f, "EMBEDDING"),
        }
    }
}

#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, code: ValidationCode, message: impl Into<String>) {
        self.errors.push(ValidationIssue { code, message: message.into(), context: None });
    }

    pub fn add_error_with_context(
        &mut self,
        code: ValidationCode,
        message: impl Into<String>,
        context: impl Into<String>,
    ) {
        self.errors.push(ValidationIssue {
            code,
            message: message.into(),
            context: Some(context.into()),
        });
    }

    pub fn add_warning(&mut self, code: ValidationCode, message: impl Into<String>) {
        self.warnings.push(ValidationIssue { code, message: message.into(), context: None });
    }

    /// Collapse the errors into one [`ScaffoldError::Validation`].
    pub fn into_error(self) -> Option<ScaffoldError> {
        if self.errors.is_empty() {
            return None;
        }
        let messages: Vec<String> = self.errors.iter().map(ToString::to_string).collect();
        Some(ScaffoldError::Validation(messages.join("; ")))
    }
}

fn one_of(
    result: &mut ValidationResult,
    code: ValidationCode,
    field: &str,
    value: &str,
    allowed: &[&str],
) {
    if !allowed.contains(&value) {
        result.add_error_with_context(
            code,
            format!("{field} must be one of: {}", allowed.join(", ")),
            value,
        );
    }
}

/// Normalize a configuration and collect every problem with it.
///
/// The returned configuration has defaults applied even when the result
/// carries errors, so callers can still report on it.
pub fn check(config: &ProjectConfig, registry: &EmbeddingRegistry) -> (ProjectConfig, ValidationResult) {
    let mut config = config.clone();
    let mut result = ValidationResult::new();

    check_name(&mut config, &mut result);
    imply_memory(&mut config, &mut result);
    one_of(&mut result, ValidationCode::InvalidProvider, "provider", &config.provider, LLM_PROVIDERS);
    check_mcp(&mut config, &mut result);
    check_orchestration(&config, &mut result);
    check_memory(&mut config, registry, &mut result);
    check_agent_names(&config, &mut result);
    check_visualize_dir(&config, &mut result);

    (config, result)
}

/// Validate, sanitize and default a configuration.
///
/// Returns the ready-to-generate configuration and the warnings raised
/// along the way; all warnings are also logged.
pub fn validate_and_sanitize(
    config: &ProjectConfig,
    registry: &EmbeddingRegistry,
) -> Result<(ProjectConfig, Vec<String>)> {
    let (config, result) = check(config, registry);
    for warning in &result.warnings {
        tracing::warn!(code = %warning.code, "{}", warning.message);
    }
    let warnings: Vec<String> = result.warnings.iter().map(|w| w.message.clone()).collect();
    match result.into_error() {
        Some(err) => Err(err),
        None => Ok((config, warnings)),
    }
}

fn check_name(config: &mut ProjectConfig, result: &mut ValidationResult) {
    if config.name.trim().is_empty() {
        result.add_error(ValidationCode::InvalidName, "project name is required");
        return;
    }
    let sanitized = naming::sanitize_module_name(&config.name);
    if sanitized != config.name {
        result.add_warning(
            ValidationCode::InvalidName,
            format!("Project name '{}' sanitized to '{sanitized}'", config.name),
        );
        config.name = sanitized;
    }
    if config.num_agents == 0 {
        config.num_agents = 1;
    }
}

fn imply_memory(config: &mut ProjectConfig, result: &mut ValidationResult) {
    if config.memory_enabled {
        return;
    }
    let implied_by = [
        (config.rag_enabled, "RAG"),
        (config.session_memory, "session memory"),
        (config.hybrid_search, "hybrid search"),
    ];
    if let Some((_, feature)) = implied_by.iter().find(|(on, _)| *on) {
        result.add_warning(
            ValidationCode::ConflictingOption,
            format!("{feature} requires memory, enabling memory"),
        );
        config.memory_enabled = true;
    }
}

fn check_mcp(config: &mut ProjectConfig, result: &mut ValidationResult) {
    if config.mcp_production && !config.mcp_enabled {
        result.add_warning(
            ValidationCode::ConflictingOption,
            "Production MCP requires MCP, enabling MCP",
        );
        config.mcp_enabled = true;
    }
    if config.with_cache && !config.mcp_enabled {
        result.add_error(ValidationCode::ConflictingOption, "with_cache requires mcp_enabled");
    }
    if config.with_metrics && !config.mcp_enabled {
        result.add_error(ValidationCode::ConflictingOption, "with_metrics requires mcp_enabled");
    }
    if config.with_load_balancer && !config.mcp_production {
        result.add_error(ValidationCode::ConflictingOption, "with_load_balancer requires mcp_production");
    }
    if config.mcp_enabled {
        one_of(result, ValidationCode::InvalidValue, "cache_backend", &config.cache_backend, CACHE_BACKENDS);
        one_of(result, ValidationCode::InvalidValue, "retry_policy", &config.retry_policy, RETRY_POLICIES);
    }
}

fn check_orchestration(config: &ProjectConfig, result: &mut ValidationResult) {
    let mode = match config.orchestration_mode.parse::<OrchestrationMode>() {
        Ok(mode) => {
            check_agent_lists(config, mode, result);
            Some(mode)
        }
        Err(message) => {
            result.add_error_with_context(ValidationCode::InvalidMode, message, &config.orchestration_mode);
            None
        }
    };

    if config.max_iterations == 0 {
        result.add_error(ValidationCode::OutOfRange, "max_iterations must be positive");
    } else if mode == Some(OrchestrationMode::Loop) && config.max_iterations > MAX_LOOP_ITERATIONS {
        result.add_error_with_context(
            ValidationCode::OutOfRange,
            format!("max_iterations cannot exceed {MAX_LOOP_ITERATIONS} in loop mode"),
            config.max_iterations.to_string(),
        );
    }
    if config.orchestration_timeout == 0 {
        result.add_error(ValidationCode::OutOfRange, "orchestration_timeout must be positive");
    }
    if !(0.0..=1.0).contains(&config.failure_threshold) {
        result.add_error_with_context(
            ValidationCode::OutOfRange,
            "failure_threshold must be between 0.0 and 1.0",
            config.failure_threshold.to_string(),
        );
    }
    if !(1..=MAX_CONCURRENCY).contains(&config.max_concurrency) {
        result.add_error_with_context(
            ValidationCode::OutOfRange,
            format!("max_concurrency must be between 1 and {MAX_CONCURRENCY}"),
            config.max_concurrency.to_string(),
        );
    }
}

fn check_agent_lists(config: &ProjectConfig, mode: OrchestrationMode, result: &mut ValidationResult) {
    let collaborative = !config.collaborative_agents.is_empty();
    let sequential = !config.sequential_agents.is_empty();
    if collaborative && !matches!(mode, OrchestrationMode::Collaborative | OrchestrationMode::Mixed) {
        result.add_error(
            ValidationCode::ConflictingOption,
            "collaborative_agents can only be used with collaborative or mixed orchestration",
        );
    }
    if sequential && !matches!(mode, OrchestrationMode::Sequential | OrchestrationMode::Mixed) {
        result.add_error(
            ValidationCode::ConflictingOption,
            "sequential_agents can only be used with sequential or mixed orchestration",
        );
    }
    if !config.loop_agent.is_empty() && mode != OrchestrationMode::Loop {
        result.add_error(ValidationCode::ConflictingOption, "loop_agent can only be used with loop orchestration");
    }
    if mode == OrchestrationMode::Collaborative && config.collaborative_agents.len() == 1 {
        result.add_error(ValidationCode::OutOfRange, "collaborative mode requires at least 2 agents");
    }
    if mode == OrchestrationMode::Sequential && config.sequential_agents.len() == 1 {
        result.add_error(ValidationCode::OutOfRange, "sequential mode requires at least 2 agents");
    }
}

fn check_memory(config: &mut ProjectConfig, registry: &EmbeddingRegistry, result: &mut ValidationResult) {
    registry.apply_intelligent_defaults(config);
    if !config.memory_enabled {
        return;
    }

    one_of(result, ValidationCode::InvalidProvider, "memory_provider", &config.memory_provider, MEMORY_PROVIDERS);
    one_of(
        result,
        ValidationCode::InvalidProvider,
        "embedding_provider",
        &config.embedding_provider,
        EMBEDDING_PROVIDERS,
    );
    if !model_name_regex().is_match(&config.embedding_model) {
        result.add_error_with_context(
            ValidationCode::InvalidValue,
            "embedding_model may only contain letters, digits and . _ : / -",
            config.embedding_model.escape_debug().to_string(),
        );
    }
    if config.embedding_dimensions > MAX_DIMENSIONS {
        result.add_error_with_context(
            ValidationCode::OutOfRange,
            format!("embedding_dimensions cannot exceed {MAX_DIMENSIONS}"),
            config.embedding_dimensions.to_string(),
        );
    }

    if config.rag_enabled {
        if config.rag_chunk_size == 0 {
            result.add_error(ValidationCode::OutOfRange, "rag_chunk_size must be positive");
        } else if config.rag_overlap >= config.rag_chunk_size {
            result.add_error_with_context(
                ValidationCode::OutOfRange,
                "rag_overlap must be smaller than rag_chunk_size",
                config.rag_overlap.to_string(),
            );
        }
        if config.rag_top_k == 0 {
            result.add_error(ValidationCode::OutOfRange, "rag_top_k must be positive");
        }
        if !(0.0..=1.0).contains(&config.rag_score_threshold) {
            result.add_error_with_context(
                ValidationCode::OutOfRange,
                "rag_score_threshold must be between 0.0 and 1.0",
                config.rag_score_threshold.to_string(),
            );
        }
    }

    for warning in registry.embedding_warnings(config) {
        result.add_warning(ValidationCode::Embedding, warning);
    }
}

fn check_agent_names(config: &ProjectConfig, result: &mut ValidationResult) {
    let explicit = config
        .collaborative_agents
        .iter()
        .chain(&config.sequential_agents)
        .chain(std::iter::once(&config.loop_agent).filter(|name| !name.is_empty()));
    for name in explicit {
        if let Err(ScaffoldError::InvalidName { reason, .. }) = naming::validate_agent_name(name) {
            result.add_error_with_context(ValidationCode::InvalidAgentName, reason, name.as_str());
        }
    }

    // Distinct names can still collide once turned into Go identifiers.
    let descriptor = OrchestrationDescriptor::synthesize(config);
    let mut seen: HashMap<String, &str> = HashMap::new();
    for name in &descriptor.agents {
        let type_name = naming::go_type_name(name);
        if let Some(previous) = seen.insert(type_name, name) {
            let message = if previous == name.as_str() {
                "agent name is listed more than once".to_string()
            } else {
                format!("agent name collides with '{previous}'")
            };
            result.add_error_with_context(ValidationCode::DuplicateAgentName, message, name.as_str());
        }
    }
}

fn check_visualize_dir(config: &ProjectConfig, result: &mut ValidationResult) {
    if !config.visualize {
        return;
    }
    let dir = Path::new(&config.visualize_output_dir);
    if config.visualize_output_dir.trim().is_empty() {
        result.add_error(ValidationCode::InvalidPath, "visualize_output_dir cannot be empty");
    } else if dir.is_absolute() || dir.components().any(|c| !matches!(c, Component::Normal(_) | Component::CurDir)) {
        result.add_error_with_context(
            ValidationCode::InvalidPath,
            "visualize_output_dir must be a relative path inside the project",
            config.visualize_output_dir.as_str(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validate(config: ProjectConfig) -> Result<(ProjectConfig, Vec<String>)> {
        validate_and_sanitize(&config, &EmbeddingRegistry::builtin())
    }

    fn issues(config: ProjectConfig) -> ValidationResult {
        check(&config, &EmbeddingRegistry::builtin()).1
    }

    #[test]
    fn test_default_config_is_valid() {
        let (config, warnings) = validate(ProjectConfig::new("demo")).unwrap();
        assert_eq!(config.name, "demo");
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_name_is_sanitized_with_warning() {
        let (config, warnings) = validate(ProjectConfig::new("My Project@123!")).unwrap();
        assert_eq!(config.name, "my-project123");
        assert!(warnings[0].contains("sanitized"));
    }

    #[test]
    fn test_empty_name_is_rejected() {
        let err = validate(ProjectConfig::new("  ")).unwrap_err();
        assert!(err.to_string().contains("INVALID_NAME"));
    }

    #[test]
    fn test_zero_agents_becomes_one() {
        let (config, _) = validate(ProjectConfig { num_agents: 0, ..ProjectConfig::new("demo") }).unwrap();
        assert_eq!(config.num_agents, 1);
    }

    #[test]
    fn test_rag_implies_memory() {
        let (config, warnings) =
            validate(ProjectConfig { rag_enabled: true, ..ProjectConfig::new("demo") }).unwrap();
        assert!(config.memory_enabled);
        assert_eq!(config.embedding_provider, "dummy");
        assert!(warnings.iter().any(|w| w.contains("requires memory")));
    }

    #[test]
    fn test_errors_are_collected() {
        let result = issues(ProjectConfig {
            provider: "bedrock".into(),
            orchestration_mode: "parallel".into(),
            max_concurrency: 0,
            ..ProjectConfig::new("demo")
        });
        let codes: Vec<ValidationCode> = result.errors.iter().map(|e| e.code).collect();
        assert!(codes.contains(&ValidationCode::InvalidProvider));
        assert!(codes.contains(&ValidationCode::InvalidMode));
        assert!(codes.contains(&ValidationCode::OutOfRange));
    }

    #[test]
    fn test_range_checks_run_despite_unknown_mode() {
        let result = issues(ProjectConfig {
            orchestration_mode: "parallel".into(),
            orchestration_timeout: 0,
            failure_threshold: 2.0,
            max_concurrency: 0,
            ..ProjectConfig::new("demo")
        });
        let messages: Vec<&str> = result.errors.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(result.errors.len(), 4, "{messages:?}");
        assert!(messages.iter().any(|m| m.contains("orchestration_timeout")));
        assert!(messages.iter().any(|m| m.contains("failure_threshold")));
        assert!(messages.iter().any(|m| m.contains("max_concurrency")));
    }

    #[test]
    fn test_embedding_model_charset() {
        for model in ["nomic-embed-text\nDROP TABLE documents;", "model name", "a'b", "x$(id)"] {
            let result = issues(ProjectConfig {
                memory_enabled: true,
                embedding_provider: "ollama".into(),
                embedding_model: model.into(),
                ..ProjectConfig::new("demo")
            });
            assert!(
                result.errors.iter().any(|e| e.code == ValidationCode::InvalidValue),
                "{model:?} should be rejected"
            );
        }
        let result = issues(ProjectConfig {
            memory_enabled: true,
            embedding_provider: "ollama".into(),
            embedding_model: "hf.co/org/model:Q4_K_M".into(),
            ..ProjectConfig::new("demo")
        });
        assert!(result.is_valid());
    }

    #[test]
    fn test_agent_file_names_must_build() {
        let result = issues(ProjectConfig {
            sequential_agents: vec!["fetch".into(), "review_test".into(), "chat_windows".into()],
            ..ProjectConfig::new("demo")
        });
        let rejected: Vec<_> = result
            .errors
            .iter()
            .filter(|e| e.code == ValidationCode::InvalidAgentName)
            .filter_map(|e| e.context.as_deref())
            .collect();
        assert_eq!(rejected, vec!["review_test", "chat_windows"]);
    }

    #[test]
    fn test_validation_error_message_lists_issues() {
        let err = validate(ProjectConfig { provider: "bedrock".into(), ..ProjectConfig::new("demo") })
            .unwrap_err();
        assert_eq!(err.stage(), "validation");
        assert!(err.to_string().contains("[INVALID_PROVIDER] bedrock"));
    }

    #[test]
    fn test_mcp_dependencies() {
        let result = issues(ProjectConfig { with_cache: true, ..ProjectConfig::new("demo") });
        assert!(result.errors.iter().any(|e| e.message.contains("with_cache requires")));

        let (config, _) =
            validate(ProjectConfig { mcp_production: true, ..ProjectConfig::new("demo") }).unwrap();
        assert!(config.mcp_enabled);

        let result = issues(ProjectConfig {
            mcp_enabled: true,
            cache_backend: "memcached".into(),
            ..ProjectConfig::new("demo")
        });
        assert!(!result.is_valid());
    }

    #[test]
    fn test_lists_must_match_mode() {
        let result = issues(ProjectConfig {
            orchestration_mode: "route".into(),
            sequential_agents: vec!["a".into(), "b".into()],
            loop_agent: "c".into(),
            ..ProjectConfig::new("demo")
        });
        assert_eq!(result.errors.len(), 2);
    }

    #[test]
    fn test_single_explicit_sequential_agent_rejected() {
        let result = issues(ProjectConfig {
            sequential_agents: vec!["writer".into()],
            ..ProjectConfig::new("demo")
        });
        assert!(result.errors.iter().any(|e| e.message.contains("at least 2")));
    }

    #[test]
    fn test_loop_iteration_limit() {
        let result = issues(ProjectConfig {
            orchestration_mode: "loop".into(),
            max_iterations: 101,
            ..ProjectConfig::new("demo")
        });
        assert!(!result.is_valid());
    }

    #[test]
    fn test_agent_name_rules() {
        let result = issues(ProjectConfig {
            orchestration_mode: "mixed".into(),
            collaborative_agents: vec!["Researcher".into(), "writer".into()],
            sequential_agents: vec!["writer".into(), "data-analyzer".into(), "data_analyzer".into()],
            ..ProjectConfig::new("demo")
        });
        let codes: Vec<ValidationCode> = result.errors.iter().map(|e| e.code).collect();
        assert_eq!(codes.iter().filter(|c| **c == ValidationCode::InvalidAgentName).count(), 1);
        assert_eq!(codes.iter().filter(|c| **c == ValidationCode::DuplicateAgentName).count(), 2);
    }

    #[test]
    fn test_rag_ranges() {
        let result = issues(ProjectConfig {
            memory_enabled: true,
            rag_enabled: true,
            rag_chunk_size: 100,
            rag_overlap: 100,
            rag_score_threshold: 1.5,
            ..ProjectConfig::new("demo")
        });
        assert_eq!(result.errors.len(), 2);
    }

    #[test]
    fn test_unknown_embedding_model_is_a_warning() {
        let (config, warnings) = validate(ProjectConfig {
            memory_enabled: true,
            embedding_provider: "ollama".into(),
            embedding_model: "totally-unknown-xyz".into(),
            ..ProjectConfig::new("demo")
        })
        .unwrap();
        assert_eq!(config.embedding_dimensions, 768);
        assert!(warnings.iter().any(|w| w.contains("Unknown embedding model")));
    }

    #[test]
    fn test_visualize_dir_must_stay_inside_project() {
        for dir in ["../outside", "/tmp/abs", "docs/../../x"] {
            let result = issues(ProjectConfig {
                visualize: true,
                visualize_output_dir: dir.into(),
                ..ProjectConfig::new("demo")
            });
            assert!(!result.is_valid(), "{dir} should be rejected");
        }
        let result = issues(ProjectConfig { visualize: true, ..ProjectConfig::new("demo") });
        assert!(result.is_valid());
    }
}
