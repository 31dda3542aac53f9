//! Project generation.
//!
//! [`Generator::plan`] runs every pure stage and returns the complete set of
//! files in memory. [`Generator::generate`] then commits them: the files are
//! written into a staging directory beside the target and the staging
//! directory is renamed onto the target. A failed run removes the staging
//! directory and leaves the target untouched.

mod context;

pub use context::{RenderInputs, agent_context, project_context};

use crate::agents::{self, AgentInfo};
use crate::config::ProjectConfig;
use crate::diagram;
use crate::embedding::EmbeddingRegistry;
use crate::error::{Result, ScaffoldError};
use crate::infra;
use crate::manifest;
use crate::naming;
use crate::orchestration::OrchestrationDescriptor;
use crate::render::{self, HandlebarsRenderer, Renderer};
use crate::validation;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const MANIFEST_FILE: &str = "agentflow.toml";
const PLACEHOLDER_DIRS: &[&str] = &["internal/config", "internal/handlers"];

/// One file of the generated tree, relative to the project root.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedFile {
    pub path: PathBuf,
    pub content: String,
    pub executable: bool,
}

impl GeneratedFile {
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self { path: path.into(), content: content.into(), executable: false }
    }

    pub fn executable(mut self) -> Self {
        self.executable = true;
        self
    }
}

/// Everything a run will write, before it touches the filesystem.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedProject {
    /// Configuration after sanitization and defaulting
    pub config: ProjectConfig,
    /// Name of the project root directory
    pub dir_name: String,
    pub agents: Vec<AgentInfo>,
    pub orchestration: OrchestrationDescriptor,
    /// Embedding dimensionality written to every artifact that needs it
    pub dimensions: u32,
    pub files: Vec<GeneratedFile>,
    pub warnings: Vec<String>,
}

impl GeneratedProject {
    pub fn file(&self, path: impl AsRef<Path>) -> Option<&GeneratedFile> {
        let path = path.as_ref();
        self.files.iter().find(|f| f.path == path)
    }
}

/// Outcome of a committed run.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationSummary {
    pub root: PathBuf,
    pub files: Vec<PathBuf>,
    pub warnings: Vec<String>,
}

pub struct Generator {
    registry: EmbeddingRegistry,
    renderer: Box<dyn Renderer>,
}

impl Default for Generator {
    fn default() -> Self {
        Self::new(EmbeddingRegistry::builtin(), HandlebarsRenderer::new())
    }
}

impl Generator {
    pub fn new(registry: EmbeddingRegistry, renderer: impl Renderer + 'static) -> Self {
        Self { registry, renderer: Box::new(renderer) }
    }

    pub fn registry(&self) -> &EmbeddingRegistry {
        &self.registry
    }

    /// Validate the configuration and build every artifact in memory.
    pub fn plan(&self, config: &ProjectConfig) -> Result<GeneratedProject> {
        let (config, warnings) = validation::validate_and_sanitize(config, &self.registry)?;
        let span = agk_telemetry::generation_span(&config.name);
        let _enter = span.enter();

        let dimensions = if config.memory_enabled { config.embedding_dimensions } else { 0 };
        let orchestration = OrchestrationDescriptor::synthesize(&config);
        let agents = agents::resolve_agents(&orchestration);
        tracing::info!(
            mode = %orchestration.mode,
            agents = agents.len(),
            dimensions,
            "resolved project topology"
        );

        let agents_import = naming::resolve_import_path(&config.name, "agents")?;
        let inputs = RenderInputs {
            config: &config,
            agents: &agents,
            orchestration: &orchestration,
            agents_import: &agents_import,
            dimensions,
        };
        let mut files = self.render_sources(&inputs)?;

        files.push(GeneratedFile::new(
            MANIFEST_FILE,
            manifest::agentflow_toml(&config, &agents, &orchestration, dimensions),
        ));

        let infra_files = infra::infrastructure_files(&config, dimensions);
        if !infra_files.is_empty() {
            tracing::info!(backend = %config.memory_provider, files = infra_files.len(), "generated infrastructure");
        }
        files.extend(infra_files);

        if config.visualize {
            let path = Path::new(&config.visualize_output_dir).join(diagram::WORKFLOW_FILE);
            files.push(GeneratedFile::new(path, diagram::workflow_markdown(&orchestration, &agents)));
        }

        for dir in PLACEHOLDER_DIRS {
            files.push(GeneratedFile::new(Path::new(dir).join(".gitkeep"), ""));
        }

        let dir_name = project_dir_name(&config.name).to_string();
        Ok(GeneratedProject { config, dir_name, agents, orchestration, dimensions, files, warnings })
    }

    fn render_sources(&self, inputs: &RenderInputs<'_>) -> Result<Vec<GeneratedFile>> {
        let renderer = self.renderer.as_ref();
        let base = project_context(inputs);
        let render_one = |artifact: &str, template: &str, context: &serde_json::Value| {
            let span = agk_telemetry::artifact_render_span(artifact);
            let _enter = span.enter();
            render::render_artifact(renderer, artifact, template, context)
                .map(|content| GeneratedFile::new(artifact, content))
        };

        let mut files = vec![
            GeneratedFile::new("go.mod", manifest::go_mod(&inputs.config.name)),
            render_one("README.md", render::PROJECT_README_TEMPLATE, &base)?,
            render_one("main.go", render::MAIN_GO_TEMPLATE, &base)?,
        ];

        let routing = agents::routing_chain(inputs.agents, inputs.config.responsible_ai);
        for (i, agent) in inputs.agents.iter().enumerate() {
            let context = agent_context(inputs, &base, i, &routing[i]);
            let artifact = format!("agents/{}", agent.file_name);
            files.push(render_one(artifact.as_str(), render::AGENT_GO_TEMPLATE, &context)?);
        }

        files.push(render_one("agents/README.md", render::AGENTS_README_TEMPLATE, &base)?);
        files.push(render_one("docs/CUSTOMIZATION.md", render::CUSTOMIZATION_TEMPLATE, &base)?);
        Ok(files)
    }

    /// Plan and write the project to `<output_dir>/<project>`.
    pub fn generate(&self, config: &ProjectConfig, output_dir: impl AsRef<Path>) -> Result<GenerationSummary> {
        let project = self.plan(config)?;
        let summary = commit(&project, output_dir.as_ref())?;
        tracing::info!(root = %summary.root.display(), files = summary.files.len(), "project generated");
        Ok(summary)
    }
}

/// Directory name for a module path: its last segment.
pub fn project_dir_name(module: &str) -> &str {
    module.rsplit('/').next().unwrap_or(module)
}

/// Write a planned project under `output_dir` atomically.
pub fn commit(project: &GeneratedProject, output_dir: &Path) -> Result<GenerationSummary> {
    let target = output_dir.join(&project.dir_name);
    let span = agk_telemetry::commit_span(&target.display().to_string());
    let _enter = span.enter();

    if target.exists() {
        return Err(ScaffoldError::DirectoryExists(target));
    }
    fs::create_dir_all(output_dir).map_err(|e| ScaffoldError::io(output_dir, e))?;

    let staging = output_dir.join(format!(".{}.staging-{}", project.dir_name, std::process::id()));
    if staging.exists() {
        fs::remove_dir_all(&staging).map_err(|e| ScaffoldError::io(&staging, e))?;
    }

    let written = write_files(&staging, &project.files)
        .and_then(|written| {
            fs::rename(&staging, &target).map_err(|e| ScaffoldError::io(&target, e))?;
            Ok(written)
        })
        .inspect_err(|_| {
            if let Err(e) = fs::remove_dir_all(&staging) {
                tracing::warn!(path = %staging.display(), error = %e, "failed to clean up staging directory");
            }
        })?;

    Ok(GenerationSummary { root: target, files: written, warnings: project.warnings.clone() })
}

fn write_files(root: &Path, files: &[GeneratedFile]) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(root).map_err(|e| ScaffoldError::io(root, e))?;
    let mut written = Vec::with_capacity(files.len());
    for file in files {
        let path = root.join(&file.path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ScaffoldError::io(parent, e))?;
        }
        fs::write(&path, &file.content).map_err(|e| ScaffoldError::io(&path, e))?;
        if file.executable {
            set_executable(&path)?;
        }
        tracing::debug!(path = %file.path.display(), "wrote file");
        written.push(file.path.clone());
    }
    Ok(written)
}

#[cfg(unix)]
fn set_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).map_err(|e| ScaffoldError::io(path, e))
}

#[cfg(not(unix))]
fn set_executable(_path: &Path) -> Result<()> {
    Ok(())
}
