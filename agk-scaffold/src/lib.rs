//! # agk-scaffold
//!
//! Generates complete multi-agent Go projects for the AgenticGoKit runtime
//! from a declarative [`ProjectConfig`].
//!
//! A run validates and sanitizes the configuration, resolves embedding
//! dimensions through an [`EmbeddingRegistry`], synthesizes the orchestration
//! topology, renders every artifact through a [`Renderer`], and finally writes
//! the tree to disk in one atomic step.
//!
//! ```no_run
//! use agk_scaffold::{Generator, ProjectConfig};
//!
//! # fn main() -> agk_scaffold::Result<()> {
//! let config = ProjectConfig { num_agents: 3, ..ProjectConfig::new("demo") };
//! let summary = Generator::default().generate(&config, ".")?;
//! println!("created {} files in {}", summary.files.len(), summary.root.display());
//! # Ok(())
//! # }
//! ```
//!
//! ## Generated layout
//!
//! | Path | When |
//! |------|------|
//! | `go.mod`, `main.go`, `agentflow.toml`, `README.md` | always |
//! | `agents/<name>.go`, `agents/README.md` | always |
//! | `docs/CUSTOMIZATION.md` | always |
//! | `docker-compose.yml`, `.env.example`, `setup.sh`, `setup.bat` | pgvector or weaviate memory |
//! | `init-db.sql` | pgvector memory |
//! | `<visualize_output_dir>/workflow.md` | `visualize = true` |

pub mod agents;
pub mod config;
pub mod diagram;
pub mod embedding;
pub mod error;
pub mod generator;
pub mod infra;
pub mod manifest;
pub mod naming;
pub mod orchestration;
pub mod render;
pub mod validation;

pub use agents::{AgentInfo, AgentRouting};
pub use config::ProjectConfig;
pub use embedding::{EmbeddingRegistry, ModelRecord};
pub use error::{Result, ScaffoldError};
pub use generator::{GeneratedFile, GeneratedProject, GenerationSummary, Generator};
pub use orchestration::{OrchestrationDescriptor, OrchestrationMode};
pub use render::{HandlebarsRenderer, Renderer};
pub use validation::{ValidationCode, ValidationIssue, ValidationResult, validate_and_sanitize};
