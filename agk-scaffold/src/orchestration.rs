//! Orchestration topology synthesis.
//!
//! Turns the mode and optional agent lists of a [`ProjectConfig`] into the
//! concrete lists the generated runtime will use, filling defaults when the
//! caller only gave an agent count.

use crate::config::ProjectConfig;
use crate::manifest::toml_array;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OrchestrationMode {
    Route,
    Collaborative,
    Sequential,
    Loop,
    Mixed,
}

impl OrchestrationMode {
    pub const ALL: [OrchestrationMode; 5] =
        [Self::Route, Self::Collaborative, Self::Sequential, Self::Loop, Self::Mixed];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Route => "route",
            Self::Collaborative => "collaborative",
            Self::Sequential => "sequential",
            Self::Loop => "loop",
            Self::Mixed => "mixed",
        }
    }

    /// Parse a mode name, treating anything unrecognised as `route`.
    pub fn parse_lossy(mode: &str) -> Self {
        mode.parse().unwrap_or(Self::Route)
    }
}

impl fmt::Display for OrchestrationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrchestrationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s.trim().to_lowercase())
            .ok_or_else(|| format!("unknown orchestration mode: {s}"))
    }
}

/// Resolved orchestration topology for one generation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrchestrationDescriptor {
    pub mode: OrchestrationMode,
    pub timeout_seconds: u64,
    pub collaborative_agents: Vec<String>,
    pub sequential_agents: Vec<String>,
    pub loop_agent: Option<String>,
    pub max_iterations: u32,
    pub max_concurrency: u32,
    pub failure_threshold: f64,
    /// Every agent the topology references, in scaffolding order.
    pub agents: Vec<String>,
}

fn numbered_agents(from: usize, to: usize) -> Vec<String> {
    (from..=to).map(|i| format!("agent{i}")).collect()
}

impl OrchestrationDescriptor {
    pub fn synthesize(config: &ProjectConfig) -> Self {
        let count = config.num_agents.max(1);
        let mode = OrchestrationMode::parse_lossy(&config.orchestration_mode);

        let mut collaborative_agents = Vec::new();
        let mut sequential_agents = Vec::new();
        let mut loop_agent = None;

        let explicit_or_numbered = |list: &[String]| {
            if list.is_empty() { numbered_agents(1, count) } else { list.to_vec() }
        };

        let agents = match mode {
            OrchestrationMode::Route => numbered_agents(1, count),
            OrchestrationMode::Collaborative => {
                collaborative_agents = explicit_or_numbered(&config.collaborative_agents);
                collaborative_agents.clone()
            }
            OrchestrationMode::Sequential => {
                sequential_agents = explicit_or_numbered(&config.sequential_agents);
                sequential_agents.clone()
            }
            OrchestrationMode::Loop => {
                let agent = if config.loop_agent.is_empty() {
                    "agent1".to_string()
                } else {
                    config.loop_agent.clone()
                };
                loop_agent = Some(agent.clone());
                vec![agent]
            }
            OrchestrationMode::Mixed => {
                if config.collaborative_agents.is_empty() && config.sequential_agents.is_empty() {
                    collaborative_agents = vec!["agent1".to_string()];
                    sequential_agents = numbered_agents(2, count);
                } else {
                    collaborative_agents = config.collaborative_agents.clone();
                    sequential_agents = config.sequential_agents.clone();
                }
                collaborative_agents.iter().chain(&sequential_agents).cloned().collect()
            }
        };

        Self {
            mode,
            timeout_seconds: config.orchestration_timeout,
            collaborative_agents,
            sequential_agents,
            loop_agent,
            max_iterations: config.max_iterations,
            max_concurrency: config.max_concurrency,
            failure_threshold: config.failure_threshold,
            agents,
        }
    }

    /// The `[orchestration]` section of `agentflow.toml`.
    pub fn to_toml_fragment(&self) -> String {
        let mut out = format!(
            "[orchestration]\nmode = \"{}\"\ntimeout_seconds = {}\n",
            self.mode, self.timeout_seconds
        );
        match self.mode {
            OrchestrationMode::Sequential => {
                out.push_str(&format!("sequential_agents = {}\n", toml_array(&self.sequential_agents)));
            }
            OrchestrationMode::Loop => {
                let agent = self.loop_agent.as_deref().unwrap_or("agent1");
                out.push_str(&format!("loop_agent = {}\n", crate::manifest::toml_string(agent)));
                out.push_str(&format!("max_iterations = {}\n", self.max_iterations));
            }
            OrchestrationMode::Mixed => {
                if !self.collaborative_agents.is_empty() {
                    out.push_str(&format!(
                        "collaborative_agents = {}\n",
                        toml_array(&self.collaborative_agents)
                    ));
                }
                if !self.sequential_agents.is_empty() {
                    out.push_str(&format!("sequential_agents = {}\n", toml_array(&self.sequential_agents)));
                }
            }
            OrchestrationMode::Collaborative | OrchestrationMode::Route => {}
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(mode: &str, num_agents: usize) -> ProjectConfig {
        ProjectConfig {
            orchestration_mode: mode.to_string(),
            num_agents,
            ..ProjectConfig::new("demo")
        }
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("Sequential".parse::<OrchestrationMode>().unwrap(), OrchestrationMode::Sequential);
        assert!("parallel".parse::<OrchestrationMode>().is_err());
        assert_eq!(OrchestrationMode::parse_lossy("parallel"), OrchestrationMode::Route);
    }

    #[test]
    fn test_sequential_default() {
        let descriptor = OrchestrationDescriptor::synthesize(&config("sequential", 3));
        assert_eq!(descriptor.sequential_agents, vec!["agent1", "agent2", "agent3"]);
        assert_eq!(
            descriptor.to_toml_fragment(),
            "[orchestration]\nmode = \"sequential\"\ntimeout_seconds = 30\nsequential_agents = [\"agent1\", \"agent2\", \"agent3\"]\n"
        );
    }

    #[test]
    fn test_sequential_explicit() {
        let mut cfg = config("sequential", 5);
        cfg.sequential_agents = vec!["researcher".into(), "writer".into()];
        let descriptor = OrchestrationDescriptor::synthesize(&cfg);
        assert_eq!(descriptor.agents, vec!["researcher", "writer"]);
    }

    #[test]
    fn test_loop() {
        let mut cfg = config("loop", 3);
        cfg.max_iterations = 7;
        let descriptor = OrchestrationDescriptor::synthesize(&cfg);
        assert_eq!(descriptor.agents, vec!["agent1"]);
        assert!(descriptor.to_toml_fragment().ends_with("loop_agent = \"agent1\"\nmax_iterations = 7\n"));

        cfg.loop_agent = "refiner".into();
        assert_eq!(OrchestrationDescriptor::synthesize(&cfg).loop_agent.as_deref(), Some("refiner"));
    }

    #[test]
    fn test_mixed_default_split() {
        let descriptor = OrchestrationDescriptor::synthesize(&config("mixed", 4));
        assert_eq!(descriptor.collaborative_agents, vec!["agent1"]);
        assert_eq!(descriptor.sequential_agents, vec!["agent2", "agent3", "agent4"]);
        assert_eq!(descriptor.agents.len(), 4);
    }

    #[test]
    fn test_mixed_partial_override() {
        let mut cfg = config("mixed", 4);
        cfg.sequential_agents = vec!["writer".into(), "editor".into()];
        let descriptor = OrchestrationDescriptor::synthesize(&cfg);
        assert!(descriptor.collaborative_agents.is_empty());
        assert_eq!(descriptor.agents, vec!["writer", "editor"]);
        assert!(!descriptor.to_toml_fragment().contains("collaborative_agents"));
    }

    #[test]
    fn test_collaborative_and_route_emit_mode_and_timeout_only() {
        for mode in ["collaborative", "route"] {
            let mut cfg = config(mode, 3);
            cfg.orchestration_timeout = 45;
            let descriptor = OrchestrationDescriptor::synthesize(&cfg);
            assert_eq!(
                descriptor.to_toml_fragment(),
                format!("[orchestration]\nmode = \"{mode}\"\ntimeout_seconds = 45\n")
            );
            assert_eq!(descriptor.agents.len(), 3);
        }
    }

    #[test]
    fn test_zero_agents_means_one() {
        let descriptor = OrchestrationDescriptor::synthesize(&config("route", 0));
        assert_eq!(descriptor.agents, vec!["agent1"]);
    }
}
