//! Agent descriptors and their per-agent tuning.

use crate::naming;
use crate::orchestration::{OrchestrationDescriptor, OrchestrationMode};
use serde::Serialize;

pub const RESPONSIBLE_AI_AGENT: &str = "responsible_ai";

/// One scaffolded agent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentInfo {
    pub name: String,
    pub file_name: String,
    pub display_name: String,
    /// Exported Go identifier used for the handler type and constructor.
    pub type_name: String,
    pub purpose: String,
    pub role: String,
}

impl AgentInfo {
    pub fn new(name: &str, role: &str) -> Self {
        Self {
            name: name.to_string(),
            file_name: format!("{name}.go"),
            display_name: naming::display_name(name),
            type_name: naming::go_type_name(name),
            purpose: infer_purpose(name).to_string(),
            role: role.to_string(),
        }
    }
}

/// Descriptors for every agent the orchestration references, in order.
pub fn resolve_agents(orchestration: &OrchestrationDescriptor) -> Vec<AgentInfo> {
    let mode = orchestration.mode.as_str();
    let mut agents: Vec<AgentInfo> = match orchestration.mode {
        OrchestrationMode::Mixed => orchestration
            .collaborative_agents
            .iter()
            .map(|name| AgentInfo::new(name, "collaborative"))
            .chain(orchestration.sequential_agents.iter().map(|name| AgentInfo::new(name, "sequential")))
            .collect(),
        _ => orchestration.agents.iter().map(|name| AgentInfo::new(name, mode)).collect(),
    };
    if agents.is_empty() {
        agents.push(AgentInfo::new("agent1", mode));
    }
    agents
}

pub fn infer_purpose(name: &str) -> &'static str {
    let name = name.to_lowercase();
    let has = |needle: &str| name.contains(needle);

    if has("document") && has("ingester") {
        "Ingests and processes documents for the knowledge base"
    } else if has("query") && has("processor") {
        "Analyzes and optimizes user queries for retrieval"
    } else if has("response") && has("generator") {
        "Generates comprehensive responses using retrieved information"
    } else if has("research") {
        "Researches topics and gathers comprehensive information"
    } else if has("analyzer") || has("analysis") {
        "Analyzes and processes input data to extract insights"
    } else if has("synthesizer") || has("synthesis") {
        "Synthesizes information and creates comprehensive responses"
    } else if has("writer") || has("content") {
        "Creates and formats written content"
    } else if has("reviewer") || has("validator") {
        "Reviews and validates content for accuracy and quality"
    } else if has("processor") {
        "Processes and transforms data"
    } else if has("collector") {
        "Collects and organizes information"
    } else if has("coordinator") || has("manager") {
        "Coordinates workflow and manages tasks"
    } else if has("ingester") {
        "Ingests and preprocesses data"
    } else if has("outputter") {
        "Formats and outputs final results"
    } else if has("fact") {
        "Verifies facts and checks information accuracy"
    } else {
        "Provides general assistance and processing capabilities"
    }
}

pub fn capabilities_for(name: &str) -> Vec<&'static str> {
    let has = |needle: &str| name.contains(needle);

    if has("research") {
        vec!["research", "information_gathering", "fact_checking", "source_identification"]
    } else if has("writer") || has("content") {
        vec!["content_creation", "writing", "editing", "documentation"]
    } else if has("review") || has("validator") {
        vec!["fact_checking", "editing", "analysis", "testing"]
    } else if has("analyst") || has("analyzer") {
        vec!["data_analysis", "pattern_recognition", "insight_generation", "trend_analysis"]
    } else if has("processor") {
        vec!["data_processing", "text_analysis", "pattern_recognition", "analysis"]
    } else if has("summary") || has("summarizer") {
        vec!["summarization", "text_analysis", "content_creation", "editing"]
    } else if has("creative") {
        vec!["content_creation", "writing", "editing", "analysis"]
    } else if has("coordinator") || has("manager") {
        vec!["analysis", "data_processing", "documentation", "research"]
    } else if has("collector") {
        vec!["information_gathering", "data_processing", "source_identification", "research"]
    } else if has("synthesizer") {
        vec!["analysis", "summarization", "insight_generation", "content_creation"]
    } else {
        vec!["analysis", "text_analysis", "data_processing"]
    }
}

/// Sampling temperature, rounded to one decimal and never below 0.1.
pub fn temperature_for(name: &str, index: usize) -> f64 {
    let has = |needle: &str| name.contains(needle);

    let temperature = if has("research") || has("fact") {
        0.3
    } else if has("creative") || has("writer") {
        0.8
    } else if has("review") || has("validator") {
        0.2
    } else if has("analyst") || has("processor") {
        0.5
    } else if index == 0 {
        0.7
    } else {
        0.6 - index as f64 * 0.1
    };
    ((temperature * 10.0).round() / 10.0).max(0.1)
}

pub fn max_tokens_for(name: &str) -> u32 {
    let has = |needle: &str| name.contains(needle);

    if has("writer") || has("content") {
        3000
    } else if has("research") || has("analyst") {
        2500
    } else if has("review") || has("validator") {
        1500
    } else if has("summary") || has("brief") {
        1000
    } else {
        2000
    }
}

/// Advisory routing for one agent in the default linear chain.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentRouting {
    pub previous: Option<String>,
    pub next: Option<String>,
    pub comment: String,
}

/// Linear predecessor/successor chain over all agents. The last agent hands
/// off to the responsible-AI reviewer when enabled.
pub fn routing_chain(agents: &[AgentInfo], responsible_ai: bool) -> Vec<AgentRouting> {
    agents
        .iter()
        .enumerate()
        .map(|(i, _)| {
            let previous = i.checked_sub(1).map(|p| agents[p].name.clone());
            let (next, comment) = match agents.get(i + 1) {
                Some(next) => (
                    Some(next.name.clone()),
                    format!("Route to the next agent ({}) in the workflow", next.name),
                ),
                None if responsible_ai => (
                    Some(RESPONSIBLE_AI_AGENT.to_string()),
                    "Route to Responsible AI for final content check".to_string(),
                ),
                None => (None, "Workflow completion".to_string()),
            };
            AgentRouting { previous, next, comment }
        })
        .collect()
}

/// System prompt written to the manifest and embedded in the agent source.
pub fn system_prompt(agent: &AgentInfo, index: usize, total: usize, mode: OrchestrationMode) -> String {
    let name = agent.name.as_str();
    if name.contains("document") && name.contains("ingester") {
        return "You are a Document Ingestion Agent for a retrieval-augmented generation system. \
            Process incoming documents, extract clean text with its structure, generate metadata, \
            and split content into self-contained chunks ready for embedding."
            .to_string();
    }
    if name.contains("query") && name.contains("processor") {
        return "You are a Query Processing Agent for a retrieval-augmented generation system. \
            Identify the intent of each user query, expand it with related terms, and produce \
            an optimized query and search parameters for retrieval."
            .to_string();
    }
    if name.contains("response") && name.contains("generator") {
        return "You are a Response Generation Agent for a retrieval-augmented generation system. \
            Synthesize the retrieved information into an accurate, well-structured answer and \
            attribute every claim to its source."
            .to_string();
    }

    let display = &agent.display_name;
    let purpose = format!(" Your specialized purpose: {}.", agent.purpose);
    let body = match mode {
        OrchestrationMode::Sequential if index == 0 => format!(
            "You are {display}, the first agent in a sequential multi-agent system.{purpose}\n\n\
            Analyze the initial user query thoroughly, gather relevant facts using the available tools, \
            and present structured findings. Your output is passed to the next agent, so focus on \
            accuracy and completeness."
        ),
        OrchestrationMode::Sequential if index + 1 == total => format!(
            "You are {display}, the final agent in a sequential multi-agent system.{purpose}\n\n\
            Integrate the work of the previous agents into a clear, well-organized final response. \
            Use headings and bullet points where they help, explain technical terms, and close with \
            the key takeaways."
        ),
        OrchestrationMode::Sequential => format!(
            "You are {display}, agent {} of {total} in a sequential multi-agent system.{purpose}\n\n\
            Build on the output of the previous agents: fill gaps, verify facts, and add specialized \
            insight before passing the enhanced result to the next agent.",
            index + 1
        ),
        OrchestrationMode::Collaborative => format!(
            "You are {display}, one of {total} agents working collaboratively on the same request.{purpose}\n\n\
            Work in parallel with the other agents, cover your area of expertise thoroughly, and make \
            sure your contribution can be merged with theirs."
        ),
        OrchestrationMode::Loop => format!(
            "You are {display}, operating in an iterative loop where the same query may be processed \
            several times.{purpose}\n\n\
            Each iteration should refine the previous answer, address remaining gaps, and converge on \
            a complete response."
        ),
        OrchestrationMode::Mixed | OrchestrationMode::Route => format!(
            "You are {display}, an intelligent agent in a multi-agent system.{purpose}\n\n\
            Analyze each query, use the available tools to gather accurate information, and provide \
            a comprehensive, well-structured response."
        ),
    };

    format!(
        "{body}\n\nTool usage: prefer current data from the available tools over general knowledge \
        and document what you used.\nQuality: be specific, accurate and cite sources when appropriate."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProjectConfig;

    fn agents(names: &[&str]) -> Vec<AgentInfo> {
        names.iter().map(|n| AgentInfo::new(n, "sequential")).collect()
    }

    #[test]
    fn test_agent_info() {
        let info = AgentInfo::new("data_analyzer", "sequential");
        assert_eq!(info.file_name, "data_analyzer.go");
        assert_eq!(info.display_name, "Data Analyzer");
        assert_eq!(info.type_name, "DataAnalyzer");
        assert_eq!(info.purpose, "Analyzes and processes input data to extract insights");
    }

    #[test]
    fn test_infer_purpose() {
        assert_eq!(infer_purpose("researcher"), "Researches topics and gathers comprehensive information");
        assert_eq!(infer_purpose("document_ingester"), "Ingests and processes documents for the knowledge base");
        assert_eq!(infer_purpose("agent1"), "Provides general assistance and processing capabilities");
    }

    #[test]
    fn test_resolve_agents_mixed_roles() {
        let config = ProjectConfig {
            orchestration_mode: "mixed".into(),
            num_agents: 3,
            ..ProjectConfig::new("demo")
        };
        let resolved = resolve_agents(&OrchestrationDescriptor::synthesize(&config));
        let roles: Vec<&str> = resolved.iter().map(|a| a.role.as_str()).collect();
        assert_eq!(roles, vec!["collaborative", "sequential", "sequential"]);
    }

    #[test]
    fn test_temperature() {
        assert_eq!(temperature_for("researcher", 2), 0.3);
        assert_eq!(temperature_for("writer", 0), 0.8);
        assert_eq!(temperature_for("agent1", 0), 0.7);
        assert_eq!(temperature_for("agent2", 1), 0.5);
        assert_eq!(temperature_for("agent4", 3), 0.3);
        assert_eq!(temperature_for("agent9", 8), 0.1);
    }

    #[test]
    fn test_max_tokens_and_capabilities() {
        assert_eq!(max_tokens_for("content_writer"), 3000);
        assert_eq!(max_tokens_for("validator"), 1500);
        assert_eq!(max_tokens_for("agent1"), 2000);
        assert_eq!(capabilities_for("agent1"), vec!["analysis", "text_analysis", "data_processing"]);
        assert!(capabilities_for("researcher").contains(&"fact_checking"));
    }

    #[test]
    fn test_routing_chain() {
        let chain = routing_chain(&agents(&["a", "b", "c"]), false);
        assert_eq!(chain[0].previous, None);
        assert_eq!(chain[0].next.as_deref(), Some("b"));
        assert_eq!(chain[0].comment, "Route to the next agent (b) in the workflow");
        assert_eq!(chain[2].previous.as_deref(), Some("b"));
        assert_eq!(chain[2].next, None);
        assert_eq!(chain[2].comment, "Workflow completion");
    }

    #[test]
    fn test_routing_chain_responsible_ai() {
        let chain = routing_chain(&agents(&["a"]), true);
        assert_eq!(chain[0].next.as_deref(), Some(RESPONSIBLE_AI_AGENT));
        assert_eq!(chain[0].comment, "Route to Responsible AI for final content check");
    }

    #[test]
    fn test_system_prompt_positions() {
        let list = agents(&["agent1", "agent2", "agent3"]);
        let first = system_prompt(&list[0], 0, 3, OrchestrationMode::Sequential);
        let middle = system_prompt(&list[1], 1, 3, OrchestrationMode::Sequential);
        let last = system_prompt(&list[2], 2, 3, OrchestrationMode::Sequential);
        assert!(first.contains("the first agent"));
        assert!(middle.contains("agent 2 of 3"));
        assert!(last.contains("the final agent"));
    }
}
