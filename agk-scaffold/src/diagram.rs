//! Mermaid workflow diagrams.

use crate::agents::AgentInfo;
use crate::orchestration::{OrchestrationDescriptor, OrchestrationMode};

pub const WORKFLOW_FILE: &str = "workflow.md";

fn mermaid_label(text: &str) -> String {
    text.replace('"', "#quot;")
}

fn node(id: &str, label: &str) -> String {
    format!("    {id}[\"{}\"]\n", mermaid_label(label))
}

/// Title and flowchart body for the topology.
pub fn mermaid_diagram(orchestration: &OrchestrationDescriptor) -> (&'static str, String) {
    let title = match orchestration.mode {
        OrchestrationMode::Collaborative => "Collaborative Orchestration",
        OrchestrationMode::Sequential => "Sequential Pipeline",
        OrchestrationMode::Loop => "Loop Processing",
        OrchestrationMode::Mixed => "Mixed Orchestration",
        OrchestrationMode::Route => "Route Orchestration",
    };

    let mut d = format!("```mermaid\n---\ntitle: {title}\n---\nflowchart TD\n");
    d.push_str(&node("INPUT", "Input Event"));
    match orchestration.mode {
        OrchestrationMode::Collaborative => {
            d.push_str(&node("ORCHESTRATOR", "Collaborative Orchestrator"));
            d.push_str(&node("AGGREGATOR", "Result Aggregator"));
            d.push_str(&node("OUTPUT", "Final Result"));
            d.push_str("\n    INPUT --> ORCHESTRATOR\n");
            for (i, agent) in orchestration.agents.iter().enumerate() {
                let id = format!("AGENT{}", i + 1);
                d.push_str(&node(&id, agent));
                d.push_str(&format!("    ORCHESTRATOR --> {id}\n    {id} --> AGGREGATOR\n"));
            }
            d.push_str("    AGGREGATOR --> OUTPUT\n");
        }
        OrchestrationMode::Sequential => {
            let mut previous = "INPUT".to_string();
            for (i, agent) in orchestration.sequential_agents.iter().enumerate() {
                let id = format!("AGENT{}", i + 1);
                d.push_str(&node(&id, agent));
                d.push_str(&format!("    {previous} --> {id}\n"));
                previous = id;
            }
            d.push_str(&node("OUTPUT", "Final Result"));
            d.push_str(&format!("    {previous} --> OUTPUT\n"));
        }
        OrchestrationMode::Loop => {
            let agent = orchestration.loop_agent.as_deref().unwrap_or("agent1");
            d.push_str(&node("AGENT", agent));
            d.push_str("    CONDITION{\"Continue Loop?\"}\n");
            d.push_str(&node("OUTPUT", "Final Result"));
            d.push_str("\n    INPUT --> AGENT\n    AGENT --> CONDITION\n");
            d.push_str("    CONDITION -->|Yes| AGENT\n    CONDITION -->|No| OUTPUT\n");
            d.push_str(&format!(
                "    CONDITION -.->|Max {} iterations| OUTPUT\n",
                orchestration.max_iterations
            ));
        }
        OrchestrationMode::Mixed => {
            d.push_str(&node("PHASE1", "Collaborative Phase"));
            d.push_str(&node("PHASE2", "Sequential Phase"));
            d.push_str(&node("OUTPUT", "Final Result"));
            d.push_str("\n    INPUT --> PHASE1\n");
            if orchestration.collaborative_agents.is_empty() {
                d.push_str("    PHASE1 --> PHASE2\n");
            }
            for (i, agent) in orchestration.collaborative_agents.iter().enumerate() {
                let id = format!("COLLAB{}", i + 1);
                d.push_str(&node(&id, agent));
                d.push_str(&format!("    PHASE1 --> {id}\n    {id} --> PHASE2\n"));
            }
            let mut previous = "PHASE2".to_string();
            for (i, agent) in orchestration.sequential_agents.iter().enumerate() {
                let id = format!("SEQ{}", i + 1);
                d.push_str(&node(&id, agent));
                d.push_str(&format!("    {previous} --> {id}\n"));
                previous = id;
            }
            d.push_str(&format!("    {previous} --> OUTPUT\n"));
        }
        OrchestrationMode::Route => {
            d.push_str(&node("ROUTER", "Event Router"));
            d.push_str(&node("OUTPUT", "Result"));
            d.push_str("\n    INPUT --> ROUTER\n");
            for (i, agent) in orchestration.agents.iter().enumerate() {
                let id = format!("AGENT{}", i + 1);
                d.push_str(&node(&id, agent));
                d.push_str(&format!("    ROUTER -.->|Route| {id}\n    {id} --> OUTPUT\n"));
            }
        }
    }
    d.push_str("```");
    (title, d)
}

/// Full `workflow.md` document.
pub fn workflow_markdown(orchestration: &OrchestrationDescriptor, agents: &[AgentInfo]) -> String {
    let (title, diagram) = mermaid_diagram(orchestration);
    let mode = orchestration.mode;

    let mut md = format!("# {title} Workflow\n\n");
    md.push_str(&format!(
        "## Overview\n\nThis diagram shows the {mode} orchestration pattern used in this project.\n\n"
    ));
    md.push_str("## Workflow Diagram\n\n");
    md.push_str(&diagram);
    md.push_str("\n\n## Configuration\n\n");
    md.push_str(&format!("- **Orchestration Mode**: {mode}\n"));
    md.push_str(&format!("- **Number of Agents**: {}\n", agents.len()));
    md.push_str(&format!("- **Timeout**: {} seconds\n", orchestration.timeout_seconds));
    md.push_str(&format!("- **Max Concurrency**: {}\n", orchestration.max_concurrency));
    md.push_str(&format!("- **Failure Threshold**: {:.2}\n", orchestration.failure_threshold));
    if mode == OrchestrationMode::Loop {
        md.push_str(&format!("- **Max Iterations**: {}\n", orchestration.max_iterations));
    }

    md.push_str("\n## Agent Details\n\n");
    for (i, agent) in agents.iter().enumerate() {
        let behaviour = match agent.role.as_str() {
            "collaborative" => "Processes events in parallel with other agents",
            "sequential" => "Processes events in pipeline order",
            "loop" => "Processes events iteratively until the exit condition is met",
            _ => "Receives events routed to it by name",
        };
        md.push_str(&format!("{}. **{}**: {behaviour}. {}\n", i + 1, agent.name, agent.purpose));
    }
    md
}
