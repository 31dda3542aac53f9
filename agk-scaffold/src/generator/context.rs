//! Render contexts handed to the templates.
//!
//! Every key a template references is always present; optional values are
//! `null` so strict rendering never trips over a disabled feature.

use crate::agents::{self, AgentInfo, AgentRouting};
use crate::config::ProjectConfig;
use crate::manifest::toml_string;
use crate::orchestration::OrchestrationDescriptor;
use crate::render::go_string_literal;
use serde_json::{Value, json};

/// Inputs shared by every artifact of one run.
pub struct RenderInputs<'a> {
    pub config: &'a ProjectConfig,
    pub agents: &'a [AgentInfo],
    pub orchestration: &'a OrchestrationDescriptor,
    pub agents_import: &'a str,
    pub dimensions: u32,
}

fn provider_env(config: &ProjectConfig) -> Vec<&'static str> {
    let mut vars = match config.provider.as_str() {
        "azure" => vec!["AZURE_OPENAI_API_KEY", "AZURE_OPENAI_ENDPOINT", "AZURE_OPENAI_DEPLOYMENT"],
        "openai" => vec!["OPENAI_API_KEY"],
        _ => Vec::new(),
    };
    if config.memory_enabled && config.embedding_provider == "openai" && !vars.contains(&"OPENAI_API_KEY") {
        vars.push("OPENAI_API_KEY");
    }
    vars
}

/// Context for project-level artifacts.
pub fn project_context(inputs: &RenderInputs<'_>) -> Value {
    let config = inputs.config;
    let agent_tuning: Vec<Value> = inputs
        .agents
        .iter()
        .enumerate()
        .map(|(i, agent)| {
            json!({
                "name": agent.name,
                "temperature": format!("{:.1}", agents::temperature_for(&agent.name, i)),
                "max_tokens": agents::max_tokens_for(&agent.name),
            })
        })
        .collect();
    let agent_names: Vec<String> = inputs.agents.iter().map(|a| toml_string(&a.name)).collect();

    json!({
        "project": {
            "name": config.name,
            "mode": inputs.orchestration.mode.as_str(),
            "provider": config.provider,
            "mcp_transport": config.mcp_transport,
        },
        "features": {
            "mcp": config.mcp_enabled,
            "cache": config.mcp_enabled && config.with_cache,
            "memory": config.memory_enabled,
            "rag": config.memory_enabled && config.rag_enabled,
            "session_memory": config.memory_enabled && config.session_memory,
            "responsible_ai": config.responsible_ai,
            "infrastructure": config.requires_infrastructure(),
        },
        "memory": {
            "provider": config.memory_provider,
            "embedding_provider": config.embedding_provider,
            "embedding_model": config.embedding_model,
            "dimensions": inputs.dimensions,
            "rag_chunk_size": config.rag_chunk_size,
            "rag_top_k": config.rag_top_k,
            "rag_score_threshold": config.rag_score_threshold,
        },
        "orchestration": {
            "timeout_seconds": inputs.orchestration.timeout_seconds,
        },
        "agents": inputs.agents,
        "agents_import": inputs.agents_import,
        "entry_agent": inputs.agents.first().map(|a| a.name.as_str()).unwrap_or("agent1"),
        "provider_env": provider_env(config),
        "agent_tuning": agent_tuning,
        "agent_names_literal": agent_names.join(", "),
    })
}

/// Context for one `agents/<name>.go` file: the project context plus the
/// agent, its prompt and its place in the routing chain.
pub fn agent_context(
    inputs: &RenderInputs<'_>,
    base: &Value,
    index: usize,
    routing: &AgentRouting,
) -> Value {
    let agent = &inputs.agents[index];
    let prompt =
        agents::system_prompt(agent, index, inputs.agents.len(), inputs.orchestration.mode);
    let previous: Vec<String> =
        inputs.agents[..index].iter().map(|a| go_string_literal(&a.name)).collect();

    let mut context = base.clone();
    if let Value::Object(map) = &mut context {
        map.insert("agent".to_string(), json!(agent));
        map.insert("is_first".to_string(), Value::Bool(index == 0));
        map.insert("system_prompt_literal".to_string(), Value::String(go_string_literal(&prompt)));
        map.insert("previous_agents_literal".to_string(), Value::String(previous.join(", ")));
        map.insert("routing".to_string(), json!(routing));
    }
    context
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::{resolve_agents, routing_chain};

    #[test]
    fn test_contexts_carry_every_key() {
        let config = ProjectConfig { provider: "openai".into(), ..ProjectConfig::new("demo") };
        let orchestration = OrchestrationDescriptor::synthesize(&config);
        let agents = resolve_agents(&orchestration);
        let inputs = RenderInputs {
            config: &config,
            agents: &agents,
            orchestration: &orchestration,
            agents_import: "demo/agents",
            dimensions: 0,
        };
        let base = project_context(&inputs);
        assert_eq!(base["project"]["mode"], "sequential");
        assert_eq!(base["provider_env"], json!(["OPENAI_API_KEY"]));
        assert_eq!(base["agent_names_literal"], r#""agent1", "agent2""#);
        assert_eq!(base["agent_tuning"][1]["temperature"], "0.5");

        let routing = routing_chain(&agents, false);
        let second = agent_context(&inputs, &base, 1, &routing[1]);
        assert_eq!(second["is_first"], false);
        assert_eq!(second["previous_agents_literal"], r#""agent1""#);
        assert_eq!(second["routing"]["next"], Value::Null);
        assert_eq!(second["agent"]["type_name"], "Agent2");
    }
}
