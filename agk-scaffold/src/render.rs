//! Template rendering.
//!
//! Generators only depend on the [`Renderer`] trait; the Handlebars-backed
//! [`HandlebarsRenderer`] is the default implementation.

use crate::error::{Result, ScaffoldError};
use handlebars::Handlebars;
use serde_json::Value;

pub const MAIN_GO_TEMPLATE: &str = include_str!("templates/main.go.hbs");
pub const AGENT_GO_TEMPLATE: &str = include_str!("templates/agent.go.hbs");
pub const PROJECT_README_TEMPLATE: &str = include_str!("templates/README.md.hbs");
pub const AGENTS_README_TEMPLATE: &str = include_str!("templates/agents_README.md.hbs");
pub const CUSTOMIZATION_TEMPLATE: &str = include_str!("templates/CUSTOMIZATION.md.hbs");

/// Fill a structured context into a text template.
pub trait Renderer {
    fn render(&self, template: &str, context: &Value) -> Result<String>;
}

/// Handlebars in strict mode: referencing a field the context lacks is an
/// error. Output is not HTML-escaped.
pub struct HandlebarsRenderer {
    registry: Handlebars<'static>,
}

impl HandlebarsRenderer {
    pub fn new() -> Self {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry.register_escape_fn(handlebars::no_escape);
        Self { registry }
    }
}

impl Default for HandlebarsRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for HandlebarsRenderer {
    fn render(&self, template: &str, context: &Value) -> Result<String> {
        self.registry
            .render_template(template, context)
            .map_err(|e| ScaffoldError::Render { artifact: String::new(), message: e.to_string() })
    }
}

/// Render one artifact, tagging any failure with the artifact path.
pub fn render_artifact(
    renderer: &dyn Renderer,
    artifact: &str,
    template: &str,
    context: &Value,
) -> Result<String> {
    tracing::debug!(artifact, "rendering template");
    renderer.render(template, context).map_err(|e| match e {
        ScaffoldError::Render { message, .. } => {
            ScaffoldError::Render { artifact: artifact.to_string(), message }
        }
        other => other,
    })
}

/// Quote a string as a Go interpreted string literal.
pub fn go_string_literal(value: &str) -> String {
    // JSON string escapes are a subset of Go's.
    serde_json::Value::String(value.to_string()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_substitutes_without_escaping() {
        let renderer = HandlebarsRenderer::new();
        let out = renderer.render("x := {{value}}", &json!({ "value": "a < b && \"c\"" })).unwrap();
        assert_eq!(out, "x := a < b && \"c\"");
    }

    #[test]
    fn test_missing_field_is_an_error() {
        let renderer = HandlebarsRenderer::new();
        let err = render_artifact(&renderer, "main.go", "{{missing}}", &json!({})).unwrap_err();
        match err {
            ScaffoldError::Render { artifact, .. } => assert_eq!(artifact, "main.go"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_template_syntax_error() {
        let renderer = HandlebarsRenderer::new();
        assert!(renderer.render("{{#if x}}unterminated", &json!({ "x": true })).is_err());
    }

    #[test]
    fn test_builtin_templates_compile() {
        let mut registry = Handlebars::new();
        for (name, template) in [
            ("main", MAIN_GO_TEMPLATE),
            ("agent", AGENT_GO_TEMPLATE),
            ("readme", PROJECT_README_TEMPLATE),
            ("agents_readme", AGENTS_README_TEMPLATE),
            ("customization", CUSTOMIZATION_TEMPLATE),
        ] {
            registry
                .register_template_string(name, template)
                .unwrap_or_else(|e| panic!("template {name} failed to compile: {e}"));
        }
    }

    struct UpperRenderer;

    impl Renderer for UpperRenderer {
        fn render(&self, template: &str, _context: &Value) -> Result<String> {
            Ok(template.to_uppercase())
        }
    }

    #[test]
    fn test_renderer_is_substitutable() {
        let out = render_artifact(&UpperRenderer, "README.md", "hello", &json!({})).unwrap();
        assert_eq!(out, "HELLO");
    }

    #[test]
    fn test_go_string_literal() {
        assert_eq!(go_string_literal("line one\n\"quoted\""), r#""line one\n\"quoted\"""#);
    }
}
