//! Span helpers for generation runs

use tracing::Span;

/// Span covering one project generation
///
/// # Example
/// ```
/// use agk_telemetry::generation_span;
/// let span = generation_span("demo");
/// let _enter = span.enter();
/// ```
pub fn generation_span(project: &str) -> Span {
    tracing::info_span!("scaffold.generate", project.name = project)
}

/// Span for rendering a single artifact
pub fn artifact_render_span(artifact: &str) -> Span {
    tracing::debug_span!("scaffold.render", artifact.path = artifact)
}

/// Span for the final filesystem commit
pub fn commit_span(target: &str) -> Span {
    tracing::info_span!("scaffold.commit", target.path = target)
}
