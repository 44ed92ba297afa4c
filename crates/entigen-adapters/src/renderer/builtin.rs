//! Placeholder-substitution renderer backed by a template store.

use entigen_core::{
    application::{ApplicationError, ports::ArtifactRenderer},
    domain::{ArtifactKind, RenderContext},
    error::EntigenResult,
};
use tracing::{debug, instrument};

use crate::template_store::InMemoryTemplateStore;

/// Renders artifacts by strict `{{VARIABLE}}` substitution.
///
/// Holds no per-request state; every call looks its template up afresh.
#[derive(Debug, Clone)]
pub struct BuiltinRenderer {
    store: InMemoryTemplateStore,
}

impl BuiltinRenderer {
    pub fn new(store: InMemoryTemplateStore) -> Self {
        Self { store }
    }

    /// Renderer over the built-in templates only.
    pub fn with_builtin() -> EntigenResult<Self> {
        Ok(Self::new(InMemoryTemplateStore::with_builtin()?))
    }

    pub fn store(&self) -> &InMemoryTemplateStore {
        &self.store
    }
}

impl ArtifactRenderer for BuiltinRenderer {
    #[instrument(skip_all, fields(kind = %kind, class = context.class_name()))]
    fn render(&self, kind: ArtifactKind, context: &RenderContext) -> EntigenResult<String> {
        let template = self.store.get(kind)?;

        let rendered = context
            .render(&template)
            .map_err(|e| ApplicationError::RenderingFailed {
                kind,
                reason: e.to_string(),
            })?;

        debug!(bytes = rendered.len(), "Rendered");
        Ok(rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use entigen_core::domain::{EntitySpec, FieldSpec, GenerationRequest};
    use entigen_core::error::EntigenError;

    fn ctx() -> RenderContext {
        RenderContext::for_request(&GenerationRequest::new(EntitySpec::new(
            "com.demo.Order",
            vec![FieldSpec::new("amount", "double")],
        )))
    }

    #[test]
    fn renders_builtin_controller() {
        let renderer = BuiltinRenderer::with_builtin().unwrap();
        let out = renderer.render(ArtifactKind::Controller, &ctx()).unwrap();
        assert!(out.contains("public class OrderController"));
        assert!(out.contains("@PathVariable Long id"));
    }

    #[test]
    fn unbound_placeholder_is_a_rendering_error() {
        let store = InMemoryTemplateStore::new();
        store
            .insert(ArtifactKind::Service, "class {{CLASS_NAME}} {{AUTHOR}}")
            .unwrap();
        let renderer = BuiltinRenderer::new(store);

        let err = renderer.render(ArtifactKind::Service, &ctx()).unwrap_err();
        match err {
            EntigenError::Application(ApplicationError::RenderingFailed { kind, reason }) => {
                assert_eq!(kind, ArtifactKind::Service);
                assert!(reason.contains("AUTHOR"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_template_names_the_kind() {
        let renderer = BuiltinRenderer::new(InMemoryTemplateStore::new());
        let err = renderer.render(ArtifactKind::Model, &ctx()).unwrap_err();
        assert!(matches!(
            err,
            EntigenError::Application(ApplicationError::TemplateMissing {
                kind: ArtifactKind::Model
            })
        ));
    }

    #[test]
    fn repeated_calls_are_independent() {
        let renderer = BuiltinRenderer::with_builtin().unwrap();
        let a = renderer.render(ArtifactKind::Model, &ctx()).unwrap();
        let b = renderer.render(ArtifactKind::Model, &ctx()).unwrap();
        assert_eq!(a, b);
    }
}
