//! Core domain layer for entigen.
//!
//! This module contains pure business logic: the entity model, the type
//! mapping, validation and the pipeline state machine. All I/O, rendering
//! and process concerns are handled via ports (traits) defined in the
//! application layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: No filesystem, network, or external calls
//! - **Immutable entities**: All domain objects are Clone + PartialEq
//! - **Rich domain model**: Naming and key derivation live in entities

pub mod entities;
pub mod error;
pub mod type_mapper;
pub mod value_objects;

mod validation;

pub use entities::{
    ArchiveResult, BuildOutcome, BuildStatus, EntitySpec, FieldSpec, GeneratedArtifact,
    GeneratedProject, GenerationReport, GenerationRequest, ProjectStructure, RenderContext,
    ResolvedField, UnboundPlaceholder,
    common::RelativePath,
    entity::DEFAULT_GROUP_ID,
    project::{DirectoryToCreate, FileToWrite, FsEntry},
};

pub use error::{DomainError, ErrorCategory};

pub use value_objects::{
    ArtifactKind, PipelineStage, PipelineState, RetentionPolicy, WorkspaceLayout,
};

pub use validation::DomainValidator;

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn field(name: &str, ty: &str) -> FieldSpec {
        FieldSpec::new(name, ty)
    }

    fn request(name: &str, fields: Vec<FieldSpec>) -> GenerationRequest {
        GenerationRequest::new(EntitySpec::new(name, fields))
    }

    // ========================================================================
    // Validation Tests
    // ========================================================================

    #[test]
    fn accepts_well_formed_request() {
        let req = request(
            "com.demo.model.Order",
            vec![field("id", "Long").primary(), field("amount", "Double")],
        );
        assert!(DomainValidator::validate_request(&req).is_ok());
    }

    #[test]
    fn rejects_single_segment_name() {
        let req = request("Order", vec![field("id", "Long")]);
        assert_eq!(
            DomainValidator::validate_request(&req),
            Err(DomainError::InvalidQualifiedName {
                name: "Order".into()
            })
        );
    }

    #[test]
    fn rejects_empty_segments() {
        for name in ["com..Order", ".Order", "com.demo."] {
            let req = request(name, vec![field("id", "Long")]);
            assert!(
                matches!(
                    DomainValidator::validate_request(&req),
                    Err(DomainError::InvalidQualifiedName { .. })
                ),
                "{name}"
            );
        }
    }

    #[test]
    fn rejects_blank_class_name() {
        let req = request("   ", vec![field("id", "Long")]);
        assert_eq!(
            DomainValidator::validate_request(&req),
            Err(DomainError::EmptyClassName)
        );
    }

    #[test]
    fn rejects_empty_field_list() {
        let req = request("com.demo.Order", vec![]);
        assert_eq!(
            DomainValidator::validate_request(&req),
            Err(DomainError::NoFields)
        );
    }

    #[test]
    fn rejects_empty_field_name_and_type() {
        let req = request("com.demo.Order", vec![field("id", "Long"), field(" ", "int")]);
        assert_eq!(
            DomainValidator::validate_request(&req),
            Err(DomainError::EmptyFieldName { position: 2 })
        );

        let req = request("com.demo.Order", vec![field("qty", "")]);
        assert_eq!(
            DomainValidator::validate_request(&req),
            Err(DomainError::EmptyFieldType { field: "qty".into() })
        );
    }

    #[test]
    fn rejects_duplicate_fields_case_insensitively() {
        let req = request(
            "com.demo.Order",
            vec![field("amount", "Double"), field("Amount", "int")],
        );
        assert_eq!(
            DomainValidator::validate_request(&req),
            Err(DomainError::DuplicateField {
                field: "Amount".into()
            })
        );
    }

    #[test]
    fn rejects_multiple_primary_keys() {
        let req = request(
            "com.demo.Order",
            vec![field("a", "long").primary(), field("b", "long").primary()],
        );
        let err = DomainValidator::validate_request(&req).unwrap_err();
        assert_eq!(
            err,
            DomainError::MultiplePrimaryKeys {
                fields: vec!["a".into(), "b".into()]
            }
        );
        assert_eq!(err.category(), ErrorCategory::Validation);
    }

    #[test]
    fn rejects_malformed_group_id() {
        let req = request("com.demo.Order", vec![field("id", "Long")]).with_group_id("org..x");
        assert!(matches!(
            DomainValidator::validate_request(&req),
            Err(DomainError::InvalidOption { option: "groupId", .. })
        ));
    }

    #[test]
    fn rejects_class_segments_that_are_not_identifiers() {
        let req = request("com.demo.Bad Name", vec![field("amount", "Double")]);
        assert_eq!(
            DomainValidator::validate_request(&req),
            Err(DomainError::InvalidIdentifier {
                role: "class name segment",
                name: "Bad Name".into()
            })
        );

        let req = request("com.1demo.Order", vec![field("amount", "Double")]);
        assert!(matches!(
            DomainValidator::validate_request(&req),
            Err(DomainError::InvalidIdentifier { .. })
        ));

        let req = request("com.new.Order", vec![field("amount", "Double")]);
        assert!(matches!(
            DomainValidator::validate_request(&req),
            Err(DomainError::ReservedWord { .. })
        ));
    }

    #[test]
    fn rejects_field_names_that_are_not_identifiers() {
        for name in ["my field", "2nd", "first-name", "a.b"] {
            let req = request("com.demo.Order", vec![field(name, "string")]);
            let err = DomainValidator::validate_request(&req).unwrap_err();
            assert_eq!(
                err,
                DomainError::InvalidIdentifier {
                    role: "field name",
                    name: name.into()
                },
                "{name}"
            );
            assert_eq!(err.category(), ErrorCategory::Validation);
        }
    }

    #[test]
    fn rejects_reserved_field_names() {
        for name in ["class", "int", "null", "_"] {
            let req = request("com.demo.Order", vec![field(name, "int")]);
            assert!(
                matches!(
                    DomainValidator::validate_request(&req),
                    Err(DomainError::ReservedWord { role: "field name", .. })
                ),
                "{name}"
            );
        }
    }

    #[test]
    fn accepts_unusual_but_legal_identifiers() {
        let req = request(
            "com.demo.Order",
            vec![field("_count", "int"), field("$tag", "string"), field("größe", "double")],
        );
        assert!(DomainValidator::validate_request(&req).is_ok());
    }

    #[test]
    fn rejects_multiline_ui_metadata() {
        let hint = field("status", "string").with_ui_hint("x\n}} public static void injected() {");
        let req = request("com.demo.Order", vec![hint]);
        assert!(matches!(
            DomainValidator::validate_request(&req),
            Err(DomainError::UnsafeFieldMetadata { ref field, .. }) if field == "status"
        ));

        let options = field("status", "string").with_options(["OPEN", "CLOSED\r\nevil"]);
        let req = request("com.demo.Order", vec![options]);
        assert!(matches!(
            DomainValidator::validate_request(&req),
            Err(DomainError::UnsafeFieldMetadata { .. })
        ));

        let escaped = field("status", "string").with_ui_hint(r"select\u000a evil");
        let req = request("com.demo.Order", vec![escaped]);
        assert!(matches!(
            DomainValidator::validate_request(&req),
            Err(DomainError::UnsafeFieldMetadata { .. })
        ));

        let fine = field("status", "string")
            .with_ui_hint("select")
            .with_options(["OPEN", "CLOSED"]);
        assert!(DomainValidator::validate_request(&request("com.demo.Order", vec![fine])).is_ok());
    }

    // ========================================================================
    // Value Object Tests
    // ========================================================================

    #[test]
    fn artifact_kind_parses_names_and_aliases() {
        assert_eq!(ArtifactKind::from_str("model").unwrap(), ArtifactKind::Model);
        assert_eq!(ArtifactKind::from_str("POM").unwrap(), ArtifactKind::BuildDescriptor);
        assert_eq!(
            ArtifactKind::from_str("access-layer").unwrap(),
            ArtifactKind::Repository
        );
        assert!(matches!(
            ArtifactKind::from_str("view"),
            Err(DomainError::UnknownArtifactKind(k)) if k == "view"
        ));

        for kind in ArtifactKind::ALL {
            assert_eq!(ArtifactKind::from_str(kind.as_str()).unwrap(), kind);
        }
    }

    #[test]
    fn artifact_paths_follow_the_project_layout() {
        let path = |k: ArtifactKind| k.relative_path("com/demo", "Order").to_string();

        assert_eq!(path(ArtifactKind::Model), "src/main/java/com/demo/model/Order.java");
        assert_eq!(
            path(ArtifactKind::Repository),
            "src/main/java/com/demo/repository/OrderRepository.java"
        );
        assert_eq!(
            path(ArtifactKind::Service),
            "src/main/java/com/demo/service/OrderService.java"
        );
        assert_eq!(
            path(ArtifactKind::Controller),
            "src/main/java/com/demo/controller/OrderController.java"
        );
        assert_eq!(
            path(ArtifactKind::Application),
            "src/main/java/com/demo/Application.java"
        );
        assert_eq!(
            path(ArtifactKind::Properties),
            "src/main/resources/application.properties"
        );
        assert_eq!(path(ArtifactKind::BuildDescriptor), "pom.xml");
        assert_eq!(path(ArtifactKind::SchemaScript), "src/db/generated_schema.sql");
    }

    #[test]
    fn pipeline_state_walks_forward_to_done() {
        let mut state = PipelineState::Idle;
        let mut seen = vec![state];
        while let Some(next) = state.next() {
            state = next;
            seen.push(state);
        }

        assert_eq!(
            seen,
            vec![
                PipelineState::Idle,
                PipelineState::Active(PipelineStage::Scaffolding),
                PipelineState::Active(PipelineStage::Building),
                PipelineState::Active(PipelineStage::Packaging),
                PipelineState::Done,
            ]
        );
        assert!(state.is_terminal());
    }

    #[test]
    fn pipeline_state_fails_only_from_active() {
        let building = PipelineState::Active(PipelineStage::Building);
        assert_eq!(
            building.fail(),
            Some(PipelineState::Failed(PipelineStage::Building))
        );
        assert_eq!(PipelineState::Idle.fail(), None);
        assert_eq!(PipelineState::Done.fail(), None);
        assert_eq!(
            PipelineState::Failed(PipelineStage::Building).to_string(),
            "failed(building)"
        );
    }

    #[test]
    fn retention_policy_parses() {
        assert_eq!(RetentionPolicy::from_str("keep").unwrap(), RetentionPolicy::Keep);
        assert_eq!(
            RetentionPolicy::from_str("remove-on-failure").unwrap(),
            RetentionPolicy::RemoveOnFailure
        );
        assert!(RetentionPolicy::from_str("sometimes").is_err());
        assert_eq!(RetentionPolicy::default(), RetentionPolicy::Keep);
    }

    #[test]
    fn only_fixed_layout_is_shared() {
        assert!(WorkspaceLayout::Fixed("out".into()).is_shared());
        assert!(
            !WorkspaceLayout::PerRequest {
                base: "out".into()
            }
            .is_shared()
        );
    }
}
