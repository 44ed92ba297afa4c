use std::collections::HashSet;

use crate::domain::{
    entities::{EntitySpec, GenerationRequest, ProjectStructure},
    error::DomainError,
};

/// Keywords, reserved literals and `_`; none can name a class or field.
const JAVA_RESERVED_WORDS: &[&str] = &[
    "_", "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class",
    "const", "continue", "default", "do", "double", "else", "enum", "extends", "false", "final",
    "finally", "float", "for", "goto", "if", "implements", "import", "instanceof", "int",
    "interface", "long", "native", "new", "null", "package", "private", "protected", "public",
    "return", "short", "static", "strictfp", "super", "switch", "synchronized", "this", "throw",
    "throws", "transient", "true", "try", "void", "volatile", "while",
];

/// Centralized domain validation.
///
/// All validation logic lives here, not scattered across entities.
pub struct DomainValidator;

impl DomainValidator {
    /// Full request check, run before anything touches disk.
    pub fn validate_request(request: &GenerationRequest) -> Result<(), DomainError> {
        Self::validate_entity(&request.entity)?;

        if let Some(group) = request.group_id.as_deref() {
            let group = group.trim();
            if !group.is_empty() && group.split('.').any(|s| s.trim().is_empty()) {
                return Err(DomainError::InvalidOption {
                    option: "groupId",
                    value: group.to_string(),
                });
            }
        }

        Ok(())
    }

    pub fn validate_entity(entity: &EntitySpec) -> Result<(), DomainError> {
        Self::validate_qualified_name(&entity.qualified_name)?;

        if entity.fields.is_empty() {
            return Err(DomainError::NoFields);
        }

        let mut seen = HashSet::new();
        for (i, field) in entity.fields.iter().enumerate() {
            let name = field.name.trim();
            if name.is_empty() {
                return Err(DomainError::EmptyFieldName { position: i + 1 });
            }
            Self::validate_identifier("field name", name)?;
            Self::validate_field_metadata(name, field.ui_hint.iter().chain(&field.option_values))?;
            if field.field_type.trim().is_empty() {
                return Err(DomainError::EmptyFieldType {
                    field: name.to_string(),
                });
            }
            if !seen.insert(name.to_ascii_lowercase()) {
                return Err(DomainError::DuplicateField {
                    field: name.to_string(),
                });
            }
        }

        let primaries: Vec<String> = entity.primary_fields().map(|f| f.name.clone()).collect();
        if primaries.len() > 1 {
            return Err(DomainError::MultiplePrimaryKeys { fields: primaries });
        }

        Ok(())
    }

    /// At least two non-empty dot-separated segments.
    pub fn validate_qualified_name(name: &str) -> Result<(), DomainError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::EmptyClassName);
        }

        let segments: Vec<&str> = name.split('.').collect();
        if segments.len() < 2 || segments.iter().any(|s| s.trim().is_empty()) {
            return Err(DomainError::InvalidQualifiedName {
                name: name.to_string(),
            });
        }

        for segment in segments {
            Self::validate_identifier("class name segment", segment)?;
        }

        Ok(())
    }

    /// A legal Java identifier that is not a keyword or literal.
    pub fn validate_identifier(role: &'static str, name: &str) -> Result<(), DomainError> {
        let mut chars = name.chars();
        let well_formed = chars
            .next()
            .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$')
            && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$');

        if !well_formed {
            return Err(DomainError::InvalidIdentifier {
                role,
                name: name.to_string(),
            });
        }
        if JAVA_RESERVED_WORDS.contains(&name) {
            return Err(DomainError::ReservedWord {
                role,
                name: name.to_string(),
            });
        }
        Ok(())
    }

    /// UI hints and option values are copied into line comments, so they
    /// must stay on one line. `\u` is refused too: Java decodes unicode
    /// escapes before it sees the comment.
    fn validate_field_metadata<'a>(
        field: &str,
        values: impl IntoIterator<Item = &'a String>,
    ) -> Result<(), DomainError> {
        for value in values {
            if value.chars().any(char::is_control) || value.contains("\\u") {
                return Err(DomainError::UnsafeFieldMetadata {
                    field: field.to_string(),
                    value: value.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn validate_project_structure(structure: &ProjectStructure) -> Result<(), DomainError> {
        structure.validate()
    }
}
