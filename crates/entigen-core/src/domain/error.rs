// ============================================================================
// domain/error.rs - VALIDATION ERROR DOMAIN
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (they travel inside pipeline reports)
/// - Categorizable (for CLI display and HTTP status mapping)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Request shape (400-level equivalent)
    // ========================================================================
    #[error("Class name must not be empty")]
    EmptyClassName,

    #[error("At least one field is required")]
    NoFields,

    #[error("Invalid class name '{name}': expected a dotted name with at least two segments")]
    InvalidQualifiedName { name: String },

    #[error("Field #{position} has an empty name")]
    EmptyFieldName { position: usize },

    #[error("Field '{field}' has an empty type")]
    EmptyFieldType { field: String },

    #[error("Field '{field}' is declared more than once")]
    DuplicateField { field: String },

    #[error("Only one primary field is allowed, found: {}", fields.join(", "))]
    MultiplePrimaryKeys { fields: Vec<String> },

    #[error("Invalid {role} '{name}': not a Java identifier")]
    InvalidIdentifier { role: &'static str, name: String },

    #[error("Invalid {role} '{name}': reserved word in Java")]
    ReservedWord { role: &'static str, name: String },

    #[error("Field '{field}' has a UI hint or option with a line break or escape: {value:?}")]
    UnsafeFieldMetadata { field: String, value: String },

    // ========================================================================
    // Structural invariants
    // ========================================================================
    #[error("Duplicate path in project structure: {path}")]
    DuplicatePath { path: String },

    #[error("Absolute paths not allowed: {path}")]
    AbsolutePathNotAllowed { path: String },

    #[error("Project structure is empty")]
    EmptyStructure,

    #[error("Unknown artifact kind: {0}")]
    UnknownArtifactKind(String),

    #[error("Invalid value '{value}' for {option}")]
    InvalidOption { option: &'static str, value: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::EmptyClassName | Self::InvalidQualifiedName { .. } => vec![
                "Use a fully qualified class name such as com.demo.model.Order".into(),
                "The last segment becomes the class, the first two the package".into(),
            ],
            Self::NoFields => vec![
                "Add at least one entry to \"fields\"".into(),
                "Example: {\"name\": \"amount\", \"type\": \"Double\"}".into(),
            ],
            Self::EmptyFieldName { position } => {
                vec![format!("Give field #{position} a non-empty \"name\"")]
            }
            Self::EmptyFieldType { field } => vec![
                format!("Set a \"type\" for field '{field}'"),
                "Known types: string, int, long, boolean, date, timestamp, double, float".into(),
            ],
            Self::DuplicateField { field } => vec![
                format!("Rename or remove the second '{field}'"),
                "Field names are compared case-insensitively".into(),
            ],
            Self::MultiplePrimaryKeys { .. } => vec![
                "Mark exactly one field with \"primary\": true".into(),
                "Omit the flag everywhere to get a generated 'id' column".into(),
            ],
            Self::InvalidIdentifier { role, .. } => vec![
                format!("A {role} must start with a letter, '_' or '$'"),
                "Only letters, digits, '_' and '$' may follow; no spaces or dashes".into(),
            ],
            Self::ReservedWord { name, .. } => vec![
                format!("'{name}' is a Java keyword; pick another name"),
                format!("For example '{name}Value' or '{name}Name'"),
            ],
            Self::UnsafeFieldMetadata { field, .. } => vec![
                format!("Keep the uiHint and optionValues of '{field}' on a single line"),
                "Remove '\\u' sequences from hints and options".into(),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnknownArtifactKind(_) => ErrorCategory::NotFound,
            Self::DuplicatePath { .. } | Self::AbsolutePathNotAllowed { .. } | Self::EmptyStructure => {
                ErrorCategory::Internal
            }
            _ => ErrorCategory::Validation,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Internal,
}
