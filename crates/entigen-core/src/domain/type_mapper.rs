//! Logical type registry.
//!
//! Every logical field type is described exactly once by a [`TypeDef`] in
//! [`TYPE_TABLE`]. Both the Java type used in generated sources and the SQL
//! column type used in the schema script derive from that single row.
//!
//! Lookups are case-insensitive. Unknown names never fail: they degrade to
//! the [`FALLBACK`] row and emit a warning.

use tracing::warn;

/// One row of the type mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeDef {
    /// Logical names accepted for this row, lower-case.
    pub names: &'static [&'static str],
    /// Java type in generated sources.
    pub target: &'static str,
    /// Column type in the schema script.
    pub sql: &'static str,
    /// Import needed by sources that use `target`, if any.
    pub import: Option<&'static str>,
}

/// Row used for unrecognized type names.
pub const FALLBACK: TypeDef = TypeDef {
    names: &["string"],
    target: "String",
    sql: "VARCHAR(255)",
    import: None,
};

/// Single source of truth for type mapping.
pub static TYPE_TABLE: &[TypeDef] = &[
    FALLBACK,
    TypeDef {
        names: &["int", "integer"],
        target: "Integer",
        sql: "INT",
        import: None,
    },
    TypeDef {
        names: &["long"],
        target: "Long",
        sql: "BIGINT",
        import: None,
    },
    TypeDef {
        names: &["boolean"],
        target: "Boolean",
        sql: "BOOLEAN",
        import: None,
    },
    TypeDef {
        names: &["date"],
        target: "LocalDate",
        sql: "DATE",
        import: Some("java.time.LocalDate"),
    },
    TypeDef {
        names: &["timestamp"],
        target: "LocalDateTime",
        sql: "TIMESTAMP",
        import: Some("java.time.LocalDateTime"),
    },
    TypeDef {
        names: &["double"],
        target: "Double",
        sql: "DOUBLE",
        import: None,
    },
    TypeDef {
        names: &["float"],
        target: "Float",
        sql: "FLOAT",
        import: None,
    },
];

fn find(logical: &str) -> Option<&'static TypeDef> {
    let key = logical.trim().to_ascii_lowercase();
    TYPE_TABLE.iter().find(|def| def.names.contains(&key.as_str()))
}

/// Resolve a logical name, falling back to [`FALLBACK`] with a warning.
pub fn resolve(logical: &str) -> &'static TypeDef {
    match find(logical) {
        Some(def) => def,
        None => {
            warn!(
                logical_type = logical,
                fallback = FALLBACK.target,
                "Unknown field type, using default"
            );
            &FALLBACK
        }
    }
}

/// Whether `logical` names a row of the table.
pub fn is_known(logical: &str) -> bool {
    find(logical).is_some()
}

/// Java type for a logical type name. Defaults to `String`.
pub fn map_to_target_type(logical: &str) -> &'static str {
    resolve(logical).target
}

/// SQL column type for a logical type name. Defaults to `VARCHAR(255)`.
pub fn map_to_sql_type(logical: &str) -> &'static str {
    resolve(logical).sql
}

/// Java import required by the mapped type, if any.
pub fn imports_for(logical: &str) -> Option<&'static str> {
    find(logical).and_then(|def| def.import)
}
