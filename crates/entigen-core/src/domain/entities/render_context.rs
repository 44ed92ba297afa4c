//! Render context: the variables an artifact template may reference.
//!
//! Templates are plain text with `{{VARIABLE}}` placeholders. There are no
//! loops or conditionals; everything that depends on the field list is
//! precomputed here into ready-to-paste blocks (`FIELD_DECLARATIONS`,
//! `CONSTRUCTOR_PARAMS`, `SQL_COLUMNS`, ...).
//!
//! ## Variables
//!
//! | Variable | Example |
//! |----------|---------|
//! | `CLASS_NAME` | `Order` |
//! | `CLASS_VAR` | `order` |
//! | `QUALIFIED_NAME` | `com.demo.model.Order` |
//! | `NAMESPACE` | `com.demo` |
//! | `NAMESPACE_PATH` | `com/demo` |
//! | `GROUP_ID` | `com.codegen` |
//! | `ARTIFACT_ID` | `order` |
//! | `TABLE_NAME` | `order` |
//! | `SQL_TABLE_NAME` | `"order"` (quoted, safe for reserved words) |
//! | `PK_NAME` / `PK_TYPE` / `PK_SQL_TYPE` | `id` / `Long` / `BIGINT` |
//! | `FIELD_COUNT` | `2` |
//! | `IMPORTS` | `import java.time.LocalDate;` lines |
//! | `FIELD_DECLARATIONS` | annotated private fields |
//! | `CONSTRUCTOR_PARAMS` | `Long id, Double amount` |
//! | `CONSTRUCTOR_ASSIGNMENTS` | `this.id = id;` lines |
//! | `ACCESSORS` | getters and setters |
//! | `UPDATE_ASSIGNMENTS` | `existing.setAmount(changes.getAmount());` lines |
//! | `SQL_COLUMNS` | `"id" BIGINT PRIMARY KEY,` lines |

use std::collections::{BTreeSet, HashMap};
use std::fmt::Write as _;

use thiserror::Error;

use crate::domain::{
    entities::entity::{FieldSpec, GenerationRequest},
    type_mapper,
};

/// Placeholder in a template that the context does not bind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unbound placeholder {{{{{name}}}}}")]
pub struct UnboundPlaceholder {
    pub name: String,
}

/// A field after type resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedField {
    pub name: String,
    pub logical_type: String,
    pub java_type: &'static str,
    pub sql_type: &'static str,
    pub primary: bool,
    pub ui_hint: Option<String>,
    pub option_values: Vec<String>,
}

impl ResolvedField {
    pub fn resolve(field: &FieldSpec) -> Self {
        let def = type_mapper::resolve(&field.field_type);
        Self {
            name: field.name.trim().to_string(),
            logical_type: field.field_type.trim().to_string(),
            java_type: def.target,
            sql_type: def.sql,
            primary: field.primary,
            ui_hint: field.ui_hint.clone(),
            option_values: field.option_values.clone(),
        }
    }

    /// `amount` -> `Amount`, used for `getAmount` / `setAmount`.
    pub fn accessor_suffix(&self) -> String {
        capitalize_first(&self.name)
    }

    fn is_generated_key(&self) -> bool {
        self.primary && matches!(self.java_type, "Long" | "Integer")
    }
}

/// Immutable set of variables for one request.
#[derive(Debug, Clone)]
pub struct RenderContext {
    class_name: String,
    fields: Vec<ResolvedField>,
    variables: HashMap<String, String>,
}

impl RenderContext {
    /// Build the full context for a validated request.
    pub fn for_request(request: &GenerationRequest) -> Self {
        let entity = &request.entity;
        let class_name = entity.simple_name().to_string();
        let fields: Vec<ResolvedField> = entity
            .resolved_fields()
            .iter()
            .map(ResolvedField::resolve)
            .collect();

        let mut ctx = Self {
            class_name: class_name.clone(),
            fields: Vec::new(),
            variables: HashMap::new(),
        }
        .with_variable("CLASS_NAME", class_name.as_str())
        .with_variable("CLASS_VAR", lower_first(&class_name))
        .with_variable("QUALIFIED_NAME", entity.qualified_name.trim())
        .with_variable("NAMESPACE", entity.namespace())
        .with_variable("NAMESPACE_PATH", entity.namespace_path())
        .with_variable("GROUP_ID", request.group_id())
        .with_variable("ARTIFACT_ID", request.artifact_id())
        .with_variable("TABLE_NAME", to_snake_case(&class_name))
        .with_variable("SQL_TABLE_NAME", quote_sql_identifier(&to_snake_case(&class_name)))
        .with_variable("FIELD_COUNT", fields.len().to_string());

        if let Some(pk) = fields.iter().find(|f| f.primary) {
            ctx = ctx
                .with_variable("PK_NAME", pk.name.as_str())
                .with_variable("PK_TYPE", pk.java_type)
                .with_variable("PK_SQL_TYPE", pk.sql_type);
        }

        ctx = ctx
            .with_variable("IMPORTS", imports_block(&fields))
            .with_variable("FIELD_DECLARATIONS", field_declarations(&fields))
            .with_variable("CONSTRUCTOR_PARAMS", constructor_params(&fields))
            .with_variable("CONSTRUCTOR_ASSIGNMENTS", constructor_assignments(&fields))
            .with_variable("ACCESSORS", accessors(&fields))
            .with_variable("UPDATE_ASSIGNMENTS", update_assignments(&fields))
            .with_variable("SQL_COLUMNS", sql_columns(&fields));

        ctx.fields = fields;
        ctx
    }

    /// Add or replace a variable.
    pub fn with_variable(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(String::as_str)
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn fields(&self) -> &[ResolvedField] {
        &self.fields
    }

    pub fn primary_key(&self) -> Option<&ResolvedField> {
        self.fields.iter().find(|f| f.primary)
    }

    /// Substitute every `{{VARIABLE}}` in `template`.
    ///
    /// Only upper-case identifiers (`[A-Z][A-Z0-9_]*`) count as
    /// placeholders; any other `{{...}}` text is copied through. Values are
    /// inserted verbatim and never rescanned.
    ///
    /// # Errors
    ///
    /// Returns the first placeholder that has no binding.
    pub fn render(&self, template: &str) -> Result<String, UnboundPlaceholder> {
        let mut out = String::with_capacity(template.len() * 2);
        let mut rest = template;

        while let Some(start) = rest.find("{{") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];

            match after.find("}}") {
                Some(end) if is_placeholder(&after[..end]) => {
                    let name = &after[..end];
                    let value = self.get(name).ok_or_else(|| UnboundPlaceholder {
                        name: name.to_string(),
                    })?;
                    out.push_str(value);
                    rest = &after[end + 2..];
                }
                _ => {
                    out.push_str("{{");
                    rest = after;
                }
            }
        }

        out.push_str(rest);
        Ok(out)
    }

    /// All placeholder names referenced by `template`, sorted.
    pub fn placeholders(template: &str) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        let mut rest = template;
        while let Some(start) = rest.find("{{") {
            let after = &rest[start + 2..];
            match after.find("}}") {
                Some(end) if is_placeholder(&after[..end]) => {
                    names.insert(after[..end].to_string());
                    rest = &after[end + 2..];
                }
                _ => rest = after,
            }
        }
        names
    }
}

fn is_placeholder(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_uppercase())
        && chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

// ============================================================================
// Field-dependent blocks
// ============================================================================

const INDENT: &str = "    ";

fn imports_block(fields: &[ResolvedField]) -> String {
    let imports: BTreeSet<&str> = fields
        .iter()
        .filter_map(|f| type_mapper::imports_for(&f.logical_type))
        .collect();

    imports
        .into_iter()
        .map(|i| format!("import {i};\n"))
        .collect()
}

fn field_declarations(fields: &[ResolvedField]) -> String {
    let mut out = String::new();
    for (i, f) in fields.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        if f.primary {
            let _ = writeln!(out, "{INDENT}@Id");
            if f.is_generated_key() {
                let _ = writeln!(out, "{INDENT}@GeneratedValue(strategy = GenerationType.IDENTITY)");
            }
        }
        if let Some(hint) = &f.ui_hint {
            let _ = writeln!(out, "{INDENT}// ui: {hint}");
        }
        if !f.option_values.is_empty() {
            let _ = writeln!(out, "{INDENT}// options: {}", f.option_values.join(", "));
        }
        let _ = writeln!(out, "{INDENT}private {} {};", f.java_type, f.name);
    }
    out
}

fn constructor_params(fields: &[ResolvedField]) -> String {
    fields
        .iter()
        .map(|f| format!("{} {}", f.java_type, f.name))
        .collect::<Vec<_>>()
        .join(", ")
}

fn constructor_assignments(fields: &[ResolvedField]) -> String {
    fields
        .iter()
        .map(|f| format!("{INDENT}{INDENT}this.{0} = {0};\n", f.name))
        .collect()
}

fn accessors(fields: &[ResolvedField]) -> String {
    let mut out = String::new();
    for (i, f) in fields.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let suffix = f.accessor_suffix();
        let ty = f.java_type;
        let name = &f.name;
        let _ = writeln!(out, "{INDENT}public {ty} get{suffix}() {{");
        let _ = writeln!(out, "{INDENT}{INDENT}return {name};");
        let _ = writeln!(out, "{INDENT}}}");
        out.push('\n');
        let _ = writeln!(out, "{INDENT}public void set{suffix}({ty} {name}) {{");
        let _ = writeln!(out, "{INDENT}{INDENT}this.{name} = {name};");
        let _ = writeln!(out, "{INDENT}}}");
    }
    out
}

fn update_assignments(fields: &[ResolvedField]) -> String {
    fields
        .iter()
        .filter(|f| !f.primary)
        .map(|f| {
            let suffix = f.accessor_suffix();
            format!("{INDENT}{INDENT}{INDENT}existing.set{suffix}(changes.get{suffix}());\n")
        })
        .collect()
}

fn sql_columns(fields: &[ResolvedField]) -> String {
    fields
        .iter()
        .map(|f| {
            let key = if f.primary { " PRIMARY KEY" } else { "" };
            format!(
                "{INDENT}{} {}{key}",
                quote_sql_identifier(&to_snake_case(&f.name)),
                f.sql_type
            )
        })
        .collect::<Vec<_>>()
        .join(",\n")
}

/// Delimited identifier, so names like `order` or `user` stay legal SQL.
fn quote_sql_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

// ============================================================================
// Case helpers
// ============================================================================

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `OrderItem` -> `order_item`, `HTTPRequest` -> `http_request`.
fn to_snake_case(s: &str) -> String {
    split_words(s).join("_")
}

/// Split on separators, camelCase transitions and acronym boundaries.
fn split_words(input: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '_' || c == '-' || c.is_whitespace() {
            if !current.is_empty() {
                words.push(current.to_lowercase());
                current.clear();
            }
            continue;
        }

        if let Some(&next) = chars.peek() {
            // "myApp" -> "my" + "App"
            if c.is_lowercase() && next.is_uppercase() {
                current.push(c);
                words.push(current.to_lowercase());
                current.clear();
                continue;
            }

            // "HTTPServer" -> "HTTP" + "Server"
            if c.is_uppercase()
                && next.is_uppercase()
                && chars.clone().nth(1).is_some_and(|n| n.is_lowercase())
            {
                current.push(c);
                words.push(current.to_lowercase());
                current.clear();
                continue;
            }
        }

        current.push(c);
    }

    if !current.is_empty() {
        words.push(current.to_lowercase());
    }

    words
}
