//! Entity description: the input every generation run starts from.
//!
//! The JSON shape accepted here is
//! `{className, fields: [{name, type, primary, uiHint?, optionValues?}], groupId?}`.
//! `uiType` is accepted as an alias of `uiHint`, and `numOptions` is read and
//! discarded (the option list already carries its own length).

use serde::{Deserialize, Serialize};

/// Group id used when the request does not carry one.
pub const DEFAULT_GROUP_ID: &str = "com.codegen";

/// Name of the primary key synthesized for entities that declare none.
pub const SYNTHETIC_ID_NAME: &str = "id";

/// Logical type of the synthesized primary key.
pub const SYNTHETIC_ID_TYPE: &str = "long";

/// One property of an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSpec {
    pub name: String,

    /// Logical type name, resolved through the type mapper.
    #[serde(rename = "type")]
    pub field_type: String,

    #[serde(default, alias = "isPrimary")]
    pub primary: bool,

    #[serde(default, alias = "uiType", skip_serializing_if = "Option::is_none")]
    pub ui_hint: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub option_values: Vec<String>,

    #[serde(default, skip_serializing)]
    num_options: Option<u32>,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: field_type.into(),
            primary: false,
            ui_hint: None,
            option_values: Vec::new(),
            num_options: None,
        }
    }

    /// Mark this field as the primary key.
    pub fn primary(mut self) -> Self {
        self.primary = true;
        self
    }

    pub fn with_ui_hint(mut self, hint: impl Into<String>) -> Self {
        self.ui_hint = Some(hint.into());
        self
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.option_values = options.into_iter().map(Into::into).collect();
        self
    }
}

/// A qualified class name plus its ordered fields.
///
/// Field order is significant: it drives constructor parameter order and
/// SQL column order in every generated artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySpec {
    #[serde(rename = "className", alias = "qualifiedName")]
    pub qualified_name: String,

    #[serde(default)]
    pub fields: Vec<FieldSpec>,
}

impl EntitySpec {
    pub fn new(qualified_name: impl Into<String>, fields: Vec<FieldSpec>) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            fields,
        }
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.qualified_name.trim().split('.')
    }

    /// Last segment of the qualified name.
    pub fn simple_name(&self) -> &str {
        self.qualified_name
            .trim()
            .rsplit('.')
            .next()
            .unwrap_or_default()
    }

    /// Package the generated sources live under: the first two segments.
    ///
    /// `com.demo.model.Order` yields `com.demo`. Only meaningful once the
    /// name has been validated to have at least two segments.
    pub fn namespace(&self) -> String {
        self.segments().take(2).collect::<Vec<_>>().join(".")
    }

    /// [`namespace`](Self::namespace) as a slash-separated directory path.
    pub fn namespace_path(&self) -> String {
        self.segments().take(2).collect::<Vec<_>>().join("/")
    }

    pub fn primary_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(|f| f.primary)
    }

    /// Fields in rendering order, with exactly one primary key.
    ///
    /// When no field is flagged primary, a field named `id` is promoted;
    /// failing that, a hidden `id: long` field is prepended.
    pub fn resolved_fields(&self) -> Vec<FieldSpec> {
        if self.fields.iter().any(|f| f.primary) {
            return self.fields.clone();
        }

        if let Some(pos) = self
            .fields
            .iter()
            .position(|f| f.name.trim().eq_ignore_ascii_case(SYNTHETIC_ID_NAME))
        {
            let mut fields = self.fields.clone();
            fields[pos].primary = true;
            return fields;
        }

        let mut fields = Vec::with_capacity(self.fields.len() + 1);
        fields.push(FieldSpec::new(SYNTHETIC_ID_NAME, SYNTHETIC_ID_TYPE).primary());
        fields.extend(self.fields.iter().cloned());
        fields
    }
}

/// Everything a pipeline run needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    #[serde(flatten)]
    pub entity: EntitySpec,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
}

impl GenerationRequest {
    pub fn new(entity: EntitySpec) -> Self {
        Self {
            entity,
            group_id: None,
        }
    }

    pub fn with_group_id(mut self, group_id: impl Into<String>) -> Self {
        self.group_id = Some(group_id.into());
        self
    }

    /// Fill in the group id only when the request left it unset.
    pub fn with_default_group_id(mut self, group_id: impl Into<String>) -> Self {
        if self.group_id.as_deref().is_none_or(|g| g.trim().is_empty()) {
            self.group_id = Some(group_id.into());
        }
        self
    }

    pub fn group_id(&self) -> &str {
        match self.group_id.as_deref() {
            Some(g) if !g.trim().is_empty() => g.trim(),
            _ => DEFAULT_GROUP_ID,
        }
    }

    /// Build artifact identifier: the simple name lower-cased.
    pub fn artifact_id(&self) -> String {
        self.entity.simple_name().to_lowercase()
    }

    pub fn simple_name(&self) -> &str {
        self.entity.simple_name()
    }

    /// Archive file name for this request, `<Simple>-generated-app.zip`.
    pub fn archive_file_name(&self) -> String {
        format!("{}-generated-app.zip", self.simple_name())
    }
}
