//! REDCap project metadata: field types and multiple-choice display text.
//!
//! A REDCap metadata export is a JSON list with one entry per project
//! field. Only `field_name`, `field_type`, and
//! `select_choices_or_calculations` matter to the fill pipeline; every
//! other key the API sends is ignored during deserialization.

use std::collections::{HashMap, HashSet};

use serde::Deserialize;

/// REDCap field types the pipeline treats specially.
///
/// Everything else (`notes`, `calc`, `yesno`, `slider`, ...) lands in
/// [`Other`](FieldType::Other) and flows through as plain text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Radio,
    Checkbox,
    Dropdown,
    #[serde(other)]
    Other,
}

/// One entry of a project's metadata export.
#[derive(Debug, Clone, Deserialize)]
pub struct FieldMetadata {
    pub field_name: String,
    pub field_type: FieldType,
    /// Raw choice encoding: `"raw, display | raw, display | ..."`.
    /// Empty for fields without choices.
    #[serde(default)]
    pub select_choices_or_calculations: String,
}

/// A project's field metadata, loaded once per run.
#[derive(Debug, Clone, Default)]
pub struct ProjectMetadata {
    fields: Vec<FieldMetadata>,
}

impl ProjectMetadata {
    pub fn new(fields: Vec<FieldMetadata>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[FieldMetadata] {
        &self.fields
    }

    /// Partition field names into radio and checkbox sets.
    pub fn classify_fields(&self) -> (HashSet<String>, HashSet<String>) {
        let mut radios = HashSet::new();
        let mut checkboxes = HashSet::new();
        for field in &self.fields {
            match field.field_type {
                FieldType::Radio => {
                    radios.insert(field.field_name.clone());
                }
                FieldType::Checkbox => {
                    checkboxes.insert(field.field_name.clone());
                }
                _ => {}
            }
        }
        (radios, checkboxes)
    }

    /// Type of a single field.
    ///
    /// Field names are assumed unique per project; if the export violates
    /// that, the last entry wins.
    pub fn field_type_of(&self, name: &str) -> Option<FieldType> {
        self.fields
            .iter()
            .rev()
            .find(|field| field.field_name == name)
            .map(|field| field.field_type)
    }

    /// Names of dropdown fields, in metadata order.
    pub fn dropdown_fields(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|field| field.field_type == FieldType::Dropdown)
            .map(|field| field.field_name.as_str())
            .collect()
    }

    /// Map each multiple-choice field to its raw-value → display-text table.
    ///
    /// Fields with an empty choice string are omitted entirely.
    pub fn choice_text_map(&self) -> HashMap<String, HashMap<String, String>> {
        let mut texts = HashMap::new();
        for field in &self.fields {
            if field.select_choices_or_calculations.is_empty() {
                continue;
            }
            texts.insert(
                field.field_name.clone(),
                parse_choices(&field.select_choices_or_calculations),
            );
        }
        texts
    }
}

/// Parse a `"raw, display | raw, display"` choice string.
///
/// REDCap sometimes omits the spaces around the separating bar, so a
/// split on `" | "` that yields a single token falls back to a bare `|`
/// split. The display text may itself contain `", "`, so everything after
/// the first comma token is rejoined.
fn parse_choices(encoded: &str) -> HashMap<String, String> {
    let mut options: Vec<&str> = encoded.split(" | ").collect();
    if options.len() == 1 {
        options = encoded.split('|').collect();
    }

    let mut table = HashMap::new();
    for option in options {
        let fragments: Vec<&str> = option.trim().split(", ").collect();
        table.insert(fragments[0].to_string(), fragments[1..].join(", "));
    }
    table
}
