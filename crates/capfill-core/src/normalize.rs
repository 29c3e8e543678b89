//! Three-stage normalization of a raw REDCap record.
//!
//! Stage order is significant: dropdown conversion needs raw values still
//! in place, and radio-group collapse assumes the conversion stage has
//! already run. Each stage runs exactly once per record.

use indexmap::IndexMap;
use thiserror::Error;
use tracing::debug;

use crate::metadata::{FieldType, ProjectMetadata};
use crate::record::{FieldValue, NormalizedRecord, RawRecord};

/// Separator REDCap generates between a checkbox field name and a choice id.
pub const CHECKBOX_SEPARATOR: &str = "___";

/// Suffix of the synthetic text key staged for each answered radio group.
///
/// Some templates represent a REDCap radio button as a plain text box;
/// naming the PDF field `{radio_name}__rchoice` bridges the two designs.
pub const RADIO_CHOICE_SUFFIX: &str = "__rchoice";

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("dropdown '{field}' has no display text for raw value '{raw}'")]
    UnknownDropdownChoice { field: String, raw: String },

    #[error("radio group '{group}' should hold a choice mapping, found {found}")]
    RadioNotAGroup { group: String, found: String },

    #[error("radio group '{group}' should contain exactly 1 selected choice: {contents}")]
    RadioSelectionCount { group: String, contents: String },
}

/// Run the full pipeline: checkbox/radio conversion, then dropdown
/// conversion, then radio-group collapse.
///
/// On success every radio-group entry holds exactly one key mapped to
/// `true`.
pub fn normalize(
    record: RawRecord,
    metadata: &ProjectMetadata,
) -> Result<NormalizedRecord, NormalizeError> {
    let converted = convert_checkboxes_and_radios(record, metadata);
    let converted = convert_dropdowns(converted, metadata)?;
    collapse_radio_groups(converted, metadata)
}

/// Stage 1: type checkbox and radio entries.
///
/// `fieldname___choiceid` keys with a known checkbox prefix become
/// booleans (`"1"` is checked, anything else is not). Known radio fields
/// become a one-entry `{raw: true}` selection; for a non-empty raw value
/// a `{name}__rchoice` text entry is staged in a delta map and merged
/// only after the pass, so it is never re-examined as a field itself.
fn convert_checkboxes_and_radios(
    record: RawRecord,
    metadata: &ProjectMetadata,
) -> NormalizedRecord {
    let (radios, checkboxes) = metadata.classify_fields();

    let mut result = NormalizedRecord::with_capacity(record.len());
    let mut staged: IndexMap<String, FieldValue> = IndexMap::new();

    let mut num_checkboxes = 0usize;
    let mut num_radios = 0usize;

    for (key, value) in record {
        let is_checkbox = {
            let mut parts = key.split(CHECKBOX_SEPARATOR);
            let prefix = parts.next().unwrap_or_default();
            parts.next().is_some() && checkboxes.contains(prefix)
        };

        if is_checkbox {
            result.insert(key, FieldValue::Checked(value == "1"));
            num_checkboxes += 1;
        } else if radios.contains(key.as_str()) {
            if !value.is_empty() {
                staged.insert(
                    format!("{key}{RADIO_CHOICE_SUFFIX}"),
                    FieldValue::Text(value.clone()),
                );
            }
            result.insert(key, FieldValue::Choice(IndexMap::from([(value, true)])));
            num_radios += 1;
        } else {
            result.insert(key, FieldValue::Text(value));
        }
    }

    debug!(
        checkboxes = num_checkboxes,
        radios = num_radios,
        staged = staged.len(),
        "converted checkbox and radio fields"
    );
    result.extend(staged);
    result
}

/// Stage 2: replace dropdown raw values with their display text.
///
/// A raw value missing from the choice-text map means the metadata and
/// the record disagree, which fails loudly. Dropdown fields absent from
/// the record are skipped.
fn convert_dropdowns(
    mut record: NormalizedRecord,
    metadata: &ProjectMetadata,
) -> Result<NormalizedRecord, NormalizeError> {
    let choice_text = metadata.choice_text_map();
    let mut num_converted = 0usize;

    for field in metadata.dropdown_fields() {
        let raw = match record.get(field) {
            Some(FieldValue::Text(value)) if !value.is_empty() => value.clone(),
            _ => continue,
        };
        let display = choice_text
            .get(field)
            .and_then(|table| table.get(&raw))
            .ok_or_else(|| NormalizeError::UnknownDropdownChoice {
                field: field.to_string(),
                raw: raw.clone(),
            })?;
        record.insert(field.to_string(), FieldValue::Text(display.clone()));
        num_converted += 1;
    }

    debug!(dropdowns = num_converted, "converted dropdown fields");
    Ok(record)
}

/// Stage 3: validate and collapse radio groups to a single `true` entry.
///
/// Every metadata radio field present in the record must hold a choice
/// mapping with exactly one selected value; multi-entry mappings collapse
/// to the one selected entry.
fn collapse_radio_groups(
    mut record: NormalizedRecord,
    metadata: &ProjectMetadata,
) -> Result<NormalizedRecord, NormalizeError> {
    let mut num_collapsed = 0usize;

    for field in metadata.fields() {
        if field.field_type != FieldType::Radio {
            continue;
        }

        let selected = {
            let Some(value) = record.get(field.field_name.as_str()) else {
                continue;
            };
            let group = match value {
                FieldValue::Choice(group) => group,
                other => {
                    return Err(NormalizeError::RadioNotAGroup {
                        group: field.field_name.clone(),
                        found: format!("{other:?}"),
                    });
                }
            };
            let selected: Vec<&String> = group
                .iter()
                .filter(|&(_, &on)| on)
                .map(|(raw, _)| raw)
                .collect();
            if selected.len() != 1 {
                return Err(NormalizeError::RadioSelectionCount {
                    group: field.field_name.clone(),
                    contents: format!("{group:?}"),
                });
            }
            if group.len() > 1 {
                Some(selected[0].clone())
            } else {
                None
            }
        };

        if let Some(raw) = selected {
            record.insert(
                field.field_name.clone(),
                FieldValue::Choice(IndexMap::from([(raw, true)])),
            );
            num_collapsed += 1;
        }
    }

    debug!(collapsed = num_collapsed, "collapsed radio groups");
    Ok(record)
}
