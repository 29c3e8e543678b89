//! Record value types shared by the normalizer and the PDF filler.

use indexmap::IndexMap;

/// A flat REDCap record exactly as the API returns it: field name (or
/// `fieldname___choiceid` for checkbox sub-options) → string value.
/// Insertion order follows the project's field order.
pub type RawRecord = IndexMap<String, String>;

/// A record after normalization, same keyspace plus the synthetic
/// radio-choice text keys.
pub type NormalizedRecord = IndexMap<String, FieldValue>;

/// A normalized field value.
///
/// Downstream consumers pattern-match instead of sniffing types:
/// checkbox entries become [`Checked`](FieldValue::Checked), radio groups
/// become [`Choice`](FieldValue::Choice), everything else stays
/// [`Text`](FieldValue::Text).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Checked(bool),
    /// Radio-group selection: raw choice value → selected flag.
    Choice(IndexMap<String, bool>),
}

impl FieldValue {
    /// The value rendered as text for a plain-text PDF field.
    ///
    /// A `Choice` renders as its selected raw value; `Checked` as the
    /// API's `"1"`/`"0"` encoding.
    pub fn as_text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Checked(true) => "1".to_string(),
            Self::Checked(false) => "0".to_string(),
            Self::Choice(selection) => selection.keys().next().cloned().unwrap_or_default(),
        }
    }
}
