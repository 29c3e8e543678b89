//! Read-only walk of a template's page/annotation tree.
//!
//! The walk snapshots every fillable widget into a [`Widget`] value;
//! discovery and filling both consume that list instead of re-deriving
//! state from shared tree nodes.

use capfill_core::CHECKBOX_SEPARATOR;
use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::debug;

use crate::PdfError;

/// One fillable widget annotation, snapshotted from the tree.
#[derive(Debug, Clone)]
pub struct Widget {
    /// Object id of the annotation itself.
    pub annot_id: ObjectId,
    /// Object id of the parent field, when the annotation has one.
    pub parent_id: Option<ObjectId>,
    /// The widget's own `/T` name, untruncated. Isolated fields are
    /// looked up in the record under this full name.
    pub own_name: Option<String>,
    /// The parent's `/T` name truncated at the checkbox separator.
    /// Only populated when the widget has no own name.
    pub group_name: Option<String>,
    /// Appearance-state names declared by the widget's `/AP` dictionary.
    pub appearance_states: Vec<String>,
}

impl Widget {
    /// The logical field name used for discovery: the own name truncated
    /// at the checkbox separator, else the inherited group name.
    pub fn logical_name(&self) -> Option<&str> {
        match (&self.own_name, &self.group_name) {
            (Some(own), _) => Some(truncate_group(own)),
            (None, Some(group)) => Some(group),
            (None, None) => None,
        }
    }
}

/// Collect every Widget annotation across all pages, in page order.
///
/// Annotation entries must be indirect references to be addressable for
/// the later mutation pass; inline dictionaries are skipped, as are
/// widgets with neither an own nor a parent field name.
pub fn collect_widgets(doc: &Document) -> Result<Vec<Widget>, PdfError> {
    let mut widgets = Vec::new();

    for page_id in doc.get_pages().into_values() {
        let page = doc.get_dictionary(page_id)?;
        let Ok(annots) = page.get(b"Annots") else {
            continue;
        };
        let Ok(annots) = resolve(doc, annots).as_array() else {
            continue;
        };

        for entry in annots {
            let Object::Reference(annot_id) = entry else {
                continue;
            };
            let Ok(annot) = doc.get_dictionary(*annot_id) else {
                continue;
            };
            if !is_widget(annot) {
                continue;
            }
            let widget = read_widget(doc, *annot_id, annot);
            if widget.own_name.is_none() && widget.group_name.is_none() {
                continue;
            }
            widgets.push(widget);
        }
    }

    debug!(widgets = widgets.len(), "collected widget annotations");
    Ok(widgets)
}

/// Ordered, de-duplicated logical field names, in first-seen order.
pub fn list_fields(doc: &Document) -> Result<Vec<String>, PdfError> {
    let mut names: Vec<String> = Vec::new();
    for widget in collect_widgets(doc)? {
        let Some(name) = widget.logical_name() else {
            continue;
        };
        if !names.iter().any(|seen| seen == name) {
            names.push(name.to_string());
        }
    }
    Ok(names)
}

/// Truncate a field name at the first checkbox separator.
pub(crate) fn truncate_group(name: &str) -> &str {
    name.split(CHECKBOX_SEPARATOR).next().unwrap_or(name)
}

fn is_widget(annot: &Dictionary) -> bool {
    matches!(annot.get(b"Subtype"), Ok(Object::Name(name)) if name == b"Widget")
}

fn read_widget(doc: &Document, annot_id: ObjectId, annot: &Dictionary) -> Widget {
    let own_name = annot.get(b"T").ok().and_then(text_value);

    let parent_id = match annot.get(b"Parent") {
        Ok(Object::Reference(id)) => Some(*id),
        _ => None,
    };

    let group_name = if own_name.is_none() {
        parent_id
            .and_then(|id| doc.get_dictionary(id).ok())
            .and_then(|parent| parent.get(b"T").ok())
            .and_then(text_value)
            .map(|name| truncate_group(&name).to_string())
    } else {
        None
    };

    Widget {
        annot_id,
        parent_id,
        own_name,
        group_name,
        appearance_states: appearance_states(doc, annot),
    }
}

/// Union of the state names declared by the widget's `/AP` normal and
/// down appearance sub-dictionaries.
fn appearance_states(doc: &Document, annot: &Dictionary) -> Vec<String> {
    let mut states = Vec::new();
    let Ok(ap) = annot.get(b"AP") else {
        return states;
    };
    let Ok(ap) = resolve(doc, ap).as_dict() else {
        return states;
    };

    for sub_key in [b"N".as_slice(), b"D".as_slice()] {
        let Ok(sub) = ap.get(sub_key) else {
            continue;
        };
        let Ok(sub) = resolve(doc, sub).as_dict() else {
            continue;
        };
        for (state, _) in sub.iter() {
            let state = String::from_utf8_lossy(state).into_owned();
            if !states.contains(&state) {
                states.push(state);
            }
        }
    }
    states
}

/// Follow a reference to its target object; non-references pass through.
fn resolve<'a>(doc: &'a Document, object: &'a Object) -> &'a Object {
    match object {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(object),
        other => other,
    }
}

/// Decode a `/T` value. Field names are string objects; names are
/// tolerated from lenient writers.
fn text_value(object: &Object) -> Option<String> {
    match object {
        Object::String(bytes, _) => Some(String::from_utf8_lossy(bytes).into_owned()),
        Object::Name(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
        _ => None,
    }
}
