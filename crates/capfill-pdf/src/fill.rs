//! Writes normalized record values into a template's widgets.
//!
//! Filling is two-phase: the read-only walk produces a plan of write
//! operations keyed by object id, and the plan is applied afterwards.
//! Widgets whose logical name is absent from the record are left
//! untouched, as are radio widgets whose pages do not offer the chosen
//! state.

use std::path::Path;

use capfill_core::{FieldValue, NormalizedRecord};
use lopdf::{Document, Object, ObjectId};
use tracing::{debug, info, warn};

use crate::PdfError;
use crate::walk::{Widget, collect_widgets};

/// Checkbox appearance-state names.
const STATE_ON: &str = "Yes";
const STATE_OFF: &str = "Off";

/// Counts of what a fill pass wrote and skipped.
#[derive(Debug, Default, Clone, Copy)]
pub struct FillReport {
    pub text_fields: usize,
    pub checkboxes: usize,
    pub radio_buttons: usize,
    pub skipped: usize,
}

/// A single planned mutation.
enum WriteOp {
    /// Set the widget's `/AS` and `/V` to `Yes` or `Off`.
    CheckState { annot_id: ObjectId, on: bool },
    /// Set the target's `/V` to a text string and drop its cached `/AP`.
    TextValue { target_id: ObjectId, value: String },
    /// Select a radio choice: parent `/V`, widget `/AS`.
    RadioChoice {
        annot_id: ObjectId,
        parent_id: ObjectId,
        state: String,
    },
}

/// Fill every widget whose logical name appears in the record.
pub fn fill(doc: &mut Document, record: &NormalizedRecord) -> Result<FillReport, PdfError> {
    let widgets = collect_widgets(doc)?;

    let mut report = FillReport::default();
    let mut plan = Vec::new();

    for widget in &widgets {
        match plan_widget(widget, record) {
            Some(op) => {
                match op {
                    WriteOp::CheckState { .. } => report.checkboxes += 1,
                    WriteOp::TextValue { .. } => report.text_fields += 1,
                    WriteOp::RadioChoice { .. } => report.radio_buttons += 1,
                }
                plan.push(op);
            }
            None => report.skipped += 1,
        }
    }

    for op in plan {
        apply(doc, op)?;
    }

    debug!(
        text = report.text_fields,
        checkboxes = report.checkboxes,
        radios = report.radio_buttons,
        skipped = report.skipped,
        "filled template widgets"
    );
    Ok(report)
}

fn plan_widget(widget: &Widget, record: &NormalizedRecord) -> Option<WriteOp> {
    // Isolated field: looked up under the full untruncated name.
    if let Some(name) = widget.own_name.as_deref() {
        return match record.get(name)? {
            FieldValue::Checked(on) => Some(WriteOp::CheckState {
                annot_id: widget.annot_id,
                on: *on,
            }),
            other => Some(WriteOp::TextValue {
                target_id: widget.annot_id,
                value: other.as_text(),
            }),
        };
    }

    // Grouped field: looked up under the inherited group name.
    let group = widget.group_name.as_deref()?;
    match record.get(group)? {
        FieldValue::Choice(selection) => {
            let state = selection.keys().next()?;
            let parent_id = widget.parent_id?;
            if widget.appearance_states.iter().any(|s| s == state) {
                Some(WriteOp::RadioChoice {
                    annot_id: widget.annot_id,
                    parent_id,
                    state: state.clone(),
                })
            } else {
                // This page's widget does not offer the chosen state.
                None
            }
        }
        FieldValue::Checked(on) => Some(WriteOp::CheckState {
            annot_id: widget.annot_id,
            on: *on,
        }),
        FieldValue::Text(value) => Some(WriteOp::TextValue {
            target_id: widget.parent_id?,
            value: value.clone(),
        }),
    }
}

fn apply(doc: &mut Document, op: WriteOp) -> Result<(), PdfError> {
    match op {
        WriteOp::CheckState { annot_id, on } => {
            let state = if on { STATE_ON } else { STATE_OFF };
            let annot = doc.get_object_mut(annot_id)?.as_dict_mut()?;
            annot.set("AS", Object::Name(state.as_bytes().to_vec()));
            annot.set("V", Object::Name(state.as_bytes().to_vec()));
        }
        WriteOp::TextValue { target_id, value } => {
            let target = doc.get_object_mut(target_id)?.as_dict_mut()?;
            target.set("V", Object::string_literal(value));
            // Drop the cached appearance so viewers regenerate it.
            target.remove(b"AP");
        }
        WriteOp::RadioChoice {
            annot_id,
            parent_id,
            state,
        } => {
            let parent = doc.get_object_mut(parent_id)?.as_dict_mut()?;
            parent.set("V", Object::Name(state.as_bytes().to_vec()));
            let annot = doc.get_object_mut(annot_id)?.as_dict_mut()?;
            annot.set("AS", Object::Name(state.into_bytes()));
        }
    }
    Ok(())
}

/// Persist the filled document: create the output directory if missing,
/// flag the form for appearance regeneration, and save.
///
/// The caller guarantees the output path differs from the template path.
pub fn write_document(doc: &mut Document, output_path: &Path) -> Result<(), PdfError> {
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            info!(directory = %parent.display(), "creating output directory");
            std::fs::create_dir_all(parent)?;
        }
    }

    set_need_appearances(doc);
    doc.save(output_path)?;
    info!(path = %output_path.display(), "wrote filled PDF");
    Ok(())
}

/// Set `/NeedAppearances` on the AcroForm so viewers recompute every
/// field appearance on open.
fn set_need_appearances(doc: &mut Document) {
    let root_id = match doc.trailer.get(b"Root").and_then(|root| root.as_reference()) {
        Ok(id) => id,
        Err(_) => {
            warn!("document has no catalog; field appearances may be stale");
            return;
        }
    };

    // The AcroForm entry may be an indirect object or inline in the catalog.
    let form_id = doc
        .get_dictionary(root_id)
        .ok()
        .and_then(|catalog| catalog.get(b"AcroForm").ok())
        .and_then(|form| form.as_reference().ok());

    let form = match form_id {
        Some(form_id) => doc
            .get_object_mut(form_id)
            .and_then(|form| form.as_dict_mut())
            .ok(),
        None => doc
            .get_object_mut(root_id)
            .and_then(|catalog| catalog.as_dict_mut())
            .ok()
            .and_then(|catalog| catalog.get_mut(b"AcroForm").ok())
            .and_then(|form| form.as_dict_mut().ok()),
    };

    match form {
        Some(form) => form.set("NeedAppearances", Object::Boolean(true)),
        None => warn!("template has no AcroForm dictionary; field appearances may be stale"),
    }
}
