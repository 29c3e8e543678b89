//! In-memory form templates for walk and fill tests.

use lopdf::{Document, Object, ObjectId, dictionary};

pub struct TestForm {
    pub doc: Document,
    pub text_id: ObjectId,
    pub check_on_id: ObjectId,
    pub check_off_id: ObjectId,
    pub radio_parent_id: ObjectId,
    pub radio_kid_one: ObjectId,
    pub radio_kid_two: ObjectId,
    pub comment_parent_id: ObjectId,
    pub consent_kid_one: ObjectId,
    pub consent_kid_two: ObjectId,
}

/// Build a two-page template exercising every widget shape the filler
/// handles: an isolated text field, two checkbox widgets of one group, a
/// radio group with one kid per page, a text field linked across pages,
/// and a checkbox linked across pages.
pub fn build() -> TestForm {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    // Isolated text field with a cached appearance to observe clearing.
    let text_id = doc.add_object(dictionary! {
        "Type" => "Annot",
        "Subtype" => "Widget",
        "FT" => "Tx",
        "T" => Object::string_literal("name_first"),
        "AP" => dictionary! { "N" => Object::Null },
    });

    // Two sub-options of one checkbox group, each an isolated widget.
    let check_on_id = doc.add_object(checkbox_widget("cb_1___1"));
    let check_off_id = doc.add_object(checkbox_widget("cb_1___3"));

    // Radio group: parent holds the name, kids hold per-page states.
    let radio_parent_id = doc.new_object_id();
    let radio_kid_one = doc.add_object(radio_kid(radio_parent_id, "1"));
    let radio_kid_two = doc.add_object(radio_kid(radio_parent_id, "2"));
    doc.objects.insert(
        radio_parent_id,
        Object::Dictionary(dictionary! {
            "FT" => "Btn",
            "T" => Object::string_literal("rg1"),
            "Kids" => vec![
                Object::Reference(radio_kid_one),
                Object::Reference(radio_kid_two),
            ],
        }),
    );

    // Text field replicated on both pages via a shared parent.
    let comment_parent_id = doc.new_object_id();
    let comment_kid_one = doc.add_object(linked_kid(comment_parent_id));
    let comment_kid_two = doc.add_object(linked_kid(comment_parent_id));
    doc.objects.insert(
        comment_parent_id,
        Object::Dictionary(dictionary! {
            "FT" => "Tx",
            "T" => Object::string_literal("comment"),
            "AP" => dictionary! { "N" => Object::Null },
            "Kids" => vec![
                Object::Reference(comment_kid_one),
                Object::Reference(comment_kid_two),
            ],
        }),
    );

    // Checkbox replicated on both pages via a shared parent.
    let consent_parent_id = doc.new_object_id();
    let consent_kid_one = doc.add_object(consent_kid(consent_parent_id));
    let consent_kid_two = doc.add_object(consent_kid(consent_parent_id));
    doc.objects.insert(
        consent_parent_id,
        Object::Dictionary(dictionary! {
            "FT" => "Btn",
            "T" => Object::string_literal("consent"),
            "Kids" => vec![
                Object::Reference(consent_kid_one),
                Object::Reference(consent_kid_two),
            ],
        }),
    );

    let page_one = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Annots" => vec![
            Object::Reference(text_id),
            Object::Reference(check_on_id),
            Object::Reference(check_off_id),
            Object::Reference(radio_kid_one),
            Object::Reference(comment_kid_one),
            Object::Reference(consent_kid_one),
        ],
    });
    let page_two = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Annots" => vec![
            Object::Reference(radio_kid_two),
            Object::Reference(comment_kid_two),
            Object::Reference(consent_kid_two),
        ],
    });

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::Reference(page_one), Object::Reference(page_two)],
            "Count" => 2,
        }),
    );

    let acro_form_id = doc.add_object(dictionary! {
        "Fields" => vec![
            Object::Reference(text_id),
            Object::Reference(check_on_id),
            Object::Reference(check_off_id),
            Object::Reference(radio_parent_id),
            Object::Reference(comment_parent_id),
            Object::Reference(consent_parent_id),
        ],
    });

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
        "AcroForm" => acro_form_id,
    });
    doc.trailer.set("Root", catalog_id);

    TestForm {
        doc,
        text_id,
        check_on_id,
        check_off_id,
        radio_parent_id,
        radio_kid_one,
        radio_kid_two,
        comment_parent_id,
        consent_kid_one,
        consent_kid_two,
    }
}

/// A single-page document with no annotations at all.
pub fn build_empty() -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::Reference(page_id)],
            "Count" => 1,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc
}

fn checkbox_widget(name: &str) -> lopdf::Dictionary {
    dictionary! {
        "Type" => "Annot",
        "Subtype" => "Widget",
        "FT" => "Btn",
        "T" => Object::string_literal(name),
        "AP" => dictionary! {
            "N" => dictionary! { "Yes" => Object::Null, "Off" => Object::Null },
        },
    }
}

fn radio_kid(parent_id: ObjectId, state: &str) -> lopdf::Dictionary {
    dictionary! {
        "Type" => "Annot",
        "Subtype" => "Widget",
        "Parent" => Object::Reference(parent_id),
        "AP" => dictionary! {
            "N" => dictionary! { state => Object::Null, "Off" => Object::Null },
            "D" => dictionary! { state => Object::Null, "Off" => Object::Null },
        },
    }
}

fn linked_kid(parent_id: ObjectId) -> lopdf::Dictionary {
    dictionary! {
        "Type" => "Annot",
        "Subtype" => "Widget",
        "Parent" => Object::Reference(parent_id),
    }
}

fn consent_kid(parent_id: ObjectId) -> lopdf::Dictionary {
    dictionary! {
        "Type" => "Annot",
        "Subtype" => "Widget",
        "Parent" => Object::Reference(parent_id),
        "AP" => dictionary! {
            "N" => dictionary! { "Yes" => Object::Null, "Off" => Object::Null },
        },
    }
}
