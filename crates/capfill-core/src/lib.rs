pub mod metadata;
pub mod normalize;
pub mod record;

pub use metadata::{FieldMetadata, FieldType, ProjectMetadata};
pub use normalize::{CHECKBOX_SEPARATOR, NormalizeError, RADIO_CHOICE_SUFFIX, normalize};
pub use record::{FieldValue, NormalizedRecord, RawRecord};
