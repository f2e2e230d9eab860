mod address;
mod field;

pub use address::{AddressSpec, ResolvedAddress};
pub use field::{EmailField, FieldMap, FieldValue, UploadField};
