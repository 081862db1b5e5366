//! Writers for the two document formats, plus `serde_json` interop.

mod binary;
mod json;
mod value;

pub use binary::{to_binary, BinaryWriter};
pub use json::{to_json_string, to_json_string_pretty, JsonWriter};
pub use value::to_json_value;
