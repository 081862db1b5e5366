//! Logic behind the `element-pack` and `element-unpack` tools.
//!
//! - `element-pack`: JSON text → binary document
//! - `element-unpack`: binary document (or JSON text) → JSON text, or its
//!   fingerprint

use thiserror::Error;

use crate::document::Document;
use crate::error::{ParseFailure, WriteError};
use crate::serialize::{to_binary, to_json_string, to_json_string_pretty};

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Parse(#[from] ParseFailure),
    #[error(transparent)]
    Write(#[from] WriteError),
    #[error("unknown option: {0}")]
    UnknownOption(String),
}

/// What `element-unpack` prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnpackOutput {
    #[default]
    Compact,
    Pretty,
    Fingerprint,
}

/// Encodes JSON text as a binary document.
pub fn pack(text: &str) -> Result<Vec<u8>, CliError> {
    let doc = Document::parse(text)?;
    Ok(to_binary(&doc.root()))
}

/// Decodes a binary document, or JSON text, into the requested output.
pub fn unpack(bytes: &[u8], output: UnpackOutput) -> Result<String, CliError> {
    let doc = Document::from_buffer(bytes)?;
    let root = doc.root();
    let text = match output {
        UnpackOutput::Compact => to_json_string(&root)?,
        UnpackOutput::Pretty => to_json_string_pretty(&root)?,
        UnpackOutput::Fingerprint => root.fingerprint().to_string(),
    };
    Ok(text)
}

/// Reads the `element-unpack` flags.
pub fn unpack_output<I>(args: I) -> Result<UnpackOutput, CliError>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut output = UnpackOutput::Compact;
    for arg in args {
        output = match arg.as_ref() {
            "--pretty" => UnpackOutput::Pretty,
            "--fingerprint" => UnpackOutput::Fingerprint,
            other => return Err(CliError::UnknownOption(other.to_string())),
        };
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_then_unpack() {
        let bytes = pack(r#"{"a": [1, "b", null]}"#).unwrap();
        assert_eq!(bytes[0], crate::BINARY_FORMAT_MARKER);
        assert_eq!(
            unpack(&bytes, UnpackOutput::Compact).unwrap(),
            r#"{"a":[1,"b",null]}"#
        );
        assert_eq!(
            unpack(&bytes, UnpackOutput::Pretty).unwrap(),
            "{\n  \"a\": [\n    1,\n    \"b\",\n    null\n  ]\n}"
        );
    }

    #[test]
    fn fingerprint_matches_across_formats() {
        let text = r#"{"x": true, "y": [2.5]}"#;
        let bytes = pack(text).unwrap();
        assert_eq!(
            unpack(&bytes, UnpackOutput::Fingerprint).unwrap(),
            unpack(text.as_bytes(), UnpackOutput::Fingerprint).unwrap()
        );
    }

    #[test]
    fn reports_bad_input() {
        assert!(matches!(pack("[1,"), Err(CliError::Parse(_))));
        assert!(matches!(
            unpack(&[0x80, 0xc1], UnpackOutput::Compact),
            Err(CliError::Parse(ParseFailure::Binary(_)))
        ));
    }

    #[test]
    fn reads_flags() {
        assert_eq!(unpack_output(Vec::<String>::new()).unwrap(), UnpackOutput::Compact);
        assert_eq!(unpack_output(["--pretty"]).unwrap(), UnpackOutput::Pretty);
        assert_eq!(
            unpack_output(["--pretty", "--fingerprint"]).unwrap(),
            UnpackOutput::Fingerprint
        );
        assert!(matches!(
            unpack_output(["--bogus"]),
            Err(CliError::UnknownOption(option)) if option == "--bogus"
        ));
    }
}
