//! Resource limits applied by the parse entrypoints.

use serde::{Deserialize, Serialize};

use crate::error::LimitError;

/// Deepest nesting `serde_json` parses before giving up on recursion.
pub const MAX_TEXT_NESTING_DEPTH: usize = 127;

/// Bounds on untrusted input.
///
/// Both backends apply the same limits: the binary navigator while validating
/// its buffer, the text navigator before handing the text to `serde_json`.
/// Nesting depth counts arrays and objects; a scalar root has depth 0.
///
/// JSON text can never nest deeper than [`MAX_TEXT_NESTING_DEPTH`], the most
/// `serde_json` accepts; a larger `max_nesting_depth` only raises the bound
/// for binary documents.
///
/// Missing fields fall back to [`Limits::lenient`] when deserialized, so an
/// application config can override a single bound:
///
/// ```
/// use doc_element::Limits;
///
/// let limits: Limits = serde_json::from_str(r#"{"max_nesting_depth": 16}"#).unwrap();
/// assert_eq!(limits.max_nesting_depth, 16);
/// assert_eq!(limits.max_input_size, Limits::lenient().max_input_size);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Maximum input size in bytes.
    pub max_input_size: usize,
    /// Maximum nesting depth of arrays and objects.
    pub max_nesting_depth: usize,
}

impl Limits {
    /// Tight limits for inputs from untrusted peers.
    pub const fn strict() -> Self {
        Self {
            max_input_size: 1024 * 1024,
            max_nesting_depth: 32,
        }
    }

    /// Generous limits. The depth is the text ceiling, so anything the binary
    /// backend accepts also renders to text that parses back.
    pub const fn lenient() -> Self {
        Self {
            max_input_size: 64 * 1024 * 1024,
            max_nesting_depth: MAX_TEXT_NESTING_DEPTH,
        }
    }

    pub(crate) fn check_input_size(&self, size: usize) -> Result<(), LimitError> {
        if size > self.max_input_size {
            return Err(LimitError::InputTooLarge {
                size,
                limit: self.max_input_size,
            });
        }
        Ok(())
    }

    /// The depth bound for JSON text.
    pub(crate) fn text_nesting_depth(&self) -> usize {
        self.max_nesting_depth.min(MAX_TEXT_NESTING_DEPTH)
    }

    pub(crate) fn check_depth(&self, depth: usize) -> Result<(), LimitError> {
        if depth > self.max_nesting_depth {
            return Err(LimitError::NestingTooDeep {
                limit: self.max_nesting_depth,
            });
        }
        Ok(())
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self::lenient()
    }
}
