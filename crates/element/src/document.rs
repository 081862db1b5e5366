//! Parsed documents that keep their navigator.
//!
//! A [`Document`] owns the backend navigator for one input and hands out
//! lazy views of it. The views borrow the document, so they cannot outlive
//! it; call [`ElementValue::to_eager`] to keep a value longer.

use crate::error::ParseFailure;
use crate::navigator::{
    BinaryNavigator, Navigator, SerializationFormat, TextNavigator, BINARY_FORMAT_MARKER,
};
use crate::value::{ElementValue, FromElement};
use crate::Limits;

#[derive(Debug)]
enum DocumentNavigator<'a> {
    Binary(BinaryNavigator<'a>),
    Text(TextNavigator),
}

/// One parsed input, binary or text.
#[derive(Debug)]
pub struct Document<'a> {
    navigator: DocumentNavigator<'a>,
}

impl Document<'static> {
    /// Parses JSON text under the default [`Limits`].
    pub fn parse(text: &str) -> Result<Self, ParseFailure> {
        Self::parse_with_limits(text, &Limits::default())
    }

    pub fn parse_with_limits(text: &str, limits: &Limits) -> Result<Self, ParseFailure> {
        let navigator = TextNavigator::parse_with_limits(text, limits).map_err(|err| {
            tracing::debug!(target: "doc_element", error = %err, "rejected text input");
            err
        })?;
        Ok(Self {
            navigator: DocumentNavigator::Text(navigator),
        })
    }
}

impl<'a> Document<'a> {
    /// Reads `buffer` under the default [`Limits`], choosing the backend by
    /// the first byte.
    pub fn from_buffer(buffer: &'a [u8]) -> Result<Self, ParseFailure> {
        Self::from_buffer_with_limits(buffer, &Limits::default())
    }

    /// A leading [`BINARY_FORMAT_MARKER`] selects the binary backend.
    /// Anything else must be UTF-8 JSON text.
    pub fn from_buffer_with_limits(buffer: &'a [u8], limits: &Limits) -> Result<Self, ParseFailure> {
        let navigator = match buffer.first() {
            None => Err(ParseFailure::Empty),
            Some(&BINARY_FORMAT_MARKER) => {
                BinaryNavigator::with_limits(buffer, limits).map(DocumentNavigator::Binary)
            }
            Some(_) => match std::str::from_utf8(buffer) {
                Ok(text) => TextNavigator::parse_with_limits(text, limits).map(DocumentNavigator::Text),
                Err(err) => Err(ParseFailure::NotText {
                    offset: err.valid_up_to(),
                }),
            },
        };
        match navigator {
            Ok(navigator) => Ok(Self { navigator }),
            Err(err) => {
                tracing::debug!(
                    target: "doc_element",
                    error = %err,
                    len = buffer.len(),
                    "rejected buffer input"
                );
                Err(err)
            }
        }
    }

    pub fn navigator(&self) -> &dyn Navigator {
        match &self.navigator {
            DocumentNavigator::Binary(navigator) => navigator,
            DocumentNavigator::Text(navigator) => navigator,
        }
    }

    pub fn format(&self) -> SerializationFormat {
        self.navigator().serialization_format()
    }

    /// Lazy view of the root value.
    pub fn root(&self) -> ElementValue<'_> {
        ElementValue::from_navigator(self.navigator())
    }

    /// The root as a specific kind, e.g. `root_as::<ObjectValue>()`.
    ///
    /// A root of another kind is [`ParseFailure::UnexpectedKind`].
    pub fn root_as<'s, T: FromElement<'s>>(&'s self) -> Result<T, ParseFailure> {
        self.root().into_kind().map_err(ParseFailure::from)
    }
}
