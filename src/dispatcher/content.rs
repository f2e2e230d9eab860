use std::fmt::Write;

use crate::{types::FieldMap, utils::parse_separator_string};

/// Produces the message bodies for a form submission.
pub trait ContentProvider: Send + Sync {
    /// `skip_uploads` is set when uploaded files are sent as attachments.
    fn plain_body(&self, data: &FieldMap, skip_uploads: bool) -> String;

    fn html_body(&self, _data: &FieldMap, _skip_uploads: bool) -> String {
        String::new()
    }
}

/// Lists every field as `name = value`, one per line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValueContent {
    value_delimiter: String,
    line_delimiter: String,
}

impl Default for KeyValueContent {
    fn default() -> Self {
        Self::new(" = ", "\n")
    }
}

impl KeyValueContent {
    pub fn new<V: Into<String>, L: Into<String>>(value_delimiter: V, line_delimiter: L) -> Self {
        Self {
            value_delimiter: value_delimiter.into(),
            line_delimiter: line_delimiter.into(),
        }
    }

    /// Build from configured separators such as `\s=\s`, see [`parse_separator_string`].
    pub fn from_separators<V: AsRef<str>, L: AsRef<str>>(
        value_delimiter: V,
        line_delimiter: L,
    ) -> Self {
        Self::new(
            parse_separator_string(value_delimiter),
            parse_separator_string(line_delimiter),
        )
    }

    pub fn value_delimiter(&self) -> &str {
        &self.value_delimiter
    }

    pub fn line_delimiter(&self) -> &str {
        &self.line_delimiter
    }
}

impl ContentProvider for KeyValueContent {
    fn plain_body(&self, data: &FieldMap, skip_uploads: bool) -> String {
        let mut content = String::new();

        for (field, value) in data.iter() {
            if skip_uploads && value.is_upload() {
                continue;
            }

            let _ = write!(
                content,
                "{}{}{}{}",
                field, self.value_delimiter, value, self.line_delimiter
            );
        }

        content
    }
}
