/// Expand the escapes allowed in configured separators: `\s` (space), `\t` and `\n`.
pub fn parse_separator_string<S: AsRef<str>>(separator: S) -> String {
    separator
        .as_ref()
        .replace("\\s", " ")
        .replace("\\t", "\t")
        .replace("\\n", "\n")
}

const DIRTY_HEADER_CHARACTERS: [char; 4] = ['\r', '\n', '\x0c', '\x1b'];

/// Returns an empty string if the value could be used to inject extra headers.
pub fn sanitize_header_string<S: Into<String>>(value: S) -> String {
    let value = value.into();

    if value.contains(&DIRTY_HEADER_CHARACTERS[..]) {
        log::warn!("Dirty mail header found: {:?}", value);

        return String::new();
    }

    value
}

#[cfg(feature = "json")]
pub mod json {
    use serde::de::DeserializeOwned;

    use crate::error::{Error, ErrorKind, Result};

    pub fn from_json<T: DeserializeOwned>(json: &str) -> Result<T> {
        serde_json::from_str(json).map_err(|e| {
            Error::new(
                ErrorKind::SerializeJSON,
                format!("Failed to deserialize data from json: {}", e),
            )
        })
    }
}
