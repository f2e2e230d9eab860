use std::{
    fmt,
    path::{Path, PathBuf},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::address::AddressSpec;

/// A form field holding a mail address and an optional name.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EmailField {
    address: String,
    name: String,
}

impl EmailField {
    pub fn new<A: AsRef<str>, N: AsRef<str>>(address: A, name: N) -> Self {
        Self {
            address: address.as_ref().trim().to_string(),
            name: name.as_ref().trim().to_string(),
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for EmailField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            write!(f, "{}", self.address)
        } else {
            write!(f, "{} <{}>", self.name, self.address)
        }
    }
}

impl From<EmailField> for AddressSpec {
    fn from(field: EmailField) -> Self {
        AddressSpec::Pair {
            name: field.name,
            address: field.address,
        }
    }
}

/// A file that was uploaded together with the form.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UploadField {
    file_name: String,
    path: PathBuf,
    public_url: String,
    mime_type: String,
}

impl UploadField {
    pub fn new<F: Into<String>, P: Into<PathBuf>, U: Into<String>, M: Into<String>>(
        file_name: F,
        path: P,
        public_url: U,
        mime_type: M,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            path: path.into(),
            public_url: public_url.into(),
            mime_type: mime_type.into(),
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Where the uploaded file can be read from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn public_url(&self) -> &str {
        &self.public_url
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }
}

impl fmt::Display for UploadField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.public_url)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum FieldValue {
    Text(String),
    Multi(Vec<String>),
    Email(EmailField),
    Upload(UploadField),
}

impl FieldValue {
    pub fn is_upload(&self) -> bool {
        matches!(self, FieldValue::Upload(_))
    }

    pub fn as_upload(&self) -> Option<&UploadField> {
        match self {
            FieldValue::Upload(upload) => Some(upload),
            _ => None,
        }
    }

    /// Use this value as a set of mail addresses.
    pub fn to_address_spec(&self) -> AddressSpec {
        match self {
            FieldValue::Text(text) => AddressSpec::Raw(text.clone()),
            FieldValue::Multi(values) => {
                AddressSpec::List(values.iter().cloned().map(AddressSpec::Raw).collect())
            }
            FieldValue::Email(email) => email.clone().into(),
            FieldValue::Upload(upload) => AddressSpec::Raw(upload.to_string()),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(text) => write!(f, "{}", text),
            FieldValue::Multi(values) => write!(f, "{}", values.join(",")),
            FieldValue::Email(email) => write!(f, "{}", email),
            FieldValue::Upload(upload) => write!(f, "{}", upload),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl<T: Into<String>> From<Vec<T>> for FieldValue {
    fn from(values: Vec<T>) -> Self {
        Self::Multi(values.into_iter().map(Into::into).collect())
    }
}

impl From<EmailField> for FieldValue {
    fn from(email: EmailField) -> Self {
        Self::Email(email)
    }
}

impl From<UploadField> for FieldValue {
    fn from(upload: UploadField) -> Self {
        Self::Upload(upload)
    }
}

/// The submitted form data, keeps the order in which fields were inserted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMap {
    fields: Vec<(String, FieldValue)>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field, replacing the value of an existing field with the same name in place.
    pub fn insert<N: Into<String>, V: Into<FieldValue>>(&mut self, name: N, value: V) {
        let name = name.into();
        let value = value.into();

        match self.fields.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// All fields holding an uploaded file.
    pub fn uploads(&self) -> impl Iterator<Item = (&str, &UploadField)> {
        self.iter()
            .filter_map(|(name, value)| value.as_upload().map(|upload| (name, upload)))
    }
}

impl<N: Into<String>, V: Into<FieldValue>> FromIterator<(N, V)> for FieldMap {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut map = FieldMap::new();

        for (name, value) in iter {
            map.insert(name, value);
        }

        map
    }
}

impl<N: Into<String>, V: Into<FieldValue>, const C: usize> From<[(N, V); C]> for FieldMap {
    fn from(fields: [(N, V); C]) -> Self {
        fields.into_iter().collect()
    }
}
