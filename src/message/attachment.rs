use std::path::Path;

use crate::{error::Result, runtime::fs};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    file_name: String,
    mime_type: String,
    data: Vec<u8>,
}

impl Attachment {
    pub fn new<F: Into<String>, M: Into<String>>(
        file_name: F,
        mime_type: M,
        data: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            data,
        }
    }

    /// Read the attachment's contents from disk.
    pub async fn from_path<P: AsRef<Path>, F: Into<String>, M: Into<String>>(
        path: P,
        file_name: F,
        mime_type: M,
    ) -> Result<Self> {
        let data = fs::read(path).await?;

        Ok(Self::new(file_name, mime_type, data))
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }
}
