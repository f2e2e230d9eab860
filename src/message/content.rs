#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Content {
    pub(crate) text: Option<String>,
    pub(crate) html: Option<String>,
}

impl<T: Into<String>> From<T> for Content {
    fn from(text: T) -> Self {
        Self::from_text(text)
    }
}

impl Content {
    pub fn new(text: Option<String>, html: Option<String>) -> Self {
        Self { text, html }
    }

    pub fn from_text<T: Into<String>>(text: T) -> Self {
        Self::new(Some(text.into()), None)
    }

    pub fn set_text<T: Into<String>>(&mut self, text: T) {
        self.text = Some(text.into())
    }

    pub fn set_html<H: Into<String>>(&mut self, html: H) {
        self.html = Some(html.into())
    }

    /// The message in pure text form.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// The message as a html page.
    pub fn html(&self) -> Option<&str> {
        self.html.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.html.is_none()
    }
}
