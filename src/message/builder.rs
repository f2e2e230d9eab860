use std::fmt::Display;

use crate::{
    error::{err, Error, ErrorKind, Result},
    types::ResolvedAddress,
};

use super::{attachment::Attachment, content::Content};

#[derive(Debug, Default)]
pub struct MessageBuilder {
    pub(crate) from: Vec<ResolvedAddress>,
    pub(crate) to: Vec<ResolvedAddress>,
    pub(crate) reply_to: Vec<ResolvedAddress>,
    pub(crate) subject: Option<String>,
    pub(crate) content: Content,
    pub(crate) attachments: Vec<Attachment>,
}

impl MessageBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn senders<C: IntoIterator<Item = ResolvedAddress>>(mut self, senders: C) -> Self {
        self.from.extend(senders);

        self
    }

    pub fn recipients<C: IntoIterator<Item = ResolvedAddress>>(mut self, recipients: C) -> Self {
        self.to.extend(recipients);

        self
    }

    pub fn reply_to<C: IntoIterator<Item = ResolvedAddress>>(mut self, reply_to: C) -> Self {
        self.reply_to.extend(reply_to);

        self
    }

    pub fn subject<S: Display>(mut self, subject: S) -> Self {
        self.subject = Some(subject.to_string());

        self
    }

    pub fn html<H: Into<String>>(mut self, html: H) -> Self {
        self.content.set_html(html);

        self
    }

    pub fn text<T: Into<String>>(mut self, text: T) -> Self {
        self.content.set_text(text);

        self
    }

    pub fn attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);

        self
    }

    pub fn build<T: TryFrom<Self, Error = Error>>(self) -> Result<T> {
        match self.try_into() {
            Ok(message) => Ok(message),
            Err(error) => err!(
                ErrorKind::InvalidMessage,
                "Could not build a valid message: {}",
                error
            ),
        }
    }
}
