#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    dispatcher::{DispatcherConfig, KeyValueContent, MailDispatcher},
    transport::MailTransport,
    types::AddressSpec,
};

pub const DEFAULT_SUBJECT: &str = "New Form Submission";
pub const DEFAULT_VALUE_DELIMITER: &str = "\\s=\\s";
pub const DEFAULT_LINE_DELIMITER: &str = "\\n";

/// The settings of a mail route, as stored in the relay configuration.
///
/// ```json
/// {
///     "sender": {"address": "forms@example.com", "name": "Forms"},
///     "recipients": "sales@example.com, Support <support@example.com>",
///     "replyTo": "{name} <{email}>",
///     "subject": "New request from {name}",
///     "includeAttachmentsInMail": true
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct MailRouteConfig {
    pub sender: AddressSpec,
    pub recipients: AddressSpec,
    pub reply_to: AddressSpec,
    pub subject: String,
    pub include_attachments_in_mail: bool,
    pub value_delimiter: String,
    pub line_delimiter: String,
}

impl Default for MailRouteConfig {
    fn default() -> Self {
        Self {
            sender: AddressSpec::default(),
            recipients: AddressSpec::default(),
            reply_to: AddressSpec::default(),
            subject: DEFAULT_SUBJECT.to_string(),
            include_attachments_in_mail: false,
            value_delimiter: DEFAULT_VALUE_DELIMITER.to_string(),
            line_delimiter: DEFAULT_LINE_DELIMITER.to_string(),
        }
    }
}

impl MailRouteConfig {
    #[cfg(feature = "json")]
    pub fn from_json(json: &str) -> crate::error::Result<Self> {
        crate::utils::json::from_json(json)
    }

    pub fn dispatcher_config(&self) -> DispatcherConfig {
        DispatcherConfig::new(self.sender.clone(), self.recipients.clone())
            .reply_to(self.reply_to.clone())
            .subject(self.subject.clone())
            .attach_uploaded_files(self.include_attachments_in_mail)
    }

    pub fn content(&self) -> KeyValueContent {
        KeyValueContent::from_separators(&self.value_delimiter, &self.line_delimiter)
    }

    pub fn into_dispatcher(self, transport: Box<dyn MailTransport>) -> MailDispatcher {
        let content = self.content();

        MailDispatcher::new(self.dispatcher_config(), transport).with_content(content)
    }
}
