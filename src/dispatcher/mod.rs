mod content;

pub use content::{ContentProvider, KeyValueContent};

use crate::{
    error::{Error, Result},
    message::{Attachment, MessageBuilder, SendableMessage},
    parser::address::parse_addresses,
    template::{DefaultTemplateEngine, TemplateEngine},
    transport::MailTransport,
    types::{AddressSpec, FieldMap, ResolvedAddress, UploadField},
    utils::sanitize_header_string,
};

/// What to send for every submission. All strings may contain `{field}` placeholders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatcherConfig {
    pub from: AddressSpec,
    pub to: AddressSpec,
    pub reply_to: AddressSpec,
    pub subject: String,
    pub attach_uploaded_files: bool,
}

impl DispatcherConfig {
    pub fn new<F: Into<AddressSpec>, T: Into<AddressSpec>>(from: F, to: T) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            ..Default::default()
        }
    }

    pub fn reply_to<R: Into<AddressSpec>>(mut self, reply_to: R) -> Self {
        self.reply_to = reply_to.into();

        self
    }

    pub fn subject<S: Into<String>>(mut self, subject: S) -> Self {
        self.subject = subject.into();

        self
    }

    pub fn attach_uploaded_files(mut self, attach: bool) -> Self {
        self.attach_uploaded_files = attach;

        self
    }
}

/// Turns form submissions into mail messages and sends them.
pub struct MailDispatcher {
    config: DispatcherConfig,
    transport: Box<dyn MailTransport>,
    template_engine: Box<dyn TemplateEngine>,
    content: Box<dyn ContentProvider>,
}

impl MailDispatcher {
    pub fn new(config: DispatcherConfig, transport: Box<dyn MailTransport>) -> Self {
        Self {
            config,
            transport,
            template_engine: Box::new(DefaultTemplateEngine),
            content: Box::new(KeyValueContent::default()),
        }
    }

    pub fn with_template_engine<E: TemplateEngine + 'static>(mut self, engine: E) -> Self {
        self.template_engine = Box::new(engine);

        self
    }

    pub fn with_content<C: ContentProvider + 'static>(mut self, content: C) -> Self {
        self.content = Box::new(content);

        self
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    fn render_addresses(
        &self,
        spec: &AddressSpec,
        data: &FieldMap,
        single_address: bool,
    ) -> Vec<ResolvedAddress> {
        let rendered = self.template_engine.render_spec(spec, data);

        parse_addresses(&rendered, single_address)
    }

    pub fn from(&self, data: &FieldMap) -> Vec<ResolvedAddress> {
        self.render_addresses(&self.config.from, data, true)
    }

    pub fn to(&self, data: &FieldMap) -> Vec<ResolvedAddress> {
        self.render_addresses(&self.config.to, data, false)
    }

    pub fn reply_to(&self, data: &FieldMap) -> Vec<ResolvedAddress> {
        self.render_addresses(&self.config.reply_to, data, true)
    }

    pub fn subject(&self, data: &FieldMap) -> String {
        sanitize_header_string(self.template_engine.render(&self.config.subject, data))
    }

    /// Assemble the message for a submission without sending it.
    pub async fn build_message(&self, data: &FieldMap) -> Result<SendableMessage> {
        let attach = self.config.attach_uploaded_files;

        let mut builder = MessageBuilder::new()
            .senders(self.from(data))
            .recipients(self.to(data))
            .reply_to(self.reply_to(data))
            .subject(self.subject(data));

        let plain = self.content.plain_body(data, attach);
        let html = self.content.html_body(data, attach);

        if !html.is_empty() {
            builder = builder.html(html);
        }

        if !plain.is_empty() {
            builder = builder.text(plain);
        }

        if attach {
            for upload in upload_fields(data) {
                let attachment =
                    Attachment::from_path(upload.path(), upload.file_name(), upload.mime_type())
                        .await?;

                builder = builder.attachment(attachment);
            }
        }

        builder.build()
    }

    /// Send a single form submission.
    ///
    /// Every failure, from building the message to delivering it, is reported as
    /// [`ErrorKind::DispatchFailed`](crate::ErrorKind::DispatchFailed) with the cause attached.
    pub async fn send(&self, data: &FieldMap) -> Result<()> {
        let result = match self.build_message(data).await {
            Ok(message) => {
                let recipients = message.to().len();

                self.transport
                    .send_message(message)
                    .await
                    .map(|_| recipients)
            }
            Err(error) => Err(error),
        };

        match result {
            Ok(recipients) => {
                log::info!("Sent form submission to {} recipient(s)", recipients);

                Ok(())
            }
            Err(error) => {
                log::error!("Failed to send form submission: {}", error);

                Err(Error::dispatch_failed(error))
            }
        }
    }
}

/// The uploaded files of a submission.
pub fn upload_fields(data: &FieldMap) -> Vec<&UploadField> {
    data.uploads().map(|(_, upload)| upload).collect()
}
