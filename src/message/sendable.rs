use std::result;

use mail_builder::headers::address::Address as MailAddress;

use crate::{
    error::{err, Error, ErrorKind, Result},
    types::ResolvedAddress,
};

use super::{attachment::Attachment, builder::MessageBuilder, content::Content};

/// A message that passed validation and can be handed to a transport.
#[derive(Debug, Clone)]
pub struct SendableMessage {
    from: ResolvedAddress,
    to: Vec<ResolvedAddress>,
    reply_to: Vec<ResolvedAddress>,
    subject: String,
    content: Content,
    attachments: Vec<Attachment>,
}

fn mail_address(address: &ResolvedAddress) -> MailAddress<'_> {
    MailAddress::new_address(address.name(), address.email())
}

fn mail_address_list(addresses: &[ResolvedAddress]) -> MailAddress<'_> {
    MailAddress::new_list(addresses.iter().map(mail_address).collect())
}

fn validate_addresses(header: &str, addresses: &[ResolvedAddress]) -> Result<()> {
    for address in addresses {
        if !validator::validate_email(address.email()) {
            err!(
                ErrorKind::InvalidMessage,
                "Invalid email address in {} header: '{}'",
                header,
                address.email()
            );
        }
    }

    Ok(())
}

impl SendableMessage {
    pub fn from(&self) -> &ResolvedAddress {
        &self.from
    }

    pub fn to(&self) -> &[ResolvedAddress] {
        &self.to
    }

    pub fn reply_to(&self) -> &[ResolvedAddress] {
        &self.reply_to
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    /// The envelope sender and recipients. Reply-to addresses are not part of the envelope.
    pub fn envelope(&self) -> (&ResolvedAddress, &[ResolvedAddress]) {
        (&self.from, &self.to)
    }

    /// Render the message into its MIME form.
    pub fn to_rfc822(&self) -> Result<Vec<u8>> {
        let mut builder = mail_builder::MessageBuilder::new()
            .from(mail_address(&self.from))
            .to(mail_address_list(&self.to))
            .subject(self.subject.as_str());

        if !self.reply_to.is_empty() {
            builder = builder.reply_to(mail_address_list(&self.reply_to));
        }

        if let Some(text) = self.content.text() {
            builder = builder.text_body(text);
        }

        if let Some(html) = self.content.html() {
            builder = builder.html_body(html);
        }

        if self.content.is_empty() {
            builder = builder.text_body("");
        }

        for attachment in &self.attachments {
            builder = builder.attachment(
                attachment.mime_type(),
                attachment.file_name(),
                attachment.data(),
            );
        }

        Ok(builder.write_to_vec()?)
    }
}

impl TryFrom<MessageBuilder> for SendableMessage {
    type Error = Error;

    fn try_from(mut builder: MessageBuilder) -> result::Result<Self, Self::Error> {
        if builder.from.len() > 1 {
            err!(
                ErrorKind::InvalidMessage,
                "A message can only have one sender, got {}",
                builder.from.len()
            );
        }

        let from = match builder.from.pop() {
            Some(from) => from,
            None => err!(ErrorKind::InvalidMessage, "Missing message sender"),
        };

        if builder.to.is_empty() {
            err!(ErrorKind::InvalidMessage, "Missing message recipient");
        }

        validate_addresses("From", std::slice::from_ref(&from))?;
        validate_addresses("To", &builder.to)?;
        validate_addresses("Reply-To", &builder.reply_to)?;

        let sendable = Self {
            from,
            to: builder.to,
            reply_to: builder.reply_to,
            subject: builder.subject.unwrap_or_default(),
            content: builder.content,
            attachments: builder.attachments,
        };

        Ok(sendable)
    }
}

#[cfg(feature = "smtp")]
use async_smtp::SendableEmail;

#[cfg(feature = "smtp")]
impl TryFrom<&SendableMessage> for SendableEmail {
    type Error = Error;

    fn try_from(message: &SendableMessage) -> result::Result<Self, Self::Error> {
        use async_smtp::{EmailAddress, Envelope};

        let (from, to) = message.envelope();

        let from: EmailAddress = match from.email().parse() {
            Ok(from) => from,
            Err(err) => err!(
                ErrorKind::InvalidMessage,
                "Invalid envelope sender '{}': {}",
                from.email(),
                err
            ),
        };

        let to = to
            .iter()
            .map(|to| match to.email().parse::<EmailAddress>() {
                Ok(address) => Ok(address),
                Err(err) => err!(
                    ErrorKind::InvalidMessage,
                    "Invalid envelope recipient '{}': {}",
                    to.email(),
                    err
                ),
            })
            .collect::<Result<Vec<_>>>()?;

        let envelope = match Envelope::new(Some(from), to) {
            Ok(envelope) => envelope,
            Err(err) => err!(
                ErrorKind::InvalidMessage,
                "Failed to create message envelope: {}",
                err
            ),
        };

        let email = SendableEmail::new(envelope, message.to_rfc822()?);

        Ok(email)
    }
}

#[cfg(test)]
mod test {
    use mailparse::MailHeaderMap;

    use super::*;

    fn address(email: &str, name: &str) -> ResolvedAddress {
        ResolvedAddress::new(email, name).unwrap()
    }

    fn base() -> MessageBuilder {
        MessageBuilder::new()
            .senders([address("user@example.com", "User")])
            .recipients([address("test@example.com", "Tester")])
            .subject("Test email")
    }

    #[test]
    fn test_to_mime() {
        let sendable: SendableMessage = base()
            .reply_to([address("reply@example.com", "")])
            .text("Hello world!")
            .html("<p>Hello world!</p>")
            .build()
            .unwrap();

        let raw = sendable.to_rfc822().unwrap();
        let parsed = mailparse::parse_mail(&raw).unwrap();

        assert_eq!(
            parsed.headers.get_first_value("Subject").as_deref(),
            Some("Test email")
        );
        assert!(parsed
            .headers
            .get_first_value("Reply-To")
            .unwrap()
            .contains("reply@example.com"));
        assert_eq!(parsed.ctype.mimetype, "multipart/alternative");
        assert_eq!(parsed.subparts.len(), 2);
    }

    #[test]
    fn attachments_are_included() {
        let sendable: SendableMessage = base()
            .text("See attached")
            .attachment(Attachment::new("notes.txt", "text/plain", b"some notes".to_vec()))
            .build()
            .unwrap();

        let raw = sendable.to_rfc822().unwrap();
        let parsed = mailparse::parse_mail(&raw).unwrap();

        assert_eq!(parsed.ctype.mimetype, "multipart/mixed");

        let attachment = parsed
            .subparts
            .iter()
            .find(|part| {
                part.get_content_disposition().disposition == mailparse::DispositionType::Attachment
            })
            .unwrap();

        assert_eq!(attachment.ctype.mimetype, "text/plain");

        assert_eq!(attachment.get_body().unwrap().trim(), "some notes");
    }

    #[test]
    fn requires_sender_and_recipient() {
        let missing_sender: Result<SendableMessage> = MessageBuilder::new()
            .recipients([address("test@example.com", "")])
            .build();

        assert!(matches!(
            missing_sender.unwrap_err().kind(),
            ErrorKind::InvalidMessage
        ));

        let missing_recipient: Result<SendableMessage> = MessageBuilder::new()
            .senders([address("user@example.com", "")])
            .build();

        assert!(missing_recipient.is_err());
    }

    #[test]
    fn rejects_invalid_addresses() {
        let invalid: Result<SendableMessage> = base()
            .recipients([address("not an address", "")])
            .build();

        assert!(invalid.unwrap_err().to_string().contains("not an address"));
    }

    #[test]
    fn rejects_multiple_senders() {
        let invalid: Result<SendableMessage> = base()
            .senders([address("other@example.com", "")])
            .build();

        assert!(matches!(
            invalid.unwrap_err().kind(),
            ErrorKind::InvalidMessage
        ));
    }

    #[cfg(feature = "smtp")]
    #[test]
    fn envelope_rejects_unusable_recipient() {
        let valid: SendableMessage = base().build().unwrap();

        let sendable = SendableMessage {
            to: vec![
                address("test@example.com", ""),
                address("jöhn@example.com", ""),
            ],
            ..valid
        };

        let error = SendableEmail::try_from(&sendable).err().unwrap();

        assert!(matches!(error.kind(), ErrorKind::InvalidMessage));
        assert!(error.to_string().contains("jöhn@example.com"));
    }

    #[test]
    fn envelope_skips_reply_to() {
        let sendable: SendableMessage = base()
            .reply_to([address("reply@example.com", "")])
            .build()
            .unwrap();

        let (from, to) = sendable.envelope();

        assert_eq!(from.email(), "user@example.com");
        assert_eq!(to.len(), 1);
        assert_eq!(to[0].email(), "test@example.com");
    }
}
