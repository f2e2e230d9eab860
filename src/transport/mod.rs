use std::sync::Arc;

use async_trait::async_trait;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{error::Result, message::SendableMessage};

mod connection;
mod sendmail;
#[cfg(feature = "smtp")]
mod smtp;
#[cfg(any(test, feature = "stub"))]
mod stub;

pub use connection::ConnectionSecurity;
pub use sendmail::SendmailTransport;
#[cfg(feature = "smtp")]
pub use smtp::SmtpTransport;
#[cfg(any(test, feature = "stub"))]
pub use stub::StubTransport;

pub const DEFAULT_SENDMAIL_COMMAND: &str = "/usr/sbin/sendmail -bs";

/// Delivers a finished message.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send_message(&self, message: SendableMessage) -> Result<()>;
}

#[async_trait]
impl<T: MailTransport + ?Sized> MailTransport for Arc<T> {
    async fn send_message(&self, message: SendableMessage) -> Result<()> {
        (**self).send_message(message).await
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SmtpConfig {
    pub domain: String,
    pub port: u16,
    #[cfg_attr(feature = "serde", serde(default))]
    pub username: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub password: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub security: ConnectionSecurity,
}

impl SmtpConfig {
    pub fn new<D: Into<String>>(domain: D, port: u16, security: ConnectionSecurity) -> Self {
        Self {
            domain: domain.into(),
            port,
            username: None,
            password: None,
            security,
        }
    }

    pub fn with_credentials<U: Into<String>, P: Into<String>>(
        mut self,
        username: U,
        password: P,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());

        self
    }
}

/// Which transport delivers the messages, `{"type": "smtp", "config": {...}}` in JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "type", content = "config", rename_all = "lowercase")
)]
pub enum TransportConfig {
    Sendmail { cmd: String },
    Smtp(SmtpConfig),
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self::Sendmail {
            cmd: DEFAULT_SENDMAIL_COMMAND.to_string(),
        }
    }
}

pub fn create(config: TransportConfig) -> Result<Box<dyn MailTransport>> {
    match config {
        TransportConfig::Sendmail { cmd } => {
            log::debug!("Using sendmail transport '{}'", cmd);

            Ok(Box::new(SendmailTransport::new(&cmd)?))
        }
        #[cfg(feature = "smtp")]
        TransportConfig::Smtp(config) => {
            log::debug!(
                "Using smtp transport {}:{} ({:?})",
                config.domain,
                config.port,
                config.security
            );

            Ok(Box::new(SmtpTransport::new(config)))
        }
        #[cfg(not(feature = "smtp"))]
        TransportConfig::Smtp(_) => {
            use crate::error::{err, ErrorKind};

            err!(
                ErrorKind::Unsupported,
                "Smtp support is not enabled in this build"
            );
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use crate::error::ErrorKind;

    #[test]
    fn default_is_sendmail() {
        assert_eq!(
            TransportConfig::default(),
            TransportConfig::Sendmail {
                cmd: String::from("/usr/sbin/sendmail -bs")
            }
        );
    }

    #[test]
    fn rejects_empty_sendmail_command() {
        let error = create(TransportConfig::Sendmail {
            cmd: String::from("  "),
        })
        .err()
        .unwrap();

        assert!(matches!(error.kind(), ErrorKind::InvalidConfig));
    }

    #[cfg(feature = "json")]
    #[test]
    fn deserializes_transport_config() {
        let sendmail: TransportConfig =
            serde_json::from_str(r#"{"type": "sendmail", "config": {"cmd": "/usr/bin/msmtp -t"}}"#)
                .unwrap();

        assert_eq!(
            sendmail,
            TransportConfig::Sendmail {
                cmd: String::from("/usr/bin/msmtp -t")
            }
        );

        let smtp: TransportConfig = serde_json::from_str(
            r#"{"type": "smtp", "config": {"domain": "mail.example.com", "port": 465, "username": "user", "password": "secret", "security": "tls"}}"#,
        )
        .unwrap();

        assert_eq!(
            smtp,
            TransportConfig::Smtp(
                SmtpConfig::new("mail.example.com", 465, ConnectionSecurity::Tls)
                    .with_credentials("user", "secret")
            )
        );
    }
}
