use std::io;

use async_trait::async_trait;

use crate::{
    error::Result,
    message::SendableMessage,
    runtime::sync::Mutex,
};

use super::MailTransport;

/// Keeps sent messages in memory instead of delivering them.
///
/// Meant for tests of code that dispatches mail, enabled with the `stub` feature.
#[derive(Debug, Default)]
pub struct StubTransport {
    sent: Mutex<Vec<SendableMessage>>,
    failing: bool,
}

impl StubTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// A transport that rejects every message.
    pub fn failing() -> Self {
        Self {
            sent: Mutex::default(),
            failing: true,
        }
    }

    pub async fn messages(&self) -> Vec<SendableMessage> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl MailTransport for StubTransport {
    async fn send_message(&self, message: SendableMessage) -> Result<()> {
        if self.failing {
            return Err(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                "Stub transport does not accept messages",
            )
            .into());
        }

        // Render once so that messages which cannot be serialized fail here as well.
        message.to_rfc822()?;

        self.sent.lock().await.push(message);

        Ok(())
    }
}
