use async_native_tls::{TlsConnector, TlsStream};
use async_smtp::{authentication::Mechanism, SendableEmail};
use async_trait::async_trait;

use crate::{
    error::Result,
    message::SendableMessage,
    runtime::{
        io::{BufRead, BufStream, Write},
        net::TcpStream,
    },
};

use super::{ConnectionSecurity, MailTransport, SmtpConfig};

pub struct SmtpTransport {
    config: SmtpConfig,
}

impl SmtpTransport {
    pub fn new(config: SmtpConfig) -> Self {
        Self { config }
    }
}

async fn connect<S: AsRef<str>>(
    server: S,
    port: u16,
) -> Result<async_smtp::SmtpTransport<BufStream<TlsStream<TcpStream>>>> {
    let tls = TlsConnector::new();

    let tcp_stream = TcpStream::connect((server.as_ref(), port)).await?;

    let tls_stream = tls.connect(server.as_ref(), tcp_stream).await?;

    let buf_stream = BufStream::new(tls_stream);

    let client = async_smtp::SmtpClient::new();

    let transport = async_smtp::SmtpTransport::new(client, buf_stream).await?;

    Ok(transport)
}

async fn connect_plain<S: AsRef<str>>(
    server: S,
    port: u16,
) -> Result<async_smtp::SmtpTransport<BufStream<TcpStream>>> {
    let stream = TcpStream::connect((server.as_ref(), port)).await?;

    let buf_stream = BufStream::new(stream);

    let client = async_smtp::SmtpClient::new();

    let transport = async_smtp::SmtpTransport::new(client, buf_stream).await?;

    Ok(transport)
}

/// Send a message over an established smtp session and close it.
pub(crate) async fn send<S: BufRead + Write + Unpin>(
    mut transport: async_smtp::SmtpTransport<S>,
    message: &SendableMessage,
) -> Result<()> {
    transport.send(SendableEmail::try_from(message)?).await?;

    transport.quit().await?;

    Ok(())
}

const PASSWORD_MECHANISMS: [Mechanism; 2] = [Mechanism::Plain, Mechanism::Login];

async fn login<S: BufRead + Write + Unpin>(
    transport: &mut async_smtp::SmtpTransport<S>,
    config: &SmtpConfig,
) -> Result<()> {
    match (&config.username, &config.password) {
        (Some(username), Some(password)) => {
            let smtp_credentials =
                async_smtp::authentication::Credentials::new(username.clone(), password.clone());

            transport
                .try_login(&smtp_credentials, &PASSWORD_MECHANISMS)
                .await?;
        }
        (None, None) => {}
        _ => {
            log::warn!(
                "Smtp credentials for {} are incomplete, sending without logging in",
                config.domain
            );
        }
    }

    Ok(())
}

#[async_trait]
impl MailTransport for SmtpTransport {
    async fn send_message(&self, message: SendableMessage) -> Result<()> {
        log::debug!(
            "Sending message to {} recipient(s) via {}:{}",
            message.to().len(),
            self.config.domain,
            self.config.port
        );

        match self.config.security {
            ConnectionSecurity::Tls => {
                let mut transport = connect(&self.config.domain, self.config.port).await?;

                login(&mut transport, &self.config).await?;

                send(transport, &message).await
            }
            ConnectionSecurity::Plain => {
                let mut transport = connect_plain(&self.config.domain, self.config.port).await?;

                login(&mut transport, &self.config).await?;

                send(transport, &message).await
            }
        }
    }
}
