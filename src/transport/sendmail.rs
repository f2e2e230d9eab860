use std::process::Stdio;

use async_trait::async_trait;

use crate::{
    error::{err, Error, ErrorKind, Result},
    message::SendableMessage,
    runtime::{
        io::WriteExt,
        process::{Child, Command},
    },
};

use super::MailTransport;

/// Hands messages to a local sendmail compatible binary.
///
/// When the command contains `-bs` the binary is driven as an smtp server over its
/// stdin and stdout, otherwise the raw message is piped into it.
#[derive(Debug)]
pub struct SendmailTransport {
    program: String,
    args: Vec<String>,
}

impl SendmailTransport {
    pub fn new(cmd: &str) -> Result<Self> {
        let mut parts = cmd.split_whitespace().map(String::from);

        let program = match parts.next() {
            Some(program) => program,
            None => err!(ErrorKind::InvalidConfig, "Sendmail command is empty"),
        };

        Ok(Self {
            program,
            args: parts.collect(),
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Whether the binary is started in smtp mode.
    pub fn speaks_smtp(&self) -> bool {
        self.args.iter().any(|arg| arg == "-bs")
    }

    fn spawn(&self, stdout: Stdio) -> Result<Child> {
        let child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(stdout)
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        Ok(child)
    }

    async fn pipe(&self, message: &SendableMessage) -> Result<()> {
        let raw = message.to_rfc822()?;

        let mut child = self.spawn(Stdio::null())?;

        let mut stdin = match child.stdin.take() {
            Some(stdin) => stdin,
            None => err!(ErrorKind::Sendmail, "Could not open sendmail stdin"),
        };

        stdin.write_all(&raw).await?;
        stdin.shutdown().await?;
        drop(stdin);

        let output = child.wait_with_output().await?;

        if !output.status.success() {
            err!(
                ErrorKind::Sendmail,
                "{} exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        Ok(())
    }

    #[cfg(feature = "smtp")]
    async fn converse(&self, message: &SendableMessage) -> Result<()> {
        use crate::runtime::io::{join, BufStream};

        let mut child = self.spawn(Stdio::piped())?;

        let (stdin, stdout) = match (child.stdin.take(), child.stdout.take()) {
            (Some(stdin), Some(stdout)) => (stdin, stdout),
            _ => err!(ErrorKind::Sendmail, "Could not open sendmail stdio"),
        };

        let stream = BufStream::new(join(stdout, stdin));

        let client = async_smtp::SmtpClient::new();

        let transport = async_smtp::SmtpTransport::new(client, stream).await?;

        super::smtp::send(transport, message).await?;

        let status = child.wait().await?;

        if !status.success() {
            err!(ErrorKind::Sendmail, "{} exited with {}", self.program, status);
        }

        Ok(())
    }

    #[cfg(not(feature = "smtp"))]
    async fn converse(&self, _message: &SendableMessage) -> Result<()> {
        Err(Error::new(
            ErrorKind::Unsupported,
            "Sendmail in smtp mode (-bs) requires smtp support",
        ))
    }
}

#[async_trait]
impl MailTransport for SendmailTransport {
    async fn send_message(&self, message: SendableMessage) -> Result<()> {
        log::debug!(
            "Sending message to {} recipient(s) via {}",
            message.to().len(),
            self.program
        );

        let result = if self.speaks_smtp() {
            self.converse(&message).await
        } else {
            self.pipe(&message).await
        };

        result.map_err(|error: Error| {
            log::debug!("Sendmail delivery failed: {}", error);

            error
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use crate::{message::MessageBuilder, types::ResolvedAddress};

    fn message() -> SendableMessage {
        MessageBuilder::new()
            .senders(ResolvedAddress::new("user@example.com", ""))
            .recipients(ResolvedAddress::new("test@example.com", ""))
            .subject("Test")
            .text("Hello")
            .build()
            .unwrap()
    }

    #[test]
    fn splits_command_line() {
        let transport = SendmailTransport::new("/usr/sbin/sendmail  -bs").unwrap();

        assert_eq!(transport.program(), "/usr/sbin/sendmail");
        assert_eq!(transport.args(), &[String::from("-bs")]);
        assert!(transport.speaks_smtp());

        let piped = SendmailTransport::new("/usr/sbin/sendmail -t -i").unwrap();

        assert!(!piped.speaks_smtp());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn pipes_message_into_command() {
        let transport = SendmailTransport::new("cat").unwrap();

        transport.send_message(message()).await.unwrap();
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn reports_failing_command() {
        let transport = SendmailTransport::new("false").unwrap();

        let error = transport.send_message(message()).await.unwrap_err();

        assert!(matches!(error.kind(), ErrorKind::Sendmail | ErrorKind::Io(_)));
    }

    // Answers like `sendmail -bs` and logs the envelope and message it receives.
    #[cfg(all(unix, feature = "smtp"))]
    const FAKE_SMTP_SERVER: &str = r#"
log="$1"
mode="$2"
printf '220 localhost ESMTP\r\n'
while IFS= read -r line; do
    line=$(printf '%s' "$line" | tr -d '\r')
    case "$line" in
        EHLO*|HELO*) printf '250 localhost\r\n' ;;
        RCPT*)
            echo "$line" >> "$log"
            if [ "$mode" = "reject" ]; then
                printf '550 No such user\r\n'
            else
                printf '250 OK\r\n'
            fi ;;
        MAIL*) echo "$line" >> "$log"; printf '250 OK\r\n' ;;
        DATA)
            printf '354 Go ahead\r\n'
            while IFS= read -r data; do
                data=$(printf '%s' "$data" | tr -d '\r')
                [ "$data" = "." ] && break
                echo "$data" >> "$log"
            done
            printf '250 Queued\r\n' ;;
        QUIT) printf '221 Bye\r\n'; exit 0 ;;
        *) printf '500 Unknown command\r\n' ;;
    esac
done
"#;

    #[cfg(all(unix, feature = "smtp"))]
    fn fake_smtp_server(name: &str, mode: &str) -> (SendmailTransport, std::path::PathBuf) {
        let dir = std::env::temp_dir();

        let script = dir.join(format!("relay-mail-{}-{}.sh", name, std::process::id()));
        let log = dir.join(format!("relay-mail-{}-{}.log", name, std::process::id()));

        std::fs::write(&script, FAKE_SMTP_SERVER).unwrap();
        let _ = std::fs::remove_file(&log);

        let cmd = format!("sh {} {} {} -bs", script.display(), log.display(), mode);

        let transport = SendmailTransport::new(&cmd).unwrap();

        assert!(transport.speaks_smtp());

        (transport, log)
    }

    #[cfg(all(unix, feature = "smtp"))]
    #[tokio::test]
    async fn talks_smtp_over_stdio() {
        let (transport, log) = fake_smtp_server("smtp-accept", "accept");

        transport.send_message(message()).await.unwrap();

        let received = std::fs::read_to_string(&log).unwrap();

        assert!(received.contains("MAIL FROM:<user@example.com>"));
        assert!(received.contains("RCPT TO:<test@example.com>"));
        assert!(received.contains("Subject: Test"));
        assert!(received.contains("Hello"));
    }

    #[cfg(all(unix, feature = "smtp"))]
    #[tokio::test]
    async fn reports_rejected_recipient() {
        let (transport, log) = fake_smtp_server("smtp-reject", "reject");

        let error = transport.send_message(message()).await.unwrap_err();

        assert!(matches!(error.kind(), ErrorKind::Smtp(_)));

        let received = std::fs::read_to_string(&log).unwrap();

        assert!(received.contains("RCPT TO:<test@example.com>"));
        assert!(!received.contains("Subject: Test"));
    }

    #[tokio::test]
    async fn reports_missing_binary() {
        let transport = SendmailTransport::new("/nonexistent/sendmail -t").unwrap();

        let error = transport.send_message(message()).await.unwrap_err();

        assert!(matches!(error.kind(), ErrorKind::Io(_)));
    }
}
