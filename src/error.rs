use std::{error, fmt, result};

#[cfg(feature = "smtp")]
use async_smtp::error::Error as SmtpError;

#[cfg(feature = "smtp")]
use async_native_tls::Error as TlsError;

#[derive(Debug)]
pub enum ErrorKind {
    /// The message could not be built, e.g. it has no recipients or contains an invalid address.
    InvalidMessage,
    /// The transport or route configuration is unusable.
    InvalidConfig,
    /// The requested feature is not compiled into this build.
    Unsupported,
    Io(std::io::Error),
    #[cfg(feature = "smtp")]
    /// An error from the smtp server.
    Smtp(SmtpError),
    #[cfg(feature = "smtp")]
    Tls(TlsError),
    /// The sendmail binary exited unsuccessfully.
    Sendmail,
    /// Failed to (de)serialize the given data to or from JSON.
    SerializeJSON,
    /// Sending a form submission failed, the cause is attached.
    DispatchFailed(Box<Error>),
}

#[derive(Debug)]
pub struct Error {
    message: String,
    kind: ErrorKind,
}

impl Error {
    pub fn new<S: Into<String>>(kind: ErrorKind, msg: S) -> Self {
        Self {
            message: msg.into(),
            kind,
        }
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub(crate) fn dispatch_failed(cause: Error) -> Self {
        let message = format!("Failed to dispatch form submission: {}", cause);

        Self::new(ErrorKind::DispatchFailed(Box::new(cause)), message)
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self.kind() {
            ErrorKind::Io(e) => Some(e),
            #[cfg(feature = "smtp")]
            ErrorKind::Smtp(e) => Some(e),
            #[cfg(feature = "smtp")]
            ErrorKind::Tls(e) => Some(e),
            ErrorKind::DispatchFailed(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

#[cfg(feature = "smtp")]
impl From<SmtpError> for Error {
    fn from(smtp_error: SmtpError) -> Self {
        let message = format!("Error from smtp server: {}", smtp_error);

        Self::new(ErrorKind::Smtp(smtp_error), message)
    }
}

#[cfg(feature = "smtp")]
impl From<TlsError> for Error {
    fn from(native_tls_error: TlsError) -> Self {
        Error::new(
            ErrorKind::Tls(native_tls_error),
            "Error creating a secure connection",
        )
    }
}

impl From<std::io::Error> for Error {
    fn from(io_error: std::io::Error) -> Self {
        let message = format!("Error with io: {}", io_error);

        Error::new(ErrorKind::Io(io_error), message)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

macro_rules! err {
    ($kind:expr, $($arg:tt)*) => {{
        use crate::error::Error;

        let kind = $kind;
        let message = format!($($arg)*);
        return Err(Error::new( kind, message ));
    }};
}

pub(crate) use err;

pub type Result<T> = result::Result<T, Error>;

#[cfg(test)]
mod test {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn dispatch_failure_keeps_cause() {
        let cause = Error::new(ErrorKind::InvalidMessage, "Missing message sender");

        let error = Error::dispatch_failed(cause);

        assert!(matches!(error.kind(), ErrorKind::DispatchFailed(_)));
        assert_eq!(
            error.to_string(),
            "Failed to dispatch form submission: Missing message sender"
        );
        assert_eq!(
            error.source().map(|source| source.to_string()),
            Some(String::from("Missing message sender"))
        );
    }
}
