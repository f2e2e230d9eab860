//! Sends form submissions as email.
//!
//! A [`MailDispatcher`] renders the configured sender, recipients, reply-to and subject
//! against the submitted fields, lists the fields in the message body, optionally attaches
//! uploaded files and hands the message to a [`transport::MailTransport`].

mod error;
mod parser;
mod runtime;
mod template;
mod utils;

pub mod config;
pub mod dispatcher;
pub mod message;
pub mod transport;
pub mod types;

pub use config::MailRouteConfig;
pub use dispatcher::{DispatcherConfig, MailDispatcher};
pub use error::{Error, ErrorKind, Result};
pub use parser::address::{parse_address, parse_addresses};
pub use template::{render_template, DefaultTemplateEngine, TemplateEngine};
pub use transport::TransportConfig;
pub use utils::{parse_separator_string, sanitize_header_string};
