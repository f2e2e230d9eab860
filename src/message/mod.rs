mod attachment;
mod builder;
mod content;
mod sendable;

pub use attachment::Attachment;
pub use builder::MessageBuilder;
pub use content::Content;
pub use sendable::SendableMessage;
