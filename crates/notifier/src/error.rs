use actix::MailboxError;
use failure::Fail;
use pwreset_mail::SendError;

/// An error that occurred while sending a password reset email.
#[derive(Debug, Fail)]
pub enum Error {
    /// Mail transport rejected the message.
    ///
    /// The transport's error is kept unchanged, and can be recovered with
    /// [`failure::Error::downcast_ref`].
    #[fail(display = "Could not send reset email: {}", _0)]
    Transport(failure::Error),
    /// Mailer could not be reached.
    #[fail(display = "Mailer is unavailable: {}", _0)]
    Mailbox(#[cause] MailboxError),
    /// Recipient is not a valid email address.
    #[fail(display = "Invalid recipient address: {:?}", _0)]
    InvalidRecipient(String),
    /// Error rendering template.
    #[fail(display = "Could not render template: {}", _0)]
    Template(String),
}

impl From<SendError> for Error {
    fn from(e: SendError) -> Self {
        match e {
            SendError::Mailbox(e) => Error::Mailbox(e),
            SendError::Transport(e) => Error::Transport(e),
        }
    }
}
