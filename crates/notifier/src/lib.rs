//! Password reset notifications.
//!
//! Given an email address and a reset token issued elsewhere, [`Notifier`]
//! composes a message containing a link of the form
//! `<base-url>/changePassword/<token>` and dispatches it through a
//! [`pwreset_mail::Mailer`].

mod config;
mod error;
mod notifier;
mod request;
mod templates;

pub use self::{
    config::{Config, ConfigError},
    error::Error,
    notifier::{
        Notifier,
        SendFuture,
        SENDER_NAME,
        SUBJECT,
        format_message,
        parse_recipient,
    },
    request::{EXPIRES_IN_MINUTES, ResetRequest, reset_url},
};
