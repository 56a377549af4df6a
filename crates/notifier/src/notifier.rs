use actix::Addr;
use chrono::Utc;
use futures::{Future, future};
use log::{debug, warn};
use pwreset_mail::{Mailbox, Mailer, Message};

use crate::{
    config::Config,
    error::Error,
    request::ResetRequest,
    templates::{self, ResetMailArgs},
};

/// Display name used in the `From:` header of every reset email.
pub const SENDER_NAME: &str = "Password Reset";

/// Subject of every reset email.
pub const SUBJECT: &str = "Reset your password";

pub type SendFuture = Box<dyn Future<Item = (), Error = Error>>;

/// Sends password reset emails.
///
/// A notifier holds no state other than its configuration and address of
/// a [`Mailer`]; it can be cloned and used from many places at once.
#[derive(Clone)]
pub struct Notifier {
    config: Config,
    sender: Mailbox,
    mailer: Addr<Mailer>,
}

impl Notifier {
    /// Create a new notifier.
    ///
    /// `account` is the mail account to send as. Its display name, if any, is
    /// replaced with [`SENDER_NAME`].
    pub fn new(config: Config, account: &Mailbox, mailer: Addr<Mailer>)
    -> Notifier {
        Notifier {
            config,
            sender: Mailbox::new_with_name(
                SENDER_NAME.to_string(), account.address.clone()),
            mailer,
        }
    }

    /// Send an email with a password reset link for `token` to `email`.
    ///
    /// The returned future resolves once the mail transport accepts the
    /// message. Delivery to the recipient is not guaranteed. Transport errors
    /// are not retried.
    pub fn send_reset_email(&self, email: &str, token: &str) -> SendFuture {
        let recipient = match parse_recipient(email) {
            Ok(recipient) => recipient,
            Err(err) => return Box::new(future::err(err)),
        };

        let request = ResetRequest::new(recipient, token, Utc::now());
        let message = match format_message(&self.config, &self.sender, &request) {
            Ok(message) => message,
            Err(err) => return Box::new(future::err(err)),
        };

        debug!("Sending password reset email to {}", message.to);

        Box::new(Mailer::send(&self.mailer, message).map_err(|err| {
            warn!("Could not send password reset email: {}", err);
            Error::from(err)
        }))
    }
}

/// Parse recipient's address.
///
/// The whole of `email` must be a single bare address. Lettre's parser stops
/// at the first address it finds and ignores whatever follows it, so the
/// parsed address is compared against the input.
pub fn parse_recipient(email: &str) -> Result<Mailbox, Error> {
    let invalid = || Error::InvalidRecipient(email.to_string());

    if email.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(invalid());
    }

    match email.parse::<Mailbox>() {
        Ok(ref mailbox) if mailbox.name.is_none() && mailbox.address == email =>
            Ok(Mailbox::new(email.to_string())),
        _ => Err(invalid()),
    }
}

/// Compose a password reset email.
///
/// The message depends only on its arguments.
pub fn format_message(config: &Config, sender: &Mailbox, request: &ResetRequest)
-> Result<Message, Error> {
    let url = request.url(&config.base_url);
    let expires_at = request.expires_at.format("%Y-%m-%d %H:%M UTC").to_string();
    let args = ResetMailArgs {
        email: &request.recipient.address,
        url: &url,
        expires_in: request.valid_for().num_minutes(),
        expires_at: &expires_at,
    };

    Ok(Message {
        from: sender.clone(),
        to: request.recipient.clone(),
        subject: SUBJECT.to_string(),
        html: templates::render("reset.html", &args).map_err(Error::Template)?,
        text: templates::render("reset.txt", &args).map_err(Error::Template)?,
    })
}
