use chrono::{DateTime, Duration, Utc};
use pwreset_mail::Mailbox;

/// How long a reset link remains valid, in minutes.
pub const EXPIRES_IN_MINUTES: i64 = 15;

/// Path segment under which the application accepts reset tokens.
const CHANGE_PASSWORD_PATH: &str = "/changePassword/";

/// A single request to reset a user's password.
///
/// Reset requests are not persisted; they only exist while a reset email is
/// being composed. Issuing and validating tokens is not a concern of this
/// crate.
#[derive(Clone, Debug)]
pub struct ResetRequest {
    /// Who the email is sent to.
    pub recipient: Mailbox,
    /// The reset token, as issued.
    pub token: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl ResetRequest {
    pub fn new<S>(recipient: Mailbox, token: S, issued_at: DateTime<Utc>)
    -> ResetRequest
    where
        S: Into<String>,
    {
        ResetRequest {
            recipient,
            token: token.into(),
            issued_at,
            expires_at: issued_at + Duration::minutes(EXPIRES_IN_MINUTES),
        }
    }

    /// How long the reset link remains usable.
    pub fn valid_for(&self) -> Duration {
        self.expires_at - self.issued_at
    }

    /// Reset URL for this request.
    pub fn url(&self, base_url: &str) -> String {
        reset_url(base_url, &self.token)
    }
}

/// Construct reset URL for a token.
///
/// The URL is `base_url` followed by `/changePassword/` and the token. Neither
/// part is normalised nor escaped.
pub fn reset_url(base_url: &str, token: &str) -> String {
    let mut url = String::with_capacity(
        base_url.len() + CHANGE_PASSWORD_PATH.len() + token.len());
    url.push_str(base_url);
    url.push_str(CHANGE_PASSWORD_PATH);
    url.push_str(token);
    url
}
