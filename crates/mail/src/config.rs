use failure::Fail;
use lettre_email::Mailbox;
use serde::{Deserialize, Deserializer, de};
use std::{env, fmt, fs};

/// Mail system configuration.
#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    /// Email address to send messages as.
    #[serde(deserialize_with = "de_mailbox")]
    pub sender: Mailbox,
    /// Transport method to use, and its configuration.
    #[serde(flatten)]
    pub transport: Transports,
}

impl Config {
    /// Validate configuration correctness.
    ///
    /// This constructs the configured transport once, so that errors such as
    /// an unresolvable SMTP host are reported at start up instead of when the
    /// first message is sent.
    pub fn validate(&self) -> Result<(), failure::Error> {
        if let Transports::Smtp(ref smtp) = self.transport {
            smtp.credentials()?;
        }
        super::transport::from_config(self)?;
        Ok(())
    }
}

/// Mail transport configuration.
#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "transport", rename_all = "lowercase")]
pub enum Transports {
    /// Log messages instead of sending them.
    Log,
    /// Use the `sendmail(1)` command.
    Sendmail,
    /// Use SMTP
    Smtp(SmtpConfig),
}

/// SMTP configuration.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SmtpConfig {
    /// The host name to connect to.
    pub host: String,
    #[serde(default)]
    /// The port to connect to.
    pub port: Option<u16>,
    /// Should we force TLS?
    #[serde(default)]
    pub use_tls: UseTls,
    /// User name to authenticate as.
    #[serde(default)]
    pub username: Option<Credential>,
    /// Password to authenticate with.
    #[serde(default)]
    pub password: Option<Credential>,
}

impl SmtpConfig {
    /// Port to connect to, either configured or the default for selected
    /// TLS mode.
    pub fn port(&self) -> u16 {
        self.port.unwrap_or(match self.use_tls {
            UseTls::Wrapper => 465,
            _ => 587,
        })
    }

    /// User name and password to authenticate with, if configured.
    ///
    /// Either both or neither must be set.
    pub fn credentials(&self)
    -> Result<Option<(&Credential, &Credential)>, IncompleteCredentials> {
        match (&self.username, &self.password) {
            (Some(username), Some(password)) => Ok(Some((username, password))),
            (None, None) => Ok(None),
            (Some(_), None) => Err(IncompleteCredentials("password")),
            (None, Some(_)) => Err(IncompleteCredentials("username")),
        }
    }
}

#[derive(Debug, Fail)]
#[fail(display = "SMTP credentials are incomplete: {} is missing", _0)]
pub struct IncompleteCredentials(&'static str);

fn de_mailbox<'de, D>(d: D) -> std::result::Result<Mailbox, D::Error>
where
    D: Deserializer<'de>,
{
    d.deserialize_str(MailboxVisitor)
}

struct MailboxVisitor;

impl<'de> de::Visitor<'de> for MailboxVisitor {
    type Value = Mailbox;

    fn expecting(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(fmt, "an email address")
    }

    fn visit_str<E>(self, v: &str) -> std::result::Result<Mailbox, E>
    where
        E: de::Error,
    {
        v.parse()
            .map_err(|_| E::invalid_value(
                de::Unexpected::Str(v), &"an email address"))
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum UseTls {
    /// Do not use TLS.
    No,
    /// Try to use TLS and fall back to unencrypted if TLS is not supported.
    Yes,
    /// Always use TLS (`STARTTLS`).
    Strict,
    /// Connect over TLS from the start (SMTPS).
    Wrapper,
}

impl Default for UseTls {
    fn default() -> Self {
        UseTls::Yes
    }
}

impl<'de> Deserialize<'de> for UseTls {
    fn deserialize<D: Deserializer<'de>>(de: D) -> Result<Self, D::Error> {
        de.deserialize_any(UseTlsVisitor)
    }
}

struct UseTlsVisitor;

impl<'de> de::Visitor<'de> for UseTlsVisitor {
    type Value = UseTls;

    fn expecting(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "true, false, strict, or wrapper")
    }

    fn visit_bool<E>(self, v: bool) -> Result<UseTls, E> {
        Ok(if v { UseTls::Yes } else { UseTls::No })
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<UseTls, E> {
        match v {
            "strict" | "always" => Ok(UseTls::Strict),
            "wrapper" | "smtps" => Ok(UseTls::Wrapper),
            _ => Err(E::invalid_value(
                de::Unexpected::Str(v), &"true, false, strict, or wrapper")),
        }
    }
}

/// A credential (user name or password) for a mail server.
///
/// In configuration a credential is a plain string, or one of
///
/// - `env:NAME`, to read it from environment variable `NAME`;
/// - `file:PATH`, to read it from a file (trailing newlines are stripped).
#[derive(Clone, Eq, PartialEq)]
pub struct Credential(String);

impl Credential {
    pub fn new<S: Into<String>>(value: S) -> Self {
        Credential(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

impl<'de> Deserialize<'de> for Credential {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        d.deserialize_str(CredentialVisitor)
    }
}

struct CredentialVisitor;

impl<'de> de::Visitor<'de> for CredentialVisitor {
    type Value = Credential;

    fn expecting(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "a string, an environment variable, or a file")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Credential, E> {
        if v.starts_with("env:") {
            let name = v.trim_start_matches("env:");
            env::var(name)
                .map(Credential)
                .map_err(|err| E::custom(format_args!(
                    "cannot read environment variable {}: {}", name, err)))
        } else if v.starts_with("file:") {
            let path = v.trim_start_matches("file:");
            fs::read_to_string(path)
                .map(|value| Credential(value.trim_end_matches(&['\r', '\n'][..]).to_string()))
                .map_err(|err| E::custom(format_args!(
                    "cannot read {}: {}", path, err)))
        } else {
            Ok(Credential(v.to_string()))
        }
    }
}
