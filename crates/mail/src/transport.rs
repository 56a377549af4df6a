use failure::Error;
use lettre::{
    ClientSecurity,
    ClientTlsParameters,
    SendmailTransport,
    SmtpClient,
    smtp::authentication::Credentials,
};
use lettre_email::{EmailBuilder, Mailbox};
use log::debug;
use native_tls::TlsConnector;

use super::config::{Config, SmtpConfig, Transports, UseTls};

/// Construct transport described by a configuration.
pub fn from_config(config: &Config) -> Result<Box<dyn Transport>, Error> {
    Ok(match config.transport {
        Transports::Log => Box::new(Logger),
        Transports::Sendmail => Box::new(Lettre::new(SendmailTransport::new())),
        Transports::Smtp(ref smtp) => Box::new(Lettre::new(smtp_client(smtp)?
            .transport())),
    })
}

fn smtp_client(config: &SmtpConfig) -> Result<SmtpClient, Error> {
    let address = (config.host.as_str(), config.port());

    let security = match config.use_tls {
        UseTls::No => ClientSecurity::None,
        UseTls::Yes => ClientSecurity::Opportunistic(tls_parameters(config)?),
        UseTls::Strict => ClientSecurity::Required(tls_parameters(config)?),
        UseTls::Wrapper => ClientSecurity::Wrapper(tls_parameters(config)?),
    };

    let client = SmtpClient::new(address, security)?;

    Ok(match config.credentials()? {
        Some((username, password)) => client.credentials(Credentials::new(
            username.as_str().to_string(),
            password.as_str().to_string(),
        )),
        None => client,
    })
}

fn tls_parameters(config: &SmtpConfig) -> Result<ClientTlsParameters, Error> {
    let connector = TlsConnector::new()?;
    Ok(ClientTlsParameters::new(config.host.clone(), connector))
}

/// A single email message, ready to be sent.
#[derive(Clone, Debug)]
pub struct Message {
    pub from: Mailbox,
    pub to: Mailbox,
    pub subject: String,
    pub text: String,
    pub html: String,
}

/// An object-safe version of [`lettre::Transport`].
pub trait Transport {
    fn send(&mut self, message: Message) -> Result<(), Error>;
}

impl Message {
    pub fn into_lettre(self) -> EmailBuilder {
        EmailBuilder::new()
            .from(self.from)
            .to(self.to)
            .subject(self.subject)
            .alternative(self.html, self.text)
    }
}

/// Mail transport which does nothing except logging sent messages.
struct Logger;

impl Transport for Logger {
    fn send(&mut self, message: Message) -> Result<(), Error> {
        debug!("Message:\nFrom: {}\nTo: {}\nSubject: {}\n\n{}",
            message.from, message.to, message.subject, message.text);
        Ok(())
    }
}

/// Type implementing [`Transport`] for a wrapped [`lettre::Transport`].
struct Lettre<T> {
    transport: T,
}

impl<T> Lettre<T> {
    fn new(inner: T) -> Self {
        Self {
            transport: inner,
        }
    }
}

impl<T, R, E> Transport for Lettre<T>
where
    T: for<'a> lettre::Transport<'a, Result = Result<R, E>>,
    Error: From<E>,
{
    fn send(&mut self, message: Message) -> Result<(), Error> {
        let mail = message.into_lettre()
            .build()?
            .into();

        self.transport.send(mail)?;
        Ok(())
    }
}
