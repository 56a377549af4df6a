mod config;
mod service;
mod transport;

pub use self::{
    config::{
        Config,
        Credential,
        IncompleteCredentials,
        SmtpConfig,
        Transports,
        UseTls,
    },
    service::{Mailer, SendError, SendFuture},
    transport::{Message, Transport},
};

pub use lettre_email::Mailbox;
