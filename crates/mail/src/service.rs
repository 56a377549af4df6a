use actix::{Actor, Addr, Context, Handler, MailboxError};
use failure::{Error, Fail};
use futures::Future;
use log::error;

use super::{
    config::Config,
    transport::{self, Message, Transport},
};

/// Actor owning a mail transport and sending messages through it.
///
/// Messages are handled one at a time, in the order they were received.
pub struct Mailer {
    transport: Box<dyn Transport>,
}

impl Mailer {
    pub fn new(transport: Box<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Create a mailer using transport described by a configuration.
    pub fn from_config(config: &Config) -> Result<Self, Error> {
        transport::from_config(config).map(Mailer::new)
    }

    /// Send an email message.
    ///
    /// The returned future resolves once the transport has accepted the
    /// message. Errors reported by the transport are returned as they are,
    /// in [`SendError::Transport`].
    pub fn send(addr: &Addr<Mailer>, message: Message) -> SendFuture {
        Box::new(addr.send(message)
            .map_err(SendError::Mailbox)
            .and_then(|result| result.map_err(SendError::Transport)))
    }
}

pub type SendFuture = Box<dyn Future<Item = (), Error = SendError>>;

#[derive(Debug, Fail)]
pub enum SendError {
    /// The mailer actor could not be reached.
    #[fail(display = "Mailer is unavailable: {}", _0)]
    Mailbox(#[cause] MailboxError),
    /// Transport rejected the message.
    #[fail(display = "{}", _0)]
    Transport(Error),
}

impl Actor for Mailer {
    type Context = Context<Self>;
}

impl actix::Message for Message {
    type Result = Result<(), Error>;
}

impl Handler<Message> for Mailer {
    type Result = Result<(), Error>;

    fn handle(&mut self, msg: Message, _: &mut Self::Context) -> Self::Result {
        self.transport.send(msg).map_err(|err| {
            error!("Could not send email: {}", err);
            err
        })
    }
}
