//! Utilities shared by notifier tests.

use actix::{Actor, Addr, System, dev::channel::channel};
use failure::{Error, Fail};
use futures::{IntoFuture, future};
use pwreset_mail::{Mailbox, Mailer, Message, Transport};
use pwreset_notifier::{Config, Notifier};
use std::sync::{Arc, Mutex};

pub const BASE_URL: &str = "https://app.example.com";

/// Transport remembering all messages it was asked to send.
#[derive(Clone, Default)]
pub struct Recorder {
    sent: Arc<Mutex<Vec<Message>>>,
}

impl Recorder {
    pub fn messages(&self) -> Vec<Message> {
        self.sent.lock().unwrap().clone()
    }
}

impl Transport for Recorder {
    fn send(&mut self, message: Message) -> Result<(), Error> {
        self.sent.lock().unwrap().push(message);
        Ok(())
    }
}

#[derive(Debug, Fail)]
#[fail(display = "connection refused by {}", host)]
pub struct ConnectionRefused {
    pub host: String,
}

/// Transport which fails to send any message.
pub struct Refusing;

impl Transport for Refusing {
    fn send(&mut self, _: Message) -> Result<(), Error> {
        Err(ConnectionRefused { host: "smtp.example.com".into() }.into())
    }
}

pub fn account() -> Mailbox {
    Mailbox::new("accounts@example.com".into())
}

/// Start a mailer using a given transport and create a notifier for it.
///
/// Must be called from within an actix system, see [`run`].
pub fn notifier<T: Transport + 'static>(transport: T) -> Notifier {
    let mailer: Addr<Mailer> = Mailer::new(Box::new(transport)).start();
    Notifier::new(Config::new(BASE_URL), &account(), mailer)
}

/// Create a notifier whose mailer has already stopped.
pub fn notifier_without_mailer() -> Notifier {
    let (tx, rx) = channel::<Mailer>(0);
    std::mem::drop(rx);
    Notifier::new(Config::new(BASE_URL), &account(), Addr::new(tx))
}

/// Run a future in a context of an Actix system.
pub fn run<F, I>(f: F) -> Result<I::Item, I::Error>
where
    F: FnOnce() -> I,
    I: IntoFuture,
{
    System::new("pwreset::test").block_on(future::lazy(f))
}
