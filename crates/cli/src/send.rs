//! Command for sending password reset emails.

use actix::Actor;
use failure::Error;
use futures::Future;
use log::info;
use pwreset_mail::Mailer;
use pwreset_notifier::Notifier;
use structopt::StructOpt;

use crate::{Config, Result, token};

#[derive(StructOpt)]
pub struct Opts {
    /// Recipient's email address
    email: String,
    /// Reset token to send. A new one is generated if not specified
    #[structopt(long = "token", short = "t")]
    token: Option<String>,
}

pub fn main(cfg: &Config, opts: Opts)
-> Result<impl Future<Item = (), Error = Error>> {
    let mailer = Mailer::from_config(&cfg.mail)?.start();
    let notifier = Notifier::new(cfg.reset.clone(), &cfg.mail.sender, mailer);

    let Opts { email, token } = opts;
    let (token, generated) = match token {
        Some(token) => (token, false),
        None => (token::generate(), true),
    };

    Ok(notifier.send_reset_email(&email, &token)
        .map_err(Error::from)
        .map(move |()| {
            info!("Sent password reset email to {}", email);
            if generated {
                println!("{}", token);
            }
        }))
}
