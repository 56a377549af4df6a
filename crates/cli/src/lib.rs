use actix::System;
use failure::Error;
use futures::{IntoFuture, future::{self, Future}};
use std::{env, mem, path::PathBuf};
use structopt::StructOpt;

mod config;
mod send;
mod token;

use self::config::Config;

pub type Result<T, E=Error> = std::result::Result<T, E>;

#[derive(StructOpt)]
#[structopt(name = "pwreset")]
struct Opts {
    /// Configuration file
    #[structopt(
        long = "config",
        short = "c",
        env = "PWRESET_CONFIG",
        default_value = "config.toml",
        parse(from_os_str)
    )]
    config: PathBuf,
    #[structopt(subcommand)]
    command: Command,
}

#[derive(StructOpt)]
enum Command {
    /// Send a password reset email
    #[structopt(name = "send")]
    Send(send::Opts),
    /// Generate a new reset token
    #[structopt(name = "token")]
    Token,
    /// Check configuration
    #[structopt(name = "check")]
    Check,
}

pub fn main() -> Result<(), Error> {
    let opts = Opts::from_args();
    let config = config::load(&opts.config)?;

    setup_sentry(&config);
    setup_logging(&config.logging)?;

    // Run validation after sentry and logging setup so that they can catch bugs
    // in validation.
    config.validate()?;

    match opts.command {
        Command::Send(opts) => with_system(|config, opts| {
            future::result(send::main(config, opts)).flatten()
        }, &config, opts),
        Command::Token => {
            println!("{}", token::generate());
            Ok(())
        }
        Command::Check => {
            println!("Configuration in {} is valid", opts.config.display());
            Ok(())
        }
    }
}

fn setup_sentry(config: &Config) {
    if let Some(ref sentry) = config.sentry {
        env::set_var("RUST_BACKTRACE", "1");
        mem::forget(sentry::init((sentry.dsn.as_str(), sentry::ClientOptions {
            trim_backtraces: true,
            debug: cfg!(debug_assertions),
            release: Some(env!("CARGO_PKG_VERSION").into()),
            .. Default::default()
        })));
        sentry::integrations::panic::register_panic_handler();
    }
}

fn setup_logging(config: &config::Logging) -> Result<()> {
    let mut builder = env_logger::Builder::from_default_env();
    builder.filter_level(config.level);

    for (module, level) in &config.filters {
        builder.filter_module(&module, *level);
    }

    builder.try_init()?;

    Ok(())
}

/// Run a function in a context of an Actix system.
fn with_system<F, O, I>(f: F, config: &Config, opts: O)
-> Result<I::Item, Error>
where
    F: FnOnce(&Config, O) -> I,
    I: IntoFuture,
    I::Error: Send + Sync,
    Error: From<I::Error>,
{
    System::new("pwreset::cli")
        .block_on(future::lazy(|| f(config, opts)))
        .map_err(From::from)
}
