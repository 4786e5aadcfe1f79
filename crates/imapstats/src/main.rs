//! `imapstats` - mailbox statistics for status bars and cron jobs.
//!
//! Connects to an IMAP server, evaluates the statistics configured for
//! the account and mailbox, and prints them as one JSON line. With
//! `--write-cache` the line is also stored so later `--read-cache` runs
//! can answer without touching the network.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod cli;

use std::io;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use imapstats_core::credentials::read_password;
use imapstats_core::{
    AccountConfig, AppPaths, CacheStore, EX_UNAVAILABLE, ExitOnTimeout, Login, SystemClock,
    fetch_stats,
};
use imapstats_imap::Config;

use cli::Args;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Logs go to stderr; stdout carries only JSON.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "imapstats=info,imapstats_core=info,imapstats_imap=warn".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("fatal: {err:#}");
            ExitCode::from(exit_status(&err))
        }
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let mut paths = AppPaths::discover()?;
    if let Some(config_file) = &args.config {
        paths = paths.with_config_file(config_file);
    }
    paths
        .ensure_dirs()
        .with_context(|| format!("creating {}", paths.cache_dir.display()))?;

    let cache = CacheStore::new(&paths.cache_dir);
    let mut stdout = io::stdout().lock();

    if args.read_cache {
        cache.read_into(&args.user, &args.mailbox, args.ttl, &SystemClock, &mut stdout)?;
        return Ok(());
    }

    let config = AccountConfig::load(&paths.config_file)?;
    let stats = config.resolve(&args.user, &args.mailbox);

    let Some(pass_file) = &args.pass else {
        anyhow::bail!("--pass is required to connect");
    };
    let login = Login {
        server: Config::parse_addr(&args.addr)?,
        user: args.user.clone(),
        password: read_password(pass_file)?,
    };

    info!(user = %login.user, mailbox = %args.mailbox, stats = stats.len(), "fetching stats");
    let result = fetch_stats(&login, &args.mailbox, &stats, ExitOnTimeout).await?;

    cache.write(
        &args.user,
        &args.mailbox,
        &result,
        args.output_mode(),
        &mut stdout,
    )?;
    Ok(())
}

/// 69 if a network timeout got this far, 1 for anything else.
fn exit_status(err: &anyhow::Error) -> u8 {
    let timed_out = err.chain().any(|cause| {
        cause
            .downcast_ref::<imapstats_core::Error>()
            .is_some_and(imapstats_core::Error::is_timeout)
            || cause
                .downcast_ref::<imapstats_imap::Error>()
                .is_some_and(imapstats_imap::Error::is_timeout)
    });
    if timed_out {
        u8::try_from(EX_UNAVAILABLE).unwrap_or(1)
    } else {
        1
    }
}
