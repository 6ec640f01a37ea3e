//! TOTP Guard operator binary.
//!
//! # Usage
//!
//! ```bash
//! # Generate a secret and its provisioning URI
//! totp-guard secret
//! totp-guard uri --secret JBSWY3DPEHPK3PXP --label alice@example.com --issuer Acme
//!
//! # Show the current code, then check it
//! totp-guard code --secret JBSWY3DPEHPK3PXP
//! totp-guard verify --secret JBSWY3DPEHPK3PXP --code 123456 --watermark 0
//! ```
//!
//! Results go to stdout; logs go to stderr.

use std::io::Write;

use clap::{Parser, Subcommand};
use totp_guard_core::{
    MAX_WINDOW, SecretKey, format_code, generate_secret, group_secret, parse_code,
    provisioning_uri,
};
use totp_guard_crypto::{DEFAULT_WINDOW, MatchOutcome, Totp, match_code, unix_now};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// TOTP secret and code tool
#[derive(Parser, Debug)]
#[command(name = "totp-guard")]
#[command(about = "Time-based one-time password secrets, codes and verification")]
#[command(version)]
struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a new Base32 secret
    Secret {
        /// Print the secret in groups of four characters
        #[arg(long)]
        grouped: bool,
    },

    /// Print the code for a secret
    Code {
        /// Base32 secret
        #[arg(short, long)]
        secret: String,

        /// Unix time to compute the code for (defaults to now)
        #[arg(long)]
        at: Option<f64>,
    },

    /// Print the otpauth:// provisioning URI for a secret
    Uri {
        /// Base32 secret
        #[arg(short, long)]
        secret: String,

        /// Account label, usually the login
        #[arg(short, long)]
        label: String,

        /// Issuer shown by authenticator apps
        #[arg(short, long)]
        issuer: Option<String>,
    },

    /// Check a code and print the matched counter
    Verify {
        /// Base32 secret
        #[arg(short, long)]
        secret: String,

        /// Code to check
        #[arg(short, long)]
        code: String,

        /// Highest counter already accepted for this secret
        #[arg(long, default_value = "0")]
        watermark: u64,

        /// Fuzz window in seconds on each side of the current time (at most 300)
        #[arg(
            long,
            default_value_t = DEFAULT_WINDOW,
            value_parser = clap::value_parser!(u32).range(..=i64::from(MAX_WINDOW)),
        )]
        window: u32,

        /// Unix time to verify at (defaults to now)
        #[arg(long)]
        at: Option<f64>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    run(args.command, &mut std::io::stdout().lock())
}

/// Execute one command, writing its result to `out`.
fn run(command: Command, out: &mut impl Write) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Secret { grouped } => {
            let secret = generate_secret()?.to_base32();
            tracing::debug!("Generated {}-character secret", secret.len());

            if grouped {
                writeln!(out, "{}", group_secret(&secret))?;
            } else {
                writeln!(out, "{secret}")?;
            }
        },

        Command::Code { secret, at } => {
            let key = SecretKey::from_base32(&secret)?;
            let totp = Totp::new(key.as_bytes());
            let now = at.unwrap_or_else(unix_now);

            writeln!(out, "{}", format_code(totp.code_at(now)))?;
        },

        Command::Uri { secret, label, issuer } => {
            let key = SecretKey::from_base32(&secret)?;
            writeln!(out, "{}", provisioning_uri(&label, &key.to_base32(), issuer.as_deref()))?;
        },

        Command::Verify { secret, code, watermark, window, at } => {
            let key = SecretKey::from_base32(&secret)?;
            let code = parse_code(&code)?;

            match match_code(key.as_bytes(), code, watermark, at, window) {
                MatchOutcome::Matched(counter) => {
                    tracing::info!("Code matched at step {}", counter);
                    writeln!(out, "{counter}")?;
                },
                MatchOutcome::NoMatch => {
                    tracing::warn!("Code did not match any step above watermark {}", watermark);
                    return Err("verification failed".into());
                },
            }
        },
    }

    Ok(())
}
