//! Bukber CLI
//!
//! Thin wrapper around bukber-core for command-line usage.
//!
//! ## Usage
//!
//! ```bash
//! # Show event details and the current countdown
//! bukber info
//!
//! # Print the countdown once, or tick until the event starts
//! bukber countdown --once
//! bukber countdown
//!
//! # Interactive guestbook: each stdin line is "name | message"
//! bukber guestbook --seed wishes.json
//!
//! # Validate an RSVP or registration and print the row (not persisted)
//! bukber rsvp --name "Budi" --guests 3
//! bukber register --name "Citra" --nik 3171000000000001
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bukber_core::feed::format::{avatar_initial, clock_label, relative_label};
use bukber_core::{
    Attendance, BukberConfig, CountdownState, CountdownTicker, Entry, EntryDetails, Feed,
    LiveFeed, MemoryStore, RegistrationForm, RsvpForm, SubmissionDesk, SystemClock, WishForm,
};
use chrono::{DateTime, FixedOffset, Utc};
use clap::{Parser, Subcommand};
use tokio::io::AsyncBufReadExt;
use tracing::{debug, info};

/// Bukber - iftar invitation countdown and guestbook
#[derive(Parser)]
#[command(name = "bukber")]
#[command(version = "0.1.0")]
#[command(about = "Bukber - iftar invitation countdown and guestbook")]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Config file (default: ~/.bukber/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override the event start (RFC 3339, e.g. 2026-02-23T17:00:00+07:00)
    #[arg(long, global = true)]
    target: Option<DateTime<FixedOffset>>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show event details
    Info,

    /// Show the time left until the event starts
    Countdown {
        /// Print a single sample and exit
        #[arg(long)]
        once: bool,
    },

    /// Interactive guestbook session reading "name | message" lines from stdin
    Guestbook {
        /// JSON array of existing entries to start from
        #[arg(long)]
        seed: Option<PathBuf>,
    },

    /// Validate an RSVP and print the row it would store.
    ///
    /// Uses a throwaway in-memory table; nothing is saved between runs.
    Rsvp {
        /// Full name
        #[arg(long)]
        name: String,
        /// Party size
        #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
        guests: i64,
        /// Decline instead of attending
        #[arg(long)]
        not_attending: bool,
    },

    /// Validate an attendance registration and print the row it would store.
    ///
    /// Uses a throwaway in-memory table; nothing is saved between runs.
    Register {
        /// Full name
        #[arg(long)]
        name: String,
        /// National id number (digits only)
        #[arg(long)]
        nik: String,
    },
}

fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .init();
}

/// Get the default config path (~/.bukber/config.toml)
fn default_config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".bukber")
        .join("config.toml")
}

fn load_config(path: &Path, target: Option<DateTime<FixedOffset>>) -> Result<BukberConfig> {
    let mut config = BukberConfig::load(path)
        .with_context(|| format!("Failed to load config from {}", path.display()))?;
    if let Some(target) = target {
        debug!(%target, "Overriding event start");
        config.event.starts_at = target;
    }
    Ok(config)
}

fn print_countdown(title: &str, state: CountdownState) {
    match state {
        CountdownState::Running(remaining) => {
            let units: Vec<String> = remaining
                .units()
                .iter()
                .map(|(label, value)| format!("{:02} {}", value, label))
                .collect();
            println!("{}: {}", title, units.join("  "));
        }
        CountdownState::Expired => println!("{}: the event has started.", title),
    }
}

fn describe(entry: &Entry, offset: FixedOffset, now: DateTime<Utc>) -> String {
    let detail = match &entry.details {
        EntryDetails::Wish { message } => message.clone(),
        EntryDetails::Rsvp { guests, status } => format!("{} ({} guests)", status, guests),
        EntryDetails::Registration { attendance, .. } => {
            if *attendance { "Hadir" } else { "Tidak Hadir" }.to_string()
        }
    };
    format!(
        "  [{}] {}  {} ({})  {}",
        avatar_initial(&entry.name),
        entry.name,
        clock_label(entry.created_at, offset),
        relative_label(entry.created_at, now),
        detail
    )
}

fn print_feed(feed: &Feed, offset: FixedOffset) {
    println!("Guestbook ({}/{}):", feed.len(), feed.capacity());
    if feed.is_empty() {
        println!("  No wishes yet. Be the first to send one!");
        return;
    }
    let now = Utc::now();
    for entry in feed {
        println!("{}", describe(entry, offset, now));
    }
}

async fn run_countdown(config: &BukberConfig, once: bool) -> Result<()> {
    let title = &config.event.title;
    let countdown = config.event.countdown();

    if once {
        print_countdown(title, countdown.sample(Utc::now()));
        return Ok(());
    }

    let ticker = CountdownTicker::spawn(countdown, SystemClock, config.countdown.tick());
    let mut states = ticker.subscribe();
    let initial = *states.borrow_and_update();
    print_countdown(title, initial);

    if !initial.is_expired() {
        loop {
            tokio::select! {
                changed = states.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let state = *states.borrow_and_update();
                    print_countdown(title, state);
                    if state.is_expired() {
                        break;
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("Interrupted");
                    break;
                }
            }
        }
    }

    ticker.cancel();
    Ok(())
}

async fn run_guestbook(config: &BukberConfig, seed: Option<PathBuf>) -> Result<()> {
    let store = match seed {
        Some(path) => MemoryStore::from_json_file("wishes", &path)
            .with_context(|| format!("Failed to load seed file {}", path.display()))?,
        None => MemoryStore::new("wishes"),
    };
    let offset = *config.event.starts_at.offset();
    let live = LiveFeed::open(&store, config.feed.capacity).await;
    if let Some(e) = live.fetch_error() {
        eprintln!("Could not load earlier wishes: {}", e);
    }

    let mut updates = live.watch();
    print_feed(&updates.borrow_and_update(), offset);

    let mut desk = SubmissionDesk::new(WishForm::default());
    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        // Without a "name |" prefix the previous name is reused
        {
            let form = desk.form_mut();
            match line.split_once('|') {
                Some((name, message)) => {
                    form.name = name.trim().to_string();
                    form.message = message.trim().to_string();
                }
                None => form.message = line.to_string(),
            }
        }

        match desk.submit(&store).await {
            Ok(entry) => {
                debug!(id = %entry.id, "Waiting for echo");
                let echoed = tokio::time::timeout(
                    std::time::Duration::from_secs(1),
                    updates.changed(),
                )
                .await;
                if !matches!(echoed, Ok(Ok(()))) {
                    eprintln!("Sent, but the live feed did not update.");
                }
                print_feed(&updates.borrow_and_update(), offset);
            }
            Err(e) => eprintln!("Not sent: {}", e),
        }
    }

    live.close();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    let config_path = cli.config.unwrap_or_else(default_config_path);
    let config = load_config(&config_path, cli.target)?;

    match cli.command {
        Commands::Info => {
            let event = &config.event;
            println!("{}", event.title);
            println!();
            println!("  When:  {}", event.schedule_label());
            println!("  Venue: {}", event.venue);
            if let Some(address) = &event.address {
                println!("         {}", address);
            }
            if let Some(dress_code) = &event.dress_code {
                println!("  Dress: {}", dress_code);
            }
            println!("  Map:   {}", event.maps_url());
            println!();
            println!("Guestbook capacity: {}", config.feed.capacity);
            print_countdown("Countdown", event.countdown().sample(Utc::now()));
        }

        Commands::Countdown { once } => run_countdown(&config, once).await?,

        Commands::Guestbook { seed } => run_guestbook(&config, seed).await?,

        Commands::Rsvp {
            name,
            guests,
            not_attending,
        } => {
            let status = if not_attending {
                Attendance::NotAttending
            } else {
                Attendance::Attending
            };
            let store = MemoryStore::new("rsvps");
            let mut desk = SubmissionDesk::new(RsvpForm {
                name,
                guests,
                status,
            });
            let entry = desk.submit(&store).await?;
            println!("RSVP received. Thank you!");
            println!("{}", serde_json::to_string_pretty(&entry)?);
        }

        Commands::Register { name, nik } => {
            let store = MemoryStore::new("registrations");
            let mut desk = SubmissionDesk::new(RegistrationForm { name, nik });
            let entry = desk.submit(&store).await?;
            println!("Attendance confirmed. Thank you!");
            println!("{}", serde_json::to_string_pretty(&entry)?);
        }
    }

    Ok(())
}
