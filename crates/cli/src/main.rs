mod config;

use anyhow::{bail, Context, Result};
use catalog::{
    parse_channel_videos, BannedChannel, ChannelRef, FileStore, FilterPreferences, KeyValueStore,
    PreferenceProvider, StorePreferences, Thumbnail, Video,
};
use clap::{Parser, Subcommand};
use colored::Colorize;
use config::Config;
use pipeline::{contains_banned_word, FilterContext, FilterPipeline};
use service::FeedOrchestrator;
use sources::{FixtureSource, SubscriptionStore};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

/// privtube - content filter and subscription feed
#[derive(Parser)]
#[command(name = "privtube")]
#[command(about = "Filter videos by banned words and channels, and build a subscription feed", long_about = None)]
struct Cli {
    /// Path to the preference store (JSON); overrides the config file
    #[arg(short, long, global = true)]
    store: Option<PathBuf>,

    /// Path to the config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a single video against the stored preferences
    Check {
        #[arg(long, default_value = "")]
        title: String,

        #[arg(long, default_value = "")]
        description: String,

        /// Channel name
        #[arg(long, default_value = "")]
        author: String,

        /// Channel id
        #[arg(long, default_value = "")]
        author_id: String,

        /// Duration in seconds (0 for live or unknown)
        #[arg(long, default_value = "0")]
        length: u64,
    },

    /// Classify every video in a JSON listing file
    Scan {
        /// File holding a video array or an object with a `videos` array
        file: PathBuf,
    },

    /// Test text against banned terms without touching the store
    Match {
        text: String,

        /// Banned term (repeatable)
        #[arg(long = "term", required = true)]
        terms: Vec<String>,

        /// Maximum edit distance for fuzzy word matches
        #[arg(long, default_value = "1")]
        threshold: usize,
    },

    /// Ban a word or a channel
    Ban {
        #[command(subcommand)]
        target: BanTarget,
    },

    /// Lift a ban on a word or a channel
    Unban {
        #[command(subcommand)]
        target: UnbanTarget,
    },

    /// Show or change filter preferences
    Prefs {
        #[command(subcommand)]
        action: PrefsAction,
    },

    /// Follow a channel
    Subscribe {
        channel_id: String,

        #[arg(long)]
        name: String,

        #[arg(long)]
        thumbnail: Option<String>,
    },

    /// Stop following a channel
    Unsubscribe { channel_id: String },

    /// List followed channels
    Subscriptions,

    /// Build the subscription feed from fixture listings
    Feed {
        /// Maximum number of videos
        #[arg(long)]
        limit: Option<usize>,

        /// Directory holding <channel_id>.json listings
        #[arg(long)]
        fixtures: Option<PathBuf>,

        /// Seed for the feed shuffle
        #[arg(long)]
        seed: Option<u64>,

        /// Hide videos the filter rejects
        #[arg(long)]
        filtered: bool,
    },
}

#[derive(Subcommand)]
enum BanTarget {
    Word {
        word: String,
    },
    Channel {
        id: String,

        /// Display name, kept for listing only
        #[arg(long, default_value = "")]
        name: String,
    },
}

#[derive(Subcommand)]
enum UnbanTarget {
    Word { word: String },
    Channel { id: String },
}

#[derive(Subcommand)]
enum PrefsAction {
    Show,
    Set {
        /// Levenshtein threshold for fuzzy matches
        #[arg(long)]
        threshold: Option<usize>,

        /// Hide short-form videos
        #[arg(long)]
        short_form: Option<bool>,

        /// Videos shorter than this many seconds are short-form
        #[arg(long)]
        short_form_threshold: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let store_path = cli.store.clone().unwrap_or_else(|| config.store_path());
    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(store_path));

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Check {
            title,
            description,
            author,
            author_id,
            length,
        } => {
            let video = Video::new(title, description, author, author_id, length);
            handle_check(store, &video)?
        }
        Commands::Scan { file } => handle_scan(store, file)?,
        Commands::Match {
            text,
            terms,
            threshold,
        } => handle_match(&text, &terms, threshold),
        Commands::Ban { target } => handle_ban(store, target)?,
        Commands::Unban { target } => handle_unban(store, target)?,
        Commands::Prefs { action } => handle_prefs(store, action)?,
        Commands::Subscribe {
            channel_id,
            name,
            thumbnail,
        } => handle_subscribe(store, channel_id, name, thumbnail)?,
        Commands::Unsubscribe { channel_id } => handle_unsubscribe(store, &channel_id)?,
        Commands::Subscriptions => handle_subscriptions(store)?,
        Commands::Feed {
            limit,
            fixtures,
            seed,
            filtered,
        } => {
            let limit = limit.unwrap_or_else(|| config.feed_limit());
            let Some(fixtures) = fixtures.or(config.fixtures_dir) else {
                bail!("No fixtures directory: pass --fixtures or set fixtures_dir in the config file");
            };
            handle_feed(store, fixtures, limit, seed, filtered).await?
        }
    }

    Ok(())
}

fn build_orchestrator(
    store: Arc<dyn KeyValueStore>,
    fixtures: PathBuf,
) -> Result<FeedOrchestrator<FixtureSource>> {
    let preferences = Arc::new(StorePreferences::new(store.clone()));
    let subscriptions = Arc::new(SubscriptionStore::open(store)?);
    Ok(FeedOrchestrator::new(
        preferences,
        subscriptions,
        Arc::new(FixtureSource::new(fixtures)),
    ))
}

/// Handle the 'check' command
fn handle_check(store: Arc<dyn KeyValueStore>, video: &Video) -> Result<()> {
    let orchestrator = build_orchestrator(store, PathBuf::new())?;
    let decision = orchestrator.should_filter_video(video);

    if decision.filtered {
        println!("{} {}", "✗ filtered:".red().bold(), decision.reason);
    } else {
        println!("{}", "✓ kept".green().bold());
    }
    Ok(())
}

/// Handle the 'scan' command
fn handle_scan(store: Arc<dyn KeyValueStore>, file: PathBuf) -> Result<()> {
    let json = std::fs::read_to_string(&file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let videos = parse_channel_videos(&json)
        .with_context(|| format!("Failed to parse {}", file.display()))?;

    let preferences = StorePreferences::new(store)
        .load_preferences()
        .context("Failed to load preferences")?;
    let context = FilterContext::new(&preferences);

    let start = Instant::now();
    let total = videos.len();
    let (kept, hidden) = FilterPipeline::standard().partition(videos, &context);

    for video in &kept {
        println!("{} {}", "✓".green(), video.title);
    }
    for (video, decision) in &hidden {
        println!(
            "{} {} {}",
            "✗".red(),
            video.title,
            format!("({})", decision.reason).dimmed()
        );
    }
    println!(
        "\n{} kept, {} filtered of {} in {:?}",
        kept.len().to_string().green().bold(),
        hidden.len().to_string().red().bold(),
        total,
        start.elapsed()
    );
    Ok(())
}

/// Handle the 'match' command
fn handle_match(text: &str, terms: &[String], threshold: usize) {
    if contains_banned_word(text, terms, threshold) {
        println!("{}", "match".red().bold());
    } else {
        println!("{}", "no match".green().bold());
    }
}

/// Handle the 'ban' command
fn handle_ban(store: Arc<dyn KeyValueStore>, target: BanTarget) -> Result<()> {
    let preferences = StorePreferences::new(store);
    match target {
        BanTarget::Word { word } => {
            if preferences.add_banned_word(&word)? {
                println!("{} Banned word \"{}\"", "✓".green(), word.trim());
            } else {
                println!("\"{}\" is already banned", word.trim());
            }
        }
        BanTarget::Channel { id, name } => {
            let added = preferences.add_banned_channel(BannedChannel {
                id: id.clone(),
                name,
            })?;
            if added {
                println!("{} Banned channel {}", "✓".green(), id);
            } else {
                println!("Channel {} is already banned", id);
            }
        }
    }
    Ok(())
}

/// Handle the 'unban' command
fn handle_unban(store: Arc<dyn KeyValueStore>, target: UnbanTarget) -> Result<()> {
    let preferences = StorePreferences::new(store);
    let (removed, label) = match target {
        UnbanTarget::Word { word } => (preferences.remove_banned_word(&word)?, format!("word \"{}\"", word)),
        UnbanTarget::Channel { id } => (preferences.remove_banned_channel(&id)?, format!("channel {}", id)),
    };
    if removed {
        println!("{} Unbanned {}", "✓".green(), label);
    } else {
        println!("No ban on {}", label);
    }
    Ok(())
}

/// Handle the 'prefs' command
fn handle_prefs(store: Arc<dyn KeyValueStore>, action: PrefsAction) -> Result<()> {
    let preferences = StorePreferences::new(store);
    match action {
        PrefsAction::Show => {
            let current = preferences.load_preferences()?;
            print_preferences(&current);
        }
        PrefsAction::Set {
            threshold,
            short_form,
            short_form_threshold,
        } => {
            if threshold.is_none() && short_form.is_none() && short_form_threshold.is_none() {
                bail!("Nothing to set: pass --threshold, --short-form or --short-form-threshold");
            }
            if let Some(threshold) = threshold {
                preferences.set_levenshtein_threshold(threshold)?;
            }
            if short_form.is_some() || short_form_threshold.is_some() {
                let enabled = match short_form {
                    Some(enabled) => enabled,
                    None => preferences.load_preferences()?.ban_short_form,
                };
                preferences.set_short_form(enabled, short_form_threshold)?;
            }
            print_preferences(&preferences.load_preferences()?);
        }
    }
    Ok(())
}

fn print_preferences(preferences: &FilterPreferences) {
    println!("{}", "Filter preferences".bold().blue());

    println!("{}Banned words ({}):", "• ".green(), preferences.banned_words.len());
    for word in &preferences.banned_words {
        println!("    - {}", word);
    }

    println!("{}Banned channels ({}):", "• ".green(), preferences.banned_channels.len());
    for channel in &preferences.banned_channels {
        if channel.name.is_empty() {
            println!("    - {}", channel.id);
        } else {
            println!("    - {} ({})", channel.id, channel.name);
        }
    }

    println!("{}Levenshtein threshold: {}", "• ".cyan(), preferences.levenshtein_threshold);
    println!(
        "{}Hide short-form: {} (under {}s)",
        "• ".cyan(),
        preferences.ban_short_form,
        preferences.short_form_threshold
    );
}

/// Handle the 'subscribe' command
fn handle_subscribe(
    store: Arc<dyn KeyValueStore>,
    channel_id: String,
    name: String,
    thumbnail: Option<String>,
) -> Result<()> {
    let subscriptions = SubscriptionStore::open(store)?;
    let author_thumbnails = thumbnail
        .map(|url| Thumbnail {
            url,
            ..Thumbnail::default()
        })
        .into_iter()
        .collect();
    let channel = ChannelRef {
        author_id: channel_id.clone(),
        author: name,
        author_thumbnails,
    };

    if subscriptions.subscribe(channel)? {
        println!("{} Subscribed to {}", "✓".green(), channel_id);
    } else {
        println!("Already subscribed to {}", channel_id);
    }
    Ok(())
}

/// Handle the 'unsubscribe' command
fn handle_unsubscribe(store: Arc<dyn KeyValueStore>, channel_id: &str) -> Result<()> {
    let subscriptions = SubscriptionStore::open(store)?;
    if subscriptions.unsubscribe(channel_id)? {
        println!("{} Unsubscribed from {}", "✓".green(), channel_id);
    } else {
        println!("Not subscribed to {}", channel_id);
    }
    Ok(())
}

/// Handle the 'subscriptions' command
fn handle_subscriptions(store: Arc<dyn KeyValueStore>) -> Result<()> {
    let subscriptions = SubscriptionStore::open(store)?;
    if subscriptions.is_empty() {
        println!("No subscriptions");
        return Ok(());
    }

    println!("{}", format!("Subscriptions ({})", subscriptions.len()).bold().blue());
    for channel in subscriptions.list() {
        println!("{}{} {}", "• ".green(), channel.name.bold(), channel.id.dimmed());
    }
    Ok(())
}

/// Handle the 'feed' command
async fn handle_feed(
    store: Arc<dyn KeyValueStore>,
    fixtures: PathBuf,
    limit: usize,
    seed: Option<u64>,
    filtered: bool,
) -> Result<()> {
    let mut orchestrator = build_orchestrator(store, fixtures)?;
    if let Some(seed) = seed {
        orchestrator = orchestrator.with_seed(seed);
    }

    let start = Instant::now();
    let feed = if filtered {
        orchestrator.filtered_subscription_feed(limit).await
    } else {
        orchestrator.subscription_feed(limit).await
    };

    if feed.is_empty() {
        println!("Feed is empty");
        return Ok(());
    }

    for (i, item) in feed.iter().enumerate() {
        println!(
            "{:>3}. {} {} {}",
            i + 1,
            item.video.title.bold(),
            format!("[{}]", item.channel_name).cyan(),
            format_duration(item.video.length_seconds).dimmed()
        );
    }
    println!("\n{} videos in {:?}", feed.len(), start.elapsed());
    Ok(())
}

/// Format seconds as `m:ss` or `h:mm:ss`; zero means live or unknown.
fn format_duration(seconds: u64) -> String {
    if seconds == 0 {
        return "live".to_string();
    }
    let (h, m, s) = (seconds / 3600, (seconds % 3600) / 60, seconds % 60);
    if h > 0 {
        format!("{}:{:02}:{:02}", h, m, s)
    } else {
        format!("{}:{:02}", m, s)
    }
}
