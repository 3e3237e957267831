//! Praybit CLI - tap, refer and claim rewards from the terminal

mod app;
mod config;
mod display;

use anyhow::{bail, Context};
use app::App;
use clap::{Parser, Subcommand};
use config::Config;
use owo_colors::OwoColorize;
use praybit_sync::{AdminConsole, Leaderboard, DEFAULT_LEADERBOARD_SIZE};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "praybit")]
#[command(about = "Praybit reward ledger")]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_HASH"), ")"))]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Signed-in user id (enables remote sync)
    #[arg(short, long, global = true)]
    user: Option<String>,

    /// Directory holding the local reward record
    #[arg(long, value_name = "DIR", global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show balance, taps, mining power and referrals
    Status,

    /// Tap the coin
    Tap {
        /// Number of taps
        #[arg(short = 'n', long, default_value = "1")]
        count: u32,
    },

    /// Record a referral
    Refer,

    /// Claim today's reward
    Daily,

    /// Wipe all rewards
    Reset,

    /// Show the top miners
    Leaderboard {
        #[arg(short, long, default_value_t = DEFAULT_LEADERBOARD_SIZE)]
        limit: usize,
    },

    /// Admin dashboard
    Admin {
        /// Email of the admin account
        #[arg(long)]
        email: String,

        #[command(subcommand)]
        action: AdminCommand,
    },
}

#[derive(Subcommand)]
enum AdminCommand {
    /// List users by balance
    Users {
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Total PRAY held across all users
    Total,

    /// Credit tokens to a user
    Send {
        user_id: String,

        #[arg(allow_negative_numbers = true)]
        amount: i64,
    },
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let path = cli.config.clone().unwrap_or_else(config::default_config_path);
    let mut config =
        Config::load(&path).with_context(|| format!("loading {}", path.display()))?;

    config.apply_env(|key| std::env::var(key).ok());
    if let Some(user) = &cli.user {
        config.identity.user_id = Some(user.clone());
    }
    if let Some(dir) = &cli.data_dir {
        config.storage.data_dir = Some(dir.to_string_lossy().to_string());
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let mut app = App::start(&config).await?;

    match cli.command {
        Commands::Status => display::print_status(&app.ledger),

        Commands::Tap { count } => {
            let before = app.ledger.state().points;
            for _ in 0..count {
                app.ledger.tap();
            }
            let earned = app.ledger.state().points - before;
            println!("{} +{} PRAY", "✨ Tapped!".green().bold(), earned);
            display::print_status(&app.ledger);
        }

        Commands::Refer => {
            app.ledger.refer();
            println!(
                "{} +{} PRAY",
                "🤝 Referral recorded".green().bold(),
                app.ledger.rules().referral_reward
            );
        }

        Commands::Daily => {
            if app.ledger.claim_daily() {
                println!(
                    "{} You earned {} PRAY",
                    "🎁 Daily Reward Claimed!".green().bold(),
                    app.ledger.rules().daily_reward
                );
            } else {
                println!(
                    "{}",
                    "⏳ Already claimed today, come back tomorrow".yellow()
                );
            }
        }

        Commands::Reset => {
            app.ledger.reset();
            println!("{}", "🔄 Rewards reset".yellow().bold());
        }

        Commands::Leaderboard { limit } => {
            let Some(table) = app.table() else {
                bail!("leaderboard needs a remote URL");
            };
            let entries = match Leaderboard::new(table).top(limit).await {
                Ok(entries) => entries,
                Err(e) => {
                    log::error!("Error fetching leaderboard data: {}", e);
                    Vec::new()
                }
            };
            display::print_leaderboard(&entries);
        }

        Commands::Admin { email, action } => {
            let Some(table) = app.table() else {
                bail!("admin dashboard needs a remote URL");
            };
            let console = AdminConsole::new(&email, table)?;

            match action {
                AdminCommand::Users { search } => {
                    let users = console.list_users(search.as_deref()).await?;
                    display::print_users(&users);
                }
                AdminCommand::Total => {
                    let total = console.total_tokens().await?;
                    println!("{} {} PRAY", "Total Tokens:".bold(), total.to_string().yellow());
                }
                AdminCommand::Send { user_id, amount } => {
                    console.send_tokens(&user_id, amount).await?;
                    println!("{} {} PRAY sent to {}", "✅".green(), amount, user_id);
                }
            }
        }
    }

    app.shutdown().await;
    Ok(())
}
