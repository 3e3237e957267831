//! Terminal output

use owo_colors::OwoColorize;
use praybit_core::RewardLedger;
use praybit_sync::{AdminUser, LeaderboardEntry};

pub fn print_status(ledger: &RewardLedger) {
    let state = ledger.state();

    println!("\n{}", "🪙 Praybit Rewards".cyan().bold());
    println!("{}", "═══════════════════════════════════".bright_black());
    println!("{:<16} {} PRAY", "Balance:", state.points.to_string().yellow().bold());
    println!("{:<16} {}", "Total Taps:", state.tap_count);
    println!("{:<16} x{}", "Mining Power:", ledger.mining_power());
    println!("{:<16} {}", "Referrals:", state.referral_count);

    let daily = if ledger.has_claimed_today() {
        "claimed".green().to_string()
    } else {
        "available".yellow().to_string()
    };
    println!("{:<16} {}", "Daily Reward:", daily);

    match ledger.user_id() {
        Some(user_id) => println!("{:<16} {}", "Synced As:", user_id.bright_blue()),
        None => println!("{:<16} {}", "Synced As:", "local only".bright_black()),
    }
    println!();
}

pub fn print_leaderboard(entries: &[LeaderboardEntry]) {
    println!("\n{}", "🏆 Top Miners".cyan().bold());
    println!("{}", "═══════════════════════════════════".bright_black());

    if entries.is_empty() {
        println!("No miners yet. Be the first!");
    }
    for entry in entries {
        let badge = match entry.rank {
            1 => "🥇",
            2 => "🥈",
            3 => "🥉",
            _ => "  ",
        };
        println!(
            "{} {:>2}. {:<40} {} PRAY",
            badge,
            entry.rank,
            entry.user_id,
            entry.coins.to_string().yellow()
        );
    }
    println!();
}

pub fn print_users(users: &[AdminUser]) {
    println!("\n{} ({})", "👥 Users".cyan().bold(), users.len());
    println!("{}", "═══════════════════════════════════".bright_black());
    for user in users {
        println!(
            "{:<38} {:<28} {:>10} PRAY  {:>6} taps  {:>3} refs",
            user.stats.user_id,
            user.email.bright_black(),
            user.stats.coins.to_string().yellow(),
            user.stats.taps_count,
            user.stats.referrals
        );
    }
    println!();
}
