// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Set up logging
// 2. Parse command-line arguments using clap
// 3. Dispatch to the appropriate subcommand handler
// 4. Print the report
// 5. Exit with proper code (0 = crawl ran, 2 = bad input or configuration)
//
// A crawl that downloads nothing, or hits failing pages, still exits with 0:
// those failures are part of the report, not errors.
// =============================================================================

use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;
use vidcrawl::cli::{Cli, Commands, CrawlArgs};
use vidcrawl::{crawl, report, telemetry, CrawlJob, ProfileSet};

#[tokio::main]
async fn main() {
    telemetry::init_telemetry();

    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // Invalid job or profile configuration
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Crawl(args) => handle_crawl(args).await,
        Commands::Profiles { profiles } => handle_profiles(profiles.as_deref()),
    }
}

fn load_profiles(path: Option<&Path>) -> Result<ProfileSet> {
    match path {
        Some(path) => ProfileSet::load(path)
            .with_context(|| format!("loading profiles from {}", path.display())),
        None => Ok(ProfileSet::builtin()),
    }
}

// Handles the 'crawl' subcommand
async fn handle_crawl(args: CrawlArgs) -> Result<i32> {
    let profiles = load_profiles(args.profiles.as_deref())?;
    let profile = profiles.get(&args.profile)?.clone();

    let job = CrawlJob::new(&args.start_url, profile, args.job_options())?;

    eprintln!("🔍 Crawling: {}", job.start_url());
    eprintln!(
        "📊 Up to {} page(s), profile '{}', saving to {}",
        job.max_pages(),
        job.profile().name,
        job.download_dir().display()
    );

    let report = crawl(&job).await;
    report::print_report(&report, args.json)?;

    Ok(0)
}

// Handles the 'profiles' subcommand
fn handle_profiles(path: Option<&Path>) -> Result<i32> {
    let profiles = load_profiles(path)?;

    println!("{:<20} {:<10} {:<50}", "PROFILE", "SELECTORS", "EXTENSIONS");
    println!("{}", "=".repeat(80));
    for profile in profiles.iter() {
        println!(
            "{:<20} {:<10} {:<50}",
            profile.name,
            profile.selectors.len(),
            profile.extensions.join(", ")
        );
    }

    Ok(0)
}
