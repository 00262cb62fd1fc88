use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};

use race_analytics::{AnalyticsError, RowLimit, SearchOptions};
use race_cli::config::DashboardConfig;
use race_cli::pipeline::{Dashboard, DashboardSnapshot};
use race_model::Diagnostics;

use crate::cli::{ExportArgs, LeaderboardArgs, SearchArgs};
use crate::summary::{
    SearchHit, print_diagnostics, print_facts, print_leaderboard, print_search, print_status,
};

pub fn run_status(config: Option<&Path>, data_dir: Option<&Path>) -> Result<()> {
    let (_, snapshot) = load(config, data_dir)?;
    let statistics = snapshot.analytics().statistics();
    print_status(&snapshot, &statistics);
    Ok(())
}

pub fn run_leaderboard(
    config: Option<&Path>,
    data_dir: Option<&Path>,
    args: &LeaderboardArgs,
) -> Result<()> {
    let (config, snapshot) = load(config, data_dir)?;
    let limit = args.top.unwrap_or(RowLimit::Top(config.leaderboard_top));
    let analytics = snapshot.analytics();
    if let Some(bounds) = analytics.time_bounds() {
        debug!(min = bounds.min, max = bounds.max, "Race time bounds");
    }
    let rows = analytics.ranked_view(limit, args.min_time, args.max_time);
    print_leaderboard(&snapshot, &rows);
    Ok(())
}

pub fn run_search(config: Option<&Path>, data_dir: Option<&Path>, args: &SearchArgs) -> Result<()> {
    let (_, snapshot) = load(config, data_dir)?;
    let mut options = SearchOptions::default();
    if args.case_sensitive {
        options = options.case_sensitive();
    }
    if args.full_name {
        options = options.with_full_name();
    }

    let analytics = snapshot.analytics();
    let hits: Vec<SearchHit<'_>> = analytics
        .search(&args.query, options)
        .into_iter()
        .map(|record| SearchHit {
            record,
            performance: analytics.relative_performance(record).ok(),
            image: snapshot.image_for(&record.username),
        })
        .collect();
    info!(query = %args.query, hits = hits.len(), "Search finished");
    print_search(&args.query, &hits, snapshot.has_race_data);
    Ok(())
}

pub fn run_facts(config: Option<&Path>, data_dir: Option<&Path>) -> Result<()> {
    let (_, snapshot) = load(config, data_dir)?;
    match snapshot.analytics().fun_facts() {
        Ok(facts) => print_facts(&facts),
        Err(AnalyticsError::NotApplicable { .. }) => {
            println!(
                "No race has completed yet; {} participant(s) waiting to race.",
                snapshot.results.len()
            );
        }
        Err(error) => println!("No fun facts: {error}"),
    }
    Ok(())
}

pub fn run_export(config: Option<&Path>, data_dir: Option<&Path>, args: &ExportArgs) -> Result<()> {
    let (_, snapshot) = load(config, data_dir)?;
    let json = snapshot.to_json_pretty().context("serialize snapshot")?;
    match &args.output {
        Some(path) => {
            fs::write(path, format!("{json}\n"))
                .with_context(|| format!("write {}", path.display()))?;
            eprintln!("Wrote snapshot to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

/// Resolves the configuration and runs one refresh cycle.
///
/// On failure the diagnostics gathered so far are printed before the error
/// is returned.
fn load(
    config: Option<&Path>,
    data_dir: Option<&Path>,
) -> Result<(DashboardConfig, DashboardSnapshot)> {
    let mut diagnostics = Diagnostics::new();
    let config =
        DashboardConfig::resolve(config, data_dir, &mut diagnostics).context("load configuration")?;
    let dashboard = Dashboard::new(config);
    match dashboard.refresh(diagnostics) {
        Ok(snapshot) => Ok((dashboard.config().clone(), snapshot)),
        Err(error) => {
            print_diagnostics(&error.diagnostics);
            Err(error.into())
        }
    }
}
