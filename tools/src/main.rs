//! insights-runner: headless driver for the payments insights dashboard.
//!
//! Usage:
//!   insights-runner --db insights.db --seed-demo 42
//!   insights-runner --db insights.db --metric users --year 2022 --quarter 3 --region Karnataka
//!   insights-runner --db insights.db --report 4 --year 2023 --quarter 1
//!   insights-runner --db insights.db --ipc-mode

use anyhow::Result;
use insights_core::{
    config::{BoundarySource, DashboardConfig},
    dashboard::Dashboard,
    demo::DemoGenerator,
    filter::FilterInput,
    panel::{Panel, Page},
    request::Request,
    sequencer::RequestToken,
    store::InsightsStore,
    types::{MetricFamily, ALL_REGIONS},
    views::ReportId,
};
use std::env;
use std::io::{self, BufRead, Write};
use std::sync::mpsc;
use std::thread;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");

    let mut config = match flag_value(&args, "--config") {
        Some(path) => DashboardConfig::load(path)?,
        None => DashboardConfig::default(),
    };
    if let Some(db) = flag_value(&args, "--db") {
        config.database_path = db.to_string();
    }
    if let Some(location) = flag_value(&args, "--boundaries") {
        config.boundary_source = BoundarySource::parse(location);
    }

    if let Some(seed) = flag_value(&args, "--seed-demo") {
        let seed: u64 = seed.parse()?;
        let store = InsightsStore::open(&config.database_path)?;
        store.migrate()?;
        let summary = DemoGenerator::new(seed, config.years()).populate(&store)?;
        if !ipc_mode {
            println!("Demo data written to {}", config.database_path);
            println!("  {}", serde_json::to_string(&summary)?);
            println!();
        }
    }

    let dashboard = Dashboard::open(config)?;

    if ipc_mode {
        run_ipc_loop(dashboard)
    } else {
        print_summary(&dashboard, &args)
    }
}

/// JSON requests in on stdin, JSON frames out on stdout. Rendering happens
/// on a worker thread; a request superseded before it finishes is dropped.
fn run_ipc_loop(dashboard: Dashboard) -> Result<()> {
    let sequencer = dashboard.sequencer();
    let (tx, rx) = mpsc::channel::<(RequestToken, Request)>();

    let worker = thread::spawn(move || -> Result<()> {
        let mut stdout = io::stdout();
        for (token, request) in rx {
            if request == Request::Quit {
                break;
            }
            match dashboard.render_frame(token, &request) {
                Ok(Some(frame)) => writeln!(stdout, "{}", serde_json::to_string(&frame)?)?,
                Ok(None) => continue,
                Err(e) => {
                    let err_json = serde_json::json!({ "token": token, "error": e.to_string() });
                    writeln!(stdout, "{}", err_json)?;
                }
            }
            stdout.flush()?;
        }
        Ok(())
    });

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let request: Request = match serde_json::from_str(&line) {
            Ok(r) => r,
            Err(e) => {
                log::warn!("Rejected request: {e}");
                let err_json = serde_json::json!({ "error": e.to_string() });
                let mut stdout = io::stdout().lock();
                writeln!(stdout, "{}", err_json)?;
                stdout.flush()?;
                continue;
            }
        };
        let quit = request == Request::Quit;
        let token = request.token(&sequencer);
        if tx.send((token, request)).is_err() || quit {
            break;
        }
    }
    drop(tx);

    worker
        .join()
        .map_err(|_| anyhow::anyhow!("render worker panicked"))?
}

fn print_summary(dashboard: &Dashboard, args: &[String]) -> Result<()> {
    let config = dashboard.config();
    let filter = FilterInput {
        year:    parse_arg(args, "--year", config.year_max),
        quarter: parse_arg(args, "--quarter", 1u8),
        region:  flag_value(args, "--region").unwrap_or(ALL_REGIONS).to_string(),
    };
    let scope = dashboard.resolve(&filter)?;

    println!("Payments Insights Dashboard: insights-runner");
    println!("  session:    {}", dashboard.session_id);
    println!("  generated:  {}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"));
    println!("  db:         {}", config.database_path);
    println!("  regions:    {}", dashboard.catalog().regions().len());
    println!("  fact rows:  {}", dashboard.store().transaction_fact_count()?);
    println!("  boundaries: {}", if dashboard.boundaries().is_some() { "loaded" } else { "unavailable" });
    println!("  period:     {}", scope.period.label());
    println!("  region:     {}", scope.region.label());
    println!();

    let page = match flag_value(args, "--report") {
        Some(id) => dashboard.render_report(id.parse::<ReportId>()?, &scope)?,
        None => {
            let metric = match flag_value(args, "--metric") {
                Some("users") => MetricFamily::Users,
                _ => MetricFamily::Transactions,
            };
            dashboard.render_home(metric, &scope)?
        }
    };
    print_page(&page);

    let stats = dashboard.cache_stats();
    println!();
    println!("=== CACHE ===");
    println!("  entries: {}  hits: {}  misses: {}", stats.entries, stats.hits, stats.misses);
    Ok(())
}

fn print_page(page: &Page) {
    println!("=== {} ===", page.title.to_uppercase());
    for panel in &page.panels {
        match panel {
            Panel::Metric { label, value } => println!("  {label}: {value}"),
            Panel::RankedList { title, entries } => {
                println!("  {title}");
                for (i, e) in entries.iter().enumerate() {
                    println!("    {:>2}. {} | {}", i + 1, e.label, e.display);
                }
            }
            Panel::Chart(chart) => println!(
                "  [{:?}] {} ({} series, {} points)",
                chart.kind,
                chart.title,
                chart.series.len(),
                chart.point_count()
            ),
            Panel::Map { title, document } => {
                println!("  [map] {title} ({} features)", document.features.len())
            }
            Panel::Choropleth { title, cells, color_scale, .. } => {
                println!("  [choropleth] {title} ({} regions, {color_scale})", cells.len())
            }
            Panel::MapUnavailable { title, message } | Panel::Notice { title, message } => {
                println!("  {title}: {message}")
            }
        }
    }
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
