use std::env;

use schedule_view::config::ApiConfig;
use schedule_view::models::{FilterChange, SortBy, SortOrder};
use schedule_view::{AppError, FetchOutcome, ScheduleViewEngine};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            env::var("RUST_LOG").unwrap_or_else(|_| "schedule_view=debug".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let changes = parse_args(env::args().skip(1))?;

    let config = ApiConfig::new_from_env()?;
    info!("Using schedule backend at {}", config.base_url);

    let engine = ScheduleViewEngine::from_config(&config)?;
    if engine.fetch_all().await == FetchOutcome::Failed {
        return Err("could not load schedules".into());
    }

    // Page last so the filter changes before it do not reset it.
    for change in changes {
        engine.set_filter(change);
    }

    let snapshot = engine.snapshot();
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    info!(
        "Page {} of {} ({} matching schedules)",
        snapshot.meta.page,
        snapshot.meta.total_pages(),
        snapshot.meta.total
    );

    Ok(())
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Vec<FilterChange>, AppError> {
    let mut changes = Vec::new();
    let mut page = None;
    let mut page_size = None;

    while let Some(flag) = args.next() {
        let mut value = || {
            args.next()
                .ok_or_else(|| AppError::Config(format!("{} needs a value", flag)))
        };
        match flag.as_str() {
            "--search" => changes.push(FilterChange::Search(Some(value()?))),
            "--room" => changes.push(FilterChange::RoomId(Some(parse_number(&value()?)?))),
            "--class" => changes.push(FilterChange::ClassId(Some(parse_number(&value()?)?))),
            "--day" => changes.push(FilterChange::DayOfWeek(Some(value()?))),
            "--sort" => {
                let sort_by = value()?.parse::<SortBy>().map_err(AppError::Config)?;
                changes.push(FilterChange::SortBy(sort_by));
            }
            "--desc" => changes.push(FilterChange::SortOrder(SortOrder::Desc)),
            "--page" => page = Some(parse_number(&value()?)?),
            "--page-size" => page_size = Some(parse_number(&value()?)?),
            other => return Err(AppError::Config(format!("unknown argument: {}", other))),
        }
    }

    if let Some(size) = page_size {
        changes.push(FilterChange::PageSize(size));
    }
    if let Some(page) = page {
        changes.push(FilterChange::Page(page));
    }
    Ok(changes)
}

fn parse_number<T: std::str::FromStr>(raw: &str) -> Result<T, AppError> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::Config(format!("not a number: {}", raw)))
}
