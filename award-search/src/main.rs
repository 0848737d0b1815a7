use anyhow::{bail, Result};
use chrono::NaiveDate;

use award_search::accounts::Accounts;
use award_search::config::SearchConfig;
use award_search::engine::{self, EngineCapabilities};
use award_search::error::ValidationError;
use award_search::logging;
use award_search::module::planner::{PlanRequest, QueryPlanner};
use award_search::module::search::{ControllerOptions, SearchController};
use award_search::storage::JsonStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load the search configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());
    let config = SearchConfig::from_file(&config_path)?;

    // Initialize logging
    let _logging_guard = logging::init_logging(&config.log_dir, "award-search", &config.log_level);

    tracing::info!("Award search starting...");
    config.validate()?;

    let Some(settings) = config.engines.get(&config.website) else {
        bail!(ValidationError::UnsupportedWebsite(config.website.clone()));
    };
    let capabilities = EngineCapabilities::from_settings(&config.website, settings);
    tracing::info!(
        "Engine: {} ({}), supported: {}",
        capabilities.name,
        capabilities.id,
        engine::supported(&config.engines).join(", ")
    );

    // Clamp the window to what the engine can actually search
    let (start, end) = clamp_window(&config, &capabilities)?;
    let days = (end - start).num_days() + 1;

    // Generate the query plan
    let (_, valid_end) = capabilities.valid_date_range();
    let planner = QueryPlanner::new(capabilities.clone(), config.data_dir.clone());
    let queries = planner.generate(
        &PlanRequest {
            from_city: config.from.clone(),
            to_city: config.to.clone(),
            start,
            end,
            cabin: config.cabin,
            quantity: config.quantity,
            partners: config.partners,
            oneway: config.oneway,
            reverse: config.reverse,
        },
        valid_end,
    );

    tracing::info!(
        "Searching {} days of award inventory: {} - {} ({} queries)",
        days,
        start,
        end,
        queries.len()
    );

    // Storage, credentials, engine
    let storage = JsonStore::open(&config.data_dir)?;
    let accounts = if capabilities.login_required {
        Accounts::from_file(&config.accounts_file)?
    } else {
        Accounts::empty()
    };
    let engine = engine::create(&config.website, settings);

    // Execute the plan; the controller owns teardown on every exit path
    let controller = SearchController::new(
        engine,
        storage,
        accounts,
        ControllerOptions {
            parse: config.parse,
            headless: config.headless,
            force: config.force,
            terminate: config.terminate,
            account: config.account,
            backoff_secs: (config.backoff_min_secs, config.backoff_max_secs),
        },
    );
    let report = controller.run(queries).await?;

    tracing::info!(
        "Search complete! {} executed, {} skipped, {} requests and {} awards saved",
        report.executed,
        report.skipped,
        report.requests_saved,
        report.awards_saved
    );
    Ok(())
}

/// Adjust the requested window to the engine's valid searchable range.
/// A window entirely outside that range is fatal; a partial overlap is
/// clamped with a warning.
fn clamp_window(
    config: &SearchConfig,
    capabilities: &EngineCapabilities,
) -> Result<(NaiveDate, NaiveDate), ValidationError> {
    let (min, max) = capabilities.valid_date_range();
    let mut start = config.start;
    let mut end = config.end_date();

    if end < min || start > max {
        return Err(ValidationError::OutsideValidRange {
            name: capabilities.name.clone(),
            id: capabilities.id.clone(),
            min,
            max,
        });
    }
    if start < min {
        tracing::warn!(
            "{} ({}) can only search from {} day(s) from today, adjusting start of search range to: {}",
            capabilities.name,
            capabilities.id,
            capabilities.validation.min_days,
            min
        );
        start = min;
    }
    if end > max {
        tracing::warn!(
            "{} ({}) can only search up to {} day(s) from today, adjusting end of search range to: {}",
            capabilities.name,
            capabilities.id,
            capabilities.validation.max_days,
            max
        );
        end = max;
    }
    Ok((start, end))
}
