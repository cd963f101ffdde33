use anyhow::Context;
use recipe_allocation::allocation::config::{AllocationConfig, RunPaths};
use recipe_allocation::io::{loader, reporting};
use recipe_allocation::logging;
use recipe_allocation::observer::implementations::{HistoryRecorder, TracingObserver};
use recipe_allocation::AllocationEngine;
use tracing::{error, info};

fn main() -> anyhow::Result<()> {
    logging::init();

    // 1. SETUP CONFIGURATION
    let config = AllocationConfig::default();
    let paths = RunPaths::default();

    // 2. BUILD THE ENGINE
    // Rounds are recorded for the CSV log and forwarded to tracing.
    let observer = HistoryRecorder::new(TracingObserver::new(config.verbose));
    let mut engine = AllocationEngine::new(config, observer);

    // 3. RUN ALLOCATION
    let allocated = engine
        .run_files(&paths.orders, &paths.recipes)
        .with_context(|| {
            format!(
                "allocating {} against {}",
                paths.orders.display(),
                paths.recipes.display()
            )
        })?;

    // 4. EXPORT RESULTS
    let rows = reporting::write_round_log(&paths.round_log_csv, engine.observer().records())?;
    info!(rows, path = %paths.round_log_csv.display(), "round log written");

    if !allocated {
        let failures = engine.observer().failures();
        reporting::write_failure_log(&paths.failure_log_csv, failures)?;
        info!(rows = failures.len(), path = %paths.failure_log_csv.display(), "failure log written");
        error!("orders could not be allocated without repeating a recipe for a customer");
        std::process::exit(1);
    }

    if let Some(excess) = engine.excess_stock() {
        loader::write_excess_stock_json(&paths.excess_stock_json, excess)?;
        reporting::write_excess_stock(&paths.excess_stock_csv, excess)?;
        info!(
            total = excess.total_stock(),
            path = %paths.excess_stock_json.display(),
            "excess stock written"
        );
    }

    Ok(())
}
