use anyhow::{Result, bail};
use tracing::info_span;

use census_cli::pipeline::run_pipeline;
use census_cli::types::RunResult;
use census_ingest::SourceCatalog;

use crate::cli::{RunArgs, SourcesArgs};
use crate::summary::print_sources;

pub fn run(args: &RunArgs) -> Result<RunResult> {
    let options = args.options();
    if options.target_state.is_empty() {
        bail!("--state must not be empty");
    }
    let span = info_span!("run", state = %options.target_state);
    let _guard = span.enter();
    run_pipeline(&options)
}

/// Prints the source checklist. Fails when any file is missing.
pub fn run_sources(args: &SourcesArgs) -> Result<()> {
    let catalog = SourceCatalog::new(&args.data_dir);
    let statuses = catalog.check();
    print_sources(&statuses);
    let missing = statuses.iter().filter(|status| !status.exists).count();
    if missing > 0 {
        bail!("{missing} source file(s) missing under {}", args.data_dir.display());
    }
    Ok(())
}
