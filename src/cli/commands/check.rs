//! The `check` command.

use std::sync::Arc;
use std::time::Duration;

use crate::acquire::{ArchiveFetcher, DistLocation, SourceAcquirer, SourceProvider};
use crate::cli::args::CheckArgs;
use crate::config::{Credentials, FilterConfig, RunConfig};
use crate::error::Result;
use crate::ledger::ResultStore;
use crate::pipeline::ScanPipeline;
use crate::registry::{ComposerMetadata, ConstraintSource, PackageRegistry, PackagistClient};
use crate::scanner::{PhpcsScanner, Scanner};
use crate::shell::{SystemRunner, ToolRunner};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// Time budget for registry API calls.
const HTTP_TIMEOUT: Duration = Duration::from_secs(300);

/// Audits a subrepository.
pub struct CheckCommand {
    args: CheckArgs,
}

impl CheckCommand {
    /// Create a check command.
    pub fn new(args: CheckArgs) -> Self {
        Self { args }
    }

    fn build_pipeline(&self, config: &RunConfig, filter: FilterConfig) -> Result<ScanPipeline> {
        let credentials = Credentials::load(&self.args.env_file)?;
        let runner: Arc<dyn ToolRunner> = Arc::new(SystemRunner);

        let registry: Arc<dyn PackageRegistry> = Arc::new(PackagistClient::new(
            &config.api_url,
            credentials.api,
            HTTP_TIMEOUT,
        )?);

        let archives = ArchiveFetcher::new(
            DistLocation {
                base_url: config.repo_url.clone(),
                organization: config.organization.clone(),
                subrepo: config.subrepo.clone(),
            },
            credentials.dist,
            ArchiveFetcher::DEFAULT_TIMEOUT,
        )?;
        let sources: Arc<dyn SourceProvider> = Arc::new(SourceAcquirer::new(
            runner.clone(),
            registry.clone(),
            archives,
            &config.work_dir,
        ));

        let constraints: Arc<dyn ConstraintSource> =
            Arc::new(ComposerMetadata::new(runner.clone(), &config.composer));
        let scanner: Arc<dyn Scanner> = Arc::new(PhpcsScanner::new(
            runner,
            &config.phpcs,
            &config.standard,
            &config.errors_dir,
        ));

        Ok(ScanPipeline::new(
            config.clone(),
            filter,
            registry,
            constraints,
            sources,
            scanner,
        ))
    }
}

impl Command for CheckCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let config = self.args.to_run_config();
        config.validate()?;

        let filter = FilterConfig::resolve(config.lockfile.as_deref(), config.only_direct)?
            .with_excluded(&config.excludes);
        let pipeline = self.build_pipeline(&config, filter)?;
        let mut store = ResultStore::open(&config.results_dir, &config.subrepo, config.force)?;

        ui.show_header(&format!(
            "Checking {}/{} against PHP {}",
            config.organization, config.subrepo, config.php_version
        ));

        let report = pipeline.run(&mut store, ui)?;
        tracing::info!(
            "Done: {} checked, {} from {}, {} filtered out",
            report.processed,
            report.replayed,
            store.path().display(),
            report.filtered_out
        );

        Ok(CommandResult::success())
    }
}
