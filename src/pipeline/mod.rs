//! The compatibility run.
//!
//! [`ScanPipeline`] lists a subrepository's packages, filters them, replays
//! verdicts already in the ledger, and resolves the rest: declared
//! constraint first, then acquisition and a scan when the constraint alone
//! is not conclusive. Every verdict is persisted as soon as it exists.
//!
//! Packages are resolved on up to `jobs` scoped worker threads. Workers only
//! compute; the calling thread is the single writer for the ledger and UI.

pub mod package;

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc, Mutex};

use crate::acquire::SourceProvider;
use crate::config::{FilterConfig, RunConfig};
use crate::error::Result;
use crate::ledger::{summarize, ResultStore, Summary};
use crate::registry::{ConstraintSource, Package, PackageRegistry};
use crate::scanner::Scanner;
use crate::ui::UserInterface;

pub use package::{Outcome, Resolver};

/// Counts for a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    /// Final summary over the whole ledger.
    pub summary: Summary,
    /// Packages resolved in this run.
    pub processed: usize,
    /// Verdicts replayed from the ledger.
    pub replayed: usize,
    /// Listed packages excluded by the filter.
    pub filtered_out: usize,
}

/// Drives one `check` run.
pub struct ScanPipeline {
    config: RunConfig,
    filter: FilterConfig,
    registry: Arc<dyn PackageRegistry>,
    constraints: Arc<dyn ConstraintSource>,
    sources: Arc<dyn SourceProvider>,
    scanner: Arc<dyn Scanner>,
}

impl ScanPipeline {
    /// Assemble a pipeline from its collaborators.
    pub fn new(
        config: RunConfig,
        filter: FilterConfig,
        registry: Arc<dyn PackageRegistry>,
        constraints: Arc<dyn ConstraintSource>,
        sources: Arc<dyn SourceProvider>,
        scanner: Arc<dyn Scanner>,
    ) -> Self {
        Self {
            config,
            filter,
            registry,
            constraints,
            sources,
            scanner,
        }
    }

    /// Run against `store`, reporting through `ui`.
    ///
    /// Only registry listing and ledger writes can fail the run; every
    /// per-package problem ends up in that package's verdict.
    pub fn run(&self, store: &mut ResultStore, ui: &mut dyn UserInterface) -> Result<RunReport> {
        let subrepo = self.config.subrepo.as_str();

        if !store.ledger().is_empty() {
            ui.message(&format!(
                "Resuming from {} ({} verdicts). Use --force to start over.",
                store.path().display(),
                store.ledger().len()
            ));
        }

        let mut spinner = ui.start_spinner(&format!("Listing packages in {}", subrepo));
        let listed = match self.registry.list_packages(subrepo) {
            Ok(listed) => {
                spinner.finish_success(&format!("{} packages in {}", listed.len(), subrepo));
                listed
            }
            Err(e) => {
                spinner.finish_error(&format!("Could not list {}", subrepo));
                return Err(e);
            }
        };

        let total_listed = listed.len();
        let selected: Vec<Package> = listed
            .into_iter()
            .filter(|p| self.filter.allows(&p.name))
            .collect();
        let filtered_out = total_listed - selected.len();
        tracing::debug!("{} of {} packages selected", selected.len(), total_listed);

        let pending: Vec<Package> = selected
            .into_iter()
            .filter(|p| !store.ledger().contains(&p.name))
            .collect();
        let replayed = store.ledger().len();

        tracing::info!(
            "{}: {} cached, {} to check against PHP {}",
            subrepo,
            replayed,
            pending.len(),
            self.config.php_version
        );

        ui.start_run(replayed + pending.len());

        let mut compatible = 0;
        for (i, verdict) in store.ledger().verdicts().iter().enumerate() {
            if verdict.result.is_ok() {
                compatible += 1;
            }
            ui.show_verdict(verdict, true);
            ui.show_running_summary(subrepo, &Summary::new(compatible, i + 1));
        }

        let processed = pending.len();
        self.resolve_all(pending, store, ui)?;

        let summary = summarize(store.ledger());
        ui.finish_run(subrepo, &summary);

        Ok(RunReport {
            summary,
            processed,
            replayed,
            filtered_out,
        })
    }

    fn resolve_all(
        &self,
        pending: Vec<Package>,
        store: &mut ResultStore,
        ui: &mut dyn UserInterface,
    ) -> Result<()> {
        if pending.is_empty() {
            return Ok(());
        }

        let workers = self.config.jobs.clamp(1, pending.len());
        let queue = Mutex::new(VecDeque::from(pending));
        let stop = AtomicBool::new(false);
        let resolver = Resolver {
            target: &self.config.php_version,
            constraints: self.constraints.as_ref(),
            sources: self.sources.as_ref(),
            scanner: self.scanner.as_ref(),
        };

        std::thread::scope(|scope| {
            let (tx, rx) = mpsc::channel::<Outcome>();

            for _ in 0..workers {
                let tx = tx.clone();
                let (queue, stop, resolver) = (&queue, &stop, &resolver);
                scope.spawn(move || {
                    while !stop.load(Ordering::Relaxed) {
                        let next = queue.lock().ok().and_then(|mut q| q.pop_front());
                        let Some(package) = next else { break };
                        tracing::debug!("Resolving {}", package.name);
                        if tx.send(resolver.resolve(&package)).is_err() {
                            break;
                        }
                    }
                });
            }
            drop(tx);

            for outcome in rx {
                if let Err(e) = self.record(outcome, store, ui) {
                    stop.store(true, Ordering::Relaxed);
                    return Err(e);
                }
            }
            Ok(())
        })
    }

    fn record(
        &self,
        outcome: Outcome,
        store: &mut ResultStore,
        ui: &mut dyn UserInterface,
    ) -> Result<()> {
        if let Some(detail) = &outcome.detail {
            tracing::debug!("{}", detail);
            if ui.output_mode().shows_detail() {
                ui.message(detail);
            }
        }

        store.append(outcome.verdict.clone())?;
        ui.show_verdict(&outcome.verdict, false);
        ui.show_running_summary(&self.config.subrepo, &summarize(store.ledger()));
        Ok(())
    }
}

#[cfg(test)]
mod tests;
