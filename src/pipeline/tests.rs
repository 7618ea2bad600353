use super::*;
use crate::acquire::{AcquireError, AcquisitionCandidate, SourceTree};
use crate::config::run::tests::sample;
use crate::constraint::ConstraintStatus;
use crate::error::CompatError;
use crate::ledger::{FinalResult, ScanVerdict};
use crate::registry::PackageDetail;
use crate::scanner::ScanReport;
use crate::ui::MockUI;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

struct FakeRegistry {
    packages: Vec<Package>,
    fail: bool,
}

impl PackageRegistry for FakeRegistry {
    fn list_packages(&self, _subrepo: &str) -> Result<Vec<Package>> {
        if self.fail {
            return Err(CompatError::Registry {
                message: "HTTP 401".into(),
            });
        }
        Ok(self.packages.clone())
    }

    fn package_detail(&self, _subrepo: &str, _name: &str) -> Result<PackageDetail> {
        Ok(PackageDetail::default())
    }
}

#[derive(Default)]
struct FakeConstraints {
    declared: HashMap<String, String>,
    calls: Mutex<Vec<String>>,
}

impl ConstraintSource for FakeConstraints {
    fn php_constraint(&self, package: &str) -> Option<String> {
        self.calls.lock().unwrap().push(package.to_string());
        self.declared.get(package).cloned()
    }
}

struct FakeSources {
    root: PathBuf,
    unavailable: Vec<String>,
    calls: Mutex<Vec<String>>,
}

impl SourceProvider for FakeSources {
    fn provide(&self, package: &Package) -> std::result::Result<SourceTree, AcquireError> {
        self.calls.lock().unwrap().push(package.name.clone());
        if self.unavailable.contains(&package.name) {
            return Err(AcquireError::Exhausted {
                package: package.name.clone(),
                attempts: vec!["archive dev-master: HTTP 404".into()],
            });
        }
        let path = self.root.join(package.name.replace('/', "-"));
        std::fs::create_dir_all(&path).unwrap();
        Ok(SourceTree::new(
            path,
            AcquisitionCandidate::archive("dev-master"),
        ))
    }
}

struct FakeScanner {
    results: HashMap<String, FinalResult>,
    calls: Mutex<Vec<String>>,
}

impl Scanner for FakeScanner {
    fn scan(&self, source: &Path, _target: &str, package: &str) -> ScanReport {
        assert!(source.exists(), "scanned a missing tree");
        self.calls.lock().unwrap().push(package.to_string());
        ScanReport {
            result: self.results.get(package).cloned().unwrap_or(FinalResult::Ok),
            raw_output: String::new(),
        }
    }
}

struct Harness {
    temp: TempDir,
    registry: Arc<FakeRegistry>,
    constraints: Arc<FakeConstraints>,
    sources: Arc<FakeSources>,
    scanner: Arc<FakeScanner>,
    config: RunConfig,
    filter: FilterConfig,
}

impl Harness {
    fn new(names: &[&str]) -> Self {
        let temp = TempDir::new().unwrap();
        let config = RunConfig {
            results_dir: temp.path().join("results"),
            errors_dir: temp.path().join("errors"),
            work_dir: temp.path().join("work"),
            ..sample()
        };
        Self {
            registry: Arc::new(FakeRegistry {
                packages: names.iter().map(|n| Package::new(*n)).collect(),
                fail: false,
            }),
            constraints: Arc::new(FakeConstraints::default()),
            sources: Arc::new(FakeSources {
                root: temp.path().join("work"),
                unavailable: Vec::new(),
                calls: Mutex::new(Vec::new()),
            }),
            scanner: Arc::new(FakeScanner {
                results: HashMap::new(),
                calls: Mutex::new(Vec::new()),
            }),
            config,
            filter: FilterConfig::default(),
            temp,
        }
    }

    fn declare(mut self, package: &str, constraint: &str) -> Self {
        Arc::get_mut(&mut self.constraints)
            .unwrap()
            .declared
            .insert(package.into(), constraint.into());
        self
    }

    fn unavailable(mut self, package: &str) -> Self {
        Arc::get_mut(&mut self.sources)
            .unwrap()
            .unavailable
            .push(package.into());
        self
    }

    fn scan_result(mut self, package: &str, result: FinalResult) -> Self {
        Arc::get_mut(&mut self.scanner)
            .unwrap()
            .results
            .insert(package.into(), result);
        self
    }

    fn pipeline(&self) -> ScanPipeline {
        ScanPipeline::new(
            self.config.clone(),
            self.filter.clone(),
            self.registry.clone(),
            self.constraints.clone(),
            self.sources.clone(),
            self.scanner.clone(),
        )
    }

    fn store(&self, force: bool) -> ResultStore {
        ResultStore::open(&self.config.results_dir, &self.config.subrepo, force).unwrap()
    }

    fn run(&self) -> (RunReport, ResultStore, MockUI) {
        let mut store = self.store(false);
        let mut ui = MockUI::new();
        let report = self.pipeline().run(&mut store, &mut ui).unwrap();
        (report, store, ui)
    }

    fn ledger_file(&self) -> PathBuf {
        ResultStore::ledger_path(&self.config.results_dir, &self.config.subrepo)
    }

    fn acquisitions(&self) -> Vec<String> {
        self.sources.calls.lock().unwrap().clone()
    }

    fn scans(&self) -> Vec<String> {
        self.scanner.calls.lock().unwrap().clone()
    }

    fn lookups(&self) -> usize {
        self.constraints.calls.lock().unwrap().len()
    }
}

#[test]
fn pinned_constraint_is_ok_without_acquisition() {
    let h = Harness::new(&["vendor/pkg"]).declare("vendor/pkg", ">=8.1");

    let (report, store, ui) = h.run();

    assert!(h.acquisitions().is_empty());
    assert!(h.scans().is_empty());
    assert_eq!(
        store.ledger().verdicts(),
        [ScanVerdict::new(
            "vendor/pkg",
            ConstraintStatus::Compatible,
            ">=8.1",
            FinalResult::Ok
        )]
    );
    assert_eq!(report.summary.to_string(), "Compatible: 1 / 1 (100%)");
    assert_eq!(
        std::fs::read_to_string(h.ledger_file()).unwrap(),
        r#"[["vendor/pkg","Compatible",">=8.1","OK"]]"#
    );
    assert_eq!(ui.rows().len(), 1);
    assert_eq!(ui.final_summary().unwrap().0, "acme");
}

#[test]
fn risky_constraint_is_verified_by_scan() {
    let h = Harness::new(&["acme/range"])
        .declare("acme/range", ">=7.4")
        .scan_result("acme/range", FinalResult::Tool("General error".into()));

    let (_, store, _) = h.run();

    assert_eq!(h.acquisitions(), ["acme/range"]);
    assert_eq!(h.scans(), ["acme/range"]);
    let verdict = store.ledger().get("acme/range").unwrap();
    assert_eq!(verdict.status, ConstraintStatus::Risky);
    assert_eq!(verdict.result, FinalResult::Tool("General error".into()));
}

#[test]
fn incompatible_constraint_is_not_scanned() {
    let h = Harness::new(&["acme/old"]).declare("acme/old", "^7.2");

    let (report, store, _) = h.run();

    assert!(h.acquisitions().is_empty());
    let verdict = store.ledger().get("acme/old").unwrap();
    assert_eq!(verdict.status, ConstraintStatus::Incompatible);
    assert_eq!(verdict.result, FinalResult::Incompatible);
    assert_eq!(report.summary.percentage, 0);
}

#[test]
fn missing_constraint_with_no_source_is_acquisition_failure() {
    let h = Harness::new(&["acme/ghost", "acme/ok"])
        .unavailable("acme/ghost")
        .declare("acme/ok", "8.1.*");

    let (report, store, _) = h.run();

    let ghost = store.ledger().get("acme/ghost").unwrap();
    assert_eq!(ghost.status, ConstraintStatus::Unknown);
    assert_eq!(ghost.constraint, "");
    assert_eq!(ghost.result, FinalResult::AcquisitionFailed);
    assert!(h.scans().is_empty());
    assert_eq!(report.processed, 2);
    assert_eq!(report.summary.to_string(), "Compatible: 1 / 2 (50%)");
}

#[test]
fn inclusion_set_limits_processing() {
    let mut h = Harness::new(&["acme/a", "acme/b", "acme/c"])
        .declare("acme/a", "8.1.*")
        .declare("acme/b", "8.1.*")
        .declare("acme/c", "8.1.*");
    h.filter = FilterConfig::default().with_included(["acme/a", "acme/b"]);

    let (report, store, _) = h.run();

    assert_eq!(store.ledger().len(), 2);
    assert!(!store.ledger().contains("acme/c"));
    assert_eq!(report.filtered_out, 1);
    assert_eq!(h.lookups(), 2);
}

#[test]
fn excluded_prefix_is_never_touched() {
    let h = Harness::new(&["Magento/framework", "acme/a"]).declare("acme/a", "8.1.*");

    let (_, store, _) = h.run();

    assert_eq!(store.ledger().len(), 1);
    assert_eq!(h.lookups(), 1);
    assert!(h
        .constraints
        .calls
        .lock()
        .unwrap()
        .iter()
        .all(|n| !n.to_lowercase().starts_with("magento/")));
}

#[test]
fn second_run_replays_without_work() {
    let h = Harness::new(&["acme/a", "acme/b"]).declare("acme/a", "8.1.*");
    h.run();
    let first = std::fs::read(h.ledger_file()).unwrap();
    let lookups = h.lookups();
    let acquisitions = h.acquisitions().len();

    let (report, _, ui) = h.run();

    assert_eq!(h.lookups(), lookups);
    assert_eq!(h.acquisitions().len(), acquisitions);
    assert_eq!(std::fs::read(h.ledger_file()).unwrap(), first);
    assert_eq!(report.processed, 0);
    assert_eq!(report.replayed, 2);
    assert!(ui.rows().iter().all(|(_, cached)| *cached));
    assert_eq!(ui.running_summaries().len(), 2);
}

#[test]
fn partial_ledger_resumes_remaining_packages() {
    let h = Harness::new(&["acme/a", "acme/b", "acme/c"])
        .declare("acme/b", "8.1.*")
        .declare("acme/c", "8.1.*");
    let mut seeded = h.store(false);
    seeded
        .append(ScanVerdict::new(
            "acme/a",
            ConstraintStatus::Unknown,
            "",
            FinalResult::Tool("General error".into()),
        ))
        .unwrap();

    let (report, store, ui) = h.run();

    assert_eq!(h.lookups(), 2);
    assert_eq!(report.replayed, 1);
    assert_eq!(report.processed, 2);
    let names: Vec<_> = store
        .ledger()
        .verdicts()
        .iter()
        .map(|v| v.package.as_str())
        .collect();
    assert_eq!(names, ["acme/a", "acme/b", "acme/c"]);
    assert_eq!(
        store.ledger().get("acme/a").unwrap().result,
        FinalResult::Tool("General error".into())
    );
    assert!(ui.rows()[0].1);
    assert!(!ui.rows()[1].1);
}

#[test]
fn force_ignores_existing_ledger() {
    let h = Harness::new(&["acme/a"]).declare("acme/a", "8.1.*");
    h.run();

    let mut store = h.store(true);
    let mut ui = MockUI::new();
    let report = h.pipeline().run(&mut store, &mut ui).unwrap();

    assert_eq!(report.processed, 1);
    assert_eq!(h.lookups(), 2);
}

#[test]
fn parallel_workers_record_each_package_once() {
    let names: Vec<String> = (0..12).map(|i| format!("acme/pkg{:02}", i)).collect();
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
    let mut h = Harness::new(&refs);
    h.config.jobs = 4;

    let (report, store, ui) = h.run();

    assert_eq!(report.processed, 12);
    assert_eq!(store.ledger().len(), 12);
    assert_eq!(h.scans().len(), 12);
    assert_eq!(ui.rows().len(), 12);
    let on_disk: Vec<ScanVerdict> =
        serde_json::from_str(&std::fs::read_to_string(h.ledger_file()).unwrap()).unwrap();
    assert_eq!(on_disk.len(), 12);
}

#[test]
fn registry_failure_aborts_before_any_work() {
    let mut h = Harness::new(&["acme/a"]);
    h.registry = Arc::new(FakeRegistry {
        packages: Vec::new(),
        fail: true,
    });

    let mut store = h.store(false);
    let mut ui = MockUI::new();
    let err = h.pipeline().run(&mut store, &mut ui).unwrap_err();

    assert!(matches!(err, CompatError::Registry { .. }));
    assert!(!h.ledger_file().exists());
}

#[test]
fn ledger_write_failure_is_fatal() {
    let mut h = Harness::new(&["acme/a", "acme/b"]);
    // A regular file where the results directory should be.
    let blocker = h.temp.path().join("blocked");
    std::fs::write(&blocker, "").unwrap();
    h.config.results_dir = blocker.join("results");

    let mut store = h.store(false);
    let mut ui = MockUI::new();
    let err = h.pipeline().run(&mut store, &mut ui).unwrap_err();

    assert_eq!(err.exit_code(), 1);
    assert!(matches!(err, CompatError::Persistence { .. }));
}

#[test]
fn verbose_mode_reports_acquisition_detail() {
    let h = Harness::new(&["acme/a"]);
    let mut store = h.store(false);
    let mut ui = MockUI::with_mode(crate::ui::OutputMode::Verbose);

    h.pipeline().run(&mut store, &mut ui).unwrap();

    assert!(ui.has_message("acme/a: downloaded archive dev-master, scan OK"));
}
