//! Test harness: explicit suite construction and sequential execution.
//!
//! Construction and execution are separate phases. A [`SuiteBuilder`]
//! collects `before` hooks, `it` cases and nested `describe` blocks without
//! running anything; a [`SuiteRunner`] later executes the built [`Suite`],
//! possibly filtered, and reports one [`TestResult`] per case.

use crate::config::RunnerConfig;
use crate::driver::SharedDriver;
use crate::result::{ExerciseError, ExerciseResult};
use futures::future::{BoxFuture, FutureExt};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A registered hook or case body; callable any number of times
pub type TestFn = Arc<dyn Fn() -> BoxFuture<'static, ExerciseResult<()>> + Send + Sync>;

fn boxed<F, Fut>(f: F) -> TestFn
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ExerciseResult<()>> + Send + 'static,
{
    Arc::new(move || f().boxed())
}

/// A single test case
#[derive(Clone)]
pub struct TestCase {
    /// Test name
    pub name: String,
    run: TestFn,
}

impl std::fmt::Debug for TestCase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestCase").field("name", &self.name).finish()
    }
}

/// A test suite containing hooks, cases and nested suites
#[derive(Clone, Default)]
pub struct Suite {
    /// Suite name
    pub name: String,
    hooks: Vec<TestFn>,
    cases: Vec<TestCase>,
    children: Vec<Suite>,
}

impl std::fmt::Debug for Suite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Suite")
            .field("name", &self.name)
            .field("hooks", &self.hooks.len())
            .field("cases", &self.cases)
            .field("children", &self.children)
            .finish()
    }
}

impl Suite {
    /// Cases registered directly on this suite
    #[must_use]
    pub fn cases(&self) -> &[TestCase] {
        &self.cases
    }

    /// Nested suites
    #[must_use]
    pub fn children(&self) -> &[Suite] {
        &self.children
    }

    /// Total number of cases, including nested suites
    #[must_use]
    pub fn test_count(&self) -> usize {
        self.cases.len() + self.children.iter().map(Suite::test_count).sum::<usize>()
    }

    /// Full names of every case, in execution order
    #[must_use]
    pub fn case_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        self.collect_names("", &mut names);
        names
    }

    fn collect_names(&self, prefix: &str, names: &mut Vec<String>) {
        let path = join(prefix, &self.name);
        names.extend(self.cases.iter().map(|c| join(&path, &c.name)));
        for child in &self.children {
            child.collect_names(&path, names);
        }
    }
}

fn join(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else if name.is_empty() {
        prefix.to_string()
    } else {
        format!("{prefix} {name}")
    }
}

/// Suite registration capability (`describe` / `before` / `it`)
#[derive(Debug)]
pub struct SuiteBuilder {
    driver: SharedDriver,
    suite: Suite,
}

impl SuiteBuilder {
    /// Start building a suite
    #[must_use]
    pub fn new(name: impl Into<String>, driver: SharedDriver) -> Self {
        Self {
            driver,
            suite: Suite {
                name: name.into(),
                ..Suite::default()
            },
        }
    }

    /// Driver that cases registered here run against
    #[must_use]
    pub fn driver(&self) -> SharedDriver {
        SharedDriver::clone(&self.driver)
    }

    /// Register a hook that runs once before this suite's cases
    pub fn before<F, Fut>(&mut self, hook: F) -> &mut Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ExerciseResult<()>> + Send + 'static,
    {
        self.suite.hooks.push(boxed(hook));
        self
    }

    /// Register a case
    pub fn it<F, Fut>(&mut self, name: impl Into<String>, test: F) -> &mut Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ExerciseResult<()>> + Send + 'static,
    {
        self.suite.cases.push(TestCase {
            name: name.into(),
            run: boxed(test),
        });
        self
    }

    /// Register a nested suite built by `setup`
    pub fn describe<S>(&mut self, name: impl Into<String>, setup: S) -> &mut Self
    where
        S: FnOnce(&mut SuiteBuilder),
    {
        let mut child = SuiteBuilder::new(name, self.driver());
        setup(&mut child);
        self.suite.children.push(child.build());
        self
    }

    /// Finish construction
    #[must_use]
    pub fn build(self) -> Suite {
        self.suite
    }
}

/// Build a top-level suite
pub fn describe<S>(name: impl Into<String>, driver: SharedDriver, setup: S) -> Suite
where
    S: FnOnce(&mut SuiteBuilder),
{
    let mut builder = SuiteBuilder::new(name, driver);
    setup(&mut builder);
    builder.build()
}

/// Test result status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TestStatus {
    /// Test passed
    Passed,
    /// Test failed
    Failed,
    /// Test was not run (filtered out, or after a fail-fast stop)
    Skipped,
}

/// Result of running a single test
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResult {
    /// Full test name
    pub name: String,
    /// Outcome
    pub status: TestStatus,
    /// Error message if failed
    pub error: Option<String>,
    /// Test duration
    pub duration: Duration,
}

impl TestResult {
    /// Create a passing test result
    #[must_use]
    pub fn pass(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: TestStatus::Passed,
            error: None,
            duration: Duration::ZERO,
        }
    }

    /// Create a failing test result
    #[must_use]
    pub fn fail(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: TestStatus::Failed,
            error: Some(error.into()),
            duration: Duration::ZERO,
        }
    }

    /// Create a skipped test result
    #[must_use]
    pub fn skip(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: TestStatus::Skipped,
            error: None,
            duration: Duration::ZERO,
        }
    }

    /// Set duration
    #[must_use]
    pub const fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Whether the test passed
    #[must_use]
    pub fn passed(&self) -> bool {
        self.status == TestStatus::Passed
    }
}

/// Results from running a test suite
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteResults {
    /// Suite name
    pub suite_name: String,
    /// Individual test results
    pub results: Vec<TestResult>,
    /// Total duration
    pub duration: Duration,
}

impl SuiteResults {
    /// Check that no test failed
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failed_count() == 0
    }

    /// Count passed tests
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.count(TestStatus::Passed)
    }

    /// Count failed tests
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.count(TestStatus::Failed)
    }

    /// Count skipped tests
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.count(TestStatus::Skipped)
    }

    /// Get total test count
    #[must_use]
    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// Get failed tests
    #[must_use]
    pub fn failures(&self) -> Vec<&TestResult> {
        self.results
            .iter()
            .filter(|r| r.status == TestStatus::Failed)
            .collect()
    }

    /// Look up a result by full name
    #[must_use]
    pub fn result(&self, name: &str) -> Option<&TestResult> {
        self.results.iter().find(|r| r.name == name)
    }

    /// Status of every result, in execution order
    #[must_use]
    pub fn statuses(&self) -> Vec<TestStatus> {
        self.results.iter().map(|r| r.status).collect()
    }

    fn count(&self, status: TestStatus) -> usize {
        self.results.iter().filter(|r| r.status == status).count()
    }
}

#[derive(Default)]
struct RunState {
    results: Vec<TestResult>,
    stopped: bool,
}

/// Runs suites sequentially, in registration order
#[derive(Debug, Clone, Default)]
pub struct SuiteRunner {
    config: RunnerConfig,
}

impl SuiteRunner {
    /// Create a runner with default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a runner with the given configuration
    #[must_use]
    pub const fn with_config(config: RunnerConfig) -> Self {
        Self { config }
    }

    /// Runner configuration
    #[must_use]
    pub const fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Run a suite and all nested suites
    pub async fn run(&self, suite: &Suite) -> SuiteResults {
        let start = Instant::now();
        let mut state = RunState::default();
        self.run_suite(suite, "", None, &mut state).await;

        let results = SuiteResults {
            suite_name: suite.name.clone(),
            results: state.results,
            duration: start.elapsed(),
        };
        tracing::info!(
            suite = %results.suite_name,
            passed = results.passed_count(),
            failed = results.failed_count(),
            skipped = results.skipped_count(),
            "suite finished"
        );
        results
    }

    fn run_suite<'a>(
        &'a self,
        suite: &'a Suite,
        prefix: &'a str,
        inherited_failure: Option<String>,
        state: &'a mut RunState,
    ) -> BoxFuture<'a, ()> {
        async move {
            let path = join(prefix, &suite.name);
            let mut setup_failure = inherited_failure;

            if setup_failure.is_none() && !state.stopped && self.has_selected(suite, prefix) {
                for hook in &suite.hooks {
                    if let Err(err) = self.invoke(hook).await {
                        tracing::warn!(suite = %path, error = %err, "before hook failed");
                        setup_failure = Some(err.to_string());
                        break;
                    }
                }
            }

            for case in &suite.cases {
                let name = join(&path, &case.name);
                if state.stopped || !self.config.selects(&name) {
                    state.results.push(TestResult::skip(name));
                    continue;
                }

                let start = Instant::now();
                let outcome = match &setup_failure {
                    Some(message) => Err(ExerciseError::SetupFailed {
                        message: message.clone(),
                    }),
                    None => self.invoke(&case.run).await,
                };
                let result = match outcome {
                    Ok(()) => {
                        tracing::info!(test = %name, "passed");
                        TestResult::pass(name)
                    }
                    Err(err) => {
                        tracing::warn!(test = %name, error = %err, "failed");
                        state.stopped = self.config.fail_fast;
                        TestResult::fail(name, err.to_string())
                    }
                };
                state.results.push(result.with_duration(start.elapsed()));
            }

            for child in &suite.children {
                self.run_suite(child, &path, setup_failure.clone(), state)
                    .await;
            }
        }
        .boxed()
    }

    fn has_selected(&self, suite: &Suite, prefix: &str) -> bool {
        let mut names = Vec::new();
        suite.collect_names(prefix, &mut names);
        names.iter().any(|name| self.config.selects(name))
    }

    async fn invoke(&self, f: &TestFn) -> ExerciseResult<()> {
        let fut = f();
        match self.config.timeout() {
            Some(limit) => tokio::time::timeout(limit, fut)
                .await
                .map_err(|_| ExerciseError::Timeout {
                    ms: limit.as_millis() as u64,
                })?,
            None => fut.await,
        }
    }
}
