//! Grouped test suites built from query assertions.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::time::{Duration, Instant};

use crate::result::QueryResult;

type TestBody = Box<dyn Fn() -> QueryResult<()> + Send + Sync>;

/// A single named test
pub struct TestCase {
    /// Test name
    pub name: String,
    body: TestBody,
}

impl TestCase {
    /// Create a new test case
    pub fn new<F>(name: impl Into<String>, body: F) -> Self
    where
        F: Fn() -> QueryResult<()> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            body: Box::new(body),
        }
    }

    fn run(&self) -> Result<(), String> {
        match panic::catch_unwind(AssertUnwindSafe(|| (self.body)())) {
            Ok(Ok(())) => Ok(()),
            Ok(Err(err)) => Err(err.to_string()),
            Err(payload) => Err(panic_message(payload.as_ref())),
        }
    }
}

impl fmt::Debug for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestCase")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "test panicked".to_string()
    }
}

/// A test suite containing tests and nested groups
#[derive(Debug, Default)]
pub struct TestSuite {
    /// Suite name; empty for the plain top level
    pub name: String,
    /// Tests in this suite
    pub tests: Vec<TestCase>,
    /// Nested `describe` groups
    pub groups: Vec<TestSuite>,
}

impl TestSuite {
    /// Create a new test suite
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tests: Vec::new(),
            groups: Vec::new(),
        }
    }

    /// Add a test
    #[must_use]
    pub fn test<F>(mut self, name: impl Into<String>, body: F) -> Self
    where
        F: Fn() -> QueryResult<()> + Send + Sync + 'static,
    {
        self.add_test(TestCase::new(name, body));
        self
    }

    /// Add a test case
    pub fn add_test(&mut self, test: TestCase) {
        self.tests.push(test);
    }

    /// Nest a group
    #[must_use]
    pub fn describe(mut self, group: Self) -> Self {
        self.groups.push(group);
        self
    }

    /// Number of tests, including nested groups
    #[must_use]
    pub fn test_count(&self) -> usize {
        self.tests.len() + self.groups.iter().map(Self::test_count).sum::<usize>()
    }
}

/// Result of running a single test
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestResult {
    /// Full test name, groups joined by ` > `
    pub name: String,
    /// Whether test passed
    pub passed: bool,
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
            passed: true,
            error: None,
            duration: Duration::ZERO,
        }
    }

    /// Create a failing test result
    #[must_use]
    pub fn fail(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: false,
            error: Some(error.into()),
            duration: Duration::ZERO,
        }
    }

    /// Set duration
    #[must_use]
    pub const fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }
}

/// Results from running a test suite
#[derive(Debug, Clone)]
pub struct SuiteResults {
    /// Suite name
    pub suite_name: String,
    /// Individual test results
    pub results: Vec<TestResult>,
    /// Total duration
    pub duration: Duration,
}

impl SuiteResults {
    /// Check if all tests passed
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.results.iter().all(|r| r.passed)
    }

    /// Count passed tests
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.results.iter().filter(|r| r.passed).count()
    }

    /// Count failed tests
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.results.iter().filter(|r| !r.passed).count()
    }

    /// Get total test count
    #[must_use]
    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// Get failed tests
    #[must_use]
    pub fn failures(&self) -> Vec<&TestResult> {
        self.results.iter().filter(|r| !r.passed).collect()
    }
}

/// Test harness for running suites
#[derive(Debug, Default, Clone, Copy)]
pub struct TestHarness {
    /// Whether to stop on first failure
    pub fail_fast: bool,
}

impl TestHarness {
    /// Create a new test harness
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable fail-fast mode
    #[must_use]
    pub const fn with_fail_fast(mut self) -> Self {
        self.fail_fast = true;
        self
    }

    /// Run a test suite, tests before nested groups
    #[must_use]
    pub fn run(&self, suite: &TestSuite) -> SuiteResults {
        let start = Instant::now();
        let mut results = Vec::with_capacity(suite.test_count());
        self.run_group(suite, "", &mut results);
        SuiteResults {
            suite_name: suite.name.clone(),
            results,
            duration: start.elapsed(),
        }
    }

    /// Returns false once fail-fast stops the run.
    fn run_group(&self, suite: &TestSuite, prefix: &str, results: &mut Vec<TestResult>) -> bool {
        let prefix = join_name(prefix, &suite.name);
        for test in &suite.tests {
            let name = join_name(&prefix, &test.name);
            let start = Instant::now();
            let result = match test.run() {
                Ok(()) => {
                    tracing::info!(test = %name, "passed");
                    TestResult::pass(name)
                }
                Err(error) => {
                    tracing::warn!(test = %name, %error, "failed");
                    TestResult::fail(name, error)
                }
            };
            let passed = result.passed;
            results.push(result.with_duration(start.elapsed()));
            if !passed && self.fail_fast {
                return false;
            }
        }
        suite
            .groups
            .iter()
            .all(|group| self.run_group(group, &prefix, results))
    }
}

fn join_name(prefix: &str, name: &str) -> String {
    match (prefix.is_empty(), name.is_empty()) {
        (true, _) => name.to_string(),
        (false, true) => prefix.to_string(),
        (false, false) => format!("{prefix} > {name}"),
    }
}
