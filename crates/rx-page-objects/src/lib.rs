//! rx-page-objects: page objects and declarative exercise suites for
//! browser-tested widget libraries.
//!
//! A page object wraps one widget instance behind async state queries. An
//! exercise turns a record of expected states into generated test cases:
//!
//! ```text
//! ExerciseOptions ──resolve──► ExerciseConfig ──register──► SuiteBuilder
//!      (partial)      (driver)     (defaulted)                 │
//!                                                              ▼
//!                                 SuiteResults ◄──run── SuiteRunner
//! ```
//!
//! ```ignore
//! let suite = describe("rxDatePicker", driver, |s| {
//!     s.describe("default exercises", date_picker::exercise(
//!         ExerciseOptions::new().instance(picker).is_valid(false),
//!     ));
//! });
//! let results = SuiteRunner::new().run(&suite).await;
//! ```

#![warn(missing_docs)]

mod assertion;
mod browser;
pub mod components;
mod config;
mod driver;
mod exercise;
mod harness;
mod locator;
mod page_object;
mod result;
mod tracing_support;

pub use assertion::{expect, Eventually};
#[cfg(feature = "browser")]
pub use browser::ChromiumDriver;
pub use browser::BrowserConfig;
pub use components::{date_picker, search_box};
pub use config::RunnerConfig;
pub use driver::{ElementDriver, ElementHandle, MockDom, MockDriver, MockElement, SharedDriver};
pub use exercise::{exercise, register, ExerciseConfig, ExerciseOptions, Expectation, Expectations};
pub use harness::{
    describe, Suite, SuiteBuilder, SuiteResults, SuiteRunner, TestCase, TestFn, TestResult,
    TestStatus,
};
pub use locator::Locator;
pub use page_object::{ComponentHandle, PageObject, INVALID_CLASS};
pub use result::{ExerciseError, ExerciseResult};
pub use tracing_support::{init_tracing, TracingConfig};
