//! rxSearchBox page object.
//!
//! The widget renders a single `input.rxSearchBox-input` under its root.
//! Enabled state lives on that input rather than on the root.

use crate::assertion::expect;
use crate::driver::SharedDriver;
use crate::exercise::{self, ExerciseOptions};
use crate::harness::SuiteBuilder;
use crate::locator::Locator;
use crate::page_object::{ComponentHandle, PageObject};
use crate::result::ExerciseResult;
use async_trait::async_trait;

/// Input selector, relative to the widget root
pub const INPUT_SELECTOR: &str = "input.rxSearchBox-input";

/// Placeholder the widget shows when none is configured
pub const DEFAULT_PLACEHOLDER: &str = "Search...";

/// Page object for an rxSearchBox instance
#[derive(Debug, Clone)]
pub struct RxSearchBox {
    handle: ComponentHandle,
}

impl RxSearchBox {
    /// Bind to the search box rooted at `selector`
    #[must_use]
    pub fn new(driver: SharedDriver, selector: &str) -> Self {
        Self::from_handle(ComponentHandle::new(driver, Locator::new(selector)))
    }

    fn input(&self) -> ComponentHandle {
        self.handle.child(INPUT_SELECTOR)
    }

    /// Placeholder text (empty when absent)
    pub async fn placeholder(&self) -> ExerciseResult<String> {
        Ok(self.input().attribute("placeholder").await?.unwrap_or_default())
    }

    /// Current search term
    pub async fn term(&self) -> ExerciseResult<String> {
        Ok(self.input().attribute("value").await?.unwrap_or_default())
    }

    /// Replace the search term
    pub async fn set_term(&self, term: &str) -> ExerciseResult<()> {
        let input = self.input();
        input.clear().await?;
        input.type_text(term).await
    }
}

#[async_trait]
impl PageObject for RxSearchBox {
    fn component_name() -> &'static str {
        "rxSearchBox"
    }

    fn default_locator() -> Locator {
        Locator::new("rx-search-box")
    }

    fn from_handle(handle: ComponentHandle) -> Self {
        Self { handle }
    }

    fn handle(&self) -> &ComponentHandle {
        &self.handle
    }

    async fn is_enabled(&self) -> ExerciseResult<bool> {
        self.input().is_enabled().await
    }
}

/// Options for [`exercise`]
#[derive(Debug, Clone)]
pub struct SearchBoxExerciseOptions {
    base: ExerciseOptions<RxSearchBox>,
    disabled: Option<bool>,
    placeholder: Option<String>,
}

impl Default for SearchBoxExerciseOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchBoxExerciseOptions {
    /// Options with every field unset
    #[must_use]
    pub fn new() -> Self {
        Self {
            base: ExerciseOptions::new(),
            disabled: None,
            placeholder: None,
        }
    }

    /// Generic state expectations; `disabled` wins over their `is_enabled`
    #[must_use]
    pub fn base(mut self, base: ExerciseOptions<RxSearchBox>) -> Self {
        self.base = base;
        self
    }

    /// Search box to exercise (default: `rx-search-box`)
    #[must_use]
    pub fn instance(mut self, instance: RxSearchBox) -> Self {
        self.base = self.base.instance(instance);
        self
    }

    /// Expect a disabled search box (default false)
    #[must_use]
    pub const fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = Some(disabled);
        self
    }

    /// Expected placeholder (default [`DEFAULT_PLACEHOLDER`])
    #[must_use]
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }
}

/// rxSearchBox exercises: the generic state cases plus a placeholder case
pub fn exercise(
    options: SearchBoxExerciseOptions,
) -> impl Fn(&mut SuiteBuilder) + Send + Sync + 'static {
    let SearchBoxExerciseOptions {
        mut base,
        disabled,
        placeholder,
    } = options;
    if let Some(disabled) = disabled {
        base = base.is_enabled(!disabled);
    }
    let placeholder = placeholder.unwrap_or_else(|| DEFAULT_PLACEHOLDER.to_string());

    move |suite| {
        let config = base.clone().resolve(suite.driver());
        exercise::register(suite, &config);

        let search_box = config.instance().clone();
        let expected = placeholder.clone();
        suite.it(format!("should have a placeholder of {placeholder}"), move || {
            let search_box = search_box.clone();
            let expected = expected.clone();
            async move {
                expect(search_box.placeholder())
                    .to_eventually_equal(expected)
                    .await
            }
        });
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::components::mock::MockSearchBox;
    use crate::driver::MockDriver;
    use crate::harness::{describe, SuiteRunner, TestStatus};
    use std::sync::Arc;

    mod page_object_tests {
        use super::*;

        #[tokio::test]
        async fn test_reads_placeholder_and_term() {
            let driver = Arc::new(MockDriver::new());
            MockSearchBox::new("rx-search-box").term("kittens").mount(&driver);
            let search_box = RxSearchBox::default_instance(driver);

            assert_eq!(search_box.placeholder().await.unwrap(), DEFAULT_PLACEHOLDER);
            assert_eq!(search_box.term().await.unwrap(), "kittens");
        }

        #[tokio::test]
        async fn test_set_term_replaces() {
            let driver = Arc::new(MockDriver::new());
            MockSearchBox::new(".search").term("old").mount(&driver);
            let search_box = RxSearchBox::new(driver, ".search");

            search_box.set_term("new").await.unwrap();
            assert_eq!(search_box.term().await.unwrap(), "new");
        }

        #[tokio::test]
        async fn test_enabled_reads_input() {
            let driver = Arc::new(MockDriver::new());
            MockSearchBox::new(".search").disabled().mount(&driver);
            let search_box = RxSearchBox::new(driver, ".search");

            assert!(search_box.is_present().await.unwrap());
            assert!(!search_box.is_enabled().await.unwrap());
        }
    }

    mod exercise_tests {
        use super::*;

        #[tokio::test]
        async fn test_default_exercise() {
            let driver = Arc::new(MockDriver::new());
            MockSearchBox::new("rx-search-box").mount(&driver);

            let suite = describe("rxSearchBox", driver, |s| {
                s.describe("default exercises", exercise(SearchBoxExerciseOptions::new()));
            });
            assert_eq!(
                suite.case_names(),
                vec![
                    "rxSearchBox default exercises should be present",
                    "rxSearchBox default exercises should be displayed",
                    "rxSearchBox default exercises should be enabled",
                    "rxSearchBox default exercises should be valid",
                    "rxSearchBox default exercises should have a placeholder of Search...",
                ]
            );

            let results = SuiteRunner::new().run(&suite).await;
            assert!(results.all_passed(), "{:?}", results.failures());
        }

        #[tokio::test]
        async fn test_disabled_with_custom_placeholder() {
            let driver = Arc::new(MockDriver::new());
            MockSearchBox::new(".wide")
                .placeholder("Filter by any...")
                .disabled()
                .mount(&driver);
            let search_box = RxSearchBox::new(driver.clone(), ".wide");

            let suite = describe("rxSearchBox", driver, |s| {
                s.describe(
                    "disabled",
                    exercise(
                        SearchBoxExerciseOptions::new()
                            .instance(search_box)
                            .disabled(true)
                            .placeholder("Filter by any..."),
                    ),
                );
            });
            let results = SuiteRunner::new().run(&suite).await;
            assert_eq!(results.total(), 5);
            assert!(results.all_passed(), "{:?}", results.failures());
            assert!(results
                .result("rxSearchBox disabled should not be enabled")
                .is_some());
        }

        #[tokio::test]
        async fn test_placeholder_mismatch_fails() {
            let driver = Arc::new(MockDriver::new());
            MockSearchBox::new("rx-search-box")
                .placeholder("Find...")
                .mount(&driver);

            let suite = describe("rxSearchBox", driver, |s| {
                s.describe("placeholder", exercise(SearchBoxExerciseOptions::new()));
            });
            let results = SuiteRunner::new().run(&suite).await;
            let failed = results
                .result("rxSearchBox placeholder should have a placeholder of Search...")
                .unwrap();
            assert_eq!(failed.status, TestStatus::Failed);
            assert_eq!(results.failed_count(), 1);
            let message = failed.error.as_deref().unwrap();
            assert!(message.contains("Search..."), "{message}");
            assert!(message.contains("Find..."), "{message}");
        }

        #[tokio::test]
        async fn test_exercise_registers_into_several_suites() {
            let driver = Arc::new(MockDriver::new());
            MockSearchBox::new("rx-search-box").mount(&driver);
            let setup = exercise(SearchBoxExerciseOptions::new().placeholder("Find..."));

            let suite = describe("rxSearchBox", driver, |s| {
                s.describe("first", &setup);
                s.describe("second", &setup);
            });
            assert_eq!(suite.test_count(), 10);

            let results = SuiteRunner::new().run(&suite).await;
            assert_eq!(results.failed_count(), 2);
            assert!(results
                .failures()
                .iter()
                .all(|r| r.name.ends_with("should have a placeholder of Find...")));
        }
    }
}
