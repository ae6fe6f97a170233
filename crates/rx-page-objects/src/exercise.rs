//! Exercise generators.
//!
//! An exercise turns a declarative expectation record into a suite setup
//! callback. The callback is meant for [`SuiteBuilder::describe`]:
//!
//! ```ignore
//! suite.describe(
//!     "default exercises",
//!     exercise(ExerciseOptions::new().instance(picker).is_valid(false)),
//! );
//! ```
//!
//! Nothing is queried when the callback is created or invoked; the
//! registered cases query the page object only when the runner executes
//! them.

use crate::assertion::expect;
use crate::driver::SharedDriver;
use crate::harness::SuiteBuilder;
use crate::page_object::PageObject;
use crate::result::ExerciseResult;
use serde::{Deserialize, Serialize};

/// One state flag an exercise can assert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Expectation {
    /// Element exists in the document
    Present,
    /// Element is displayed
    Displayed,
    /// Element is enabled
    Enabled,
    /// Element's model is valid
    Valid,
}

impl Expectation {
    /// Registration order of generated cases
    pub const ALL: [Self; 4] = [Self::Present, Self::Displayed, Self::Enabled, Self::Valid];

    /// Adjective used in case names
    #[must_use]
    pub const fn adjective(self) -> &'static str {
        match self {
            Self::Present => "present",
            Self::Displayed => "displayed",
            Self::Enabled => "enabled",
            Self::Valid => "valid",
        }
    }

    /// Case name for the given polarity, e.g. "should not be enabled"
    #[must_use]
    pub fn description(self, expected: bool) -> String {
        let negation = if expected { "" } else { "not " };
        format!("should {negation}be {}", self.adjective())
    }

    /// Query the matching state from a page object
    pub async fn query<P: PageObject>(self, page: &P) -> ExerciseResult<bool> {
        match self {
            Self::Present => page.is_present().await,
            Self::Displayed => page.is_displayed().await,
            Self::Enabled => page.is_enabled().await,
            Self::Valid => page.is_valid().await,
        }
    }
}

/// Serializable expectation flags (`isPresent`, `isDisplayed`, ...)
///
/// Unrecognized keys are ignored so option records can grow without
/// breaking older exercises.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Expectations {
    /// Expected presence
    pub is_present: Option<bool>,
    /// Expected visibility
    pub is_displayed: Option<bool>,
    /// Expected enabled state
    pub is_enabled: Option<bool>,
    /// Expected validity
    pub is_valid: Option<bool>,
}

impl Expectations {
    /// Parse from JSON text
    pub fn from_json(json: &str) -> ExerciseResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse from YAML text
    pub fn from_yaml(yaml: &str) -> ExerciseResult<Self> {
        Ok(serde_yaml_ng::from_str(yaml)?)
    }

    /// Flag for one expectation, if set
    #[must_use]
    pub const fn get(&self, expectation: Expectation) -> Option<bool> {
        match expectation {
            Expectation::Present => self.is_present,
            Expectation::Displayed => self.is_displayed,
            Expectation::Enabled => self.is_enabled,
            Expectation::Valid => self.is_valid,
        }
    }

    fn set(&mut self, expectation: Expectation, value: bool) {
        let slot = match expectation {
            Expectation::Present => &mut self.is_present,
            Expectation::Displayed => &mut self.is_displayed,
            Expectation::Enabled => &mut self.is_enabled,
            Expectation::Valid => &mut self.is_valid,
        };
        *slot = Some(value);
    }
}

/// Possibly-partial exercise options
#[derive(Debug, Clone)]
pub struct ExerciseOptions<P> {
    instance: Option<P>,
    expectations: Expectations,
}

impl<P> Default for ExerciseOptions<P> {
    fn default() -> Self {
        Self {
            instance: None,
            expectations: Expectations::default(),
        }
    }
}

impl<P> ExerciseOptions<P> {
    /// Options with every field unset
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Component to exercise (default: a fresh default instance per invocation)
    #[must_use]
    pub fn instance(mut self, instance: P) -> Self {
        self.instance = Some(instance);
        self
    }

    /// Component to exercise; `None` means "not supplied"
    #[must_use]
    pub fn maybe_instance(mut self, instance: Option<P>) -> Self {
        self.instance = instance;
        self
    }

    /// Expected presence (default true)
    #[must_use]
    pub fn is_present(mut self, expected: bool) -> Self {
        self.expectations.set(Expectation::Present, expected);
        self
    }

    /// Expected visibility (default true)
    #[must_use]
    pub fn is_displayed(mut self, expected: bool) -> Self {
        self.expectations.set(Expectation::Displayed, expected);
        self
    }

    /// Expected enabled state (default true)
    #[must_use]
    pub fn is_enabled(mut self, expected: bool) -> Self {
        self.expectations.set(Expectation::Enabled, expected);
        self
    }

    /// Expected validity (default true)
    #[must_use]
    pub fn is_valid(mut self, expected: bool) -> Self {
        self.expectations.set(Expectation::Valid, expected);
        self
    }

    /// Merge flags; only the flags set in `expectations` override
    #[must_use]
    pub fn with_expectations(mut self, expectations: Expectations) -> Self {
        for expectation in Expectation::ALL {
            if let Some(value) = expectations.get(expectation) {
                self.expectations.set(expectation, value);
            }
        }
        self
    }

    /// Flags set so far
    #[must_use]
    pub const fn expectations(&self) -> &Expectations {
        &self.expectations
    }
}

impl<P: PageObject> ExerciseOptions<P> {
    /// Fill defaults, constructing a default instance if none was supplied
    #[must_use]
    pub fn resolve(self, driver: SharedDriver) -> ExerciseConfig<P> {
        let flag = |e: Expectation| self.expectations.get(e).unwrap_or(true);
        let is_present = flag(Expectation::Present);
        let is_displayed = flag(Expectation::Displayed);
        let is_enabled = flag(Expectation::Enabled);
        let is_valid = flag(Expectation::Valid);
        ExerciseConfig {
            instance: self
                .instance
                .unwrap_or_else(|| P::default_instance(driver)),
            is_present,
            is_displayed,
            is_enabled,
            is_valid,
        }
    }
}

/// Fully defaulted, immutable exercise configuration
#[derive(Debug, Clone)]
pub struct ExerciseConfig<P> {
    instance: P,
    is_present: bool,
    is_displayed: bool,
    is_enabled: bool,
    is_valid: bool,
}

impl<P> ExerciseConfig<P> {
    /// Component under exercise
    #[must_use]
    pub const fn instance(&self) -> &P {
        &self.instance
    }

    /// Expected value for one flag
    #[must_use]
    pub const fn expected(&self, expectation: Expectation) -> bool {
        match expectation {
            Expectation::Present => self.is_present,
            Expectation::Displayed => self.is_displayed,
            Expectation::Enabled => self.is_enabled,
            Expectation::Valid => self.is_valid,
        }
    }

    /// Every flag with its expected value, in registration order
    #[must_use]
    pub fn expectations(&self) -> [(Expectation, bool); 4] {
        Expectation::ALL.map(|e| (e, self.expected(e)))
    }
}

/// Register one case per configured flag on `suite`
pub fn register<P: PageObject>(suite: &mut SuiteBuilder, config: &ExerciseConfig<P>) {
    for (expectation, expected) in config.expectations() {
        let page = config.instance().clone();
        suite.it(expectation.description(expected), move || {
            let page = page.clone();
            async move {
                expect(expectation.query(&page))
                    .to_eventually_equal(expected)
                    .await
            }
        });
    }
}

/// Generic exercise for any page object
///
/// The returned callback may be invoked any number of times. Each
/// invocation resolves the options against that suite's driver, so omitted
/// instances are never shared between suites.
pub fn exercise<P: PageObject>(
    options: ExerciseOptions<P>,
) -> impl Fn(&mut SuiteBuilder) + Send + Sync + 'static {
    move |suite| {
        let config = options.clone().resolve(suite.driver());
        tracing::debug!(
            component = P::component_name(),
            handle = %config.instance().handle().id(),
            "registering exercise"
        );
        register(suite, &config);
    }
}
