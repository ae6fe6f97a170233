//! Page Object Model Support
//!
//! A page object wraps one widget instance behind a typed API. It holds a
//! [`ComponentHandle`]: a non-owning reference made of the shared driver,
//! the widget's root [`Locator`], and an identity. Every query goes back to
//! the live document; nothing about element state is cached.

use crate::driver::{ElementHandle, SharedDriver};
use crate::locator::Locator;
use crate::result::{ExerciseError, ExerciseResult};
use async_trait::async_trait;
use uuid::Uuid;

/// Class the widget library puts on a root whose model fails validation
pub const INVALID_CLASS: &str = "ng-invalid";

/// Opaque reference to a live UI element
#[derive(Debug, Clone)]
pub struct ComponentHandle {
    id: Uuid,
    driver: SharedDriver,
    locator: Locator,
}

impl ComponentHandle {
    /// Bind a new handle to `locator`; issues no queries
    #[must_use]
    pub fn new(driver: SharedDriver, locator: Locator) -> Self {
        Self {
            id: Uuid::new_v4(),
            driver,
            locator,
        }
    }

    /// Identity of this handle; clones share it, new handles never do
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Root locator
    #[must_use]
    pub const fn locator(&self) -> &Locator {
        &self.locator
    }

    /// Driver this handle queries through
    #[must_use]
    pub fn driver(&self) -> SharedDriver {
        SharedDriver::clone(&self.driver)
    }

    /// Handle for a descendant element, scoped under this one
    #[must_use]
    pub fn child(&self, selector: &str) -> Self {
        Self::new(self.driver(), self.locator.child(selector))
    }

    /// Resolve the element, failing with `ElementNotFound` when it is gone
    pub async fn find(&self) -> ExerciseResult<ElementHandle> {
        self.driver
            .find(self.locator.css())
            .await?
            .ok_or_else(|| ExerciseError::not_found(self.locator.css()))
    }

    /// Whether the element currently exists in the document
    pub async fn is_present(&self) -> ExerciseResult<bool> {
        Ok(self.driver.find(self.locator.css()).await?.is_some())
    }

    /// Whether the element is displayed
    pub async fn is_displayed(&self) -> ExerciseResult<bool> {
        self.driver.is_displayed(self.locator.css()).await
    }

    /// Whether the element is enabled
    pub async fn is_enabled(&self) -> ExerciseResult<bool> {
        self.driver.is_enabled(self.locator.css()).await
    }

    /// Dispatch a click; resolves once dispatched, not once the UI settles
    pub async fn click(&self) -> ExerciseResult<()> {
        tracing::debug!(selector = %self.locator, "click");
        self.driver.click(self.locator.css()).await
    }

    /// Type text into the element
    pub async fn type_text(&self, text: &str) -> ExerciseResult<()> {
        tracing::debug!(selector = %self.locator, text, "type");
        self.driver.type_text(self.locator.css(), text).await
    }

    /// Clear the element's value
    pub async fn clear(&self) -> ExerciseResult<()> {
        tracing::debug!(selector = %self.locator, "clear");
        self.driver.clear(self.locator.css()).await
    }

    /// Read an attribute
    pub async fn attribute(&self, name: &str) -> ExerciseResult<Option<String>> {
        self.driver.get_attribute(self.locator.css(), name).await
    }

    /// Read the visible text, trimmed
    pub async fn text(&self) -> ExerciseResult<String> {
        let text = self.driver.get_text(self.locator.css()).await?;
        Ok(text.trim().to_string())
    }

    /// Whether the element carries a class
    pub async fn has_class(&self, class: &str) -> ExerciseResult<bool> {
        let classes = self.attribute("class").await?.unwrap_or_default();
        Ok(classes.split_whitespace().any(|c| c == class))
    }
}

/// Trait for page objects wrapping a single widget.
///
/// Implementors supply construction and the handle; the four state queries
/// used by exercises default to generic DOM reads and may be overridden.
///
/// # Example
///
/// ```ignore
/// #[derive(Debug, Clone)]
/// struct RxCheckbox {
///     handle: ComponentHandle,
/// }
///
/// impl PageObject for RxCheckbox {
///     fn component_name() -> &'static str {
///         "rxCheckbox"
///     }
///
///     fn default_locator() -> Locator {
///         Locator::new("input[rx-checkbox]")
///     }
///
///     fn from_handle(handle: ComponentHandle) -> Self {
///         Self { handle }
///     }
///
///     fn handle(&self) -> &ComponentHandle {
///         &self.handle
///     }
/// }
/// ```
#[async_trait]
pub trait PageObject: Clone + Send + Sync + std::fmt::Debug + 'static {
    /// Widget name used in suite titles
    fn component_name() -> &'static str;

    /// Root locator of the first instance on the page
    fn default_locator() -> Locator;

    /// Wrap an existing handle
    fn from_handle(handle: ComponentHandle) -> Self;

    /// Underlying handle
    fn handle(&self) -> &ComponentHandle;

    /// Construct an instance bound to [`default_locator`](PageObject::default_locator)
    fn default_instance(driver: SharedDriver) -> Self {
        Self::from_handle(ComponentHandle::new(driver, Self::default_locator()))
    }

    /// Whether the widget exists in the document; never `ElementNotFound`
    async fn is_present(&self) -> ExerciseResult<bool> {
        self.handle().is_present().await
    }

    /// Whether the widget is displayed
    async fn is_displayed(&self) -> ExerciseResult<bool> {
        self.handle().is_displayed().await
    }

    /// Whether the widget is enabled
    async fn is_enabled(&self) -> ExerciseResult<bool> {
        self.handle().is_enabled().await
    }

    /// Whether the widget's model is valid
    async fn is_valid(&self) -> ExerciseResult<bool> {
        Ok(!self.handle().has_class(INVALID_CLASS).await?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::driver::{MockDriver, MockElement};
    use std::sync::Arc;

    #[derive(Debug, Clone)]
    struct TestWidget {
        handle: ComponentHandle,
    }

    impl PageObject for TestWidget {
        fn component_name() -> &'static str {
            "testWidget"
        }

        fn default_locator() -> Locator {
            Locator::new("test-widget")
        }

        fn from_handle(handle: ComponentHandle) -> Self {
            Self { handle }
        }

        fn handle(&self) -> &ComponentHandle {
            &self.handle
        }
    }

    fn driver() -> Arc<MockDriver> {
        Arc::new(
            MockDriver::new()
                .with_element(MockElement::new("test-widget").class("ng-valid"))
                .with_element(MockElement::new("test-widget .label").text("  Label \n"))
                .with_element(
                    MockElement::new("#broken")
                        .class("ng-invalid")
                        .disabled()
                        .hidden(),
                ),
        )
    }

    mod component_handle_tests {
        use super::*;

        #[test]
        fn test_new_handles_have_distinct_ids() {
            let driver: SharedDriver = driver();
            let a = ComponentHandle::new(SharedDriver::clone(&driver), Locator::new("x"));
            let b = ComponentHandle::new(driver, Locator::new("x"));
            assert_ne!(a.id(), b.id());
            assert_eq!(a.clone().id(), a.id());
        }

        #[tokio::test]
        async fn test_child_scoping_and_text() {
            let handle = ComponentHandle::new(driver(), Locator::new("test-widget"));
            let label = handle.child(".label");
            assert_eq!(label.locator().css(), "test-widget .label");
            assert_eq!(label.text().await.unwrap(), "Label");
        }

        #[tokio::test]
        async fn test_find_missing_is_not_found() {
            let handle = ComponentHandle::new(driver(), Locator::new("#gone"));
            let err = handle.find().await.unwrap_err();
            assert!(matches!(err, ExerciseError::ElementNotFound { .. }));
            assert!(!handle.is_present().await.unwrap());
        }

        #[tokio::test]
        async fn test_has_class() {
            let handle = ComponentHandle::new(driver(), Locator::new("#broken"));
            assert!(handle.has_class("ng-invalid").await.unwrap());
            assert!(!handle.has_class("ng-valid").await.unwrap());
        }

        #[test]
        fn test_construction_issues_no_queries() {
            let mock = driver();
            let handle = ComponentHandle::new(mock.clone(), Locator::new("test-widget"));
            let _ = handle.child(".label");
            assert_eq!(mock.query_count(), 0);
        }
    }

    mod page_object_trait_tests {
        use super::*;

        #[tokio::test]
        async fn test_default_instance_state() {
            let widget = TestWidget::default_instance(driver());
            assert_eq!(widget.handle().locator().css(), "test-widget");
            assert!(widget.is_present().await.unwrap());
            assert!(widget.is_displayed().await.unwrap());
            assert!(widget.is_enabled().await.unwrap());
            assert!(widget.is_valid().await.unwrap());
        }

        #[tokio::test]
        async fn test_broken_widget_state() {
            let handle = ComponentHandle::new(driver(), Locator::new("#broken"));
            let widget = TestWidget::from_handle(handle);
            assert!(!widget.is_displayed().await.unwrap());
            assert!(!widget.is_enabled().await.unwrap());
            assert!(!widget.is_valid().await.unwrap());
        }

        #[tokio::test]
        async fn test_queries_reject_once_element_is_gone() {
            let mock = driver();
            let widget = TestWidget::default_instance(mock.clone());
            mock.remove_element("test-widget");
            assert!(!widget.is_present().await.unwrap());
            assert!(widget.is_enabled().await.is_err());
            assert!(widget.is_valid().await.is_err());
        }
    }
}
