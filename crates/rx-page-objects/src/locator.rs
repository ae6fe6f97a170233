//! Locator abstraction for selecting widget elements.
//!
//! Page objects never hand raw selector strings to the driver; they build
//! a [`Locator`] for the widget root and derive scoped child locators from
//! it, so every lookup for one widget stays inside that widget's subtree.

/// A locator for one element, optionally scoped under a parent element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    css: String,
}

impl Locator {
    /// Create a new locator with a CSS selector
    #[must_use]
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            css: selector.into(),
        }
    }

    /// Descendant locator scoped under this one
    ///
    /// `Locator::new("#dpSimple").child(".popup")` selects `#dpSimple .popup`.
    #[must_use]
    pub fn child(&self, selector: &str) -> Self {
        Self {
            css: format!("{} {selector}", self.css),
        }
    }

    /// Full CSS selector string
    #[must_use]
    pub fn css(&self) -> &str {
        &self.css
    }
}

impl std::fmt::Display for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.css)
    }
}
