//! ElementDriver - Abstract Browser Automation Trait
//!
//! Page objects talk to the page only through [`ElementDriver`], the small
//! capability set `{find, click, type, clear, attribute, text, enabled, displayed}`
//! that every automation backend can offer.
//!
//! # Implementations
//!
//! - `ChromiumDriver` - CDP via chromiumoxide (feature `browser`)
//! - [`MockDriver`] - in-memory document for unit tests and demos

use crate::result::{ExerciseError, ExerciseResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Shared, non-owning access to the live document
pub type SharedDriver = Arc<dyn ElementDriver>;

/// Snapshot of an element returned by a lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementHandle {
    /// Selector the element was found with
    pub selector: String,
    /// Element tag name
    pub tag_name: String,
    /// Element text content
    pub text_content: Option<String>,
}

/// Abstract driver trait for element queries and interactions
///
/// Every method other than [`find`](ElementDriver::find) and
/// [`find_all`](ElementDriver::find_all) rejects with
/// [`ExerciseError::ElementNotFound`] when the selector matches nothing.
#[async_trait]
pub trait ElementDriver: Send + Sync + std::fmt::Debug {
    /// Query the first element matching a selector
    async fn find(&self, selector: &str) -> ExerciseResult<Option<ElementHandle>>;

    /// Query all matching elements
    async fn find_all(&self, selector: &str) -> ExerciseResult<Vec<ElementHandle>>;

    /// Click element
    async fn click(&self, selector: &str) -> ExerciseResult<()>;

    /// Type text into element
    async fn type_text(&self, selector: &str, text: &str) -> ExerciseResult<()>;

    /// Clear the value of an input element
    async fn clear(&self, selector: &str) -> ExerciseResult<()>;

    /// Read an attribute (`None` when the attribute is absent)
    async fn get_attribute(&self, selector: &str, name: &str) -> ExerciseResult<Option<String>>;

    /// Read the visible text of an element
    async fn get_text(&self, selector: &str) -> ExerciseResult<String>;

    /// Whether the element is enabled
    async fn is_enabled(&self, selector: &str) -> ExerciseResult<bool>;

    /// Whether the element is displayed
    async fn is_displayed(&self, selector: &str) -> ExerciseResult<bool>;
}

/// An element in the [`MockDriver`] document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockElement {
    /// Exact selector this element answers to
    pub selector: String,
    /// Tag name
    pub tag_name: String,
    /// Visible text
    pub text: String,
    /// Attributes (classes live under `class`)
    pub attributes: HashMap<String, String>,
    /// Enabled state
    pub enabled: bool,
    /// Displayed state
    pub displayed: bool,
}

impl MockElement {
    /// Create an enabled, displayed `div` answering to `selector`
    #[must_use]
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            tag_name: "div".to_string(),
            text: String::new(),
            attributes: HashMap::new(),
            enabled: true,
            displayed: true,
        }
    }

    /// Set the tag name
    #[must_use]
    pub fn tag(mut self, tag_name: impl Into<String>) -> Self {
        self.tag_name = tag_name.into();
        self
    }

    /// Set the visible text
    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Set an attribute
    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let _ = self.attributes.insert(name.into(), value.into());
        self
    }

    /// Add a class
    #[must_use]
    pub fn class(mut self, class: &str) -> Self {
        self.add_class(class);
        self
    }

    /// Mark as disabled
    #[must_use]
    pub const fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Mark as hidden
    #[must_use]
    pub const fn hidden(mut self) -> Self {
        self.displayed = false;
        self
    }

    /// Add a class in place
    pub fn add_class(&mut self, class: &str) {
        let entry = self.attributes.entry("class".to_string()).or_default();
        if !entry.split_whitespace().any(|c| c == class) {
            if !entry.is_empty() {
                entry.push(' ');
            }
            entry.push_str(class);
        }
    }

    /// Remove a class in place
    pub fn remove_class(&mut self, class: &str) {
        if let Some(entry) = self.attributes.get_mut("class") {
            *entry = entry
                .split_whitespace()
                .filter(|c| *c != class)
                .collect::<Vec<_>>()
                .join(" ");
        }
    }

    fn handle(&self) -> ElementHandle {
        ElementHandle {
            selector: self.selector.clone(),
            tag_name: self.tag_name.clone(),
            text_content: Some(self.text.clone()),
        }
    }
}

/// Mutable view of the mock document, handed to click reactions
#[derive(Debug, Default)]
pub struct MockDom {
    elements: Vec<MockElement>,
}

impl MockDom {
    /// Insert an element
    pub fn insert(&mut self, element: MockElement) {
        self.elements.push(element);
    }

    /// Remove every element answering to `selector`
    pub fn remove(&mut self, selector: &str) {
        self.elements.retain(|e| e.selector != selector);
    }

    /// Remove every element whose selector satisfies `predicate`
    pub fn remove_where<F: Fn(&str) -> bool>(&mut self, predicate: F) {
        self.elements.retain(|e| !predicate(&e.selector));
    }

    /// First element answering to `selector`
    #[must_use]
    pub fn element(&self, selector: &str) -> Option<&MockElement> {
        self.elements.iter().find(|e| e.selector == selector)
    }

    /// Mutable access to the first element answering to `selector`
    pub fn element_mut(&mut self, selector: &str) -> Option<&mut MockElement> {
        self.elements.iter_mut().find(|e| e.selector == selector)
    }

    /// Set displayed state (no-op for unknown selectors)
    pub fn set_displayed(&mut self, selector: &str, displayed: bool) {
        if let Some(element) = self.element_mut(selector) {
            element.displayed = displayed;
        }
    }

    /// Set enabled state (no-op for unknown selectors)
    pub fn set_enabled(&mut self, selector: &str, enabled: bool) {
        if let Some(element) = self.element_mut(selector) {
            element.enabled = enabled;
        }
    }

    /// Set visible text (no-op for unknown selectors)
    pub fn set_text(&mut self, selector: &str, text: impl Into<String>) {
        if let Some(element) = self.element_mut(selector) {
            element.text = text.into();
        }
    }

    fn require(&self, selector: &str) -> ExerciseResult<&MockElement> {
        self.element(selector)
            .ok_or_else(|| ExerciseError::not_found(selector))
    }
}

type Matcher = Arc<dyn Fn(&str) -> bool + Send + Sync>;
type Reaction = Arc<dyn Fn(&mut MockDom, &str) + Send + Sync>;

#[derive(Clone)]
struct ClickReaction {
    matches: Matcher,
    react: Reaction,
}

/// Mock driver for unit testing
///
/// Selectors match by exact string; a click on an enabled element runs the
/// reactions registered for its selector, which may mutate the document.
#[derive(Default)]
pub struct MockDriver {
    dom: Mutex<MockDom>,
    reactions: Mutex<Vec<ClickReaction>>,
    call_history: Mutex<Vec<String>>,
    queries: AtomicUsize,
}

impl std::fmt::Debug for MockDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockDriver")
            .field("elements", &lock(&self.dom).elements.len())
            .field("queries", &self.query_count())
            .finish()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockDriver {
    /// Create new mock driver
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a mock element
    #[must_use]
    pub fn with_element(self, element: MockElement) -> Self {
        self.add_element(element);
        self
    }

    /// Add a mock element
    pub fn add_element(&self, element: MockElement) {
        lock(&self.dom).insert(element);
    }

    /// Remove a mock element, simulating it leaving the document
    pub fn remove_element(&self, selector: &str) {
        lock(&self.dom).remove(selector);
    }

    /// Register a reaction to run when `selector` is clicked
    pub fn on_click<F>(&self, selector: impl Into<String>, reaction: F)
    where
        F: Fn(&mut MockDom) + Send + Sync + 'static,
    {
        let selector = selector.into();
        self.on_click_where(move |s| s == selector, move |dom, _| reaction(dom));
    }

    /// Register a reaction for every clicked selector satisfying `matches`;
    /// the reaction receives the clicked selector
    pub fn on_click_where<M, F>(&self, matches: M, reaction: F)
    where
        M: Fn(&str) -> bool + Send + Sync + 'static,
        F: Fn(&mut MockDom, &str) + Send + Sync + 'static,
    {
        lock(&self.reactions).push(ClickReaction {
            matches: Arc::new(matches),
            react: Arc::new(reaction),
        });
    }

    /// Mutate the document directly
    pub fn update<F: FnOnce(&mut MockDom)>(&self, f: F) {
        f(&mut lock(&self.dom));
    }

    /// Read a copy of an element
    #[must_use]
    pub fn element(&self, selector: &str) -> Option<MockElement> {
        lock(&self.dom).element(selector).cloned()
    }

    /// Get call history
    #[must_use]
    pub fn history(&self) -> Vec<String> {
        lock(&self.call_history).clone()
    }

    /// Check if method was called
    #[must_use]
    pub fn was_called(&self, call: &str) -> bool {
        lock(&self.call_history).iter().any(|c| c.starts_with(call))
    }

    /// Number of driver calls issued so far
    #[must_use]
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    /// Forget recorded calls
    pub fn clear_history(&self) {
        lock(&self.call_history).clear();
        self.queries.store(0, Ordering::SeqCst);
    }

    fn record(&self, call: String) {
        let _ = self.queries.fetch_add(1, Ordering::SeqCst);
        lock(&self.call_history).push(call);
    }
}

#[async_trait]
impl ElementDriver for MockDriver {
    async fn find(&self, selector: &str) -> ExerciseResult<Option<ElementHandle>> {
        self.record(format!("find:{selector}"));
        Ok(lock(&self.dom).element(selector).map(MockElement::handle))
    }

    async fn find_all(&self, selector: &str) -> ExerciseResult<Vec<ElementHandle>> {
        self.record(format!("find_all:{selector}"));
        Ok(lock(&self.dom)
            .elements
            .iter()
            .filter(|e| e.selector == selector)
            .map(MockElement::handle)
            .collect())
    }

    async fn click(&self, selector: &str) -> ExerciseResult<()> {
        self.record(format!("click:{selector}"));
        let enabled = lock(&self.dom).require(selector)?.enabled;
        if !enabled {
            return Ok(());
        }
        let reactions: Vec<ClickReaction> = lock(&self.reactions)
            .iter()
            .filter(|r| (r.matches)(selector))
            .cloned()
            .collect();
        let mut dom = lock(&self.dom);
        for reaction in reactions {
            (reaction.react)(&mut dom, selector);
        }
        Ok(())
    }

    async fn type_text(&self, selector: &str, text: &str) -> ExerciseResult<()> {
        self.record(format!("type_text:{selector}:{text}"));
        let mut dom = lock(&self.dom);
        let element = dom
            .element_mut(selector)
            .ok_or_else(|| ExerciseError::not_found(selector))?;
        if element.enabled {
            element
                .attributes
                .entry("value".to_string())
                .or_default()
                .push_str(text);
        }
        Ok(())
    }

    async fn clear(&self, selector: &str) -> ExerciseResult<()> {
        self.record(format!("clear:{selector}"));
        let mut dom = lock(&self.dom);
        let element = dom
            .element_mut(selector)
            .ok_or_else(|| ExerciseError::not_found(selector))?;
        if element.enabled {
            let _ = element.attributes.remove("value");
        }
        Ok(())
    }

    async fn get_attribute(&self, selector: &str, name: &str) -> ExerciseResult<Option<String>> {
        self.record(format!("get_attribute:{selector}:{name}"));
        Ok(lock(&self.dom)
            .require(selector)?
            .attributes
            .get(name)
            .cloned())
    }

    async fn get_text(&self, selector: &str) -> ExerciseResult<String> {
        self.record(format!("get_text:{selector}"));
        Ok(lock(&self.dom).require(selector)?.text.clone())
    }

    async fn is_enabled(&self, selector: &str) -> ExerciseResult<bool> {
        self.record(format!("is_enabled:{selector}"));
        Ok(lock(&self.dom).require(selector)?.enabled)
    }

    async fn is_displayed(&self, selector: &str) -> ExerciseResult<bool> {
        self.record(format!("is_displayed:{selector}"));
        Ok(lock(&self.dom).require(selector)?.displayed)
    }
}
