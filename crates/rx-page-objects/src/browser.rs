//! Real browser control.
//!
//! With the `browser` feature, [`ChromiumDriver`] implements
//! [`ElementDriver`](crate::driver::ElementDriver) over the Chrome DevTools
//! Protocol via chromiumoxide. [`BrowserConfig`] is always available so
//! configuration can be loaded without a browser.

use serde::{Deserialize, Serialize};

/// Browser configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Run in headless mode
    pub headless: bool,
    /// Path to chromium binary (None = auto-detect)
    pub chromium_path: Option<String>,
    /// Sandbox mode (disable for containers)
    pub sandbox: bool,
    /// Prefix for relative URLs passed to `goto`
    pub base_url: Option<String>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            chromium_path: None,
            sandbox: true,
            base_url: None,
        }
    }
}

impl BrowserConfig {
    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set chromium path
    #[must_use]
    pub fn with_chromium_path(mut self, path: impl Into<String>) -> Self {
        self.chromium_path = Some(path.into());
        self
    }

    /// Disable sandbox (for containers/CI)
    #[must_use]
    pub const fn with_no_sandbox(mut self) -> Self {
        self.sandbox = false;
        self
    }

    /// Set the base URL for relative navigation
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Resolve `target` against the base URL
    ///
    /// Absolute URLs (anything with a scheme) pass through unchanged.
    #[must_use]
    pub fn url(&self, target: &str) -> String {
        match &self.base_url {
            Some(base) if !target.contains("://") => format!(
                "{}/{}",
                base.trim_end_matches('/'),
                target.trim_start_matches('/')
            ),
            _ => target.to_string(),
        }
    }
}

#[cfg(feature = "browser")]
mod cdp {
    use super::BrowserConfig;
    use crate::driver::{ElementDriver, ElementHandle};
    use crate::result::{ExerciseError, ExerciseResult};
    use async_trait::async_trait;
    use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
    use chromiumoxide::page::Page as CdpPage;
    use futures::StreamExt;
    use serde::de::DeserializeOwned;
    use serde::Deserialize;
    use tokio::sync::Mutex;

    #[derive(Deserialize)]
    struct Lookup<T> {
        found: bool,
        value: Option<T>,
    }

    #[derive(Deserialize)]
    struct RawElement {
        tag: String,
        text: Option<String>,
    }

    /// [`ElementDriver`] backed by a chromium page
    #[derive(Debug)]
    pub struct ChromiumDriver {
        config: BrowserConfig,
        browser: Mutex<CdpBrowser>,
        page: CdpPage,
        handler: tokio::task::JoinHandle<()>,
    }

    impl ChromiumDriver {
        /// Launch chromium and open a blank page
        pub async fn launch(config: BrowserConfig) -> ExerciseResult<Self> {
            let mut builder = CdpConfig::builder();
            if !config.headless {
                builder = builder.with_head();
            }
            if !config.sandbox {
                builder = builder.no_sandbox();
            }
            if let Some(ref path) = config.chromium_path {
                builder = builder.chrome_executable(path);
            }
            let cdp_config = builder
                .build()
                .map_err(|message| ExerciseError::BrowserLaunch { message })?;

            let (browser, mut handler) =
                CdpBrowser::launch(cdp_config)
                    .await
                    .map_err(|e| ExerciseError::BrowserLaunch {
                        message: e.to_string(),
                    })?;

            let handler = tokio::spawn(async move {
                while let Some(event) = handler.next().await {
                    if event.is_err() {
                        break;
                    }
                }
            });

            let page = browser
                .new_page("about:blank")
                .await
                .map_err(|e| ExerciseError::BrowserLaunch {
                    message: e.to_string(),
                })?;
            tracing::info!(headless = config.headless, "chromium launched");

            Ok(Self {
                config,
                browser: Mutex::new(browser),
                page,
                handler,
            })
        }

        /// Browser configuration
        #[must_use]
        pub const fn config(&self) -> &BrowserConfig {
            &self.config
        }

        /// Navigate to `target`, resolved against the base URL
        pub async fn goto(&self, target: &str) -> ExerciseResult<()> {
            let url = self.config.url(target);
            tracing::debug!(%url, "goto");
            let _ = self
                .page
                .goto(url.as_str())
                .await
                .map_err(|e| ExerciseError::Navigation {
                    url: url.clone(),
                    message: e.to_string(),
                })?;
            Ok(())
        }

        /// Close the browser
        pub async fn close(self) -> ExerciseResult<()> {
            let result = self.browser.lock().await.close().await;
            self.handler.abort();
            let _ = result.map_err(|e| ExerciseError::Driver {
                message: e.to_string(),
            })?;
            Ok(())
        }

        async fn eval<T: DeserializeOwned>(&self, script: String) -> ExerciseResult<T> {
            self.page
                .evaluate(script)
                .await
                .map_err(|e| ExerciseError::Driver {
                    message: e.to_string(),
                })?
                .into_value()
                .map_err(|e| ExerciseError::Driver {
                    message: e.to_string(),
                })
        }

        /// Evaluate `body` with `el` bound to the first match of `selector`
        async fn lookup<T: DeserializeOwned>(
            &self,
            selector: &str,
            body: &str,
        ) -> ExerciseResult<Lookup<T>> {
            let script = format!(
                "(() => {{ const el = document.querySelector({}); \
                 if (!el) return {{ found: false, value: null }}; \
                 return {{ found: true, value: {body} }}; }})()",
                serde_json::to_string(selector)?
            );
            self.eval(script).await
        }

        async fn read<T: DeserializeOwned>(&self, selector: &str, body: &str) -> ExerciseResult<T> {
            match self.lookup(selector, body).await? {
                Lookup {
                    found: true,
                    value: Some(value),
                } => Ok(value),
                Lookup { found: true, .. } => Err(ExerciseError::Driver {
                    message: format!("no value returned for {selector}"),
                }),
                Lookup { found: false, .. } => Err(ExerciseError::not_found(selector)),
            }
        }

        async fn element(&self, selector: &str) -> ExerciseResult<chromiumoxide::Element> {
            self.page
                .find_element(selector)
                .await
                .map_err(|_| ExerciseError::not_found(selector))
        }
    }

    #[async_trait]
    impl ElementDriver for ChromiumDriver {
        async fn find(&self, selector: &str) -> ExerciseResult<Option<ElementHandle>> {
            Ok(self.find_all(selector).await?.into_iter().next())
        }

        async fn find_all(&self, selector: &str) -> ExerciseResult<Vec<ElementHandle>> {
            let script = format!(
                "Array.from(document.querySelectorAll({})).map(el => \
                 ({{ tag: el.tagName.toLowerCase(), text: el.textContent }}))",
                serde_json::to_string(selector)?
            );
            let raw: Vec<RawElement> = self.eval(script).await?;
            Ok(raw
                .into_iter()
                .map(|r| ElementHandle {
                    selector: selector.to_string(),
                    tag_name: r.tag,
                    text_content: r.text,
                })
                .collect())
        }

        async fn click(&self, selector: &str) -> ExerciseResult<()> {
            let _ = self
                .element(selector)
                .await?
                .click()
                .await
                .map_err(|e| ExerciseError::Driver {
                    message: e.to_string(),
                })?;
            Ok(())
        }

        async fn type_text(&self, selector: &str, text: &str) -> ExerciseResult<()> {
            let _ = self
                .element(selector)
                .await?
                .type_str(text)
                .await
                .map_err(|e| ExerciseError::Driver {
                    message: e.to_string(),
                })?;
            Ok(())
        }

        async fn clear(&self, selector: &str) -> ExerciseResult<()> {
            self.read::<bool>(
                selector,
                "(() => { el.value = ''; \
                 el.dispatchEvent(new Event('input', { bubbles: true })); \
                 return true; })()",
            )
            .await
            .map(|_| ())
        }

        async fn get_attribute(&self, selector: &str, name: &str) -> ExerciseResult<Option<String>> {
            let body = format!("el.getAttribute({})", serde_json::to_string(name)?);
            let lookup: Lookup<String> = self.lookup(selector, &body).await?;
            if lookup.found {
                Ok(lookup.value)
            } else {
                Err(ExerciseError::not_found(selector))
            }
        }

        async fn get_text(&self, selector: &str) -> ExerciseResult<String> {
            self.read(selector, "el.innerText ?? el.textContent ?? ''").await
        }

        async fn is_enabled(&self, selector: &str) -> ExerciseResult<bool> {
            self.read(selector, "!el.disabled && !el.hasAttribute('disabled')")
                .await
        }

        async fn is_displayed(&self, selector: &str) -> ExerciseResult<bool> {
            self.read(
                selector,
                "(() => { const s = getComputedStyle(el); \
                 return s.display !== 'none' && s.visibility !== 'hidden' \
                 && el.getClientRects().length > 0; })()",
            )
            .await
        }
    }
}

#[cfg(feature = "browser")]
pub use cdp::ChromiumDriver;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BrowserConfig::default();
        assert!(config.headless);
        assert!(config.sandbox);
        assert!(config.chromium_path.is_none());
    }

    #[test]
    fn test_builder() {
        let config = BrowserConfig::default()
            .with_headless(false)
            .with_no_sandbox()
            .with_chromium_path("/usr/bin/chromium");
        assert!(!config.headless);
        assert!(!config.sandbox);
        assert_eq!(config.chromium_path.as_deref(), Some("/usr/bin/chromium"));
    }

    #[test]
    fn test_url_resolution() {
        let config = BrowserConfig::default().with_base_url("http://localhost:9001/");
        assert_eq!(
            config.url("/components/rxDatePicker"),
            "http://localhost:9001/components/rxDatePicker"
        );
        assert_eq!(config.url("https://example.com/a"), "https://example.com/a");
        assert_eq!(BrowserConfig::default().url("/a"), "/a");
    }
}
