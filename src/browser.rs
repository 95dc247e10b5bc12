//! Browser session over the Chrome DevTools Protocol
//!
//! [`UiSession`] owns a headless Chrome instance and one page pointed at
//! the application base URL. All DOM access goes through `page.evaluate`;
//! string arguments are JSON-escaped before being spliced into scripts.
//!
//! The target application renders elements off-screen and asynchronously,
//! so every interaction follows the same three-phase pattern: wait for the
//! element to exist (10s bound), scroll it into view, wait for it to be
//! displayed (5s bound), then act. Skipping any phase makes interactions
//! flaky.

use std::time::Duration;

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::Page;
use futures::StreamExt;
use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::error::{E2eError, E2eResult};
use crate::wait;

/// Element locator, mirroring the selector styles the application's test
/// surface is built around.
#[derive(Debug, Clone)]
pub enum Target {
    /// CSS selector, e.g. `input[name="email"]` or `[data-testid="note-view"]`.
    Css(String),
    /// Element of `tag` whose trimmed text equals `text` (a button labelled
    /// "Login", a `b` element carrying a success banner).
    Text { tag: String, text: String },
    /// First match of `css` whose text contains `text` (a note card title
    /// containing the generated title).
    ContainsText { css: String, text: String },
}

impl Target {
    pub fn css(selector: impl Into<String>) -> Self {
        Target::Css(selector.into())
    }

    pub fn button(text: impl Into<String>) -> Self {
        Target::Text {
            tag: "button".into(),
            text: text.into(),
        }
    }

    pub fn text(tag: impl Into<String>, text: impl Into<String>) -> Self {
        Target::Text {
            tag: tag.into(),
            text: text.into(),
        }
    }

    pub fn contains_text(css: impl Into<String>, text: impl Into<String>) -> Self {
        Target::ContainsText {
            css: css.into(),
            text: text.into(),
        }
    }

    /// JS expression resolving to the element or a falsy value.
    fn locator(&self) -> String {
        match self {
            Target::Css(sel) => format!("document.querySelector({})", js_str(sel)),
            Target::Text { tag, text } => format!(
                "[...document.querySelectorAll({})].find(el => el.textContent.trim() === {})",
                js_str(tag),
                js_str(text)
            ),
            Target::ContainsText { css, text } => format!(
                "[...document.querySelectorAll({})].find(el => el.textContent.includes({}))",
                js_str(css),
                js_str(text)
            ),
        }
    }

    fn describe(&self) -> String {
        match self {
            Target::Css(sel) => sel.clone(),
            Target::Text { tag, text } => format!("{tag}={text}"),
            Target::ContainsText { css, text } => format!("{css}*={text}"),
        }
    }
}

/// JSON-escape a string for splicing into a script.
fn js_str(s: &str) -> String {
    Value::String(s.to_string()).to_string()
}

/// A launched headless browser plus the single page scenarios drive.
pub struct UiSession {
    browser: Browser,
    handler_task: JoinHandle<()>,
    page: Page,
    base_url: String,
}

impl UiSession {
    /// Launch headless Chrome with a desktop viewport and open one blank
    /// page. Fails with [`E2eError::Browser`] when Chrome is unavailable.
    pub async fn launch(app_base_url: &str) -> E2eResult<Self> {
        let config = BrowserConfig::builder()
            .window_size(1280, 720)
            .build()
            .map_err(E2eError::Browser)?;

        let (browser, mut handler) = Browser::launch(config).await?;
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let page = browser.new_page("about:blank").await?;

        Ok(Self {
            browser,
            handler_task,
            page,
            base_url: app_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Shut the browser down. Best-effort: scenarios call this in teardown
    /// and a failure to close must not mask the primary outcome.
    pub async fn close(mut self) {
        let _ = self.browser.close().await;
        let _ = self.browser.wait().await;
        self.handler_task.abort();
    }

    // --- navigation ---

    /// Navigate to a path under the application base URL (or an absolute
    /// URL when given one).
    pub async fn goto(&self, path: &str) -> E2eResult<()> {
        let url = if path.starts_with("http") {
            path.to_string()
        } else {
            format!("{}{}", self.base_url, path)
        };
        debug!(%url, "navigate");
        self.page.goto(url).await?;
        Ok(())
    }

    pub async fn refresh(&self) -> E2eResult<()> {
        self.page.reload().await?;
        Ok(())
    }

    pub async fn title(&self) -> E2eResult<String> {
        Ok(self.page.get_title().await?.unwrap_or_default())
    }

    pub async fn current_url(&self) -> E2eResult<String> {
        Ok(self.page.url().await?.unwrap_or_default())
    }

    // --- script evaluation ---

    async fn eval(&self, script: &str) -> E2eResult<Value> {
        let result = self.page.evaluate(script).await?;
        Ok(result.into_value()?)
    }

    /// Run a script against the target element. Returns `None` when the
    /// element is not in the DOM, otherwise the expression's value.
    async fn probe(&self, target: &Target, expr: &str) -> E2eResult<Option<Value>> {
        let script = format!(
            "(() => {{ const el = {}; if (!el) return {{ found: false }}; \
             return {{ found: true, value: ({expr}) }}; }})()",
            target.locator()
        );
        let reply = self.eval(&script).await?;
        if reply["found"].as_bool() == Some(true) {
            Ok(Some(reply["value"].clone()))
        } else {
            Ok(None)
        }
    }

    // --- element state ---

    pub async fn exists(&self, target: &Target) -> E2eResult<bool> {
        Ok(self.probe(target, "true").await?.is_some())
    }

    pub async fn displayed(&self, target: &Target) -> E2eResult<bool> {
        let expr = "(() => { const r = el.getBoundingClientRect(); \
                    const s = window.getComputedStyle(el); \
                    return r.width > 0 && r.height > 0 && \
                    s.display !== 'none' && s.visibility !== 'hidden'; })()";
        Ok(self
            .probe(target, expr)
            .await?
            .and_then(|v| v.as_bool())
            .unwrap_or(false))
    }

    pub async fn text(&self, target: &Target) -> E2eResult<String> {
        let value = self
            .probe(target, "el.textContent.trim()")
            .await?
            .ok_or_else(|| missing(target))?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    pub async fn attribute(&self, target: &Target, name: &str) -> E2eResult<Option<String>> {
        let expr = format!("el.getAttribute({})", js_str(name));
        let value = self
            .probe(target, &expr)
            .await?
            .ok_or_else(|| missing(target))?;
        Ok(value.as_str().map(str::to_string))
    }

    /// Whether a checkbox/switch input is currently selected.
    pub async fn is_checked(&self, target: &Target) -> E2eResult<bool> {
        let value = self
            .probe(target, "!!el.checked")
            .await?
            .ok_or_else(|| missing(target))?;
        Ok(value.as_bool().unwrap_or(false))
    }

    /// Computed CSS property of the element, e.g. `background-color`.
    pub async fn css_value(&self, target: &Target, property: &str) -> E2eResult<String> {
        let expr = format!(
            "window.getComputedStyle(el).getPropertyValue({})",
            js_str(property)
        );
        let value = self
            .probe(target, &expr)
            .await?
            .ok_or_else(|| missing(target))?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    pub async fn local_storage(&self, key: &str) -> E2eResult<Option<String>> {
        let script = format!("window.localStorage.getItem({})", js_str(key));
        let value = self.eval(&script).await?;
        Ok(value.as_str().map(str::to_string))
    }

    // --- waits ---

    /// Wait (existence bound) until the target is in the DOM, then (display
    /// bound) until it is visible.
    pub async fn wait_displayed(&self, target: &Target) -> E2eResult<()> {
        let desc = target.describe();
        wait::until(
            &format!("{desc} to exist"),
            wait::EXIST_TIMEOUT,
            wait::POLL_INTERVAL,
            || self.exists(target),
        )
        .await?;
        wait::until(
            &format!("{desc} to be displayed"),
            wait::DISPLAY_TIMEOUT,
            wait::POLL_INTERVAL,
            || self.displayed(target),
        )
        .await
    }

    /// Wait until a boolean script expression holds, bounded by `timeout`.
    pub async fn wait_until(&self, what: &str, timeout: Duration, expr: &str) -> E2eResult<()> {
        let script = format!("!!({expr})");
        wait::until(what, timeout, wait::POLL_INTERVAL, || async {
            Ok(self.eval(&script).await?.as_bool().unwrap_or(false))
        })
        .await
    }

    /// The shared preamble of every interaction: exist, scroll to center,
    /// displayed.
    async fn prepare(&self, target: &Target) -> E2eResult<()> {
        let desc = target.describe();
        wait::until(
            &format!("{desc} to exist"),
            wait::EXIST_TIMEOUT,
            wait::POLL_INTERVAL,
            || self.exists(target),
        )
        .await?;
        self.probe(
            target,
            "(el.scrollIntoView({ block: 'center', inline: 'center' }), true)",
        )
        .await?;
        wait::until(
            &format!("{desc} to be displayed"),
            wait::DISPLAY_TIMEOUT,
            wait::POLL_INTERVAL,
            || self.displayed(target),
        )
        .await
    }

    // --- interactions ---

    pub async fn scroll_and_click(&self, target: &Target) -> E2eResult<()> {
        self.prepare(target).await?;
        self.probe(target, "(el.click(), true)")
            .await?
            .ok_or_else(|| missing(target))?;
        Ok(())
    }

    /// Set an input or textarea value through the native value setter and
    /// fire an `input` event, so framework-controlled fields observe it.
    pub async fn scroll_and_set_value(&self, target: &Target, value: &str) -> E2eResult<()> {
        self.prepare(target).await?;
        let expr = format!(
            "(() => {{ \
             const proto = el instanceof HTMLTextAreaElement \
                 ? HTMLTextAreaElement.prototype : HTMLInputElement.prototype; \
             Object.getOwnPropertyDescriptor(proto, 'value').set.call(el, {value}); \
             el.dispatchEvent(new Event('input', {{ bubbles: true }})); \
             return true; }})()",
            value = js_str(value)
        );
        self.probe(target, &expr)
            .await?
            .ok_or_else(|| missing(target))?;
        Ok(())
    }

    /// Choose an option in a `select` element and fire a `change` event.
    pub async fn scroll_and_select(&self, target: &Target, value: &str) -> E2eResult<()> {
        self.prepare(target).await?;
        let expr = format!(
            "(() => {{ \
             Object.getOwnPropertyDescriptor(HTMLSelectElement.prototype, 'value') \
                 .set.call(el, {value}); \
             el.dispatchEvent(new Event('change', {{ bubbles: true }})); \
             return true; }})()",
            value = js_str(value)
        );
        self.probe(target, &expr)
            .await?
            .ok_or_else(|| missing(target))?;
        Ok(())
    }

    /// Scroll the whole page to the bottom; some submit buttons render
    /// below the fold.
    pub async fn scroll_to_bottom(&self) -> E2eResult<()> {
        self.eval("(window.scrollTo(0, document.body.scrollHeight), true)")
            .await?;
        Ok(())
    }
}

fn missing(target: &Target) -> E2eError {
    E2eError::AssertionFailed(format!("element disappeared: {}", target.describe()))
}
