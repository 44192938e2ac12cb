//! Chromium adapter over the Chrome DevTools Protocol.
//!
//! `chromiumoxide` is async; the probe is not. [`CdpDriver`] owns a tokio
//! runtime and blocks on every protocol call, so the rest of the crate only
//! ever sees the synchronous [`UiDriver`] contract.
//!
//! Elements are addressed by a `data-probe-id` attribute stamped on every
//! node returned from [`UiDriver::find_all`]. When the application re-renders
//! and drops a stamped node, lookups by that id come back empty and surface as
//! [`ProbeError::StaleElement`].

use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
use chromiumoxide::cdp::browser_protocol::page::{CaptureScreenshotFormat, CaptureScreenshotParams};
use chromiumoxide::page::Page as CdpPage;
use futures::StreamExt;
use serde_json::Value;
use tokio::runtime::Runtime;

use crate::driver::{DriverConfig, ElementHandle, UiDriver};
use crate::locator::{js_string, Selector};
use crate::result::{ProbeError, ProbeResult};

/// Attribute carrying the probe's element ids
const PROBE_ATTR: &str = "data-probe-id";

/// Marker object returned by scripts when a stamped node is gone
const STALE_MARKER: &str = "__probe_stale__";

/// Blocking CDP driver for one browser tab
#[derive(Debug)]
pub struct CdpDriver {
    config: DriverConfig,
    runtime: Runtime,
    browser: Option<CdpBrowser>,
    page: CdpPage,
    handler: tokio::task::JoinHandle<()>,
}

impl CdpDriver {
    /// Launch Chromium and open a blank tab
    pub fn launch(config: DriverConfig) -> ProbeResult<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .map_err(|e| launch_error(&e))?;

        let mut builder =
            CdpConfig::builder().window_size(config.viewport_width, config.viewport_height);
        if !config.headless {
            builder = builder.with_head();
        }
        if !config.sandbox {
            builder = builder.no_sandbox();
        }
        if let Some(ref path) = config.executable_path {
            builder = builder.chrome_executable(path);
        }
        let cdp_config = builder.build().map_err(|e| launch_error(&e))?;

        let (browser, handler, page) = runtime.block_on(async {
            let (browser, mut handler) = CdpBrowser::launch(cdp_config)
                .await
                .map_err(|e| launch_error(&e))?;
            let handle = tokio::spawn(async move {
                while let Some(event) = handler.next().await {
                    if event.is_err() {
                        break;
                    }
                }
            });
            let page = browser
                .new_page("about:blank")
                .await
                .map_err(|e| launch_error(&e))?;
            Ok::<_, ProbeError>((browser, handle, page))
        })?;

        tracing::info!(
            headless = config.headless,
            width = config.viewport_width,
            height = config.viewport_height,
            "chromium launched"
        );
        Ok(Self {
            config,
            runtime,
            browser: Some(browser),
            page,
            handler,
        })
    }

    /// Launch configuration
    #[must_use]
    pub const fn config(&self) -> &DriverConfig {
        &self.config
    }

    fn evaluate(&self, expression: String) -> ProbeResult<Value> {
        let page = &self.page;
        self.runtime.block_on(async move {
            let result = page
                .evaluate(expression)
                .await
                .map_err(|e| ProbeError::driver(e.to_string()))?;
            Ok(result.value().cloned().unwrap_or(Value::Null))
        })
    }

    /// Evaluate `body` with `el` bound to the stamped node
    fn on_element(&self, element: &ElementHandle, body: &str) -> ProbeResult<Value> {
        let value = self.evaluate(format!(
            "(() => {{ const el = {lookup}; if (!el) {{ return {stale}; }} {body} }})()",
            lookup = element_lookup(&element.id),
            stale = js_string(STALE_MARKER),
        ))?;
        if value.as_str() == Some(STALE_MARKER) {
            return Err(ProbeError::StaleElement {
                id: element.id.clone(),
            });
        }
        Ok(value)
    }
}

impl UiDriver for CdpDriver {
    fn navigate(&mut self, url: &str) -> ProbeResult<()> {
        let page = &self.page;
        self.runtime.block_on(async move {
            page.goto(url)
                .await
                .map_err(|e| ProbeError::NavigationError {
                    url: url.to_string(),
                    message: e.to_string(),
                })?;
            Ok(())
        })
    }

    fn find_all(&self, selector: &Selector) -> ProbeResult<Vec<ElementHandle>> {
        let script = format!(
            "(() => {{ \
               window.__probeSeq = window.__probeSeq || 0; \
               return ({collect}).map(el => {{ \
                 if (!el.hasAttribute({attr})) {{ el.setAttribute({attr}, 'p' + (++window.__probeSeq)); }} \
                 return el.getAttribute({attr}); \
               }}); \
             }})()",
            collect = selector.to_collect_script(),
            attr = js_string(PROBE_ATTR),
        );
        let ids = match self.evaluate(script)? {
            Value::Array(ids) => ids,
            Value::Null => Vec::new(),
            other => {
                return Err(ProbeError::DriverError {
                    message: format!("unexpected result for {selector}: {other}"),
                })
            }
        };
        Ok(ids
            .iter()
            .filter_map(Value::as_str)
            .map(ElementHandle::new)
            .collect())
    }

    fn is_displayed(&self, element: &ElementHandle) -> ProbeResult<bool> {
        let value = self.on_element(
            element,
            "const r = el.getBoundingClientRect(); const s = window.getComputedStyle(el); \
             return r.width > 0 && r.height > 0 && s.visibility !== 'hidden' && s.display !== 'none';",
        )?;
        Ok(value.as_bool().unwrap_or(false))
    }

    fn is_enabled(&self, element: &ElementHandle) -> ProbeResult<bool> {
        let value = self.on_element(
            element,
            "return !el.disabled && el.getAttribute('aria-disabled') !== 'true';",
        )?;
        Ok(value.as_bool().unwrap_or(false))
    }

    fn text(&self, element: &ElementHandle) -> ProbeResult<String> {
        let value = self.on_element(element, "return (el.innerText || el.textContent || '');")?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    fn click(&mut self, element: &ElementHandle) -> ProbeResult<()> {
        let page = &self.page;
        let css = format!("[{PROBE_ATTR}=\"{}\"]", element.id);
        self.runtime.block_on(async move {
            let node = page.find_element(css).await.map_err(|_| ProbeError::StaleElement {
                id: element.id.clone(),
            })?;
            node.click().await.map_err(|e| ProbeError::NotInteractable {
                id: element.id.clone(),
                message: e.to_string(),
            })?;
            Ok(())
        })
    }

    fn execute_script(&mut self, script: &str, args: &[ElementHandle]) -> ProbeResult<Value> {
        let lookups: Vec<String> = args.iter().map(|a| element_lookup(&a.id)).collect();
        let value = self.evaluate(format!(
            "(() => {{ const args = [{lookups}]; \
               if (args.some(a => !a)) {{ return {stale}; }} \
               return (function() {{ {script} }}).apply(null, args); }})()",
            lookups = lookups.join(", "),
            stale = js_string(STALE_MARKER),
        ))?;
        if value.as_str() == Some(STALE_MARKER) {
            let id = args.first().map(|a| a.id.clone()).unwrap_or_default();
            return Err(ProbeError::StaleElement { id });
        }
        Ok(value)
    }

    fn screenshot(&self) -> ProbeResult<Vec<u8>> {
        let page = &self.page;
        self.runtime.block_on(async move {
            let params = CaptureScreenshotParams::builder()
                .format(CaptureScreenshotFormat::Png)
                .build();
            let shot = page
                .execute(params)
                .await
                .map_err(|e| ProbeError::ScreenshotError {
                    message: e.to_string(),
                })?;

            use base64::Engine;
            base64::engine::general_purpose::STANDARD
                .decode(&shot.data)
                .map_err(|e| ProbeError::ScreenshotError {
                    message: e.to_string(),
                })
        })
    }

    fn current_url(&self) -> ProbeResult<String> {
        let page = &self.page;
        self.runtime.block_on(async move {
            let url = page.url().await.map_err(|e| ProbeError::driver(e.to_string()))?;
            Ok(url.unwrap_or_default())
        })
    }
}

impl Drop for CdpDriver {
    fn drop(&mut self) {
        if let Some(mut browser) = self.browser.take() {
            if let Err(e) = self.runtime.block_on(browser.close()) {
                tracing::warn!(error = %e, "browser did not close cleanly");
            }
        }
        self.handler.abort();
    }
}

fn element_lookup(id: &str) -> String {
    format!(
        "document.querySelector({})",
        js_string(&format!("[{PROBE_ATTR}=\"{id}\"]"))
    )
}

fn launch_error(e: &impl std::fmt::Display) -> ProbeError {
    ProbeError::BrowserLaunchError {
        message: e.to_string(),
    }
}
