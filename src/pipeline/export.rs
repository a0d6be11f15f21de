//! Report export: composed HTML → bytes on disk.
//!
//! Rendering sits behind [`DocumentRenderer`] so the writer does not care
//! whether the report ends up as a PDF printed by a headless browser or as
//! the HTML itself. Tests plug in [`HtmlRenderer`] and need no browser.

use crate::error::StudyError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Turns a composed HTML document into the bytes of the final report.
#[async_trait]
pub trait DocumentRenderer: Send + Sync {
    /// Short name used in logs and errors.
    fn name(&self) -> &'static str;

    /// File extension of the produced report, without the dot.
    fn extension(&self) -> &'static str;

    /// Render `html`. Any failure reported by the backend must surface as
    /// [`StudyError::RenderFailed`].
    async fn render(&self, html: &str) -> Result<Vec<u8>, StudyError>;
}

/// Report format selectable from the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReportFormat {
    /// Print to PDF through headless Chromium. (default)
    #[default]
    Pdf,
    /// Save the HTML document as-is.
    Html,
}

impl ReportFormat {
    /// Build the renderer for this format.
    pub fn renderer(self) -> Result<Arc<dyn DocumentRenderer>, StudyError> {
        match self {
            ReportFormat::Html => Ok(Arc::new(HtmlRenderer)),
            #[cfg(feature = "chromium")]
            ReportFormat::Pdf => Ok(Arc::new(chromium::ChromiumRenderer::default())),
            #[cfg(not(feature = "chromium"))]
            ReportFormat::Pdf => Err(StudyError::InvalidConfig(
                "PDF reports need the `chromium` feature; use the HTML report instead".into(),
            )),
        }
    }
}

/// Writes the HTML document unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer;

#[async_trait]
impl DocumentRenderer for HtmlRenderer {
    fn name(&self) -> &'static str {
        "html"
    }

    fn extension(&self) -> &'static str {
        "html"
    }

    async fn render(&self, html: &str) -> Result<Vec<u8>, StudyError> {
        Ok(html.as_bytes().to_vec())
    }
}

#[cfg(feature = "chromium")]
pub use chromium::ChromiumRenderer;

#[cfg(feature = "chromium")]
mod chromium {
    use super::DocumentRenderer;
    use crate::error::StudyError;
    use async_trait::async_trait;
    use chromiumoxide::cdp::browser_protocol::page::PrintToPdfParams;
    use chromiumoxide::{Browser, BrowserConfig};
    use futures::StreamExt;
    use std::path::PathBuf;
    use std::time::Duration;
    use tracing::{debug, info};

    /// Prints the report to PDF with a headless Chromium-family browser.
    ///
    /// The browser is launched per render and closed afterwards; one report
    /// per run does not justify keeping it alive.
    #[derive(Debug, Clone)]
    pub struct ChromiumRenderer {
        /// Browser binary. `None` lets chromiumoxide search the usual places.
        pub executable: Option<PathBuf>,
        /// Upper bound for launch + load + print.
        pub timeout: Duration,
    }

    impl Default for ChromiumRenderer {
        fn default() -> Self {
            Self {
                executable: std::env::var_os("CHROME_PATH").map(PathBuf::from),
                timeout: Duration::from_secs(60),
            }
        }
    }

    impl ChromiumRenderer {
        fn failed(detail: impl std::fmt::Display) -> StudyError {
            StudyError::RenderFailed {
                renderer: "chromium".into(),
                detail: detail.to_string(),
            }
        }

        async fn print(&self, html: &str) -> Result<Vec<u8>, StudyError> {
            let mut builder = BrowserConfig::builder().new_headless_mode().args(vec![
                "--disable-gpu",
                "--no-sandbox",
                "--disable-dev-shm-usage",
            ]);
            if let Some(ref exe) = self.executable {
                builder = builder.chrome_executable(exe);
            }
            let config = builder.build().map_err(Self::failed)?;

            let (mut browser, mut handler) =
                Browser::launch(config).await.map_err(Self::failed)?;
            let events = tokio::spawn(async move {
                while let Some(event) = handler.next().await {
                    if event.is_err() {
                        break;
                    }
                }
            });
            debug!("Headless browser launched");

            let result = async {
                let page = browser
                    .new_page("about:blank")
                    .await
                    .map_err(Self::failed)?;
                page.set_content(html).await.map_err(Self::failed)?;
                let params = PrintToPdfParams {
                    print_background: Some(true),
                    prefer_css_page_size: Some(true),
                    ..Default::default()
                };
                page.pdf(params).await.map_err(Self::failed)
            }
            .await;

            browser.close().await.ok();
            browser.wait().await.ok();
            events.abort();
            result
        }
    }

    #[async_trait]
    impl DocumentRenderer for ChromiumRenderer {
        fn name(&self) -> &'static str {
            "chromium"
        }

        fn extension(&self) -> &'static str {
            "pdf"
        }

        async fn render(&self, html: &str) -> Result<Vec<u8>, StudyError> {
            let bytes = tokio::time::timeout(self.timeout, self.print(html))
                .await
                .map_err(|_| {
                    Self::failed(format!("timed out after {}s", self.timeout.as_secs()))
                })??;
            if bytes.is_empty() {
                return Err(Self::failed("browser returned an empty PDF"));
            }
            info!("Rendered report PDF ({} bytes)", bytes.len());
            Ok(bytes)
        }
    }
}
