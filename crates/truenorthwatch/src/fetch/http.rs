//! Fetches platform pages over HTTP and extracts their text.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use regex::Regex;
use reqwest::Client;
use scraper::{Html, Node, Selector};
use thiserror::Error;

use super::{FetchOutcome, PlatformFetcher, PlatformText};
use crate::config::FetchConfig;

/// Element holding the platform body on party pages.
const CONTENT_SELECTOR: &str = "div.platform-content";

/// Elements whose text forms one line of output.
const BLOCK_TAGS: &[&str] = &[
    "p", "li", "h1", "h2", "h3", "h4", "h5", "h6", "blockquote", "td", "th", "dd", "dt",
    "div", "section", "article", "pre", "figcaption",
];

/// Elements whose text is never platform content.
const HIDDEN_TAGS: &[&str] = &["script", "style", "noscript", "template"];

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Server returned status {0}")]
    Status(u16),

    #[error("No platform content found at {url}")]
    NoContent { url: String },

    #[error("Failed to initialize fetcher: {0}")]
    Setup(String),
}

pub struct HttpPlatformFetcher {
    client: Client,
    config: FetchConfig,
    selector: Selector,
    spaces: Regex,
}

impl HttpPlatformFetcher {
    pub fn new(config: FetchConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;
        let selector =
            Selector::parse(CONTENT_SELECTOR).map_err(|e| FetchError::Setup(e.to_string()))?;
        let spaces = Regex::new(r"\s+").map_err(|e| FetchError::Setup(e.to_string()))?;

        Ok(Self {
            client,
            config,
            selector,
            spaces,
        })
    }

    /// URL of the platform page, through the archive when enabled.
    pub fn request_url(&self, party_name: &str, election_year: i32) -> String {
        let year = election_year.to_string();
        let page = self
            .config
            .url_template
            .replace("{party}", &party_slug(party_name))
            .replace("{year}", &year);

        if self.config.use_archive {
            self.config
                .archive_template
                .replace("{year}", &year)
                .replace("{url}", &page)
        } else {
            page
        }
    }

    /// Text of the platform element, one line per block-level element.
    ///
    /// Text nodes are joined with their inline siblings (`<a>`, `<em>`, ...)
    /// so phrases split by markup stay on one line. `<br>` also ends a line.
    pub fn extract_text(&self, html: &str) -> Option<String> {
        let document = Html::parse_document(html);
        let root = document.select(&self.selector).next()?;

        let mut lines = Vec::new();
        let mut current = String::new();
        let mut current_block = None;

        for node in root.descendants() {
            match node.value() {
                Node::Element(element) if element.name() == "br" => {
                    self.flush_line(&mut lines, &mut current);
                }
                Node::Text(text) => {
                    let mut block = root.id();
                    let mut hidden = false;
                    for ancestor in node.ancestors().take_while(|a| a.id() != root.id()) {
                        let Some(element) = ancestor.value().as_element() else {
                            continue;
                        };
                        if HIDDEN_TAGS.contains(&element.name()) {
                            hidden = true;
                            break;
                        }
                        if block == root.id() && BLOCK_TAGS.contains(&element.name()) {
                            block = ancestor.id();
                        }
                    }
                    if hidden {
                        continue;
                    }

                    if current_block != Some(block) {
                        self.flush_line(&mut lines, &mut current);
                        current_block = Some(block);
                    }
                    current.push_str(text);
                }
                _ => {}
            }
        }
        self.flush_line(&mut lines, &mut current);

        if lines.is_empty() {
            None
        } else {
            Some(lines.join("\n"))
        }
    }

    fn flush_line(&self, lines: &mut Vec<String>, current: &mut String) {
        let line = self.spaces.replace_all(current.trim(), " ").into_owned();
        if !line.is_empty() {
            lines.push(line);
        }
        current.clear();
    }

    async fn try_fetch(&self, url: &str) -> Result<String, FetchError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        self.extract_text(&body).ok_or_else(|| FetchError::NoContent {
            url: url.to_string(),
        })
    }
}

#[async_trait]
impl PlatformFetcher for HttpPlatformFetcher {
    async fn fetch_platform(&self, party_name: &str, election_year: i32) -> FetchOutcome {
        let url = self.request_url(party_name, election_year);
        log::debug!("Fetching platform for {} ({}) from {}", party_name, election_year, url);

        match self.try_fetch(&url).await {
            Ok(text) => FetchOutcome::Fetched(PlatformText {
                party_name: party_name.to_string(),
                election_year,
                text,
                fetched_at: Utc::now(),
            }),
            Err(e) => {
                log::warn!(
                    "Error fetching platform for {} in {}: {}",
                    party_name,
                    election_year,
                    e
                );
                FetchOutcome::Unavailable {
                    reason: e.to_string(),
                }
            }
        }
    }
}

/// `"People's Party"` -> `"people's-party"`.
pub fn party_slug(party_name: &str) -> String {
    party_name.trim().to_lowercase().replace(' ', "-")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetcher(use_archive: bool) -> HttpPlatformFetcher {
        HttpPlatformFetcher::new(FetchConfig {
            use_archive,
            ..FetchConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_party_slug() {
        assert_eq!(party_slug("Liberal"), "liberal");
        assert_eq!(party_slug(" Green Party "), "green-party");
    }

    #[test]
    fn test_direct_url() {
        assert_eq!(
            fetcher(false).request_url("Liberal", 2021),
            "https://liberal.ca/platform/2021"
        );
    }

    #[test]
    fn test_archive_url() {
        assert_eq!(
            fetcher(true).request_url("Green Party", 2019),
            "https://web.archive.org/web/2019*/https://green-party.ca/platform/2019"
        );
    }

    #[test]
    fn test_extract_text_keeps_blocks_on_separate_lines() {
        let html = r#"
            <html><body>
              <nav>Donate</nav>
              <div class="platform-content">
                <h2>Housing</h2>
                <p>Build   500,000 homes.</p>
                <p>Lower the GST on new homes.</p>
              </div>
            </body></html>
        "#;
        let text = fetcher(false).extract_text(html).unwrap();
        assert_eq!(
            text,
            "Housing\nBuild 500,000 homes.\nLower the GST on new homes."
        );
    }

    #[test]
    fn test_extract_text_joins_inline_markup() {
        let html = r#"<div class="platform-content"><p>We will scrap the <a href="/c">carbon</a> tax for <em>good</em>.</p></div>"#;
        let text = fetcher(false).extract_text(html).unwrap();
        assert_eq!(text, "We will scrap the carbon tax for good.");

        let categorized = crate::categorizer::Categorizer::builtin()
            .unwrap()
            .categorize(&text);
        assert_eq!(
            categorized[crate::categorizer::Category::ClimateChangeAndEnergy],
            "We will scrap the carbon tax for good.\n"
        );
    }

    #[test]
    fn test_extract_text_list_items_and_breaks() {
        let html = r#"
            <div class="platform-content">
              <ul>
                <li>Cut <b>income</b> taxes.</li>
                <li><p>Hire   more
                   nurses.</p></li>
              </ul>
              <p>First line<br>second line</p>
              <script>var tracking = "housing";</script>
            </div>
        "#;
        let text = fetcher(false).extract_text(html).unwrap();
        assert_eq!(
            text,
            "Cut income taxes.\nHire more nurses.\nFirst line\nsecond line"
        );
    }

    #[test]
    fn test_extract_text_missing_element() {
        let html = "<html><body><p>Page not found</p></body></html>";
        assert!(fetcher(false).extract_text(html).is_none());
    }

    #[test]
    fn test_extract_text_empty_element() {
        let html = r#"<div class="platform-content">   </div>"#;
        assert!(fetcher(false).extract_text(html).is_none());
    }

    #[tokio::test]
    async fn test_unreachable_host_is_unavailable() {
        let fetcher = HttpPlatformFetcher::new(FetchConfig {
            url_template: "http://127.0.0.1:9/{party}/{year}".to_string(),
            use_archive: false,
            timeout_secs: 2,
            ..FetchConfig::default()
        })
        .unwrap();

        let outcome = fetcher.fetch_platform("Liberal", 2021).await;
        assert!(matches!(outcome, FetchOutcome::Unavailable { .. }));
        assert_eq!(outcome.text(), "");
    }
}
