//! HTTP fetcher for competitor pricing pages.

use std::borrow::Cow;
use std::future::Future;
use std::sync::LazyLock;
use std::time::Duration;

use encoding_rs::{Encoding, UTF_8};
use regex::Regex;
use reqwest::redirect::Policy;
use reqwest::Client;

use pricewatch_core::AppConfig;

use crate::error::{FetchError, ScraperError};

const CONNECT_TIMEOUT_SECS: u64 = 10;
const MAX_REDIRECTS: usize = 10;

const ACCEPT_HTML: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8";
const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9,sv;q=0.8";

/// How far into the body a `<meta charset>` declaration is looked for.
const META_SNIFF_BYTES: usize = 1024;

static META_CHARSET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta\b[^>]*?charset\s*=\s*["']?\s*([a-z0-9_.:-]+)"#)
        .expect("valid meta charset regex")
});

/// A successfully fetched page.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// URL after following redirects.
    pub final_url: String,
    pub status: u16,
    pub bytes: Vec<u8>,
    /// `bytes` decoded with the declared charset, UTF-8 when none is
    /// declared or the label is unknown. Invalid sequences become U+FFFD.
    pub text: String,
}

/// Source of competitor pages. [`PageFetcher`] is the HTTP implementation.
pub trait PageSource {
    /// Fetches `url` on behalf of `competitor`.
    fn fetch_page(
        &self,
        competitor: &str,
        url: &str,
    ) -> impl Future<Output = Result<FetchedPage, FetchError>> + Send;
}

/// Fetches pricing pages with browser-like headers.
///
/// Every request is preceded by a fixed `request_delay` sleep. Timeouts,
/// connection failures and non-2xx statuses surface as [`FetchError`]; the
/// fetcher never retries. TLS certificates are always validated.
pub struct PageFetcher {
    client: Client,
    request_delay: Duration,
}

impl PageFetcher {
    /// Creates a fetcher with the given total timeout, `User-Agent`, and
    /// pre-request delay. A delay of `0` disables the sleep.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Client`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        request_delay_ms: u64,
    ) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .user_agent(user_agent)
            .redirect(Policy::limited(MAX_REDIRECTS))
            .build()?;
        Ok(Self {
            client,
            request_delay: Duration::from_millis(request_delay_ms),
        })
    }

    /// # Errors
    ///
    /// See [`PageFetcher::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, ScraperError> {
        Self::new(
            config.request_timeout_secs,
            &config.user_agent,
            config.request_delay_ms,
        )
    }

    /// Fetches `url` on behalf of `competitor` (used only in error messages).
    ///
    /// # Errors
    ///
    /// - [`FetchError::Transport`]: timeout, DNS, TLS or connection failure.
    /// - [`FetchError::Status`]: any non-2xx status after redirects.
    pub async fn fetch(&self, competitor: &str, url: &str) -> Result<FetchedPage, FetchError> {
        if !self.request_delay.is_zero() {
            tokio::time::sleep(self.request_delay).await;
        }

        let transport = |source: reqwest::Error| FetchError::Transport {
            competitor: competitor.to_owned(),
            source,
        };

        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, ACCEPT_HTML)
            .header(reqwest::header::ACCEPT_LANGUAGE, ACCEPT_LANGUAGE)
            .header(reqwest::header::CACHE_CONTROL, "max-age=0")
            .header(reqwest::header::UPGRADE_INSECURE_REQUESTS, "1")
            .header("Sec-Fetch-Dest", "document")
            .header("Sec-Fetch-Mode", "navigate")
            .header("Sec-Fetch-Site", "none")
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);

        if !status.is_success() {
            tracing::debug!(competitor, url, status = status.as_u16(), "non-success status");
            return Err(FetchError::Status {
                competitor: competitor.to_owned(),
                status: status.as_u16(),
                url: final_url,
            });
        }

        let bytes = response.bytes().await.map_err(transport)?.to_vec();
        let text = decode_body(&bytes, content_type.as_deref());

        tracing::debug!(competitor, url = %final_url, bytes = bytes.len(), "fetched page");

        Ok(FetchedPage {
            final_url,
            status: status.as_u16(),
            bytes,
            text,
        })
    }
}

impl PageSource for PageFetcher {
    fn fetch_page(
        &self,
        competitor: &str,
        url: &str,
    ) -> impl Future<Output = Result<FetchedPage, FetchError>> + Send {
        self.fetch(competitor, url)
    }
}

/// Decodes a response body. The `Content-Type` charset wins over a
/// `<meta>` declaration; a byte-order mark wins over both.
#[must_use]
pub fn decode_body(bytes: &[u8], content_type: Option<&str>) -> String {
    let label = content_type
        .and_then(charset_from_content_type)
        .or_else(|| sniff_meta_charset(bytes));
    let encoding = label
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .unwrap_or(UTF_8);

    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        tracing::debug!(encoding = used.name(), "body contained undecodable bytes");
    }
    text.into_owned()
}

fn charset_from_content_type(content_type: &str) -> Option<Cow<'_, str>> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        name.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| Cow::Borrowed(value.trim().trim_matches(|c| c == '"' || c == '\'')))
    })
}

fn sniff_meta_charset(bytes: &[u8]) -> Option<Cow<'static, str>> {
    let head = String::from_utf8_lossy(&bytes[..bytes.len().min(META_SNIFF_BYTES)]);
    META_CHARSET_RE
        .captures(&head)
        .map(|caps| Cow::Owned(caps[1].to_string()))
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn test_fetcher() -> PageFetcher {
        PageFetcher::new(5, "pricewatch-test/0.1", 0).expect("failed to build test fetcher")
    }

    #[tokio::test]
    async fn fetch_returns_body_bytes_and_text() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pricing"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<p>Starter £10</p>"))
            .mount(&server)
            .await;

        let url = format!("{}/pricing", server.uri());
        let page = test_fetcher().fetch("Acme", &url).await.unwrap();
        assert_eq!(page.status, 200);
        assert_eq!(page.text, "<p>Starter £10</p>");
        assert_eq!(page.bytes, "<p>Starter £10</p>".as_bytes());
    }

    #[tokio::test]
    async fn fetch_sends_browser_like_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pricing"))
            .and(header("user-agent", "pricewatch-test/0.1"))
            .and(header("sec-fetch-dest", "document"))
            .and(header("sec-fetch-mode", "navigate"))
            .and(header("upgrade-insecure-requests", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .expect(1)
            .mount(&server)
            .await;

        let url = format!("{}/pricing", server.uri());
        let result = test_fetcher().fetch("Acme", &url).await;
        assert!(result.is_ok(), "expected Ok, got: {result:?}");
    }

    #[tokio::test]
    async fn fetch_maps_non_success_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pricing"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let url = format!("{}/pricing", server.uri());
        let err = test_fetcher().fetch("Acme", &url).await.unwrap_err();
        assert!(
            matches!(err, FetchError::Status { status: 503, ref competitor, .. } if competitor == "Acme"),
            "expected Status(503), got: {err:?}"
        );
    }

    #[tokio::test]
    async fn fetch_follows_redirects() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/old"))
            .respond_with(
                ResponseTemplate::new(301).insert_header("location", "/new"),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/new"))
            .respond_with(ResponseTemplate::new(200).set_body_string("moved"))
            .mount(&server)
            .await;

        let url = format!("{}/old", server.uri());
        let page = test_fetcher().fetch("Acme", &url).await.unwrap();
        assert_eq!(page.text, "moved");
        assert!(page.final_url.ends_with("/new"), "got: {}", page.final_url);
    }

    #[tokio::test]
    async fn fetch_reports_connection_failure_as_transport_error() {
        // Port 9 (discard) on localhost is not expected to accept HTTP.
        let err = test_fetcher()
            .fetch("Acme", "http://127.0.0.1:9/pricing")
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Transport { .. }), "got: {err:?}");
        assert!(err.to_string().starts_with("Request failed for Acme"));
    }

    #[tokio::test]
    async fn fetch_decodes_declared_latin1_charset() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pris"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                b"<h3>Basic</h3><p>0 kr/m\xE5nad</p>".to_vec(),
                "text/html; charset=iso-8859-1",
            ))
            .mount(&server)
            .await;

        let url = format!("{}/pris", server.uri());
        let page = test_fetcher().fetch("NVR", &url).await.unwrap();
        assert_eq!(page.text, "<h3>Basic</h3><p>0 kr/m\u{e5}nad</p>");
        assert_eq!(page.bytes.len(), 31);
    }

    #[tokio::test]
    async fn fetch_waits_request_delay_before_sending() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&server)
            .await;

        let fetcher = PageFetcher::new(5, "pricewatch-test/0.1", 150).unwrap();
        let started = std::time::Instant::now();
        fetcher.fetch("Acme", &server.uri()).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(150));
    }

    #[test]
    fn decode_defaults_to_utf8() {
        assert_eq!(decode_body("Från 49 kr".as_bytes(), None), "Från 49 kr");
        assert_eq!(decode_body("Från".as_bytes(), Some("text/html")), "Från");
    }

    #[test]
    fn decode_uses_content_type_charset() {
        assert_eq!(
            decode_body(b"0 kr/m\xE5nad", Some("text/html; Charset=\"ISO-8859-1\"")),
            "0 kr/m\u{e5}nad"
        );
    }

    #[test]
    fn decode_sniffs_meta_charset() {
        let html = b"<html><head><meta charset=\"windows-1252\"></head><body>\x80 9</body></html>";
        assert!(decode_body(html, Some("text/html")).contains("\u{20ac} 9"));

        let http_equiv =
            b"<meta http-equiv=\"Content-Type\" content=\"text/html; charset=iso-8859-1\"><p>\xE5</p>";
        assert!(decode_body(http_equiv, None).contains("<p>\u{e5}</p>"));
    }

    #[test]
    fn header_charset_wins_over_meta() {
        let html = "<meta charset=\"iso-8859-1\"><p>å</p>";
        assert_eq!(
            decode_body(html.as_bytes(), Some("text/html; charset=utf-8")),
            html
        );
    }

    #[test]
    fn unknown_label_falls_back_to_utf8() {
        assert_eq!(
            decode_body("månad".as_bytes(), Some("text/html; charset=klingon")),
            "månad"
        );
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        assert_eq!(decode_body(b"m\xE5nad", None), "m\u{fffd}nad");
    }
}
