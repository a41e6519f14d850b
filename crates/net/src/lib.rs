use std::collections::HashMap;
use std::io::Read;
use std::sync::Mutex;
use std::time::{Duration, Instant};

pub use url::Url;

mod file;

pub use file::FileFetcher;

/// Bodies larger than this are cut off and the fetch is reported as failed; site pages and
/// fragments are small.
pub const MAX_BODY_BYTES: u64 = 4 * 1024 * 1024;

/// Reads at most [`MAX_BODY_BYTES`]. Returns the bytes read and an error when the body was
/// longer than that or could not be read.
pub(crate) fn read_capped(reader: impl Read) -> (Vec<u8>, Option<String>) {
    let mut buf = Vec::new();
    if let Err(e) = reader.take(MAX_BODY_BYTES + 1).read_to_end(&mut buf) {
        return (buf, Some(format!("body read error: {e}")));
    }
    if buf.len() as u64 > MAX_BODY_BYTES {
        buf.truncate(MAX_BODY_BYTES as usize);
        return (buf, Some(format!("body exceeds {MAX_BODY_BYTES} bytes")));
    }
    (buf, None)
}

const USER_AGENT: &str = concat!("navshell/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct FetchResult {
    pub url: String,           // final URL after redirects
    pub requested_url: String, // what we asked for
    pub status: Option<u16>,
    pub content_type: Option<String>,
    pub body: String,
    pub duration_ms: u128,
    pub error: Option<String>,
}

impl FetchResult {
    pub fn ok(url: &Url, status: u16, content_type: Option<String>, body: String) -> Self {
        Self {
            url: url.to_string(),
            requested_url: url.to_string(),
            status: Some(status),
            content_type,
            body,
            duration_ms: 0,
            error: None,
        }
    }

    pub fn failed(url: &Url, error: impl Into<String>) -> Self {
        Self {
            url: url.to_string(),
            requested_url: url.to_string(),
            status: None,
            content_type: None,
            body: String::new(),
            duration_ms: 0,
            error: Some(error.into()),
        }
    }

    /// 2xx status and no transport error.
    pub fn is_success(&self) -> bool {
        self.error.is_none() && self.status.is_some_and(|s| (200..300).contains(&s))
    }

    /// Body text on success, `None` otherwise.
    pub fn into_text(self) -> Option<String> {
        self.is_success().then_some(self.body)
    }

    /// One-line description of a failed fetch, for diagnostics.
    pub fn describe_failure(&self) -> String {
        match (self.status, &self.error) {
            (_, Some(err)) => format!("{}: {err}", self.requested_url),
            (Some(code), None) => format!("{}: HTTP {code}", self.requested_url),
            (None, None) => format!("{}: no response", self.requested_url),
        }
    }
}

/// Retrieves the text of a resource. Implementations never panic on network failure;
/// failures are reported through `FetchResult::error` / `status`.
pub trait Fetcher {
    fn fetch_text(&self, url: &Url) -> FetchResult;
}

impl<F: Fetcher + ?Sized> Fetcher for Box<F> {
    fn fetch_text(&self, url: &Url) -> FetchResult {
        (**self).fetch_text(url)
    }
}

impl<F: Fetcher + ?Sized> Fetcher for &F {
    fn fetch_text(&self, url: &Url) -> FetchResult {
        (**self).fetch_text(url)
    }
}

/// Blocking HTTP(S) fetcher.
pub struct HttpFetcher {
    agent: ureq::Agent,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build();
        Self { agent }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new(Duration::from_secs(10))
    }
}

impl Fetcher for HttpFetcher {
    fn fetch_text(&self, url: &Url) -> FetchResult {
        let start = Instant::now();
        let requested_url = url.to_string();

        let (status, response) = match self.agent.get(url.as_str()).call() {
            Ok(resp) => (resp.status(), resp),
            // Non-success statuses still carry a body worth keeping for diagnostics.
            Err(ureq::Error::Status(code, resp)) => (code, resp),
            Err(err) => {
                let mut failed = FetchResult::failed(url, err.to_string());
                failed.duration_ms = start.elapsed().as_millis();
                return failed;
            }
        };

        let final_url = response.get_url().to_string();
        let content_type = response.header("content-type").map(str::to_string);

        let (buf, error) = read_capped(response.into_reader());

        FetchResult {
            url: final_url,
            requested_url,
            status: Some(status),
            content_type,
            body: String::from_utf8_lossy(&buf).into_owned(),
            duration_ms: start.elapsed().as_millis(),
            error,
        }
    }
}

/// Dispatches on the URL scheme: `file` to the filesystem, `http(s)` to the network.
pub struct RouterFetcher {
    http: HttpFetcher,
    file: FileFetcher,
}

impl RouterFetcher {
    pub fn new(http: HttpFetcher, file: FileFetcher) -> Self {
        Self { http, file }
    }
}

impl Default for RouterFetcher {
    fn default() -> Self {
        Self::new(HttpFetcher::default(), FileFetcher)
    }
}

impl Fetcher for RouterFetcher {
    fn fetch_text(&self, url: &Url) -> FetchResult {
        match url.scheme() {
            "http" | "https" => self.http.fetch_text(url),
            "file" => self.file.fetch_text(url),
            other => FetchResult::failed(url, format!("unsupported scheme {other:?}")),
        }
    }
}

#[derive(Debug, Clone)]
enum Canned {
    Response { status: u16, body: String },
    TransportError(String),
}

/// In-memory site: a URL → response table. Unknown URLs answer 404.
///
/// Every request is recorded so callers can assert on what was fetched.
#[derive(Debug, Default)]
pub struct MemoryFetcher {
    responses: HashMap<String, Canned>,
    requests: Mutex<Vec<String>>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, body: &str) -> Self {
        self.insert(url, 200, body);
        self
    }

    pub fn with_status(mut self, url: &str, status: u16, body: &str) -> Self {
        self.insert(url, status, body);
        self
    }

    pub fn with_transport_error(mut self, url: &str, error: &str) -> Self {
        self.responses
            .insert(url.to_string(), Canned::TransportError(error.to_string()));
        self
    }

    pub fn insert(&mut self, url: &str, status: u16, body: &str) {
        self.responses.insert(
            url.to_string(),
            Canned::Response {
                status,
                body: body.to_string(),
            },
        );
    }

    /// URLs requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        match self.requests.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn request_count(&self, url: &str) -> usize {
        self.requests().iter().filter(|u| *u == url).count()
    }
}

impl Fetcher for MemoryFetcher {
    fn fetch_text(&self, url: &Url) -> FetchResult {
        match self.requests.lock() {
            Ok(mut guard) => guard.push(url.to_string()),
            Err(poisoned) => poisoned.into_inner().push(url.to_string()),
        }
        match self.responses.get(url.as_str()) {
            Some(Canned::Response { status, body }) => FetchResult::ok(
                url,
                *status,
                Some("text/html; charset=utf-8".into()),
                body.clone(),
            ),
            Some(Canned::TransportError(err)) => FetchResult::failed(url, err.clone()),
            None => FetchResult::ok(url, 404, Some("text/html".into()), "Not Found".into()),
        }
    }
}
