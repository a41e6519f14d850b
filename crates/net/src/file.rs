use crate::{FetchResult, Fetcher, read_capped};
use std::io::ErrorKind;
use std::path::Path;
use std::time::Instant;
use url::Url;

/// Serves `file://` URLs from the local filesystem, the way a static file server would:
/// missing files answer 404, directories serve their `index.html`.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileFetcher;

fn content_type_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("html") | Some("htm") => "text/html; charset=utf-8",
        Some("css") => "text/css",
        Some("js") => "text/javascript",
        Some("json") => "application/json",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}

impl Fetcher for FileFetcher {
    fn fetch_text(&self, url: &Url) -> FetchResult {
        let start = Instant::now();
        let Ok(mut path) = url.to_file_path() else {
            return FetchResult::failed(url, "not a local file URL");
        };
        if path.is_dir() {
            path.push("index.html");
        }

        let mut result = match std::fs::File::open(&path) {
            Ok(file) => {
                let (buf, error) = read_capped(file);
                let mut ok = FetchResult::ok(
                    url,
                    200,
                    Some(content_type_for(&path).to_string()),
                    String::from_utf8_lossy(&buf).into_owned(),
                );
                ok.error = error.map(|e| format!("{}: {e}", path.display()));
                ok
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                FetchResult::ok(url, 404, Some("text/plain".into()), "Not Found".into())
            }
            Err(e) if e.kind() == ErrorKind::PermissionDenied => {
                FetchResult::ok(url, 403, Some("text/plain".into()), "Forbidden".into())
            }
            Err(e) => FetchResult::failed(url, format!("open {}: {e}", path.display())),
        };
        result.duration_ms = start.elapsed().as_millis();
        result
    }
}
