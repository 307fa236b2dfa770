//! Image download for article thumbnails.
//!
//! Every image referenced by a result item is fetched independently and
//! stored under the photos folder, named by the final path segment of its
//! URL (collisions overwrite). Failures never cross this boundary: a network
//! error, a non-success status, or a non-image content type all come back as
//! `None` so the caller can simply skip that image.

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use reqwest::blocking::Client;
use tracing::{debug, warn};
use url::Url;

/// Seam for the record assembler: anything that can turn an image URL into
/// a stored filename.
pub trait FetchImages {
    /// Fetch one image, returning the stored filename, or `None` when the
    /// image could not be downloaded or was not an image at all.
    fn fetch(&self, url: &str) -> Option<String>;
}

/// Production fetcher: HTTP download into a destination folder.
pub struct HttpImageFetcher {
    client: Client,
    folder: PathBuf,
}

impl HttpImageFetcher {
    pub fn new(client: Client, folder: impl Into<PathBuf>) -> Self {
        Self {
            client,
            folder: folder.into(),
        }
    }
}

impl FetchImages for HttpImageFetcher {
    fn fetch(&self, url: &str) -> Option<String> {
        match fetch_image(&self.client, url, &self.folder) {
            Ok(filename) => filename,
            Err(e) => {
                warn!(url, error = %e, "Error downloading image");
                None
            }
        }
    }
}

/// Download `url` into `folder`, validating that the response is an image.
///
/// The folder is created if missing. The response's `Content-Type` must
/// contain `image`; anything else is treated as "not an image" and returns
/// `Ok(None)` without writing to disk. The filename is derived from the last
/// path segment of the URL.
///
/// # Errors
///
/// Network failures, non-success statuses, and filesystem write failures.
/// The [`FetchImages`] impl above degrades these to `None`.
pub fn fetch_image(client: &Client, url: &str, folder: &Path) -> Result<Option<String>, Box<dyn Error>> {
    fs::create_dir_all(folder)?;

    let response = client.get(url).send()?.error_for_status()?;

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    if !content_type.contains("image") {
        debug!(url, content_type, "URL did not serve an image; skipping");
        return Ok(None);
    }

    let Some(filename) = filename_from_url(url) else {
        debug!(url, "Image URL has no usable path segment; skipping");
        return Ok(None);
    };

    let body = response.bytes()?;
    let file_path = folder.join(&filename);
    fs::write(&file_path, &body)?;
    debug!(url, path = %file_path.display(), bytes = body.len(), "Stored image");

    Ok(Some(filename))
}

/// The last non-empty path segment of a URL, used as the stored filename.
pub fn filename_from_url(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    parsed
        .path_segments()?
        .filter(|segment| !segment.is_empty())
        .next_back()
        .map(|segment| segment.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    #[test]
    fn test_filename_from_url() {
        assert_eq!(
            filename_from_url("https://s2.glbimg.com/abc/photo.jpg"),
            Some("photo.jpg".to_string())
        );
        assert_eq!(
            filename_from_url("https://example.com/a/b/c.png?w=300"),
            Some("c.png".to_string())
        );
        assert_eq!(filename_from_url("https://example.com/"), None);
        assert_eq!(filename_from_url("not a url"), None);
    }

    /// Serve exactly one canned HTTP response on a local port.
    fn serve_once(content_type: &'static str, body: &'static [u8]) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = [0u8; 4096];
            let _ = stream.read(&mut buf);
            let header = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                content_type,
                body.len()
            );
            stream.write_all(header.as_bytes()).unwrap();
            stream.write_all(body).unwrap();
        });
        format!("http://{}", addr)
    }

    #[test]
    fn test_non_image_content_type_writes_nothing() {
        let base = serve_once("text/html", b"<html>not an image</html>");
        let dir = tempfile::tempdir().unwrap();
        let client = Client::new();

        let result = fetch_image(&client, &format!("{}/page.html", base), dir.path()).unwrap();

        assert_eq!(result, None);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_image_response_is_stored_under_url_filename() {
        let base = serve_once("image/png", b"\x89PNGdata");
        let dir = tempfile::tempdir().unwrap();
        let client = Client::new();

        let result = fetch_image(&client, &format!("{}/photos/pic.png", base), dir.path()).unwrap();

        assert_eq!(result, Some("pic.png".to_string()));
        assert_eq!(fs::read(dir.path().join("pic.png")).unwrap(), b"\x89PNGdata");
    }

    #[test]
    fn test_unreachable_host_degrades_to_none() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = HttpImageFetcher::new(Client::new(), dir.path());
        // Nothing listens on this port.
        assert_eq!(fetcher.fetch("http://127.0.0.1:1/img.jpg"), None);
    }
}
