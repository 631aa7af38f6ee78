//! The real fetcher: local files and blocking HTTP.

use std::io;
use std::path::Path;

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::AUTHORIZATION;
use reqwest::Url;

use super::{Credential, FetchedFile, Fetcher, Location};
use crate::error::FetchError;

/// Fetches from the local filesystem or over HTTP(S).
///
/// Uses the default timeouts of the underlying client and makes exactly one
/// attempt per request.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Builds a fetcher with a default blocking client.
    pub fn new() -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(concat!("plotstyle/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| FetchError::Http {
                url: String::new(),
                source,
            })?;
        Ok(Self { client })
    }

    /// Wraps an existing client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// The GET for `url`. The credential is attached only when `location`
    /// accepts one.
    fn request(
        &self,
        url: &Url,
        location: &Location,
        credential: Option<&Credential>,
    ) -> RequestBuilder {
        let request = self.client.get(url.clone());
        match credential.filter(|_| location.accepts_credential()) {
            Some(credential) => request.header(AUTHORIZATION, credential.header_value()),
            None => request,
        }
    }

    fn get(
        &self,
        url: &Url,
        location: &Location,
        credential: Option<&Credential>,
    ) -> Result<Vec<u8>, FetchError> {
        let request = self.request(url, location, credential);

        let http_error = |source| FetchError::Http {
            url: url.to_string(),
            source,
        };

        let response = request.send().map_err(http_error)?;
        let status = response.status();
        if !status.is_success() {
            tracing::debug!(url = %url, status = status.as_u16(), "request failed");
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().map_err(http_error)?;
        Ok(bytes.to_vec())
    }
}

fn read_local(path: &Path) -> Result<Vec<u8>, FetchError> {
    std::fs::read(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => FetchError::FileNotFound {
            path: path.to_path_buf(),
        },
        _ => FetchError::Io {
            path: path.to_path_buf(),
            source,
        },
    })
}

impl Fetcher for HttpFetcher {
    fn fetch_text(
        &self,
        location: &Location,
        credential: Option<&Credential>,
    ) -> Result<String, FetchError> {
        let bytes = match location {
            Location::Url(url) => self.get(url, location, credential)?,
            Location::Path(path) => read_local(path)?,
        };
        String::from_utf8(bytes).map_err(|e| FetchError::Io {
            path: location.to_string().into(),
            source: io::Error::new(io::ErrorKind::InvalidData, e),
        })
    }

    fn fetch_binary(
        &self,
        location: &Location,
        credential: Option<&Credential>,
    ) -> Result<FetchedFile, FetchError> {
        match location {
            Location::Url(url) => {
                let bytes = self.get(url, location, credential)?;
                FetchedFile::from_bytes(&bytes, &location.extension_suffix())
            }
            Location::Path(path) => {
                if path.is_file() {
                    Ok(FetchedFile::Local(path.clone()))
                } else {
                    Err(FetchError::FileNotFound { path: path.clone() })
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread::{self, JoinHandle};
    use tempfile::TempDir;

    /// Answers a single request on a loopback port and hands back the raw
    /// request head.
    fn serve_once(status: &'static str, body: &'static [u8]) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut head = Vec::new();
            let mut buf = [0u8; 1024];
            while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                head.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            stream.write_all(response.as_bytes()).unwrap();
            stream.write_all(body).unwrap();
            String::from_utf8_lossy(&head).to_ascii_lowercase()
        });
        (format!("http://{addr}"), handle)
    }

    fn local_fetcher() -> HttpFetcher {
        HttpFetcher::with_client(Client::builder().no_proxy().build().unwrap())
    }

    fn authorization(fetcher: &HttpFetcher, raw: &str, credential: Option<&Credential>) -> Option<String> {
        let location = Location::parse(raw).unwrap();
        let Location::Url(url) = &location else {
            panic!("Expected a URL");
        };
        let request = fetcher.request(url, &location, credential).build().unwrap();
        request
            .headers()
            .get(AUTHORIZATION)
            .map(|value| value.to_str().unwrap().to_string())
    }

    // ========================================================================
    // Credentials
    // ========================================================================

    #[test]
    fn request_carries_token_for_code_hosts() {
        let fetcher = local_fetcher();
        let token = Credential::new("pat");

        assert_eq!(
            authorization(
                &fetcher,
                "https://raw.githubusercontent.com/acme/style/main/palettes.yaml",
                Some(&token)
            ),
            Some("token pat".to_string())
        );
        assert_eq!(
            authorization(&fetcher, "https://github.com/acme/style/raw/main/themes.yaml", Some(&token)),
            Some("token pat".to_string())
        );
    }

    #[test]
    fn request_omits_token_for_other_hosts() {
        let fetcher = local_fetcher();
        let token = Credential::new("pat");

        assert_eq!(
            authorization(&fetcher, "https://example.com/palettes.yaml", Some(&token)),
            None
        );
        assert_eq!(
            authorization(&fetcher, "https://raw.githubusercontent.com/acme/p.yaml", None),
            None
        );
    }

    // ========================================================================
    // Over the wire
    // ========================================================================

    #[test]
    fn fetch_text_over_http_sends_no_token_to_other_hosts() {
        let (base, server) = serve_once("200 OK", b"a: ['#000']\n");
        let location = Location::parse(&format!("{base}/palettes.yaml")).unwrap();

        let text = local_fetcher()
            .fetch_text(&location, Some(&Credential::new("pat")))
            .unwrap();

        assert_eq!(text, "a: ['#000']\n");
        let head = server.join().unwrap();
        assert!(head.starts_with("get /palettes.yaml"));
        assert!(!head.contains("authorization:"));
    }

    #[test]
    fn non_success_status_is_an_error() {
        let (base, server) = serve_once("404 Not Found", b"");
        let location = Location::parse(&format!("{base}/palettes.yaml")).unwrap();

        let err = local_fetcher().fetch_text(&location, None).unwrap_err();
        server.join().unwrap();

        match err {
            FetchError::Status { url, status } => {
                assert_eq!(status, 404);
                assert!(url.ends_with("/palettes.yaml"));
            }
            other => panic!("Expected Status error, got {other:?}"),
        }
    }

    #[test]
    fn fetch_binary_over_http_writes_temp_file() {
        let (base, server) = serve_once("200 OK", b"\x00\x01font");
        let location = Location::parse(&format!("{base}/Inter-Bold.ttf")).unwrap();

        let fetched = local_fetcher().fetch_binary(&location, None).unwrap();
        server.join().unwrap();

        assert!(matches!(fetched, FetchedFile::Temp(_)));
        assert_eq!(fs::read(fetched.path()).unwrap(), b"\x00\x01font");
        assert!(fetched.path().to_string_lossy().ends_with(".ttf"));
    }

    // ========================================================================
    // Local files
    // ========================================================================

    #[test]
    fn fetch_text_reads_local_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("palettes.yaml");
        fs::write(&path, "npg:\n  - \"#E64B35FF\"\n").unwrap();

        let fetcher = HttpFetcher::new().unwrap();
        let location = Location::parse(path.to_str().unwrap()).unwrap();
        let text = fetcher.fetch_text(&location, None).unwrap();
        assert!(text.contains("#E64B35FF"));
    }

    #[test]
    fn fetch_text_missing_file() {
        let fetcher = HttpFetcher::new().unwrap();
        let location = Location::parse("/nonexistent/path/palettes.yaml").unwrap();
        let err = fetcher.fetch_text(&location, None).unwrap_err();
        assert!(matches!(err, FetchError::FileNotFound { .. }));
    }

    #[test]
    fn fetch_text_rejects_invalid_utf8() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("binary.yaml");
        fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();

        let fetcher = HttpFetcher::new().unwrap();
        let location = Location::Path(path);
        let err = fetcher.fetch_text(&location, None).unwrap_err();
        assert!(matches!(err, FetchError::Io { .. }));
    }

    #[test]
    fn fetch_binary_local_keeps_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("Inter-Regular.ttf");
        fs::write(&path, b"not really a font").unwrap();

        let fetcher = HttpFetcher::new().unwrap();
        let fetched = fetcher
            .fetch_binary(&Location::Path(path.clone()), None)
            .unwrap();
        assert!(matches!(fetched, FetchedFile::Local(_)));
        assert_eq!(fetched.path(), path.as_path());
    }

    #[test]
    fn fetch_binary_missing_local_file() {
        let fetcher = HttpFetcher::new().unwrap();
        let location = Location::parse("/nonexistent/Inter-Bold.ttf").unwrap();
        let err = fetcher.fetch_binary(&location, None).unwrap_err();
        assert!(matches!(err, FetchError::FileNotFound { .. }));
    }
}
