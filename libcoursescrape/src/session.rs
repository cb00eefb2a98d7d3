use crate::errors::CourseError;
use reqwest::header::{HeaderMap, HeaderValue, COOKIE};
use reqwest::{Client, Proxy, StatusCode};
use std::path::Path;
use tokio::fs;
use url::Url;

pub const DEFAULT_PROXY: &str = "socks5://localhost:8080";
pub const DEFAULT_COOKIE_FILE: &str = "cookies.txt";

const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/108.0.0.0 Safari/537.36";

/// A fetched page. Only successful (2xx) responses are ever turned into one.
#[derive(Debug)]
pub struct Page {
    pub url: Url,
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

/// An http client bound to a proxy and a static cookie header.
/// Created once per run and shared by every request.
#[derive(Debug, Clone)]
pub struct Session {
    client: Client,
    cookie: HeaderValue,
}

impl Session {
    /// `proxy` of `None` means direct connections, environment proxies are ignored too.
    pub fn new(cookie_header: &str, proxy: Option<&str>) -> Result<Self, CourseError> {
        let cookie_header = cookie_header.trim();
        if cookie_header.is_empty() {
            return Err(CourseError::InvalidCookie("cookie header is empty".into()));
        }
        let cookie = HeaderValue::from_str(cookie_header)
            .map_err(|e| CourseError::InvalidCookie(e.to_string()))?;

        let mut builder = Client::builder().user_agent(USER_AGENT);
        builder = match proxy {
            Some(proxy_url) => {
                let proxy = Proxy::all(proxy_url)
                    .map_err(|e| CourseError::InvalidProxy(format!("{proxy_url} | {e}")))?;
                builder.proxy(proxy)
            }
            None => builder.no_proxy(),
        };
        let client = builder
            .build()
            .map_err(|e| CourseError::NetworkError(e.to_string()))?;

        Ok(Session { client, cookie })
    }

    /// Sends a GET request carrying the session cookie plus `extra_headers`.
    /// Non-2xx responses are turned into [`CourseError::ErrorStatusCode`].
    #[tracing::instrument(skip(self, url, extra_headers), fields(url = %url))]
    pub async fn send(&self, url: &Url, extra_headers: HeaderMap) -> Result<Page, CourseError> {
        let request = self
            .client
            .get(url.clone())
            .headers(extra_headers)
            .header(COOKIE, self.cookie.clone())
            .build()
            .map_err(|e| CourseError::NetworkError(e.to_string()))?;

        tracing::debug!("REQUEST METHOD: {}", request.method());
        tracing::debug!("REQUEST URL: {}", request.url());
        tracing::debug!("REQUEST HEADERS:\n{:?}", request.headers());

        let response = match self.client.execute(request).await {
            Ok(r) => r,
            Err(e) => {
                tracing::error!("Error fetching page from {}", url);
                tracing::error!("{}", e);
                return Err(CourseError::NetworkError(format!("{url} | {e}")));
            }
        };

        let status = response.status();
        let headers = response.headers().clone();
        tracing::debug!("RESPONSE STATUS: {}", status);
        tracing::debug!("RESPONSE HEADERS:\n{:?}", headers);

        if !status.is_success() {
            tracing::error!("Error status code received : {} |{}|", status, url);
            return Err(CourseError::ErrorStatusCode {
                status_code: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| CourseError::NetworkError(format!("{url} | {e}")))?;

        Ok(Page {
            url: url.clone(),
            status,
            headers,
            body,
        })
    }

    pub async fn fetch(&self, url: &Url) -> Result<Page, CourseError> {
        self.send(url, HeaderMap::new()).await
    }
}

/// Reads the whole cookie header from `path`. The content is used verbatim
/// (surrounding whitespace trimmed) as the `Cookie` request header.
#[tracing::instrument]
pub async fn read_cookie_header(path: &Path) -> Result<String, CourseError> {
    let path_name = path.to_string_lossy().to_string();
    let content = match fs::read_to_string(path).await {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::error!("Error: '{}' file not found.", path_name);
            return Err(CourseError::MissingCookieFile(path_name));
        }
        Err(e) => {
            tracing::error!("Error reading cookie file {}\nError : {}", path_name, e);
            return Err(CourseError::FileOperationError {
                file_name: path_name,
                message: format!("{} | {}", e, e.kind()),
            });
        }
    };
    let cookie_header = content.trim();
    if cookie_header.is_empty() {
        tracing::error!("Cookie header is empty.");
        return Err(CourseError::EmptyCookieFile(path_name));
    }
    Ok(cookie_header.to_string())
}
