//! Authenticated GitHub client
//!
//! Session bootstrap and the production [`Session`] implementation, built on
//! reqwest's blocking client. The whole tool is strictly sequential, so
//! blocking I/O with the transport's default timeouts is all we need.

use std::io::{self, BufRead, Write};

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::StatusCode;

use crate::github::error::ApiError;
use crate::github::model::{AuthenticatedUser, CodeHit, RateLimitStatus, ResetTimes, SearchPage};
use crate::github::Session;

pub const DEFAULT_BASE_URL: &str = "https://api.github.com";

/// Media type that makes the search endpoint include text match excerpts.
const ACCEPT_TEXT_MATCH: &str = "application/vnd.github.v3.text-match+json";

const USER_AGENT: &str = concat!("ghdork/", env!("CARGO_PKG_VERSION"));

/// The code search API serves at most 100 results per page and exposes only
/// the first 1000 results of any query.
const SEARCH_PAGE_SIZE: usize = 100;
const SEARCH_MAX_PAGES: u32 = 10;

/// Credentials supplied out-of-band via environment or flags.
#[derive(Debug, Clone)]
pub enum Credentials {
    Token(String),
    Basic { username: String, password: String },
    Anonymous,
}

impl Credentials {
    /// Resolve credentials from the optional pieces the CLI collected.
    /// A token wins over basic credentials; anything less is anonymous.
    pub fn from_parts(
        token: Option<String>,
        username: Option<String>,
        password: Option<String>,
    ) -> Self {
        if let Some(token) = token {
            return Credentials::Token(token);
        }
        match (username, password) {
            (Some(username), Some(password)) => Credentials::Basic { username, password },
            _ => Credentials::Anonymous,
        }
    }
}

#[derive(Debug, Clone)]
enum Auth {
    Token(String),
    Basic {
        username: String,
        password: String,
        otp: Option<String>,
    },
    Anonymous,
}

pub struct GithubClient {
    http: Client,
    base: String,
    auth: Auth,
}

impl GithubClient {
    /// Build a client against api.github.com or a GitHub Enterprise base URL.
    ///
    /// Basic credentials are probed once so a two-factor challenge can be
    /// resolved interactively before the run starts.
    pub fn login(credentials: &Credentials, base_url: Option<&str>) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_TEXT_MATCH));

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;

        let auth = match credentials {
            Credentials::Token(token) => Auth::Token(token.clone()),
            Credentials::Basic { username, password } => Auth::Basic {
                username: username.clone(),
                password: password.clone(),
                otp: None,
            },
            Credentials::Anonymous => Auth::Anonymous,
        };

        let mut client = Self {
            http,
            base: base_url.unwrap_or(DEFAULT_BASE_URL).trim_end_matches('/').to_string(),
            auth,
        };

        if matches!(client.auth, Auth::Basic { .. }) {
            client.negotiate_two_factor()?;
        }

        Ok(client)
    }

    /// The authenticated user, used to confirm the session works.
    pub fn me(&self) -> Result<AuthenticatedUser, ApiError> {
        let resp = self.get("/user").send()?;
        Ok(classify(resp)?.json()?)
    }

    fn get(&self, path: &str) -> RequestBuilder {
        let builder = self.http.get(format!("{}{}", self.base, path));
        match &self.auth {
            Auth::Token(token) => builder.header(AUTHORIZATION, format!("token {}", token)),
            Auth::Basic {
                username,
                password,
                otp,
            } => {
                let builder = builder.basic_auth(username, Some(password));
                match otp {
                    Some(code) => builder.header("x-github-otp", code),
                    None => builder,
                }
            }
            Auth::Anonymous => builder,
        }
    }

    /// Probe `/user` with the basic credentials; if GitHub answers with a
    /// two-factor challenge, prompt for a code and attach it to every
    /// subsequent request.
    fn negotiate_two_factor(&mut self) -> Result<(), ApiError> {
        let resp = self.get("/user").send()?;
        if resp.status() == StatusCode::UNAUTHORIZED && has_otp_challenge(&resp) {
            let code = prompt_two_factor()?;
            if let Auth::Basic { otp, .. } = &mut self.auth {
                *otp = Some(code);
            }
        }
        Ok(())
    }

    fn fetch_search_page(&self, query: &str, page: u32) -> Result<SearchPage, ApiError> {
        let page = page.to_string();
        let per_page = SEARCH_PAGE_SIZE.to_string();
        let resp = self
            .get("/search/code")
            .query(&[
                ("q", query),
                ("per_page", per_page.as_str()),
                ("page", page.as_str()),
            ])
            .send()?;
        Ok(classify(resp)?.json()?)
    }
}

impl Session for GithubClient {
    fn rate_limits(&self) -> Result<ResetTimes, ApiError> {
        let resp = self.get("/rate_limit").send()?;
        let status: RateLimitStatus = classify(resp)?.json()?;
        Ok(status.into())
    }

    fn lookup_user(&self, name: &str) -> Result<(), ApiError> {
        let resp = self.get(&format!("/users/{}", name)).send()?;
        classify(resp).map(|_| ())
    }

    fn lookup_org(&self, name: &str) -> Result<(), ApiError> {
        let resp = self.get(&format!("/orgs/{}", name)).send()?;
        classify(resp).map(|_| ())
    }

    fn search_code<'a>(
        &'a self,
        query: &str,
    ) -> Box<dyn Iterator<Item = Result<CodeHit, ApiError>> + 'a> {
        Box::new(CodeSearchIter {
            client: self,
            query: query.to_string(),
            next_page: 1,
            buffer: Vec::new().into_iter(),
            done: false,
        })
    }
}

/// Lazy pagination over `/search/code`.
///
/// Pages are fetched on demand; a failed page fetch surfaces as one `Err`
/// item and ends the stream.
struct CodeSearchIter<'a> {
    client: &'a GithubClient,
    query: String,
    next_page: u32,
    buffer: std::vec::IntoIter<CodeHit>,
    done: bool,
}

impl Iterator for CodeSearchIter<'_> {
    type Item = Result<CodeHit, ApiError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(hit) = self.buffer.next() {
                return Some(Ok(hit));
            }
            if self.done || self.next_page > SEARCH_MAX_PAGES {
                return None;
            }
            match self.client.fetch_search_page(&self.query, self.next_page) {
                Ok(page) => {
                    if page.items.is_empty() {
                        self.done = true;
                        return None;
                    }
                    let fetched = self.next_page as u64 * SEARCH_PAGE_SIZE as u64;
                    if page.items.len() < SEARCH_PAGE_SIZE || fetched >= page.total_count {
                        self.done = true;
                    }
                    self.next_page += 1;
                    self.buffer = page.items.into_iter();
                }
                Err(err) => {
                    self.done = true;
                    return Some(Err(err));
                }
            }
        }
    }
}

/// Map a response to the error taxonomy, passing successes through.
fn classify(resp: Response) -> Result<Response, ApiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    Err(ApiError::from_status(status.as_u16(), error_message(resp)))
}

/// Pull the `message` field out of a GitHub error body, falling back to the
/// raw body text.
fn error_message(resp: Response) -> String {
    let body = resp.text().unwrap_or_default();
    serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| {
            v.get("message")
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or(body)
}

fn has_otp_challenge(resp: &Response) -> bool {
    resp.headers()
        .get("x-github-otp")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with("required"))
        .unwrap_or(false)
}

fn prompt_two_factor() -> Result<String, ApiError> {
    let stdin = io::stdin();
    loop {
        eprint!("Two-factor authentication code: ");
        io::stderr().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Err(ApiError::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "stdin closed during two-factor prompt",
            )));
        }
        let code = line.trim().to_string();
        if !code.is_empty() {
            return Ok(code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_token_wins() {
        let creds = Credentials::from_parts(
            Some("tok".to_string()),
            Some("user".to_string()),
            Some("pass".to_string()),
        );
        assert!(matches!(creds, Credentials::Token(t) if t == "tok"));
    }

    #[test]
    fn test_credentials_basic_requires_both_parts() {
        let creds = Credentials::from_parts(None, Some("user".to_string()), None);
        assert!(matches!(creds, Credentials::Anonymous));

        let creds =
            Credentials::from_parts(None, Some("user".to_string()), Some("pass".to_string()));
        assert!(matches!(creds, Credentials::Basic { .. }));
    }

    #[test]
    fn test_login_trims_trailing_slash() {
        let client = GithubClient::login(
            &Credentials::Anonymous,
            Some("https://github.example.com/api/v3/"),
        )
        .unwrap();
        assert_eq!(client.base, "https://github.example.com/api/v3");
    }

    #[test]
    fn test_login_defaults_to_public_api() {
        let client = GithubClient::login(&Credentials::Anonymous, None).unwrap();
        assert_eq!(client.base, DEFAULT_BASE_URL);
    }
}
