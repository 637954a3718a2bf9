//! Response metadata: status, rate-limit quota and pagination links.

use gitscout_types::RateSnapshot;
use reqwest::{
    StatusCode, Url,
    header::{HeaderMap, LINK},
};
use serde::Serialize;
use std::fmt;

const HEADER_RATE_LIMIT: &str = "x-ratelimit-limit";
const HEADER_RATE_REMAINING: &str = "x-ratelimit-remaining";
const HEADER_RATE_RESET: &str = "x-ratelimit-reset";

/// Rate-limit quota reported in the `X-RateLimit-*` headers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Rate {
    pub limit: u32,
    pub remaining: u32,
    /// Unix timestamp (seconds) at which the quota resets.
    pub reset: u64,
}

impl Rate {
    /// Parse the quota headers. Returns `None` unless all three are present and numeric.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        fn header<T: std::str::FromStr>(headers: &HeaderMap, name: &str) -> Option<T> {
            headers.get(name)?.to_str().ok()?.trim().parse().ok()
        }
        Some(Self {
            limit: header(headers, HEADER_RATE_LIMIT)?,
            remaining: header(headers, HEADER_RATE_REMAINING)?,
            reset: header(headers, HEADER_RATE_RESET)?,
        })
    }

    #[must_use]
    pub fn snapshot(self) -> RateSnapshot {
        RateSnapshot {
            limit: self.limit,
            remaining: self.remaining,
            reset_at: self.reset,
        }
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} remaining, resets at {}",
            self.remaining, self.limit, self.reset
        )
    }
}

/// Metadata about a completed request, returned next to every payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Response {
    pub status: u16,
    pub rate: Option<Rate>,
    pub next_page: Option<u32>,
    pub prev_page: Option<u32>,
    pub first_page: Option<u32>,
    pub last_page: Option<u32>,
}

impl Response {
    /// Build the metadata from a status line and response headers.
    #[must_use]
    pub fn from_parts(status: StatusCode, headers: &HeaderMap) -> Self {
        let mut response = Self {
            status: status.as_u16(),
            rate: Rate::from_headers(headers),
            ..Self::default()
        };
        if let Some(link) = headers.get(LINK).and_then(|v| v.to_str().ok()) {
            response.apply_links(link);
        }
        response
    }

    /// Fill page numbers from a `Link` header value such as
    /// `<https://api.github.com/orgs/x/repos?page=2>; rel="next"`.
    fn apply_links(&mut self, header: &str) {
        for part in header.split(',') {
            let mut segments = part.split(';');
            let Some(target) = segments
                .next()
                .map(str::trim)
                .and_then(|s| s.strip_prefix('<'))
                .and_then(|s| s.strip_suffix('>'))
            else {
                continue;
            };
            let Some(page) = page_param(target) else {
                continue;
            };
            for segment in segments {
                match segment.trim() {
                    r#"rel="next""# => self.next_page = Some(page),
                    r#"rel="prev""# => self.prev_page = Some(page),
                    r#"rel="first""# => self.first_page = Some(page),
                    r#"rel="last""# => self.last_page = Some(page),
                    _ => {}
                }
            }
        }
    }
}

fn page_param(target: &str) -> Option<u32> {
    let url = Url::parse(target).ok()?;
    url.query_pairs()
        .find(|(k, _)| k == "page")
        .and_then(|(_, v)| v.parse().ok())
}
