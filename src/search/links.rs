//! Link sources for link-based search
//!
//! Listing URLs from fupa.net and fussball.de define the search scope. The
//! backend interprets them; the client only sorts them into the right query
//! parameter and guesses a center from fupa's `/region/<name>/` paths.

use crate::error::{Error, Result};
use reqwest::Url;

/// A supported listing URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkSource {
    Fupa(String),
    FussballDe(String),
}

fn host_matches(host: &str, domain: &str) -> bool {
    host == domain || host.ends_with(&format!(".{}", domain))
}

impl LinkSource {
    /// Classify a URL by its host
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        let url = Url::parse(trimmed)
            .map_err(|e| Error::Validation(format!("Invalid source URL '{}': {}", trimmed, e)))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::Validation(format!(
                "Source URL must be http(s): {}",
                trimmed
            )));
        }

        let host = url.host_str().unwrap_or_default().to_lowercase();
        if host_matches(&host, "fupa.net") {
            Ok(LinkSource::Fupa(trimmed.to_string()))
        } else if host_matches(&host, "fussball.de") {
            Ok(LinkSource::FussballDe(trimmed.to_string()))
        } else {
            Err(Error::Validation(format!(
                "Unsupported source '{}': only fupa.net and fussball.de links are supported",
                trimmed
            )))
        }
    }

    pub fn url(&self) -> &str {
        match self {
            LinkSource::Fupa(url) | LinkSource::FussballDe(url) => url,
        }
    }
}

/// Link sources grouped by query parameter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifiedLinks {
    /// First fussball.de match calendar; later ones are ignored
    pub fussballde: Option<String>,
    pub fupa: Vec<String>,
}

impl ClassifiedLinks {
    /// Classify every non-blank source, failing on the first unsupported one
    pub fn from_sources<S: AsRef<str>>(sources: &[S]) -> Result<Self> {
        let mut links = Self::default();

        for source in sources.iter().map(AsRef::<str>::as_ref).filter(|s| !s.trim().is_empty()) {
            match LinkSource::parse(source)? {
                LinkSource::FussballDe(url) => {
                    if links.fussballde.is_none() {
                        links.fussballde = Some(url);
                    }
                }
                LinkSource::Fupa(url) => links.fupa.push(url),
            }
        }

        Ok(links)
    }

    pub fn is_empty(&self) -> bool {
        self.fussballde.is_none() && self.fupa.is_empty()
    }

    /// fupa URLs as sent on the wire
    pub fn fupa_joined(&self) -> Option<String> {
        if self.fupa.is_empty() {
            None
        } else {
            Some(self.fupa.join(","))
        }
    }
}

/// Extract the region name from a `.../region/<name>/...` URL
pub fn region_keyword(raw: &str) -> Option<String> {
    let url = Url::parse(raw.trim()).ok()?;
    let mut segments = url.path_segments()?.filter(|s| !s.is_empty());

    segments.find(|s| s.eq_ignore_ascii_case("region"))?;
    let token = segments.next()?;

    let decoded = urlencoding::decode(token).ok()?;
    let keyword = decoded.trim();
    if keyword.is_empty() {
        None
    } else {
        Some(keyword.to_string())
    }
}
