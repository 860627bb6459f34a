//! Base URL resolution.
//!
//! The API base URL is resolved once at startup from, in order: an explicit
//! value (command line), the `TODO_API_BASE_URL` environment variable, and
//! the config file. Blank values are skipped. A value of `/` means "same
//! origin": the client then builds relative paths such as `/todos`.

use std::fmt;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const BASE_URL_ENV: &str = "TODO_API_BASE_URL";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseUrlSource {
    Explicit,
    Environment,
    ConfigFile,
    Default,
}

impl fmt::Display for BaseUrlSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BaseUrlSource::Explicit => "command line",
            BaseUrlSource::Environment => BASE_URL_ENV,
            BaseUrlSource::ConfigFile => "config file",
            BaseUrlSource::Default => "default",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBaseUrl {
    pub url: String,
    pub source: BaseUrlSource,
}

pub fn resolve_base_url(
    explicit: Option<&str>,
    environment: Option<&str>,
    config_file: Option<&str>,
) -> ResolvedBaseUrl {
    let candidates = [
        (explicit, BaseUrlSource::Explicit),
        (environment, BaseUrlSource::Environment),
        (config_file, BaseUrlSource::ConfigFile),
    ];
    for (value, source) in candidates {
        if let Some(url) = value.map(str::trim).filter(|v| !v.is_empty()) {
            return ResolvedBaseUrl {
                url: url.to_string(),
                source,
            };
        }
    }
    ResolvedBaseUrl {
        url: DEFAULT_BASE_URL.to_string(),
        source: BaseUrlSource::Default,
    }
}
