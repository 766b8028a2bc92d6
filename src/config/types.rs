use serde::Deserialize;
use std::collections::BTreeMap;

/// Main configuration structure for ipt-report
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub http: HttpConfig,

    /// IPT instances keyed by alias
    #[serde(default)]
    pub ipts: BTreeMap<String, IptEntry>,
}

/// HTTP client configuration
///
/// Every field is optional. An unset timeout means the client waits as long
/// as the remote end keeps the connection open.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HttpConfig {
    /// Total request timeout in seconds
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: Option<u64>,

    /// Connection establishment timeout in seconds
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: Option<u64>,

    /// User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: Option<String>,
}

/// A single IPT entry in the configuration file
#[derive(Debug, Clone, Deserialize)]
pub struct IptEntry {
    /// Home page of the IPT, the one embedding the resource table
    pub url: String,
}

/// An IPT instance to crawl, identified by its alias
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub alias: String,
    pub url: String,
}

impl Config {
    /// Returns every crawlable source
    ///
    /// Entries with an empty alias are skipped.
    pub fn sources(&self) -> Vec<Source> {
        self.ipts
            .iter()
            .filter(|(alias, _)| !alias.is_empty())
            .map(|(alias, entry)| Source {
                alias: alias.clone(),
                url: entry.url.clone(),
            })
            .collect()
    }
}
