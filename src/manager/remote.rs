use super::Manager;
use crate::error::{ArsenalError, Result};
use regex::Regex;
use serde_json::Value;
use tracing::debug;

/// One entry of a tool's remote release listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteVersion {
    pub version: String,
    /// Release line codename for long-term-support builds.
    pub lts: Option<String>,
}

impl RemoteVersion {
    pub fn is_lts(&self) -> bool {
        self.lts.is_some()
    }
}

impl Manager {
    /// Versions published upstream, newest first as the listing orders them.
    /// `limit == 0` keeps everything.
    pub fn list_remote(&self, tool: &str, limit: usize) -> Result<Vec<RemoteVersion>> {
        let plugin = self.registry.get(tool)?;
        let url = plugin
            .list_url
            .as_deref()
            .filter(|u| !u.is_empty())
            .ok_or_else(|| ArsenalError::ListingUnavailable {
                tool: tool.to_string(),
            })?;
        let format = plugin.list_format.as_deref().unwrap_or("json");
        if format != "json" {
            return Err(ArsenalError::UnsupportedListFormat {
                format: format.to_string(),
            });
        }
        let pattern = plugin
            .version_regex
            .as_deref()
            .map(Regex::new)
            .transpose()
            .map_err(|e| ArsenalError::InvalidVersionPattern {
                tool: tool.to_string(),
                reason: e.to_string(),
            })?;

        let body = self.downloader.fetch_text(url)?;
        let prefix = plugin.version_prefix.as_deref().unwrap_or("");
        let versions = parse_remote_listing(&body, prefix, pattern.as_ref(), limit)
            .map_err(|reason| ArsenalError::download(url, reason))?;
        debug!("{} remote versions for {tool}", versions.len());
        Ok(versions)
    }
}

/// Parses a JSON array of `{"version": "...", "lts": false | "codename"}`
/// objects. Entries without a string `version` are skipped; `pattern` is
/// matched after `prefix` is stripped.
pub fn parse_remote_listing(
    body: &str,
    prefix: &str,
    pattern: Option<&Regex>,
    limit: usize,
) -> std::result::Result<Vec<RemoteVersion>, String> {
    let doc: Value = serde_json::from_str(body).map_err(|e| format!("invalid listing: {e}"))?;
    let items = doc
        .as_array()
        .ok_or_else(|| "invalid listing: expected a JSON array".to_string())?;

    let mut out = Vec::new();
    for item in items {
        let Some(raw) = item.get("version").and_then(|v| v.as_str()) else {
            continue;
        };
        let version = raw.strip_prefix(prefix).unwrap_or(raw);
        if pattern.is_some_and(|re| !re.is_match(version)) {
            continue;
        }
        let lts = item
            .get("lts")
            .and_then(|v| v.as_str())
            .map(str::to_string);
        out.push(RemoteVersion {
            version: version.to_string(),
            lts,
        });
        if limit > 0 && out.len() == limit {
            break;
        }
    }
    Ok(out)
}
