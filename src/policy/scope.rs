// * Feed/sitemap URL scoping driven by the EXTERNAL_URLS toggle.
// * When the toggle is off, candidates must stay on the source domain.

use crate::config::UrlSettings;
use url::Url;

/// Decides whether discovered URLs outside the source domain are kept.
#[derive(Debug, Clone, Copy)]
pub struct UrlPolicy {
    allow_external: bool,
}

impl UrlPolicy {
    pub fn from_settings(urls: &UrlSettings) -> Self {
        Self {
            allow_external: urls.external_urls,
        }
    }

    /// Whether a candidate discovered under `base` should be kept.
    pub fn permits(&self, base: &Url, candidate: &Url) -> bool {
        if !matches!(candidate.scheme(), "http" | "https") {
            return false;
        }
        if self.allow_external {
            return true;
        }
        match (base.host_str(), candidate.host_str()) {
            (Some(base_host), Some(candidate_host)) => same_domain(base_host, candidate_host),
            _ => false,
        }
    }
}

// * Hosts match when equal (www.-insensitive) or when they share the same
// * last-two-label domain, e.g. news.example.org vs example.org
fn same_domain(base: &str, candidate: &str) -> bool {
    let base = base.strip_prefix("www.").unwrap_or(base);
    let candidate = candidate.strip_prefix("www.").unwrap_or(candidate);
    if base.eq_ignore_ascii_case(candidate) {
        return true;
    }
    match (root_domain(base), root_domain(candidate)) {
        (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
        _ => false,
    }
}

fn root_domain(host: &str) -> Option<&str> {
    let mut labels = host.rsplitn(3, '.');
    let tld = labels.next()?;
    let second = labels.next()?;
    // * IP literals and single-label hosts have no registrable domain
    if tld.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let offset = host.len() - tld.len() - second.len() - 1;
    Some(&host[offset..])
}
