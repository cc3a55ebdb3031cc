// * Outbound request identity built from the Download settings.
// * Rotates the configured User-Agent pool across requests.

use crate::config::DownloadSettings;
use reqwest::header::{HeaderMap, HeaderValue};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Round-robin pool of configured user agents plus the shared cookie.
pub struct UserAgentPool {
    agents: Vec<String>,
    cookie: Option<String>,
    cursor: AtomicUsize,
}

impl UserAgentPool {
    // * Returns None when USER_AGENTS is blank; the caller keeps its
    // * built-in identity in that case.
    pub fn from_settings(download: &DownloadSettings) -> Option<Self> {
        if download.user_agents.is_empty() {
            return None;
        }
        Some(Self {
            agents: download.user_agents.clone(),
            cookie: download.cookie.clone(),
            cursor: AtomicUsize::new(0),
        })
    }

    /// Next agent in rotation order.
    pub fn next_agent(&self) -> &str {
        let idx = self.cursor.fetch_add(1, Ordering::Relaxed);
        &self.agents[idx % self.agents.len()]
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    // * Applies the rotated identity to a mutable HeaderMap.
    // * Values were validated header-safe at settings load time.
    pub fn apply_to_headers(&self, headers: &mut HeaderMap) {
        let agent = self.next_agent();
        headers.insert(
            "User-Agent",
            HeaderValue::from_str(agent).expect("! CRITICAL: Invalid UA"),
        );
        if let Some(cookie) = &self.cookie {
            headers.insert(
                "Cookie",
                HeaderValue::from_str(cookie).expect("! CRITICAL: Invalid Cookie"),
            );
        }
        headers.insert("Accept-Language", HeaderValue::from_static("en-US,en;q=0.9"));
        headers.insert("Upgrade-Insecure-Requests", HeaderValue::from_static("1"));
    }
}
