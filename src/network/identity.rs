use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};

// * BrowserIdentity is the header set sent with every documentation request.
// * Documentation hosts reject obvious bot user agents, so we present as desktop Chrome.
#[derive(Debug, Clone)]
pub struct BrowserIdentity {
    pub user_agent: String,
    pub accept: String,
    pub accept_language: String,
}

impl BrowserIdentity {
    // * Desktop Chrome 91 on Windows, matching the Accept headers a browser sends for documents
    pub fn desktop_chrome() -> Self {
        let full_version = "91.0.4472.124";

        Self {
            user_agent: format!(
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/{} Safari/537.36",
                full_version
            ),
            accept: "text/html,application/xhtml+xml,application/xml".to_string(),
            accept_language: "en-US,en;q=0.9".to_string(),
        }
    }

    // * Applies the identity to a mutable HeaderMap. Values that are not valid header text are skipped.
    pub fn apply_to_headers(&self, headers: &mut HeaderMap) {
        let pairs = [
            (USER_AGENT, &self.user_agent),
            (ACCEPT, &self.accept),
            (ACCEPT_LANGUAGE, &self.accept_language),
        ];
        for (name, value) in pairs {
            match HeaderValue::from_str(value) {
                Ok(value) => {
                    headers.insert(name, value);
                }
                Err(_) => tracing::warn!(header = %name, "Skipping invalid identity header"),
            }
        }
    }
}

impl Default for BrowserIdentity {
    fn default() -> Self {
        Self::desktop_chrome()
    }
}
