//! Route mock registry: URL glob patterns mapped to canned responses

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{HarnessError, HarnessResult};

/// A canned HTTP response registered against a URL glob.
///
/// Patterns use Playwright glob syntax: `**` crosses path segments,
/// `*` and `?` stay within one. Mocks are registered once per scenario,
/// before navigation, and never change mid-run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MockRoute {
    pub pattern: String,

    #[serde(default = "default_status")]
    pub status: u16,

    #[serde(default = "default_content_type")]
    pub content_type: String,

    /// JSON body served to the page
    pub body: serde_json::Value,
}

fn default_status() -> u16 {
    200
}

fn default_content_type() -> String {
    "application/json".to_string()
}

/// Ordered collection of mock routes, evaluated first-match-wins
pub struct MockRegistry {
    routes: Vec<CompiledRoute>,
}

struct CompiledRoute {
    route: MockRoute,
    matcher: Regex,
}

impl MockRegistry {
    /// Compile a list of routes, validating every pattern up front
    pub fn new(routes: &[MockRoute]) -> HarnessResult<Self> {
        let compiled = routes
            .iter()
            .map(|route| {
                Ok(CompiledRoute {
                    matcher: glob_to_regex(&route.pattern)?,
                    route: route.clone(),
                })
            })
            .collect::<HarnessResult<Vec<_>>>()?;

        Ok(Self { routes: compiled })
    }

    /// First registered route whose pattern matches the full URL
    pub fn find(&self, url: &str) -> Option<&MockRoute> {
        self.routes
            .iter()
            .find(|c| c.matcher.is_match(url))
            .map(|c| &c.route)
    }

    /// Routes in registration order
    pub fn routes(&self) -> impl DoubleEndedIterator<Item = &MockRoute> {
        self.routes.iter().map(|c| &c.route)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Translate a Playwright-style URL glob into an anchored regex
pub fn glob_to_regex(pattern: &str) -> HarnessResult<Regex> {
    let mut re = String::with_capacity(pattern.len() + 8);
    re.push('^');

    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '*' => {
                if chars.peek() == Some(&'*') {
                    chars.next();
                    re.push_str(".*");
                } else {
                    re.push_str("[^/]*");
                }
            }
            '?' => re.push_str("[^/]"),
            c => re.push_str(&regex::escape(c.encode_utf8(&mut [0; 4]))),
        }
    }

    re.push('$');
    Regex::new(&re).map_err(|e| HarnessError::BadPattern {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })
}
