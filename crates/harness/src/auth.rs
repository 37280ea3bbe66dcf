//! Per-run authentication configuration

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::{HarnessError, HarnessResult};

/// Identity injected into the browser context before the first navigation.
///
/// The application resolves the current user from a signed `token` cookie.
/// The cookie must be in place before any page load, or the mocked
/// `/api/auth/me` identity never resolves and the app bounces to login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub user_id: String,
    pub name: String,
    pub role: String,

    /// Signed bearer token accepted by the app's auth middleware
    pub token: String,

    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
}

fn default_cookie_name() -> String {
    "token".to_string()
}

impl AuthConfig {
    /// Cookie record in the shape Playwright's `context.addCookies` expects:
    /// HttpOnly, not Secure, SameSite=Lax, scoped to the target domain.
    pub fn cookie_json(&self, domain: &str) -> serde_json::Value {
        json!({
            "name": self.cookie_name,
            "value": self.token,
            "domain": domain,
            "path": "/",
            "httpOnly": true,
            "secure": false,
            "sameSite": "Lax",
        })
    }
}

/// Extract the cookie domain from the target base URL
pub fn cookie_domain(base_url: &str) -> HarnessResult<String> {
    let url = reqwest::Url::parse(base_url)
        .map_err(|_| HarnessError::BadBaseUrl(base_url.to_string()))?;
    url.host_str()
        .map(String::from)
        .ok_or_else(|| HarnessError::BadBaseUrl(base_url.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AuthConfig {
        AuthConfig {
            user_id: "user1".to_string(),
            name: "Voter User".to_string(),
            role: "VOTER".to_string(),
            token: "aaa.bbb.ccc".to_string(),
            cookie_name: default_cookie_name(),
        }
    }

    #[test]
    fn test_cookie_json_shape() {
        let cookie = sample().cookie_json("localhost");
        assert_eq!(cookie["name"], "token");
        assert_eq!(cookie["value"], "aaa.bbb.ccc");
        assert_eq!(cookie["domain"], "localhost");
        assert_eq!(cookie["path"], "/");
        assert_eq!(cookie["httpOnly"], true);
        assert_eq!(cookie["secure"], false);
        assert_eq!(cookie["sameSite"], "Lax");
    }

    #[test]
    fn test_cookie_domain_strips_port() {
        assert_eq!(cookie_domain("http://localhost:3000").unwrap(), "localhost");
        assert_eq!(cookie_domain("http://127.0.0.1:8080").unwrap(), "127.0.0.1");
    }

    #[test]
    fn test_cookie_domain_rejects_garbage() {
        assert!(cookie_domain("not a url").is_err());
    }

    #[test]
    fn test_cookie_name_defaults_in_yaml() {
        let yaml = r#"
user_id: admin1
name: Admin User
role: ADMIN
token: abc
"#;
        let auth: AuthConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(auth.cookie_name, "token");
    }
}
