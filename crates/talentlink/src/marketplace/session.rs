use std::collections::HashMap;

use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use serde::{Deserialize, Serialize};

/// Identity of the signed-in caller as reported by the session provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Resolves the caller's session from request headers.
pub trait SessionProvider: Send + Sync {
    fn resolve(&self, headers: &HeaderMap) -> Option<SessionUser>;
}

/// Bearer-token sessions configured up front.
#[derive(Debug, Default, Clone)]
pub struct StaticTokenSessions {
    tokens: HashMap<String, SessionUser>,
}

impl StaticTokenSessions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(mut self, token: impl Into<String>, user: SessionUser) -> Self {
        self.tokens.insert(token.into(), user);
        self
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl FromIterator<(String, SessionUser)> for StaticTokenSessions {
    fn from_iter<T: IntoIterator<Item = (String, SessionUser)>>(iter: T) -> Self {
        Self {
            tokens: iter.into_iter().collect(),
        }
    }
}

impl SessionProvider for StaticTokenSessions {
    fn resolve(&self, headers: &HeaderMap) -> Option<SessionUser> {
        let token = bearer_token(headers)?;
        self.tokens.get(token).cloned()
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn sessions() -> StaticTokenSessions {
        StaticTokenSessions::new().with_token(
            "tok-1",
            SessionUser {
                id: "user_1".to_string(),
                email: Some("riley@example.com".to_string()),
            },
        )
    }

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).expect("header"));
        headers
    }

    #[test]
    fn resolves_known_bearer_token() {
        let user = sessions().resolve(&headers("Bearer tok-1")).expect("session");
        assert_eq!(user.id, "user_1");
        assert!(sessions().resolve(&headers("bearer tok-1")).is_some());
    }

    #[test]
    fn rejects_missing_unknown_or_malformed_credentials() {
        let sessions = sessions();
        assert!(sessions.resolve(&HeaderMap::new()).is_none());
        assert!(sessions.resolve(&headers("Bearer nope")).is_none());
        assert!(sessions.resolve(&headers("Basic tok-1")).is_none());
        assert!(sessions.resolve(&headers("tok-1")).is_none());
    }
}
