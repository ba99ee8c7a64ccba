//! Session-loading middleware.
//!
//! Decodes and verifies the signed session cookie on every request and
//! injects `CurrentSession` into request extensions. Invalid or absent
//! cookies yield an unauthenticated session — the gates downstream
//! decide what that means per route.

use axum::body::Body;
use axum::http::header::{HeaderMap, COOKIE};
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;

use crate::session::{self, SESSION_COOKIE};

use super::types::{AppContext, CurrentSession};

/// Decode the session cookie and inject `CurrentSession`.
///
/// Reads `AppContext` from request extensions (injected as the
/// outermost Extension layer) for the signing key.
pub async fn load_session(mut req: Request<Body>, next: Next) -> Response {
    let principal = req.extensions().get::<AppContext>().cloned().and_then(|ctx| {
        let raw = cookie_value(req.headers(), SESSION_COOKIE)?;
        match session::decode(&raw, &ctx.config.secret_key) {
            Ok(principal) => Some(principal),
            Err(err) => {
                tracing::debug!(%err, "rejecting session cookie");
                None
            }
        }
    });

    req.extensions_mut().insert(CurrentSession(principal));
    next.run(req).await
}

/// Extract a named cookie from the `Cookie` header.
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let header = headers.get(COOKIE)?.to_str().ok()?;
    header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then(|| value.to_string())
    })
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn cookie_value_finds_named_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("a=1; medibook_session=abc.def; b=2"),
        );
        assert_eq!(
            cookie_value(&headers, SESSION_COOKIE).as_deref(),
            Some("abc.def")
        );
        assert_eq!(cookie_value(&headers, "missing"), None);
    }

    #[test]
    fn cookie_value_handles_absent_header() {
        assert_eq!(cookie_value(&HeaderMap::new(), SESSION_COOKIE), None);
    }
}
