//! One-shot flash messages, carried in a short-lived cookie.
//!
//! Set alongside a redirect, read and cleared on the next render.
//! Cookie value format: `<level>:<message-b64>` — base64 keeps
//! arbitrary message text cookie-safe.

use axum::http::header::{HeaderMap, HeaderValue};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

pub const FLASH_COOKIE: &str = "medibook_flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashLevel {
    Success,
    Danger,
}

impl FlashLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Danger => "danger",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "success" => Some(Self::Success),
            "danger" => Some(Self::Danger),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Success,
            message: message.into(),
        }
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Danger,
            message: message.into(),
        }
    }

    /// `Set-Cookie` value that stores this flash for the next request.
    pub fn set_cookie(&self) -> HeaderValue {
        let encoded = URL_SAFE_NO_PAD.encode(self.message.as_bytes());
        let value = format!(
            "{FLASH_COOKIE}={}:{encoded}; Path=/; Max-Age=60; HttpOnly",
            self.level.as_str()
        );
        HeaderValue::from_str(&value).unwrap_or_else(|_| {
            HeaderValue::from_static("medibook_flash=; Path=/; Max-Age=0")
        })
    }
}

/// `Set-Cookie` value that clears the flash after rendering it.
pub fn clear_cookie() -> HeaderValue {
    HeaderValue::from_static("medibook_flash=; Path=/; Max-Age=0; HttpOnly")
}

/// Read the pending flash from the request headers, if any.
pub fn read(headers: &HeaderMap) -> Option<Flash> {
    let raw = super::middleware::cookie_value(headers, FLASH_COOKIE)?;
    let (level, encoded) = raw.split_once(':')?;
    let level = FlashLevel::parse(level)?;
    let bytes = URL_SAFE_NO_PAD.decode(encoded).ok()?;
    let message = String::from_utf8(bytes).ok()?;
    Some(Flash { level, message })
}

#[cfg(test)]
mod tests {
    use axum::http::header::COOKIE;

    use super::*;

    #[test]
    fn flash_round_trips_through_cookie() {
        let flash = Flash::danger("Passwords do not match.");
        let set = flash.set_cookie();
        let set = set.to_str().unwrap();
        let value = set
            .strip_prefix("medibook_flash=")
            .unwrap()
            .split(';')
            .next()
            .unwrap();

        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_str(&format!("{FLASH_COOKIE}={value}")).unwrap(),
        );
        assert_eq!(read(&headers), Some(flash));
    }

    #[test]
    fn garbage_cookie_reads_as_none() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("medibook_flash=nonsense"),
        );
        assert_eq!(read(&headers), None);
        assert_eq!(read(&HeaderMap::new()), None);
    }
}
