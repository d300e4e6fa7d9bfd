//! One-shot flash messages
//!
//! Messages queued during a POST survive the redirect in a signed cookie and
//! are consumed by the next form render.
//!
//! Cookie value: base64url(json(messages) || HMAC-SHA256(secret, json)).

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;

pub const FLASH_COOKIE: &str = "flash";

/// Oldest messages are dropped past this so the cookie stays well under 4 KiB
pub const MAX_PENDING: usize = 8;

const MAC_LEN: usize = 32;

type HmacSha256 = Hmac<Sha256>;

/// Invalid flash signing key
#[derive(Debug, thiserror::Error)]
#[error("flash signing key rejected")]
pub struct InvalidKey;

/// Signs and verifies flash cookie payloads
#[derive(Clone)]
pub struct FlashSigner {
    mac: HmacSha256,
}

impl FlashSigner {
    pub fn new(secret: &[u8]) -> Result<Self, InvalidKey> {
        let mac = HmacSha256::new_from_slice(secret).map_err(|_| InvalidKey)?;
        Ok(Self { mac })
    }

    /// Encode messages into a cookie value
    pub fn sign(&self, messages: &[String]) -> String {
        // Vec<String> always serializes
        let payload = serde_json::to_vec(messages).unwrap_or_default();

        let mut mac = self.mac.clone();
        mac.update(&payload);
        let tag = mac.finalize().into_bytes();

        let mut token = payload;
        token.extend_from_slice(&tag);
        base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(token)
    }

    /// Decode a cookie value; `None` if it was tampered with or garbled.
    pub fn verify(&self, value: &str) -> Option<Vec<String>> {
        let decoded = base64::engine::general_purpose::URL_SAFE_NO_PAD
            .decode(value)
            .ok()?;
        if decoded.len() < MAC_LEN {
            return None;
        }

        let (payload, tag) = decoded.split_at(decoded.len() - MAC_LEN);
        let mut mac = self.mac.clone();
        mac.update(payload);
        mac.verify_slice(tag).ok()?;

        serde_json::from_slice(payload).ok()
    }

    /// Messages currently pending in the jar
    pub fn pending(&self, jar: &CookieJar) -> Vec<String> {
        jar.get(FLASH_COOKIE)
            .and_then(|cookie| {
                let messages = self.verify(cookie.value());
                if messages.is_none() {
                    tracing::warn!("Discarding flash cookie with bad signature");
                }
                messages
            })
            .unwrap_or_default()
    }

    /// Queue a message for the next render
    pub fn push(&self, jar: CookieJar, message: impl Into<String>) -> CookieJar {
        let mut messages = self.pending(&jar);
        messages.push(message.into());
        if messages.len() > MAX_PENDING {
            messages.drain(..messages.len() - MAX_PENDING);
        }

        let cookie = Cookie::build((FLASH_COOKIE, self.sign(&messages)))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax);
        jar.add(cookie)
    }

    /// Drain pending messages and clear the cookie
    pub fn take(&self, jar: CookieJar) -> (CookieJar, Vec<String>) {
        let messages = self.pending(&jar);
        if jar.get(FLASH_COOKIE).is_none() {
            return (jar, messages);
        }
        (jar.remove(Cookie::build(FLASH_COOKIE).path("/")), messages)
    }
}
