// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Webhook signature verification.
//!
//! Twilio signs `url + key1 + value1 + key2 + value2 ...` (parameters sorted
//! by key) with HMAC-SHA1 keyed by the account auth token, base64-encoded.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use sha1::Sha1;
use solace_core::SignatureVerifier;
use tracing::debug;

type HmacSha1 = Hmac<Sha1>;

fn signing_mac(auth_token: &str, url: &str, params: &[(String, String)]) -> HmacSha1 {
    let mut sorted: Vec<&(String, String)> = params.iter().collect();
    sorted.sort();

    let mut mac =
        HmacSha1::new_from_slice(auth_token.as_bytes()).expect("HMAC accepts any key length");
    mac.update(url.as_bytes());
    for (key, value) in sorted {
        mac.update(key.as_bytes());
        mac.update(value.as_bytes());
    }
    mac
}

/// Base64 signature Twilio would send for this request.
pub fn compute_signature(auth_token: &str, url: &str, params: &[(String, String)]) -> String {
    STANDARD.encode(signing_mac(auth_token, url, params).finalize().into_bytes())
}

/// Verifies signatures with the account auth token.
pub struct TwilioSignatureVerifier {
    auth_token: String,
}

impl TwilioSignatureVerifier {
    pub fn new(auth_token: impl Into<String>) -> Self {
        Self {
            auth_token: auth_token.into(),
        }
    }
}

impl std::fmt::Debug for TwilioSignatureVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwilioSignatureVerifier")
            .field("auth_token", &"[REDACTED]")
            .finish()
    }
}

impl SignatureVerifier for TwilioSignatureVerifier {
    fn verify(&self, url: &str, params: &[(String, String)], signature: &str) -> bool {
        let Ok(expected) = STANDARD.decode(signature.trim()) else {
            debug!("signature is not valid base64");
            return false;
        };
        signing_mac(&self.auth_token, url, params)
            .verify_slice(&expected)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> Vec<(String, String)> {
        vec![
            ("To".into(), "+15550000001".into()),
            ("From".into(), "+15550000002".into()),
            ("Body".into(), "Hello".into()),
            ("SmsSid".into(), "SM123".into()),
        ]
    }

    const URL: &str = "https://solace.example.com/sms/inbound";

    #[test]
    fn signature_is_order_independent() {
        let mut reversed = params();
        reversed.reverse();
        assert_eq!(
            compute_signature("token", URL, &params()),
            compute_signature("token", URL, &reversed)
        );
    }

    #[test]
    fn verifier_accepts_own_signature() {
        let signature = compute_signature("token", URL, &params());
        assert!(TwilioSignatureVerifier::new("token").verify(URL, &params(), &signature));
    }

    #[test]
    fn verifier_rejects_tampering() {
        let signature = compute_signature("token", URL, &params());
        let verifier = TwilioSignatureVerifier::new("token");

        let mut tampered = params();
        tampered[2].1 = "Goodbye".into();
        assert!(!verifier.verify(URL, &tampered, &signature));
        assert!(!verifier.verify("https://evil.example.com/sms/inbound", &params(), &signature));
        assert!(!TwilioSignatureVerifier::new("other").verify(URL, &params(), &signature));
        assert!(!verifier.verify(URL, &params(), "not base64!"));
    }

    #[test]
    fn debug_redacts_token() {
        let rendered = format!("{:?}", TwilioSignatureVerifier::new("secret-token"));
        assert!(!rendered.contains("secret-token"));
    }
}
