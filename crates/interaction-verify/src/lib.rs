//! Ed25519 request authentication for the interactions gateway.
//!
//! Every webhook callback from the platform carries a detached Ed25519
//! signature over the timestamp header concatenated with the raw request
//! body. This crate checks that signature against the public key issued
//! for the application.

use ed25519_dalek::{Signature, Verifier, VerifyingKey, PUBLIC_KEY_LENGTH, SIGNATURE_LENGTH};

/// Verifies platform request signatures against a fixed public key.
///
/// The key is decoded once at construction. A verifier built from malformed
/// key material stays usable and rejects every request, so callers never
/// need to distinguish key-decode failure from signature mismatch.
#[derive(Clone)]
pub struct SignatureVerifier {
    key: Option<VerifyingKey>,
}

impl SignatureVerifier {
    /// Create a verifier from the hex-encoded public key the platform
    /// issued for the application.
    pub fn new(public_key_hex: &str) -> Self {
        let key = decode_fixed::<PUBLIC_KEY_LENGTH>(public_key_hex)
            .and_then(|bytes| VerifyingKey::from_bytes(&bytes).ok());
        if key.is_none() {
            tracing::warn!("public key is not a valid Ed25519 key, all requests will be rejected");
        }
        Self { key }
    }

    /// Check `signature_hex` over the concatenation of `timestamp` and
    /// `raw_body` (timestamp first, no separator).
    ///
    /// Malformed hex, a wrong-length signature, and a genuine mismatch all
    /// yield `false`. Encoding failure and authentication failure are the
    /// same outcome to callers.
    pub fn verify(&self, signature_hex: &str, timestamp: &str, raw_body: &[u8]) -> bool {
        let Some(key) = self.key.as_ref() else {
            return false;
        };
        let Some(signature_bytes) = decode_fixed::<SIGNATURE_LENGTH>(signature_hex) else {
            return false;
        };
        let signature = Signature::from_bytes(&signature_bytes);

        let mut message = Vec::with_capacity(timestamp.len() + raw_body.len());
        message.extend_from_slice(timestamp.as_bytes());
        message.extend_from_slice(raw_body);

        key.verify(&message, &signature).is_ok()
    }
}

impl std::fmt::Debug for SignatureVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignatureVerifier")
            .field("key_loaded", &self.key.is_some())
            .finish()
    }
}

/// Decode a hex string into an exact-length byte array.
fn decode_fixed<const N: usize>(hex_str: &str) -> Option<[u8; N]> {
    let bytes = hex::decode(hex_str).ok()?;
    bytes.try_into().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::{Signer, SigningKey};

    fn test_keypair() -> (SigningKey, String) {
        let signing_key = SigningKey::from_bytes(&[42u8; 32]);
        let public_key_hex = hex::encode(signing_key.verifying_key().to_bytes());
        (signing_key, public_key_hex)
    }

    fn sign(signing_key: &SigningKey, timestamp: &str, raw_body: &[u8]) -> String {
        let mut message = timestamp.as_bytes().to_vec();
        message.extend_from_slice(raw_body);
        hex::encode(signing_key.sign(&message).to_bytes())
    }

    #[test]
    fn verifies_legit_signatures() {
        let (signing_key, public_key_hex) = test_keypair();
        let verifier = SignatureVerifier::new(&public_key_hex);

        let timestamp = "1716724915005";
        let raw_body = b"i am the raw body";
        let signature = sign(&signing_key, timestamp, raw_body);

        assert!(verifier.verify(&signature, timestamp, raw_body));
    }

    #[test]
    fn rejects_signature_over_different_timestamp() {
        let (signing_key, public_key_hex) = test_keypair();
        let verifier = SignatureVerifier::new(&public_key_hex);

        let raw_body = b"i am the raw body";
        let signature = sign(&signing_key, "12345", raw_body);

        assert!(!verifier.verify(&signature, "67890", raw_body));
    }

    #[test]
    fn rejects_signature_over_different_body() {
        let (signing_key, public_key_hex) = test_keypair();
        let verifier = SignatureVerifier::new(&public_key_hex);

        let signature = sign(&signing_key, "12345", b"original body");

        assert!(!verifier.verify(&signature, "12345", b"tampered body"));
    }

    #[test]
    fn rejects_signature_from_different_key() {
        let (_, public_key_hex) = test_keypair();
        let verifier = SignatureVerifier::new(&public_key_hex);

        let other_key = SigningKey::from_bytes(&[7u8; 32]);
        let timestamp = "12345";
        let raw_body = b"payload";
        let signature = sign(&other_key, timestamp, raw_body);

        assert!(!verifier.verify(&signature, timestamp, raw_body));
    }

    #[test]
    fn rejects_malformed_signature_hex() {
        let (_, public_key_hex) = test_keypair();
        let verifier = SignatureVerifier::new(&public_key_hex);

        assert!(!verifier.verify("not hex at all", "12345", b"payload"));
        assert!(!verifier.verify("zz".repeat(64).as_str(), "12345", b"payload"));
    }

    #[test]
    fn rejects_wrong_length_signature() {
        let (_, public_key_hex) = test_keypair();
        let verifier = SignatureVerifier::new(&public_key_hex);

        // Valid hex, but only 4 bytes instead of 64.
        assert!(!verifier.verify("deadbeef", "12345", b"payload"));
    }

    #[test]
    fn malformed_public_key_rejects_everything() {
        let (signing_key, _) = test_keypair();

        let timestamp = "12345";
        let raw_body = b"payload";
        let signature = sign(&signing_key, timestamp, raw_body);

        for bad_key in ["", "not hex", "deadbeef"] {
            let verifier = SignatureVerifier::new(bad_key);
            assert!(
                !verifier.verify(&signature, timestamp, raw_body),
                "verifier built from {:?} should reject",
                bad_key
            );
        }
    }

    #[test]
    fn debug_does_not_print_key_material() {
        let (_, public_key_hex) = test_keypair();
        let verifier = SignatureVerifier::new(&public_key_hex);

        let debug = format!("{:?}", verifier);
        assert!(debug.contains("key_loaded"));
        assert!(!debug.contains(&public_key_hex));
    }
}
