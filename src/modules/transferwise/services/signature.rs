use crate::core::{AppError, Result};
use base64::prelude::*;
use rsa::pkcs1v15::{Signature, VerifyingKey};
use rsa::pkcs8::DecodePublicKey;
use rsa::signature::Verifier;
use rsa::RsaPublicKey;
use sha2::Sha256;

/// Checks a webhook `X-Signature` header against the raw request body
pub trait SignatureVerifier: Send + Sync {
    fn verify(&self, body: &[u8], signature: &str) -> bool;
}

/// TransferWise scheme: base64 RSA-SHA256 (PKCS#1 v1.5) over the raw body
pub struct RsaSignatureVerifier {
    key: VerifyingKey<Sha256>,
}

impl RsaSignatureVerifier {
    /// Build from a PEM `PUBLIC KEY` block
    pub fn from_pem(pem: &str) -> Result<Self> {
        let key = RsaPublicKey::from_public_key_pem(pem.trim()).map_err(|e| {
            AppError::Configuration(format!("Invalid TransferWise webhook public key: {}", e))
        })?;

        Ok(Self {
            key: VerifyingKey::new(key),
        })
    }
}

impl SignatureVerifier for RsaSignatureVerifier {
    fn verify(&self, body: &[u8], signature: &str) -> bool {
        let Ok(raw) = BASE64_STANDARD.decode(signature.trim()) else {
            return false;
        };
        let Ok(signature) = Signature::try_from(raw.as_slice()) else {
            return false;
        };

        self.key.verify(body, &signature).is_ok()
    }
}

/// Used when no public key is configured: every delivery fails verification
pub struct RejectAll;

impl SignatureVerifier for RejectAll {
    fn verify(&self, _body: &[u8], _signature: &str) -> bool {
        false
    }
}
