//! Loading of the public key that anchors license trust.
//!
//! The key is configured as base64 text wrapping a PEM document. `PUBLIC KEY`
//! (SubjectPublicKeyInfo) blocks may hold an RSA, ECDSA P-256/P-384/P-521 or
//! Ed25519 key; `RSA PUBLIC KEY` (PKCS#1) blocks hold an RSA key. Encapsulated
//! headers such as `kid: ...` are skipped.

use crate::licensing::error::{LicensingError, LicensingResult};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use rsa::pkcs1::DecodeRsaPublicKey;
use rsa::pkcs8::DecodePublicKey;
use rsa::traits::PublicKeyParts;

/// A parsed license verification key
#[derive(Clone, Debug, PartialEq)]
pub enum PublicKey {
    Rsa(rsa::RsaPublicKey),
    EcP256(p256::PublicKey),
    EcP384(p384::PublicKey),
    EcP521(p521::PublicKey),
    Ed25519(ed25519_dalek::VerifyingKey),
}

impl PublicKey {
    /// Short algorithm name, e.g. `RSA-2048` or `ECDSA-P256`
    pub fn algorithm(&self) -> String {
        match self {
            Self::Rsa(key) => format!("RSA-{}", key.size() * 8),
            Self::EcP256(_) => "ECDSA-P256".to_string(),
            Self::EcP384(_) => "ECDSA-P384".to_string(),
            Self::EcP521(_) => "ECDSA-P521".to_string(),
            Self::Ed25519(_) => "Ed25519".to_string(),
        }
    }

    fn from_spki_der(der: &[u8]) -> Result<Self, String> {
        if let Ok(key) = rsa::RsaPublicKey::from_public_key_der(der) {
            return Ok(Self::Rsa(key));
        }
        if let Ok(key) = p256::PublicKey::from_public_key_der(der) {
            return Ok(Self::EcP256(key));
        }
        if let Ok(key) = p384::PublicKey::from_public_key_der(der) {
            return Ok(Self::EcP384(key));
        }
        if let Ok(key) = p521::PublicKey::from_public_key_der(der) {
            return Ok(Self::EcP521(key));
        }
        ed25519_dalek::VerifyingKey::from_public_key_der(der)
            .map(Self::Ed25519)
            .map_err(|e| format!("unsupported or malformed public key: {}", e))
    }
}

/// Decode and parse a base64 encoded PEM public key.
///
/// Surrounding whitespace in `encoded` is ignored.
///
/// # Errors
///
/// Returns `PublicKeyDecode` when the input is not valid base64 and
/// `PublicKeyParse` when the decoded bytes are not a supported PEM public
/// key. Both carry the offending input.
pub fn load_public_key(encoded: &str) -> LicensingResult<PublicKey> {
    let pem_bytes = BASE64
        .decode(encoded.trim())
        .map_err(|source| LicensingError::PublicKeyDecode {
            public_key: encoded.to_string(),
            source,
        })?;

    parse_public_key_pem(&pem_bytes).map_err(|reason| LicensingError::PublicKeyParse {
        public_key: encoded.to_string(),
        reason,
    })
}

fn parse_public_key_pem(pem_bytes: &[u8]) -> Result<PublicKey, String> {
    let pem = std::str::from_utf8(pem_bytes).map_err(|e| format!("PEM is not valid UTF-8: {}", e))?;
    let (label, der) = pem_block(pem)?;

    match label {
        "PUBLIC KEY" => PublicKey::from_spki_der(&der),
        "RSA PUBLIC KEY" => rsa::RsaPublicKey::from_pkcs1_der(&der)
            .map(PublicKey::Rsa)
            .map_err(|e| format!("invalid PKCS#1 RSA public key: {}", e)),
        other => Err(format!("unsupported PEM block type {:?}", other)),
    }
}

/// First PEM block of `pem`: its label and DER contents, headers dropped
fn pem_block(pem: &str) -> Result<(&str, Vec<u8>), String> {
    let mut lines = pem.lines().map(str::trim);

    let label = lines
        .by_ref()
        .find_map(|l| l.strip_prefix("-----BEGIN ")?.strip_suffix("-----"))
        .ok_or_else(|| "no PEM block found".to_string())?;
    let end = format!("-----END {}-----", label);

    let mut body = String::new();
    let mut closed = false;
    for line in lines {
        if line == end {
            closed = true;
            break;
        }
        // encapsulated headers ("kid: ...") and the blank line after them
        if line.is_empty() || line.contains(':') {
            continue;
        }
        body.push_str(line);
    }
    if !closed {
        return Err(format!("missing {:?} line", end));
    }

    let der = BASE64
        .decode(&body)
        .map_err(|e| format!("invalid PEM body: {}", e))?;
    Ok((label, der))
}

#[cfg(test)]
mod tests {
    use super::*;

    const RSA_PEM: &str = include_str!("../../tests/fixtures/rsa_public.pem");
    const RSA_PKCS1_PEM: &str = include_str!("../../tests/fixtures/rsa_pkcs1_public.pem");
    const EC_P256_PEM: &str = include_str!("../../tests/fixtures/ec_p256_public.pem");
    const EC_P256_KID_PEM: &str = include_str!("../../tests/fixtures/ec_p256_kid_public.pem");
    const EC_P384_PEM: &str = include_str!("../../tests/fixtures/ec_p384_public.pem");
    const EC_P521_PEM: &str = include_str!("../../tests/fixtures/ec_p521_public.pem");
    const ED25519_PEM: &str = include_str!("../../tests/fixtures/ed25519_public.pem");

    fn load(pem: &str) -> LicensingResult<PublicKey> {
        load_public_key(&BASE64.encode(pem))
    }

    #[test]
    fn test_load_rsa_key() {
        let key = load(RSA_PEM).unwrap();
        assert!(matches!(key, PublicKey::Rsa(_)));
        assert_eq!(key.algorithm(), "RSA-2048");
    }

    #[test]
    fn test_load_rsa_pkcs1_key() {
        let key = load(RSA_PKCS1_PEM).unwrap();
        assert_eq!(key, load(RSA_PEM).unwrap());
    }

    #[test]
    fn test_load_ec_keys() {
        assert!(matches!(load(EC_P256_PEM).unwrap(), PublicKey::EcP256(_)));
        assert!(matches!(load(EC_P384_PEM).unwrap(), PublicKey::EcP384(_)));
        assert!(matches!(load(EC_P521_PEM).unwrap(), PublicKey::EcP521(_)));
    }

    #[test]
    fn test_load_key_with_kid_header() {
        let key = load(EC_P256_KID_PEM).unwrap();
        assert_eq!(key, load(EC_P256_PEM).unwrap());
    }

    #[test]
    fn test_load_ed25519_key() {
        let key = load(ED25519_PEM).unwrap();
        assert_eq!(key.algorithm(), "Ed25519");
    }

    #[test]
    fn test_load_ignores_surrounding_whitespace() {
        let encoded = format!("  {}\n", BASE64.encode(EC_P256_PEM));
        assert!(load_public_key(&encoded).is_ok());
    }

    #[test]
    fn test_load_rejects_invalid_base64() {
        let err = load_public_key("not base64 !!").unwrap_err();
        match err {
            LicensingError::PublicKeyDecode { public_key, .. } => {
                assert_eq!(public_key, "not base64 !!");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_load_rejects_non_pem_bytes() {
        let encoded = BASE64.encode(b"hello, this is not a key");
        let err = load_public_key(&encoded).unwrap_err();
        match err {
            LicensingError::PublicKeyParse { public_key, .. } => assert_eq!(public_key, encoded),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_load_rejects_non_utf8_bytes() {
        let encoded = BASE64.encode([0xff, 0xfe, 0xfd]);
        let err = load_public_key(&encoded).unwrap_err();
        assert!(matches!(err, LicensingError::PublicKeyParse { .. }));
    }

    #[test]
    fn test_load_rejects_truncated_pem() {
        let truncated = &RSA_PEM[..RSA_PEM.len() / 2];
        assert!(matches!(load(truncated), Err(LicensingError::PublicKeyParse { .. })));
    }

    #[test]
    fn test_load_rejects_private_key_block() {
        let pem = RSA_PEM.replace("PUBLIC KEY", "PRIVATE KEY");
        let err = load(&pem).unwrap_err();
        assert!(err.to_string().contains("unsupported PEM block type"));
    }

    #[test]
    fn test_load_rejects_garbage_der() {
        let pem = format!(
            "-----BEGIN PUBLIC KEY-----\n{}\n-----END PUBLIC KEY-----\n",
            BASE64.encode([0x30, 0x03, 0x02, 0x01, 0x00])
        );
        let err = load(&pem).unwrap_err();
        assert!(matches!(err, LicensingError::PublicKeyParse { .. }));
    }
}
