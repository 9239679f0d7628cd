//! Shared helpers for client tests.

#![allow(dead_code)]

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use licensing_client::{Config, LicensingClient};
use wiremock::MockServer;

pub const RSA_PUBLIC_PEM: &str = include_str!("../fixtures/rsa_public.pem");
pub const EC_P256_KID_PUBLIC_PEM: &str = include_str!("../fixtures/ec_p256_kid_public.pem");

/// Base64 of the RSA test key, as the client configuration carries it.
pub fn test_public_key() -> String {
    BASE64.encode(RSA_PUBLIC_PEM)
}

/// Client pointed at `base_uri`.
pub fn client_at(base_uri: &str) -> LicensingClient {
    let config = Config::new(base_uri, test_public_key()).unwrap();
    LicensingClient::new(config).unwrap()
}

/// Client pointed at the mock server.
pub fn client_for(server: &MockServer) -> LicensingClient {
    client_at(&server.uri())
}

/// Address nothing is listening on.
pub fn closed_local_uri() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

pub fn license_json() -> serde_json::Value {
    serde_json::json!({
        "key_id": "K3YID",
        "private_key": "cHJpdmF0ZQ==",
        "authorization": "YXV0aG9yaXphdGlvbg=="
    })
}
