use std::time::Duration;

use once_cell::sync::Lazy;
use poynt_api::PoyntConfig;
use poynt_common::Secret;
use rsa::{pkcs1::EncodeRsaPrivateKey, RsaPrivateKey};

pub const TEST_APPLICATION_ID: &str = "urn:aid:123";

/// One 2048-bit key per test run; generating it dominates the cost, signing with it is cheap.
pub static TEST_PEM: Lazy<String> = Lazy::new(|| {
    let mut rng = rand::thread_rng();
    let key = RsaPrivateKey::new(&mut rng, 2048).expect("Failed to generate RSA key");
    key.to_pkcs1_pem(rsa::pkcs8::LineEnding::LF).expect("Failed to encode key as PEM").to_string()
});

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn test_config(endpoint: &str) -> PoyntConfig {
    PoyntConfig {
        api_endpoint: endpoint.to_string(),
        application_id: TEST_APPLICATION_ID.to_string(),
        private_key_pem: Secret::new(TEST_PEM.clone()),
        business_id: "biz1".to_string(),
        store_id: "store1".to_string(),
        request_timeout: Duration::from_secs(5),
    }
}
