//! rustls setup for the connector.

use rustls_pki_types::CertificateDer;
use std::sync::{Arc, OnceLock};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

static NATIVE_ROOTS: OnceLock<Vec<CertificateDer<'static>>> = OnceLock::new();

/// OS root certificates, loaded once per process. May be empty.
pub fn native_root_certs() -> &'static [CertificateDer<'static>] {
    NATIVE_ROOTS.get_or_init(|| {
        let loaded = rustls_native_certs::load_native_certs();
        for err in &loaded.errors {
            tracing::warn!(error = %err, "failed to load a native root certificate");
        }
        if loaded.certs.is_empty() {
            tracing::warn!("no native root certificates found");
        } else {
            tracing::debug!(count = loaded.certs.len(), "loaded native root certificates");
        }
        loaded.certs
    })
}

/// The process-wide default provider when one is installed, aws-lc-rs otherwise.
///
/// Never installs a global default.
pub fn crypto_provider() -> Arc<rustls::crypto::CryptoProvider> {
    rustls::crypto::CryptoProvider::get_default()
        .cloned()
        .unwrap_or_else(|| Arc::new(rustls::crypto::aws_lc_rs::default_provider()))
}

/// Client config trusting the native roots.
///
/// # Errors
/// Fails when the OS store has no parsable certificate, so a broken trust
/// store shows up at build time instead of at the first handshake.
pub fn native_roots_client_config() -> Result<rustls::ClientConfig, BoxError> {
    let certs = native_root_certs();
    if certs.is_empty() {
        return Err("no native root certificates in the OS store".into());
    }

    let mut store = rustls::RootCertStore::empty();
    let (added, ignored) = store.add_parsable_certificates(certs.iter().cloned());
    if ignored > 0 {
        tracing::warn!(added, ignored, "some native root certificates were unparsable");
    }
    if added == 0 {
        return Err(format!("none of {} native root certificates parsed", certs.len()).into());
    }

    let config = rustls::ClientConfig::builder_with_provider(crypto_provider())
        .with_safe_default_protocol_versions()
        .map_err(|e| -> BoxError { Box::new(e) })?
        .with_root_certificates(store)
        .with_no_client_auth();
    Ok(config)
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_native_roots_loaded_once() {
        let first = native_root_certs();
        let second = native_root_certs();
        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn test_empty_store_is_an_error() {
        if native_root_certs().is_empty() {
            assert!(native_roots_client_config().is_err());
        }
    }

    #[test]
    fn test_crypto_provider_has_cipher_suites() {
        assert!(!crypto_provider().cipher_suites.is_empty());
    }
}
