//! TLS configuration and certificate loading

use std::{io, path::Path};

use axum_server::tls_rustls::RustlsConfig;
use tokio::fs::try_exists;

/// Load TLS configuration from PEM certificate and key files
pub async fn load_tls_config(cert_path: &Path, key_path: &Path) -> io::Result<RustlsConfig> {
    if !try_exists(cert_path).await? {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("certificate file not found: {}", cert_path.display()),
        ));
    }
    if !try_exists(key_path).await? {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("private key file not found: {}", key_path.display()),
        ));
    }

    RustlsConfig::from_pem_file(cert_path, key_path).await
}
