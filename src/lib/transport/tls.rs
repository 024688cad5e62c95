use anyhow::Context;
use axum_server::tls_rustls::RustlsConfig;
use tokio_rustls::rustls::crypto::aws_lc_rs;

use crate::config::TlsPaths;

/// Loads the PEM certificate chain and private key for the HTTPS listener.
pub async fn configure_tls(paths: &TlsPaths) -> anyhow::Result<RustlsConfig> {
    // reqwest and sqlx link ring next to aws-lc-rs, so rustls cannot infer a
    // process default on its own.
    let _ = aws_lc_rs::default_provider().install_default();
    RustlsConfig::from_pem_file(&paths.cert_path, &paths.key_path)
        .await
        .with_context(|| {
            format!(
                "failed to load TLS material from {} / {}",
                paths.cert_path.display(),
                paths.key_path.display()
            )
        })
}
