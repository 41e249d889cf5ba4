//! Filesystem locations for certificate bootstrap
//!
//! The original deployment layout is fixed: generated control-plane
//! certificates live under a memory-mounted directory, and the trust anchor
//! is the service-account CA bundle. `CertPaths` is constructed once at
//! startup and passed into the provisioner and launcher explicitly; nothing
//! in this crate reads path state from globals.

use std::path::{Path, PathBuf};

/// Location to save generated control-plane DNS certificates
pub const DEFAULT_CERT_DIR: &str = "./var/run/secrets/istio-dns";

/// Trust anchor the signing backend validates issued certificates against.
/// A custom CA path is not supported.
pub const DEFAULT_TRUST_ANCHOR: &str = "/var/run/secrets/kubernetes.io/serviceaccount/ca.crt";

/// File name of the private key inside the certificate directory
pub const KEY_FILE_NAME: &str = "key.pem";

/// File name of the full certificate chain inside the certificate directory
pub const CERT_CHAIN_FILE_NAME: &str = "cert-chain.pem";

/// Fixed filesystem locations used by both bootstrap pipelines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertPaths {
    cert_dir: PathBuf,
    trust_anchor: PathBuf,
}

impl CertPaths {
    /// Create paths rooted at the given certificate directory and trust anchor
    pub fn new(cert_dir: impl Into<PathBuf>, trust_anchor: impl Into<PathBuf>) -> Self {
        Self {
            cert_dir: cert_dir.into(),
            trust_anchor: trust_anchor.into(),
        }
    }

    /// The well-known production locations
    pub fn well_known() -> Self {
        Self::new(DEFAULT_CERT_DIR, DEFAULT_TRUST_ANCHOR)
    }

    /// Directory the key and chain are written into
    pub fn cert_dir(&self) -> &Path {
        &self.cert_dir
    }

    /// Trust anchor certificates are validated against (read-only)
    pub fn trust_anchor(&self) -> &Path {
        &self.trust_anchor
    }

    /// Full path of the private-key file
    pub fn key_file(&self) -> PathBuf {
        self.cert_dir.join(KEY_FILE_NAME)
    }

    /// Full path of the certificate-chain file
    pub fn cert_chain_file(&self) -> PathBuf {
        self.cert_dir.join(CERT_CHAIN_FILE_NAME)
    }
}

impl Default for CertPaths {
    fn default() -> Self {
        Self::well_known()
    }
}
