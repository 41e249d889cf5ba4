//! Error types for certificate bootstrap
//!
//! Errors are structured with fields to aid debugging in production. Each
//! variant carries the context of the step that failed (hostname, CSR id,
//! path). Every fallible step in this crate is single-attempt: failures are
//! surfaced to the caller, never retried or swallowed.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for certificate bootstrap operations
#[derive(Debug, Error)]
pub enum Error {
    /// The signing backend rejected the rotation controller configuration
    #[error("failed to create certificate rotation controller: {message}")]
    Construction {
        /// Description of what the backend rejected
        message: String,
    },

    /// The control-plane hostname cannot name a certificate
    #[error("invalid hostname {hostname}, should contain at least service name and namespace")]
    InvalidHostname {
        /// The hostname that failed validation
        hostname: String,
    },

    /// The one-shot signing request failed
    #[error("signing request {csr_id} failed: {message}")]
    Signing {
        /// CSR identifier the request was made under
        csr_id: String,
        /// Description of what failed
        message: String,
    },

    /// Writing the certificate artifacts to disk failed
    #[error("failed to persist {}: {source}", .path.display())]
    Persistence {
        /// The directory or file being written
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Create a construction error with the given message
    pub fn construction(msg: impl Into<String>) -> Self {
        Self::Construction {
            message: msg.into(),
        }
    }

    /// Create an invalid-hostname error for the given hostname
    pub fn invalid_hostname(hostname: impl Into<String>) -> Self {
        Self::InvalidHostname {
            hostname: hostname.into(),
        }
    }

    /// Create a signing error for the given CSR id
    pub fn signing(csr_id: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Signing {
            csr_id: csr_id.into(),
            message: msg.into(),
        }
    }

    /// Create a persistence error for the given path
    pub fn persistence(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Persistence {
            path: path.into(),
            source,
        }
    }

    /// Get the CSR id if this error came from a signing request
    pub fn csr_id(&self) -> Option<&str> {
        match self {
            Error::Signing { csr_id, .. } => Some(csr_id),
            _ => None,
        }
    }

    /// Get the path if this error came from persistence
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Error::Persistence { path, .. } => Some(path),
            _ => None,
        }
    }
}
