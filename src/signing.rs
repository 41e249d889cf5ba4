//! Signing backend collaborator surface
//!
//! Provides a trait-based abstraction for certificate issuance, allowing
//! tests to stub the backend while production code wires in the real signer.
//! The backend owns CSR generation, cryptographic signing and the
//! watch/reconcile mechanics of ongoing rotation; this crate only decides
//! what to manage and where the artifacts live.

use std::path::Path;

use async_trait::async_trait;

use crate::extract::CertificateRequest;
use crate::rotation::{RotationPolicy, StopSignal};
use crate::Result;

/// A one-shot signed certificate as returned by the backend
#[derive(Debug, Clone)]
pub struct IssuedCert {
    /// PEM-encoded full certificate chain
    pub cert_chain_pem: Vec<u8>,
    /// PEM-encoded private key
    pub key_pem: Vec<u8>,
}

/// Long-lived rotation controller produced by the backend
///
/// `run` drives the backend's watch/renew loop until the stop signal is
/// observed. Cancellation is cooperative: the loop is expected to exit
/// promptly once the signal's sender half is dropped. There is no
/// timeout-based termination at this layer.
#[async_trait]
pub trait RotationController: Send {
    /// Run the rotation loop until stopped
    async fn run(self: Box<Self>, stop: StopSignal);
}

/// Trait abstracting the external signing collaborator
///
/// Both operations validate issued certificates against the fixed trust
/// anchor. Neither is retried by this crate; a failure aborts the calling
/// pipeline.
#[async_trait]
pub trait SigningBackend: Send + Sync {
    /// Build a rotation controller scoped to the given request set and policy
    ///
    /// Fails with [`crate::Error::Construction`] when the backend rejects the
    /// configuration (malformed trust-anchor path, invalid client handles).
    fn issue_managed_rotation(
        &self,
        requests: Vec<CertificateRequest>,
        policy: RotationPolicy,
        trust_anchor: &Path,
    ) -> Result<Box<dyn RotationController>>;

    /// Issue a single certificate for the given name set
    ///
    /// Fails with [`crate::Error::Signing`] when issuance is denied or the
    /// signer is unavailable.
    async fn issue_once_signed(
        &self,
        names: &[String],
        csr_id: &str,
        namespace: &str,
        trust_anchor: &Path,
    ) -> Result<IssuedCert>;
}
