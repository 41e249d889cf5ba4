//! Certificate-lifecycle bootstrap for the mesh control plane
//!
//! Two independent startup pipelines:
//!
//! - [`extract::extract_requests`] normalizes the mesh-wide certificate
//!   config into managed-rotation requests, and
//!   [`rotation::launch_rotation`] hands them to the signing backend's
//!   rotation controller, returning a task the caller schedules explicitly.
//! - [`provision::provision_self_cert`] provisions the control plane's own
//!   identity certificate once, before serving: skip if a key is already
//!   mounted, otherwise validate the hostname, request a one-shot signed
//!   certificate and persist it to the fixed on-disk locations.
//!
//! CSR generation, signing, and secret/webhook reconciliation belong to the
//! [`signing::SigningBackend`] collaborator, not to this crate.

#![deny(missing_docs)]

pub mod config;
pub mod error;
pub mod extract;
pub mod provision;
pub mod rotation;
pub mod signing;
pub mod telemetry;

pub use config::CertPaths;
pub use error::Error;
pub use extract::{extract_requests, CertificateConfig, CertificateRequest};
pub use provision::{provision_self_cert, self_cert_names, Provisioned};
pub use rotation::{launch_rotation, stop_channel, RotationPolicy, RotationTask, StopSignal};
pub use signing::{IssuedCert, RotationController, SigningBackend};

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, Error>;
