//! Certificate request extraction
//!
//! Normalizes the mesh-wide certificate config into the set of
//! managed-rotation requests the rotation controller will own. Entries
//! without a DNS name have nothing to manage; entries without a secret name
//! are provisioned outside this controller. Both are dropped silently.

use serde::Deserialize;

/// One entry of the mesh-wide certificate configuration
///
/// Sourced from the mesh config document, which is owned by an external
/// collaborator; both fields are optional there.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CertificateConfig {
    /// DNS names the certificate must be valid for, in order
    pub dns_names: Vec<String>,
    /// Secret the backend stores the generated key and certificate in
    pub secret_name: String,
}

/// A certificate the rotation controller manages end to end
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateRequest {
    /// Secret the generated key and certificate are saved in
    pub secret_name: String,
    /// DNS names of the certificate, order preserved from the config
    pub dns_names: Vec<String>,
    /// Namespace the secret lives in
    pub namespace: String,
}

/// Normalize certificate configs into managed-rotation requests
///
/// Never fails: an empty input, or an input with only excluded entries,
/// yields an empty result.
pub fn extract_requests(configs: &[CertificateConfig], namespace: &str) -> Vec<CertificateRequest> {
    configs
        .iter()
        .filter(|c| !c.dns_names.concat().is_empty()) // must have a DNS name
        .filter(|c| !c.secret_name.is_empty())
        .map(|c| CertificateRequest {
            secret_name: c.secret_name.clone(),
            dns_names: c.dns_names.clone(),
            namespace: namespace.to_string(),
        })
        .collect()
}
