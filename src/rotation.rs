//! Rotation controller launch
//!
//! Wires the extracted certificate requests and the fixed rotation policy
//! into the backend's long-lived rotation controller. The launcher never
//! blocks startup: it returns a [`RotationTask`] the caller schedules
//! explicitly, and the spawned loop runs until the stop signal is observed.
//! Watching secrets and renewing before expiry is the backend's job, not
//! reimplemented here.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::config::CertPaths;
use crate::extract::CertificateRequest;
use crate::signing::{RotationController, SigningBackend};
use crate::{Error, Result};

/// Default length of the certificate rotation grace period, as a ratio of
/// the certificate TTL
pub const DEFAULT_GRACE_PERIOD_RATIO: f64 = 0.5;

/// Default minimum grace period for workload cert rotation
pub const DEFAULT_MIN_GRACE_PERIOD: Duration = Duration::from_secs(10 * 60);

/// Policy governing when managed certificates are renewed
///
/// Renewal triggers when the remaining certificate lifetime drops below
/// `max(ttl * grace_period_ratio, min_grace_period)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationPolicy {
    /// Grace period as a ratio of the certificate TTL, in (0, 1]
    pub grace_period_ratio: f64,
    /// Lower bound on the grace period regardless of TTL
    pub min_grace_period: Duration,
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self {
            grace_period_ratio: DEFAULT_GRACE_PERIOD_RATIO,
            min_grace_period: DEFAULT_MIN_GRACE_PERIOD,
        }
    }
}

impl RotationPolicy {
    /// Create a policy, rejecting grace-period ratios outside (0, 1]
    pub fn new(grace_period_ratio: f64, min_grace_period: Duration) -> Result<Self> {
        if !Self::ratio_in_range(grace_period_ratio) {
            return Err(Error::construction(format!(
                "grace period ratio {grace_period_ratio} out of range (0, 1]"
            )));
        }
        Ok(Self {
            grace_period_ratio,
            min_grace_period,
        })
    }

    /// Whether a certificate with the given TTL and remaining lifetime is due
    /// for renewal under this policy
    ///
    /// A ratio outside (0, 1] contributes no ratio-based grace; the minimum
    /// grace period still applies.
    pub fn renewal_due(&self, ttl: Duration, remaining: Duration) -> bool {
        let ratio_grace = if Self::ratio_in_range(self.grace_period_ratio) {
            ttl.mul_f64(self.grace_period_ratio)
        } else {
            Duration::ZERO
        };
        remaining < ratio_grace.max(self.min_grace_period)
    }

    fn ratio_in_range(ratio: f64) -> bool {
        ratio.is_finite() && ratio > 0.0 && ratio <= 1.0
    }
}

/// Receiver half of the stop signal observed by the rotation loop
///
/// Dropping the sender (or sending a value) requests cooperative exit.
pub type StopSignal = watch::Receiver<()>;

/// Build a stop-signal pair for a rotation task
pub fn stop_channel() -> (watch::Sender<()>, StopSignal) {
    watch::channel(())
}

/// A rotation controller ready to run, not yet scheduled
///
/// Returned by [`launch_rotation`] so the caller owns when and where the
/// background loop starts, instead of the loop being hidden inside a
/// registration callback.
pub struct RotationTask {
    controller: Box<dyn RotationController>,
}

impl std::fmt::Debug for RotationTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RotationTask").finish_non_exhaustive()
    }
}

impl RotationTask {
    /// Schedule the rotation loop as a background task
    ///
    /// Returns immediately; the loop runs until `stop` is observed.
    pub fn spawn(self, stop: StopSignal) -> JoinHandle<()> {
        tokio::spawn(async move { self.controller.run(stop).await })
    }
}

/// Build a rotation controller for the given request set
///
/// An empty request set means there is nothing to manage: no controller is
/// constructed and `Ok(None)` is returned. Construction failures are fatal
/// to startup and never retried.
pub fn launch_rotation(
    backend: &dyn SigningBackend,
    requests: Vec<CertificateRequest>,
    policy: RotationPolicy,
    paths: &CertPaths,
) -> Result<Option<RotationTask>> {
    if requests.is_empty() {
        tracing::info!("no managed certificates configured");
        return Ok(None);
    }

    tracing::info!(
        count = requests.len(),
        "creating certificate rotation controller"
    );
    let controller = backend.issue_managed_rotation(requests, policy, paths.trust_anchor())?;
    Ok(Some(RotationTask { controller }))
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use super::*;
    use crate::signing::IssuedCert;
    use crate::Error;

    /// Controller that exits once the stop sender is dropped.
    ///
    /// Hand-written rather than generated: the backend trait returns a boxed
    /// controller, which is awkward to express with a mocking macro.
    struct StubController {
        ran: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl RotationController for StubController {
        async fn run(self: Box<Self>, mut stop: StopSignal) {
            self.ran.fetch_add(1, Ordering::SeqCst);
            // Err means the sender half was dropped.
            while stop.changed().await.is_ok() {}
        }
    }

    #[derive(Default)]
    struct StubBackend {
        construction_calls: AtomicUsize,
        reject: bool,
        ran: Arc<AtomicUsize>,
        seen: Mutex<Option<(Vec<CertificateRequest>, RotationPolicy, PathBuf)>>,
    }

    #[async_trait]
    impl SigningBackend for StubBackend {
        fn issue_managed_rotation(
            &self,
            requests: Vec<CertificateRequest>,
            policy: RotationPolicy,
            trust_anchor: &Path,
        ) -> crate::Result<Box<dyn RotationController>> {
            self.construction_calls.fetch_add(1, Ordering::SeqCst);
            if self.reject {
                return Err(Error::construction("backend rejected configuration"));
            }
            *self.seen.lock().unwrap() = Some((requests, policy, trust_anchor.to_path_buf()));
            Ok(Box::new(StubController {
                ran: self.ran.clone(),
            }))
        }

        async fn issue_once_signed(
            &self,
            _names: &[String],
            _csr_id: &str,
            _namespace: &str,
            _trust_anchor: &Path,
        ) -> crate::Result<IssuedCert> {
            unreachable!("rotation launch never issues one-shot certificates")
        }
    }

    fn request(secret: &str) -> CertificateRequest {
        CertificateRequest {
            secret_name: secret.to_string(),
            dns_names: vec![format!("{secret}.ns1.svc")],
            namespace: "ns1".to_string(),
        }
    }

    fn paths() -> CertPaths {
        CertPaths::new("/tmp/certs", "/tmp/ca.crt")
    }

    #[test]
    fn default_policy_matches_fixed_values() {
        let policy = RotationPolicy::default();
        assert_eq!(policy.grace_period_ratio, 0.5);
        assert_eq!(policy.min_grace_period, Duration::from_secs(600));
    }

    #[test]
    fn renewal_triggers_on_ratio_for_long_ttls() {
        let policy = RotationPolicy::default();
        let ttl = Duration::from_secs(24 * 3600);
        // Grace is 12h, larger than the 10m floor.
        assert!(policy.renewal_due(ttl, Duration::from_secs(11 * 3600)));
        assert!(!policy.renewal_due(ttl, Duration::from_secs(13 * 3600)));
    }

    #[test]
    fn policy_constructor_rejects_ratios_outside_unit_interval() {
        for ratio in [0.0, -0.5, 1.5, f64::NAN, f64::INFINITY] {
            let err = RotationPolicy::new(ratio, DEFAULT_MIN_GRACE_PERIOD).unwrap_err();
            assert!(matches!(err, Error::Construction { .. }), "{ratio}");
        }
        assert!(RotationPolicy::new(1.0, DEFAULT_MIN_GRACE_PERIOD).is_ok());
        assert!(RotationPolicy::new(0.5, DEFAULT_MIN_GRACE_PERIOD).is_ok());
    }

    #[test]
    fn renewal_check_tolerates_out_of_range_ratio() {
        // Fields are public, so an invalid ratio can still reach the check;
        // it must not panic, and only the floor applies.
        let policy = RotationPolicy {
            grace_period_ratio: f64::NAN,
            min_grace_period: Duration::from_secs(600),
        };
        let ttl = Duration::from_secs(24 * 3600);
        assert!(policy.renewal_due(ttl, Duration::from_secs(599)));
        assert!(!policy.renewal_due(ttl, Duration::from_secs(601)));
    }

    #[test]
    fn renewal_triggers_on_floor_for_short_ttls() {
        let policy = RotationPolicy::default();
        let ttl = Duration::from_secs(60);
        // Ratio gives 30s, but the 10m floor dominates.
        assert!(policy.renewal_due(ttl, Duration::from_secs(599)));
        assert!(!policy.renewal_due(ttl, Duration::from_secs(601)));
    }

    #[test]
    fn empty_request_list_constructs_nothing() {
        let backend = StubBackend::default();
        let task = launch_rotation(&backend, vec![], RotationPolicy::default(), &paths()).unwrap();
        assert!(task.is_none());
        assert_eq!(backend.construction_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn launcher_passes_requests_policy_and_trust_anchor_through() {
        let backend = StubBackend::default();
        let requests = vec![request("cert-a"), request("cert-b")];
        let task = launch_rotation(
            &backend,
            requests.clone(),
            RotationPolicy::default(),
            &paths(),
        )
        .unwrap();
        assert!(task.is_some());

        let seen = backend.seen.lock().unwrap().take().unwrap();
        assert_eq!(seen.0, requests);
        assert_eq!(seen.1, RotationPolicy::default());
        assert_eq!(seen.2, PathBuf::from("/tmp/ca.crt"));
    }

    #[test]
    fn backend_rejection_surfaces_as_construction_error() {
        let backend = StubBackend {
            reject: true,
            ..Default::default()
        };
        let err =
            launch_rotation(&backend, vec![request("cert-a")], RotationPolicy::default(), &paths())
                .unwrap_err();
        assert!(matches!(err, Error::Construction { .. }));
    }

    #[tokio::test]
    async fn spawned_loop_runs_until_stop_sender_is_dropped() {
        let backend = StubBackend::default();
        let task =
            launch_rotation(&backend, vec![request("cert-a")], RotationPolicy::default(), &paths())
                .unwrap()
                .unwrap();

        let (stop_tx, stop_rx) = stop_channel();
        let handle = task.spawn(stop_rx);

        // Give the loop a chance to start, then request exit.
        tokio::task::yield_now().await;
        drop(stop_tx);

        handle.await.unwrap();
        assert_eq!(backend.ran.load(Ordering::SeqCst), 1);
    }
}
