//! Tenant-bound execution of analytics work.
//!
//! Every request is evaluated for exactly one tenant. A [`TenantRunner`] is
//! bound to that tenant and refuses work stamped with any other.

use restock_core::TenantId;
use tracing::{debug, warn};

use crate::error::AnalyticsError;

/// A unit of analytics work owned by one tenant.
///
/// Jobs carry their own snapshot and are consumed when run.
pub trait AnalyticsJob: Send + 'static {
    type Output: Send + 'static;

    /// Short label for logs.
    const KIND: &'static str;

    fn tenant_id(&self) -> TenantId;

    fn run(self) -> Result<Self::Output, AnalyticsError>;
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TenantRunner {
    tenant: TenantId,
}

impl TenantRunner {
    pub fn new(tenant: TenantId) -> Self {
        Self { tenant }
    }

    pub fn tenant(&self) -> TenantId {
        self.tenant
    }

    pub fn run<J: AnalyticsJob>(&self, job: J) -> Result<J::Output, AnalyticsError> {
        let owner = job.tenant_id();
        if owner != self.tenant {
            warn!(tenant = %self.tenant, job_tenant = %owner, job = J::KIND, "refused job for another tenant");
            return Err(AnalyticsError::TenantScope);
        }
        debug!(tenant = %owner, job = J::KIND, "running analytics job");
        job.run()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Doubling {
        tenant: TenantId,
        units: u32,
    }

    impl AnalyticsJob for Doubling {
        type Output = u32;
        const KIND: &'static str = "doubling";

        fn tenant_id(&self) -> TenantId {
            self.tenant
        }

        fn run(self) -> Result<u32, AnalyticsError> {
            Ok(self.units * 2)
        }
    }

    #[test]
    fn runner_only_accepts_its_own_tenant() {
        let mine = TenantId::new();
        let runner = TenantRunner::new(mine);

        assert_eq!(runner.run(Doubling { tenant: mine, units: 21 }).unwrap(), 42);
        assert!(matches!(
            runner.run(Doubling { tenant: TenantId::new(), units: 1 }),
            Err(AnalyticsError::TenantScope)
        ));
    }
}
