//! State labels and wait specifications per resource type
//!
//! Each remote service reports progress with its own status vocabulary. The
//! tables here turn those vocabularies into per-action [`WaitSpec`]s so the
//! poller itself stays resource-agnostic.

use crate::action::ActionType;
use crate::timeouts::ResourceTimeouts;
use stateflow_wait::{SpecError, WaitSpec};
use std::time::Duration;

/// Data-catalog integration table properties
pub mod integration_table_properties {
    pub const PENDING: &str = "Pending";
    pub const DELETING: &str = "Deleting";
    pub const NORMAL: &str = "Normal";
    pub const UPDATED: &str = "Updated";

    /// The read API has no status field; a successful read reports this
    pub const SYNTHESIZED_STATUS: &str = NORMAL;
}

/// Organization member account creation
pub mod account {
    use std::time::Duration;

    pub const IN_PROGRESS: &str = "IN_PROGRESS";
    pub const SUCCEEDED: &str = "SUCCEEDED";
    pub const FAILED: &str = "FAILED";

    pub const POLL_INTERVAL: Duration = Duration::from_secs(10);
    pub const CREATE_TIMEOUT: Duration = Duration::from_secs(5 * 60);

    /// Error code returned while the organization is still being set up;
    /// account creation is retried while it appears
    pub const FINALIZING_ORGANIZATION: &str = "FinalizingOrganizationException";

    /// Whether the error chain holds an API error with code
    /// [`FINALIZING_ORGANIZATION`]
    pub fn is_finalizing_organization(err: &anyhow::Error) -> bool {
        crate::error::ApiError::has_code(err, FINALIZING_ORGANIZATION)
    }
}

/// Video stream processor
pub mod stream_processor {
    pub const STOPPED: &str = "STOPPED";
    pub const STARTING: &str = "STARTING";
    pub const RUNNING: &str = "RUNNING";
    pub const STOPPING: &str = "STOPPING";
    pub const UPDATING: &str = "UPDATING";
    pub const FAILED: &str = "FAILED";
}

/// Consecutive target observations required where the remote flaps
const FLAPPING_STABILIZATION: u32 = 2;
/// Not-found tolerance used right after a mutation
const EVENTUAL_NOT_FOUND_BUDGET: u32 = 20;

/// Resource types with known state vocabularies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// CDN continuous-deployment policy (changes apply synchronously)
    ContinuousDeploymentPolicy,
    IntegrationTableProperties,
    Account,
    StreamProcessor,
    /// DDoS protection subscription package (changes apply synchronously)
    ServicePackage,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 5] = [
        ResourceKind::ContinuousDeploymentPolicy,
        ResourceKind::IntegrationTableProperties,
        ResourceKind::Account,
        ResourceKind::StreamProcessor,
        ResourceKind::ServicePackage,
    ];

    pub fn service(&self) -> &'static str {
        match self {
            ResourceKind::ContinuousDeploymentPolicy => "CloudFront",
            ResourceKind::IntegrationTableProperties => "Glue",
            ResourceKind::Account => "Organizations",
            ResourceKind::StreamProcessor => "Rekognition",
            ResourceKind::ServicePackage => "Shield",
        }
    }

    pub fn resource_type(&self) -> &'static str {
        match self {
            ResourceKind::ContinuousDeploymentPolicy => "Continuous Deployment Policy",
            ResourceKind::IntegrationTableProperties => "Integration Table Properties",
            ResourceKind::Account => "Account",
            ResourceKind::StreamProcessor => "Stream Processor",
            ResourceKind::ServicePackage => "Service Package",
        }
    }

    pub fn default_timeouts(&self) -> ResourceTimeouts {
        match self {
            ResourceKind::Account => ResourceTimeouts::default().with_create(account::CREATE_TIMEOUT),
            _ => ResourceTimeouts::default(),
        }
    }

    /// Wait specification for `action`, or `None` when the action completes
    /// synchronously and needs no wait.
    pub fn wait_spec(
        &self,
        action: ActionType,
        timeout: Duration,
    ) -> Option<Result<WaitSpec, SpecError>> {
        use integration_table_properties as itp;

        let builder = match (self, action) {
            (ResourceKind::IntegrationTableProperties, ActionType::Create) => WaitSpec::builder()
                .target([itp::NORMAL])
                .not_found_budget(EVENTUAL_NOT_FOUND_BUDGET)
                .stabilization(FLAPPING_STABILIZATION),
            (ResourceKind::IntegrationTableProperties, ActionType::Update) => WaitSpec::builder()
                .pending([itp::PENDING])
                .target([itp::UPDATED])
                .not_found_budget(EVENTUAL_NOT_FOUND_BUDGET)
                .stabilization(FLAPPING_STABILIZATION),
            (ResourceKind::IntegrationTableProperties, ActionType::Delete) => WaitSpec::builder()
                .pending([itp::DELETING, itp::NORMAL])
                .not_found_budget(0),
            (ResourceKind::Account, ActionType::Create) => WaitSpec::builder()
                .pending([account::IN_PROGRESS])
                .target([account::SUCCEEDED])
                .failure([account::FAILED])
                .poll_interval(account::POLL_INTERVAL)
                .not_found_budget(EVENTUAL_NOT_FOUND_BUDGET),
            (ResourceKind::StreamProcessor, ActionType::Update) => WaitSpec::builder()
                .pending([stream_processor::UPDATING])
                .target([stream_processor::STOPPED])
                .failure([stream_processor::FAILED])
                .not_found_budget(EVENTUAL_NOT_FOUND_BUDGET)
                .stabilization(FLAPPING_STABILIZATION),
            _ => return None,
        };

        Some(builder.timeout(timeout).build())
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.service(), self.resource_type())
    }
}
