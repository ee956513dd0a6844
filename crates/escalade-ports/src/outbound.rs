use async_trait::async_trait;

use crate::error::PortError;
use crate::types::{EscalationPolicyPayload, SchedulePayload, TeamMember};

/// User and team lookups against the on-call service's directory.
#[async_trait]
pub trait Directory: Send + Sync {
    /// Resolves a team name to its ID. Zero matches fail with `NotFound`,
    /// several with `Ambiguous`.
    async fn team_id(&self, name: &str) -> Result<String, PortError>;

    /// Lists the members of a team by team ID.
    async fn team_members(&self, team_id: &str) -> Result<Vec<TeamMember>, PortError>;

    /// Resolves a user name or email to the canonical user ID. Zero
    /// matches fail with `NotFound`, several with `Ambiguous`.
    async fn user_id(&self, query: &str) -> Result<String, PortError>;
}

/// Schedule and escalation-policy management on the on-call service.
///
/// Creation returns the remote identifier; non-success responses surface
/// as [`PortError::Remote`] with status and body. The delete operations
/// exist for manual cleanup after a partially failed import.
#[async_trait]
pub trait OncallApi: Send + Sync {
    async fn create_schedule(&self, payload: &SchedulePayload) -> Result<String, PortError>;
    async fn delete_schedule(&self, id: &str) -> Result<(), PortError>;
    async fn create_escalation_policy(
        &self,
        payload: &EscalationPolicyPayload,
    ) -> Result<String, PortError>;
    async fn delete_escalation_policy(&self, id: &str) -> Result<(), PortError>;
}
