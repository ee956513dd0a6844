//! REST client for the PagerDuty v2 API, implementing both outbound ports.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use escalade_ports::error::PortError;
use escalade_ports::outbound::{Directory, OncallApi};
use escalade_ports::types::{EscalationPolicyPayload, SchedulePayload, TeamMember};

const DEFAULT_BASE_URL: &str = "https://api.pagerduty.com";
const ACCEPT_V2: &str = "application/vnd.pagerduty+json;version=2";

/// A team listing 26 users has more members than fit on a schedule layer;
/// fetching one past the cap lets the importer fail with a clear error
/// instead of silently truncating.
const TEAM_MEMBER_FETCH_LIMIT: &str = "26";

#[derive(Clone)]
pub struct PagerDutyClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl PagerDutyClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Points the client at a non-default endpoint, for tests and proxies.
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, PortError> {
        debug!(%path, "GET");
        let response = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .header(ACCEPT, ACCEPT_V2)
            .header(AUTHORIZATION, format!("Token token={}", self.api_key))
            .query(query)
            .send()
            .await
            .map_err(connection)?;
        parse_json(response).await
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl serde::Serialize,
    ) -> Result<T, PortError> {
        debug!(%path, "POST");
        let response = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .header(ACCEPT, ACCEPT_V2)
            .header(AUTHORIZATION, format!("Token token={}", self.api_key))
            .json(body)
            .send()
            .await
            .map_err(connection)?;
        parse_json(response).await
    }

    async fn delete(&self, path: &str) -> Result<(), PortError> {
        debug!(%path, "DELETE");
        let response = self
            .http
            .delete(format!("{}{}", self.base_url, path))
            .header(ACCEPT, ACCEPT_V2)
            .header(AUTHORIZATION, format!("Token token={}", self.api_key))
            .send()
            .await
            .map_err(connection)?;
        check_status(response).await.map(|_| ())
    }
}

#[async_trait]
impl Directory for PagerDutyClient {
    async fn team_id(&self, name: &str) -> Result<String, PortError> {
        let envelope: TeamsEnvelope = self.get_json("/teams", &[("query", name)]).await?;
        single_team(envelope.teams, name)
    }

    async fn team_members(&self, team_id: &str) -> Result<Vec<TeamMember>, PortError> {
        let envelope: UsersEnvelope = self
            .get_json(
                "/users",
                &[("team_ids[]", team_id), ("limit", TEAM_MEMBER_FETCH_LIMIT)],
            )
            .await?;
        Ok(envelope
            .users
            .into_iter()
            .map(|u| TeamMember { email: u.email })
            .collect())
    }

    async fn user_id(&self, query: &str) -> Result<String, PortError> {
        let envelope: UsersEnvelope = self.get_json("/users", &[("query", query)]).await?;
        match &envelope.users[..] {
            [] => Err(PortError::NotFound(format!("user {query:?}"))),
            [user] => Ok(user.id.clone()),
            _ => Err(PortError::Ambiguous(query.to_string())),
        }
    }
}

#[async_trait]
impl OncallApi for PagerDutyClient {
    async fn create_schedule(&self, payload: &SchedulePayload) -> Result<String, PortError> {
        let envelope: ScheduleEnvelope = self.post_json("/schedules", payload).await?;
        Ok(envelope.schedule.id)
    }

    async fn delete_schedule(&self, id: &str) -> Result<(), PortError> {
        self.delete(&format!("/schedules/{id}")).await
    }

    async fn create_escalation_policy(
        &self,
        payload: &EscalationPolicyPayload,
    ) -> Result<String, PortError> {
        let envelope: PolicyEnvelope = self.post_json("/escalation_policies", payload).await?;
        Ok(envelope.escalation_policy.id)
    }

    async fn delete_escalation_policy(&self, id: &str) -> Result<(), PortError> {
        self.delete(&format!("/escalation_policies/{id}")).await
    }
}

fn single_team(teams: Vec<RemoteTeam>, name: &str) -> Result<String, PortError> {
    match &teams[..] {
        [] => Err(PortError::NotFound(format!("team {name:?}"))),
        [team] => Ok(team.id.clone()),
        _ => Err(PortError::Ambiguous(name.to_string())),
    }
}

fn connection(err: reqwest::Error) -> PortError {
    PortError::Connection(err.to_string())
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, PortError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(PortError::Remote {
        status: status.as_u16(),
        body,
    })
}

async fn parse_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, PortError> {
    let response = check_status(response).await?;
    response
        .json()
        .await
        .map_err(|e| PortError::Malformed(e.to_string()))
}

#[derive(Deserialize)]
struct TeamsEnvelope {
    teams: Vec<RemoteTeam>,
}

#[derive(Deserialize)]
struct RemoteTeam {
    id: String,
}

#[derive(Deserialize)]
struct UsersEnvelope {
    users: Vec<RemoteUser>,
}

#[derive(Deserialize)]
struct RemoteUser {
    id: String,
    email: String,
}

#[derive(Deserialize)]
struct ScheduleEnvelope {
    schedule: RemoteId,
}

#[derive(Deserialize)]
struct PolicyEnvelope {
    escalation_policy: RemoteId,
}

#[derive(Deserialize)]
struct RemoteId {
    id: String,
}
