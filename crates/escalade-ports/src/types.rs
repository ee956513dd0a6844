use serde::{Deserialize, Serialize};

/// A team member as returned by the directory; the contact email doubles
/// as the user lookup key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMember {
    pub email: String,
}

/// Wire form of a schedule creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulePayload {
    pub schedule: ScheduleBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleBody {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub time_zone: String,
    pub schedule_layers: Vec<ScheduleLayer>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleLayer {
    pub start: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    pub rotation_virtual_start: String,
    pub rotation_turn_length_seconds: u64,
    pub users: Vec<LayerUser>,
    pub restrictions: Vec<RestrictionPayload>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerUser {
    pub user: UserReference,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserReference {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl UserReference {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: "user_reference".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestrictionPayload {
    #[serde(rename = "type")]
    pub kind: String,
    pub start_time_of_day: String,
    pub duration_seconds: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_day_of_week: Option<u8>,
}

/// Wire form of an escalation-policy creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscalationPolicyPayload {
    pub escalation_policy: EscalationPolicyBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscalationPolicyBody {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub escalation_rules: Vec<EscalationRule>,
    pub repeat_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_loops: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscalationRule {
    pub escalation_delay_in_minutes: u32,
    pub targets: Vec<TargetReference>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetReference {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl TargetReference {
    pub fn schedule(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: "schedule_reference".into(),
        }
    }
}
