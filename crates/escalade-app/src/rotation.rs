//! The standard-rotation import: one schedule, one layer per rotation
//! layer, users rotating in CSV order.

use tracing::info;

use escalade_core::rotation::{group_rotation_rows, RotationRow};
use escalade_ports::outbound::{Directory, OncallApi};

use crate::config::ImportConfig;
use crate::error::AppError;
use crate::payload::{rotation_schedule_payload, ResolvedLayer};

pub struct StandardRotationImporter<D, A> {
    directory: D,
    api: A,
    config: ImportConfig,
}

impl<D: Directory, A: OncallApi> StandardRotationImporter<D, A> {
    pub fn new(directory: D, api: A, config: ImportConfig) -> Self {
        Self {
            directory,
            api,
            config,
        }
    }

    /// Creates the rotation schedule for one roster file and returns its id.
    /// Every user is resolved before the creation call.
    pub async fn import(&self, rows: &[RotationRow]) -> Result<String, AppError> {
        let layers = group_rotation_rows(rows)?;

        let mut resolved = Vec::with_capacity(layers.len());
        for layer in layers {
            let mut user_ids = Vec::with_capacity(layer.users.len());
            for user in &layer.users {
                user_ids.push(self.directory.user_id(user).await?);
            }
            resolved.push(ResolvedLayer { layer, user_ids });
        }

        let payload = rotation_schedule_payload(&self.config, &resolved)?;
        let id = self.api.create_schedule(&payload).await?;
        info!(name = %self.config.base_name, %id, layers = resolved.len(), "created schedule");
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::NaiveDate;
    use escalade_ports::error::PortError;
    use escalade_ports::types::{EscalationPolicyPayload, SchedulePayload, TeamMember};

    use super::*;

    struct MockDirectory;

    #[async_trait]
    impl Directory for MockDirectory {
        async fn team_id(&self, name: &str) -> Result<String, PortError> {
            Err(PortError::NotFound(name.to_string()))
        }

        async fn team_members(&self, team_id: &str) -> Result<Vec<TeamMember>, PortError> {
            Err(PortError::NotFound(team_id.to_string()))
        }

        async fn user_id(&self, query: &str) -> Result<String, PortError> {
            Ok(format!("ID-{query}"))
        }
    }

    #[derive(Default)]
    struct MockApi {
        schedules: Mutex<Vec<SchedulePayload>>,
    }

    #[async_trait]
    impl OncallApi for MockApi {
        async fn create_schedule(&self, payload: &SchedulePayload) -> Result<String, PortError> {
            let mut created = self.schedules.lock().unwrap();
            created.push(payload.clone());
            Ok(format!("PSCHED{}", created.len()))
        }

        async fn delete_schedule(&self, _id: &str) -> Result<(), PortError> {
            Ok(())
        }

        async fn create_escalation_policy(
            &self,
            _payload: &EscalationPolicyPayload,
        ) -> Result<String, PortError> {
            Ok("PPOLICY1".into())
        }

        async fn delete_escalation_policy(&self, _id: &str) -> Result<(), PortError> {
            Ok(())
        }
    }

    fn config() -> ImportConfig {
        ImportConfig {
            base_name: "Ops Rotation".into(),
            level_label: "Level".into(),
            multi_label: "Schedule".into(),
            start_date: NaiveDate::from_ymd_opt(2016, 2, 1).unwrap(),
            end_date: None,
            time_zone: chrono_tz::UTC,
            num_loops: 0,
            escalation_delay_minutes: 30,
        }
    }

    fn row(user: &str, layer: &str, rotation_type: &str) -> RotationRow {
        RotationRow {
            user: user.into(),
            layer: layer.into(),
            layer_name: "Primary".into(),
            rotation_type: rotation_type.into(),
            shift_length: String::new(),
            shift_type: String::new(),
            handoff_day: if rotation_type == "weekly" {
                "monday".into()
            } else {
                String::new()
            },
            handoff_time: "09:00".into(),
            restriction_start_day: String::new(),
            restriction_start_time: String::new(),
            restriction_end_day: String::new(),
            restriction_end_time: String::new(),
        }
    }

    #[tokio::test]
    async fn builds_one_schedule_with_a_layer_per_rotation() {
        let importer = StandardRotationImporter::new(MockDirectory, MockApi::default(), config());
        let mut second = row("carol", "2", "daily");
        second.layer_name = "Backup".into();
        let rows = vec![row("alice", "1", "weekly"), row("bob", "1", "weekly"), second];

        let id = importer.import(&rows).await.unwrap();
        assert_eq!(id, "PSCHED1");

        let schedules = importer.api.schedules.lock().unwrap();
        let body = &schedules[0].schedule;
        assert_eq!(body.name, "Ops Rotation");
        assert_eq!(body.schedule_layers.len(), 2);
        assert_eq!(body.schedule_layers[0].rotation_turn_length_seconds, 604_800);
        assert_eq!(body.schedule_layers[1].rotation_turn_length_seconds, 86_400);
        let ids: Vec<_> = body.schedule_layers[0]
            .users
            .iter()
            .map(|u| u.user.id.as_str())
            .collect();
        assert_eq!(ids, vec!["ID-alice", "ID-bob"]);
    }

    #[tokio::test]
    async fn restriction_columns_become_a_layer_restriction() {
        let importer = StandardRotationImporter::new(MockDirectory, MockApi::default(), config());
        let mut restricted = row("alice", "1", "daily");
        restricted.restriction_start_day = "monday".into();
        restricted.restriction_start_time = "09:00".into();
        restricted.restriction_end_day = "friday".into();
        restricted.restriction_end_time = "17:00".into();

        importer.import(&[restricted]).await.unwrap();

        let schedules = importer.api.schedules.lock().unwrap();
        let restrictions = &schedules[0].schedule.schedule_layers[0].restrictions;
        assert_eq!(restrictions.len(), 1);
        assert_eq!(restrictions[0].kind, "weekly_restriction");
        assert_eq!(restrictions[0].start_day_of_week, Some(1));
        assert_eq!(restrictions[0].duration_seconds, 4 * 86_400 + 8 * 3600);
    }

    #[tokio::test]
    async fn mismatched_layer_rows_abort_before_creation() {
        let importer = StandardRotationImporter::new(MockDirectory, MockApi::default(), config());
        let mut second = row("bob", "1", "weekly");
        second.handoff_time = "18:00".into();
        let err = importer
            .import(&[row("alice", "1", "weekly"), second])
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Domain(_)));
        assert!(importer.api.schedules.lock().unwrap().is_empty());
    }
}
