//! The weekly-shifts import: team expansion, user resolution, the layering
//! pipeline, and creation of the schedules plus their escalation policy.

use std::collections::HashMap;

use tracing::{debug, info, warn};

use escalade_core::day::DayOfWeek;
use escalade_core::error::DomainError;
use escalade_core::pipeline::{collapse_periods, consolidate, partition_by_level, split_overlaps};
use escalade_core::roster::{AssigneeKind, CoverageEntry, SkippedRow, WeekRoster, WeeklyRow};
use escalade_ports::outbound::{Directory, OncallApi};

use crate::config::ImportConfig;
use crate::error::AppError;
use crate::payload::{escalation_policy_payload, weekly_schedule_payload};

/// Most users one (day, level) bucket may carry after team expansion, the
/// remote limit on targets per schedule layer.
pub const MAX_USERS_PER_LEVEL_DAY: usize = 25;

#[derive(Debug)]
pub struct WeeklyImportOutcome {
    /// Created schedule ids, outer index = escalation level - 1.
    pub schedule_ids_by_level: Vec<Vec<String>>,
    pub escalation_policy_id: String,
    /// Rows dropped for an unrecognized day token.
    pub skipped_rows: Vec<SkippedRow>,
}

pub struct WeeklyShiftImporter<D, A> {
    directory: D,
    api: A,
    config: ImportConfig,
}

impl<D: Directory, A: OncallApi> WeeklyShiftImporter<D, A> {
    pub fn new(directory: D, api: A, config: ImportConfig) -> Self {
        Self {
            directory,
            api,
            config,
        }
    }

    /// Runs the whole import for one roster file.
    ///
    /// All remote lookups happen before anything is created, so a failed
    /// resolution aborts the run without leaving partial state behind.
    pub async fn import(&self, rows: &[WeeklyRow]) -> Result<WeeklyImportOutcome, AppError> {
        let (week, skipped_rows) = WeekRoster::from_rows(rows)?;
        for skip in &skipped_rows {
            warn!(assignee = %skip.assignee, day = %skip.day_token, "skipping row with unknown day");
        }

        let week = self.expand_teams(&week).await?;
        let week = self.resolve_users(&week).await?;
        let groups = partition_by_level(&week, &self.config.base_name, &self.config.level_label)?;

        let mut schedule_ids_by_level = Vec::with_capacity(groups.len());
        for group in &groups {
            let periods = collapse_periods(group);
            let schedules = split_overlaps(&periods, &self.config.multi_label);
            let mut ids = Vec::with_capacity(schedules.len());
            for schedule in &schedules {
                let consolidated = consolidate(schedule);
                let payload = weekly_schedule_payload(&self.config, &consolidated)?;
                let id = self.api.create_schedule(&payload).await?;
                info!(name = %consolidated.name, %id, "created schedule");
                ids.push(id);
            }
            schedule_ids_by_level.push(ids);
        }

        let policy = escalation_policy_payload(&self.config, &schedule_ids_by_level);
        let escalation_policy_id = self.api.create_escalation_policy(&policy).await?;
        info!(name = %self.config.base_name, id = %escalation_policy_id, "created escalation policy");

        Ok(WeeklyImportOutcome {
            schedule_ids_by_level,
            escalation_policy_id,
            skipped_rows,
        })
    }

    /// Replaces each team entry with one user entry per member, keeping the
    /// team's level and window. Enforces the per-bucket user cap on the
    /// expanded result.
    async fn expand_teams(&self, week: &WeekRoster) -> Result<WeekRoster, AppError> {
        let mut expanded = WeekRoster::new();
        for (day, entries) in week.iter_days() {
            let mut bucket_sizes: HashMap<u32, usize> = HashMap::new();
            for entry in entries {
                match entry.kind {
                    AssigneeKind::User => {
                        grow_bucket(&mut bucket_sizes, entry.escalation_level, day)?;
                        expanded.push(day, entry.clone());
                    }
                    AssigneeKind::Team => {
                        let team_id = self.directory.team_id(&entry.assignee).await?;
                        let members = self.directory.team_members(&team_id).await?;
                        debug!(team = %entry.assignee, members = members.len(), "expanded team");
                        for member in members {
                            grow_bucket(&mut bucket_sizes, entry.escalation_level, day)?;
                            expanded.push(
                                day,
                                CoverageEntry {
                                    assignee: member.email,
                                    kind: AssigneeKind::User,
                                    ..entry.clone()
                                },
                            );
                        }
                    }
                }
            }
        }
        Ok(expanded)
    }

    /// Swaps every assignee's name or email for its remote user id.
    async fn resolve_users(&self, week: &WeekRoster) -> Result<WeekRoster, AppError> {
        let mut resolved = WeekRoster::new();
        for (day, entries) in week.iter_days() {
            for entry in entries {
                let id = self.directory.user_id(&entry.assignee).await?;
                resolved.push(
                    day,
                    CoverageEntry {
                        assignee: id,
                        ..entry.clone()
                    },
                );
            }
        }
        Ok(resolved)
    }
}

fn grow_bucket(
    sizes: &mut HashMap<u32, usize>,
    level: u32,
    day: DayOfWeek,
) -> Result<(), DomainError> {
    let size = sizes.entry(level).or_insert(0);
    if *size == MAX_USERS_PER_LEVEL_DAY {
        return Err(DomainError::CapacityExceeded { level, day });
    }
    *size += 1;
    Ok(())
}
