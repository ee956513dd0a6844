//! Turns consolidated schedules and rotation layers into wire payloads.

use chrono::NaiveTime;

use escalade_core::error::DomainError;
use escalade_core::pipeline::ConsolidatedSchedule;
use escalade_core::rotation::{
    localize, plan_restriction, rotation_turn_length, virtual_start, RestrictionKind,
    RotationLayer,
};
use escalade_core::time::{TimeOfDay, SECONDS_PER_DAY};
use escalade_ports::types::{
    EscalationPolicyBody, EscalationPolicyPayload, EscalationRule, LayerUser, RestrictionPayload,
    ScheduleBody, ScheduleLayer, SchedulePayload, TargetReference, UserReference,
};

use crate::config::ImportConfig;

/// A rotation layer together with the remote ids of its users, in CSV order.
#[derive(Debug, Clone)]
pub struct ResolvedLayer {
    pub layer: RotationLayer,
    pub user_ids: Vec<String>,
}

/// Builds the creation payload for one weekly-shift schedule.
///
/// Every recurring period becomes its own schedule layer holding a single
/// user: a whole-week period restricts the layer daily, anything narrower
/// gets one weekly restriction per covered day. The hourly turn length is
/// irrelevant under full restriction coverage and fixed at one hour.
pub fn weekly_schedule_payload(
    config: &ImportConfig,
    schedule: &ConsolidatedSchedule,
) -> Result<SchedulePayload, DomainError> {
    let (start, end) = layer_interval(config)?;

    let mut layers = Vec::with_capacity(schedule.periods.len());
    for period in &schedule.periods {
        let duration = window_duration(&period.start, &period.end);
        let restrictions = if period.covers_whole_week() {
            vec![RestrictionPayload {
                kind: "daily_restriction".into(),
                start_time_of_day: period.start.clock(),
                duration_seconds: duration,
                start_day_of_week: None,
            }]
        } else {
            period
                .days
                .iter()
                .map(|day| RestrictionPayload {
                    kind: "weekly_restriction".into(),
                    start_time_of_day: period.start.clock(),
                    duration_seconds: duration,
                    start_day_of_week: Some(day.iso_number()),
                })
                .collect()
        };
        layers.push(ScheduleLayer {
            start: start.clone(),
            end: end.clone(),
            rotation_virtual_start: start.clone(),
            rotation_turn_length_seconds: 3600,
            users: vec![LayerUser {
                user: UserReference::new(&period.assignee.id),
            }],
            restrictions,
        });
    }

    Ok(SchedulePayload {
        schedule: ScheduleBody {
            name: schedule.name.clone(),
            kind: "schedule".into(),
            time_zone: config.time_zone.name().to_string(),
            schedule_layers: layers,
        },
    })
}

/// Builds the creation payload for a standard-rotation schedule: one layer
/// per rotation layer, users rotating with the layer's turn length.
pub fn rotation_schedule_payload(
    config: &ImportConfig,
    layers: &[ResolvedLayer],
) -> Result<SchedulePayload, DomainError> {
    let (start, end) = layer_interval(config)?;

    let mut wire_layers = Vec::with_capacity(layers.len());
    for resolved in layers {
        let layer = &resolved.layer;
        let virtual_start =
            virtual_start(layer, config.start_date, config.time_zone)?.to_rfc3339();
        let restrictions = match &layer.restriction {
            None => Vec::new(),
            Some(window) => {
                let plan = plan_restriction(window)?;
                vec![RestrictionPayload {
                    kind: match plan.kind {
                        RestrictionKind::Daily => "daily_restriction".into(),
                        RestrictionKind::Weekly => "weekly_restriction".into(),
                    },
                    start_time_of_day: plan.start_time_of_day,
                    duration_seconds: plan.duration_seconds,
                    start_day_of_week: plan.start_day_of_week,
                }]
            }
        };
        wire_layers.push(ScheduleLayer {
            start: start.clone(),
            end: end.clone(),
            rotation_virtual_start: virtual_start,
            rotation_turn_length_seconds: rotation_turn_length(layer)?,
            users: resolved
                .user_ids
                .iter()
                .map(|id| LayerUser {
                    user: UserReference::new(id),
                })
                .collect(),
            restrictions,
        });
    }

    Ok(SchedulePayload {
        schedule: ScheduleBody {
            name: config.base_name.clone(),
            kind: "schedule".into(),
            time_zone: config.time_zone.name().to_string(),
            schedule_layers: wire_layers,
        },
    })
}

/// Builds the escalation policy targeting the created schedules: one rule
/// per level, each targeting that level's parallel schedules in order.
pub fn escalation_policy_payload(
    config: &ImportConfig,
    schedule_ids_by_level: &[Vec<String>],
) -> EscalationPolicyPayload {
    let rules = schedule_ids_by_level
        .iter()
        .map(|ids| EscalationRule {
            escalation_delay_in_minutes: config.escalation_delay_minutes,
            targets: ids.iter().map(TargetReference::schedule).collect(),
        })
        .collect();
    EscalationPolicyPayload {
        escalation_policy: EscalationPolicyBody {
            name: config.base_name.clone(),
            kind: "escalation_policy".into(),
            escalation_rules: rules,
            repeat_enabled: config.num_loops > 0,
            num_loops: (config.num_loops > 0).then_some(config.num_loops),
        },
    }
}

/// RFC 3339 timestamps for a layer's lifetime: local midnight on the start
/// date, and on the day after the end date when one is set.
fn layer_interval(config: &ImportConfig) -> Result<(String, Option<String>), DomainError> {
    let start = localize(config.start_date, NaiveTime::MIN, config.time_zone)?.to_rfc3339();
    let end = match config.end_date {
        None => None,
        Some(date) => {
            let after = date
                .succ_opt()
                .ok_or_else(|| DomainError::InvalidDate(date.to_string()))?;
            Some(localize(after, NaiveTime::MIN, config.time_zone)?.to_rfc3339())
        }
    };
    Ok((start, end))
}

/// Seconds from window start to window end, wrapping past midnight when the
/// end reads earlier than the start.
fn window_duration(start: &TimeOfDay, end: &TimeOfDay) -> u64 {
    let start = u64::from(start.seconds());
    let end = u64::from(end.seconds());
    if end >= start {
        end - start
    } else {
        end + u64::from(SECONDS_PER_DAY) - start
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use escalade_core::day::DayOfWeek;
    use escalade_core::pipeline::RecurringPeriod;
    use escalade_core::roster::{Assignee, AssigneeKind};
    use escalade_core::rotation::RotationType;

    fn config() -> ImportConfig {
        ImportConfig {
            base_name: "Ops".into(),
            level_label: "Level".into(),
            multi_label: "Schedule".into(),
            start_date: NaiveDate::from_ymd_opt(2016, 2, 1).unwrap(),
            end_date: None,
            time_zone: chrono_tz::UTC,
            num_loops: 0,
            escalation_delay_minutes: 30,
        }
    }

    fn recurring(who: &str, start: &str, end: &str, days: Vec<DayOfWeek>) -> RecurringPeriod {
        RecurringPeriod {
            start: TimeOfDay::parse(start).unwrap(),
            end: TimeOfDay::parse(end).unwrap(),
            assignee: Assignee {
                id: who.into(),
                kind: AssigneeKind::User,
            },
            days,
        }
    }

    fn consolidated(periods: Vec<RecurringPeriod>) -> ConsolidatedSchedule {
        ConsolidatedSchedule {
            name: "Ops Level 1".into(),
            periods,
        }
    }

    #[test]
    fn whole_week_period_becomes_one_daily_restriction() {
        let schedule = consolidated(vec![recurring(
            "PUSER1",
            "09:00",
            "17:00",
            DayOfWeek::ALL.to_vec(),
        )]);
        let payload = weekly_schedule_payload(&config(), &schedule).unwrap();
        let layer = &payload.schedule.schedule_layers[0];
        assert_eq!(layer.restrictions.len(), 1);
        assert_eq!(layer.restrictions[0].kind, "daily_restriction");
        assert_eq!(layer.restrictions[0].duration_seconds, 28_800);
        assert_eq!(layer.restrictions[0].start_day_of_week, None);
    }

    #[test]
    fn partial_week_yields_one_weekly_restriction_per_day() {
        let schedule = consolidated(vec![recurring(
            "PUSER1",
            "09:00",
            "17:00",
            vec![DayOfWeek::Sunday, DayOfWeek::Monday, DayOfWeek::Friday],
        )]);
        let payload = weekly_schedule_payload(&config(), &schedule).unwrap();
        let restrictions = &payload.schedule.schedule_layers[0].restrictions;
        assert_eq!(restrictions.len(), 3);
        assert!(restrictions.iter().all(|r| r.kind == "weekly_restriction"));
        let days: Vec<_> = restrictions.iter().map(|r| r.start_day_of_week).collect();
        assert_eq!(days, vec![Some(7), Some(1), Some(5)]);
    }

    #[test]
    fn overnight_window_duration_wraps_past_midnight() {
        let schedule = consolidated(vec![recurring(
            "PUSER1",
            "22:00",
            "06:00",
            vec![DayOfWeek::Monday],
        )]);
        let payload = weekly_schedule_payload(&config(), &schedule).unwrap();
        assert_eq!(
            payload.schedule.schedule_layers[0].restrictions[0].duration_seconds,
            28_800
        );
    }

    #[test]
    fn layers_start_at_local_midnight_without_an_end() {
        let schedule = consolidated(vec![recurring(
            "PUSER1",
            "09:00",
            "17:00",
            vec![DayOfWeek::Monday],
        )]);
        let payload = weekly_schedule_payload(&config(), &schedule).unwrap();
        let layer = &payload.schedule.schedule_layers[0];
        assert_eq!(layer.start, "2016-02-01T00:00:00+00:00");
        assert_eq!(layer.rotation_virtual_start, layer.start);
        assert_eq!(layer.end, None);
        assert_eq!(layer.rotation_turn_length_seconds, 3600);
    }

    #[test]
    fn end_date_closes_layers_at_midnight_after_it() {
        let mut cfg = config();
        cfg.end_date = NaiveDate::from_ymd_opt(2016, 2, 29);
        let schedule = consolidated(vec![recurring(
            "PUSER1",
            "09:00",
            "17:00",
            vec![DayOfWeek::Monday],
        )]);
        let payload = weekly_schedule_payload(&cfg, &schedule).unwrap();
        assert_eq!(
            payload.schedule.schedule_layers[0].end.as_deref(),
            Some("2016-03-01T00:00:00+00:00")
        );
    }

    #[test]
    fn rotation_payload_carries_turn_length_and_users_in_order() {
        let layers = vec![ResolvedLayer {
            layer: RotationLayer {
                number: 1,
                name: "Primary".into(),
                rotation_type: RotationType::Daily,
                shift_length: None,
                shift_unit: None,
                handoff_day: None,
                handoff_time: Some(TimeOfDay::parse("18:00").unwrap()),
                restriction: None,
                users: vec!["alice".into(), "bob".into()],
            },
            user_ids: vec!["PUSER1".into(), "PUSER2".into()],
        }];
        let payload = rotation_schedule_payload(&config(), &layers).unwrap();
        assert_eq!(payload.schedule.name, "Ops");
        let layer = &payload.schedule.schedule_layers[0];
        assert_eq!(layer.rotation_turn_length_seconds, 86_400);
        assert_eq!(layer.rotation_virtual_start, "2016-02-01T18:00:00+00:00");
        let ids: Vec<_> = layer.users.iter().map(|u| u.user.id.as_str()).collect();
        assert_eq!(ids, vec!["PUSER1", "PUSER2"]);
        assert!(layer.restrictions.is_empty());
    }

    #[test]
    fn policy_rules_follow_level_order_with_schedule_targets() {
        let ids = vec![
            vec!["PSCHED1".to_string(), "PSCHED2".to_string()],
            vec!["PSCHED3".to_string()],
        ];
        let payload = escalation_policy_payload(&config(), &ids);
        let body = &payload.escalation_policy;
        assert_eq!(body.name, "Ops");
        assert_eq!(body.escalation_rules.len(), 2);
        assert_eq!(body.escalation_rules[0].targets.len(), 2);
        assert_eq!(body.escalation_rules[0].targets[0].id, "PSCHED1");
        assert_eq!(body.escalation_rules[1].targets[0].id, "PSCHED3");
        assert!(!body.repeat_enabled);
        assert_eq!(body.num_loops, None);
    }

    #[test]
    fn looping_policy_repeats_with_num_loops() {
        let mut cfg = config();
        cfg.num_loops = 3;
        let payload = escalation_policy_payload(&cfg, &[vec!["PSCHED1".to_string()]]);
        assert!(payload.escalation_policy.repeat_enabled);
        assert_eq!(payload.escalation_policy.num_loops, Some(3));
    }
}
