//! Time budgets: phase durations by session length, substage proportions.
//!
//! Phase minutes come from a lookup table keyed by duration tier; within a
//! phase the substages split the phase total proportionally. Rounding never
//! drifts: every remainder lands on the last entry, so substage minutes sum
//! exactly to their phase total and phase totals sum exactly to the
//! requested session total.

use serde::{Deserialize, Serialize};

use crate::phase::{PhaseKind, PhasePosition, SessionPlan, SubstageKind};

/// Nominal phase minutes (Connect / Explore / Discover / Closing) per tier.
/// Sessions longer than the last tier scale it proportionally.
const TIERS: [(u32, [u32; 4]); 5] = [
    (60, [15, 20, 20, 5]),
    (90, [25, 30, 30, 5]),
    (120, [35, 40, 40, 5]),
    (180, [50, 60, 60, 10]),
    (240, [65, 80, 80, 15]),
];

/// Share of a phase each substage gets, in percent. WE takes the exact
/// remainder regardless of its nominal share.
fn substage_percent(kind: SubstageKind) -> u32 {
    match kind {
        SubstageKind::Catalyst => 20,
        SubstageKind::Dialogue => 55,
        SubstageKind::Summary => 15,
        SubstageKind::We => 10,
    }
}

/// Time budget for one substage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubstageBudget {
    pub kind: SubstageKind,
    pub minutes: u32,
}

/// Time budget for one phase and its substages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseBudget {
    pub kind: PhaseKind,
    pub minutes: u32,
    pub substages: Vec<SubstageBudget>,
}

/// The complete time budget of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSchedule {
    total_minutes: u32,
    phases: Vec<PhaseBudget>,
}

impl SessionSchedule {
    /// Compute the schedule for a session of `total_minutes`.
    ///
    /// Phase minutes follow the tier whose nominal total covers the request,
    /// scaled to the exact total with the remainder on the last phase.
    pub fn for_total_minutes(total_minutes: u32, plan: &SessionPlan) -> Self {
        let phase_minutes = phase_minutes_for_total(total_minutes, plan.phases.len());

        let phases = plan
            .phases
            .iter()
            .zip(phase_minutes)
            .map(|(phase, minutes)| {
                let substages = split_substages(minutes, phase.substages.iter().map(|s| s.kind));
                PhaseBudget {
                    kind: phase.kind,
                    minutes,
                    substages,
                }
            })
            .collect();

        Self {
            total_minutes,
            phases,
        }
    }

    pub fn total_minutes(&self) -> u32 {
        self.total_minutes
    }

    pub fn phases(&self) -> &[PhaseBudget] {
        &self.phases
    }

    pub fn phase_budget(&self, kind: PhaseKind) -> Option<&PhaseBudget> {
        self.phases.iter().find(|p| p.kind == kind)
    }

    /// Minutes budgeted for the substage at `position`.
    pub fn substage_minutes(&self, position: PhasePosition) -> Option<u32> {
        self.phases
            .get(position.phase)
            .and_then(|p| p.substages.get(position.substage))
            .map(|s| s.minutes)
    }
}

/// Phase minutes for a requested total, remainder on the last phase.
fn phase_minutes_for_total(total: u32, phase_count: usize) -> Vec<u32> {
    if phase_count == 0 {
        return Vec::new();
    }

    let (tier_total, tier) = TIERS
        .iter()
        .find(|(nominal, _)| total <= *nominal)
        .unwrap_or(&TIERS[TIERS.len() - 1]);

    // The standard plan has exactly four phases; shorter custom plans fold
    // the trailing table entries into the last phase via the remainder.
    let mut minutes = Vec::with_capacity(phase_count);
    let mut allocated = 0u32;
    for i in 0..phase_count - 1 {
        let nominal = tier.get(i).copied().unwrap_or(0);
        let scaled = (u64::from(nominal) * u64::from(total) / u64::from(*tier_total)) as u32;
        minutes.push(scaled);
        allocated += scaled;
    }
    minutes.push(total.saturating_sub(allocated));
    minutes
}

/// Substage minutes within one phase, remainder on the last substage.
fn split_substages(
    phase_minutes: u32,
    kinds: impl Iterator<Item = SubstageKind>,
) -> Vec<SubstageBudget> {
    let kinds: Vec<SubstageKind> = kinds.collect();
    let mut budgets = Vec::with_capacity(kinds.len());
    let mut allocated = 0u32;

    for (i, kind) in kinds.iter().enumerate() {
        let minutes = if i + 1 == kinds.len() {
            phase_minutes.saturating_sub(allocated)
        } else {
            phase_minutes * substage_percent(*kind) / 100
        };
        allocated += minutes;
        budgets.push(SubstageBudget {
            kind: *kind,
            minutes,
        });
    }

    budgets
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phase_minutes(schedule: &SessionSchedule) -> Vec<u32> {
        schedule.phases().iter().map(|p| p.minutes).collect()
    }

    #[test]
    fn test_120_minute_tier() {
        let plan = SessionPlan::standard();
        let schedule = SessionSchedule::for_total_minutes(120, &plan);
        assert_eq!(phase_minutes(&schedule), vec![35, 40, 40, 5]);
    }

    #[test]
    fn test_90_minute_tier_sums_exactly() {
        let plan = SessionPlan::standard();
        let schedule = SessionSchedule::for_total_minutes(90, &plan);
        assert_eq!(phase_minutes(&schedule), vec![25, 30, 30, 5]);
        assert_eq!(phase_minutes(&schedule).iter().sum::<u32>(), 90);
    }

    #[test]
    fn test_phase_totals_sum_to_requested_total() {
        let plan = SessionPlan::standard();
        for total in [7, 45, 60, 73, 100, 121, 179, 200, 240, 300, 500] {
            let schedule = SessionSchedule::for_total_minutes(total, &plan);
            assert_eq!(
                phase_minutes(&schedule).iter().sum::<u32>(),
                total,
                "total={}",
                total
            );
        }
    }

    #[test]
    fn test_substage_minutes_sum_to_phase_total() {
        let plan = SessionPlan::standard();
        for total in [60, 90, 120, 135, 180, 240, 360] {
            let schedule = SessionSchedule::for_total_minutes(total, &plan);
            for phase in schedule.phases() {
                let sum: u32 = phase.substages.iter().map(|s| s.minutes).sum();
                assert_eq!(sum, phase.minutes, "total={} phase={}", total, phase.kind);
            }
        }
    }

    #[test]
    fn test_substage_proportions() {
        let plan = SessionPlan::standard();
        let schedule = SessionSchedule::for_total_minutes(120, &plan);
        // Explore gets 40 minutes: 20% / 55% / 15% / remainder
        let explore = schedule.phase_budget(PhaseKind::Explore).unwrap();
        let minutes: Vec<u32> = explore.substages.iter().map(|s| s.minutes).collect();
        assert_eq!(minutes, vec![8, 22, 6, 4]);
    }

    #[test]
    fn test_lookup_by_position() {
        let plan = SessionPlan::standard();
        let schedule = SessionSchedule::for_total_minutes(120, &plan);
        // Connect dialogue: 55% of 35
        assert_eq!(
            schedule.substage_minutes(PhasePosition::new(0, 1)),
            Some(19)
        );
        assert_eq!(schedule.substage_minutes(PhasePosition::new(9, 0)), None);
    }

    #[test]
    fn test_long_sessions_scale_top_tier() {
        let plan = SessionPlan::standard();
        let schedule = SessionSchedule::for_total_minutes(480, &plan);
        let minutes = phase_minutes(&schedule);
        assert_eq!(minutes.iter().sum::<u32>(), 480);
        // Double the 240 tier: 130/160/160/30
        assert_eq!(minutes, vec![130, 160, 160, 30]);
    }
}
