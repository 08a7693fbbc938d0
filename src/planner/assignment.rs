use super::resolve;
use super::types::PlanError;
use crate::model::{LeaveRequest, StaffBranchSchedule, StaffDateAssignment};
use chrono::NaiveDate;

/// Matérialise les affectations d'un membre sur une plage de dates incluse :
/// une affectation par journée résolue non vide, rendues triées par date.
pub fn materialize_assignments(
    schedule: &StaffBranchSchedule,
    leaves: &[LeaveRequest],
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<StaffDateAssignment>, PlanError> {
    if to < from {
        return Err(PlanError::InvalidDateRange);
    }

    let mut out = Vec::new();
    let mut current = from;
    while current <= to {
        let day = resolve::resolve_staff_day(&schedule.week, &schedule.overrides, leaves, current);
        if day.is_bookable() {
            out.push(StaffDateAssignment {
                staff_id: schedule.staff_id.clone(),
                branch_id: schedule.branch_id.clone(),
                date: current,
                slots: day.slots,
                reason: None,
            });
        }
        current = current
            .succ_opt()
            .ok_or_else(|| PlanError::Other(anyhow::anyhow!("date overflow")))?;
    }
    Ok(out)
}
