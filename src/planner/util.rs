use crate::model::TimeSlot;

/// Chevauchement semi-ouvert : deux créneaux qui se touchent ne se
/// chevauchent pas.
pub fn slots_overlap(a: TimeSlot, b: TimeSlot) -> bool {
    a.start < b.end && b.start < a.end
}

/// Minutes communes aux deux créneaux ; 0 sans chevauchement.
pub fn overlap_minutes(a: TimeSlot, b: TimeSlot) -> u32 {
    let start = a.start.max(b.start);
    let end = a.end.min(b.end);
    if end <= start {
        0
    } else {
        u32::from(end.minutes()) - u32::from(start.minutes())
    }
}

/// Enveloppe [min(start), max(end)] d'un ensemble de créneaux.
pub(crate) fn span_of(slots: &[TimeSlot]) -> Option<TimeSlot> {
    let start = slots.iter().map(|s| s.start).min()?;
    let end = slots.iter().map(|s| s.end).max()?;
    Some(TimeSlot { start, end })
}
