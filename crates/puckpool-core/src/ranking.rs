// Derived views over the participant collection: per-participant point
// totals and the standings table.

use serde::Serialize;

use crate::model::Participant;

/// One row of the standings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankingEntry {
    pub participant_id: String,
    pub name: String,
    pub total: u32,
}

/// Sum of the points of every pick that has stats.
pub fn participant_total(participant: &Participant) -> u32 {
    participant
        .picks
        .iter()
        .map(|p| p.points())
        .fold(0u32, u32::saturating_add)
}

/// Standings: highest total first, ties broken by name (byte order, so
/// upper-case sorts before lower-case).
pub fn ranking(participants: &[Participant]) -> Vec<RankingEntry> {
    let mut rows: Vec<RankingEntry> = participants
        .iter()
        .map(|p| RankingEntry {
            participant_id: p.id.clone(),
            name: p.name.clone(),
            total: participant_total(p),
        })
        .collect();

    rows.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.name.cmp(&b.name)));
    rows
}
