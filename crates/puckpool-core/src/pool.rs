// In-memory pool state: the ordered participant collection and the
// validated mutations the client performs on it.

use thiserror::Error;

use crate::model::{Participant, Pick, PlayerId, PlayerStats, MAX_PICKS};

/// Rejected user actions. These are shown to the user, not logged as errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoolError {
    #[error("participant name must not be empty")]
    EmptyName,

    #[error("the name `{0}` is already in use")]
    DuplicateName(String),

    #[error("{0} is already on this list")]
    DuplicatePick(String),

    #[error("a participant can have at most 10 players")]
    PickLimit,

    #[error("no participant with id `{0}`")]
    UnknownParticipant(String),
}

/// The participant collection. Newest participants come first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolState {
    participants: Vec<Participant>,
}

impl PoolState {
    pub fn new(participants: Vec<Participant>) -> Self {
        PoolState { participants }
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    pub fn get(&self, participant_id: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == participant_id)
    }

    /// Add a participant at the front of the collection.
    ///
    /// The name is trimmed; it must be non-empty and must not match an
    /// existing name case-insensitively. Returns the new participant's id.
    pub fn add_participant(&mut self, name: &str) -> Result<String, PoolError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PoolError::EmptyName);
        }
        let lowered = name.to_lowercase();
        if self
            .participants
            .iter()
            .any(|p| p.name.to_lowercase() == lowered)
        {
            return Err(PoolError::DuplicateName(name.to_string()));
        }

        let participant = Participant::new(name);
        let id = participant.id.clone();
        self.participants.insert(0, participant);
        Ok(id)
    }

    /// Remove a participant by id. Returns whether anything was removed.
    pub fn remove_participant(&mut self, participant_id: &str) -> bool {
        let before = self.participants.len();
        self.participants.retain(|p| p.id != participant_id);
        self.participants.len() != before
    }

    /// Append a pick to a participant's list.
    pub fn add_pick(&mut self, participant_id: &str, pick: Pick) -> Result<(), PoolError> {
        let participant = self.get_mut(participant_id)?;
        if participant.has_pick(pick.id) {
            return Err(PoolError::DuplicatePick(pick.name));
        }
        if participant.picks.len() >= MAX_PICKS {
            return Err(PoolError::PickLimit);
        }
        participant.picks.push(pick);
        Ok(())
    }

    /// Remove a pick by player id. Returns whether anything was removed.
    pub fn remove_pick(
        &mut self,
        participant_id: &str,
        player_id: PlayerId,
    ) -> Result<bool, PoolError> {
        let participant = self.get_mut(participant_id)?;
        let before = participant.picks.len();
        participant.picks.retain(|p| p.id != player_id);
        Ok(participant.picks.len() != before)
    }

    /// Replace every pick's stats snapshot, positionally.
    ///
    /// `results[i]` becomes the snapshot of pick `i`; a `None` clears it.
    /// Extra results are ignored and missing ones clear the snapshot.
    pub fn apply_stats(
        &mut self,
        participant_id: &str,
        results: Vec<Option<PlayerStats>>,
    ) -> Result<(), PoolError> {
        let participant = self.get_mut(participant_id)?;
        let mut results = results.into_iter();
        for pick in &mut participant.picks {
            pick.stats = results.next().flatten();
        }
        Ok(())
    }

    /// Swap in a whole new collection (import).
    pub fn replace_all(&mut self, participants: Vec<Participant>) {
        self.participants = participants;
    }

    fn get_mut(&mut self, participant_id: &str) -> Result<&mut Participant, PoolError> {
        self.participants
            .iter_mut()
            .find(|p| p.id == participant_id)
            .ok_or_else(|| PoolError::UnknownParticipant(participant_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(id: PlayerId, points: u32) -> PlayerStats {
        PlayerStats {
            points,
            ..PlayerStats::zeroed(id, format!("Player {id}"))
        }
    }

    #[test]
    fn add_participant_inserts_at_front() {
        let mut pool = PoolState::default();
        pool.add_participant("Alice").unwrap();
        pool.add_participant("Bob").unwrap();
        let names: Vec<&str> = pool.participants().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Bob", "Alice"]);
    }

    #[test]
    fn add_participant_rejects_case_insensitive_duplicate() {
        let mut pool = PoolState::default();
        pool.add_participant("Alice").unwrap();
        let err = pool.add_participant("  aLICE ").unwrap_err();
        assert_eq!(err, PoolError::DuplicateName("aLICE".into()));
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn add_participant_rejects_blank_name() {
        let mut pool = PoolState::default();
        assert_eq!(pool.add_participant("   "), Err(PoolError::EmptyName));
        assert!(pool.is_empty());
    }

    #[test]
    fn add_participant_trims_name() {
        let mut pool = PoolState::default();
        let id = pool.add_participant("  Carol  ").unwrap();
        assert_eq!(pool.get(&id).unwrap().name, "Carol");
    }

    #[test]
    fn remove_participant_by_id() {
        let mut pool = PoolState::default();
        let a = pool.add_participant("A").unwrap();
        pool.add_participant("B").unwrap();
        assert!(pool.remove_participant(&a));
        assert!(!pool.remove_participant(&a));
        assert_eq!(pool.len(), 1);
        assert!(pool.get(&a).is_none());
    }

    #[test]
    fn pick_list_never_exceeds_limit() {
        let mut pool = PoolState::default();
        let id = pool.add_participant("A").unwrap();
        for player in 1..=25u64 {
            let result = pool.add_pick(&id, Pick::new(player, format!("P{player}")));
            if player as usize <= MAX_PICKS {
                assert!(result.is_ok());
            } else {
                assert_eq!(result, Err(PoolError::PickLimit));
            }
        }
        assert_eq!(pool.get(&id).unwrap().picks.len(), MAX_PICKS);
    }

    #[test]
    fn duplicate_pick_is_rejected() {
        let mut pool = PoolState::default();
        let id = pool.add_participant("A").unwrap();
        pool.add_pick(&id, Pick::new(7, "Seven")).unwrap();
        let err = pool.add_pick(&id, Pick::new(7, "Seven")).unwrap_err();
        assert_eq!(err, PoolError::DuplicatePick("Seven".into()));
        assert_eq!(pool.get(&id).unwrap().picks.len(), 1);
    }

    #[test]
    fn duplicate_check_wins_over_limit_check() {
        let mut pool = PoolState::default();
        let id = pool.add_participant("A").unwrap();
        for player in 1..=10u64 {
            pool.add_pick(&id, Pick::new(player, "p")).unwrap();
        }
        assert!(matches!(
            pool.add_pick(&id, Pick::new(3, "p")),
            Err(PoolError::DuplicatePick(_))
        ));
    }

    #[test]
    fn same_player_allowed_for_different_participants() {
        let mut pool = PoolState::default();
        let a = pool.add_participant("A").unwrap();
        let b = pool.add_participant("B").unwrap();
        pool.add_pick(&a, Pick::new(1, "One")).unwrap();
        pool.add_pick(&b, Pick::new(1, "One")).unwrap();
    }

    #[test]
    fn add_pick_to_unknown_participant() {
        let mut pool = PoolState::default();
        assert_eq!(
            pool.add_pick("missing", Pick::new(1, "x")),
            Err(PoolError::UnknownParticipant("missing".into()))
        );
    }

    #[test]
    fn remove_pick_by_player_id() {
        let mut pool = PoolState::default();
        let id = pool.add_participant("A").unwrap();
        pool.add_pick(&id, Pick::new(1, "One")).unwrap();
        pool.add_pick(&id, Pick::new(2, "Two")).unwrap();
        assert_eq!(pool.remove_pick(&id, 1), Ok(true));
        assert_eq!(pool.remove_pick(&id, 1), Ok(false));
        let picks = &pool.get(&id).unwrap().picks;
        assert_eq!(picks.len(), 1);
        assert_eq!(picks[0].id, 2);
    }

    #[test]
    fn apply_stats_replaces_positionally() {
        let mut pool = PoolState::default();
        let id = pool.add_participant("A").unwrap();
        pool.add_pick(&id, Pick::new(1, "One")).unwrap();
        pool.add_pick(&id, Pick::new(2, "Two")).unwrap();
        pool.add_pick(&id, Pick::new(3, "Three")).unwrap();

        pool.apply_stats(&id, vec![Some(stats(1, 5)), Some(stats(2, 6)), Some(stats(3, 7))])
            .unwrap();
        pool.apply_stats(&id, vec![Some(stats(1, 9)), None]).unwrap();

        let picks = &pool.get(&id).unwrap().picks;
        assert_eq!(picks[0].stats.as_ref().unwrap().points, 9);
        assert!(picks[1].stats.is_none());
        assert!(picks[2].stats.is_none());
    }

    #[test]
    fn replace_all_swaps_collection() {
        let mut pool = PoolState::default();
        pool.add_participant("Old").unwrap();
        pool.replace_all(vec![Participant::new("New 1"), Participant::new("New 2")]);
        assert_eq!(pool.len(), 2);
        assert_eq!(pool.participants()[0].name, "New 1");
    }
}
