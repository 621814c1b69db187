// Copyright 2026 The txncoord Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{CoordinatorError, InternalError, InvalidArgumentError, InvalidStateError};
use crate::shard::ShardId;
use crate::timestamp::Timestamp;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Vote {
    Unknown,
    Commit,
    Abort,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Ack {
    None,
    Commit,
}

/// What the coordinator has heard from a single participant.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Participant<T> {
    pub vote: Vote,
    pub ack: Ack,
    /// Set with the participant's first commit vote and never changed afterwards.
    pub prepare_timestamp: Option<T>,
}

impl<T> Participant<T> {
    pub fn new() -> Participant<T> {
        Participant {
            vote: Vote::Unknown,
            ack: Ack::None,
            prepare_timestamp: None,
        }
    }
}

impl<T> Default for Participant<T> {
    fn default() -> Self {
        Participant::new()
    }
}

/// Tracks the votes and acknowledgements of every participant in one transaction.
///
/// Until the full participant list arrives, participants are learned from whichever of them vote
/// first. Once the full list has been recorded the set of participants is frozen, and any event
/// naming a participant outside of it is a protocol violation.
///
/// The list has no locking of its own; the owning coordinator serializes access to it.
#[derive(Clone, Debug)]
pub struct ParticipantList<P, T>
where
    P: ShardId,
    T: Timestamp,
{
    participants: BTreeMap<P, Participant<T>>,
    full_list_received: bool,
}

impl<P, T> ParticipantList<P, T>
where
    P: ShardId,
    T: Timestamp,
{
    pub fn new() -> Self {
        ParticipantList {
            participants: BTreeMap::new(),
            full_list_received: false,
        }
    }

    pub fn full_list_received(&self) -> bool {
        self.full_list_received
    }

    pub fn participant(&self, id: &P) -> Option<&Participant<T>> {
        self.participants.get(id)
    }

    pub fn participants(&self) -> impl Iterator<Item = (&P, &Participant<T>)> {
        self.participants.iter()
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    /// Records the authoritative set of participants.
    ///
    /// The given set is validated against the known participants on every call, not only the
    /// first: it must name exactly the participants already known.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the set is empty, and `InvalidState` if it does not match the
    /// participants already known.
    pub fn record_full_list(&mut self, participants: &BTreeSet<P>) -> Result<(), CoordinatorError> {
        if participants.is_empty() {
            return Err(InvalidArgumentError::new(
                "participants",
                "the participant list must not be empty",
            )
            .into());
        }

        if !self.full_list_received {
            for id in participants {
                self.participants.entry(id.clone()).or_default();
            }
            self.full_list_received = true;
        }

        if let Some(id) = participants
            .iter()
            .find(|id| !self.participants.contains_key(*id))
        {
            return Err(InvalidStateError::with_message(format!(
                "participant {:?} is not part of the participant list already received",
                id
            ))
            .into());
        }

        if let Some(id) = self
            .participants
            .keys()
            .find(|id| !participants.contains(*id))
        {
            return Err(InvalidStateError::with_message(format!(
                "known participant {:?} is missing from the received participant list",
                id
            ))
            .into());
        }

        Ok(())
    }

    /// Records a commit vote along with the participant's prepare timestamp.
    ///
    /// Repeating a commit vote is accepted as long as it reports the same prepare timestamp.
    pub fn record_vote_commit(
        &mut self,
        id: &P,
        prepare_timestamp: T,
    ) -> Result<(), CoordinatorError> {
        let participant = self.voting_participant_mut(id)?;

        match participant.vote {
            Vote::Unknown => {
                participant.vote = Vote::Commit;
                participant.prepare_timestamp = Some(prepare_timestamp);
                Ok(())
            }
            Vote::Commit if participant.prepare_timestamp == Some(prepare_timestamp) => Ok(()),
            Vote::Commit => Err(InvalidStateError::with_message(format!(
                "participant {:?} voted commit with prepare timestamp {:?}, but previously \
                reported {:?}",
                id, prepare_timestamp, participant.prepare_timestamp
            ))
            .into()),
            Vote::Abort => Err(InvalidStateError::with_message(format!(
                "participant {:?} voted commit after voting abort",
                id
            ))
            .into()),
        }
    }

    pub fn record_vote_abort(&mut self, id: &P) -> Result<(), CoordinatorError> {
        let participant = self.voting_participant_mut(id)?;

        match participant.vote {
            Vote::Unknown | Vote::Abort => {
                participant.vote = Vote::Abort;
                Ok(())
            }
            Vote::Commit => Err(InvalidStateError::with_message(format!(
                "participant {:?} voted abort after voting commit",
                id
            ))
            .into()),
        }
    }

    pub fn record_commit_ack(&mut self, id: &P) -> Result<(), CoordinatorError> {
        let participant = self
            .participants
            .get_mut(id)
            .ok_or_else(|| unknown_participant(id))?;

        participant.ack = Ack::Commit;
        Ok(())
    }

    /// Returns true only once the full list has been received and every participant on it has
    /// voted to commit.
    pub fn all_participants_voted_commit(&self) -> bool {
        self.full_list_received
            && self
                .participants
                .values()
                .all(|participant| participant.vote == Vote::Commit)
    }

    /// # Errors
    ///
    /// Returns `InvalidState` if the full participant list has not been received.
    pub fn all_participants_acked_commit(&self) -> Result<bool, CoordinatorError> {
        self.require_full_list("commit acknowledgements")?;

        Ok(self
            .participants
            .values()
            .all(|participant| participant.ack == Ack::Commit))
    }

    /// Returns the highest prepare timestamp reported by any participant. This is the timestamp
    /// at which the transaction commits.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` if the full participant list has not been received, and `Internal`
    /// if any participant has not reported a prepare timestamp.
    pub fn highest_prepare_timestamp(&self) -> Result<T, CoordinatorError> {
        self.require_full_list("the highest prepare timestamp")?;

        let mut highest: Option<T> = None;
        for (id, participant) in &self.participants {
            let timestamp = participant.prepare_timestamp.ok_or_else(|| {
                InternalError::with_message(format!(
                    "participant {:?} has not reported a prepare timestamp",
                    id
                ))
            })?;
            highest = highest.max(Some(timestamp));
        }

        highest.ok_or_else(|| {
            CoordinatorError::from(InternalError::with_message(
                "the participant list is empty",
            ))
        })
    }

    pub fn non_acked_commit_participants(&self) -> BTreeSet<P> {
        self.participants
            .iter()
            .filter(|(_, participant)| participant.ack != Ack::Commit)
            .map(|(id, _)| id.clone())
            .collect()
    }

    pub fn non_voted_abort_participants(&self) -> BTreeSet<P> {
        self.participants
            .iter()
            .filter(|(_, participant)| participant.vote != Vote::Abort)
            .map(|(id, _)| id.clone())
            .collect()
    }

    // Votes may arrive before the full list, in which case the voter becomes known through its
    // vote. Once the list is frozen, only listed participants may vote.
    fn voting_participant_mut(&mut self, id: &P) -> Result<&mut Participant<T>, CoordinatorError> {
        if !self.full_list_received {
            return Ok(self.participants.entry(id.clone()).or_default());
        }

        self.participants
            .get_mut(id)
            .ok_or_else(|| unknown_participant(id))
    }

    fn require_full_list(&self, what: &str) -> Result<(), CoordinatorError> {
        if self.full_list_received {
            Ok(())
        } else {
            Err(InvalidStateError::with_message(format!(
                "cannot evaluate {} before the full participant list is received",
                what
            ))
            .into())
        }
    }
}

impl<P, T> Default for ParticipantList<P, T>
where
    P: ShardId,
    T: Timestamp,
{
    fn default() -> Self {
        ParticipantList::new()
    }
}

fn unknown_participant<P: ShardId>(id: &P) -> CoordinatorError {
    InvalidStateError::with_message(format!("{:?} is not a known participant", id)).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shards(ids: &[&'static str]) -> BTreeSet<&'static str> {
        ids.iter().copied().collect()
    }

    /// Test that the full list is accepted once and that every later delivery is validated
    /// against it.
    #[test]
    fn test_record_full_list() {
        let mut list = ParticipantList::<&str, u64>::new();
        assert!(!list.full_list_received());

        list.record_full_list(&shards(&["s1", "s2"])).unwrap();
        assert!(list.full_list_received());
        assert_eq!(list.len(), 2);
        assert_eq!(list.participant(&"s1"), Some(&Participant::new()));
        assert_eq!(
            list.participants().map(|(id, _)| *id).collect::<Vec<_>>(),
            vec!["s1", "s2"]
        );

        // The same list may be delivered again.
        list.record_full_list(&shards(&["s2", "s1"])).unwrap();

        assert!(matches!(
            list.record_full_list(&shards(&["s1", "s2", "s3"])),
            Err(CoordinatorError::InvalidState(_))
        ));
        assert!(matches!(
            list.record_full_list(&shards(&["s1"])),
            Err(CoordinatorError::InvalidState(_))
        ));
        assert_eq!(list.len(), 2);
    }

    /// Test that an empty participant list is rejected.
    #[test]
    fn test_record_empty_full_list() {
        let mut list = ParticipantList::<&str, u64>::new();

        assert!(matches!(
            list.record_full_list(&BTreeSet::new()),
            Err(CoordinatorError::InvalidArgument(_))
        ));
        assert!(!list.full_list_received());
    }

    /// Test that participants which voted before the full list arrived must appear in it.
    #[test]
    fn test_votes_before_full_list() {
        let mut list = ParticipantList::<&str, u64>::new();

        list.record_vote_commit(&"s1", 10).unwrap();
        list.record_vote_abort(&"s2").unwrap();
        assert_eq!(list.len(), 2);
        assert!(!list.full_list_received());

        list.record_full_list(&shards(&["s1", "s2", "s3"])).unwrap();
        assert_eq!(list.len(), 3);

        let mut list = ParticipantList::<&str, u64>::new();
        list.record_vote_commit(&"s4", 10).unwrap();
        assert!(matches!(
            list.record_full_list(&shards(&["s1", "s2"])),
            Err(CoordinatorError::InvalidState(_))
        ));
    }

    /// Test that a participant may not vote both ways and may not change its prepare timestamp.
    #[test]
    fn test_vote_monotonicity() {
        let mut list = ParticipantList::<&str, u64>::new();
        list.record_full_list(&shards(&["s1", "s2"])).unwrap();

        list.record_vote_commit(&"s1", 5).unwrap();
        list.record_vote_commit(&"s1", 5).unwrap();
        assert!(list.record_vote_commit(&"s1", 6).is_err());
        assert!(list.record_vote_abort(&"s1").is_err());
        assert_eq!(list.participant(&"s1").unwrap().vote, Vote::Commit);
        assert_eq!(list.participant(&"s1").unwrap().prepare_timestamp, Some(5));

        list.record_vote_abort(&"s2").unwrap();
        list.record_vote_abort(&"s2").unwrap();
        assert!(list.record_vote_commit(&"s2", 5).is_err());
        assert_eq!(list.participant(&"s2").unwrap().vote, Vote::Abort);
        assert_eq!(list.participant(&"s2").unwrap().prepare_timestamp, None);
    }

    /// Test that once the list is frozen, unknown participants can neither vote nor ack.
    #[test]
    fn test_unknown_participant() {
        let mut list = ParticipantList::<&str, u64>::new();
        assert!(list.record_commit_ack(&"s1").is_err());

        list.record_full_list(&shards(&["s1"])).unwrap();

        assert!(list.record_vote_commit(&"s9", 1).is_err());
        assert!(list.record_vote_abort(&"s9").is_err());
        assert!(list.record_commit_ack(&"s9").is_err());
        assert_eq!(list.len(), 1);
    }

    /// Test that all_participants_voted_commit is false until the full list is received, no
    /// matter how the known participants voted.
    #[test]
    fn test_all_participants_voted_commit() {
        let mut list = ParticipantList::<&str, u64>::new();

        list.record_vote_commit(&"s1", 1).unwrap();
        list.record_vote_commit(&"s2", 2).unwrap();
        assert!(!list.all_participants_voted_commit());

        list.record_full_list(&shards(&["s1", "s2", "s3"])).unwrap();
        assert!(!list.all_participants_voted_commit());

        list.record_vote_commit(&"s3", 3).unwrap();
        assert!(list.all_participants_voted_commit());
    }

    #[test]
    fn test_all_participants_acked_commit() {
        let mut list = ParticipantList::<&str, u64>::new();
        list.record_vote_commit(&"s1", 1).unwrap();
        assert!(list.all_participants_acked_commit().is_err());

        list.record_full_list(&shards(&["s1", "s2"])).unwrap();
        assert!(!list.all_participants_acked_commit().unwrap());

        list.record_commit_ack(&"s1").unwrap();
        list.record_commit_ack(&"s1").unwrap();
        assert!(!list.all_participants_acked_commit().unwrap());
        assert_eq!(list.non_acked_commit_participants(), shards(&["s2"]));

        list.record_commit_ack(&"s2").unwrap();
        assert!(list.all_participants_acked_commit().unwrap());
        assert!(list.non_acked_commit_participants().is_empty());
    }

    #[test]
    fn test_highest_prepare_timestamp() {
        let mut list = ParticipantList::<&str, u64>::new();
        list.record_vote_commit(&"s1", 20).unwrap();
        assert!(matches!(
            list.highest_prepare_timestamp(),
            Err(CoordinatorError::InvalidState(_))
        ));

        list.record_full_list(&shards(&["s1", "s2", "s3"])).unwrap();
        list.record_vote_commit(&"s2", 35).unwrap();
        assert!(matches!(
            list.highest_prepare_timestamp(),
            Err(CoordinatorError::Internal(_))
        ));

        list.record_vote_commit(&"s3", 7).unwrap();
        assert_eq!(list.highest_prepare_timestamp().unwrap(), 35);
    }

    #[test]
    fn test_non_voted_abort_participants() {
        let mut list = ParticipantList::<&str, u64>::new();
        list.record_full_list(&shards(&["s1", "s2", "s3"])).unwrap();
        list.record_vote_abort(&"s2").unwrap();
        list.record_vote_commit(&"s3", 1).unwrap();

        assert_eq!(list.non_voted_abort_participants(), shards(&["s1", "s3"]));
    }
}
