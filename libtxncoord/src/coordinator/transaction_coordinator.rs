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

use std::collections::BTreeSet;

use parking_lot::Mutex;

use crate::error::{CoordinatorError, InvalidStateError};
use crate::shard::ShardId;
use crate::timestamp::Timestamp;

use super::CompletionFuture;
use super::CoordinatorAction;
use super::CoordinatorEvent;
use super::CoordinatorState;
use super::Notifications;
use super::ParticipantList;
use super::StateMachine;
use super::TransactionId;

struct Inner<P, T>
where
    P: ShardId,
    T: Timestamp,
{
    participants: ParticipantList<P, T>,
    state_machine: StateMachine,
}

/// Coordinates the two-phase commit of a single multi-shard transaction.
///
/// Each `recv*` method records what a participant (or a timeout) reported and returns the
/// [`CoordinatorAction`] the caller must broadcast to all participants. The coordinator performs
/// no I/O. Sending the messages, and retrying them, is the caller's job.
///
/// All methods may be called concurrently from any number of threads. A single lock guards the
/// participant list and the state machine; waiters are signaled only after it is released.
///
/// Any error returned from a `recv*` method is a protocol violation. The coordinator is then
/// `Broken` and rejects every later event.
pub struct TransactionCoordinator<P, T>
where
    P: ShardId,
    T: Timestamp,
{
    transaction_id: TransactionId,
    inner: Mutex<Inner<P, T>>,
}

impl<P, T> TransactionCoordinator<P, T>
where
    P: ShardId,
    T: Timestamp,
{
    pub fn new(transaction_id: TransactionId) -> Self {
        TransactionCoordinator {
            transaction_id,
            inner: Mutex::new(Inner {
                participants: ParticipantList::new(),
                state_machine: StateMachine::new(),
            }),
        }
    }

    pub fn transaction_id(&self) -> &TransactionId {
        &self.transaction_id
    }

    pub fn state(&self) -> CoordinatorState {
        self.inner.lock().state_machine.state()
    }

    /// Records the full list of participants for the transaction.
    pub fn recv_coordinate_commit<I>(
        &self,
        participants: I,
    ) -> Result<CoordinatorAction, CoordinatorError>
    where
        I: IntoIterator<Item = P>,
    {
        let participants: BTreeSet<P> = participants.into_iter().collect();

        self.process("coordinateCommit", |list| {
            list.record_full_list(&participants)?;
            Ok(Some(CoordinatorEvent::RecvParticipantList))
        })
    }

    /// Records a participant's vote to commit, made at `prepare_timestamp`.
    ///
    /// Returns [`CoordinatorAction::SendCommit`] when this vote completes the set of commit votes.
    pub fn recv_vote_commit(
        &self,
        participant: &P,
        prepare_timestamp: T,
    ) -> Result<CoordinatorAction, CoordinatorError> {
        self.process("voteCommit", |list| {
            list.record_vote_commit(participant, prepare_timestamp)?;
            if list.all_participants_voted_commit() {
                Ok(Some(CoordinatorEvent::RecvFinalVoteCommit))
            } else {
                Ok(Some(CoordinatorEvent::RecvVoteCommit))
            }
        })
    }

    pub fn recv_vote_abort(&self, participant: &P) -> Result<CoordinatorAction, CoordinatorError> {
        self.process("voteAbort", |list| {
            list.record_vote_abort(participant)?;
            Ok(Some(CoordinatorEvent::RecvVoteAbort))
        })
    }

    /// Asks the coordinator to give up on the transaction, typically after a timeout.
    ///
    /// Aborts unless the commit decision has already been made.
    pub fn recv_try_abort(&self) -> Result<CoordinatorAction, CoordinatorError> {
        self.process("tryAbort", |_| Ok(Some(CoordinatorEvent::RecvTryAbort)))
    }

    /// Records a participant's acknowledgement of the commit decision.
    ///
    /// Acknowledgements never require anything further to be sent, so no action is returned.
    /// Completion is observed through [`wait_for_completion`](Self::wait_for_completion).
    pub fn recv_commit_ack(&self, participant: &P) -> Result<(), CoordinatorError> {
        self.process("commitAck", |list| {
            list.record_commit_ack(participant)?;
            if list.all_participants_acked_commit()? {
                Ok(Some(CoordinatorEvent::RecvFinalCommitAck))
            } else {
                Ok(None)
            }
        })
        .map(|_| ())
    }

    /// Returns a future which resolves once the transaction is `Committed` or `Aborted`.
    ///
    /// If the coordinator breaks first, the future resolves to `Broken`.
    pub fn wait_for_completion(&self) -> Result<CompletionFuture, CoordinatorError> {
        let targets = [CoordinatorState::Committed, CoordinatorState::Aborted]
            .into_iter()
            .collect();

        self.inner.lock().state_machine.wait_for_transition_to(targets)
    }

    /// The timestamp the transaction commits at, once the decision to commit has been made.
    pub fn commit_timestamp(&self) -> Option<T> {
        let inner = self.inner.lock();
        match inner.state_machine.state() {
            CoordinatorState::WaitingForCommitAcks | CoordinatorState::Committed => {
                inner.participants.highest_prepare_timestamp().ok()
            }
            _ => None,
        }
    }

    /// Participants which have not yet acknowledged the commit decision.
    pub fn non_acked_commit_participants(&self) -> BTreeSet<P> {
        self.inner.lock().participants.non_acked_commit_participants()
    }

    /// Participants which have not voted to abort.
    pub fn non_voted_abort_participants(&self) -> BTreeSet<P> {
        self.inner.lock().participants.non_voted_abort_participants()
    }

    // Applies `record` to the participant list and feeds the event it returns, if any, to the
    // state machine. Waiters are signaled after the lock is released.
    fn process<F>(&self, name: &str, record: F) -> Result<CoordinatorAction, CoordinatorError>
    where
        F: FnOnce(&mut ParticipantList<P, T>) -> Result<Option<CoordinatorEvent>, CoordinatorError>,
    {
        let mut notifications = Notifications::new();

        let result = {
            let mut guard = self.inner.lock();
            let inner = &mut *guard;

            if inner.state_machine.state() == CoordinatorState::Broken {
                Err(InvalidStateError::with_message(format!(
                    "coordinator for transaction {} is broken; rejecting {}",
                    self.transaction_id, name
                ))
                .into())
            } else {
                let before = inner.state_machine.state();
                let result = match record(&mut inner.participants) {
                    Ok(Some(event)) => inner.state_machine.on_event(event, &mut notifications),
                    Ok(None) => Ok(CoordinatorAction::None),
                    Err(err) => {
                        inner.state_machine.mark_broken(&mut notifications);
                        Err(err)
                    }
                };
                self.log_outcome(name, before, inner.state_machine.state(), &result);
                result
            }
        };

        notifications.deliver();
        result
    }

    fn log_outcome(
        &self,
        name: &str,
        before: CoordinatorState,
        state: CoordinatorState,
        result: &Result<CoordinatorAction, CoordinatorError>,
    ) {
        match result {
            Ok(action) => {
                debug!(
                    "transaction {}: processed {}, state {:?}, action {:?}",
                    self.transaction_id, name, state, action
                );
                if state != before && state.is_terminal() {
                    info!("transaction {} decided: {:?}", self.transaction_id, state);
                }
            }
            Err(err) => warn!(
                "transaction {}: {} failed, coordinator is now {:?}: {}",
                self.transaction_id, name, state, err
            ),
        }
    }
}
