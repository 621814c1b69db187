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

use futures::channel::oneshot;

use crate::error::{CoordinatorError, InvalidArgumentError, InvalidStateError};

use super::CompletionFuture;
use super::CoordinatorAction;
use super::CoordinatorEvent;
use super::CoordinatorState;

/// The result of looking up a (state, event) pair in the transition table.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Transition {
    /// The event may not occur in this state.
    Illegal,
    /// The event is accepted without a state change.
    Stay(CoordinatorAction),
    /// The event is accepted and moves the machine to a new state.
    Move(CoordinatorAction, CoordinatorState),
}

/// The coordinator's transition table.
pub fn transition(state: CoordinatorState, event: CoordinatorEvent) -> Transition {
    use CoordinatorEvent::*;
    use CoordinatorState::*;

    match (state, event) {
        (WaitingForParticipantList, RecvParticipantList) => {
            Transition::Move(CoordinatorAction::None, WaitingForVotes)
        }
        (WaitingForParticipantList, RecvVoteCommit) => Transition::Stay(CoordinatorAction::None),
        (WaitingForParticipantList, RecvFinalVoteCommit) => Transition::Illegal,
        (WaitingForParticipantList, RecvVoteAbort) => {
            Transition::Move(CoordinatorAction::SendAbort, Aborted)
        }
        (WaitingForParticipantList, RecvTryAbort) => {
            Transition::Move(CoordinatorAction::SendAbort, Aborted)
        }
        (WaitingForParticipantList, RecvFinalCommitAck) => Transition::Illegal,

        (WaitingForVotes, RecvParticipantList) => Transition::Stay(CoordinatorAction::None),
        (WaitingForVotes, RecvVoteCommit) => Transition::Stay(CoordinatorAction::None),
        (WaitingForVotes, RecvFinalVoteCommit) => {
            Transition::Move(CoordinatorAction::SendCommit, WaitingForCommitAcks)
        }
        (WaitingForVotes, RecvVoteAbort) => Transition::Move(CoordinatorAction::SendAbort, Aborted),
        (WaitingForVotes, RecvTryAbort) => Transition::Move(CoordinatorAction::SendAbort, Aborted),
        (WaitingForVotes, RecvFinalCommitAck) => Transition::Illegal,

        (Aborted, RecvParticipantList) => Transition::Stay(CoordinatorAction::None),
        (Aborted, RecvVoteCommit) => Transition::Stay(CoordinatorAction::None),
        (Aborted, RecvFinalVoteCommit) => Transition::Illegal,
        (Aborted, RecvVoteAbort) => Transition::Stay(CoordinatorAction::None),
        (Aborted, RecvTryAbort) => Transition::Stay(CoordinatorAction::None),
        (Aborted, RecvFinalCommitAck) => Transition::Illegal,

        (WaitingForCommitAcks, RecvParticipantList) => Transition::Stay(CoordinatorAction::None),
        (WaitingForCommitAcks, RecvVoteCommit) => Transition::Stay(CoordinatorAction::None),
        // A repeated final vote means the participant never saw the decision; send it again.
        (WaitingForCommitAcks, RecvFinalVoteCommit) => {
            Transition::Stay(CoordinatorAction::SendCommit)
        }
        (WaitingForCommitAcks, RecvVoteAbort) => Transition::Illegal,
        (WaitingForCommitAcks, RecvTryAbort) => Transition::Stay(CoordinatorAction::None),
        (WaitingForCommitAcks, RecvFinalCommitAck) => {
            Transition::Move(CoordinatorAction::None, Committed)
        }

        (Committed, RecvParticipantList) => Transition::Stay(CoordinatorAction::None),
        (Committed, RecvVoteCommit) => Transition::Illegal,
        (Committed, RecvFinalVoteCommit) => Transition::Stay(CoordinatorAction::None),
        (Committed, RecvVoteAbort) => Transition::Illegal,
        (Committed, RecvTryAbort) => Transition::Stay(CoordinatorAction::None),
        (Committed, RecvFinalCommitAck) => Transition::Stay(CoordinatorAction::None),

        (Broken, _) => Transition::Illegal,
    }
}

struct Waiter {
    sender: oneshot::Sender<CoordinatorState>,
    targets: BTreeSet<CoordinatorState>,
}

/// Waiter deliveries collected while the coordinator's lock is held.
///
/// Nothing is sent until [`Notifications::deliver`] is called, which must happen after the lock
/// has been released: a waiter's continuation may call back into the coordinator.
#[derive(Default)]
pub struct Notifications {
    deliveries: Vec<(oneshot::Sender<CoordinatorState>, CoordinatorState)>,
}

impl Notifications {
    pub fn new() -> Self {
        Notifications::default()
    }

    pub fn is_empty(&self) -> bool {
        self.deliveries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.deliveries.len()
    }

    pub fn deliver(self) {
        for (sender, state) in self.deliveries {
            // The receiving half is gone if the waiter stopped caring; nothing to do.
            if sender.send(state).is_err() {
                trace!("waiter for {:?} was dropped before delivery", state);
            }
        }
    }
}

/// A table-driven state machine for one transaction, plus the waiters registered against it.
///
/// The machine does no locking; its owner serializes access and delivers the returned
/// [`Notifications`] once its lock is released.
pub struct StateMachine {
    state: CoordinatorState,
    // The first of Committed or Aborted reached; kept after the machine breaks.
    decision: Option<CoordinatorState>,
    waiters: BTreeMap<u64, Waiter>,
    next_waiter_id: u64,
}

impl StateMachine {
    pub fn new() -> Self {
        StateMachine {
            state: CoordinatorState::WaitingForParticipantList,
            decision: None,
            waiters: BTreeMap::new(),
            next_waiter_id: 0,
        }
    }

    pub fn state(&self) -> CoordinatorState {
        self.state
    }

    /// The decision reached before any breakage, if there was one.
    pub fn decision(&self) -> Option<CoordinatorState> {
        self.decision
    }

    pub fn pending_waiters(&self) -> usize {
        self.waiters.len()
    }

    /// Applies an event to the current state.
    ///
    /// Waiters whose target set contains the new state are moved into `notifications`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` if the event is illegal in the current state. The machine is then
    /// `Broken` and every later event fails the same way.
    pub fn on_event(
        &mut self,
        event: CoordinatorEvent,
        notifications: &mut Notifications,
    ) -> Result<CoordinatorAction, CoordinatorError> {
        match transition(self.state, event) {
            Transition::Illegal => {
                let prior = self.state;
                self.mark_broken(notifications);
                Err(InvalidStateError::with_message(format!(
                    "event {:?} is illegal in state {:?}",
                    event, prior
                ))
                .into())
            }
            Transition::Stay(action) => Ok(action),
            Transition::Move(action, next) => {
                debug!("{:?} moves {:?} to {:?}", event, self.state, next);
                self.transition_to(next, notifications);
                Ok(action)
            }
        }
    }

    /// Moves the machine to `Broken`.
    ///
    /// No waiter asks for `Broken`, so every pending waiter is signaled with it; otherwise they
    /// would never resolve. Waiters only remain pending here if no decision was reached.
    pub fn mark_broken(&mut self, notifications: &mut Notifications) {
        if self.state == CoordinatorState::Broken {
            return;
        }

        warn!("state machine broken while in state {:?}", self.state);
        self.state = CoordinatorState::Broken;
        notifications.deliveries.extend(
            std::mem::take(&mut self.waiters)
                .into_values()
                .map(|waiter| (waiter.sender, CoordinatorState::Broken)),
        );
    }

    /// Registers a waiter for the first of `targets` the machine reaches.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` unless `targets` contains both `Committed` and `Aborted`; a
    /// waiter missing either could wait forever.
    pub fn wait_for_transition_to(
        &mut self,
        targets: BTreeSet<CoordinatorState>,
    ) -> Result<CompletionFuture, CoordinatorError> {
        if !targets.contains(&CoordinatorState::Committed)
            || !targets.contains(&CoordinatorState::Aborted)
        {
            return Err(InvalidArgumentError::new(
                "targets",
                format!(
                    "target states {:?} must include both Committed and Aborted",
                    targets
                ),
            )
            .into());
        }

        if targets.contains(&self.state) {
            return Ok(CompletionFuture::ready(self.state));
        }

        // Waiters released by the decision saw it, so later ones must see it too.
        if self.state == CoordinatorState::Broken {
            return Ok(CompletionFuture::ready(
                self.decision.unwrap_or(CoordinatorState::Broken),
            ));
        }

        let (sender, receiver) = oneshot::channel();
        let id = self.next_waiter_id;
        self.next_waiter_id += 1;
        self.waiters.insert(id, Waiter { sender, targets });

        Ok(CompletionFuture::pending(receiver))
    }

    fn transition_to(&mut self, next: CoordinatorState, notifications: &mut Notifications) {
        self.state = next;
        if next.is_terminal() && self.decision.is_none() {
            self.decision = Some(next);
        }

        let (ready, pending): (BTreeMap<_, _>, BTreeMap<_, _>) = std::mem::take(&mut self.waiters)
            .into_iter()
            .partition(|(_, waiter)| waiter.targets.contains(&next));
        self.waiters = pending;

        notifications.deliveries.extend(
            ready
                .into_values()
                .map(|waiter| (waiter.sender, next)),
        );
    }
}

impl Default for StateMachine {
    fn default() -> Self {
        StateMachine::new()
    }
}

impl Drop for StateMachine {
    fn drop(&mut self) {
        // Every waiter includes both decided states, so none should remain once the protocol has
        // finished. Remaining waiters see their futures fail when the senders drop here.
        if !self.waiters.is_empty() {
            warn!(
                "state machine dropped in state {:?} with {} pending waiter(s)",
                self.state,
                self.waiters.len()
            );
        }
    }
}
