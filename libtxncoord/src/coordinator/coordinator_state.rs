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

#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum CoordinatorState {
    #[default]
    WaitingForParticipantList,
    WaitingForVotes,
    Aborted,
    WaitingForCommitAcks,
    Committed,
    /// Reached only by feeding an event that is illegal in the current state. No event is legal
    /// once here.
    Broken,
}

impl CoordinatorState {
    /// Returns true for `Committed` and `Aborted`, the states in which the protocol has reached a
    /// decision.
    pub fn is_terminal(&self) -> bool {
        matches!(self, CoordinatorState::Committed | CoordinatorState::Aborted)
    }
}
