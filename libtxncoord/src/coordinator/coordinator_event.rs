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

/// The protocol events fed to the [`StateMachine`](super::StateMachine).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CoordinatorEvent {
    /// The full participant list was delivered.
    RecvParticipantList,
    /// A participant voted to commit, but not every participant has done so yet.
    RecvVoteCommit,
    /// A commit vote which completed the set of commit votes.
    RecvFinalVoteCommit,
    /// A participant voted to abort.
    RecvVoteAbort,
    /// An external timeout or cancellation asked the coordinator to give up.
    RecvTryAbort,
    /// A commit acknowledgement which completed the set of acknowledgements.
    RecvFinalCommitAck,
}

impl CoordinatorEvent {
    /// Every event, in declaration order.
    pub const ALL: [CoordinatorEvent; 6] = [
        CoordinatorEvent::RecvParticipantList,
        CoordinatorEvent::RecvVoteCommit,
        CoordinatorEvent::RecvFinalVoteCommit,
        CoordinatorEvent::RecvVoteAbort,
        CoordinatorEvent::RecvTryAbort,
        CoordinatorEvent::RecvFinalCommitAck,
    ];
}
