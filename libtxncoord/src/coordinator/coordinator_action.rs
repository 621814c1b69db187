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

/// What the caller must broadcast to every participant after an event has been processed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CoordinatorAction {
    /// Nothing to send.
    None,
    /// Send "abortTransaction" to all participants.
    SendAbort,
    /// Send "commitTransaction", carrying the commit timestamp, to all participants.
    SendCommit,
}
