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

//! The commit coordinator for multi-shard transactions.
//!
//! A [`TransactionCoordinator`] drives two-phase commit for one transaction. It is made of two
//! parts, both owned by the coordinator and guarded by its lock:
//!
//! - a [`ParticipantList`], which records each participant's vote and acknowledgement and
//!   answers aggregate questions such as whether every participant voted to commit
//! - a [`StateMachine`], which maps (state, event) to the action the caller must perform and the
//!   next state, and signals waiters when the transaction completes
//!
//! ```
//! use futures::executor::block_on;
//! use txncoord::coordinator::{
//!     CoordinatorAction, CoordinatorState, TransactionCoordinator, TransactionId,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let coordinator = TransactionCoordinator::<&str, u64>::new(TransactionId::new("lsid", 1));
//! let completion = coordinator.wait_for_completion()?;
//!
//! coordinator.recv_coordinate_commit(vec!["s1", "s2"])?;
//! assert_eq!(coordinator.recv_vote_commit(&"s1", 10)?, CoordinatorAction::None);
//! assert_eq!(coordinator.recv_vote_commit(&"s2", 12)?, CoordinatorAction::SendCommit);
//! assert_eq!(coordinator.commit_timestamp(), Some(12));
//!
//! coordinator.recv_commit_ack(&"s1")?;
//! coordinator.recv_commit_ack(&"s2")?;
//! assert_eq!(block_on(completion)?, CoordinatorState::Committed);
//! # Ok(())
//! # }
//! ```

mod completion;
mod coordinator_action;
mod coordinator_event;
mod coordinator_state;
mod participant_list;
mod state_machine;
mod transaction_coordinator;
mod transaction_id;

pub use completion::CompletionFuture;
pub use coordinator_action::CoordinatorAction;
pub use coordinator_event::CoordinatorEvent;
pub use coordinator_state::CoordinatorState;
pub use participant_list::{Ack, Participant, ParticipantList, Vote};
pub use state_machine::{transition, Notifications, StateMachine, Transition};
pub use transaction_coordinator::TransactionCoordinator;
pub use transaction_id::TransactionId;
