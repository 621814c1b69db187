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

//! A coordinator for the two-phase commit of multi-shard transactions.
//!
//! The coordinator is a pure decision engine. Callers feed it the replies they receive from
//! participant shards and it answers with the [`coordinator::CoordinatorAction`] to broadcast
//! next. It never performs I/O itself.

#[macro_use]
extern crate log;

#[cfg(feature = "coordinator")]
pub mod coordinator;
pub mod error;
mod shard;
mod timestamp;

pub use shard::ShardId;
pub use timestamp::{LogicalTimestamp, Timestamp};
