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

//! ShardId trait

use std::fmt::Debug;

/// Identifies a shard taking part in a multi-shard transaction.
///
/// Identifiers are ordered so that the sets the coordinator reports (for example, the shards
/// still owing an acknowledgement) come back in a stable order.
pub trait ShardId: Clone + Debug + Ord + Send {}

impl ShardId for String {}

impl ShardId for &'static str {}

impl ShardId for u64 {}
