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

use std::fmt::{Debug, Display, Formatter, Result as FormatResult};

/// The timestamp a participant reports alongside a commit vote.
///
/// The transaction commits at the highest prepare timestamp reported by any participant, so the
/// only requirement is a total order.
pub trait Timestamp: Copy + Ord + Debug + Send {}

impl Timestamp for u64 {}

/// A cluster logical time.
///
/// Ordered by `secs`, then by `inc` for events within the same second.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct LogicalTimestamp {
    secs: u32,
    inc: u32,
}

impl LogicalTimestamp {
    pub fn new(secs: u32, inc: u32) -> Self {
        LogicalTimestamp { secs, inc }
    }

    pub fn secs(&self) -> u32 {
        self.secs
    }

    pub fn inc(&self) -> u32 {
        self.inc
    }
}

impl Display for LogicalTimestamp {
    fn fmt(&self, f: &mut Formatter) -> FormatResult {
        write!(f, "Timestamp({}, {})", self.secs, self.inc)
    }
}

impl Timestamp for LogicalTimestamp {}
