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

use std::fmt::{Display, Formatter, Result as FormatResult};

/// Identifies the transaction a coordinator is driving: a logical session and the number of the
/// transaction within that session.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct TransactionId {
    session_id: String,
    txn_number: u64,
}

impl TransactionId {
    pub fn new<S: Into<String>>(session_id: S, txn_number: u64) -> Self {
        TransactionId {
            session_id: session_id.into(),
            txn_number,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn txn_number(&self) -> u64 {
        self.txn_number
    }
}

impl Display for TransactionId {
    fn fmt(&self, f: &mut Formatter) -> FormatResult {
        write!(f, "{}:{}", self.session_id, self.txn_number)
    }
}
