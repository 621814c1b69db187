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

//! Contains CoordinatorError

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FormatResult};

use super::InternalError;
use super::InvalidArgumentError;
use super::InvalidStateError;

/// An error which can occur while a `TransactionCoordinator` is processing events.
///
/// Any error returned from a `recv*` call is fatal to the coordinator instance which returned it.
#[derive(Debug)]
pub enum CoordinatorError {
    /// The caller supplied an argument the coordinator can never accept.
    InvalidArgument(InvalidArgumentError),

    /// The event is not legal in the coordinator's current state, or it contradicts what the
    /// coordinator already knows about the participants.
    InvalidState(InvalidStateError),

    /// The coordinator could not process the event due to an unexpected internal error.
    Internal(InternalError),
}

impl Error for CoordinatorError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            CoordinatorError::InvalidArgument(e) => Some(e),
            CoordinatorError::InvalidState(e) => Some(e),
            CoordinatorError::Internal(e) => Some(e),
        }
    }
}

impl Display for CoordinatorError {
    fn fmt(&self, f: &mut Formatter) -> FormatResult {
        match self {
            CoordinatorError::InvalidArgument(e) => write!(f, "{}", e),
            CoordinatorError::InvalidState(e) => write!(f, "{}", e),
            CoordinatorError::Internal(e) => write!(f, "{}", e),
        }
    }
}

impl From<InvalidArgumentError> for CoordinatorError {
    fn from(err: InvalidArgumentError) -> Self {
        CoordinatorError::InvalidArgument(err)
    }
}

impl From<InvalidStateError> for CoordinatorError {
    fn from(err: InvalidStateError) -> Self {
        CoordinatorError::InvalidState(err)
    }
}

impl From<InternalError> for CoordinatorError {
    fn from(err: InternalError) -> Self {
        CoordinatorError::Internal(err)
    }
}
