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

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::channel::oneshot;

use crate::error::{CoordinatorError, InternalError};

use super::CoordinatorState;

/// Resolves to the state a waiter asked to be told about.
///
/// Returned by [`StateMachine::wait_for_transition_to`](super::StateMachine::wait_for_transition_to)
/// and [`TransactionCoordinator::wait_for_completion`](super::TransactionCoordinator::wait_for_completion).
/// The future resolves to an `Internal` error if the coordinator is dropped before it signals
/// the waiter.
#[derive(Debug)]
pub struct CompletionFuture {
    inner: CompletionInner,
}

#[derive(Debug)]
enum CompletionInner {
    Ready(Option<CoordinatorState>),
    Pending(oneshot::Receiver<CoordinatorState>),
}

impl CompletionFuture {
    pub(super) fn ready(state: CoordinatorState) -> Self {
        CompletionFuture {
            inner: CompletionInner::Ready(Some(state)),
        }
    }

    pub(super) fn pending(receiver: oneshot::Receiver<CoordinatorState>) -> Self {
        CompletionFuture {
            inner: CompletionInner::Pending(receiver),
        }
    }
}

impl Future for CompletionFuture {
    type Output = Result<CoordinatorState, CoordinatorError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match &mut self.inner {
            CompletionInner::Ready(state) => Poll::Ready(state.take().ok_or_else(|| {
                CoordinatorError::from(InternalError::with_message(
                    "completion future polled after it resolved",
                ))
            })),
            CompletionInner::Pending(receiver) => Pin::new(receiver).poll(cx).map(|result| {
                result.map_err(|_| {
                    CoordinatorError::from(InternalError::with_message(
                        "coordinator was dropped before signaling its waiter",
                    ))
                })
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;

    use super::*;

    #[test]
    fn test_ready() {
        let future = CompletionFuture::ready(CoordinatorState::Aborted);
        assert_eq!(block_on(future).unwrap(), CoordinatorState::Aborted);
    }

    #[test]
    fn test_pending() {
        let (sender, receiver) = oneshot::channel();
        let future = CompletionFuture::pending(receiver);
        sender.send(CoordinatorState::Committed).unwrap();
        assert_eq!(block_on(future).unwrap(), CoordinatorState::Committed);
    }

    /// Test that dropping the signaling half resolves the future with an error rather than
    /// leaving it pending forever.
    #[test]
    fn test_sender_dropped() {
        let (sender, receiver) = oneshot::channel::<CoordinatorState>();
        let future = CompletionFuture::pending(receiver);
        drop(sender);
        assert!(matches!(
            block_on(future),
            Err(CoordinatorError::Internal(_))
        ));
    }
}
