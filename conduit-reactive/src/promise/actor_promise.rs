/*
 * Copyright (c) 2024. Govcraft
 *
 * Licensed under either of
 *   * Apache License, Version 2.0 (the "License");
 *     you may not use this file except in compliance with the License.
 *     You may obtain a copy of the License at http://www.apache.org/licenses/LICENSE-2.0
 *   * MIT license: http://opensource.org/licenses/MIT
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the applicable License for the specific language governing permissions and
 * limitations under that License.
 */
use std::sync::Arc;
use std::time::Duration;

use tracing::trace;

use crate::common::ReplyError;
use crate::message::{Fault, MessageAddress, PropertyQuery};
use crate::promise::Promise;
use crate::traits::{downcast_message, ConduitMessage, CorrelatedReply, Messenger, ReplyHandler};

/// A promise for the reply to a correlated request.
pub type ActorPromise<T, C> = Promise<T, ReplyError, C>;

impl<T, C> Promise<T, ReplyError, C>
where
    T: ConduitMessage + Clone,
    C: Messenger,
{
    /// Sends `message` to `target` as a request and resolves with the reply.
    ///
    /// Every compel sends a new request. A [`Fault`] reply rejects with
    /// [`ReplyError::Remote`]; a reply of any other type than `T` rejects with
    /// [`ReplyError::UnexpectedReply`]. Without a bound the promise stays pending
    /// if the target never answers.
    pub fn ask(target: &MessageAddress, message: impl ConduitMessage) -> Self {
        Self::ask_erased(target.clone(), Arc::new(message), None)
    }

    /// Like [`ask`](Promise::ask), but rejects with [`ReplyError::Timeout`] when no
    /// reply arrives within `timeout`.
    pub fn ask_within(target: &MessageAddress, message: impl ConduitMessage, timeout: Duration) -> Self {
        Self::ask_erased(target.clone(), Arc::new(message), Some(timeout))
    }

    /// [`ask_within`](Promise::ask_within) bounded by the requester's
    /// [`default_reply_timeout`](Messenger::default_reply_timeout), read at compel time.
    pub fn ask_default(target: &MessageAddress, message: impl ConduitMessage) -> Self {
        let target = target.clone();
        let message: Arc<dyn ConduitMessage> = Arc::new(message);
        Self::new(move |cx: &mut C, resolve, reject| {
            let bound = cx.default_reply_timeout();
            Self::ask_erased(target.clone(), Arc::clone(&message), Some(bound)).compel_with(cx, resolve, reject);
        })
    }

    /// Asks `target` for the property it serves under `name`.
    pub fn query_property(target: &MessageAddress, name: impl Into<String>) -> Self {
        Self::ask(target, PropertyQuery::new(name))
    }

    pub(crate) fn ask_erased(
        target: MessageAddress,
        message: Arc<dyn ConduitMessage>,
        timeout: Option<Duration>,
    ) -> Self {
        Self::new(move |cx: &mut C, resolve, reject| {
            let on_reply: ReplyHandler<C> = Box::new(move |cx: &mut C, reply: CorrelatedReply| match classify::<T>(reply) {
                Ok(value) => resolve.fire(cx, value),
                Err(error) => reject.fire(cx, error),
            });
            let id = match timeout {
                Some(bound) => cx.send_correlated_within(&target, Arc::clone(&message), bound, on_reply),
                None => cx.send_correlated(&target, Arc::clone(&message), on_reply),
            };
            trace!(
                target = %target.sender,
                correlation = %id,
                expecting = std::any::type_name::<T>(),
                "request sent"
            );
        })
    }
}

/// Turns a correlated reply into the expected content or a classified error.
pub(crate) fn classify<T: ConduitMessage + Clone>(reply: CorrelatedReply) -> Result<T, ReplyError> {
    match reply {
        CorrelatedReply::TimedOut(after) => Err(ReplyError::Timeout { after }),
        CorrelatedReply::Delivered(message) => {
            let content: &dyn ConduitMessage = &*message;
            if let Some(fault) = downcast_message::<Fault>(content) {
                return Err(ReplyError::Remote(fault.clone()));
            }
            downcast_message::<T>(content)
                .cloned()
                .ok_or_else(|| ReplyError::UnexpectedReply {
                    expected: std::any::type_name::<T>(),
                    received: content.message_type_name(),
                })
        }
    }
}

#[cfg(test)]
mod tests {
    use acton_ern::Ern;

    use super::*;
    use crate::message::{CorrelationId, FaultKind};

    #[derive(Debug, Clone, PartialEq)]
    struct Temperature(f32);

    #[derive(Debug, Clone)]
    struct Humidity(f32);

    /// Records requests and lets the test play the responder.
    #[derive(Default)]
    struct StubRequester {
        sent: Vec<Arc<dyn ConduitMessage>>,
        bounds: Vec<Option<Duration>>,
        pending: Vec<ReplyHandler<StubRequester>>,
        next: u64,
        log: Vec<String>,
    }

    impl StubRequester {
        fn answer(&mut self, reply: CorrelatedReply) {
            let handler = self.pending.remove(0);
            handler(self, reply);
        }
    }

    impl Messenger for StubRequester {
        fn address(&self) -> MessageAddress {
            MessageAddress::default()
        }

        fn send_message(&self, _target: &MessageAddress, _message: Arc<dyn ConduitMessage>) {}

        fn send_correlated(
            &mut self,
            _target: &MessageAddress,
            message: Arc<dyn ConduitMessage>,
            on_reply: ReplyHandler<Self>,
        ) -> CorrelationId {
            self.sent.push(message);
            self.bounds.push(None);
            self.pending.push(on_reply);
            self.next += 1;
            CorrelationId(self.next)
        }

        fn send_correlated_within(
            &mut self,
            _target: &MessageAddress,
            message: Arc<dyn ConduitMessage>,
            timeout: Duration,
            on_reply: ReplyHandler<Self>,
        ) -> CorrelationId {
            self.sent.push(message);
            self.bounds.push(Some(timeout));
            self.pending.push(on_reply);
            self.next += 1;
            CorrelationId(self.next)
        }

        fn default_reply_timeout(&self) -> Duration {
            Duration::from_millis(40)
        }
    }

    fn target() -> MessageAddress {
        let (outbox, _inbox) = tokio::sync::mpsc::unbounded_channel();
        MessageAddress::new(outbox, Ern::with_root("thermometer").expect("valid root"))
    }

    fn logged(promise: ActorPromise<Temperature, StubRequester>) -> ActorPromise<Temperature, StubRequester> {
        promise
            .then(|cx, t| cx.log.push(format!("temperature {}", t.0)))
            .on_error(|cx, e| cx.log.push(format!("error {e:?}")))
    }

    #[test]
    fn matching_reply_resolves() {
        let mut cx = StubRequester::default();
        logged(Promise::ask(&target(), "read")).compel(&mut cx);
        assert!(cx.log.is_empty());

        cx.answer(CorrelatedReply::Delivered(Arc::new(Temperature(21.5))));
        assert_eq!(cx.log, vec!["temperature 21.5"]);
    }

    #[test]
    fn fault_reply_rejects_as_remote() {
        let mut cx = StubRequester::default();
        let outcome = Arc::new(parking_lot::Mutex::new(None));
        let seen = Arc::clone(&outcome);
        ActorPromise::<Temperature, StubRequester>::ask(&target(), "read")
            .on_error(move |_, e| *seen.lock() = Some(e.clone()))
            .compel(&mut cx);

        cx.answer(CorrelatedReply::Delivered(Arc::new(Fault::failed("sensor offline"))));
        let error = outcome.lock().clone();
        match error {
            Some(ReplyError::Remote(fault)) => {
                assert_eq!(fault.kind, FaultKind::Failed);
                assert_eq!(fault.detail, "sensor offline");
            }
            other => panic!("expected a remote error, got {other:?}"),
        }
    }

    #[test]
    fn wrong_content_rejects_as_unexpected_reply() {
        let mut cx = StubRequester::default();
        let outcome = Arc::new(parking_lot::Mutex::new(None));
        let seen = Arc::clone(&outcome);
        ActorPromise::<Temperature, StubRequester>::ask(&target(), "read")
            .on_error(move |_, e| *seen.lock() = Some(e.clone()))
            .compel(&mut cx);

        cx.answer(CorrelatedReply::Delivered(Arc::new(Humidity(0.4))));
        let error = outcome.lock().clone();
        match error {
            Some(ReplyError::UnexpectedReply { expected, received }) => {
                assert!(expected.ends_with("Temperature"));
                assert!(received.ends_with("Humidity"));
            }
            other => panic!("expected an unexpected-reply error, got {other:?}"),
        }
    }

    #[test]
    fn expiry_rejects_as_timeout() {
        let mut cx = StubRequester::default();
        let bound = Duration::from_millis(250);
        logged(Promise::ask_within(&target(), "read", bound)).compel(&mut cx);
        assert_eq!(cx.bounds, vec![Some(bound)]);

        cx.answer(CorrelatedReply::TimedOut(bound));
        assert_eq!(cx.log, vec![format!("error {:?}", ReplyError::Timeout { after: bound })]);
    }

    #[test]
    fn default_bound_comes_from_the_requester() {
        let mut cx = StubRequester::default();
        logged(Promise::ask_default(&target(), "read")).compel(&mut cx);
        assert_eq!(cx.bounds, vec![Some(Duration::from_millis(40))]);
    }

    #[test]
    fn each_compel_sends_a_new_request() {
        let mut cx = StubRequester::default();
        let ask = logged(Promise::ask(&target(), "read"));
        ask.compel(&mut cx);
        ask.compel(&mut cx);
        assert_eq!(cx.sent.len(), 2);
        assert_eq!(cx.pending.len(), 2);
    }

    #[test]
    fn property_queries_carry_the_name() {
        let mut cx = StubRequester::default();
        ActorPromise::<Vec<Ern>, StubRequester>::query_property(&target(), "subscribers").compel(&mut cx);
        let query = downcast_message::<PropertyQuery>(&*cx.sent[0]).cloned();
        assert_eq!(query, Some(PropertyQuery::new("subscribers")));
    }
}
