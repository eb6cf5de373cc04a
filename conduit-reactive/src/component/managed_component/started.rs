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
use std::fmt::Debug;
use std::future::pending;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tracing::{error, instrument, trace, warn};

use crate::common::LifecycleHook;
use crate::component::{temp_worker, Behavior, ManagedComponent, Next};
use crate::data::Data;
use crate::message::{
    Correlation, CorrelationExpired, CorrelationId, Envelope, MessageAddress, SystemSignal, Topic,
};
use crate::promise::{ActorPromise, Promise};
use crate::traits::{downcast_message, ConduitMessage, CorrelatedReply, Messenger, ReplyHandler};

/// Type-state marker for a running component.
#[derive(Debug, Clone, Copy, Default)]
pub struct Started;

impl<M: Default + Send + Debug + 'static> ManagedComponent<Started, M> {
    /// Replaces the behavior once the current turn ends.
    ///
    /// If the running handler itself returns a non-`Same` [`Next`], that return
    /// wins over this request.
    pub fn change_behavior(&mut self, behavior: Behavior<M>) {
        self.requested = Some(Next::Become(behavior));
    }

    /// Shuts the component down once the current turn ends.
    pub fn request_shutdown(&mut self) {
        self.requested = Some(Next::Shutdown);
    }

    /// Sends a message to `target`. Failures are logged.
    pub fn send(&self, target: &MessageAddress, message: impl ConduitMessage) {
        self.send_message(target, Arc::new(message));
    }

    /// Sends a message to `target` under a routing topic.
    pub fn send_on(&self, target: &MessageAddress, topic: impl Into<Topic>, message: impl ConduitMessage) {
        let envelope = Envelope::new(Arc::new(message), self.address(), target.clone()).with_topic(Some(topic.into()));
        self.deliver(target, envelope);
    }

    /// A promise for `target`'s reply to `message`.
    #[must_use]
    pub fn ask<T: ConduitMessage + Clone>(&self, target: &MessageAddress, message: impl ConduitMessage) -> ActorPromise<T, Self> {
        Promise::ask(target, message)
    }

    /// A promise for the property `target` serves under `name`.
    #[must_use]
    pub fn query_property<T: ConduitMessage + Clone>(&self, target: &MessageAddress, name: impl Into<String>) -> ActorPromise<T, Self> {
        Promise::query_property(target, name)
    }

    /// Wraps a value this component owns so it can be passed on by value.
    #[must_use]
    pub fn wrap_data<T: ConduitMessage + Clone>(&self, value: T) -> Data<T> {
        Data::carried(value)
    }

    /// A promise for the value behind `data`, fetched from its owner if needed.
    #[must_use]
    pub fn unwrap_data<T: ConduitMessage + Clone>(&self, data: &Data<T>) -> ActorPromise<T, Self> {
        data.retrieve()
    }

    /// A promise that runs `job` on a short-lived worker component.
    ///
    /// Each compel spawns a fresh worker, runs the job on the worker's turn, and
    /// stops the worker afterwards. An `Err` rejects with a remote failure.
    #[must_use]
    pub fn temp_worker<T: ConduitMessage + Clone>(
        &self,
        job: impl Fn() -> Result<T, String> + Send + Sync + 'static,
    ) -> ActorPromise<T, Self> {
        let job: temp_worker::Job<T> = Arc::new(job);
        Promise::new(move |cx: &mut Self, resolve, reject| {
            let worker = temp_worker::spawn(&cx.runtime, Arc::clone(&job));
            Promise::ask(&worker, temp_worker::RunJob).compel_with(cx, resolve, reject);
        })
    }

    /// Processes the inbox until the component shuts down or is cancelled.
    #[instrument(skip(self), fields(component = %self.id))]
    pub(crate) async fn wake(&mut self) {
        let hook = self.on_start.clone();
        self.run_turn(hook);

        let cancel_token = self.handle.cancellation_token.clone();
        let mut cancel = Box::pin(cancel_token.cancelled());
        let mut ticker = self.cycle_interval.map(|period| {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker
        });

        while !self.shut_down {
            tokio::select! {
                () = &mut cancel => {
                    trace!("Forceful cancellation triggered for component: {}", self.id);
                    break;
                }
                () = next_tick(ticker.as_mut()) => {
                    let hook = self.on_cycle.clone();
                    self.run_turn(hook);
                }
                incoming = self.inbox.recv() => {
                    let Some(envelope) = incoming else { break; };
                    self.dispatch(&envelope);
                }
            }
        }

        self.shutdown();
        self.pending.clear();
        for (_, timer) in self.timers.drain() {
            timer.cancel();
        }
        if self.registered {
            self.runtime.0.roots.remove(&self.id);
        }
        trace!("Component {} stopped.", self.id);
    }

    /// Runs a hook as a turn of its own; transitions it requests apply afterwards.
    fn run_turn(&mut self, hook: Option<LifecycleHook<M>>) {
        self.requested = None;
        if let Some(hook) = hook {
            hook(self);
        }
        let next = self.requested.take().unwrap_or(Next::Same);
        self.apply(next);
    }

    fn dispatch(&mut self, envelope: &Envelope) {
        trace!(
            from = %envelope.reply_to.sender,
            message_type = envelope.content().message_type_name(),
            "dispatching"
        );
        self.requested = None;
        let next = match self.route(envelope) {
            Next::Same => self.requested.take().unwrap_or(Next::Same),
            direct => {
                self.requested = None;
                direct
            }
        };
        self.apply(next);
    }

    /// Replies, expiries, and system signals first; then fragments, then the behavior.
    fn route(&mut self, envelope: &Envelope) -> Next<M> {
        if let Correlation::Reply(id) = envelope.correlation {
            self.retire_timer(id);
            match self.pending.remove(&id) {
                Some(on_reply) => on_reply(self, CorrelatedReply::Delivered(Arc::clone(&envelope.message))),
                None => trace!(correlation = %id, "reply for a retired correlation ignored"),
            }
            return Next::Same;
        }

        let content = envelope.content();
        if let Some(expired) = downcast_message::<CorrelationExpired>(content) {
            self.timers.remove(&expired.id);
            if let Some(on_reply) = self.pending.remove(&expired.id) {
                trace!(correlation = %expired.id, after = ?expired.after, "request timed out");
                on_reply(self, CorrelatedReply::TimedOut(expired.after));
            }
            return Next::Same;
        }

        if let Some(signal) = downcast_message::<SystemSignal>(content) {
            return match signal {
                SystemSignal::Terminate => {
                    trace!("Terminate signal received for component: {}", self.id);
                    Next::Shutdown
                }
                SystemSignal::GlobalStart(master) => {
                    if let Some(hook) = self.on_global_start.clone() {
                        hook(self, master);
                    }
                    Next::Same
                }
            };
        }

        if let Some(handler) = self.fragments.find(envelope).or_else(|| self.behavior.find(envelope)) {
            return handler(self, envelope);
        }
        if self.runtime.config().behavior.warn_on_unmatched {
            warn!(message_type = content.message_type_name(), "no behavior entry matched");
        } else {
            trace!(message_type = content.message_type_name(), "no behavior entry matched");
        }
        Next::Same
    }

    fn apply(&mut self, next: Next<M>) {
        match next {
            Next::Same => {}
            Next::Become(behavior) if self.shut_down => {
                trace!(?behavior, "behavior change after shutdown ignored");
            }
            Next::Become(behavior) => {
                trace!(entries = behavior.len(), "behavior replaced");
                self.behavior = behavior;
            }
            Next::Shutdown => self.shutdown(),
        }
    }

    /// Runs the shutdown hook once and stops accepting messages.
    fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;
        if let Some(hook) = self.on_shutdown.clone() {
            hook(self);
        }
        self.inbox.close();
    }

    fn retire_timer(&mut self, id: CorrelationId) {
        if let Some(timer) = self.timers.remove(&id) {
            timer.cancel();
        }
    }

    fn next_correlation_id(&mut self) -> CorrelationId {
        self.next_correlation += 1;
        CorrelationId(self.next_correlation)
    }

    pub(crate) fn deliver(&self, target: &MessageAddress, envelope: Envelope) {
        if let Err(e) = target.deliver(envelope) {
            error!(from = %self.id, to = %target.sender, error = %e, "message not delivered");
        }
    }

    fn register_request(
        &mut self,
        target: &MessageAddress,
        message: Arc<dyn ConduitMessage>,
        on_reply: ReplyHandler<Self>,
    ) -> CorrelationId {
        let id = self.next_correlation_id();
        self.pending.insert(id, on_reply);
        let envelope = Envelope::new(message, self.address(), target.clone()).with_correlation(Correlation::Request(id));
        self.deliver(target, envelope);
        id
    }
}

impl<M: Default + Send + Debug + 'static> Messenger for ManagedComponent<Started, M> {
    fn address(&self) -> MessageAddress {
        self.handle.reply_address()
    }

    fn send_message(&self, target: &MessageAddress, message: Arc<dyn ConduitMessage>) {
        let envelope = Envelope::new(message, self.address(), target.clone());
        self.deliver(target, envelope);
    }

    fn send_correlated(
        &mut self,
        target: &MessageAddress,
        message: Arc<dyn ConduitMessage>,
        on_reply: ReplyHandler<Self>,
    ) -> CorrelationId {
        self.register_request(target, message, on_reply)
    }

    fn send_correlated_within(
        &mut self,
        target: &MessageAddress,
        message: Arc<dyn ConduitMessage>,
        timeout: Duration,
        on_reply: ReplyHandler<Self>,
    ) -> CorrelationId {
        let id = self.register_request(target, message, on_reply);
        let own = self.address();
        let timer = self.handle.cancellation_token.child_token();
        self.timers.insert(id, timer.clone());
        tokio::spawn(async move {
            tokio::select! {
                () = timer.cancelled() => {}
                () = tokio::time::sleep(timeout) => {
                    let expired = Envelope::new(Arc::new(CorrelationExpired { id, after: timeout }), own.clone(), own.clone());
                    // The requester may already have stopped.
                    let _ = own.deliver(expired);
                }
            }
        });
        id
    }

    fn default_reply_timeout(&self) -> Duration {
        self.runtime.config().default_reply_timeout()
    }
}

/// Resolves on the next tick, or never for components without one.
async fn next_tick(ticker: Option<&mut Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => pending::<()>().await,
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc::unbounded_channel;
    use tokio_util::sync::CancellationToken;

    use super::*;
    use crate::common::{ConduitApp, ConduitConfig};
    use crate::component::Pattern;

    #[derive(Debug, Clone)]
    struct Question;

    #[derive(Debug, Clone)]
    struct Answer;

    #[tokio::test]
    async fn answered_requests_retire_their_expiry_timer() -> anyhow::Result<()> {
        let runtime = ConduitApp::launch_with_config(ConduitConfig::default());
        let mut oracle = runtime.new_component_with_name::<()>("oracle")?;
        oracle.on_content_of_type::<Question>(Pattern::content::<Question>(), |_, ctx| {
            ctx.reply(Answer);
            Next::Same
        });
        let oracle = oracle.start().reply_address();

        let (tx, mut rx) = unbounded_channel::<(usize, usize, bool)>();
        let mut asker = runtime.new_component_with_name::<()>("asker")?;
        asker.on_start(move |cx| {
            let tx = tx.clone();
            ActorPromise::<Answer, ManagedComponent<Started, ()>>::ask_within(&oracle, Question, Duration::from_secs(60))
                .compel(cx);
            let armed = cx.timers.len();
            let timer = cx.timers.values().next().cloned();
            ActorPromise::<Answer, ManagedComponent<Started, ()>>::ask(&oracle, Question)
                .then(move |cx, _| {
                    let cancelled = timer.as_ref().is_some_and(CancellationToken::is_cancelled);
                    let _ = tx.send((armed, cx.timers.len(), cancelled));
                })
                .compel(cx);
        });
        asker.start();

        // The unbounded request is answered after the bounded one.
        let (armed, left, cancelled) = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await?
            .expect("asker reported");
        assert_eq!(armed, 1);
        assert_eq!(left, 0);
        assert!(cancelled);

        runtime.shutdown_all().await
    }
}
