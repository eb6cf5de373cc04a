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

use crate::common::config::CONFIG;
use crate::message::{CorrelationId, MessageAddress};
use crate::traits::ConduitMessage;

/// What a correlated request eventually produced.
#[derive(Debug, Clone)]
pub enum CorrelatedReply {
    /// The reply content, exactly as the responder sent it.
    Delivered(Arc<dyn ConduitMessage>),
    /// No reply arrived within the bound given to
    /// [`Messenger::send_correlated_within`].
    TimedOut(Duration),
}

/// A one-shot continuation registered for a correlated request.
///
/// It runs on the requester's own turn with mutable access to the requester.
pub type ReplyHandler<C> = Box<dyn FnOnce(&mut C, CorrelatedReply) + Send>;

/// The minimum contract the coordination layer needs from whatever runs components.
///
/// [`ManagedComponent<Started, M>`](crate::component::ManagedComponent) is the
/// production implementation. Promises built with
/// [`Promise::ask`](crate::promise::Promise::ask) only ever talk to this trait, so
/// any context that can send and route correlated replies can compel them.
pub trait Messenger: Sized + 'static {
    /// The address replies to this context should be sent to.
    fn address(&self) -> MessageAddress;

    /// Sends an uncorrelated message. Never blocks.
    fn send_message(&self, target: &MessageAddress, message: Arc<dyn ConduitMessage>);

    /// Sends `message` as a request and registers `on_reply` for its single reply.
    ///
    /// The handler runs at most once. Without a timeout it may never run.
    fn send_correlated(
        &mut self,
        target: &MessageAddress,
        message: Arc<dyn ConduitMessage>,
        on_reply: ReplyHandler<Self>,
    ) -> CorrelationId;

    /// Like [`send_correlated`](Messenger::send_correlated), but the handler receives
    /// [`CorrelatedReply::TimedOut`] if no reply arrives within `timeout`.
    ///
    /// Whichever of reply and expiry is processed first retires the correlation; the
    /// other is ignored.
    fn send_correlated_within(
        &mut self,
        target: &MessageAddress,
        message: Arc<dyn ConduitMessage>,
        timeout: Duration,
        on_reply: ReplyHandler<Self>,
    ) -> CorrelationId;

    /// The bound [`Promise::ask_default`](crate::promise::Promise::ask_default) uses.
    ///
    /// Defaults to the process-wide configuration; components answer with the
    /// configuration of the runtime that created them.
    fn default_reply_timeout(&self) -> Duration {
        CONFIG.default_reply_timeout()
    }
}
