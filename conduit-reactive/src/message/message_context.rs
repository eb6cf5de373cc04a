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

use static_assertions::assert_impl_all;
use tracing::{error, instrument, trace};

use crate::message::{Correlation, Envelope, Fault, MessageAddress, Topic};
use crate::traits::ConduitMessage;

/// What a handler sees of an incoming message: the content plus enough routing
/// information to answer it.
#[derive(Clone, Debug)]
pub struct MessageContext<T> {
    pub(crate) message: T,
    pub(crate) origin: MessageAddress,
    pub(crate) recipient: MessageAddress,
    pub(crate) correlation: Correlation,
    pub(crate) topic: Option<Topic>,
}

impl<T> MessageContext<T> {
    pub(crate) fn from_envelope(envelope: &Envelope, message: T) -> Self {
        Self {
            message,
            origin: envelope.reply_to.clone(),
            recipient: envelope.recipient.clone(),
            correlation: envelope.correlation,
            topic: envelope.topic.clone(),
        }
    }

    /// The message content.
    #[inline]
    pub const fn message(&self) -> &T {
        &self.message
    }

    /// The address replies go to.
    #[inline]
    pub const fn origin(&self) -> &MessageAddress {
        &self.origin
    }

    /// The component the message was delivered to.
    #[inline]
    pub const fn recipient(&self) -> &MessageAddress {
        &self.recipient
    }

    /// The routing key, if the sender set one.
    #[inline]
    pub const fn topic(&self) -> Option<&Topic> {
        self.topic.as_ref()
    }

    /// Request/reply bookkeeping of the incoming envelope.
    #[inline]
    pub const fn correlation(&self) -> Correlation {
        self.correlation
    }

    /// Whether the sender waits for a correlated reply.
    #[inline]
    pub const fn is_request(&self) -> bool {
        self.correlation.is_request()
    }

    /// Answers the message.
    ///
    /// A reply to a request carries the request's correlation id, so it resolves the
    /// requester's pending promise instead of going through its behavior. Delivery
    /// failures are logged; a requester that has shut down cannot be answered.
    #[instrument(skip(self, content), level = "trace", fields(message_type = std::any::type_name_of_val(&content)))]
    pub fn reply(&self, content: impl ConduitMessage) {
        self.reply_arc(Arc::new(content));
    }

    /// Answers with a [`Fault`], which a requester sees as a remote error.
    pub fn fail(&self, detail: impl Into<String>) {
        self.reply(Fault::failed(detail));
    }

    pub(crate) fn reply_arc(&self, content: Arc<dyn ConduitMessage>) {
        let envelope = Envelope::new(content, self.recipient.clone(), self.origin.clone())
            .with_correlation(self.correlation.for_reply());
        trace!(
            from = %self.recipient.sender,
            to = %self.origin.sender,
            correlation = ?envelope.correlation,
            "replying"
        );
        if let Err(e) = self.origin.deliver(envelope) {
            error!(from = %self.recipient.sender, to = %self.origin.sender, error = %e, "reply not delivered");
        }
    }
}

assert_impl_all!(MessageContext<u32>: Send, Sync);
