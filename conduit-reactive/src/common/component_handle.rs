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
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::time::Duration;

use acton_ern::Ern;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{error, instrument, trace, warn};

use crate::common::ComponentSender;
use crate::message::{Envelope, MessageAddress, MessageError, SystemSignal, Topic};
use crate::traits::ConduitMessage;

/// An external reference to a running component.
///
/// Handles are cheap to clone. Messages sent through a handle carry the
/// component's own address as their origin, so anything the component replies
/// to them lands back in its own inbox.
#[derive(Debug, Clone)]
pub struct ComponentHandle {
    pub(crate) id: Ern,
    pub(crate) outbox: ComponentSender,
    tracker: TaskTracker,
    pub(crate) cancellation_token: CancellationToken,
    shutdown_timeout: Duration,
}

impl ComponentHandle {
    pub(crate) fn new(
        id: Ern,
        outbox: ComponentSender,
        cancellation_token: CancellationToken,
        shutdown_timeout: Duration,
    ) -> Self {
        Self {
            id,
            outbox,
            tracker: TaskTracker::new(),
            cancellation_token,
            shutdown_timeout,
        }
    }

    /// The component's identity.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> &Ern {
        &self.id
    }

    /// The root name segment of the identity.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        self.id.root.as_str()
    }

    /// The address other components use to reach this one.
    #[inline]
    #[must_use]
    pub fn reply_address(&self) -> MessageAddress {
        MessageAddress::new(self.outbox.clone(), self.id.clone())
    }

    /// Tracks the component's wake loop task.
    #[inline]
    #[must_use]
    pub fn tracker(&self) -> TaskTracker {
        self.tracker.clone()
    }

    /// How long [`stop`](ComponentHandle::stop) waits before cancelling, taken
    /// from the creating runtime's configuration.
    #[inline]
    #[must_use]
    pub const fn shutdown_timeout(&self) -> Duration {
        self.shutdown_timeout
    }

    /// Sends a message to the component. Failures are logged.
    pub fn send(&self, message: impl ConduitMessage) {
        if let Err(e) = self.try_send(message) {
            error!(component = %self.id, error = %e, "send failed");
        }
    }

    /// Sends a message under a routing topic. Failures are logged.
    pub fn send_on(&self, topic: impl Into<Topic>, message: impl ConduitMessage) {
        let address = self.reply_address();
        let envelope = Envelope::new(Arc::new(message), address.clone(), address).with_topic(Some(topic.into()));
        if let Err(e) = self.outbox.send(envelope) {
            error!(component = %self.id, error = %e, "send failed");
        }
    }

    /// Sends a message to the component.
    ///
    /// # Errors
    ///
    /// Returns [`MessageError::ChannelClosed`] if the component has stopped.
    pub fn try_send(&self, message: impl ConduitMessage) -> Result<(), MessageError> {
        let address = self.reply_address();
        address.deliver(Envelope::new(Arc::new(message), address.clone(), address.clone()))
    }

    /// Asks the component to shut down and waits for its wake loop to finish.
    ///
    /// The component runs its shutdown hook on its own turn. If it does not stop
    /// within its [`shutdown_timeout`](ComponentHandle::shutdown_timeout) it is cancelled.
    ///
    /// # Errors
    ///
    /// Returns an error if the component had to be cancelled.
    #[instrument(skip(self), fields(component = %self.id))]
    pub async fn stop(&self) -> anyhow::Result<()> {
        if self.try_send(SystemSignal::Terminate).is_err() {
            trace!("component already stopped");
        }
        let bound = self.shutdown_timeout;
        if tokio::time::timeout(bound, self.tracker.wait()).await.is_err() {
            warn!(?bound, "component did not stop in time; cancelling");
            self.cancellation_token.cancel();
            return Err(anyhow::anyhow!("component {} did not stop within {bound:?}", self.id));
        }
        trace!("component stopped");
        Ok(())
    }
}

impl PartialEq for ComponentHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ComponentHandle {}

impl Hash for ComponentHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
