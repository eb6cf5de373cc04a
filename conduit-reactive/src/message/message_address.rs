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

use acton_ern::Ern;
use derive_new::new;
use tracing::trace;

use crate::common::ComponentSender;
use crate::message::{Envelope, MessageError};

/// The addressable endpoint of a component: its identity plus its inbox sender.
///
/// Equality and hashing use the identity only, so addresses can key subscription
/// sets no matter which clone of the sender they carry.
#[derive(new, Clone, Debug)]
pub struct MessageAddress {
    /// Sender half of the component's inbox.
    pub(crate) address: ComponentSender,
    /// The component's identity.
    pub(crate) sender: Ern,
}

impl MessageAddress {
    /// The component's identity.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> &Ern {
        &self.sender
    }

    /// The root name segment of the identity.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        self.sender.root.as_str()
    }

    /// Whether the component behind this address has stopped receiving.
    #[inline]
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.address.is_closed()
    }

    /// Hands an envelope to the inbox. Never blocks.
    pub(crate) fn deliver(&self, envelope: Envelope) -> Result<(), MessageError> {
        trace!(
            recipient = %self.sender,
            message_type = envelope.content().message_type_name(),
            "delivering envelope"
        );
        self.address.send(envelope).map_err(MessageError::from)
    }
}

impl PartialEq for MessageAddress {
    fn eq(&self, other: &Self) -> bool {
        self.sender == other.sender
    }
}

impl Eq for MessageAddress {}

impl Hash for MessageAddress {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.sender.hash(state);
    }
}

impl Default for MessageAddress {
    /// An address whose inbox is already closed.
    fn default() -> Self {
        let (outbox, _) = tokio::sync::mpsc::unbounded_channel();
        Self::new(outbox, Ern::default())
    }
}
