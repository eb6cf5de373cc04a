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
use std::collections::HashSet;
use std::fmt::Debug;
use std::sync::Arc;

use acton_ern::Ern;
use tracing::trace;

use crate::component::{Behavior, ManagedComponent, Next, Pattern, Started};
use crate::message::{Envelope, MessageAddress, Subscribe, SubscribeAck, Topic, Unsubscribe, UnsubscribeAck};
use crate::traits::{ConduitMessage, Messenger};

/// The subscriber set of a publishing component.
#[derive(Debug, Clone, Default)]
pub struct Publisher {
    subscribers: HashSet<MessageAddress>,
}

/// Models that publish to subscribers.
pub trait Publishing {
    /// The model's publisher state.
    fn publisher(&self) -> &Publisher;
    /// Mutable access to the model's publisher state.
    fn publisher_mut(&mut self) -> &mut Publisher;
}

impl Publisher {
    /// Current subscribers.
    pub fn subscribers(&self) -> impl Iterator<Item = &MessageAddress> {
        self.subscribers.iter()
    }

    /// Number of subscribers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    /// Whether nobody is subscribed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    /// Identities of the current subscribers.
    #[must_use]
    pub fn subscriber_ids(&self) -> Vec<Ern> {
        self.subscribers.iter().map(|address| address.id().clone()).collect()
    }

    /// Handles [`Subscribe`] and [`Unsubscribe`], acknowledging each at once,
    /// and serves the subscriber identities as the `"subscribers"` property.
    ///
    /// Install it with
    /// [`with_fragment`](crate::component::ManagedComponent::with_fragment) so the
    /// entries stay in place when the component changes behavior.
    #[must_use]
    pub fn behavior<M>() -> Behavior<M>
    where
        M: Publishing + Default + Send + Debug + 'static,
    {
        Behavior::<M>::new()
            .on_content_of_type::<Subscribe>(Pattern::content::<Subscribe>(), |cx, ctx| {
                let added = cx.model.publisher_mut().subscribers.insert(ctx.origin().clone());
                trace!(subscriber = %ctx.origin().id(), added, "subscribe");
                ctx.reply(SubscribeAck);
                Next::Same
            })
            .on_content_of_type::<Unsubscribe>(Pattern::content::<Unsubscribe>(), |cx, ctx| {
                let removed = cx.model.publisher_mut().subscribers.remove(ctx.origin());
                trace!(subscriber = %ctx.origin().id(), removed, "unsubscribe");
                ctx.reply(UnsubscribeAck);
                Next::Same
            })
            .serve_property("subscribers", |model: &M| Some(model.publisher().subscriber_ids()))
    }
}

impl<M> ManagedComponent<Started, M>
where
    M: Publishing + Default + Send + Debug + 'static,
{
    /// Sends `message` to every current subscriber.
    pub fn broadcast(&self, message: impl ConduitMessage) {
        let message: Arc<dyn ConduitMessage> = Arc::new(message);
        trace!(subscribers = self.model.publisher().len(), "broadcast");
        for subscriber in self.model.publisher().subscribers() {
            self.send_message(subscriber, Arc::clone(&message));
        }
    }

    /// Sends `message` to every current subscriber under a routing topic.
    pub fn broadcast_on(&self, topic: impl Into<Topic>, message: impl ConduitMessage) {
        let message: Arc<dyn ConduitMessage> = Arc::new(message);
        let topic = topic.into();
        trace!(subscribers = self.model.publisher().len(), %topic, "broadcast");
        for subscriber in self.model.publisher().subscribers() {
            let envelope =
                Envelope::new(Arc::clone(&message), self.address(), subscriber.clone()).with_topic(Some(topic.clone()));
            self.deliver(subscriber, envelope);
        }
    }
}
