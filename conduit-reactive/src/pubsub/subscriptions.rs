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

use acton_ern::Ern;
use tracing::trace;

use crate::component::{Behavior, ManagedComponent, Started};
use crate::message::{MessageAddress, Subscribe, SubscribeAck, Unsubscribe, UnsubscribeAck};
use crate::promise::ActorPromise;

/// The publishers a component has subscribed to.
///
/// Only acknowledged subscriptions are recorded, and only acknowledged
/// unsubscriptions remove them.
#[derive(Debug, Clone, Default)]
pub struct Subscriptions {
    targets: HashSet<MessageAddress>,
}

/// Models that subscribe to publishers.
pub trait Subscribing {
    /// The model's subscription state.
    fn subscriptions(&self) -> &Subscriptions;
    /// Mutable access to the model's subscription state.
    fn subscriptions_mut(&mut self) -> &mut Subscriptions;
}

impl Subscriptions {
    /// Acknowledged subscription targets.
    pub fn targets(&self) -> impl Iterator<Item = &MessageAddress> {
        self.targets.iter()
    }

    /// Whether `target` acknowledged a subscription.
    #[must_use]
    pub fn contains(&self, target: &MessageAddress) -> bool {
        self.targets.contains(target)
    }

    /// Number of acknowledged subscriptions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Whether there are none.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Identities of the subscription targets.
    #[must_use]
    pub fn target_ids(&self) -> Vec<Ern> {
        self.targets.iter().map(|address| address.id().clone()).collect()
    }

    /// Serves the target identities as the `"subscriptions"` property.
    ///
    /// Meant for [`with_fragment`](crate::component::ManagedComponent::with_fragment).
    #[must_use]
    pub fn behavior<M>() -> Behavior<M>
    where
        M: Subscribing + Default + Send + Debug + 'static,
    {
        Behavior::<M>::new().serve_property("subscriptions", |model: &M| Some(model.subscriptions().target_ids()))
    }

    /// A promise that subscribes to `target` and records it once acknowledged.
    #[must_use]
    pub fn subscription<M>(target: &MessageAddress) -> ActorPromise<SubscribeAck, ManagedComponent<Started, M>>
    where
        M: Subscribing + Default + Send + Debug + 'static,
    {
        let recorded = target.clone();
        ActorPromise::<SubscribeAck, ManagedComponent<Started, M>>::ask(target, Subscribe).then(
            move |cx: &mut ManagedComponent<Started, M>, _| {
                trace!(target = %recorded.id(), "subscription acknowledged");
                cx.model.subscriptions_mut().targets.insert(recorded.clone());
            },
        )
    }
}

impl<M> ManagedComponent<Started, M>
where
    M: Subscribing + Default + Send + Debug + 'static,
{
    /// Subscribes to `target`; the target is recorded when it acknowledges.
    pub fn subscribe(&mut self, target: &MessageAddress) {
        Subscriptions::subscription::<M>(target).compel(self);
    }

    /// Asks `target` to drop this component; the record is removed on acknowledgement.
    ///
    /// Best effort: failures and timeouts leave the record in place and are not reported.
    pub fn unsubscribe(&mut self, target: &MessageAddress) {
        let recorded = target.clone();
        ActorPromise::<UnsubscribeAck, Self>::ask_default(target, Unsubscribe)
            .then(move |cx: &mut Self, _| {
                trace!(target = %recorded.id(), "unsubscription acknowledged");
                cx.model.subscriptions_mut().targets.remove(&recorded);
            })
            .compel(self);
    }

    /// Unsubscribes from every recorded target. Never blocks, never fails.
    pub fn unsubscribe_all(&mut self) {
        let targets: Vec<MessageAddress> = self.model.subscriptions().targets().cloned().collect();
        for target in &targets {
            self.unsubscribe(target);
        }
    }
}
