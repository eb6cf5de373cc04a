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
use std::collections::HashMap;
use std::fmt::Debug;
use std::marker::PhantomData;
use std::mem;
use std::sync::Arc;

use tokio::sync::mpsc::unbounded_channel;
use tracing::{instrument, trace};

use crate::common::{ComponentHandle, ComponentRuntime};
use crate::component::{Behavior, ComponentConfig, ManagedComponent, Next, Pattern, Started};
use crate::message::{Envelope, MessageAddress, MessageContext};
use crate::traits::ConduitMessage;

/// Type-state marker for a component that is being configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct Idle;

impl<M: Default + Send + Debug + 'static> ManagedComponent<Idle, M> {
    pub(crate) fn new(runtime: &ComponentRuntime, config: ComponentConfig, register: bool) -> Self {
        let (outbox, inbox) = unbounded_channel();
        let id = config.id().clone();
        let handle = ComponentHandle::new(
            id.clone(),
            outbox,
            runtime.0.cancellation_token.child_token(),
            runtime.config().component_shutdown_timeout(),
        );
        if register {
            runtime.0.roots.insert(id.clone(), handle.clone());
        }
        trace!(component = %id, registered = register, "new component");
        Self {
            handle,
            id,
            runtime: runtime.clone(),
            model: M::default(),
            inbox,
            behavior: Behavior::default(),
            fragments: Behavior::default(),
            requested: None,
            pending: HashMap::new(),
            timers: HashMap::new(),
            next_correlation: 0,
            cycle_interval: config.cycle_interval().or_else(|| runtime.config().default_cycle_interval()),
            registered: register,
            on_start: None,
            on_cycle: None,
            on_shutdown: None,
            on_global_start: None,
            shut_down: false,
            _state: PhantomData,
        }
    }

    /// Replaces the whole initial behavior.
    pub fn with_behavior(&mut self, behavior: Behavior<M>) -> &mut Self {
        self.behavior = behavior;
        self
    }

    /// Appends a raw entry to the initial behavior. See [`Behavior::define`].
    pub fn define(
        &mut self,
        pattern: Pattern,
        handler: impl Fn(&mut ManagedComponent<Started, M>, &Envelope) -> Next<M> + Send + Sync + 'static,
    ) -> &mut Self {
        self.behavior = mem::take(&mut self.behavior).define(pattern, handler);
        self
    }

    /// Appends an erased-content entry to the initial behavior. See [`Behavior::on`].
    pub fn on(
        &mut self,
        pattern: Pattern,
        handler: impl Fn(&mut ManagedComponent<Started, M>, &MessageContext<Arc<dyn ConduitMessage>>) -> Next<M>
            + Send
            + Sync
            + 'static,
    ) -> &mut Self {
        self.behavior = mem::take(&mut self.behavior).on(pattern, handler);
        self
    }

    /// Appends a typed entry to the initial behavior. See [`Behavior::on_content_of_type`].
    pub fn on_content_of_type<T: ConduitMessage + Clone>(
        &mut self,
        pattern: Pattern,
        handler: impl Fn(&mut ManagedComponent<Started, M>, &MessageContext<T>) -> Next<M> + Send + Sync + 'static,
    ) -> &mut Self {
        self.behavior = mem::take(&mut self.behavior).on_content_of_type(pattern, handler);
        self
    }

    /// Serves a model property to [`PropertyQuery`](crate::message::PropertyQuery) requests.
    pub fn serve_property<V: ConduitMessage>(
        &mut self,
        name: impl Into<String>,
        supplier: impl Fn(&M) -> Option<V> + Send + Sync + 'static,
    ) -> &mut Self {
        self.behavior = mem::take(&mut self.behavior).serve_property(name, supplier);
        self
    }

    /// Appends a fallback behavior's entries.
    pub fn or_else(&mut self, fallback: &Behavior<M>) -> &mut Self {
        self.behavior = mem::take(&mut self.behavior).or_else(fallback);
        self
    }

    /// Installs entries that are matched before the current behavior and survive
    /// every [`Next::Become`]. Protocol fragments such as
    /// [`Publisher::behavior`](crate::pubsub::Publisher::behavior) belong here.
    pub fn with_fragment(&mut self, fragment: Behavior<M>) -> &mut Self {
        self.fragments = mem::take(&mut self.fragments).or_else(&fragment);
        self
    }

    /// Runs once on the component's first turn, before any message.
    pub fn on_start(&mut self, hook: impl Fn(&mut ManagedComponent<Started, M>) + Send + Sync + 'static) -> &mut Self {
        self.on_start = Some(Arc::new(hook));
        self
    }

    /// Runs once per tick on tick-driven components.
    pub fn on_cycle(&mut self, hook: impl Fn(&mut ManagedComponent<Started, M>) + Send + Sync + 'static) -> &mut Self {
        self.on_cycle = Some(Arc::new(hook));
        self
    }

    /// Runs exactly once when the component stops, however it stops.
    pub fn on_shutdown(
        &mut self,
        hook: impl Fn(&mut ManagedComponent<Started, M>) + Send + Sync + 'static,
    ) -> &mut Self {
        self.on_shutdown = Some(Arc::new(hook));
        self
    }

    /// Runs when the runtime broadcasts global start.
    pub fn on_global_start(
        &mut self,
        hook: impl Fn(&mut ManagedComponent<Started, M>, &MessageAddress) + Send + Sync + 'static,
    ) -> &mut Self {
        self.on_global_start = Some(Arc::new(hook));
        self
    }

    /// Spawns the component's wake loop and returns its handle.
    ///
    /// Must be called from within a Tokio runtime.
    #[instrument(skip(self), fields(component = %self.id))]
    pub fn start(self) -> ComponentHandle {
        trace!("Model state before start: {:?}", self.model);
        let handle = self.handle.clone();
        let mut component: ManagedComponent<Started, M> = self.transition();
        handle.tracker().spawn(async move { component.wake().await });
        handle.tracker().close();
        trace!("component started");
        handle
    }
}
