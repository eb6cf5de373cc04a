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
use std::fmt;
use std::fmt::Debug;
use std::marker::PhantomData;
use std::time::Duration;

use acton_ern::Ern;
use tokio_util::sync::CancellationToken;

pub use idle::Idle;
pub use started::Started;

use crate::common::{ComponentHandle, ComponentInbox, ComponentRuntime, GlobalStartHook, LifecycleHook};
use crate::component::{Behavior, Next};
use crate::message::CorrelationId;
use crate::traits::ReplyHandler;

mod idle;
mod started;

/// A component: a model, a behavior, and an inbox processed one message at a time.
///
/// The `State` parameter is a type-state marker. In [`Idle`] the component is
/// being configured: behaviors and lifecycle hooks are registered and the model
/// can be seeded. [`start`](ManagedComponent::start) consumes it and moves it
/// into [`Started`], where handlers and hooks receive it with mutable access to
/// the model and to the messaging API.
///
/// Everything a component does runs on its own turn. Reply continuations of its
/// promises are routed back into its inbox, so no code ever touches the model
/// from two places at once.
pub struct ManagedComponent<State, M> {
    pub(crate) handle: ComponentHandle,
    pub(crate) id: Ern,
    pub(crate) runtime: ComponentRuntime,

    /// The component's state. Handlers and hooks receive mutable access to it.
    pub model: M,

    pub(crate) inbox: ComponentInbox,
    pub(crate) behavior: Behavior<M>,
    /// Entries consulted before `behavior` that behavior changes never replace.
    pub(crate) fragments: Behavior<M>,
    /// Transition requested with `change_behavior` or `request_shutdown` during the
    /// current turn. A handler's own non-`Same` return takes precedence.
    pub(crate) requested: Option<Next<M>>,
    pub(crate) pending: HashMap<CorrelationId, ReplyHandler<ManagedComponent<Started, M>>>,
    /// Expiry timers of bounded requests, cancelled when the request retires.
    pub(crate) timers: HashMap<CorrelationId, CancellationToken>,
    pub(crate) next_correlation: u64,
    pub(crate) cycle_interval: Option<Duration>,
    pub(crate) registered: bool,

    pub(crate) on_start: Option<LifecycleHook<M>>,
    pub(crate) on_cycle: Option<LifecycleHook<M>>,
    pub(crate) on_shutdown: Option<LifecycleHook<M>>,
    pub(crate) on_global_start: Option<GlobalStartHook<M>>,

    /// Set once the shutdown hook has run; later transitions are ignored.
    pub(crate) shut_down: bool,
    _state: PhantomData<State>,
}

impl<State, M: Default + Send + Debug + 'static> ManagedComponent<State, M> {
    /// The component's identity.
    #[inline]
    pub const fn id(&self) -> &Ern {
        &self.id
    }

    /// The root name segment of the identity.
    #[inline]
    pub fn name(&self) -> &str {
        self.id.root.as_str()
    }

    /// The component's handle.
    #[inline]
    pub const fn handle(&self) -> &ComponentHandle {
        &self.handle
    }

    /// The runtime that created the component.
    #[inline]
    pub const fn runtime(&self) -> &ComponentRuntime {
        &self.runtime
    }

    /// The current behavior.
    #[inline]
    pub const fn behavior(&self) -> &Behavior<M> {
        &self.behavior
    }

    /// Moves every field into another type-state.
    pub(crate) fn transition<To>(self) -> ManagedComponent<To, M> {
        ManagedComponent {
            handle: self.handle,
            id: self.id,
            runtime: self.runtime,
            model: self.model,
            inbox: self.inbox,
            behavior: self.behavior,
            fragments: self.fragments,
            requested: self.requested,
            pending: self.pending,
            timers: self.timers,
            next_correlation: self.next_correlation,
            cycle_interval: self.cycle_interval,
            registered: self.registered,
            on_start: self.on_start,
            on_cycle: self.on_cycle,
            on_shutdown: self.on_shutdown,
            on_global_start: self.on_global_start,
            shut_down: self.shut_down,
            _state: PhantomData,
        }
    }
}

impl<State, M: Debug> Debug for ManagedComponent<State, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManagedComponent")
            .field("id", &self.id)
            .field("model", &self.model)
            .field("behavior", &self.behavior)
            .field("fragments", &self.fragments)
            .field("pending", &self.pending.len())
            .finish_non_exhaustive()
    }
}
