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
#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! # Conduit Reactive
//!
//! The coordination layer for pipelines built from message-only components.
//! Components never share memory or call each other; everything happens by
//! delivering messages and reacting to them one at a time.
//!
//! ## Key Concepts
//!
//! - **Promises (`Promise<T, E, C>`)**: lazy, two-outcome futures that run on a
//!   caller-supplied context. Composition never mutates; `compel` starts the work.
//!   Combinators (`all`, `all_settled`, `race`, `sequentially`, `compose`) and
//!   loops (`async_while`, `async_for`, `async_feedback_for`) build on them.
//! - **Correlated requests (`Promise::ask`)**: send a message and resolve with the
//!   reply, which is routed back onto the requester's own turn.
//! - **Components (`ManagedComponent`)**: a model plus a `Behavior`, an ordered
//!   table of pattern-matched handlers that can replace itself through `Next`.
//! - **Data (`Data<T>`)**: values passed on either by value or as a ticket that
//!   fetches them from their owner.
//! - **Publish/subscribe (`Publisher`, `Subscriptions`)**: acknowledged
//!   subscription as reusable behavior fragments.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use conduit_reactive::prelude::*;
//!
//! #[conduit_message]
//! struct Reading(f64);
//!
//! #[conduit_component]
//! struct Averager {
//!     total: f64,
//!     count: u32,
//! }
//!
//! let runtime = ConduitApp::launch();
//! let mut averager = runtime.new_component::<Averager>();
//! averager.on_content_of_type::<Reading>(Pattern::content::<Reading>(), |cx, ctx| {
//!     cx.model.total += ctx.message().0;
//!     cx.model.count += 1;
//!     Next::Same
//! });
//! let handle = averager.start();
//! handle.send(Reading(4.0));
//! ```

/// Runtime, handles, configuration, and error types.
pub(crate) mod common;

/// Managed components and their dispatch tables.
pub(crate) mod component;

/// Values handed on by value or by ticket.
pub(crate) mod data;

/// Envelopes, addresses, and the built-in message types.
pub(crate) mod message;

/// Lazy two-outcome promises and their combinators.
pub mod promise;

/// Publish/subscribe behavior fragments.
pub(crate) mod pubsub;

/// Core traits.
pub(crate) mod traits;

/// Runtime configuration loaded from XDG locations.
pub mod config {
    pub use crate::common::config::{BehaviorConfig, ConduitConfig, DefaultsConfig, TimeoutConfig, CONFIG};
}

/// A prelude module for convenient imports.
///
/// ```rust,ignore
/// use conduit_reactive::prelude::*;
/// ```
pub mod prelude {
    // Macros from conduit-macro
    pub use conduit_macro::*;

    // External crate re-exports
    pub use acton_ern::*;

    // Core types
    pub use crate::common::{
        ComponentHandle, ComponentRuntime, ComponentSender, ConduitApp, ConduitConfig, GlobalStartHook,
        LifecycleHook, ReplyError,
    };
    pub use crate::component::{Behavior, ComponentConfig, Handler, Idle, ManagedComponent, Next, Pattern, Started};
    pub use crate::data::{Data, Ticket};
    pub use crate::message::{
        Correlation, CorrelationId, Envelope, Fault, FaultKind, MessageAddress, MessageContext, MessageError,
        PropertyQuery, Subscribe, SubscribeAck, SystemSignal, Topic, Unsubscribe, UnsubscribeAck,
    };
    pub use crate::promise::{
        all, all_settled, async_feedback_for, async_for, async_while, compose, race, sequentially, ActorPromise,
        Callback, ComposeStep, Iteration, Promise, Rejecter, Resolver, Unit,
    };
    pub use crate::pubsub::{Publisher, Publishing, Subscribing, Subscriptions};
    pub use crate::traits::{downcast_message, ConduitMessage, CorrelatedReply, Messenger, ReplyHandler};
}
