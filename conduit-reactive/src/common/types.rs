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
//! Channel and hook aliases shared by the runtime and components.

use std::sync::Arc;

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

use crate::component::{ManagedComponent, Started};
use crate::message::{Envelope, MessageAddress};

/// Sender half of a component inbox. Sending never blocks.
pub type ComponentSender = UnboundedSender<Envelope>;

/// Receiver half of a component inbox, owned by the component's wake loop.
pub(crate) type ComponentInbox = UnboundedReceiver<Envelope>;

/// A hook run on the component's own turn: `on_start`, `on_cycle`, `on_shutdown`.
pub type LifecycleHook<M> = Arc<dyn Fn(&mut ManagedComponent<Started, M>) + Send + Sync>;

/// A hook run when the runtime broadcasts global start; receives the master's address.
pub type GlobalStartHook<M> =
    Arc<dyn Fn(&mut ManagedComponent<Started, M>, &MessageAddress) + Send + Sync>;
