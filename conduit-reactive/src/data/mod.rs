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
//! Values that are handed between components either by value or by ticket.
//!
//! A [`Data::Ticket`] names the component that owns the value and the request
//! that fetches it. Retrieving it asks the owner again every time, so the
//! receiver always sees the owner's current value.

use std::sync::Arc;
use std::time::Duration;

use crate::message::MessageAddress;
use crate::promise::{ActorPromise, Promise};
use crate::traits::{ConduitMessage, Messenger};

/// A value of type `T`, either carried or obtainable from its owner.
#[derive(Debug, Clone)]
pub enum Data<T> {
    /// The value itself.
    Carried(T),
    /// A claim on a value another component owns.
    Ticket(Ticket),
}

/// Where a ticketed value lives and how to ask for it.
#[derive(Debug, Clone)]
pub struct Ticket {
    /// Type name of the value, for diagnostics.
    pub type_name: &'static str,
    /// The component that answers `request`.
    pub owner: MessageAddress,
    /// The message sent to the owner on each retrieval.
    pub request: Arc<dyn ConduitMessage>,
}

impl<T: ConduitMessage + Clone> Data<T> {
    /// Wraps a value.
    pub const fn carried(value: T) -> Self {
        Self::Carried(value)
    }

    /// A claim on the value `owner` replies with when sent `request`.
    pub fn ticket(owner: &MessageAddress, request: impl ConduitMessage) -> Self {
        Self::Ticket(Ticket {
            type_name: std::any::type_name::<T>(),
            owner: owner.clone(),
            request: Arc::new(request),
        })
    }

    /// Whether the value travels with this wrapper.
    #[must_use]
    pub const fn is_carried(&self) -> bool {
        matches!(self, Self::Carried(_))
    }

    /// A promise for the value. Carried values resolve immediately; tickets ask
    /// the owner on every compel and wait as long as it takes.
    #[must_use]
    pub fn retrieve<C: Messenger>(&self) -> ActorPromise<T, C> {
        self.fetch(None)
    }

    /// Like [`retrieve`](Data::retrieve), but a ticket fails with a timeout if the
    /// owner does not answer within `timeout`.
    #[must_use]
    pub fn retrieve_within<C: Messenger>(&self, timeout: Duration) -> ActorPromise<T, C> {
        self.fetch(Some(timeout))
    }

    fn fetch<C: Messenger>(&self, timeout: Option<Duration>) -> ActorPromise<T, C> {
        match self {
            Self::Carried(value) => Promise::resolved(value.clone()),
            Self::Ticket(ticket) => Promise::ask_erased(ticket.owner.clone(), Arc::clone(&ticket.request), timeout),
        }
    }
}
