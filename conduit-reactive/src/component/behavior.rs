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
//! Pattern-matched dispatch tables.
//!
//! A [`Behavior`] is an ordered list of `(pattern, handler)` entries. The first
//! entry whose pattern matches an incoming envelope handles it; later entries
//! never see that message. A handler returns [`Next`] to keep the behavior,
//! replace it, or shut the component down.

use std::any::TypeId;
use std::fmt;
use std::sync::Arc;

use tracing::trace;

use crate::component::{ManagedComponent, Started};
use crate::message::{Envelope, Fault, MessageContext, PropertyQuery, Topic};
use crate::traits::{downcast_message, ConduitMessage};

/// A handler entry: runs on the component's turn with the matched envelope.
pub type Handler<M> = dyn Fn(&mut ManagedComponent<Started, M>, &Envelope) -> Next<M> + Send + Sync;

/// What a handler wants to happen after it returns.
pub enum Next<M> {
    /// Keep the current behavior.
    Same,
    /// Replace the behavior before the next message is dispatched.
    Become(Behavior<M>),
    /// Run the shutdown hook and stop.
    Shutdown,
}

impl<M> fmt::Debug for Next<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Same => f.write_str("Same"),
            Self::Become(behavior) => f.debug_tuple("Become").field(behavior).finish(),
            Self::Shutdown => f.write_str("Shutdown"),
        }
    }
}

/// Selects which envelopes an entry handles.
#[derive(Clone)]
pub enum Pattern {
    /// Every envelope.
    Any,
    /// Envelopes sent under this topic.
    Topic(Topic),
    /// Envelopes whose content has this concrete type.
    Content {
        /// The content type.
        type_id: TypeId,
        /// Its name, for logs.
        name: &'static str,
    },
    /// Envelopes the predicate accepts.
    Predicate(Arc<dyn Fn(&Envelope) -> bool + Send + Sync>),
}

impl Pattern {
    /// Matches envelopes whose content is a `T`.
    #[must_use]
    pub fn content<T: ConduitMessage>() -> Self {
        Self::Content {
            type_id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Matches envelopes sent under `topic`.
    pub fn topic(topic: impl Into<Topic>) -> Self {
        Self::Topic(topic.into())
    }

    /// Matches envelopes the predicate accepts.
    pub fn predicate(f: impl Fn(&Envelope) -> bool + Send + Sync + 'static) -> Self {
        Self::Predicate(Arc::new(f))
    }

    /// Whether this pattern selects `envelope`.
    #[must_use]
    pub fn matches(&self, envelope: &Envelope) -> bool {
        match self {
            Self::Any => true,
            Self::Topic(topic) => envelope.topic.as_ref() == Some(topic),
            Self::Content { type_id, .. } => envelope.content().as_any().type_id() == *type_id,
            Self::Predicate(accepts) => accepts(envelope),
        }
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("Any"),
            Self::Topic(topic) => f.debug_tuple("Topic").field(topic).finish(),
            Self::Content { name, .. } => f.debug_tuple("Content").field(name).finish(),
            Self::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

struct Entry<M> {
    pattern: Pattern,
    handler: Arc<Handler<M>>,
}

impl<M> Clone for Entry<M> {
    fn clone(&self) -> Self {
        Self {
            pattern: self.pattern.clone(),
            handler: Arc::clone(&self.handler),
        }
    }
}

/// An ordered dispatch table for components with model `M`.
///
/// Behaviors are values: builder methods return a new table, and clones share
/// their entries until one of them is extended.
pub struct Behavior<M> {
    entries: Arc<Vec<Entry<M>>>,
}

impl<M> Clone for Behavior<M> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

impl<M> Default for Behavior<M> {
    fn default() -> Self {
        Self {
            entries: Arc::new(Vec::new()),
        }
    }
}

impl<M> fmt::Debug for Behavior<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|entry| &entry.pattern))
            .finish()
    }
}

impl<M: Send + 'static> Behavior<M> {
    /// An empty behavior; every message goes unmatched.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the behavior has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Appends a raw entry that sees the whole envelope.
    #[must_use]
    pub fn define(
        mut self,
        pattern: Pattern,
        handler: impl Fn(&mut ManagedComponent<Started, M>, &Envelope) -> Next<M> + Send + Sync + 'static,
    ) -> Self {
        Arc::make_mut(&mut self.entries).push(Entry {
            pattern,
            handler: Arc::new(handler),
        });
        self
    }

    /// Appends an entry whose handler receives the erased content in a
    /// [`MessageContext`], ready for replies.
    #[must_use]
    pub fn on(
        self,
        pattern: Pattern,
        handler: impl Fn(&mut ManagedComponent<Started, M>, &MessageContext<Arc<dyn ConduitMessage>>) -> Next<M>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        self.define(pattern, move |cx, envelope| {
            let ctx = MessageContext::from_envelope(envelope, Arc::clone(&envelope.message));
            handler(cx, &ctx)
        })
    }

    /// Appends an entry that expects content of type `T`.
    ///
    /// If the pattern matches but the content is not a `T`, the sender receives a
    /// [`Fault`] describing the mismatch and the behavior stays as it is. Faults
    /// themselves are never answered this way.
    #[must_use]
    pub fn on_content_of_type<T: ConduitMessage + Clone>(
        self,
        pattern: Pattern,
        handler: impl Fn(&mut ManagedComponent<Started, M>, &MessageContext<T>) -> Next<M> + Send + Sync + 'static,
    ) -> Self {
        self.define(pattern, move |cx, envelope| {
            let content = envelope.content();
            if let Some(message) = downcast_message::<T>(content) {
                let ctx = MessageContext::from_envelope(envelope, message.clone());
                return handler(cx, &ctx);
            }
            let received = content.message_type_name();
            trace!(expected = std::any::type_name::<T>(), received, "content mismatch");
            if downcast_message::<Fault>(content).is_none() {
                MessageContext::from_envelope(envelope, ())
                    .reply(Fault::content_mismatch(std::any::type_name::<T>(), received));
            }
            Next::Same
        })
    }

    /// Answers [`PropertyQuery`] requests for `name` with whatever `supplier`
    /// reads from the model. A `None` leaves the query unanswered.
    #[must_use]
    pub fn serve_property<V: ConduitMessage>(
        self,
        name: impl Into<String>,
        supplier: impl Fn(&M) -> Option<V> + Send + Sync + 'static,
    ) -> Self {
        let name = name.into();
        let wanted = name.clone();
        let pattern = Pattern::predicate(move |envelope| {
            downcast_message::<PropertyQuery>(envelope.content()).is_some_and(|query| query.name == wanted)
        });
        self.define(pattern, move |cx, envelope| {
            match supplier(&cx.model) {
                Some(value) => MessageContext::from_envelope(envelope, ()).reply(value),
                None => trace!(property = %name, "property unavailable"),
            }
            Next::Same
        })
    }

    /// Appends every entry of `fallback` after this behavior's entries.
    #[must_use]
    pub fn or_else(mut self, fallback: &Self) -> Self {
        Arc::make_mut(&mut self.entries).extend(fallback.entries.iter().cloned());
        self
    }

    /// The handler of the first entry matching `envelope`.
    pub(crate) fn find(&self, envelope: &Envelope) -> Option<Arc<Handler<M>>> {
        self.entries
            .iter()
            .find(|entry| entry.pattern.matches(envelope))
            .map(|entry| Arc::clone(&entry.handler))
    }
}
