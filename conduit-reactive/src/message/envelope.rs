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
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use crate::message::{Correlation, MessageAddress};
use crate::traits::ConduitMessage;

/// An optional routing key carried next to the content.
///
/// Components match on topics with [`Pattern::Topic`](crate::component::Pattern::Topic)
/// when the content type alone does not say what a message is for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Topic(Cow<'static, str>);

impl Topic {
    /// Creates a topic from a static or owned string.
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    /// The topic name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for Topic {
    fn from(value: &'static str) -> Self {
        Self(Cow::Borrowed(value))
    }
}

impl From<String> for Topic {
    fn from(value: String) -> Self {
        Self(Cow::Owned(value))
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A message in transit between two components.
#[derive(Debug, Clone)]
pub struct Envelope {
    /// The type-erased content.
    pub message: Arc<dyn ConduitMessage>,
    /// Where replies go.
    pub reply_to: MessageAddress,
    /// The component the envelope was addressed to.
    pub recipient: MessageAddress,
    /// Request/reply bookkeeping.
    pub correlation: Correlation,
    /// Optional routing key.
    pub topic: Option<Topic>,
}

impl Envelope {
    /// Creates a plain, untopical envelope.
    pub fn new(
        message: Arc<dyn ConduitMessage>,
        reply_to: MessageAddress,
        recipient: MessageAddress,
    ) -> Self {
        Self {
            message,
            reply_to,
            recipient,
            correlation: Correlation::None,
            topic: None,
        }
    }

    /// Sets the correlation.
    #[must_use]
    pub const fn with_correlation(mut self, correlation: Correlation) -> Self {
        self.correlation = correlation;
        self
    }

    /// Sets the topic.
    #[must_use]
    pub fn with_topic(mut self, topic: Option<Topic>) -> Self {
        self.topic = topic;
        self
    }

    /// The content as a trait object.
    ///
    /// Always go through this (or an explicit `&*`) before calling
    /// [`ConduitMessage`] methods: `Arc<dyn ConduitMessage>` implements the trait
    /// itself and would report its own type.
    #[inline]
    #[must_use]
    pub fn content(&self) -> &dyn ConduitMessage {
        &*self.message
    }
}
