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
use std::fmt;

/// Identifies one outstanding request of one requester.
///
/// Ids come from a per-component counter, so they are only unique together with the
/// requester's address. That is all routing needs: replies always go back to the
/// requester that minted the id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CorrelationId(pub(crate) u64);

impl CorrelationId {
    /// The raw counter value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How an envelope relates to a request/reply exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Correlation {
    /// A plain message.
    #[default]
    None,
    /// A request expecting exactly one reply tagged with the same id.
    Request(CorrelationId),
    /// The reply to the request with this id.
    Reply(CorrelationId),
}

impl Correlation {
    /// The correlation a reply to this envelope must carry.
    ///
    /// Replying to a plain message (or to a reply) yields a plain message.
    #[inline]
    #[must_use]
    pub const fn for_reply(self) -> Self {
        match self {
            Self::Request(id) => Self::Reply(id),
            Self::None | Self::Reply(_) => Self::None,
        }
    }

    /// Whether the sender is waiting for a correlated reply.
    #[inline]
    #[must_use]
    pub const fn is_request(self) -> bool {
        matches!(self, Self::Request(_))
    }
}
