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
use std::time::Duration;

use crate::message::Fault;

/// Why an [`ActorPromise`](crate::promise::ActorPromise) was rejected.
///
/// A content mismatch on the responder's side arrives here as
/// [`Remote`](ReplyError::Remote) with
/// [`FaultKind::ContentMismatch`](crate::message::FaultKind::ContentMismatch),
/// because the responder's dispatch answers it with a [`Fault`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyError {
    /// The responder answered with a [`Fault`].
    Remote(Fault),
    /// A reply arrived but its content was not the expected type.
    UnexpectedReply {
        /// The type the requester asked for.
        expected: &'static str,
        /// The type that arrived.
        received: &'static str,
    },
    /// No reply arrived in time. A later reply is ignored.
    Timeout {
        /// The bound that expired.
        after: Duration,
    },
}

impl fmt::Display for ReplyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote(fault) => write!(f, "remote error: {fault}"),
            Self::UnexpectedReply { expected, received } => {
                write!(f, "unexpected reply: expected {expected}, received {received}")
            }
            Self::Timeout { after } => write!(f, "no reply within {after:?}"),
        }
    }
}

impl std::error::Error for ReplyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Remote(fault) => Some(fault),
            Self::UnexpectedReply { .. } | Self::Timeout { .. } => None,
        }
    }
}
