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

/// Why a [`Fault`] was sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FaultKind {
    /// The receiving handler expected a different content type.
    ContentMismatch {
        /// Type the handler was registered for.
        expected: &'static str,
        /// Type that actually arrived.
        received: &'static str,
    },
    /// A handler (or temporary worker job) reported failure.
    Failed,
}

/// An error-classified reply.
///
/// A requester waiting through [`Promise::ask`](crate::promise::Promise::ask)
/// sees it as [`ReplyError::Remote`](crate::common::ReplyError::Remote).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fault {
    /// Classification.
    pub kind: FaultKind,
    /// Human readable detail.
    pub detail: String,
}

impl Fault {
    /// A content type mismatch report.
    #[must_use]
    pub fn content_mismatch(expected: &'static str, received: &'static str) -> Self {
        Self {
            kind: FaultKind::ContentMismatch { expected, received },
            detail: format!("expected content of type {expected}, received {received}"),
        }
    }

    /// A generic failure report.
    pub fn failed(detail: impl Into<String>) -> Self {
        Self {
            kind: FaultKind::Failed,
            detail: detail.into(),
        }
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            FaultKind::ContentMismatch { .. } => write!(f, "content mismatch: {}", self.detail),
            FaultKind::Failed => write!(f, "failed: {}", self.detail),
        }
    }
}

impl std::error::Error for Fault {}
