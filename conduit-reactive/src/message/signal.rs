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
use std::fmt::Debug;
use std::time::Duration;

use crate::message::{CorrelationId, MessageAddress};

/// Control signals understood by every component regardless of its behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SystemSignal {
    /// Stop after the current message; the shutdown hook runs once.
    Terminate,
    /// The pipeline is wired; runs the `on_global_start` hook with the master's address.
    GlobalStart(MessageAddress),
}

/// Self-addressed notice that a bounded request ran out of time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CorrelationExpired {
    pub(crate) id: CorrelationId,
    pub(crate) after: Duration,
}
