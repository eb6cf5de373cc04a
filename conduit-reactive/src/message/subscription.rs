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
//! Subscription protocol messages. Every request is acknowledged immediately.

/// Asks a publisher to add the sender to its subscriber set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Subscribe;

/// Confirms a [`Subscribe`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubscribeAck;

/// Asks a publisher to remove the sender from its subscriber set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Unsubscribe;

/// Confirms an [`Unsubscribe`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnsubscribeAck;
