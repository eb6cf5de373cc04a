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
#![allow(dead_code)]

use conduit_reactive::prelude::*;

#[conduit_message]
pub struct Ping;

#[conduit_message]
pub struct Pong;

/// Increments a counter.
#[conduit_message]
pub struct Tally;

#[conduit_message]
#[derive(PartialEq, Eq)]
pub struct Reading(pub u32);

/// Asks a responder to answer with a failure.
#[conduit_message]
pub struct Explode;

/// Lets a holding responder answer the request it kept back.
#[conduit_message]
pub struct Release;

/// Asks a listener to drop all of its subscriptions.
#[conduit_message]
pub struct Leave;

/// Asks a listener to subscribe to one more publisher.
#[conduit_message]
pub struct Join(pub MessageAddress);

/// Makes a feed stop publishing.
#[conduit_message]
pub struct Mute;
