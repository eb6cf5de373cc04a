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
//! Two-outcome, lazily started, composable promises.
//!
//! [`Promise`] is independent of components: any context type `C` works, which is
//! how the unit tests drive it. [`ActorPromise`] binds it to a
//! [`Messenger`](crate::traits::Messenger) so a correlated request becomes a
//! promise for its reply.

pub use actor_promise::ActorPromise;
pub use callback::{Callback, Rejecter, Resolver};
pub use combinators::{all, all_settled, compose, race, sequentially, ComposeStep};
pub use loops::{async_feedback_for, async_for, async_while, drive, Iteration, Unit};
pub use promise::Promise;

mod actor_promise;
mod callback;
mod combinators;
mod loops;
#[allow(clippy::module_inception)]
mod promise;
