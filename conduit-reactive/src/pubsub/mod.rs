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
//! Subscribe/acknowledge protocol as reusable behavior fragments.
//!
//! A publishing component keeps a [`Publisher`] in its model and installs
//! [`Publisher::behavior`] with
//! [`with_fragment`](crate::component::ManagedComponent::with_fragment), so
//! behavior changes never drop the acknowledgements; a subscribing component
//! keeps [`Subscriptions`] and calls
//! [`subscribe`](crate::component::ManagedComponent::subscribe).

pub use publisher::{Publisher, Publishing};
pub use subscriptions::{Subscribing, Subscriptions};

mod publisher;
mod subscriptions;
