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
/// A request for the named value a component serves through
/// [`Behavior::serve_property`](crate::component::Behavior::serve_property).
///
/// If the property is currently unavailable the owner sends nothing back.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PropertyQuery {
    /// The property name.
    pub name: String,
}

impl PropertyQuery {
    /// Creates a query for `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}
