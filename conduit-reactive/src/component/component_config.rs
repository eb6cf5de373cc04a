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
use std::time::Duration;

use acton_ern::Ern;

/// Identity and scheduling options for a new component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentConfig {
    id: Ern,
    cycle_interval: Option<Duration>,
}

impl ComponentConfig {
    /// A configuration with the given identity and no tick.
    #[must_use]
    pub const fn new(id: Ern) -> Self {
        Self {
            id,
            cycle_interval: None,
        }
    }

    /// A configuration whose identity root is `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if `name` is not a valid identity root.
    pub fn new_with_name(name: impl Into<String>) -> anyhow::Result<Self> {
        Ok(Self::new(Ern::with_root(name.into())?))
    }

    /// Makes the component tick-driven: `on_cycle` runs once per `period`.
    #[must_use]
    pub fn with_cycle(mut self, period: Duration) -> Self {
        self.cycle_interval = Some(period);
        self
    }

    /// The identity.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> &Ern {
        &self.id
    }

    /// The tick period, if any.
    #[inline]
    #[must_use]
    pub const fn cycle_interval(&self) -> Option<Duration> {
        self.cycle_interval
    }
}
