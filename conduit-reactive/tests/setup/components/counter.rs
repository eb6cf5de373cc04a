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
use conduit_reactive::prelude::*;

use crate::setup::messages::{Reading, Tally};

/// Counts [`Tally`] messages and remembers the last [`Reading`].
#[conduit_component]
pub struct Counter {
    pub count: u32,
    pub last: Option<Reading>,
}

impl Counter {
    /// Serves `"count"` always and `"last_reading"` once a reading arrived.
    pub fn spawn(runtime: &ComponentRuntime) -> anyhow::Result<ComponentHandle> {
        let mut counter = runtime.new_component_with_name::<Counter>("counter")?;
        counter
            .on_content_of_type::<Tally>(Pattern::content::<Tally>(), |cx, _| {
                cx.model.count += 1;
                Next::Same
            })
            .on_content_of_type::<Reading>(Pattern::content::<Reading>(), |cx, ctx| {
                cx.model.last = Some(ctx.message().clone());
                Next::Same
            })
            .serve_property("count", |model: &Counter| Some(model.count))
            .serve_property("last_reading", |model: &Counter| model.last.clone());
        Ok(counter.start())
    }
}
