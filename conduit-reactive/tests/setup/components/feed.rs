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

use crate::setup::messages::{Mute, Ping, Reading};

/// Publishes every [`Reading`] it receives; a [`Ping`] goes out under the `"alerts"` topic.
///
/// [`Mute`] switches to an empty behavior; subscription handling stays.
#[conduit_component]
pub struct Feed {
    pub publisher: Publisher,
}

impl Publishing for Feed {
    fn publisher(&self) -> &Publisher {
        &self.publisher
    }

    fn publisher_mut(&mut self) -> &mut Publisher {
        &mut self.publisher
    }
}

impl Feed {
    pub fn spawn(runtime: &ComponentRuntime) -> anyhow::Result<ComponentHandle> {
        let mut feed = runtime.new_component_with_name::<Feed>("feed")?;
        feed.with_fragment(Publisher::behavior::<Feed>())
            .on_content_of_type::<Reading>(Pattern::content::<Reading>(), |cx, ctx| {
                cx.broadcast(ctx.message().clone());
                Next::Same
            })
            .on_content_of_type::<Ping>(Pattern::content::<Ping>(), |cx, _| {
                cx.broadcast_on("alerts", Ping);
                Next::Same
            })
            .on_content_of_type::<Mute>(Pattern::content::<Mute>(), |_, _| Next::Become(Behavior::new()));
        Ok(feed.start())
    }
}
