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

use crate::setup::messages::{Explode, Ping, Pong, Release};

/// Answers [`Ping`] with [`Pong`] and [`Explode`] with a failure.
///
/// A holding echo keeps the first ping unanswered until it receives [`Release`].
#[conduit_component]
pub struct Echo {
    pub held: Option<MessageContext<Ping>>,
}

impl Echo {
    pub fn spawn(runtime: &ComponentRuntime) -> anyhow::Result<ComponentHandle> {
        let mut echo = runtime.new_component_with_name::<Echo>("echo")?;
        echo.on_content_of_type::<Ping>(Pattern::content::<Ping>(), |_, ctx| {
            ctx.reply(Pong);
            Next::Same
        })
        .on_content_of_type::<Explode>(Pattern::content::<Explode>(), |_, ctx| {
            ctx.fail("exploded on request");
            Next::Same
        });
        Ok(echo.start())
    }

    pub fn spawn_holding(runtime: &ComponentRuntime) -> anyhow::Result<ComponentHandle> {
        let mut echo = runtime.new_component_with_name::<Echo>("holding-echo")?;
        echo.on_content_of_type::<Ping>(Pattern::content::<Ping>(), |cx, ctx| {
            cx.model.held = Some(ctx.clone());
            Next::Same
        })
        .on_content_of_type::<Release>(Pattern::content::<Release>(), |cx, _| {
            if let Some(held) = cx.model.held.take() {
                held.reply(Pong);
            }
            Next::Same
        });
        Ok(echo.start())
    }
}
