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

/// Acknowledges subscriptions but never answers an unsubscribe.
#[conduit_component]
pub struct OneWay;

impl OneWay {
    pub fn spawn(runtime: &ComponentRuntime) -> anyhow::Result<ComponentHandle> {
        let mut one_way = runtime.new_component_with_name::<OneWay>("one-way")?;
        one_way.on_content_of_type::<Subscribe>(Pattern::content::<Subscribe>(), |_, ctx| {
            ctx.reply(SubscribeAck);
            Next::Same
        });
        Ok(one_way.start())
    }
}
