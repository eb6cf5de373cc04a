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
use tokio::sync::mpsc::UnboundedSender;

use crate::setup::messages::{Join, Leave, Ping, Reading};

/// What a listener reports back to the test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Heard {
    Subscribed,
    Reading(u32),
    Alert,
}

/// Subscribes to a feed on start, and to more on [`Join`], and reports what it hears.
#[conduit_component]
pub struct Listener {
    pub subscriptions: Subscriptions,
}

impl Subscribing for Listener {
    fn subscriptions(&self) -> &Subscriptions {
        &self.subscriptions
    }

    fn subscriptions_mut(&mut self) -> &mut Subscriptions {
        &mut self.subscriptions
    }
}

impl Listener {
    pub fn spawn(
        runtime: &ComponentRuntime,
        feed: &MessageAddress,
        heard: UnboundedSender<Heard>,
    ) -> anyhow::Result<ComponentHandle> {
        let mut listener = runtime.new_component_with_name::<Listener>("listener")?;
        let feed = feed.clone();
        let on_start = heard.clone();
        let on_join = heard.clone();
        let on_reading = heard.clone();
        listener
            .on_start(move |cx| join(cx, &feed, on_start.clone()))
            .with_fragment(Subscriptions::behavior::<Listener>())
            .on_content_of_type::<Join>(Pattern::content::<Join>(), move |cx, ctx| {
                join(cx, &ctx.message().0, on_join.clone());
                Next::Same
            })
            .on_content_of_type::<Reading>(Pattern::content::<Reading>(), move |_, ctx| {
                let _ = on_reading.send(Heard::Reading(ctx.message().0));
                Next::Same
            })
            .on_content_of_type::<Ping>(Pattern::topic("alerts"), move |_, _| {
                let _ = heard.send(Heard::Alert);
                Next::Same
            })
            .on_content_of_type::<Leave>(Pattern::content::<Leave>(), |cx, _| {
                cx.unsubscribe_all();
                Next::Same
            });
        Ok(listener.start())
    }
}

/// Subscribes and reports [`Heard::Subscribed`] once acknowledged.
fn join(cx: &mut ManagedComponent<Started, Listener>, target: &MessageAddress, heard: UnboundedSender<Heard>) {
    Subscriptions::subscription::<Listener>(target)
        .then(move |_, _| {
            let _ = heard.send(Heard::Subscribed);
        })
        .compel(cx);
}
