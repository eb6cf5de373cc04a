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
use std::sync::Arc;

use tracing::trace;

use crate::common::conduit_inner::ConduitInner;
use crate::common::{ComponentRuntime, ConduitConfig};

/// Entry point for starting a Conduit runtime.
///
/// ```rust,ignore
/// use conduit_reactive::prelude::*;
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let runtime = ConduitApp::launch();
///     let mut counter = runtime.new_component::<u32>();
///     counter.on_content_of_type::<u32>(Pattern::Any, |cx, ctx| {
///         cx.model += ctx.message();
///         Next::Same
///     });
///     counter.start().send(5_u32);
///     runtime.shutdown_all().await
/// }
/// ```
#[derive(Default, Debug, Clone)]
pub struct ConduitApp;

impl ConduitApp {
    /// Starts a runtime with configuration loaded from the XDG locations.
    #[must_use]
    pub fn launch() -> ComponentRuntime {
        trace!("Starting Conduit runtime");
        let config = ConduitConfig::load();
        trace!("Configuration loaded: {:?}", config);
        Self::launch_with_config(config)
    }

    /// Starts a runtime with an explicit configuration.
    #[must_use]
    pub fn launch_with_config(config: ConduitConfig) -> ComponentRuntime {
        ComponentRuntime(Arc::new(ConduitInner::new(config)))
    }
}
