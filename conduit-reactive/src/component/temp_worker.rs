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
//! Short-lived components that run one job and stop.

use std::sync::Arc;

use acton_ern::Ern;
use tracing::{error, trace};

use crate::common::ComponentRuntime;
use crate::component::{ComponentConfig, Idle, ManagedComponent, Next, Pattern};
use crate::message::MessageAddress;
use crate::traits::ConduitMessage;

pub(crate) type Job<T> = Arc<dyn Fn() -> Result<T, String> + Send + Sync>;

/// Asks a worker to run its job.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RunJob;

/// Starts an unregistered worker that answers one [`RunJob`] and shuts down.
pub(crate) fn spawn<T: ConduitMessage + Clone>(runtime: &ComponentRuntime, job: Job<T>) -> MessageAddress {
    let name = runtime.config().defaults.worker_name.as_str();
    let id = Ern::with_root(name).unwrap_or_else(|e| {
        error!(name, error = %e, "invalid worker name");
        Ern::default()
    });
    let mut worker = ManagedComponent::<Idle, ()>::new(runtime, ComponentConfig::new(id), false);
    worker.on_content_of_type::<RunJob>(Pattern::Any, move |cx, ctx| {
        match job() {
            Ok(value) => ctx.reply(value),
            Err(detail) => {
                trace!(worker = %cx.id(), %detail, "job failed");
                ctx.fail(detail);
            }
        }
        Next::Shutdown
    });
    worker.start().reply_address()
}
