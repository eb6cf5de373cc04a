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
#![allow(dead_code)]

use std::sync::Once;
use std::time::Duration;

use conduit_reactive::prelude::*;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};
use tracing::Level;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

pub mod components;
pub mod messages;

// Ensures tracing initialization happens only once across all tests.
static INIT: Once = Once::new();

/// How long a test waits for an observation before failing.
pub const PATIENCE: Duration = Duration::from_secs(2);

/// Installs a compact trace-level subscriber writing to `logs/conduit_tests.txt`.
pub fn initialize_tracing() {
    INIT.call_once(|| {
        std::fs::create_dir_all("logs").expect("could not create logs dir");

        let file_appender = RollingFileAppender::new(Rotation::NEVER, "logs", "conduit_tests.txt");
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        // Leak the guard so the writer lives until process exit
        Box::leak(Box::new(guard));

        let filter = EnvFilter::new("trace")
            .add_directive("conduit_reactive::component=trace".parse().unwrap())
            .add_directive("conduit_reactive::message=trace".parse().unwrap())
            .add_directive("tokio=info".parse().unwrap())
            .add_directive(tracing_subscriber::filter::LevelFilter::TRACE.into());

        let subscriber = FmtSubscriber::builder()
            .with_span_events(FmtSpan::NONE)
            .with_max_level(Level::TRACE)
            .compact()
            .with_line_number(true)
            .without_time()
            .with_target(true)
            .with_env_filter(filter)
            .with_writer(non_blocking)
            .finish();

        tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
    });
}

/// Waits for the next observation on `rx`.
pub async fn next<T>(rx: &mut UnboundedReceiver<T>) -> T {
    tokio::time::timeout(PATIENCE, rx.recv())
        .await
        .expect("timed out waiting for an observation")
        .expect("observation channel closed")
}

/// Asserts that nothing arrives on `rx` for a little while.
pub async fn assert_quiet<T: std::fmt::Debug>(rx: &mut UnboundedReceiver<T>) {
    if let Ok(Some(unexpected)) = tokio::time::timeout(Duration::from_millis(150), rx.recv()).await {
        panic!("unexpected observation: {unexpected:?}");
    }
}

/// Sends `message` to `target` from a throwaway requester component and returns the outcome.
///
/// The requester shuts itself down once the request settles.
pub async fn ask_once<T, Q>(
    runtime: &ComponentRuntime,
    target: &MessageAddress,
    message: Q,
    bound: Duration,
) -> Result<T, ReplyError>
where
    T: ConduitMessage + Clone,
    Q: ConduitMessage + Clone,
{
    let (tx, mut rx) = unbounded_channel::<Result<T, ReplyError>>();
    let target = target.clone();
    let mut requester = runtime.new_component_with_name::<()>("requester").expect("valid name");
    requester.on_start(move |cx| {
        let on_value = tx.clone();
        let on_failure = tx.clone();
        ActorPromise::<T, ManagedComponent<Started, ()>>::ask_within(&target, message.clone(), bound)
            .then(move |cx, value: &T| {
                let _ = on_value.send(Ok(value.clone()));
                cx.request_shutdown();
            })
            .on_error(move |cx, error: &ReplyError| {
                let _ = on_failure.send(Err(error.clone()));
                cx.request_shutdown();
            })
            .compel(cx);
    });
    requester.start();
    next(&mut rx).await
}

/// Asks `target` for a property from a throwaway requester.
pub async fn query_once<T: ConduitMessage + Clone>(
    runtime: &ComponentRuntime,
    target: &MessageAddress,
    name: &str,
    bound: Duration,
) -> Result<T, ReplyError> {
    ask_once(runtime, target, PropertyQuery::new(name), bound).await
}
