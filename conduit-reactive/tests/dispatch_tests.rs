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
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use conduit_reactive::prelude::*;
use conduit_test::prelude::*;
use tokio::sync::mpsc::{unbounded_channel, UnboundedSender};

use crate::setup::messages::{Ping, Reading, Tally};
use crate::setup::{assert_quiet, initialize_tracing, next, ask_once, PATIENCE};

mod setup;

/// A behavior that reports `label` for every [`Ping`].
fn reporting(label: &'static str, tx: UnboundedSender<&'static str>) -> Behavior<()> {
    Behavior::new().on_content_of_type::<Ping>(Pattern::content::<Ping>(), move |_, _| {
        let _ = tx.send(label);
        Next::Same
    })
}

/// The first entry whose pattern matches handles the message; later entries never see it.
#[conduit_test]
async fn first_matching_entry_wins() -> anyhow::Result<()> {
    initialize_tracing();
    let runtime = ConduitApp::launch();
    let (tx, mut rx) = unbounded_channel::<&'static str>();

    let mut router = runtime.new_component_with_name::<()>("router")?;
    let (first, shadowed, fallback) = (tx.clone(), tx.clone(), tx);
    router
        .on_content_of_type::<Ping>(Pattern::content::<Ping>(), move |_, _| {
            let _ = first.send("first");
            Next::Same
        })
        .on_content_of_type::<Ping>(Pattern::content::<Ping>(), move |_, _| {
            let _ = shadowed.send("shadowed");
            Next::Same
        })
        .on(Pattern::Any, move |_, _| {
            let _ = fallback.send("fallback");
            Next::Same
        });
    let router = router.start();

    router.send(Ping);
    router.send(Tally);
    assert_eq!(next(&mut rx).await, "first");
    assert_eq!(next(&mut rx).await, "fallback");
    assert_quiet(&mut rx).await;

    runtime.shutdown_all().await
}

/// A handler's own `Become` wins over a change it requested through the slot.
#[conduit_test]
async fn returned_transition_beats_requested_one() -> anyhow::Result<()> {
    initialize_tracing();
    let runtime = ConduitApp::launch();
    let (tx, mut rx) = unbounded_channel::<&'static str>();

    let mut switcher = runtime.new_component_with_name::<()>("switcher")?;
    let requested = reporting("requested", tx.clone());
    let direct = reporting("direct", tx);
    switcher.on_content_of_type::<Ping>(Pattern::content::<Ping>(), move |cx, _| {
        cx.change_behavior(requested.clone());
        Next::Become(direct.clone())
    });
    let switcher = switcher.start();

    switcher.send(Ping);
    switcher.send(Ping);
    assert_eq!(next(&mut rx).await, "direct");

    runtime.shutdown_all().await
}

/// A handler returning `Same` leaves the requested change in effect.
#[conduit_test]
async fn requested_transition_applies_when_handler_returns_same() -> anyhow::Result<()> {
    initialize_tracing();
    let runtime = ConduitApp::launch();
    let (tx, mut rx) = unbounded_channel::<&'static str>();

    let mut switcher = runtime.new_component_with_name::<()>("switcher")?;
    let requested = reporting("requested", tx);
    switcher.on_content_of_type::<Ping>(Pattern::content::<Ping>(), move |cx, _| {
        cx.change_behavior(requested.clone());
        Next::Same
    });
    let switcher = switcher.start();

    switcher.send(Ping);
    switcher.send(Ping);
    assert_eq!(next(&mut rx).await, "requested");

    runtime.shutdown_all().await
}

/// A typed entry that matches by pattern but not by content answers the sender with a mismatch fault.
#[conduit_test]
async fn content_mismatch_is_answered_with_a_fault() -> anyhow::Result<()> {
    initialize_tracing();
    let runtime = ConduitApp::launch();

    let mut strict = runtime.new_component_with_name::<()>("strict")?;
    strict.on_content_of_type::<Ping>(Pattern::Any, |_, _| Next::Same);
    let strict = strict.start();

    let outcome = ask_once::<Reading, Tally>(&runtime, &strict.reply_address(), Tally, PATIENCE).await;
    match outcome {
        Err(ReplyError::Remote(Fault {
            kind: FaultKind::ContentMismatch { expected, received },
            ..
        })) => {
            assert!(expected.ends_with("Ping"), "expected {expected}");
            assert!(received.ends_with("Tally"), "received {received}");
        }
        other => panic!("expected a content mismatch, got {other:?}"),
    }

    runtime.shutdown_all().await
}

/// On a mismatch the typed handler never runs and the sender gets exactly one fault.
#[conduit_test]
async fn content_mismatch_skips_the_handler_and_faults_once() -> anyhow::Result<()> {
    initialize_tracing();
    let runtime = ConduitApp::launch();
    let handled = Arc::new(AtomicUsize::new(0));
    let (tx, mut faults) = unbounded_channel::<FaultKind>();

    let mut strict = runtime.new_component_with_name::<()>("strict")?;
    let calls = Arc::clone(&handled);
    strict.on_content_of_type::<Ping>(Pattern::Any, move |_, _| {
        calls.fetch_add(1, Ordering::SeqCst);
        Next::Same
    });
    let strict = strict.start().reply_address();

    let mut sender = runtime.new_component_with_name::<()>("sender")?;
    sender
        .on_start(move |cx| cx.send(&strict, Tally))
        .on_content_of_type::<Fault>(Pattern::content::<Fault>(), move |_, ctx| {
            let _ = tx.send(ctx.message().kind.clone());
            Next::Same
        });
    sender.start();

    match next(&mut faults).await {
        FaultKind::ContentMismatch { expected, .. } => assert!(expected.ends_with("Ping"), "expected {expected}"),
        other => panic!("expected a content mismatch, got {other:?}"),
    }
    assert_quiet(&mut faults).await;
    assert_eq!(handled.load(Ordering::SeqCst), 0);

    runtime.shutdown_all().await
}

/// Topic patterns route on the envelope's topic, not its content.
#[conduit_test]
async fn topic_patterns_route_by_topic() -> anyhow::Result<()> {
    initialize_tracing();
    let runtime = ConduitApp::launch();
    let (tx, mut rx) = unbounded_channel::<String>();

    let mut sink = runtime.new_component_with_name::<()>("sink")?;
    let (metrics, other) = (tx.clone(), tx);
    sink.on_content_of_type::<Reading>(Pattern::topic("metrics"), move |_, ctx| {
        let topic = ctx.topic().map(Topic::to_string).unwrap_or_default();
        let _ = metrics.send(format!("{topic}:{}", ctx.message().0));
        Next::Same
    })
    .on_content_of_type::<Reading>(Pattern::Any, move |_, ctx| {
        let _ = other.send(format!("plain:{}", ctx.message().0));
        Next::Same
    });
    let sink = sink.start();

    sink.send_on("metrics", Reading(1));
    sink.send(Reading(2));
    assert_eq!(next(&mut rx).await, "metrics:1");
    assert_eq!(next(&mut rx).await, "plain:2");

    runtime.shutdown_all().await
}

/// The shutdown hook runs exactly once, and transitions it requests are ignored.
#[conduit_test]
async fn shutdown_hook_runs_once() -> anyhow::Result<()> {
    initialize_tracing();
    let runtime = ConduitApp::launch();
    let shutdowns = Arc::new(AtomicUsize::new(0));
    let (tx, mut rx) = unbounded_channel::<&'static str>();

    let mut worker = runtime.new_component_with_name::<()>("worker")?;
    let hook_count = Arc::clone(&shutdowns);
    let after = reporting("after shutdown", tx);
    worker
        .on_content_of_type::<Tally>(Pattern::content::<Tally>(), |cx, _| {
            cx.request_shutdown();
            Next::Same
        })
        .on_shutdown(move |cx| {
            hook_count.fetch_add(1, Ordering::SeqCst);
            cx.change_behavior(after.clone());
        });
    let worker = worker.start();

    worker.send(Tally);
    worker.send(Ping);
    worker.tracker().wait().await;
    worker.stop().await?;

    assert_eq!(shutdowns.load(Ordering::SeqCst), 1);
    assert!(worker.reply_address().is_closed());
    assert!(worker.try_send(Ping).is_err());
    assert_quiet(&mut rx).await;
    assert_eq!(runtime.component_count(), 0);
    Ok(())
}

/// Messages arrive in the order a single sender sent them.
#[conduit_test]
async fn messages_are_handled_one_at_a_time_in_order() -> anyhow::Result<()> {
    initialize_tracing();
    let runtime = ConduitApp::launch();
    let (tx, mut rx) = unbounded_channel::<u32>();

    let mut sink = runtime.new_component_with_name::<Vec<u32>>("ordered")?;
    sink.on_content_of_type::<Reading>(Pattern::content::<Reading>(), move |cx, ctx| {
        cx.model.push(ctx.message().0);
        if cx.model.len() == 100 {
            let _ = tx.send(cx.model.iter().sum());
        }
        Next::Same
    });
    let sink = sink.start();
    for value in 1..=100 {
        sink.send(Reading(value));
    }
    assert_eq!(next(&mut rx).await, 5050);

    runtime.shutdown_all().await
}
