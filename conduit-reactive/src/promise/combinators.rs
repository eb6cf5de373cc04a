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
//! Aggregating promises.
//!
//! Aggregation state is created per compel and shared between the member
//! callbacks behind a `parking_lot::Mutex`: members of a generic context may be
//! settled from different threads. The lock is never held while a callback fires.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::promise::loops::{drive, Iteration};
use crate::promise::{Callback, Promise, Rejecter, Resolver};

/// One step of [`compose`].
pub type ComposeStep<T, E, C> = Arc<dyn Fn(&mut C, T) -> Promise<T, E, C> + Send + Sync>;

struct AllState<T, E, C> {
    results: Vec<Option<T>>,
    remaining: usize,
    resolve: Option<Resolver<Vec<T>, C>>,
    reject: Option<Rejecter<E, C>>,
}

impl<T, E, C> AllState<T, E, C> {
    fn record(&mut self, index: usize, value: T) -> Option<(Resolver<Vec<T>, C>, Vec<T>)> {
        // A failure already settled the aggregate.
        self.resolve.as_ref()?;
        self.results[index] = Some(value);
        self.remaining -= 1;
        if self.remaining > 0 {
            return None;
        }
        let resolve = self.resolve.take()?;
        Some((resolve, self.results.drain(..).flatten().collect()))
    }

    fn fail(&mut self) -> Option<Rejecter<E, C>> {
        self.resolve = None;
        self.reject.take()
    }
}

/// Resolves with every member's value, in input order, once all of them succeeded.
///
/// The first failure rejects the aggregate, which then never resolves. Members are
/// not cancelled; values that arrived before the failure stay in the aggregate's
/// private buffer and are never surfaced. An empty input resolves with an empty
/// vector.
pub fn all<T, E, C>(promises: Vec<Promise<T, E, C>>) -> Promise<Vec<T>, E, C>
where
    T: Send + 'static,
    E: Send + 'static,
    C: 'static,
{
    let members: Arc<[Promise<T, E, C>]> = promises.into();
    Promise::new(move |cx, resolve, reject| {
        if members.is_empty() {
            resolve.fire(cx, Vec::new());
            return;
        }
        let state = Arc::new(Mutex::new(AllState {
            results: members.iter().map(|_| None).collect(),
            remaining: members.len(),
            resolve: Some(resolve),
            reject: Some(reject),
        }));
        for (index, member) in members.iter().enumerate() {
            let on_success = {
                let state = Arc::clone(&state);
                Callback::new(move |cx: &mut C, value: T| {
                    let finished = state.lock().record(index, value);
                    if let Some((resolve, values)) = finished {
                        resolve.fire(cx, values);
                    }
                })
            };
            let on_failure = {
                let state = Arc::clone(&state);
                Callback::new(move |cx: &mut C, error: E| {
                    let reject = state.lock().fail();
                    if let Some(reject) = reject {
                        reject.fire(cx, error);
                    }
                })
            };
            member.compel_with(cx, on_success, on_failure);
        }
    })
}

struct SettledState<T, E, C> {
    outcomes: Vec<Option<Result<T, E>>>,
    remaining: usize,
    resolve: Option<Resolver<Vec<T>, C>>,
    reject: Option<Rejecter<Vec<E>, C>>,
}

type Settlement<T, E, C> = (Resolver<Vec<T>, C>, Vec<T>, Rejecter<Vec<E>, C>, Vec<E>);

impl<T, E, C> SettledState<T, E, C> {
    fn record(&mut self, index: usize, outcome: Result<T, E>) -> Option<Settlement<T, E, C>> {
        self.outcomes[index] = Some(outcome);
        self.remaining -= 1;
        if self.remaining > 0 {
            return None;
        }
        let resolve = self.resolve.take()?;
        let reject = self.reject.take()?;
        let mut successes = Vec::new();
        let mut failures = Vec::new();
        for outcome in self.outcomes.drain(..).flatten() {
            match outcome {
                Ok(value) => successes.push(value),
                Err(error) => failures.push(error),
            }
        }
        Some((resolve, successes, reject, failures))
    }
}

/// Waits until every member reported, then reports both sides.
///
/// The success channel always fires, with the successes in input order (possibly
/// none). When at least one member failed, the failure channel fires afterwards
/// with the failures in input order.
pub fn all_settled<T, E, C>(promises: Vec<Promise<T, E, C>>) -> Promise<Vec<T>, Vec<E>, C>
where
    T: Send + 'static,
    E: Send + 'static,
    C: 'static,
{
    let members: Arc<[Promise<T, E, C>]> = promises.into();
    Promise::new(move |cx, resolve, reject| {
        if members.is_empty() {
            resolve.fire(cx, Vec::new());
            return;
        }
        let state = Arc::new(Mutex::new(SettledState {
            outcomes: members.iter().map(|_| None).collect(),
            remaining: members.len(),
            resolve: Some(resolve),
            reject: Some(reject),
        }));
        for (index, member) in members.iter().enumerate() {
            let on_success = {
                let state = Arc::clone(&state);
                Callback::new(move |cx: &mut C, value: T| {
                    let settled = state.lock().record(index, Ok(value));
                    report_settled(cx, settled);
                })
            };
            let on_failure = {
                let state = Arc::clone(&state);
                Callback::new(move |cx: &mut C, error: E| {
                    let settled = state.lock().record(index, Err(error));
                    report_settled(cx, settled);
                })
            };
            member.compel_with(cx, on_success, on_failure);
        }
    })
}

fn report_settled<T: 'static, E: 'static, C: 'static>(
    cx: &mut C,
    settled: Option<Settlement<T, E, C>>,
) {
    if let Some((resolve, successes, reject, failures)) = settled {
        resolve.fire(cx, successes);
        if !failures.is_empty() {
            reject.fire(cx, failures);
        }
    }
}

/// Compels every member; the first to report, success or failure, settles the
/// result and later reports are ignored.
///
/// An empty input never settles.
pub fn race<T, E, C>(promises: Vec<Promise<T, E, C>>) -> Promise<T, E, C>
where
    T: Send + 'static,
    E: Send + 'static,
    C: 'static,
{
    let members: Arc<[Promise<T, E, C>]> = promises.into();
    Promise::new(move |cx, resolve, reject| {
        let outcome = Arc::new(Mutex::new(Some((resolve, reject))));
        for member in members.iter() {
            let on_success = {
                let outcome = Arc::clone(&outcome);
                Callback::new(move |cx: &mut C, value: T| {
                    let winner = outcome.lock().take();
                    if let Some((resolve, _)) = winner {
                        resolve.fire(cx, value);
                    }
                })
            };
            let on_failure = {
                let outcome = Arc::clone(&outcome);
                Callback::new(move |cx: &mut C, error: E| {
                    let winner = outcome.lock().take();
                    if let Some((_, reject)) = winner {
                        reject.fire(cx, error);
                    }
                })
            };
            member.compel_with(cx, on_success, on_failure);
        }
    })
}

/// Compels the members strictly one after another and collects their values in
/// order. The next member starts only after the previous one succeeded; the first
/// failure rejects and stops the sequence.
pub fn sequentially<T, E, C>(promises: Vec<Promise<T, E, C>>) -> Promise<Vec<T>, E, C>
where
    T: Send + 'static,
    E: Send + 'static,
    C: 'static,
{
    let members: Arc<[Promise<T, E, C>]> = promises.into();
    Promise::new(move |cx, resolve, reject| {
        let members = Arc::clone(&members);
        let collected: Arc<Mutex<Vec<T>>> = Arc::new(Mutex::new(Vec::with_capacity(members.len())));
        drive(
            cx,
            0_usize,
            move |_, index: usize| match members.get(index) {
                Some(member) => {
                    let collected = Arc::clone(&collected);
                    Iteration::Continue(member.map(move |value| {
                        collected.lock().push(value);
                        index + 1
                    }))
                }
                None => Iteration::Finish(std::mem::take(&mut *collected.lock())),
            },
            resolve,
            reject,
        );
    })
}

/// Threads a value through `steps`, each receiving the previous step's result.
pub fn compose<T, E, C>(initial: Promise<T, E, C>, steps: Vec<ComposeStep<T, E, C>>) -> Promise<T, E, C>
where
    T: Send + 'static,
    E: Send + 'static,
    C: 'static,
{
    steps.into_iter().fold(initial, |acc, step| {
        acc.and_then(move |cx, value| step(cx, value))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    type Timer = Box<dyn FnOnce(&mut Clock) + Send>;

    /// A test context whose time only moves when the test calls `tick`.
    #[derive(Default)]
    struct Clock {
        now: u32,
        timers: Vec<(u32, Timer)>,
        log: Vec<String>,
    }

    impl Clock {
        fn tick(&mut self) {
            self.now += 1;
            let now = self.now;
            let (due, later): (Vec<_>, Vec<_>) =
                std::mem::take(&mut self.timers).into_iter().partition(|(at, _)| *at <= now);
            self.timers = later;
            for (_, timer) in due {
                timer(self);
            }
        }

        fn run_for(&mut self, ticks: u32) {
            for _ in 0..ticks {
                self.tick();
            }
        }
    }

    fn succeed_after(ticks: u32, value: &'static str) -> Promise<&'static str, String, Clock> {
        Promise::new(move |cx: &mut Clock, resolve, _| {
            cx.log.push(format!("start {value}@{}", cx.now));
            let at = cx.now + ticks;
            cx.timers.push((at, Box::new(move |cx: &mut Clock| resolve.fire(cx, value))));
        })
    }

    fn fail_after(ticks: u32, error: &'static str) -> Promise<&'static str, String, Clock> {
        Promise::new(move |cx: &mut Clock, _, reject| {
            let at = cx.now + ticks;
            cx.timers.push((at, Box::new(move |cx: &mut Clock| reject.fire(cx, error.to_string()))));
        })
    }

    fn started(clock: &Clock) -> usize {
        clock.log.iter().filter(|line| line.starts_with("start")).count()
    }

    #[test]
    fn all_orders_by_input_position() {
        let mut clock = Clock::default();
        all(vec![succeed_after(2, "x"), succeed_after(1, "y")])
            .then(|cx, values| cx.log.push(format!("all {values:?}")))
            .compel(&mut clock);
        clock.run_for(2);
        assert_eq!(clock.log.last().map(String::as_str), Some(r#"all ["x", "y"]"#));
    }

    #[test]
    fn all_of_nothing_resolves_empty() {
        let mut clock = Clock::default();
        all::<&'static str, String, Clock>(Vec::new())
            .then(|cx, values| cx.log.push(format!("empty {}", values.len())))
            .compel(&mut clock);
        assert_eq!(clock.log, vec!["empty 0"]);
    }

    #[test]
    fn all_never_resolves_after_a_failure_while_all_settled_reports_both() {
        let members = || vec![succeed_after(1, "a"), fail_after(2, "b failed"), succeed_after(3, "c")];

        let mut clock = Clock::default();
        all(members())
            .then(|cx, values| cx.log.push(format!("all resolved {values:?}")))
            .on_error(|cx, e| cx.log.push(format!("all rejected {e}")))
            .compel(&mut clock);
        clock.run_for(5);
        let outcomes: Vec<_> = clock.log.iter().filter(|l| l.starts_with("all")).cloned().collect();
        assert_eq!(outcomes, vec!["all rejected b failed"]);

        let mut clock = Clock::default();
        all_settled(members())
            .then(|cx, values| cx.log.push(format!("ok {values:?}")))
            .on_error(|cx, errors| cx.log.push(format!("failed {errors:?}")))
            .compel(&mut clock);
        clock.run_for(2);
        assert!(clock.log.iter().all(|l| l.starts_with("start")));
        clock.run_for(1);
        let outcomes: Vec<_> = clock.log.iter().filter(|l| !l.starts_with("start")).cloned().collect();
        assert_eq!(outcomes, vec![r#"ok ["a", "c"]"#, r#"failed ["b failed"]"#]);
    }

    #[test]
    fn all_settled_without_failures_only_resolves() {
        let mut clock = Clock::default();
        all_settled(vec![succeed_after(1, "a"), succeed_after(1, "b")])
            .then(|cx, values| cx.log.push(format!("ok {}", values.len())))
            .on_error(|cx, _| cx.log.push("failed".into()))
            .compel(&mut clock);
        clock.run_for(3);
        assert_eq!(clock.log.last().map(String::as_str), Some("ok 2"));
        assert!(!clock.log.iter().any(|l| l == "failed"));
    }

    #[test]
    fn race_takes_the_first_report_only() {
        let mut clock = Clock::default();
        race(vec![succeed_after(3, "slow"), succeed_after(1, "fast"), fail_after(2, "late failure")])
            .then(|cx, v| cx.log.push(format!("won {v}")))
            .on_error(|cx, e| cx.log.push(format!("lost {e}")))
            .compel(&mut clock);
        clock.run_for(4);
        let outcomes: Vec<_> = clock.log.iter().filter(|l| !l.starts_with("start")).cloned().collect();
        assert_eq!(outcomes, vec!["won fast"]);
    }

    #[test]
    fn race_can_be_won_by_a_failure() {
        let mut clock = Clock::default();
        race(vec![succeed_after(2, "slow"), fail_after(1, "quick failure")])
            .then(|cx, v| cx.log.push(format!("won {v}")))
            .on_error(|cx, e| cx.log.push(format!("lost {e}")))
            .compel(&mut clock);
        clock.run_for(3);
        assert_eq!(clock.log.last().map(String::as_str), Some("lost quick failure"));
    }

    #[test]
    fn sequentially_starts_each_member_after_the_previous() {
        let mut clock = Clock::default();
        sequentially(vec![succeed_after(2, "a"), succeed_after(1, "b")])
            .then(|cx, values| cx.log.push(format!("done {values:?}")))
            .compel(&mut clock);
        assert_eq!(started(&clock), 1);
        clock.run_for(3);
        assert_eq!(clock.log, vec!["start a@0", "start b@2", r#"done ["a", "b"]"#]);
    }

    #[test]
    fn compose_feeds_each_step_the_previous_result() {
        let mut log: Vec<String> = Vec::new();
        let double: ComposeStep<u32, String, Vec<String>> = Arc::new(|log: &mut Vec<String>, v: u32| {
            log.push(format!("doubling {v}"));
            Promise::resolved(v * 2)
        });
        compose(Promise::resolved(3), vec![Arc::clone(&double), double])
            .then(|log, v| log.push(format!("result {v}")))
            .compel(&mut log);
        assert_eq!(log, vec!["doubling 3", "doubling 6", "result 12"]);
    }
}
