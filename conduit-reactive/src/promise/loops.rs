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
//! Loop constructs over promises.
//!
//! Every loop runs on a trampoline ([`drive`]): an iteration whose promise settles
//! synchronously hands its state back to the running driver instead of recursing,
//! so the stack stays flat no matter how many iterations complete in one turn. An
//! iteration that settles later (on a reply, say) resumes the driver from that
//! callback.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::promise::{Callback, Promise, Rejecter, Resolver};

/// The success type of promises that only signal completion.
pub type Unit = ();

/// What one loop step decided.
pub enum Iteration<S, T, E, C> {
    /// Run this promise; its success value is the next step's state.
    Continue(Promise<S, E, C>),
    /// Stop and resolve the loop with this value.
    Finish(T),
}

type StepFn<S, T, E, C> = dyn Fn(&mut C, S) -> Iteration<S, T, E, C> + Send + Sync;

struct DriverState<S, T, E, C> {
    pending: Option<S>,
    running: bool,
    resolve: Option<Resolver<T, C>>,
    reject: Option<Rejecter<E, C>>,
}

/// Runs `step` from `seed` until it finishes or one of its promises fails.
///
/// The first failure rejects the loop and stops it.
pub fn drive<S, T, E, C>(
    cx: &mut C,
    seed: S,
    step: impl Fn(&mut C, S) -> Iteration<S, T, E, C> + Send + Sync + 'static,
    resolve: Resolver<T, C>,
    reject: Rejecter<E, C>,
) where
    S: Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
    C: 'static,
{
    let step: Arc<StepFn<S, T, E, C>> = Arc::new(step);
    let state = Arc::new(Mutex::new(DriverState {
        pending: Some(seed),
        running: true,
        resolve: Some(resolve),
        reject: Some(reject),
    }));
    run(cx, &state, &step);
}

fn run<S, T, E, C>(
    cx: &mut C,
    state: &Arc<Mutex<DriverState<S, T, E, C>>>,
    step: &Arc<StepFn<S, T, E, C>>,
) where
    S: Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
    C: 'static,
{
    loop {
        let current = {
            let mut guard = state.lock();
            match guard.pending.take() {
                Some(current) => current,
                None => {
                    // Parked until an outstanding iteration settles.
                    guard.running = false;
                    return;
                }
            }
        };

        match (**step)(cx, current) {
            Iteration::Finish(value) => {
                let resolve = state.lock().resolve.take();
                if let Some(resolve) = resolve {
                    resolve.fire(cx, value);
                }
                return;
            }
            Iteration::Continue(promise) => {
                let on_value = {
                    let state = Arc::clone(state);
                    let step = Arc::clone(step);
                    Callback::new(move |cx: &mut C, next: S| {
                        let resume = {
                            let mut guard = state.lock();
                            guard.pending = Some(next);
                            if guard.running {
                                false
                            } else {
                                guard.running = true;
                                true
                            }
                        };
                        if resume {
                            run(cx, &state, &step);
                        }
                    })
                };
                let on_error = {
                    let state = Arc::clone(state);
                    Callback::new(move |cx: &mut C, error: E| {
                        let reject = state.lock().reject.take();
                        if let Some(reject) = reject {
                            reject.fire(cx, error);
                        }
                    })
                };
                promise.compel_with(cx, on_value, on_error);
            }
        }
    }
}

/// Compels `guard` repeatedly for as long as it resolves `true`.
///
/// The guard is where the loop's work happens; it decides after each round whether
/// another one is needed.
pub fn async_while<E, C>(
    guard: impl Fn(&mut C) -> Promise<bool, E, C> + Send + Sync + 'static,
) -> Promise<Unit, E, C>
where
    E: Send + 'static,
    C: 'static,
{
    let guard = Arc::new(guard);
    Promise::new(move |cx, resolve, reject| {
        let guard = Arc::clone(&guard);
        drive(
            cx,
            true,
            move |cx, keep_going: bool| {
                if keep_going {
                    Iteration::Continue(guard(cx))
                } else {
                    Iteration::Finish(())
                }
            },
            resolve,
            reject,
        );
    })
}

/// A counted loop: runs `body(index)` one at a time while `guard(index)` holds,
/// advancing the index with `step`.
pub fn async_for<E, C>(
    start: usize,
    guard: impl Fn(usize) -> bool + Send + Sync + 'static,
    step: impl Fn(usize) -> usize + Send + Sync + 'static,
    body: impl Fn(&mut C, usize) -> Promise<Unit, E, C> + Send + Sync + 'static,
) -> Promise<Unit, E, C>
where
    E: Send + 'static,
    C: 'static,
{
    let guard = Arc::new(guard);
    let step = Arc::new(step);
    let body = Arc::new(body);
    Promise::new(move |cx, resolve, reject| {
        let guard = Arc::clone(&guard);
        let step = Arc::clone(&step);
        let body = Arc::clone(&body);
        drive(
            cx,
            start,
            move |cx, index: usize| {
                if !guard(index) {
                    return Iteration::Finish(());
                }
                let step = Arc::clone(&step);
                Iteration::Continue(body(cx, index).map(move |()| step(index)))
            },
            resolve,
            reject,
        );
    })
}

/// Runs `body` `n` times, feeding each round's result into the next.
///
/// Resolves with the last result, or with `initial` when `n` is zero.
pub fn async_feedback_for<T, E, C>(
    initial: T,
    n: usize,
    body: impl Fn(&mut C, usize, T) -> Promise<T, E, C> + Send + Sync + 'static,
) -> Promise<T, E, C>
where
    T: Clone + Send + Sync + 'static,
    E: Send + 'static,
    C: 'static,
{
    let body = Arc::new(body);
    Promise::new(move |cx, resolve, reject| {
        let body = Arc::clone(&body);
        drive(
            cx,
            (0_usize, initial.clone()),
            move |cx, (index, value): (usize, T)| {
                if index >= n {
                    Iteration::Finish(value)
                } else {
                    Iteration::Continue(body(cx, index, value).map(move |next| (index + 1, next)))
                }
            },
            resolve,
            reject,
        );
    })
}
