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
use std::fmt;
use std::sync::Arc;

use crate::promise::{Callback, Rejecter, Resolver};

type Initializer<T, E, C> = dyn Fn(&mut C, Resolver<T, C>, Rejecter<E, C>) + Send + Sync;

/// A lazily started operation with a success channel `T` and a failure channel `E`.
///
/// A promise is only a description: nothing runs until [`compel`](Promise::compel)
/// is called with a context `C`, and every call runs the initializer again. There
/// is no cached outcome. Combinators never mutate the promise they are called on;
/// they return a new promise that shares the initializer and extends the callback
/// chain, so a promise can be stored, cloned and derived from freely.
///
/// Callbacks receive `&mut C`. Inside a component, `C` is the running
/// [`ManagedComponent`](crate::component::ManagedComponent), so continuations can
/// update the model without locking: replies are processed on the component's own
/// turn.
///
/// Panics raised by user callbacks are not caught. Use
/// [`try_map`](Promise::try_map) to route a fallible step into the failure channel.
/// Failures nobody composed an [`on_error`](Promise::on_error) for are dropped.
///
/// ```rust,ignore
/// let reading: Promise<u32, String, Vec<String>> = Promise::resolved(21);
/// reading
///     .map(|v| v * 2)
///     .then(|log, v| log.push(format!("value {v}")))
///     .compel(&mut log);
/// ```
pub struct Promise<T, E, C> {
    init: Arc<Initializer<T, E, C>>,
}

impl<T, E, C> Clone for Promise<T, E, C> {
    fn clone(&self) -> Self {
        Self {
            init: Arc::clone(&self.init),
        }
    }
}

impl<T, E, C> fmt::Debug for Promise<T, E, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Promise")
            .field("success", &std::any::type_name::<T>())
            .field("failure", &std::any::type_name::<E>())
            .finish_non_exhaustive()
    }
}

impl<T, E, C> Promise<T, E, C>
where
    T: Send + 'static,
    E: Send + 'static,
    C: 'static,
{
    /// Creates a promise from its initializer.
    ///
    /// The initializer receives the context and one-shot handles for both outcome
    /// channels. It may fire one of them right away, store them, or hand them to
    /// something that fires them later (a correlated reply, for instance).
    pub fn new(
        init: impl Fn(&mut C, Resolver<T, C>, Rejecter<E, C>) + Send + Sync + 'static,
    ) -> Self {
        Self {
            init: Arc::new(init),
        }
    }

    /// Starts the operation, discarding both outcomes.
    pub fn compel(&self, cx: &mut C) {
        (self.init)(cx, Callback::ignore(), Callback::ignore());
    }

    /// Starts the operation and routes its outcome into the given handles.
    pub fn compel_with(&self, cx: &mut C, resolve: Resolver<T, C>, reject: Rejecter<E, C>) {
        (self.init)(cx, resolve, reject);
    }

    /// Observes the success value. Observers run in registration order before the
    /// value moves further down the chain.
    #[must_use]
    pub fn then(&self, on_success: impl Fn(&mut C, &T) + Send + Sync + 'static) -> Self {
        let inner = Arc::clone(&self.init);
        let on_success = Arc::new(on_success);
        Self::new(move |cx, resolve, reject| {
            let observer = Arc::clone(&on_success);
            inner(cx, resolve.after(move |cx, value| observer(cx, value)), reject);
        })
    }

    /// Observes the failure value.
    #[must_use]
    pub fn on_error(&self, on_failure: impl Fn(&mut C, &E) + Send + Sync + 'static) -> Self {
        let inner = Arc::clone(&self.init);
        let on_failure = Arc::new(on_failure);
        Self::new(move |cx, resolve, reject| {
            let observer = Arc::clone(&on_failure);
            inner(cx, resolve, reject.after(move |cx, error| observer(cx, error)));
        })
    }

    /// Transforms the success value.
    #[must_use]
    pub fn map<R: Send + 'static>(
        &self,
        f: impl Fn(T) -> R + Send + Sync + 'static,
    ) -> Promise<R, E, C> {
        let inner = Arc::clone(&self.init);
        let f = Arc::new(f);
        Promise::new(move |cx, resolve: Resolver<R, C>, reject| {
            let f = Arc::clone(&f);
            inner(
                cx,
                Callback::new(move |cx, value: T| resolve.fire(cx, f(value))),
                reject,
            );
        })
    }

    /// Transforms the failure value.
    #[must_use]
    pub fn map_error<F: Send + 'static>(
        &self,
        f: impl Fn(E) -> F + Send + Sync + 'static,
    ) -> Promise<T, F, C> {
        let inner = Arc::clone(&self.init);
        let f = Arc::new(f);
        Promise::new(move |cx, resolve, reject: Rejecter<F, C>| {
            let f = Arc::clone(&f);
            inner(
                cx,
                resolve,
                Callback::new(move |cx, error: E| reject.fire(cx, f(error))),
            );
        })
    }

    /// Transforms the success value with a step that may fail.
    ///
    /// An `Err` goes to the failure channel like any upstream failure.
    #[must_use]
    pub fn try_map<R: Send + 'static>(
        &self,
        f: impl Fn(T) -> Result<R, E> + Send + Sync + 'static,
    ) -> Promise<R, E, C> {
        let inner = Arc::clone(&self.init);
        let f = Arc::new(f);
        Promise::new(move |cx, resolve: Resolver<R, C>, reject: Rejecter<E, C>| {
            let f = Arc::clone(&f);
            let (upstream, mapped) = reject.split();
            inner(
                cx,
                Callback::new(move |cx, value: T| match f(value) {
                    Ok(mapped_value) => resolve.fire(cx, mapped_value),
                    Err(error) => mapped.fire(cx, error),
                }),
                upstream,
            );
        })
    }

    /// Chains a dependent operation: once this promise succeeds, `f` builds the
    /// next promise from the value and it is compelled on the same context.
    #[must_use]
    pub fn and_then<R: Send + 'static>(
        &self,
        f: impl Fn(&mut C, T) -> Promise<R, E, C> + Send + Sync + 'static,
    ) -> Promise<R, E, C> {
        let inner = Arc::clone(&self.init);
        let f = Arc::new(f);
        Promise::new(move |cx, resolve: Resolver<R, C>, reject: Rejecter<E, C>| {
            let f = Arc::clone(&f);
            let (upstream, downstream) = reject.split();
            inner(
                cx,
                Callback::new(move |cx: &mut C, value: T| {
                    let next = f(cx, value);
                    next.compel_with(cx, resolve, downstream);
                }),
                upstream,
            );
        })
    }

    /// Alias of [`and_then`](Promise::and_then).
    #[inline]
    #[must_use]
    pub fn then_await<R: Send + 'static>(
        &self,
        f: impl Fn(&mut C, T) -> Promise<R, E, C> + Send + Sync + 'static,
    ) -> Promise<R, E, C> {
        self.and_then(f)
    }

    /// Rejects with a clone of `error_if_false` when the success value fails
    /// `predicate`.
    #[must_use]
    pub fn filter(
        &self,
        predicate: impl Fn(&T) -> bool + Send + Sync + 'static,
        error_if_false: E,
    ) -> Self
    where
        E: Clone + Sync,
    {
        let inner = Arc::clone(&self.init);
        let predicate = Arc::new(predicate);
        Self::new(move |cx, resolve, reject: Rejecter<E, C>| {
            let predicate = Arc::clone(&predicate);
            let error = error_if_false.clone();
            let (upstream, filtered) = reject.split();
            inner(
                cx,
                Callback::new(move |cx, value: T| {
                    if predicate(&value) {
                        resolve.fire(cx, value);
                    } else {
                        filtered.fire(cx, error);
                    }
                }),
                upstream,
            );
        })
    }

    /// A promise that succeeds with a clone of `value` every time it is compelled.
    pub fn resolved(value: T) -> Self
    where
        T: Clone + Sync,
    {
        Self::new(move |cx, resolve, _| resolve.fire(cx, value.clone()))
    }

    /// A promise that fails with a clone of `error` every time it is compelled.
    pub fn rejected(error: E) -> Self
    where
        E: Clone + Sync,
    {
        Self::new(move |cx, _, reject| reject.fire(cx, error.clone()))
    }
}
