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

use parking_lot::Mutex;

/// A one-shot continuation: consumes a value on some context `C`.
///
/// Promises hand one of these to their initializer for each outcome channel.
/// Firing consumes the handle, so every callback runs at most once.
pub struct Callback<V, C> {
    f: Box<dyn FnOnce(&mut C, V) + Send>,
}

/// The success channel handed to a promise initializer.
pub type Resolver<T, C> = Callback<T, C>;

/// The failure channel handed to a promise initializer.
pub type Rejecter<E, C> = Callback<E, C>;

impl<V: 'static, C: 'static> Callback<V, C> {
    /// Wraps a closure.
    pub fn new(f: impl FnOnce(&mut C, V) + Send + 'static) -> Self {
        Self { f: Box::new(f) }
    }

    /// A callback that drops whatever it receives.
    #[must_use]
    pub fn ignore() -> Self {
        Self::new(|_, _| {})
    }

    /// Runs the callback.
    pub fn fire(self, cx: &mut C, value: V) {
        (self.f)(cx, value);
    }

    /// Runs `first` on a borrow of the value, then hands the value on to `self`.
    #[must_use]
    pub fn after(self, first: impl FnOnce(&mut C, &V) + Send + 'static) -> Self {
        Self::new(move |cx, value| {
            first(cx, &value);
            self.fire(cx, value);
        })
    }

    /// Fires `self` and then `next` with the same event.
    #[must_use]
    pub fn and_then(self, next: Self) -> Self
    where
        V: Clone,
    {
        Self::new(move |cx, value: V| {
            self.fire(cx, value.clone());
            next.fire(cx, value);
        })
    }

    /// Two handles on the same callback. Whichever fires first wins; the other
    /// becomes a no-op.
    #[must_use]
    pub fn split(self) -> (Self, Self) {
        let slot = Arc::new(Mutex::new(Some(self)));
        let other = Arc::clone(&slot);
        (
            Self::new(move |cx, value| fire_slot(&slot, cx, value)),
            Self::new(move |cx, value| fire_slot(&other, cx, value)),
        )
    }
}

fn fire_slot<V: 'static, C: 'static>(slot: &Mutex<Option<Callback<V, C>>>, cx: &mut C, value: V) {
    let callback = slot.lock().take();
    if let Some(callback) = callback {
        callback.fire(cx, value);
    }
}

impl<V, C> fmt::Debug for Callback<V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callback").finish_non_exhaustive()
    }
}
