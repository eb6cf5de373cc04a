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
use std::any::Any;
use std::fmt::Debug;

use dyn_clone::DynClone;

/// A marker trait for types that can travel between Conduit components.
///
/// Messages are in-process values: they must be safe to move between threads,
/// cloneable behind a trait object, debuggable, and downcastable back to their
/// concrete type. Typed dispatch
/// ([`Behavior::on_content_of_type`](crate::component::Behavior::on_content_of_type))
/// and reply classification ([`Promise::ask`](crate::promise::Promise::ask)) both
/// rely on [`as_any`](ConduitMessage::as_any) for that downcast.
///
/// A blanket implementation covers every `Clone + Debug + Send + Sync + 'static`
/// type, so message structs normally only need `#[conduit_message]` or the two
/// derives.
///
/// Note that `Arc<dyn ConduitMessage>` is itself `Clone + Debug + Send + Sync`.
/// Passing one to an API taking `impl ConduitMessage` wraps it a second time;
/// use [`Messenger::send_message`](crate::traits::Messenger::send_message)
/// for already-erased payloads.
pub trait ConduitMessage: DynClone + Any + Send + Sync + Debug {
    /// Returns the message as a dynamic [`Any`] reference for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// The Rust type name of the concrete message, used in mismatch reports.
    fn message_type_name(&self) -> &'static str;
}

dyn_clone::clone_trait_object!(ConduitMessage);

impl<T> ConduitMessage for T
where
    T: Any + Send + Sync + Debug + DynClone + 'static,
{
    #[inline]
    fn as_any(&self) -> &dyn Any {
        self
    }

    #[inline]
    fn message_type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

/// Downcasts an erased message to a concrete type.
#[inline]
pub fn downcast_message<T: ConduitMessage + 'static>(msg: &dyn ConduitMessage) -> Option<&T> {
    msg.as_any().downcast_ref::<T>()
}
