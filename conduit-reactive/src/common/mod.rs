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
pub use component_handle::ComponentHandle;
pub use component_runtime::ComponentRuntime;
pub use conduit_app::ConduitApp;
pub use config::ConduitConfig;
pub use reply_error::ReplyError;
pub(crate) use types::ComponentInbox;
pub use types::{ComponentSender, GlobalStartHook, LifecycleHook};

mod component_handle;
mod component_runtime;
mod conduit_app;
mod conduit_inner;
pub mod config;
mod reply_error;
mod types;
