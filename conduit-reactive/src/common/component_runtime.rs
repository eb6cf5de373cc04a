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
use std::fmt::Debug;
use std::sync::Arc;

use acton_ern::Ern;
use futures::future::join_all;
use tracing::{error, trace};

use crate::common::conduit_inner::ConduitInner;
use crate::common::{ComponentHandle, ConduitConfig};
use crate::component::{ComponentConfig, Idle, ManagedComponent};
use crate::message::{Envelope, MessageAddress, SystemSignal};

/// A running Conduit system.
///
/// Obtained from [`ConduitApp::launch`](crate::common::ConduitApp::launch). It
/// creates components, broadcasts global start, and shuts everything down.
/// Clones share the same registry.
#[derive(Debug, Clone, Default)]
pub struct ComponentRuntime(pub(crate) Arc<ConduitInner>);

impl ComponentRuntime {
    /// Creates a registered component named after the configured default root.
    ///
    /// Falls back to a generated identity if the configured name is not a valid root.
    pub fn new_component<M>(&self) -> ManagedComponent<Idle, M>
    where
        M: Default + Send + Debug + 'static,
    {
        let name = self.0.config.defaults.component_name.clone();
        let id = Ern::with_root(name.as_str()).unwrap_or_else(|e| {
            error!(name = %name, error = %e, "invalid default component name");
            Ern::default()
        });
        self.new_component_with_config(ComponentConfig::new(id))
    }

    /// Creates a registered component whose identity root is `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if `name` is not a valid identity root.
    pub fn new_component_with_name<M>(&self, name: impl Into<String>) -> anyhow::Result<ManagedComponent<Idle, M>>
    where
        M: Default + Send + Debug + 'static,
    {
        Ok(self.new_component_with_config(ComponentConfig::new_with_name(name)?))
    }

    /// Creates a registered component from an explicit configuration.
    pub fn new_component_with_config<M>(&self, config: ComponentConfig) -> ManagedComponent<Idle, M>
    where
        M: Default + Send + Debug + 'static,
    {
        let component = ManagedComponent::new(self, config, true);
        trace!("Registered new component: {}", component.id());
        component
    }

    /// Number of registered components that have not stopped yet.
    #[inline]
    #[must_use]
    pub fn component_count(&self) -> usize {
        self.0.roots.len()
    }

    /// The handle of a registered component.
    #[must_use]
    pub fn find(&self, id: &Ern) -> Option<ComponentHandle> {
        self.0.roots.get(id).map(|item| item.value().clone())
    }

    /// The runtime's configuration.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ConduitConfig {
        &self.0.config
    }

    /// Delivers [`SystemSignal::GlobalStart`] to every registered component.
    ///
    /// Each component runs its `on_global_start` hook with `master`, which is
    /// also the origin of the signal, so replies go to the master.
    pub fn global_start(&self, master: &MessageAddress) {
        let handles: Vec<ComponentHandle> = self.0.roots.iter().map(|item| item.value().clone()).collect();
        trace!(components = handles.len(), master = %master.sender, "broadcasting global start");
        for handle in handles {
            let envelope = Envelope::new(
                Arc::new(SystemSignal::GlobalStart(master.clone())),
                master.clone(),
                handle.reply_address(),
            );
            if let Err(e) = handle.reply_address().deliver(envelope) {
                error!(component = %handle.id(), error = %e, "global start not delivered");
            }
        }
    }

    /// Stops every registered component and waits for them.
    ///
    /// Components get the system shutdown timeout to finish; after it expires
    /// every remaining component is cancelled.
    ///
    /// # Errors
    ///
    /// Returns an error if the timeout expired.
    pub async fn shutdown_all(&self) -> anyhow::Result<()> {
        trace!("Sending Terminate signal to all components.");
        let stop_futures: Vec<_> = self
            .0
            .roots
            .iter()
            .map(|item| {
                let handle = item.value().clone();
                async move {
                    if let Err(e) = handle.stop().await {
                        error!("Error stopping component {}: {:?}", handle.id(), e);
                    }
                }
            })
            .collect();

        let bound = self.0.config.system_shutdown_timeout();
        trace!("Waiting for all components to finish gracefully...");
        if tokio::time::timeout(bound, join_all(stop_futures)).await.is_err() {
            error!("System-wide shutdown timeout expired after {:?}. Cancelling remaining components.", bound);
            self.0.cancellation_token.cancel();
            return Err(anyhow::anyhow!("system shutdown did not finish within {bound:?}"));
        }
        trace!("System shutdown complete.");
        Ok(())
    }
}
