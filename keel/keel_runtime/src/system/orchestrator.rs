//! Bootstrap orchestrator: the lifecycle state machine.
//!
//! One logical control thread owns an `Orchestrator` and walks it through
//! `init → load_manifest → tick loop → deinit`. Module loading and environment
//! mutation happen only inside `load_manifest`, strictly before steady-state
//! ticking begins.

use std::sync::Arc;

use anyhow::Result;
use keel_concurrency::{JobSystem, Tasklet, ThreadPool, ThreadPoolConfig};
use keel_core::capability::InterfaceRegistry;
use keel_core::error::LifecycleError;
use keel_core::traits::{Archive, ModuleContext, ModuleLoader, Tickable};
use keel_core::types::{LifecycleState, MemoryManager, PlatformHandle};
use tracing::{debug, info, warn};

use super::config::OrchestratorConfig;
use super::root_archive;
use crate::env::{apply_directives, EnvironmentStore};
use crate::manifest::{Manifest, ManifestSource};
use crate::module::{load_manifest_modules, ModuleRegistry};

/// Owns the bootstrap lifecycle, the tickable registry, and the handles the
/// rest of the process resolves its collaborators through.
pub struct Orchestrator {
    config: OrchestratorConfig,
    state: LifecycleState,

    platform_handle: Option<PlatformHandle>,

    tickables: Vec<Arc<dyn Tickable>>,

    thread_pool: Option<ThreadPool>,
    job_system: JobSystem,

    interfaces: Arc<InterfaceRegistry>,
    modules: Arc<ModuleRegistry>,
    environment: Arc<EnvironmentStore>,
    memory: MemoryManager,

    manifest: Option<Manifest>,
    root_archive: Option<Arc<dyn Archive>>,
}

impl Orchestrator {
    /// Create an orchestrator in the `Uninitialized` state.
    pub fn new(
        config: OrchestratorConfig,
        environment: Arc<EnvironmentStore>,
        loader: Arc<dyn ModuleLoader>,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            config,
            state: LifecycleState::Uninitialized,
            platform_handle: None,
            tickables: Vec::new(),
            thread_pool: None,
            job_system: JobSystem::new(),
            interfaces: Arc::new(InterfaceRegistry::new()),
            modules: Arc::new(ModuleRegistry::new(loader)),
            environment,
            memory: MemoryManager::new("main"),
            manifest: None,
            root_archive: None,
        })
    }

    /// Record the platform handle and start the worker pool.
    ///
    /// Moves `Uninitialized → Initialized`. No tickable callback runs here.
    pub fn init(&mut self, platform_handle: PlatformHandle) -> Result<()> {
        if self.state != LifecycleState::Uninitialized {
            return Err(LifecycleError::InvalidState {
                expected: LifecycleState::Uninitialized,
                actual: self.state,
            }
            .into());
        }

        info!("Orchestrator initializing");
        self.platform_handle = Some(platform_handle);

        let mut pool = ThreadPool::with_config(ThreadPoolConfig {
            workers: self.config.workers,
            queue_size: self.config.queue_size,
            ..Default::default()
        });
        pool.start()?;
        self.thread_pool = Some(pool);

        self.state = LifecycleState::Initialized;
        Ok(())
    }

    /// Drive one full manifest load: parse, slice to the current host OS,
    /// apply environment directives, load modules, construct the root
    /// archive.
    ///
    /// Parse and shape failures are reported before anything is mutated. A
    /// fatal failure afterwards (no archive manager, unconstructible root
    /// archive) leaves the state `Initialized` and whatever environment and
    /// module mutation already happened in place.
    pub fn load_manifest(&mut self, source: ManifestSource) -> Result<()> {
        if self.state != LifecycleState::Initialized {
            return Err(LifecycleError::InvalidState {
                expected: LifecycleState::Initialized,
                actual: self.state,
            }
            .into());
        }
        if self.manifest.is_some() {
            return Err(LifecycleError::ManifestAlreadyLoaded.into());
        }

        let manifest = Manifest::load(&source)?;
        let host = manifest.host_section(&self.config.os_id)?.clone();

        info!(os_id = %self.config.os_id, "Manifest resolved for host OS");

        let applied = apply_directives(&self.environment, &host.directives());
        debug!(applied, "Environment directives applied");

        let ctx = ModuleContext {
            interfaces: &self.interfaces,
            memory: &self.memory,
        };
        let resident = load_manifest_modules(
            &self.modules,
            &host,
            &self.config.main_module_stem,
            &self.environment,
            &ctx,
        );
        info!(resident, declared = host.modules.len(), "Module loading finished");

        let archive = root_archive::create_root_archive(&self.interfaces, &host, &self.environment)?;
        self.root_archive = Some(archive);
        self.manifest = Some(manifest);

        Ok(())
    }

    /// Register a tickable and synchronously invoke its `on_initialize`
    /// before returning. Registration order is dispatch order.
    pub fn register_tickable(&mut self, tickable: Arc<dyn Tickable>) -> Result<()> {
        if !self.state.is_live() {
            return Err(LifecycleError::NotInitialized.into());
        }

        self.tickables.push(tickable.clone());
        tickable.on_initialize();
        Ok(())
    }

    /// Unregister a tickable, synchronously invoking its `on_deinitialize`.
    ///
    /// Returns whether the tickable was registered; the remaining entries
    /// keep their relative order.
    pub fn unregister_tickable(&mut self, tickable: &Arc<dyn Tickable>) -> bool {
        match self
            .tickables
            .iter()
            .position(|t| Arc::ptr_eq(t, tickable))
        {
            Some(index) => {
                let removed = self.tickables.remove(index);
                removed.on_deinitialize();
                true
            }
            None => {
                warn!("Unregister of unknown tickable ignored");
                false
            }
        }
    }

    /// Advance one frame.
    ///
    /// The first call moves `Initialized → Running`. Each call performs one
    /// job-system frame advance (non-blocking: tasklets are handed to the
    /// worker pool without waiting for completion, so tickables observe no
    /// ordering guarantee relative to job completion), then dispatches
    /// `on_tick` in registration order, then yields the control thread.
    pub fn tick(&mut self) -> Result<()> {
        match self.state {
            LifecycleState::Initialized => {
                info!("Entering steady state");
                self.state = LifecycleState::Running;
            }
            LifecycleState::Running => {}
            other => {
                return Err(LifecycleError::InvalidState {
                    expected: LifecycleState::Running,
                    actual: other,
                }
                .into());
            }
        }

        let pool = self
            .thread_pool
            .as_ref()
            .ok_or(LifecycleError::NotInitialized)?;
        self.job_system.update_one_frame(pool);

        for tickable in &self.tickables {
            tickable.on_tick();
        }

        std::thread::yield_now();
        Ok(())
    }

    /// Dispatch `on_deinitialize` to every registered tickable in
    /// registration order, clear the registry, and stop the worker pool.
    ///
    /// Idempotent: a second call dispatches nothing.
    pub fn deinit(&mut self) {
        if self.state == LifecycleState::Deinitialized {
            debug!("deinit called on a deinitialized orchestrator");
            return;
        }

        info!("Orchestrator deinitializing");
        for tickable in self.tickables.drain(..) {
            tickable.on_deinitialize();
        }

        if let Some(mut pool) = self.thread_pool.take() {
            pool.shutdown_and_join();
        }

        self.state = LifecycleState::Deinitialized;
    }

    /// Forward ownership of a tasklet to the job system.
    ///
    /// Valid in any state after `init`; the tasklet runs on a later frame
    /// advance.
    pub fn enqueue_task(&self, task: Tasklet) -> Result<()> {
        if self.state == LifecycleState::Uninitialized {
            return Err(LifecycleError::NotInitialized.into());
        }
        self.job_system.enqueue_task(task);
        Ok(())
    }

    /// Current lifecycle state.
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Process-wide interface registry.
    pub fn interfaces(&self) -> &Arc<InterfaceRegistry> {
        &self.interfaces
    }

    /// Process-wide module registry.
    pub fn modules(&self) -> &Arc<ModuleRegistry> {
        &self.modules
    }

    /// The environment store this orchestrator mutates.
    pub fn environment(&self) -> &Arc<EnvironmentStore> {
        &self.environment
    }

    /// Shared memory-manager handle.
    pub fn memory_manager(&self) -> &MemoryManager {
        &self.memory
    }

    /// Root archive, once a manifest has loaded.
    pub fn root_archive(&self) -> Option<Arc<dyn Archive>> {
        self.root_archive.clone()
    }

    /// Raw text of the loaded manifest.
    pub fn manifest_context(&self) -> Option<&str> {
        self.manifest.as_ref().map(Manifest::context)
    }

    /// The opaque platform handle recorded at `init`.
    pub fn platform_handle(&self) -> Option<PlatformHandle> {
        self.platform_handle.clone()
    }

    /// Number of frames ticked so far.
    pub fn frame_index(&self) -> u64 {
        self.job_system.frame_index()
    }
}

impl Drop for Orchestrator {
    fn drop(&mut self) {
        if self.state.is_live() {
            warn!("Orchestrator dropped without deinit");
            self.deinit();
        }
    }
}
