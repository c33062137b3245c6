//! Event module discovery with per-module failure isolation.
//!
//! Modules are written independently of each other and of the director.
//! At startup every configured [`ModuleSource`] is loaded on its own: a
//! loader that errors, panics, or yields bad metadata is logged and left
//! out, and the rest load normally. The resulting [`EventRegistry`] is
//! read-only from then on.

use std::collections::HashMap;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use rand::Rng;
use rand::seq::IndexedRandom;

use crate::{EventInfo, EventModule, ModuleContext, ModuleError};

type Loader =
    Box<dyn FnOnce(ModuleContext) -> Result<Arc<dyn EventModule>, ModuleError> + Send>;

// ---------------------------------------------------------------------------
// ModuleSource
// ---------------------------------------------------------------------------

/// A named, not-yet-loaded event module.
pub struct ModuleSource {
    name: String,
    loader: Loader,
}

impl ModuleSource {
    /// A source whose loader may fail.
    pub fn new<F>(name: impl Into<String>, loader: F) -> Self
    where
        F: FnOnce(ModuleContext) -> Result<Arc<dyn EventModule>, ModuleError> + Send + 'static,
    {
        Self {
            name: name.into(),
            loader: Box::new(loader),
        }
    }

    /// A source whose loader always produces a module.
    pub fn from_fn<M, F>(name: impl Into<String>, build: F) -> Self
    where
        M: EventModule,
        F: FnOnce(ModuleContext) -> M + Send + 'static,
    {
        Self::new(name, move |ctx| Ok(Arc::new(build(ctx)) as Arc<dyn EventModule>))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Runs the loader, turning panics into [`ModuleError::Panicked`] and
    /// checking the module's metadata.
    fn load(self, ctx: ModuleContext) -> Result<RegisteredModule, ModuleError> {
        let Self { name, loader } = self;
        let module = catch_unwind(AssertUnwindSafe(move || loader(ctx)))
            .map_err(ModuleError::from_panic)??;
        let info = catch_unwind(AssertUnwindSafe(|| module.info()))
            .map_err(ModuleError::from_panic)?;
        info.validate()?;
        Ok(RegisteredModule {
            source: name,
            info,
            module,
        })
    }
}

impl fmt::Debug for ModuleSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleSource").field("name", &self.name).finish()
    }
}

// ---------------------------------------------------------------------------
// RegisteredModule
// ---------------------------------------------------------------------------

/// A successfully loaded module together with its validated metadata.
#[derive(Clone)]
pub struct RegisteredModule {
    source: String,
    info: EventInfo,
    module: Arc<dyn EventModule>,
}

impl RegisteredModule {
    /// Name of the source the module was loaded from.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn info(&self) -> &EventInfo {
        &self.info
    }

    pub fn module(&self) -> &Arc<dyn EventModule> {
        &self.module
    }
}

impl fmt::Debug for RegisteredModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredModule")
            .field("source", &self.source)
            .field("info", &self.info)
            .finish_non_exhaustive()
    }
}

/// A source that was left out of the registry, and why.
#[derive(Debug)]
pub struct LoadFailure {
    pub source: String,
    pub error: ModuleError,
}

// ---------------------------------------------------------------------------
// EventRegistry
// ---------------------------------------------------------------------------

/// The set of event modules the director picks from.
#[derive(Debug, Default)]
pub struct EventRegistry {
    modules: Vec<RegisteredModule>,
    failures: Vec<LoadFailure>,
}

impl EventRegistry {
    /// A registry with no modules. The director stays idle with it.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Loads every enabled source, each in isolation.
    ///
    /// With `enabled = Some(names)` only those sources load, in that order;
    /// a name without a matching source is recorded as
    /// [`ModuleError::MissingSource`]. With `None` every source loads in
    /// the order given. Failures are logged and kept in
    /// [`failures`](Self::failures); they never stop discovery.
    pub fn discover(
        sources: Vec<ModuleSource>,
        enabled: Option<&[String]>,
        ctx: &ModuleContext,
    ) -> Self {
        let mut registry = Self::default();

        let ordered: Vec<Result<ModuleSource, String>> = match enabled {
            None => sources.into_iter().map(Ok).collect(),
            Some(names) => {
                let mut by_name: HashMap<String, ModuleSource> = HashMap::new();
                for source in sources {
                    if by_name.contains_key(source.name()) {
                        tracing::warn!(module = %source.name(), "duplicate module source ignored");
                        continue;
                    }
                    by_name.insert(source.name.clone(), source);
                }
                let picked = names
                    .iter()
                    .map(|name| by_name.remove(name).ok_or_else(|| name.clone()))
                    .collect();
                for skipped in by_name.keys() {
                    tracing::debug!(module = %skipped, "module source not enabled");
                }
                picked
            }
        };

        for entry in ordered {
            let source = match entry {
                Ok(source) => source,
                Err(missing) => {
                    tracing::warn!(module = %missing, "enabled module has no source");
                    registry.failures.push(LoadFailure {
                        error: ModuleError::MissingSource(missing.clone()),
                        source: missing,
                    });
                    continue;
                }
            };

            let name = source.name.clone();
            match source.load(ctx.clone()) {
                Ok(loaded) => {
                    tracing::info!(
                        module = %name,
                        event = %loaded.info.name,
                        warning_secs = loaded.info.warning_duration_secs,
                        "event module loaded"
                    );
                    registry.modules.push(loaded);
                }
                Err(error) => {
                    tracing::warn!(module = %name, %error, "event module failed to load");
                    registry.failures.push(LoadFailure {
                        source: name,
                        error,
                    });
                }
            }
        }

        tracing::info!(
            loaded = registry.modules.len(),
            failed = registry.failures.len(),
            "event module discovery finished"
        );
        registry
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Event names in load order.
    pub fn names(&self) -> Vec<&str> {
        self.modules.iter().map(|m| m.info.name.as_str()).collect()
    }

    pub fn modules(&self) -> &[RegisteredModule] {
        &self.modules
    }

    pub fn failures(&self) -> &[LoadFailure] {
        &self.failures
    }

    /// Picks one module uniformly at random.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&RegisteredModule> {
        self.modules.choose(rng)
    }
}
