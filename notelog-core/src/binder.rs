//! Binding host types to their shared instrumentation.
//!
//! A [`Registry`] maps each host type to exactly one
//! [`InstrumentationHandle`]. The first bind creates the handle and attaches
//! its sinks; later binds of the same type return the same `Arc`, so every
//! instance of a type shares one timeline and one set of sinks.
//!
//! Host types normally implement [`Loggable`], which routes through the
//! process-wide registry returned by [`global`].

use crate::config::InstrumentationConfig;
use crate::error::{Error, Result};
use crate::format::{interpolate, logger_name_for};
use crate::level::{normalize, LevelInput, LogLevel};
use crate::notes::{Notes, NotesTimeline};
use crate::sink::{ConsoleTarget, SinkConfig, SinkManager};
use std::any::TypeId;
use std::collections::HashMap;
use std::fmt::Display;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

/// Per-type bundle of sinks and notes timeline.
pub struct InstrumentationHandle {
    sinks: SinkManager,
    timeline: NotesTimeline,
}

impl InstrumentationHandle {
    fn attached(
        logger_name: String,
        config: &InstrumentationConfig,
        console: ConsoleTarget,
    ) -> Self {
        let sinks = SinkManager::new(logger_name);
        sinks.attach(config, console);
        Self {
            sinks,
            timeline: NotesTimeline::new(),
        }
    }

    /// `"<module path> | <TypeName>"` of the bound type
    pub fn logger_name(&self) -> &str {
        self.sinks.logger_name()
    }

    pub fn sink_config(&self) -> SinkConfig {
        self.sinks.config()
    }

    /// Log without adding a note.
    ///
    /// `{}` placeholders in `text` are filled from `args` in order.
    pub fn log(
        &self,
        text: &str,
        args: &[&dyn Display],
        level: impl Into<LevelInput>,
    ) -> Result<()> {
        if text.is_empty() {
            return Err(Error::EmptyMessage);
        }
        let level = normalize(level)?;
        self.sinks.emit(level, &interpolate(text, args));
        Ok(())
    }

    pub fn log_debug(&self, text: &str) -> Result<()> {
        self.log(text, &[], LogLevel::Debug)
    }

    pub fn log_info(&self, text: &str) -> Result<()> {
        self.log(text, &[], LogLevel::Info)
    }

    pub fn log_warning(&self, text: &str) -> Result<()> {
        self.log(text, &[], LogLevel::Warning)
    }

    pub fn log_error(&self, text: &str) -> Result<()> {
        self.log(text, &[], LogLevel::Error)
    }

    pub fn log_critical(&self, text: &str) -> Result<()> {
        self.log(text, &[], LogLevel::Critical)
    }

    /// Add a note, and log it at the same level when `also_log` is set.
    pub fn note(
        &self,
        text: &str,
        args: &[&dyn Display],
        level: impl Into<LevelInput>,
        also_log: bool,
    ) -> Result<()> {
        if text.is_empty() {
            return Err(Error::EmptyMessage);
        }
        let level = normalize(level)?;
        let entry = self.timeline.record(interpolate(text, args), level, also_log);
        if entry.was_logged {
            self.sinks.emit(entry.level, &entry.message);
        }
        Ok(())
    }

    pub fn notes(&self) -> Notes {
        self.timeline.read()
    }

    pub fn clear_notes(&self) {
        self.timeline.clear();
    }
}

impl std::fmt::Debug for InstrumentationHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstrumentationHandle")
            .field("logger_name", &self.logger_name())
            .field("sink_config", &self.sink_config())
            .field("notes", &self.timeline.len())
            .finish()
    }
}

/// Host type identity to handle map.
pub struct Registry {
    handles: Mutex<HashMap<TypeId, Arc<InstrumentationHandle>>>,
    console: Option<ConsoleTarget>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Registry whose console sinks follow each type's configuration
    pub fn new() -> Self {
        Self {
            handles: Mutex::new(HashMap::new()),
            console: None,
        }
    }

    /// Registry whose console sinks all write to `console`
    pub fn with_console(console: ConsoleTarget) -> Self {
        Self {
            handles: Mutex::new(HashMap::new()),
            console: Some(console),
        }
    }

    /// Return the handle for `T`, creating it on first use.
    ///
    /// `config` only matters for the first bind of `T`.
    pub fn bind<T: ?Sized + 'static>(
        &self,
        config: Option<&InstrumentationConfig>,
    ) -> Arc<InstrumentationHandle> {
        let mut handles = self.lock();
        if let Some(handle) = handles.get(&TypeId::of::<T>()) {
            if config.is_some() {
                tracing::debug!(
                    logger = %handle.logger_name(),
                    "already bound, configuration ignored"
                );
            }
            return Arc::clone(handle);
        }

        let default_config = InstrumentationConfig::default();
        let config = config.unwrap_or(&default_config);
        let console = self
            .console
            .clone()
            .unwrap_or_else(|| ConsoleTarget::from(config.console));

        let handle = Arc::new(InstrumentationHandle::attached(
            logger_name_for::<T>(),
            config,
            console,
        ));
        tracing::debug!(
            logger = %handle.logger_name(),
            writable = handle.sink_config().writable,
            "instrumentation handle created"
        );
        handles.insert(TypeId::of::<T>(), Arc::clone(&handle));
        handle
    }

    /// Handle for `T` if it has been bound
    pub fn get<T: ?Sized + 'static>(&self) -> Option<Arc<InstrumentationHandle>> {
        self.lock().get(&TypeId::of::<T>()).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Logger names of every bound type, sorted
    pub fn logger_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .lock()
            .values()
            .map(|h| h.logger_name().to_string())
            .collect();
        names.sort();
        names
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<TypeId, Arc<InstrumentationHandle>>> {
        self.handles.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Process-wide registry, created on first use
pub fn global() -> &'static Registry {
    static GLOBAL: OnceLock<Registry> = OnceLock::new();
    GLOBAL.get_or_init(Registry::new)
}

/// Bind `T` in the process-wide registry
pub fn bind<T: ?Sized + 'static>(
    config: Option<&InstrumentationConfig>,
) -> Arc<InstrumentationHandle> {
    global().bind::<T>(config)
}

/// Logging and notes capability for a host type.
///
/// Every instance of an implementing type shares the handle bound to the
/// type in [`Loggable::registry`], the [`global`] registry unless overridden.
///
/// ```rust,no_run
/// use notelog_core::{DebugLevel, InstrumentationConfig, Loggable, LogLevel};
///
/// struct AnalogValue;
///
/// impl Loggable for AnalogValue {
///     fn instrumentation_config() -> InstrumentationConfig {
///         InstrumentationConfig::with_debug_level(DebugLevel::Info)
///     }
/// }
///
/// let av = AnalogValue;
/// av.note("device online").unwrap();
/// av.log_with("{} out of range", &[&42.0], LogLevel::Warning).unwrap();
/// assert_eq!(av.notes().len(), 1);
/// ```
pub trait Loggable: Sized + 'static {
    /// Configuration used when the type is first bound
    fn instrumentation_config() -> InstrumentationConfig {
        InstrumentationConfig::default()
    }

    /// Registry holding this type's handle
    fn registry() -> &'static Registry {
        global()
    }

    /// Handle for this type, bound on first use
    fn instrumentation() -> Arc<InstrumentationHandle> {
        let registry = Self::registry();
        registry
            .get::<Self>()
            .unwrap_or_else(|| registry.bind::<Self>(Some(&Self::instrumentation_config())))
    }

    /// Log at DEBUG without adding a note
    fn log(&self, text: &str) -> Result<()> {
        Self::instrumentation().log(text, &[], LogLevel::Debug)
    }

    fn log_with(
        &self,
        text: &str,
        args: &[&dyn Display],
        level: impl Into<LevelInput>,
    ) -> Result<()> {
        Self::instrumentation().log(text, args, level)
    }

    fn log_debug(&self, text: &str) -> Result<()> {
        Self::instrumentation().log_debug(text)
    }

    fn log_info(&self, text: &str) -> Result<()> {
        Self::instrumentation().log_info(text)
    }

    fn log_warning(&self, text: &str) -> Result<()> {
        Self::instrumentation().log_warning(text)
    }

    fn log_error(&self, text: &str) -> Result<()> {
        Self::instrumentation().log_error(text)
    }

    fn log_critical(&self, text: &str) -> Result<()> {
        Self::instrumentation().log_critical(text)
    }

    /// Add an INFO note that is also logged
    fn note(&self, text: &str) -> Result<()> {
        Self::instrumentation().note(text, &[], LogLevel::Info, true)
    }

    fn note_with(
        &self,
        text: &str,
        args: &[&dyn Display],
        level: impl Into<LevelInput>,
        also_log: bool,
    ) -> Result<()> {
        Self::instrumentation().note(text, args, level, also_log)
    }

    fn notes(&self) -> Notes {
        Self::instrumentation().notes()
    }

    fn clear_notes(&self) {
        Self::instrumentation().clear_notes()
    }
}
