//! Lookup of control environments by `(domain, task)`.

use crate::environment::{ControlEnvironment, EnvironmentOptions, TaskOptions};
use crate::{cartpole, point_mass, Result, SuiteError};

/// Builds a fresh environment from task and environment options.
pub type Constructor =
    Box<dyn Fn(&TaskOptions, bool, &EnvironmentOptions) -> Box<dyn ControlEnvironment> + Send + Sync>;

struct Entry {
    domain: String,
    task: String,
    build: Constructor,
}

/// Table of known tasks.
pub struct Registry {
    entries: Vec<Entry>,
}

impl Registry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Registry preloaded with the reference domains.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("cartpole", "balance", |task, visualize, env| {
            Box::new(cartpole::environment(false, task, visualize, env))
        });
        registry.register("cartpole", "swingup", |task, visualize, env| {
            Box::new(cartpole::environment(true, task, visualize, env))
        });
        registry.register("point_mass", "easy", |task, visualize, env| {
            Box::new(point_mass::environment(task, visualize, env))
        });
        registry
    }

    /// Add or replace a task constructor.
    pub fn register<F>(&mut self, domain: &str, task: &str, build: F)
    where
        F: Fn(&TaskOptions, bool, &EnvironmentOptions) -> Box<dyn ControlEnvironment>
            + Send
            + Sync
            + 'static,
    {
        self.entries.retain(|e| !(e.domain == domain && e.task == task));
        self.entries.push(Entry {
            domain: domain.to_string(),
            task: task.to_string(),
            build: Box::new(build),
        });
    }

    /// Registered `(domain, task)` pairs in registration order.
    #[must_use]
    pub fn tasks(&self) -> Vec<(&str, &str)> {
        self.entries.iter().map(|e| (e.domain.as_str(), e.task.as_str())).collect()
    }

    /// Construct the environment for `domain`/`task`.
    ///
    /// # Errors
    ///
    /// Returns [`SuiteError::UnknownTask`] if the pair is not registered.
    pub fn load(
        &self,
        domain: &str,
        task: &str,
        task_options: &TaskOptions,
        visualize_reward: bool,
        environment_options: &EnvironmentOptions,
    ) -> Result<Box<dyn ControlEnvironment>> {
        let entry = self
            .entries
            .iter()
            .find(|e| e.domain == domain && e.task == task)
            .ok_or_else(|| SuiteError::UnknownTask { domain: domain.to_string(), task: task.to_string() })?;
        tracing::info!(domain, task, seed = ?task_options.random, "Loading control task");
        Ok((entry.build)(task_options, visualize_reward, environment_options))
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Load a task from the default registry.
///
/// # Errors
///
/// Returns [`SuiteError::UnknownTask`] for an unregistered pair.
pub fn load(
    domain: &str,
    task: &str,
    task_options: &TaskOptions,
    visualize_reward: bool,
    environment_options: &EnvironmentOptions,
) -> Result<Box<dyn ControlEnvironment>> {
    Registry::with_defaults().load(domain, task, task_options, visualize_reward, environment_options)
}
