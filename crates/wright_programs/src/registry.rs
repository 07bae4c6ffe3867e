//! Program registry.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use wright_engine::StackProgram;

use crate::civo_cluster::CivoCluster;
use crate::do_cluster::DoCluster;
use crate::error::{ProgramError, ProgramResult};
use crate::nginx_app::NginxApp;

/// A registry of provisioning programs keyed by name.
#[derive(Default)]
pub struct ProgramRegistry {
    programs: BTreeMap<String, Arc<dyn StackProgram>>,
}

impl ProgramRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            programs: BTreeMap::new(),
        }
    }

    /// Registry holding the bundled programs.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(CivoCluster));
        registry.register(Arc::new(DoCluster));
        registry.register(Arc::new(NginxApp::default()));
        registry
    }

    /// Register a program under its `name()`, replacing any program with the same name.
    pub fn register(&mut self, program: Arc<dyn StackProgram>) {
        let name = program.name().to_string();
        debug!("Registering program: {}", name);
        self.programs.insert(name, program);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn StackProgram>> {
        self.programs.get(name).cloned()
    }

    /// Get a program by name, returning an error if not found.
    pub fn get_required(&self, name: &str) -> ProgramResult<Arc<dyn StackProgram>> {
        self.get(name)
            .ok_or_else(|| ProgramError::ProgramNotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.programs.contains_key(name)
    }

    /// Registered program names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.programs.keys().map(|s| s.as_str()).collect()
    }

    /// Registered programs, sorted by name.
    pub fn list(&self) -> Vec<Arc<dyn StackProgram>> {
        self.programs.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.programs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }
}

impl std::fmt::Debug for ProgramRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgramRegistry")
            .field("programs", &self.programs.keys().collect::<Vec<_>>())
            .finish()
    }
}
