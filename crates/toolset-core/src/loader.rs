//! Group loading and the startup entry point.

use std::collections::BTreeMap;

use crate::operation::DeclaredTools;
use crate::registry::{Activation, ToolHost, ToolsetManager};
use crate::selection::ToolsetSelection;

/// One-time startup routine that assigns declared tools to groups.
///
/// Implementations call [`ToolsetManager::set_group`] for every operation
/// they recognize. How they recognize operations is up to them.
pub trait GroupLoader<T: ?Sized> {
    fn load_groups(&self, manager: &mut ToolsetManager<T>, declared: &DeclaredTools<T>);
}

impl<T, F> GroupLoader<T> for F
where
    T: ?Sized,
    F: Fn(&mut ToolsetManager<T>, &DeclaredTools<T>),
{
    fn load_groups(&self, manager: &mut ToolsetManager<T>, declared: &DeclaredTools<T>) {
        self(manager, declared)
    }
}

/// Loader driven by a tool name -> group table.
///
/// Names that were never declared are skipped.
#[derive(Debug, Clone, Default)]
pub struct NameGroupLoader {
    assignments: BTreeMap<String, String>,
}

impl NameGroupLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assign(mut self, tool: impl Into<String>, group: impl Into<String>) -> Self {
        self.assignments.insert(tool.into(), group.into());
        self
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for NameGroupLoader
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            assignments: iter
                .into_iter()
                .map(|(tool, group)| (tool.into(), group.into()))
                .collect(),
        }
    }
}

impl<T: ?Sized> GroupLoader<T> for NameGroupLoader {
    fn load_groups(&self, manager: &mut ToolsetManager<T>, declared: &DeclaredTools<T>) {
        for (tool, group) in &self.assignments {
            match declared.get(tool) {
                Some(operation) => manager.set_group(operation, group),
                None => tracing::debug!(tool = %tool, "Skipping group assignment for undeclared tool"),
            }
        }
    }
}

/// Load groups, enable the selected toolsets and activate.
///
/// Runs once during startup, before the host starts serving. A host
/// registration failure is returned unchanged.
pub fn initialize_toolsets<T, L, H>(
    manager: &mut ToolsetManager<T>,
    loader: &L,
    declared: &DeclaredTools<T>,
    selection: &ToolsetSelection,
    host: &mut H,
) -> Result<Activation, H::Error>
where
    T: ?Sized,
    L: GroupLoader<T> + ?Sized,
    H: ToolHost<T> + ?Sized,
{
    loader.load_groups(manager, declared);
    let groups = selection.groups();
    tracing::info!(toolsets = ?groups, "Enabling toolsets");
    manager.enable(groups);
    manager.activate(host)
}
