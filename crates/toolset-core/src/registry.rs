//! Tool records, group membership and activation.
//!
//! [`ToolsetManager`] owns one [`ToolRecord`] per operation. Each record is
//! labelled with exactly one group, and the group index lists exactly the
//! records currently carrying that label, in the order they joined it.
//! Activation hands the records of enabled groups to a [`ToolHost`].

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

use serde_json::{Map, Value};

use crate::operation::{Operation, OperationId};

/// Group assigned to tools declared without one.
pub const DEFAULT_GROUP: &str = "default";

/// The registration primitive supplied by a tool host.
///
/// The registry forwards a record's parameters verbatim and never inspects
/// them. Whatever error the host returns is handed back unchanged by
/// [`ToolsetManager::activate`].
pub trait ToolHost<T: ?Sized> {
    type Error;

    fn register(
        &mut self,
        operation: &Operation<T>,
        args: &[Value],
        kwargs: &Map<String, Value>,
    ) -> Result<(), Self::Error>;
}

/// Opaque positional and keyword parameters forwarded to the host.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegistrationParams {
    pub args: Vec<Value>,
    pub kwargs: Map<String, Value>,
}

impl RegistrationParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_arg(mut self, arg: impl Into<Value>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn with_kwarg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.kwargs.insert(key.into(), value.into());
        self
    }
}

/// A tool known to the registry.
pub struct ToolRecord<T: ?Sized> {
    operation: Operation<T>,
    params: RegistrationParams,
    group: String,
}

impl<T: ?Sized> ToolRecord<T> {
    pub fn operation(&self) -> &Operation<T> {
        &self.operation
    }

    pub fn id(&self) -> OperationId {
        self.operation.id()
    }

    pub fn args(&self) -> &[Value] {
        &self.params.args
    }

    pub fn kwargs(&self) -> &Map<String, Value> {
        &self.params.kwargs
    }

    pub fn group(&self) -> &str {
        &self.group
    }
}

impl<T: ?Sized> fmt::Debug for ToolRecord<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolRecord")
            .field("id", &self.operation.id())
            .field("group", &self.group)
            .field("params", &self.params)
            .finish()
    }
}

/// One registration performed during activation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivatedTool {
    pub id: OperationId,
    pub group: String,
}

/// Outcome of a successful activation pass, in registration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Activation {
    registered: Vec<ActivatedTool>,
}

impl Activation {
    pub fn registered(&self) -> &[ActivatedTool] {
        &self.registered
    }

    pub fn ids(&self) -> Vec<OperationId> {
        self.registered.iter().map(|t| t.id).collect()
    }

    /// The group a tool was registered under, if it was registered.
    pub fn group_of(&self, id: OperationId) -> Option<&str> {
        self.registered
            .iter()
            .find(|t| t.id == id)
            .map(|t| t.group.as_str())
    }

    pub fn len(&self) -> usize {
        self.registered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registered.is_empty()
    }
}

/// Registry of tool records, group membership and enabled groups.
///
/// The manager is built for sequential startup use:
/// `add` → `set_group` → `enable` → `activate`. It takes `&mut self` and
/// holds no locks; callers initializing from several threads must
/// serialize access themselves.
pub struct ToolsetManager<T: ?Sized> {
    /// Records in first-declaration order
    records: Vec<ToolRecord<T>>,
    /// Operation identity -> position in `records`
    index: HashMap<OperationId, usize>,
    /// Group name -> member ids in join order
    groups: HashMap<String, Vec<OperationId>>,
    enabled: BTreeSet<String>,
}

impl<T: ?Sized> ToolsetManager<T> {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            index: HashMap::new(),
            groups: HashMap::new(),
            enabled: BTreeSet::new(),
        }
    }

    /// Add a tool to a group without registering it.
    ///
    /// `None` or a blank group name selects [`DEFAULT_GROUP`]. Adding an
    /// operation that already has a record reuses that record: its
    /// parameters are replaced and it moves to `group` following the rules
    /// of [`set_group`](Self::set_group).
    pub fn add(&mut self, operation: &Operation<T>, group: Option<&str>, params: RegistrationParams) {
        let group = normalize_group(group);
        match self.index.get(&operation.id()).copied() {
            Some(slot) => {
                tracing::debug!(id = %operation.id(), group = %group, "Re-declaring tool");
                self.records[slot].params = params;
                self.move_to(slot, group);
            }
            None => self.insert(operation, group, params),
        }
    }

    /// Move a tool to `group`.
    ///
    /// An operation without a record is added to `group` with empty
    /// parameters. Moving a tool into the group it already belongs to does
    /// nothing; otherwise it is appended to the end of the new group.
    pub fn set_group(&mut self, operation: &Operation<T>, group: &str) {
        let group = normalize_group(Some(group));
        match self.index.get(&operation.id()).copied() {
            Some(slot) => self.move_to(slot, group),
            None => self.insert(operation, group, RegistrationParams::default()),
        }
    }

    /// Mark groups as enabled. Unknown or empty groups are accepted.
    pub fn enable<I, S>(&mut self, groups: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for group in groups {
            let group = group.into();
            tracing::debug!(group = %group, "Enabling toolset");
            self.enabled.insert(group);
        }
    }

    pub fn is_enabled(&self, group: &str) -> bool {
        self.enabled.contains(group)
    }

    /// Every group that has ever had a tool assigned, sorted.
    pub fn registered_groups(&self) -> Vec<&str> {
        let mut groups: Vec<&str> = self.groups.keys().map(String::as_str).collect();
        groups.sort_unstable();
        groups
    }

    /// Enabled group names, sorted.
    pub fn enabled_groups(&self) -> Vec<&str> {
        self.enabled.iter().map(String::as_str).collect()
    }

    /// Operations currently assigned to each enabled group.
    ///
    /// Enabled groups without tools map to an empty list. This is a
    /// diagnostic view; it says nothing about whether activation ran.
    pub fn enabled_tools(&self) -> BTreeMap<String, Vec<Operation<T>>> {
        self.enabled
            .iter()
            .map(|group| {
                let tools = self.members(group).into_iter().cloned().collect();
                (group.clone(), tools)
            })
            .collect()
    }

    /// Operations in `group`, in the order they joined it.
    pub fn members(&self, group: &str) -> Vec<&Operation<T>> {
        self.groups
            .get(group)
            .map(|ids| {
                ids.iter()
                    .map(|id| &self.records[self.index[id]].operation)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn record(&self, operation: &Operation<T>) -> Option<&ToolRecord<T>> {
        self.index
            .get(&operation.id())
            .map(|&slot| &self.records[slot])
    }

    pub fn group_of(&self, operation: &Operation<T>) -> Option<&str> {
        self.record(operation).map(ToolRecord::group)
    }

    pub fn contains(&self, operation: &Operation<T>) -> bool {
        self.index.contains_key(&operation.id())
    }

    /// All records in first-declaration order.
    pub fn tools(&self) -> impl Iterator<Item = &ToolRecord<T>> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Register every tool whose current group is enabled.
    ///
    /// Records are visited once each in first-declaration order. The first
    /// host error stops the pass and is returned as-is; tools registered
    /// before it stay registered. Repeated calls register again, so this
    /// should run once per process.
    pub fn activate<H>(&self, host: &mut H) -> Result<Activation, H::Error>
    where
        H: ToolHost<T> + ?Sized,
    {
        let mut activation = Activation::default();
        for record in &self.records {
            if !self.enabled.contains(&record.group) {
                continue;
            }
            tracing::debug!(id = %record.id(), group = %record.group, "Registering tool");
            host.register(&record.operation, &record.params.args, &record.params.kwargs)?;
            activation.registered.push(ActivatedTool {
                id: record.id(),
                group: record.group.clone(),
            });
        }
        tracing::info!(
            registered = activation.len(),
            known = self.records.len(),
            enabled = ?self.enabled,
            "Toolsets activated"
        );
        Ok(activation)
    }

    fn insert(&mut self, operation: &Operation<T>, group: String, params: RegistrationParams) {
        tracing::debug!(id = %operation.id(), group = %group, "Adding tool");
        self.index.insert(operation.id(), self.records.len());
        self.groups
            .entry(group.clone())
            .or_default()
            .push(operation.id());
        self.records.push(ToolRecord {
            operation: operation.clone(),
            params,
            group,
        });
    }

    fn move_to(&mut self, slot: usize, group: String) {
        let record = &mut self.records[slot];
        if record.group == group {
            return;
        }
        let id = record.operation.id();
        tracing::debug!(id = %id, from = %record.group, to = %group, "Moving tool");
        if let Some(members) = self.groups.get_mut(&record.group) {
            members.retain(|member| *member != id);
        }
        self.groups.entry(group.clone()).or_default().push(id);
        record.group = group;
    }
}

impl<T: ?Sized> Default for ToolsetManager<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> fmt::Debug for ToolsetManager<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolsetManager")
            .field("records", &self.records)
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}

fn normalize_group(group: Option<&str>) -> String {
    match group {
        Some(name) if !name.trim().is_empty() => name.to_string(),
        _ => DEFAULT_GROUP.to_string(),
    }
}
