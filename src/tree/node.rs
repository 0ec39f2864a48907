/// Arena-backed command tree.
///
/// Every node lives in one `Vec` owned by [`CommandTree`] and is addressed by
/// a [`CommandId`]. Parent and root links are plain ids, so the parent/child
/// relationship never forms an ownership cycle.
use std::fmt;

use indexmap::IndexMap;
use tracing::warn;

use super::{
    errors::TreeError,
    path::{join_path, split_path},
    spec::{ArgumentSpec, OptionDecl, OptionSpec},
};
use crate::dispatch::{Action, ActionOutcome, Completer, Invocation};

/// Handle to a node inside a [`CommandTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommandId(usize);

#[derive(Debug)]
struct CommandNode {
    name: String,
    parent: Option<CommandId>,
    root: CommandId,
    children: IndexMap<String, CommandId>,
    options: IndexMap<String, OptionDecl>,
    arguments: Vec<ArgumentSpec>,
    help: Option<String>,
    version: Option<String>,
    action: Option<Action>,
}

impl CommandNode {
    fn new(name: String, parent: Option<CommandId>, root: CommandId) -> Self {
        Self {
            name,
            parent,
            root,
            children: IndexMap::new(),
            options: IndexMap::new(),
            arguments: Vec::new(),
            help: None,
            version: None,
            action: None,
        }
    }
}

/// A tree of commands rooted at the program itself.
#[derive(Debug)]
pub struct CommandTree {
    nodes: Vec<CommandNode>,
}

impl CommandTree {
    /// Create a tree whose root is named after the program.
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        let root = CommandId(0);
        Self {
            nodes: vec![CommandNode::new(program.into(), None, root)],
        }
    }

    /// Id of the root command.
    #[must_use]
    pub fn root(&self) -> CommandId {
        CommandId(0)
    }

    /// Read access to a command.
    ///
    /// # Panics
    ///
    /// Panics if `id` was issued by a different tree.
    #[must_use]
    pub fn get(&self, id: CommandId) -> CommandRef<'_> {
        assert!(id.0 < self.nodes.len(), "command id out of range");
        CommandRef { tree: self, id }
    }

    /// Read access to the root command.
    #[must_use]
    pub fn root_command(&self) -> CommandRef<'_> {
        self.get(self.root())
    }

    /// Builder access to a command.
    ///
    /// # Panics
    ///
    /// Panics if `id` was issued by a different tree.
    pub fn command_mut(&mut self, id: CommandId) -> CommandMut<'_> {
        assert!(id.0 < self.nodes.len(), "command id out of range");
        CommandMut { tree: self, id }
    }

    /// Builder access to the root command.
    pub fn root_mut(&mut self) -> CommandMut<'_> {
        let root = self.root();
        self.command_mut(root)
    }

    /// Create and register a child command under `parent`.
    ///
    /// Registering a name that already exists replaces the previous child;
    /// the replaced subtree stays in the arena but is no longer reachable.
    pub fn add_child(&mut self, parent: CommandId, name: impl Into<String>) -> CommandId {
        let name = name.into();
        let id = CommandId(self.nodes.len());
        let root = self.node(parent).root;
        self.nodes
            .push(CommandNode::new(name.clone(), Some(parent), root));

        let replaced = self.node_mut(parent).children.insert(name.clone(), id);
        if replaced.is_some() {
            warn!(
                parent = %self.get(parent).qualified_name(),
                child = %name,
                "subcommand registered twice, replacing the previous definition"
            );
        }
        id
    }

    /// Shorthand for [`add_child`](Self::add_child) followed by
    /// [`command_mut`](Self::command_mut).
    pub fn subcommand(&mut self, parent: CommandId, name: impl Into<String>) -> CommandMut<'_> {
        let id = self.add_child(parent, name);
        self.command_mut(id)
    }

    /// Look up a command by its colon-delimited path (empty = root).
    ///
    /// # Errors
    ///
    /// Returns `TreeError::UnknownCommand` if any segment does not resolve.
    pub fn find(&self, path: &str) -> Result<CommandRef<'_>, TreeError> {
        let mut current = self.root_command();
        for segment in split_path(path) {
            current = current.child(segment).ok_or_else(|| TreeError::UnknownCommand {
                path: path.to_owned(),
            })?;
        }
        Ok(current)
    }

    /// Every reachable command, depth-first, parents before children.
    #[must_use]
    pub fn walk(&self) -> Vec<CommandRef<'_>> {
        let mut out = Vec::new();
        walk_into(self.root_command(), &mut out);
        out
    }

    fn node(&self, id: CommandId) -> &CommandNode {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: CommandId) -> &mut CommandNode {
        &mut self.nodes[id.0]
    }
}

fn walk_into<'t>(command: CommandRef<'t>, out: &mut Vec<CommandRef<'t>>) {
    out.push(command);
    for child in command.children() {
        walk_into(child, out);
    }
}

/// Borrowed, read-only view of one command.
#[derive(Clone, Copy)]
pub struct CommandRef<'t> {
    tree: &'t CommandTree,
    id: CommandId,
}

impl<'t> CommandRef<'t> {
    fn node(self) -> &'t CommandNode {
        self.tree.node(self.id)
    }

    /// The command's id.
    #[must_use]
    pub fn id(self) -> CommandId {
        self.id
    }

    /// The tree this command belongs to.
    #[must_use]
    pub fn tree(self) -> &'t CommandTree {
        self.tree
    }

    /// Own segment name (the program name for the root).
    #[must_use]
    pub fn name(self) -> &'t str {
        &self.node().name
    }

    /// The root command's name.
    #[must_use]
    pub fn program_name(self) -> &'t str {
        self.root().name()
    }

    /// Whether this is the root command.
    #[must_use]
    pub fn is_root(self) -> bool {
        self.node().parent.is_none()
    }

    /// The owning command, `None` for the root.
    #[must_use]
    pub fn parent(self) -> Option<CommandRef<'t>> {
        self.node().parent.map(|id| self.tree.get(id))
    }

    /// The root command.
    #[must_use]
    pub fn root(self) -> CommandRef<'t> {
        self.tree.get(self.node().root)
    }

    /// Chain from the root down to this command, inclusive.
    #[must_use]
    pub fn lineage(self) -> Vec<CommandRef<'t>> {
        let mut chain = vec![self];
        let mut current = self;
        while let Some(parent) = current.parent() {
            chain.push(parent);
            current = parent;
        }
        chain.reverse();
        chain
    }

    /// Segment names from below the root down to this command.
    ///
    /// Empty for the root.
    #[must_use]
    pub fn path(self) -> Vec<&'t str> {
        self.lineage()
            .into_iter()
            .filter(|c| !c.is_root())
            .map(CommandRef::name)
            .collect()
    }

    /// [`path`](Self::path) joined with `:` (empty for the root).
    #[must_use]
    pub fn qualified_name(self) -> String {
        join_path(&self.path())
    }

    /// Number of segments below the root.
    #[must_use]
    pub fn depth(self) -> usize {
        self.lineage().len() - 1
    }

    /// Whether any subcommands are registered.
    #[must_use]
    pub fn has_children(self) -> bool {
        !self.node().children.is_empty()
    }

    /// Direct subcommand by segment name.
    #[must_use]
    pub fn child(self, name: &str) -> Option<CommandRef<'t>> {
        self.node().children.get(name).map(|&id| self.tree.get(id))
    }

    /// Direct subcommands, in registration order.
    pub fn children(self) -> impl Iterator<Item = CommandRef<'t>> {
        let tree = self.tree;
        self.node().children.values().map(move |&id| tree.get(id))
    }

    /// Declared positional arguments (never inherited).
    #[must_use]
    pub fn arguments(self) -> &'t [ArgumentSpec] {
        &self.node().arguments
    }

    /// Options declared directly on this command.
    ///
    /// `None` marks an inherited option this command disables.
    pub fn own_options(self) -> impl Iterator<Item = (&'t str, Option<&'t OptionSpec>)> {
        self.node()
            .options
            .iter()
            .map(|(name, decl)| (name.as_str(), decl.spec()))
    }

    /// Options visible on this command after inheritance.
    ///
    /// Merges every ancestor's own options from the root down; a later entry
    /// overrides an earlier one for the same name while the name keeps its
    /// first position, and disabled entries are dropped from the result.
    #[must_use]
    pub fn effective_options(self) -> IndexMap<&'t str, &'t OptionSpec> {
        let mut merged: IndexMap<&'t str, Option<&'t OptionSpec>> = IndexMap::new();
        for command in self.lineage() {
            for (name, spec) in command.own_options() {
                merged.insert(name, spec);
            }
        }
        merged
            .into_iter()
            .filter_map(|(name, spec)| spec.map(|spec| (name, spec)))
            .collect()
    }

    /// Description shown in help.
    #[must_use]
    pub fn help(self) -> Option<&'t str> {
        self.node().help.as_deref()
    }

    /// Version string, looked up on this command only.
    #[must_use]
    pub fn version(self) -> Option<&'t str> {
        self.node().version.as_deref()
    }

    /// The command's action, if declared.
    #[must_use]
    pub fn action(self) -> Option<&'t Action> {
        self.node().action.as_ref()
    }
}

impl PartialEq for CommandRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for CommandRef<'_> {}

impl fmt::Debug for CommandRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandRef")
            .field("program", &self.program_name())
            .field("path", &self.qualified_name())
            .finish()
    }
}

/// Fluent builder over one command of a [`CommandTree`].
pub struct CommandMut<'t> {
    tree: &'t mut CommandTree,
    id: CommandId,
}

impl CommandMut<'_> {
    fn node(&mut self) -> &mut CommandNode {
        self.tree.node_mut(self.id)
    }

    /// The command's id.
    #[must_use]
    pub fn id(&self) -> CommandId {
        self.id
    }

    /// Set the description shown in help.
    pub fn help(&mut self, help: impl Into<String>) -> &mut Self {
        self.node().help = Some(help.into());
        self
    }

    /// Set the version string.
    pub fn version(&mut self, version: impl Into<String>) -> &mut Self {
        self.node().version = Some(version.into());
        self
    }

    /// Declare (or override an inherited) option.
    pub fn option(&mut self, name: impl Into<String>, spec: OptionSpec) -> &mut Self {
        self.node()
            .options
            .insert(name.into(), OptionDecl::Enabled(spec));
        self
    }

    /// Remove an inherited option from this command and its descendants.
    pub fn disable_option(&mut self, name: impl Into<String>) -> &mut Self {
        self.node().options.insert(name.into(), OptionDecl::Disabled);
        self
    }

    /// Append a positional argument.
    ///
    /// # Errors
    ///
    /// - `TreeError::RequiredAfterOptional` if a required argument follows an
    ///   optional one.
    /// - `TreeError::DuplicateArgument` if the name is already declared.
    pub fn argument(&mut self, spec: ArgumentSpec) -> Result<&mut Self, TreeError> {
        let command = self.tree.get(self.id).qualified_name();
        let arguments = &self.tree.node(self.id).arguments;

        if arguments.iter().any(|a| a.name == spec.name) {
            return Err(TreeError::DuplicateArgument {
                command,
                name: spec.name,
            });
        }
        if !spec.optional {
            if let Some(optional) = arguments.iter().find(|a| a.optional) {
                return Err(TreeError::RequiredAfterOptional {
                    command,
                    name: spec.name,
                    after: optional.name.clone(),
                });
            }
        }

        self.node().arguments.push(spec);
        Ok(self)
    }

    /// Append several positional arguments in order.
    ///
    /// # Errors
    ///
    /// Same as [`argument`](Self::argument); arguments before the offending
    /// one stay declared.
    pub fn arguments<I>(&mut self, specs: I) -> Result<&mut Self, TreeError>
    where
        I: IntoIterator<Item = ArgumentSpec>,
    {
        for spec in specs {
            self.argument(spec)?;
        }
        Ok(self)
    }

    /// Set the action run when this command is resolved.
    pub fn action<F>(&mut self, action: F) -> &mut Self
    where
        F: Fn(&Invocation<'_>, Completer) -> ActionOutcome + Send + Sync + 'static,
    {
        self.node().action = Some(Action::new(action));
        self
    }

    /// Set the action from an existing [`Action`].
    pub fn set_action(&mut self, action: Action) -> &mut Self {
        self.node().action = Some(action);
        self
    }
}
