//! The validated, read-only command tree.
//!
//! [`CommandTree::new`] flattens a [`CommandDefinition`] into an arena of
//! nodes addressed by [`NodeId`]. Every model invariant is checked here, so
//! the resolver never has to deal with a malformed tree.

use std::collections::HashSet;

use crate::command_definitions::{ArgDefinition, Bindings, CommandDefinition, FlagDefinition};
use crate::error::Error::{
    CumulativeNotLast, DuplicateCommandName, DuplicateFlagName, EmptyName, InvalidBinding,
    InvalidShort, NameWithSpace,
};
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Addresses one flag: the node declaring it and its position there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FlagId {
    pub node: NodeId,
    pub index: usize,
}

#[derive(Debug, Clone)]
pub struct CommandNode {
    pub name: String,
    pub aliases: Vec<String>,
    pub hidden: bool,
    pub completion: Option<bool>,
    pub help_flag: bool,
    pub set: Bindings,
    pub flags: Vec<FlagDefinition>,
    pub args: Vec<ArgDefinition>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl CommandNode {
    /// Whether this node shows up in subcommand suggestions.
    #[must_use]
    pub fn is_offered(&self) -> bool {
        crate::command_definitions::is_offered(self.hidden, self.completion)
    }

    /// Completion was switched off explicitly, not merely hidden.
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.completion == Some(false)
    }

    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[must_use]
    pub fn matches(&self, word: &str) -> bool {
        self.name == word || self.aliases.iter().any(|alias| alias == word)
    }

    /// Name followed by aliases, in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }
}

#[derive(Debug, Clone)]
pub struct CommandTree {
    nodes: Vec<CommandNode>,
}

impl CommandTree {
    /// Builds and validates the tree.
    ///
    /// # Errors
    ///
    /// Returns an error if a name is empty or contains whitespace, if names
    /// or aliases clash among siblings, if flag spellings clash within a
    /// command, if a cumulative argument is not the last argument, or if a
    /// `set` binding has an empty key.
    pub fn new(root: CommandDefinition) -> Result<Self> {
        let mut tree = Self { nodes: Vec::new() };
        tree.insert(root, None)?;
        Ok(tree)
    }

    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> &CommandNode {
        &self.nodes[id.0]
    }

    #[must_use]
    pub fn flag(&self, id: FlagId) -> &FlagDefinition {
        &self.node(id.node).flags[id.index]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Every node, parents before their children.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &CommandNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (NodeId(index), node))
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = (NodeId, &CommandNode)> {
        self.node(id)
            .children
            .iter()
            .map(move |child| (*child, self.node(*child)))
    }

    /// Finds the child of `id` called `word`, by name or alias.
    #[must_use]
    pub fn find_child(&self, id: NodeId, word: &str) -> Option<NodeId> {
        self.children(id)
            .find(|(_, child)| child.matches(word))
            .map(|(child_id, _)| child_id)
    }

    /// `id` followed by its ancestors up to the root.
    #[must_use]
    pub fn lineage(&self, id: NodeId) -> Vec<NodeId> {
        let mut lineage = vec![id];
        let mut current = id;
        while let Some(parent) = self.node(current).parent {
            lineage.push(parent);
            current = parent;
        }
        lineage
    }

    /// Flags usable at `id`: its own first, then those inherited from
    /// ancestors, nearest first.
    #[must_use]
    pub fn scoped_flags(&self, id: NodeId) -> Vec<FlagId> {
        self.lineage(id)
            .into_iter()
            .flat_map(|node| {
                (0..self.node(node).flags.len()).map(move |index| FlagId { node, index })
            })
            .collect()
    }

    /// Matches a typed flag word (`--name`, `--alias` or `-s`) exactly.
    #[must_use]
    pub fn find_flag(&self, id: NodeId, word: &str) -> Option<FlagId> {
        self.scoped_flags(id).into_iter().find(|flag_id| {
            let flag = self.flag(*flag_id);
            if let Some(long) = word.strip_prefix("--") {
                flag.name == long || flag.aliases.iter().any(|alias| alias == long)
            } else if let Some(short) = word.strip_prefix('-') {
                let mut chars = short.chars();
                matches!((chars.next(), chars.next(), flag.short), (Some(c), None, Some(s)) if c == s)
            } else {
                false
            }
        })
    }

    fn insert(&mut self, definition: CommandDefinition, parent: Option<NodeId>) -> Result<NodeId> {
        validate_command(&definition)?;

        let id = NodeId(self.nodes.len());
        let CommandDefinition {
            name,
            aliases,
            hidden,
            completion,
            help_flag,
            set,
            mut flags,
            args,
            commands,
        } = definition;

        // Flags with a predictor or enum take a value.
        for flag in &mut flags {
            flag.value |= flag.predictor.is_some() || !flag.enum_values.is_empty();
        }

        self.nodes.push(CommandNode {
            name,
            aliases,
            hidden,
            completion,
            help_flag,
            set,
            flags,
            args,
            parent,
            children: Vec::new(),
        });

        for command in commands {
            let child = self.insert(command, Some(id))?;
            self.nodes[id.0].children.push(child);
        }

        Ok(id)
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(EmptyName);
    }

    if name.chars().any(char::is_whitespace) {
        return Err(NameWithSpace(name.to_string()));
    }

    Ok(())
}

fn validate_bindings(owner: &str, bindings: &Bindings) -> Result<()> {
    if bindings.keys().any(String::is_empty) {
        return Err(InvalidBinding(owner.to_string()));
    }

    Ok(())
}

fn validate_flags(command: &CommandDefinition) -> Result<()> {
    let mut spellings = HashSet::new();

    for flag in &command.flags {
        validate_name(&flag.name)?;
        for alias in &flag.aliases {
            validate_name(alias)?;
        }
        if let Some(short) = flag.short {
            if short.is_whitespace() || short == '-' {
                return Err(InvalidShort(short.to_string()));
            }
        }
        validate_bindings(&flag.name, &flag.set)?;

        for spelling in flag.spellings() {
            if !spellings.insert(spelling.clone()) {
                return Err(DuplicateFlagName(command.name.clone(), spelling));
            }
        }
    }

    Ok(())
}

fn validate_args(command: &CommandDefinition) -> Result<()> {
    let last = command.args.len().saturating_sub(1);

    for (index, arg) in command.args.iter().enumerate() {
        if arg.cumulative && index != last {
            return Err(CumulativeNotLast {
                command: command.name.clone(),
                argument: arg.to_string(),
            });
        }
        validate_bindings(&arg.to_string(), &arg.set)?;
    }

    Ok(())
}

fn validate_command(command: &CommandDefinition) -> Result<()> {
    validate_name(&command.name)?;
    for alias in &command.aliases {
        validate_name(alias)?;
    }
    validate_bindings(&command.name, &command.set)?;
    validate_flags(command)?;
    validate_args(command)?;

    let mut names = HashSet::new();
    for child in &command.commands {
        for name in std::iter::once(&child.name).chain(child.aliases.iter()) {
            if !names.insert(name.clone()) {
                return Err(DuplicateCommandName(command.name.clone(), name.clone()));
            }
        }
    }

    Ok(())
}
