//! Walks the finished words of a line through the command tree.
//!
//! The walk replays the CLI's parsing rules on a line that is incomplete
//! and possibly invalid: unknown flags and stray positionals are ignored
//! rather than reported. The result is a [`Resolution`] describing what
//! may legally be typed at the cursor.

use log::debug;

use crate::interpolation::Vars;
use crate::model::{CommandTree, FlagId, NodeId};
use crate::tokenizer::Line;

const HELP_SPELLINGS: [&str; 2] = ["--help", "-h"];

/// Policy for the two points where CLIs built on this model disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResolvePolicy {
    /// Allow subcommand descent after positional arguments were bound.
    pub descend_after_args: bool,
    /// Allow entering a child whose completion is explicitly disabled.
    pub enter_disabled: bool,
}

/// What kind of word is being completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Position {
    /// The partial word starts with `-`.
    Flag,
    /// The previous word is a flag waiting for its value.
    FlagValue(FlagId),
    /// `--name=value` typed in one word; `head` is the `--name=` part.
    InlineValue {
        flag: FlagId,
        head: String,
        value: String,
    },
    /// A subcommand name or a positional argument.
    Word,
}

#[derive(Debug, Clone)]
pub struct Resolution {
    pub node: NodeId,
    /// Variables after every descent and `set` binding on the way.
    pub vars: Vars,
    /// Flags still worth suggesting, in scope order.
    pub eligible_flags: Vec<FlagId>,
    /// Index into the node's arguments of the next one to fill, or of the
    /// cumulative one still absorbing words.
    pub next_arg: Option<usize>,
    /// Words absorbed by the open cumulative argument so far.
    pub cumulative_count: usize,
    /// Subcommands of `node` may still be entered.
    pub can_descend: bool,
    pub offer_help: bool,
    pub position: Position,
    pub last: String,
}

struct Walk<'t> {
    tree: &'t CommandTree,
    policy: ResolvePolicy,
    node: NodeId,
    vars: Vars,
    supplied: Vec<FlagId>,
    help_supplied: bool,
    arg_index: usize,
    cumulative_count: usize,
    args_started: bool,
    flags_ended: bool,
    pending: Option<FlagId>,
}

fn looks_like_flag(word: &str) -> bool {
    word.starts_with('-')
}

/// Splits `--name=value` into its parts.
fn split_inline(word: &str) -> Option<(&str, &str)> {
    if !word.starts_with("--") {
        return None;
    }
    word.split_once('=')
}

impl<'t> Walk<'t> {
    fn new(tree: &'t CommandTree, globals: &Vars, policy: ResolvePolicy) -> Self {
        let root = tree.root();
        Self {
            tree,
            policy,
            node: root,
            vars: globals.with(&tree.node(root).set),
            supplied: Vec::new(),
            help_supplied: false,
            arg_index: 0,
            cumulative_count: 0,
            args_started: false,
            flags_ended: false,
            pending: None,
        }
    }

    fn step(&mut self, word: &str) {
        if let Some(flag) = self.pending.take() {
            if !looks_like_flag(word) {
                debug!("`{}` is the value of {}", word, self.tree.flag(flag));
                return;
            }
        }

        if self.flags_ended {
            self.consume_arg(word);
        } else if word == "--" {
            self.flags_ended = true;
        } else if looks_like_flag(word) {
            self.apply_flag(word);
        } else if !self.descend(word) {
            self.consume_arg(word);
        }
    }

    fn apply_flag(&mut self, word: &str) {
        let (spelling, inline_value) = match split_inline(word) {
            Some((spelling, value)) => (spelling, Some(value)),
            None => (word, None),
        };

        let Some(id) = self.tree.find_flag(self.node, spelling) else {
            if HELP_SPELLINGS.contains(&spelling) {
                self.help_supplied = true;
            } else {
                debug!("Ignoring unknown flag `{}`", spelling);
            }
            return;
        };

        let flag = self.tree.flag(id);
        self.supplied.push(id);
        self.vars = self.vars.with(&flag.set);

        if flag.value && inline_value.is_none() {
            self.pending = Some(id);
        }
    }

    fn descend(&mut self, word: &str) -> bool {
        if self.args_started && !self.policy.descend_after_args {
            return false;
        }

        let Some(child) = self.tree.find_child(self.node, word) else {
            return false;
        };

        let node = self.tree.node(child);
        if node.is_disabled() && !self.policy.enter_disabled {
            debug!("Not entering `{}`: completion is disabled", node.name);
            return false;
        }

        debug!("Entering command `{}`", node.name);
        self.node = child;
        self.vars = self.vars.with(&node.set);
        self.arg_index = 0;
        self.cumulative_count = 0;
        self.args_started = false;
        true
    }

    fn consume_arg(&mut self, word: &str) {
        self.args_started = true;

        let args = &self.tree.node(self.node).args;
        match args.get(self.arg_index) {
            Some(arg) if arg.cumulative => {
                self.cumulative_count += 1;
                debug!("`{}` absorbed by {}", word, arg);
            }
            Some(arg) => {
                self.arg_index += 1;
                debug!("`{}` bound to {}", word, arg);
            }
            None => debug!("Stray positional `{}`", word),
        }
    }

    fn position(&self, last: &str) -> Position {
        if self.flags_ended {
            return Position::Word;
        }

        if let Some(flag) = self.pending {
            if !looks_like_flag(last) {
                return Position::FlagValue(flag);
            }
        }

        if let Some((spelling, value)) = split_inline(last) {
            if let Some(flag) = self.tree.find_flag(self.node, spelling) {
                if self.tree.flag(flag).value {
                    return Position::InlineValue {
                        flag,
                        head: format!("{spelling}="),
                        value: value.to_string(),
                    };
                }
            }
        }

        if looks_like_flag(last) {
            Position::Flag
        } else {
            Position::Word
        }
    }

    fn finish(self, last: &str) -> Resolution {
        let position = self.position(last);

        let eligible_flags = self
            .tree
            .scoped_flags(self.node)
            .into_iter()
            .filter(|id| self.tree.flag(*id).repeatable || !self.supplied.contains(id))
            .collect();

        let node = self.tree.node(self.node);
        let next_arg = (self.arg_index < node.args.len()).then_some(self.arg_index);

        Resolution {
            node: self.node,
            vars: self.vars,
            eligible_flags,
            next_arg,
            cumulative_count: self.cumulative_count,
            can_descend: !self.args_started || self.policy.descend_after_args,
            offer_help: node.help_flag && !self.help_supplied,
            position,
            last: last.to_string(),
        }
    }
}

/// Resolves the finished words of `line` against `tree`.
#[must_use]
pub fn resolve(tree: &CommandTree, line: &Line, globals: &Vars, policy: ResolvePolicy) -> Resolution {
    let mut walk = Walk::new(tree, globals, policy);
    for word in &line.completed {
        walk.step(word);
    }
    walk.finish(&line.last)
}
