//! engine::module
//!
//! Overloads that share one invocation name.
//!
//! # Selection
//!
//! [`CommandModule::find_candidate`] scores every enabled overload with
//! `soft_invoke` and keeps the highest score. Ties go to the overload
//! registered first. An overload is only considered when it can accept
//! the tail at all: the tail is blank, the overload takes raw arguments,
//! or at least one token scored.
//!
//! Scoring is a heuristic. Overloads that score the same for an input are
//! resolved by registration order alone.

use std::fmt;

use crate::transform::TransformerRegistry;

use super::command::InternalCommand;

/// All overloads registered under one case-folded name.
pub struct CommandModule<C, R> {
    tag: String,
    commands: Vec<InternalCommand<C, R>>,
}

impl<C, R> CommandModule<C, R> {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            commands: Vec::new(),
        }
    }

    /// The case-folded name the module is registered under.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Overloads in registration order.
    pub fn commands(&self) -> &[InternalCommand<C, R>] {
        &self.commands
    }

    pub(crate) fn push(&mut self, command: InternalCommand<C, R>) {
        self.commands.push(command);
    }

    /// Pick the overload that best fits `tail`.
    ///
    /// When every overload belongs to a disabled gear the first one is
    /// returned, so invoking it reports the disabled gear.
    pub fn find_candidate(
        &self,
        tail: &str,
        ctx: &C,
        transformers: &TransformerRegistry<C>,
    ) -> Option<&InternalCommand<C, R>> {
        let blank = tail.trim().is_empty();
        let mut best: Option<(&InternalCommand<C, R>, usize)> = None;

        for command in self.commands.iter().filter(|c| c.is_enabled()) {
            let score = command.soft_invoke(tail, ctx, transformers);
            tracing::trace!(module = %self.tag, command = %command.name(), score, "scored overload");

            if !(blank || command.is_raw() || score > 0) {
                continue;
            }
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((command, score));
            }
        }

        match best {
            Some((command, _)) => Some(command),
            None if self.commands.iter().all(|c| !c.is_enabled()) => self.commands.first(),
            None => None,
        }
    }
}

impl<C, R> fmt::Debug for CommandModule<C, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandModule")
            .field("tag", &self.tag)
            .field("commands", &self.commands)
            .finish()
    }
}
