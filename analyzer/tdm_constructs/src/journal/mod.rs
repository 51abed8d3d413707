//! Journal: the cycle-safe stub writer.
//!
//! A [`Journal`] renders constructs into deterministic text. It owns the
//! output buffer, the current indent and verbosity, and the recursion guard
//! for one top-level call, so independent calls never share state and may
//! run concurrently over the same project.
//!
//! # Writing primitives
//!
//! Text primitives are no-ops on empty input: a prefix or suffix is never
//! written around nothing, and the `*_line` variants only end the line when
//! something was written.
//!
//! # Cycle guard
//!
//! Every construct write registers `(construct, mode)` as in progress for
//! the duration of the call. Re-entering a pair that is already in progress
//! is a cycle, handled according to [`CyclePolicy`].

mod stub;

use std::fmt;

use rustc_hash::FxHashSet;

use crate::handle::Handle;
use crate::project::Project;
use crate::stack::ensure_sufficient_stack;
use crate::{ConstructId, Kind};

/// Indent unit, one per nesting level.
const INDENT: &str = "  ";

/// Verbosity of a stub.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Identity only: names, and inline shapes for anonymous types.
    Short,
    /// Full structural bodies.
    #[default]
    Long,
}

impl Mode {
    pub const fn name(self) -> &'static str {
        match self {
            Mode::Short => "short",
            Mode::Long => "long",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What to do when a construct is re-entered while already being written.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum CyclePolicy {
    /// Abort the call with [`StubError::RecursionDetected`].
    #[default]
    Fail,
    /// Write `<recursion: kind#id mode>` in place and continue.
    Mark,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct StubOptions {
    /// Mode of the top-level construct.
    pub mode: Mode,
    pub cycle_policy: CyclePolicy,
    /// Maximum number of nested construct writes.
    pub max_depth: usize,
}

impl StubOptions {
    pub const DEFAULT_MAX_DEPTH: usize = 256;

    #[must_use]
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn with_cycle_policy(mut self, cycle_policy: CyclePolicy) -> Self {
        self.cycle_policy = cycle_policy;
        self
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for StubOptions {
    fn default() -> Self {
        StubOptions {
            mode: Mode::Long,
            cycle_policy: CyclePolicy::Fail,
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }
}

/// A failed stub call. Only the call that raised it is aborted.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StubError {
    #[error("recursion detected while writing {kind} {construct} in {mode} mode")]
    RecursionDetected {
        construct: ConstructId,
        kind: Kind,
        mode: Mode,
    },

    #[error("stub nesting exceeds the limit of {limit} levels")]
    DepthExceeded { limit: usize },
}

/// Render one construct with the given options.
pub fn render(
    project: &Project,
    construct: ConstructId,
    options: StubOptions,
) -> Result<String, StubError> {
    let mut journal = Journal::new(project, options);
    journal.write_construct(construct)?;
    Ok(journal.finish())
}

/// Output state of one top-level stub call.
pub struct Journal<'p> {
    project: &'p Project,
    out: String,
    indent: usize,
    at_line_start: bool,
    mode: Mode,
    options: StubOptions,
    in_progress: FxHashSet<(ConstructId, Mode)>,
    depth: usize,
}

impl<'p> Journal<'p> {
    pub fn new(project: &'p Project, options: StubOptions) -> Self {
        Journal {
            project,
            out: String::new(),
            indent: 0,
            at_line_start: true,
            mode: options.mode,
            options,
            in_progress: FxHashSet::default(),
            depth: 0,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn finish(self) -> String {
        self.out
    }

    // === Text ===

    /// Write raw text, indenting first when at the start of a line.
    pub fn write(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if self.at_line_start {
            for _ in 0..self.indent {
                self.out.push_str(INDENT);
            }
            self.at_line_start = false;
        }
        self.out.push_str(text);
    }

    /// Write `prefix text suffix`; nothing at all when `text` is empty.
    pub fn write_wrapped(&mut self, prefix: &str, text: &str, suffix: &str) -> bool {
        if text.is_empty() {
            return false;
        }
        self.write(prefix);
        self.write(text);
        self.write(suffix);
        true
    }

    /// [`write_wrapped`](Self::write_wrapped), ending the line if written.
    pub fn write_line(&mut self, prefix: &str, text: &str, suffix: &str) {
        if self.write_wrapped(prefix, text, suffix) {
            self.newline();
        }
    }

    pub fn newline(&mut self) {
        self.out.push('\n');
        self.at_line_start = true;
    }

    // === Constructs ===

    /// Write one construct in the current mode.
    pub fn write_construct(&mut self, construct: impl Into<ConstructId>) -> Result<(), StubError> {
        let id = construct.into();
        self.guarded(id, |journal| journal.stub(id))
    }

    pub fn write_construct_wrapped(
        &mut self,
        prefix: &str,
        construct: impl Into<ConstructId>,
        suffix: &str,
    ) -> Result<(), StubError> {
        self.write(prefix);
        self.write_construct(construct)?;
        self.write(suffix);
        Ok(())
    }

    /// Write `items` with `write_item`, separated, and wrapped in `prefix`
    /// and `suffix`. Nothing is written for an empty list.
    pub fn write_each<T>(
        &mut self,
        prefix: &str,
        items: &[T],
        separator: &str,
        suffix: &str,
        mut write_item: impl FnMut(&mut Self, &T) -> Result<(), StubError>,
    ) -> Result<bool, StubError> {
        if items.is_empty() {
            return Ok(false);
        }
        self.write(prefix);
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.write(separator);
            }
            write_item(self, item)?;
        }
        self.write(suffix);
        Ok(true)
    }

    /// Write a list of constructs in the current mode.
    pub fn write_list<H: Handle>(
        &mut self,
        prefix: &str,
        items: &[H],
        separator: &str,
        suffix: &str,
    ) -> Result<bool, StubError> {
        self.write_each(prefix, items, separator, suffix, |journal, &item| {
            journal.write_construct(item)
        })
    }

    /// [`write_list`](Self::write_list), ending the line if written.
    pub fn write_list_line<H: Handle>(
        &mut self,
        prefix: &str,
        items: &[H],
        separator: &str,
        suffix: &str,
    ) -> Result<(), StubError> {
        if self.write_list(prefix, items, separator, suffix)? {
            self.newline();
        }
        Ok(())
    }

    // === Derived state ===

    /// Run `f` in short mode.
    pub fn short<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.with_mode(Mode::Short, f)
    }

    /// Run `f` in long mode.
    pub fn long<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.with_mode(Mode::Long, f)
    }

    /// Run `f` one nesting level deeper.
    pub fn indented<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.indent += 1;
        let result = f(self);
        self.indent -= 1;
        result
    }

    fn with_mode<R>(&mut self, mode: Mode, f: impl FnOnce(&mut Self) -> R) -> R {
        let saved = std::mem::replace(&mut self.mode, mode);
        let result = f(self);
        self.mode = saved;
        result
    }

    /// Run `f` as the write of `id` in the current mode, under the cycle
    /// guard and depth ceiling.
    fn guarded(
        &mut self,
        id: ConstructId,
        f: impl FnOnce(&mut Self) -> Result<(), StubError>,
    ) -> Result<(), StubError> {
        let key = (id, self.mode);
        if !self.in_progress.insert(key) {
            let kind = self.project.kind(id);
            return match self.options.cycle_policy {
                CyclePolicy::Fail => Err(StubError::RecursionDetected {
                    construct: id,
                    kind,
                    mode: self.mode,
                }),
                CyclePolicy::Mark => {
                    tracing::debug!(
                        construct = %id,
                        %kind,
                        mode = %self.mode,
                        "stub recursion marked"
                    );
                    self.write(&format!("<recursion: {kind}{id} {}>", self.mode));
                    Ok(())
                }
            };
        }
        if self.depth >= self.options.max_depth {
            self.in_progress.remove(&key);
            return Err(StubError::DepthExceeded {
                limit: self.options.max_depth,
            });
        }

        self.depth += 1;
        let result = ensure_sufficient_stack(|| f(self));
        self.depth -= 1;
        self.in_progress.remove(&key);
        result
    }
}

#[cfg(test)]
mod tests;
