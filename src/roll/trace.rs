//! The evaluation trace.
//!
//! Every traced node appends one formatted line. Lines produced while a repeat
//! body is being evaluated are grouped into numbered steps: a `#a-b` header
//! opens each step and a blank line closes it once the outermost traced node of
//! that step has finished.

use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum TraceEvent {
    /// `#1-2`: the counter stack at the start of a repeat step.
    StepHeader(Vec<usize>),
    Line(String),
    /// The summary line of a finished repeat.
    RepeatSummary(String),
    StepEnd,
}

impl fmt::Display for TraceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StepHeader(counters) => {
                f.write_str("#")?;
                for (i, c) in counters.iter().enumerate() {
                    if i > 0 {
                        f.write_str("-")?;
                    }
                    write!(f, "{}", c)?;
                }
                Ok(())
            }
            Self::Line(s) => f.write_str(s),
            Self::RepeatSummary(s) => writeln!(f, "{}", s),
            Self::StepEnd => f.write_str(" "),
        }
    }
}

#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Trace {
    events: Vec<TraceEvent>,
    depth: usize,
    counters: Vec<usize>,
    open: usize,
}

impl Trace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.events.clear();
        self.reset();
    }

    /// Drops nesting state left behind by an aborted evaluation, keeping the lines.
    pub fn reset(&mut self) {
        self.depth = 0;
        self.counters.clear();
        self.open = 0;
    }

    /// Drops every event after the first `len`.
    pub fn truncate(&mut self, len: usize) {
        self.events.truncate(len);
    }

    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    pub fn lines(&self) -> Vec<String> {
        self.events.iter().map(ToString::to_string).collect()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn repeat_depth(&self) -> usize {
        self.depth
    }

    pub(crate) fn enter_repeat(&mut self) {
        self.depth += 1;
        self.counters.push(1);
    }

    pub(crate) fn leave_repeat(&mut self, summary: String) {
        self.events.push(TraceEvent::RepeatSummary(summary));
        self.depth = self.depth.saturating_sub(1);
        self.counters.pop();
        if let Some(parent) = self.counters.last_mut() {
            *parent += 1;
        }
    }

    pub(crate) fn enter_step(&mut self) {
        if self.depth == 0 {
            return;
        }
        if self.open == 0 {
            self.events.push(TraceEvent::StepHeader(self.counters.clone()));
            if let Some(current) = self.counters.last_mut() {
                *current += 1;
            }
        }
        self.open += 1;
    }

    pub(crate) fn leave_step(&mut self, line: String) {
        if self.depth > 0 {
            self.open = self.open.saturating_sub(1);
        }
        self.events.push(TraceEvent::Line(line));
        if self.depth > 0 && self.open == 0 {
            self.events.push(TraceEvent::StepEnd);
        }
    }
}

impl fmt::Display for Trace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, event) in self.events.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            fmt::Display::fmt(event, f)?;
        }
        Ok(())
    }
}

/// Caller-chosen key routing an evaluation to its own [`Trace`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u64);

/// One shared trace plus isolated traces for concurrent callers.
#[derive(Debug, Default)]
pub struct Recorders {
    shared: Trace,
    sessions: HashMap<SessionId, Trace>,
}

impl Recorders {
    pub fn new() -> Self {
        Self::default()
    }

    /// The trace an evaluation should write to: the session's own trace, or the shared one.
    pub fn route(&mut self, session: Option<SessionId>) -> &mut Trace {
        match session {
            Some(id) => self.sessions.entry(id).or_default(),
            None => &mut self.shared,
        }
    }

    pub fn shared(&self) -> &Trace {
        &self.shared
    }

    pub fn session(&self, id: SessionId) -> Option<&Trace> {
        self.sessions.get(&id)
    }

    pub fn close(&mut self, id: SessionId) -> Option<Trace> {
        self.sessions.remove(&id)
    }
}
