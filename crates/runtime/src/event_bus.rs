use std::fmt;

use crate::frame::Frame;

/// What happened to a view element or to the shared interaction state.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TraceKind {
    /// Key appeared in a render pass.
    Enter,
    /// Key survived a render pass (including an exiting key that came back).
    Update,
    /// Key left a render pass; its exit transition started.
    Exit,
    /// Exit transition finished and the element was dropped.
    Removed,
    Selection,
    Hover,
    /// Outbound interaction event (`click`, `hover_enter`, ...).
    Gesture(&'static str),
}

impl TraceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TraceKind::Enter => "enter",
            TraceKind::Update => "update",
            TraceKind::Exit => "exit",
            TraceKind::Removed => "removed",
            TraceKind::Selection => "selection",
            TraceKind::Hover => "hover",
            TraceKind::Gesture(name) => *name,
        }
    }
}

impl fmt::Display for TraceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceEvent {
    pub frame_index: u64,
    pub kind: TraceKind,
    /// Element key or short payload summary.
    pub subject: String,
}

impl fmt::Display for TraceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} {}", self.frame_index, self.kind, self.subject)
    }
}

/// Append-only trace of what a view did, tagged with the host frame.
///
/// Ordering contract: events are kept in emission order.
#[derive(Debug, Default)]
pub struct EventBus {
    events: Vec<TraceEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn emit(&mut self, frame: Frame, kind: TraceKind, subject: impl Into<String>) {
        self.events.push(TraceEvent {
            frame_index: frame.index,
            kind,
            subject: subject.into(),
        });
    }

    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    pub fn count(&self, kind: TraceKind) -> usize {
        self.of_kind(kind).count()
    }

    pub fn of_kind(&self, kind: TraceKind) -> impl Iterator<Item = &TraceEvent> + '_ {
        self.events.iter().filter(move |e| e.kind == kind)
    }

    /// Subjects of `kind`, in emission order.
    pub fn subjects(&self, kind: TraceKind) -> Vec<&str> {
        self.of_kind(kind).map(|e| e.subject.as_str()).collect()
    }

    /// Events emitted at or after `frame_index`.
    pub fn since(&self, frame_index: u64) -> &[TraceEvent] {
        let start = self.events.partition_point(|e| e.frame_index < frame_index);
        &self.events[start..]
    }

    pub fn drain(&mut self) -> Vec<TraceEvent> {
        std::mem::take(&mut self.events)
    }
}
