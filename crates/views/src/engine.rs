//! Contract between a view and its host.

use std::rc::Rc;

use formats::config::AttributeBindings;
use formats::dataset::Record;
use foundation::bounds::Rect2;
use foundation::ids::RecordIndex;
use foundation::math::Vec2;
use render::Surface;
use runtime::frame::Frame;
use scene::selection::SelectionSet;

/// Pixel size of the container a view is mounted in.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Interaction events a view can emit.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Capabilities {
    bits: u8,
}

impl Capabilities {
    pub const NONE: Self = Self { bits: 0 };
    pub const CLICK: Self = Self { bits: 1 };
    pub const HOVER_ENTER: Self = Self { bits: 1 << 1 };
    pub const HOVER_LEAVE: Self = Self { bits: 1 << 2 };
    pub const BRUSH: Self = Self { bits: 1 << 3 };

    pub const fn union(self, other: Self) -> Self {
        Self {
            bits: self.bits | other.bits,
        }
    }

    pub const fn contains(self, other: Self) -> bool {
        self.bits & other.bits == other.bits
    }

    pub const fn is_empty(self) -> bool {
        self.bits == 0
    }
}

impl std::ops::BitOr for Capabilities {
    type Output = Self;

    fn bitor(self, other: Self) -> Self {
        self.union(other)
    }
}

/// What a view reports after translating raw pointer input.
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionEvent {
    Click(Rc<Record>),
    HoverEnter(Rc<Record>),
    HoverLeave,
    /// Records inside the brush; empty when the brush is cleared.
    Brush(Vec<Rc<Record>>),
}

impl InteractionEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            InteractionEvent::Click(_) => "click",
            InteractionEvent::HoverEnter(_) => "hover_enter",
            InteractionEvent::HoverLeave => "hover_leave",
            InteractionEvent::Brush(_) => "brush",
        }
    }
}

/// Receiver of a view's interaction events.
///
/// Implementations must not call back into the emitting view synchronously;
/// the view is still mutably borrowed while it emits.
pub trait InteractionHandler {
    fn handle(&self, event: InteractionEvent);
}

/// Raw host input, in surface pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum PointerEvent {
    Move(Vec2),
    Click(Vec2),
    /// Pointer left the surface.
    Leave,
    /// Brush rectangle after a drag step; `None` clears the brush.
    Brush(Option<Rect2>),
}

/// A visualization that can be mounted, fed data and kept in sync.
///
/// Lifecycle: `initialize` once, then any number of `render`,
/// `set_selection`, `set_hovered`, `handle_pointer` and `advance` calls in
/// any order, then `dispose`. Calls before `initialize` or after `dispose`
/// are ignored. None of these operations fail.
pub trait RenderEngine {
    fn name(&self) -> &'static str;

    fn capabilities(&self) -> Capabilities;

    fn initialize(&mut self, surface: Box<dyn Surface>, size: Size);

    /// Reconciles the view against the full dataset.
    fn render(
        &mut self,
        data: &[Rc<Record>],
        bindings: &AttributeBindings,
        handler: Rc<dyn InteractionHandler>,
    );

    fn set_selection(&mut self, selection: &SelectionSet);

    fn set_hovered(&mut self, hovered: Option<RecordIndex>);

    fn handle_pointer(&mut self, event: PointerEvent);

    /// Samples transitions at `frame.time` and presents a new picture.
    fn advance(&mut self, frame: Frame);

    fn dispose(&mut self);
}
