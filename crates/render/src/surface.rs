use std::cell::RefCell;
use std::rc::Rc;

use crate::frame::RenderFrame;

/// Drawing target a view is mounted on.
///
/// The host owns the real backend (a window, a canvas, a file); views only
/// hand it complete frames.
pub trait Surface {
    fn present(&mut self, frame: &RenderFrame);

    /// Drops everything drawn so far. Called when a view is disposed.
    fn clear(&mut self);
}

#[derive(Debug, Default)]
struct Recording {
    last: Option<RenderFrame>,
    presented: usize,
    cleared: usize,
}

/// Surface that keeps the most recent frame.
///
/// Clones share the same recording, so a host can mount one clone on a view
/// and read frames back through another.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    inner: Rc<RefCell<Recording>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_frame(&self) -> Option<RenderFrame> {
        self.inner.borrow().last.clone()
    }

    pub fn presented(&self) -> usize {
        self.inner.borrow().presented
    }

    pub fn cleared(&self) -> usize {
        self.inner.borrow().cleared
    }
}

impl Surface for RecordingSurface {
    fn present(&mut self, frame: &RenderFrame) {
        let mut rec = self.inner.borrow_mut();
        rec.last = Some(frame.clone());
        rec.presented += 1;
    }

    fn clear(&mut self) {
        let mut rec = self.inner.borrow_mut();
        rec.last = None;
        rec.cleared += 1;
    }
}
