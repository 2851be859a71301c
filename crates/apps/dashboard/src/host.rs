//! Mounts both views on recording surfaces and drives them frame by frame.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use formats::config::DashboardConfig;
use formats::dataset::Dataset;
use foundation::bounds::Rect2;
use foundation::ids::RecordIndex;
use foundation::math::Vec2;
use interaction::{Mediator, Subscription, TracingStore};
use render::RecordingSurface;
use render::svg::to_svg;
use runtime::frame::Frame;
use scene::entity::ElementKey;
use scene::selection::SelectionSet;
use tracing::{debug, info, warn};
use views::engine::{PointerEvent, RenderEngine, Size};
use views::{CirclePackView, ScatterplotView};

use crate::script::{Gesture, Target, ViewName};

pub const SCATTERPLOT_SVG: &str = "scatterplot.svg";
pub const CIRCLE_PACK_SVG: &str = "circle_pack.svg";

/// Frames run after every pointer gesture so emphasis transitions settle.
const SETTLE_SECONDS: f64 = 0.25;

struct Mounted<V> {
    view: Rc<RefCell<V>>,
    surface: RecordingSurface,
}

impl<V: RenderEngine> Mounted<V> {
    fn new(mut view: V, width: f64, height: f64) -> Self {
        let surface = RecordingSurface::new();
        view.initialize(Box::new(surface.clone()), Size::new(width, height));
        Self {
            view: Rc::new(RefCell::new(view)),
            surface,
        }
    }

    fn svg(&self) -> Option<String> {
        self.surface.last_frame().map(|frame| to_svg(&frame))
    }
}

pub struct Dashboard {
    config: DashboardConfig,
    mediator: Mediator,
    scatter: Mounted<ScatterplotView>,
    pack: Mounted<CirclePackView>,
    data: Dataset,
    frame: Frame,
    _subscriptions: Vec<Subscription>,
}

impl Dashboard {
    pub fn mount(config: DashboardConfig, data: Dataset) -> Self {
        let mediator = Mediator::new();
        mediator.add_store_listener(Rc::new(TracingStore));

        let scatter = Mounted::new(
            ScatterplotView::new(),
            config.scatterplot.width,
            config.scatterplot.height,
        );
        let pack = Mounted::new(
            CirclePackView::new().with_root_label(config.root_label.clone()),
            config.circle_pack.width,
            config.circle_pack.height,
        );
        let subscriptions = vec![
            mediator.subscribe(&scatter.view),
            mediator.subscribe(&pack.view),
        ];
        let frame = Frame::first(config.fps);

        let mut dashboard = Self {
            config,
            mediator,
            scatter,
            pack,
            data,
            frame,
            _subscriptions: subscriptions,
        };
        dashboard.render();
        dashboard.step();
        dashboard
    }

    pub fn mediator(&self) -> &Mediator {
        &self.mediator
    }

    pub fn frame(&self) -> Frame {
        self.frame
    }

    pub fn selection(&self) -> SelectionSet {
        self.mediator.state().selected().clone()
    }

    pub fn hovered(&self) -> Option<RecordIndex> {
        self.mediator.state().hovered()
    }

    pub fn scatterplot(&self) -> &Rc<RefCell<ScatterplotView>> {
        &self.scatter.view
    }

    pub fn circle_pack(&self) -> &Rc<RefCell<CirclePackView>> {
        &self.pack.view
    }

    /// Re-delivers a dataset to both views.
    pub fn deliver(&mut self, data: Dataset) {
        if data.same_content(&self.data) {
            info!(hash = data.short_hash(), "dataset re-delivered unchanged");
        } else {
            info!(
                records = data.len(),
                hash = data.short_hash(),
                "dataset replaced"
            );
        }
        self.data = data;
        self.render();
    }

    fn render(&mut self) {
        let records = self.data.records();
        let bindings = &self.config.bindings;
        self.scatter
            .view
            .borrow_mut()
            .render(records, bindings, self.mediator.handler());
        self.pack
            .view
            .borrow_mut()
            .render(records, bindings, self.mediator.handler());
    }

    /// Applies one gesture, flushes the mediator and lets transitions run.
    ///
    /// `reload_from` is the dataset path used when a `reload` gesture names
    /// no file of its own.
    pub fn apply(&mut self, gesture: &Gesture, reload_from: Option<&Path>) -> Result<(), String> {
        debug!(op = gesture.name(), frame = self.frame.index, "gesture");
        match gesture {
            Gesture::Click { view, .. } | Gesture::Hover { view, .. } => {
                let Some(point) = gesture.target().and_then(|t| self.resolve(*view, t)) else {
                    warn!(op = gesture.name(), %view, "gesture target not on screen; skipped");
                    return Ok(());
                };
                let event = if matches!(gesture, Gesture::Click { .. }) {
                    PointerEvent::Click(point)
                } else {
                    PointerEvent::Move(point)
                };
                self.pointer(*view, event);
            }
            Gesture::Leave { view } => self.pointer(*view, PointerEvent::Leave),
            Gesture::Brush { from, to } => {
                let rect = Rect2::from_corners(Vec2::new(from[0], from[1]), Vec2::new(to[0], to[1]));
                self.pointer(ViewName::Scatterplot, PointerEvent::Brush(Some(rect)));
            }
            Gesture::ClearBrush => self.pointer(ViewName::Scatterplot, PointerEvent::Brush(None)),
            Gesture::Wait { seconds } => {
                self.run_for(*seconds);
                return Ok(());
            }
            Gesture::Reload { data } => {
                let path: PathBuf = match (data, reload_from) {
                    (Some(path), _) => path.clone(),
                    (None, Some(path)) => path.to_path_buf(),
                    (None, None) => return Err("reload needs a dataset path".to_string()),
                };
                let dataset =
                    Dataset::load(&path).map_err(|e| format!("reload {}: {e}", path.display()))?;
                self.deliver(dataset);
            }
        }
        self.run_for(SETTLE_SECONDS);
        Ok(())
    }

    fn resolve(&self, view: ViewName, target: Target) -> Option<Vec2> {
        match target {
            Target::Point { x, y } => Some(Vec2::new(x, y)),
            Target::Record(index) => match view {
                ViewName::Scatterplot => self
                    .scatter
                    .view
                    .borrow()
                    .marker_position(RecordIndex(index)),
                ViewName::CirclePack => self
                    .pack
                    .view
                    .borrow()
                    .mark_position(&ElementKey::Record(RecordIndex(index))),
            },
        }
    }

    fn pointer(&mut self, view: ViewName, event: PointerEvent) {
        match view {
            ViewName::Scatterplot => self.scatter.view.borrow_mut().handle_pointer(event),
            ViewName::CirclePack => self.pack.view.borrow_mut().handle_pointer(event),
        }
        let applied = self.mediator.flush();
        debug!(%view, applied, "mediator flushed");
    }

    /// Advances both views until at least `seconds` of engine time passed.
    pub fn run_for(&mut self, seconds: f64) {
        let until = self.frame.skip(seconds).index;
        while self.frame.index < until {
            self.frame = self.frame.next();
            self.step();
        }
    }

    fn step(&mut self) {
        self.scatter.view.borrow_mut().advance(self.frame);
        self.pack.view.borrow_mut().advance(self.frame);
    }

    /// Writes the last presented frame of each view as SVG.
    pub fn write_snapshots(&self, out: &Path) -> Result<Vec<PathBuf>, String> {
        fs::create_dir_all(out).map_err(|e| format!("create {}: {e}", out.display()))?;
        let mut written = Vec::new();
        for (name, svg) in [
            (SCATTERPLOT_SVG, self.scatter.svg()),
            (CIRCLE_PACK_SVG, self.pack.svg()),
        ] {
            let Some(svg) = svg else {
                warn!(file = name, "view never presented; snapshot skipped");
                continue;
            };
            let path = out.join(name);
            fs::write(&path, svg).map_err(|e| format!("write {}: {e}", path.display()))?;
            written.push(path);
        }
        Ok(written)
    }
}
