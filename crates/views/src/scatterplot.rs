//! Scatterplot with axes, keyed markers and a rectangular brush.
//!
//! Marker positions are kept in plot coordinates (origin at the top-left of
//! the area inside the margins); pointer input arrives in surface pixels and
//! is shifted by the margin before hit testing.

use std::rc::Rc;

use formats::config::AttributeBindings;
use formats::dataset::Record;
use foundation::bounds::Rect2;
use foundation::ids::RecordIndex;
use foundation::math::Vec2;
use foundation::scale::LinearScale;
use foundation::time::Time;
use render::{Paint, RenderCommand, RenderFrame, Surface};
use runtime::event_bus::{EventBus, TraceKind};
use runtime::frame::Frame;
use runtime::metrics::Metrics;
use runtime::transition::Tween;
use scene::entity::ElementKey;
use scene::pack::Circle;
use scene::picking::{brush_select, pick_topmost};
use scene::reconcile::{JoinEffects, reconcile};
use scene::selection::SelectionSet;
use scene::world::{Phase, World};
use tracing::{debug, warn};

use crate::axis::Axis;
use crate::engine::{
    Capabilities, InteractionEvent, InteractionHandler, PointerEvent, RenderEngine, Size,
};
use crate::style::{Look, scatter};

/// One plotted record.
#[derive(Debug, Clone)]
pub struct Marker {
    record: Rc<Record>,
    position: Tween<Vec2>,
    look: Tween<Look>,
}

impl Marker {
    pub fn record(&self) -> &Rc<Record> {
        &self.record
    }

    /// Where the marker is heading, in plot coordinates.
    pub fn target_position(&self) -> Vec2 {
        self.position.target()
    }

    pub fn position_at(&self, t: Time) -> Vec2 {
        self.position.value_at(t)
    }

    pub fn target_look(&self) -> Look {
        self.look.target()
    }

    pub fn look_at(&self, t: Time) -> Look {
        self.look.value_at(t)
    }
}

/// Scales of the latest render pass.
#[derive(Debug, Clone)]
struct Plot {
    x: LinearScale,
    y: LinearScale,
}

struct Mount {
    surface: Box<dyn Surface>,
    size: Size,
}

pub struct ScatterplotView {
    mount: Option<Mount>,
    plot: Option<Plot>,
    markers: World<Marker>,
    handler: Option<Rc<dyn InteractionHandler>>,
    selection: SelectionSet,
    hovered: Option<RecordIndex>,
    pointer_over: Option<RecordIndex>,
    /// Active brush in plot coordinates.
    brush: Option<Rect2>,
    frame: Frame,
    bus: EventBus,
    metrics: Metrics,
}

impl Default for ScatterplotView {
    fn default() -> Self {
        Self::new()
    }
}

impl ScatterplotView {
    pub const CAPABILITIES: Capabilities = Capabilities::CLICK
        .union(Capabilities::HOVER_ENTER)
        .union(Capabilities::HOVER_LEAVE)
        .union(Capabilities::BRUSH);

    pub fn new() -> Self {
        Self {
            mount: None,
            plot: None,
            markers: World::new(),
            handler: None,
            selection: SelectionSet::new(),
            hovered: None,
            pointer_over: None,
            brush: None,
            frame: Frame::first(60.0),
            bus: EventBus::new(),
            metrics: Metrics::new(),
        }
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn now(&self) -> Time {
        self.frame.time
    }

    pub fn marker(&self, index: RecordIndex) -> Option<&Marker> {
        self.markers.get(&ElementKey::Record(index))
    }

    pub fn marker_phase(&self, index: RecordIndex) -> Option<Phase> {
        self.markers.phase(&ElementKey::Record(index))
    }

    /// Markers that are not exiting.
    pub fn live_markers(&self) -> impl Iterator<Item = &Marker> + '_ {
        self.markers.live().map(|(_, m)| m)
    }

    /// Marker target position in surface pixels.
    pub fn marker_position(&self, index: RecordIndex) -> Option<Vec2> {
        self.marker(index)
            .map(|m| m.target_position() + scatter::MARGIN.origin())
    }

    /// Active brush in surface pixels.
    pub fn brush(&self) -> Option<Rect2> {
        self.brush.map(|b| b.translate(scatter::MARGIN.origin()))
    }

    fn emit(&mut self, event: InteractionEvent) {
        let detail = match &event {
            InteractionEvent::Click(r) | InteractionEvent::HoverEnter(r) => r.index().to_string(),
            InteractionEvent::HoverLeave => String::new(),
            InteractionEvent::Brush(records) => format!("{} records", records.len()),
        };
        self.bus.emit(self.frame, TraceKind::Gesture(event.kind()), detail);
        if let Some(handler) = &self.handler {
            handler.handle(event);
        }
    }

    /// Retargets every live marker toward the look implied by the current
    /// selection and hover.
    fn restyle(&mut self) {
        let now = self.frame.time;
        for (key, marker, phase) in self.markers.iter_mut() {
            let Some(index) = key.record() else { continue };
            if phase == Phase::Exiting {
                continue;
            }
            let target = scatter::look(
                self.selection.contains(index),
                self.hovered == Some(index),
            );
            if marker.look.target() != target {
                marker
                    .look
                    .retarget(now, target, scatter::HOVER_TRANSITION_S);
            }
        }
    }

    fn hit_test(&self, surface_px: Vec2) -> Option<RecordIndex> {
        let local = surface_px - scatter::MARGIN.origin();
        let now = self.frame.time;
        let candidates = self.markers.live().filter_map(|(key, marker)| {
            let at = marker.position_at(now);
            let r = marker.look_at(now).radius;
            Some((key.record()?, Circle::new(at.x, at.y, r)))
        });
        pick_topmost(local, candidates)
    }

    fn record_of(&self, index: RecordIndex) -> Option<Rc<Record>> {
        self.marker(index).map(|m| Rc::clone(&m.record))
    }

    fn update_brush(&mut self, rect: Option<Rect2>) {
        let Some(mount) = &self.mount else { return };
        let area = scatter::MARGIN.plot_area(mount.size);
        let shift = Vec2::ZERO - scatter::MARGIN.origin();
        self.brush = rect.and_then(|r| r.translate(shift).clamp_to(&area));

        let records = match self.brush {
            None => Vec::new(),
            Some(rect) => {
                let positions = self
                    .markers
                    .live()
                    .map(|(_, m)| (Rc::clone(&m.record), m.target_position()));
                brush_select(&rect, positions)
            }
        };
        debug!(selected = records.len(), cleared = self.brush.is_none(), "brush");
        self.emit(InteractionEvent::Brush(records));
    }

    fn present(&mut self) {
        let Some(mount) = &mut self.mount else { return };
        let origin = scatter::MARGIN.origin();
        let (_, h) = scatter::MARGIN.inner(mount.size);
        let now = self.frame.time;
        let mut frame = RenderFrame::new(mount.size.width, mount.size.height);

        if let Some(plot) = &self.plot {
            let x_axis = Axis::bottom(plot.x, scatter::TICK_COUNT);
            let y_axis = Axis::left(plot.y, scatter::TICK_COUNT);
            frame
                .commands
                .extend(x_axis.commands(origin + Vec2::new(0.0, h)));
            frame.commands.extend(y_axis.commands(origin));
        }

        // Markers sit above the brush so they stay clickable.
        if let Some(brush) = self.brush {
            frame.push(RenderCommand::Rect {
                rect: brush.translate(origin),
                paint: Paint::fill(scatter::BRUSH_FILL)
                    .with_stroke(scatter::BRUSH_STROKE, 1.0)
                    .with_opacity(scatter::BRUSH_OPACITY),
            });
        }

        for (_, marker, _) in self.markers.iter() {
            let look = marker.look_at(now);
            if look.radius <= 0.0 {
                continue;
            }
            frame.push(RenderCommand::Circle {
                center: origin + marker.position_at(now),
                r: look.radius,
                paint: look.paint(),
            });
        }

        mount.surface.present(&frame);
    }
}

/// Enter / update / exit effects for one render pass.
struct MarkerJoin<'a> {
    markers: &'a mut World<Marker>,
    bus: &'a mut EventBus,
    frame: Frame,
    entered: u64,
    updated: u64,
    exited: u64,
}

impl JoinEffects<ElementKey, (Rc<Record>, Vec2)> for MarkerJoin<'_> {
    fn enter(&mut self, key: ElementKey, (record, at): (Rc<Record>, Vec2)) {
        let now = self.frame.time;
        self.bus.emit(self.frame, TraceKind::Enter, key.to_string());
        self.markers.insert(
            key,
            Marker {
                record,
                position: Tween::settled(at),
                look: Tween::animate(
                    scatter::DEFAULT.with_radius(0.0),
                    scatter::DEFAULT,
                    now,
                    scatter::DATA_TRANSITION_S,
                ),
            },
        );
        self.entered += 1;
    }

    fn update(&mut self, key: ElementKey, (record, at): (Rc<Record>, Vec2)) {
        let now = self.frame.time;
        let revived = self.markers.revive(&key);
        self.bus.emit(self.frame, TraceKind::Update, key.to_string());
        if let Some(marker) = self.markers.get_mut(&key) {
            marker.record = record;
            marker
                .position
                .retarget(now, at, scatter::DATA_TRANSITION_S);
            // Updates drop selection emphasis; size and colour carry over.
            let base = if revived {
                scatter::DEFAULT
            } else {
                marker.look.target()
            };
            let look = Look {
                stroke_width: 0.0,
                opacity: scatter::DEFAULT_OPACITY,
                ..base
            };
            marker.look.retarget(now, look, scatter::DATA_TRANSITION_S);
        }
        self.updated += 1;
    }

    fn exit(&mut self, key: ElementKey) {
        if !self.markers.mark_exiting(&key) {
            return;
        }
        let now = self.frame.time;
        self.bus.emit(self.frame, TraceKind::Exit, key.to_string());
        if let Some(marker) = self.markers.get_mut(&key) {
            let gone = marker.look.target().with_radius(0.0);
            marker
                .look
                .retarget(now, gone, scatter::EXIT_TRANSITION_S);
        }
        self.exited += 1;
    }
}

impl RenderEngine for ScatterplotView {
    fn name(&self) -> &'static str {
        "scatterplot"
    }

    fn capabilities(&self) -> Capabilities {
        Self::CAPABILITIES
    }

    fn initialize(&mut self, surface: Box<dyn Surface>, size: Size) {
        self.mount = Some(Mount { surface, size });
        self.present();
    }

    fn render(
        &mut self,
        data: &[Rc<Record>],
        bindings: &AttributeBindings,
        handler: Rc<dyn InteractionHandler>,
    ) {
        let Some(mount) = &self.mount else {
            debug!("scatterplot render before initialize ignored");
            return;
        };
        let (w, h) = scatter::MARGIN.inner(mount.size);
        let x = LinearScale::from_values(data.iter().map(|r| r.number(&bindings.x)), [0.0, w]);
        let y = LinearScale::from_values(data.iter().map(|r| r.number(&bindings.y)), [h, 0.0]);

        let mut keyed = Vec::with_capacity(data.len());
        let mut skipped = 0u64;
        for record in data {
            let px = x.try_map(record.number(&bindings.x));
            let py = y.try_map(record.number(&bindings.y));
            match (px, py) {
                (Some(px), Some(py)) => keyed.push((
                    ElementKey::Record(record.index()),
                    (Rc::clone(record), Vec2::new(px, py)),
                )),
                _ => skipped += 1,
            }
        }
        if skipped > 0 {
            warn!(
                skipped,
                x = %bindings.x,
                y = %bindings.y,
                "records without finite coordinates are not plotted"
            );
            self.metrics.inc_counter("records.skipped", skipped);
        }

        // Exiting markers count as rendered so a returning key is an update.
        let current: Vec<ElementKey> = self.markers.keys().cloned().collect();
        let diff = reconcile(current, keyed);
        let mut join = MarkerJoin {
            markers: &mut self.markers,
            bus: &mut self.bus,
            frame: self.frame,
            entered: 0,
            updated: 0,
            exited: 0,
        };
        diff.apply(&mut join);
        let (entered, updated, exited) = (join.entered, join.updated, join.exited);

        self.metrics.inc_counter("markers.entered", entered);
        self.metrics.inc_counter("markers.updated", updated);
        self.metrics.inc_counter("markers.exited", exited);
        self.metrics
            .set_gauge("markers.live", self.markers.live_len() as i64);
        debug!(entered, updated, exited, skipped, "scatterplot render");

        self.plot = Some(Plot { x, y });
        self.handler = Some(handler);
        if let Some(hovered) = self.pointer_over
            && self.marker_phase(hovered) != Some(Phase::Live)
        {
            self.pointer_over = None;
        }
        self.present();
    }

    fn set_selection(&mut self, selection: &SelectionSet) {
        if self.mount.is_none() {
            return;
        }
        self.selection = selection.clone();
        self.bus
            .emit(self.frame, TraceKind::Selection, format!("{} selected", selection.len()));
        self.restyle();
        self.present();
    }

    fn set_hovered(&mut self, hovered: Option<RecordIndex>) {
        if self.mount.is_none() {
            return;
        }
        self.hovered = hovered;
        let detail = hovered.map(|i| i.to_string()).unwrap_or_default();
        self.bus.emit(self.frame, TraceKind::Hover, detail);
        self.restyle();
        self.present();
    }

    fn handle_pointer(&mut self, event: PointerEvent) {
        if self.mount.is_none() || self.plot.is_none() {
            debug!(?event, "scatterplot pointer input before first render ignored");
            return;
        }
        match event {
            PointerEvent::Move(p) => {
                let hit = self.hit_test(p);
                if hit == self.pointer_over {
                    return;
                }
                if self.pointer_over.take().is_some() {
                    self.emit(InteractionEvent::HoverLeave);
                }
                if let Some(record) = hit.and_then(|i| self.record_of(i)) {
                    self.pointer_over = Some(record.index());
                    self.emit(InteractionEvent::HoverEnter(record));
                }
            }
            PointerEvent::Leave => {
                if self.pointer_over.take().is_some() {
                    self.emit(InteractionEvent::HoverLeave);
                }
            }
            PointerEvent::Click(p) => {
                if let Some(record) = self.hit_test(p).and_then(|i| self.record_of(i)) {
                    self.emit(InteractionEvent::Click(record));
                }
            }
            PointerEvent::Brush(rect) => {
                self.update_brush(rect);
                self.present();
            }
        }
    }

    fn advance(&mut self, frame: Frame) {
        if self.mount.is_none() {
            return;
        }
        self.frame = frame;
        let now = frame.time;
        let removed = self.markers.sweep_exited(|m| m.look.is_finished(now));
        for key in &removed {
            self.bus.emit(frame, TraceKind::Removed, key.to_string());
        }
        if !removed.is_empty() {
            self.metrics
                .inc_counter("markers.removed", removed.len() as u64);
        }
        self.present();
    }

    fn dispose(&mut self) {
        if let Some(mut mount) = self.mount.take() {
            mount.surface.clear();
        }
        self.markers.clear();
        self.plot = None;
        self.handler = None;
        self.brush = None;
        self.pointer_over = None;
        debug!("scatterplot disposed");
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::ScatterplotView;
    use crate::engine::testing::Recorder;
    use crate::engine::{InteractionEvent, InteractionHandler, PointerEvent, RenderEngine, Size};
    use crate::style::{Look, scatter};
    use formats::config::AttributeBindings;
    use formats::dataset::Dataset;
    use foundation::bounds::Rect2;
    use foundation::ids::RecordIndex;
    use foundation::math::Vec2;
    use pretty_assertions::assert_eq;
    use render::RecordingSurface;
    use runtime::event_bus::TraceKind;
    use runtime::frame::Frame;
    use scene::selection::SelectionSet;
    use scene::world::Phase;

    fn bindings() -> AttributeBindings {
        AttributeBindings {
            x: "pop".to_string(),
            y: "crime".to_string(),
            group: "group".to_string(),
            weight: "pop".to_string(),
            color: "crime".to_string(),
        }
    }

    fn data() -> Dataset {
        Dataset::from_json_str(
            r#"[
                {"index": 1, "group": "A", "pop": 10, "crime": 5},
                {"index": 2, "group": "A", "pop": 20, "crime": 50},
                {"index": 3, "group": "B", "pop": 5, "crime": 25}
            ]"#,
        )
        .expect("dataset")
    }

    fn mounted() -> (ScatterplotView, RecordingSurface, Rc<Recorder>) {
        let surface = RecordingSurface::new();
        let mut view = ScatterplotView::new();
        view.initialize(Box::new(surface.clone()), Size::new(800.0, 600.0));
        (view, surface, Rc::new(Recorder::default()))
    }

    fn handler(recorder: &Rc<Recorder>) -> Rc<dyn InteractionHandler> {
        Rc::clone(recorder) as Rc<dyn InteractionHandler>
    }

    /// Frame at `seconds`, at 60 fps.
    fn at(seconds: f64) -> Frame {
        Frame::new((seconds * 60.0).round() as u64, 1.0 / 60.0)
    }

    fn assert_near(actual: Option<Vec2>, expected: Vec2) {
        let actual = actual.expect("position");
        assert!(
            actual.distance(expected) < 1e-9,
            "{actual:?} != {expected:?}"
        );
    }

    fn look_of(view: &ScatterplotView, i: u32) -> Look {
        view.marker(RecordIndex(i)).expect("marker").target_look()
    }

    fn indices(event: &InteractionEvent) -> Vec<u32> {
        match event {
            InteractionEvent::Brush(records) => records.iter().map(|r| r.index().get()).collect(),
            InteractionEvent::Click(r) | InteractionEvent::HoverEnter(r) => vec![r.index().get()],
            InteractionEvent::HoverLeave => Vec::new(),
        }
    }

    #[test]
    fn markers_land_on_scaled_positions() {
        let (mut view, surface, rec) = mounted();
        view.render(data().records(), &bindings(), handler(&rec));
        assert_near(view.marker_position(RecordIndex(1)), Vec2::new(330.0, 550.0));
        assert_near(view.marker_position(RecordIndex(2)), Vec2::new(790.0, 100.0));
        assert_near(view.marker_position(RecordIndex(3)), Vec2::new(100.0, 350.0));
        let frame = surface.last_frame().expect("presented");
        assert!(frame.texts().any(|t| t == "20"));
    }

    #[test]
    fn markers_follow_a_widened_domain() {
        let (mut view, _, rec) = mounted();
        view.render(data().records(), &bindings(), handler(&rec));
        view.advance(at(2.0));
        assert_near(view.marker_position(RecordIndex(2)), Vec2::new(790.0, 100.0));

        let widened = Dataset::from_json_str(
            r#"[
                {"index": 1, "group": "A", "pop": 10, "crime": 0},
                {"index": 2, "group": "A", "pop": 20, "crime": 50},
                {"index": 3, "group": "B", "pop": 5, "crime": 500}
            ]"#,
        )
        .expect("dataset");
        view.render(widened.records(), &bindings(), handler(&rec));
        assert_eq!(view.metrics().counter("markers.updated"), 3);
        assert_near(view.marker_position(RecordIndex(2)), Vec2::new(790.0, 505.0));
        assert_near(view.marker_position(RecordIndex(3)), Vec2::new(100.0, 100.0));

        // Positions tween from the old layout.
        let m = view.marker(RecordIndex(2)).expect("marker");
        let now = m.position_at(view.now()) + scatter::MARGIN.origin();
        assert_near(Some(now), Vec2::new(790.0, 100.0));
    }

    #[test]
    fn rerender_of_same_data_only_updates() {
        let (mut view, _, rec) = mounted();
        view.render(data().records(), &bindings(), handler(&rec));
        view.advance(at(2.0));
        view.render(data().records(), &bindings(), handler(&rec));
        assert_eq!(view.metrics().counter("markers.entered"), 3);
        assert_eq!(view.metrics().counter("markers.updated"), 3);
        assert_eq!(view.metrics().counter("markers.exited"), 0);
        assert_eq!(view.bus().count(TraceKind::Enter), 3);
    }

    #[test]
    fn enter_grows_and_exit_shrinks_then_removes() {
        let (mut view, _, rec) = mounted();
        let all = data();
        view.render(all.records(), &bindings(), handler(&rec));
        let m = view.marker(RecordIndex(3)).expect("marker");
        assert_eq!(m.look_at(view.now()).radius, 0.0);
        view.advance(at(1.5));
        let m = view.marker(RecordIndex(3)).expect("marker");
        assert_eq!(m.look_at(view.now()).radius, scatter::RADIUS);

        view.render(&all.records()[..2], &bindings(), handler(&rec));
        assert_eq!(view.marker_phase(RecordIndex(3)), Some(Phase::Exiting));
        assert_eq!(view.live_markers().count(), 2);
        view.advance(at(1.75));
        assert!(view.marker(RecordIndex(3)).is_some());
        view.advance(at(2.1));
        assert!(view.marker(RecordIndex(3)).is_none());
        assert_eq!(view.bus().count(TraceKind::Removed), 1);
    }

    #[test]
    fn returning_key_cancels_exit() {
        let (mut view, _, rec) = mounted();
        let all = data();
        view.render(all.records(), &bindings(), handler(&rec));
        view.advance(at(1.5));
        view.render(&all.records()[..2], &bindings(), handler(&rec));
        view.advance(at(1.7));
        view.render(all.records(), &bindings(), handler(&rec));
        assert_eq!(view.marker_phase(RecordIndex(3)), Some(Phase::Live));
        assert_eq!(view.metrics().counter("markers.entered"), 3);
        view.advance(at(3.5));
        let m = view.marker(RecordIndex(3)).expect("kept");
        assert_eq!(m.look_at(view.now()).radius, scatter::RADIUS);
    }

    #[test]
    fn non_finite_coordinates_are_skipped() {
        let (mut view, _, rec) = mounted();
        let ds = Dataset::from_json_str(
            r#"[{"pop": 1, "crime": 1}, {"pop": "n/a", "crime": 2}, {"pop": 3, "crime": 3}]"#,
        )
        .expect("dataset");
        view.render(ds.records(), &bindings(), handler(&rec));
        assert_eq!(view.live_markers().count(), 2);
        assert_eq!(view.metrics().counter("records.skipped"), 1);
    }

    #[test]
    fn constant_attribute_still_yields_finite_positions() {
        let (mut view, _, rec) = mounted();
        let ds = Dataset::from_json_str(r#"[{"pop": 7, "crime": 1}, {"pop": 7, "crime": 2}]"#)
            .expect("dataset");
        view.render(ds.records(), &bindings(), handler(&rec));
        for m in view.live_markers() {
            let p = m.target_position();
            assert!(p.is_finite());
            assert_eq!(p.x, 345.0);
        }
    }

    #[test]
    fn brush_emits_markers_inside_inclusive_bounds() {
        let (mut view, _, rec) = mounted();
        view.render(data().records(), &bindings(), handler(&rec));
        let rect = Rect2::from_corners(Vec2::new(90.0, 90.0), Vec2::new(340.0, 560.0));
        view.handle_pointer(PointerEvent::Brush(Some(rect)));
        view.handle_pointer(PointerEvent::Brush(None));
        let events = rec.take();
        assert_eq!(events.len(), 2);
        assert_eq!(indices(&events[0]), vec![1, 3]);
        assert_eq!(events[1], InteractionEvent::Brush(Vec::new()));
        assert_eq!(view.brush(), None);
    }

    #[test]
    fn brush_ignores_exiting_markers() {
        let (mut view, _, rec) = mounted();
        let all = data();
        view.render(all.records(), &bindings(), handler(&rec));
        view.render(&all.records()[1..], &bindings(), handler(&rec));
        view.handle_pointer(PointerEvent::Brush(Some(Rect2::from_size(800.0, 600.0))));
        let events = rec.take();
        assert_eq!(indices(&events[0]), vec![2, 3]);
    }

    #[test]
    fn pointer_input_before_render_is_ignored() {
        let (mut view, _, rec) = mounted();
        view.handle_pointer(PointerEvent::Click(Vec2::new(330.0, 550.0)));
        view.handle_pointer(PointerEvent::Brush(None));
        assert!(rec.events.borrow().is_empty());
    }

    #[test]
    fn click_and_hover_resolve_to_records() {
        let (mut view, _, rec) = mounted();
        view.render(data().records(), &bindings(), handler(&rec));
        view.advance(at(1.5));
        let p2 = view.marker_position(RecordIndex(2)).expect("marker 2");
        let p3 = view.marker_position(RecordIndex(3)).expect("marker 3");

        view.handle_pointer(PointerEvent::Click(p2));
        view.handle_pointer(PointerEvent::Move(p3));
        view.handle_pointer(PointerEvent::Move(p3 + Vec2::new(1.0, 0.0)));
        view.handle_pointer(PointerEvent::Move(p2));
        view.handle_pointer(PointerEvent::Leave);
        view.handle_pointer(PointerEvent::Click(Vec2::new(500.0, 300.0)));

        assert_eq!(
            rec.kinds(),
            vec!["click", "hover_enter", "hover_leave", "hover_enter", "hover_leave"]
        );
        let events = rec.take();
        assert_eq!(indices(&events[0]), vec![2]);
        assert_eq!(indices(&events[1]), vec![3]);
        assert_eq!(indices(&events[3]), vec![2]);
    }

    #[test]
    fn selection_and_hover_precedence() {
        let (mut view, _, rec) = mounted();
        view.render(data().records(), &bindings(), handler(&rec));
        let both: SelectionSet = [RecordIndex(1), RecordIndex(2)].into_iter().collect();
        view.set_selection(&both);
        view.set_hovered(Some(RecordIndex(2)));

        assert_eq!(look_of(&view, 1), scatter::look(true, false));
        assert_eq!(look_of(&view, 2), scatter::look(true, true));
        assert_eq!(look_of(&view, 3), scatter::DEFAULT);
        assert_eq!(look_of(&view, 2).stroke_width, 3.0);
        assert_eq!(look_of(&view, 1).stroke_width, 2.0);
        assert_eq!(look_of(&view, 1).opacity, 1.0);

        view.set_selection(&SelectionSet::new());
        view.set_hovered(None);
        for i in 1..=3 {
            assert_eq!(look_of(&view, i), scatter::DEFAULT);
        }
    }

    #[test]
    fn update_resets_selection_emphasis() {
        let (mut view, _, rec) = mounted();
        view.render(data().records(), &bindings(), handler(&rec));
        view.set_selection(&SelectionSet::single(RecordIndex(1)));
        view.render(data().records(), &bindings(), handler(&rec));
        let look = look_of(&view, 1);
        assert_eq!(look.opacity, scatter::DEFAULT_OPACITY);
        assert_eq!(look.stroke_width, 0.0);
    }

    #[test]
    fn dispose_clears_surface() {
        let (mut view, surface, rec) = mounted();
        view.render(data().records(), &bindings(), handler(&rec));
        view.dispose();
        assert_eq!(surface.cleared(), 1);
        assert!(surface.last_frame().is_none());
        view.render(data().records(), &bindings(), handler(&rec));
        assert!(view.marker(RecordIndex(1)).is_none());
    }
}
