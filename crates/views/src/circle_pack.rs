//! Circle-packing view of the record hierarchy.
//!
//! Every hierarchy node (root, group, leaf) is one retained circle keyed by
//! its [`ElementKey`]. Only leaves react to the pointer and to selection.

use std::rc::Rc;

use formats::config::AttributeBindings;
use formats::dataset::Record;
use foundation::color::Rgb;
use foundation::ids::RecordIndex;
use foundation::math::Vec2;
use foundation::scale::Diverging3ColorScale;
use foundation::time::Time;
use render::{RenderCommand, RenderFrame, Surface};
use runtime::event_bus::{EventBus, TraceKind};
use runtime::frame::Frame;
use runtime::metrics::Metrics;
use runtime::transition::Tween;
use scene::entity::ElementKey;
use scene::hierarchy::{Hierarchy, NodeKind, PackOptions};
use scene::pack::Circle;
use scene::picking::pick_smallest;
use scene::reconcile::{JoinEffects, reconcile};
use scene::selection::SelectionSet;
use scene::world::{Phase, World};
use tracing::debug;

use crate::engine::{
    Capabilities, InteractionEvent, InteractionHandler, PointerEvent, RenderEngine, Size,
};
use crate::style::{Look, pack};

#[derive(Debug, Clone, PartialEq)]
pub enum Role {
    Root,
    Group,
    Leaf(Rc<Record>),
}

/// One packed circle.
#[derive(Debug, Clone)]
pub struct PackMark {
    role: Role,
    center: Tween<Vec2>,
    radius: Tween<f64>,
    fill: Tween<Rgb>,
    stroke: Rgb,
    stroke_width: f64,
    opacity: f64,
}

impl PackMark {
    pub fn role(&self) -> &Role {
        &self.role
    }

    pub fn record(&self) -> Option<&Rc<Record>> {
        match &self.role {
            Role::Leaf(record) => Some(record),
            _ => None,
        }
    }

    pub fn target_center(&self) -> Vec2 {
        self.center.target()
    }

    pub fn target_radius(&self) -> f64 {
        self.radius.target()
    }

    pub fn target_fill(&self) -> Rgb {
        self.fill.target()
    }

    pub fn circle_at(&self, t: Time) -> Circle {
        let c = self.center.value_at(t);
        Circle::new(c.x, c.y, self.radius.value_at(t))
    }

    pub fn look_at(&self, t: Time) -> Look {
        Look {
            radius: self.radius.value_at(t),
            fill: self.fill.value_at(t),
            stroke: self.stroke,
            stroke_width: self.stroke_width,
            opacity: self.opacity,
        }
    }

    fn apply_emphasis(&mut self, look: Look) {
        self.stroke = look.stroke;
        self.stroke_width = look.stroke_width;
        self.opacity = look.opacity;
    }
}

/// Layout and colour of one node for a render pass.
#[derive(Debug, Clone)]
struct PackDatum {
    role: Role,
    circle: Circle,
    fill: Rgb,
}

/// Selection and hover as the view last received them.
#[derive(Debug, Clone, Default)]
struct Emphasis {
    selection: SelectionSet,
    hovered: Option<RecordIndex>,
}

impl Emphasis {
    fn look(&self, role: &Role, radius: f64, fill: Rgb) -> Look {
        match role {
            Role::Leaf(record) => {
                let index = record.index();
                pack::leaf_look(
                    radius,
                    fill,
                    !self.selection.is_empty(),
                    self.selection.contains(index),
                    self.hovered == Some(index),
                )
            }
            Role::Root | Role::Group => pack::group_look(radius),
        }
    }
}

struct Mount {
    surface: Box<dyn Surface>,
    size: Size,
}

pub struct CirclePackView {
    root_label: String,
    mount: Option<Mount>,
    hierarchy: Option<Hierarchy>,
    marks: World<PackMark>,
    handler: Option<Rc<dyn InteractionHandler>>,
    emphasis: Emphasis,
    pointer_over: Option<RecordIndex>,
    frame: Frame,
    bus: EventBus,
    metrics: Metrics,
}

impl Default for CirclePackView {
    fn default() -> Self {
        Self::new()
    }
}

impl CirclePackView {
    pub const CAPABILITIES: Capabilities = Capabilities::CLICK
        .union(Capabilities::HOVER_ENTER)
        .union(Capabilities::HOVER_LEAVE);

    pub fn new() -> Self {
        Self {
            root_label: "root".to_string(),
            mount: None,
            hierarchy: None,
            marks: World::new(),
            handler: None,
            emphasis: Emphasis::default(),
            pointer_over: None,
            frame: Frame::first(60.0),
            bus: EventBus::new(),
            metrics: Metrics::new(),
        }
    }

    pub fn with_root_label(mut self, label: impl Into<String>) -> Self {
        self.root_label = label.into();
        self
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

    /// Hierarchy of the latest render pass.
    pub fn hierarchy(&self) -> Option<&Hierarchy> {
        self.hierarchy.as_ref()
    }

    pub fn mark(&self, key: &ElementKey) -> Option<&PackMark> {
        self.marks.get(key)
    }

    pub fn mark_phase(&self, key: &ElementKey) -> Option<Phase> {
        self.marks.phase(key)
    }

    pub fn leaf(&self, index: RecordIndex) -> Option<&PackMark> {
        self.mark(&ElementKey::Record(index))
    }

    pub fn marks(&self) -> impl Iterator<Item = (&ElementKey, &PackMark, Phase)> + '_ {
        self.marks.iter()
    }

    /// Centre of a mark's target circle in surface pixels.
    pub fn mark_position(&self, key: &ElementKey) -> Option<Vec2> {
        self.mark(key)
            .map(|m| m.target_center() + pack::MARGIN.origin())
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

    /// Re-applies selection and hover emphasis to live leaves.
    fn restyle(&mut self) {
        for (_, mark, phase) in self.marks.iter_mut() {
            if phase == Phase::Exiting || mark.record().is_none() {
                continue;
            }
            let look = self
                .emphasis
                .look(&mark.role, mark.radius.target(), mark.fill.target());
            mark.apply_emphasis(look);
        }
    }

    /// Smallest live leaf under `surface_px`.
    fn hit_test(&self, surface_px: Vec2) -> Option<Rc<Record>> {
        let local = surface_px - pack::MARGIN.origin();
        let now = self.frame.time;
        let leaves = self
            .marks
            .live()
            .filter_map(|(_, mark)| Some((Rc::clone(mark.record()?), mark.circle_at(now))));
        pick_smallest(local, leaves)
    }

    fn present(&mut self) {
        let Some(mount) = &mut self.mount else { return };
        let origin = pack::MARGIN.origin();
        let now = self.frame.time;
        let mut frame = RenderFrame::new(mount.size.width, mount.size.height);
        for (_, mark, _) in self.marks.iter() {
            let look = mark.look_at(now);
            if look.radius <= 0.0 {
                continue;
            }
            frame.push(RenderCommand::Circle {
                center: origin + mark.center.value_at(now),
                r: look.radius,
                paint: look.paint(),
            });
        }
        mount.surface.present(&frame);
    }
}

struct PackJoin<'a> {
    marks: &'a mut World<PackMark>,
    emphasis: &'a Emphasis,
    bus: &'a mut EventBus,
    frame: Frame,
    entered: u64,
    updated: u64,
    exited: u64,
}

impl JoinEffects<ElementKey, PackDatum> for PackJoin<'_> {
    fn enter(&mut self, key: ElementKey, datum: PackDatum) {
        let now = self.frame.time;
        let at = Vec2::new(datum.circle.x, datum.circle.y);
        let look = self.emphasis.look(&datum.role, datum.circle.r, datum.fill);
        self.bus.emit(self.frame, TraceKind::Enter, key.to_string());
        self.marks.insert(
            key,
            PackMark {
                role: datum.role,
                center: Tween::settled(at),
                radius: Tween::animate(0.0, datum.circle.r, now, pack::DATA_TRANSITION_S),
                fill: Tween::settled(datum.fill),
                stroke: look.stroke,
                stroke_width: look.stroke_width,
                opacity: look.opacity,
            },
        );
        self.entered += 1;
    }

    fn update(&mut self, key: ElementKey, datum: PackDatum) {
        let now = self.frame.time;
        self.marks.revive(&key);
        self.bus.emit(self.frame, TraceKind::Update, key.to_string());
        if let Some(mark) = self.marks.get_mut(&key) {
            let at = Vec2::new(datum.circle.x, datum.circle.y);
            mark.center.retarget(now, at, pack::DATA_TRANSITION_S);
            mark.radius
                .retarget(now, datum.circle.r, pack::DATA_TRANSITION_S);
            mark.fill.retarget(now, datum.fill, pack::DATA_TRANSITION_S);
            let look = self.emphasis.look(&datum.role, datum.circle.r, datum.fill);
            mark.role = datum.role;
            mark.apply_emphasis(look);
        }
        self.updated += 1;
    }

    fn exit(&mut self, key: ElementKey) {
        if !self.marks.mark_exiting(&key) {
            return;
        }
        self.bus.emit(self.frame, TraceKind::Exit, key.to_string());
        if let Some(mark) = self.marks.get_mut(&key) {
            mark.radius
                .retarget(self.frame.time, 0.0, pack::EXIT_TRANSITION_S);
        }
        self.exited += 1;
    }
}

impl RenderEngine for CirclePackView {
    fn name(&self) -> &'static str {
        "circle_pack"
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
            debug!("circle pack render before initialize ignored");
            return;
        };
        let (width, height) = pack::MARGIN.inner(mount.size);

        let mut hierarchy =
            Hierarchy::build(data, &bindings.group, &bindings.weight, &self.root_label);
        hierarchy.pack(PackOptions {
            width,
            height,
            padding: pack::PADDING,
        });
        let colors = Diverging3ColorScale::from_values(
            data.iter().map(|r| r.number(&bindings.color)),
            [pack::LOW, pack::MID, pack::HIGH],
        );

        let keyed: Vec<(ElementKey, PackDatum)> = hierarchy
            .descendants()
            .iter()
            .map(|node| {
                let (role, fill) = match &node.kind {
                    NodeKind::Root { .. } => (Role::Root, pack::GROUP_FILL),
                    NodeKind::Group { .. } => (Role::Group, pack::GROUP_FILL),
                    NodeKind::Leaf { record } => (
                        Role::Leaf(Rc::clone(record)),
                        colors.map(record.number(&bindings.color)),
                    ),
                };
                (
                    node.key.clone(),
                    PackDatum {
                        role,
                        circle: node.circle,
                        fill,
                    },
                )
            })
            .collect();

        let current: Vec<ElementKey> = self.marks.keys().cloned().collect();
        let diff = reconcile(current, keyed);
        let mut join = PackJoin {
            marks: &mut self.marks,
            emphasis: &self.emphasis,
            bus: &mut self.bus,
            frame: self.frame,
            entered: 0,
            updated: 0,
            exited: 0,
        };
        diff.apply(&mut join);
        let (entered, updated, exited) = (join.entered, join.updated, join.exited);

        self.metrics.inc_counter("circles.entered", entered);
        self.metrics.inc_counter("circles.updated", updated);
        self.metrics.inc_counter("circles.exited", exited);
        self.metrics
            .set_gauge("circles.live", self.marks.live_len() as i64);
        debug!(
            entered,
            updated,
            exited,
            groups = hierarchy.groups().count(),
            "circle pack render"
        );

        self.hierarchy = Some(hierarchy);
        self.handler = Some(handler);
        if let Some(hovered) = self.pointer_over
            && self.mark_phase(&ElementKey::Record(hovered)) != Some(Phase::Live)
        {
            self.pointer_over = None;
        }
        self.present();
    }

    fn set_selection(&mut self, selection: &SelectionSet) {
        if self.mount.is_none() {
            return;
        }
        self.emphasis.selection = selection.clone();
        self.bus
            .emit(self.frame, TraceKind::Selection, format!("{} selected", selection.len()));
        self.restyle();
        self.present();
    }

    fn set_hovered(&mut self, hovered: Option<RecordIndex>) {
        if self.mount.is_none() {
            return;
        }
        self.emphasis.hovered = hovered;
        let detail = hovered.map(|i| i.to_string()).unwrap_or_default();
        self.bus.emit(self.frame, TraceKind::Hover, detail);
        self.restyle();
        self.present();
    }

    fn handle_pointer(&mut self, event: PointerEvent) {
        if self.mount.is_none() || self.hierarchy.is_none() {
            debug!(?event, "circle pack pointer input before first render ignored");
            return;
        }
        match event {
            PointerEvent::Move(p) => {
                let hit = self.hit_test(p);
                let hit_index = hit.as_ref().map(|r| r.index());
                if hit_index == self.pointer_over {
                    return;
                }
                if self.pointer_over.take().is_some() {
                    self.emit(InteractionEvent::HoverLeave);
                }
                if let Some(record) = hit {
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
                if let Some(record) = self.hit_test(p) {
                    self.emit(InteractionEvent::Click(record));
                }
            }
            PointerEvent::Brush(_) => {
                debug!("circle pack has no brush; event dropped");
            }
        }
    }

    fn advance(&mut self, frame: Frame) {
        if self.mount.is_none() {
            return;
        }
        self.frame = frame;
        let now = frame.time;
        let removed = self.marks.sweep_exited(|m| m.radius.is_finished(now));
        for key in &removed {
            self.bus.emit(frame, TraceKind::Removed, key.to_string());
        }
        if !removed.is_empty() {
            self.metrics
                .inc_counter("circles.removed", removed.len() as u64);
        }
        self.present();
    }

    fn dispose(&mut self) {
        if let Some(mut mount) = self.mount.take() {
            mount.surface.clear();
        }
        self.marks.clear();
        self.hierarchy = None;
        self.handler = None;
        self.pointer_over = None;
        debug!("circle pack disposed");
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::{CirclePackView, Role};
    use crate::engine::testing::Recorder;
    use crate::engine::{InteractionEvent, InteractionHandler, PointerEvent, RenderEngine, Size};
    use crate::style::pack;
    use formats::config::AttributeBindings;
    use formats::dataset::Dataset;
    use foundation::color::Rgb;
    use foundation::ids::RecordIndex;
    use foundation::math::Vec2;
    use pretty_assertions::assert_eq;
    use render::RecordingSurface;
    use runtime::event_bus::TraceKind;
    use runtime::frame::Frame;
    use scene::entity::ElementKey;
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

    fn mounted() -> (CirclePackView, RecordingSurface, Rc<Recorder>) {
        let surface = RecordingSurface::new();
        let mut view = CirclePackView::new();
        view.initialize(Box::new(surface.clone()), Size::new(800.0, 600.0));
        (view, surface, Rc::new(Recorder::default()))
    }

    fn handler(recorder: &Rc<Recorder>) -> Rc<dyn InteractionHandler> {
        Rc::clone(recorder) as Rc<dyn InteractionHandler>
    }

    fn at(seconds: f64) -> Frame {
        Frame::new((seconds * 60.0).round() as u64, 1.0 / 60.0)
    }

    fn group(name: &str) -> ElementKey {
        ElementKey::Group(name.to_string())
    }

    fn leaf(i: u32) -> ElementKey {
        ElementKey::Record(RecordIndex(i))
    }

    #[test]
    fn one_circle_per_node_with_nested_targets() {
        let (mut view, _, rec) = mounted();
        view.render(data().records(), &bindings(), handler(&rec));
        let keys: Vec<ElementKey> = view.marks().map(|(k, _, _)| k.clone()).collect();
        assert_eq!(
            keys,
            vec![ElementKey::Root, group("A"), group("B"), leaf(1), leaf(2), leaf(3)]
        );

        let h = view.hierarchy().expect("hierarchy");
        let weights: Vec<(String, f64)> =
            h.groups().map(|g| (g.name().to_string(), g.weight)).collect();
        assert_eq!(weights, vec![("A".to_string(), 30.0), ("B".to_string(), 5.0)]);

        for (g, leaves) in [("A", vec![1, 2]), ("B", vec![3])] {
            let gm = view.mark(&group(g)).expect("group");
            for i in leaves {
                let lm = view.leaf(RecordIndex(i)).expect("leaf");
                let d = lm.target_center().distance(gm.target_center());
                assert!(d <= gm.target_radius(), "leaf {i} outside group {g}");
            }
        }
    }

    #[test]
    fn rerender_is_all_updates() {
        let (mut view, _, rec) = mounted();
        view.render(data().records(), &bindings(), handler(&rec));
        view.render(data().records(), &bindings(), handler(&rec));
        assert_eq!(view.metrics().counter("circles.entered"), 6);
        assert_eq!(view.metrics().counter("circles.updated"), 6);
        assert_eq!(view.metrics().counter("circles.exited"), 0);
    }

    #[test]
    fn leaves_take_the_diverging_colour() {
        let (mut view, _, rec) = mounted();
        view.render(data().records(), &bindings(), handler(&rec));
        let fill = |key: ElementKey| view.mark(&key).expect("mark").target_fill();
        assert_eq!(fill(leaf(1)), pack::LOW);
        assert_eq!(fill(leaf(2)), pack::HIGH);
        assert_eq!(fill(group("A")), pack::GROUP_FILL);
    }

    #[test]
    fn leaf_fill_follows_a_widened_colour_domain() {
        let (mut view, _, rec) = mounted();
        view.render(data().records(), &bindings(), handler(&rec));
        view.advance(at(2.0));
        assert_eq!(view.leaf(RecordIndex(2)).expect("leaf").target_fill(), pack::HIGH);

        let widened = Dataset::from_json_str(
            r#"[
                {"index": 1, "group": "A", "pop": 10, "crime": 0},
                {"index": 2, "group": "A", "pop": 20, "crime": 50},
                {"index": 3, "group": "B", "pop": 5, "crime": 500}
            ]"#,
        )
        .expect("dataset");
        view.render(widened.records(), &bindings(), handler(&rec));
        let fill = |i| view.leaf(RecordIndex(i)).expect("leaf").target_fill();
        assert_eq!(fill(2), Rgb::new(86, 169, 35));
        assert_eq!(fill(1), pack::LOW);
        assert_eq!(fill(3), pack::HIGH);
    }

    #[test]
    fn selection_dims_other_leaves_only() {
        let (mut view, _, rec) = mounted();
        view.render(data().records(), &bindings(), handler(&rec));
        view.set_selection(&SelectionSet::single(RecordIndex(2)));
        view.set_hovered(Some(RecordIndex(3)));
        let now = view.now();
        let look = |key: ElementKey| view.mark(&key).expect("mark").look_at(now);

        assert_eq!((look(leaf(2)).opacity, look(leaf(2)).stroke_width), (1.0, 2.0));
        assert_eq!(look(leaf(1)).opacity, pack::DIMMED_OPACITY);
        assert_eq!((look(leaf(3)).opacity, look(leaf(3)).stroke_width), (0.1, 4.0));
        assert_eq!(look(group("A")).opacity, pack::DEFAULT_OPACITY);
        assert_eq!(look(ElementKey::Root).stroke, pack::GROUP_STROKE);
    }

    #[test]
    fn clearing_selection_restores_default_look() {
        let (mut view, _, rec) = mounted();
        view.render(data().records(), &bindings(), handler(&rec));
        view.set_selection(&SelectionSet::single(RecordIndex(2)));
        view.set_selection(&SelectionSet::new());
        view.set_hovered(None);
        let now = view.now();
        for i in 1..=3 {
            let l = view.leaf(RecordIndex(i)).expect("leaf").look_at(now);
            assert_eq!((l.opacity, l.stroke_width), (pack::DEFAULT_OPACITY, 0.0));
        }
    }

    #[test]
    fn pointer_resolves_to_leaves_only() {
        let (mut view, _, rec) = mounted();
        view.render(data().records(), &bindings(), handler(&rec));
        view.advance(at(1.5));

        let p2 = view.mark_position(&leaf(2)).expect("leaf 2");
        view.handle_pointer(PointerEvent::Click(p2));

        // Inside group B's padding ring but outside its only leaf.
        let b_radius = view.mark(&group("B")).expect("group B").target_radius();
        let ring =
            view.mark_position(&group("B")).expect("group B") + Vec2::new(b_radius - 0.5, 0.0);
        view.handle_pointer(PointerEvent::Click(ring));

        view.handle_pointer(PointerEvent::Move(p2));
        view.handle_pointer(PointerEvent::Move(ring));

        let events = rec.take();
        assert_eq!(events.len(), 3);
        match &events[0] {
            InteractionEvent::Click(r) => assert_eq!(r.index(), RecordIndex(2)),
            other => panic!("expected click, got {other:?}"),
        }
        assert_eq!(events[1].kind(), "hover_enter");
        assert_eq!(events[2], InteractionEvent::HoverLeave);
    }

    #[test]
    fn removed_group_exits_then_disappears() {
        let (mut view, _, rec) = mounted();
        let all = data();
        view.render(all.records(), &bindings(), handler(&rec));
        view.advance(at(1.5));
        view.render(&all.records()[..2], &bindings(), handler(&rec));
        assert_eq!(view.mark_phase(&group("B")), Some(Phase::Exiting));
        assert_eq!(view.mark_phase(&leaf(3)), Some(Phase::Exiting));
        view.advance(at(2.1));
        assert!(view.mark(&group("B")).is_none());
        assert!(view.mark(&leaf(3)).is_none());
        assert_eq!(view.bus().count(TraceKind::Removed), 2);
    }

    #[test]
    fn empty_dataset_renders_bare_root() {
        let (mut view, surface, rec) = mounted();
        view.render(&[], &bindings(), handler(&rec));
        let root = view.mark(&ElementKey::Root).expect("root");
        assert_eq!(root.role(), &Role::Root);
        assert_eq!(root.target_radius(), 0.0);
        view.handle_pointer(PointerEvent::Click(Vec2::new(400.0, 300.0)));
        assert!(rec.events.borrow().is_empty());
        assert!(surface.last_frame().expect("frame").is_empty());
    }
}
