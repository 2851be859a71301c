use std::cell::RefCell;
use std::rc::Rc;

use formats::config::AttributeBindings;
use formats::dataset::Dataset;
use foundation::bounds::Rect2;
use foundation::ids::RecordIndex;
use interaction::Mediator;
use pretty_assertions::assert_eq;
use render::RecordingSurface;
use runtime::frame::Frame;
use scene::entity::ElementKey;
use scene::selection::SelectionSet;
use views::engine::{PointerEvent, RenderEngine, Size};
use views::style::{pack, scatter};
use views::{CirclePackView, ScatterplotView};

struct Dashboard {
    mediator: Mediator,
    scatter: Rc<RefCell<ScatterplotView>>,
    pack: Rc<RefCell<CirclePackView>>,
    pack_surface: RecordingSurface,
    _subscriptions: Vec<interaction::Subscription>,
}

fn bindings() -> AttributeBindings {
    AttributeBindings {
        x: "pop".to_string(),
        y: "crime".to_string(),
        group: "group".to_string(),
        weight: "pop".to_string(),
        color: "crime".to_string(),
    }
}

fn mount(data: &Dataset) -> Dashboard {
    let mediator = Mediator::new();
    let scatter = Rc::new(RefCell::new(ScatterplotView::new()));
    let pack = Rc::new(RefCell::new(CirclePackView::new()));
    let pack_surface = RecordingSurface::new();

    scatter
        .borrow_mut()
        .initialize(Box::new(RecordingSurface::new()), Size::new(800.0, 600.0));
    pack.borrow_mut()
        .initialize(Box::new(pack_surface.clone()), Size::new(800.0, 600.0));
    let subscriptions = vec![mediator.subscribe(&scatter), mediator.subscribe(&pack)];

    scatter
        .borrow_mut()
        .render(data.records(), &bindings(), mediator.handler());
    pack.borrow_mut()
        .render(data.records(), &bindings(), mediator.handler());

    let settled = Frame::new(90, 1.0 / 60.0);
    scatter.borrow_mut().advance(settled);
    pack.borrow_mut().advance(settled);

    Dashboard {
        mediator,
        scatter,
        pack,
        pack_surface,
        _subscriptions: subscriptions,
    }
}

fn sample() -> Dataset {
    Dataset::from_json_str(
        r#"[
            {"index": 1, "group": "A", "pop": 10, "crime": 5},
            {"index": 2, "group": "A", "pop": 20, "crime": 50},
            {"index": 3, "group": "B", "pop": 5, "crime": 25}
        ]"#,
    )
    .expect("dataset")
}

fn leaf_emphasis(dash: &Dashboard, i: u32) -> (f64, f64) {
    let view = dash.pack.borrow();
    let look = view
        .leaf(RecordIndex(i))
        .expect("leaf")
        .look_at(view.now());
    (look.opacity, look.stroke_width)
}

#[test]
fn click_then_clear_brush_syncs_both_views() {
    let data = sample();
    let dash = mount(&data);

    {
        let view = dash.pack.borrow();
        let h = view.hierarchy().expect("hierarchy");
        let groups: Vec<(String, f64)> = h
            .groups()
            .map(|g| (g.name().to_string(), g.weight))
            .collect();
        assert_eq!(groups, vec![("A".to_string(), 30.0), ("B".to_string(), 5.0)]);
    }
    assert_eq!(dash.scatter.borrow().live_markers().count(), 3);
    assert_eq!(
        dash.pack_surface.last_frame().expect("frame").circles().count(),
        6
    );

    let p2 = dash
        .scatter
        .borrow()
        .marker_position(RecordIndex(2))
        .expect("marker 2");
    dash.scatter
        .borrow_mut()
        .handle_pointer(PointerEvent::Click(p2));
    assert_eq!(dash.mediator.flush(), 1);

    assert_eq!(
        dash.mediator.state().selected(),
        &SelectionSet::single(RecordIndex(2))
    );
    let marker = |i: u32| {
        dash.scatter
            .borrow()
            .marker(RecordIndex(i))
            .expect("marker")
            .target_look()
    };
    assert_eq!(marker(2), scatter::look(true, false));
    assert_eq!(marker(1), scatter::DEFAULT);
    assert_eq!(leaf_emphasis(&dash, 2), (1.0, pack::SELECTED_STROKE));
    assert_eq!(leaf_emphasis(&dash, 1), (pack::DIMMED_OPACITY, 0.0));

    dash.scatter
        .borrow_mut()
        .handle_pointer(PointerEvent::Brush(None));
    dash.mediator.flush();

    assert!(dash.mediator.state().selected().is_empty());
    for i in 1..=3 {
        assert_eq!(marker(i), scatter::DEFAULT);
        assert_eq!(leaf_emphasis(&dash, i), (pack::DEFAULT_OPACITY, 0.0));
    }
}

#[test]
fn hovering_a_pack_leaf_emphasises_the_marker() {
    let data = sample();
    let dash = mount(&data);

    let at = dash
        .pack
        .borrow()
        .mark_position(&ElementKey::Record(RecordIndex(3)))
        .expect("leaf 3");
    dash.pack.borrow_mut().handle_pointer(PointerEvent::Move(at));
    dash.mediator.flush();

    assert_eq!(dash.mediator.state().hovered(), Some(RecordIndex(3)));
    let look = dash
        .scatter
        .borrow()
        .marker(RecordIndex(3))
        .expect("marker")
        .target_look();
    assert_eq!(look, scatter::look(false, true));
    assert_eq!(leaf_emphasis(&dash, 3), (pack::DEFAULT_OPACITY, pack::HOVER_STROKE));

    dash.pack.borrow_mut().handle_pointer(PointerEvent::Leave);
    dash.mediator.flush();
    assert_eq!(dash.mediator.state().hovered(), None);
    assert_eq!(leaf_emphasis(&dash, 3), (pack::DEFAULT_OPACITY, 0.0));
}

#[test]
fn brushing_selects_in_the_circle_pack_too() {
    let data = sample();
    let dash = mount(&data);

    let whole = Rect2::from_size(800.0, 600.0);
    dash.scatter
        .borrow_mut()
        .handle_pointer(PointerEvent::Brush(Some(whole)));
    dash.mediator.flush();

    let ids: Vec<u32> = dash
        .mediator
        .state()
        .selected()
        .iter()
        .map(|i| i.get())
        .collect();
    assert_eq!(ids, vec![1, 2, 3]);
    for i in 1..=3 {
        assert_eq!(leaf_emphasis(&dash, i), (1.0, pack::SELECTED_STROKE));
    }
}
