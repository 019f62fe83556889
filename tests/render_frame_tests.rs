mod support;

use std::cell::RefCell;
use std::rc::Rc;

use skyplot_rs::api::{InvalidationLevel, PlotSnapshot};
use skyplot_rs::core::{ScreenPoint, ZoomTransform};
use skyplot_rs::extensions::PlotEvent;
use skyplot_rs::interaction::MouseMode;
use skyplot_rs::render::{CanvasLayerKind, TextHAlign};
use skyplot_rs::surface::PointPalette;

use support::{
    EventLog, RecordingObserver, clustered_payload, diagonal_payload, empty_engine, engine_with,
};

#[test]
fn render_draws_one_circle_per_visible_point() {
    let mut engine = engine_with(diagonal_payload());
    assert_eq!(engine.pending_invalidation(), InvalidationLevel::Full);

    engine.render().expect("render");

    assert_eq!(engine.renderer().frames_rendered, 1);
    assert_eq!(engine.renderer().last_circle_count, 3);
    assert!(!engine.needs_render());
}

#[test]
fn empty_plot_has_background_and_no_titles() {
    let engine = empty_engine();
    let frame = engine.build_render_frame().expect("frame");

    let background = frame
        .layer(CanvasLayerKind::Background)
        .expect("background layer");
    assert_eq!(background.rects.len(), 1);
    assert_eq!(background.rects[0].fill_color, engine.config().background_color);
    assert_eq!(background.rects[0].width, 800.0);
    assert_eq!(frame.circles().count(), 0);
    assert!(frame.layer(CanvasLayerKind::Axis).expect("axis layer").is_empty());
}

#[test]
fn circles_carry_point_opacity() {
    let engine = engine_with(diagonal_payload());
    let frame = engine.build_render_frame().expect("frame");
    let palette = PointPalette::default();

    for circle in frame.circles() {
        assert_eq!(circle.radius, engine.config().point_radius);
        assert_eq!(circle.fill_color, palette.default.with_alpha(0.3));
    }
}

#[test]
fn axis_titles_are_drawn_on_top() {
    let engine = engine_with(diagonal_payload());
    let frame = engine.build_render_frame().expect("frame");
    let titles = &frame.layer(CanvasLayerKind::Axis).expect("axis layer").texts;

    let x_title = titles
        .iter()
        .find(|text| text.text == "RA (deg)")
        .expect("x title");
    assert_eq!(x_title.h_align, TextHAlign::Center);
    assert_eq!(x_title.rotation_deg, 0.0);

    let y_title = titles
        .iter()
        .find(|text| text.text == "Dec (deg)")
        .expect("y title");
    assert_eq!(y_title.rotation_deg, -90.0);
    assert_eq!(frame.layers.last().map(|layer| layer.kind), Some(CanvasLayerKind::Axis));
}

#[test]
fn grid_labels_are_present_for_loaded_data() {
    let engine = engine_with(diagonal_payload());
    let frame = engine.build_render_frame().expect("frame");
    let grid = frame.layer(CanvasLayerKind::Grid).expect("grid layer");
    assert!(grid.lines.len() > 2);
    assert!(!grid.texts.is_empty());
}

#[test]
fn off_screen_points_are_culled() {
    let mut engine = engine_with(diagonal_payload());
    engine
        .set_zoom(ZoomTransform::new(1.0, -1000.0, 0.0))
        .expect("pan away");
    let frame = engine.build_render_frame().expect("frame");
    assert_eq!(frame.circles().count(), 0);
    assert_eq!(engine.point_count(), 3);
}

#[test]
fn hovered_point_is_painted_last() {
    let mut engine = engine_with(clustered_payload());
    engine
        .pointer_move(ScreenPoint::new(49.0, 563.0))
        .expect("hover point 1");

    let frame = engine.build_render_frame().expect("frame");
    let last = frame.circles().last().expect("circles");
    assert_eq!((last.x, last.y), (49.0, 563.0));
    assert_eq!(last.fill_color, PointPalette::default().mouseover);
}

#[test]
fn brush_rectangle_uses_brush_style() {
    let mut engine = engine_with(clustered_payload());
    engine.set_mouse_mode(MouseMode::Brush);
    engine
        .pointer_down(ScreenPoint::new(20.0, 500.0))
        .expect("down");
    engine
        .pointer_move(ScreenPoint::new(200.0, 590.0))
        .expect("move");

    let frame = engine.build_render_frame().expect("frame");
    let rects = &frame.layer(CanvasLayerKind::Brush).expect("brush layer").rects;
    assert_eq!(rects.len(), 1);
    let style = engine.config().brush;
    assert_eq!(
        (rects[0].x, rects[0].y, rects[0].width, rects[0].height),
        (20.0, 500.0, 180.0, 90.0)
    );
    assert_eq!(rects[0].fill_color, style.fill_color);
    assert_eq!(rects[0].border_color, style.stroke_color);
}

#[test]
fn render_is_reported_to_observers() {
    let mut engine = engine_with(diagonal_payload());
    let events: EventLog = Rc::new(RefCell::new(Vec::new()));
    engine
        .register_observer(Box::new(RecordingObserver::new("render", Rc::clone(&events))))
        .expect("observer");

    engine.render().expect("render");
    assert_eq!(events.borrow().as_slice(), &[PlotEvent::Rendered]);
}

#[test]
fn observer_ids_must_be_unique_and_non_empty() {
    let mut engine = empty_engine();
    let events: EventLog = Rc::new(RefCell::new(Vec::new()));

    engine
        .register_observer(Box::new(RecordingObserver::new("pane", Rc::clone(&events))))
        .expect("first");
    assert!(
        engine
            .register_observer(Box::new(RecordingObserver::new("pane", Rc::clone(&events))))
            .is_err()
    );
    assert!(
        engine
            .register_observer(Box::new(RecordingObserver::new("", Rc::clone(&events))))
            .is_err()
    );
    assert_eq!(engine.observer_count(), 1);

    assert!(engine.unregister_observer("pane"));
    assert!(!engine.unregister_observer("pane"));
    assert!(!engine.has_observer("pane"));
}

#[test]
fn snapshot_lists_points_back_to_front() {
    let mut engine = engine_with(diagonal_payload());
    engine.select_row_by_id("1").expect("select");
    engine
        .pointer_move(ScreenPoint::new(400.0, 300.0))
        .expect("hover 2");

    let snapshot = engine.snapshot();
    assert_eq!(snapshot.x_title, "RA (deg)");
    assert_eq!(snapshot.fields, vec!["uncover".to_owned()]);
    assert!(snapshot.pending_fields.is_empty());
    assert_eq!(snapshot.points.len(), 3);
    assert_eq!(snapshot.points.last().map(|p| p.id.as_str()), Some("2"));
    let selected: Vec<&str> = snapshot
        .points
        .iter()
        .filter(|point| point.selected)
        .map(|point| point.id.as_str())
        .collect();
    assert_eq!(selected, vec!["1"]);
}

#[test]
fn snapshot_json_parses_back() {
    let engine = engine_with(diagonal_payload());
    let json = engine.snapshot_json_pretty().expect("json");
    assert!(json.contains("\"x_title\": \"RA (deg)\""));

    let parsed: PlotSnapshot = serde_json::from_str(&json).expect("parse");
    assert_eq!(parsed, engine.snapshot());
}
