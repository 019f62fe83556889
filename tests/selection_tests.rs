mod support;

use std::cell::RefCell;
use std::rc::Rc;

use skyplot_rs::core::ScreenPoint;
use skyplot_rs::extensions::PlotEvent;
use skyplot_rs::surface::PointPalette;

use support::{RecordingObserver, diagonal_payload, engine_with, position};

#[test]
fn clicking_a_second_point_clears_the_first_selection() {
    let mut engine = engine_with(diagonal_payload());
    let a = engine.row_key_by_id("1").expect("row 1");
    let b = engine.row_key_by_id("2").expect("row 2");

    engine
        .pointer_down(position(&engine, "1"))
        .expect("click point 1");
    assert!(engine.is_row_selected(a));
    assert!(!engine.is_row_selected(b));

    engine
        .pointer_down(position(&engine, "2"))
        .expect("click point 2");
    assert!(!engine.is_row_selected(a));
    assert!(engine.is_row_selected(b));
    assert_eq!(engine.selected_row().map(|row| row.id.as_str()), Some("2"));
}

#[test]
fn previous_selection_gets_its_baseline_paint_back() {
    let mut engine = engine_with(diagonal_payload());
    let palette = PointPalette::default();
    let a = engine.row_key_by_id("1").expect("row 1");

    engine.pointer_down(position(&engine, "1")).expect("click 1");
    let (_, point) = engine.point_for_row(a).expect("point 1");
    assert_eq!(point.color, palette.clicked);
    assert_eq!(point.alpha, 1.0);

    engine.pointer_down(position(&engine, "3")).expect("click 3");
    let (_, point) = engine.point_for_row(a).expect("point 1");
    assert_eq!(point.color, palette.default);
    assert_eq!(point.alpha, engine.point_opacity());
}

#[test]
fn selected_color_wins_over_highlight() {
    let mut engine = engine_with(diagonal_payload());
    let palette = PointPalette::default();
    let key = engine.row_key_by_id("2").expect("row 2");

    engine.pointer_down(position(&engine, "2")).expect("select 2");
    engine.toggle_mouse_mode();
    engine
        .pointer_down(ScreenPoint::new(300.0, 200.0))
        .expect("brush start");
    engine
        .pointer_up(ScreenPoint::new(500.0, 400.0))
        .expect("brush end");

    assert!(engine.is_row_selected(key));
    assert!(engine.is_row_highlighted(key));
    let (_, point) = engine.point_for_row(key).expect("point 2");
    assert_eq!(point.color, palette.clicked);
}

#[test]
fn hover_paints_mouseover_and_leave_restores() {
    let mut engine = engine_with(diagonal_payload());
    let palette = PointPalette::default();
    let key = engine.row_key_by_id("3").expect("row 3");

    engine
        .pointer_move(position(&engine, "3"))
        .expect("hover 3");
    assert_eq!(engine.hovered_row().map(|row| row.id.as_str()), Some("3"));
    let (_, point) = engine.point_for_row(key).expect("point 3");
    assert_eq!(point.color, palette.mouseover);
    assert_eq!(point.alpha, 1.0);

    engine
        .pointer_move(ScreenPoint::new(600.0, 450.0))
        .expect("move away");
    assert!(engine.hovered_row().is_none());
    let (_, point) = engine.point_for_row(key).expect("point 3");
    assert_eq!(point.color, palette.default);
    assert_eq!(point.alpha, engine.point_opacity());
}

#[test]
fn hovered_point_is_brought_to_front() {
    let mut engine = engine_with(diagonal_payload());
    engine
        .pointer_move(position(&engine, "1"))
        .expect("hover 1");

    let order = engine.surface().paint_order();
    let (top, _) = order.last().expect("points exist");
    assert_eq!(
        engine.row_for_point(*top).map(|row| row.id.as_str()),
        Some("1")
    );
}

#[test]
fn hover_and_select_are_pushed_to_observers() {
    let mut engine = engine_with(diagonal_payload());
    let events = Rc::new(RefCell::new(Vec::new()));
    engine
        .register_observer(Box::new(RecordingObserver::new("panes", Rc::clone(&events))))
        .expect("register observer");

    engine.pointer_move(position(&engine, "2")).expect("hover");
    engine.pointer_down(position(&engine, "2")).expect("select");
    engine.pointer_leave();

    let events = events.borrow();
    assert!(matches!(
        &events[0],
        PlotEvent::Hovered { row: Some(row) } if row.id == "2"
    ));
    assert!(matches!(&events[1], PlotEvent::Selected { row } if row.id == "2"));
    assert!(matches!(&events[2], PlotEvent::Hovered { row: None }));
}

#[test]
fn context_menu_describes_the_selection() {
    let mut engine = engine_with(diagonal_payload());
    assert!(engine.prepare_context_menu().is_none());

    engine.pointer_down(position(&engine, "2")).expect("select");
    let detail = engine.prepare_context_menu().expect("selection exists");
    assert_eq!(detail.hover.ra, "30.00000°");
    assert_eq!(
        detail.clipboard,
        "id: 2, ra: 30, dec: 40, ra: 30, dec: 40"
    );
}

#[test]
fn select_by_id_ignores_unknown_rows() {
    let mut engine = engine_with(diagonal_payload());
    assert!(!engine.select_row_by_id("404").expect("lookup"));
    assert!(engine.select_row_by_id("3").expect("lookup"));
    assert_eq!(engine.selected_row().map(|row| row.id.as_str()), Some("3"));
}
