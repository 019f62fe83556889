mod support;

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use approx::assert_relative_eq;
use skyplot_rs::{PlotError, PlotResult};
use skyplot_rs::api::{BackgroundFieldLoader, FieldLoadOutcome};
use skyplot_rs::core::{Axis, FieldPayload};
use skyplot_rs::extensions::PlotEvent;

use support::{
    EventLog, FIELD, RecordingObserver, catalog_metadata, diagonal_payload, empty_engine,
    engine_with, load, position, row,
};

fn wide_field_payload() -> FieldPayload {
    let mut metadata = catalog_metadata();
    if let Some(ra) = metadata.columns.get_mut("ra") {
        ra.max_val = 90.0;
    }
    FieldPayload::new(
        vec![row(7, 90.0, 40.0, 1.0, 20.0), row(8, 70.0, 50.0, 1.5, 21.0)],
        metadata,
    )
}

#[test]
fn enabling_issues_one_ticket_per_load() {
    let mut engine = empty_engine();
    let ticket = engine
        .on_field_toggled(FIELD, true)
        .expect("toggle")
        .expect("first enable needs a load");
    assert!(engine.is_field_pending(FIELD));
    assert!(engine.on_field_toggled(FIELD, true).expect("toggle").is_none());

    let outcome = engine
        .complete_field_load(&ticket, Ok(diagonal_payload()))
        .expect("complete");
    assert_eq!(outcome, FieldLoadOutcome::Integrated { rows: 3 });
    assert!(!engine.is_field_pending(FIELD));
    assert!(engine.on_field_toggled(FIELD, true).expect("toggle").is_none());
    assert_eq!(engine.point_count(), 3);
    assert_eq!(engine.store().len(), 3);
}

#[test]
fn disabling_removes_points_and_rows() {
    let mut engine = engine_with(diagonal_payload());
    assert!(engine.select_row_by_id("2").expect("select"));

    assert!(engine.on_field_toggled(FIELD, false).expect("toggle").is_none());

    assert_eq!(engine.point_count(), 0);
    assert!(engine.store().is_empty());
    assert!(engine.registry().is_empty());
    assert!(engine.loaded_fields().is_empty());
    assert!(engine.selected_row().is_none());
    assert_eq!(engine.build_render_frame().expect("frame").circles().count(), 0);
}

#[test]
fn disabling_an_unloaded_field_changes_nothing() {
    let mut engine = empty_engine();
    let events: EventLog = Rc::new(RefCell::new(Vec::new()));
    engine
        .register_observer(Box::new(RecordingObserver::new("fields", Rc::clone(&events))))
        .expect("observer");

    assert!(engine.on_field_toggled("ceers", false).expect("toggle").is_none());
    assert!(events.borrow().is_empty());
}

#[test]
fn empty_field_name_is_rejected() {
    let mut engine = empty_engine();
    assert!(matches!(
        engine.on_field_toggled("", true),
        Err(PlotError::InvalidData(_))
    ));
}

#[test]
fn results_for_disabled_fields_are_discarded() {
    let mut engine = empty_engine();
    let ticket = engine
        .on_field_toggled(FIELD, true)
        .expect("toggle")
        .expect("ticket");
    engine.on_field_toggled(FIELD, false).expect("toggle off");

    let outcome = engine
        .complete_field_load(&ticket, Ok(diagonal_payload()))
        .expect("complete");
    assert_eq!(outcome, FieldLoadOutcome::Stale);
    assert_eq!(engine.point_count(), 0);
    assert!(!engine.store().has_field(FIELD));
}

#[test]
fn only_the_newest_ticket_integrates() {
    let mut engine = empty_engine();
    let first = engine
        .on_field_toggled(FIELD, true)
        .expect("toggle")
        .expect("first ticket");
    engine.on_field_toggled(FIELD, false).expect("toggle off");
    let second = engine
        .on_field_toggled(FIELD, true)
        .expect("toggle")
        .expect("second ticket");
    assert_ne!(first, second);

    assert_eq!(
        engine
            .complete_field_load(&first, Ok(diagonal_payload()))
            .expect("first"),
        FieldLoadOutcome::Stale
    );
    assert_eq!(
        engine
            .complete_field_load(&second, Ok(diagonal_payload()))
            .expect("second"),
        FieldLoadOutcome::Integrated { rows: 3 }
    );
    assert_eq!(engine.point_count(), 3);
}

#[test]
fn failed_load_leaves_field_absent_and_is_reported() {
    let mut engine = empty_engine();
    let events: EventLog = Rc::new(RefCell::new(Vec::new()));
    engine
        .register_observer(Box::new(RecordingObserver::new("fields", Rc::clone(&events))))
        .expect("observer");

    let ticket = engine
        .on_field_toggled(FIELD, true)
        .expect("toggle")
        .expect("ticket");
    let outcome = engine
        .complete_field_load(
            &ticket,
            Err(PlotError::FieldLoadFailure {
                field: FIELD.to_owned(),
                reason: "HTTP 404".to_owned(),
            }),
        )
        .expect("failure is reported, not returned");

    assert_eq!(
        outcome,
        FieldLoadOutcome::Failed {
            reason: "HTTP 404".to_owned()
        }
    );
    assert!(!engine.store().has_field(FIELD));
    assert!(!engine.is_field_pending(FIELD));
    assert_eq!(
        events.borrow().last(),
        Some(&PlotEvent::FieldLoadFailed {
            field: FIELD.to_owned(),
            reason: "HTTP 404".to_owned(),
        })
    );

    let retry = engine.on_field_toggled(FIELD, true).expect("retry");
    assert!(retry.is_some());
}

#[test]
fn duplicate_row_ids_across_fields_stay_distinct() {
    let mut engine = engine_with(diagonal_payload());
    load(&mut engine, "ceers", diagonal_payload());
    assert_eq!(engine.point_count(), 6);

    engine.on_field_toggled(FIELD, false).expect("toggle off");
    assert_eq!(engine.point_count(), 3);
    let remaining = engine.row_key_by_id("1").expect("ceers row 1");
    assert_eq!(engine.store().row(remaining).map(|r| r.field.as_str()), Some("ceers"));
}

#[test]
fn second_field_widens_and_removal_restores_domains() {
    let mut engine = engine_with(diagonal_payload());
    let (lo, hi) = engine.snapshot().x_domain;
    assert_relative_eq!(lo, 7.2, epsilon = 1e-9);
    assert_relative_eq!(hi, 52.8, epsilon = 1e-9);
    let before = position(&engine, "2");

    load(&mut engine, "ceers", wide_field_payload());
    let (lo, hi) = engine.snapshot().x_domain;
    assert_relative_eq!(lo, 4.4, epsilon = 1e-9);
    assert_relative_eq!(hi, 95.6, epsilon = 1e-9);
    assert!(position(&engine, "2").x < before.x);
    assert_eq!(engine.view().column(Axis::X), "ra");

    engine.on_field_toggled("ceers", false).expect("toggle off");
    let (lo, hi) = engine.snapshot().x_domain;
    assert_relative_eq!(lo, 7.2, epsilon = 1e-9);
    assert_relative_eq!(hi, 52.8, epsilon = 1e-9);
    assert_eq!(position(&engine, "2"), before);
}

#[test]
fn removing_the_hovered_field_clears_hover() {
    let mut engine = engine_with(diagonal_payload());
    engine
        .pointer_move(position(&engine, "2"))
        .expect("hover point 2");
    assert!(engine.hovered_row().is_some());

    engine.on_field_toggled(FIELD, false).expect("toggle off");
    assert!(engine.hovered_row().is_none());
}

#[test]
fn background_loads_are_integrated_on_the_owner_thread() {
    let mut engine = empty_engine();
    let mut loader = BackgroundFieldLoader::new(|name: &str| -> PlotResult<FieldPayload> {
        if name == FIELD {
            Ok(diagonal_payload())
        } else {
            Err(PlotError::FieldLoadFailure {
                field: name.to_owned(),
                reason: "unknown field".to_owned(),
            })
        }
    });

    assert!(
        engine
            .request_field_in_background(&mut loader, FIELD)
            .expect("spawned")
    );
    assert!(
        !engine
            .request_field_in_background(&mut loader, FIELD)
            .expect("already pending")
    );
    assert!(
        engine
            .request_field_in_background(&mut loader, "missing")
            .expect("spawned")
    );

    let deadline = Instant::now() + Duration::from_secs(10);
    let mut outcomes = Vec::new();
    while outcomes.len() < 2 && Instant::now() < deadline {
        outcomes.extend(
            engine
                .integrate_background_loads(&mut loader)
                .expect("integrate"),
        );
        std::thread::sleep(Duration::from_millis(5));
    }
    outcomes.sort_by(|left, right| left.0.field.cmp(&right.0.field));

    assert_eq!(outcomes.len(), 2);
    assert_eq!(
        outcomes[0].1,
        FieldLoadOutcome::Failed {
            reason: "unknown field".to_owned()
        }
    );
    assert_eq!(outcomes[1].1, FieldLoadOutcome::Integrated { rows: 3 });
    assert_eq!(loader.in_flight(), 0);
    assert_eq!(engine.loaded_fields(), vec![FIELD]);
}

#[test]
fn background_result_for_a_disabled_field_is_stale() {
    let mut engine = empty_engine();
    let mut loader = BackgroundFieldLoader::new(|_: &str| -> PlotResult<FieldPayload> {
        Ok(diagonal_payload())
    });

    engine
        .request_field_in_background(&mut loader, FIELD)
        .expect("spawned");
    engine.on_field_toggled(FIELD, false).expect("toggle off");

    let completion = loader
        .wait_next(Duration::from_secs(10))
        .expect("worker finishes");
    let outcome = engine
        .complete_field_load(&completion.ticket, completion.result)
        .expect("complete");
    assert_eq!(outcome, FieldLoadOutcome::Stale);
    assert_eq!(engine.point_count(), 0);
}

fn bulk_payload(first_id: u32, count: u32) -> FieldPayload {
    let rows = (0..count)
        .map(|i| {
            let t = f64::from(i) / f64::from(count);
            row(first_id + i, 10.0 + 40.0 * t, 20.0 + 40.0 * (1.0 - t), 4.0 * t, 18.0 + 8.0 * t)
        })
        .collect();
    FieldPayload::new(rows, catalog_metadata())
}

#[test]
fn disabling_a_large_field_stays_interactive() {
    const ROWS: u32 = 25_000;
    let mut engine = empty_engine();
    load(&mut engine, "primary", bulk_payload(0, ROWS));
    load(&mut engine, "parallel", bulk_payload(ROWS, ROWS));
    assert_eq!(engine.point_count(), 2 * ROWS as usize);

    let started = Instant::now();
    assert!(engine.on_field_toggled("primary", false).expect("toggle").is_none());
    let elapsed = started.elapsed();

    assert!(
        elapsed < Duration::from_secs(1),
        "removing {ROWS} rows took {elapsed:?}"
    );
    assert_eq!(engine.point_count(), ROWS as usize);
    assert_eq!(engine.registry().len(), ROWS as usize);
    assert_eq!(engine.store().len(), ROWS as usize);
    assert_eq!(engine.loaded_fields(), vec!["parallel"]);
    assert!(engine.store().rows().all(|(_, row)| row.field == "parallel"));
}
