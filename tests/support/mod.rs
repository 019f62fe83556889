#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use skyplot_rs::PlotResult;
use skyplot_rs::api::{FieldLoadOutcome, PlotEngine, PlotEngineConfig};
use skyplot_rs::core::{CatalogMetadata, DataRow, FieldPayload, ScreenPoint, Viewport};
use skyplot_rs::extensions::{PlotContext, PlotEvent, PlotObserver};
use skyplot_rs::render::NullRenderer;

pub const FIELD: &str = "uncover";

pub fn catalog_metadata() -> CatalogMetadata {
    CatalogMetadata::from_json_str(
        r#"{
            "num_objects": 3,
            "columns": {
                "ra": { "display": "RA", "output_units": "deg", "min_val": 10.0, "max_val": 50.0 },
                "dec": { "display": "Dec", "output_units": "deg", "min_val": 20.0, "max_val": 60.0 },
                "z_phot": { "display": "Photo-z", "min_val": 0.0, "max_val": 4.0 },
                "abmag_f200w": {
                    "display": "F200W", "output_units": "AB mag",
                    "min_val": 18.0, "max_val": 26.0,
                    "is_magnitude": true, "wl_micron": 1.99
                }
            }
        }"#,
    )
    .expect("fixture metadata parses")
}

pub fn row(id: u32, ra: f64, dec: f64, z_phot: f64, mag: f64) -> DataRow {
    DataRow::new(id.to_string(), FIELD)
        .with_value("id", f64::from(id))
        .with_value("ra", ra)
        .with_value("dec", dec)
        .with_value("z_phot", z_phot)
        .with_value("abmag_f200w", mag)
}

/// Three sources on a diagonal.
///
/// With the default 800x600 viewport and 0.07 border they land at
/// (49, 563), (400, 300) and (751, 37).
pub fn diagonal_payload() -> FieldPayload {
    FieldPayload::new(
        vec![
            row(1, 10.0, 20.0, 0.5, 18.0),
            row(2, 30.0, 40.0, 2.0, 22.0),
            row(3, 50.0, 60.0, 3.5, 26.0),
        ],
        catalog_metadata(),
    )
}

/// Sources 1 and 3 sit close together at (49, 563) and (84, 537); source 2
/// is at (400, 300).
pub fn clustered_payload() -> FieldPayload {
    FieldPayload::new(
        vec![
            row(1, 10.0, 20.0, 0.5, 18.0),
            row(2, 30.0, 40.0, 2.0, 22.0),
            row(3, 12.0, 22.0, 3.5, 26.0),
        ],
        catalog_metadata(),
    )
}

pub fn config() -> PlotEngineConfig {
    PlotEngineConfig::new(Viewport::new(800, 600))
}

pub fn empty_engine() -> PlotEngine<NullRenderer> {
    PlotEngine::new(NullRenderer::default(), config()).expect("engine init")
}

pub fn engine_with(payload: FieldPayload) -> PlotEngine<NullRenderer> {
    let mut engine = empty_engine();
    load(&mut engine, FIELD, payload);
    engine
}

pub fn load(engine: &mut PlotEngine<NullRenderer>, field: &str, payload: FieldPayload) {
    let loader = move |_: &str| -> PlotResult<FieldPayload> { Ok(payload.clone()) };
    let outcome = engine.load_field_now(&loader, field).expect("load succeeds");
    assert!(matches!(outcome, FieldLoadOutcome::Integrated { .. }));
}

pub fn position(engine: &PlotEngine<NullRenderer>, id: &str) -> ScreenPoint {
    let key = engine.row_key_by_id(id).expect("row is loaded");
    let (_, point) = engine.point_for_row(key).expect("row has a point");
    ScreenPoint::new(point.x, point.y)
}

pub type EventLog = Rc<RefCell<Vec<PlotEvent>>>;

pub struct RecordingObserver {
    id: String,
    events: EventLog,
}

impl RecordingObserver {
    pub fn new(id: impl Into<String>, events: EventLog) -> Self {
        Self {
            id: id.into(),
            events,
        }
    }
}

impl PlotObserver for RecordingObserver {
    fn id(&self) -> &str {
        &self.id
    }

    fn on_event(&mut self, event: &PlotEvent, _context: &PlotContext) {
        self.events.borrow_mut().push(event.clone());
    }
}
