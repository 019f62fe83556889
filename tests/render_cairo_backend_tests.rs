#![cfg(feature = "cairo-backend")]

mod support;

use cairo::{Context, Format, ImageSurface};
use skyplot_rs::api::PlotEngine;
use skyplot_rs::core::{FieldPayload, Viewport};
use skyplot_rs::{PlotError, PlotResult};
use skyplot_rs::render::CairoRenderer;

use support::{FIELD, config, diagonal_payload};

#[test]
fn cairo_renderer_rejects_invalid_surface_size() {
    let err = CairoRenderer::new(0, 480).expect_err("invalid width must fail");
    assert!(matches!(err, PlotError::InvalidData(_)));
}

#[test]
fn cairo_renderer_draws_points_and_decorations() {
    let renderer = CairoRenderer::new(800, 600).expect("renderer");
    let mut engine = PlotEngine::new(renderer, config()).expect("engine init");
    let payload = diagonal_payload();
    let loader = move |_: &str| -> PlotResult<FieldPayload> { Ok(payload.clone()) };
    engine.load_field_now(&loader, FIELD).expect("load");

    engine.render().expect("render");
    let frame = engine.build_render_frame().expect("frame");
    let stats = engine.into_renderer().last_stats();

    assert_eq!(stats.circles_drawn, 3);
    assert_eq!(stats.texts_drawn, frame.texts().count());
    assert_eq!(stats.lines_drawn, frame.lines().count());
}

#[test]
fn cairo_renderer_can_draw_on_external_context() {
    let renderer = CairoRenderer::new(600, 320).expect("renderer");
    let mut engine =
        PlotEngine::new(renderer, config().with_point_radius(2.0)).expect("engine init");
    engine
        .set_viewport(Viewport::new(600, 320))
        .expect("resize");

    let surface = ImageSurface::create(Format::ARgb32, 600, 320).expect("surface");
    let context = Context::new(&surface).expect("context");
    engine
        .render_on_cairo_context(&context)
        .expect("render on external context");
    assert!(!engine.needs_render());
}
