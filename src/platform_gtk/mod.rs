//! GTK4 embedding: a `DrawingArea` whose input controllers drive a
//! `PlotEngine` and whose draw callback paints it through Cairo.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gtk4 as gtk;
use gtk4::prelude::*;
use tracing::warn;

use crate::api::PlotEngine;
use crate::core::{ScreenPoint, Viewport};
use crate::render::{CairoContextRenderer, Renderer};

/// Scroll units from GTK are notches; the zoom behavior expects pixels.
const SCROLL_STEP_PX: f64 = 100.0;

pub type SharedPlotEngine<R> = Rc<RefCell<PlotEngine<R>>>;

pub struct GtkPlotAdapter<R: Renderer + CairoContextRenderer + 'static> {
    drawing_area: gtk::DrawingArea,
    engine: SharedPlotEngine<R>,
}

impl<R: Renderer + CairoContextRenderer + 'static> GtkPlotAdapter<R> {
    #[must_use]
    pub fn new(engine: PlotEngine<R>) -> Self {
        let viewport = engine.viewport();
        let engine = Rc::new(RefCell::new(engine));
        let drawing_area = gtk::DrawingArea::new();
        drawing_area.set_content_width(viewport.width as i32);
        drawing_area.set_content_height(viewport.height as i32);
        drawing_area.set_hexpand(true);
        drawing_area.set_vexpand(true);
        drawing_area.set_focusable(true);

        attach_draw_func(&drawing_area, &engine);
        attach_pointer_controllers(&drawing_area, &engine);
        attach_animation_tick(&drawing_area, &engine);

        Self {
            drawing_area,
            engine,
        }
    }

    #[must_use]
    pub fn widget(&self) -> &gtk::DrawingArea {
        &self.drawing_area
    }

    /// Shared handle for hosts that wire selectors and checkboxes.
    #[must_use]
    pub fn engine(&self) -> SharedPlotEngine<R> {
        Rc::clone(&self.engine)
    }

    /// Queues a redraw if the engine has pending changes.
    pub fn refresh(&self) {
        queue_if_needed(&self.drawing_area, &self.engine);
    }
}

fn queue_if_needed<R: Renderer>(drawing_area: &gtk::DrawingArea, engine: &SharedPlotEngine<R>) {
    if engine
        .try_borrow()
        .map(|plot| plot.needs_render())
        .unwrap_or(true)
    {
        drawing_area.queue_draw();
    }
}

fn attach_draw_func<R: Renderer + CairoContextRenderer + 'static>(
    drawing_area: &gtk::DrawingArea,
    engine: &SharedPlotEngine<R>,
) {
    let engine = Rc::clone(engine);
    drawing_area.set_draw_func(move |_widget, context, width, height| {
        if width <= 0 || height <= 0 {
            return;
        }
        let Ok(mut plot) = engine.try_borrow_mut() else {
            return;
        };

        let viewport = Viewport::new(width as u32, height as u32);
        if plot.viewport() != viewport {
            if let Err(err) = plot.set_viewport(viewport) {
                warn!(error = %err, "plot resize rejected");
            }
        }
        if let Err(err) = plot.render_on_cairo_context(context) {
            warn!(error = %err, "plot render failed");
        }
    });
}

fn attach_pointer_controllers<R: Renderer + CairoContextRenderer + 'static>(
    drawing_area: &gtk::DrawingArea,
    engine: &SharedPlotEngine<R>,
) {
    let motion = gtk::EventControllerMotion::new();
    {
        let engine = Rc::clone(engine);
        let drawing_area = drawing_area.clone();
        motion.connect_motion(move |_, x, y| {
            if let Ok(mut plot) = engine.try_borrow_mut() {
                if !plot.is_dragging() {
                    if let Err(err) = plot.pointer_move(ScreenPoint::new(x, y)) {
                        warn!(error = %err, "pointer move failed");
                    }
                }
            }
            queue_if_needed(&drawing_area, &engine);
        });
    }
    {
        let engine = Rc::clone(engine);
        let drawing_area = drawing_area.clone();
        motion.connect_leave(move |_| {
            if let Ok(mut plot) = engine.try_borrow_mut() {
                plot.pointer_leave();
            }
            queue_if_needed(&drawing_area, &engine);
        });
    }
    drawing_area.add_controller(motion);

    let scroll = gtk::EventControllerScroll::new(gtk::EventControllerScrollFlags::VERTICAL);
    {
        let engine = Rc::clone(engine);
        let drawing_area = drawing_area.clone();
        scroll.connect_scroll(move |_, _dx, dy| {
            if let Ok(mut plot) = engine.try_borrow_mut() {
                let anchor = plot.pointer_position().unwrap_or_else(|| {
                    let viewport = plot.viewport();
                    ScreenPoint::new(viewport.width_px() / 2.0, viewport.height_px() / 2.0)
                });
                if let Err(err) = plot.wheel(dy * SCROLL_STEP_PX, anchor) {
                    warn!(error = %err, "wheel zoom failed");
                }
            }
            queue_if_needed(&drawing_area, &engine);
            gtk::glib::Propagation::Stop
        });
    }
    drawing_area.add_controller(scroll);

    let drag = gtk::GestureDrag::new();
    {
        let engine = Rc::clone(engine);
        let drawing_area = drawing_area.clone();
        drag.connect_drag_begin(move |_, start_x, start_y| {
            if let Ok(mut plot) = engine.try_borrow_mut() {
                if let Err(err) = plot.pointer_down(ScreenPoint::new(start_x, start_y)) {
                    warn!(error = %err, "pointer down failed");
                }
            }
            queue_if_needed(&drawing_area, &engine);
        });
    }
    {
        let engine = Rc::clone(engine);
        let drawing_area = drawing_area.clone();
        drag.connect_drag_update(move |gesture, offset_x, offset_y| {
            let Some((start_x, start_y)) = gesture.start_point() else {
                return;
            };
            if let Ok(mut plot) = engine.try_borrow_mut() {
                let position = ScreenPoint::new(start_x + offset_x, start_y + offset_y);
                if let Err(err) = plot.pointer_move(position) {
                    warn!(error = %err, "drag update failed");
                }
            }
            queue_if_needed(&drawing_area, &engine);
        });
    }
    {
        let engine = Rc::clone(engine);
        let drawing_area = drawing_area.clone();
        drag.connect_drag_end(move |gesture, offset_x, offset_y| {
            let Some((start_x, start_y)) = gesture.start_point() else {
                return;
            };
            if let Ok(mut plot) = engine.try_borrow_mut() {
                let position = ScreenPoint::new(start_x + offset_x, start_y + offset_y);
                if let Err(err) = plot.pointer_up(position) {
                    warn!(error = %err, "drag end failed");
                }
            }
            queue_if_needed(&drawing_area, &engine);
        });
    }
    drawing_area.add_controller(drag);

    let click = gtk::GestureClick::new();
    {
        let engine = Rc::clone(engine);
        let drawing_area = drawing_area.clone();
        click.connect_pressed(move |_, n_press, x, y| {
            if n_press != 2 {
                return;
            }
            if let Ok(mut plot) = engine.try_borrow_mut() {
                if let Err(err) = plot.double_click(ScreenPoint::new(x, y)) {
                    warn!(error = %err, "double-click zoom failed");
                }
            }
            queue_if_needed(&drawing_area, &engine);
        });
    }
    drawing_area.add_controller(click);
}

fn attach_animation_tick<R: Renderer + CairoContextRenderer + 'static>(
    drawing_area: &gtk::DrawingArea,
    engine: &SharedPlotEngine<R>,
) {
    let engine = Rc::clone(engine);
    let last_frame_us: Rc<Cell<Option<i64>>> = Rc::new(Cell::new(None));
    drawing_area.add_tick_callback(move |area, clock| {
        let now_us = clock.frame_time();
        let delta_ms = last_frame_us
            .replace(Some(now_us))
            .map_or(0.0, |previous| (now_us - previous) as f64 / 1000.0);
        if let Ok(mut plot) = engine.try_borrow_mut() {
            if plot.step_animations(delta_ms) {
                area.queue_draw();
            }
        }
        gtk::glib::ControlFlow::Continue
    });
}
