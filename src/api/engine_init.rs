use indexmap::IndexMap;
use tracing::debug;

use crate::core::{DataStore, ScaleManager, ViewState};
use crate::error::PlotResult;
use crate::interaction::InteractionState;
use crate::overlay::DecoratorOverlay;
use crate::render::Renderer;
use crate::surface::{RenderSurface, VisualEntityRegistry};

use super::validation::validate_config;
use super::{InvalidationLevel, PlotEngine, PlotEngineConfig, engine_core::EngineCore};

impl<R: Renderer> PlotEngine<R> {
    /// Creates an empty plot. Axis domains and titles follow the first
    /// field that is loaded.
    pub fn new(renderer: R, config: PlotEngineConfig) -> PlotResult<Self> {
        validate_config(&config)?;

        let scales = ScaleManager::new(config.viewport)?;
        let mut view = ViewState::new(
            config.x_column.clone(),
            config.y_column.clone(),
            config.point_opacity,
        );
        view.color_column = config.color_column.clone();
        view.mouse_mode = config.mouse_mode;
        let overlay = DecoratorOverlay::new(
            config.overlay,
            scales.compose_with_transform(view.zoom)?,
        );

        debug!(
            width = config.viewport.width,
            height = config.viewport.height,
            x_column = %config.x_column,
            y_column = %config.y_column,
            "plot engine created"
        );

        Ok(Self {
            renderer,
            core: EngineCore {
                surface: RenderSurface::new(config.point_radius),
                interaction: InteractionState::new(config.mouse_mode),
                config,
                view,
                store: DataStore::new(),
                registry: VisualEntityRegistry::new(),
                scales,
                overlay,
                pending_fields: IndexMap::new(),
                next_ticket_id: 0,
                observers: Vec::new(),
                invalidation: InvalidationLevel::Full,
            },
        })
    }
}
