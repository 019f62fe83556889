use crate::error::{PlotError, PlotResult};
use crate::interaction::ZoomBehavior;

use super::PlotEngineConfig;

/// Rejects configs the engine cannot run with.
pub fn validate_config(config: &PlotEngineConfig) -> PlotResult<()> {
    if !config.viewport.is_valid() {
        return Err(PlotError::InvalidViewport {
            width: config.viewport.width,
            height: config.viewport.height,
        });
    }
    if !config.point_radius.is_finite() || config.point_radius <= 0.0 {
        return Err(PlotError::InvalidData(
            "point radius must be finite and > 0".to_owned(),
        ));
    }
    if !config.data_border_buffer.is_finite() || config.data_border_buffer < 0.0 {
        return Err(PlotError::InvalidData(
            "data border buffer must be finite and >= 0".to_owned(),
        ));
    }
    validate_opacity(config.point_opacity)?;
    if !config.transition_duration_ms.is_finite() || config.transition_duration_ms < 0.0 {
        return Err(PlotError::InvalidData(
            "transition duration must be finite and >= 0".to_owned(),
        ));
    }
    if config.x_column.is_empty() || config.y_column.is_empty() {
        return Err(PlotError::InvalidData(
            "initial axis columns must not be empty".to_owned(),
        ));
    }
    validate_zoom_behavior(config.zoom)?;

    for color in [
        config.palette.default,
        config.palette.highlight,
        config.palette.mouseover,
        config.palette.clicked,
        config.background_color,
        config.overlay.axis_color,
        config.overlay.grid_color,
        config.brush.fill_color,
        config.brush.stroke_color,
    ] {
        color.validate()?;
    }

    let margins = config.overlay.margins;
    for (name, value) in [
        ("left", margins.left),
        ("right", margins.right),
        ("lower", margins.lower),
        ("upper", margins.upper),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(PlotError::InvalidData(format!(
                "plot margin `{name}` must be finite and >= 0"
            )));
        }
    }
    Ok(())
}

pub(super) fn validate_opacity(opacity: f64) -> PlotResult<()> {
    if !opacity.is_finite() || !(0.0..=1.0).contains(&opacity) {
        return Err(PlotError::InvalidData(
            "point opacity must be finite and in [0, 1]".to_owned(),
        ));
    }
    Ok(())
}

pub(super) fn validate_zoom_behavior(zoom: ZoomBehavior) -> PlotResult<()> {
    if !zoom.min_scale.is_finite() || zoom.min_scale <= 0.0 {
        return Err(PlotError::InvalidData(
            "zoom min scale must be finite and > 0".to_owned(),
        ));
    }
    if !zoom.max_scale.is_finite() || zoom.max_scale < zoom.min_scale {
        return Err(PlotError::InvalidData(
            "zoom max scale must be finite and >= min scale".to_owned(),
        ));
    }
    if !zoom.wheel_sensitivity.is_finite() || zoom.wheel_sensitivity < 0.0 {
        return Err(PlotError::InvalidData(
            "wheel sensitivity must be finite and >= 0".to_owned(),
        ));
    }
    if !zoom.double_click_factor.is_finite() || zoom.double_click_factor <= 0.0 {
        return Err(PlotError::InvalidData(
            "double-click zoom factor must be finite and > 0".to_owned(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::validate_config;
    use crate::api::PlotEngineConfig;
    use crate::core::Viewport;
    use crate::interaction::ZoomBehavior;

    #[test]
    fn defaults_are_valid() {
        assert!(validate_config(&PlotEngineConfig::new(Viewport::new(800, 600))).is_ok());
    }

    #[test]
    fn inverted_zoom_extent_is_rejected() {
        let config = PlotEngineConfig::new(Viewport::new(800, 600)).with_zoom_behavior(
            ZoomBehavior {
                min_scale: 4.0,
                max_scale: 2.0,
                ..ZoomBehavior::default()
            },
        );
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn opacity_outside_unit_range_is_rejected() {
        let config = PlotEngineConfig::new(Viewport::new(800, 600)).with_point_opacity(1.5);
        assert!(validate_config(&config).is_err());
    }
}
