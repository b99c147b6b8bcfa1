use eframe::egui::{Color32, Ui};
use egui_plot::{Plot, PlotBounds, PlotPoints, Points};

use crate::chart::bucketize;
use crate::state::AppState;

/// Metres per degree of latitude (and of longitude at the equator).
const METRES_PER_DEGREE: f64 = 111_320.0;

// ---------------------------------------------------------------------------
// Map view (point layer over longitude / latitude)
// ---------------------------------------------------------------------------

/// Render the map of the filtered records.
pub fn map_view(ui: &mut Ui, state: &mut AppState) {
    let Some(filtered) = &state.filtered else {
        return;
    };

    let layer = state.map_layer;
    let Some(viewport) = layer.viewport(filtered) else {
        ui.label("No records in the selected income range.");
        return;
    };

    let [r, g, b, a] = layer.fill;
    let fill = Color32::from_rgba_unmultiplied(r, g, b, a);
    let unit = filtered.kind.house_value_unit();
    let lat_scale = viewport.center.latitude.to_radians().cos().max(0.01);
    let buckets = bucketize(
        filtered
            .map_points()
            .map(|p| (p.longitude, p.latitude, p.value)),
    );
    let recenter = std::mem::take(&mut state.recenter_map);

    Plot::new("housing_map")
        .height(360.0)
        .data_aspect(lat_scale as f32)
        .x_axis_label("Longitude")
        .y_axis_label("Latitude")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            if recenter {
                plot_ui.set_plot_bounds(PlotBounds::from_min_max(viewport.min(), viewport.max()));
            }

            // Radii are in metres; convert them at the current zoom level.
            let px_per_degree = plot_ui.transform().dpos_dvalue_x().abs();
            let px_per_metre = px_per_degree / (METRES_PER_DEGREE * lat_scale);

            for bucket in buckets {
                let metres = layer.radius_metres(bucket.mean_value, unit);
                let radius = (metres * px_per_metre).clamp(0.5, 40.0) as f32;
                plot_ui.points(
                    Points::new(PlotPoints::new(bucket.points))
                        .radius(radius)
                        .color(fill),
                );
            }
        });
}
