use eframe::egui::Ui;
use egui_plot::{Legend, Plot, PlotPoints, Points};

use crate::chart::{Channel, bucketize};
use crate::color::ColorScale;
use crate::data::model::NumericField;
use crate::state::AppState;

const MIN_RADIUS: f32 = 1.5;
const MAX_RADIUS: f32 = 7.0;

// ---------------------------------------------------------------------------
// Scatter chart (income vs house value)
// ---------------------------------------------------------------------------

/// Render the scatter chart described by `state.scatter`.
pub fn scatter_plot(ui: &mut Ui, state: &AppState) {
    let Some(filtered) = &state.filtered else {
        return;
    };
    let spec = &state.scatter;
    let (Some(x_field), Some(y_field)) = (spec.field(Channel::X), spec.field(Channel::Y)) else {
        return;
    };
    // Colour and size share one bucketing field; fall back to y.
    let key_field = spec
        .field(Channel::Color)
        .or_else(|| spec.field(Channel::Size))
        .unwrap_or(y_field);
    let sized = spec.field(Channel::Size).is_some();

    let triples: Vec<(f64, f64, f64)> = filtered
        .records
        .iter()
        .filter_map(|r| Some((x_field.value(r)?, y_field.value(r)?, key_field.value(r)?)))
        .collect();
    let (min, max) = triples
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), t| (lo.min(t.2), hi.max(t.2)));
    let scale = ColorScale::new(spec.color_scheme, min, max);

    let mut plot = Plot::new("income_vs_value")
        .height(320.0)
        .legend(Legend::default())
        .x_axis_label(x_field.label())
        .y_axis_label(y_field.label());
    if spec.tooltip {
        plot = plot
            .label_formatter(move |_name, value| tooltip(x_field, y_field, value.x, value.y));
    }

    plot.show(ui, |plot_ui| {
        for bucket in bucketize(triples) {
            let radius = if sized {
                MIN_RADIUS + (MAX_RADIUS - MIN_RADIUS) * bucket.position
            } else {
                MIN_RADIUS
            };
            plot_ui.points(
                Points::new(PlotPoints::new(bucket.points))
                    .radius(radius)
                    .color(scale.color_for(bucket.mean_value))
                    .name(format!("{} ≈ {:.2}", key_field, bucket.mean_value)),
            );
        }
    });
}

fn tooltip(x: NumericField, y: NumericField, xv: f64, yv: f64) -> String {
    format!("{x}: {xv:.2}\n{y}: {yv:.2}")
}
