use eframe::egui::{self, Color32, RichText, Ui};

use crate::data::loader::DataSource;
use crate::data::model::NumericField;
use crate::data::stats::format_stat;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – income range filter
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    if let Some(msg) = state.unavailable_reason() {
        ui.label(msg);
        return;
    }
    let (Some(bounds), Some(range)) = (state.income_bounds, state.range) else {
        return;
    };

    ui.strong(NumericField::MedianIncome.label());

    let mut low = range.low();
    let mut high = range.high();
    let mut changed = false;

    // Each slider is limited by the other so the bounds never cross.
    changed |= ui
        .add(egui::Slider::new(&mut low, bounds.low()..=high).text("min"))
        .changed();
    changed |= ui
        .add(egui::Slider::new(&mut high, low..=bounds.high()).text("max"))
        .changed();

    if ui.small_button("Reset").clicked() {
        low = bounds.low();
        high = bounds.high();
        changed = true;
    }

    if changed {
        state.set_range(low, high);
    }

    ui.add_space(8.0);
    ui.separator();

    if let Some(dataset) = &state.dataset {
        ui.label(format!("Source: {:?}", dataset.kind));
        ui.label(format!("Columns: {}", dataset.columns.len()));
    }
    if let Some(income) = state.summary.get(NumericField::MedianIncome) {
        ui.label(format!("Mean income in range: {}", format_stat(income.mean)));
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open cleaned CSV…").clicked() {
                open_file_dialog(state, DialogKind::CleanFile);
                ui.close_menu();
            }
            if ui.button("Load reference dataset").clicked() {
                state.open_reference();
                ui.close_menu();
            }
            if ui.button("Open reference table…").clicked() {
                open_file_dialog(state, DialogKind::Reference);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some((total, visible)) = state.counts() {
            ui.label(format!("{total} records loaded, {visible} in range"));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
pub enum DialogKind {
    CleanFile,
    Reference,
}

pub fn open_file_dialog(state: &mut AppState, kind: DialogKind) {
    let title = match kind {
        DialogKind::CleanFile => "Open cleaned housing data",
        DialogKind::Reference => "Open reference housing table",
    };
    let file = rfd::FileDialog::new()
        .set_title(title)
        .add_filter("Supported files", &["csv", "tsv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv", "tsv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        let source = match kind {
            DialogKind::CleanFile => DataSource::CleanFile(path),
            DialogKind::Reference => DataSource::Reference(path),
        };
        state.open(source);
    }
}
