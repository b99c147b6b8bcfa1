use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use crate::data::stats::{STAT_NAMES, Summary, format_stat};

/// Render the summary statistics: one row per field, one column per
/// statistic, rounded to two decimals.
pub fn summary_table(ui: &mut Ui, summary: &Summary) {
    if summary.fields.is_empty() {
        return;
    }

    TableBuilder::new(ui)
        .striped(true)
        .vscroll(false)
        .column(Column::auto().at_least(160.0))
        .columns(Column::auto().at_least(70.0), STAT_NAMES.len())
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong("field");
            });
            for name in STAT_NAMES {
                header.col(|ui| {
                    ui.strong(name);
                });
            }
        })
        .body(|mut body| {
            for field in &summary.fields {
                body.row(18.0, |mut row| {
                    row.col(|ui| {
                        ui.label(field.field.column_name());
                    });
                    for cell in field.cells() {
                        row.col(|ui| {
                            ui.monospace(format_stat(cell));
                        });
                    }
                });
            }
        });
}
