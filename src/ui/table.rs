use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use crate::data::model::Dataset;
use crate::state::{AppState, Message};

const ROW_HEIGHT: f32 = 18.0;

/// The filtered rows in `state.row_order`. Clicking a header sorts by it.
pub fn data_table(ui: &mut Ui, state: &AppState, view: &Dataset, outbox: &mut Vec<Message>) {
    let names = view.schema.names();

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .vscroll(false)
        .columns(Column::auto().at_least(80.0), names.len())
        .header(ROW_HEIGHT + 4.0, |mut header| {
            for (i, name) in names.iter().enumerate() {
                header.col(|ui| {
                    let arrow = match state.sort {
                        Some((f, true)) if f == i => " ⏶",
                        Some((f, false)) if f == i => " ⏷",
                        _ => "",
                    };
                    if ui.button(format!("{name}{arrow}")).clicked() {
                        outbox.push(Message::SortBy(i));
                    }
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, state.row_order.len(), |mut row| {
                let record = &view.records[state.row_order[row.index()]];
                for cell in record.to_cells(&view.schema) {
                    row.col(|ui| {
                        ui.label(cell.to_string());
                    });
                }
            });
        });
}
