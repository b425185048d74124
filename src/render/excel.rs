use super::RenderContext;
use crate::data::{DataSource, StageSummary, stats};
use crate::error::Result;
use rust_xlsxwriter::{Format, Workbook};

const HEADERS: [&str; 3] = ["Stage", "Wall_Time", "GPU_Time"];
const COLUMN_WIDTHS: [f64; 3] = [18.0, 22.0, 22.0];

/// Save the stage table of one file as `<output_dir><stem>.xlsx`
pub fn save_to_excel(source: &DataSource, ctx: &RenderContext) -> Result<()> {
    let summary = stats::stage_summary(source)?;
    let output = ctx.spreadsheet_path(source.file_path());
    println!(
        "Saved {} to excel file {}",
        source.file_path().display(),
        output.display()
    );

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    let bold = Format::new().set_bold();

    for (col, width) in COLUMN_WIDTHS.into_iter().enumerate() {
        worksheet.set_column_width(col as u16, width)?;
    }
    for (row, cells) in sheet_rows(&summary).into_iter().enumerate() {
        for (col, cell) in cells.into_iter().enumerate() {
            if row == 0 {
                worksheet.write_string_with_format(0, col as u16, cell, &bold)?;
            } else {
                worksheet.write_string(row as u32, col as u16, cell)?;
            }
        }
    }

    workbook.save(&output)?;
    tracing::info!(path = %output.display(), rows = summary.len(), "spreadsheet written");
    Ok(())
}

/// Cells of the sheet, header row first
pub fn sheet_rows(summary: &StageSummary) -> Vec<[&str; 3]> {
    std::iter::once(HEADERS).chain(summary.rows()).collect()
}
