//! Excel report generation.
//!
//! The final step of a run: the ordered record collection becomes one
//! worksheet, one row per article, in page-visit order. Column order is the
//! record's field order; missing optional fields stay as empty cells; the
//! image filenames collapse to their semicolon-joined form. Any existing
//! file at the target path is overwritten.

use std::error::Error;
use std::path::Path;

use rust_xlsxwriter::Workbook;
use tracing::{info, instrument};

use crate::models::ArticleRecord;

/// Report column headers, in record field order.
pub const COLUMNS: [&str; 8] = [
    "date",
    "title",
    "title_count",
    "title_contains_money",
    "description",
    "description_count",
    "description_contains_money",
    "image_filename",
];

/// Serialize `records` to a spreadsheet at `path`.
///
/// # Errors
///
/// Serialization and filesystem failures. The caller logs these and moves
/// on; a failed write is not retried and does not invalidate the in-memory
/// records.
#[instrument(level = "info", skip(records), fields(path = %path.display(), count = records.len()))]
pub fn write_report(records: &[ArticleRecord], path: &Path) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, header) in COLUMNS.iter().enumerate() {
        worksheet.write_string(0, col as u16, *header)?;
    }

    for (i, record) in records.iter().enumerate() {
        let row = (i + 1) as u32;
        if let Some(date) = &record.date {
            worksheet.write_string(row, 0, date)?;
        }
        worksheet.write_string(row, 1, &record.title)?;
        worksheet.write_number(row, 2, record.title_count as f64)?;
        worksheet.write_boolean(row, 3, record.title_contains_money)?;
        if let Some(description) = &record.description {
            worksheet.write_string(row, 4, description)?;
        }
        worksheet.write_number(row, 5, record.description_count as f64)?;
        worksheet.write_boolean(row, 6, record.description_contains_money)?;
        if !record.image_filenames.is_empty() {
            worksheet.write_string(row, 7, record.joined_image_filenames())?;
        }
    }

    workbook.save(path)?;
    info!("Report written");
    Ok(())
}
