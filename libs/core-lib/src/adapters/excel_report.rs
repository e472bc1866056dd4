use crate::domain::prospect::Prospect;
use crate::{CoreError, ReportRenderer};
use rust_xlsxwriter::{Format, Workbook, XlsxError};

pub(crate) const COLUMNS: [&str; 8] = [
    "Prospect Id",
    "Name",
    "Mobile Number",
    "PAN Number",
    "State Id",
    "LOB Id",
    "Location Id",
    "Created On",
];

fn xlsx(e: XlsxError) -> CoreError {
    CoreError::Infrastructure(Box::new(e))
}

/// Prospect report as an `.xlsx` workbook with one sheet.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExcelReport;

impl ReportRenderer for ExcelReport {
    fn content_type(&self) -> &'static str {
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    }

    fn file_extension(&self) -> &'static str {
        "xlsx"
    }

    fn render(&self, title: &str, prospects: &[Prospect]) -> Result<Vec<u8>, CoreError> {
        let mut workbook = Workbook::new();
        let bold = Format::new().set_bold();
        {
            let sheet = workbook.add_worksheet();
            sheet.set_name("Prospects").map_err(xlsx)?;
            sheet
                .write_string_with_format(0, 0, title, &bold)
                .map_err(xlsx)?;

            for (col, name) in (0u16..).zip(COLUMNS) {
                sheet
                    .write_string_with_format(2, col, name, &bold)
                    .map_err(xlsx)?;
            }

            for (row, prospect) in (3u32..).zip(prospects) {
                sheet
                    .write_number(row, 0, f64::from(prospect.prospect_id))
                    .map_err(xlsx)?;
                sheet.write_string(row, 1, &prospect.name).map_err(xlsx)?;
                sheet
                    .write_string(row, 2, &prospect.mobile_number)
                    .map_err(xlsx)?;
                sheet
                    .write_string(row, 3, prospect.pan_number.as_deref().unwrap_or_default())
                    .map_err(xlsx)?;
                sheet
                    .write_number(row, 4, f64::from(prospect.state_id))
                    .map_err(xlsx)?;
                sheet
                    .write_number(row, 5, f64::from(prospect.lob_id))
                    .map_err(xlsx)?;
                sheet
                    .write_number(row, 6, f64::from(prospect.location_id))
                    .map_err(xlsx)?;
                sheet
                    .write_string(row, 7, prospect.created_on.format("%Y-%m-%d %H:%M").to_string())
                    .map_err(xlsx)?;
            }
            sheet.autofit();
        }
        workbook.save_to_buffer().map_err(xlsx)
    }
}
