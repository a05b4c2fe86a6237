use crate::core::calendar::{GridDay, YearMonth};
use crate::core::overlay::{EditOverlay, PriceField};
use crate::domain::model::BookingClass;
use crate::domain::ports::Storage;
use crate::utils::error::{DeskError, Result};
use rust_xlsxwriter::{ColNum, RowNum, Workbook, XlsxError};
use std::str::FromStr;

pub const DEFAULT_SHEET_NAME: &str = "Sheet1";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Xlsx,
    Csv,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Csv => "csv",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = DeskError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "xlsx" => Ok(ExportFormat::Xlsx),
            "csv" => Ok(ExportFormat::Csv),
            other => Err(DeskError::InvalidConfigValueError {
                field: "export.format".to_string(),
                value: other.to_string(),
                reason: "Supported formats: xlsx, csv".to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Empty,
}

impl Cell {
    fn from_value(value: Option<f64>) -> Self {
        value.map(Cell::Number).unwrap_or(Cell::Empty)
    }

    pub fn as_plain(&self) -> String {
        match self {
            Cell::Text(s) => s.clone(),
            Cell::Number(n) => n.to_string(),
            Cell::Empty => String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExportSheet {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

/// 每個可見日期一列：日期、星期、路線、季節，再來每個艙等各一組價格/座位
pub fn build_sheet(
    days: &[GridDay],
    route_label: &str,
    season_label: &str,
    classes: &[BookingClass],
    overlay: &EditOverlay,
) -> ExportSheet {
    let mut headers: Vec<String> = ["Date", "Day", "Route", "Season"]
        .iter()
        .map(|h| h.to_string())
        .collect();
    for class in classes {
        headers.push(format!("Price — {}", class.name));
        headers.push(format!("Seats — {}", class.name));
    }

    let rows = days
        .iter()
        .map(|day| {
            let mut row = vec![
                Cell::Text(day.iso()),
                Cell::Text(day.label.to_string()),
                Cell::Text(route_label.to_string()),
                Cell::Text(season_label.to_string()),
            ];
            for class in classes {
                row.push(Cell::from_value(
                    overlay.value_for(day.date, class.id, PriceField::Price),
                ));
                row.push(Cell::from_value(
                    overlay.value_for(day.date, class.id, PriceField::SeatCount),
                ));
            }
            row
        })
        .collect();

    ExportSheet { headers, rows }
}

pub fn export_file_name(month: YearMonth, format: ExportFormat) -> String {
    format!("pricing_export_{}.{}", month, format.extension())
}

pub fn render_csv(sheet: &ExportSheet) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(&sheet.headers)?;
    for row in &sheet.rows {
        writer.write_record(row.iter().map(Cell::as_plain))?;
    }
    writer
        .into_inner()
        .map_err(|e| DeskError::IoError(e.into_error()))
}

/// 單一工作表的 xlsx；空白儲存格不寫入
pub fn render_xlsx(sheet: &ExportSheet, sheet_name: &str) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name)?;

    for (col, header) in sheet.headers.iter().enumerate() {
        worksheet.write_string(0, column(col)?, header)?;
    }

    for (row_idx, row) in sheet.rows.iter().enumerate() {
        let row_num = RowNum::try_from(row_idx + 1).map_err(|_| XlsxError::RowColumnLimitError)?;
        for (col, cell) in row.iter().enumerate() {
            match cell {
                Cell::Text(text) => {
                    worksheet.write_string(row_num, column(col)?, text)?;
                }
                Cell::Number(n) => {
                    worksheet.write_number(row_num, column(col)?, *n)?;
                }
                Cell::Empty => {}
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

fn column(index: usize) -> Result<ColNum> {
    ColNum::try_from(index).map_err(|_| DeskError::from(XlsxError::RowColumnLimitError))
}

pub fn render(sheet: &ExportSheet, format: ExportFormat) -> Result<Vec<u8>> {
    match format {
        ExportFormat::Xlsx => render_xlsx(sheet, DEFAULT_SHEET_NAME),
        ExportFormat::Csv => render_csv(sheet),
    }
}

/// 寫入 storage，回傳檔名
pub async fn write_export<S: Storage>(
    storage: &S,
    sheet: &ExportSheet,
    month: YearMonth,
    format: ExportFormat,
) -> Result<String> {
    let file_name = export_file_name(month, format);
    let data = render(sheet, format)?;
    tracing::debug!("Writing {} ({} bytes, {} rows)", file_name, data.len(), sheet.rows.len());
    storage.write_file(&file_name, &data).await?;
    Ok(file_name)
}
