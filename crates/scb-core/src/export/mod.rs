pub mod csv;
pub mod workbook;
