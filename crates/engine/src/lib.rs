pub mod address;
pub mod cell;
pub mod sheet;
pub mod spreadsheet;

pub use address::{AddressError, CellAddr, RangeAddr};
pub use cell::{Cell, CellStyle, CellValue};
pub use sheet::Sheet;
pub use spreadsheet::Spreadsheet;
