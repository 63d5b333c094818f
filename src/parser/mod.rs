pub mod columns;
pub mod csv;
pub mod dates;
pub mod video;

pub use columns::{Header, discover_header, normalize_header};
pub use csv::{Rows, is_blank_row, parse_csv};
