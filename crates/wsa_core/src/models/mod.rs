//! Data models shared across the pipeline.

mod enums;
mod table;

pub use enums::{AlignmentMode, GroupStat, MissingPolicy, NumericColumn, NumericEncoding};
pub use table::{CombinedTable, NormalizedRow, SheetTable, TimeLabel};
