//! Sheet alignment.
//!
//! Normalized sheets are folded into one [`CombinedTable`](crate::models::CombinedTable)
//! under an explicit [`AlignmentMode`](crate::models::AlignmentMode):
//!
//! - **Raw append**: chronological by each row's own instant.
//! - **Unified axis**: one block per sheet in label order; [`UnifiedAxis`]
//!   lines the sheets up by label, with gaps.
//! - **Sheet keyed**: the same blocks, plotted against `"{sheet}_{label}"`.
//!
//! Only raw append mixes rows of different sheets, so in the other two
//! modes a shift of k rows is k readings of the same sheet (except at
//! block boundaries).

mod aligner;
mod axis;
mod keys;

pub use aligner::align;
pub use axis::{SheetSlots, UnifiedAxis};
pub use keys::{composite_key, elapsed_minutes};
