// Market data domain
pub mod bar_table;
pub mod price_point;
pub mod training_frame;

pub use bar_table::{BarTable, ColumnLabel, RawBar};
pub use price_point::{BarRequest, PricePoint};
pub use training_frame::{FrameRow, TrainingFrame};
