mod reading_view;

pub use reading_view::{OutputFormat, ReadingView};
