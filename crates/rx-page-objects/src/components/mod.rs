//! Page objects for concrete widgets, and simulated widgets to drive them
//! without a browser.

pub mod date_picker;
pub mod mock;
pub mod search_box;

pub use date_picker::RxDatePicker;
pub use search_box::{RxSearchBox, SearchBoxExerciseOptions};
