pub mod comparison;
pub mod header;
pub mod phase_selector;
pub mod progress_bar;
pub mod status_indicator;
pub mod upload_section;
pub mod utils;
