pub mod formatter;
pub mod progress;
pub mod renderer;

pub use progress::ExportSpinner;
