pub mod asset;
pub mod vulnerability;
pub mod scan;
pub mod limit;
pub mod detail;

pub use asset::*;
pub use vulnerability::*;
pub use scan::*;
pub use limit::*;
pub use detail::*;
