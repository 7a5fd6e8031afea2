pub mod ranking;
pub mod search;
pub mod resolver;
pub mod detail;
pub mod impact;
pub mod scans;

pub use ranking::top;
pub use search::{search, search_assets, SearchOutcome};
pub use resolver::{resolve_rows, ResolvedRows};
pub use detail::detail;
pub use impact::plugin_impact;
pub use scans::completed_scans;
