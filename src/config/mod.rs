pub mod credentials;
pub mod parser;
pub mod schema;
pub mod types;

pub use types::*;
pub use credentials::platform_credentials;
pub use parser::{load_config, parse_config};
