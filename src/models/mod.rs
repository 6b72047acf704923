pub mod config;
pub mod display_spec;
pub mod layout;
pub mod record;

pub use config::{AppConfig, FontConfig};
pub use display_spec::DisplaySpec;
pub use layout::LayoutPolicy;
pub use record::{is_safe_stem, normalize_whitespace, Category, EntityRecord, RecordKey};
