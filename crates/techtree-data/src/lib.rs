pub mod loader;
pub mod overrides;
pub mod schema;
pub mod text;

pub use loader::{DataLoadError, TableSet, load_table_set};
pub use overrides::{UnlockOverrides, load_unlock_overrides};
pub use text::{TextResolver, TextResolverBuilder, clean_text};
