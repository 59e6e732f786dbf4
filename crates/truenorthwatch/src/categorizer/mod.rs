pub mod category;
pub mod matcher;
pub mod taxonomy;

pub use category::{Category, CategoryMap, UnknownCategory};
pub use matcher::{CategorizedText, Categorizer};
pub use taxonomy::Taxonomy;
