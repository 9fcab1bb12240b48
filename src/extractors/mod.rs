pub mod facts;
pub mod featured;
pub mod hemispheres;
pub mod news;
mod page;

pub use facts::FactsTable;
pub use hemispheres::{CatalogState, HemisphereEntry};
pub use news::Headline;
pub use page::{normalize_text, Page};
