pub mod anime;
pub use anime::{AnimeDetail, AnimeError, AnimeLibraryService};

pub mod cache;
pub use cache::TtlCache;

pub mod catalog;
pub mod debounce;
pub mod notes;
pub mod paginator;
pub mod reconcile;

pub mod sheets;
pub use sheets::{SheetCatalogService, SheetDetail, SheetError};

pub mod stats;
