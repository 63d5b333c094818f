pub mod annotation;
pub mod de;
pub mod rate;
pub mod rated;
pub mod sheet;

pub use annotation::CustomAnnotation;
pub use rate::{AnimeRecord, Genre, ImageSet, Studio, UserRate, Video};
pub use rated::{PosterSource, RatedItem, Titles, Trailer};
pub use sheet::{SheetItem, SheetKind};
