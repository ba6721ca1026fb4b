//! Catalog core: pure record types, load outcomes and result rendering.
mod outcome;
mod record;
mod render;
mod stage;
mod view_model;

pub use outcome::LoadOutcome;
pub use record::{ProductRecord, ProductRecordBuilder};
pub use render::{render_results, RESULTS_HEADER, SEPARATOR};
pub use stage::Stage;
pub use view_model::{ResultRow, ResultsView, SearchHit, SearchHits, DISPLAY_LIMIT};
