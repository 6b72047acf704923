pub mod display;
pub mod raster_store;
pub mod record_store;
pub mod render_pipeline;

pub use display::{DisplayDriver, PngFileDisplay};
pub use raster_store::{DirRasterStore, InMemoryRasterStore, RasterStore};
pub use record_store::{DirRecordStore, InMemoryRecordStore, RecordStore};
pub use render_pipeline::{RenderPipeline, Selection};
