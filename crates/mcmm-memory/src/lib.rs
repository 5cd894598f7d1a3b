//! Host rendition of the shared matrix region.
//!
//! [`SharedRegion`] is the backing memory every core sees. Cores never
//! touch it directly; each gets a [`CorePort`] whose [`CacheModel`] decides
//! when its stores reach the region:
//!
//! - [`CacheModel::Coherent`]: stores go straight to the region.
//! - [`CacheModel::WriteBack`]: stores stay in a core-private dirty buffer
//!   until [`flush_all`](foundation::VisibilityBarrier::flush_all), like a
//!   data cache on a core without coherency hardware. Other cores keep
//!   reading the old contents until then.

pub mod port;
pub mod region;

pub use port::{CacheModel, CorePort};
pub use region::SharedRegion;
