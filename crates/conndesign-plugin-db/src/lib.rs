//! Plugin descriptors and manifest discovery for ConnDesign.

mod entry;
mod scan;
mod stock;

pub use entry::*;
pub use scan::*;
pub use stock::*;
