//! Stateless renderers that turn computed values into display documents.
//!
//! Every function in this crate is pure: the same inputs always produce the
//! same [`Document`]. Panels call into these from their compute jobs; the host
//! only ever stores and forwards the resulting documents.

mod diagram;
mod document;
mod markup;
mod table;

pub use diagram::{format_length, DimensionLine, DisplayUnit, SlotDiagram, MM_PER_INCH};
pub use document::{Document, DocumentBody, HoleSummary, Placeholder, PlaceholderKind};
pub use table::{tabulate, PropertyTable, TableRow};
