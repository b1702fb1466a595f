//! Relation graph of a selected schema node.
//!
//! A relation pass runs in four steps:
//!
//! ```text
//! node collection + selection
//!     ↓ select           (which nodes are shown, in which order)
//! RelationSequence
//!     ↓ layout + ElementRegistry::register
//! element bounds      (readiness gate)
//!     ↓ resolve_links
//! RelationLink records
//!     ↓ route_connectors
//! Connector lines
//! ```
//!
//! Every step is a pure function of its inputs except the registry, which
//! owns the bounds reported by the layout and decides when they are complete.

mod connectors;
mod links;
mod registry;
mod select;
mod sort;

pub use connectors::{Connector, RowMetrics, Side, route_connectors};
pub use links::{RelationEndpoint, RelationEntry, RelationLink, resolve_links};
pub use registry::{ElementRegistry, READY_DEBOUNCE};
pub use select::{FieldFilters, RelationOptions, RelationSequence, select};
pub use sort::{connection_counts, sort_by_connections};
