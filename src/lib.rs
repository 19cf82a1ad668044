//! Per-frame detection-to-tracker association for SORT-style multi-object
//! tracking: IoU similarity, globally optimal assignment and threshold gating.

pub mod config;
pub mod error;
pub mod sort;

pub use config::AssociationConfig;
pub use error::Error;
pub use sort::{associate, Association, Associator, BBox, Ltrb, Ltwh};
