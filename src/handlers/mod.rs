//! HTTP handlers for the item catalog and collection points.

pub mod items;
pub mod points;
