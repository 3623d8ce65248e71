//! The incremental movie feed: route resolution, the paginated state
//! machine, and the snapshot stream the UI renders from.

pub mod controller;
pub mod projection;
pub mod resolver;
pub mod state;
pub mod visibility;
