//! day and night overlay for equirectangular world maps
//!
//! `sol` places the sun for a moment, `carto` traces the terminator across the
//! map and `shade` samples how dark each point of the map should be.

pub mod carto;
pub mod cycle;
pub mod imaging;
pub mod shade;
pub mod sol;
pub mod time;
pub mod vars;
