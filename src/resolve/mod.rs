//! Turning host layers into drawables.
//!
//! Viewport geometry runs first, then every layer is classified and handed to its resolver.
//! Tile and marker resolvers are asynchronous; path resolution is synchronous projection and
//! circles are only registered, their geometry is read at composite time.

/// Circle geometry.
pub mod circle;
/// Layer classification and the concurrent resolution driver.
pub mod classify;
/// Marker icon resolver.
pub mod marker;
/// Path resolver.
pub mod path;
/// Per-export state and resolved drawables.
pub mod session;
/// Tile-raster resolver and tile math.
pub mod tile;
/// Export bounds and raster size.
pub mod viewport;
