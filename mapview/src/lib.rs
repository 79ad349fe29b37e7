//! Map-projection and border-extraction engine of the strategic map viewer.
//!
//! Consumes the decoded province raster from `mapdata` and produces:
//! - Oriented border geometry ready for thick-line extrusion (`border`)
//! - A per-province color lookup buffer for indexed map modes (`mapmode`)
//! - A camera over flat and globe projections with the screen↔map
//!   transform used for hit-testing (`camera`)
//! - An input state machine driving the camera and province selection
//!   (`input`)
//!
//! Everything here is plain data plus synchronous, allocation-light frame
//! operations; GPU upload and windowing belong to the renderer.

pub mod border;
pub mod camera;
pub mod input;
pub mod mapmode;

pub use border::{BorderGeometry, BorderKind, BorderSegment, BorderVertex};
pub use camera::{Camera, CameraUniform, Projection};
pub use input::{InputState, PanKey, Selection};
pub use mapmode::{MapMode, ProvinceColorBuffer, SENTINEL_COLOR};
