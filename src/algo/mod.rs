//! Algorithms built on the incremental triangulation.
//!
//! - **Crust**: reconstruct a polygonal curve from an unorganized 2D point
//!   sample through its Delaunay/Voronoi duality
//! - **Refinement**: Ruppert's algorithm, inserting Steiner points until no
//!   triangle is skinnier than a minimum angle and every constraint segment is
//!   free of encroaching points

pub mod crust;
pub mod progress;
pub mod refine;

pub use crust::{crust, crust_with_progress};
pub use progress::{Phase, Progress};
pub use refine::{refine, refine_with_progress, DiametralCenter, RefineOptions, RefineStats};
