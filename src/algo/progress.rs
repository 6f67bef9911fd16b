//! Progress reporting for long-running algorithms.
//!
//! Crust reconstruction and Ruppert refinement insert one point at a time and
//! can run for a while on large inputs. Both accept a [`Progress`] callback.
//!
//! Crust runs in fixed phases, each reporting through its own [`Phase`].
//! Refinement drains worklists that grow while it runs, so it reports through
//! [`Progress::report_open`], where the total is what has been done plus what
//! is still queued.
//!
//! # Example
//!
//! ```
//! use tessel::algo::crust::crust_with_progress;
//! use tessel::algo::Progress;
//! use tessel::mesh::Mesh;
//! use nalgebra::Point3;
//!
//! let mut mesh: Mesh = Mesh::from_points([
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ])
//! .unwrap();
//!
//! let progress = Progress::new(|current, total, message| {
//!     println!("[{}/{}] {}", current, total, message);
//! });
//! crust_with_progress(&mut mesh, &progress).unwrap();
//! ```

/// Steps each phase is divided into when reported through the parent.
const PHASE_RESOLUTION: usize = 1000;

/// A progress callback that receives updates during long-running operations.
///
/// The callback receives:
/// - `current`: Steps completed so far
/// - `total`: Steps known at the time of the call (never below `current`)
/// - `message`: Description of the current operation
pub struct Progress {
    callback: Box<dyn Fn(usize, usize, &str) + Send + Sync>,
}

impl Progress {
    /// Create a new progress reporter with the given callback.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(usize, usize, &str) + Send + Sync + 'static,
    {
        Self {
            callback: Box::new(callback),
        }
    }

    /// Report progress.
    #[inline]
    pub fn report(&self, current: usize, total: usize, message: &str) {
        (self.callback)(current, total, message);
    }

    /// Report progress on a worklist that may grow.
    ///
    /// `done` entries have been consumed and `pending` are still queued.
    #[inline]
    pub fn report_open(&self, done: usize, pending: usize, message: &str) {
        (self.callback)(done, done + pending, message);
    }

    /// The `index`-th of `count` equal phases of an operation.
    ///
    /// Steps reported through the phase are scaled into its share of the
    /// parent range, so the callback sees one monotonic sequence across phases.
    pub fn phase(&self, index: usize, count: usize) -> Phase<'_> {
        Phase {
            parent: self,
            index,
            count,
        }
    }

    /// Create a no-op progress reporter that discards all updates.
    pub fn none() -> Self {
        Self::new(|_, _, _| {})
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::none()
    }
}

impl std::fmt::Debug for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Progress").finish_non_exhaustive()
    }
}

/// One phase of a multi-phase operation, borrowed from a [`Progress`].
#[derive(Debug, Clone, Copy)]
pub struct Phase<'a> {
    parent: &'a Progress,
    index: usize,
    count: usize,
}

impl Phase<'_> {
    /// Report `current` of `total` steps within this phase.
    ///
    /// Empty phases and phases of an empty operation report nothing.
    pub fn report(&self, current: usize, total: usize, message: &str) {
        if total == 0 || self.count == 0 {
            return;
        }
        let within = current.min(total) * PHASE_RESOLUTION / total;
        self.parent.report(
            self.index * PHASE_RESOLUTION + within,
            self.count * PHASE_RESOLUTION,
            message,
        );
    }
}
