use thiserror::Error;

/// Errors that can occur while building an [`Accelerator`].
///
/// [`Accelerator`]: crate::Accelerator
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    /// The geometry has no triangles, no positions or no normals.
    #[error("geometry is empty")]
    EmptyGeometry,
}
