//! Immutable transform values for scene nodes.
//!
//! This module provides [`TransformState`], a reference-counted, immutable
//! affine transform that can be read and rebuilt as position, orientation and
//! scale. "Setting" a component never mutates an existing value: the
//! `with_*` combinators return a new value and leave every other holder of the
//! old one untouched. Cloning only bumps a reference count, so traversal
//! stacks can hand transforms around freely.
//!
//! # Example
//!
//! ```
//! use cullfx_scene::TransformState;
//! use glam::Vec3;
//!
//! let parent = TransformState::identity().with_position(Vec3::new(1.0, 0.0, 0.0));
//! let child = TransformState::identity().with_position(Vec3::new(0.0, 1.0, 0.0));
//!
//! // The net position of the child is (1.0, 1.0, 0.0)
//! let net = parent.compose(&child);
//! assert!((net.position() - Vec3::new(1.0, 1.0, 0.0)).length() < 1e-5);
//! ```

use std::fmt;
use std::sync::{Arc, OnceLock};

use glam::{Mat4, Quat, Vec3};

/// Scale below this magnitude is treated as collapsed.
const DEGENERATE_SCALE: f32 = 1e-6;

#[derive(Clone, Copy, Debug, PartialEq)]
struct Components {
    position: Vec3,
    orientation: Quat,
    scale: Vec3,
}

impl Components {
    /// Split an affine matrix into parts.
    ///
    /// Shear has no representation here, so the parts of a sheared matrix are
    /// only an approximation. A collapsed axis has no meaningful rotation and
    /// reports the identity orientation.
    fn decompose(matrix: &Mat4) -> Self {
        let position = matrix.w_axis.truncate();
        let lengths = Vec3::new(
            matrix.x_axis.truncate().length(),
            matrix.y_axis.truncate().length(),
            matrix.z_axis.truncate().length(),
        );
        if lengths.min_element() < DEGENERATE_SCALE {
            return Self {
                position,
                orientation: Quat::IDENTITY,
                scale: lengths,
            };
        }
        let (scale, orientation, _) = matrix.to_scale_rotation_translation();
        Self {
            position,
            orientation,
            scale,
        }
    }
}

#[derive(Debug)]
struct TransformData {
    matrix: Mat4,
    /// Known up front for component-built values, derived on first read for
    /// composed ones.
    components: OnceLock<Components>,
}

/// An immutable affine transform.
///
/// Values built from components keep them as given. Composed values keep the
/// exact matrix product, including any shear, and only split it into
/// position, orientation and scale when one of those is read.
///
/// Equality compares the matrices; two separately built transforms with the
/// same components are equal. Use [`TransformState::same_instance`] to test
/// whether two handles share storage.
#[derive(Clone, Debug)]
pub struct TransformState {
    inner: Arc<TransformData>,
}

impl TransformState {
    /// The identity transform.
    ///
    /// All callers share a single allocation.
    pub fn identity() -> Self {
        static IDENTITY: OnceLock<TransformState> = OnceLock::new();
        IDENTITY
            .get_or_init(|| Self::from_components(Vec3::ZERO, Quat::IDENTITY, Vec3::ONE))
            .clone()
    }

    /// Create a transform from its components.
    pub fn from_components(position: Vec3, orientation: Quat, scale: Vec3) -> Self {
        Self {
            inner: Arc::new(TransformData {
                matrix: Mat4::from_scale_rotation_translation(scale, orientation, position),
                components: OnceLock::from(Components {
                    position,
                    orientation,
                    scale,
                }),
            }),
        }
    }

    /// Create a transform holding an arbitrary affine matrix.
    pub fn from_matrix(matrix: Mat4) -> Self {
        Self {
            inner: Arc::new(TransformData {
                matrix,
                components: OnceLock::new(),
            }),
        }
    }

    fn components(&self) -> Components {
        *self
            .inner
            .components
            .get_or_init(|| Components::decompose(&self.inner.matrix))
    }

    /// Return a copy of this transform with the given position.
    pub fn with_position(&self, position: Vec3) -> Self {
        let c = self.components();
        Self::from_components(position, c.orientation, c.scale)
    }

    /// Return a copy of this transform with the given orientation.
    pub fn with_orientation(&self, orientation: Quat) -> Self {
        let c = self.components();
        Self::from_components(c.position, orientation, c.scale)
    }

    /// Return a copy of this transform with the given scale.
    pub fn with_scale(&self, scale: Vec3) -> Self {
        let c = self.components();
        Self::from_components(c.position, c.orientation, scale)
    }

    /// Position in local space (relative to the parent).
    pub fn position(&self) -> Vec3 {
        self.inner.matrix.w_axis.truncate()
    }

    /// Orientation as a quaternion.
    pub fn orientation(&self) -> Quat {
        self.components().orientation
    }

    /// Scale factor.
    pub fn scale(&self) -> Vec3 {
        self.components().scale
    }

    /// Check whether this is the identity transform.
    pub fn is_identity(&self) -> bool {
        self.inner.matrix == Mat4::IDENTITY
    }

    /// Check whether both handles point at the same stored value.
    pub fn same_instance(&self, other: &TransformState) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Get the transformation matrix.
    pub fn matrix(&self) -> Mat4 {
        self.inner.matrix
    }

    /// Compose `child` underneath this transform.
    ///
    /// `self` acts as the parent: the result maps the child's local space into
    /// the space this transform lives in. Composing with the identity returns
    /// the other operand unchanged, sharing its storage.
    pub fn compose(&self, child: &TransformState) -> TransformState {
        if self.is_identity() {
            return child.clone();
        }
        if child.is_identity() {
            return self.clone();
        }
        Self::from_matrix(self.inner.matrix * child.inner.matrix)
    }
}

impl Default for TransformState {
    fn default() -> Self {
        Self::identity()
    }
}

impl PartialEq for TransformState {
    fn eq(&self, other: &Self) -> bool {
        self.same_instance(other) || self.inner.matrix == other.inner.matrix
    }
}

impl fmt::Display for TransformState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_identity() {
            return f.write_str("T:identity");
        }
        let Components {
            position: p,
            orientation: q,
            scale: s,
        } = self.components();
        write!(
            f,
            "T:(pos {:.3} {:.3} {:.3} quat {:.3} {:.3} {:.3} {:.3} scale {:.3} {:.3} {:.3})",
            p.x, p.y, p.z, q.w, q.x, q.y, q.z, s.x, s.y, s.z
        )
    }
}
