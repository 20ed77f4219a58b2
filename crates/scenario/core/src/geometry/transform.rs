use super::Vector3D;

/// Oriented, scaled coordinate frame of an element.
///
/// When `parent_id` names another element, the axis triad and origin are
/// expressed in that element's local space. `None` (or an empty string coming
/// from a persisted document) means the frame is relative to the world root.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LocalTransformData {
    pub right_axis: Vector3D,
    pub forward_axis: Vector3D,
    pub up_axis: Vector3D,
    pub origin: Vector3D,
    pub scale: Vector3D,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub parent_id: Option<String>,
}

impl Default for LocalTransformData {
    fn default() -> Self {
        Self::identity()
    }
}

impl LocalTransformData {
    /// Unit axes at the world origin with unit scale.
    pub fn identity() -> Self {
        Self {
            right_axis: Vector3D::RIGHT,
            forward_axis: Vector3D::FORWARD,
            up_axis: Vector3D::UP,
            origin: Vector3D::ZERO,
            scale: Vector3D::ONE,
            parent_id: None,
        }
    }

    pub fn with_origin(mut self, origin: Vector3D) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_scale(mut self, scale: Vector3D) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn with_axes(mut self, right: Vector3D, forward: Vector3D, up: Vector3D) -> Self {
        self.right_axis = right;
        self.forward_axis = forward;
        self.up_axis = up;
        self
    }

    /// Parent identifier, treating an empty string as the world root.
    pub fn parent(&self) -> Option<&str> {
        self.parent_id.as_deref().filter(|id| !id.is_empty())
    }

    /// Maps a vector given in this frame's local coordinates into the
    /// coordinates of the parent space, ignoring the origin.
    pub fn transform_vector(&self, local: Vector3D) -> Vector3D {
        let scaled = local.scaled_by(self.scale);
        self.right_axis * scaled.right + self.forward_axis * scaled.forward + self.up_axis * scaled.up
    }

    /// Maps a point given in this frame's local coordinates into the parent
    /// space.
    pub fn transform_point(&self, local: Vector3D) -> Vector3D {
        self.origin + self.transform_vector(local)
    }

    /// Re-expresses this frame in the space `parent` is expressed in.
    ///
    /// `parent` must be the frame this transform is relative to. The resulting
    /// axes are normalized; their lengths are folded into `scale`, so points
    /// map to the same location before and after composition.
    pub fn compose_with(&self, parent: &LocalTransformData) -> Self {
        let (right_axis, right_len) = parent.transform_vector(self.right_axis).normalize_with_length();
        let (forward_axis, forward_len) =
            parent.transform_vector(self.forward_axis).normalize_with_length();
        let (up_axis, up_len) = parent.transform_vector(self.up_axis).normalize_with_length();

        Self {
            right_axis,
            forward_axis,
            up_axis,
            origin: parent.transform_point(self.origin),
            scale: self
                .scale
                .scaled_by(Vector3D::new(right_len, forward_len, up_len)),
            parent_id: parent.parent_id.clone(),
        }
    }

    /// Component-wise blend of axes, origin and scale. The parent of `self`
    /// is kept.
    pub fn lerp(&self, other: &LocalTransformData, t: f32) -> Self {
        Self {
            right_axis: self.right_axis.lerp(other.right_axis, t),
            forward_axis: self.forward_axis.lerp(other.forward_axis, t),
            up_axis: self.up_axis.lerp(other.up_axis, t),
            origin: self.origin.lerp(other.origin, t),
            scale: self.scale.lerp(other.scale, t),
            parent_id: self.parent_id.clone(),
        }
    }

    /// Interpolation between two frames that may have different parents.
    ///
    /// `t` is clamped to `[0, 1]`. Below 1 the local components are blended
    /// and the pose stays relative to `from`'s parent. At 1 the parent
    /// switches to `to`'s and the result is `to` verbatim.
    pub fn lerp_handoff(from: &LocalTransformData, to: &LocalTransformData, t: f32) -> Self {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        if t >= 1.0 {
            to.clone()
        } else {
            from.lerp(to, t)
        }
    }

    pub fn is_finite(&self) -> bool {
        self.right_axis.is_finite()
            && self.forward_axis.is_finite()
            && self.up_axis.is_finite()
            && self.origin.is_finite()
            && self.scale.is_finite()
    }

    /// Component comparison within `eps`; parents must match exactly.
    pub fn approx_eq(&self, other: &LocalTransformData, eps: f32) -> bool {
        self.parent() == other.parent()
            && self.right_axis.approx_eq(other.right_axis, eps)
            && self.forward_axis.approx_eq(other.forward_axis, eps)
            && self.up_axis.approx_eq(other.up_axis, eps)
            && self.origin.approx_eq(other.origin, eps)
            && self.scale.approx_eq(other.scale, eps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rotated_quarter_turn() -> LocalTransformData {
        // 90 degrees around Up: right -> forward, forward -> -right.
        LocalTransformData::identity().with_axes(
            Vector3D::FORWARD,
            -Vector3D::RIGHT,
            Vector3D::UP,
        )
    }

    #[test]
    fn empty_parent_is_world_root() {
        let mut t = LocalTransformData::identity();
        t.parent_id = Some(String::new());
        assert_eq!(t.parent(), None);
        assert_eq!(t.with_parent("table").parent(), Some("table"));
    }

    #[test]
    fn transform_point_applies_scale_axes_and_origin() {
        let t = rotated_quarter_turn()
            .with_origin(Vector3D::new(10.0, 0.0, 0.0))
            .with_scale(Vector3D::new(2.0, 1.0, 1.0));
        let p = t.transform_point(Vector3D::new(1.0, 1.0, 0.0));
        assert!(p.approx_eq(Vector3D::new(9.0, 2.0, 0.0), 1e-6));
    }

    #[test]
    fn compose_preserves_world_points() {
        let parent = rotated_quarter_turn()
            .with_origin(Vector3D::new(5.0, 5.0, 0.0))
            .with_scale(Vector3D::new(2.0, 2.0, 2.0))
            .with_parent("room");
        let child = LocalTransformData::identity()
            .with_origin(Vector3D::new(1.0, 0.0, 0.0))
            .with_parent("parent");

        let composed = child.compose_with(&parent);
        assert_eq!(composed.parent(), Some("room"));

        let local = Vector3D::new(0.5, -1.0, 3.0);
        let expected = parent.transform_point(child.transform_point(local));
        assert!(composed.transform_point(local).approx_eq(expected, 1e-5));
        assert!(composed.scale.approx_eq(Vector3D::new(2.0, 2.0, 2.0), 1e-6));
    }

    #[test]
    fn lerp_handoff_switches_parent_at_one() {
        let from = LocalTransformData::identity()
            .with_origin(Vector3D::new(0.0, 0.0, 0.0))
            .with_parent("hand");
        let to = rotated_quarter_turn()
            .with_origin(Vector3D::new(4.0, 0.0, 2.0))
            .with_parent("shelf");

        assert_eq!(LocalTransformData::lerp_handoff(&from, &to, 0.0), from);

        let mid = LocalTransformData::lerp_handoff(&from, &to, 0.5);
        assert_eq!(mid.parent(), Some("hand"));
        assert!(mid.origin.approx_eq(Vector3D::new(2.0, 0.0, 1.0), 1e-6));

        let almost = LocalTransformData::lerp_handoff(&from, &to, 0.999);
        assert_eq!(almost.parent(), Some("hand"));

        assert_eq!(LocalTransformData::lerp_handoff(&from, &to, 1.0), to);
        assert_eq!(LocalTransformData::lerp_handoff(&from, &to, 7.0), to);
        assert_eq!(LocalTransformData::lerp_handoff(&from, &to, -1.0), from);
    }

    #[test]
    fn non_finite_components_are_detected() {
        let t = LocalTransformData::identity().with_origin(Vector3D::new(f32::NAN, 0.0, 0.0));
        assert!(!t.is_finite());
        assert!(LocalTransformData::identity().is_finite());
    }
}
