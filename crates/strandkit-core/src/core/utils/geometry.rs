use nalgebra::{Matrix3, Point3, Rotation3, SymmetricEigen, Unit, Vector3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Point3<f64>,
    pub max: Point3<f64>,
}

impl BoundingBox {
    pub fn center(&self) -> Point3<f64> {
        nalgebra::center(&self.min, &self.max)
    }

    pub fn extent(&self) -> Vector3<f64> {
        self.max - self.min
    }
}

pub fn bounding_box_of(points: impl IntoIterator<Item = Point3<f64>>) -> Option<BoundingBox> {
    let mut iter = points.into_iter();
    let first = iter.next()?;
    let mut min = first;
    let mut max = first;
    for p in iter {
        min = Point3::new(min.x.min(p.x), min.y.min(p.y), min.z.min(p.z));
        max = Point3::new(max.x.max(p.x), max.y.max(p.y), max.z.max(p.z));
    }
    Some(BoundingBox { min, max })
}

pub fn centroid_of(points: &[Point3<f64>]) -> Option<Point3<f64>> {
    if points.is_empty() {
        return None;
    }
    let sum: Vector3<f64> = points.iter().map(|p| p.coords).sum();
    Some(Point3::from(sum / points.len() as f64))
}

/// The direction of greatest positional variance, from the covariance
/// matrix's dominant eigenvector. Needs at least two distinct points.
pub fn principal_axis_of(points: &[Point3<f64>]) -> Option<Vector3<f64>> {
    if points.len() < 2 {
        return None;
    }
    let centroid = centroid_of(points)?;
    let covariance = points.iter().fold(Matrix3::zeros(), |acc, p| {
        let d = p - centroid;
        acc + d * d.transpose()
    }) / points.len() as f64;

    let eigen = SymmetricEigen::new(covariance);
    let dominant = eigen.eigenvalues.imax();
    let axis: Vector3<f64> = eigen.eigenvectors.column(dominant).into();
    if axis.norm_squared() == 0.0 {
        None
    } else {
        Some(axis.normalize())
    }
}

/// Rotates `point` about the axis through `pivot` with direction `axis` by
/// `angle_degrees`.
pub fn rotate_about_axis(
    point: Point3<f64>,
    pivot: Point3<f64>,
    axis: Vector3<f64>,
    angle_degrees: f64,
) -> Point3<f64> {
    let rotation = Rotation3::from_axis_angle(&Unit::new_normalize(axis), angle_degrees.to_radians());
    pivot + rotation * (point - pivot)
}

/// Builds the right-handed orthonormal placement basis for a nucleotide from
/// its stored hydrogen-face and base-normal directions.
///
/// Column y is the hydrogen face, column z the normal re-orthogonalized
/// against it, column x their cross product (the base short axis). Degenerate
/// inputs fall back to the identity so a half-initialized monomer still
/// places its fragment untransformed.
pub fn nucleotide_basis(hydrogen_face: &Vector3<f64>, base_normal: &Vector3<f64>) -> Rotation3<f64> {
    if hydrogen_face.norm_squared() == 0.0 {
        return Rotation3::identity();
    }
    let y = hydrogen_face.normalize();
    let mut z = base_normal - y * base_normal.dot(&y);
    if z.norm_squared() < 1e-12 {
        z = y.cross(&fallback_perpendicular(&y));
    }
    let z = z.normalize();
    let x = y.cross(&z);
    Rotation3::from_matrix_unchecked(Matrix3::from_columns(&[x, y, z]))
}

/// Builds an orthonormal basis whose z column is the given backbone
/// direction; x and y span the perpendicular plane with an arbitrary but
/// deterministic roll.
pub fn backbone_basis(direction: &Vector3<f64>) -> Rotation3<f64> {
    if direction.norm_squared() == 0.0 {
        return Rotation3::identity();
    }
    let z = direction.normalize();
    let x = fallback_perpendicular(&z);
    let y = z.cross(&x);
    Rotation3::from_matrix_unchecked(Matrix3::from_columns(&[x, y, z]))
}

fn fallback_perpendicular(axis: &Vector3<f64>) -> Vector3<f64> {
    let seed = if axis.x.abs() < 0.9 {
        Vector3::x()
    } else {
        Vector3::y()
    };
    (seed - axis * axis.dot(&seed)).normalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn bounding_box_spans_all_points() {
        let bbox = bounding_box_of([
            Point3::new(1.0, -2.0, 0.0),
            Point3::new(-1.0, 4.0, 2.0),
            Point3::new(0.5, 0.0, -3.0),
        ])
        .unwrap();

        assert_eq!(bbox.min, Point3::new(-1.0, -2.0, -3.0));
        assert_eq!(bbox.max, Point3::new(1.0, 4.0, 2.0));
        assert_eq!(bbox.center(), Point3::new(0.0, 1.0, -0.5));
        assert_eq!(bbox.extent(), Vector3::new(2.0, 6.0, 5.0));
    }

    #[test]
    fn bounding_box_of_nothing_is_none() {
        assert!(bounding_box_of(std::iter::empty()).is_none());
    }

    #[test]
    fn principal_axis_follows_dominant_spread() {
        let points: Vec<_> = (0..10)
            .map(|i| Point3::new(i as f64, 0.1 * (i % 2) as f64, 0.0))
            .collect();
        let axis = principal_axis_of(&points).unwrap();
        assert!(axis.x.abs() > 0.99, "expected x-dominant axis, got {axis:?}");
    }

    #[test]
    fn rotate_about_axis_quarter_turn() {
        let rotated = rotate_about_axis(
            Point3::new(1.0, 0.0, 0.0),
            Point3::origin(),
            Vector3::z(),
            90.0,
        );
        assert!(approx_eq(rotated.x, 0.0));
        assert!(approx_eq(rotated.y, 1.0));
    }

    #[test]
    fn nucleotide_basis_is_orthonormal_and_right_handed() {
        let basis = nucleotide_basis(&Vector3::new(0.0, 2.0, 0.0), &Vector3::new(0.1, 0.3, 1.0));
        let m = basis.matrix();
        let x: Vector3<f64> = m.column(0).into();
        let y: Vector3<f64> = m.column(1).into();
        let z: Vector3<f64> = m.column(2).into();

        assert!(approx_eq(x.norm(), 1.0));
        assert!(approx_eq(y.norm(), 1.0));
        assert!(approx_eq(z.norm(), 1.0));
        assert!(approx_eq(x.dot(&y), 0.0));
        assert!(approx_eq(y.dot(&z), 0.0));
        assert!(approx_eq(x.cross(&y).dot(&z), 1.0));
    }

    #[test]
    fn degenerate_directions_fall_back_to_identity() {
        assert_eq!(
            nucleotide_basis(&Vector3::zeros(), &Vector3::zeros()),
            Rotation3::identity()
        );
        assert_eq!(backbone_basis(&Vector3::zeros()), Rotation3::identity());
    }
}
