use crate::geometry::{Geometry, Location};
use crate::math::{Point2, Tolerance};
use crate::relation::Relation;

/// Classifies a single sample point against both operands.
///
/// | p vs A   | p vs B   | Relation      |
/// |----------|----------|---------------|
/// | Outside  | Outside  | `NONE`        |
/// | Outside  | on/in    | `B_OUTSIDE_A` |
/// | on/in    | Outside  | `A_OUTSIDE_B` |
/// | Boundary | Boundary | `TOUCH`       |
/// | Boundary | Inside   | `A_INSIDE_B`  |
/// | Inside   | Boundary | `B_INSIDE_A`  |
/// | Inside   | Inside   | `OVERLAP`     |
#[must_use]
pub fn relate_point(a: &Geometry, b: &Geometry, p: &Point2, tolerance: Tolerance) -> Relation {
    relation_of(a.locate(p, tolerance), b.locate(p, tolerance))
}

fn relation_of(in_a: Location, in_b: Location) -> Relation {
    use Location::{Boundary, Inside, Outside};

    match (in_a, in_b) {
        (Outside, Outside) => Relation::NONE,
        (Outside, _) => Relation::B_OUTSIDE_A,
        (_, Outside) => Relation::A_OUTSIDE_B,
        (Boundary, Boundary) => Relation::TOUCH,
        (Boundary, Inside) => Relation::A_INSIDE_B,
        (Inside, Boundary) => Relation::B_INSIDE_A,
        (Inside, Inside) => Relation::OVERLAP,
    }
}

/// Returns `true` if `p` lies in or on `geometry`.
#[must_use]
pub fn covers(geometry: &Geometry, p: &Point2, tolerance: Tolerance) -> bool {
    geometry.locate(p, tolerance) != Location::Outside
}
