use crate::geometry::{Geometry, Location};
use crate::math::{Point2, Tolerance};

/// The type of boolean operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanOp {
    Union,
    Intersect,
    Subtract,
    Xor,
}

impl BooleanOp {
    /// Whether a point with the given membership in `A` and `B` belongs to
    /// the result.
    #[must_use]
    pub fn combine(self, in_a: bool, in_b: bool) -> bool {
        match self {
            Self::Union => in_a || in_b,
            Self::Intersect => in_a && in_b,
            Self::Subtract => in_a && !in_b,
            Self::Xor => in_a != in_b,
        }
    }
}

/// Decision about whether to keep a ring link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkDecision {
    Keep,
    Discard,
    /// The link lies on both boundaries; decide from either side of it.
    BothSides,
}

/// Decides the fate of a ring link from the location of its midpoint
/// relative to the polygonal parts of `A` and `B`.
///
/// | Midpoint vs A, B   | Union   | Intersect | Subtract (A-B) | Xor     |
/// |--------------------|---------|-----------|----------------|---------|
/// | Boundary, Outside  | keep    | discard   | keep           | keep    |
/// | Boundary, Inside   | discard | keep      | discard        | keep    |
/// | Outside, Boundary  | keep    | discard   | discard        | keep    |
/// | Inside, Boundary   | discard | keep      | keep           | keep    |
/// | Boundary, Boundary | sides   | sides     | sides          | discard |
#[allow(clippy::match_same_arms)]
#[must_use]
pub fn ring_link_decision(op: BooleanOp, in_a: Location, in_b: Location) -> LinkDecision {
    use Location::{Boundary, Inside, Outside};

    match (op, in_a, in_b) {
        (BooleanOp::Xor, Boundary, Boundary) => LinkDecision::Discard,
        (BooleanOp::Xor, _, _) => LinkDecision::Keep,
        (_, Boundary, Boundary) => LinkDecision::BothSides,

        (BooleanOp::Union, Inside, _) | (BooleanOp::Union, _, Inside) => LinkDecision::Discard,
        (BooleanOp::Union, _, _) => LinkDecision::Keep,

        (BooleanOp::Intersect, Outside, _) | (BooleanOp::Intersect, _, Outside) => {
            LinkDecision::Discard
        }
        (BooleanOp::Intersect, _, _) => LinkDecision::Keep,

        (BooleanOp::Subtract, _, Inside) | (BooleanOp::Subtract, Outside, _) => {
            LinkDecision::Discard
        }
        (BooleanOp::Subtract, _, _) => LinkDecision::Keep,
    }
}

/// Resolves a link lying on both boundaries from points offset to either
/// side of its midpoint.
///
/// The link is kept where exactly one side belongs to the result, and where
/// both sides do with the same membership in `A` and `B`, which is the case
/// between adjacent members of one collection. Between faces contributed by
/// different operands it is interior to the result and dropped.
#[must_use]
pub fn resolve_shared_link(
    op: BooleanOp,
    a: &Geometry,
    b: &Geometry,
    p: &Point2,
    q: &Point2,
    tolerance: Tolerance,
) -> bool {
    let d = q - p;
    let len = d.norm();
    if len < f64::MIN_POSITIVE {
        return false;
    }
    let offset = crate::math::Vector2::new(-d.y, d.x) * (2.0 * tolerance.value() / len);
    let mid = nalgebra::center(p, q);
    let side = |s: &Point2| {
        (
            a.locate_area(s, tolerance) == Location::Inside,
            b.locate_area(s, tolerance) == Location::Inside,
        )
    };
    let (left, right) = (side(&(mid + offset)), side(&(mid - offset)));
    let (keep_left, keep_right) = (op.combine(left.0, left.1), op.combine(right.0, right.1));
    keep_left != keep_right || (keep_left && left == right)
}

/// Whether line or point material at `p` belongs to the result.
///
/// Union keeps what no area covers; intersection keeps what touches both
/// operands; subtraction keeps what misses `B`; xor keeps what touches
/// exactly one operand.
#[must_use]
pub fn keep_line_material(
    op: BooleanOp,
    a: &Geometry,
    b: &Geometry,
    p: &Point2,
    tolerance: Tolerance,
) -> bool {
    match op {
        BooleanOp::Union => {
            a.locate_area(p, tolerance) == Location::Outside
                && b.locate_area(p, tolerance) == Location::Outside
        }
        BooleanOp::Intersect | BooleanOp::Xor => op.combine(
            a.locate(p, tolerance) != Location::Outside,
            b.locate(p, tolerance) != Location::Outside,
        ),
        BooleanOp::Subtract => b.locate(p, tolerance) == Location::Outside,
    }
}
