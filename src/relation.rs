//! Topological relation between two shapes `A` and `B`, encoded as a bitmask.
//!
//! Bit values are a stable contract:
//!
//! | Bit | Name | Meaning |
//! |-----|------|---------|
//! | 1 | `A_OUTSIDE_B` | some of `A` lies outside `B` |
//! | 2 | `B_OUTSIDE_A` | some of `B` lies outside `A` |
//! | 4 | `TOUCH` | the boundaries of `A` and `B` meet |
//! | 8 | `A_INSIDE_B` | some of `A` lies inside `B` |
//! | 16 | `B_INSIDE_A` | some of `B` lies inside `A` |

use std::fmt;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, Not};

/// A 5-bit relation mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Relation(u8);

impl Relation {
    pub const NONE: Relation = Relation(0);
    pub const A_OUTSIDE_B: Relation = Relation(1);
    pub const B_OUTSIDE_A: Relation = Relation(2);
    pub const TOUCH: Relation = Relation(4);
    pub const A_INSIDE_B: Relation = Relation(8);
    pub const B_INSIDE_A: Relation = Relation(16);

    pub const DISJOINT: Relation = Relation(1 | 2);
    pub const OVERLAP: Relation = Relation(8 | 16);
    pub const ALL: Relation = Relation(31);

    /// Creates a relation from raw bits, discarding bits outside [`Relation::ALL`].
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & Self::ALL.0)
    }

    /// Raw bit value.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Returns `true` if every bit of `other` is set in `self`.
    #[must_use]
    pub const fn contains_all(self, other: Relation) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns `true` if any bit of `other` is set in `self`.
    #[must_use]
    pub const fn contains_any(self, other: Relation) -> bool {
        self.0 & other.0 != 0
    }

    /// Returns `true` if no bit is set.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Swaps the roles of `A` and `B`.
    #[must_use]
    pub const fn flip_ab(self) -> Self {
        let b = self.0;
        Self(
            ((b & 1) << 1)
                | ((b & 2) >> 1)
                | (b & 4)
                | ((b & 8) << 1)
                | ((b & 16) >> 1),
        )
    }

    /// The shapes share no point.
    #[must_use]
    pub const fn is_disjoint(self) -> bool {
        !self.intersects()
    }

    /// The shapes share at least one point.
    #[must_use]
    pub const fn intersects(self) -> bool {
        self.contains_any(Relation(4 | 8 | 16))
    }

    /// The shapes meet only along their boundaries.
    #[must_use]
    pub const fn touches(self) -> bool {
        self.contains_any(Self::TOUCH) && !self.contains_any(Self::OVERLAP)
    }

    /// `A` lies entirely within `B` (boundaries may meet).
    #[must_use]
    pub const fn within(self) -> bool {
        !self.contains_any(Self::A_OUTSIDE_B) && self.intersects()
    }

    /// `B` lies entirely within `A` (boundaries may meet).
    #[must_use]
    pub const fn contains(self) -> bool {
        self.flip_ab().within()
    }

    /// The interiors meet and each shape has material outside the other.
    #[must_use]
    pub const fn overlaps(self) -> bool {
        self.contains_any(Self::OVERLAP) && self.contains_all(Self::DISJOINT)
    }

    /// `A` and `B` cover the same point set.
    #[must_use]
    pub const fn equals_topo(self) -> bool {
        self.within() && self.contains()
    }
}

impl BitOr for Relation {
    type Output = Relation;

    fn bitor(self, rhs: Relation) -> Relation {
        Relation(self.0 | rhs.0)
    }
}

impl BitOrAssign for Relation {
    fn bitor_assign(&mut self, rhs: Relation) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Relation {
    type Output = Relation;

    fn bitand(self, rhs: Relation) -> Relation {
        Relation(self.0 & rhs.0)
    }
}

impl BitAndAssign for Relation {
    fn bitand_assign(&mut self, rhs: Relation) {
        self.0 &= rhs.0;
    }
}

impl Not for Relation {
    type Output = Relation;

    fn not(self) -> Relation {
        Relation(!self.0 & Self::ALL.0)
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(Relation, &str); 5] = [
            (Relation::A_OUTSIDE_B, "A_OUTSIDE_B"),
            (Relation::B_OUTSIDE_A, "B_OUTSIDE_A"),
            (Relation::TOUCH, "TOUCH"),
            (Relation::A_INSIDE_B, "A_INSIDE_B"),
            (Relation::B_INSIDE_A, "B_INSIDE_A"),
        ];
        if self.is_empty() {
            return f.write_str("NONE");
        }
        let mut first = true;
        for (bit, name) in NAMES {
            if self.contains_all(bit) {
                if !first {
                    f.write_str("|")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        Ok(())
    }
}
