//! Relate and boolean operations on planar geometries.
//!
//! Each operation decomposes both operands into a rings mesh and a
//! lines-and-points mesh, culls the arrangement according to the operation's
//! selection rules, and assembles the survivors into a normalized geometry.

mod assemble;
mod classify;
mod engine;
mod intersect_op;
mod relate;
mod select;
mod subtract;
mod union;
mod xor;

pub use assemble::assemble_result;
pub use classify::relate_point;
pub use intersect_op::Intersect;
pub use relate::Relate;
pub use select::BooleanOp;
pub use subtract::Subtract;
pub use union::Union;
pub use xor::Xor;
