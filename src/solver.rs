use {crate::*, strum::EnumCount};

/// One concrete integer value per rock unknown, indexed by `RockVar as usize`
pub type Assignment = [i64; RockVar::COUNT];

/// Discrete satisfiability verdict for a constraint system
///
/// A model is only reachable through the `Sat` variant, so reading values after an `Unsat` or
/// `Unknown` verdict is impossible by construction.
#[derive(Clone, Debug, PartialEq)]
pub enum Verdict {
    Sat(Assignment),
    Unsat,
    Unknown,
}

/// The narrow seam to the external constraint solver: declare the six integer unknowns, assert
/// the conjunction of the constraints, check, and read back one model on `Sat`
///
/// `excluded` lists assignments the caller has already rejected; the solver must not return any
/// of them again. The cross-multiplied trajectory equations are necessary but not sufficient for
/// a physical intersection (zeroed denominators satisfy them vacuously), so the caller verifies
/// each model exactly and walks past the spurious ones through this parameter.
///
/// Keeping the trait this small keeps the equation-building logic testable independent of which
/// solving library backs it.
pub trait ConstraintSolver {
    fn check(&self, constraints: &[Constraint], excluded: &[Assignment]) -> Verdict;
}
