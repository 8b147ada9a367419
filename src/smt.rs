use {
    crate::*,
    strum::IntoEnumIterator,
    z3::{
        ast::{Ast, Bool, Int},
        Config, Context, SatResult, Solver,
    },
};

/// Z3-backed `ConstraintSolver`
///
/// Each `check` call owns a fresh `Context` and `Solver`; the six unknowns are declared as
/// integer constants named after their `RockVar`, the constraints are asserted as products of
/// integer differences, each excluded assignment becomes a disjunction of disequalities, and on
/// `Sat` the model is read back into an `Assignment`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Z3Solver;

impl Z3Solver {
    fn term_to_int<'c>(context: &'c Context, unknowns: &[Int<'c>], term: Term) -> Int<'c> {
        match term {
            Term::Var(var) => unknowns[var as usize].clone(),
            Term::Constant(constant) => Int::from_i64(context, constant),
        }
    }

    fn difference_to_int<'c>(
        context: &'c Context,
        unknowns: &[Int<'c>],
        difference: Difference,
    ) -> Int<'c> {
        let minuend: Int = Self::term_to_int(context, unknowns, difference.minuend);
        let subtrahend: Int = Self::term_to_int(context, unknowns, difference.subtrahend);

        &minuend - &subtrahend
    }

    fn side_to_int<'c>(
        context: &'c Context,
        unknowns: &[Int<'c>],
        (a, b): (Difference, Difference),
    ) -> Int<'c> {
        let a: Int = Self::difference_to_int(context, unknowns, a);
        let b: Int = Self::difference_to_int(context, unknowns, b);

        &a * &b
    }
}

impl ConstraintSolver for Z3Solver {
    fn check(&self, constraints: &[Constraint], excluded: &[Assignment]) -> Verdict {
        let config: Config = Config::new();
        let context: Context = Context::new(&config);
        let solver: Solver = Solver::new(&context);
        let unknowns: Vec<Int> = RockVar::iter()
            .map(|var| Int::new_const(&context, var.name()))
            .collect();

        for constraint in constraints {
            let (lhs, rhs): ((Difference, Difference), (Difference, Difference)) =
                constraint.sides();
            let lhs: Int = Self::side_to_int(&context, &unknowns, lhs);
            let rhs: Int = Self::side_to_int(&context, &unknowns, rhs);

            solver.assert(&lhs._eq(&rhs));
        }

        for exclusion in excluded {
            let disequalities: Vec<Bool> = RockVar::iter()
                .map(|var| {
                    unknowns[var as usize]
                        ._eq(&Int::from_i64(&context, exclusion[var as usize]))
                        .not()
                })
                .collect();

            solver.assert(&Bool::or(
                &context,
                &disequalities.iter().collect::<Vec<&Bool>>(),
            ));
        }

        match solver.check() {
            SatResult::Sat => solver
                .get_model()
                .and_then(|model| {
                    let mut assignment: Assignment = Assignment::default();

                    for var in RockVar::iter() {
                        assignment[var as usize] =
                            model.get_const_interp(&unknowns[var as usize])?.as_i64()?;
                    }

                    Some(assignment)
                })
                // A model whose values escape `i64` is as good as no model
                .map_or(Verdict::Unknown, Verdict::Sat),
            SatResult::Unsat => Verdict::Unsat,
            SatResult::Unknown => Verdict::Unknown,
        }
    }
}
