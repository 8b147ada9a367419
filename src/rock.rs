use {
    crate::*,
    glam::I64Vec3,
    num::rational::Ratio,
    std::fmt::{Display, Formatter, Result as FmtResult},
};

/// The thrown rock's initial state, as recovered from a solver model
#[derive(Clone, Debug, PartialEq)]
pub struct Rock {
    pub pos: I64Vec3,
    pub vel: I64Vec3,
}

impl Rock {
    /// The puzzle answer: the sum of the rock's position coordinates
    pub fn pos_sum(&self) -> i64 {
        self.pos.x + self.pos.y + self.pos.z
    }

    /// The exact time at which this rock and `hailstone` occupy the same position, if one exists
    ///
    /// The time is derived from the first axis with a nonzero relative velocity, then checked for
    /// consistency across all three axes and for non-negativity, so a `Some` return means the
    /// physical intersection condition genuinely holds rather than just the cross-multiplied
    /// equations derived from it.
    pub fn intersection_time(&self, hailstone: &Hailstone) -> Option<Ratio<i128>> {
        let delta_pos: [i128; 3_usize] = (hailstone.pos - self.pos).to_array().map(i128::from);
        let delta_vel: [i128; 3_usize] = (self.vel - hailstone.vel).to_array().map(i128::from);

        let time: Ratio<i128> = match delta_vel.iter().position(|&delta| delta != 0_i128) {
            Some(axis) => Ratio::new(delta_pos[axis], delta_vel[axis]),
            // Co-moving: the trajectories only meet if they start co-located
            None => Ratio::from_integer(0_i128),
        };
        let (numer, denom): (i128, i128) = (*time.numer(), *time.denom());

        (numer >= 0_i128
            && delta_pos
                .into_iter()
                .zip(delta_vel)
                .all(|(delta_pos, delta_vel)| delta_pos * denom == numer * delta_vel))
        .then_some(time)
    }

    fn from_assignment(assignment: &Assignment) -> Self {
        Self {
            pos: I64Vec3::new(
                assignment[RockVar::Px as usize],
                assignment[RockVar::Py as usize],
                assignment[RockVar::Pz as usize],
            ),
            vel: I64Vec3::new(
                assignment[RockVar::Vx as usize],
                assignment[RockVar::Vy as usize],
                assignment[RockVar::Vz as usize],
            ),
        }
    }
}

/// Why no unique rock could be reported
#[derive(Clone, Debug, PartialEq)]
pub enum RockError {
    /// The input supplies fewer hailstones than the three the constraint system needs
    TooFewHailstones { count: usize },
    /// Degenerate trio: the constraint system admits a continuum of models
    Underdetermined,
    /// Degenerate trio: even the linear relaxation of the constraint system is contradictory
    Inconsistent,
    /// The solver proved no integer model exists
    Unsatisfiable,
    /// The solver could not decide the constraint system, or kept producing spurious models
    Inconclusive,
    /// The solver returned an assignment with a nonzero residual on some constraint
    ImperfectModel { assignment: Assignment },
}

impl Display for RockError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::TooFewHailstones { count } => write!(
                f,
                "expected at least {} hailstones, got {count}",
                Hailstorm::TRIO_LEN
            ),
            Self::Underdetermined => f.write_str(
                "no unique rock: the chosen hailstone trajectories are degenerate \
                (underdetermined constraint system)",
            ),
            Self::Inconsistent => {
                f.write_str("no solution found: the constraint system is inconsistent")
            }
            Self::Unsatisfiable => {
                f.write_str("unsat: no integer rock intersects all three hailstones")
            }
            Self::Inconclusive => {
                f.write_str("unknown: the solver could not decide the constraint system")
            }
            Self::ImperfectModel { assignment } => write!(
                f,
                "solver model {assignment:?} fails exact residual re-verification"
            ),
        }
    }
}

impl Hailstorm {
    /// The six constraints over the rock unknowns contributed by the leading trio
    pub fn trio_constraints(&self) -> Result<Vec<Constraint>, RockError> {
        Ok(self
            .leading_trio()?
            .iter()
            .flat_map(Hailstone::constraints)
            .collect())
    }

    /// Upper bound on the models enumerated before giving up
    ///
    /// Each spurious branch of the constraint system is an isolated point (the degeneracy
    /// precheck rejects continua), and only a handful of zeroed-denominator branches exist per
    /// trio, so the bound is generous.
    const MAX_MODELS: usize = 32_usize;

    /// Builds the constraint system for the leading trio, delegates to `solver`, and reports the
    /// unique rock
    ///
    /// The solver's model is never trusted blindly: degenerate trios are rejected before the
    /// solver runs, and a returned model must have zero residual on every constraint and a
    /// consistent non-negative intersection time with every hailstone of the trio. The
    /// cross-multiplied equations hold vacuously along branches where a denominator is zero
    /// (say `vx == ux` and `px == sx` for one hailstone), so a model can satisfy all six while
    /// missing a hailstone; such models are excluded and the solver is asked for another.
    pub fn rock(&self, solver: &impl ConstraintSolver) -> Result<Rock, RockError> {
        let trio: &[Hailstone] = self.leading_trio()?;
        let constraints: Vec<Constraint> = trio
            .iter()
            .flat_map(Hailstone::constraints)
            .collect();

        match Determinacy::classify(&constraints) {
            Determinacy::Determined => {}
            Determinacy::Underdetermined => return Err(RockError::Underdetermined),
            Determinacy::Inconsistent => return Err(RockError::Inconsistent),
        }

        let mut excluded: Vec<Assignment> = Vec::new();

        while excluded.len() < Self::MAX_MODELS {
            match solver.check(&constraints, &excluded) {
                Verdict::Sat(assignment) => {
                    if constraints
                        .iter()
                        .any(|constraint| constraint.residual(&assignment) != 0_i128)
                    {
                        // Not a model at all: the solver itself misbehaved
                        return Err(RockError::ImperfectModel { assignment });
                    }

                    let rock: Rock = Rock::from_assignment(&assignment);

                    if trio
                        .iter()
                        .all(|hailstone| rock.intersection_time(hailstone).is_some())
                    {
                        return Ok(rock);
                    }

                    excluded.push(assignment);
                }
                Verdict::Unsat => return Err(RockError::Unsatisfiable),
                Verdict::Unknown => return Err(RockError::Inconclusive),
            }
        }

        Err(RockError::Inconclusive)
    }
}

#[cfg(test)]
mod tests {
    use {super::*, std::sync::OnceLock};

    const HAILSTORM_STR: &'static str = "\
        19, 13, 30 @ -2,  1, -2\n\
        18, 19, 22 @ -1, -1, -2\n\
        20, 25, 34 @ -2, -2, -4\n\
        12, 31, 28 @ -1, -2, -1\n\
        20, 19, 15 @  1, -5, -3\n";

    fn example_hailstorm() -> &'static Hailstorm {
        static ONCE_LOCK: OnceLock<Hailstorm> = OnceLock::new();

        ONCE_LOCK.get_or_init(|| Hailstorm::try_from(HAILSTORM_STR).unwrap())
    }

    fn example_rock() -> Rock {
        Rock {
            pos: I64Vec3::new(24_i64, 13_i64, 10_i64),
            vel: I64Vec3::new(-3_i64, 1_i64, 2_i64),
        }
    }

    const EXAMPLE_ASSIGNMENT: Assignment = [24_i64, 13_i64, 10_i64, -3_i64, 1_i64, 2_i64];

    /// Zero residual on all six example-trio constraints (`px == sx` and `vx == ux` for
    /// hailstone 0 zero both of its equations), but no consistent intersection time
    const SPURIOUS_ASSIGNMENT: Assignment = [19_i64, 20_i64, 24_i64, -2_i64, -2_i64, -4_i64];

    /// Replays the verdict scripted for the current exclusion count, sticking at the last one
    struct ScriptedSolver(Vec<Verdict>);

    impl ConstraintSolver for ScriptedSolver {
        fn check(&self, _constraints: &[Constraint], excluded: &[Assignment]) -> Verdict {
            self.0[excluded.len().min(self.0.len() - 1_usize)].clone()
        }
    }

    #[test]
    fn test_intersection_time() {
        let rock: Rock = example_rock();
        let times: Vec<Option<Ratio<i128>>> = example_hailstorm()
            .leading_trio()
            .unwrap()
            .iter()
            .map(|hailstone| rock.intersection_time(hailstone))
            .collect();

        assert_eq!(
            times,
            vec![
                Some(Ratio::from_integer(5_i128)),
                Some(Ratio::from_integer(3_i128)),
                Some(Ratio::from_integer(4_i128)),
            ]
        );

        // A hailstone the rock misses
        assert_eq!(
            rock.intersection_time(&Hailstone {
                pos: I64Vec3::new(24_i64, 13_i64, 11_i64),
                vel: I64Vec3::new(-3_i64, 1_i64, 2_i64),
            }),
            None
        );
    }

    #[test]
    fn test_rock_example() {
        let rock: Rock = example_hailstorm().rock(&Z3Solver).unwrap();

        assert_eq!(rock, example_rock());
        assert_eq!(rock.pos_sum(), 47_i64);
    }

    #[test]
    fn test_rock_puzzle() {
        let rock: Rock = Hailstorm::puzzle().rock(&Z3Solver).unwrap();

        assert_eq!(
            rock,
            Rock {
                pos: I64Vec3::new(422644646660238_i64, 244357651988392_i64, 189640099899118_i64),
                vel: I64Vec3::new(-260_i64, 34_i64, 181_i64),
            }
        );
        assert_eq!(rock.pos_sum(), rock.pos.x + rock.pos.y + rock.pos.z);
        assert_eq!(rock.pos_sum(), 856642398547748_i64);
    }

    #[test]
    fn test_rock_underdetermined() {
        let parallel_hailstorm: Hailstorm = Hailstorm::try_from(
            "19, 13, 30 @ -2,  1, -2\n\
            18, 19, 22 @ -2,  1, -2\n\
            12, 31, 28 @ -2,  1, -2\n",
        )
        .unwrap();

        assert_eq!(
            parallel_hailstorm.rock(&Z3Solver),
            Err(RockError::Underdetermined)
        );
    }

    #[test]
    fn test_rock_skips_spurious_models() {
        let solver: ScriptedSolver = ScriptedSolver(vec![
            Verdict::Sat(SPURIOUS_ASSIGNMENT),
            Verdict::Sat(EXAMPLE_ASSIGNMENT),
        ]);

        assert_eq!(example_hailstorm().rock(&solver), Ok(example_rock()));
    }

    #[test]
    fn test_rock_imperfect_model() {
        let assignment: Assignment = Assignment::default();
        let solver: ScriptedSolver = ScriptedSolver(vec![Verdict::Sat(assignment)]);

        assert_eq!(
            example_hailstorm().rock(&solver),
            Err(RockError::ImperfectModel { assignment })
        );
    }

    #[test]
    fn test_rock_inconclusive_on_exhaustion() {
        let solver: ScriptedSolver = ScriptedSolver(vec![Verdict::Sat(SPURIOUS_ASSIGNMENT)]);

        assert_eq!(
            example_hailstorm().rock(&solver),
            Err(RockError::Inconclusive)
        );
    }

    #[test]
    fn test_rock_unsatisfiable() {
        let solver: ScriptedSolver = ScriptedSolver(vec![Verdict::Unsat]);

        assert_eq!(
            example_hailstorm().rock(&solver),
            Err(RockError::Unsatisfiable)
        );
    }

    #[test]
    fn test_rock_inconsistent() {
        // All three trajectories share an x-velocity; the linear relaxation is contradictory
        let inconsistent_hailstorm: Hailstorm = Hailstorm::try_from(
            "-1, 8, 3 @ -2, -3, 0\n\
            4, 2, 1 @ -2, 1, 0\n\
            -6, 4, -1 @ -2, -2, 3\n",
        )
        .unwrap();

        assert_eq!(
            inconsistent_hailstorm.rock(&ScriptedSolver(vec![Verdict::Unknown])),
            Err(RockError::Inconsistent)
        );
    }

    #[test]
    fn test_rock_too_few_hailstones() {
        let short_hailstorm: Hailstorm =
            Hailstorm::try_from("19, 13, 30 @ -2,  1, -2\n").unwrap();

        assert_eq!(
            short_hailstorm.rock(&Z3Solver),
            Err(RockError::TooFewHailstones { count: 1_usize })
        );
    }
}
