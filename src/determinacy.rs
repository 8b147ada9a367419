use {
    crate::*,
    num::{BigInt, Zero},
    strum::EnumCount,
};

/// Outcome of the exact linear-relaxation analysis of a trio's constraint system
///
/// The two constraints of a hailstone share their quadratic terms with the matching constraints
/// of every other hailstone (`-px * vy + py * vx` for the xy family, `-px * vz + pz * vx` for
/// the xz family), so differencing constraints pairwise yields affine equations. For three
/// non-degenerate hailstones those rows have coefficient rank four, leaving two degrees of
/// freedom for the quadratic equations themselves to cut down to a point. A lower rank means the
/// solution set of the derived system is a continuum, and any single model the solver returns
/// would be spurious; a rank jump from coefficient matrix to augmented matrix means even the
/// relaxation is contradictory.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Determinacy {
    Determined,
    Underdetermined,
    Inconsistent,
}

impl Determinacy {
    const FULL_RANK: usize = 4_usize;

    /// Classifies the six constraints built from a trio of hailstones
    pub fn classify(constraints: &[Constraint]) -> Self {
        let polynomials: Vec<Polynomial> =
            constraints.iter().map(Constraint::polynomial).collect();
        let mut rows: Vec<Vec<BigInt>> = Vec::new();

        for (index, polynomial) in polynomials.iter().enumerate() {
            for other in polynomials[index + 1_usize..].iter() {
                if let Some((coefficients, constant)) =
                    (polynomial.clone() - other.clone()).linear_row()
                {
                    rows.push(
                        coefficients
                            .iter()
                            .chain([&constant])
                            .map(|&value| BigInt::from(value))
                            .collect(),
                    );
                }
            }
        }

        let augmented_rank: usize = rank(rows.clone());
        let coefficient_rank: usize = rank(
            rows.into_iter()
                .map(|mut row| {
                    row.truncate(RockVar::COUNT);

                    row
                })
                .collect(),
        );

        if augmented_rank > coefficient_rank {
            Self::Inconsistent
        } else if coefficient_rank < Self::FULL_RANK {
            Self::Underdetermined
        } else {
            Self::Determined
        }
    }
}

/// Rank by fraction-free Gaussian elimination; exact, so hailstone-sized magnitudes are safe
fn rank(mut rows: Vec<Vec<BigInt>>) -> usize {
    let columns: usize = rows.first().map_or(0_usize, Vec::len);
    let mut rank: usize = 0_usize;

    for column in 0_usize..columns {
        let Some(pivot) = (rank..rows.len()).find(|&row| !rows[row][column].is_zero()) else {
            continue;
        };

        rows.swap(rank, pivot);

        let pivot_row: Vec<BigInt> = rows[rank].clone();

        for row in rows[rank + 1_usize..].iter_mut() {
            if row[column].is_zero() {
                continue;
            }

            let factor: BigInt = row[column].clone();

            for (value, pivot_value) in row.iter_mut().zip(pivot_row.iter()) {
                *value = &*value * &pivot_row[column] - pivot_value * &factor;
            }
        }

        rank += 1_usize;
    }

    rank
}
