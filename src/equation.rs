use {
    crate::*,
    static_assertions::const_assert,
    std::{
        collections::BTreeMap,
        fmt::{Display, Formatter, Result as FmtResult},
        ops::Sub,
    },
    strum::{EnumCount, EnumIter},
};

/// The six integer unknowns of the thrown rock's initial state
#[derive(Clone, Copy, Debug, EnumCount, EnumIter, Eq, Ord, PartialEq, PartialOrd)]
#[repr(u8)]
pub enum RockVar {
    Px,
    Py,
    Pz,
    Vx,
    Vy,
    Vz,
}

// Six equations from three hailstones pin down exactly this many unknowns
const_assert!(RockVar::COUNT == 6_usize);

impl RockVar {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Px => "px",
            Self::Py => "py",
            Self::Pz => "pz",
            Self::Vx => "vx",
            Self::Vy => "vy",
            Self::Vz => "vz",
        }
    }
}

/// Either a rock unknown or an integer constant from a hailstone record
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Term {
    Var(RockVar),
    Constant(i64),
}

impl Display for Term {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Var(var) => f.write_str(var.name()),
            Self::Constant(constant) => write!(f, "{constant}"),
        }
    }
}

/// A difference of two `Term`s, the only linear shape the cross-multiplied trajectory equations
/// need
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Difference {
    pub minuend: Term,
    pub subtrahend: Term,
}

impl Difference {
    pub const fn new(minuend: Term, subtrahend: Term) -> Self {
        Self {
            minuend,
            subtrahend,
        }
    }
}

impl Display for Difference {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self.subtrahend {
            Term::Constant(constant) if constant < 0_i64 => {
                write!(f, "{} + {}", self.minuend, -constant)
            }
            subtrahend => write!(f, "{} - {}", self.minuend, subtrahend),
        }
    }
}

/// An equality between two products of `Difference`s, `lhs.0 * lhs.1 == rhs.0 * rhs.1`
///
/// This is the exact shape of the constraints obtained by eliminating the intersection time from
/// the rock-meets-hailstone condition (see `Hailstone::constraints`), kept structural so the
/// console output mirrors the equations as built.
#[derive(Clone, Debug, PartialEq)]
pub struct Constraint {
    lhs: (Difference, Difference),
    rhs: (Difference, Difference),
}

impl Constraint {
    pub const fn product_eq(lhs: (Difference, Difference), rhs: (Difference, Difference)) -> Self {
        Self { lhs, rhs }
    }

    pub fn sides(&self) -> ((Difference, Difference), (Difference, Difference)) {
        (self.lhs, self.rhs)
    }

    /// The constraint as `lhs - rhs`, expanded; zero exactly when the constraint holds
    pub fn polynomial(&self) -> Polynomial {
        Polynomial::from_product(self.lhs) - Polynomial::from_product(self.rhs)
    }

    pub fn residual(&self, assignment: &Assignment) -> i128 {
        self.polynomial().eval(assignment)
    }
}

impl Display for Constraint {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "({}) * ({}) == ({}) * ({})",
            self.lhs.0, self.lhs.1, self.rhs.0, self.rhs.1
        )
    }
}

/// A product of at most two unknowns; degree two suffices for products of `Difference`s
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub enum Monomial {
    Constant,
    Linear(RockVar),
    Quadratic(RockVar, RockVar),
}

impl Monomial {
    fn quadratic(a: RockVar, b: RockVar) -> Self {
        if a <= b {
            Self::Quadratic(a, b)
        } else {
            Self::Quadratic(b, a)
        }
    }

    fn eval(self, assignment: &Assignment) -> i128 {
        match self {
            Self::Constant => 1_i128,
            Self::Linear(var) => assignment[var as usize] as i128,
            Self::Quadratic(a, b) => {
                assignment[a as usize] as i128 * assignment[b as usize] as i128
            }
        }
    }
}

/// Sum of coefficient-weighted `Monomial`s; terms with zero coefficients are not stored
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Polynomial(BTreeMap<Monomial, i128>);

impl Polynomial {
    /// Expands `(a.minuend - a.subtrahend) * (b.minuend - b.subtrahend)`
    pub fn from_product((a, b): (Difference, Difference)) -> Self {
        let mut polynomial: Self = Self::default();

        polynomial.accumulate(1_i128, a.minuend, b.minuend);
        polynomial.accumulate(-1_i128, a.minuend, b.subtrahend);
        polynomial.accumulate(-1_i128, a.subtrahend, b.minuend);
        polynomial.accumulate(1_i128, a.subtrahend, b.subtrahend);

        polynomial
    }

    pub fn eval(&self, assignment: &Assignment) -> i128 {
        self.0
            .iter()
            .map(|(monomial, coefficient)| coefficient * monomial.eval(assignment))
            .sum()
    }

    /// The coefficients and constant of a polynomial with no quadratic terms, or `None`
    ///
    /// The equation represented is `coefficients . vars + constant == 0`.
    pub fn linear_row(&self) -> Option<([i128; RockVar::COUNT], i128)> {
        let mut coefficients: [i128; RockVar::COUNT] = Default::default();
        let mut constant: i128 = 0_i128;

        for (monomial, &coefficient) in self.0.iter() {
            match monomial {
                Monomial::Constant => constant = coefficient,
                Monomial::Linear(var) => coefficients[*var as usize] = coefficient,
                Monomial::Quadratic(..) => return None,
            }
        }

        Some((coefficients, constant))
    }

    fn accumulate(&mut self, sign: i128, a: Term, b: Term) {
        let (monomial, coefficient): (Monomial, i128) = match (a, b) {
            (Term::Constant(a), Term::Constant(b)) => {
                (Monomial::Constant, a as i128 * b as i128)
            }
            (Term::Var(var), Term::Constant(constant))
            | (Term::Constant(constant), Term::Var(var)) => {
                (Monomial::Linear(var), constant as i128)
            }
            (Term::Var(a), Term::Var(b)) => (Monomial::quadratic(a, b), 1_i128),
        };

        self.add_term(monomial, sign * coefficient);
    }

    fn add_term(&mut self, monomial: Monomial, coefficient: i128) {
        if coefficient == 0_i128 {
            return;
        }

        let entry: &mut i128 = self.0.entry(monomial).or_default();

        *entry += coefficient;

        if *entry == 0_i128 {
            self.0.remove(&monomial);
        }
    }
}

impl Sub for Polynomial {
    type Output = Self;

    fn sub(mut self, rhs: Self) -> Self {
        for (monomial, coefficient) in rhs.0 {
            self.add_term(monomial, -coefficient);
        }

        self
    }
}
