use {
    crate::*,
    glam::I64Vec3,
    nom::{
        bytes::complete::tag,
        character::complete::{line_ending, space1},
        combinator::{map, opt},
        error::Error,
        multi::many0,
        sequence::{terminated, tuple},
        Err, IResult,
    },
};

/// A particle with a fixed integer position and constant integer velocity at time zero
#[derive(Clone, Debug, PartialEq)]
pub struct Hailstone {
    pub pos: I64Vec3,
    pub vel: I64Vec3,
}

impl Hailstone {
    fn parse_i64_vec3<'i>(input: &'i str) -> IResult<&'i str, I64Vec3> {
        map(
            tuple((
                parse_integer::<i64>,
                tag(","),
                space1,
                parse_integer::<i64>,
                tag(","),
                space1,
                parse_integer::<i64>,
            )),
            |(x, _, _, y, _, _, z)| I64Vec3::new(x, y, z),
        )(input)
    }

    /// The two equality constraints tying the rock unknowns to this hailstone
    ///
    /// The rock and this hailstone occupy the same position at some shared time `t`:
    ///
    /// ```text
    /// px + t * vx = sx + t * ux
    /// py + t * vy = sy + t * uy
    /// pz + t * vz = sz + t * uz
    /// ```
    ///
    /// Solving each axis for `t`:
    ///
    /// ```text
    /// t = (px - sx) / (ux - vx)
    ///   = (py - sy) / (uy - vy)
    ///   = (pz - sz) / (uz - vz)
    /// ```
    ///
    /// Cross-multiplying the x-equality against the y- and z-equalities eliminates `t` (the
    /// remaining pairing is dependent on these two):
    ///
    /// ```text
    /// (px - sx) * (uy - vy) = (py - sy) * (ux - vx)
    /// (px - sx) * (uz - vz) = (pz - sz) * (ux - vx)
    /// ```
    ///
    /// Two equations per hailstone means three hailstones suffice for the six unknowns.
    pub fn constraints(&self) -> [Constraint; 2_usize] {
        [self.xy_constraint(), self.xz_constraint()]
    }

    pub fn xy_constraint(&self) -> Constraint {
        Constraint::product_eq(
            (
                Difference::new(Term::Var(RockVar::Px), Term::Constant(self.pos.x)),
                Difference::new(Term::Constant(self.vel.y), Term::Var(RockVar::Vy)),
            ),
            (
                Difference::new(Term::Var(RockVar::Py), Term::Constant(self.pos.y)),
                Difference::new(Term::Constant(self.vel.x), Term::Var(RockVar::Vx)),
            ),
        )
    }

    pub fn xz_constraint(&self) -> Constraint {
        Constraint::product_eq(
            (
                Difference::new(Term::Var(RockVar::Px), Term::Constant(self.pos.x)),
                Difference::new(Term::Constant(self.vel.z), Term::Var(RockVar::Vz)),
            ),
            (
                Difference::new(Term::Var(RockVar::Pz), Term::Constant(self.pos.z)),
                Difference::new(Term::Constant(self.vel.x), Term::Var(RockVar::Vx)),
            ),
        )
    }
}

impl Parse for Hailstone {
    fn parse<'i>(input: &'i str) -> IResult<&'i str, Self> {
        map(
            tuple((Self::parse_i64_vec3, tag(" @"), space1, Self::parse_i64_vec3)),
            |(pos, _, _, vel)| Self { pos, vel },
        )(input)
    }
}

/// The hailstones from one puzzle input; only the leading trio feeds the constraint system
#[derive(Clone, Debug, PartialEq)]
pub struct Hailstorm(Vec<Hailstone>);

impl Hailstorm {
    pub const TRIO_LEN: usize = 3_usize;

    /// The first three hailstones of the author's puzzle input
    pub const PUZZLE_TRIO: [Hailstone; Self::TRIO_LEN] = [
        Hailstone {
            pos: I64Vec3::new(216518090678054_i64, 311610807965630_i64, 244665409335040_i64),
            vel: I64Vec3::new(-24_i64, -43_i64, 118_i64),
        },
        Hailstone {
            pos: I64Vec3::new(119252599207972_i64, 265844340901442_i64, 404506989029618_i64),
            vel: I64Vec3::new(93_i64, 9_i64, -69_i64),
        },
        Hailstone {
            pos: I64Vec3::new(366376232895280_i64, 243548034524148_i64, 222429607201000_i64),
            vel: I64Vec3::new(18_i64, 38_i64, 19_i64),
        },
    ];

    pub fn puzzle() -> Self {
        Self(Self::PUZZLE_TRIO.to_vec())
    }

    /// The first three hailstones, or a descriptive error when the input is too short
    pub fn leading_trio(&self) -> Result<&[Hailstone], RockError> {
        (self.0.len() >= Self::TRIO_LEN)
            .then(|| &self.0[..Self::TRIO_LEN])
            .ok_or(RockError::TooFewHailstones {
                count: self.0.len(),
            })
    }
}

impl From<Vec<Hailstone>> for Hailstorm {
    fn from(hailstones: Vec<Hailstone>) -> Self {
        Self(hailstones)
    }
}

impl Parse for Hailstorm {
    fn parse<'i>(input: &'i str) -> IResult<&'i str, Self> {
        map(many0(terminated(Hailstone::parse, opt(line_ending))), Self)(input)
    }
}

impl<'i> TryFrom<&'i str> for Hailstorm {
    type Error = Err<Error<&'i str>>;

    fn try_from(input: &'i str) -> Result<Self, Self::Error> {
        Ok(Self::parse(input)?.1)
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

    fn hailstorm() -> &'static Hailstorm {
        macro_rules! hailstones {
            [ $( $px:expr, $py:expr, $pz:expr, $vx:expr, $vy:expr, $vz:expr; )* ] => { vec![ $(
                Hailstone {
                    pos: I64Vec3::new($px, $py, $pz),
                    vel: I64Vec3::new($vx, $vy, $vz),
                },
            )* ] };
        }

        static ONCE_LOCK: OnceLock<Hailstorm> = OnceLock::new();

        ONCE_LOCK.get_or_init(|| {
            Hailstorm(hailstones![
                19_i64, 13_i64, 30_i64, -2_i64,  1_i64, -2_i64;
                18_i64, 19_i64, 22_i64, -1_i64, -1_i64, -2_i64;
                20_i64, 25_i64, 34_i64, -2_i64, -2_i64, -4_i64;
                12_i64, 31_i64, 28_i64, -1_i64, -2_i64, -1_i64;
                20_i64, 19_i64, 15_i64,  1_i64, -5_i64, -3_i64;
            ])
        })
    }

    #[test]
    fn test_try_from_str() {
        assert_eq!(Hailstorm::try_from(HAILSTORM_STR).as_ref(), Ok(hailstorm()));
    }

    #[test]
    fn test_leading_trio() {
        assert_eq!(
            hailstorm().leading_trio(),
            Ok(&hailstorm().0[..Hailstorm::TRIO_LEN])
        );

        let short_hailstorm: Hailstorm = Hailstorm(hailstorm().0[..2_usize].to_vec());

        assert_eq!(
            short_hailstorm.leading_trio(),
            Err(RockError::TooFewHailstones { count: 2_usize })
        );
    }
}
