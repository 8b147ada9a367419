pub use {
    self::{determinacy::*, equation::*, hailstone::*, rock::*, smt::*, solver::*},
    clap::Parser,
};

use {
    memmap::Mmap,
    nom::{
        bytes::complete::tag,
        character::complete::digit1,
        combinator::{map, map_res, opt},
        sequence::tuple,
        IResult,
    },
    num::Integer,
    std::{
        fs::File,
        io::{Error as IoError, ErrorKind, Result as IoResult},
        str::{from_utf8, FromStr, Utf8Error},
    },
};

mod determinacy;
mod equation;
mod hailstone;
mod rock;
mod smt;
mod solver;

/// Arguments for program execution
#[derive(Debug, Parser)]
pub struct Args {
    /// Input file path; the hard-coded puzzle hailstones are used if this is empty
    #[arg(short, long, default_value_t)]
    input_file_path: String,

    /// Print extra information, if there is any
    #[arg(short, long, default_value_t)]
    pub verbose: bool,
}

impl Args {
    /// Returns the input file path, if one was provided
    pub fn input_file_path(&self) -> Option<&str> {
        (!self.input_file_path.is_empty()).then_some(self.input_file_path.as_str())
    }
}

/// Opens a memory-mapped UTF-8 file at a specified path, and passes in a `&str` over the file to a
/// provided callback function
///
/// # Arguments
///
/// * `file_path` - A string slice file path to open as a read-only file
/// * `f` - A callback function to invoke on the contents of the file as a string slice
///
/// # Errors
///
/// This function returns a `Result::Err`-wrapped `std::io::Error` if an error has occurred.
/// Possible causes are:
///
/// * `std::fs::File::open` was unable to open a read-only file at `file_path`
/// * `memmap::Mmap::map` fails to create an `Mmap` instance for the opened file
/// * `std::str::from_utf8` determines the file is not in valid UTF-8 format
///
/// `f` is only executed *iff* an error is not encountered.
///
/// # Safety
///
/// This function uses `Mmap::map`, which is an unsafe function. There is no guarantee that an
/// external process won't modify the file after it is opened as read-only.
///
/// # Undefined Behavior
///
/// Related to the **Safety** section above, it is UB if the opened file is modified by an external
/// process while this function is referring to it as an immutable string slice.
pub unsafe fn open_utf8_file<T, F: FnOnce(&str) -> T>(file_path: &str, f: F) -> IoResult<T> {
    let file: File = File::open(file_path)?;

    // SAFETY: This operation is unsafe
    let mmap: Mmap = Mmap::map(&file)?;
    let bytes: &[u8] = &mmap;
    let utf8_str: &str = from_utf8(bytes).map_err(|utf8_error: Utf8Error| -> IoError {
        IoError::new(ErrorKind::InvalidData, utf8_error)
    })?;

    Ok(f(utf8_str))
}

pub fn parse_integer<'i, I: FromStr + Integer>(input: &'i str) -> IResult<&'i str, I> {
    map(
        tuple((
            map(opt(tag("-")), |minus| {
                if minus.is_some() {
                    I::zero() - I::one()
                } else {
                    I::one()
                }
            }),
            map_res(digit1, I::from_str),
        )),
        |(sign, bound)| sign * bound,
    )(input)
}

pub trait Parse: Sized {
    fn parse<'i>(input: &'i str) -> IResult<&'i str, Self>;
}
