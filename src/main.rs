use {hail_rock::*, std::process::exit};

fn run(hailstorm: &Hailstorm, verbose: bool) -> Result<(), RockError> {
    for constraint in hailstorm.trio_constraints()? {
        println!("{constraint}");
    }

    let rock: Rock = hailstorm.rock(&Z3Solver)?;

    println!("sat");
    println!();
    println!("Position: ({}, {}, {})", rock.pos.x, rock.pos.y, rock.pos.z);
    println!("Velocity: ({}, {}, {})", rock.vel.x, rock.vel.y, rock.vel.z);

    if verbose {
        for hailstone in hailstorm.leading_trio()? {
            // `rock` already survived re-verification, so the time exists
            if let Some(time) = rock.intersection_time(hailstone) {
                println!(
                    "  passes through hailstone {}, {}, {} @ {}, {}, {} at t = {time}",
                    hailstone.pos.x,
                    hailstone.pos.y,
                    hailstone.pos.z,
                    hailstone.vel.x,
                    hailstone.vel.y,
                    hailstone.vel.z
                );
            }
        }
    }

    println!();
    println!("Answer: {}", rock.pos_sum());

    Ok(())
}

fn main() {
    let args: Args = Args::parse();

    let result: Result<(), RockError> = match args.input_file_path() {
        Some(input_file_path) => {
            // SAFETY: This isn't truly safe, we're just hoping nobody touches our file before
            // we're done parsing it
            let io_result = unsafe {
                open_utf8_file(input_file_path, |input: &str| {
                    match Hailstorm::try_from(input) {
                        Ok(hailstorm) => run(&hailstorm, args.verbose),
                        Err(error) => {
                            eprintln!("Failed to parse \"{input_file_path}\":\n{error:#?}");

                            exit(1_i32);
                        }
                    }
                })
            };

            match io_result {
                Ok(run_result) => run_result,
                Err(error) => {
                    eprintln!("Failed to open UTF-8 file \"{input_file_path}\":\n{error}");

                    exit(1_i32);
                }
            }
        }
        None => run(&Hailstorm::puzzle(), args.verbose),
    };

    if let Err(error) = result {
        eprintln!("{error}");

        exit(1_i32);
    }
}
