use std::process::ExitCode;

use csv_validate::runner;
use csv_validate::ValidatorKind;

fn main() -> ExitCode {
    runner::main(ValidatorKind::Merged)
}
