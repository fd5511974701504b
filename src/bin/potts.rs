use std::io;
use std::process::ExitCode;

use grainmc::{init_logging, run_cli, Model};

fn main() -> ExitCode {
    init_logging();
    let code = run_cli(
        Model::Potts,
        std::env::args_os(),
        &mut io::stdout(),
        &mut io::stderr(),
    );
    ExitCode::from(code)
}
