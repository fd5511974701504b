use std::ffi::OsString;
use std::io::Write;

use clap::error::ErrorKind;
use clap::{CommandFactory, FromArgMatches};
use indicatif::{ProgressBar, ProgressStyle};
use lattice_mc::{
    codec, energy_per_site, update_with_progress, Grid, GridError, TypeTag, UpdateConfig,
};
use tracing::{debug, info};

use crate::cli::Cli;

/// Monte Carlo model run by an executable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Model {
    Potts,
    Heisenberg,
}

impl Model {
    pub fn program(self) -> &'static str {
        match self {
            Self::Potts => "potts",
            Self::Heisenberg => "heisenberg",
        }
    }

    fn about(self) -> &'static str {
        match self {
            Self::Potts => "Evolve a grain-growth Potts grid by Metropolis sweeps",
            Self::Heisenberg => "Evolve a classical Heisenberg spin grid by Metropolis sweeps",
        }
    }

    pub fn default_temperature(self) -> f64 {
        match self {
            Self::Potts => 0.5,
            Self::Heisenberg => 0.75,
        }
    }
}

/// Implemented (site type, dimension) pairs and the model that runs them.
pub const DISPATCH: &[((TypeTag, usize), Model)] = &[
    ((TypeTag::ScalarInt, 2), Model::Potts),
    ((TypeTag::ScalarInt, 3), Model::Potts),
    ((TypeTag::VectorReal, 2), Model::Heisenberg),
    ((TypeTag::VectorReal, 3), Model::Heisenberg),
];

pub fn lookup(tag: TypeTag, dimension: usize) -> Option<Model> {
    DISPATCH
        .iter()
        .find(|(key, _)| *key == (tag, dimension))
        .map(|&(_, model)| model)
}

/// Load, evolve and save one grid.
pub fn run(model: Model, cli: &Cli) -> Result<(), GridError> {
    let header = codec::peek_header(&cli.input)?;
    if lookup(header.tag, header.dimension) != Some(model) {
        return Err(GridError::UnsupportedType(format!(
            "{} does not handle {}-dimensional {} grids",
            model.program(),
            header.dimension,
            header.tag
        )));
    }

    let grid = Grid::open(&cli.input)?;
    let dimension = grid.dimension();
    let mut grid = grid.with_boundaries(vec![cli.boundary; dimension])?;
    let config = UpdateConfig {
        temperature: cli.temperature.unwrap_or(model.default_temperature()),
        coupling: cli.coupling,
        seed: cli.seed,
        policy: cli.policy,
        sequential: cli.sequential,
    };
    info!(
        input = %cli.input.display(),
        kind = %grid.kind(),
        extents = ?grid.extents(),
        energy = energy_per_site(&grid, config.coupling)?,
        "loaded grid"
    );
    debug!(?config, steps = cli.timesteps, "starting sweeps");

    let pb = if cli.progress {
        ProgressBar::new(cli.timesteps as u64)
    } else {
        ProgressBar::hidden()
    };
    if let Ok(style) = ProgressStyle::with_template(
        "{msg} [{bar:40}] {pos}/{len} [{elapsed_precise} < {eta_precise}, {per_sec}]",
    ) {
        pb.set_style(style.progress_chars("=> "));
    }
    pb.set_message("sweeps");

    update_with_progress(&mut grid, cli.timesteps, &config, &|| pb.inc(1))?;
    pb.finish();

    grid.save(&cli.output)?;
    info!(
        output = %cli.output.display(),
        sweeps = cli.timesteps,
        energy = energy_per_site(&grid, config.coupling)?,
        "wrote grid"
    );
    Ok(())
}

/// One-line stderr message for a failed run.
pub fn describe(err: &GridError) -> String {
    match err {
        GridError::Usage(usage) => usage.clone(),
        GridError::Open { path, .. } => {
            format!("File input error: could not open {}.", path.display())
        }
        GridError::Write { path, .. } => {
            format!("File output error: could not write {}.", path.display())
        }
        e if e.is_not_grid_data() => "File input error: file does not contain grid data.".into(),
        GridError::UnsupportedType(_) => "File input error: unsupported grid data type.".into(),
        other => format!("Error: {other}"),
    }
}

/// Parse `args`, run `model`, and return the process exit code.
///
/// Missing positional arguments print the usage line to `out`; every other
/// failure goes to `err`.
pub fn run_cli<I, T>(model: Model, args: I, out: &mut dyn Write, err: &mut dyn Write) -> u8
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let mut cmd = Cli::command().name(model.program()).about(model.about());
    let parsed = cmd
        .try_get_matches_from_mut(args)
        .and_then(|matches| Cli::from_arg_matches(&matches));
    let cli = match parsed {
        Ok(cli) => cli,
        Err(e) => {
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                    let _ = write!(out, "{}", e.render());
                    0
                }
                ErrorKind::MissingRequiredArgument
                | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                    report(&GridError::Usage(cmd.render_usage().to_string()), out, err)
                }
                _ => {
                    let _ = write!(err, "{}", e.render());
                    2
                }
            };
        }
    };

    match run(model, &cli) {
        Ok(()) => 0,
        Err(e) => report(&e, out, err),
    }
}

/// Print a failure and return exit code 1. Usage goes to `out`.
fn report<'a>(e: &GridError, out: &'a mut dyn Write, err: &'a mut dyn Write) -> u8 {
    let sink = match e {
        GridError::Usage(_) => out,
        _ => err,
    };
    let _ = writeln!(sink, "{}", describe(e));
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_dispatch_table() {
        assert_eq!(lookup(TypeTag::ScalarInt, 2), Some(Model::Potts));
        assert_eq!(lookup(TypeTag::VectorReal, 3), Some(Model::Heisenberg));
        assert_eq!(lookup(TypeTag::ScalarInt, 1), None);
        assert_eq!(lookup(TypeTag::ScalarReal, 2), None);
    }

    #[test]
    fn test_describe_messages() {
        let open = GridError::Open {
            path: PathBuf::from("missing.grid"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert_eq!(
            describe(&open),
            "File input error: could not open missing.grid."
        );

        let not_grid = codec::read(&b"hello\n"[..]).unwrap_err();
        assert_eq!(
            describe(&not_grid),
            "File input error: file does not contain grid data."
        );

        let unsupported = GridError::UnsupportedType("grid:vector:int".into());
        assert_eq!(
            describe(&unsupported),
            "File input error: unsupported grid data type."
        );

        let write = GridError::Write {
            path: PathBuf::from("out/evolved.grid"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert_eq!(
            describe(&write),
            "File output error: could not write out/evolved.grid."
        );

        assert!(describe(&GridError::Config("bad".into())).starts_with("Error: "));
    }

    #[test]
    fn test_usage_goes_to_stdout() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let usage = GridError::Usage("Usage: potts <INPUT> <OUTPUT> <TIMESTEPS>".into());
        assert_eq!(report(&usage, &mut out, &mut err), 1);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Usage: potts <INPUT> <OUTPUT> <TIMESTEPS>\n"
        );
        assert!(err.is_empty());

        let mut out = Vec::new();
        let config = GridError::Config("temperature must be non-negative".into());
        assert_eq!(report(&config, &mut out, &mut err), 1);
        assert!(out.is_empty());
        assert!(String::from_utf8(err).unwrap().starts_with("Error: "));
    }
}
