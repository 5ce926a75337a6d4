//! Command-line front end: read a CSG scene, build the octree, write the
//! mesh.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::process::ExitCode;

use clap::Parser;

/// Functions and structures related specifically to the command-line
/// interface.
mod cli;

const EXIT_USAGE: u8 = 1;
const EXIT_INPUT: u8 = 2;
const EXIT_OUTPUT: u8 = 3;
const EXIT_PARSE: u8 = 4;

fn main() -> ExitCode {
    let cli = match cli::Cli::try_parse() {
        Ok(cli) => cli,
        // clap routes --help and --version through the error path too
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                    ExitCode::SUCCESS
                }
                _ => ExitCode::from(EXIT_USAGE),
            };
        }
    };
    cli::initialize_tracing(&cli.log_filter, cli.log_format);

    let source = match std::fs::read_to_string(&cli.input) {
        Ok(source) => source,
        Err(e) => {
            tracing::error!(path = ?cli.input, "failed to open input: {e}");
            return ExitCode::from(EXIT_INPUT);
        }
    };

    // open the output before the build so a bad path fails fast
    let output = match File::create(&cli.output) {
        Ok(file) => file,
        Err(e) => {
            tracing::error!(path = ?cli.output, "failed to open output: {e}");
            return ExitCode::from(EXIT_OUTPUT);
        }
    };

    let scene = match ocmesh::csg::parse(&source) {
        Ok(scene) => scene,
        Err(e) => {
            tracing::error!(path = ?cli.input, "{e}");
            return ExitCode::from(EXIT_PARSE);
        }
    };

    let mut octree = ocmesh::Octree::new();
    octree.build_csg(&scene, cli.precision);
    tracing::info!(voxels = octree.len(), "octree built");

    let mut output = BufWriter::new(output);
    if let Err(e) = ocmesh::write_obj(&octree, &mut output).and_then(|()| output.flush()) {
        tracing::error!(path = ?cli.output, "failed to write mesh: {e}");
        return ExitCode::from(EXIT_OUTPUT);
    }

    ExitCode::SUCCESS
}
