use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use tapec::{compile, jit, CompileError, OptLevel};

/// An optimizing compiler for an eight-symbol tape machine, targeting AArch64.
#[derive(Parser, Debug)]
#[command(name = "tapec", version, about)]
struct Cli {
    /// Source file to compile.
    source: PathBuf,

    /// Output file for the raw AArch64 instruction stream.
    ///
    /// Ignored when `--jit` is set.
    #[arg(default_value = "a.out")]
    output: PathBuf,

    /// Emit stage progress as structured log output. Repeat (`-vv`) to
    /// additionally emit a full IR dump.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Disable all optimization passes.
    #[arg(short = '0', long = "O0", conflicts_with_all = ["o1", "o2", "o3"])]
    o0: bool,

    /// Run run-length folding and clear-loop recognition (default).
    #[arg(short = '1', long = "O1", conflicts_with_all = ["o0", "o2", "o3"])]
    o1: bool,

    /// Also run move-loop and scan-loop recognition.
    #[arg(short = '2', long = "O2", conflicts_with_all = ["o0", "o1", "o3"])]
    o2: bool,

    /// Also run multiply-add loop recognition.
    #[arg(short = '3', long = "O3", conflicts_with_all = ["o0", "o1", "o2"])]
    o3: bool,

    /// Run the compiled program immediately with the JIT executor
    /// instead of writing it to a file.
    #[arg(short, long)]
    jit: bool,
}

impl Cli {
    fn opt_level(&self) -> OptLevel {
        if self.o0 {
            OptLevel::O0
        } else if self.o2 {
            OptLevel::O2
        } else if self.o3 {
            OptLevel::O3
        } else {
            OptLevel::O1
        }
    }
}

fn run(cli: &Cli) -> Result<(), CompileError> {
    let source = fs::read(&cli.source).map_err(|source| CompileError::InputIo {
        path: cli.source.clone(),
        source,
    })?;

    log::debug!("compiling {} ({} bytes)", cli.source.display(), source.len());
    let buf = compile(&source, cli.opt_level())?;
    log::debug!("emitted {} instruction words", buf.len());

    if cli.jit {
        match jit::run(&buf) {
            Ok(result) => {
                log::info!("jit execution returned {result}");
                Ok(())
            }
            Err(err) => Err(err),
        }
    } else {
        fs::write(&cli.output, buf.to_bytes()).map_err(|source| CompileError::OutputIo {
            path: cli.output.clone(),
            source,
        })
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new().filter_level(level).init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("tapec: {err}");
            ExitCode::FAILURE
        }
    }
}
