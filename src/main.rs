use clap::Parser;
use forthvm::{
    lang::source_buffer::InputSource,
    runtime::{
        built_ins::register_builtin_words,
        error::{self, ErrorKind},
        interpreter::{forth_interpreter::ForthInterpreter, CodeManagement},
    },
};
use std::{path::PathBuf, process::ExitCode};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{filter::Targets, prelude::*};

/// A small threaded-code Forth virtual machine.
///
/// With no program words the interpreter reads from standard input, after the file given by
/// `--file` if any, until the input runs out or `BYE` is run.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Source file to read before switching to standard input.
    #[arg(short, long, conflicts_with = "program")]
    file: Option<PathBuf>,

    /// A tracing filter which configures the diagnostic logging written to stderr.
    ///
    /// see <https://docs.rs/tracing-subscriber/latest/tracing_subscriber/filter/targets/struct.Targets.html#filtering-with-targets>
    #[arg(
        short,
        long = "trace",
        env = "FORTHVM_TRACE",
        default_value_t = Targets::new().with_default(LevelFilter::WARN)
    )]
    trace_filter: Targets,

    /// Program words to compile and run once instead of reading input.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    program: Vec<String>,
}

fn run(args: &Args) -> error::Result<()> {
    let mut interpreter = ForthInterpreter::default();

    register_builtin_words(&mut interpreter)?;

    if !args.program.is_empty() {
        return interpreter.run_program(&args.program);
    }

    if let Some(path) = &args.file {
        tracing::info!(path = %path.display(), "loading source file");
        interpreter.push_source(InputSource::from_file(path)?);
    }

    interpreter.run_top_level()?;
    println!("Goodbye.");

    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(args.trace_filter.clone()),
        )
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,

        Err(error) => {
            if let ErrorKind::Parse { token, definition } = error.kind() {
                tracing::error!(token = %token, definition = ?definition, "fatal parse error");
            }

            eprintln!("Error: {}", error);
            ExitCode::FAILURE
        }
    }
}
