use anyhow::Context;
use clap::Parser;
use cplang::{BuildOptions, BuildOutcome, ErrorClass, TranspileError, Translator, toolchain};
use std::{path::PathBuf, process::ExitCode};

#[derive(Parser)]
#[command(name = "cpc", version, about = "cpl to C compiler")]
struct Cli {
    /// the `.cpl` source file
    source: Option<PathBuf>,

    /// Only translate to C; do not invoke the C compiler
    #[arg(short = 'c', long)]
    compile_only: bool,

    /// Run the executable after compiling it
    #[arg(short, long)]
    run: bool,

    /// Delete the executable after running it (with --run)
    #[arg(short, long)]
    delete: bool,
}

impl Cli {
    const fn build_options(&self) -> BuildOptions {
        BuildOptions {
            compile_only: self.compile_only,
            run: self.run,
            delete_after_run: self.delete,
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = match Cli::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match compile_and_maybe_run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("[Error] {err:#}");
            let class = err
                .downcast_ref::<TranspileError>()
                .map(TranspileError::class);
            match class {
                // the compiler or the program failed; translation itself went fine
                Some(ErrorClass::Toolchain) => ExitCode::SUCCESS,
                _ => ExitCode::from(1),
            }
        }
    }
}

fn compile_and_maybe_run(args: &Cli) -> anyhow::Result<()> {
    let source = args.source.as_ref().ok_or(TranspileError::MissingSource)?;
    let translator = Translator::open(source)?;

    let translation = translator
        .translate_to_file()
        .with_context(|| format!("failed to translate {}", source.display()))?;
    if translation.skipped > 0 {
        log::warn!("{} unreadable line(s) were skipped", translation.skipped);
    }

    let binary = translator.binary();
    match toolchain::build(translator.output(), &binary, args.build_options())? {
        BuildOutcome::Translated => {
            println!("→ Wrote {}", translator.output().display());
        }
        BuildOutcome::Compiled(binary) => {
            println!("→ Successfully compiled {}", binary.display());
        }
        BuildOutcome::Ran(0) => {
            log::info!("{} exited successfully", binary.display());
        }
        BuildOutcome::Ran(code) => {
            eprintln!("[Error] Program execution failed with exit code {code}");
        }
    }
    Ok(())
}
