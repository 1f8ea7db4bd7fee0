//! MiniLang Compiler CLI
//!
//! Command-line interface for compiling MiniLang source to textual LLVM
//! IR.

use clap::{CommandFactory, Parser as ClapParser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;
use std::process;

#[derive(ClapParser)]
#[command(name = "minilangc")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "MiniLang compiler - compile MiniLang programs to LLVM IR", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a MiniLang source file to LLVM IR
    Build {
        /// Input source file
        input: PathBuf,

        /// Output .ll path (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Path to a TOML config file controlling emitted IR
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            input,
            output,
            config,
        } => run_build(&input, output.as_deref(), config.as_deref()),
        Commands::Completions { shell } => run_completions(shell),
    }
}

fn run_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "minilangc", &mut io::stdout());
}

fn run_build(input: &std::path::Path, output: Option<&std::path::Path>, config_path: Option<&std::path::Path>) {
    let config = match config_path {
        Some(path) => match minilangc::CompilerConfig::from_toml_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        },
        None => minilangc::CompilerConfig::default(),
    };

    let ir = match minilangc::compile_file(input, config) {
        Ok(ir) => ir,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    match output {
        Some(path) => {
            if let Err(e) = std::fs::write(path, &ir) {
                eprintln!("Error: failed to write '{}': {}", path.display(), e);
                process::exit(1);
            }
        }
        None => print!("{}", ir),
    }
}
