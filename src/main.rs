use std::fs;
use std::process::ExitCode;

use clap::{Parser as ClapParser, Subcommand};
use tracing_subscriber::EnvFilter;

use stepc::{optimize, parse, Config, Interpreter, Repl, ReplConfig};

#[derive(ClapParser)]
#[command(name = "stepc", about = "Step-debugging interpreter and CP/CSE optimizer")]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a program interactively (next/print/trace REPL).
    Run {
        file: String,
        #[arg(long)]
        max_steps: Option<usize>,
    },
    /// Run the non-interactive CP/CSE pipeline and write the optimized source.
    Optimize {
        file: String,
        #[arg(short, long)]
        output: Option<String>,
    },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load(std::path::Path::new("."));

    match cli.command {
        Command::Run { file, max_steps } => run_command(&config, &file, max_steps),
        Command::Optimize { file, output } => optimize_command(&config, &file, output),
    }
}

fn run_command(config: &Config, file: &str, max_steps: Option<usize>) -> ExitCode {
    let path = config.resolve_input(file);
    let source = match fs::read_to_string(&path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("failed to read {}: {}", path.display(), e);
            return ExitCode::SUCCESS;
        }
    };

    let program = match parse(&source) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::SUCCESS;
        }
    };

    let interp = match Interpreter::new(program) {
        Ok(i) => i,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::SUCCESS;
        }
    };

    let max_steps = max_steps.unwrap_or(config.max_steps);
    tracing::info!(file = %path.display(), max_steps, "starting interactive session");
    let repl_config = ReplConfig { max_steps, ..ReplConfig::default() };
    let mut repl = Repl::with_config(interp, repl_config);
    if let Err(e) = repl.run() {
        eprintln!("io error: {}", e);
    }
    ExitCode::SUCCESS
}

fn optimize_command(config: &Config, file: &str, output: Option<String>) -> ExitCode {
    let path = config.resolve_input(file);
    let source = match fs::read_to_string(&path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("failed to read {}: {}", path.display(), e);
            return ExitCode::SUCCESS;
        }
    };

    let result = match optimize(&source) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::SUCCESS;
        }
    };

    for line in &result.original_output {
        println!("{}", line);
    }

    let out_path = output.map(std::path::PathBuf::from).unwrap_or_else(|| config.output_path.clone());
    if let Err(e) = fs::write(&out_path, &result.cse_source) {
        eprintln!("failed to write {}: {}", out_path.display(), e);
    } else {
        tracing::info!(path = %out_path.display(), "wrote optimized source");
    }
    ExitCode::SUCCESS
}
