use clap::{Parser, Subcommand, ValueEnum};
use sandbox_core::diagnostics::{format_diagnostic, format_parse_error};
use sandbox_core::{
    analyze_scenario, build_simulation_context, parse_scenario, particle_states,
    run_scenario_with, step_simulation, Method, RunOverrides, RuntimeError,
};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sandbox")]
#[command(about = "Particle sandbox - step particles under gravity and air drag", long_about = None)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum MethodArg {
    Euler,
    Rk4,
}

impl From<MethodArg> for Method {
    fn from(arg: MethodArg) -> Self {
        match arg {
            MethodArg::Euler => Method::Euler,
            MethodArg::Rk4 => Method::Rk4,
        }
    }
}

#[derive(clap::Args)]
struct RunArgs {
    /// Path to the scenario file
    file: PathBuf,
    /// Override the integration method
    #[arg(long, value_enum)]
    method: Option<MethodArg>,
    /// Override the time step in seconds
    #[arg(long)]
    dt: Option<f64>,
    /// Override the number of steps
    #[arg(long)]
    steps: Option<u64>,
}

impl RunArgs {
    fn overrides(&self) -> RunOverrides {
        RunOverrides {
            method: self.method.map(Method::from),
            dt: self.dt,
            steps: self.steps,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scenario and print its detectors
    Run(RunArgs),
    /// Print every particle's state as the scenario runs
    Trace {
        #[command(flatten)]
        run: RunArgs,
        /// Print every N-th tick
        #[arg(long, default_value_t = 1)]
        every: u64,
    },
    /// Parse and analyze a scenario without running it
    Check {
        /// Path to the scenario file
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match &cli.command {
        Commands::Run(args) => run_file(args),
        Commands::Trace { run, every } => trace_file(run, *every),
        Commands::Check { file } => check_file(file),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Render runtime errors with source context where we have it
fn describe(error: RuntimeError, source: &str) -> String {
    match &error {
        RuntimeError::Parse(parse) => format_parse_error(parse, source),
        RuntimeError::Analysis { diagnostics, .. } => diagnostics
            .errors()
            .map(|d| format_diagnostic(d, source))
            .collect::<Vec<_>>()
            .join("\n"),
        RuntimeError::UnknownParticle(_) => error.to_string(),
    }
}

fn run_file(args: &RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let source = fs::read_to_string(&args.file)?;
    let result = run_scenario_with(&source, &args.overrides()).map_err(|e| describe(e, &source))?;

    for detector in result.detectors {
        println!("{} = {}", detector.name, detector.value);
    }

    Ok(())
}

fn trace_file(args: &RunArgs, every: u64) -> Result<(), Box<dyn std::error::Error>> {
    let source = fs::read_to_string(&args.file)?;
    let mut ctx = build_simulation_context(&source, &args.overrides())
        .map_err(|e| describe(e, &source))?;
    let every = every.max(1);

    println!("tick,time,name,x,y,vx,vy");
    loop {
        if ctx.current_step % every == 0 {
            for state in particle_states(&ctx) {
                println!(
                    "{},{},{},{},{},{},{}",
                    ctx.current_step,
                    ctx.world.elapsed,
                    state.name.as_deref().unwrap_or("-"),
                    state.position.x,
                    state.position.y,
                    state.velocity.x,
                    state.velocity.y,
                );
            }
        }
        if !step_simulation(&mut ctx) {
            break;
        }
    }

    Ok(())
}

fn check_file(file: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let source = fs::read_to_string(file)?;
    let scenario = parse_scenario(&source).map_err(|e| format_parse_error(&e, &source))?;
    let diagnostics = analyze_scenario(&scenario);

    for diagnostic in diagnostics.iter() {
        println!("{}", format_diagnostic(diagnostic, &source));
    }

    if diagnostics.has_errors() {
        return Err(format!("{} error(s)", diagnostics.errors().count()).into());
    }
    println!("ok: {} particle(s), {} detector(s)", scenario.particles.len(), scenario.detectors.len());
    Ok(())
}
