use clap::{Parser, Subcommand};
use ffimath::{catalog, run_checks, FfiConfig, FfiMathError, Report};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "ffimath")]
#[command(about = "Numeric C-ABI library: inspect, evaluate and verify exports")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List exported functions and their C signatures
    #[command(alias = "ls")]
    List {
        /// Print the export manifest as TOML
        #[arg(long)]
        toml: bool,

        #[arg(long, default_value = ffimath::DEFAULT_SYMBOL_PREFIX)]
        prefix: String,
    },

    /// Evaluate a function in-process
    #[command(alias = "c")]
    Call {
        function: String,

        #[arg(allow_negative_numbers = true)]
        args: Vec<String>,
    },

    /// Load a shared library and run the check suite against it
    #[command(alias = "v")]
    Verify {
        #[arg(short, long)]
        config: Option<PathBuf>,

        #[arg(short, long)]
        library: Option<PathBuf>,

        #[arg(long)]
        prefix: Option<String>,

        /// Run the suite against the built-in implementations instead
        #[arg(long)]
        in_process: bool,

        #[arg(short, long)]
        verbose: bool,
    },

    Info,
}

fn init_logger(verbose: bool) {
    let default_filter = if verbose { "ffimath=debug,info" } else { "ffimath=info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

fn main() {
    let cli = Cli::parse();

    let command = cli.command.unwrap_or(Commands::List {
        toml: false,
        prefix: ffimath::DEFAULT_SYMBOL_PREFIX.to_string(),
    });

    let verbose = matches!(command, Commands::Verify { verbose: true, .. });
    init_logger(verbose);

    let result = match command {
        Commands::List { toml, prefix } => list(toml, &prefix),
        Commands::Call { function, args } => call(&function, &args),
        Commands::Verify {
            config,
            library,
            prefix,
            in_process,
            verbose,
        } => verify(config, library, prefix, in_process, verbose),
        Commands::Info => {
            info();
            Ok(true)
        }
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            match e {
                FfiMathError::LibraryNotFound(msg) => {
                    eprintln!("❌ Library not found: {msg}");
                    eprintln!("   Build it with `cargo build --release` or pass --library");
                }
                FfiMathError::TomlParse(parse_err) => {
                    eprintln!("❌ Invalid config syntax:");
                    eprintln!("   {parse_err}");
                }
                _ => eprintln!("❌ {e}"),
            }
            std::process::exit(1);
        }
    }
}

fn list(as_toml: bool, prefix: &str) -> ffimath::Result<bool> {
    if as_toml {
        print!("{}", catalog::manifest(prefix)?);
        return Ok(true);
    }

    println!("📦 Exports ({})", ffimath::EXPORTS.len());
    println!("═══════════════");
    for export in ffimath::EXPORTS {
        let symbol = export.symbol(prefix);
        println!(
            "  {:<40} {}",
            export.signature.c_prototype(&symbol),
            export.summary
        );
    }
    Ok(true)
}

fn call(function: &str, args: &[String]) -> ffimath::Result<bool> {
    let export = catalog::find(function)?;
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    let values = export.parse_args(&args)?;
    let result = catalog::evaluate(function, &values)?;
    println!("{result}");
    Ok(true)
}

fn verify(
    config_path: Option<PathBuf>,
    library: Option<PathBuf>,
    prefix: Option<String>,
    in_process: bool,
    verbose: bool,
) -> ffimath::Result<bool> {
    if in_process {
        let report = run_checks(&ffimath::InProcess);
        return Ok(print_report("built-in implementations", &report, verbose));
    }

    let mut config = match config_path {
        Some(path) => FfiConfig::from_file(path)?,
        None => FfiConfig::default(),
    };
    if let Some(path) = library {
        config = config.with_library_path(path);
    }
    if let Some(prefix) = prefix {
        config = config.with_symbol_prefix(prefix);
    }

    verify_library(&config, verbose)
}

#[cfg(not(target_os = "windows"))]
fn verify_library(config: &FfiConfig, verbose: bool) -> ffimath::Result<bool> {
    let library = ffimath::LoadedLibrary::load(config)?;

    let missing = library.missing_symbols();
    if !missing.is_empty() {
        eprintln!("⚠️  Missing symbols (prefix '{}'):", library.prefix());
        for name in &missing {
            eprintln!("  - {}{name}", library.prefix());
        }
    }

    let report = run_checks(&library);
    let label = library.path().display().to_string();
    Ok(print_report(&label, &report, verbose) && missing.is_empty())
}

#[cfg(target_os = "windows")]
fn verify_library(_config: &FfiConfig, _verbose: bool) -> ffimath::Result<bool> {
    eprintln!("❌ Loading libraries is not supported on Windows; use --in-process");
    Ok(false)
}

fn print_report(label: &str, report: &Report, verbose: bool) -> bool {
    println!("🔍 Verifying {label}");

    for failure in &report.failures {
        println!("  ❌ {} - {}", failure.check, failure.outcome);
    }

    if verbose || report.is_success() {
        println!("  {}/{} checks passed", report.passed, report.total());
    }

    if report.is_success() {
        println!("🎉 All checks passed!");
    } else {
        println!("⚠️  {} check(s) failed", report.failures.len());
    }
    report.is_success()
}

fn info() {
    println!("ffimath v{}", env!("CARGO_PKG_VERSION"));
    println!("Numeric utility library exported over the C ABI");
    println!();
    println!("Commands:");
    println!("  list     List exported functions (default)");
    println!("  call     Evaluate a function in-process");
    println!("  verify   Run the check suite against a shared library");
    println!("  info     Show version and usage information");
}
