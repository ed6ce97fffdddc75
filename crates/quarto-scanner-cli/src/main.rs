use anyhow::{Context, Result};
use quarto_scanner::{LogObserver, Scanner, Session, coalesce};
use quarto_scanner_config::Config;
use std::{env, path::PathBuf, process};
use xi_rope::Rope;

enum Mode {
    /// Scan the whole file.
    Full,
    /// Stop after this many scanner steps and persist the state.
    SuspendAfter(usize),
    /// Continue from the persisted state.
    Resume,
}

fn usage(program: &str) -> ! {
    eprintln!("Usage: {program} <file> [--suspend-after <steps> | --resume]");
    process::exit(1);
}

fn parse_args(args: &[String]) -> (PathBuf, Mode) {
    let program = args.first().map_or("quarto-scanner", String::as_str);
    match args {
        [_, file] => (PathBuf::from(file), Mode::Full),
        [_, file, flag] if flag == "--resume" => (PathBuf::from(file), Mode::Resume),
        [_, file, flag, steps] if flag == "--suspend-after" => match steps.parse() {
            Ok(steps) => (PathBuf::from(file), Mode::SuspendAfter(steps)),
            Err(_) => {
                eprintln!("Error: '{steps}' is not a step count");
                usage(program)
            }
        },
        _ => usage(program),
    }
}

fn init_logging(config: &Config) {
    let mut builder = env_logger::Builder::from_default_env();
    if env::var_os("RUST_LOG").is_none() {
        let level = match config.log_level.as_deref().map(str::parse::<log::LevelFilter>) {
            Some(Ok(level)) => level,
            Some(Err(_)) => {
                eprintln!("Warning: ignoring unknown log_level in config");
                log::LevelFilter::Warn
            }
            None => log::LevelFilter::Warn,
        };
        builder.filter_level(level);
        if config.trace {
            builder.filter_module("quarto_scanner", log::LevelFilter::Trace);
        }
    }
    builder.init();
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let (file, mode) = parse_args(&args);

    let config = match Config::load_or_default() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            eprintln!("Fix or remove {}", Config::config_path().display());
            process::exit(1);
        }
    };
    init_logging(&config);

    let content = std::fs::read_to_string(&file)
        .with_context(|| format!("reading {}", file.display()))?;
    let rope = Rope::from(content.as_str());
    let mut scanner = Scanner::with_observer(config.scanner.clone(), LogObserver);

    let emitted = match mode {
        Mode::Full => coalesce(Session::new(&rope, &mut scanner)),
        Mode::SuspendAfter(steps) => {
            let mut session = Session::new(&rope, &mut scanner);
            let head = coalesce(session.by_ref().take(steps));
            let blob = session.suspend();
            if let Some(parent) = config.state_path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&config.state_path, &blob)
                .with_context(|| format!("writing {}", config.state_path.display()))?;
            log::info!(
                "suspended after {steps} steps; {} bytes of state in {}",
                blob.len(),
                config.state_path.display()
            );
            head
        }
        Mode::Resume => {
            let blob = std::fs::read(&config.state_path)
                .with_context(|| format!("reading {}", config.state_path.display()))?;
            coalesce(Session::resume(&rope, &blob, &mut scanner))
        }
    };

    for item in &emitted {
        println!("{item}");
    }
    Ok(())
}
