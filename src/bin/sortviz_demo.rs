//! sortviz terminal demo
//!
//! Runs one visualization and renders every step as a line of values:
//! highlighted indices are bracketed, settled indices are starred.

use std::path::PathBuf;
use std::time::Duration;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sortviz::{
    Algorithm, EventPayload, PreferencesStore, RunController, RunState, SortVizResult, StateView,
    VisualizerConfig,
};

/// Demo configuration
struct Config {
    algorithm: String,
    size: usize,
    delay_ms: u64,
    seed: Option<u64>,
    prefs_path: PathBuf,
    toggle_theme: bool,
}

impl Default for Config {
    fn default() -> Self {
        let defaults = VisualizerConfig::default();
        Self {
            algorithm: defaults.algorithm.name().to_string(),
            size: defaults.array_size,
            delay_ms: 100,
            seed: None,
            prefs_path: PathBuf::from("./sortviz-prefs.json"),
            toggle_theme: false,
        }
    }
}

fn value_for(args: &[String], i: usize, flag: &str) -> String {
    args.get(i + 1).cloned().unwrap_or_else(|| {
        eprintln!("error: {flag} requires a value");
        std::process::exit(1);
    })
}

fn parse_number<T: std::str::FromStr>(raw: &str, what: &str) -> T {
    raw.parse().unwrap_or_else(|_| {
        eprintln!("error: invalid {what}: {raw}");
        std::process::exit(1);
    })
}

fn print_help() {
    println!("sortviz-demo - Stepwise sorting visualization in the terminal");
    println!();
    println!("USAGE:");
    println!("    sortviz-demo [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -a, --algorithm <NAME>    Algorithm to run [default: Bubble Sort]");
    println!("    -n, --size <N>            Array size, 5..=50 [default: 10]");
    println!("    -d, --delay <MS>          Step delay, 50..=1500 [default: 100]");
    println!("    -s, --seed <SEED>         Seed for the array generator");
    println!("        --prefs <FILE>        Preferences file [default: ./sortviz-prefs.json]");
    println!("        --toggle-theme        Flip the stored theme before running");
    println!("        --list                List the available algorithms");
    println!("    -h, --help                Print help information");
}

fn parse_args() -> Config {
    let args: Vec<String> = std::env::args().collect();
    let mut config = Config::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--algorithm" | "-a" => {
                config.algorithm = value_for(&args, i, "--algorithm");
                i += 2;
            }
            "--size" | "-n" => {
                config.size = parse_number(&value_for(&args, i, "--size"), "array size");
                i += 2;
            }
            "--delay" | "-d" => {
                config.delay_ms = parse_number(&value_for(&args, i, "--delay"), "delay");
                i += 2;
            }
            "--seed" | "-s" => {
                config.seed = Some(parse_number(&value_for(&args, i, "--seed"), "seed"));
                i += 2;
            }
            "--prefs" => {
                config.prefs_path = PathBuf::from(value_for(&args, i, "--prefs"));
                i += 2;
            }
            "--toggle-theme" => {
                config.toggle_theme = true;
                i += 1;
            }
            "--list" => {
                for algo in Algorithm::ALL {
                    println!("{:<16} {}", algo.name(), algo.description());
                }
                std::process::exit(0);
            }
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            arg => {
                eprintln!("error: unknown argument: {arg}");
                std::process::exit(1);
            }
        }
    }

    config
}

fn render(view: &StateView, dark: bool) -> String {
    let (on, off) = if dark { ("\x1b[1;93m", "\x1b[0m") } else { ("\x1b[1;34m", "\x1b[0m") };
    let cells: Vec<String> = view
        .array
        .values()
        .iter()
        .enumerate()
        .map(|(i, v)| {
            if view.active.contains(i) {
                format!("{on}[{v}]{off}")
            } else if view.settled.contains(i) {
                format!("*{v}")
            } else {
                format!(" {v}")
            }
        })
        .collect();
    format!(
        "{}  | cmp {:>4} swp {:>4}",
        cells.join(" "),
        view.metrics.comparisons,
        view.metrics.swaps
    )
}

fn main() -> SortVizResult<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sortviz=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = parse_args();

    let store = PreferencesStore::new(&config.prefs_path);
    let mut prefs = store.load()?;
    if config.toggle_theme {
        prefs.toggle_theme();
        store.save(&prefs)?;
    }

    let mut controller = match config.seed {
        Some(seed) => RunController::with_seed(VisualizerConfig::default(), seed),
        None => RunController::new(VisualizerConfig::default()),
    };
    let algorithm = controller.select_algorithm(&config.algorithm)?;
    controller.set_array_size(config.size)?;
    controller.set_step_delay_ms(config.delay_ms);

    info!(%algorithm, size = controller.original().len(), dark_theme = prefs.dark_theme, "starting demo");
    println!("{algorithm}: {}", algorithm.description());

    let (mut view, stream) = controller.subscribe_with_view();
    println!("{}", render(&view, prefs.dark_theme));

    let Some(run) = controller.start()? else {
        return Ok(());
    };

    let poll = Duration::from_millis(controller.config().limits.max_step_delay_ms * 2);
    loop {
        let event = stream.recv_timeout(poll)?;
        let redraw = matches!(
            event.payload,
            EventPayload::ArrayChanged { .. } | EventPayload::ActiveChanged { .. }
        );
        let finished = matches!(
            event.payload,
            EventPayload::RunStateChanged {
                run_state: RunState::Idle
            }
        );
        event.apply_to(&mut view);
        if redraw {
            println!("{}", render(&view, prefs.dark_theme));
        }
        if finished {
            break;
        }
    }

    let report = run.join()?;
    println!("{}", render(&view, prefs.dark_theme));
    println!(
        "{:?} in {:?}: {} comparisons, {} swaps",
        report.outcome, report.elapsed, report.metrics.comparisons, report.metrics.swaps
    );
    Ok(())
}
