#![forbid(unsafe_code)]

use serde::Serialize;
use std::io::Read;
use tracing_subscriber::EnvFilter;

mod scene;

use scene::{DEFAULT_TICKS, DEFAULT_VELOCITY_DECAY, Scene, Simulation};

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Json(serde_json::Error),
    Force(sirenia::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
            CliError::Force(err) => write!(f, "{err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<sirenia::Error> for CliError {
    fn from(value: sirenia::Error) -> Self {
        Self::Force(value)
    }
}

#[derive(Debug, Default)]
struct Args {
    input: Option<String>,
    out: Option<String>,
    pretty: bool,
    ticks: Option<usize>,
    velocity_decay: Option<f64>,
}

fn usage() -> &'static str {
    "sirenia-cli\n\
\n\
USAGE:\n\
  sirenia-cli [--ticks <n>] [--velocity-decay <f>] [--pretty] [--out <path>] [<path>|-]\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', the scene JSON is read from stdin.\n\
  - The resulting node rectangles are printed as JSON unless --out is given.\n\
  - --ticks and --velocity-decay override the values in the scene file.\n\
  - Set RUST_LOG (e.g. RUST_LOG=sirenia=debug) for diagnostics on stderr.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "--pretty" => args.pretty = true,
            "--ticks" => {
                let Some(n) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.ticks = Some(n.parse::<usize>().map_err(|_| CliError::Usage(usage()))?);
            }
            "--velocity-decay" => {
                let Some(d) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                let d = d.parse::<f64>().map_err(|_| CliError::Usage(usage()))?;
                if !(0.0..=1.0).contains(&d) {
                    return Err(CliError::Usage(usage()));
                }
                args.velocity_decay = Some(d);
            }
            "--out" => {
                let Some(out) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.out = Some(out.clone());
            }
            other if other.starts_with('-') && other != "-" => {
                return Err(CliError::Usage(usage()));
            }
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    Ok(args)
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn write_json(value: &impl Serialize, pretty: bool, out: Option<&str>) -> Result<(), CliError> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    match out {
        None => println!("{text}"),
        Some(path) => std::fs::write(path, text)?,
    }
    Ok(())
}

fn run(args: Args) -> Result<(), CliError> {
    let text = read_input(args.input.as_deref())?;
    let scene: Scene = serde_json::from_str(&text)?;

    let ticks = args.ticks.or(scene.ticks).unwrap_or(DEFAULT_TICKS);
    let velocity_decay = args
        .velocity_decay
        .or(scene.velocity_decay)
        .unwrap_or(DEFAULT_VELOCITY_DECAY);

    let mut sim = Simulation::from_scene(&scene, velocity_decay)?;
    sim.run(ticks)?;
    write_json(&sim.layout(ticks), args.pretty, args.out.as_deref())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
