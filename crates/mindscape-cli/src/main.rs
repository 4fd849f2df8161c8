use mindscape::{
    Bounds, DEFAULT_CULL_PADDING, Dimensions, Edge, LayoutOptions, LayoutType, MindmapData, Node,
    OverlapOptions, Viewport,
};
use serde::Serialize;
use serde_json::Value;
use std::io::Read;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Engine(mindscape::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Engine(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<mindscape::Error> for CliError {
    fn from(value: mindscape::Error) -> Self {
        Self::Engine(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Command {
    #[default]
    Layout,
    Resolve,
    Cull,
}

#[derive(Debug)]
struct Args {
    command: Command,
    input: Option<String>,
    pretty: bool,
    layout_type: Option<LayoutType>,
    canvas_width: f64,
    canvas_height: f64,
    config: Option<String>,
    moved: Option<String>,
    viewport: Viewport,
    screen: Dimensions,
    padding: f64,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            command: Command::Layout,
            input: None,
            pretty: false,
            layout_type: None,
            canvas_width: 1200.0,
            canvas_height: 800.0,
            config: None,
            moved: None,
            viewport: Viewport::default(),
            screen: Dimensions {
                width: 800.0,
                height: 600.0,
            },
            padding: DEFAULT_CULL_PADDING,
        }
    }
}

#[derive(Serialize)]
struct LayoutOut<'a> {
    #[serde(rename = "layoutType")]
    layout_type: LayoutType,
    nodes: &'a [Node],
    edges: &'a [Edge],
    bounds: Bounds,
}

#[derive(Serialize)]
struct ResolveOut<'a> {
    moved: &'a str,
    nodes: &'a [Node],
    edges: &'a [Edge],
}

#[derive(Serialize)]
struct CullOut<'a> {
    window: Bounds,
    total: usize,
    visible: usize,
    nodes: &'a [Node],
}

fn usage() -> &'static str {
    "mindscape-cli\n\
\n\
USAGE:\n\
  mindscape-cli [layout] [--type radial|tree|balanced] [--canvas-width <w>] [--canvas-height <h>] [--config <path>] [--pretty] [<path>|-]\n\
  mindscape-cli resolve --moved <node-id> [--config <path>] [--pretty] [<path>|-]\n\
  mindscape-cli cull [--viewport <x>,<y>,<scale>] [--screen <w>,<h>] [--padding <n>] [--pretty] [<path>|-]\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', input is read from stdin.\n\
  - Input is a JSON object {\"nodes\": [...], \"edges\": [...]}; node x/y are top-left corners.\n\
  - --config reads layout/overlap options from a JSON file (camelCase keys, optionally nested\n\
    under \"layout\" / \"overlap\").\n\
  - layout derives edges from parentId when the input has none.\n\
  - Set RUST_LOG (e.g. RUST_LOG=mindscape=debug) for diagnostics on stderr.\n\
"
}

fn parse_f64(value: Option<&String>) -> Result<f64, CliError> {
    let Some(value) = value else {
        return Err(CliError::Usage(usage()));
    };
    let v = value
        .trim()
        .parse::<f64>()
        .map_err(|_| CliError::Usage(usage()))?;
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CliError::Usage(usage()))
    }
}

/// Parses `a,b[,c...]` into exactly `N` finite numbers.
fn parse_list<const N: usize>(value: Option<&String>) -> Result<[f64; N], CliError> {
    let Some(value) = value else {
        return Err(CliError::Usage(usage()));
    };
    let parts: Vec<&str> = value.split(',').collect();
    if parts.len() != N {
        return Err(CliError::Usage(usage()));
    }
    let mut out = [0.0; N];
    for (slot, part) in out.iter_mut().zip(parts) {
        *slot = part
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or(CliError::Usage(usage()))?;
    }
    Ok(out)
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1).peekable();
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "layout" => args.command = Command::Layout,
            "resolve" => args.command = Command::Resolve,
            "cull" => args.command = Command::Cull,
            "--pretty" => args.pretty = true,
            "--type" => {
                let Some(name) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.layout_type = Some(
                    name.parse::<LayoutType>()
                        .map_err(|_| CliError::Usage(usage()))?,
                );
            }
            "--canvas-width" => args.canvas_width = parse_f64(it.next())?,
            "--canvas-height" => args.canvas_height = parse_f64(it.next())?,
            "--config" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.config = Some(path.clone());
            }
            "--moved" => {
                let Some(id) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.moved = Some(id.clone());
            }
            "--viewport" => {
                let [x, y, scale] = parse_list::<3>(it.next())?;
                args.viewport = Viewport { x, y, scale };
            }
            "--screen" => {
                let [width, height] = parse_list::<2>(it.next())?;
                args.screen = Dimensions { width, height };
            }
            "--padding" => args.padding = parse_f64(it.next())?,
            "--" => {
                if let Some(rest) = it.next() {
                    if args.input.is_some() {
                        return Err(CliError::Usage(usage()));
                    }
                    args.input = Some(rest.clone());
                }
                if it.next().is_some() {
                    return Err(CliError::Usage(usage()));
                }
            }
            // `-` alone means stdin.
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

    if args.command == Command::Resolve && args.moved.is_none() {
        return Err(CliError::Usage(usage()));
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

fn read_config(path: Option<&str>) -> Result<Value, CliError> {
    match path {
        None => Ok(Value::Null),
        Some(path) => Ok(serde_json::from_str(&std::fs::read_to_string(path)?)?),
    }
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    if pretty {
        serde_json::to_writer_pretty(std::io::stdout().lock(), value)?;
    } else {
        serde_json::to_writer(std::io::stdout().lock(), value)?;
    }
    println!();
    Ok(())
}

fn run(args: Args) -> Result<(), CliError> {
    let text = read_input(args.input.as_deref())?;
    let data: MindmapData = serde_json::from_str(&text)?;
    let config = read_config(args.config.as_deref())?;
    tracing::debug!(
        command = ?args.command,
        nodes = data.nodes.len(),
        edges = data.edges.len(),
        "input loaded"
    );

    match args.command {
        Command::Layout => {
            let layout_type = args.layout_type.unwrap_or_default();
            let options = LayoutOptions::from_config(&config);
            let result = mindscape::apply_layout_with_options(
                &data,
                layout_type,
                args.canvas_width,
                args.canvas_height,
                &options,
            )?;
            let derived;
            let edges = if data.edges.is_empty() {
                derived = MindmapData::edges_from_parents(&result.nodes);
                &derived
            } else {
                &data.edges
            };
            write_json(
                &LayoutOut {
                    layout_type,
                    nodes: &result.nodes,
                    edges,
                    bounds: result.bounds,
                },
                args.pretty,
            )
        }
        Command::Resolve => {
            let Some(moved) = args.moved.as_deref() else {
                return Err(CliError::Usage(usage()));
            };
            let options = OverlapOptions::from_config(&config);
            let nodes = mindscape::resolve_overlaps(&data.nodes, moved, &options)?;
            write_json(
                &ResolveOut {
                    moved,
                    nodes: &nodes,
                    edges: &data.edges,
                },
                args.pretty,
            )
        }
        Command::Cull => {
            let index = mindscape::build_index(&data.nodes);
            let window = mindscape::visible_rect(&args.viewport, &args.screen, args.padding)?;
            let visible = mindscape::cull(
                &args.viewport,
                &args.screen,
                &index,
                &data.nodes,
                args.padding,
            )?;
            write_json(
                &CullOut {
                    window,
                    total: data.nodes.len(),
                    visible: visible.len(),
                    nodes: &visible,
                },
                args.pretty,
            )
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
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
    init_tracing();

    match run(args) {
        Ok(()) => {}
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
