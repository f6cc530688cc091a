use serde::Serialize;
use simmap::geom::Point;
use simmap::{
    AnchorSpec, CanvasSpec, FloatAnimator, FrameHost, FrameRequest, LayoutConfig, LayoutRequest,
    LayoutResult, LayoutRng, NodeSurface, RenderPoint,
};
use std::io::Read;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Layout(simmap::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Layout(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<simmap::Error> for CliError {
    fn from(value: simmap::Error) -> Self {
        Self::Layout(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Solve,
    Frames,
}

#[derive(Debug, Clone, Copy, Default)]
enum AnchorKind {
    #[default]
    Center,
    Corner,
}

impl FromStr for AnchorKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "center" => Ok(Self::Center),
            "corner" => Ok(Self::Corner),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    config: Option<String>,
    pretty: bool,
    anchor: AnchorKind,
    width: f64,
    height: f64,
    seed: Option<u64>,
    frames: u32,
    interval_ms: u64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FrameOut {
    elapsed_ms: u64,
    points: Vec<RenderPoint>,
}

#[derive(Serialize)]
struct FramesOut<'a> {
    layout: &'a LayoutResult,
    frames: Vec<FrameOut>,
}

fn usage() -> &'static str {
    "simmap-cli\n\
\n\
USAGE:\n\
  simmap-cli [solve] [--anchor center|corner] [--width <w>] [--height <h>] [--seed <n>] [--config <path>] [--pretty] [<path>|-]\n\
  simmap-cli frames [--anchor center|corner] [--width <w>] [--height <h>] [--seed <n>] [--config <path>] [--frames <n>] [--interval-ms <ms>] [--pretty] [<path>|-]\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', input is read from stdin.\n\
  - Input is JSON: { \"source\": { \"id\": 1 }, \"items\": [ { \"id\": 2, \"similarity\": 87 } ] }.\n\
  - solve prints the layout JSON; frames also prints sampled float-animation frames.\n\
  - --seed overrides the config's randomSeed; without either, every run differs.\n\
  - Set SIMMAP_LOG (e.g. SIMMAP_LOG=debug) for diagnostics on stderr.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args {
        width: 1400.0,
        height: 800.0,
        frames: 4,
        interval_ms: 16,
        ..Default::default()
    };

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "solve" => args.command = Command::Solve,
            "frames" => args.command = Command::Frames,
            "--pretty" => args.pretty = true,
            "--anchor" => {
                let Some(kind) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.anchor = kind
                    .parse::<AnchorKind>()
                    .map_err(|_| CliError::Usage(usage()))?;
            }
            "--width" => {
                let Some(w) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.width = w.parse::<f64>().map_err(|_| CliError::Usage(usage()))?;
            }
            "--height" => {
                let Some(h) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.height = h.parse::<f64>().map_err(|_| CliError::Usage(usage()))?;
            }
            "--seed" => {
                let Some(seed) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.seed = Some(seed.parse::<u64>().map_err(|_| CliError::Usage(usage()))?);
            }
            "--config" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.config = Some(path.clone());
            }
            "--frames" => {
                let Some(n) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.frames = n.parse::<u32>().map_err(|_| CliError::Usage(usage()))?;
            }
            "--interval-ms" => {
                let Some(ms) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.interval_ms = ms.parse::<u64>().map_err(|_| CliError::Usage(usage()))?;
            }
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

    if !(args.width.is_finite() && args.width > 0.0 && args.height.is_finite() && args.height > 0.0)
    {
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

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    if pretty {
        serde_json::to_writer_pretty(std::io::stdout().lock(), value)?;
    } else {
        serde_json::to_writer(std::io::stdout().lock(), value)?;
    }
    println!();
    Ok(())
}

fn load_config(args: &Args) -> Result<LayoutConfig, CliError> {
    let mut cfg = match args.config.as_deref() {
        Some(path) => LayoutConfig::from_json_str(&std::fs::read_to_string(path)?)?,
        None => LayoutConfig::default(),
    };
    if let Some(seed) = args.seed {
        cfg.random_seed = Some(seed);
    }
    Ok(cfg)
}

fn anchor_spec(kind: AnchorKind) -> AnchorSpec {
    match kind {
        AnchorKind::Center => AnchorSpec::Center,
        AnchorKind::Corner => AnchorSpec::corner_default(),
    }
}

/// Frame scheduler that only exists to hand out request ids; frames fire when we say so.
#[derive(Debug, Default)]
struct SteppedFrames {
    next: u64,
    pending: Option<FrameRequest>,
}

impl FrameHost for SteppedFrames {
    fn request_frame(&mut self) -> FrameRequest {
        self.next += 1;
        let req = FrameRequest(self.next);
        self.pending = Some(req);
        req
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        if self.pending == Some(request) {
            self.pending = None;
        }
    }
}

/// Nothing is mounted on the command line; frames are reported through their return value.
struct Headless;

impl NodeSurface for Headless {
    type Node = ();
    type Line = ();

    fn move_node(&mut self, _node: &(), _at: Point) {}

    fn move_line(&mut self, _line: &(), _from: Point, _to: Point) {}
}

fn sample_frames(layout: Arc<LayoutResult>, frames: u32, interval_ms: u64) -> Vec<FrameOut> {
    let mut host = SteppedFrames::default();
    let mut animator: FloatAnimator<Headless> = FloatAnimator::new(layout);
    animator.start(Duration::ZERO, &mut host);

    let mut out = Vec::with_capacity(frames as usize);
    for i in 1..=u64::from(frames) {
        let Some(req) = host.pending.take() else {
            break;
        };
        let elapsed_ms = i * interval_ms;
        if let Some(points) = animator.on_frame(
            req,
            Duration::from_millis(elapsed_ms),
            &mut host,
            &mut Headless,
        ) {
            out.push(FrameOut {
                elapsed_ms,
                points: points.to_vec(),
            });
        }
    }
    animator.teardown(&mut host);
    out
}

fn run(args: Args) -> Result<(), CliError> {
    let text = read_input(args.input.as_deref())?;
    let request = LayoutRequest::from_json_str(&text)?;
    let cfg = load_config(&args)?;
    let canvas = CanvasSpec::new(args.width, args.height);
    let anchor = anchor_spec(args.anchor);

    if request.items.len() > simmap::MAX_ITEMS {
        tracing::warn!(
            items = request.items.len(),
            max = simmap::MAX_ITEMS,
            "truncating to the most similar items"
        );
    }
    let items = simmap::truncate_items(&request.items);

    let mut rng = LayoutRng::from_seed_option(cfg.random_seed);
    let layout = simmap::solve(&request.source, &items, canvas, &anchor, &cfg, &mut rng);
    tracing::info!(
        items = layout.len(),
        adjustments = layout.adjustments.len(),
        "layout solved"
    );

    match args.command {
        Command::Solve => write_json(&layout, args.pretty),
        Command::Frames => {
            let layout = Arc::new(layout);
            let frames = sample_frames(Arc::clone(&layout), args.frames, args.interval_ms);
            write_json(
                &FramesOut {
                    layout: &layout,
                    frames,
                },
                args.pretty,
            )
        }
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_env("SIMMAP_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    init_tracing();
    let argv = std::env::args().collect::<Vec<_>>();
    let args = match parse_args(&argv) {
        Ok(a) => a,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
