use clap::{Args, Parser, Subcommand};
use mindgraph::{GeneratorOptions, IdStrategy, ImageFormat, MindMapGenerator, MindMapSpec};
use serde::Serialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Spec(#[from] mindgraph_core::Error),
    #[error("{0}")]
    Mindgraph(#[from] mindgraph::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// 2: bad input tree, 3: renderer unavailable, 1: anything else.
    fn exit_code(&self) -> u8 {
        match self {
            CliError::Spec(_) => 2,
            CliError::Mindgraph(e) if e.is_input_error() => 2,
            CliError::Mindgraph(e) if e.is_render_unavailable() => 3,
            _ => 1,
        }
    }
}

#[derive(Parser)]
#[command(
    name = "mindgraph",
    version,
    about = "Render concept trees as mind map images"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate and flatten a concept tree; prints nodes, edges and metadata as JSON.
    Normalize {
        #[command(flatten)]
        input: InputArgs,

        /// Only print the client metadata.
        #[arg(long)]
        metadata: bool,

        #[arg(long, value_parser = parse_id_strategy)]
        id_strategy: Option<IdStrategy>,

        #[arg(long)]
        pretty: bool,
    },

    /// Print the Graphviz DOT document without rendering it.
    Dot {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        style: StyleArgs,

        /// Write to a file instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Render the mind map image (requires Graphviz).
    Render {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        style: StyleArgs,

        /// Image path. Defaults to the input path with the format's extension, or
        /// `<output-filename>.<ext>` for stdin.
        #[arg(long)]
        out: Option<PathBuf>,

        /// Also write the packaged result (base64 image + metadata) as JSON; `-` for stdout.
        #[arg(long)]
        json: Option<String>,

        /// When Graphviz is unavailable, emit metadata only instead of failing.
        #[arg(long)]
        allow_metadata_only: bool,

        #[arg(long)]
        pretty: bool,
    },
}

#[derive(Args)]
struct InputArgs {
    /// Input file (`-` or omitted for stdin).
    input: Option<String>,

    /// Treat the input as a raw model completion and extract the JSON object from it.
    #[arg(long)]
    completion: bool,
}

#[derive(Args)]
struct StyleArgs {
    /// JSON file with generator options; explicit flags override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// dark | light | green (unknown names fall back to dark).
    #[arg(long)]
    theme: Option<String>,

    /// horizontal | vertical | radial | force (unknown names fall back to horizontal).
    #[arg(long)]
    layout: Option<String>,

    #[arg(long)]
    dpi: Option<u32>,

    #[arg(long, value_parser = parse_format)]
    format: Option<ImageFormat>,

    #[arg(long, value_parser = parse_id_strategy)]
    id_strategy: Option<IdStrategy>,

    /// Base name for the transient render artifact.
    #[arg(long)]
    output_filename: Option<String>,

    /// Directory containing the Graphviz `dot`/`neato` executables.
    #[arg(long)]
    graphviz_bin_dir: Option<PathBuf>,
}

impl StyleArgs {
    fn options(&self) -> Result<GeneratorOptions, CliError> {
        let mut options = match &self.config {
            Some(path) => GeneratorOptions::from_json_file(path)?,
            None => GeneratorOptions::default(),
        };
        if let Some(theme) = &self.theme {
            options.theme = theme.clone();
        }
        if let Some(layout) = &self.layout {
            options.layout = layout.clone();
        }
        if let Some(dpi) = self.dpi {
            options.dpi = dpi;
        }
        if let Some(format) = self.format {
            options.format = format;
        }
        if let Some(id_strategy) = self.id_strategy {
            options.id_strategy = id_strategy;
        }
        if let Some(name) = &self.output_filename {
            options.output_filename = name.clone();
        }
        if let Some(dir) = &self.graphviz_bin_dir {
            options.graphviz_bin_dir = Some(dir.clone());
        }
        options.validate()?;
        Ok(options)
    }
}

fn parse_format(s: &str) -> Result<ImageFormat, String> {
    s.parse::<ImageFormat>()
        .map_err(|_| format!("unsupported format `{s}` (expected png or svg)"))
}

fn parse_id_strategy(s: &str) -> Result<IdStrategy, String> {
    s.parse::<IdStrategy>()
        .map_err(|_| format!("unknown id strategy `{s}` (expected text or parent_path)"))
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

fn load_spec(input: &InputArgs) -> Result<MindMapSpec, CliError> {
    let text = read_input(input.input.as_deref())?;
    let spec = if input.completion {
        MindMapSpec::from_llm_completion(&text)?
    } else {
        MindMapSpec::from_json_str(&text)?
    };
    tracing::debug!(nodes = spec.node_count(), "loaded concept tree");
    Ok(spec)
}

fn write_json(value: &impl Serialize, pretty: bool, out: &mut dyn std::io::Write) -> Result<(), CliError> {
    if pretty {
        serde_json::to_writer_pretty(&mut *out, value)?;
    } else {
        serde_json::to_writer(&mut *out, value)?;
    }
    writeln!(out)?;
    Ok(())
}

fn default_image_path(input: Option<&str>, options: &GeneratorOptions) -> PathBuf {
    let ext = options.format.extension();
    match input {
        Some(path) if path != "-" => Path::new(path).with_extension(ext),
        _ => PathBuf::from(format!("{}.{ext}", options.output_filename)),
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Normalize {
            input,
            metadata,
            id_strategy,
            pretty,
        } => {
            let spec = load_spec(&input)?;
            let mut options = GeneratorOptions::default();
            if let Some(id_strategy) = id_strategy {
                options.id_strategy = id_strategy;
            }
            let graph = MindMapGenerator::new(options).normalize(&spec)?;
            let mut stdout = std::io::stdout().lock();
            if metadata {
                write_json(&graph.metadata, pretty, &mut stdout)?;
            } else {
                write_json(&graph, pretty, &mut stdout)?;
            }
        }
        Command::Dot { input, style, out } => {
            let spec = load_spec(&input)?;
            let generator = MindMapGenerator::new(style.options()?);
            let dot = generator.dot(&spec)?;
            match out {
                Some(path) => std::fs::write(path, dot)?,
                None => print!("{dot}"),
            }
        }
        Command::Render {
            input,
            style,
            out,
            json,
            allow_metadata_only,
            pretty,
        } => {
            let spec = load_spec(&input)?;
            let options = style.options()?;
            let image_path = out.unwrap_or_else(|| default_image_path(input.input.as_deref(), &options));
            let generator = MindMapGenerator::new(options);

            let result = if allow_metadata_only {
                generator.generate_or_degrade(&spec)?
            } else {
                generator.generate(&spec)?
            };

            match result.decode_image() {
                Ok(Some(bytes)) => {
                    std::fs::write(&image_path, bytes)?;
                    tracing::info!(path = %image_path.display(), "wrote mind map image");
                }
                Ok(None) => {
                    tracing::warn!("no image rendered; only metadata is available");
                }
                Err(e) => {
                    return Err(CliError::Io(std::io::Error::new(
                        std::io::ErrorKind::InvalidData,
                        e,
                    )));
                }
            }

            match json.as_deref() {
                Some("-") => write_json(&result, pretty, &mut std::io::stdout().lock())?,
                Some(path) => {
                    let mut file = std::fs::File::create(path)?;
                    write_json(&result, pretty, &mut file)?;
                }
                None => {}
            }
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}
