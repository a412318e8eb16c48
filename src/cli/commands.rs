use crate::config::{resolve_config, GeneratorConfig};
use crate::fsm::{chain, ensure_valid, to_diagram, validate, FsmModel};
use crate::generator::{generate_daos, generate_fsm, generate_handlers, write_artifacts, Generation};
use crate::naming::to_camel_case;
use crate::openapi::{api_spec_path, load_document, merge_documents};
use crate::render::MiniJinjaRenderer;
use crate::validator::log_issues;
use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde_json::Value;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Command-line interface for adev
#[derive(Debug, Parser)]
#[command(name = "adev", version)]
#[command(about = "Scaffold DAOs, handlers and FSM skills from specifications", long_about = None)]
pub struct Cli {
    /// Generator config file (default: ./adev.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate DAO classes and fixtures for the persistent schemas of a component
    Dao {
        /// component.yaml whose `api_spec` names the OpenAPI document
        #[arg(long, default_value = "component.yaml")]
        component: PathBuf,

        #[command(flatten)]
        out: OutputArgs,
    },
    /// Generate one handler module per tag
    Handler {
        /// OpenAPI documents (YAML or JSON); several are merged
        #[arg(short, long, required = true, num_args = 1..)]
        spec: Vec<PathBuf>,

        /// Resolve operations through the generated DAOs
        #[arg(long, default_value_t = false)]
        use_daos: bool,

        #[command(flatten)]
        out: OutputArgs,
    },
    /// Work with FSM specifications
    Fsm {
        #[command(subcommand)]
        sub: FsmCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum FsmCommand {
    /// Convert an FSM between the YAML document and a Mermaid diagram
    FromFile {
        file: PathBuf,

        /// Input format (default: by file extension)
        #[arg(long, value_enum)]
        in_type: Option<FsmFormat>,

        /// Output format
        #[arg(long, value_enum, default_value_t = FsmFormat::FsmSpec)]
        output: FsmFormat,
    },
    /// Check FSM documents for structural errors
    Validate {
        #[arg(required = true, num_args = 1..)]
        files: Vec<PathBuf>,
    },
    /// Generate the rounds module, diagram and canonical document of an FSM
    Scaffold {
        file: PathBuf,

        /// Input format (default: by file extension)
        #[arg(long, value_enum)]
        in_type: Option<FsmFormat>,

        #[command(flatten)]
        out: OutputArgs,
    },
    /// Compose FSMs in order, linking each one's final states to the next
    Chain {
        #[arg(required = true, num_args = 2..)]
        files: Vec<PathBuf>,

        /// Label of the composed FSM
        #[arg(long, default_value = "ChainedAbciApp")]
        label: String,

        /// Output format
        #[arg(long, value_enum, default_value_t = FsmFormat::FsmSpec)]
        output: FsmFormat,
    },
}

/// Where and how generated files are written.
#[derive(Debug, Clone, Default, Args)]
pub struct OutputArgs {
    /// Output directory (default: config `output_dir`)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Overwrite existing files
    #[arg(short, long, default_value_t = false)]
    pub force: bool,

    /// List the files that would be written without writing them
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

/// FSM document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FsmFormat {
    /// YAML FSM specification
    FsmSpec,
    /// Mermaid diagram
    Mermaid,
}

impl FsmFormat {
    /// `.mmd` and `.mermaid` files are diagrams; anything else is YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("mmd" | "mermaid") => FsmFormat::Mermaid,
            _ => FsmFormat::FsmSpec,
        }
    }
}

/// Parse the process arguments and run the command, printing to stdout.
pub fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let stdout = std::io::stdout();
    run(&cli, &mut stdout.lock())
}

/// Run a parsed command. Documents and dry-run listings go to `out`.
pub fn run(cli: &Cli, out: &mut dyn Write) -> anyhow::Result<()> {
    let config = resolve_config(cli.config.as_deref())?;
    match &cli.command {
        Commands::Dao { component, out: args } => {
            let spec_path = api_spec_path(component)?;
            info!(component = %component.display(), spec = %spec_path.display(), "generating DAOs");
            let document = load_document(&spec_path)?;
            let generation = generate_daos(&document, &renderer(&config)?)?;
            emit(&generation, args, &config, out)
        }
        Commands::Handler { spec, use_daos, out: args } => {
            let document = load_documents(spec)?;
            let use_daos = *use_daos || config.use_daos;
            let generation = generate_handlers(&document, use_daos, &renderer(&config)?)?;
            emit(&generation, args, &config, out)
        }
        Commands::Fsm { sub } => run_fsm(sub, &config, out),
    }
}

fn run_fsm(
    command: &FsmCommand,
    config: &GeneratorConfig,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    match command {
        FsmCommand::FromFile { file, in_type, output } => {
            let model = load_fsm(file, *in_type)?;
            let warnings = ensure_valid(&model)?;
            log_issues(&warnings);
            write_fsm(&model, *output, out)
        }
        FsmCommand::Validate { files } => {
            let mut invalid = 0;
            for file in files {
                let model = load_fsm(file, None)?;
                let result = validate(&model);
                log_issues(&result.warnings);
                for issue in &result.errors {
                    error!(
                        file = %file.display(),
                        kind = issue.kind.as_str(),
                        location = %issue.location,
                        "{}",
                        issue.message
                    );
                }
                if result.is_ok() {
                    writeln!(out, "{}: ok ({} warnings)", file.display(), result.warnings.len())?;
                } else {
                    invalid += 1;
                    writeln!(out, "{}: {} errors", file.display(), result.errors.len())?;
                }
            }
            if invalid > 0 {
                bail!("{invalid} of {} FSM documents are invalid", files.len());
            }
            Ok(())
        }
        FsmCommand::Scaffold { file, in_type, out: args } => {
            let model = load_fsm(file, *in_type)?;
            let generation = generate_fsm(&model, &renderer(config)?)?;
            emit(&generation, args, config, out)
        }
        FsmCommand::Chain { files, label, output } => {
            let models = files
                .iter()
                .map(|file| load_fsm(file, None))
                .collect::<anyhow::Result<Vec<_>>>()?;
            let chained = chain(&models, label)?;
            let warnings = ensure_valid(&chained)?;
            log_issues(&warnings);
            write_fsm(&chained, *output, out)
        }
    }
}

/// Read an FSM in the given format, or the one its extension implies.
/// Diagrams are labelled after the file stem.
pub fn load_fsm(path: &Path, format: Option<FsmFormat>) -> anyhow::Result<FsmModel> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read FSM file {}", path.display()))?;
    let model = match format.unwrap_or_else(|| FsmFormat::from_path(path)) {
        FsmFormat::FsmSpec => FsmModel::from_yaml_str(&text),
        FsmFormat::Mermaid => {
            let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("fsm");
            FsmModel::from_mermaid(&text, &to_camel_case(stem))
        }
    };
    model.with_context(|| format!("Invalid FSM file {}", path.display()))
}

fn write_fsm(model: &FsmModel, format: FsmFormat, out: &mut dyn Write) -> anyhow::Result<()> {
    let text = match format {
        FsmFormat::FsmSpec => model.to_yaml().context("Failed to serialize FSM")?,
        FsmFormat::Mermaid => to_diagram(model),
    };
    out.write_all(text.as_bytes())?;
    Ok(())
}

/// One document, or several merged into one.
fn load_documents(paths: &[PathBuf]) -> anyhow::Result<Value> {
    let mut documents = paths
        .iter()
        .map(|path| load_document(path))
        .collect::<anyhow::Result<Vec<_>>>()?;
    if documents.len() == 1 {
        return Ok(documents.remove(0));
    }
    Ok(merge_documents(&documents)?)
}

fn renderer(config: &GeneratorConfig) -> anyhow::Result<MiniJinjaRenderer> {
    match &config.templates_dir {
        Some(dir) => MiniJinjaRenderer::with_overrides(dir),
        None => Ok(MiniJinjaRenderer::new()?),
    }
}

fn emit(
    generation: &Generation,
    args: &OutputArgs,
    config: &GeneratorConfig,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let output_dir = args.output.as_deref().unwrap_or(config.output_dir.as_path());
    let report = write_artifacts(
        &generation.artifacts,
        output_dir,
        args.force || config.force,
        args.dry_run,
    )?;
    for path in &report.planned {
        writeln!(out, "{}", path.display())?;
    }
    info!(
        written = report.written.len(),
        skipped = report.skipped.len(),
        planned = report.planned.len(),
        warnings = generation.warnings.len(),
        "done"
    );
    Ok(())
}
