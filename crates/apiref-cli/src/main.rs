use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use apiref_core::config::{self, CONFIG_FILE_NAME, ReferenceConfig};
use apiref_core::ir::{NormalizedSpec, OperationNode};
use apiref_core::parse::source::DefaultFetcher;
use apiref_core::{ApiReference, PreparedRequest};

#[derive(Parser)]
#[command(name = "apiref", about = "OpenAPI reference normalizer", version)]
struct Cli {
    /// Path to the config file
    #[arg(short, long, global = true, default_value = CONFIG_FILE_NAME)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the normalized operations of a spec
    Inspect {
        /// Spec id (defaults to the configured default spec)
        #[arg(short, long)]
        spec: Option<String>,

        /// Output format
        #[arg(long, default_value = "yaml")]
        format: OutputFormat,
    },

    /// Print the navigation tree of a spec
    Nav {
        #[arg(short, long)]
        spec: Option<String>,
    },

    /// Show one operation by its slug, e.g. `apiref show plants plants get`
    Show {
        #[arg(required = true)]
        slug: Vec<String>,

        #[arg(long, default_value = "yaml")]
        format: OutputFormat,
    },

    /// Print a curl command for an operation, pre-filled with sample values
    Curl {
        #[arg(required = true)]
        slug: Vec<String>,

        /// Server URL (defaults to the operation's first server)
        #[arg(long)]
        server: Option<String>,
    },

    /// Initialize a new apiref configuration
    Init {
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    Yaml,
    Json,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Inspect { spec, format } => cmd_inspect(&cli.config, spec.as_deref(), format),

        Commands::Nav { spec } => cmd_nav(&cli.config, spec.as_deref()),

        Commands::Show { slug, format } => cmd_show(&cli.config, &slug, format),

        Commands::Curl { slug, server } => cmd_curl(&cli.config, &slug, server.as_deref()),

        Commands::Init { force } => cmd_init(&cli.config, force),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "apiref", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Load the config and build a reference whose file sources resolve
/// relative to the config file's directory.
fn load_reference(config_path: &Path) -> Result<ApiReference> {
    let cfg: ReferenceConfig = config::load_config(config_path)?.with_context(|| {
        format!(
            "{} not found. Run `apiref init` to create one.",
            config_path.display()
        )
    })?;
    let root = config_path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    log::debug!(
        "loaded {} spec(s) from {}, resolving files under {}",
        cfg.specs.len(),
        config_path.display(),
        root.display()
    );
    Ok(ApiReference::with_fetcher(cfg, DefaultFetcher::new(root)))
}

fn print_value<T: serde::Serialize>(value: &T, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Yaml => {
            let yaml = serde_yaml_ng::to_string(value)?;
            print!("{}", yaml);
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(value)?;
            println!("{}", json);
        }
    }
    Ok(())
}

fn cmd_inspect(config_path: &Path, spec_id: Option<&str>, format: OutputFormat) -> Result<()> {
    let reference = load_reference(config_path)?;
    let spec = reference
        .normalized_spec(spec_id)
        .context("failed to normalize spec")?;
    print_value(&build_inspect_summary(&spec), format)
}

fn build_inspect_summary(spec: &NormalizedSpec) -> serde_json::Value {
    let operations: Vec<serde_json::Value> = spec
        .operations
        .iter()
        .map(|op| {
            serde_json::json!({
                "key": op.key,
                "title": op.title,
                "group": op.group,
                "slug": op.slug,
                "parameters": op.parameters.len(),
                "responses": op.responses.iter().map(|r| &r.code).collect::<Vec<_>>(),
                "hidden": op.hidden,
            })
        })
        .collect();

    serde_json::json!({
        "spec": {
            "id": spec.config.id,
            "label": spec.config.label,
        },
        "servers": spec.servers.iter().map(|s| &s.url).collect::<Vec<_>>(),
        "operations": operations,
    })
}

fn cmd_nav(config_path: &Path, spec_id: Option<&str>) -> Result<()> {
    let reference = load_reference(config_path)?;
    let navigation = reference
        .navigation(spec_id)
        .context("failed to build navigation")?;
    for group in navigation {
        println!("{}", group.title);
        for item in group.items {
            let badge = item.badge.map(|b| format!(" [{b}]")).unwrap_or_default();
            println!(
                "  {:<7} {}{}  {}",
                item.method.as_str(),
                item.title,
                badge,
                item.href
            );
        }
    }
    Ok(())
}

fn find_operation(reference: &ApiReference, slug: &[String]) -> Result<OperationNode> {
    reference
        .operation_by_slug(slug)
        .context("failed to look up operation")?
        .with_context(|| format!("no operation at /api/{}", slug.join("/")))
}

fn cmd_show(config_path: &Path, slug: &[String], format: OutputFormat) -> Result<()> {
    let reference = load_reference(config_path)?;
    let node = find_operation(&reference, slug)?;
    print_value(&node.operation, format)
}

fn cmd_curl(config_path: &Path, slug: &[String], server: Option<&str>) -> Result<()> {
    let reference = load_reference(config_path)?;
    let node = find_operation(&reference, slug)?;
    let operation = &node.operation;
    let server = server.or_else(|| operation.servers.first().map(|s| s.url.as_str()));

    let request = PreparedRequest::from_prefill(operation, server, &operation.prefill);
    if !request.is_server_configured {
        anyhow::bail!(
            "no server URL available for {}. Pass --server or add a servers entry to the spec.",
            operation.key
        );
    }
    println!("{}", request.curl_command());
    Ok(())
}

fn cmd_init(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(config_path, config::default_config_content())
        .with_context(|| format!("failed to write {}", config_path.display()))?;
    eprintln!("Created {}", config_path.display());
    Ok(())
}
