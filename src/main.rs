//! docfield: rewrite Google-style docstring sections as reStructuredText.
//!
//! - **stdin mode**: `docfield render < docstring.txt`
//! - **file mode**: `docfield render -o build/docstrings docstrings/*.txt`
//! - **source links**: `docfield linkcode --module pkg.mod Class.method`
//! - **member filtering**: `docfield members --module pkg.mod --what class objects media`

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use docfield::config::{Config, GithubConfig};
use docfield::render::{self, RenderedDocstring};
use docfield::{ExcludeTable, GithubLinker, ModuleMembers};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "docfield",
    version,
    about = "Rewrite Google-style docstrings into reStructuredText and link symbols to source"
)]
struct Cli {
    /// Log debug output to stderr (DOCFIELD_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (default: ./docfield.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite docstrings. Reads stdin when no files are given.
    Render(RenderArgs),
    /// Print the GitHub URL of a Python symbol's definition.
    Linkcode(LinkcodeArgs),
    /// Report which members API docs would skip.
    Members(MembersArgs),
}

#[derive(clap::Args)]
struct RenderArgs {
    /// Input files, directories or glob patterns
    files: Vec<String>,

    /// Output directory (required when files are given)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Output format: rst (default), json
    #[arg(short = 'f', long, default_value = "rst")]
    format: String,

    /// Only recognize the base Google sections
    #[arg(long)]
    no_custom_sections: bool,

    /// Emit :class:/:obj: instead of :py:class:/:py:obj:
    #[arg(long)]
    legacy_roles: bool,
}

#[derive(clap::Args)]
struct LinkcodeArgs {
    /// Dotted object path within the module, e.g. `ClassB.do_thing`
    fullname: String,

    /// Dotted module name, e.g. `mypkg.utils`
    #[arg(short, long)]
    module: String,

    /// Documentation domain; only `py` produces links
    #[arg(long, default_value = "py")]
    domain: String,

    /// Directory holding the top-level packages
    #[arg(long)]
    root: Option<PathBuf>,

    #[arg(long)]
    org: Option<String>,

    #[arg(long)]
    repo: Option<String>,

    /// Branch, tag or commit to link to
    #[arg(long)]
    branch: Option<String>,

    /// Path prepended to the module file in the URL
    #[arg(long)]
    source_prefix: Option<String>,

    /// Allowed top-level package. Can be specified multiple times.
    #[arg(long = "allow")]
    allowed_modules: Vec<String>,
}

#[derive(clap::Args)]
struct MembersArgs {
    /// Member names to check
    #[arg(required = true)]
    names: Vec<String>,

    /// Dotted module name whose lists apply, e.g. `mypkg.models`
    #[arg(short, long)]
    module: String,

    /// Kind of object owning the members: module, class, exception ...
    #[arg(long, default_value = "module")]
    what: String,

    /// Directory holding the top-level packages
    #[arg(long)]
    root: Option<PathBuf>,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cwd = std::env::current_dir().context("failed to determine working directory")?;
    let config = Config::discover(cli.config.as_deref(), &cwd)?;

    match cli.command {
        Commands::Render(args) => {
            render_command(&args, config)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Linkcode(args) => linkcode_command(args, config),
        Commands::Members(args) => {
            members_command(&args, &config)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "docfield=debug" } else { "docfield=warn" };
    let filter = EnvFilter::try_from_env("DOCFIELD_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();
}

fn render_command(args: &RenderArgs, mut config: Config) -> Result<()> {
    if args.no_custom_sections {
        config.docstring.custom_sections = false;
    }
    if args.legacy_roles {
        config.docstring.legacy_roles = true;
    }
    let parser = docfield::Parser::new(&config.docstring)?;
    let renderer = render::create_renderer(&args.format)?;

    if args.files.is_empty() {
        return stdin_mode(&parser, renderer.as_ref());
    }
    file_mode(args, &parser, renderer.as_ref())
}

/// stdin mode: rewrite one docstring from stdin to stdout.
fn stdin_mode(parser: &docfield::Parser, renderer: &dyn render::Renderer) -> Result<()> {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("failed to read stdin")?;

    let doc = RenderedDocstring {
        source: None,
        lines: parser.parse(&input),
    };
    print!("{}", renderer.render(&doc)?);
    Ok(())
}

/// file mode: rewrite each input into `<output>/<stem>.<ext>`.
fn file_mode(
    args: &RenderArgs,
    parser: &docfield::Parser,
    renderer: &dyn render::Renderer,
) -> Result<()> {
    let output_dir = args
        .output
        .as_deref()
        .context("--output is required when files are given")?;

    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output directory: {}", output_dir.display()))?;

    let ext = renderer.file_extension();
    for path in expand_globs(&args.files)? {
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("warning: skipping {}: {}", path.display(), e);
                continue;
            }
        };

        let source = path.to_string_lossy().to_string();
        let doc = RenderedDocstring {
            lines: parser.parse(&content),
            source: Some(source.clone()),
        };
        let out_path = output_dir.join(format!("{}.{}", derive_output_name(&source), ext));
        fs::write(&out_path, renderer.render(&doc)?)
            .with_context(|| format!("failed to write {}", out_path.display()))?;
        tracing::debug!(input = %source, output = %out_path.display(), "rendered");
    }

    Ok(())
}

fn linkcode_command(args: LinkcodeArgs, config: Config) -> Result<ExitCode> {
    let github = merge_github(config.github.unwrap_or_default(), &args);
    let root = args
        .root
        .clone()
        .or_else(|| github.source_root.as_ref().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."));

    let mut linker = GithubLinker::new(github, root);
    match linker.resolve(&args.domain, &args.module, &args.fullname) {
        Some(url) => {
            println!("{url}");
            Ok(ExitCode::SUCCESS)
        }
        None => {
            eprintln!("no source link for {}.{}", args.module, args.fullname);
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Print `skip <name>` or `keep <name>` for each requested member.
fn members_command(args: &MembersArgs, config: &Config) -> Result<()> {
    let root = args
        .root
        .clone()
        .or_else(|| {
            config
                .github
                .as_ref()
                .and_then(|g| g.source_root.as_ref())
                .map(PathBuf::from)
        })
        .unwrap_or_else(|| PathBuf::from("."));

    let (path, _) = docfield::linkcode::module_file(&root, &args.module)
        .with_context(|| format!("module {} not found under {}", args.module, root.display()))?;
    let module = ModuleMembers::load(&path)?;
    let excludes = ExcludeTable::from_config(&config.docstring);

    for name in &args.names {
        let skip = docfield::should_skip_member(&module, &excludes, &args.what, name, false);
        println!("{} {name}", if skip { "skip" } else { "keep" });
    }
    Ok(())
}

/// Command-line values win over the `[github]` table.
fn merge_github(mut github: GithubConfig, args: &LinkcodeArgs) -> GithubConfig {
    let overrides = [
        (&mut github.org, &args.org),
        (&mut github.repo, &args.repo),
        (&mut github.branch, &args.branch),
        (&mut github.source_prefix, &args.source_prefix),
    ];
    for (field, value) in overrides {
        if let Some(value) = value {
            field.clone_from(value);
        }
    }
    if !args.allowed_modules.is_empty() {
        github.allowed_modules = args.allowed_modules.clone();
    }
    github
}

/// File extensions picked up when a directory is given.
const SUPPORTED_EXTENSIONS: &[&str] = &["txt"];

/// Expand glob patterns into a list of real file paths.
/// Also handles bare directory paths by scanning for supported file types.
fn expand_globs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let path = Path::new(pattern);
        if path.is_file() {
            files.push(path.to_path_buf());
            continue;
        }
        if path.is_dir() {
            let entries = fs::read_dir(path)
                .with_context(|| format!("failed to read directory: {}", path.display()))?;
            for entry in entries.flatten() {
                let p = entry.path();
                let supported = p
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext));
                if p.is_file() && supported {
                    files.push(p);
                }
            }
            continue;
        }
        let matches: Vec<_> = glob::glob(pattern)
            .with_context(|| format!("invalid glob pattern: {}", pattern))?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file())
            .collect();
        if matches.is_empty() {
            eprintln!("warning: no files matched: {}", pattern);
        }
        files.extend(matches);
    }
    // Sort for deterministic output
    files.sort();
    files.dedup();
    Ok(files)
}

/// "docstrings/keys.txt" → "keys"
fn derive_output_name(source: &str) -> String {
    Path::new(source)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(source)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_name_strips_directory_and_extension() {
        assert_eq!(derive_output_name("docstrings/keys.txt"), "keys");
        assert_eq!(derive_output_name("keys.txt"), "keys");
    }

    #[test]
    fn output_name_no_extension() {
        assert_eq!(derive_output_name("README"), "README");
    }

    #[test]
    fn cli_flags_override_github_table() {
        let args = LinkcodeArgs {
            fullname: "X".into(),
            module: "m".into(),
            domain: "py".into(),
            root: None,
            org: None,
            repo: Some("cli-repo".into()),
            branch: Some("release-2.x".into()),
            source_prefix: None,
            allowed_modules: vec!["m".into()],
        };
        let github = merge_github(
            GithubConfig {
                org: "acme".into(),
                repo: "file-repo".into(),
                branch: "main".into(),
                ..GithubConfig::default()
            },
            &args,
        );
        assert_eq!(github.org, "acme");
        assert_eq!(github.repo, "cli-repo");
        assert_eq!(github.branch, "release-2.x");
        assert_eq!(github.allowed_modules, vec!["m".to_string()]);
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
