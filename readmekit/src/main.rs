//! readmekit - compose a README from prewritten Markdown blocks

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use readmekit_core::export::{self, WriterSink};
use readmekit_core::{Catalog, Category, Composition, Config, ExportSink, FileSink};
use readmekit_tui::App;
use std::io::{self, Write};
use std::path::PathBuf;

/// Build a README by picking, ordering and editing ready-made sections
#[derive(Parser, Debug)]
#[command(name = "readmekit")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file (defaults to the platform config directory)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Extra block catalog; its blocks override builtin ones with the same name
    #[arg(long, global = true, value_name = "FILE")]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Open the interactive editor (default)
    Edit {
        /// Directory the README is written into
        #[arg(long, value_name = "DIR", default_value = ".")]
        dir: PathBuf,
    },
    /// List available blocks
    List {
        /// Only show one category (project or personal)
        #[arg(long)]
        category: Option<Category>,
    },
    /// Print a block's Markdown
    Show {
        /// Block name, as printed by `list`
        name: String,
    },
    /// Assemble the named blocks in order
    Build {
        /// Block names, in document order
        #[arg(required = true, value_name = "NAME")]
        names: Vec<String>,

        /// Write to this file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(matches!(args.command, None | Some(Command::Edit { .. })));

    let mut config = match &args.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Failed to load configuration: {}", path.display()))?,
        None => Config::load().context("Failed to load configuration")?,
    };
    if let Some(path) = args.catalog {
        config.catalog.path = Some(path);
    }

    let catalog = Catalog::from_config(&config.catalog).context("Failed to load block catalog")?;

    match args.command {
        None => run_tui(config, catalog, PathBuf::from(".")),
        Some(Command::Edit { dir }) => run_tui(config, catalog, dir),
        Some(Command::List { category }) => list(&catalog, category),
        Some(Command::Show { name }) => show(&catalog, &name),
        Some(Command::Build { names, output }) => build(&catalog, &names, output),
    }
}

/// `RUST_LOG` wins; otherwise warnings only, and nothing while the TUI owns the screen
fn init_logging(interactive: bool) {
    let default = if interactive { "off" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default)).init();
}

fn run_tui(config: Config, catalog: Catalog, dir: PathBuf) -> Result<()> {
    if !dir.is_dir() {
        bail!("Output directory does not exist: {}", dir.display());
    }

    let app = App::new(config, catalog).with_output_dir(dir);
    readmekit_tui::run(app).context("TUI application error")?;
    Ok(())
}

fn list(catalog: &Catalog, category: Option<Category>) -> Result<()> {
    let mut out = io::stdout().lock();
    for template in catalog.list_templates(category) {
        writeln!(out, "{:<10} {}", template.category, template.name)?;
    }
    Ok(())
}

fn show(catalog: &Catalog, name: &str) -> Result<()> {
    let template = catalog
        .get(name)
        .with_context(|| format!("Unknown block: {}", name))?;
    print!("{}", template.markdown);
    Ok(())
}

fn build(catalog: &Catalog, names: &[String], output: Option<PathBuf>) -> Result<()> {
    let mut composition = Composition::new();
    for name in names {
        let template = catalog
            .get(name)
            .with_context(|| format!("Unknown block: {}", name))?;
        composition.add_block(template);
    }

    let snapshot = composition.snapshot();
    let mut sink: Box<dyn ExportSink> = match output {
        Some(path) => Box::new(FileSink::new(path)),
        None => Box::new(WriterSink::new("stdout", io::stdout())),
    };

    let report = export::export(&snapshot, sink.as_mut())
        .with_context(|| format!("Failed to write {}", sink.describe()))?;
    log::info!("wrote {} bytes to {}", report.bytes, report.destination);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn catalog() -> Catalog {
        Catalog::from_templates(vec![
            readmekit_core::BlockTemplate::new("Title", Category::Project, "# Title\n"),
            readmekit_core::BlockTemplate::new("Install", Category::Project, "## Install\n"),
        ])
    }

    #[test]
    fn test_build_to_file() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("README.md");

        build(
            &catalog(),
            &["Install".to_string(), "Title".to_string()],
            Some(path.clone()),
        )?;

        assert_eq!(std::fs::read_to_string(&path)?, "## Install\n# Title\n");
        Ok(())
    }

    #[test]
    fn test_build_unknown_block() {
        let err = build(&catalog(), &["Nope".to_string()], None).unwrap_err();
        assert!(err.to_string().contains("Unknown block: Nope"));
    }

    #[test]
    fn test_parse_subcommands() {
        let args = Args::try_parse_from(["readmekit", "list", "--category", "Personal"]).unwrap();
        assert!(matches!(
            args.command,
            Some(Command::List {
                category: Some(Category::Personal)
            })
        ));

        let args = Args::try_parse_from(["readmekit", "build", "Title", "-o", "out.md"]).unwrap();
        assert!(matches!(args.command, Some(Command::Build { ref names, .. }) if names == &["Title"]));

        let args = Args::try_parse_from(["readmekit", "--catalog", "blocks.toml"]).unwrap();
        assert!(args.command.is_none());
        assert_eq!(args.catalog, Some(PathBuf::from("blocks.toml")));
    }

    #[test]
    fn test_build_requires_names() {
        assert!(Args::try_parse_from(["readmekit", "build"]).is_err());
    }
}
