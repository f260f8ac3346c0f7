mod enhance;
mod generate;
mod schema;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "model-diagram")]
#[command(version)]
#[command(about = "Draw interactive entity-relationship diagrams of ORM data models", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render a diagram from YAML/JSON model files with Graphviz
    Generate {
        /// Model file or glob pattern (e.g., models.yaml, models/**/*.json)
        models: PathBuf,

        /// Output base name: DOT source is written here, the image to <output>.<format>
        #[arg(short, long, default_value = "my_data_model_diagram")]
        output: PathBuf,

        /// Render format: svg, png or pdf
        #[arg(short, long, default_value = "svg")]
        format: String,

        /// Do not draw relationship keys on edges
        #[arg(long)]
        no_labels: bool,

        /// Open the rendered diagram in the default viewer
        #[arg(long)]
        view: bool,

        /// Fail when a relationship targets an entity that is not in the model
        #[arg(long)]
        strict: bool,

        /// Only include specific entities (comma-separated, supports globs)
        #[arg(short, long)]
        tables: Option<String>,

        /// Exclude specific entities (comma-separated, supports globs)
        #[arg(short, long)]
        exclude: Option<String>,

        /// YAML config file for colors, fonts and defaults
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Also write an interactive SVG to this path (svg format only)
        #[arg(long)]
        enhanced: Option<PathBuf>,

        /// Write DOT source only, skip Graphviz (use -o - for stdout)
        #[arg(long)]
        dot_only: bool,
    },

    /// Add web font and hover classes to a Graphviz SVG
    Enhance {
        /// SVG produced by Graphviz
        input: PathBuf,

        /// Path for the interactive SVG
        output: PathBuf,

        /// Stylesheet URL imported at the top of the SVG
        #[arg(long)]
        font_url: Option<String>,
    },

    /// Print JSON Schema for model or config files
    Schema {
        /// Schema name: model or config (default: all)
        name: Option<String>,

        /// List available schema names
        #[arg(long)]
        list: bool,
    },

    /// Generate shell completions
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Generate {
            models,
            output,
            format,
            no_labels,
            view,
            strict,
            tables,
            exclude,
            config,
            enhanced,
            dot_only,
        } => generate::run(generate::GenerateArgs {
            models,
            output,
            format,
            add_labels: !no_labels,
            view,
            strict,
            tables,
            exclude,
            config,
            enhanced,
            dot_only,
        }),
        Commands::Enhance {
            input,
            output,
            font_url,
        } => enhance::run(input, output, font_url),
        Commands::Schema { name, list } => schema::run(name, list),
        Commands::Completions { shell } => {
            generate(
                shell,
                &mut Cli::command(),
                "model-diagram",
                &mut io::stdout(),
            );
            Ok(())
        }
    }
}
