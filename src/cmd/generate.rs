//! Generate command implementation.

use anyhow::{bail, Context, Result};
use glob::Pattern;
use model_diagram::config::DiagramConfig;
use model_diagram::diagram::{
    generate_data_model_diagram, to_dot, DiagramOptions, GraphDocument, RenderFormat,
    TargetPolicy,
};
use model_diagram::enhance::{enhance_svg_file, EnhanceOptions, EnhanceOutcome};
use model_diagram::model::{load_models, Model};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub struct GenerateArgs {
    pub models: PathBuf,
    pub output: PathBuf,
    pub format: String,
    pub add_labels: bool,
    pub view: bool,
    pub strict: bool,
    pub tables: Option<String>,
    pub exclude: Option<String>,
    pub config: Option<PathBuf>,
    pub enhanced: Option<PathBuf>,
    pub dot_only: bool,
}

/// Run the generate command
pub fn run(args: GenerateArgs) -> Result<()> {
    let format: RenderFormat = args.format.parse().map_err(|e| anyhow::anyhow!("{}", e))?;

    if args.enhanced.is_some() && format != RenderFormat::Svg {
        bail!("--enhanced requires the svg format (got {})", format);
    }

    let config = match args.config {
        Some(ref path) => DiagramConfig::load(path)?,
        None => DiagramConfig::default(),
    };

    let mut options = DiagramOptions {
        view_diagram: args.view,
        format,
        ..Default::default()
    };
    config.apply(&mut options);

    // Flags win over the config file
    if !args.add_labels {
        options.add_labels = false;
    }
    if args.strict {
        options.target_policy = TargetPolicy::Strict;
    }

    let mut model = load_models(&args.models)?;
    apply_filters(&mut model, args.tables.as_deref(), args.exclude.as_deref())?;

    if model.is_empty() {
        eprintln!("No entities found in {}.", args.models.display());
        return Ok(());
    }

    if args.dot_only {
        let document = GraphDocument::from_entities(&model.entities, &options)?;
        let source = to_dot(&document);
        if args.output == Path::new("-") {
            print!("{}", source);
        } else {
            let mut file = fs::File::create(&args.output)
                .with_context(|| format!("failed to create {}", args.output.display()))?;
            file.write_all(source.as_bytes())?;
            eprintln!("DOT source written to: {}", args.output.display());
        }
        print_summary(&model);
        return Ok(());
    }

    eprintln!(
        "Generating diagram: {} [format: {}]",
        args.models.display(),
        format
    );

    let rendered = generate_data_model_diagram(&model.entities, &args.output, &options)?;
    eprintln!("Rendered to: {}", rendered.display());

    if let Some(ref enhanced) = args.enhanced {
        let enhance_options = EnhanceOptions {
            font_import_url: config
                .font_import_url
                .clone()
                .unwrap_or_else(|| EnhanceOptions::default().font_import_url),
        };
        match enhance_svg_file(&rendered, enhanced, &enhance_options) {
            EnhanceOutcome::Written(path) => {
                eprintln!("Interactive SVG written to: {}", path.display())
            }
            outcome => bail!("failed to enhance {}: {:?}", rendered.display(), outcome),
        }
    }

    print_summary(&model);
    Ok(())
}

fn apply_filters(model: &mut Model, tables: Option<&str>, exclude: Option<&str>) -> Result<()> {
    let include = parse_patterns(tables)?;
    let exclude = parse_patterns(exclude)?;
    model.retain_matching(&include, &exclude);
    Ok(())
}

fn parse_patterns(list: Option<&str>) -> Result<Vec<Pattern>> {
    let Some(list) = list else {
        return Ok(Vec::new());
    };
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| Pattern::new(s).with_context(|| format!("invalid entity pattern: {}", s)))
        .collect()
}

fn print_summary(model: &Model) {
    eprintln!(
        "\nDiagram: {} entities, {} columns, {} relationships",
        model.entities.len(),
        model.column_count(),
        model.relationship_count()
    );
}
