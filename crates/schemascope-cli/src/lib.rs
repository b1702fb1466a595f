//! CLI logic for the Schemascope relation diagram tool.
//!
//! This module contains the core CLI logic: loading the schema files, applying
//! command-line overrides and producing the requested output.

pub mod error_adapter;

mod args;
mod config;
mod report;

pub use args::Args;

use std::fs;

use log::info;

use schemascope::{
    DiagramBuilder, SchemascopeError,
    config::RelationConfig,
    docs::{CommonMarkRenderer, DocsPage},
    navigation::NodeNavigation,
};

/// Run the Schemascope CLI application
///
/// This function loads the input schema (and library, if given), then either
/// prints the node listing or renders the relation view of the selected node
/// to the output file. A description change is written back as SDL first.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `SchemascopeError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Parsing errors
/// - Unknown node names
/// - Rendering errors
pub fn run(args: &Args) -> Result<(), SchemascopeError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing schema"
    );

    // Load configuration, then let flags override the relation section
    let app_config = config::load_config(args.config.as_ref())?;
    let relation = apply_flags(args, *app_config.relation());
    let app_config = app_config.with_relation(relation);

    // Read input files
    let source = fs::read_to_string(&args.input)?;
    let library = args
        .library
        .as_ref()
        .map(fs::read_to_string)
        .transpose()?;

    let builder = DiagramBuilder::new(app_config);
    let mut trees = builder.load(&source, library.as_deref())?;

    if args.list {
        print!("{}", report::listing(&NodeNavigation::new(), &trees));
        return Ok(());
    }

    let Some(selected) = args.select.as_deref() else {
        return Ok(());
    };
    let id = builder.resolve_node(&trees, selected)?;

    if let (Some(description), Some(sdl_path)) = (&args.set_description, &args.sdl_output) {
        trees.set_description(id, description)?;
        fs::write(sdl_path, schemascope_parser::print_schema(trees.schema()))?;
        info!(node = selected, sdl_path = sdl_path.as_str(); "Schema written");
    }

    if args.docs {
        let page = DocsPage::build(&trees, id, &CommonMarkRenderer)
            .ok_or_else(|| SchemascopeError::UnknownNode(selected.to_string()))?;
        print!("{}", report::docs(&page));
    }

    let diagram = builder.diagram(&trees, selected)?;
    builder.write_svg(&diagram, &args.output)?;

    info!(output_file = args.output, cards = diagram.layout().cards().len(); "SVG exported successfully");

    Ok(())
}

/// Relation flags given on the command line win over the configuration file.
fn apply_flags(args: &Args, config: RelationConfig) -> RelationConfig {
    RelationConfig::new(
        config.show_related_to() && !args.no_related_to,
        config.base_types_on() || args.scalars,
        config.self_loops() || args.self_loops,
        config.library_only() || args.library_only,
    )
}
