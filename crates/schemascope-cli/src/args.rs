//! Command-line argument definitions for the Schemascope CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments select the schema files and the node to show,
//! override the relation flags of the configuration file and control logging
//! verbosity.

use clap::Parser;

/// Command-line arguments for the Schemascope relation diagram tool
#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the GraphQL schema (SDL)
    #[arg(help = "Path to the input schema file")]
    pub input: String,

    /// Path to a library schema whose types the input may reference
    #[arg(short, long)]
    pub library: Option<String>,

    /// Name of the node whose relations are drawn
    #[arg(short, long, required_unless_present = "list")]
    pub select: Option<String>,

    /// Path to the output SVG file
    #[arg(short, long, default_value = "out.svg")]
    pub output: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Let scalar-typed fields create relations
    #[arg(long)]
    pub scalars: bool,

    /// Hide the nodes referencing the selected node
    #[arg(long)]
    pub no_related_to: bool,

    /// Draw connectors for fields typed as their own node
    #[arg(long)]
    pub self_loops: bool,

    /// Only draw library nodes next to the selected node
    #[arg(long)]
    pub library_only: bool,

    /// Print the node navigation listing instead of rendering
    #[arg(long)]
    pub list: bool,

    /// Print the docs page of the selected node
    #[arg(long)]
    pub docs: bool,

    /// Replace the description of the selected node
    #[arg(long, requires = "sdl_output")]
    pub set_description: Option<String>,

    /// Where to write the schema after a description change
    #[arg(long)]
    pub sdl_output: Option<String>,
}
