//! Command-line interface definitions.
//!
//! Uses clap derive API for argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::geo::Point;
use crate::output::Format;
use crate::upload::UploadFormat;

/// Tree-inventory mapping from your terminal.
#[derive(Parser, Debug)]
#[command(name = "boomkaart")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Command to run
    #[command(subcommand)]
    pub command: Command,

    /// Backend base URL (overrides BOOMKAART_URL)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Enable verbose debug logging
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    pub quiet: bool,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List trees, optionally within a radius of a reference point
    List(ListArgs),

    /// Show the details of a single tree
    Show(ShowArgs),

    /// Add a single tree (requires a session)
    Add(AddArgs),

    /// Update the height/diameter of a tree (requires a session)
    Update(UpdateArgs),

    /// Delete a tree (requires a session)
    Delete(DeleteArgs),

    /// Validate and upload a JSON or GeoJSON tree file (requires a session)
    Upload(UploadArgs),

    /// Log in and store the session token
    Login(LoginArgs),

    /// Revoke and forget the session token
    Logout,

    /// Check whether the stored session token is still valid
    Verify,
}

/// Arguments for the `list` command.
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Reference point as lat,lon; enables distance tagging
    #[arg(long, value_parser = parse_point)]
    pub near: Option<Point>,

    /// Radius in meters around the reference point
    #[arg(long, default_value = "100")]
    pub radius: f64,

    /// Maximum number of trees to show
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,

    /// Output format
    #[arg(long, short = 'f', default_value = "human", value_parser = parse_format)]
    pub format: Format,
}

/// Arguments for the `show` command.
#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Tree identifier
    pub id: i64,

    /// Output format
    #[arg(long, short = 'f', default_value = "human", value_parser = parse_format)]
    pub format: Format,
}

/// Arguments for the `add` command.
#[derive(Parser, Debug)]
#[command(allow_negative_numbers = true)]
pub struct AddArgs {
    /// Tree name
    #[arg(long)]
    pub name: String,

    /// Tree description
    #[arg(long)]
    pub description: String,

    /// Latitude in decimal degrees
    #[arg(long)]
    pub lat: f64,

    /// Longitude in decimal degrees
    #[arg(long)]
    pub lon: f64,

    /// Bearer token (overrides the stored session)
    #[arg(long)]
    pub token: Option<String>,
}

/// Arguments for the `update` command.
#[derive(Parser, Debug)]
pub struct UpdateArgs {
    /// Tree identifier
    pub id: i64,

    /// New height in meters
    #[arg(long)]
    pub height: Option<f64>,

    /// New trunk diameter in centimeters
    #[arg(long)]
    pub diameter: Option<f64>,

    /// Bearer token (overrides the stored session)
    #[arg(long)]
    pub token: Option<String>,
}

/// Arguments for the `delete` command.
#[derive(Parser, Debug)]
pub struct DeleteArgs {
    /// Tree identifier
    pub id: i64,

    /// Bearer token (overrides the stored session)
    #[arg(long)]
    pub token: Option<String>,
}

/// Arguments for the `upload` command.
#[derive(Parser, Debug)]
pub struct UploadArgs {
    /// File to upload (.json or .geojson)
    pub file: PathBuf,

    /// File format; inferred from the extension when omitted
    #[arg(long, value_parser = parse_upload_format)]
    pub format: Option<UploadFormat>,

    /// Validate only, do not persist anything
    #[arg(long)]
    pub dry_run: bool,

    /// Bearer token (overrides the stored session)
    #[arg(long)]
    pub token: Option<String>,
}

/// Arguments for the `login` command.
#[derive(Parser, Debug)]
pub struct LoginArgs {
    /// Username
    pub username: String,

    /// Password
    #[arg(long, env = "BOOMKAART_PASSWORD", hide_env_values = true)]
    pub password: String,
}

/// Parse an output format from string.
fn parse_format(s: &str) -> Result<Format, String> {
    s.parse()
}

/// Parse a reference point from string.
fn parse_point(s: &str) -> Result<Point, String> {
    s.parse()
}

/// Parse an upload format from string.
fn parse_upload_format(s: &str) -> Result<UploadFormat, String> {
    s.parse()
}
