//! Boomkaart - tree-inventory mapping from your terminal.
//!
//! A terminal-first client for a tree-inventory REST service: list trees
//! around a point, inspect and edit records, and bulk-upload JSON/GeoJSON
//! inventory files.

use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{error, warn};

mod cli;
mod client;
mod errors;
mod filters;
mod geo;
mod models;
mod output;
mod session;
mod upload;

use cli::{Cli, Command};
use client::TreeClient;
use errors::BoomkaartError;
use filters::RadiusFilter;
use models::{NewTree, TreeUpdate};
use output::TreeRow;
use session::SessionStore;
use upload::UploadFormat;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity
    init_tracing(cli.verbose, cli.quiet);

    let base_url = TreeClient::resolve_base_url(cli.base_url.clone());
    let client = TreeClient::new(base_url).context("failed to create API client")?;
    let store = SessionStore::from_env();

    match cli.command {
        Command::List(args) => cmd_list(&client, &args),
        Command::Show(args) => cmd_show(&client, &args),
        Command::Add(args) => cmd_add(&client, &store, &args),
        Command::Update(args) => cmd_update(&client, &store, &args),
        Command::Delete(args) => cmd_delete(&client, &store, &args),
        Command::Upload(args) => cmd_upload(&client, &store, &args),
        Command::Login(args) => cmd_login(&client, &store, &args),
        Command::Logout => cmd_logout(&client, &store),
        Command::Verify => cmd_verify(&client, &store),
    }
}

/// Initialize tracing subscriber.
fn init_tracing(verbose: bool, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Resolve the bearer token: explicit flag first, then the stored session.
fn resolve_token(explicit: Option<&str>, store: &SessionStore) -> Result<String, BoomkaartError> {
    if let Some(token) = explicit {
        return Ok(token.to_string());
    }
    store.load()?.ok_or(BoomkaartError::NoSession)
}

/// Execute the `list` command.
fn cmd_list(client: &TreeClient, args: &cli::ListArgs) -> Result<()> {
    let trees = client.list_trees().context("failed to fetch trees")?;

    let mut rows: Vec<TreeRow> = match args.near {
        Some(center) => {
            if args.radius <= 0.0 {
                bail!("radius must be positive, got {}", args.radius);
            }
            let filter = RadiusFilter {
                center,
                radius_m: args.radius,
            };
            filter.filter_within(&trees).iter().map(TreeRow::from).collect()
        }
        None => trees.iter().map(TreeRow::from).collect(),
    };

    if let Some(limit) = args.limit {
        rows.truncate(limit);
    }

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    output::write_rows(&mut handle, &rows, args.format)?;

    Ok(())
}

/// Execute the `show` command.
///
/// The backend has no per-id endpoint, so we fetch the list and pick the
/// record out of it.
fn cmd_show(client: &TreeClient, args: &cli::ShowArgs) -> Result<()> {
    let trees = client.list_trees().context("failed to fetch trees")?;

    let Some(tree) = trees.iter().find(|t| t.id == args.id) else {
        bail!("tree {} not found", args.id);
    };

    let row = TreeRow::from(tree);
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    match args.format {
        output::Format::Human => output::write_detail(&mut handle, &row)?,
        other => output::write_rows(&mut handle, &[row], other)?,
    }

    Ok(())
}

/// Execute the `add` command.
fn cmd_add(client: &TreeClient, store: &SessionStore, args: &cli::AddArgs) -> Result<()> {
    if args.lat < -90.0 || args.lat > 90.0 {
        bail!("latitude {} out of range [-90, 90]", args.lat);
    }
    if args.lon < -180.0 || args.lon > 180.0 {
        bail!("longitude {} out of range [-180, 180]", args.lon);
    }

    let token = resolve_token(args.token.as_deref(), store)?;
    let tree = NewTree {
        name: args.name.clone(),
        description: args.description.clone(),
        latitude: args.lat,
        longitude: args.lon,
    };

    let created = client
        .add_tree(&tree, &token)
        .context("failed to add tree")?;
    println!("Boom #{} toegevoegd.", created.id);

    Ok(())
}

/// Execute the `update` command.
fn cmd_update(client: &TreeClient, store: &SessionStore, args: &cli::UpdateArgs) -> Result<()> {
    if args.height.is_none() && args.diameter.is_none() {
        bail!("nothing to update: pass --height and/or --diameter");
    }
    if matches!(args.height, Some(h) if h < 0.0) {
        bail!("height must be non-negative");
    }
    if matches!(args.diameter, Some(d) if d < 0.0) {
        bail!("diameter must be non-negative");
    }

    let token = resolve_token(args.token.as_deref(), store)?;
    let update = TreeUpdate {
        height: args.height,
        diameter: args.diameter,
    };

    client
        .update_tree(args.id, &update, &token)
        .context("failed to update tree")?;
    println!("Boom #{} bijgewerkt.", args.id);

    Ok(())
}

/// Execute the `delete` command.
fn cmd_delete(client: &TreeClient, store: &SessionStore, args: &cli::DeleteArgs) -> Result<()> {
    let token = resolve_token(args.token.as_deref(), store)?;

    client
        .delete_tree(args.id, &token)
        .context("failed to delete tree")?;
    println!("Boom #{} verwijderd.", args.id);

    Ok(())
}

/// Execute the `upload` command - validate a file and persist its records.
fn cmd_upload(client: &TreeClient, store: &SessionStore, args: &cli::UploadArgs) -> Result<()> {
    let format = match args.format {
        Some(format) => format,
        None => UploadFormat::from_path(&args.file).with_context(|| {
            format!(
                "cannot infer format of '{}': pass --format json or --format geojson",
                args.file.display()
            )
        })?,
    };

    let content = std::fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read '{}'", args.file.display()))?;

    let report = upload::validate(&content, format);

    if !report.errors.is_empty() {
        let stderr = io::stderr();
        let mut handle = stderr.lock();
        for message in &report.errors {
            writeln!(handle, "{message}")?;
        }
        bail!("{} fout(en) gevonden, niets geüpload", report.errors.len());
    }
    if report.valid.is_empty() {
        bail!("geen geldige bomen gevonden in het bestand");
    }

    if args.dry_run {
        println!("{} geldige bomen, klaar om te uploaden.", report.valid.len());
        return Ok(());
    }

    let token = resolve_token(args.token.as_deref(), store)?;

    // Sequential, at-most-once: the first failure aborts and already
    // persisted records stay persisted.
    for tree in &report.valid {
        if let Err(e) = client.add_tree(tree, &token) {
            error!("add failed for '{}': {e}", tree.name);
            bail!("Er is een fout opgetreden bij het toevoegen van bomen.");
        }
    }

    println!("{} bomen toegevoegd.", report.valid.len());
    Ok(())
}

/// Execute the `login` command.
fn cmd_login(client: &TreeClient, store: &SessionStore, args: &cli::LoginArgs) -> Result<()> {
    let token = client
        .login(&args.username, &args.password)
        .context("login failed")?;

    store.save(&token).context("failed to store session token")?;
    println!("Ingelogd als {}.", args.username);

    Ok(())
}

/// Execute the `logout` command - revoke the token and forget the session.
fn cmd_logout(client: &TreeClient, store: &SessionStore) -> Result<()> {
    match store.load().context("failed to read session token")? {
        Some(token) => {
            // Clear the local session even when the server-side revoke fails;
            // the token file is gone either way.
            if let Err(e) = client.revoke_token(&token) {
                warn!("token revoke failed: {e}");
            }
            store.clear().context("failed to clear session token")?;
            println!("Uitgelogd.");
        }
        None => println!("Geen actieve sessie."),
    }

    Ok(())
}

/// Execute the `verify` command.
fn cmd_verify(client: &TreeClient, store: &SessionStore) -> Result<()> {
    let token = resolve_token(None, store)?;

    client.verify_token(&token).context("token is not valid")?;
    println!("Sessie is geldig.");

    Ok(())
}
