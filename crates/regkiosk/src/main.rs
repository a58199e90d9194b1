//! `regdesk` - CLI for regkiosk
//!
//! This binary stands in for the kiosk's two views: registering a person
//! with a signature replay, and listing, searching, exporting, and
//! deleting stored records.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use regkiosk::cli::{
    Cli, Command, ConfigCommand, DeleteCommand, ExportCommand, ListCommand, RegisterCommand,
    SearchCommand, StrokeScript, WipeCommand,
};
use regkiosk::config::Backend;
use regkiosk::pad::SignaturePad;
use regkiosk::registrant::Registrant;
use regkiosk::{
    init_logging, Config, Gateway, Kiosk, LocalGateway, PointerEvent, RegistrationForm,
    RemoteGateway, SurfaceFrame,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    // Execute the command
    match cli.command {
        Command::Register(cmd) => handle_register(&config, cmd).await,
        Command::List(cmd) => handle_list(&config, &cmd).await,
        Command::Search(cmd) => handle_search(&config, &cmd).await,
        Command::Export(cmd) => handle_export(&config, &cmd).await,
        Command::Delete(cmd) => handle_delete(&config, &cmd).await,
        Command::Wipe(cmd) => handle_wipe(&config, &cmd).await,
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

/// Build the configured gateway.
fn build_gateway(config: &Config) -> anyhow::Result<Box<dyn Gateway>> {
    match config.storage.backend {
        Backend::Local => {
            let gateway = LocalGateway::open(config.database_path())?;
            Ok(Box::new(gateway))
        }
        Backend::Remote => {
            let remote = &config.storage.remote;
            let gateway =
                RemoteGateway::new(remote.base_url.clone(), &remote.api_key, remote.table.clone())?;
            Ok(Box::new(gateway))
        }
    }
}

/// Build a kiosk with a freshly fitted pad.
fn build_kiosk(config: &Config) -> anyhow::Result<Kiosk> {
    let frame = SurfaceFrame::sized(config.pad.width, config.pad.height);
    let pad = SignaturePad::new(frame, config.pad.stroke_width);
    Ok(Kiosk::new(
        build_gateway(config)?,
        pad,
        config.kiosk.key_includes_department,
    ))
}

/// Replay a stroke script through the pad, stroke by stroke.
fn replay_strokes(pad: &mut SignaturePad, script: &StrokeScript) -> regkiosk::Result<()> {
    for stroke in script {
        let mut points = stroke.iter();
        let Some(first) = points.next() else {
            continue;
        };
        pad.begin_stroke(&PointerEvent::mouse(first[0], first[1]))?;
        for point in points {
            pad.extend_stroke(&PointerEvent::mouse(point[0], point[1]))?;
        }
        pad.end_stroke()?;
    }
    Ok(())
}

async fn handle_register(config: &Config, cmd: RegisterCommand) -> anyhow::Result<()> {
    let script_text = std::fs::read_to_string(&cmd.signature)
        .with_context(|| format!("failed to read strokes file {}", cmd.signature.display()))?;
    let script: StrokeScript = serde_json::from_str(&script_text)
        .with_context(|| format!("invalid strokes file {}", cmd.signature.display()))?;

    let mut kiosk = build_kiosk(config)?;
    replay_strokes(kiosk.pad_mut(), &script)?;

    let form = RegistrationForm {
        first_name: cmd.first,
        middle_name: cmd.middle,
        last_name: cmd.last,
        department: cmd.department.into(),
        section: cmd.section,
    };

    match kiosk.submit(form).await {
        Ok(record) => {
            println!("Registered {} ({})", record.full_name(), record.id);
            Ok(())
        }
        Err(err) if err.is_duplicate() || err.is_validation() => {
            eprintln!("{err}");
            std::process::exit(1);
        }
        Err(err) => Err(err.into()),
    }
}

async fn handle_list(config: &Config, cmd: &ListCommand) -> anyhow::Result<()> {
    let kiosk = build_kiosk(config)?;
    let records = kiosk.records().await?;

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        print_table(&records);
    }
    Ok(())
}

async fn handle_search(config: &Config, cmd: &SearchCommand) -> anyhow::Result<()> {
    let kiosk = build_kiosk(config)?;
    let records = kiosk.search(&cmd.term).await?;

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else if records.is_empty() {
        println!("No matching records");
    } else {
        print_table(&records);
    }
    Ok(())
}

async fn handle_export(config: &Config, cmd: &ExportCommand) -> anyhow::Result<()> {
    let kiosk = build_kiosk(config)?;
    let export = kiosk.export().await?;

    let rows = export.contents.lines().count().saturating_sub(1);
    let path = cmd
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&export.file_name));
    std::fs::write(&path, &export.contents)
        .with_context(|| format!("failed to write {}", path.display()))?;

    println!(
        "Exported {rows} record(s) to {} ({})",
        path.display(),
        export.mime_type
    );
    Ok(())
}

async fn handle_delete(config: &Config, cmd: &DeleteCommand) -> anyhow::Result<()> {
    if !cmd.yes && !confirm(&format!("Permanently delete record '{}'?", cmd.id))? {
        println!("Aborted.");
        return Ok(());
    }

    let kiosk = build_kiosk(config)?;
    kiosk.delete(&cmd.id).await?;
    println!("Deleted '{}' (if it existed).", cmd.id);
    Ok(())
}

async fn handle_wipe(config: &Config, cmd: &WipeCommand) -> anyhow::Result<()> {
    if !cmd.yes && !confirm("This will wipe ALL records. This cannot be undone. Continue?")? {
        println!("Aborted.");
        return Ok(());
    }

    let kiosk = build_kiosk(config)?;
    kiosk.wipe().await?;
    println!("All records deleted.");
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Backend:          {:?}", config.storage.backend);
                println!("  Database path:    {}", config.database_path().display());
                println!("  Remote table:     {}", config.storage.remote.table);
                println!();
                println!("[Pad]");
                println!(
                    "  Surface:          {}x{}",
                    config.pad.width, config.pad.height
                );
                println!("  Stroke width:     {}", config.pad.stroke_width);
                println!();
                println!("[Kiosk]");
                println!(
                    "  Department in key: {}",
                    config.kiosk.key_includes_department
                );
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}

/// Print records as a simple table.
fn print_table(records: &[Registrant]) {
    if records.is_empty() {
        println!("No records.");
        return;
    }

    println!(
        "{:<30} {:<12} {:<10} {}",
        "Full Name", "Department", "Section", "Date Registered"
    );
    for record in records {
        println!(
            "{:<30} {:<12} {:<10} {}",
            record.full_name(),
            record.department,
            record.section.as_deref().unwrap_or("-"),
            record.registered_at.to_rfc3339()
        );
    }
    println!();
    println!("{} record(s)", records.len());
}

/// Ask for a yes/no confirmation on stdin. Defaults to no.
fn confirm(prompt: &str) -> anyhow::Result<bool> {
    print!("{prompt} [y/N] ");
    std::io::stdout().flush()?;

    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_lowercase().as_str(),
        "y" | "yes"
    ))
}
