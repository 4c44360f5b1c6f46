use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use storage::{Storage, StoredResponse};

const CSV_HEADER: [&str; 6] = [
    "Timestamp",
    "Role",
    "Site Area",
    "Site Type",
    "Summary",
    "Transcript",
];

#[derive(Parser, Debug)]
struct Cli {
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://./data/responses.db")]
    database_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print stored responses, one per line.
    List {
        #[arg(long)]
        json: bool,
    },
    /// Write every stored response as CSV, in the response sheet's column order.
    ExportCsv {
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let storage = Storage::new(&cli.database_url).await?;
    let rows = storage.list_responses().await?;

    match cli.command {
        Command::List { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else if rows.is_empty() {
                println!("no responses stored");
            } else {
                for row in &rows {
                    println!("{}", list_line(row));
                }
            }
        }
        Command::ExportCsv { output } => {
            let csv = render_csv(&rows);
            match output {
                Some(path) => {
                    fs::write(&path, csv)
                        .with_context(|| format!("failed to write '{}'", path.display()))?;
                    println!("exported {} responses to {}", rows.len(), path.display());
                }
                None => print!("{csv}"),
            }
        }
    }

    Ok(())
}

fn list_line(row: &StoredResponse) -> String {
    let first_line = row.summary.lines().next().unwrap_or_default();
    format!(
        "#{} {} | {} | {} - {} | {}",
        row.response_id.0,
        row.received_at.to_rfc3339(),
        row.role,
        row.site_area,
        row.site_type,
        first_line
    )
}

fn render_csv(rows: &[StoredResponse]) -> String {
    let mut out = CSV_HEADER.join(",");
    out.push('\n');
    for row in rows {
        let timestamp = row.received_at.to_rfc3339();
        let fields = [
            timestamp.as_str(),
            row.role.as_str(),
            row.site_area.as_str(),
            row.site_type.as_str(),
            row.summary.as_str(),
            row.transcript.as_str(),
        ];
        let line = fields
            .iter()
            .map(|field| csv_field(field))
            .collect::<Vec<_>>()
            .join(",");
        out.push_str(&line);
        out.push('\n');
    }
    out
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
