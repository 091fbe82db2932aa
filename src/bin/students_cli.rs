//! Command-line client for a running student registry server.
use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde::Serialize;
use student_registry::{
    client::StudentsClient,
    students::{Address, NewStudent, StudentPatch},
};

#[derive(Parser)]
#[command(
    name = "students-cli",
    about = "Create, list, fetch, update, and delete students over HTTP"
)]
struct Cli {
    /// Base URL of the student registry server.
    #[arg(
        long,
        env = "STUDENTS_API_URL",
        default_value = "http://127.0.0.1:8000"
    )]
    base_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a student.
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        age: i64,
        #[arg(long)]
        city: String,
        #[arg(long)]
        country: String,
    },
    /// List students, optionally filtered.
    List {
        /// Exact country match.
        #[arg(long)]
        country: Option<String>,
        /// Minimum age (inclusive).
        #[arg(long)]
        age: Option<i64>,
    },
    /// Fetch one student.
    Get { id: String },
    /// Set only the supplied fields on a student.
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        age: Option<i64>,
        /// Replacement city; requires `--country`.
        #[arg(long, requires = "country")]
        city: Option<String>,
        /// Replacement country; requires `--city`.
        #[arg(long, requires = "city")]
        country: Option<String>,
    },
    /// Delete one student.
    Delete { id: String },
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let client = StudentsClient::new(&cli.base_url)
        .with_context(|| format!("invalid server URL {}", cli.base_url))?;

    match cli.command {
        Command::Create {
            name,
            age,
            city,
            country,
        } => {
            let student = NewStudent {
                name,
                age,
                address: Address { city, country },
            };
            let id = client.create(&student).await.context("create failed")?;
            print_json(&serde_json::json!({ "id": id }))
        }
        Command::List { country, age } => {
            let students = client
                .list(country.as_deref(), age)
                .await
                .context("list failed")?;
            print_json(&students)
        }
        Command::Get { id } => {
            let student = client
                .fetch(&id)
                .await
                .with_context(|| format!("fetch {id} failed"))?;
            print_json(&student)
        }
        Command::Update {
            id,
            name,
            age,
            city,
            country,
        } => {
            let address = match (city, country) {
                (Some(city), Some(country)) => Some(Address { city, country }),
                (None, None) => None,
                _ => bail!("--city and --country must be supplied together"),
            };
            let patch = StudentPatch { name, age, address };
            client
                .update(&id, &patch)
                .await
                .with_context(|| format!("update {id} failed"))?;
            print_json(&serde_json::json!({}))
        }
        Command::Delete { id } => {
            let detail = client
                .delete(&id)
                .await
                .with_context(|| format!("delete {id} failed"))?;
            print_json(&serde_json::json!({ "detail": detail }))
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("failed to render response")?;
    println!("{rendered}");
    Ok(())
}
