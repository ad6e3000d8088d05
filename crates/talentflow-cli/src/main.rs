//! TalentFlow CLI tool.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "talentflow")]
#[command(about = "TalentFlow hiring pipeline CLI", long_about = None)]
struct Cli {
    /// API server URL
    #[arg(long, env = "TALENTFLOW_API_URL", default_value = "http://localhost:3000")]
    api_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage job postings
    Jobs {
        #[command(subcommand)]
        command: JobCommands,
    },
    /// Validate a system configuration file
    Validate {
        /// Path to the configuration file
        #[arg(default_value = "talentflow.kdl")]
        path: String,
    },
    /// Run random reorders against a local store with injected faults
    Simulate {
        /// Number of jobs on the board
        #[arg(long, default_value = "10")]
        jobs: usize,
        /// Number of moves to attempt
        #[arg(long, default_value = "50")]
        moves: usize,
        /// Probability that a storage call fails
        #[arg(long, default_value = "0.1")]
        failure_rate: f64,
        /// Upper bound of the simulated latency
        #[arg(long, default_value = "0")]
        max_delay_ms: u64,
        /// RNG seed, random when omitted
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(Subcommand)]
enum JobCommands {
    /// List jobs
    List {
        /// Filter by title
        #[arg(long)]
        search: Option<String>,
        /// Filter by status (active, archived)
        #[arg(long)]
        status: Option<String>,
        /// Sort by order, title or createdAt
        #[arg(long)]
        sort: Option<String>,
        #[arg(long, default_value = "1")]
        page: usize,
        #[arg(long, default_value = "10")]
        page_size: usize,
    },
    /// Show job details
    Show {
        /// Job ID
        id: String,
    },
    /// Create a job at the end of the board
    Create {
        title: String,
        #[arg(long)]
        slug: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Tag to attach (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// Update a job's fields
    Update {
        /// Job ID
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        slug: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Replace tags (repeatable)
        #[arg(long = "tag")]
        tags: Option<Vec<String>>,
    },
    /// Archive a job, or restore it with --restore
    Archive {
        /// Job ID
        id: String,
        #[arg(long)]
        restore: bool,
    },
    /// Delete a job
    Delete {
        /// Job ID
        id: String,
    },
    /// Move a job to a new position
    Reorder {
        /// Job ID
        id: String,
        /// Current order of the job
        from: u32,
        /// Target order
        to: u32,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Jobs { command } => {
            let client = commands::jobs::ApiClient::new(&cli.api_url);
            match command {
                JobCommands::List {
                    search,
                    status,
                    sort,
                    page,
                    page_size,
                } => {
                    client
                        .list(search, status, sort, page, page_size)
                        .await?;
                }
                JobCommands::Show { id } => {
                    client.show(&id).await?;
                }
                JobCommands::Create {
                    title,
                    slug,
                    description,
                    tags,
                } => {
                    client.create(title, slug, description, tags).await?;
                }
                JobCommands::Update {
                    id,
                    title,
                    slug,
                    description,
                    tags,
                } => {
                    client.update(&id, title, slug, description, tags).await?;
                }
                JobCommands::Archive { id, restore } => {
                    client.archive(&id, restore).await?;
                }
                JobCommands::Delete { id } => {
                    client.delete(&id).await?;
                }
                JobCommands::Reorder { id, from, to } => {
                    client.reorder(&id, from, to).await?;
                }
            }
        }
        Commands::Validate { path } => {
            commands::validate(&path)?;
        }
        Commands::Simulate {
            jobs,
            moves,
            failure_rate,
            max_delay_ms,
            seed,
        } => {
            commands::simulate::run(commands::simulate::SimulateOptions {
                jobs,
                moves,
                failure_rate,
                max_delay_ms,
                seed,
            })
            .await?;
        }
    }

    Ok(())
}
