mod config;
mod group_cmd;
mod node_cmd;
mod test_cmd;
mod upload;
mod user_cmd;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "shakedown", about = "Admin one-shots and E2E runner for a content-repository server")]
struct Cli {
    /// Server root, overriding the config file
    #[arg(long, global = true)]
    server: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a user account
    CreateUser {
        name: String,
        password: String,
    },

    /// Delete a user account
    DeleteUser {
        name: String,
    },

    /// Create a group, optionally with initial members
    CreateGroup {
        /// Group name (g- prefix by convention)
        name: String,
        /// Initial members
        members: Vec<String>,
    },

    /// Add a member to an existing group
    AddMember {
        group: String,
        member: String,
    },

    /// Print a node's JSON
    Get {
        /// Server-relative node path
        path: String,
    },

    /// Set node properties from key=value pairs
    Set {
        /// Server-relative node path
        path: String,
        /// Properties as key=value
        props: Vec<String>,
    },

    /// Search content and print matching paths
    Search {
        query: String,
    },

    /// Upload a file into the content pool
    Upload {
        /// Path to the local file
        file: PathBuf,

        /// Declared content type
        #[arg(long, default_value = "application/octet-stream")]
        content_type: String,
    },

    /// Run the E2E suite against a server
    Test {
        #[command(flatten)]
        args: test_cmd::TestArgs,
    },

    /// Show or set configuration
    Config {
        /// Set the server URL
        #[arg(long)]
        url: Option<String>,

        /// Enable or disable trusted-auth mode
        #[arg(long)]
        trusted_auth: Option<bool>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();
    let server = cli.server.as_deref();

    let result = match cli.command {
        Commands::CreateUser { name, password } => {
            user_cmd::run_create_user(server, &name, &password).await
        }
        Commands::DeleteUser { name } => user_cmd::run_delete_user(server, &name).await,
        Commands::CreateGroup { name, members } => {
            group_cmd::run_create_group(server, &name, &members).await
        }
        Commands::AddMember { group, member } => {
            group_cmd::run_add_member(server, &group, &member).await
        }
        Commands::Get { path } => node_cmd::run_get(server, &path).await,
        Commands::Set { path, props } => node_cmd::run_set(server, &path, &props).await,
        Commands::Search { query } => node_cmd::run_search(server, &query).await,
        Commands::Upload { file, content_type } => {
            upload::run_upload(server, &file, &content_type).await
        }
        Commands::Test { args } => test_cmd::run_test(server, args).await,
        Commands::Config { url, trusted_auth } => {
            if url.is_none() && trusted_auth.is_none() {
                config::show_config()
            } else {
                config::set_config(url, trusted_auth)
            }
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
