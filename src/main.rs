use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::Path;
use tracing_subscriber::EnvFilter;
use twig::areas::repository::Repository;

#[derive(Parser)]
#[command(
    name = "twig",
    version = "0.1.0",
    author = "Sami Barbut-Dica",
    about = "A miniature version control system",
    long_about = "twig tracks files in a working directory through a content-addressed \
    object database, a three-slot index and named branches.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
",
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "init",
        about = "Initialize a new repository",
        long_about = "This command initializes a new repository in the current directory or at the specified path."
    )]
    Init {
        #[arg(index = 1, help = "The path to the repository")]
        path: Option<String>,
    },
    #[command(
        name = "add",
        about = "Track and stage files",
        long_about = "This command stages the given files for the next commit. \
        Directories are expanded to every file below them."
    )]
    Add {
        #[arg(index = 1, required = true, num_args = 1.., help = "The files or directories to add")]
        paths: Vec<String>,
    },
    #[command(
        name = "commit",
        about = "Create a new commit with the specified message",
        long_about = "This command creates a new commit in the repository with the specified commit message."
    )]
    Commit {
        #[arg(short, long, help = "The commit message")]
        message: String,
    },
    #[command(
        name = "status",
        about = "Show the working tree status",
        long_about = "This command lists staged, modified, deleted and untracked files."
    )]
    Status,
    #[command(
        name = "log",
        about = "Show commit logs",
        long_about = "This command shows the commit history of the current branch, newest first, \
        with the files of each commit."
    )]
    Log,
    #[command(
        name = "branch",
        about = "List or create branches",
        long_about = "Without a name, this command lists every branch. \
        With a name, it creates a branch pointing at the current commit."
    )]
    Branch {
        #[arg(index = 1, help = "The name of the branch to create")]
        name: Option<String>,
    },
    #[command(
        name = "checkout",
        about = "Switch branches",
        long_about = "This command updates the working directory and the index to the given branch. \
        It refuses to run when local changes would be overwritten."
    )]
    Checkout {
        #[arg(index = 1, help = "The branch to switch to")]
        branch: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let pwd = std::env::current_dir()?;

    match &cli.command {
        Commands::Init { path } => {
            let path = match path {
                Some(path) => pwd.join(path),
                None => pwd,
            };
            let mut repository = Repository::new(&path, Box::new(std::io::stdout()))?;

            repository.init()
        }
        Commands::Add { paths } => with_repository(&pwd, |repository| repository.add(paths)),
        Commands::Commit { message } => {
            with_repository(&pwd, |repository| repository.commit(message))
        }
        Commands::Status => with_repository(&pwd, |repository| repository.status()),
        Commands::Log => with_repository(&pwd, |repository| repository.log()),
        Commands::Branch { name: Some(name) } => {
            with_repository(&pwd, |repository| repository.branch(name))
        }
        Commands::Branch { name: None } => {
            with_repository(&pwd, |repository| repository.list_branches())
        }
        Commands::Checkout { branch } => {
            with_repository(&pwd, |repository| repository.checkout(branch))
        }
    }
}

/// Run one command against the repository containing `pwd`
///
/// The index and refs are only written back when the command succeeds.
fn with_repository<T>(
    pwd: &Path,
    command: impl FnOnce(&mut Repository) -> Result<T>,
) -> Result<()> {
    let mut repository = Repository::open(pwd, Box::new(std::io::stdout()))?;
    command(&mut repository)?;

    repository.close()
}
