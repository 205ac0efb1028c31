use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::io::AsyncReadExt;
use tracing::debug;

use project_explorer::app::{expansion_waves, normalize, App};
use project_explorer::config::{AppConfig, LogConfig};
use project_explorer::error::{self, AppError};
use project_explorer::fs::tree::TreeNode;
use project_explorer::{logging, ui};

/// Browse a project tree through the explorer cache.
#[derive(Parser, Debug)]
#[command(name = "pex", version, about)]
struct Cli {
    /// Explicit config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter directive (RUST_LOG still wins)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show a project tree, expanding the given directories
    Tree {
        /// Project root (defaults to the configured default path)
        root: Option<PathBuf>,

        /// Directory to expand; repeatable
        #[arg(long = "expand", value_name = "DIR")]
        expand: Vec<PathBuf>,
    },
    /// Print a file's content
    Cat { file: PathBuf },
    /// Save stdin to a file and report invalidated projects
    Save {
        file: PathBuf,

        /// Load this project first and print it again after the save
        #[arg(long)]
        root: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> error::Result<()> {
    let cli = Cli::parse();

    let overrides = AppConfig {
        log: LogConfig {
            level: cli.log_level.clone(),
            ..Default::default()
        },
        ..Default::default()
    };
    let config = AppConfig::load(cli.config.as_deref(), Some(&overrides));
    logging::init_logging(&config)?;

    let app = Arc::new(App::new(&config));

    match cli.command {
        Commands::Tree { root, expand } => {
            let root = root.unwrap_or_else(|| PathBuf::from(config.default_path()));
            let root = existing_path(&root)?;
            project_tree(&app, root.clone()).await?;
            let expand: Vec<PathBuf> = expand.iter().map(|p| normalize(p)).collect();
            expand_all(&app, &expand).await?;
            // Second fetch is a cache hit that includes the expansions.
            let tree = project_tree(&app, root).await?;
            print_tree(&tree, cli.json)?;
        }
        Commands::Cat { file } => {
            let app = Arc::clone(&app);
            let content =
                tokio::task::spawn_blocking(move || app.get_file_content(&file)).await??;
            print!("{content}");
        }
        Commands::Save { file, root } => {
            let root = match root {
                Some(root) => {
                    let root = existing_path(&root)?;
                    project_tree(&app, root.clone()).await?;
                    Some(root)
                }
                None => None,
            };

            let mut content = String::new();
            tokio::io::stdin()
                .read_to_string(&mut content)
                .await
                .map_err(|e| AppError::io("read_stdin", Path::new("-"), e))?;

            let saver = Arc::clone(&app);
            let invalidated =
                tokio::task::spawn_blocking(move || saver.save_file(&file, &content)).await??;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&invalidated)?);
            } else {
                for key in &invalidated {
                    println!("invalidated {}", key.display());
                }
            }

            if let Some(root) = root {
                let tree = project_tree(&app, root).await?;
                print_tree(&tree, cli.json)?;
            }
        }
    }

    Ok(())
}

fn existing_path(path: &Path) -> error::Result<PathBuf> {
    path.canonicalize()
        .map_err(|_| AppError::InvalidPath(format!("{} does not exist", path.display())))
}

async fn project_tree(app: &Arc<App>, root: PathBuf) -> error::Result<TreeNode> {
    let app = Arc::clone(app);
    tokio::task::spawn_blocking(move || app.get_project_files(&root)).await?
}

/// Expand directories wave by wave; each wave's expansions run concurrently.
async fn expand_all(app: &Arc<App>, dirs: &[PathBuf]) -> error::Result<()> {
    for wave in expansion_waves(dirs) {
        debug!(count = wave.len(), "expanding wave");
        let handles: Vec<_> = wave
            .into_iter()
            .map(|dir| {
                let app = Arc::clone(app);
                tokio::task::spawn_blocking(move || app.load_directory_contents(&dir))
            })
            .collect();
        for handle in handles {
            handle.await??;
        }
    }
    Ok(())
}

fn print_tree(tree: &TreeNode, json: bool) -> error::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(tree)?);
    } else {
        print!("{}", ui::render_tree(tree));
    }
    Ok(())
}
