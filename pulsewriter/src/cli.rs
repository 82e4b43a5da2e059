//! CLI interface for pulsewriter: command parsing, validation and
//! orchestration. Core transform logic lives in `pulsewriter-core`; this
//! module is strictly glue.
//!
//! The async entrypoint [`run`] is public so integration tests can invoke the
//! CLI programmatically with a constructed [`Cli`].

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use pulsewriter_core::io::{load_markdown, save_text};
use pulsewriter_core::{generate, DraftSet, Platform, Renderer, TransformConfig};
use uuid::Uuid;

use crate::api;
use crate::discover::get_latest_post;
use crate::github::{publish_file, GitHubClient};
use crate::load_config::load_runtime_config;

/// CLI for pulsewriter: turn one markdown post into platform drafts.
#[derive(Parser)]
#[clap(
    name = "pulsewriter",
    version,
    about = "Transform a markdown post into blog/LinkedIn/X/dev.to drafts"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Transform one markdown file into platform drafts
    Transform {
        /// Input markdown file
        input_md: PathBuf,
        /// Platforms to generate
        #[clap(long = "platforms", default_values_t = default_platform_args())]
        platforms: Vec<String>,
        /// Output directory
        #[clap(long, default_value = "./out")]
        out_dir: PathBuf,
        /// Tone (meta, practical, inspiring...)
        #[clap(long, default_value = "practical")]
        tone: String,
        /// Persona label
        #[clap(long, default_value = "action-oriented")]
        persona: String,
        /// Target word count (hint)
        #[clap(long, default_value_t = 600)]
        word_target: u32,
    },
    /// Transform the most recently modified post from the configured posts_dir
    Last {
        /// Platforms to generate; overrides config
        #[clap(long = "platforms")]
        platforms: Option<Vec<String>>,
        /// Output directory; overrides config
        #[clap(long)]
        out_dir: Option<PathBuf>,
        /// Show what would be transformed without writing files
        #[clap(long)]
        dry_run: bool,
    },
    /// Run the HTTP API
    Serve {
        #[clap(long, default_value = "127.0.0.1")]
        host: String,
        #[clap(long, default_value_t = 8000)]
        port: u16,
    },
    /// Publish a generated draft file as a pull request
    Publish {
        /// File to publish
        file: PathBuf,
        /// Target repository, e.g. owner/name
        #[clap(long)]
        repo: String,
        /// Branch to create; generated when omitted
        #[clap(long)]
        branch: Option<String>,
        /// Path for the file inside the repository
        #[clap(long)]
        path: Option<String>,
        /// Pull request title
        #[clap(long)]
        title: Option<String>,
        /// Pull request body
        #[clap(long)]
        body: Option<String>,
    },
}

fn default_platform_args() -> Vec<String> {
    Platform::ALL.iter().map(|p| p.to_string()).collect()
}

/// CLI failure split by who can fix it: usage errors exit 2, internal errors
/// exit 1. Messages go to stderr in `main`.
#[derive(Debug)]
pub enum CliError {
    Usage(String),
    Internal(anyhow::Error),
}

impl CliError {
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Usage(_) => 2,
            CliError::Internal(_) => 1,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Usage(msg) => f.write_str(msg),
            CliError::Internal(err) => write!(f, "Error: {err:#}"),
        }
    }
}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::Internal(err)
    }
}

/// Extracted async CLI entrypoint for integration tests and main().
pub async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Transform {
            input_md,
            platforms,
            out_dir,
            tone,
            persona,
            word_target,
        } => {
            let platforms = validate_platforms(&platforms)?;
            let raw = load_markdown(&input_md)
                .map_err(|e| CliError::Usage(format!("Cannot read input file: {e:#}")))?;
            let stem = file_stem(&input_md)?;

            let renderer = renderer()?;
            let config = TransformConfig {
                tone,
                persona,
                word_target,
            };
            let outputs = generate(&renderer, &raw, &platforms, &config)
                .map_err(|e| CliError::Internal(e.into()))?;

            for path in write_drafts(&outputs, &out_dir, &stem)? {
                println!("Wrote {}", path.display());
            }
            Ok(())
        }

        Commands::Last {
            platforms,
            out_dir,
            dry_run,
        } => {
            let config = load_runtime_config()?;
            let posts_dir = normalize_path(&config.posts_dir);
            let effective_out_dir = normalize_path(&out_dir.unwrap_or(config.out_dir));
            let platform_ids = platforms.unwrap_or(config.default_platforms);

            let effective_platforms = validate_platforms(&platform_ids)?;

            if !posts_dir.exists() {
                return Err(CliError::Usage(format!(
                    "Posts directory not found: {}. Set 'posts_dir' in .pulsewriter.yaml.",
                    posts_dir.display()
                )));
            }

            let latest = get_latest_post(&posts_dir).ok_or_else(|| {
                CliError::Usage(format!(
                    "No Markdown posts found in {}",
                    posts_dir.display()
                ))
            })?;
            let name = latest
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();

            if dry_run {
                println!(
                    "Would transform: {} -> platforms={:?} out_dir='{}'",
                    name,
                    platform_ids,
                    effective_out_dir.display()
                );
                return Ok(());
            }

            fs::create_dir_all(&effective_out_dir).map_err(|e| {
                CliError::Internal(anyhow::anyhow!(
                    "Failed to create output dir {}: {e}",
                    effective_out_dir.display()
                ))
            })?;

            let raw = load_markdown(&latest)?;
            let stem = file_stem(&latest)?;
            let renderer = renderer()?;
            let outputs = generate(
                &renderer,
                &raw,
                &effective_platforms,
                &TransformConfig::default(),
            )
            .map_err(|e| CliError::Internal(e.into()))?;

            write_drafts(&outputs, &effective_out_dir, &stem)?;
            println!(
                "Transformed: {} -> platforms={:?} out_dir='{}'",
                name,
                platform_ids,
                effective_out_dir.display()
            );
            Ok(())
        }

        Commands::Serve { host, port } => {
            let renderer = renderer()?;
            api::serve(&host, port, renderer)
                .await
                .map_err(CliError::Internal)
        }

        Commands::Publish {
            file,
            repo,
            branch,
            path,
            title,
            body,
        } => {
            let content = load_markdown(&file)
                .map_err(|e| CliError::Usage(format!("Cannot read file to publish: {e:#}")))?;
            let file_name = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .ok_or_else(|| {
                    CliError::Usage(format!("Not a publishable file: {}", file.display()))
                })?;

            let branch =
                branch.unwrap_or_else(|| format!("pulsewriter/draft-{}", Uuid::new_v4()));
            let dest_path = path.unwrap_or_else(|| format!("drafts/{file_name}"));
            let title = title.unwrap_or_else(|| format!("add {dest_path}"));
            let body = body.unwrap_or_else(|| "Automated draft publication.".to_string());

            let client = GitHubClient::from_env().map_err(|e| CliError::Usage(format!("{e:#}")))?;
            let url = publish_file(&client, &repo, &branch, &dest_path, &content, &title, &body)
                .await
                .map_err(CliError::Internal)?;
            println!("Opened {url}");
            Ok(())
        }
    }
}

fn renderer() -> Result<Renderer, CliError> {
    Renderer::new().map_err(|e| CliError::Internal(e.into()))
}

/// Validate user-supplied platform identifiers, collecting every invalid one
/// for the error message.
fn validate_platforms(identifiers: &[String]) -> Result<Vec<Platform>, CliError> {
    let mut platforms = Vec::with_capacity(identifiers.len());
    let mut invalid = Vec::new();
    for id in identifiers {
        match id.parse::<Platform>() {
            Ok(platform) => platforms.push(platform),
            Err(err) => invalid.push(err.0),
        }
    }
    if !invalid.is_empty() {
        return Err(CliError::Usage(format!(
            "Invalid platform(s): {}. Allowed: blog, devto, linkedin, x",
            invalid.join(", ")
        )));
    }
    Ok(platforms)
}

fn normalize_path(path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    }
}

fn file_stem(path: &Path) -> Result<String, CliError> {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .ok_or_else(|| CliError::Usage(format!("Input file has no usable name: {}", path.display())))
}

/// Write one file per draft, named `{stem}.{output_key}{ext}`. Keys ending in
/// `_md` get a `.md` extension, everything else `.txt`.
fn write_drafts(
    outputs: &DraftSet,
    out_dir: &Path,
    stem: &str,
) -> Result<Vec<PathBuf>, CliError> {
    let mut written = Vec::with_capacity(outputs.len());
    for (key, text) in outputs {
        let ext = if key.ends_with("_md") { ".md" } else { ".txt" };
        let path = out_dir.join(format!("{stem}.{key}{ext}"));
        save_text(&path, text)?;
        written.push(path);
    }
    Ok(written)
}
