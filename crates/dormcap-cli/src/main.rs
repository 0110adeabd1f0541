//! dormcap CLI — command-line client for the dorm-rating / caption-voting
//! backends.
//!
//! Set SUPABASE_URL, SUPABASE_ANON_KEY, and SUPABASE_ACCESS_TOKEN;
//! PIPELINE_API_URL overrides the captioning pipeline endpoint.

use std::sync::Arc;

use anyhow::Context;
use bytes::Bytes;
use clap::{Parser, Subcommand};
use serde::Serialize;
use uuid::Uuid;

use dormcap_cli::init_tracing;
use dormcap_client::{run_upload_and_caption, DbClient, PipelineClient, StaticToken};
use dormcap_core::models::{detect_content_type, CaptionVote, SelectedFile, VoteKind};
use dormcap_core::Config;

#[derive(Parser)]
#[command(name = "dormcap", about = "Dorm rating and caption voting CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all dorms
    Dorms,
    /// Upload an image and generate captions for it
    Upload {
        /// Path to the image file
        file: std::path::PathBuf,
    },
    /// Caption rating operations
    Captions {
        #[command(subcommand)]
        sub: CaptionCommands,
    },
    /// Vote on a caption
    Vote {
        /// Caption UUID
        caption_id: Uuid,
        /// Record a downvote instead of an upvote
        #[arg(long)]
        down: bool,
    },
}

#[derive(Subcommand)]
enum CaptionCommands {
    /// Fetch the next caption to rate
    Next,
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    dotenvy::dotenv().ok();

    let config = Config::from_env()
        .context("Failed to load configuration. Set SUPABASE_URL and SUPABASE_ANON_KEY")?;
    let token = Arc::new(StaticToken(config.require_access_token()?.to_string()));
    let db = DbClient::new(
        config.supabase_url.clone(),
        config.supabase_anon_key.clone(),
        token.clone(),
    )?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Dorms => {
            let dorms = db.list_dorms().await?;
            print_json(&dorms)?;
        }
        Commands::Upload { file } => {
            let bytes = std::fs::read(&file)
                .with_context(|| format!("Failed to read file: {}", file.display()))?;
            let name = file
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("image.jpg")
                .to_string();
            let content_type = detect_content_type(&bytes).map(str::to_string);

            let pipeline = PipelineClient::new(config.pipeline_api_url.clone(), token)?;
            let selected = SelectedFile::new(name, Bytes::from(bytes), content_type);
            let completed = run_upload_and_caption(&pipeline, selected).await?;
            print_json(&completed)?;
        }
        Commands::Captions { sub } => match sub {
            CaptionCommands::Next => match db.next_caption().await? {
                Some(caption) => print_json(&caption)?,
                None => print_json(&serde_json::json!({ "message": "No captions found to rate." }))?,
            },
        },
        Commands::Vote { caption_id, down } => {
            let user = db.current_user().await?;
            let caption = db
                .get_caption(caption_id)
                .await?
                .with_context(|| format!("Caption {} not found", caption_id))?;
            let kind = if down { VoteKind::Down } else { VoteKind::Up };
            let vote = CaptionVote::new(user.id, &caption, kind);
            db.record_vote(&vote).await?;
            print_json(&serde_json::json!({
                "success": true,
                "message": format!("Vote recorded for caption {}", caption_id)
            }))?;
        }
    }

    Ok(())
}
