use bytes::Bytes;
use clap::Parser;
use dotenvy::dotenv;
use image_compare_intake::infrastructure::preview::setup_stager;
use image_compare_intake::services::flow::images_needed;
use image_compare_intake::{CandidateFile, CompareWorkspace, IntakeConfig, IntakeEvent};
use serde_json::json;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Image files to stage
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Page to print (1-based, clamped)
    #[arg(short, long, default_value_t = 1)]
    page: usize,

    /// Grid page size, overrides the preset
    #[arg(long)]
    page_size: Option<usize>,

    /// Preview store backend (memory, disk)
    #[arg(long)]
    store: Option<String>,

    /// Config preset (env, dashboard, modal)
    #[arg(long, default_value = "env")]
    preset: String,

    /// Create a comparison with this name from the staged files
    #[arg(short, long)]
    name: Option<String>,

    /// Optional comparison description
    #[arg(short, long)]
    description: Option<String>,
}

async fn read_candidate(path: PathBuf) -> std::io::Result<CandidateFile> {
    let bytes = tokio::fs::read(&path).await?;
    let declared_type = infer::get(&bytes)
        .map(|kind| kind.mime_type().to_string())
        .unwrap_or_else(|| mime::APPLICATION_OCTET_STREAM.to_string());
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(CandidateFile::new(name, declared_type, Bytes::from(bytes)))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "image_compare_intake=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = IntakeConfig::from_env().with_preset(&args.preset);
    if let Some(page_size) = args.page_size {
        config.images_per_page = page_size;
    }
    if let Some(store) = args.store {
        config.preview_store_type = store;
    }

    let stager = setup_stager(config)?;
    let min_images = stager.config().min_images;

    info!("📥 Reading {} files...", args.files.len());
    let reads = futures::future::join_all(args.files.into_iter().map(read_candidate)).await;
    let batch = reads.into_iter().collect::<std::io::Result<Vec<_>>>()?;

    let mut workspace = CompareWorkspace::new(stager);
    let mut session = workspace.new_session();
    let outcome = session
        .update(IntakeEvent::Select(batch))
        .unwrap_or_default();

    let rejected: Vec<_> = outcome
        .rejected
        .iter()
        .map(|r| json!({ "name": r.name, "code": r.reason.code(), "reason": r.reason.to_string() }))
        .collect();

    let mut comparison = None;
    if let Some(name) = args.name {
        session.set_name(name);
        session.set_description(args.description.unwrap_or_default());
        match workspace.create_comparison(&mut session) {
            Ok(created) => comparison = Some(created.clone()),
            Err(e) => warn!("Comparison not created: {}", e),
        }
    }

    // Report whichever collection holds the images now
    let (page, count, state) = if comparison.is_some() {
        (
            workspace.page(args.page),
            workspace.images().len(),
            workspace.flow_state(),
        )
    } else {
        (
            session.page(args.page),
            session.images().len(),
            session.flow_state(),
        )
    };

    let report = json!({
        "flow_state": state,
        "images_needed": images_needed(count, min_images),
        "accepted": outcome.accepted_count(),
        "rejected": rejected,
        "overflow": outcome.overflow,
        "page": page,
        "comparison": comparison,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
