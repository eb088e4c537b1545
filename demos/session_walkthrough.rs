//! Session Walkthrough: one dashboard session from start to finish
//!
//! Creates two experiments, chats with the protocol assistant, prints the
//! headline metrics and protocol suggestions, and uploads a small count
//! matrix to the prediction backend.
//!
//! The backend URL comes from `OSIRIS_BACKEND_URL` (default
//! `http://localhost:8080`). Without a running backend the prediction step
//! reports a connection error and the session carries on.
//!
//! Run with: RUST_LOG=osiris_core=debug cargo run --example session_walkthrough

use anyhow::Context;
use osiris_core::metrics::LineageAssessment;
use osiris_core::recommend::{recommend_protocol, LineageBias, ProtocolConstraints};
use osiris_core::{DashboardConfig, PredictionClient, SessionState, UploadedArtifact};
use tracing_subscriber::EnvFilter;

const COUNTS: &[u8] = b"gene,count\nCD34,142\nKIT,97\nGATA1,12\nFLT3,40\n";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = DashboardConfig::from_env().context("reading OSIRIS_* settings")?;
    println!("=== Osiris Session Walkthrough ===\n");
    println!("Backend: {}", config.backend_url());
    println!("Sample days: {}\n", config.sample_days());

    let client = PredictionClient::from_config(&config)?;
    let mut session = SessionState::new(config);

    let cord_blood = session.create_experiment("Cord blood expansion")?;
    session.create_experiment("Mobilized PB, low TPO")?;
    session.select_experiment(cord_blood.id())?;

    println!("=== Experiments ===");
    for experiment in &session.view().experiments {
        println!("  {} {}", experiment.id(), experiment.name());
    }

    println!("\n=== Protocol Assistant ===");
    for question in ["Hello", "How is self-renewal looking?", "Any protocol advice?"] {
        let reply = session.submit_chat_message(question)?;
        println!("  > {question}\n    {reply}");
    }

    let view = session.view();
    let active = view.active.context("an experiment is selected")?;

    println!("\n=== Key Metrics ===");
    if let Some(metrics) = active.key_metrics {
        println!(
            "  Self-renewal: {:.1} ({:+.1})",
            metrics.self_renewal.current,
            metrics.self_renewal.delta.unwrap_or_default()
        );
        println!(
            "  Multipotency: {:.1} ({:+.1})",
            metrics.multipotency.current,
            metrics.multipotency.delta.unwrap_or_default()
        );
    }

    println!("\n=== Top Genes ===");
    for entry in active.top_genes.iter().take(5) {
        println!("  {:<6} {:>4}  {}", entry.gene, entry.expression, entry.category);
    }

    if let Some(latest) = active.dataset.last() {
        let assessment = LineageAssessment::of(latest);
        println!("\n=== Lineage ===");
        println!("  {}", assessment.summary());
        println!("  Suggestion: {}", assessment.suggestion());

        let constraints = ProtocolConstraints {
            budget: Some(150.0),
            ..Default::default()
        };
        let recommendations = recommend_protocol(
            latest.self_renewal_score(),
            latest.multipotency_score(),
            LineageBias::from(latest),
            Some(&constraints),
        );
        println!("\n=== Protocol Recommendations (budget 150) ===");
        if recommendations.is_empty() {
            println!("  No adjustments needed");
        }
        for rec in &recommendations {
            println!(
                "  [{:.0}%] {} - {} ({})",
                rec.confidence * 100.0,
                rec.action,
                rec.rationale,
                rec.evidence
            );
        }
    }

    println!("\n=== Prediction ===");
    let artifact = UploadedArtifact::new("day14_counts.csv", COUNTS.to_vec())?;
    println!("  Uploading {} ({})", artifact.file_name(), artifact.size_label());
    match session.upload_and_predict(&client, artifact).await {
        Ok(()) => {
            let view = session.view();
            let active = view.active.context("an experiment is selected")?;
            for prediction in active.hsc_predictions.iter().chain(&active.lineage_predictions) {
                println!("  {:<10} {:.2}", prediction.class_name, prediction.probability);
            }
        }
        Err(err) => println!("  {err}"),
    }

    Ok(())
}
