use anyhow::Context;
use clap::Parser;
use colored::*;

use facemood::annotate::Annotator;
use facemood::args::Args;
use facemood::config::AppConfig;
use facemood::detector::RekognitionDetector;
use facemood::{AnalysisError, AnalysisSummary, Analyzer};

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    println!("{}", "INFO: Starting face image analysis".green());
    let result = run(&args).await;

    match result {
        Ok(summary) => {
            print_summary(&summary);
            println!("{}", "INFO: Face image analysis finished".green());
        }
        Err(e) => {
            eprintln!("{}", error_line(&e).red());
            std::process::exit(1);
        }
    }
}

async fn run(args: &Args) -> anyhow::Result<AnalysisSummary> {
    // Fail fast before reading config, credentials or fonts
    if !args.input.exists() {
        return Err(AnalysisError::InputNotFound(args.input.clone()).into());
    }

    let mut config = AppConfig::load(args.config.as_deref())?;
    if let Some(region) = &args.region {
        config.detection.region = region.clone();
    }

    let detector = RekognitionDetector::from_region(&config.detection.region).await;
    let annotator = Annotator::new(&config.annotation);
    let analyzer = Analyzer::new(Box::new(detector), annotator, config.output.clone());

    let summary = analyzer
        .run(&args.input, args.output.as_deref(), args.result.as_deref())
        .await
        .with_context(|| format!("Analysis of {} failed", args.input.display()))?;

    Ok(summary)
}

/// Missing input gets its own line, everything else the full cause chain.
fn error_line(e: &anyhow::Error) -> String {
    match e.downcast_ref::<AnalysisError>() {
        Some(AnalysisError::InputNotFound(path)) => {
            format!("ERROR: file {} not found", path.display())
        }
        _ => format!("ERROR: {:#}", e),
    }
}

fn print_summary(summary: &AnalysisSummary) {
    match summary.aggregate() {
        None => println!("{}", "WARN: No faces detected".yellow()),
        Some(agg) => {
            let score = agg
                .score
                .map(|s| format!("{:.2}", s))
                .unwrap_or_else(|| "-".to_string());
            println!(
                "INFO: {} face(s), {} smiling, smile score {}, total {:.2}",
                summary.faces(),
                agg.smiling,
                score,
                agg.total
            );
        }
    }
    println!("INFO: Report written to {}", summary.paths.csv.display());
    println!("INFO: Annotated image written to {}", summary.paths.image.display());
}
