use clap::Parser;
use std::path::PathBuf;

/// Analyze the faces in a photo and export emotion scores as CSV
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Image containing the faces to analyze
    #[arg(short, long = "input")]
    pub input: PathBuf,

    /// CSV file for the analysis result (default: <input name>_result.csv)
    #[arg(short, long = "output")]
    pub output: Option<PathBuf>,

    /// Annotated image file (default: <input name>_result.<input ext>)
    #[arg(short, long = "result")]
    pub result: Option<PathBuf>,

    /// JSON configuration file (default: ./facemood.json if present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// AWS region of the detection service, overrides the configuration
    #[arg(long)]
    pub region: Option<String>,
}
