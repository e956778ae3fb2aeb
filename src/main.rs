// lingoscribe CLI: transcribe a WAV file into a speaker-labeled CSV.

use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use log::{error, info};

use lingoscribe::{
    AudioTrack, ConfigService, ModelCache, TranscriptPersister, TranscriptionPipeline,
};

fn usage() {
    eprintln!("lingoscribe — windowed transcription with speaker diarization");
    eprintln!();
    eprintln!("Usage: lingoscribe <audio.wav> [options]");
    eprintln!("  --config <path>   Config file (default: config.json)");
    eprintln!("  --output <path>   Transcript CSV (default: transcript.csv)");
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let mut audio_path: Option<PathBuf> = None;
    let mut config_path = PathBuf::from("config.json");
    let mut output_path = PathBuf::from("transcript.csv");

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                if let Some(path) = args.next() {
                    config_path = PathBuf::from(path);
                }
            }
            "--output" => {
                if let Some(path) = args.next() {
                    output_path = PathBuf::from(path);
                }
            }
            "--help" | "-h" => {
                usage();
                return;
            }
            other => audio_path = Some(PathBuf::from(other)),
        }
    }

    let audio_path = match audio_path {
        Some(path) => path,
        None => {
            usage();
            process::exit(2);
        }
    };

    if let Err(e) = run(&audio_path, &config_path, &output_path).await {
        error!("{}", e);
        process::exit(1);
    }
}

async fn run(
    audio_path: &PathBuf,
    config_path: &PathBuf,
    output_path: &PathBuf,
) -> Result<(), lingoscribe::PipelineError> {
    let config = ConfigService::load(config_path)?;
    let cache = Arc::new(ModelCache::new());

    let pipeline = TranscriptionPipeline::from_config(&config, cache)?;
    let audio = AudioTrack::load(audio_path)?;
    let persister = TranscriptPersister::new(output_path);

    let transcript = pipeline.run_and_persist(&audio, &persister).await?;
    info!(
        "Done: {} segments -> {}",
        transcript.len(),
        persister.path().display()
    );
    Ok(())
}
