use anyhow::{Context, Result};
use clap::Parser;
use owo_colors::OwoColorize;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use voxbridge::audio::wav;
use voxbridge::cli::{Cli, Commands};
use voxbridge::config::Config;
use voxbridge::pipeline::run::RunStatus;
use voxbridge::recognize::cloud::{CloudRecognizer, CloudRecognizerConfig};
use voxbridge::recognize::engine::RecognitionEngine;
use voxbridge::synth::engine::SynthesisEngine;
use voxbridge::synth::espeak::{EspeakSynthesizer, EspeakSynthesizerConfig};
use voxbridge::synth::network::{NetworkSynthesizer, NetworkSynthesizerConfig};
use voxbridge::translate::google::{GoogleTranslator, GoogleTranslatorConfig};
use voxbridge::translate::TranslationCache;
use voxbridge::{
    CancelToken, Orchestrator, RecognitionAdapter, RunConfig, SynthesisAdapter, TranslationAdapter,
    languages,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose);

    match cli.command {
        Some(Commands::Languages) => {
            list_languages();
            Ok(())
        }
        None => run_translate(cli).await,
    }
}

fn init_tracing(quiet: bool, verbose: u8) {
    let default = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("voxbridge={default}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn list_languages() {
    for (code, name) in languages::sorted_by_name() {
        println!("{}  {}", code.bold(), name);
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(p) => Config::load(p).with_context(|| format!("loading config {}", p.display()))?,
        None => Config::load_or_default(&Config::default_path())?,
    };
    let config = config.with_env_overrides();
    config.validate()?;
    Ok(config)
}

async fn run_translate(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;

    let clip = match &cli.input {
        Some(path) => {
            wav::clip_from_file(path).with_context(|| format!("reading {}", path.display()))?
        }
        None => {
            if std::io::stdin().is_terminal() {
                anyhow::bail!("no input: pass a WAV file or pipe WAV data to stdin");
            }
            wav::clip_from_reader(std::io::stdin().lock()).context("reading WAV from stdin")?
        }
    };

    let source = cli
        .source
        .unwrap_or_else(|| config.languages.default_source.clone());
    let target = cli
        .target
        .unwrap_or_else(|| config.languages.default_target.clone());

    let orchestrator = build_orchestrator(&config);
    let run_config = RunConfig {
        min_clip_secs: config.audio.min_clip_secs,
        max_clip_secs: config.audio.max_clip_secs,
    };
    let cancel = CancelToken::new();
    {
        let cancel = cancel.clone();
        ctrlc_handler(move || cancel.cancel());
    }

    let run = orchestrator
        .run(&clip, &source, &target, &run_config, &cancel)
        .await;

    if let Some(recognition) = &run.recognition
        && !cli.quiet
    {
        println!("{} {}", "recognized:".dimmed(), recognition.text);
    }
    if let Some(translation) = &run.translation
        && !cli.quiet
    {
        let cached = if translation.cached { " (cached)" } else { "" };
        println!(
            "{} {}{}",
            "translated:".dimmed(),
            translation.text.bold(),
            cached
        );
    }

    match run.status {
        RunStatus::Done => {
            // run is Done, synthesis is present
            let synthesis = run
                .synthesis
                .ok_or_else(|| anyhow::anyhow!("done run without synthesis output"))?;
            let out_path = output_path(cli.output, synthesis.format.extension());
            std::fs::write(&out_path, &synthesis.audio)
                .with_context(|| format!("writing {}", out_path.display()))?;
            if !cli.quiet {
                println!(
                    "{} {} ({} bytes, {} engine, {:.1}s)",
                    "wrote".green(),
                    out_path.display(),
                    synthesis.audio.len(),
                    synthesis.engine,
                    run.elapsed.as_secs_f32()
                );
            }
            Ok(())
        }
        _ => {
            let failure = run
                .failure
                .ok_or_else(|| anyhow::anyhow!("failed run without failure record"))?;
            anyhow::bail!("{} stage failed: {}", failure.stage, failure.error)
        }
    }
}

fn output_path(requested: Option<PathBuf>, extension: &str) -> PathBuf {
    match requested {
        Some(path) if path.extension().is_some() => path,
        Some(path) => path.with_extension(extension),
        None => PathBuf::from(format!("voxbridge-output.{extension}")),
    }
}

fn build_orchestrator(config: &Config) -> Orchestrator {
    #[cfg_attr(not(feature = "whisper"), allow(unused_mut))]
    let mut engines: Vec<Arc<dyn RecognitionEngine>> = vec![Arc::new(CloudRecognizer::new(
        CloudRecognizerConfig {
            endpoint: config
                .recognition
                .endpoint
                .clone()
                .unwrap_or_else(|| CloudRecognizerConfig::default().endpoint),
            api_key: config.recognition.api_key.clone(),
        },
    ))];
    #[cfg(feature = "whisper")]
    {
        use voxbridge::recognize::whisper::{WhisperConfig, WhisperRecognizer};
        let whisper_config = WhisperConfig {
            model_path: PathBuf::from(format!("models/ggml-{}.bin", config.recognition.model)),
            threads: None,
        };
        match WhisperRecognizer::new(whisper_config) {
            Ok(engine) => engines.push(Arc::new(engine)),
            Err(e) => tracing::warn!(error = %e, "local recognition engine unavailable"),
        }
    }
    let stage_timeout = Duration::from_secs(config.pipeline.stage_timeout_secs);
    let recognition = RecognitionAdapter::new(engines)
        .with_energy_threshold(config.recognition.energy_threshold)
        .with_timeout(stage_timeout);

    let mut translation = TranslationAdapter::new(Arc::new(GoogleTranslator::new(
        GoogleTranslatorConfig {
            endpoint: config
                .translation
                .endpoint
                .clone()
                .unwrap_or_else(|| GoogleTranslatorConfig::default().endpoint),
        },
    )))
    .with_max_attempts(config.translation.max_attempts)
    .with_retry_delay(Duration::from_millis(config.translation.retry_delay_ms))
    .with_timeout(stage_timeout);
    if config.translation.cache_enabled {
        translation =
            translation.with_cache(Arc::new(TranslationCache::new(config.translation.cache_size)));
    }

    let synth_engines: Vec<Arc<dyn SynthesisEngine>> = vec![
        Arc::new(NetworkSynthesizer::new(NetworkSynthesizerConfig {
            endpoint: config
                .synthesis
                .endpoint
                .clone()
                .unwrap_or_else(|| NetworkSynthesizerConfig::default().endpoint),
            slow: config.synthesis.slow,
        })),
        Arc::new(EspeakSynthesizer::new(EspeakSynthesizerConfig {
            program: config.synthesis.espeak_program.clone(),
            ..Default::default()
        })),
    ];
    let synthesis = SynthesisAdapter::new(synth_engines).with_timeout(stage_timeout);

    Orchestrator::new(recognition, translation, synthesis)
}

/// Flip the cancel flag on Ctrl-C; a second Ctrl-C aborts the process.
fn ctrlc_handler(cancel: impl Fn() + Send + 'static) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel();
        }
        if tokio::signal::ctrl_c().await.is_ok() {
            std::process::exit(130);
        }
    });
}
