//! Interview Coach — terminal entry point.
//!
//! # Startup sequence
//!
//! 1. Initialise logging and load `.env`.
//! 2. Load [`AppConfig`] from disk (writing defaults on first run) and apply env keys.
//! 3. Ask for an API key if none was found.
//! 4. Build the collaborators: model client, microphone recorder, Whisper
//!    engine (loaded once) and speaker.
//! 5. Walk the session stages, printing questions and feedback.

use std::sync::Arc;

use anyhow::Context;
use interview_coach::{
    audio::MicRecorder,
    config::{AppConfig, AppPaths},
    interview::InterviewError,
    llm::ApiClient,
    session::{InterviewSession, SessionSettings, Stage},
    stt::load_engine,
    terminal::Console,
    tts::speaker_from_config,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Err(e) = dotenvy::dotenv() {
        log::debug!("no .env loaded: {e}");
    }
    log::info!("Interview Coach starting up");

    let mut config = AppConfig::load_or_create().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });
    config.apply_env();
    let paths = AppPaths::new();
    let mut console = Console::stdio();

    if config.llm.api_key().is_none() {
        config.llm.api_key = Some(console.read_api_key()?);
    }
    let llm = ApiClient::from_config(&config.llm).context("building the model client")?;

    let settings = SessionSettings::from_config(&config, &paths);
    let answer_secs = settings.answer_duration.as_secs();
    let mut session = InterviewSession::new(
        Arc::new(llm),
        Arc::new(MicRecorder::new()),
        load_engine(&config.stt, &paths),
        speaker_from_config(&config.tts, &paths),
        settings,
    );

    // ── CollectJobInfo ──────────────────────────────────────────────────
    let info = console.read_job_info()?;
    let difficulty = console.read_difficulty()?;
    session.collect_job_info(info, difficulty)?;

    // ── AnalyzeJob ──────────────────────────────────────────────────────
    console.say("Analyzing the job description...")?;
    match session.analyze_job().await {
        Ok(analysis) => {
            let analysis = analysis.clone();
            console.show_analysis(&analysis)?;
        }
        Err(e) => {
            console.say(format!("Job analysis failed: {e}"))?;
            return Ok(());
        }
    }

    // ── ConfigureQuestionCounts ─────────────────────────────────────────
    let counts = console.read_counts(config.interview.max_per_category)?;
    console.say("Generating questions...")?;
    if let Err(e) = session.configure_counts(counts).await {
        console.say(format!("Question generation failed: {e}"))?;
        return Ok(());
    }

    // ── AskAndRecord ────────────────────────────────────────────────────
    while let Some((_, question)) = session.context().current_question() {
        let question = question.clone();
        console.show_question(session.context(), &question)?;
        console.say(format!("Recording for {answer_secs} seconds... speak now!"))?;
        match session.ask_next().await {
            Ok(answer) if answer.is_empty() => console.say("(nothing was transcribed)")?,
            Ok(answer) => {
                let transcript = answer.transcript.clone();
                console.say(format!("You said: {transcript}"))?;
            }
            Err(e) => console.say(format!("Answer not captured: {e}"))?,
        }
    }

    // ── Evaluate ────────────────────────────────────────────────────────
    if session.stage() != Stage::Evaluate {
        return Ok(());
    }
    console.say("Evaluating your answers...")?;
    match session.evaluate().await {
        Ok(evaluations) => {
            let evaluations = evaluations.to_vec();
            console.show_evaluations(session.context(), &evaluations)?;
        }
        Err(InterviewError::Input(msg)) => console.say(format!("Nothing to evaluate: {msg}"))?,
        Err(e) => console.say(format!("Evaluation failed: {e}"))?,
    }

    log::info!("Interview Coach finished");
    Ok(())
}
