//! Interview Coach — desktop widget entry point.
//!
//! # Startup sequence
//!
//! 1. Initialise logging and load `.env`.
//! 2. Load [`AppConfig`] from disk (writing defaults on first run) and apply env keys.
//! 3. Create [`tokio`] runtime (multi-thread, 2 workers).
//! 4. Build the session with a placeholder model client; the real client is
//!    installed once the key is validated.
//! 5. Create worker channels (`command`, `event`).
//! 6. Run [`eframe::run_native`]; the session worker is spawned from the
//!    app creator so it can request repaints.

use std::sync::Arc;

use eframe::egui;
use tokio::sync::mpsc;
use interview_coach::{
    app::{run_worker, CoachApp, SessionCommand, SessionEvent},
    audio::MicRecorder,
    config::{AppConfig, AppPaths},
    llm::NoApiKey,
    session::{InterviewSession, SessionSettings},
    stt::load_engine,
    tts::speaker_from_config,
};

fn native_options() -> eframe::NativeOptions {
    let vp = egui::ViewportBuilder::default()
        .with_title("Interview Coach")
        .with_inner_size([900.0, 650.0])
        .with_min_inner_size([640.0, 480.0]);

    eframe::NativeOptions {
        viewport: vp,
        ..Default::default()
    }
}

fn main() -> eframe::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Err(e) = dotenvy::dotenv() {
        log::debug!("no .env loaded: {e}");
    }
    log::info!("Interview Coach widget starting up");

    // 2. Configuration
    let mut config = AppConfig::load_or_create().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });
    config.apply_env();
    let paths = AppPaths::new();

    // 3. Tokio runtime (2 worker threads: recording/STT and model calls)
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .map_err(|e| eframe::Error::AppCreation(Box::new(e)))?;

    // 4. Session
    let settings = SessionSettings::from_config(&config, &paths);
    let answer_secs = settings.answer_duration.as_secs() as u32;
    let session = InterviewSession::new(
        Arc::new(NoApiKey),
        Arc::new(MicRecorder::new()),
        load_engine(&config.stt, &paths),
        speaker_from_config(&config.tts, &paths),
        settings,
    );

    // 5. Channel setup
    let (command_tx, command_rx) = mpsc::channel::<SessionCommand>(16);
    let (event_tx, event_rx) = mpsc::channel::<SessionEvent>(32);

    // 6. Run the widget (blocks until the window is closed)
    let llm_config = config.llm.clone();
    let handle = rt.handle().clone();
    eframe::run_native(
        "Interview Coach",
        native_options(),
        Box::new(move |cc| {
            handle.spawn(run_worker(
                session,
                llm_config,
                answer_secs,
                command_rx,
                event_tx,
                Some(cc.egui_ctx.clone()),
            ));
            Ok(Box::new(CoachApp::new(command_tx, event_rx, &config)))
        }),
    )
}
