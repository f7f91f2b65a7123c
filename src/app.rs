//! Interview Coach widget — egui/eframe application.
//!
//! # Architecture
//!
//! [`CoachApp`] is the top-level [`eframe::App`].  It never touches the
//! network, microphone or model itself; it owns two channel endpoints:
//!
//! * `command_tx` — sends [`SessionCommand`]s to [`run_worker`].
//! * `event_rx`   — receives [`SessionEvent`]s carrying [`SessionContext`]
//!   snapshots and errors.
//!
//! [`run_worker`] runs on the tokio runtime and owns the one
//! [`InterviewSession`].
//!
//! # Pages
//!
//! | Condition | Page |
//! |-----------|------|
//! | key not validated | API key entry |
//! | `CollectJobInfo` / `AnalyzeJob` | job profile, description, difficulty |
//! | `ConfigureQuestionCounts`, not confirmed | job analysis review |
//! | `ConfigureQuestionCounts`, confirmed | question counts + estimate |
//! | `AskAndRecord` | question, tips, progress, record button |
//! | `Evaluate` | summary + evaluate button |
//! | `Complete` | feedback per question + new interview |

use std::sync::Arc;
use std::time::{Duration, Instant};

use eframe::egui;
use tokio::sync::mpsc;

use crate::config::{AppConfig, LlmConfig};
use crate::interview::{Category, Difficulty, JobInfo, QuestionCounts};
use crate::llm::ApiClient;
use crate::session::{
    estimated_minutes, InterviewSession, SessionContext, Stage, StepStatus, MAX_ANSWER_SECS,
};

// ---------------------------------------------------------------------------
// Worker message types
// ---------------------------------------------------------------------------

/// Commands sent from the UI thread to the session worker.
#[derive(Debug, Clone)]
pub enum SessionCommand {
    /// Check `key` with a `"Hello"` request and use it from then on.
    ValidateKey(String),
    /// Store the job details and analyse them.
    SubmitJob { info: JobInfo, difficulty: Difficulty },
    /// Generate questions for the given counts.
    Generate(QuestionCounts),
    /// Read the current question aloud again.
    SpeakQuestion,
    /// Record and transcribe the answer to the current question.
    RecordAnswer,
    Evaluate,
    /// Discard the session and start over.
    Reset,
}

impl SessionCommand {
    /// Whether the worker always answers with a snapshot, key result or
    /// error.  Only these may put the UI into its busy state.
    pub fn expects_reply(&self) -> bool {
        !matches!(self, SessionCommand::SpeakQuestion)
    }
}

/// Progress and results delivered from the worker to the UI.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    KeyValidated,
    /// Long-running work started; the text describes it.
    Busy(String),
    /// New session snapshot; also ends any busy state.
    Updated(SessionContext),
    /// A stage failed; the session stays where it was.
    Error(String),
}

// ---------------------------------------------------------------------------
// Worker
// ---------------------------------------------------------------------------

/// Own `session` and execute commands until `commands` is closed.
///
/// `repaint` is poked after every event so the UI wakes up promptly.
pub async fn run_worker(
    mut session: InterviewSession,
    llm_config: LlmConfig,
    answer_secs: u32,
    mut commands: mpsc::Receiver<SessionCommand>,
    events: mpsc::Sender<SessionEvent>,
    repaint: Option<egui::Context>,
) {
    let emit = |event: SessionEvent| {
        let events = events.clone();
        let repaint = repaint.clone();
        async move {
            let _ = events.send(event).await;
            if let Some(ctx) = repaint {
                ctx.request_repaint();
            }
        }
    };

    while let Some(command) = commands.recv().await {
        log::debug!("worker: {command:?}");
        match command {
            SessionCommand::ValidateKey(key) => {
                emit(SessionEvent::Busy("Validating API key...".into())).await;
                let client = ApiClient::with_api_key(&llm_config, key);
                match client.validate().await {
                    Ok(()) => {
                        log::info!("worker: API key accepted");
                        session.set_llm(Arc::new(client));
                        emit(SessionEvent::KeyValidated).await;
                    }
                    Err(e) => {
                        log::warn!("worker: API key rejected: {e}");
                        emit(SessionEvent::Error(format!("Invalid API key: {e}"))).await;
                    }
                }
            }

            SessionCommand::SubmitJob { info, difficulty } => {
                // A failed analysis leaves the old job info behind.
                if session.stage() == Stage::AnalyzeJob {
                    session.reset();
                }
                if let Err(e) = session.collect_job_info(info, difficulty) {
                    emit(SessionEvent::Error(e.to_string())).await;
                    continue;
                }
                emit(SessionEvent::Busy("Analyzing job description...".into())).await;
                let result = session.analyze_job().await.map(|_| ());
                emit(SessionEvent::Updated(session.context().clone())).await;
                if let Err(e) = result {
                    emit(SessionEvent::Error(format!("Job analysis failed: {e}"))).await;
                }
            }

            SessionCommand::Generate(counts) => {
                emit(SessionEvent::Busy("Generating questions...".into())).await;
                match session.configure_counts(counts).await {
                    Ok(_) => {
                        emit(SessionEvent::Updated(session.context().clone())).await;
                        session.speak_current().await;
                    }
                    Err(e) => {
                        emit(SessionEvent::Updated(session.context().clone())).await;
                        emit(SessionEvent::Error(format!("Question generation failed: {e}"))).await;
                    }
                }
            }

            SessionCommand::SpeakQuestion => {
                session.speak_current().await;
            }

            SessionCommand::RecordAnswer => {
                emit(SessionEvent::Busy(format!(
                    "Recording for {answer_secs} seconds... speak now!"
                )))
                .await;
                let result = session.record_current().await.map(|_| ());
                emit(SessionEvent::Updated(session.context().clone())).await;
                match result {
                    Ok(()) => session.speak_current().await,
                    Err(e) => emit(SessionEvent::Error(format!("Answer not captured: {e}"))).await,
                }
            }

            SessionCommand::Evaluate => {
                emit(SessionEvent::Busy("Evaluating your answers...".into())).await;
                let result = session.evaluate().await.map(|_| ());
                emit(SessionEvent::Updated(session.context().clone())).await;
                if let Err(e) = result {
                    emit(SessionEvent::Error(format!("Evaluation failed: {e}"))).await;
                }
            }

            SessionCommand::Reset => {
                session.reset();
                emit(SessionEvent::Updated(session.context().clone())).await;
            }
        }
    }

    log::info!("worker: command channel closed, shutting down");
}

// ---------------------------------------------------------------------------
// Page selection
// ---------------------------------------------------------------------------

/// Which page the central panel shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    ApiKey,
    JobForm,
    AnalysisReview,
    QuestionCounts,
    Question,
    ReadyToEvaluate,
    Results,
}

pub fn page_for(key_validated: bool, analysis_confirmed: bool, stage: Stage) -> Page {
    if !key_validated {
        return Page::ApiKey;
    }
    match stage {
        Stage::CollectJobInfo | Stage::AnalyzeJob => Page::JobForm,
        Stage::ConfigureQuestionCounts if analysis_confirmed => Page::QuestionCounts,
        Stage::ConfigureQuestionCounts => Page::AnalysisReview,
        Stage::AskAndRecord => Page::Question,
        Stage::Evaluate => Page::ReadyToEvaluate,
        Stage::Complete => Page::Results,
    }
}

// ---------------------------------------------------------------------------
// CoachApp
// ---------------------------------------------------------------------------

const ACCENT: egui::Color32 = egui::Color32::from_rgb(68, 136, 255);
const GOOD: egui::Color32 = egui::Color32::from_rgb(80, 200, 120);
const WARN: egui::Color32 = egui::Color32::from_rgb(255, 136, 68);
const DIM: egui::Color32 = egui::Color32::from_rgb(140, 140, 140);

/// eframe application: the multi-step interview widget.
pub struct CoachApp {
    /// Latest snapshot received from the worker.
    snapshot: SessionContext,
    key_validated: bool,
    analysis_confirmed: bool,

    // ── Form fields ──────────────────────────────────────────────────────
    api_key_input: String,
    profile_input: String,
    description_input: String,
    difficulty: Difficulty,
    counts: QuestionCounts,

    // ── Status ───────────────────────────────────────────────────────────
    busy: Option<(String, Instant)>,
    error_message: Option<String>,

    // ── Channels ─────────────────────────────────────────────────────────
    command_tx: mpsc::Sender<SessionCommand>,
    event_rx: mpsc::Receiver<SessionEvent>,

    max_per_category: u32,
    answer_secs: u32,
}

impl CoachApp {
    /// Create the app.  A key already present in `config` is validated
    /// straight away.
    pub fn new(
        command_tx: mpsc::Sender<SessionCommand>,
        event_rx: mpsc::Receiver<SessionEvent>,
        config: &AppConfig,
    ) -> Self {
        let api_key_input = config.llm.api_key().unwrap_or_default().to_string();
        let mut app = Self {
            snapshot: SessionContext::new(),
            key_validated: false,
            analysis_confirmed: false,
            api_key_input,
            profile_input: String::new(),
            description_input: String::new(),
            difficulty: config.interview.difficulty,
            counts: config.interview.counts,
            busy: None,
            error_message: None,
            command_tx,
            event_rx,
            max_per_category: config.interview.max_per_category,
            answer_secs: config.audio.answer_secs.clamp(1, MAX_ANSWER_SECS),
        };
        if !app.api_key_input.is_empty() {
            let key = app.api_key_input.clone();
            app.send(SessionCommand::ValidateKey(key));
        }
        app
    }

    fn page(&self) -> Page {
        page_for(self.key_validated, self.analysis_confirmed, self.snapshot.stage)
    }

    /// Queue `command` for the worker.  Commands that get a reply disable the
    /// controls at once so a double click cannot queue them twice.
    fn send(&mut self, command: SessionCommand) {
        self.error_message = None;
        let expects_reply = command.expects_reply();
        match self.command_tx.try_send(command) {
            Ok(()) if expects_reply => {
                self.busy = Some(("Working...".into(), Instant::now()));
            }
            Ok(()) => {}
            Err(e) => {
                log::error!("ui: could not reach session worker: {e}");
                self.error_message = Some("The session worker is not responding.".into());
            }
        }
    }

    // ── Channel polling ──────────────────────────────────────────────────

    /// Drain all pending worker events (non-blocking).
    fn poll_events(&mut self) {
        while let Ok(event) = self.event_rx.try_recv() {
            match event {
                SessionEvent::KeyValidated => {
                    self.key_validated = true;
                    self.busy = None;
                }
                SessionEvent::Busy(text) => {
                    self.busy = Some((text, Instant::now()));
                }
                SessionEvent::Updated(snapshot) => {
                    if snapshot.stage != Stage::ConfigureQuestionCounts {
                        self.analysis_confirmed = false;
                    }
                    self.snapshot = snapshot;
                    self.busy = None;
                }
                SessionEvent::Error(message) => {
                    self.error_message = Some(message);
                    self.busy = None;
                }
            }
        }
    }

    fn start_over(&mut self) {
        self.analysis_confirmed = false;
        self.profile_input.clear();
        self.description_input.clear();
        self.send(SessionCommand::Reset);
    }

    // ── Sidebar ──────────────────────────────────────────────────────────

    fn draw_steps(&mut self, ui: &mut egui::Ui) {
        ui.heading("Interview Coach");
        ui.add_space(8.0);

        let current = self.snapshot.stage;
        for (i, step) in Stage::STEPS.iter().enumerate() {
            let status = if self.key_validated {
                current.step_status(*step)
            } else {
                StepStatus::Pending
            };
            let color = match status {
                StepStatus::Done => GOOD,
                StepStatus::Current => ACCENT,
                StepStatus::Pending => DIM,
            };
            ui.label(
                egui::RichText::new(format!("{} {}. {}", status.marker(), i + 1, step.label()))
                    .color(color),
            );
        }

        if self.key_validated && current != Stage::CollectJobInfo {
            ui.add_space(12.0);
            ui.separator();
            if ui
                .add_enabled(self.busy.is_none(), egui::Button::new("Start New Interview"))
                .clicked()
            {
                self.start_over();
            }
        }
    }

    // ── Pages ────────────────────────────────────────────────────────────

    fn draw_api_key(&mut self, ui: &mut egui::Ui) {
        ui.heading("API Key");
        ui.label("Paste your Gemini API key to begin.");
        ui.add_space(6.0);
        ui.add(
            egui::TextEdit::singleline(&mut self.api_key_input)
                .password(true)
                .hint_text("API key")
                .desired_width(360.0),
        );
        ui.add_space(6.0);
        let ready = !self.api_key_input.trim().is_empty() && self.busy.is_none();
        if ui.add_enabled(ready, egui::Button::new("Validate")).clicked() {
            let key = self.api_key_input.trim().to_string();
            self.send(SessionCommand::ValidateKey(key));
        }
    }

    fn draw_job_form(&mut self, ui: &mut egui::Ui) {
        ui.heading("Step 1: Job Information");
        ui.add_space(6.0);

        ui.label("Job profile");
        ui.add(
            egui::TextEdit::singleline(&mut self.profile_input)
                .hint_text("e.g. Backend Engineer")
                .desired_width(f32::INFINITY),
        );
        ui.add_space(4.0);
        ui.label("Job description");
        ui.add(
            egui::TextEdit::multiline(&mut self.description_input)
                .hint_text("Paste the full job description")
                .desired_rows(10)
                .desired_width(f32::INFINITY),
        );
        ui.add_space(4.0);

        egui::ComboBox::from_label("Difficulty")
            .selected_text(self.difficulty.as_str())
            .show_ui(ui, |ui| {
                for d in Difficulty::ALL {
                    ui.selectable_value(&mut self.difficulty, d, d.as_str());
                }
            });

        ui.add_space(8.0);
        let ready = !self.profile_input.trim().is_empty()
            && !self.description_input.trim().is_empty()
            && self.busy.is_none();
        if ui
            .add_enabled(ready, egui::Button::new("Analyze Job"))
            .clicked()
        {
            let info = JobInfo {
                profile: self.profile_input.trim().to_string(),
                description: self.description_input.trim().to_string(),
            };
            let difficulty = self.difficulty;
            self.send(SessionCommand::SubmitJob { info, difficulty });
        }
    }

    fn draw_analysis(&mut self, ui: &mut egui::Ui) {
        ui.heading("Step 2: Job Analysis");
        ui.add_space(6.0);

        let Some(analysis) = self.snapshot.analysis.as_ref() else {
            ui.label("No analysis available.");
            return;
        };
        let na = |v: &Option<String>| v.clone().unwrap_or_else(|| "N/A".into());

        egui::Grid::new("analysis")
            .num_columns(2)
            .spacing([12.0, 4.0])
            .show(ui, |ui| {
                for (label, value) in [
                    ("Title", na(&analysis.job_title)),
                    ("Seniority", na(&analysis.seniority_level)),
                    ("Industry", na(&analysis.industry)),
                    ("Experience", na(&analysis.experience_years)),
                ] {
                    ui.label(egui::RichText::new(label).strong());
                    ui.label(value);
                    ui.end_row();
                }
            });

        for (label, items) in [
            ("Technical skills", &analysis.technical_skills),
            ("Soft skills", &analysis.soft_skills),
            ("Responsibilities", &analysis.key_responsibilities),
        ] {
            ui.add_space(6.0);
            ui.label(egui::RichText::new(label).strong());
            if items.is_empty() {
                ui.label("N/A");
            }
            for item in items {
                ui.label(format!("• {item}"));
            }
        }

        ui.add_space(10.0);
        if ui.button("Continue to Question Setup").clicked() {
            self.analysis_confirmed = true;
        }
    }

    fn draw_counts(&mut self, ui: &mut egui::Ui) {
        ui.heading("Step 3: Question Setup");
        ui.add_space(6.0);

        let max = self.max_per_category;
        egui::Grid::new("counts")
            .num_columns(2)
            .spacing([12.0, 6.0])
            .show(ui, |ui| {
                for category in Category::ALL {
                    ui.label(category.label());
                    ui.add(egui::DragValue::new(self.counts.get_mut(category)).range(0..=max));
                    ui.end_row();
                }
            });

        ui.add_space(6.0);
        let total = self.counts.total();
        if total == 0 {
            ui.colored_label(WARN, "Select at least one type of question.");
        } else {
            ui.label(format!(
                "{total} questions, estimated {} minutes.",
                estimated_minutes(&self.counts)
            ));
        }

        ui.add_space(8.0);
        let ready = self.counts.validate(max).is_ok() && self.busy.is_none();
        if ui
            .add_enabled(ready, egui::Button::new("Generate Questions"))
            .clicked()
        {
            let counts = self.counts;
            self.send(SessionCommand::Generate(counts));
        }
    }

    fn draw_question(&mut self, ui: &mut egui::Ui) {
        ui.heading("Step 4: Interview");
        ui.add_space(6.0);

        let Some((_, question)) = self.snapshot.current_question() else {
            ui.label("All questions answered.");
            return;
        };
        let question = question.clone();

        if let Some(label) = self.snapshot.progress_label() {
            ui.label(label);
        }
        ui.add(egui::ProgressBar::new(self.snapshot.progress()).show_percentage());
        ui.add_space(8.0);

        ui.label(egui::RichText::new(&question.text).size(18.0));
        ui.add_space(8.0);

        ui.label(egui::RichText::new("Tips").strong());
        for tip in question.category.tips() {
            ui.label(format!("• {tip}"));
        }

        ui.add_space(10.0);
        ui.horizontal(|ui| {
            let idle = self.busy.is_none();
            if ui
                .add_enabled(
                    idle,
                    egui::Button::new(format!("Record Answer ({} s)", self.answer_secs)),
                )
                .clicked()
            {
                self.send(SessionCommand::RecordAnswer);
            }
            if ui.add_enabled(idle, egui::Button::new("Replay Question")).clicked() {
                self.send(SessionCommand::SpeakQuestion);
            }
        });

        if let Some(last) = self.snapshot.answers.last() {
            ui.add_space(8.0);
            ui.separator();
            ui.label(egui::RichText::new("Previous answer").color(DIM));
            if last.is_empty() {
                ui.label("(nothing was transcribed)");
            } else {
                ui.label(&last.transcript);
            }
        }
    }

    fn draw_ready_to_evaluate(&mut self, ui: &mut egui::Ui) {
        ui.heading("Step 5: Evaluation");
        ui.add_space(6.0);
        ui.label(format!(
            "{} of {} questions have a transcribed answer.",
            self.snapshot.usable_answers(),
            self.snapshot.questions.len()
        ));
        ui.add_space(8.0);
        let ready = self.snapshot.usable_answers() > 0 && self.busy.is_none();
        if ui
            .add_enabled(ready, egui::Button::new("Evaluate Answers"))
            .clicked()
        {
            self.send(SessionCommand::Evaluate);
        }
    }

    fn draw_results(&mut self, ui: &mut egui::Ui) {
        ui.heading("Interview Feedback");
        ui.add_space(6.0);

        for (index, question) in self.snapshot.questions.iter().enumerate() {
            let title = format!("Q{} ({}): {}", index + 1, question.category.label(), question.text);
            egui::CollapsingHeader::new(title)
                .id_salt(("result", index))
                .default_open(index == 0)
                .show(ui, |ui| {
                    let answer = self
                        .snapshot
                        .answers
                        .get(index)
                        .filter(|a| !a.is_empty())
                        .map(|a| a.transcript.as_str())
                        .unwrap_or("(no answer)");
                    ui.label(egui::RichText::new("Your answer").strong());
                    ui.label(answer);
                    ui.add_space(4.0);
                    ui.label(egui::RichText::new("Feedback").strong());
                    match self.snapshot.evaluation_for(index) {
                        Some(e) => ui.label(&e.feedback),
                        None => ui.label("(not evaluated)"),
                    };
                });
        }

        ui.add_space(10.0);
        if ui.button("Start New Interview").clicked() {
            self.start_over();
        }
    }

    fn draw_status(&self, ui: &mut egui::Ui) {
        if let Some((text, started)) = &self.busy {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label(egui::RichText::new(text).color(ACCENT));
                ui.label(
                    egui::RichText::new(format!("{:.0}s", started.elapsed().as_secs_f32()))
                        .color(DIM),
                );
            });
        }
        if let Some(message) = &self.error_message {
            ui.colored_label(WARN, message);
        }
    }
}

// ---------------------------------------------------------------------------
// eframe::App impl
// ---------------------------------------------------------------------------

impl eframe::App for CoachApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_events();

        // Keep the busy timer ticking.
        if self.busy.is_some() {
            ctx.request_repaint_after(Duration::from_millis(250));
        }

        egui::SidePanel::left("steps")
            .resizable(false)
            .default_width(200.0)
            .show(ctx, |ui| self.draw_steps(ui));

        egui::TopBottomPanel::bottom("status")
            .show_separator_line(true)
            .show(ctx, |ui| self.draw_status(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| match self.page() {
                Page::ApiKey => self.draw_api_key(ui),
                Page::JobForm => self.draw_job_form(ui),
                Page::AnalysisReview => self.draw_analysis(ui),
                Page::QuestionCounts => self.draw_counts(ui),
                Page::Question => self.draw_question(ui),
                Page::ReadyToEvaluate => self.draw_ready_to_evaluate(ui),
                Page::Results => self.draw_results(ui),
            });
        });
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        log::info!("Interview Coach widget closing");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::MockRecorder;
    use crate::llm::{LlmError, MockLlm};
    use crate::session::SessionSettings;
    use crate::stt::MockSttEngine;
    use crate::tts::SilentSpeaker;

    #[test]
    fn key_page_until_validated() {
        for stage in [Stage::CollectJobInfo, Stage::AskAndRecord, Stage::Complete] {
            assert_eq!(page_for(false, true, stage), Page::ApiKey);
        }
    }

    #[test]
    fn analysis_review_precedes_counts() {
        assert_eq!(
            page_for(true, false, Stage::ConfigureQuestionCounts),
            Page::AnalysisReview
        );
        assert_eq!(
            page_for(true, true, Stage::ConfigureQuestionCounts),
            Page::QuestionCounts
        );
    }

    #[test]
    fn failed_analysis_returns_to_job_form() {
        assert_eq!(page_for(true, false, Stage::AnalyzeJob), Page::JobForm);
        assert_eq!(page_for(true, false, Stage::Evaluate), Page::ReadyToEvaluate);
        assert_eq!(page_for(true, false, Stage::Complete), Page::Results);
    }

    fn idle_app() -> (CoachApp, mpsc::Receiver<SessionCommand>, mpsc::Sender<SessionEvent>) {
        let (command_tx, command_rx) = mpsc::channel(8);
        let (event_tx, event_rx) = mpsc::channel(8);
        let app = CoachApp::new(command_tx, event_rx, &AppConfig::default());
        (app, command_rx, event_tx)
    }

    #[test]
    fn record_click_disables_controls_until_reply() {
        let (mut app, mut commands, events) = idle_app();
        assert!(app.busy.is_none());

        app.send(SessionCommand::RecordAnswer);
        assert!(app.busy.is_some());
        assert!(matches!(commands.try_recv(), Ok(SessionCommand::RecordAnswer)));
        assert!(commands.try_recv().is_err());

        events
            .try_send(SessionEvent::Updated(SessionContext::default()))
            .unwrap();
        app.poll_events();
        assert!(app.busy.is_none());
    }

    #[test]
    fn replay_does_not_block_controls() {
        let (mut app, mut commands, _events) = idle_app();
        app.send(SessionCommand::SpeakQuestion);
        assert!(app.busy.is_none());
        assert!(matches!(commands.try_recv(), Ok(SessionCommand::SpeakQuestion)));
    }

    #[test]
    fn error_reply_clears_busy() {
        let (mut app, _commands, events) = idle_app();
        app.send(SessionCommand::Evaluate);
        events.try_send(SessionEvent::Error("boom".into())).unwrap();
        app.poll_events();
        assert!(app.busy.is_none());
        assert_eq!(app.error_message.as_deref(), Some("boom"));
    }

    fn scripted(prompt: &str) -> Result<String, LlmError> {
        if prompt.contains("Analyze this job description") {
            Ok(r#"{"job_title": "Data Analyst", "technical_skills": ["SQL"]}"#.into())
        } else if prompt.contains("interview questions") {
            Ok("1. First question\n2. Second question".into())
        } else {
            Ok("SCORE: 6/10".into())
        }
    }

    fn spawn_worker(
        llm: Arc<MockLlm>,
    ) -> (mpsc::Sender<SessionCommand>, mpsc::Receiver<SessionEvent>) {
        let session = InterviewSession::new(
            llm,
            Arc::new(MockRecorder::silence(1.0)),
            Arc::new(MockSttEngine::ok("my answer")),
            Arc::new(SilentSpeaker),
            SessionSettings::default(),
        );
        let (command_tx, command_rx) = mpsc::channel(8);
        let (event_tx, event_rx) = mpsc::channel(32);
        tokio::spawn(run_worker(
            session,
            LlmConfig::default(),
            20,
            command_rx,
            event_tx,
            None,
        ));
        (command_tx, event_rx)
    }

    /// Receive events until a snapshot arrives.
    async fn next_snapshot(rx: &mut mpsc::Receiver<SessionEvent>) -> SessionContext {
        loop {
            match rx.recv().await {
                Some(SessionEvent::Updated(ctx)) => return ctx,
                Some(_) => continue,
                None => panic!("worker stopped"),
            }
        }
    }

    #[tokio::test]
    async fn worker_drives_a_full_session() {
        let llm = Arc::new(MockLlm::new(scripted));
        let (tx, mut rx) = spawn_worker(llm.clone());

        tx.send(SessionCommand::SubmitJob {
            info: JobInfo {
                profile: "Data Analyst".into(),
                description: "SQL dashboards".into(),
            },
            difficulty: Difficulty::Hard,
        })
        .await
        .unwrap();
        let ctx = next_snapshot(&mut rx).await;
        assert_eq!(ctx.stage, Stage::ConfigureQuestionCounts);
        assert_eq!(
            ctx.analysis.and_then(|a| a.job_title).as_deref(),
            Some("Data Analyst")
        );

        tx.send(SessionCommand::Generate(QuestionCounts::new(0, 1, 0)))
            .await
            .unwrap();
        let ctx = next_snapshot(&mut rx).await;
        assert_eq!(ctx.questions.len(), 1);
        assert_eq!(ctx.questions[0].category, Category::Technical);

        tx.send(SessionCommand::RecordAnswer).await.unwrap();
        let ctx = next_snapshot(&mut rx).await;
        assert_eq!(ctx.stage, Stage::Evaluate);
        assert_eq!(ctx.answers[0].transcript, "my answer");

        tx.send(SessionCommand::Evaluate).await.unwrap();
        let ctx = next_snapshot(&mut rx).await;
        assert_eq!(ctx.stage, Stage::Complete);
        assert_eq!(ctx.evaluations[0].feedback, "SCORE: 6/10");

        tx.send(SessionCommand::Reset).await.unwrap();
        assert_eq!(next_snapshot(&mut rx).await, SessionContext::default());
    }

    #[tokio::test]
    async fn worker_reports_stage_errors() {
        let llm = Arc::new(MockLlm::new(|_| Err(LlmError::Timeout)));
        let (tx, mut rx) = spawn_worker(llm);

        tx.send(SessionCommand::SubmitJob {
            info: JobInfo {
                profile: "Data Analyst".into(),
                description: "SQL".into(),
            },
            difficulty: Difficulty::Easy,
        })
        .await
        .unwrap();

        let ctx = next_snapshot(&mut rx).await;
        assert_eq!(ctx.stage, Stage::AnalyzeJob);
        match rx.recv().await {
            Some(SessionEvent::Error(message)) => assert!(message.contains("timed out")),
            other => panic!("expected error, got {other:?}"),
        }
    }
}
