//! Interview session driver.
//!
//! [`InterviewSession`] owns one [`SessionContext`] and the four
//! collaborators a session talks to.  Each stage method checks that the
//! session is in the right [`Stage`], does its work, and advances the stage
//! only on success.
//!
//! # Flow
//!
//! ```text
//! collect_job_info(info, difficulty)            [CollectJobInfo]
//!   └─▶ analyze_job()  llm (JSON schema)        [AnalyzeJob]
//!         └─▶ configure_counts(counts)          [ConfigureQuestionCounts]
//!               llm × category with count > 0
//!               └─▶ ask_next() × n              [AskAndRecord]
//!                     speaker.speak             (failure logged)
//!                     spawn_blocking(recorder.record)
//!                     write answer.wav          (failure logged)
//!                     spawn_blocking(stt.transcribe)
//!                     └─▶ evaluate()            [Evaluate]
//!                           llm × usable answer
//!                           └─▶ Complete
//! ```
//!
//! Model calls are made one at a time; blocking work runs on
//! `tokio::task::spawn_blocking` and is awaited before the next step.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::audio::{write_wav, AudioBuffer, Recorder, TARGET_SAMPLE_RATE};
use crate::config::{AppConfig, AppPaths};
use crate::interview::{
    Answer, Category, Difficulty, Evaluation, InterviewError, JobAnalysis, JobInfo, Question,
    QuestionCounts,
};
use crate::llm::{extract_json, parse_numbered_list, prompt, LlmClient, ResponseFormat};
use crate::stt::{SttEngine, MAX_AUDIO_SAMPLES};
use crate::tts::Speaker;

use super::state::{SessionContext, Stage};

/// Longest answer the transcriber accepts.
pub const MAX_ANSWER_SECS: u32 = (MAX_AUDIO_SAMPLES / TARGET_SAMPLE_RATE as usize) as u32;

/// Per-session knobs that do not come from the user.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    /// Fixed length of each recorded answer.
    pub answer_duration: Duration,
    /// Where the last answer is saved as WAV; `None` skips saving.
    pub answer_wav: Option<PathBuf>,
    /// Upper bound for a single category count.
    pub max_per_category: u32,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            answer_duration: Duration::from_secs(20),
            answer_wav: None,
            max_per_category: 10,
        }
    }
}

impl SessionSettings {
    /// `audio.answer_secs` is clamped to 1..=[`MAX_ANSWER_SECS`].
    pub fn from_config(config: &AppConfig, paths: &AppPaths) -> Self {
        let answer_secs = config.audio.answer_secs.clamp(1, MAX_ANSWER_SECS);
        if answer_secs != config.audio.answer_secs {
            log::warn!(
                "audio.answer_secs = {} is out of range; recording {answer_secs} s per answer",
                config.audio.answer_secs
            );
        }
        Self {
            answer_duration: Duration::from_secs(answer_secs as u64),
            answer_wav: Some(paths.answer_wav.clone()),
            max_per_category: config.interview.max_per_category,
        }
    }
}

// ---------------------------------------------------------------------------
// InterviewSession
// ---------------------------------------------------------------------------

/// Drives one interview session through its stages.
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use interview_coach::audio::MicRecorder;
/// use interview_coach::config::{AppConfig, AppPaths};
/// use interview_coach::interview::{Difficulty, JobInfo, QuestionCounts};
/// use interview_coach::llm::ApiClient;
/// use interview_coach::session::{InterviewSession, SessionSettings};
/// use interview_coach::stt::load_engine;
/// use interview_coach::tts::speaker_from_config;
///
/// # async fn run() -> anyhow::Result<()> {
/// let config = AppConfig::default();
/// let paths = AppPaths::new();
/// let mut session = InterviewSession::new(
///     Arc::new(ApiClient::from_config(&config.llm)?),
///     Arc::new(MicRecorder::new()),
///     load_engine(&config.stt, &paths),
///     speaker_from_config(&config.tts, &paths),
///     SessionSettings::default(),
/// );
///
/// session.collect_job_info(
///     JobInfo { profile: "Backend Engineer".into(), description: "Go, Postgres".into() },
///     Difficulty::Medium,
/// )?;
/// session.analyze_job().await?;
/// session.configure_counts(QuestionCounts::new(1, 1, 1)).await?;
/// while session.context().current_question().is_some() {
///     let _ = session.ask_next().await;
/// }
/// for evaluation in session.evaluate().await? {
///     println!("{}", evaluation.feedback);
/// }
/// # Ok(())
/// # }
/// ```
pub struct InterviewSession {
    llm: Arc<dyn LlmClient>,
    recorder: Arc<dyn Recorder>,
    stt: Arc<dyn SttEngine>,
    speaker: Arc<dyn Speaker>,
    settings: SessionSettings,
    ctx: SessionContext,
}

impl InterviewSession {
    pub fn new(
        llm: Arc<dyn LlmClient>,
        recorder: Arc<dyn Recorder>,
        stt: Arc<dyn SttEngine>,
        speaker: Arc<dyn Speaker>,
        settings: SessionSettings,
    ) -> Self {
        Self {
            llm,
            recorder,
            stt,
            speaker,
            settings,
            ctx: SessionContext::new(),
        }
    }

    /// Read-only view of the session so far.
    pub fn context(&self) -> &SessionContext {
        &self.ctx
    }

    pub fn stage(&self) -> Stage {
        self.ctx.stage
    }

    /// Swap the model client, e.g. after the user enters a new API key.
    pub fn set_llm(&mut self, llm: Arc<dyn LlmClient>) {
        self.llm = llm;
    }

    /// Start over with an empty context.
    pub fn reset(&mut self) {
        log::info!("session: reset");
        self.ctx.reset();
    }

    fn require_stage(&self, expected: Stage) -> Result<(), InterviewError> {
        if self.ctx.stage == expected {
            Ok(())
        } else {
            Err(InterviewError::input(format!(
                "cannot run '{}' while at '{}'",
                expected.label(),
                self.ctx.stage.label()
            )))
        }
    }

    // -----------------------------------------------------------------------
    // CollectJobInfo
    // -----------------------------------------------------------------------

    /// Store the job details and difficulty.
    ///
    /// # Errors
    ///
    /// [`InterviewError::Input`] if the profile or description is blank.
    pub fn collect_job_info(
        &mut self,
        info: JobInfo,
        difficulty: Difficulty,
    ) -> Result<(), InterviewError> {
        self.require_stage(Stage::CollectJobInfo)?;

        if info.profile.trim().is_empty() {
            return Err(InterviewError::input("job profile is required"));
        }
        if info.description.trim().is_empty() {
            return Err(InterviewError::input("job description is required"));
        }

        log::info!("session: job {:?} at {difficulty} difficulty", info.profile.trim());
        self.ctx.job_info = Some(info);
        self.ctx.difficulty = difficulty;
        self.ctx.stage = Stage::AnalyzeJob;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // AnalyzeJob
    // -----------------------------------------------------------------------

    /// Ask the model for a structured [`JobAnalysis`].
    pub async fn analyze_job(&mut self) -> Result<&JobAnalysis, InterviewError> {
        self.require_stage(Stage::AnalyzeJob)?;
        let info = self
            .ctx
            .job_info
            .as_ref()
            .ok_or_else(|| InterviewError::input("job information has not been entered"))?;

        let format = ResponseFormat::Json {
            schema: Some(prompt::job_analysis_schema()),
        };
        let raw = self
            .llm
            .generate(&prompt::job_analysis_prompt(info), &format)
            .await
            .inspect_err(|e| log::error!("session: job analysis request failed: {e}"))?;

        let analysis = extract_json(&raw)
            .and_then(JobAnalysis::from_value)
            .inspect_err(|e| log::error!("session: job analysis unreadable: {e}"))?;

        log::info!(
            "session: analysed {:?} ({} technical, {} soft skills)",
            analysis.job_title.as_deref().unwrap_or("untitled"),
            analysis.technical_skills.len(),
            analysis.soft_skills.len()
        );
        self.ctx.stage = Stage::ConfigureQuestionCounts;
        Ok(&*self.ctx.analysis.insert(analysis))
    }

    // -----------------------------------------------------------------------
    // ConfigureQuestionCounts
    // -----------------------------------------------------------------------

    /// Validate `counts` and generate the questions, category by category.
    ///
    /// A category with a count of zero is not requested.  A category whose
    /// request or parse fails is logged and skipped; the session moves on as
    /// long as at least one question was generated.  Surplus items beyond
    /// the requested count are dropped.
    pub async fn configure_counts(
        &mut self,
        counts: QuestionCounts,
    ) -> Result<&[Question], InterviewError> {
        self.require_stage(Stage::ConfigureQuestionCounts)?;
        counts.validate(self.settings.max_per_category)?;
        let analysis = self
            .ctx
            .analysis
            .clone()
            .ok_or_else(|| InterviewError::input("job has not been analysed"))?;

        let difficulty = self.ctx.difficulty;
        let mut questions = Vec::with_capacity(counts.total() as usize);
        let mut last_error = None;

        for category in Category::ALL {
            let count = counts.get(category);
            if count == 0 {
                continue;
            }
            match self.generate(category, &analysis, count, difficulty).await {
                Ok(batch) => {
                    log::info!("session: {} {category} questions", batch.len());
                    questions.extend(batch);
                }
                Err(e) => {
                    log::warn!("session: skipping {category} questions: {e}");
                    last_error = Some(e);
                }
            }
        }

        if questions.is_empty() {
            return Err(last_error
                .unwrap_or_else(|| InterviewError::input("no questions were generated")));
        }

        self.ctx.counts = counts;
        self.ctx.questions = questions;
        self.ctx.answers.clear();
        self.ctx.evaluations.clear();
        self.ctx.stage = Stage::AskAndRecord;
        Ok(&self.ctx.questions)
    }

    async fn generate(
        &self,
        category: Category,
        analysis: &JobAnalysis,
        count: u32,
        difficulty: Difficulty,
    ) -> Result<Vec<Question>, InterviewError> {
        let text = prompt::question_prompt(category, analysis, count, difficulty);
        let raw = self.llm.generate(&text, &ResponseFormat::Text).await?;
        let mut items = parse_numbered_list(&raw)?;
        if items.len() > count as usize {
            log::debug!(
                "session: model returned {} {category} questions, keeping {count}",
                items.len()
            );
            items.truncate(count as usize);
        }
        Ok(items
            .into_iter()
            .map(|text| Question {
                text,
                category,
                difficulty,
            })
            .collect())
    }

    // -----------------------------------------------------------------------
    // AskAndRecord
    // -----------------------------------------------------------------------

    /// Read the current question aloud.  Failures are logged, never returned.
    pub async fn speak_current(&self) {
        let Some((index, question)) = self.ctx.current_question() else {
            return;
        };
        if let Err(e) = self.speaker.speak(&question.text).await {
            log::warn!("session: could not read question {} aloud: {e}", index + 1);
        }
    }

    /// Record and transcribe the answer to the current question.
    ///
    /// The answer is always appended so `answers[i]` stays paired with
    /// `questions[i]`.  If recording or transcription fails, an empty answer
    /// is stored and the error is returned.  After the last answer the
    /// session moves to [`Stage::Evaluate`].
    pub async fn record_current(&mut self) -> Result<&Answer, InterviewError> {
        self.require_stage(Stage::AskAndRecord)?;
        let index = match self.ctx.current_question() {
            Some((index, _)) => index,
            None => return Err(InterviewError::input("no question left to answer")),
        };

        let result = self.capture_answer().await;
        let answer = match &result {
            Ok(transcript) => Answer::new(transcript.clone()),
            Err(e) => {
                log::warn!("session: answer {} not captured: {e}", index + 1);
                Answer::default()
            }
        };
        log::info!(
            "session: answer {} of {} ({} chars)",
            index + 1,
            self.ctx.questions.len(),
            answer.transcript.len()
        );
        self.ctx.answers.push(answer);

        if self.ctx.all_answered() {
            self.ctx.stage = Stage::Evaluate;
        }

        result?;
        self.ctx
            .answers
            .last()
            .ok_or_else(|| InterviewError::Audio("answer was not stored".into()))
    }

    /// Speak the current question, then record and transcribe the answer.
    pub async fn ask_next(&mut self) -> Result<&Answer, InterviewError> {
        self.require_stage(Stage::AskAndRecord)?;
        self.speak_current().await;
        self.record_current().await
    }

    async fn capture_answer(&self) -> Result<String, InterviewError> {
        let recorder = Arc::clone(&self.recorder);
        let duration = self.settings.answer_duration;
        let buffer: AudioBuffer = tokio::task::spawn_blocking(move || recorder.record(duration))
            .await
            .map_err(|e| InterviewError::Audio(format!("recording task failed: {e}")))??;

        if let Some(path) = &self.settings.answer_wav {
            if let Err(e) = write_wav(path, &buffer) {
                log::warn!("session: could not save {}: {e}", path.display());
            }
        }

        let stt = Arc::clone(&self.stt);
        let transcript = tokio::task::spawn_blocking(move || stt.transcribe(&buffer.to_f32()))
            .await
            .map_err(|e| InterviewError::Audio(format!("transcription task failed: {e}")))??;
        Ok(transcript)
    }

    // -----------------------------------------------------------------------
    // Evaluate
    // -----------------------------------------------------------------------

    /// Ask the model for feedback on every non-empty answer.
    ///
    /// # Errors
    ///
    /// [`InterviewError::Input`] without calling the model when no answer has
    /// a transcript.  If every evaluation request fails, the last error is
    /// returned and the session stays at [`Stage::Evaluate`].
    pub async fn evaluate(&mut self) -> Result<&[Evaluation], InterviewError> {
        self.require_stage(Stage::Evaluate)?;
        if self.ctx.usable_answers() == 0 {
            return Err(InterviewError::input("there are no answers to evaluate"));
        }
        let analysis = self
            .ctx
            .analysis
            .clone()
            .ok_or_else(|| InterviewError::input("job has not been analysed"))?;

        let mut evaluations = Vec::new();
        let mut last_error = None;

        for (index, (question, answer)) in self
            .ctx
            .questions
            .iter()
            .zip(self.ctx.answers.iter())
            .enumerate()
        {
            if answer.is_empty() {
                log::info!("session: question {} has no answer, not evaluated", index + 1);
                continue;
            }
            let text = prompt::evaluation_prompt(
                &analysis,
                &question.text,
                &answer.transcript,
                question.difficulty,
            );
            match self.llm.generate(&text, &ResponseFormat::Text).await {
                Ok(feedback) => evaluations.push(Evaluation {
                    question_index: index,
                    feedback: feedback.trim().to_string(),
                }),
                Err(e) => {
                    log::warn!("session: evaluation of question {} failed: {e}", index + 1);
                    last_error = Some(e);
                }
            }
        }

        if evaluations.is_empty() {
            if let Some(e) = last_error {
                return Err(e.into());
            }
        }

        log::info!("session: {} answers evaluated", evaluations.len());
        self.ctx.evaluations = evaluations;
        self.ctx.stage = Stage::Complete;
        Ok(&self.ctx.evaluations)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
