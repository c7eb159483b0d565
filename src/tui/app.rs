//! TUI Application State
//!
//! Glues the wizard and the capture flow to terminal input. The flow
//! reports what happened as [`FlowEvent`]s and the app forwards them to the
//! wizard; neither reaches into the other.

use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;

use super::events::{TuiEvent, keys};
use super::theme::Theme;
use crate::analysis::{AnalysisClient, Analyzer};
use crate::camera::{CameraFactory, CameraSession, command_camera_factory};
use crate::capture::CaptureMode;
use crate::config::Config;
use crate::error::MoodRxError;
use crate::flow::{
    CaptureFlow, FlowEvent, STEP_NAME, STEP_PHOTO, STEP_RESULT, SubmissionTicket, TOTAL_STEPS,
};
use crate::locale;
use crate::media::ImageBlob;
use crate::wizard::{Wizard, WizardEvent};
use crossterm::event::KeyEvent;

pub struct App {
    pub wizard: Wizard,
    pub flow: CaptureFlow,
    pub theme: Theme,
    pub animation_frame: usize,
    pub should_quit: bool,

    /// Id of the capture still running, if any
    pending_shot: Option<u64>,
    shot_counter: u64,

    analyzer: Arc<dyn Analyzer>,
    camera_factory: CameraFactory,
    event_sender: mpsc::UnboundedSender<TuiEvent>,
}

impl App {
    pub fn new(
        analyzer: Arc<dyn Analyzer>,
        camera_factory: CameraFactory,
        theme: Theme,
        fallback_error: impl Into<String>,
        event_sender: mpsc::UnboundedSender<TuiEvent>,
    ) -> Self {
        Self {
            wizard: Wizard::new(TOTAL_STEPS),
            flow: CaptureFlow::new(fallback_error),
            theme,
            animation_frame: 0,
            should_quit: false,
            pending_shot: None,
            shot_counter: 0,
            analyzer,
            camera_factory,
            event_sender,
        }
    }

    /// Kiosk wired to the HTTP analyzer and the configured capture program
    pub fn from_config(config: &Config, event_sender: mpsc::UnboundedSender<TuiEvent>) -> Self {
        Self::new(
            Arc::new(AnalysisClient::new(config.analysis.endpoint.clone())),
            command_camera_factory(config.camera.clone()),
            Theme::from_config(&config.theme),
            config.analysis.fallback_error.clone(),
            event_sender,
        )
    }

    pub fn current_step(&self) -> usize {
        self.wizard.current_step()
    }

    /// A camera capture is running in the background
    pub fn is_capturing(&self) -> bool {
        self.pending_shot.is_some()
    }

    pub async fn handle_event(&mut self, event: TuiEvent) -> Result<()> {
        match event {
            TuiEvent::Key(key) => self.handle_key_event(key).await,
            TuiEvent::Paste(text) => self.handle_paste(&text),
            TuiEvent::Resize(_, _) => {}
            TuiEvent::Tick => {
                self.animation_frame = self.animation_frame.wrapping_add(1);
            }
            TuiEvent::AnalysisFinished {
                generation,
                outcome,
            } => {
                if let Some(event) = self.flow.finish_submission(generation, outcome) {
                    self.dispatch(event);
                }
            }
            TuiEvent::SnapshotTaken { shot, outcome } => self.finish_snapshot(shot, outcome),
            TuiEvent::Quit => self.should_quit = true,
        }
        Ok(())
    }

    async fn handle_key_event(&mut self, key: KeyEvent) {
        if keys::is_quit(&key) {
            self.should_quit = true;
            return;
        }
        if keys::is_restart(&key) {
            self.restart();
            return;
        }
        // Blocking overlay: nothing else gets through
        if self.flow.is_submitting() {
            return;
        }

        match self.current_step() {
            STEP_NAME => self.handle_name_key(&key),
            STEP_PHOTO => self.handle_photo_key(&key).await,
            STEP_RESULT => {
                if keys::is_enter(&key) {
                    self.restart();
                }
            }
            _ => {}
        }
    }

    fn handle_name_key(&mut self, key: &KeyEvent) {
        if keys::is_enter(key) {
            if let Some(event) = self.flow.request_proceed() {
                self.dispatch(event);
            }
        } else if keys::is_backspace(key) {
            self.flow.pop_name_char();
        } else if let Some(c) = keys::text_char(key) {
            self.flow.push_name_char(c);
        }
    }

    async fn handle_photo_key(&mut self, key: &KeyEvent) {
        let step = self.current_step();
        if keys::is_cancel(key) {
            if self.flow.back_enabled(step) {
                self.pending_shot = None;
                self.wizard.retreat();
            }
            return;
        }
        if keys::is_toggle_mode(key) {
            self.switch_mode(self.flow.mode().toggled());
            return;
        }
        if keys::is_submit(key) {
            self.submit();
            return;
        }

        match self.flow.mode() {
            CaptureMode::Upload => {
                if keys::is_enter(key) {
                    let typed = self.flow.path_input().unwrap_or_default().trim().to_string();
                    if typed.is_empty() {
                        self.submit();
                    } else {
                        self.load_upload(&typed).await;
                    }
                } else if keys::is_delete(key) {
                    self.pending_shot = None;
                    self.flow.retake();
                } else if keys::is_backspace(key) {
                    if let Some(input) = self.flow.path_input_mut() {
                        input.pop();
                    }
                } else if let Some(c) = keys::text_char(key) {
                    if let Some(input) = self.flow.path_input_mut() {
                        input.push(c);
                    }
                }
            }
            CaptureMode::Camera => {
                if keys::is_snapshot(key) {
                    self.snapshot();
                } else if keys::is_retake(key) {
                    self.pending_shot = None;
                    self.flow.retake();
                } else if keys::is_enter(key) {
                    self.submit();
                }
            }
        }
    }

    fn handle_paste(&mut self, text: &str) {
        if self.flow.is_submitting() {
            return;
        }
        let text: String = text.chars().filter(|c| !c.is_control()).collect();
        match self.current_step() {
            STEP_NAME => {
                let name = format!("{}{}", self.flow.name(), text);
                self.flow.set_name(name);
            }
            STEP_PHOTO => {
                if let Some(input) = self.flow.path_input_mut() {
                    input.push_str(&text);
                }
            }
            _ => {}
        }
    }

    /// Forward a flow message to the wizard
    fn dispatch(&mut self, event: FlowEvent) {
        match self.wizard.handle_flow_event(&event) {
            Some(WizardEvent::StepChanged(step)) => {
                tracing::debug!(?event, step, "flow moved wizard");
            }
            Some(WizardEvent::Completed) => {
                tracing::debug!(?event, "wizard completed");
            }
            None => {}
        }
    }

    fn restart(&mut self) {
        self.pending_shot = None;
        let event = self.flow.restart();
        self.dispatch(event);
    }

    fn switch_mode(&mut self, mode: CaptureMode) {
        self.pending_shot = None;
        self.flow.set_mode(mode);
        if mode == CaptureMode::Camera {
            match (self.camera_factory)() {
                Ok(camera) => self.flow.attach_camera(CameraSession::new(camera)),
                Err(e) => tracing::warn!("Camera unavailable: {}", e),
            }
        }
    }

    async fn load_upload(&mut self, typed: &str) {
        let path = expand_path(typed);
        match ImageBlob::from_file(&path).await {
            Ok(blob) => {
                self.flow.select_upload(blob);
                if let Some(input) = self.flow.path_input_mut() {
                    input.clear();
                }
            }
            Err(e) => {
                tracing::warn!("Could not read {}: {}", path.display(), e);
                self.flow.upload_failed(locale::FILE_UNREADABLE);
            }
        }
    }

    /// Start a capture off the event loop; the frame comes back as
    /// [`TuiEvent::SnapshotTaken`]. One capture runs at a time.
    fn snapshot(&mut self) {
        if self.pending_shot.is_some() {
            tracing::debug!("Snapshot ignored: capture already running");
            return;
        }
        let Some(camera) = self.flow.capture().camera().and_then(|s| s.handle()) else {
            tracing::debug!("Snapshot ignored: no camera attached");
            return;
        };

        self.shot_counter += 1;
        let shot = self.shot_counter;
        self.pending_shot = Some(shot);
        let event_sender = self.event_sender.clone();

        tokio::spawn(async move {
            let outcome = camera.snapshot().await;
            // Release our hold before reporting so leaving camera mode closes the device
            drop(camera);
            let _ = event_sender.send(TuiEvent::SnapshotTaken { shot, outcome });
        });
    }

    fn finish_snapshot(
        &mut self,
        shot: u64,
        outcome: std::result::Result<Option<String>, MoodRxError>,
    ) {
        if self.pending_shot != Some(shot) {
            tracing::debug!(shot, "Dropping superseded snapshot");
            return;
        }
        self.pending_shot = None;

        match outcome {
            Ok(data_url) => {
                self.flow.capture_snapshot(data_url.as_deref());
            }
            Err(e) => tracing::warn!("Snapshot failed: {}", e),
        }
    }

    fn submit(&mut self) {
        match self.flow.begin_submission() {
            Ok(ticket) => self.spawn_submission(ticket),
            Err(e) => tracing::debug!("Submission not started: {}", e),
        }
    }

    /// Run the analysis off the event loop. The outcome comes back as an
    /// event tagged with the ticket's generation; a cancelled ticket sends
    /// nothing.
    fn spawn_submission(&self, ticket: SubmissionTicket) {
        let analyzer = Arc::clone(&self.analyzer);
        let event_sender = self.event_sender.clone();

        tokio::spawn(async move {
            let SubmissionTicket {
                generation,
                image,
                username,
                cancel,
            } = ticket;

            let outcome = tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::debug!(generation, "submission task cancelled");
                    return;
                }
                outcome = analyzer.analyze(&image, &username) => outcome,
            };

            let _ = event_sender.send(TuiEvent::AnalysisFinished {
                generation,
                outcome,
            });
        });
    }
}

/// Strip quotes a terminal adds to dropped files and expand a leading `~`
fn expand_path(typed: &str) -> PathBuf {
    let unquoted = typed
        .strip_prefix('\'')
        .and_then(|s| s.strip_suffix('\''))
        .or_else(|| typed.strip_prefix('"').and_then(|s| s.strip_suffix('"')))
        .unwrap_or(typed);

    match (unquoted.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(unquoted),
    }
}
