//! Capture/Submit Flow
//!
//! Name entry, image acquisition, submission and result, for one kiosk
//! session. The flow never touches the wizard: every transition the wizard
//! has to follow is returned as a [`FlowEvent`] for the host to forward.
//!
//! Submissions are tagged with a generation. An outcome is applied only
//! while its generation is the one in flight; anything else (a response
//! arriving after restart) is dropped.

use tokio_util::sync::CancellationToken;

use crate::analysis::{AnalysisError, AnalysisResult};
use crate::camera::CameraSession;
use crate::capture::{CaptureMode, CaptureState};
use crate::error::{MoodRxError, Result};
use crate::locale;
use crate::media::{ImageBlob, PreviewHandle};

pub const STEP_NAME: usize = 1;
pub const STEP_PHOTO: usize = 2;
pub const STEP_RESULT: usize = 3;
pub const TOTAL_STEPS: usize = 3;

/// Messages from the flow to the wizard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowEvent {
    /// Name accepted, move to the photo step
    ProceedRequested,
    /// Result stored, move to the result step
    SubmissionSucceeded,
    /// Everything cleared, back to step 1
    RestartRequested,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowPhase {
    AwaitingName,
    AwaitingImage,
    Submitting,
    Result,
}

/// Everything a spawned submission needs, detached from the flow
#[derive(Debug, Clone)]
pub struct SubmissionTicket {
    pub generation: u64,
    pub image: ImageBlob,
    pub username: String,
    pub cancel: CancellationToken,
}

#[derive(Debug)]
struct InFlight {
    generation: u64,
    cancel: CancellationToken,
}

#[derive(Debug)]
pub struct CaptureFlow {
    name: String,
    capture: CaptureState,
    in_flight: Option<InFlight>,
    generation: u64,
    result: Option<AnalysisResult>,
    last_error: Option<String>,
    fallback_error: String,
}

impl Default for CaptureFlow {
    fn default() -> Self {
        Self::new(locale::ANALYSIS_FAILED)
    }
}

impl CaptureFlow {
    /// `fallback_error` is shown when a failed submission carries no message
    pub fn new(fallback_error: impl Into<String>) -> Self {
        Self {
            name: String::new(),
            capture: CaptureState::new(),
            in_flight: None,
            generation: 0,
            result: None,
            last_error: None,
            fallback_error: fallback_error.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn push_name_char(&mut self, c: char) {
        self.name.push(c);
    }

    pub fn pop_name_char(&mut self) {
        self.name.pop();
    }

    pub fn capture(&self) -> &CaptureState {
        &self.capture
    }

    pub fn mode(&self) -> CaptureMode {
        self.capture.mode()
    }

    pub fn image(&self) -> Option<&ImageBlob> {
        self.capture.image()
    }

    pub fn preview(&self) -> Option<&PreviewHandle> {
        self.capture.preview()
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        self.result.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Trimmed name is non-empty
    pub fn can_proceed(&self) -> bool {
        !self.name.trim().is_empty()
    }

    pub fn request_proceed(&self) -> Option<FlowEvent> {
        self.can_proceed().then_some(FlowEvent::ProceedRequested)
    }

    pub fn path_input(&self) -> Option<&str> {
        self.capture.path_input()
    }

    pub fn path_input_mut(&mut self) -> Option<&mut String> {
        if self.is_submitting() {
            return None;
        }
        self.capture.path_input_mut()
    }

    /// New upload: replaces image and preview, clears result and error
    pub fn select_upload(&mut self, blob: ImageBlob) {
        if self.is_submitting() {
            return;
        }
        self.capture.select_upload(blob);
        self.result = None;
        self.last_error = None;
    }

    /// An upload path that could not be read. The current image stays.
    pub fn upload_failed(&mut self, message: impl Into<String>) {
        self.last_error = Some(message.into());
    }

    /// Apply a camera snapshot. No frame, or a frame that does not decode,
    /// is a silent no-op.
    pub fn capture_snapshot(&mut self, data_url: Option<&str>) -> bool {
        if self.is_submitting() {
            return false;
        }
        match self.capture.capture_snapshot(data_url) {
            Ok(true) => {
                self.result = None;
                self.last_error = None;
                true
            }
            Ok(false) => false,
            Err(e) => {
                tracing::debug!("Discarding snapshot: {}", e);
                false
            }
        }
    }

    /// Clear image, preview and any displayed result. Name and step stay.
    pub fn retake(&mut self) {
        if self.is_submitting() {
            return;
        }
        self.capture.retake();
        self.result = None;
    }

    /// Switch input widget; always a retake
    pub fn set_mode(&mut self, mode: CaptureMode) {
        if self.is_submitting() {
            return;
        }
        self.capture.set_mode(mode);
        self.result = None;
    }

    pub fn attach_camera(&mut self, session: CameraSession) {
        self.capture.attach_camera(session);
    }

    /// Start a submission.
    ///
    /// Fails without side effects while one is already in flight. Without an
    /// image it sets the validation message and fails; nothing is sent.
    pub fn begin_submission(&mut self) -> Result<SubmissionTicket> {
        if self.is_submitting() {
            return Err(MoodRxError::Validation(
                "a submission is already in flight".to_string(),
            ));
        }
        let Some(image) = self.capture.image().cloned() else {
            self.last_error = Some(locale::NO_IMAGE_SELECTED.to_string());
            return Err(MoodRxError::Validation(
                locale::NO_IMAGE_SELECTED.to_string(),
            ));
        };

        self.generation += 1;
        let cancel = CancellationToken::new();
        self.in_flight = Some(InFlight {
            generation: self.generation,
            cancel: cancel.clone(),
        });
        self.last_error = None;

        tracing::debug!(generation = self.generation, "submission started");
        Ok(SubmissionTicket {
            generation: self.generation,
            image,
            username: self.name.clone(),
            cancel,
        })
    }

    /// Apply a submission outcome if `generation` is still the one in
    /// flight. Success yields [`FlowEvent::SubmissionSucceeded`]; failure
    /// stores the message and keeps the image.
    pub fn finish_submission(
        &mut self,
        generation: u64,
        outcome: std::result::Result<AnalysisResult, AnalysisError>,
    ) -> Option<FlowEvent> {
        match &self.in_flight {
            Some(in_flight) if in_flight.generation == generation => {}
            _ => {
                tracing::debug!(generation, "discarding stale submission outcome");
                return None;
            }
        }
        self.in_flight = None;

        match outcome {
            Ok(result) => {
                self.result = Some(result);
                self.last_error = None;
                Some(FlowEvent::SubmissionSucceeded)
            }
            Err(e) => {
                tracing::warn!("Submission failed: {}", e);
                self.last_error = Some(e.user_message(&self.fallback_error));
                None
            }
        }
    }

    /// Clear everything, cancel any in-flight request, default capture mode
    pub fn restart(&mut self) -> FlowEvent {
        if let Some(in_flight) = self.in_flight.take() {
            in_flight.cancel.cancel();
            tracing::debug!(generation = in_flight.generation, "submission cancelled");
        }
        self.generation += 1;
        self.name.clear();
        self.capture.reset();
        self.result = None;
        self.last_error = None;
        FlowEvent::RestartRequested
    }

    pub fn phase(&self, step: usize) -> FlowPhase {
        if self.is_submitting() {
            FlowPhase::Submitting
        } else if step <= STEP_NAME {
            FlowPhase::AwaitingName
        } else if step == STEP_PHOTO || self.result.is_none() {
            FlowPhase::AwaitingImage
        } else {
            FlowPhase::Result
        }
    }

    /// Primary button label for `step`
    pub fn next_button_label(&self, step: usize) -> &'static str {
        match step {
            STEP_NAME => locale::BUTTON_NEXT,
            STEP_PHOTO if self.is_submitting() => locale::BUTTON_ANALYZING,
            STEP_PHOTO => locale::BUTTON_ANALYZE,
            STEP_RESULT => locale::BUTTON_RESTART,
            _ => locale::BUTTON_DONE,
        }
    }

    pub fn next_enabled(&self, step: usize) -> bool {
        match step {
            STEP_NAME => self.can_proceed(),
            STEP_PHOTO => self.capture.has_image() && !self.is_submitting(),
            _ => true,
        }
    }

    /// Back is disabled on the first step, on the result, and while submitting
    pub fn back_enabled(&self, step: usize) -> bool {
        step > STEP_NAME && step < STEP_RESULT && !self.is_submitting()
    }
}
