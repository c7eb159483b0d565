//! Image Capture State
//!
//! Owns the selected image, its preview, and the input panel that produced
//! it. Upload and camera panels are separate variants carrying only their
//! own fields; once an image is resolved it is a plain [`ImageBlob`] and
//! nothing downstream cares where it came from.

use crate::camera::CameraSession;
use crate::error::Result;
use crate::media::{ImageBlob, PreviewHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaptureMode {
    #[default]
    Upload,
    Camera,
}

impl CaptureMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Upload => Self::Camera,
            Self::Camera => Self::Upload,
        }
    }
}

/// The active input widget
#[derive(Debug)]
pub enum SourcePanel {
    /// Path being typed into the upload field
    Upload { path_input: String },
    /// Live camera; `None` until a device is attached
    Camera { session: Option<CameraSession> },
}

impl SourcePanel {
    fn for_mode(mode: CaptureMode) -> Self {
        match mode {
            CaptureMode::Upload => Self::Upload {
                path_input: String::new(),
            },
            CaptureMode::Camera => Self::Camera { session: None },
        }
    }

    pub fn mode(&self) -> CaptureMode {
        match self {
            Self::Upload { .. } => CaptureMode::Upload,
            Self::Camera { .. } => CaptureMode::Camera,
        }
    }
}

#[derive(Debug)]
pub struct CaptureState {
    panel: SourcePanel,
    image: Option<ImageBlob>,
    preview: Option<PreviewHandle>,
}

impl Default for CaptureState {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureState {
    pub fn new() -> Self {
        Self {
            panel: SourcePanel::for_mode(CaptureMode::Upload),
            image: None,
            preview: None,
        }
    }

    pub fn mode(&self) -> CaptureMode {
        self.panel.mode()
    }

    pub fn panel(&self) -> &SourcePanel {
        &self.panel
    }

    pub fn image(&self) -> Option<&ImageBlob> {
        self.image.as_ref()
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    /// The preview of the current image. A handle left over from a
    /// replaced blob is never returned.
    pub fn preview(&self) -> Option<&PreviewHandle> {
        match (&self.preview, &self.image) {
            (Some(preview), Some(image)) if preview.is_for(image) => Some(preview),
            _ => None,
        }
    }

    /// Text typed into the upload field; `None` in camera mode
    pub fn path_input(&self) -> Option<&str> {
        match &self.panel {
            SourcePanel::Upload { path_input } => Some(path_input),
            SourcePanel::Camera { .. } => None,
        }
    }

    pub fn path_input_mut(&mut self) -> Option<&mut String> {
        match &mut self.panel {
            SourcePanel::Upload { path_input } => Some(path_input),
            SourcePanel::Camera { .. } => None,
        }
    }

    pub fn camera(&self) -> Option<&CameraSession> {
        match &self.panel {
            SourcePanel::Camera { session } => session.as_ref(),
            SourcePanel::Upload { .. } => None,
        }
    }

    /// Hand a freshly opened camera to the camera panel. Ignored (and the
    /// session dropped) when the upload panel is active.
    pub fn attach_camera(&mut self, camera: CameraSession) {
        match &mut self.panel {
            SourcePanel::Camera { session } => *session = Some(camera),
            SourcePanel::Upload { .. } => {
                tracing::debug!("Dropping camera session: upload panel is active");
            }
        }
    }

    /// Replace whatever image was selected with `blob`
    pub fn select_upload(&mut self, blob: ImageBlob) {
        self.preview = Some(blob.preview());
        self.image = Some(blob);
    }

    /// Decode a snapshot `data:` URL into the current image.
    ///
    /// `None` (no frame) changes nothing and returns `Ok(false)`.
    pub fn capture_snapshot(&mut self, data_url: Option<&str>) -> Result<bool> {
        let Some(data_url) = data_url else {
            tracing::debug!("Snapshot skipped: no frame available");
            return Ok(false);
        };
        let blob = ImageBlob::from_data_url(data_url)?;
        self.select_upload(blob);
        Ok(true)
    }

    /// Back to the unselected-image state; the panel stays as it is
    pub fn retake(&mut self) {
        self.image = None;
        self.preview = None;
        if let SourcePanel::Upload { path_input } = &mut self.panel {
            path_input.clear();
        }
    }

    /// Switch input widget. Switching always clears the image; leaving
    /// camera mode releases the device.
    pub fn set_mode(&mut self, mode: CaptureMode) {
        self.retake();
        if self.mode() != mode {
            self.panel = SourcePanel::for_mode(mode);
        }
    }

    /// Default mode, no image, no camera
    pub fn reset(&mut self) {
        self.image = None;
        self.preview = None;
        self.panel = SourcePanel::for_mode(CaptureMode::Upload);
    }
}
