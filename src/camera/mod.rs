//! Camera Capture
//!
//! A [`Camera`] produces single JPEG snapshots as `data:` URLs, the same
//! transport encoding a browser webcam hands out. The kiosk holds at most
//! one [`CameraSession`] at a time and drops it when leaving camera mode.

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::config::CameraConfig;
use crate::error::{MoodRxError, Result};
use crate::media::encode_data_url;

#[async_trait]
pub trait Camera: Send + Sync {
    /// Human-readable device description
    fn label(&self) -> String;

    /// Grab one frame. `Ok(None)` means no frame was available.
    async fn snapshot(&self) -> Result<Option<String>>;
}

/// Opens a camera on demand; called each time the kiosk enters camera mode
pub type CameraFactory = Arc<dyn Fn() -> Result<Box<dyn Camera>> + Send + Sync>;

/// Factory for the configured capture program
pub fn command_camera_factory(config: CameraConfig) -> CameraFactory {
    Arc::new(move || -> Result<Box<dyn Camera>> {
        let camera = CommandCamera::open(&config)?;
        Ok(Box::new(camera) as Box<dyn Camera>)
    })
}

/// Runs an external capture program that writes one JPEG to stdout
#[derive(Debug, Clone)]
pub struct CommandCamera {
    program: PathBuf,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandCamera {
    /// Resolve the capture program on PATH
    pub fn open(config: &CameraConfig) -> Result<Self> {
        let program = which::which(&config.program).map_err(|e| {
            MoodRxError::Camera(format!("capture program '{}' not found: {}", config.program, e))
        })?;
        tracing::info!("Camera opened via {}", program.display());
        Ok(Self {
            program,
            args: config.args.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        })
    }
}

#[async_trait]
impl Camera for CommandCamera {
    fn label(&self) -> String {
        let name = self
            .program
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        format!("{} {}", name, self.args.join(" "))
    }

    async fn snapshot(&self) -> Result<Option<String>> {
        // Dropping the timed-out future kills the child
        let capture = tokio::process::Command::new(&self.program)
            .args(&self.args)
            .kill_on_drop(true)
            .output();
        let output = tokio::time::timeout(self.timeout, capture)
            .await
            .map_err(|_| {
                MoodRxError::Camera(format!(
                    "capture program timed out after {}s",
                    self.timeout.as_secs()
                ))
            })?
            .map_err(|e| MoodRxError::Camera(format!("failed to run capture program: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(MoodRxError::Camera(format!(
                "capture program exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        if output.stdout.is_empty() {
            tracing::debug!("Capture program produced no frame");
            return Ok(None);
        }

        Ok(Some(encode_data_url("image/jpeg", &output.stdout)))
    }
}

/// Exclusive hold on a camera. Dropping it releases the device.
pub struct CameraSession {
    camera: Option<Arc<dyn Camera>>,
    label: String,
}

impl CameraSession {
    pub fn new(camera: Box<dyn Camera>) -> Self {
        let label = camera.label();
        tracing::debug!("Camera session started: {}", label);
        Self {
            camera: Some(Arc::from(camera)),
            label,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_active(&self) -> bool {
        self.camera.is_some()
    }

    /// Shared handle for a capture that runs off the event loop. The device
    /// stays open until the session and every handle are gone.
    pub fn handle(&self) -> Option<Arc<dyn Camera>> {
        self.camera.clone()
    }

    /// Snapshot from the held camera. A released session has no frames.
    pub async fn snapshot(&self) -> Result<Option<String>> {
        match &self.camera {
            Some(camera) => camera.snapshot().await,
            None => Ok(None),
        }
    }

    pub fn release(&mut self) {
        if self.camera.take().is_some() {
            tracing::debug!("Camera session released: {}", self.label);
        }
    }
}

impl Drop for CameraSession {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for CameraSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CameraSession")
            .field("label", &self.label)
            .field("active", &self.is_active())
            .finish()
    }
}
