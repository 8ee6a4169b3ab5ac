use crate::daylight;
use crate::pacing::IntervalPacer;
use crate::sink::{LocalSink, snapshot_filename};
use capture::{CaptureError, FrameEncoder, FrameGrabber};
use chrono::{DateTime, Local};
use firebase::{FirebaseClient, FirebaseError, object_key};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

pub const CONTENT_TYPE_JPEG: &str = "image/jpeg";

/// Upload seam, so the loop can be driven against a fake store in tests.
pub trait RemoteStore {
    fn upload(&mut self, key: &str, bytes: Vec<u8>, content_type: &str)
    -> Result<(), FirebaseError>;
}

impl RemoteStore for FirebaseClient {
    fn upload(
        &mut self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), FirebaseError> {
        self.upload_object(key, bytes, content_type)
    }
}

/// What one iteration did. The driver logs these and always keeps going;
/// nothing in here is fatal.
#[derive(Debug)]
pub enum IterationOutcome {
    SkippedNight,
    Uploaded {
        local_path: PathBuf,
        key: String,
    },
    CaptureFailed(CaptureError),
    PersistFailed(std::io::Error),
    UploadEncodeFailed {
        local_path: PathBuf,
        source: CaptureError,
    },
    UploadFailed {
        local_path: PathBuf,
        source: FirebaseError,
    },
}

pub struct AgentService<G, S, E> {
    uid: String,
    grabber: G,
    store: S,
    encoder: E,
    sink: LocalSink,
    interval: Duration,
}

impl<G: FrameGrabber, S: RemoteStore, E: FrameEncoder> AgentService<G, S, E> {
    pub fn new(
        uid: String,
        grabber: G,
        store: S,
        encoder: E,
        sink: LocalSink,
        interval: Duration,
    ) -> Self {
        Self {
            uid,
            grabber,
            store,
            encoder,
            sink,
            interval,
        }
    }

    pub fn run(mut self, shutdown: &AtomicBool) {
        tracing::info!(uid = %self.uid, interval_secs = self.interval.as_secs(), "Starting capture loop");
        let pacer = IntervalPacer::new(self.interval);

        while !shutdown.load(Ordering::Relaxed) {
            let outcome = self.run_iteration_at(Local::now());
            log_outcome(&outcome);
            pacer.sleep(shutdown);
        }

        tracing::info!("Capture loop stopped");
    }

    /// One gate-capture-persist-upload pass, evaluated at `now`. The
    /// instant is a parameter so the gate and the artifact naming share
    /// one clock reading and can be pinned in tests.
    fn run_iteration_at(&mut self, now: DateTime<Local>) -> IterationOutcome {
        if !daylight::is_daytime_at(&now) {
            return IterationOutcome::SkippedNight;
        }

        let frame = match self.grabber.grab() {
            Ok(frame) => frame,
            Err(e) => return IterationOutcome::CaptureFailed(e),
        };

        let filename = snapshot_filename(&now);

        let local_bytes = match self.encoder.encode(&frame) {
            Ok(bytes) => bytes,
            Err(e) => return IterationOutcome::CaptureFailed(e),
        };
        let local_path = match self.sink.write(&filename, &local_bytes) {
            Ok(path) => path,
            Err(e) => return IterationOutcome::PersistFailed(e),
        };
        tracing::info!(path = %local_path.display(), "Image saved locally");

        // The upload payload is encoded independently of the bytes that
        // went to disk. At this point a local artifact exists, so a
        // failure here is not a capture failure.
        let payload = match self.encoder.encode(&frame) {
            Ok(bytes) => bytes,
            Err(source) => return IterationOutcome::UploadEncodeFailed { local_path, source },
        };

        let key = object_key(&self.uid, &filename);
        match self.store.upload(&key, payload, CONTENT_TYPE_JPEG) {
            Ok(()) => IterationOutcome::Uploaded { local_path, key },
            Err(source) => IterationOutcome::UploadFailed { local_path, source },
        }
    }
}

fn log_outcome(outcome: &IterationOutcome) {
    match outcome {
        IterationOutcome::SkippedNight => {
            tracing::info!("Not daytime, skipping capture");
        }
        IterationOutcome::Uploaded { key, .. } => {
            tracing::info!(%key, "Image uploaded");
        }
        IterationOutcome::CaptureFailed(e) => {
            tracing::warn!(error = %e, "Capture failed, retrying next cycle");
        }
        IterationOutcome::PersistFailed(e) => {
            tracing::warn!(error = %e, "Failed to save image locally");
        }
        IterationOutcome::UploadEncodeFailed { local_path, source } => {
            tracing::warn!(
                error = %source,
                path = %local_path.display(),
                "Upload payload encode failed, local copy kept"
            );
        }
        IterationOutcome::UploadFailed { local_path, source } => {
            tracing::warn!(
                error = %source,
                path = %local_path.display(),
                "Upload failed, local copy kept"
            );
        }
    }
}
