use common::Environment;
use std::{env, path::PathBuf, time::Duration};

/// Pause between capture iterations, applied unconditionally after every
/// iteration whether it skipped, failed or succeeded.
pub const CAPTURE_INTERVAL: Duration = Duration::from_secs(240);

pub const JPEG_QUALITY: i32 = 99;

const DEFAULT_CREDENTIAL_PATH: &str = "/home/pi/farmcam/firebase-adminsdk.json";
const DEFAULT_BUCKET: &str = "espcam-69f58.appspot.com";
const DEFAULT_EMAIL: &str = "farm@example.com";
const DEFAULT_OUTPUT_DIR: &str = "farm_images";

#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub environment: Environment,
    pub credential_path: PathBuf,
    pub bucket: String,
    pub email: String,
    pub device_index: u32,
    pub output_dir: PathBuf,
    pub capture_interval: Duration,
    pub jpeg_quality: i32,
}

impl AgentConfig {
    pub fn from_env() -> Self {
        let environment = Environment::from_env();

        let credential_path = env::var("FARMCAM_CREDENTIAL_PATH")
            .unwrap_or_else(|_| DEFAULT_CREDENTIAL_PATH.to_string())
            .into();

        let bucket = env::var("FARMCAM_BUCKET").unwrap_or_else(|_| DEFAULT_BUCKET.to_string());

        let email = env::var("FARMCAM_EMAIL").unwrap_or_else(|_| DEFAULT_EMAIL.to_string());

        let device_index = env::var("FARMCAM_DEVICE_INDEX")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(0);

        let output_dir = env::var("FARMCAM_OUTPUT_DIR")
            .unwrap_or_else(|_| DEFAULT_OUTPUT_DIR.to_string())
            .into();

        Self {
            environment,
            credential_path,
            bucket,
            email,
            device_index,
            output_dir,
            capture_interval: CAPTURE_INTERVAL,
            jpeg_quality: JPEG_QUALITY,
        }
    }
}
