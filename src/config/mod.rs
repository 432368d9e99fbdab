// Settings as loaded from YAML or the command line, and the validated run config
mod settings;
mod upload_config;

pub use settings::UploadSettings;

pub use upload_config::{Credentials, UploadConfig};
