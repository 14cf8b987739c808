use std::path::PathBuf;

pub const MODEL_PATH_ENV: &str = "STRESS_MODEL_PATH";
pub const ENCODER_PATH_ENV: &str = "STRESS_ENCODER_PATH";

const DEFAULT_MODEL_PATH: &str = "stress_model.json";
const DEFAULT_ENCODER_PATH: &str = "label_encoder.json";

/// Where the classifier and label encoder artifacts live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelPaths {
    pub model: PathBuf,
    pub encoder: PathBuf,
}

impl Default for ModelPaths {
    fn default() -> Self {
        ModelPaths {
            model: PathBuf::from(DEFAULT_MODEL_PATH),
            encoder: PathBuf::from(DEFAULT_ENCODER_PATH),
        }
    }
}

impl ModelPaths {
    /// Explicit paths win, then the environment, then the working directory.
    pub fn resolve(model: Option<PathBuf>, encoder: Option<PathBuf>) -> Self {
        ModelPaths {
            model: pick(model, std::env::var(MODEL_PATH_ENV).ok(), DEFAULT_MODEL_PATH),
            encoder: pick(
                encoder,
                std::env::var(ENCODER_PATH_ENV).ok(),
                DEFAULT_ENCODER_PATH,
            ),
        }
    }
}

fn pick(flag: Option<PathBuf>, env: Option<String>, default: &str) -> PathBuf {
    flag.or_else(|| env.filter(|value| !value.is_empty()).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(default))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_beats_environment() {
        let path = pick(
            Some(PathBuf::from("/models/a.json")),
            Some("/env/b.json".to_string()),
            DEFAULT_MODEL_PATH,
        );
        assert_eq!(path, PathBuf::from("/models/a.json"));
    }

    #[test]
    fn environment_beats_default() {
        let path = pick(None, Some("/env/b.json".to_string()), DEFAULT_MODEL_PATH);
        assert_eq!(path, PathBuf::from("/env/b.json"));
    }

    #[test]
    fn blank_environment_falls_back_to_default() {
        let path = pick(None, Some(String::new()), DEFAULT_ENCODER_PATH);
        assert_eq!(path, PathBuf::from("label_encoder.json"));
    }
}
