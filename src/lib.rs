//! Student stress prediction: a pre-trained classifier picks a stress level
//! for a survey record and a fixed rule set explains which answers
//! contributed to it.

pub mod artifacts;
pub mod config;
pub mod error;
pub mod explain;
pub mod models;
pub mod predict;
pub mod report;
pub mod session;
pub mod survey;

pub use artifacts::{Classifier, LabelDecoder, LabelEncoder, TreeEnsemble};
pub use config::ModelPaths;
pub use error::{PredictError, RecordError, Result, SessionError};
pub use explain::explain;
pub use models::{InputRecord, PredictionResult, RelationshipStatus, StressLevel, SubstanceFrequency, Tone};
pub use predict::Predictor;
pub use survey::SurveyAnswers;
