use tracing::{debug, info_span};
use uuid::Uuid;

use crate::artifacts::{Classifier, LabelDecoder, LabelEncoder, TreeEnsemble};
use crate::config::ModelPaths;
use crate::error::Result;
use crate::explain::explain;
use crate::models::{InputRecord, PredictionResult, StressLevel};

/// Read-only handle over the loaded artifacts. Load it once and reuse it
/// for every request.
pub struct Predictor {
    classifier: Box<dyn Classifier>,
    decoder: Box<dyn LabelDecoder>,
}

impl Predictor {
    pub fn new(
        classifier: impl Classifier + 'static,
        decoder: impl LabelDecoder + 'static,
    ) -> Self {
        Predictor {
            classifier: Box::new(classifier),
            decoder: Box::new(decoder),
        }
    }

    pub fn load(paths: &ModelPaths) -> Result<Self> {
        let classifier = TreeEnsemble::load(&paths.model)?;
        let decoder = LabelEncoder::load(&paths.encoder)?;
        Ok(Predictor::new(classifier, decoder))
    }

    pub fn classify(&self, record: &InputRecord) -> Result<StressLevel> {
        let index = self.classifier.predict(record);
        let label = self.decoder.decode(index)?;
        debug!(index, %label, "classified record");
        Ok(label)
    }

    pub fn predict(&self, record: &InputRecord) -> Result<PredictionResult> {
        Ok(PredictionResult {
            label: self.classify(record)?,
            reasons: explain(record),
        })
    }

    /// Same as [`Predictor::predict`], run inside a `predict` span tagged
    /// with `request_id`.
    pub fn predict_request(&self, request_id: Uuid, record: &InputRecord) -> Result<PredictionResult> {
        info_span!("predict", %request_id).in_scope(|| self.predict(record))
    }
}
