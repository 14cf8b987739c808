use tracing::info;
use uuid::Uuid;

use crate::error::SessionError;
use crate::models::PredictionResult;
use crate::predict::Predictor;
use crate::survey::SurveyAnswers;

#[derive(Debug, Clone, PartialEq)]
pub enum Page {
    CollectingInput,
    ShowingResult {
        request_id: Uuid,
        result: PredictionResult,
    },
}

/// Two-page flow of the front end: fill in the form, see the result, start
/// over. Holds no state beyond the page currently shown.
pub struct Session<'a> {
    predictor: &'a Predictor,
    page: Page,
}

impl<'a> Session<'a> {
    pub fn new(predictor: &'a Predictor) -> Self {
        Session {
            predictor,
            page: Page::CollectingInput,
        }
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Builds the record and predicts. On any error the session stays on
    /// the input page.
    pub fn submit(&mut self, answers: &SurveyAnswers) -> Result<&Page, SessionError> {
        if !matches!(self.page, Page::CollectingInput) {
            return Err(SessionError::ResultShowing);
        }

        let record = answers.build()?;
        let request_id = Uuid::new_v4();
        let result = self.predictor.predict_request(request_id, &record)?;
        info!(%request_id, label = %result.label, reasons = result.reasons.len(), "prediction ready");

        self.page = Page::ShowingResult { request_id, result };
        Ok(&self.page)
    }

    pub fn result(&self) -> Option<&PredictionResult> {
        match &self.page {
            Page::ShowingResult { result, .. } => Some(result),
            Page::CollectingInput => None,
        }
    }

    pub fn reset(&mut self) {
        self.page = Page::CollectingInput;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::tests::{DEMO_ENCODER, DEMO_MODEL};
    use crate::artifacts::{LabelEncoder, TreeEnsemble};
    use crate::error::RecordError;
    use crate::models::StressLevel;

    fn demo_predictor() -> Predictor {
        Predictor::new(
            TreeEnsemble::from_json(DEMO_MODEL).unwrap(),
            LabelEncoder::from_json(DEMO_ENCODER).unwrap(),
        )
    }

    #[test]
    fn submit_then_reset_cycles_pages() {
        let predictor = demo_predictor();
        let mut session = Session::new(&predictor);
        assert_eq!(session.page(), &Page::CollectingInput);

        let page = session.submit(&SurveyAnswers::default()).unwrap();
        assert!(matches!(page, Page::ShowingResult { request_id, .. } if !request_id.is_nil()));
        assert_eq!(session.result().map(|result| result.label), Some(StressLevel::Low));

        session.reset();
        assert_eq!(session.page(), &Page::CollectingInput);
    }

    #[test]
    fn second_submit_requires_reset() {
        let predictor = demo_predictor();
        let mut session = Session::new(&predictor);
        session.submit(&SurveyAnswers::default()).unwrap();
        assert!(matches!(
            session.submit(&SurveyAnswers::default()),
            Err(SessionError::ResultShowing)
        ));
    }

    #[test]
    fn invalid_answers_keep_collecting() {
        let predictor = demo_predictor();
        let mut session = Session::new(&predictor);
        let answers = SurveyAnswers {
            sleep_hours: 13,
            ..SurveyAnswers::default()
        };
        assert!(matches!(
            session.submit(&answers),
            Err(SessionError::Record(RecordError::OutOfRange { field: "sleep_hours", .. }))
        ));
        assert_eq!(session.page(), &Page::CollectingInput);
        assert!(session.result().is_none());
    }
}
