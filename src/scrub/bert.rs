use std::sync::Mutex;

use rust_bert::pipelines::ner::NERModel;

use crate::error::{MailscrubError, Result};

use super::entity::{Entity, EntityRecognizer};

/// Pretrained token-classification recognizer.
///
/// The model handle is constructed once per process and shared behind a
/// mutex; inference calls serialize on it. Construction pulls the model
/// artifacts into the local cache when they are not already present, and
/// retries the load once after a failed first attempt. A failure after
/// the retry is fatal for the redaction capability: callers must not
/// proceed without the entity stage.
pub struct BertRecognizer {
    model: Mutex<NERModel>,
}

impl BertRecognizer {
    pub fn new() -> Result<Self> {
        let model = match NERModel::new(Default::default()) {
            Ok(model) => model,
            Err(first) => {
                tracing::warn!("model load failed ({first}); refetching artifacts and retrying");
                NERModel::new(Default::default()).map_err(|e| {
                    MailscrubError::ModelUnavailable {
                        reason: e.to_string(),
                    }
                })?
            }
        };
        Ok(Self {
            model: Mutex::new(model),
        })
    }
}

impl EntityRecognizer for BertRecognizer {
    fn entities(&self, text: &str) -> Result<Vec<Entity>> {
        let model = self.model.lock().unwrap_or_else(|e| e.into_inner());
        let mut batches = model.predict_full_entities(&[text]);
        let first = batches.pop().unwrap_or_default();
        Ok(first
            .into_iter()
            .map(|e| Entity {
                text: e.word,
                label: e.label,
            })
            .collect())
    }
}
