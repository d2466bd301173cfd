//! Revision upgrade to LM-63-2002.

use tracing::info;

use super::keywords::PLACEHOLDER_VALUE;
use super::model::{IesDocument, IesFormat};
use crate::error::Result;

impl IesDocument {
    /// Re-tag the document as the newest revision.
    ///
    /// Keywords the new revision does not permit are moved to `_`-prefixed
    /// user keywords, except `DATE` which becomes `ISSUEDATE`. Missing
    /// required keywords are filled with a placeholder value.
    pub fn upgrade(&mut self) -> Result<()> {
        self.validate(false)?;

        let target = IesFormat::LATEST;
        let relocate: Vec<String> = self
            .keywords
            .keys()
            .filter(|k| !target.is_keyword_allowed(k))
            .map(String::from)
            .collect();

        for key in relocate {
            let new_key = if key == "DATE" {
                "ISSUEDATE".to_string()
            } else {
                format!("_{}", key)
            };
            info!(from = %key, to = %new_key, "relocating keyword");
            self.keywords.rename(&key, &new_key);
        }

        for required in target.required_keywords() {
            if !self.keywords.contains(required) {
                info!(keyword = *required, "adding placeholder for required keyword");
                self.keywords.insert(*required, PLACEHOLDER_VALUE);
            }
        }

        self.format = target;
        Ok(())
    }
}
