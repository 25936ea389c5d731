use protocol::AnalysisResult;

/// Most recent successful analysis. Overwritten, never merged.
#[derive(Debug, Default)]
pub struct ResultStore {
    current: Option<AnalysisResult>,
}

impl ResultStore {
    pub fn put(&mut self, result: AnalysisResult) {
        self.current = Some(result);
    }

    pub fn get(&self) -> Option<&AnalysisResult> {
        self.current.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_overwrites_previous_result() {
        let mut store = ResultStore::default();
        assert!(store.is_empty());
        store.put(AnalysisResult {
            summary: "first".into(),
            fake_sentences: vec!["A".into()],
            ..AnalysisResult::default()
        });
        store.put(AnalysisResult {
            summary: "second".into(),
            ..AnalysisResult::default()
        });
        let current = store.get().expect("result");
        assert_eq!(current.summary, "second");
        assert!(current.fake_sentences.is_empty());
    }
}
