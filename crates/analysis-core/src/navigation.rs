use crate::store::ResultStore;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum View {
    #[default]
    Input,
    Results,
}

#[derive(Debug, Default)]
pub struct Navigator {
    current: View,
}

impl Navigator {
    pub fn current(&self) -> View {
        self.current
    }

    /// Shows the results view, or falls back to input when there is nothing
    /// to render. Returns the view actually shown.
    pub fn activate_results(&mut self, store: &ResultStore) -> View {
        self.current = if store.is_empty() {
            View::Input
        } else {
            View::Results
        };
        self.current
    }

    pub fn back(&mut self) -> View {
        self.current = View::Input;
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use protocol::AnalysisResult;

    #[test]
    fn empty_store_redirects_to_input() {
        let mut nav = Navigator::default();
        assert_eq!(nav.activate_results(&ResultStore::default()), View::Input);
        assert_eq!(nav.current(), View::Input);
    }

    #[test]
    fn populated_store_shows_results() {
        let mut store = ResultStore::default();
        store.put(AnalysisResult::default());
        let mut nav = Navigator::default();
        assert_eq!(nav.activate_results(&store), View::Results);
        assert_eq!(nav.back(), View::Input);
    }
}
