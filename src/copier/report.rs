use crate::types::Project;

/// Result of a copier run.
#[derive(Debug)]
pub enum CopyOutcome {
    /// No source project carried the requested number.
    NotFound,
    Copied(CopyReport),
}

/// What a copy achieved, including the failures that did not abort it.
#[derive(Debug)]
pub struct CopyReport {
    /// The project created in the destination organization.
    pub project: Project,
    pub columns_created: usize,
    pub cards_created: usize,
    /// Cards left behind because their column could not be created.
    pub cards_skipped: usize,
    /// Nonfatal failures, already rendered with their context chain.
    pub failures: Vec<String>,
}

impl CopyReport {
    pub fn new(project: Project) -> Self {
        Self {
            project,
            columns_created: 0,
            cards_created: 0,
            cards_skipped: 0,
            failures: Vec::new(),
        }
    }

    pub fn record_failure(&mut self, error: &anyhow::Error) {
        self.failures.push(format!("{error:#}"));
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn log_summary(&self) {
        if self.is_complete() {
            tracing::info!(
                id = self.project.id,
                "copied {} column(s) and {} card(s) into {:?}",
                self.columns_created,
                self.cards_created,
                self.project.name
            );
        } else {
            tracing::warn!(
                id = self.project.id,
                "partial copy into {:?}: {} column(s) and {} card(s) created, {} card(s) skipped, {} failure(s)",
                self.project.name,
                self.columns_created,
                self.cards_created,
                self.cards_skipped,
                self.failures.len()
            );
            for failure in &self.failures {
                tracing::warn!("  {failure}");
            }
        }
    }
}
