use crate::upload::{
    ExtractError, ExtractedField, ExtractionResult, RequestPhase, SelectedFile,
};
use crate::utils::file_size::FileSizeUtils;

pub const SUBMIT_LABEL: &str = "📤 Upload and Extract";
pub const SUBMITTING_LABEL: &str = "Submitting";

/// Where the current request stands. The result only exists inside
/// `Succeeded`, so a result can never be shown for any other phase.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionProgress {
    Idle,
    Submitting { generation: u64 },
    Succeeded(ExtractionResult),
    Failed(String),
}

impl Default for ActionProgress {
    fn default() -> Self {
        Self::Idle
    }
}

/// Handed out by `begin_submit`; the completion must come back with the same
/// generation to be applied.
#[derive(Debug, Clone)]
pub struct SubmitTicket {
    pub generation: u64,
    pub file: SelectedFile,
}

#[derive(Debug, Default)]
pub struct UploadState {
    selected_file: Option<SelectedFile>,
    progress: ActionProgress,
    generation: u64,
}

impl UploadState {
    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.selected_file.as_ref()
    }

    pub fn progress(&self) -> &ActionProgress {
        &self.progress
    }

    pub fn phase(&self) -> RequestPhase {
        match self.progress {
            ActionProgress::Idle => RequestPhase::Idle,
            ActionProgress::Submitting { .. } => RequestPhase::Submitting,
            ActionProgress::Succeeded(_) => RequestPhase::Succeeded,
            ActionProgress::Failed(_) => RequestPhase::Failed,
        }
    }

    pub fn result(&self) -> Option<&ExtractionResult> {
        match &self.progress {
            ActionProgress::Succeeded(result) => Some(result),
            _ => None,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Replaces the selection and drops any prior result. Also orphans an
    /// in-flight request: its completion will no longer match the generation.
    pub fn select_file(&mut self, file: SelectedFile) {
        self.generation += 1;
        self.selected_file = Some(file);
        self.progress = ActionProgress::Idle;
    }

    pub fn begin_submit(&mut self) -> Result<SubmitTicket, ExtractError> {
        if matches!(self.progress, ActionProgress::Submitting { .. }) {
            return Err(ExtractError::SubmissionInFlight);
        }
        let file = self
            .selected_file
            .clone()
            .ok_or(ExtractError::NoFileSelected)?;

        self.generation += 1;
        self.progress = ActionProgress::Submitting {
            generation: self.generation,
        };

        Ok(SubmitTicket {
            generation: self.generation,
            file,
        })
    }

    /// Applies a completion. Returns false when it belongs to a request that
    /// is no longer current, in which case nothing changes.
    pub fn settle(
        &mut self,
        generation: u64,
        outcome: Result<ExtractionResult, ExtractError>,
    ) -> bool {
        match self.progress {
            ActionProgress::Submitting { generation: current } if current == generation => {}
            _ => return false,
        }

        self.progress = match outcome {
            Ok(result) => ActionProgress::Succeeded(result),
            Err(e) => ActionProgress::Failed(e.to_string()),
        };
        true
    }

    pub fn view(&self, base_url: &str) -> ViewModel {
        let submitting = self.phase() == RequestPhase::Submitting;

        ViewModel {
            submit_enabled: !submitting,
            submit_label: if submitting {
                SUBMITTING_LABEL
            } else {
                SUBMIT_LABEL
            },
            selected_label: self.selected_file.as_ref().map(|file| {
                format!("{} ({})", file.name, FileSizeUtils::format_size(file.size()))
            }),
            results: self.result().map(|result| ResultView {
                rows: result.fields.clone(),
                single_xml_link: format!("{}{}", base_url, result.single_xml),
                master_xml_link: format!("{}{}", base_url, result.master_xml),
            }),
        }
    }
}

/// Everything the window needs to draw, derived from the state alone.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewModel {
    pub submit_enabled: bool,
    pub submit_label: &'static str,
    pub selected_label: Option<String>,
    pub results: Option<ResultView>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultView {
    pub rows: Vec<ExtractedField>,
    pub single_xml_link: String,
    pub master_xml_link: String,
}

impl ResultView {
    pub fn row_pairs(&self) -> Vec<(&str, &str)> {
        self.rows
            .iter()
            .map(|f| (f.name.as_str(), f.value.as_str()))
            .collect()
    }
}
