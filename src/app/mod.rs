mod state;
mod ui;

use crate::upload::{ExtractError, ExtractionClient, ExtractionResult, RequestPhase, SelectedFile};
use eframe::{egui, App};
pub use state::{ResultView, ViewModel};
use state::UploadState;
use std::sync::mpsc as std_mpsc;
use std::time::Duration;

struct Completion {
    generation: u64,
    outcome: Result<ExtractionResult, ExtractError>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    Checking,
    Up,
    Down(String),
}

pub struct UploadController {
    state: UploadState,
    client: ExtractionClient,
    notice: Option<String>,
    health: Option<HealthStatus>,
    completion_sender: std_mpsc::Sender<Completion>,
    completion_receiver: std_mpsc::Receiver<Completion>,
    health_receiver: Option<std_mpsc::Receiver<Result<bool, ExtractError>>>,
}

impl UploadController {
    pub fn new(client: ExtractionClient) -> Self {
        tracing::info!(base_url = %client.base_url(), "initializing invoice uploader");
        let (completion_sender, completion_receiver) = std_mpsc::channel();
        Self {
            state: UploadState::default(),
            client,
            notice: None,
            health: None,
            completion_sender,
            completion_receiver,
            health_receiver: None,
        }
    }

    pub fn state(&self) -> &UploadState {
        &self.state
    }

    pub fn phase(&self) -> RequestPhase {
        self.state.phase()
    }

    pub fn view(&self) -> ViewModel {
        self.state.view(self.client.base_url())
    }

    /// Pending user notification. While set, the window accepts no other input.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// `None` means the picker was cancelled; nothing changes.
    pub fn select_file(&mut self, file: Option<SelectedFile>) {
        let Some(file) = file else {
            tracing::debug!("file selection cancelled");
            return;
        };

        if self.state.phase() == RequestPhase::Submitting {
            tracing::debug!(
                generation = self.state.generation(),
                "file changed while a request is in flight; its response will be ignored"
            );
        }

        tracing::debug!(
            file = %file.name,
            bytes = file.content.len(),
            content_type = %file.content_type,
            "file selected"
        );
        self.state.select_file(file);
    }

    /// Starts the one outbound request for the selected file. Precondition
    /// failures are reported to the user and returned synchronously.
    pub fn submit(&mut self) -> Result<(), ExtractError> {
        let ticket = match self.state.begin_submit() {
            Ok(ticket) => ticket,
            Err(e @ ExtractError::SubmissionInFlight) => {
                tracing::debug!("submit ignored, request already in flight");
                return Err(e);
            }
            Err(e) => {
                tracing::warn!(error = %e, "submit rejected");
                self.notice = Some(e.to_string());
                return Err(e);
            }
        };

        tracing::info!(
            generation = ticket.generation,
            file = %ticket.file.name,
            "submitting file for extraction"
        );

        let client = self.client.clone();
        let sender = self.completion_sender.clone();

        std::thread::spawn(move || {
            let outcome = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(rt) => rt.block_on(client.extract(&ticket.file)),
                Err(e) => Err(ExtractError::ServiceError(format!(
                    "failed to start request runtime: {}",
                    e
                ))),
            };

            let _ = sender.send(Completion {
                generation: ticket.generation,
                outcome,
            });
        });

        Ok(())
    }

    pub fn check_health(&mut self) {
        let client = self.client.clone();
        let (sender, receiver) = std_mpsc::channel();
        self.health_receiver = Some(receiver);
        self.health = Some(HealthStatus::Checking);

        std::thread::spawn(move || {
            let outcome = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(rt) => rt.block_on(client.health()),
                Err(e) => Err(ExtractError::ServiceError(e.to_string())),
            };
            let _ = sender.send(outcome);
        });
    }

    /// Drains finished requests without blocking. Returns how many were applied.
    pub fn poll_completions(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(completion) = self.completion_receiver.try_recv() {
            if self.apply_completion(completion) {
                applied += 1;
            }
        }
        applied
    }

    fn apply_completion(&mut self, completion: Completion) -> bool {
        let Completion {
            generation,
            outcome,
        } = completion;

        let failure = outcome.as_ref().err().map(|e| e.to_string());

        if !self.state.settle(generation, outcome) {
            tracing::debug!(
                generation,
                current = self.state.generation(),
                "discarding stale extraction response"
            );
            return false;
        }

        match failure {
            Some(message) => {
                tracing::warn!(generation, error = %message, "extraction failed");
                self.notice = Some(message);
            }
            None => tracing::info!(generation, "extraction succeeded"),
        }
        true
    }

    fn poll_health(&mut self) {
        let Some(receiver) = &self.health_receiver else {
            return;
        };

        if let Ok(outcome) = receiver.try_recv() {
            self.health = Some(match outcome {
                Ok(true) => HealthStatus::Up,
                Ok(false) => HealthStatus::Down("service reported not ok".to_string()),
                Err(e) => HealthStatus::Down(e.to_string()),
            });
            tracing::info!(status = ?self.health, "health check finished");
            self.health_receiver = None;
        }
    }

    pub fn update_state(&mut self, ctx: &egui::Context) {
        self.poll_completions();
        self.poll_health();

        if self.state.phase() == RequestPhase::Submitting || self.health_receiver.is_some() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }

    /// Blocks until one completion arrives. `Some(true)` if it was applied.
    #[cfg(test)]
    fn wait_for_completion(&mut self, timeout: Duration) -> Option<bool> {
        let completion = self.completion_receiver.recv_timeout(timeout).ok()?;
        Some(self.apply_completion(completion))
    }
}

impl App for UploadController {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.update_state(ctx);
        self.render(ctx);
    }
}
