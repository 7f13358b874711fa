use crate::core::error::{ControllerError, Operation};
use crate::core::storyboard::{FormInput, GenerateRequest, GenerationResult, Storyboard};
use crate::services::api::StoryboardApi;
use crate::services::clipboard::ClipboardAccess;
use crate::services::download::FileSaver;
use crate::services::render::{self, Node};
use crate::utils::time::{export_filename, sleep};
use chrono::Utc;
use log::{debug, error, info, warn};
use std::cell::{Cell, RefCell};
use std::time::Duration;

/// Result actions that briefly show an acknowledgement after succeeding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultAction {
    Download,
    Copy,
}

/// The form surface: fields, triggers, result area and error slot.
pub trait FormView {
    fn read_input(&self) -> FormInput;
    fn clear_fields(&self);
    fn focus_first_field(&self);
    fn set_submit_enabled(&self, enabled: bool);
    /// Busy indicator on the submit trigger.
    fn set_busy(&self, busy: bool);
    /// Replaces the result area with `view` and hides the empty-state placeholder.
    fn show_result(&self, view: Node);
    fn hide_result(&self);
    /// Single error slot; a new message replaces the old one.
    fn show_error(&self, message: &str);
    fn hide_error(&self);
    fn set_acknowledged(&self, action: ResultAction, acknowledged: bool);
}

pub struct FormController<V: FormView> {
    view: V,
    api: Box<dyn StoryboardApi>,
    clipboard: Box<dyn ClipboardAccess>,
    saver: Box<dyn FileSaver>,
    acknowledgement: Duration,
    current: RefCell<Option<GenerationResult>>,
    loading: Cell<bool>,
}

impl<V: FormView> FormController<V> {
    pub fn new(
        view: V,
        api: Box<dyn StoryboardApi>,
        clipboard: Box<dyn ClipboardAccess>,
        saver: Box<dyn FileSaver>,
        acknowledgement: Duration,
    ) -> Self {
        let controller = Self {
            view,
            api,
            clipboard,
            saver,
            acknowledgement,
            current: RefCell::new(None),
            loading: Cell::new(false),
        };
        controller.validate();
        controller
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn current_result(&self) -> Option<Storyboard> {
        self.current.borrow().as_ref().map(|r| r.storyboard.clone())
    }

    pub fn current_text_content(&self) -> Option<String> {
        self.current.borrow().as_ref().map(|r| r.text_content.clone())
    }

    pub fn current_filename(&self) -> Option<String> {
        self.current.borrow().as_ref().map(|r| r.filename.clone())
    }

    pub fn is_loading(&self) -> bool {
        self.loading.get()
    }

    /// Mirrors form completeness onto the submit trigger. The trigger stays
    /// disabled while a generation is in flight.
    pub fn validate(&self) -> bool {
        let valid = self.view.read_input().is_complete();
        self.view.set_submit_enabled(valid && !self.loading.get());
        valid
    }

    pub async fn submit(&self) -> Result<GenerationResult, ControllerError> {
        if self.loading.get() {
            debug!("Ignoring submit while a generation is in flight");
            return Err(ControllerError::InFlight);
        }
        if !self.validate() {
            return Err(self.fail(ControllerError::MissingFields));
        }

        let input = self.view.read_input();
        self.set_loading(true);
        let outcome = self
            .api
            .generate(&GenerateRequest::from(&input))
            .await
            .map_err(|e| ControllerError::request(Operation::Generate, e));
        self.set_loading(false);

        let result = outcome.map_err(|e| self.fail(e))?;
        info!(
            "Generated \"{}\" with {} pages",
            result.storyboard.whole_title,
            result.storyboard.pages.len()
        );
        self.render(&result);
        *self.current.borrow_mut() = Some(result.clone());
        Ok(result)
    }

    /// Rebuilds the result area from scratch.
    pub fn render(&self, result: &GenerationResult) {
        self.view.show_result(render::render(&result.storyboard));
    }

    /// Downloads the current storyboard as DOCX and returns the saved filename.
    pub async fn export_document(&self) -> Result<String, ControllerError> {
        let storyboard = self.current_result();
        let Some(storyboard) = storyboard else {
            return Err(self.fail(ControllerError::NothingToExport));
        };

        let content = self
            .api
            .export_docx(&storyboard)
            .await
            .map_err(|e| self.fail(ControllerError::request(Operation::Export, e)))?;

        let filename = export_filename(Utc::now());
        self.saver
            .save(&filename, &content)
            .await
            .map_err(|e| self.fail(ControllerError::SaveFailed(format!("{:#}", e))))?;

        self.acknowledge(ResultAction::Download).await;
        Ok(filename)
    }

    /// Saves the current storyboard as pretty JSON under its suggested filename.
    pub async fn save_result(&self) -> Result<String, ControllerError> {
        let current = self
            .current
            .borrow()
            .as_ref()
            .map(|r| (r.storyboard.clone(), r.filename.clone()));
        let Some((storyboard, filename)) = current else {
            return Err(self.fail(ControllerError::NothingToExport));
        };

        let content = serde_json::to_vec_pretty(&storyboard)
            .map_err(|e| self.fail(ControllerError::ResultSaveFailed(e.to_string())))?;
        self.saver
            .save(&filename, &content)
            .await
            .map_err(|e| self.fail(ControllerError::ResultSaveFailed(format!("{:#}", e))))?;

        info!("Saved storyboard JSON as {}", filename);
        Ok(filename)
    }

    pub async fn copy_text(&self) -> Result<(), ControllerError> {
        let text = self.current_text_content().filter(|t| !t.is_empty());
        let Some(text) = text else {
            return Err(self.fail(ControllerError::NothingToCopy));
        };

        if let Err(e) = self.clipboard.write_text(&text).await {
            warn!("Clipboard unavailable, falling back to selection copy: {:#}", e);
            if let Err(e) = self.clipboard.copy_with_selection(&text) {
                return Err(self.fail(ControllerError::CopyFailed(format!("{:#}", e))));
            }
        }

        self.acknowledge(ResultAction::Copy).await;
        Ok(())
    }

    /// Back to an empty form.
    pub fn reset(&self) {
        self.view.clear_fields();
        self.view.hide_result();
        self.view.hide_error();
        *self.current.borrow_mut() = None;
        self.validate();
        self.view.focus_first_field();
    }

    fn set_loading(&self, loading: bool) {
        self.loading.set(loading);
        self.view.set_busy(loading);
        if loading {
            self.view.set_submit_enabled(false);
            self.view.hide_error();
            self.view.hide_result();
        } else {
            self.validate();
        }
    }

    async fn acknowledge(&self, action: ResultAction) {
        self.view.set_acknowledged(action, true);
        if !self.acknowledgement.is_zero() {
            sleep(self.acknowledgement).await;
        }
        self.view.set_acknowledged(action, false);
    }

    fn fail(&self, err: ControllerError) -> ControllerError {
        match std::error::Error::source(&err) {
            Some(source) => error!("{} ({})", err, source),
            None => error!("{}", err),
        }
        self.view.show_error(&err.user_message());
        err
    }
}
