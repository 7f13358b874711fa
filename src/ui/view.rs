use crate::core::storyboard::FormInput;
use crate::services::controller::{FormView, ResultAction};
use crate::services::render::Node;
use leptos::*;

/// Reactive state behind the form page.
#[derive(Debug, Clone, Copy)]
pub struct FormSignals {
    pub characters: RwSignal<String>,
    pub keywords: RwSignal<String>,
    pub plot: RwSignal<String>,
    pub pages: RwSignal<String>,
    pub submit_enabled: RwSignal<bool>,
    pub busy: RwSignal<bool>,
    pub error: RwSignal<Option<String>>,
    pub result: RwSignal<Option<Node>>,
    pub downloaded: RwSignal<bool>,
    pub copied: RwSignal<bool>,
}

impl FormSignals {
    pub fn new() -> Self {
        Self {
            characters: create_rw_signal(String::new()),
            keywords: create_rw_signal(String::new()),
            plot: create_rw_signal(String::new()),
            pages: create_rw_signal(String::new()),
            submit_enabled: create_rw_signal(false),
            busy: create_rw_signal(false),
            error: create_rw_signal(None),
            result: create_rw_signal(None),
            downloaded: create_rw_signal(false),
            copied: create_rw_signal(false),
        }
    }
}

impl Default for FormSignals {
    fn default() -> Self {
        Self::new()
    }
}

pub struct SignalView {
    signals: FormSignals,
    first_field: NodeRef<html::Input>,
    error_box: NodeRef<html::Div>,
}

impl SignalView {
    pub fn new(signals: FormSignals, first_field: NodeRef<html::Input>, error_box: NodeRef<html::Div>) -> Self {
        Self {
            signals,
            first_field,
            error_box,
        }
    }
}

impl FormView for SignalView {
    fn read_input(&self) -> FormInput {
        FormInput {
            characters: self.signals.characters.get_untracked(),
            keywords: self.signals.keywords.get_untracked(),
            plot: self.signals.plot.get_untracked(),
            pages: self.signals.pages.get_untracked(),
        }
    }

    fn clear_fields(&self) {
        self.signals.characters.set(String::new());
        self.signals.keywords.set(String::new());
        self.signals.plot.set(String::new());
        self.signals.pages.set(String::new());
    }

    fn focus_first_field(&self) {
        if let Some(input) = self.first_field.get_untracked() {
            let _ = input.focus();
        }
    }

    fn set_submit_enabled(&self, enabled: bool) {
        self.signals.submit_enabled.set(enabled);
    }

    fn set_busy(&self, busy: bool) {
        self.signals.busy.set(busy);
    }

    fn show_result(&self, view: Node) {
        self.signals.result.set(Some(view));
    }

    fn hide_result(&self) {
        self.signals.result.set(None);
    }

    fn show_error(&self, message: &str) {
        self.signals.error.set(Some(message.to_string()));
        if let Some(error_box) = self.error_box.get_untracked() {
            let options = web_sys::ScrollIntoViewOptions::new();
            options.set_behavior(web_sys::ScrollBehavior::Smooth);
            error_box.scroll_into_view_with_scroll_into_view_options(&options);
        }
    }

    fn hide_error(&self) {
        self.signals.error.set(None);
    }

    fn set_acknowledged(&self, action: ResultAction, acknowledged: bool) {
        match action {
            ResultAction::Download => self.signals.downloaded.set(acknowledged),
            ResultAction::Copy => self.signals.copied.set(acknowledged),
        }
    }
}
