//! Terminal front-end: the same controller, driven through `inquire` prompts.

use crate::core::config::{Config, PageOption};
use crate::core::storyboard::FormInput;
use crate::services::api::HttpStoryboardApi;
use crate::services::clipboard::SystemClipboard;
use crate::services::controller::{FormController, FormView, ResultAction};
use crate::services::download::DirectorySaver;
use crate::services::render::Node;
use anyhow::Result;
use inquire::{Select, Text};
use std::cell::{Cell, RefCell};
use std::fmt;

pub struct ConsoleView {
    fields: RefCell<FormInput>,
    submit_enabled: Cell<bool>,
}

impl ConsoleView {
    pub fn new() -> Self {
        Self {
            fields: RefCell::new(FormInput::default()),
            submit_enabled: Cell::new(false),
        }
    }

    pub fn set_fields(&self, input: FormInput) {
        *self.fields.borrow_mut() = input;
    }

    pub fn submit_enabled(&self) -> bool {
        self.submit_enabled.get()
    }
}

impl Default for ConsoleView {
    fn default() -> Self {
        Self::new()
    }
}

impl FormView for ConsoleView {
    fn read_input(&self) -> FormInput {
        self.fields.borrow().clone()
    }

    fn clear_fields(&self) {
        *self.fields.borrow_mut() = FormInput::default();
    }

    fn focus_first_field(&self) {}

    fn set_submit_enabled(&self, enabled: bool) {
        self.submit_enabled.set(enabled);
    }

    fn set_busy(&self, busy: bool) {
        if busy {
            println!("Generating storyboard...");
        }
    }

    fn show_result(&self, view: Node) {
        println!("\n{}\n", view.to_outline());
    }

    fn hide_result(&self) {}

    fn show_error(&self, message: &str) {
        eprintln!("Error: {}", message);
    }

    fn hide_error(&self) {}

    fn set_acknowledged(&self, action: ResultAction, acknowledged: bool) {
        if acknowledged {
            match action {
                ResultAction::Download => println!("Downloaded!"),
                ResultAction::Copy => println!("Copied!"),
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Download,
    Copy,
    SaveJson,
    NewStory,
    Quit,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Action::Download => "Download DOCX",
            Action::Copy => "Copy text",
            Action::SaveJson => "Save JSON",
            Action::NewStory => "New story",
            Action::Quit => "Quit",
        };
        f.write_str(label)
    }
}

struct PageChoice(PageOption);

impl fmt::Display for PageChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.label)
    }
}

fn prompt_input(page_options: &[PageOption]) -> Result<FormInput> {
    let characters = Text::new("Characters:")
        .with_help_message("e.g. Jimin (20s office worker), Mom")
        .prompt()?;
    let keywords = Text::new("Keywords:").prompt()?;
    let plot = Text::new("Plot:").prompt()?;

    let choices: Vec<PageChoice> = page_options.iter().cloned().map(PageChoice).collect();
    let pages = Select::new("Pages:", choices).prompt()?;

    Ok(FormInput {
        characters,
        keywords,
        plot,
        pages: pages.0.value,
    })
}

pub fn build_controller(config: &Config) -> Result<FormController<ConsoleView>> {
    let api = HttpStoryboardApi::new(&config.api)?;
    Ok(FormController::new(
        ConsoleView::new(),
        Box::new(api),
        Box::new(SystemClipboard::new()),
        Box::new(DirectorySaver::new(&config.output_folder)),
        config.ui.acknowledgement(),
    ))
}

/// Actions offered after a generation attempt. Result actions are only
/// offered while a storyboard is held.
fn available_actions(has_result: bool) -> Vec<Action> {
    if has_result {
        vec![Action::Download, Action::Copy, Action::SaveJson, Action::NewStory, Action::Quit]
    } else {
        vec![Action::NewStory, Action::Quit]
    }
}

/// Prompt, generate, then offer the result actions until the user quits.
pub async fn run(config: &Config) -> Result<()> {
    let controller = build_controller(config)?;
    let page_options = config.ui.page_options();

    loop {
        let input = prompt_input(&page_options)?;
        controller.view().set_fields(input);
        controller.validate();

        if controller.submit().await.is_err() && controller.current_result().is_some() {
            println!("The previous storyboard is still available.");
        }

        loop {
            let actions = available_actions(controller.current_result().is_some());
            match Select::new("What next?", actions).prompt()? {
                Action::Download => {
                    if let Ok(filename) = controller.export_document().await {
                        println!("Saved {}/{}", config.output_folder, filename);
                    }
                }
                Action::Copy => {
                    let _ = controller.copy_text().await;
                }
                Action::SaveJson => {
                    if let Ok(filename) = controller.save_result().await {
                        println!("Saved {}/{}", config.output_folder, filename);
                    }
                }
                Action::NewStory => {
                    controller.reset();
                    break;
                }
                Action::Quit => return Ok(()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::storyboard::tests::sample_storyboard;
    use crate::services::render::render;

    #[test]
    fn test_console_view_tracks_fields() {
        let view = ConsoleView::new();
        view.set_fields(FormInput {
            plot: "plot".to_string(),
            pages: "4".to_string(),
            ..Default::default()
        });
        assert!(view.read_input().is_complete());

        view.clear_fields();
        assert_eq!(view.read_input(), FormInput::default());
    }

    #[test]
    fn test_controller_validates_console_fields() -> Result<()> {
        let controller = build_controller(&Config::default())?;
        assert!(!controller.view().submit_enabled());

        controller.view().set_fields(FormInput {
            plot: "plot".to_string(),
            pages: "8".to_string(),
            ..Default::default()
        });
        assert!(controller.validate());
        assert!(controller.view().submit_enabled());

        controller.reset();
        assert!(!controller.view().submit_enabled());
        Ok(())
    }

    #[test]
    fn test_show_result_accepts_rendered_tree() {
        ConsoleView::new().show_result(render(&sample_storyboard(1)));
    }

    #[test]
    fn test_action_labels() {
        assert_eq!(Action::Download.to_string(), "Download DOCX");
        assert_eq!(Action::SaveJson.to_string(), "Save JSON");
        assert_eq!(Action::NewStory.to_string(), "New story");
    }

    #[test]
    fn test_result_actions_follow_held_result() {
        assert_eq!(available_actions(false), vec![Action::NewStory, Action::Quit]);

        let actions = available_actions(true);
        assert!(actions.contains(&Action::Download));
        assert!(actions.contains(&Action::Copy));
        assert!(actions.contains(&Action::SaveJson));
        assert_eq!(actions.last(), Some(&Action::Quit));
    }

    #[tokio::test]
    async fn test_failed_regeneration_keeps_result_actions() -> Result<()> {
        let mut server = mockito::Server::new_async().await;
        let _first = server
            .mock("POST", "/api/generate")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                serde_json::json!({
                    "success": true,
                    "storyboard": sample_storyboard(2),
                    "filename": "storyboard_20240101_120000.json"
                })
                .to_string(),
            )
            .expect(1)
            .create_async()
            .await;

        let temp_dir = tempfile::tempdir()?;
        let mut config = Config::default();
        config.api.base_url = server.url();
        config.output_folder = temp_dir.path().to_string_lossy().to_string();
        let controller = build_controller(&config)?;

        controller.view().set_fields(FormInput {
            plot: "plot".to_string(),
            pages: "2".to_string(),
            ..Default::default()
        });
        controller.submit().await?;

        server.reset_async().await;
        let _second = server
            .mock("POST", "/api/generate")
            .with_status(500)
            .with_body(r#"{"error": "busy"}"#)
            .create_async()
            .await;
        assert!(controller.submit().await.is_err());
        assert!(available_actions(controller.current_result().is_some()).contains(&Action::SaveJson));

        let filename = controller.save_result().await?;
        assert_eq!(filename, "storyboard_20240101_120000.json");
        let saved: serde_json::Value = serde_json::from_slice(&std::fs::read(temp_dir.path().join(&filename))?)?;
        assert_eq!(saved["wholeTitle"], "New City, New Me");
        Ok(())
    }
}
