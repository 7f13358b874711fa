pub mod view;

use crate::core::config::Config;
use crate::services::api::HttpStoryboardApi;
use crate::services::clipboard::BrowserClipboard;
use crate::services::controller::FormController;
use crate::services::download::BrowserDownload;
use crate::services::render::{Node, Tag};
use leptos::*;
use log::{debug, info, warn};
use std::rc::Rc;
use view::{FormSignals, SignalView};

type Controller = Rc<FormController<SignalView>>;

/// Turns the rendered storyboard into DOM. Text leaves are inserted as text
/// nodes only.
pub fn node_view(node: &Node) -> View {
    match node {
        Node::Text(text) => text.clone().into_view(),
        Node::Element { tag, class, children } => {
            let class = *class;
            let children: Vec<View> = children.iter().map(node_view).collect();
            match tag {
                Tag::Section => view! { <section class=class>{children}</section> }.into_view(),
                Tag::Div => view! { <div class=class>{children}</div> }.into_view(),
                Tag::Span => view! { <span class=class>{children}</span> }.into_view(),
                Tag::Strong => view! { <strong class=class>{children}</strong> }.into_view(),
                Tag::H2 => view! { <h2 class=class>{children}</h2> }.into_view(),
                Tag::P => view! { <p class=class>{children}</p> }.into_view(),
            }
        }
    }
}

/// Registers the offline worker; failures are only logged.
pub fn register_service_worker(path: &str) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let navigator = window.navigator();
    let supported = js_sys::Reflect::has(&navigator, &wasm_bindgen::JsValue::from_str("serviceWorker")).unwrap_or(false);
    if !supported {
        debug!("Service workers not supported");
        return;
    }

    let promise = navigator.service_worker().register(path);
    let path = path.to_string();
    spawn_local(async move {
        match wasm_bindgen_futures::JsFuture::from(promise).await {
            Ok(_) => info!("Service worker registered: {}", path),
            Err(e) => warn!("Service worker registration failed: {:?}", e),
        }
    });
}

#[component]
pub fn App(config: Config) -> impl IntoView {
    let api = match HttpStoryboardApi::new(&config.api) {
        Ok(api) => api,
        Err(e) => {
            return view! { <p class="error-message">"Error creating API client: " {format!("{:#}", e)}</p> }
                .into_view()
        }
    };

    let signals = FormSignals::new();
    let first_field = create_node_ref::<html::Input>();
    let error_box = create_node_ref::<html::Div>();

    let controller: Controller = Rc::new(FormController::new(
        SignalView::new(signals, first_field, error_box),
        Box::new(api),
        Box::new(BrowserClipboard::new()),
        Box::new(BrowserDownload::new()),
        config.ui.acknowledgement(),
    ));

    let page_options = config.ui.page_options();

    view! {
        <div class="app-container">
            <h1>"Instatoon Storyboard"</h1>
            <StoryForm controller=controller.clone() signals=signals first_field=first_field page_options=page_options/>
            <div
                class="error-message"
                node_ref=error_box
                style:display=move || if signals.error.with(Option::is_some) { "block" } else { "none" }
            >
                {move || signals.error.get().unwrap_or_default()}
            </div>
            <ResultPanel controller=controller signals=signals/>
        </div>
    }
    .into_view()
}

#[component]
fn StoryForm(
    controller: Controller,
    signals: FormSignals,
    first_field: NodeRef<html::Input>,
    page_options: Vec<crate::core::config::PageOption>,
) -> impl IntoView {
    let on_edit = {
        let controller = controller.clone();
        move |field: RwSignal<String>, value: String| {
            field.set(value);
            controller.validate();
        }
    };
    let edit_characters = on_edit.clone();
    let edit_keywords = on_edit.clone();
    let edit_plot = on_edit.clone();
    let edit_pages = on_edit;

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        let controller = controller.clone();
        spawn_local(async move {
            let _ = controller.submit().await;
        });
    };

    let options = page_options
        .into_iter()
        .map(|o| view! { <option value=o.value>{o.label}</option> })
        .collect_view();

    view! {
        <form class="story-form" on:submit=on_submit>
            <label for="characters">"Characters"</label>
            <input
                id="characters"
                type="text"
                placeholder="e.g. Jimin (20s office worker), Mom"
                node_ref=first_field
                prop:value=move || signals.characters.get()
                on:input=move |ev| edit_characters(signals.characters, event_target_value(&ev))
            />

            <label for="keywords">"Keywords"</label>
            <input
                id="keywords"
                type="text"
                placeholder="e.g. moving, new beginnings"
                prop:value=move || signals.keywords.get()
                on:input=move |ev| edit_keywords(signals.keywords, event_target_value(&ev))
            />

            <label for="plot">"Plot *"</label>
            <textarea
                id="plot"
                rows="5"
                placeholder="Describe the story you want to tell"
                prop:value=move || signals.plot.get()
                on:input=move |ev| edit_plot(signals.plot, event_target_value(&ev))
            ></textarea>

            <label for="pages">"Pages *"</label>
            <select
                id="pages"
                prop:value=move || signals.pages.get()
                on:change=move |ev| edit_pages(signals.pages, event_target_value(&ev))
            >
                <option value="">"Select the number of pages"</option>
                {options}
            </select>

            <button
                type="submit"
                class="btn-primary"
                disabled=move || !signals.submit_enabled.get() || signals.busy.get()
            >
                {move || {
                    if signals.busy.get() {
                        view! { <span class="spinner"></span> " Generating..." }.into_view()
                    } else {
                        "Generate storyboard".into_view()
                    }
                }}
            </button>
        </form>
    }
}

#[component]
fn ResultPanel(controller: Controller, signals: FormSignals) -> impl IntoView {
    let on_download = {
        let controller = controller.clone();
        move |_| {
            let controller = controller.clone();
            spawn_local(async move {
                let _ = controller.export_document().await;
            });
        }
    };

    let on_copy = {
        let controller = controller.clone();
        move |_| {
            let controller = controller.clone();
            spawn_local(async move {
                let _ = controller.copy_text().await;
            });
        }
    };

    let on_new_story = move |_| controller.reset();

    view! {
        <div class="result-section">
            {move || match signals.result.get() {
                Some(node) => view! { <div class="result-container">{node_view(&node)}</div> }.into_view(),
                None => view! {
                    <div class="empty-state">
                        <p>"Fill in the form and generate a storyboard to see it here."</p>
                    </div>
                }
                .into_view(),
            }}
            <div
                class="result-actions"
                style:display=move || if signals.result.with(Option::is_some) { "flex" } else { "none" }
            >
                <button class="btn-secondary" on:click=on_download>
                    {move || if signals.downloaded.get() { "Downloaded!" } else { "Download DOCX" }}
                </button>
                <button class="btn-secondary" on:click=on_copy>
                    {move || if signals.copied.get() { "Copied!" } else { "Copy text" }}
                </button>
                <button class="btn-outline" on:click=on_new_story>"New story"</button>
            </div>
        </div>
    }
}
