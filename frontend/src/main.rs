use std::rc::Rc;

use anyhow::{anyhow, Result};
use gloo::events::EventListener;
use web_sys::Document;

mod components;
mod config;
mod loader;
mod services;

use components::{load_more, search_form::SearchFormController};
use config::PageConfig;
use services::api::ApiClient;
use services::logging::Logger;

fn main() {
    Logger::install(log::Level::Info);

    if let Err(err) = run() {
        Logger::error_with_component("bootstrap", &format!("Search page enhancement not started: {:#}", err));
    }
}

fn run() -> Result<()> {
    let window = web_sys::window().ok_or_else(|| anyhow!("no global window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow!("window has no document"))?;

    if document.ready_state() == "loading" {
        let ready = document.clone();
        EventListener::once(&document, "DOMContentLoaded", move |_event| {
            enhance(&ready, &PageConfig::default());
        })
        .forget();
    } else {
        enhance(&document, &PageConfig::default());
    }
    Ok(())
}

/// Wire the search form and the "load more" trigger. Listeners live as long
/// as the page does.
fn enhance(document: &Document, config: &PageConfig) {
    let form = Rc::new(SearchFormController::from_document(document, config));
    for listener in form.attach() {
        listener.forget();
    }

    let api = ApiClient::with_base_url(config.api_base_url.clone());
    match load_more::mount(document, config, form, api) {
        Some(listener) => listener.forget(),
        None => Logger::debug_with_component("bootstrap", "No load more trigger on this page"),
    }
}
