use std::rc::Rc;

use gloo::events::EventListener;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, HtmlInputElement};

use crate::config::PageConfig;
use crate::loader::SearchContext;
use crate::services::logging::Logger;

const COMPONENT: &str = "search-form";

/// The search form: term and source inputs, the loading indicator and the
/// search/clear buttons. Any of them may be absent from the page.
pub struct SearchFormController {
    form: Option<Element>,
    term_input: Option<HtmlInputElement>,
    source_input: Option<HtmlInputElement>,
    loader: Option<HtmlElement>,
    submit_button: Option<Element>,
    clear_button: Option<Element>,
}

impl SearchFormController {
    pub fn from_document(document: &Document, config: &PageConfig) -> Self {
        Self {
            form: document.get_element_by_id(&config.search_form_id),
            term_input: document
                .get_element_by_id(&config.term_input_id)
                .and_then(|element| element.dyn_into().ok()),
            source_input: document
                .query_selector(&config.source_input_selector)
                .ok()
                .flatten()
                .and_then(|element| element.dyn_into().ok()),
            loader: document
                .get_element_by_id(&config.loader_id)
                .and_then(|element| element.dyn_into().ok()),
            submit_button: document.get_element_by_id(&config.submit_button_id),
            clear_button: document.get_element_by_id(&config.clear_button_id),
        }
    }

    /// Current term and source filter, read fresh from the inputs
    pub fn snapshot(&self) -> SearchContext {
        SearchContext {
            term: self.term_input.as_ref().map(|input| input.value()).unwrap_or_default(),
            source: self.source_input.as_ref().map(|input| input.value()).unwrap_or_default(),
        }
    }

    pub fn show_loader(&self) {
        self.set_loader_visible(true);
        if let Some(button) = &self.submit_button {
            button.set_attribute("aria-disabled", "true").ok();
        }
    }

    /// Empty the term input, hide the loading indicator and focus the input
    pub fn clear(&self) {
        if let Some(input) = &self.term_input {
            input.set_value("");
        }
        self.set_loader_visible(false);
        if let Some(input) = &self.term_input {
            input.focus().ok();
        }
    }

    fn set_loader_visible(&self, visible: bool) {
        if let Some(loader) = &self.loader {
            loader.set_hidden(!visible);
            loader
                .set_attribute("aria-hidden", if visible { "false" } else { "true" })
                .ok();
        }
    }

    /// Listen for submit and clear. The form keeps submitting normally.
    pub fn attach(self: &Rc<Self>) -> Vec<EventListener> {
        let mut listeners = Vec::new();

        if let Some(form) = &self.form {
            let controller = Rc::clone(self);
            listeners.push(EventListener::new(form, "submit", move |_event| {
                Logger::debug_with_component(COMPONENT, "Search submitted");
                controller.show_loader();
            }));
        }

        if let Some(clear_button) = &self.clear_button {
            let controller = Rc::clone(self);
            listeners.push(EventListener::new(clear_button, "click", move |_event| {
                controller.clear();
            }));
        }

        listeners
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn mount_fixture(document: &Document) -> Element {
        let root = document.create_element("div").unwrap();
        root.set_inner_html(
            r#"<form id="searchForm">
                 <input id="termo" value="eleições">
                 <input name="source" value="g1">
                 <button id="buscarBtn">Buscar</button>
                 <button id="limparBtn" type="button">Limpar</button>
               </form>
               <div id="loader" hidden aria-hidden="true"></div>"#,
        );
        document.body().unwrap().append_child(&root).unwrap();
        root
    }

    #[wasm_bindgen_test]
    fn test_snapshot_reads_inputs() {
        let document = web_sys::window().unwrap().document().unwrap();
        let root = mount_fixture(&document);

        let form = SearchFormController::from_document(&document, &PageConfig::default());
        assert_eq!(
            form.snapshot(),
            SearchContext { term: "eleições".to_string(), source: "g1".to_string() }
        );

        root.remove();
    }

    #[wasm_bindgen_test]
    fn test_show_loader_and_clear() {
        let document = web_sys::window().unwrap().document().unwrap();
        let root = mount_fixture(&document);
        let form = SearchFormController::from_document(&document, &PageConfig::default());

        form.show_loader();
        let loader = document.get_element_by_id("loader").unwrap();
        assert!(!loader.has_attribute("hidden"));
        assert_eq!(loader.get_attribute("aria-hidden").unwrap(), "false");
        let submit = document.get_element_by_id("buscarBtn").unwrap();
        assert_eq!(submit.get_attribute("aria-disabled").unwrap(), "true");

        form.clear();
        assert_eq!(form.snapshot().term, "");
        assert!(loader.has_attribute("hidden"));
        assert_eq!(loader.get_attribute("aria-hidden").unwrap(), "true");

        root.remove();
    }

    #[wasm_bindgen_test]
    fn test_missing_elements_are_tolerated() {
        let document = web_sys::window().unwrap().document().unwrap();
        let config = PageConfig {
            term_input_id: "does-not-exist".to_string(),
            loader_id: "does-not-exist-either".to_string(),
            ..PageConfig::default()
        };
        let form = SearchFormController::from_document(&document, &config);

        form.show_loader();
        form.clear();
        assert_eq!(form.snapshot().term, "");
    }
}
