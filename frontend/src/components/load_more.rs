use std::rc::Rc;

use gloo::events::EventListener;
use shared::LoaderState;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, HtmlButtonElement, HtmlElement};

use super::results_list::DomResultsList;
use super::search_form::SearchFormController;
use crate::config::{PageConfig, TriggerSettings};
use crate::loader::{IncrementalLoader, TriggerControl};
use crate::services::api::SearchApi;
use crate::services::logging::Logger;

const COMPONENT: &str = "load-more";

pub type PageLoader<A> = IncrementalLoader<A, DomTrigger, DomResultsList>;

/// The "load more" button and its `data-next` / `data-perpage` attributes
#[derive(Clone)]
pub struct DomTrigger {
    element: HtmlElement,
}

impl DomTrigger {
    pub fn find(document: &Document, config: &PageConfig) -> Option<Self> {
        document
            .get_element_by_id(&config.load_more_id)
            .and_then(|element| element.dyn_into::<HtmlElement>().ok())
            .map(|element| Self { element })
    }

    pub fn settings(&self, config: &PageConfig) -> TriggerSettings {
        TriggerSettings::parse(
            self.element.get_attribute("data-next").as_deref(),
            self.element.get_attribute("data-perpage").as_deref(),
            config,
        )
    }

    pub fn element(&self) -> &HtmlElement {
        &self.element
    }
}

impl TriggerControl for DomTrigger {
    fn set_enabled(&self, enabled: bool) {
        match self.element.dyn_ref::<HtmlButtonElement>() {
            Some(button) => button.set_disabled(!enabled),
            None if enabled => {
                self.element.remove_attribute("disabled").ok();
            }
            None => {
                self.element.set_attribute("disabled", "").ok();
            }
        }
        self.element
            .set_attribute("aria-disabled", if enabled { "false" } else { "true" })
            .ok();
    }

    fn set_next_page(&self, page: u32) {
        self.element.set_attribute("data-next", &page.to_string()).ok();
    }

    fn retire(&self) {
        self.set_enabled(false);
        self.element.style().set_property("display", "none").ok();
    }
}

/// Build the loader from the trigger's declared cursor and start listening
/// for clicks. Pages without a trigger get no listener.
pub fn mount<A>(
    document: &Document,
    config: &PageConfig,
    form: Rc<SearchFormController>,
    api: A,
) -> Option<EventListener>
where
    A: SearchApi + 'static,
{
    let trigger = DomTrigger::find(document, config)?;
    let settings = trigger.settings(config);
    Logger::debug_with_component(
        COMPONENT,
        &format!(
            "Load more ready at page {} ({} per page)",
            settings.next_page, settings.per_page
        ),
    );

    let loader: Rc<PageLoader<A>> = Rc::new(IncrementalLoader::new(
        api,
        trigger.clone(),
        DomResultsList::new(document.clone(), config),
        LoaderState::new(settings.next_page, settings.per_page),
    ));

    Some(EventListener::new(trigger.element(), "click", move |_event| {
        let loader = loader.clone();
        let context = form.snapshot();
        spawn_local(async move {
            let outcome = loader.request_next_page(&context).await;
            let state = loader.state();
            Logger::debug_with_component(
                COMPONENT,
                &format!(
                    "Load finished: {:?} (next page {}, exhausted: {})",
                    outcome,
                    state.next_page(),
                    state.is_exhausted()
                ),
            );
        });
    }))
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use async_trait::async_trait;
    use gloo::timers::future::TimeoutFuture;
    use shared::{LoadError, PageResponse, SearchQuery};
    use std::cell::RefCell;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn button(document: &Document, next: Option<&str>, per_page: Option<&str>) -> DomTrigger {
        let element = document.create_element("button").unwrap();
        if let Some(next) = next {
            element.set_attribute("data-next", next).unwrap();
        }
        if let Some(per_page) = per_page {
            element.set_attribute("data-perpage", per_page).unwrap();
        }
        DomTrigger {
            element: element.dyn_into::<HtmlElement>().unwrap(),
        }
    }

    #[wasm_bindgen_test]
    fn test_reads_declared_cursor() {
        let document = web_sys::window().unwrap().document().unwrap();
        let config = PageConfig::default();

        let trigger = button(&document, Some("3"), Some("6"));
        assert_eq!(trigger.settings(&config), TriggerSettings { next_page: 3, per_page: 6 });

        let trigger = button(&document, None, None);
        assert_eq!(trigger.settings(&config), TriggerSettings { next_page: 2, per_page: 12 });
    }

    #[wasm_bindgen_test]
    fn test_disable_advance_and_retire() {
        let document = web_sys::window().unwrap().document().unwrap();
        let trigger = button(&document, Some("2"), Some("12"));
        let as_button = trigger.element().dyn_ref::<HtmlButtonElement>().unwrap().clone();

        trigger.set_enabled(false);
        assert!(as_button.disabled());

        trigger.set_next_page(3);
        trigger.set_enabled(true);
        assert!(!as_button.disabled());
        assert_eq!(trigger.element().get_attribute("data-next").unwrap(), "3");

        trigger.retire();
        assert_eq!(
            trigger.element().style().get_property_value("display").unwrap(),
            "none"
        );
        assert!(as_button.disabled());
    }

    #[derive(Default)]
    struct RecordingApi {
        requests: RefCell<Vec<SearchQuery>>,
    }

    #[async_trait(?Send)]
    impl SearchApi for Rc<RecordingApi> {
        async fn search(&self, query: &SearchQuery) -> Result<PageResponse, LoadError> {
            self.requests.borrow_mut().push(query.clone());
            PageResponse::from_json_str(
                r#"{"results": [{"titulo": "loaded", "fonte": "G1", "orig_link": "https://g1/loaded"}], "total_pages": 5}"#,
            )
        }
    }

    #[wasm_bindgen_test]
    async fn test_click_requests_next_page_with_form_inputs() {
        let document = web_sys::window().unwrap().document().unwrap();
        while let Some(existing) = document.query_selector(".noticias").unwrap() {
            existing.remove();
        }
        let root = document.create_element("div").unwrap();
        root.set_inner_html(
            r#"<input id="termo" value="eleições">
               <input name="source" value="g1">
               <section class="noticias"></section>
               <button id="loadMore" data-next="2" data-perpage="12">Carregar mais</button>"#,
        );
        document.body().unwrap().append_child(&root).unwrap();

        let config = PageConfig::default();
        let form = Rc::new(SearchFormController::from_document(&document, &config));
        let api = Rc::new(RecordingApi::default());
        let listener = mount(&document, &config, form, api.clone()).expect("trigger is on the page");

        let trigger = document
            .get_element_by_id("loadMore")
            .unwrap()
            .dyn_into::<HtmlElement>()
            .unwrap();
        trigger.click();
        TimeoutFuture::new(0).await;

        {
            let requests = api.requests.borrow();
            assert_eq!(requests.len(), 1);
            assert_eq!(requests[0].term, "eleições");
            assert_eq!(requests[0].source, "g1");
            assert_eq!(requests[0].page, 2);
            assert_eq!(requests[0].per_page, 12);
        }
        assert_eq!(trigger.get_attribute("data-next").unwrap(), "3");
        let articles = document.query_selector_all(".noticias > article").unwrap();
        assert_eq!(articles.length(), 1);

        drop(listener);
        root.remove();
    }
}
