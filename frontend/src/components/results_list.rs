use once_cell::unsync::OnceCell;
use shared::ResultItem;
use wasm_bindgen::JsValue;
use web_sys::{Document, Element};

use crate::config::PageConfig;
use crate::loader::ResultsSurface;
use crate::services::logging::Logger;

const COMPONENT: &str = "results-list";

/// The `.noticias` section that loaded results are appended to.
///
/// The container is looked up (or created, when the first search rendered no
/// results) on the first append and reused afterwards.
pub struct DomResultsList {
    document: Document,
    container_selector: String,
    parent_selector: String,
    container_class: String,
    link_text: String,
    container: OnceCell<Element>,
}

impl DomResultsList {
    pub fn new(document: Document, config: &PageConfig) -> Self {
        Self {
            document,
            container_selector: config.results_selector.clone(),
            parent_selector: config.results_parent_selector.clone(),
            container_class: config.results_class.clone(),
            link_text: config.article_link_text.clone(),
            container: OnceCell::new(),
        }
    }

    fn container(&self) -> Result<&Element, JsValue> {
        self.container.get_or_try_init(|| self.find_or_create_container())
    }

    fn find_or_create_container(&self) -> Result<Element, JsValue> {
        if let Some(existing) = self.document.query_selector(&self.container_selector)? {
            return Ok(existing);
        }

        Logger::debug_with_component(COMPONENT, "No results container on the page, creating one");
        let section = self.document.create_element("section")?;
        section.set_class_name(&self.container_class);

        let parent: Element = match self.document.query_selector(&self.parent_selector)? {
            Some(parent) => parent,
            None => self
                .document
                .body()
                .map(Element::from)
                .ok_or_else(|| JsValue::from_str("document has no body"))?,
        };
        parent.append_child(&section)?;
        Ok(section)
    }

    /// `<article class="noticia {sentiment}">` with title, badges and link
    fn render_item(&self, item: &ResultItem) -> Result<Element, JsValue> {
        let article = self.document.create_element("article")?;
        article.set_class_name(&item.article_class());

        let heading = self.document.create_element("h3")?;
        heading.set_text_content(Some(&item.title));

        let meta = self.document.create_element("p")?;
        meta.set_class_name("meta");
        let source_badge = self.document.create_element("span")?;
        source_badge.set_class_name("badge");
        source_badge.set_text_content(Some(&item.source_label));
        meta.append_child(&source_badge)?;

        if let Some(sentiment) = &item.sentiment {
            let sentiment_badge = self.document.create_element("span")?;
            sentiment_badge.set_class_name(&format!("badge sentimento {}", sentiment.css_class()));
            sentiment_badge.set_text_content(Some(&sentiment.display_label()));
            meta.append_child(&sentiment_badge)?;
        }

        let link = self.document.create_element("a")?;
        link.set_attribute("href", &item.link)?;
        link.set_attribute("target", "_blank")?;
        link.set_attribute("rel", "noopener noreferrer")?;
        link.set_text_content(Some(&self.link_text));

        article.append_child(&heading)?;
        article.append_child(&meta)?;
        article.append_child(&link)?;
        Ok(article)
    }
}

impl ResultsSurface for DomResultsList {
    fn append(&self, item: ResultItem) {
        let appended = self.container().and_then(|container| {
            let article = self.render_item(&item)?;
            container.append_child(&article).map(|_| ())
        });

        if let Err(err) = appended {
            Logger::error_with_component(
                COMPONENT,
                &format!("Failed to render result '{}': {:?}", item.title, err),
            );
        }
    }
}
