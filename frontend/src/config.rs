use shared::{DEFAULT_PER_PAGE, FIRST_LOADABLE_PAGE};

/// Element ids and selectors of the server-rendered search page
#[derive(Clone, Debug, PartialEq)]
pub struct PageConfig {
    pub search_form_id: String,
    pub loader_id: String,
    pub clear_button_id: String,
    pub submit_button_id: String,
    pub term_input_id: String,
    pub source_input_selector: String,
    pub load_more_id: String,
    /// Origin of `/api/search`; empty means the page's own origin
    pub api_base_url: String,
    /// Container the loaded results are appended to
    pub results_selector: String,
    /// Where a missing results container gets created (falls back to `<body>`)
    pub results_parent_selector: String,
    /// Class given to a results container created on the client
    pub results_class: String,
    pub article_link_text: String,
    pub default_next_page: u32,
    pub default_per_page: u32,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            search_form_id: "searchForm".to_string(),
            loader_id: "loader".to_string(),
            clear_button_id: "limparBtn".to_string(),
            submit_button_id: "buscarBtn".to_string(),
            term_input_id: "termo".to_string(),
            source_input_selector: r#"input[name="source"]"#.to_string(),
            load_more_id: "loadMore".to_string(),
            api_base_url: String::new(),
            results_selector: ".noticias".to_string(),
            results_parent_selector: ".container".to_string(),
            results_class: "noticias".to_string(),
            article_link_text: "Ler notícia completa".to_string(),
            default_next_page: FIRST_LOADABLE_PAGE,
            default_per_page: DEFAULT_PER_PAGE,
        }
    }
}

/// Starting cursor declared by the trigger's `data-next` / `data-perpage`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TriggerSettings {
    pub next_page: u32,
    pub per_page: u32,
}

impl TriggerSettings {
    /// Absent, unparseable or zero attributes fall back to the configured
    /// defaults; the cursor is never allowed to point at the server-rendered
    /// first page.
    pub fn parse(data_next: Option<&str>, data_per_page: Option<&str>, config: &PageConfig) -> Self {
        let next_page = parse_positive(data_next)
            .unwrap_or(config.default_next_page)
            .max(FIRST_LOADABLE_PAGE);
        let per_page = parse_positive(data_per_page).unwrap_or(config.default_per_page);

        Self { next_page, per_page }
    }
}

fn parse_positive(raw: Option<&str>) -> Option<u32> {
    raw.and_then(|value| value.trim().parse::<u32>().ok())
        .filter(|value| *value > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_attributes_absent() {
        let config = PageConfig::default();
        let settings = TriggerSettings::parse(None, None, &config);
        assert_eq!(settings, TriggerSettings { next_page: 2, per_page: 12 });
    }

    #[test]
    fn test_declared_values_are_used() {
        let config = PageConfig::default();
        let settings = TriggerSettings::parse(Some("4"), Some(" 24 "), &config);
        assert_eq!(settings, TriggerSettings { next_page: 4, per_page: 24 });
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = PageConfig::default();
        let settings = TriggerSettings::parse(Some("abc"), Some("0"), &config);
        assert_eq!(settings, TriggerSettings { next_page: 2, per_page: 12 });

        let settings = TriggerSettings::parse(Some("1"), Some("-3"), &config);
        assert_eq!(settings, TriggerSettings { next_page: 2, per_page: 12 });
    }
}
