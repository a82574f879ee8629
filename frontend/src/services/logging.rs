use log::Level;

/// Component-tagged logging for the search page.
///
/// Messages go through the `log` facade with the component as the target.
/// `Logger::install` routes them to the browser console; until it is called
/// (for example in native tests) every call is a no-op.
pub struct Logger;

impl Logger {
    /// Install the console sink and the panic hook. Safe to call more than once.
    pub fn install(level: Level) {
        console_error_panic_hook::set_once();
        if log::max_level() == log::LevelFilter::Off {
            wasm_logger::init(wasm_logger::Config::new(level));
        }
    }

    pub fn debug_with_component(component: &str, message: &str) {
        Self::log(Level::Debug, message, component);
    }

    pub fn info_with_component(component: &str, message: &str) {
        Self::log(Level::Info, message, component);
    }

    pub fn warn_with_component(component: &str, message: &str) {
        Self::log(Level::Warn, message, component);
    }

    pub fn error_with_component(component: &str, message: &str) {
        Self::log(Level::Error, message, component);
    }

    fn log(level: Level, message: &str, component: &str) {
        log::log!(target: component, level, "{}", message);
    }
}
