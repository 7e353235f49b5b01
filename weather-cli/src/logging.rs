use tracing_subscriber::EnvFilter;

// stdout carries the user-facing lines; diagnostics go to stderr and can be
// raised with RUST_LOG (e.g. `weather_core=debug`).
const DEFAULT_FILTER: &str = "warn,sqlx=warn,reqwest=warn";

pub fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn default_filter_shows_warnings() {
        let filter = EnvFilter::new(DEFAULT_FILTER);
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::WARN));
    }
}
