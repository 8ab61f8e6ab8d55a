use std::sync::Once;

use log::LevelFilter;

static INIT_LOGGER: Once = Once::new();

/// Map a `-v` count to a default filter: 0 warn, 1 info, 2 debug, 3+ trace.
pub fn level_for_verbosity(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Logger for library hosts (the C ABI). Debug by default; `RUST_LOG` overrides.
pub fn init_logger() {
    init_with_level(LevelFilter::Debug);
}

/// Logger for the CLI. `RUST_LOG` overrides the `-v` count if set.
pub fn init_with_verbosity(verbosity: u8) {
    init_with_level(level_for_verbosity(verbosity));
}

fn init_with_level(level: LevelFilter) {
    INIT_LOGGER.call_once(|| {
        let mut builder = env_logger::Builder::new();
        builder.filter_module("sunheading", level);
        if let Ok(filters) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filters);
        }
        let _ = builder.try_init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_levels() {
        assert_eq!(level_for_verbosity(0), LevelFilter::Warn);
        assert_eq!(level_for_verbosity(1), LevelFilter::Info);
        assert_eq!(level_for_verbosity(2), LevelFilter::Debug);
        assert_eq!(level_for_verbosity(9), LevelFilter::Trace);
    }

    #[test]
    fn repeated_init_is_harmless() {
        init_logger();
        init_with_verbosity(2);
        init_logger();
    }
}
