use env_logger::Env;

const DEFAULT_FILTER: &str = "info";

/// Installs the `env_logger` backend, honouring `RUST_LOG` and falling back to `info`.
/// Calling it more than once is harmless.
pub fn init() {
    init_with_default(DEFAULT_FILTER);
}

pub fn init_with_default(filter: &str) {
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or(filter)).try_init();
}
