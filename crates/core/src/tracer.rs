use std::sync::Once;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn init_once() {
    static ONCE: Once = Once::new();
    ONCE.call_once(init)
}

fn init() {
    let layer_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let layer_fmt = ::tracing_subscriber::fmt::layer();

    ::tracing_subscriber::registry()
        .with(layer_filter)
        .with(layer_fmt)
        .init()
}
