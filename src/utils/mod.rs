pub mod build_info;
pub mod persistence;

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// `RUST_LOG` directives are honoured on top of `nomenclature_editor=info`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let mut filter = EnvFilter::from_default_env();
        if let Ok(directive) = "nomenclature_editor=info".parse() {
            filter = filter.add_directive(directive);
        }

        // stdout belongs to the shell output
        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
        tracing::debug!("nomenclature editor tracing initialized");
    });
}
