use std::sync::OnceLock;

use chatskcet_common::observability::{LogConfig, LogFormat};

static INIT_PATH: OnceLock<std::path::PathBuf> = OnceLock::new();

pub fn init_test_tracing() {
    let _ = INIT_PATH.get_or_init(|| {
        let config = LogConfig {
            app_name: "chatskcet-tests",
            emit_stderr: true,
            format: std::env::var("CHATSKCET_LOG_FORMAT")
                .map(|raw| LogFormat::from_name(&raw))
                .unwrap_or(LogFormat::Text),
            default_filter: "debug",
            log_dir: Some(std::env::temp_dir().join("chatskcet-tests")),
        };

        chatskcet_common::observability::init_logging(config).unwrap_or_default()
    });
}
