mod app;
mod viewer;

use std::ffi::OsString;
use std::path::PathBuf;

use app::RetouchApp;
use retouch::config::AppConfig;

/// A path on the command line wins over the configured startup image.
fn initial_image(args: impl IntoIterator<Item = OsString>, config: &AppConfig) -> Option<PathBuf> {
    args.into_iter()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| config.open_path.clone())
}

fn main() -> eframe::Result {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = AppConfig::load();
    let initial = initial_image(std::env::args_os(), &config);

    let width = config.window_width.unwrap_or(1200.0);
    let height = config.window_height.unwrap_or(800.0);

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Retouch")
            .with_app_id("retouch")
            .with_inner_size([width, height]),
        ..Default::default()
    };

    eframe::run_native(
        "retouch",
        native_options,
        Box::new(|cc| Ok(Box::new(RetouchApp::new(cc, config, initial)))),
    )
}

#[cfg(test)]
mod tests {
    use std::ffi::OsString;
    use std::path::PathBuf;

    use retouch::config::AppConfig;

    use super::initial_image;

    fn args(list: &[&str]) -> Vec<OsString> {
        list.iter().map(OsString::from).collect()
    }

    #[test]
    fn command_line_path_wins() {
        let config = AppConfig {
            open_path: Some(PathBuf::from("/from/config.png")),
            ..Default::default()
        };
        assert_eq!(
            initial_image(args(&["retouch", "/from/args.jpg"]), &config),
            Some(PathBuf::from("/from/args.jpg"))
        );
    }

    #[test]
    fn falls_back_to_configured_path() {
        let config = AppConfig {
            open_path: Some(PathBuf::from("/from/config.png")),
            ..Default::default()
        };
        assert_eq!(
            initial_image(args(&["retouch"]), &config),
            Some(PathBuf::from("/from/config.png"))
        );
        assert_eq!(initial_image(args(&["retouch"]), &AppConfig::default()), None);
    }
}
