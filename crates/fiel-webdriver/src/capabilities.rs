use serde_json::{Map, Value, json};
use std::path::Path;

/// ChromeDriver capabilities that send PDFs straight to `download_dir`
/// instead of the built-in viewer.
pub fn chrome_capabilities(download_dir: &Path, headless: bool) -> Map<String, Value> {
    let prefs = json!({
        "download.prompt_for_download": false,
        "download.default_directory": download_dir.display().to_string(),
        "download.directory_upgrade": true,
        "safebrowsing.enabled": true,
        "plugins.always_open_pdf_externally": true,
    });

    let mut args = vec![
        "--window-size=1366,900".to_string(),
        "--disable-popup-blocking".to_string(),
    ];
    if headless {
        args.push("--headless=new".to_string());
        args.push("--no-sandbox".to_string());
        args.push("--disable-dev-shm-usage".to_string());
    }

    let mut caps = Map::new();
    caps.insert("browserName".to_string(), json!("chrome"));
    caps.insert(
        "goog:chromeOptions".to_string(),
        json!({ "prefs": prefs, "args": args }),
    );
    caps
}
