/* demos/window_state.rs */

use std::time::Duration;

use livestore::signal::Config as WatcherConfig;
use livestore::{Rect, Settings, SettingsEvent};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
		.init();

	// 0. Start from a clean file
	let dir = std::env::temp_dir().join("livestore-demo");
	let path = dir.join("settings.conf");
	if path.exists() {
		std::fs::remove_file(&path)?;
	}

	// 1. Open the store
	let settings = Settings::builder(&path)
		.header("Demo settings\nEdit while the demo runs to see the merge")
		.watch_config(WatcherConfig::default().with_debounce(Duration::from_millis(100)))
		.on_error(|e| eprintln!("settings error: {e}"))
		.open()?;

	settings.observe(|event| {
		if let SettingsEvent::Merged(result) = event {
			println!("External edit: {:?}", result.keys().collect::<Vec<_>>());
		}
	});

	// 2. What a GUI would restore on start-up
	let bounds = settings.get_rect("window.bounds", Some(Rect::new(100, 100, 800, 600)));
	let key_dir = settings.get_string("keys.directory", Some("~/.keys"));
	println!("Window at {:?}, keys in {:?}", bounds, key_dir);

	// 3. ...and persist on the way out
	settings.put_rect("window.bounds", Some(Rect::new(120, 80, 1024, 768)));
	settings.put_indexed_list("recent", &["message.txt", "photo.png"]);
	settings.put_string_list("algorithms", Some(&["AES/CBC/PKCS5Padding", "DES/ECB/NoPadding"][..]), None);
	settings.save()?;
	println!("Saved to {}", path.display());

	// 4. Simulate another process editing the file, after our own write
	//    has been seen and skipped
	tokio::time::sleep(Duration::from_millis(300)).await;
	let text = std::fs::read_to_string(&path)?;
	std::fs::write(&path, text.replace("#eot", "extra=added by hand\n#eot"))?;
	tokio::time::sleep(Duration::from_millis(500)).await;
	println!("extra = {:?}", settings.get("extra"));

	settings.close().await?;
	Ok(())
}
