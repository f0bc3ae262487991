/* tests/stream_tests.rs */

#![cfg(feature = "stream")]

use futures_util::StreamExt;
use livestore::{Settings, SettingsEvent};

#[tokio::test]
async fn test_event_stream() -> Result<(), Box<dyn std::error::Error>> {
	let dir = tempfile::tempdir()?;
	let settings = Settings::builder(dir.path().join("s.conf"))
		.watching(false)
		.open()?;
	let mut stream = settings.stream();

	settings.put_bool("dark", Some(true));
	settings.reset()?;

	assert_eq!(
		stream.next().await.transpose()?,
		Some(SettingsEvent::Changed {
			keys: vec!["dark".to_string()]
		})
	);
	assert_eq!(stream.next().await.transpose()?, Some(SettingsEvent::Reloaded));
	Ok(())
}
