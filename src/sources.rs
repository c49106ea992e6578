use anyhow::Result;

use crate::config::Config;
use crate::source::FileSource;
use crate::source_fs::FilesystemSource;

pub async fn list_sources(config: &Config) -> Result<()> {
    println!("{:<16} {:<10} {:<8} ROOT", "SOURCE", "SOURCE_ID", "HEALTHY");

    for (name, source_config) in &config.sources {
        let healthy = match FilesystemSource::new(name, source_config) {
            Ok(source) => source.check().await.is_ok(),
            Err(_) => false,
        };
        println!(
            "{:<16} {:<10} {:<8} {}",
            name,
            source_config.source_id,
            healthy,
            source_config.root.display()
        );
    }

    if config.sources.is_empty() {
        println!("(no sources configured)");
    }

    Ok(())
}
