//! Generate static files

use anyhow::Result;
use notify::RecursiveMode;
use notify_debouncer_mini::new_debouncer;
use std::sync::mpsc::channel;
use std::time::Duration;

use crate::config::SiteConfig;
use crate::generator::Generator;
use crate::Site;

/// Quiet period before a burst of file events triggers a rebuild
const DEBOUNCE: Duration = Duration::from_millis(500);

/// Generate the static site
pub fn run(site: &Site) -> Result<()> {
    let start = std::time::Instant::now();

    let loader = site.loader();
    let posts = loader.get_blog_posts()?;
    let projects = loader.get_projects()?;

    tracing::info!(
        "Loaded {} posts and {} projects",
        posts.len(),
        projects.len()
    );

    let generator = Generator::new(site)?;
    generator.generate(&posts, &projects)?;

    let duration = start.elapsed();
    tracing::info!("Generated in {:.2}s", duration.as_secs_f64());

    Ok(())
}

/// Watch the content directory and config file, regenerating on change.
///
/// Blocks the calling thread until the watcher shuts down. `on_change` runs
/// after every regeneration attempt, successful or not.
pub fn watch<F>(site: &Site, on_change: F) -> Result<()>
where
    F: Fn(),
{
    let (tx, rx) = channel();
    let mut debouncer = new_debouncer(DEBOUNCE, tx)?;

    if site.content_dir.exists() {
        debouncer
            .watcher()
            .watch(&site.content_dir, RecursiveMode::Recursive)?;
    }
    if let Some(config_path) = SiteConfig::locate(&site.base_dir) {
        debouncer
            .watcher()
            .watch(&config_path, RecursiveMode::NonRecursive)?;
    }

    tracing::info!("Watching {:?} for changes. Press Ctrl+C to stop.", site.content_dir);

    for result in rx {
        match result {
            Ok(events) => {
                tracing::info!("{} file(s) changed, regenerating...", events.len());
                for event in &events {
                    tracing::debug!("Changed: {:?}", event.path);
                }

                // Config edits change paths and settings, so reopen the site
                let rebuilt = Site::new(&site.base_dir).and_then(|site| run(&site));
                if let Err(e) = rebuilt {
                    tracing::error!("Generation failed: {:#}", e);
                }
                on_change();
            }
            Err(e) => tracing::warn!("Watch error: {}", e),
        }
    }

    Ok(())
}
