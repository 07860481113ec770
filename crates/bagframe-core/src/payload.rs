//! Extraction of encoded image payloads into side files.

use crate::error::Error;
use eyre::{Result, WrapErr, bail};
use image::ImageFormat;
use indexmap::IndexMap;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

/// Name of the directory under the output root holding extracted frames.
pub const IMAGES_DIR: &str = "images";

/// Frame counter of one output directory.
#[derive(Debug)]
pub struct ImageCounter {
    dir: PathBuf,
    component: String,
    next: usize,
}

impl ImageCounter {
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Number of frames written so far.
    pub fn count(&self) -> usize {
        self.next
    }
}

/// Decodes image payloads and writes them as numbered JPEG files.
///
/// Frames of topic `/cam/...` go to `<output>/images/cam/<n>.jpg`. Each
/// directory owns one counter starting at 0, so topics sharing their
/// first path component append to the same sequence.
#[derive(Debug)]
pub struct ImageSink {
    root: PathBuf,
    counters: IndexMap<String, ImageCounter>,
    topics: IndexMap<String, String>,
}

impl ImageSink {
    pub fn new(output: impl AsRef<Path>) -> Self {
        Self {
            root: output.as_ref().join(IMAGES_DIR),
            counters: IndexMap::new(),
            topics: IndexMap::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Total number of frames written by this sink.
    pub fn written(&self) -> usize {
        self.counters.values().map(|counter| counter.next).sum()
    }

    pub fn counter(&self, topic: &str) -> Option<&ImageCounter> {
        let component = self.topics.get(topic)?;
        self.counters.get(component)
    }

    /// Creates the images directory itself. Existing directories are
    /// accepted.
    pub fn create_root(&self) -> Result<()> {
        create_dir(&self.root)
    }

    /// Creates the output directory of `topic`. Existing directories are
    /// accepted.
    pub fn prepare(&mut self, topic: &str) -> Result<()> {
        if self.topics.contains_key(topic) {
            return Ok(());
        }

        create_dir(&self.root)?;

        let component = primary_component(topic).to_string();
        if !self.counters.contains_key(&component) {
            let dir = self.root.join(&component);
            create_dir(&dir)?;
            self.counters.insert(
                component.clone(),
                ImageCounter {
                    dir,
                    component: component.clone(),
                    next: 0,
                },
            );
        }

        self.topics.insert(topic.to_string(), component);
        Ok(())
    }

    /// Decodes `bytes` as a color image, writes it out and returns its
    /// path relative to the images directory, e.g. `/cam/3.jpg`.
    pub fn store(&mut self, topic: &str, bytes: &[u8]) -> Result<String> {
        self.prepare(topic)?;

        let Some(counter) = self
            .topics
            .get(topic)
            .and_then(|component| self.counters.get_mut(component))
        else {
            bail!("no image directory prepared for `{topic}`");
        };
        let index = counter.next;

        let frame = image::load_from_memory(bytes)
            .map_err(|source| Error::PayloadDecode {
                topic: topic.to_string(),
                index,
                source,
            })?
            .to_rgb8();

        let path = counter.dir.join(format!("{index}.jpg"));
        frame
            .save_with_format(&path, ImageFormat::Jpeg)
            .map_err(|source| Error::ImageWrite {
                path: path.clone(),
                source,
            })?;

        counter.next += 1;
        debug!(topic = %topic, path = %path.display(), "Wrote image");

        Ok(format!("/{}/{}.jpg", counter.component, index))
    }
}

/// The first non-empty path component of a topic.
fn primary_component(topic: &str) -> &str {
    topic
        .split('/')
        .find(|component| !component.is_empty())
        .unwrap_or(topic)
}

fn create_dir(dir: &Path) -> Result<()> {
    if dir.is_dir() {
        debug!(path = %dir.display(), "Directory already exists");
        return Ok(());
    }

    fs::create_dir_all(dir)
        .wrap_err_with(|| format!("Failed to create directory {}", dir.display()))?;
    info!(path = %dir.display(), "Created directory");
    Ok(())
}
