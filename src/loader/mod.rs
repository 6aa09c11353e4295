//! Loading link-bus segment records from JSON documents.
//!
//! [`BusLoader`] is generic over [`ContentSource`] so documents can be read
//! from the filesystem ([`FsSource`]) or from any in-memory store. A document
//! looks like:
//!
//! ```json
//! { "buses": [ { "source": "geneA",
//!                "segments": [ { "id": "s1", "parent": null },
//!                              { "id": null, "parent": "s1" } ] } ] }
//! ```

pub mod source;

pub use source::*;

use crate::hierarchy::SegmentForest;
use crate::model::{BusDocument, LinkBus};
use anyhow::{Context, Result, anyhow};
use camino::Utf8Path;
use tracing::debug;

/// Parse a bus document from its JSON text.
pub fn parse_document_from_text(text: &str, path_hint: Option<&str>) -> Result<BusDocument> {
    serde_json::from_str(text)
        .with_context(|| format!("Failed to parse JSON {}", path_hint.unwrap_or("<buses>")))
}

pub struct BusLoader<S: ContentSource> {
    source: S,
}

impl<S: ContentSource> BusLoader<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Read and parse one bus document.
    pub fn load_document(&mut self, path: impl AsRef<Utf8Path>) -> Result<BusDocument> {
        let path = path.as_ref();
        let text = self.source.read_to_string(path)?;
        let doc = parse_document_from_text(&text, Some(path.as_str()))?;
        debug!(%path, buses = doc.buses.len(), "loaded bus document");
        Ok(doc)
    }

    /// Merge every `*.json` document in `dir`, in file name order.
    pub fn load_dir(&mut self, dir: impl AsRef<Utf8Path>) -> Result<BusDocument> {
        let dir = dir.as_ref();
        let mut merged = BusDocument::default();
        let paths = self.source.list_dir(dir)?;
        for p in paths.iter().filter(|p| p.extension() == Some("json")) {
            let doc = self.load_document(p)?;
            merged.buses.extend(doc.buses);
        }
        Ok(merged)
    }

    /// Load the bus leaving `source_node` from the document at `path`.
    pub fn load_bus(&mut self, path: impl AsRef<Utf8Path>, source_node: &str) -> Result<LinkBus> {
        let path = path.as_ref();
        let doc = self.load_document(path)?;
        doc.find_bus(source_node)
            .cloned()
            .ok_or_else(|| anyhow!("No bus for source '{}' in {}", source_node, path))
    }

    /// Load and assemble the segment forest of one bus.
    ///
    /// With `source_node == None` the document must hold exactly one bus.
    pub fn load_forest(
        &mut self,
        path: impl AsRef<Utf8Path>,
        source_node: Option<&str>,
    ) -> Result<SegmentForest> {
        let path = path.as_ref();
        let bus = match source_node {
            Some(name) => self.load_bus(path, name)?,
            None => {
                let mut doc = self.load_document(path)?;
                match doc.buses.len() {
                    1 => doc.buses.remove(0),
                    0 => return Err(anyhow!("No buses in {}", path)),
                    n => {
                        let names: Vec<&str> = doc.buses.iter().map(|b| b.source.as_str()).collect();
                        return Err(anyhow!(
                            "{} buses in {} ({}); pick one by source",
                            n,
                            path,
                            names.join(", ")
                        ));
                    }
                }
            }
        };
        SegmentForest::from_records(bus.segments)
            .with_context(|| format!("Invalid segments for bus '{}' in {}", bus.source, path))
    }
}
