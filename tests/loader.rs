use anyhow::Result;
use camino::{Utf8Path, Utf8PathBuf};
use linkbus::loader::{BusLoader, ContentSource, FsSource, parse_document_from_text};
use linkbus::model::{Point, SegmentId};
use std::collections::HashMap;
use std::fs;
use tempfile::tempdir;

struct MemSource {
    files: HashMap<String, String>,
}

impl ContentSource for MemSource {
    fn read_to_string(&mut self, path: &Utf8Path) -> Result<String> {
        self.files
            .get(path.as_str())
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("not found: {}", path))
    }

    fn list_dir(&mut self, path: &Utf8Path) -> Result<Vec<Utf8PathBuf>> {
        let prefix = format!("{}/", path);
        let mut files: Vec<Utf8PathBuf> = self
            .files
            .keys()
            .filter(|k| k.starts_with(&prefix))
            .map(Utf8PathBuf::from)
            .collect();
        files.sort();
        Ok(files)
    }
}

const TWO_BUSES: &str = r#"{
  "buses": [
    {
      "source": "geneA",
      "segments": [
        { "id": "s1", "parent": null, "start": { "x": 0, "y": 0 }, "end": { "x": 40, "y": 0 } },
        { "id": "s2", "parent": "s1" },
        { "id": null, "parent": "s1" },
        { "id": "s3", "parent": "s2" }
      ]
    },
    {
      "source": "geneB",
      "segments": [ { "id": "t1" } ]
    }
  ]
}"#;

fn mem(files: &[(&str, &str)]) -> MemSource {
    MemSource {
        files: files
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    }
}

#[test]
fn parses_named_synthetic_and_points() {
    let doc = parse_document_from_text(TWO_BUSES, None).expect("parse");
    let bus = doc.find_bus("geneA").expect("geneA bus");
    assert_eq!(bus.segments.len(), 4);
    assert_eq!(bus.segments[0].id, SegmentId::named("s1"));
    assert_eq!(bus.segments[0].start, Some(Point::new(0.0, 0.0)));
    assert_eq!(bus.segments[0].end, Some(Point::new(40.0, 0.0)));
    assert_eq!(bus.segments[2].id, SegmentId::Synthetic);
    assert_eq!(bus.segments[2].parent.as_deref(), Some("s1"));

    let other = doc.find_bus("geneB").unwrap();
    assert_eq!(other.segments[0].parent, None);
}

#[test]
fn missing_id_means_bus_drop() {
    let doc = parse_document_from_text(
        r#"{"buses":[{"source":"n","segments":[{"id":"r"},{"parent":"r"}]}]}"#,
        None,
    )
    .unwrap();
    assert!(doc.buses[0].segments[1].id.is_synthetic());
}

#[test]
fn load_forest_by_source_name() {
    let mut loader = BusLoader::new(mem(&[("mem/buses.json", TWO_BUSES)]));
    let forest = loader.load_forest("mem/buses.json", Some("geneA")).unwrap();
    let root = forest.root().unwrap();
    assert_eq!(root.child_ids(), vec!["s2"]);
    assert!(root.find_node(Some("s3")).is_some());
}

#[test]
fn load_forest_needs_a_name_when_ambiguous() {
    let mut loader = BusLoader::new(mem(&[("mem/buses.json", TWO_BUSES)]));
    let err = loader.load_forest("mem/buses.json", None).unwrap_err();
    let msg = format!("{err:#}");
    assert!(msg.contains("geneA") && msg.contains("geneB"), "{msg}");
}

#[test]
fn load_bus_reports_unknown_source() {
    let mut loader = BusLoader::new(mem(&[("mem/buses.json", TWO_BUSES)]));
    let err = loader.load_bus("mem/buses.json", "geneZ").unwrap_err();
    assert!(err.to_string().contains("geneZ"));
}

#[test]
fn invalid_segments_carry_path_context() {
    let bad = r#"{"buses":[{"source":"x","segments":[{"id":"a","parent":"nowhere"}]}]}"#;
    let mut loader = BusLoader::new(mem(&[("mem/bad.json", bad)]));
    let err = loader.load_forest("mem/bad.json", None).unwrap_err();
    let msg = format!("{err:#}");
    assert!(msg.contains("mem/bad.json"), "{msg}");
    assert!(msg.contains("nowhere"), "{msg}");
}

#[test]
fn malformed_json_names_the_file() {
    let mut loader = BusLoader::new(mem(&[("mem/broken.json", "{ not json")]));
    let err = loader.load_document("mem/broken.json").unwrap_err();
    assert!(err.to_string().contains("mem/broken.json"));
}

#[test]
fn load_dir_merges_json_files_from_disk() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("a.json"),
        r#"{"buses":[{"source":"first","segments":[{"id":"r"}]}]}"#,
    )
    .unwrap();
    fs::write(
        dir.path().join("b.json"),
        r#"{"buses":[{"source":"second","segments":[]}]}"#,
    )
    .unwrap();
    fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

    let dir_path = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
    let mut loader = BusLoader::new(FsSource);
    let doc = loader.load_dir(&dir_path).unwrap();
    let sources: Vec<&str> = doc.buses.iter().map(|b| b.source.as_str()).collect();
    assert_eq!(sources, vec!["first", "second"]);
}
