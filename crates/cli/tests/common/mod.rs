//! Common test utilities

use assert_cmd::Command;
use std::path::PathBuf;
use tempfile::TempDir;

pub const REPORTS: &str = r#"{
    "r1": {
        "text": "FINDINGS : opacity in left lung . IMPRESSION : pneumonia .",
        "entities": {
            "1": {"tokens": "opacity", "label": "OBS-DP", "start_ix": 2, "end_ix": 2,
                  "relations": [["located_at", "2"], ["suggestive_of", "3"]]},
            "2": {"tokens": "left lung", "label": "ANAT-DP", "start_ix": 4, "end_ix": 5, "relations": []},
            "3": {"tokens": "pneumonia", "label": "OBS-U", "start_ix": 9, "end_ix": 9, "relations": []}
        }
    },
    "bad": {
        "text": "opacity",
        "entities": {"1": {"tokens": "opacity", "label": "OBS-DP", "relations": [["modify", "5"]]}}
    },
    "r2": {
        "text": "no effusion",
        "entities": {"1": {"tokens": "effusion", "label": "OBS-DA", "start_ix": 1, "end_ix": 1, "relations": []}}
    }
}"#;

/// Write `content` to a fresh temp dir, returning the dir guard and file path
pub fn write_input(content: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("radgraph.json");
    std::fs::write(&path, content).expect("Failed to write input file");
    (dir, path)
}

/// The CLI binary with `RADGRAPH_*` variables cleared
pub fn radgraph() -> Command {
    let mut cmd = Command::cargo_bin("radgraph").expect("Failed to find radgraph binary");
    for key in [
        "RADGRAPH_METHOD",
        "RADGRAPH_SEPARATE_SECTIONS",
        "RADGRAPH_MARK_CERTAINTY",
        "RADGRAPH_JOBS",
    ] {
        cmd.env_remove(key);
    }
    cmd
}
