//! Common test utilities

use radgraph_core::{parse, ReportGraph};
use serde_json::json;

/// A chest x-ray report in RadGraph layout, ids deliberately out of order
pub fn chest_report() -> ReportGraph {
    let raw = json!({
        "text": "FINDINGS : Mild cardiomegaly . Small left pleural effusion . No pneumothorax . \
                 IMPRESSION : Possible left basilar atelectasis .",
        "entities": {
            "10": {"tokens": "atelectasis", "label": "OBS-U", "start_ix": 18, "end_ix": 18,
                   "relations": [["located_at", "9"]]},
            "1": {"tokens": "Mild", "label": "OBS-DP", "start_ix": 2, "end_ix": 2,
                  "relations": [["modify", "2"]]},
            "2": {"tokens": "cardiomegaly", "label": "OBS-DP", "start_ix": 3, "end_ix": 3, "relations": []},
            "3": {"tokens": "Small", "label": "OBS-DP", "start_ix": 5, "end_ix": 5,
                  "relations": [["modify", "6"]]},
            "4": {"tokens": "left", "label": "ANAT-DP", "start_ix": 6, "end_ix": 6, "relations": []},
            "5": {"tokens": "pleural", "label": "ANAT-DP", "start_ix": 7, "end_ix": 7,
                  "relations": [["modify", "4"]]},
            "6": {"tokens": "effusion", "label": "OBS-DP", "start_ix": 8, "end_ix": 8,
                  "relations": [["located_at", "5"]]},
            "7": {"tokens": "pneumothorax", "label": "OBS-DA", "start_ix": 11, "end_ix": 11, "relations": []},
            "9": {"tokens": "left basilar", "label": "ANAT-DP", "start_ix": 16, "end_ix": 17, "relations": []}
        }
    });
    parse("s50414267", &raw).expect("Fixture must parse")
}
