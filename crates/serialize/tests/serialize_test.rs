//! End-to-end serialization properties over a realistic report

mod common;

use common::chest_report;
use radgraph_core::ReportGraph;
use radgraph_serialize::{
    serialize, SerializeOptions, Serializer, Strategy, ANATOMY_MARKER, AT_ANATOMY_MARKER,
    COMPONENT_DELIMITER,
};

fn run(strategy: Strategy, graph: &ReportGraph) -> String {
    Serializer::new(strategy).serialize(graph).expect("Serialization failed")
}

#[test]
fn test_subgraphs_reference_output() {
    let graph = chest_report();
    assert_eq!(
        run(Strategy::Subgraphs, &graph),
        "Mild modify cardiomegaly. \
         Small modify effusion; pleural modify left; effusion located_at pleural. \
         pneumothorax. \
         atelectasis located_at left basilar"
    );
}

#[test]
fn test_no_sep_reference_output() {
    let graph = chest_report();
    assert_eq!(
        run(Strategy::NoSep, &graph),
        "Mild modify cardiomegaly; cardiomegaly; Small modify effusion; left; pleural modify left; \
         effusion located_at pleural; pneumothorax; left basilar; atelectasis located_at left basilar"
    );
}

#[test]
fn test_with_anat_reference_output() {
    let graph = chest_report();
    assert_eq!(
        run(Strategy::WithAnat, &graph),
        "Mild modify cardiomegaly; cardiomegaly; Small modify effusion; effusion located_at pleural; \
         pneumothorax; atelectasis located_at left basilar | left, pleural, left basilar"
    );
}

#[test]
fn test_segment_count_matches_components() {
    let graph = chest_report();
    let output = run(Strategy::Subgraphs, &graph);
    assert_eq!(
        output.split(COMPONENT_DELIMITER).count(),
        graph.connected_components().len()
    );
}

#[test]
fn test_anat_variants_differ_only_in_marker() {
    let graph = chest_report();
    let plain = run(Strategy::WithAnat, &graph);
    let at = run(Strategy::WithAtAnat, &graph);

    assert_ne!(plain, at);
    assert_eq!(plain.replacen(ANATOMY_MARKER, AT_ANATOMY_MARKER, 1), at);
}

#[test]
fn test_repeated_calls_are_identical() {
    let graph = chest_report();
    for strategy in Strategy::ALL {
        let serializer = Serializer::new(strategy).with_options(SerializeOptions {
            mark_certainty: true,
            separate_sections: true,
        });
        let first = serializer.serialize(&graph).unwrap();
        for _ in 0..5 {
            assert_eq!(serializer.serialize(&graph).unwrap(), first);
        }
    }
}

#[test]
fn test_sections_split_findings_from_impression() {
    let graph = chest_report();
    let serializer = Serializer::new(Strategy::Subgraphs).with_options(SerializeOptions {
        mark_certainty: true,
        separate_sections: true,
    });

    assert_eq!(
        serializer.serialize(&graph).unwrap(),
        "FINDINGS: Mild modify cardiomegaly. \
         Small modify effusion; pleural modify left; effusion located_at pleural. \
         no pneumothorax\n\
         IMPRESSION: maybe atelectasis located_at left basilar"
    );
}

#[test]
fn test_unknown_method_name() {
    let graph = chest_report();
    let err = serialize(&graph, "bullet_points").unwrap_err();
    assert!(err.to_string().contains("Unknown serialization strategy"));
}
