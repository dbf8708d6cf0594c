use std::path::Path;

use pdf_mindmap::{
    Config, LayoutConfig, OutputFormat, RenderConfig, TopicTree, compute_layout, render_mindmap_to_file,
    render_svg,
};

fn assert_valid_svg(svg: &str, fixture: &str) {
    assert!(svg.starts_with("<svg"), "{fixture}: missing <svg tag");
    assert!(svg.ends_with("</svg>"), "{fixture}: missing </svg tag");
}

fn count(svg: &str, needle: &str) -> usize {
    svg.matches(needle).count()
}

fn load_fixture(name: &str) -> TopicTree {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    let input = std::fs::read_to_string(&path).expect("fixture read failed");
    TopicTree::from_json(&input).expect("fixture parse failed")
}

#[test]
fn render_all_fixtures() {
    // (fixture, drawn nodes, connectors, truncated)
    let candidates = [
        ("empty.json", 1, 0, 0),
        ("single.json", 2, 1, 0),
        ("three_by_two.json", 10, 9, 0),
        ("deep.json", 7, 6, 1),
        ("missing_subtopics.json", 5, 4, 0),
    ];

    let render = RenderConfig::default();
    for (name, nodes, connectors, truncated) in candidates {
        let tree = load_fixture(name);
        let layout = compute_layout(&tree, &LayoutConfig::default(), render.width, render.height);
        assert_eq!(layout.truncated, truncated, "{name}: truncated count");
        assert_eq!(layout.off_page(), 0, "{name}: nodes left the page");

        let svg = render_svg(&layout, &render);
        assert_valid_svg(&svg, name);
        assert_eq!(count(&svg, "class=\"node-box\""), nodes, "{name}: node boxes");
        assert_eq!(count(&svg, "class=\"node-shadow\""), nodes, "{name}: shadows");
        assert_eq!(count(&svg, "class=\"connector\""), connectors, "{name}: connectors");
    }
}

#[test]
fn central_label_is_escaped() {
    let tree = load_fixture("missing_subtopics.json");
    let config = Config::default();
    let svg = pdf_mindmap::render_mindmap_svg(&tree, &config);
    assert!(svg.contains("Notes &amp; &lt;Drafts&gt;"));
    assert!(!svg.contains("<Drafts>"));
}

#[test]
fn writes_pdf_document() {
    let tree = load_fixture("three_by_two.json");
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("mindmap.pdf");
    let layout = render_mindmap_to_file(&tree, &output, OutputFormat::Pdf, &Config::default()).unwrap();
    assert_eq!(layout.placements.len(), 10);

    let bytes = std::fs::read(&output).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}

#[test]
fn empty_tree_still_writes_a_page() {
    let tree = load_fixture("empty.json");
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("empty.pdf");
    render_mindmap_to_file(&tree, &output, OutputFormat::Pdf, &Config::default()).unwrap();
    assert!(std::fs::read(&output).unwrap().starts_with(b"%PDF"));
}

#[test]
fn writes_svg_document() {
    let tree = load_fixture("single.json");
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("mindmap.svg");
    render_mindmap_to_file(&tree, &output, OutputFormat::Svg, &Config::default()).unwrap();
    let svg = std::fs::read_to_string(&output).unwrap();
    assert_valid_svg(&svg, "single.json");
    assert!(svg.contains("Introduction"));
}

#[test]
fn unwritable_destination_is_an_error() {
    let tree = load_fixture("single.json");
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("missing").join("mindmap.pdf");
    let err = render_mindmap_to_file(&tree, &output, OutputFormat::Pdf, &Config::default()).unwrap_err();
    assert!(matches!(err, pdf_mindmap::Error::Write { .. }));
}
