//! Integration tests for the diagram declaration API.

use pgmfig::{LabelPosition, Node, ObservedStyle, Pgm, PgmError, Plate};

fn first_figure() -> Result<Pgm, PgmError> {
    let mut pgm = Pgm::new(3.2, 1.65).with_observed_style(ObservedStyle::Inner);
    pgm.add_node(Node::new("alpha", r"$\alpha$", 0.25, 0.25).fixed())?;
    pgm.add_node(Node::new("beta", r"$\beta$", 0.25, 1.25).fixed())?;
    pgm.add_node(Node::new("F", "$F$", 1.0, 0.75))?;
    pgm.add_node(Node::new("mu", r"$\mu$", 1.9, 0.75).fixed())?;
    pgm.add_node(Node::new("N", "$N$", 2.8, 0.75).observed())?;
    pgm.add_edge("alpha", "F")?;
    pgm.add_edge("beta", "F")?;
    pgm.add_edge("F", "mu")?;
    pgm.add_edge("mu", "N")?;
    Ok(pgm)
}

#[test]
fn test_declare_first_figure() {
    let pgm = first_figure().expect("declarations are valid");
    assert_eq!(pgm.node_count(), 5);
    assert_eq!(pgm.edges().len(), 4);
    assert_eq!(pgm.plate_count(), 0);
    assert!(pgm.node("mu").unwrap().is_fixed());
    assert!(pgm.node("N").unwrap().is_observed());
}

#[test]
fn test_every_edge_joins_declared_nodes() {
    let pgm = first_figure().unwrap();
    for edge in pgm.edges() {
        assert!(pgm.node(edge.source()).is_some(), "{}", edge.source());
        assert!(pgm.node(edge.target()).is_some(), "{}", edge.target());
    }
}

#[test]
fn test_edge_before_nodes_then_after() {
    let mut pgm = Pgm::new(2.0, 1.0);
    let result = pgm.add_edge("a", "b");
    assert!(matches!(result, Err(PgmError::UnknownNode { ref id }) if id == "a"));

    pgm.add_node(Node::new("a", "$a$", 0.5, 0.5)).unwrap();
    pgm.add_node(Node::new("b", "$b$", 1.5, 0.5)).unwrap();
    assert!(pgm.add_edge("a", "b").is_ok());
}

#[test]
fn test_duplicate_id_is_rejected() {
    let mut pgm = first_figure().unwrap();
    let err = pgm
        .add_node(Node::new("F", "$G$", 2.0, 1.0).observed())
        .unwrap_err();
    assert_eq!(err.to_string(), "node `F` is already declared");

    let node = pgm.node("F").unwrap();
    assert_eq!(node.label(), "$F$");
    assert!(!node.is_observed());
    assert_eq!(pgm.node_count(), 5);
}

#[test]
fn test_plate_bounds_its_nodes() {
    let mut pgm = Pgm::new(3.2, 2.0);
    pgm.add_node(Node::new("Lg", "$L_{g,i}$", 1.9, 1.4)).unwrap();
    pgm.add_node(Node::new("Ns", "$N_{s,i}$", 2.8, 1.4).observed())
        .unwrap();
    pgm.add_plate(
        Plate::new(1.45, 0.85, 1.65, 1.1, r"${}_{i=1,\ldots,m}$")
            .with_label_position(LabelPosition::BottomLeft),
    )
    .unwrap();

    let plate = pgm.plates().next().unwrap();
    assert!(plate.bounds().contains(pgm.node("Lg").unwrap().position()));
    assert!(plate.bounds().contains(pgm.node("Ns").unwrap().position()));
}

#[test]
fn test_markup_error_reports_offset() {
    let mut pgm = Pgm::new(1.0, 1.0);
    let err = pgm
        .add_node(Node::new("x", r"$x + \foo$", 0.5, 0.5))
        .unwrap_err();
    match err {
        PgmError::Markup(markup) => {
            assert_eq!(markup.source_text(), r"$x + \foo$");
            assert_eq!(markup.offset(), 5);
        }
        other => panic!("expected a markup error, got {other:?}"),
    }
}
