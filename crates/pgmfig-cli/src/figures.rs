//! The four hierarchical Poisson model figures.
//!
//! Each figure is declared on its own, even where two of them share most of
//! their nodes, so that changing one never moves another.

use log::debug;

use pgmfig::{LabelPosition, Node, ObservedStyle, Pgm, PgmError, Plate};

/// A named figure and the function declaring it.
#[derive(Debug, Clone, Copy)]
pub struct Figure {
    name: &'static str,
    declare: fn() -> Result<Pgm, PgmError>,
}

impl Figure {
    /// Returns the file stem the figure is saved under.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Builds a fresh diagram for this figure.
    pub fn build(&self) -> Result<Pgm, PgmError> {
        debug!(figure = self.name; "Declaring figure");
        (self.declare)()
    }
}

/// Returns the figures in the order they are rendered.
pub fn all() -> [Figure; 4] {
    [
        Figure {
            name: "hier_poissoneg_pgm1",
            declare: single_level,
        },
        Figure {
            name: "hier_poissoneg_pgm2",
            declare: two_level,
        },
        Figure {
            name: "hier_poissoneg_pgm2a",
            declare: two_level_shared,
        },
        Figure {
            name: "hier_poissoneg_pgm3",
            declare: plated,
        },
    ]
}

fn add_edges(pgm: &mut Pgm, edges: &[(&str, &str)]) -> Result<(), PgmError> {
    for (source, target) in edges {
        pgm.add_edge(source, target)?;
    }
    Ok(())
}

/// One Poisson rate with a gamma prior.
fn single_level() -> Result<Pgm, PgmError> {
    let mut pgm = Pgm::new(3.2, 1.65).with_observed_style(ObservedStyle::Inner);
    pgm.add_node(Node::new("alpha", r"$\alpha$", 0.25, 0.25).fixed())?;
    pgm.add_node(Node::new("beta", r"$\beta$", 0.25, 1.25).fixed())?;
    pgm.add_node(Node::new("F", r"$F$", 1.0, 0.75))?;
    pgm.add_node(Node::new("mu", r"$\mu$", 1.9, 0.75).fixed())?;
    pgm.add_node(Node::new("N", r"$N$", 2.8, 0.75).observed())?;
    add_edges(
        &mut pgm,
        &[("alpha", "F"), ("beta", "F"), ("F", "mu"), ("mu", "N")],
    )?;
    Ok(pgm)
}

/// Background and on-source counts, each with its own rate.
fn two_level() -> Result<Pgm, PgmError> {
    let mut pgm = Pgm::new(3.2, 2.25).with_observed_style(ObservedStyle::Inner);
    pgm.add_node(Node::new("alphab", r"$\alpha_b$", 0.25, 0.25).fixed())?;
    pgm.add_node(Node::new("betab", r"$\beta_b$", 0.25, 0.75).fixed())?;
    pgm.add_node(Node::new("Fb", r"$F_b$", 1.0, 0.5))?;
    pgm.add_node(Node::new("mub", r"$\mu_b$", 1.9, 0.5).fixed())?;
    pgm.add_node(Node::new("Nb", r"$N_b$", 2.8, 0.5).observed())?;
    add_edges(
        &mut pgm,
        &[
            ("alphab", "Fb"),
            ("betab", "Fb"),
            ("Fb", "mub"),
            ("mub", "Nb"),
        ],
    )?;

    pgm.add_node(Node::new("alphag", r"$\alpha_g$", 0.25, 1.4).fixed())?;
    pgm.add_node(Node::new("betag", r"$\beta_g$", 0.25, 1.9).fixed())?;
    pgm.add_node(Node::new("Fg", r"$F_g$", 1.0, 1.65))?;
    pgm.add_node(Node::new("mus", r"$\mu_s$", 1.9, 1.25).fixed())?;
    pgm.add_node(Node::new("Ns", r"$N_s$", 2.8, 1.25).observed())?;
    add_edges(
        &mut pgm,
        &[
            ("alphag", "Fg"),
            ("betag", "Fg"),
            ("Fg", "mus"),
            ("Fb", "mus"),
            ("mus", "Ns"),
        ],
    )?;
    Ok(pgm)
}

/// The two-level model with a shared exposure `g` feeding both rates.
fn two_level_shared() -> Result<Pgm, PgmError> {
    let mut pgm = Pgm::new(3.2, 2.25).with_observed_style(ObservedStyle::Inner);
    pgm.add_node(Node::new("alphab", r"$\alpha_b$", 0.25, 0.25).fixed())?;
    pgm.add_node(Node::new("betab", r"$\beta_b$", 0.25, 0.75).fixed())?;
    pgm.add_node(Node::new("Fb", r"$F_b$", 1.0, 0.5))?;
    // Label below the dot, clear of the edge from g
    pgm.add_node(
        Node::new("mub", r"$\mu_b$", 1.9, 0.5)
            .fixed()
            .with_offset(0.0, -20.0),
    )?;
    pgm.add_node(Node::new("Nb", r"$N_b$", 2.8, 0.5).observed())?;
    add_edges(
        &mut pgm,
        &[
            ("alphab", "Fb"),
            ("betab", "Fb"),
            ("Fb", "mub"),
            ("mub", "Nb"),
        ],
    )?;

    pgm.add_node(Node::new("alphag", r"$\alpha_g$", 0.25, 1.4).fixed())?;
    pgm.add_node(Node::new("betag", r"$\beta_g$", 0.25, 1.9).fixed())?;
    pgm.add_node(Node::new("Fg", r"$F_g$", 1.0, 1.65))?;
    pgm.add_node(Node::new("mus", r"$\mu_s$", 1.9, 1.65).fixed())?;
    pgm.add_node(Node::new("Ns", r"$N_s$", 2.8, 1.65).observed())?;
    add_edges(
        &mut pgm,
        &[
            ("alphag", "Fg"),
            ("betag", "Fg"),
            ("Fg", "mus"),
            ("Fb", "mus"),
            ("mus", "Ns"),
        ],
    )?;

    pgm.add_node(Node::new("g", r"$\gamma$", 1.9, 1.075))?;
    add_edges(&mut pgm, &[("g", "mus"), ("g", "mub")])?;
    Ok(pgm)
}

/// Many sources sharing a luminosity function, repeated on a plate.
fn plated() -> Result<Pgm, PgmError> {
    let mut pgm = Pgm::new(3.2, 2.25).with_observed_style(ObservedStyle::Inner);
    pgm.add_node(Node::new("alphab", r"$\alpha_b$", 0.25, 0.15).fixed())?;
    pgm.add_node(Node::new("betab", r"$\beta_b$", 0.25, 0.55).fixed())?;
    pgm.add_node(Node::new("Fb", r"$F_b$", 1.65, 0.4))?;
    pgm.add_node(Node::new("Nb", r"$N_b$", 2.8, 0.4).observed())?;
    add_edges(
        &mut pgm,
        &[("alphab", "Fb"), ("betab", "Fb"), ("Fb", "Nb")],
    )?;

    pgm.add_node(Node::new("Lstar", r"$L^\ast$", 0.9, 1.725))?;
    pgm.add_node(Node::new("alpha", r"$\alpha$", 0.9, 1.025))?;
    pgm.add_node(Node::new("Lg", r"$L_{g,i}$", 1.9, 1.4))?;
    pgm.add_node(Node::new("Ns", r"$N_{s,i}$", 2.8, 1.4).observed())?;
    add_edges(
        &mut pgm,
        &[
            ("Lstar", "Lg"),
            ("alpha", "Lg"),
            ("Fb", "Ns"),
            ("Lg", "Ns"),
        ],
    )?;

    pgm.add_plate(
        Plate::new(1.45, 0.85, 1.65, 1.1, r"${}_{i=1,\ldots,m}$")
            .with_label_position(LabelPosition::BottomLeft),
    )?;
    Ok(pgm)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(name: &str) -> Pgm {
        all()
            .into_iter()
            .find(|figure| figure.name() == name)
            .unwrap()
            .build()
            .unwrap()
    }

    #[test]
    fn test_figure_names() {
        let names: Vec<&str> = all().iter().map(Figure::name).collect();
        assert_eq!(
            names,
            [
                "hier_poissoneg_pgm1",
                "hier_poissoneg_pgm2",
                "hier_poissoneg_pgm2a",
                "hier_poissoneg_pgm3"
            ]
        );
    }

    #[test]
    fn test_figure_sizes() {
        let counts: Vec<(usize, usize, usize)> = all()
            .iter()
            .map(|figure| {
                let pgm = figure.build().unwrap();
                (pgm.node_count(), pgm.edges().len(), pgm.plate_count())
            })
            .collect();
        assert_eq!(counts, [(5, 4, 0), (10, 9, 0), (11, 11, 0), (8, 7, 1)]);
    }

    #[test]
    fn test_first_figure_nodes() {
        let pgm = build("hier_poissoneg_pgm1");
        assert_eq!(pgm.canvas().shape(), pgmfig::geometry::Size::new(3.2, 1.65));
        assert_eq!(pgm.observed_style(), ObservedStyle::Inner);

        let fixed: Vec<&str> = pgm
            .nodes()
            .filter(|node| node.is_fixed())
            .map(Node::id)
            .collect();
        assert_eq!(fixed, ["alpha", "beta", "mu"]);

        let observed: Vec<&str> = pgm
            .nodes()
            .filter(|node| node.is_observed())
            .map(Node::id)
            .collect();
        assert_eq!(observed, ["N"]);
    }

    #[test]
    fn test_shared_figure_moves_mub_label_down() {
        let pgm = build("hier_poissoneg_pgm2a");
        let offset = pgm.node("mub").unwrap().offset();
        assert_eq!((offset.x(), offset.y()), (0.0, -20.0));
        assert!(pgm.node("g").is_some());
    }

    #[test]
    fn test_plate_bounds_replicated_nodes() {
        let pgm = build("hier_poissoneg_pgm3");
        let plate = pgm.plates().next().unwrap();
        assert_eq!(plate.label_position(), LabelPosition::BottomLeft);

        for id in ["Lg", "Ns"] {
            let position = pgm.node(id).unwrap().position();
            assert!(plate.bounds().contains(position), "{id} outside plate");
        }
        for id in ["Fb", "Lstar", "alpha"] {
            let position = pgm.node(id).unwrap().position();
            assert!(!plate.bounds().contains(position), "{id} inside plate");
        }
    }
}
