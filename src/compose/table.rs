//! Table inference from painted line lattices.
//!
//! Horizontal and vertical segments that touch (within the shared line
//! tolerance) are joined into connected components. A component whose
//! segments settle onto at least two distinct row positions and two
//! distinct column positions becomes a grid; every other component is
//! decoration and is dropped. Text is assigned to cells by box centroid.

use crate::compose::orientation::LINE_TOLERANCE;
use crate::compose::text::TextComposer;
use crate::error::WarningKind;
use crate::geom::Rect;
use crate::model::{LinePlacement, PageContent, Table, TableCell};
use crate::options::{BidiMode, Spacing};

/// Tables inferred from one page, plus page-local anomaly notes.
#[derive(Debug, Default)]
pub struct TableOutcome {
    /// Inferred tables, top to bottom then left to right
    pub tables: Vec<Table>,

    /// Anomalies observed during inference
    pub notes: Vec<(WarningKind, String)>,
}

/// Infer all tables on a page.
pub fn compose_tables(page: &PageContent, bidi: BidiMode, spacing: Spacing) -> TableOutcome {
    let mut outcome = TableOutcome::default();

    let degenerate = page
        .lines
        .horizontal
        .iter()
        .chain(&page.lines.vertical)
        .filter(|l| l.is_degenerate())
        .count();
    if degenerate > 0 {
        outcome.notes.push((
            WarningKind::DegenerateLine,
            format!("{degenerate} degenerate painted segment(s) ignored"),
        ));
    }

    let horizontal: Vec<&LinePlacement> = page
        .lines
        .horizontal
        .iter()
        .filter(|l| !l.is_degenerate())
        .collect();
    let vertical: Vec<&LinePlacement> = page
        .lines
        .vertical
        .iter()
        .filter(|l| !l.is_degenerate())
        .collect();

    if horizontal.len() < 2 || vertical.len() < 2 {
        return outcome;
    }

    // connect crossing/touching segments; vertical nodes follow horizontal
    // ones in the index space
    let mut components = UnionFind::new(horizontal.len() + vertical.len());
    for (hi, h) in horizontal.iter().enumerate() {
        for (vi, v) in vertical.iter().enumerate() {
            if segments_touch(h, v) {
                components.union(hi, horizontal.len() + vi);
            }
        }
    }

    let mut groups: std::collections::BTreeMap<usize, (Vec<usize>, Vec<usize>)> =
        std::collections::BTreeMap::new();
    for hi in 0..horizontal.len() {
        groups.entry(components.find(hi)).or_default().0.push(hi);
    }
    for vi in 0..vertical.len() {
        groups
            .entry(components.find(horizontal.len() + vi))
            .or_default()
            .1
            .push(vi);
    }

    for (h_members, v_members) in groups.values() {
        let row_positions = cluster_positions(h_members.iter().map(|&i| horizontal[i].point_one.y));
        let col_positions = cluster_positions(v_members.iter().map(|&i| vertical[i].point_one.x));
        if row_positions.len() < 2 || col_positions.len() < 2 {
            continue;
        }

        let bounds = Rect::new(
            col_positions[0],
            row_positions[0],
            *col_positions.last().unwrap_or(&0.0),
            *row_positions.last().unwrap_or(&0.0),
        );
        log::debug!(
            "grid {}x{} at ({:.1}, {:.1})",
            row_positions.len() - 1,
            col_positions.len() - 1,
            bounds.x0,
            bounds.y1
        );

        // a member segment protruding well past the lattice could have
        // anchored a different grid; flag it
        let protrudes = h_members.iter().any(|&i| {
            horizontal[i].point_one.x < bounds.x0 - LINE_TOLERANCE
                || horizontal[i].point_two.x > bounds.x1 + LINE_TOLERANCE
        }) || v_members.iter().any(|&i| {
            vertical[i].point_one.y > bounds.y1 + LINE_TOLERANCE
                || vertical[i].point_two.y < bounds.y0 - LINE_TOLERANCE
        });
        if protrudes {
            outcome.notes.push((
                WarningKind::AmbiguousTableGrid,
                format!(
                    "segment extends past the {}x{} grid at ({:.1}, {:.1})",
                    row_positions.len() - 1,
                    col_positions.len() - 1,
                    bounds.x0,
                    bounds.y1
                ),
            ));
        }

        outcome.tables.push(build_grid(bounds, &row_positions, &col_positions));
    }

    // reading order: topmost grid first, then leftmost
    outcome.tables.sort_by(|a, b| {
        b.bounds
            .y1
            .total_cmp(&a.bounds.y1)
            .then(a.bounds.x0.total_cmp(&b.bounds.x0))
    });

    assign_text(page, &mut outcome, bidi, spacing);
    outcome
}

/// Whether a horizontal and a vertical segment touch within tolerance.
fn segments_touch(h: &LinePlacement, v: &LinePlacement) -> bool {
    let (h_x0, h_x1) = (h.point_one.x, h.point_two.x);
    let h_y = h.point_one.y;
    let v_x = v.point_one.x;
    let (v_top, v_bottom) = (v.point_one.y, v.point_two.y);

    v_x >= h_x0 - LINE_TOLERANCE
        && v_x <= h_x1 + LINE_TOLERANCE
        && h_y <= v_top + LINE_TOLERANCE
        && h_y >= v_bottom - LINE_TOLERANCE
}

/// Collapse coordinates within [`LINE_TOLERANCE`] of each other into single
/// grid positions. Rows come back top-first (descending), columns
/// left-first (ascending); the caller picks by feeding ys or xs.
fn cluster_positions<I: Iterator<Item = f64>>(values: I) -> Vec<f64> {
    let mut sorted: Vec<f64> = values.collect();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mut clusters: Vec<Vec<f64>> = Vec::new();
    for value in sorted {
        match clusters.last_mut() {
            Some(cluster)
                if value - cluster.last().copied().unwrap_or(value) <= LINE_TOLERANCE =>
            {
                cluster.push(value);
            }
            _ => clusters.push(vec![value]),
        }
    }

    let mut positions: Vec<f64> = clusters
        .iter()
        .map(|c| c.iter().sum::<f64>() / c.len() as f64)
        .collect();
    positions.sort_by(|a, b| a.total_cmp(b));
    positions
}

fn build_grid(bounds: Rect, row_positions: &[f64], col_positions: &[f64]) -> Table {
    // row_positions ascend; rows are emitted top to bottom
    let mut rows = Vec::with_capacity(row_positions.len() - 1);
    for pair in row_positions.windows(2).rev() {
        let (y_bottom, y_top) = (pair[0], pair[1]);
        let mut row = Vec::with_capacity(col_positions.len() - 1);
        for cols in col_positions.windows(2) {
            row.push(TableCell::new(Rect::new(cols[0], y_bottom, cols[1], y_top)));
        }
        rows.push(row);
    }
    Table { bounds, rows }
}

/// Drop each non-blank placement into the cell containing its centroid,
/// then compose the per-cell text.
fn assign_text(page: &PageContent, outcome: &mut TableOutcome, bidi: BidiMode, spacing: Spacing) {
    for item in &page.texts {
        if item.is_blank() {
            continue;
        }
        let centroid = item.global_box.center();
        'tables: for table in &mut outcome.tables {
            if !table.bounds.contains(centroid) {
                continue;
            }
            for row in &mut table.rows {
                for cell in row {
                    if cell.bounds.contains(centroid) {
                        cell.placements.push(item.clone());
                        break 'tables;
                    }
                }
            }
        }
    }

    let mut unresolved = 0;
    for table in &mut outcome.tables {
        for row in &mut table.rows {
            for cell in row {
                if cell.placements.is_empty() {
                    continue;
                }
                let mut composer = TextComposer::new(bidi, spacing);
                composer.compose_page(&cell.placements);
                unresolved += composer.unresolved_bidi_lines();
                let mut text = composer.into_text();
                if text.ends_with('\n') {
                    text.pop();
                }
                cell.text = text;
            }
        }
    }
    if unresolved > 0 {
        outcome.notes.push((
            WarningKind::UnresolvedBidi,
            format!("{unresolved} cell line(s) carried explicit directional controls"),
        ));
    }
}

struct UnionFind {
    parent: Vec<usize>,
}

impl UnionFind {
    fn new(size: usize) -> Self {
        Self {
            parent: (0..size).collect(),
        }
    }

    fn find(&mut self, mut index: usize) -> usize {
        while self.parent[index] != index {
            self.parent[index] = self.parent[self.parent[index]];
            index = self.parent[index];
        }
        index
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            self.parent[ra] = rb;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::{ColorRgb, Matrix, Vec2};
    use crate::model::{TextAttributes, TextPlacement};

    fn h_line(y: f64, x0: f64, x1: f64) -> LinePlacement {
        LinePlacement {
            vertical: false,
            point_one: Vec2::new(x0, y),
            point_two: Vec2::new(x1, y),
            effective_width: Vec2::new(1.0, 1.0),
            color: ColorRgb::new(0.0, 0.0, 0.0),
        }
    }

    fn v_line(x: f64, y_top: f64, y_bottom: f64) -> LinePlacement {
        LinePlacement {
            vertical: true,
            point_one: Vec2::new(x, y_top),
            point_two: Vec2::new(x, y_bottom),
            effective_width: Vec2::new(1.0, 1.0),
            color: ColorRgb::new(0.0, 0.0, 0.0),
        }
    }

    fn text_at(text: &str, global_box: Rect) -> TextPlacement {
        TextPlacement {
            text: text.into(),
            matrix: Matrix::identity(),
            local_box: global_box,
            global_box,
            space_width: 2.0,
            global_space_width: Vec2::new(2.0, 0.0),
            attrs: TextAttributes::default(),
        }
    }

    fn page_with(
        h: Vec<LinePlacement>,
        v: Vec<LinePlacement>,
        texts: Vec<TextPlacement>,
    ) -> PageContent {
        let mut page = PageContent::new(Rect::new(0.0, 0.0, 612.0, 792.0));
        page.lines.horizontal = h;
        page.lines.vertical = v;
        page.texts = texts;
        page
    }

    #[test]
    fn test_no_lines_no_tables() {
        let page = page_with(vec![], vec![], vec![]);
        let outcome = compose_tables(&page, BidiMode::Off, Spacing::HORIZONTAL);
        assert!(outcome.tables.is_empty());
        assert!(outcome.notes.is_empty());
    }

    #[test]
    fn test_single_cell_grid() {
        let page = page_with(
            vec![h_line(200.0, 100.0, 300.0), h_line(100.0, 100.0, 300.0)],
            vec![v_line(100.0, 200.0, 100.0), v_line(300.0, 200.0, 100.0)],
            vec![text_at("only", Rect::new(150.0, 140.0, 200.0, 160.0))],
        );
        let outcome = compose_tables(&page, BidiMode::Off, Spacing::HORIZONTAL);
        assert_eq!(outcome.tables.len(), 1);

        let table = &outcome.tables[0];
        assert_eq!(table.row_count(), 1);
        assert_eq!(table.column_count(), 1);
        assert_eq!(table.cell(0, 0).unwrap().text, "only");
    }

    #[test]
    fn test_two_by_two_grid_cell_order() {
        let page = page_with(
            vec![
                h_line(300.0, 100.0, 500.0),
                h_line(200.0, 100.0, 500.0),
                h_line(100.0, 100.0, 500.0),
            ],
            vec![
                v_line(100.0, 300.0, 100.0),
                v_line(300.0, 300.0, 100.0),
                v_line(500.0, 300.0, 100.0),
            ],
            vec![
                text_at("a", Rect::new(150.0, 240.0, 170.0, 260.0)),
                text_at("b", Rect::new(350.0, 240.0, 370.0, 260.0)),
                text_at("c", Rect::new(150.0, 140.0, 170.0, 160.0)),
                text_at("d", Rect::new(350.0, 140.0, 370.0, 160.0)),
            ],
        );
        let outcome = compose_tables(&page, BidiMode::Off, Spacing::HORIZONTAL);
        assert_eq!(outcome.tables.len(), 1);

        let table = &outcome.tables[0];
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_count(), 2);
        // rows top to bottom, cells left to right
        assert_eq!(table.cell(0, 0).unwrap().text, "a");
        assert_eq!(table.cell(0, 1).unwrap().text, "b");
        assert_eq!(table.cell(1, 0).unwrap().text, "c");
        assert_eq!(table.cell(1, 1).unwrap().text, "d");
    }

    #[test]
    fn test_disconnected_lattices_make_two_tables() {
        let page = page_with(
            vec![
                h_line(700.0, 100.0, 200.0),
                h_line(650.0, 100.0, 200.0),
                h_line(300.0, 100.0, 200.0),
                h_line(250.0, 100.0, 200.0),
            ],
            vec![
                v_line(100.0, 700.0, 650.0),
                v_line(200.0, 700.0, 650.0),
                v_line(100.0, 300.0, 250.0),
                v_line(200.0, 300.0, 250.0),
            ],
            vec![],
        );
        let outcome = compose_tables(&page, BidiMode::Off, Spacing::HORIZONTAL);
        assert_eq!(outcome.tables.len(), 2);
        // topmost table first
        assert!(outcome.tables[0].bounds.y1 > outcome.tables[1].bounds.y1);
    }

    #[test]
    fn test_open_lattice_is_not_a_table() {
        // two horizontals but a single vertical: no 2x2 of positions
        let page = page_with(
            vec![h_line(200.0, 100.0, 300.0), h_line(100.0, 100.0, 300.0)],
            vec![v_line(100.0, 200.0, 100.0), v_line(102.0, 200.0, 100.0)],
            vec![],
        );
        let outcome = compose_tables(&page, BidiMode::Off, Spacing::HORIZONTAL);
        assert!(outcome.tables.is_empty());
    }

    #[test]
    fn test_nearby_rules_cluster_to_one_position() {
        // doubled border strokes 1 unit apart collapse into one grid line
        let page = page_with(
            vec![
                h_line(200.0, 100.0, 300.0),
                h_line(199.0, 100.0, 300.0),
                h_line(100.0, 100.0, 300.0),
            ],
            vec![v_line(100.0, 200.0, 100.0), v_line(300.0, 200.0, 100.0)],
            vec![],
        );
        let outcome = compose_tables(&page, BidiMode::Off, Spacing::HORIZONTAL);
        assert_eq!(outcome.tables.len(), 1);
        assert_eq!(outcome.tables[0].row_count(), 1);
    }

    #[test]
    fn test_degenerate_lines_noted_and_ignored() {
        let mut dot = h_line(500.0, 50.0, 50.0);
        dot.point_two = dot.point_one;
        let page = page_with(
            vec![
                dot,
                h_line(200.0, 100.0, 300.0),
                h_line(100.0, 100.0, 300.0),
            ],
            vec![v_line(100.0, 200.0, 100.0), v_line(300.0, 200.0, 100.0)],
            vec![],
        );
        let outcome = compose_tables(&page, BidiMode::Off, Spacing::HORIZONTAL);
        assert_eq!(outcome.tables.len(), 1);
        assert!(outcome
            .notes
            .iter()
            .any(|(kind, _)| *kind == WarningKind::DegenerateLine));
    }

    #[test]
    fn test_protruding_segment_flagged() {
        let page = page_with(
            vec![h_line(200.0, 100.0, 450.0), h_line(100.0, 100.0, 300.0)],
            vec![v_line(100.0, 200.0, 100.0), v_line(300.0, 200.0, 100.0)],
            vec![],
        );
        let outcome = compose_tables(&page, BidiMode::Off, Spacing::HORIZONTAL);
        assert_eq!(outcome.tables.len(), 1);
        assert!(outcome
            .notes
            .iter()
            .any(|(kind, _)| *kind == WarningKind::AmbiguousTableGrid));
    }

    #[test]
    fn test_text_outside_grid_ignored() {
        let page = page_with(
            vec![h_line(200.0, 100.0, 300.0), h_line(100.0, 100.0, 300.0)],
            vec![v_line(100.0, 200.0, 100.0), v_line(300.0, 200.0, 100.0)],
            vec![
                text_at("in", Rect::new(150.0, 140.0, 180.0, 160.0)),
                text_at("out", Rect::new(400.0, 140.0, 430.0, 160.0)),
            ],
        );
        let outcome = compose_tables(&page, BidiMode::Off, Spacing::HORIZONTAL);
        assert_eq!(outcome.tables[0].cell(0, 0).unwrap().text, "in");
    }

    #[test]
    fn test_multi_line_cell_text() {
        let page = page_with(
            vec![h_line(300.0, 100.0, 300.0), h_line(100.0, 100.0, 300.0)],
            vec![v_line(100.0, 300.0, 100.0), v_line(300.0, 300.0, 100.0)],
            vec![
                text_at("upper", Rect::new(110.0, 240.0, 160.0, 260.0)),
                text_at("lower", Rect::new(110.0, 140.0, 160.0, 160.0)),
            ],
        );
        let outcome = compose_tables(&page, BidiMode::Off, Spacing::HORIZONTAL);
        assert_eq!(outcome.tables[0].cell(0, 0).unwrap().text, "upper\nlower");
    }
}
