//! ASCII plotting of the correlation function for terminal output.
//!
//! Fixed-size character grid, deterministic output.
//!
//! Plot elements:
//! - `Γ₁`: `-` line
//! - tangent at the inflection point: `.`
//! - first minimum: `x`

use crate::domain::{Curve, SupplementaryParameters};

/// Render `gamma_1`, optionally with the tangent construction overlaid.
///
/// With supplementary geometry the x axis runs from 0 to the largest distance
/// the measured q range resolves (`1/qmin`); otherwise it spans the curve.
pub fn render_correlation_plot(
    gamma_1: &Curve,
    supplementary: Option<&SupplementaryParameters>,
    label: &str,
    width: usize,
    height: usize,
) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let (x_min, x_max) = match supplementary {
        Some(s) if s.x_range.1 > 0.0 => (0.0, s.x_range.1),
        _ => (gamma_1.x_min(), gamma_1.x_max()),
    };
    let x_max = if x_max > x_min { x_max } else { x_min + 1.0 };

    let points: Vec<(f64, f64)> = gamma_1
        .x()
        .iter()
        .zip(gamma_1.y())
        .filter(|&(&x, _)| x >= x_min && x <= x_max)
        .map(|(&x, &y)| (x, y))
        .collect();

    let (y_min, y_max) = y_range(&points).unwrap_or((-1.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);
    let frame = Frame { x_min, x_max, y_min, y_max, width, height };

    let mut grid = vec![vec![' '; width]; height];
    draw_curve(&mut grid, &points, &frame);

    if let Some(s) = supplementary {
        draw_tangent(&mut grid, s, &frame);
        if s.first_minimum_x >= x_min && s.first_minimum_x <= x_max {
            let col = frame.col(s.first_minimum_x);
            let row = frame.row(s.first_minimum_y);
            grid[row][col] = 'x';
        }
    }

    let mut out = String::new();
    out.push_str(&format!(
        "{label}: x=[{x_min:.1}, {x_max:.1}] | y=[{y_min:.3}, {y_max:.3}]\n"
    ));
    for row in grid {
        out.push_str(row.into_iter().collect::<String>().trim_end());
        out.push('\n');
    }
    out
}

struct Frame {
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
    width: usize,
    height: usize,
}

impl Frame {
    fn col(&self, x: f64) -> usize {
        let u = ((x - self.x_min) / (self.x_max - self.x_min)).clamp(0.0, 1.0);
        (u * (self.width as f64 - 1.0)).round() as usize
    }

    // Row 0 is the top (largest y).
    fn row(&self, y: f64) -> usize {
        let u = ((y - self.y_min) / (self.y_max - self.y_min)).clamp(0.0, 1.0);
        (self.height as f64 - 1.0 - u * (self.height as f64 - 1.0)).round() as usize
    }

    fn x_at(&self, col: usize) -> f64 {
        self.x_min + (self.x_max - self.x_min) * col as f64 / (self.width as f64 - 1.0)
    }
}

fn y_range(points: &[(f64, f64)]) -> Option<(f64, f64)> {
    let (lo, hi) = points
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &(_, y)| (lo.min(y), hi.max(y)));
    (lo.is_finite() && hi.is_finite() && hi > lo).then_some((lo, hi))
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let pad = ((max - min).abs() * frac).max(1e-12);
    (min - pad, max + pad)
}

fn draw_curve(grid: &mut [Vec<char>], points: &[(f64, f64)], frame: &Frame) {
    let mut prev = None;
    for &(x, y) in points {
        let cell = (frame.col(x), frame.row(y));
        match prev {
            Some(p) if p != cell => draw_line(grid, p, cell, '-'),
            Some(_) => {}
            None => grid[cell.1][cell.0] = '-',
        }
        prev = Some(cell);
    }
}

/// The tangent only where it stays inside the plotted y range.
fn draw_tangent(grid: &mut [Vec<char>], s: &SupplementaryParameters, frame: &Frame) {
    let intercept = s.tangent_intercept();
    for col in 0..frame.width {
        let y = s.tangent_gradient * frame.x_at(col) + intercept;
        if y >= frame.y_min && y <= frame.y_max {
            let row = frame.row(y);
            if grid[row][col] == ' ' {
                grid[row][col] = '.';
            }
        }
    }
}

/// Integer line drawing (Bresenham) that leaves occupied cells alone.
fn draw_line(grid: &mut [Vec<char>], from: (usize, usize), to: (usize, usize), ch: char) {
    let (mut x0, mut y0) = (from.0 as isize, from.1 as isize);
    let (x1, y1) = (to.0 as isize, to.1 as isize);

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vee() -> Curve {
        let x: Vec<f64> = (0..=10).map(|i| i as f64).collect();
        let y = x.iter().map(|&v| (v - 5.0).abs() / 5.0).collect();
        Curve::new(x, y, None).unwrap()
    }

    #[test]
    fn plot_golden_snapshot_small() {
        let txt = render_correlation_plot(&vee(), None, "gamma_1", 11, 5);
        let expected = concat!(
            "gamma_1: x=[0.0, 10.0] | y=[-0.050, 1.050]\n",
            "-         -\n",
            " -       -\n",
            "  --   --\n",
            "    - -\n",
            "     -\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn overlays_minimum_marker_and_tangent() {
        let s = SupplementaryParameters {
            tangent_point_x: 2.5,
            tangent_point_y: 0.5,
            tangent_gradient: -0.1,
            first_minimum_x: 5.0,
            first_minimum_y: 0.0,
            x_range: (0.1, 10.0),
            y_range: (0.0, 1.0),
        };
        let txt = render_correlation_plot(&vee(), Some(&s), "gamma_1", 21, 11);
        let rows: Vec<&str> = txt.lines().skip(1).collect();
        assert_eq!(rows.len(), 11);
        // The minimum sits on the bottom row, centre column.
        assert_eq!(rows[10].chars().nth(10), Some('x'));
        assert!(rows.iter().any(|r| r.contains('.')));
        // Below the plotted range the tangent is clipped, not pinned to the edge.
        assert_ne!(rows[10].chars().nth(20), Some('.'));
    }
}
