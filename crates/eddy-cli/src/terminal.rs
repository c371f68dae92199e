//! Character-ramp presenter for headless runs.

use std::io::Write;

use eddy_solver::{FieldView, Presenter};
use eddy_types::{EddyResult, Field};

const RAMP: &[u8] = b" .:-=+*#%@";
const DIVERGING: &[u8] = b"#+-. .-+#";

/// Draws a field as text, one character per block of cells.
pub struct TerminalPresenter<W: Write> {
    out: W,
    max_columns: usize,
}

impl<W: Write> TerminalPresenter<W> {
    pub fn new(out: W, max_columns: usize) -> Self {
        Self {
            out,
            max_columns: max_columns.max(1),
        }
    }

    /// Character for `value`. Velocities use a ramp symmetric around zero.
    fn glyph(field: Field, value: f32, lo: f32, hi: f32) -> char {
        let signed = matches!(field, Field::HorizontalVelocity | Field::VerticalVelocity);
        let (ramp, t) = if signed {
            let scale = lo.abs().max(hi.abs());
            let t = if scale > 0.0 { 0.5 + 0.5 * value / scale } else { 0.5 };
            (DIVERGING, t)
        } else {
            let t = if hi > lo { (value - lo) / (hi - lo) } else { 0.0 };
            (RAMP, t)
        };
        let idx = (t.clamp(0.0, 1.0) * (ramp.len() - 1) as f32).round() as usize;
        ramp[idx] as char
    }
}

impl<W: Write> Presenter for TerminalPresenter<W> {
    fn present_field(&mut self, view: FieldView<'_>) -> EddyResult<()> {
        let (lo, hi) = view.range();
        let grid = view.grid;
        // terminal cells are about twice as tall as wide
        let step_x = grid.width().div_ceil(self.max_columns).max(1);
        let step_y = step_x * 2;

        writeln!(self.out, "{} [{lo:.4}, {hi:.4}]", view.field)?;
        for j in (0..grid.height()).step_by(step_y) {
            let line: String = (0..grid.width())
                .step_by(step_x)
                .map(|i| Self::glyph(view.field, view.at(i, j), lo, hi))
                .collect();
            writeln!(self.out, "{line}")?;
        }
        self.out.flush()?;
        Ok(())
    }
}
