//! Plot exports: CSV, TikZ (pgfplots), and PNG screenshots.
//!
//! CSV and TikZ are written from the canvas curves, so they reflect
//! exactly what is on screen (mode, gating, renames included).

use std::io::Write;
use std::path::Path;

use thiserror::Error;

use crate::canvas::{Curve, PlotCanvas};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("nothing to export: no traces are plotted")]
    NothingToExport,
    #[error("traces have different x axes; export them separately")]
    AxisMismatch,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Image(#[from] image::ImageError),
}

const X_EPSILON: f64 = 1e-9;

fn shared_x_axis(curves: &[Curve]) -> Result<Vec<f64>, ExportError> {
    let first = curves.first().ok_or(ExportError::NothingToExport)?;
    let x: Vec<f64> = first.points.iter().map(|p| p[0]).collect();
    for c in &curves[1..] {
        if c.points.len() != x.len() {
            return Err(ExportError::AxisMismatch);
        }
        for (p, x0) in c.points.iter().zip(&x) {
            if (p[0] - x0).abs() > X_EPSILON * x0.abs().max(1.0) {
                return Err(ExportError::AxisMismatch);
            }
        }
    }
    Ok(x)
}

/// Write the plotted curves as CSV: the x axis first, one column per
/// trace, labels as header. All curves must share the x axis.
pub fn write_csv<W: Write>(
    mut w: W,
    curves: &[Curve],
    x_label: &str,
) -> Result<(), ExportError> {
    let x = shared_x_axis(curves)?;
    write!(w, "{x_label}")?;
    for c in curves {
        write!(w, ",{}", c.label.replace(',', ";"))?;
    }
    writeln!(w)?;
    for (row, x0) in x.iter().enumerate() {
        write!(w, "{x0}")?;
        for c in curves {
            write!(w, ",{}", c.points[row][1])?;
        }
        writeln!(w)?;
    }
    Ok(())
}

/// Write the plotted curves as a standalone pgfplots document.
pub fn write_tikz<W: Write>(
    mut w: W,
    curves: &[Curve],
    x_label: &str,
    y_label: &str,
) -> Result<(), ExportError> {
    if curves.is_empty() {
        return Err(ExportError::NothingToExport);
    }
    writeln!(w, "\\documentclass{{standalone}}")?;
    writeln!(w, "\\usepackage{{pgfplots}}")?;
    writeln!(w, "\\pgfplotsset{{compat=1.18}}")?;
    writeln!(w, "\\begin{{document}}")?;
    writeln!(w, "\\begin{{tikzpicture}}")?;
    writeln!(
        w,
        "\\begin{{axis}}[xlabel={{{}}}, ylabel={{{}}}, legend pos=outer north east, grid=both]",
        tex_escape(x_label),
        tex_escape(y_label)
    )?;
    for c in curves {
        let [r, g, b, _] = c.color.to_array();
        writeln!(
            w,
            "\\addplot[color={{rgb,255:red,{r};green,{g};blue,{b}}}, line width={:.2}pt] coordinates {{",
            c.width
        )?;
        for p in &c.points {
            writeln!(w, "  ({}, {})", p[0], p[1])?;
        }
        writeln!(w, "}};")?;
        writeln!(w, "\\addlegendentry{{{}}}", tex_escape(&c.label))?;
    }
    writeln!(w, "\\end{{axis}}")?;
    writeln!(w, "\\end{{tikzpicture}}")?;
    writeln!(w, "\\end{{document}}")?;
    Ok(())
}

fn tex_escape(s: &str) -> String {
    s.replace('\\', "\\textbackslash{}")
        .replace('_', "\\_")
        .replace('&', "\\&")
        .replace('%', "\\%")
        .replace('#', "\\#")
}

/// x-axis header/label for the current canvas mode.
pub fn x_label_for(canvas: &PlotCanvas) -> &'static str {
    use crate::canvas::AxisDomain;
    match canvas.mode().domain() {
        AxisDomain::Frequency => "freq_hz",
        AxisDomain::Time => "time_ns",
        AxisDomain::Smith => "re",
    }
}

/// Save a captured screenshot as PNG.
pub fn save_screenshot_png<P: AsRef<Path>>(
    path: P,
    shot: &egui::ColorImage,
) -> Result<(), ExportError> {
    let [w, h] = shot.size;
    let mut img = image::RgbaImage::new(w as u32, h as u32);
    for (i, px) in shot.pixels.iter().enumerate() {
        let x = (i % w) as u32;
        let y = (i / w) as u32;
        img.put_pixel(x, y, image::Rgba(px.to_array()));
    }
    img.save(path.as_ref())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace_map::{NetworkId, TraceId};
    use egui::Color32;

    fn curve(label: &str, pts: &[[f64; 2]]) -> Curve {
        Curve {
            id: TraceId::new(NetworkId(0), 0, 0),
            label: label.to_string(),
            points: pts.to_vec(),
            width: 1.5,
            color: Color32::from_rgb(31, 119, 180),
        }
    }

    #[test]
    fn csv_has_header_and_rows() {
        let curves = vec![
            curve("a.S11", &[[1.0, -3.0], [2.0, -6.0]]),
            curve("a.S21", &[[1.0, 0.0], [2.0, -1.0]]),
        ];
        let mut out = Vec::new();
        write_csv(&mut out, &curves, "frequency").unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "frequency,a.S11,a.S21");
        assert_eq!(lines[1], "1,-3,0");
        assert_eq!(lines[2], "2,-6,-1");
    }

    #[test]
    fn csv_rejects_mismatched_axes() {
        let curves = vec![
            curve("a", &[[1.0, 0.0], [2.0, 0.0]]),
            curve("b", &[[1.0, 0.0], [3.0, 0.0]]),
        ];
        let mut out = Vec::new();
        assert!(matches!(
            write_csv(&mut out, &curves, "f"),
            Err(ExportError::AxisMismatch)
        ));
    }

    #[test]
    fn empty_export_is_an_error() {
        let mut out = Vec::new();
        assert!(matches!(
            write_csv(&mut out, &[], "f"),
            Err(ExportError::NothingToExport)
        ));
        assert!(matches!(
            write_tikz(&mut out, &[], "f", "y"),
            Err(ExportError::NothingToExport)
        ));
    }

    #[test]
    fn tikz_contains_plot_and_legend() {
        let curves = vec![curve("dut_S21", &[[1.0, -3.0]])];
        let mut out = Vec::new();
        write_tikz(&mut out, &curves, "f [GHz]", "|S| [dB]").unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("\\begin{axis}"));
        assert!(text.contains("(1, -3)"));
        assert!(text.contains("\\addlegendentry{dut\\_S21}"));
    }

    #[test]
    fn commas_in_labels_are_sanitized() {
        let curves = vec![curve("a,b", &[[1.0, 0.0]])];
        let mut out = Vec::new();
        write_csv(&mut out, &curves, "f").unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("f,a;b"));
    }
}
