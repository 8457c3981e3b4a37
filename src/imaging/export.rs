use crate::{carto::terminator::TerminatorCurve, cycle::Frame};
use geo::{Coordinate, LineString, Polygon};
use log::trace;
use std::{fs, io, path::Path};
use svg::node::element;
use thiserror::Error;
use tiff::{encoder::*, TiffError};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("could not write file")]
    Io(#[from] io::Error),
    #[error("could not encode tiff")]
    Tiff(#[from] TiffError),
    #[error("{samples} samples do not fill a {columns}x{rows} grid")]
    Shape {
        samples: usize,
        columns: usize,
        rows: usize,
    },
}

/* # night mask */

fn encode(alpha: f64, max_alpha: f64) -> u8 {
    //! scale a shade alpha onto the full u8 range, NaN maps to zero
    (alpha / max_alpha * 255.0).round().clamp(0.0, 255.0) as u8
}

/// write the sample grid as a grey tiff, white where the night is darkest
pub fn save_night_mask<P: AsRef<Path>>(frame: &Frame, path: P) -> Result<(), ExportError> {
    let (columns, rows) = (frame.grid.columns(), frame.grid.rows());
    if columns * rows != frame.samples.len() {
        return Err(ExportError::Shape {
            samples: frame.samples.len(),
            columns,
            rows,
        });
    }
    trace!("saving night mask to {}", path.as_ref().display());

    let max_alpha = frame.grid.shading.max_night_alpha;
    let pixels = frame
        .samples
        .iter()
        .map(|sample| encode(sample.shade_alpha, max_alpha))
        .collect::<Vec<u8>>();
    TiffEncoder::new(&mut fs::File::create(path)?)?.write_image::<colortype::Gray8>(
        columns as u32,
        rows as u32,
        &pixels,
    )?;
    Ok(())
}

/* # terminator to svg */

fn coord_to_svg(coord: &Coordinate<f64>) -> String {
    format!("{} {}", coord.x, coord.y)
}

fn ring_to_svg(line: &LineString<f64>) -> String {
    line.0
        .iter()
        .map(coord_to_svg)
        .collect::<Vec<String>>()
        .join("L")
}

fn poly_to_svg(poly: &Polygon<f64>) -> String {
    if poly.exterior().0.is_empty() {
        "".into()
    } else {
        format!("M{}Z", ring_to_svg(poly.exterior()))
    }
}

/// svg document with the terminator bell drawn over a map-sized viewbox
pub fn terminator_document(curve: &TerminatorCurve, width: f64, height: f64) -> svg::Document {
    let document = svg::Document::new().set("viewBox", (0.0, 0.0, width, height));
    match curve.outline() {
        Some(outline) => document.add(
            element::Path::new()
                .set("d", poly_to_svg(&outline))
                .set("fill", "none")
                .set("stroke", "#000033"),
        ),
        None => document,
    }
}

pub fn save_terminator_svg<P: AsRef<Path>>(frame: &Frame, path: P) -> Result<(), ExportError> {
    trace!("saving terminator to {}", path.as_ref().display());
    let canvas = frame.grid.canvas;
    svg::save(
        path,
        &terminator_document(&frame.curve, canvas.width, canvas.height),
    )?;
    Ok(())
}
