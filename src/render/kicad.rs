//! KiCad PCB output for a normalized sky
//!
//! The [-1, 1] frame is mapped onto a square board of `size_mm`, y flipped
//! because board coordinates grow downwards:
//! - boundary -> Edge.Cuts outline
//! - stars -> pads (through-hole when big enough to drill, SMD otherwise),
//!   named stars get a label and ring on the back silkscreen
//! - grid -> front silkscreen lines
//! - constellations -> copper segments with a matching mask opening

use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::domain::Star;
use crate::geometry::{LinearMap, MultiPolyline, Point, Polyline};
use crate::sky::Sky;

/// Smallest and largest star pad diameter in mm
const PAD_MIN_MM: f64 = 0.8;
const PAD_MAX_MM: f64 = 4.0;
/// Pads at least this wide get drilled
const DRILL_THRESHOLD_MM: f64 = 1.5;
const DRILL_RATIO: f64 = 0.5;

const CONSTELLATION_WIDTH_MM: f64 = 0.5;
const TARGET_CONSTELLATION_WIDTH_MM: f64 = 1.0;
const LABEL_SIZE_MM: f64 = 2.0;
const LABEL_OFFSET_MM: f64 = 2.5;

const HEADER: &str = r#"(kicad_pcb (version 4) (host pcbnew 4.0.7)

(general
(links 0)
(no_connects 0)
(area 0 0 0 0)
(thickness 1.6)
(drawings 0)
(tracks 0)
(zones 0)
(modules 0)
(nets 1)
)

(page A3)
"#;

const LAYERS: &str = r#"
(layers
(0 F.Cu signal)
(31 B.Cu signal)
(36 B.SilkS user)
(37 F.SilkS user)
(38 B.Mask user)
(39 F.Mask user)
(44 Edge.Cuts user)
(49 F.Fab user)
)

(net 0 "")
"#;

/// Board layout settings
#[derive(Debug, Clone)]
pub struct BoardConfig {
    /// Side of the square drawing area in mm
    pub size_mm: f64,
    /// Offset of the drawing area from the page origin in mm
    pub margin_mm: f64,
    pub title: String,
    /// Constellation drawn with wider lines
    pub target_constellation: Option<String>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            size_mm: 300.0,
            margin_mm: 20.0,
            title: "starwhack".to_string(),
            target_constellation: None,
        }
    }
}

/// Maps the normalized frame onto board millimetres
struct BoardFrame {
    x: LinearMap,
    y: LinearMap,
}

impl BoardFrame {
    fn new(config: &BoardConfig) -> Result<Self> {
        let near = config.margin_mm;
        let far = config.margin_mm + config.size_mm;
        Ok(Self {
            x: LinearMap::new((-1.0, 1.0), (near, far))?,
            y: LinearMap::new((-1.0, 1.0), (far, near))?,
        })
    }

    fn map(&self, p: Point) -> (f64, f64) {
        (self.x.apply(p.x), self.y.apply(p.y))
    }
}

/// Pad diameter and drill for a star, brighter stars get bigger pads
fn star_pad(star: &Star, scale: Option<&LinearMap>) -> (f64, f64) {
    let size = scale.map_or((PAD_MIN_MM + PAD_MAX_MM) / 2.0, |s| {
        s.apply(star.attributes.magnitude)
    });
    let drill = if size >= DRILL_THRESHOLD_MM {
        size * DRILL_RATIO
    } else {
        0.0
    };
    (size, drill)
}

/// Magnitude -> pad size map, None when every star is equally bright
fn magnitude_scale(stars: &[Star]) -> Option<LinearMap> {
    let mags = stars.iter().map(|s| s.attributes.magnitude);
    let faintest = mags.clone().fold(f64::MIN, f64::max);
    let brightest = mags.fold(f64::MAX, f64::min);
    LinearMap::new((faintest, brightest), (PAD_MIN_MM, PAD_MAX_MM)).ok()
}

fn quoted(text: &str) -> String {
    text.replace('"', "'")
}

fn open_module(out: &mut String, name: &str, stamp: u32) -> std::fmt::Result {
    writeln!(out, "\n(module {name} (layer F.Cu) (tedit {stamp:08X}) (tstamp {stamp:08X})")?;
    writeln!(out, "(at 0 0)")?;
    writeln!(
        out,
        "(fp_text reference ftprnt_{name} (at 3 2) (layer F.SilkS) hide\n(effects (font (size 1 1) (thickness 0.15)))\n)"
    )?;
    writeln!(
        out,
        "(fp_text value ftprnt_{name} (at 3 -2) (layer F.Fab)\n(effects (font (size 1 1) (thickness 0.15) italic))\n)"
    )
}

fn write_boundary(out: &mut String, frame: &BoardFrame, boundary: &Polyline) -> std::fmt::Result {
    for (a, b) in boundary.segments() {
        let ((x1, y1), (x2, y2)) = (frame.map(a), frame.map(b));
        writeln!(
            out,
            "(gr_line (start {x1:.4} {y1:.4}) (end {x2:.4} {y2:.4}) (angle 90) (layer Edge.Cuts) (width 0.15))"
        )?;
    }
    Ok(())
}

fn write_stars(out: &mut String, frame: &BoardFrame, stars: &[Star]) -> std::fmt::Result {
    let scale = magnitude_scale(stars);

    for (index, star) in stars.iter().enumerate() {
        let (x, y) = frame.map(star.position);
        let (size, drill) = star_pad(star, scale.as_ref());
        let pad = index + 1;

        if drill > 0.0 {
            writeln!(
                out,
                "(pad {pad} thru_hole circle (at {x:.4} {y:.4}) (size {size:.3} {size:.3}) (drill {drill:.3}) (layers *.Cu *.Mask)\n(solder_mask_margin 0.05))"
            )?;
        } else {
            writeln!(
                out,
                "(pad {pad} smd circle (at {x:.4} {y:.4}) (size {size:.3} {size:.3}) (layers F.Cu F.Mask) (solder_mask_margin 0.02))"
            )?;
        }

        if star.attributes.has_designation() {
            let name = quoted(&star.attributes.designation);
            let label_x = x + LABEL_OFFSET_MM;
            writeln!(
                out,
                "(fp_text user \"{name}\" (at {label_x:.4} {y:.4}) (layer B.SilkS)\n(effects (font (size {LABEL_SIZE_MM} {LABEL_SIZE_MM}) (thickness 0.15)) (justify mirror))\n)"
            )?;
            let ring_y = y + size / 2.0 + 0.5;
            writeln!(
                out,
                "(fp_circle (center {x:.4} {y:.4}) (end {x:.4} {ring_y:.4}) (layer B.SilkS) (width 0.2))"
            )?;
        }
    }
    Ok(())
}

fn write_grid(out: &mut String, frame: &BoardFrame, grid: &MultiPolyline) -> std::fmt::Result {
    for line in grid.polylines() {
        for (a, b) in line.segments() {
            let ((x1, y1), (x2, y2)) = (frame.map(a), frame.map(b));
            writeln!(
                out,
                "(fp_line (start {x1:.4} {y1:.4}) (end {x2:.4} {y2:.4}) (layer F.SilkS) (width 0.15))"
            )?;
        }
    }
    Ok(())
}

fn write_constellation(
    out: &mut String,
    frame: &BoardFrame,
    constellation: &MultiPolyline,
    target: Option<&str>,
) -> std::fmt::Result {
    let is_target = match (constellation.name(), target) {
        (Some(name), Some(target)) => name.eq_ignore_ascii_case(target),
        _ => false,
    };
    let width = if is_target {
        TARGET_CONSTELLATION_WIDTH_MM
    } else {
        CONSTELLATION_WIDTH_MM
    };

    for line in constellation.polylines() {
        for (a, b) in line.segments() {
            let ((x1, y1), (x2, y2)) = (frame.map(a), frame.map(b));
            writeln!(
                out,
                "(segment (start {x1:.4} {y1:.4}) (end {x2:.4} {y2:.4}) (width {width}) (layer F.Cu) (net 0))"
            )?;
            writeln!(
                out,
                "(gr_line (start {x1:.4} {y1:.4}) (end {x2:.4} {y2:.4}) (angle 90) (layer F.Mask) (width {width}))"
            )?;
        }
    }
    Ok(())
}

/// Render a normalized sky as KiCad PCB text
pub fn render_board(sky: &Sky, config: &BoardConfig) -> Result<String> {
    let frame = BoardFrame::new(config)?;
    let mut out = String::new();

    out.push_str(HEADER);
    writeln!(out, "(title_block\n(title \"{}\")\n)", quoted(&config.title))?;
    out.push_str(LAYERS);

    if let Some(boundary) = sky.boundary() {
        write_boundary(&mut out, &frame, boundary)?;
    }

    if let Some(stars) = sky.stars() {
        open_module(&mut out, "STARS", 0x5354_4152)?;
        write_stars(&mut out, &frame, stars)?;
        out.push_str(")\n");
    }

    if let Some(grid) = sky.grid() {
        open_module(&mut out, "RADEC", 0x5241_4445)?;
        write_grid(&mut out, &frame, grid)?;
        out.push_str(")\n");
    }

    for constellation in sky.constellations().unwrap_or_default() {
        write_constellation(
            &mut out,
            &frame,
            constellation,
            config.target_constellation.as_deref(),
        )?;
    }

    out.push_str(")\n");
    Ok(out)
}

/// Write a normalized sky to a `.kicad_pcb` file
pub fn write_board(path: &Path, sky: &Sky, config: &BoardConfig) -> Result<()> {
    let contents = render_board(sky, config)?;

    let file = File::create(path)
        .with_context(|| format!("Failed to create board file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    writer.write_all(contents.as_bytes())?;
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn normalized_sky() -> Sky {
        let mut bright = Star::at("1", -0.5, 0.5, -1.0);
        bright.attributes.designation = "Sirius".to_string();

        Sky::new()
            .with_stars(vec![bright, Star::at("2", 0.5, -0.5, 6.0)])
            .with_boundary(Polyline::from_coords(&[
                (-1.0, -1.0),
                (-1.0, 1.0),
                (1.0, 1.0),
                (1.0, -1.0),
                (-1.0, -1.0),
            ]))
            .with_constellations(vec![MultiPolyline::named(
                "CMa",
                vec![Polyline::from_coords(&[(-0.5, 0.5), (0.0, 0.0)])],
            )])
    }

    #[test]
    fn test_render_board_sections() {
        let config = BoardConfig {
            size_mm: 100.0,
            margin_mm: 10.0,
            title: "Canis \"Major\"".to_string(),
            target_constellation: Some("cma".to_string()),
        };
        let text = render_board(&normalized_sky(), &config).unwrap();

        assert!(text.starts_with("(kicad_pcb"));
        assert!(text.trim_end().ends_with(')'));
        assert!(text.contains("(title \"Canis 'Major'\")"));
        assert_eq!(text.matches("(layer Edge.Cuts)").count(), 4);
        // Corner (-1, 1) maps to the top left of the board
        assert!(text.contains("(start 10.0000 10.0000)"));
        assert!(text.contains("thru_hole"));
        assert!(text.contains("smd circle"));
        assert!(text.contains("\"Sirius\""));
        assert!(text.contains("(width 1) (layer F.Cu)"));
        assert!(!text.contains("RADEC"));
    }

    #[test]
    fn test_star_pad_sizes() {
        let stars = vec![Star::at("a", 0.0, 0.0, -1.0), Star::at("b", 0.0, 0.0, 6.0)];
        let scale = magnitude_scale(&stars);

        let (bright, drill) = star_pad(&stars[0], scale.as_ref());
        assert!((bright - PAD_MAX_MM).abs() < 1e-9);
        assert!(drill > 0.0);

        let (faint, drill) = star_pad(&stars[1], scale.as_ref());
        assert!((faint - PAD_MIN_MM).abs() < 1e-9);
        assert_eq!(drill, 0.0);

        assert!(magnitude_scale(&stars[..1]).is_none());
    }

    #[test]
    fn test_write_board() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sky.kicad_pcb");

        write_board(&path, &normalized_sky(), &BoardConfig::default()).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("(module STARS"));
    }
}
