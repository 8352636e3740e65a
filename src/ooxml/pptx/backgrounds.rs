//! Solid and gradient fills for slide backgrounds and shapes.
use std::fmt::Write as FmtWrite;

use crate::ooxml::error::{OoxmlError, Result};
use crate::theme::Rgb;

/// A gradient stop (position and color).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    /// Position from 0.0 to 1.0
    pub position: f64,
    pub color: Rgb,
}

impl GradientStop {
    pub fn new(position: f64, color: Rgb) -> Self {
        Self { position, color }
    }
}

/// A DrawingML fill.
#[derive(Debug, Clone, PartialEq)]
pub enum Fill {
    Solid(Rgb),
    /// Linear gradient; `angle` in degrees, clockwise from left-to-right.
    LinearGradient { angle: f64, stops: Vec<GradientStop> },
}

impl Fill {
    /// Two-stop linear gradient from `start` to `end`.
    pub fn linear(angle: f64, start: Rgb, end: Rgb) -> Self {
        Fill::LinearGradient {
            angle,
            stops: vec![GradientStop::new(0.0, start), GradientStop::new(1.0, end)],
        }
    }

    /// Append the `<a:solidFill>`/`<a:gradFill>` element.
    pub(crate) fn write_xml(&self, xml: &mut String) -> Result<()> {
        match self {
            Fill::Solid(color) => {
                write!(xml, r#"<a:solidFill><a:srgbClr val="{color}"/></a:solidFill>"#)
                    .map_err(|e| OoxmlError::Xml(e.to_string()))?;
            },
            Fill::LinearGradient { angle, stops } => {
                xml.push_str(r#"<a:gradFill rotWithShape="1">"#);
                xml.push_str("<a:gsLst>");
                for stop in stops {
                    let pos = (stop.position.clamp(0.0, 1.0) * 100_000.0).round() as i32;
                    write!(xml, r#"<a:gs pos="{}"><a:srgbClr val="{}"/></a:gs>"#, pos, stop.color)
                        .map_err(|e| OoxmlError::Xml(e.to_string()))?;
                }
                xml.push_str("</a:gsLst>");
                // DrawingML angles are in 60000ths of a degree.
                let ang = (angle.rem_euclid(360.0) * 60_000.0).round() as i64;
                write!(xml, r#"<a:lin ang="{ang}" scaled="0"/>"#)
                    .map_err(|e| OoxmlError::Xml(e.to_string()))?;
                xml.push_str("</a:gradFill>");
            },
        }
        Ok(())
    }
}

/// Slide background configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SlideBackground {
    fill: Fill,
}

impl SlideBackground {
    pub fn new(fill: Fill) -> Self {
        Self { fill }
    }

    /// A two-stop linear gradient background.
    pub fn linear_gradient(angle: f64, start: Rgb, end: Rgb) -> Self {
        Self::new(Fill::linear(angle, start, end))
    }

    #[inline]
    pub fn fill(&self) -> &Fill {
        &self.fill
    }

    /// Generate the `<p:bg>` element. It must precede `<p:spTree>`.
    pub(crate) fn to_xml(&self) -> Result<String> {
        let mut xml = String::with_capacity(256);
        xml.push_str("<p:bg>");
        xml.push_str("<p:bgPr>");
        self.fill.write_xml(&mut xml)?;
        xml.push_str("<a:effectLst/>");
        xml.push_str("</p:bgPr>");
        xml.push_str("</p:bg>");
        Ok(xml)
    }
}
