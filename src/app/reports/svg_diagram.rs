use crate::domain::model::CuttingDiagram;
use std::fmt;

const MARGIN_MM: f64 = 40.0;

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}

pub fn diagram_title(diagram: &CuttingDiagram) -> String {
    format!(
        "Cutting diagram - Sheet {}x{}mm",
        diagram.sheet_width, diagram.sheet_height
    )
}

/// SVG document for one sheet, one user unit per millimetre.
/// The diagram's origin is bottom-left, so y is flipped.
struct SvgDiagram<'a>(&'a CuttingDiagram);

impl fmt::Display for SvgDiagram<'_> {
    fn fmt(&self, svg: &mut fmt::Formatter<'_>) -> fmt::Result {
        let diagram = self.0;
        let width = diagram.sheet_width;
        let height = diagram.sheet_height;
        let font_size = (width.max(height) / 60.0).max(10.0);
        let title_height = font_size * 2.0;

        writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="{} {} {} {}" font-family="sans-serif">"#,
            -MARGIN_MM,
            -MARGIN_MM - title_height,
            width + 2.0 * MARGIN_MM,
            height + 2.0 * MARGIN_MM + title_height * 2.0
        )?;
        writeln!(
            svg,
            r#"  <text x="{}" y="{}" font-size="{}" text-anchor="middle">{}</text>"#,
            width / 2.0,
            -title_height / 2.0,
            font_size * 1.2,
            escape(&diagram_title(diagram))
        )?;
        writeln!(
            svg,
            r#"  <rect x="0" y="0" width="{}" height="{}" fill="lightgray" fill-opacity="0.3" stroke="black" stroke-width="2"/>"#,
            width, height
        )?;

        for piece in &diagram.pieces {
            let svg_y = height - piece.y - piece.height;
            writeln!(
                svg,
                r#"  <rect x="{}" y="{}" width="{}" height="{}" fill="{}" fill-opacity="0.8" stroke="black" stroke-width="1"><title>{} ({}x{}mm)</title></rect>"#,
                piece.x,
                svg_y,
                piece.width,
                piece.height,
                piece.color,
                escape(&piece.name),
                piece.width,
                piece.height
            )?;
            writeln!(
                svg,
                r#"  <text x="{}" y="{}" font-size="{}" text-anchor="middle" dominant-baseline="middle">{}</text>"#,
                piece.x + piece.width / 2.0,
                svg_y + piece.height / 2.0,
                font_size,
                escape(&piece.name)
            )?;
        }

        writeln!(
            svg,
            r#"  <text x="0" y="{}" font-size="{}">Utilization {:.1}% | Waste {:.1}% | Used area {:.3} m²</text>"#,
            height + title_height,
            font_size,
            diagram.utilization,
            diagram.waste,
            diagram.total_area_pieces
        )?;
        writeln!(svg, "</svg>")
    }
}

/// One SVG file per sheet.
pub fn render_svg(diagram: &CuttingDiagram) -> String {
    SvgDiagram(diagram).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{PlacedPiece, SheetSize};

    #[test]
    fn test_svg_flips_y_and_escapes_names() {
        let diagram = CuttingDiagram::new(
            SheetSize::new(1000.0, 500.0),
            vec![PlacedPiece {
                id: "P&D_1".into(),
                name: "Porta <esq>".into(),
                x: 0.0,
                y: 0.0,
                width: 400.0,
                height: 100.0,
                rotated: false,
                color: "hsl(0, 70%, 80%)".into(),
            }],
        );
        let svg = render_svg(&diagram);
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>\n"));
        assert!(svg.contains(r#"<rect x="0" y="400" width="400" height="100""#));
        assert!(svg.contains("Porta &lt;esq&gt;"));
        assert!(svg.contains("Cutting diagram - Sheet 1000x500mm"));
        assert!(svg.contains("Utilization 8.0%"));
    }
}
