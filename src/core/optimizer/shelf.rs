use super::Piece;
use crate::domain::model::{PlacedPiece, SheetSize};

#[derive(Debug)]
struct Shelf {
    y: f64,
    height: f64,
    next_x: f64,
}

#[derive(Debug, Default)]
struct ShelfSheet {
    shelves: Vec<Shelf>,
    pieces: Vec<PlacedPiece>,
}

impl ShelfSheet {
    /// Where the next shelf would start.
    fn next_y(&self, kerf: f64) -> f64 {
        self.shelves
            .last()
            .map_or(0.0, |top| top.y + top.height + kerf)
    }

    /// Only the top shelf may grow taller, and only while it stays on the sheet.
    fn fits_shelf(&self, index: usize, width: f64, height: f64, sheet: SheetSize) -> bool {
        let shelf = &self.shelves[index];
        if shelf.next_x + width > sheet.width {
            return false;
        }
        let is_top = index + 1 == self.shelves.len();
        height <= shelf.height || (is_top && shelf.y + height <= sheet.height)
    }

    fn fits_new_shelf(&self, width: f64, height: f64, sheet: SheetSize, kerf: f64) -> bool {
        width <= sheet.width && self.next_y(kerf) + height <= sheet.height
    }

    fn place_on_shelf(&mut self, index: usize, piece: &Piece, orientation: (f64, f64, bool), kerf: f64) {
        let (width, height, rotated) = orientation;
        let shelf = &mut self.shelves[index];
        self.pieces
            .push(piece.place(shelf.next_x, shelf.y, width, height, rotated));
        shelf.next_x += width + kerf;
        shelf.height = shelf.height.max(height);
    }

    fn open_shelf(&mut self, piece: &Piece, orientation: (f64, f64, bool), kerf: f64) {
        let y = self.next_y(kerf);
        self.shelves.push(Shelf {
            y,
            height: orientation.1,
            next_x: 0.0,
        });
        let index = self.shelves.len() - 1;
        self.place_on_shelf(index, piece, orientation, kerf);
    }
}

fn into_pieces(sheets: Vec<ShelfSheet>) -> Vec<Vec<PlacedPiece>> {
    sheets.into_iter().map(|s| s.pieces).collect()
}

/// First orientation accepted by `fits`.
fn first_fit(orientations: &[(f64, f64, bool)], fits: impl Fn(f64, f64) -> bool) -> Option<(f64, f64, bool)> {
    orientations.iter().copied().find(|&(w, h, _)| fits(w, h))
}

/// Pieces in input order. Only the current row of the current sheet is
/// considered; anything that does not fit closes it.
pub(super) fn next_fit(pieces: &[Piece], sheet: SheetSize, kerf: f64, allow_rotation: bool) -> Vec<Vec<PlacedPiece>> {
    let mut sheets: Vec<ShelfSheet> = Vec::new();

    for piece in pieces {
        let orientations = piece.orientations(allow_rotation);

        if let Some(current) = sheets.last_mut() {
            if let Some(top) = current.shelves.len().checked_sub(1) {
                let fit = first_fit(&orientations, |w, h| current.fits_shelf(top, w, h, sheet));
                if let Some(o) = fit {
                    current.place_on_shelf(top, piece, o, kerf);
                    continue;
                }
            }
            let fit = first_fit(&orientations, |w, h| current.fits_new_shelf(w, h, sheet, kerf));
            if let Some(o) = fit {
                current.open_shelf(piece, o, kerf);
                continue;
            }
        }

        let mut fresh = ShelfSheet::default();
        let fit = first_fit(&orientations, |w, h| fresh.fits_new_shelf(w, h, sheet, kerf));
        if let Some(o) = fit {
            fresh.open_shelf(piece, o, kerf);
            sheets.push(fresh);
        }
    }

    into_pieces(sheets)
}

/// Row, on any open sheet, that a `width` x `height` piece leaves the least width in.
fn tightest_row(sheets: &[ShelfSheet], width: f64, height: f64, sheet: SheetSize) -> Option<(usize, usize)> {
    // (sheet, shelf, leftover width)
    let mut best: Option<(usize, usize, f64)> = None;
    for (sheet_index, candidate) in sheets.iter().enumerate() {
        for (shelf_index, shelf) in candidate.shelves.iter().enumerate() {
            if !candidate.fits_shelf(shelf_index, width, height, sheet) {
                continue;
            }
            let leftover = sheet.width - shelf.next_x - width;
            if best.is_none_or(|(_, _, current)| leftover < current) {
                best = Some((sheet_index, shelf_index, leftover));
            }
        }
    }
    best.map(|(sheet_index, shelf_index, _)| (sheet_index, shelf_index))
}

/// Each piece goes to the row, on any open sheet, that it leaves the least
/// width in. The rotated orientation is only tried when no row takes the
/// natural one. Callers sort pieces beforehand.
pub(super) fn best_fit(pieces: &[Piece], sheet: SheetSize, kerf: f64, allow_rotation: bool) -> Vec<Vec<PlacedPiece>> {
    let mut sheets: Vec<ShelfSheet> = Vec::new();

    for piece in pieces {
        let orientations = piece.orientations(allow_rotation);

        let row = orientations
            .iter()
            .find_map(|&o| tightest_row(&sheets, o.0, o.1, sheet).map(|row| (row, o)));
        if let Some(((sheet_index, shelf_index), o)) = row {
            sheets[sheet_index].place_on_shelf(shelf_index, piece, o, kerf);
            continue;
        }

        let opened = sheets.iter().enumerate().find_map(|(index, candidate)| {
            first_fit(&orientations, |w, h| candidate.fits_new_shelf(w, h, sheet, kerf))
                .map(|o| (index, o))
        });
        if let Some((index, o)) = opened {
            sheets[index].open_shelf(piece, o, kerf);
            continue;
        }

        let mut fresh = ShelfSheet::default();
        let fit = first_fit(&orientations, |w, h| fresh.fits_new_shelf(w, h, sheet, kerf));
        if let Some(o) = fit {
            fresh.open_shelf(piece, o, kerf);
            sheets.push(fresh);
        }
    }

    into_pieces(sheets)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn piece(name: &str, width: f64, height: f64) -> Piece {
        Piece {
            id: format!("{}_1", name),
            name: name.to_string(),
            width,
            height,
            color: "hsl(0, 70%, 80%)".to_string(),
        }
    }

    #[test]
    fn test_next_fit_opens_row_above() {
        let sheet = SheetSize::new(1000.0, 1000.0);
        let pieces = vec![piece("a", 600.0, 200.0), piece("b", 600.0, 300.0)];
        let sheets = next_fit(&pieces, sheet, 0.0, false);
        assert_eq!(sheets.len(), 1);
        assert_eq!((sheets[0][1].x, sheets[0][1].y), (0.0, 200.0));
    }

    #[test]
    fn test_next_fit_top_row_grows() {
        let sheet = SheetSize::new(1000.0, 1000.0);
        let pieces = vec![
            piece("short", 300.0, 100.0),
            piece("tall", 300.0, 400.0),
            piece("next", 600.0, 100.0),
        ];
        let sheets = next_fit(&pieces, sheet, 0.0, false);
        assert_eq!(sheets[0][1].y, 0.0);
        assert_eq!(sheets[0][2].y, 400.0);
    }

    #[test]
    fn test_best_fit_fills_tightest_row() {
        let sheet = SheetSize::new(1000.0, 1000.0);
        let pieces = vec![
            piece("wide", 800.0, 300.0),
            piece("medium", 500.0, 300.0),
            piece("filler", 200.0, 100.0),
        ];
        let sheets = best_fit(&pieces, sheet, 0.0, false);
        assert_eq!(sheets.len(), 1);
        let filler = sheets[0].iter().find(|p| p.name == "filler").unwrap();
        // the wide row has 200mm left, the medium row 500mm
        assert_eq!((filler.x, filler.y), (800.0, 0.0));
    }

    #[test]
    fn test_lower_row_does_not_grow_into_upper_row() {
        let sheet = SheetSize::new(1000.0, 1000.0);
        let pieces = vec![
            piece("row1", 700.0, 100.0),
            piece("row2", 700.0, 100.0),
            piece("tall", 250.0, 300.0),
        ];
        let sheets = best_fit(&pieces, sheet, 0.0, false);
        let tall = sheets[0].iter().find(|p| p.name == "tall").unwrap();
        assert_eq!(tall.y, 100.0);
    }

    #[test]
    fn test_best_fit_keeps_natural_orientation_when_it_fits() {
        let sheet = SheetSize::new(1000.0, 1000.0);
        let pieces = vec![piece("base", 600.0, 500.0), piece("small", 200.0, 300.0)];
        let sheets = best_fit(&pieces, sheet, 3.0, true);
        let small = sheets[0].iter().find(|p| p.name == "small").unwrap();
        assert!(!small.rotated);
        assert_eq!((small.x, small.y), (603.0, 0.0));
        assert_eq!((small.width, small.height), (200.0, 300.0));
    }

    #[test]
    fn test_best_fit_rotates_when_only_rotation_fits() {
        let sheet = SheetSize::new(1000.0, 1000.0);
        let pieces = vec![piece("base", 700.0, 400.0), piece("strip", 400.0, 250.0)];
        let sheets = best_fit(&pieces, sheet, 0.0, true);
        assert_eq!(sheets.len(), 1);
        let strip = sheets[0].iter().find(|p| p.name == "strip").unwrap();
        assert!(strip.rotated);
        assert_eq!((strip.x, strip.y), (700.0, 0.0));
    }
}
