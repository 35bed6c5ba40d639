use super::Piece;
use crate::domain::model::{PlacedPiece, SheetSize};

#[derive(Debug, Clone, Copy, PartialEq)]
struct FreeRect {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

impl FreeRect {
    fn area(&self) -> f64 {
        self.width * self.height
    }

    fn fits(&self, width: f64, height: f64) -> bool {
        width <= self.width && height <= self.height
    }
}

#[derive(Debug)]
struct GuillotineSheet {
    free: Vec<FreeRect>,
    pieces: Vec<PlacedPiece>,
}

impl GuillotineSheet {
    fn new(sheet: SheetSize) -> Self {
        Self {
            free: vec![FreeRect {
                x: 0.0,
                y: 0.0,
                width: sheet.width,
                height: sheet.height,
            }],
            pieces: Vec::new(),
        }
    }

    /// Places the piece in the bottom-left corner of `free[index]` and cuts the
    /// rest of that rectangle in two along the shorter leftover axis.
    fn place(&mut self, index: usize, piece: &Piece, orientation: (f64, f64, bool), kerf: f64) {
        let (width, height, rotated) = orientation;
        let rect = self.free.swap_remove(index);
        self.pieces
            .push(piece.place(rect.x, rect.y, width, height, rotated));

        let leftover_w = rect.width - width;
        let leftover_h = rect.height - height;
        let (right, above) = if leftover_w < leftover_h {
            // horizontal cut: the strip above spans the full width
            (
                FreeRect {
                    x: rect.x + width + kerf,
                    y: rect.y,
                    width: leftover_w - kerf,
                    height,
                },
                FreeRect {
                    x: rect.x,
                    y: rect.y + height + kerf,
                    width: rect.width,
                    height: leftover_h - kerf,
                },
            )
        } else {
            // vertical cut: the strip to the right spans the full height
            (
                FreeRect {
                    x: rect.x + width + kerf,
                    y: rect.y,
                    width: leftover_w - kerf,
                    height: rect.height,
                },
                FreeRect {
                    x: rect.x,
                    y: rect.y + height + kerf,
                    width,
                    height: leftover_h - kerf,
                },
            )
        };

        for candidate in [right, above] {
            if candidate.width > 0.0 && candidate.height > 0.0 {
                self.free.push(candidate);
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Choice {
    sheet: usize,
    rect: usize,
    orientation: (f64, f64, bool),
    leftover_area: f64,
    short_side: f64,
}

impl Choice {
    fn better_than(&self, other: &Choice) -> bool {
        (self.leftover_area, self.short_side) < (other.leftover_area, other.short_side)
    }
}

fn best_choice(sheets: &[GuillotineSheet], orientations: &[(f64, f64, bool)]) -> Option<Choice> {
    let mut best: Option<Choice> = None;
    for (sheet_index, sheet) in sheets.iter().enumerate() {
        for (rect_index, rect) in sheet.free.iter().enumerate() {
            for &o in orientations {
                if !rect.fits(o.0, o.1) {
                    continue;
                }
                let choice = Choice {
                    sheet: sheet_index,
                    rect: rect_index,
                    orientation: o,
                    leftover_area: rect.area() - o.0 * o.1,
                    short_side: (rect.width - o.0).min(rect.height - o.1),
                };
                if best.is_none_or(|current| choice.better_than(&current)) {
                    best = Some(choice);
                }
            }
        }
    }
    best
}

/// Best-area-fit guillotine packing. Callers sort pieces beforehand and
/// drop pieces that cannot fit an empty sheet.
pub(super) fn pack(pieces: &[Piece], sheet: SheetSize, kerf: f64, allow_rotation: bool) -> Vec<Vec<PlacedPiece>> {
    let mut sheets: Vec<GuillotineSheet> = Vec::new();

    for piece in pieces {
        let orientations = piece.orientations(allow_rotation);

        if best_choice(&sheets, &orientations).is_none() {
            sheets.push(GuillotineSheet::new(sheet));
        }
        match best_choice(&sheets, &orientations) {
            Some(choice) => {
                sheets[choice.sheet].place(choice.rect, piece, choice.orientation, kerf)
            }
            None => {
                // an empty sheet always fits a pre-filtered piece
                tracing::warn!("Piece '{}' could not be placed", piece.name);
                sheets.pop();
            }
        }
    }

    sheets.into_iter().map(|s| s.pieces).collect()
}
