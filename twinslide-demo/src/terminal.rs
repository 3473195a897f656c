//! A character-cell [`RenderTarget`] that draws the slider as text.
//!
//! One pixel is one column. The track occupies the first row and labels the
//! second.

use slotmap::{SlotMap, new_key_type};
use twinslide::{
    ElementRole, Knob, Px, PxSize, RenderTarget, Style, Visibility,
    render::{Position, class_names},
};

new_key_type! {
    /// Handle to a cell of a [`TerminalTarget`].
    pub struct CellKey;
}

#[derive(Debug, Clone, Default)]
struct Cell {
    role: Option<ElementRole>,
    left: Option<Px>,
    right: Option<Px>,
    width_percent: Option<f64>,
    class_name: String,
    text: String,
    visibility: Visibility,
}

/// Renders slider elements into rows of characters.
#[derive(Debug)]
pub struct TerminalTarget {
    cells: SlotMap<CellKey, Cell>,
    root: CellKey,
    width: i32,
    margin: i32,
}

impl TerminalTarget {
    /// A target `width` columns wide whose line leaves `margin` columns free
    /// on each side.
    pub fn new(width: i32, margin: i32) -> Self {
        let mut cells = SlotMap::with_key();
        let root = cells.insert(Cell::default());
        Self {
            cells,
            root,
            width: width.max(1),
            margin: margin.max(0),
        }
    }

    /// Changes the number of columns.
    pub fn set_width(&mut self, width: i32) {
        self.width = width.max(1);
    }

    /// Draws the track row and the label row.
    pub fn render(&self) -> String {
        let columns = usize::try_from(self.width).unwrap_or_default();
        let mut track = vec![' '; columns];
        let mut labels = vec![' '; columns];
        let focused = self.cells[self.root].class_name == class_names::ROOT_FOCUSED;

        // Paint order: line, fills, ticks, knobs.
        for pass in 0..4 {
            for (key, cell) in &self.cells {
                if cell.visibility != Visibility::Visible {
                    continue;
                }
                let glyph = match (pass, cell.role) {
                    (0, Some(ElementRole::Line)) => {
                        if cell.class_name == class_names::LINE_DISABLED {
                            '.'
                        } else {
                            '-'
                        }
                    }
                    (1, Some(ElementRole::Progress(_))) => '=',
                    (2, Some(ElementRole::Tick)) => '|',
                    (3, Some(ElementRole::Knob(knob))) => knob_glyph(knob, &cell.class_name),
                    _ => continue,
                };
                let left = self.absolute_left(key).raw();
                let width = self.offset_width(key).raw();
                paint(&mut track, left, width, |_| glyph);
            }
        }

        for (key, cell) in &self.cells {
            if cell.role != Some(ElementRole::Label) || cell.visibility != Visibility::Visible {
                continue;
            }
            let text: Vec<char> = cell.text.chars().collect();
            let left = self.absolute_left(key).raw();
            paint(&mut labels, left, self.offset_width(key).raw(), |i| text[i]);
        }

        let marker = if focused { '>' } else { ' ' };
        let track: String = track.into_iter().collect();
        let labels: String = labels.into_iter().collect();
        format!("{marker}{track}\n {}", labels.trim_end())
    }

    fn measured_width(&self, key: CellKey) -> Px {
        if key == self.root {
            return Px(self.width);
        }
        let cell = &self.cells[key];
        if cell.visibility == Visibility::Collapsed {
            return Px::ZERO;
        }
        match cell.role {
            Some(ElementRole::Line) => Px(self.width - 2 * self.margin).non_negative(),
            Some(ElementRole::Knob(_) | ElementRole::Tick) => Px(1),
            Some(ElementRole::Label) => {
                Px(i32::try_from(cell.text.chars().count()).unwrap_or(i32::MAX))
            }
            Some(ElementRole::Progress(_)) => {
                let percent = cell.width_percent.unwrap_or(0.0);
                Px::saturating_from_f64(f64::from(self.width) * percent / 100.0)
            }
            None => Px::ZERO,
        }
    }
}

fn knob_glyph(knob: Knob, class_name: &str) -> char {
    let inactive = class_name.ends_with("-inactive");
    match (knob, inactive) {
        (Knob::Low, false) => '[',
        (Knob::Low, true) => '(',
        (Knob::High, false) => ']',
        (Knob::High, true) => ')',
    }
}

fn paint(row: &mut [char], left: i32, width: i32, glyph: impl Fn(usize) -> char) {
    for offset in 0..width.max(0) {
        let Ok(column) = usize::try_from(left + offset) else {
            continue;
        };
        if let Some(slot) = row.get_mut(column) {
            *slot = glyph(offset as usize);
        }
    }
}

impl RenderTarget for TerminalTarget {
    type Element = CellKey;

    fn root(&self) -> CellKey {
        self.root
    }

    fn is_attached(&self) -> bool {
        true
    }

    fn create_element(&mut self, role: ElementRole) -> CellKey {
        self.cells.insert(Cell {
            role: Some(role),
            ..Cell::default()
        })
    }

    fn append_child(&mut self, _parent: CellKey, _child: CellKey) {}

    fn set_style(&mut self, element: CellKey, style: Style) {
        let cell = &mut self.cells[element];
        match style {
            Style::Position(Position::Relative | Position::Absolute) => {}
            Style::Left(left) => cell.left = Some(left),
            Style::Right(right) => cell.right = Some(right),
            Style::WidthPercent(percent) => cell.width_percent = Some(percent),
        }
    }

    fn set_class_name(&mut self, element: CellKey, class_name: &str) {
        class_name.clone_into(&mut self.cells[element].class_name);
    }

    fn set_visibility(&mut self, element: CellKey, visibility: Visibility) {
        self.cells[element].visibility = visibility;
    }

    fn set_text(&mut self, element: CellKey, text: &str) {
        text.clone_into(&mut self.cells[element].text);
    }

    fn offset_width(&self, element: CellKey) -> Px {
        self.measured_width(element)
    }

    fn absolute_left(&self, element: CellKey) -> Px {
        if element == self.root {
            return Px::ZERO;
        }
        let cell = &self.cells[element];
        match (cell.left, cell.right) {
            (Some(left), _) => left,
            (None, Some(right)) => Px(self.width) - right - self.measured_width(element),
            (None, None) => Px::ZERO,
        }
    }

    fn client_size(&self) -> PxSize {
        PxSize::new(Px(self.width), Px(2))
    }
}
