/// Discrete responsive breakpoint bucket derived from host viewport width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewportClass {
    Narrow,
    Medium,
    Wide,
}

impl ViewportClass {
    pub fn from_width(width: u32) -> Self {
        if width >= 1024 {
            ViewportClass::Wide
        } else if width >= 768 {
            ViewportClass::Medium
        } else {
            ViewportClass::Narrow
        }
    }

    pub fn columns(&self) -> usize {
        match self {
            ViewportClass::Narrow => 1,
            ViewportClass::Medium => 2,
            ViewportClass::Wide => 3,
        }
    }
}

/// Progressive-reveal window over the deduplicated review sequence.
///
/// `visible` grows monotonically between batches (two rows at a time) and
/// resets exactly when a new successful batch is applied. A pure resize
/// never shrinks it; crossing a column boundary only changes the step for
/// future grows and raises the floor to two full rows.
#[derive(Debug, Clone)]
pub struct Pagination {
    class: ViewportClass,
    visible: usize,
    total: usize,
}

impl Pagination {
    pub fn new(width: u32, total: usize) -> Self {
        let class = ViewportClass::from_width(width);
        Self {
            class,
            visible: class.columns() * 2,
            total,
        }
    }

    pub fn visible_count(&self) -> usize {
        self.visible
    }

    pub fn viewport_class(&self) -> ViewportClass {
        self.class
    }

    pub fn has_more(&self) -> bool {
        self.visible < self.total
    }

    /// Reveal two more rows. No-op once everything is visible; the control
    /// is not offered at that point anyway.
    pub fn load_more(&mut self) {
        if self.has_more() {
            self.visible += self.class.columns() * 2;
        }
    }

    /// New successful batch: pagination resets to two full rows.
    pub fn reset_for_batch(&mut self, total: usize) {
        self.total = total;
        self.visible = self.class.columns() * 2;
    }

    /// Viewport width changed. Returns true when the column class changed,
    /// which is the signal the embed layer needs to re-render.
    pub fn handle_resize(&mut self, width: u32) -> bool {
        let class = ViewportClass::from_width(width);
        if class == self.class {
            return false;
        }
        self.class = class;
        self.visible = self.visible.max(class.columns() * 2);
        true
    }

    /// The slice of items currently revealed.
    pub fn window<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        &items[..self.visible.min(items.len())]
    }
}
