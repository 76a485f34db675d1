/// Options controlling markup generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    align: bool,
}

impl RenderOptions {
    /// Creates render options.
    ///
    /// # Arguments
    ///
    /// * `align` - Pad every column to the display width of its widest cell.
    pub fn new(align: bool) -> Self {
        Self { align }
    }

    /// Returns whether columns are padded to a common width.
    pub fn align(&self) -> bool {
        self.align
    }

    /// Returns a copy with column alignment switched on or off.
    pub fn with_align(mut self, align: bool) -> Self {
        self.align = align;
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { align: true }
    }
}
