//! Case colors.

use indexmap::IndexMap;

/// Fixed palette handed out to case names in order of first appearance.
pub const PALETTE: [&str; 20] = [
    "#007bff", // blue
    "#fd7e14", // orange
    "#28a745", // green
    "#dc3545", // red
    "#6f42c1", // purple
    "#17a2b8", // cyan
    "#ffc107", // yellow
    "#e83e8c", // pink
    "#20c997", // teal
    "#6610f2", // indigo
    "#795548", // brown
    "#198754", // dark green
    "#0dcaf0", // light cyan
    "#d63384", // dark pink
    "#6c757d", // gray
    "#0d6efd", // bright blue
    "#ff5722", // deep orange
    "#9c27b0", // violet
    "#00bcd4", // sky blue
    "#ff9800", // amber
];

/// Case name -> color, in the order the names were first seen.
///
/// Built fresh for every parse and never shared, so the same case can get a
/// different color after the text is reordered.
#[derive(Debug, Default)]
pub struct CaseColors {
    assigned: IndexMap<String, &'static str>,
}

impl CaseColors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Color for `case_name`, claiming the next palette slot on first sight.
    /// Wraps around after 20 distinct names.
    pub fn color_for(&mut self, case_name: &str) -> &'static str {
        if let Some(color) = self.assigned.get(case_name) {
            return color;
        }
        let color = PALETTE[self.assigned.len() % PALETTE.len()];
        self.assigned.insert(case_name.to_string(), color);
        color
    }

    pub fn len(&self) -> usize {
        self.assigned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assigned.is_empty()
    }

    /// Assigned pairs in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &'static str)> {
        self.assigned.iter().map(|(name, color)| (name.as_str(), *color))
    }
}
