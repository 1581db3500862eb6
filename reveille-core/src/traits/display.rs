//! Display sink trait
//!
//! The display is a 16x2 character module. The core only pushes content;
//! it never reads back what is on screen. Implementations are expected to
//! deduplicate identical frames and truncate over-long lines.

/// Trait for pushing text frames to the display
pub trait DisplaySink {
    /// Replace both lines of the display
    fn render(&mut self, line1: &str, line2: &str);

    /// Blank the display
    fn clear(&mut self);
}
