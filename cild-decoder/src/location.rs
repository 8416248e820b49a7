//! Source-location correlation.

use cild_ir::SourceLocation;

use crate::context::DebugLocationSource;

/// Line number the toolchain writes for compiler-generated code.
pub const HIDDEN_LINE: u32 = 0x00FE_EFEE;

/// Holds the most recent known location while a decode run advances.
pub struct LocationTracker<'a> {
    source: &'a mut dyn DebugLocationSource,
    current: Option<SourceLocation>,
}

impl<'a> LocationTracker<'a> {
    pub fn new(source: &'a mut dyn DebugLocationSource) -> Self {
        Self {
            source,
            current: None,
        }
    }

    /// Advance the source to `offset`. A newly reported location replaces
    /// the current one; otherwise the current one persists.
    pub fn correlate(&mut self, offset: u32) -> Option<&SourceLocation> {
        if let Some(location) = self.source.advance_to(offset) {
            self.current = Some(location);
        }
        self.current.as_ref()
    }

    pub fn current(&self) -> Option<&SourceLocation> {
        self.current.as_ref()
    }
}

/// A sequence point: IL offset mapped to a source range.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SequencePoint {
    pub offset: u32,
    pub location: SourceLocation,
}

impl SequencePoint {
    pub fn is_hidden(&self) -> bool {
        self.location.start_line == HIDDEN_LINE
    }
}

/// [`DebugLocationSource`] over a sequence-point table sorted by offset.
#[derive(Clone, Debug)]
pub struct SequencePointCursor<'a> {
    points: &'a [SequencePoint],
    next: usize,
}

impl<'a> SequencePointCursor<'a> {
    pub fn new(points: &'a [SequencePoint]) -> Self {
        Self { points, next: 0 }
    }
}

impl DebugLocationSource for SequencePointCursor<'_> {
    fn advance_to(&mut self, offset: u32) -> Option<SourceLocation> {
        let mut found = None;
        while let Some(point) = self.points.get(self.next) {
            if point.offset > offset {
                break;
            }
            if !point.is_hidden() {
                found = Some(point);
            }
            self.next += 1;
        }
        found.map(|point| point.location.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(offset: u32, line: u32) -> SequencePoint {
        SequencePoint {
            offset,
            location: SourceLocation::at("Program.cs", line, 9),
        }
    }

    #[test]
    fn reports_each_point_once() {
        let points = [point(0, 10), point(4, 11)];
        let mut cursor = SequencePointCursor::new(&points);
        assert_eq!(cursor.advance_to(0).map(|l| l.start_line), Some(10));
        assert_eq!(cursor.advance_to(2), None);
        assert_eq!(cursor.advance_to(5).map(|l| l.start_line), Some(11));
        assert_eq!(cursor.advance_to(9), None);
    }

    #[test]
    fn skips_hidden_points() {
        let points = [point(0, 10), point(2, HIDDEN_LINE), point(6, 12)];
        let mut cursor = SequencePointCursor::new(&points);
        assert_eq!(cursor.advance_to(0).map(|l| l.start_line), Some(10));
        assert_eq!(cursor.advance_to(3), None);
        assert_eq!(cursor.advance_to(6).map(|l| l.start_line), Some(12));
    }

    #[test]
    fn tracker_keeps_last_known() {
        let points = [point(1, 20)];
        let mut source = SequencePointCursor::new(&points);
        let mut tracker = LocationTracker::new(&mut source);
        assert_eq!(tracker.correlate(0), None);
        assert_eq!(tracker.correlate(1).map(|l| l.start_line), Some(20));
        assert_eq!(tracker.correlate(7).map(|l| l.start_line), Some(20));
    }
}
