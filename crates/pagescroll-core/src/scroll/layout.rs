//! Page extents measured against the scroll container

use super::host::HostAdapter;

/// Vertical extent of one page relative to the container's scrollable origin.
///
/// `bottom == top + height` always holds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageExtent {
    pub top: f64,
    pub bottom: f64,
    pub height: f64,
}

impl PageExtent {
    pub fn new(top: f64, height: f64) -> Self {
        Self {
            top,
            bottom: top + height,
            height,
        }
    }

    /// Whether `y` lies in `[top, bottom)`
    #[inline]
    pub fn contains(&self, y: f64) -> bool {
        y >= self.top && y < self.bottom
    }
}

/// Extents of every page, in page order, plus the tallest page height
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutSnapshot {
    pub extents: Vec<PageExtent>,
    pub max_page_height: f64,
}

impl LayoutSnapshot {
    /// Measure `pages` through the host
    pub fn probe<H: HostAdapter + ?Sized>(host: &H, pages: &[H::Page]) -> Self {
        let origin = host.content_top();
        let mut max_page_height: f64 = 0.0;

        let extents = pages
            .iter()
            .map(|page| {
                let top = (host.page_top(page) - origin).round();
                let height = host.page_height(page).round();
                max_page_height = max_page_height.max(height);
                PageExtent::new(top, height)
            })
            .collect();

        Self {
            extents,
            max_page_height,
        }
    }

    /// Same page count and the same top and height for every page
    pub fn same_extents(&self, other: &LayoutSnapshot) -> bool {
        self.extents.len() == other.extents.len()
            && self
                .extents
                .iter()
                .zip(&other.extents)
                .all(|(a, b)| a.top == b.top && a.height == b.height)
    }

    /// First page owning the probe position.
    ///
    /// Both page edges are shifted up by one pixel to absorb fractional
    /// scroll positions: a page owns `(top - 1, bottom - 1]`.
    pub fn index_at(&self, probe: f64) -> Option<usize> {
        self.extents
            .iter()
            .position(|extent| probe > extent.top - 1.0 && probe <= extent.bottom - 1.0)
    }

    pub fn get(&self, index: usize) -> Option<&PageExtent> {
        self.extents.get(index)
    }

    pub fn len(&self) -> usize {
        self.extents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(heights: &[f64]) -> LayoutSnapshot {
        let mut top = 0.0;
        let mut max_page_height: f64 = 0.0;
        let extents = heights
            .iter()
            .map(|&h| {
                let extent = PageExtent::new(top, h);
                top += h;
                max_page_height = max_page_height.max(h);
                extent
            })
            .collect();
        LayoutSnapshot {
            extents,
            max_page_height,
        }
    }

    #[test]
    fn test_extent_bottom() {
        let extent = PageExtent::new(100.0, 200.0);
        assert_eq!(extent.bottom, 300.0);
        assert!(extent.contains(100.0));
        assert!(!extent.contains(300.0));
    }

    #[test]
    fn test_index_boundaries_are_one_pixel_tolerant() {
        // page 1 spans 100..300
        let layout = snapshot(&[100.0, 200.0, 100.0]);
        assert_eq!(layout.index_at(99.0), Some(0));
        assert_eq!(layout.index_at(100.0), Some(1));
        assert_eq!(layout.index_at(299.0), Some(1));
        assert_eq!(layout.index_at(300.0), Some(2));
    }

    #[test]
    fn test_index_outside_pages() {
        let layout = snapshot(&[100.0, 200.0]);
        assert_eq!(layout.index_at(-5.0), None);
        assert_eq!(layout.index_at(299.5), None);
        assert_eq!(LayoutSnapshot::default().index_at(0.0), None);
    }

    #[test]
    fn test_same_extents() {
        let a = snapshot(&[500.0, 300.0]);
        let b = snapshot(&[500.0, 300.0]);
        let c = snapshot(&[500.0, 301.0]);
        assert!(a.same_extents(&b));
        assert!(!a.same_extents(&c));
        assert!(!a.same_extents(&snapshot(&[500.0])));
        assert_eq!(a.max_page_height, 500.0);
    }
}
