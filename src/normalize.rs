use crate::layout::Point;

/// Rescales positions into the unit square with the origin in the top left
/// corner.
///
/// x is mapped to `(x - xmin) / xrange` and y to `1 - (y - ymin) / yrange`.
/// An axis without spread uses a range of 1, so all nodes end up at the same
/// value instead of failing. Results are clamped to `[0, 1]`.
pub fn normalize(points: &[Point]) -> Vec<Point> {
    if points.is_empty() {
        return Vec::new();
    }
    let (mut xmin, mut xmax) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut ymin, mut ymax) = (f64::INFINITY, f64::NEG_INFINITY);
    for p in points {
        xmin = xmin.min(p.x);
        xmax = xmax.max(p.x);
        ymin = ymin.min(p.y);
        ymax = ymax.max(p.y);
    }
    let xrange = range_or_one(xmax - xmin);
    let yrange = range_or_one(ymax - ymin);

    points
        .iter()
        .map(|p| {
            let x = (p.x - xmin) / xrange;
            let y = 1.0 - (p.y - ymin) / yrange;
            Point::new(x.clamp(0.0, 1.0), y.clamp(0.0, 1.0))
        })
        .collect()
}

fn range_or_one(range: f64) -> f64 {
    if range == 0.0 {
        1.0
    } else {
        range
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_triangle() {
        let points = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(0.0, 10.0),
        ];
        let normalized = normalize(&points);
        let xs: Vec<_> = normalized.iter().map(|p| p.x).collect();
        let ys: Vec<_> = normalized.iter().map(|p| p.y).collect();
        assert_eq!(xs, vec![0.0, 1.0, 0.0]);
        assert_eq!(ys, vec![1.0, 1.0, 0.0]);
    }

    #[test]
    fn test_extremes_reach_bounds() {
        let points = [
            Point::new(-3.5, 2.0),
            Point::new(1.25, -7.0),
            Point::new(0.3, 0.1),
            Point::new(12.0, 4.5),
        ];
        let normalized = normalize(&points);
        assert!(normalized
            .iter()
            .all(|p| (0.0..=1.0).contains(&p.x) && (0.0..=1.0).contains(&p.y)));
        assert_eq!(normalized[0].x, 0.0);
        assert_eq!(normalized[3].x, 1.0);
        // smallest y is at the bottom, largest at the top
        assert_eq!(normalized[1].y, 1.0);
        assert_eq!(normalized[3].y, 0.0);
    }

    #[test]
    fn test_degenerate_axis() {
        let points = [
            Point::new(5.0, 1.0),
            Point::new(5.0, 2.0),
            Point::new(5.0, 3.0),
        ];
        let normalized = normalize(&points);
        assert!(normalized.iter().all(|p| p.x == 0.0));
        assert_eq!(normalized[0].y, 1.0);
        assert_eq!(normalized[2].y, 0.0);

        let single = normalize(&[Point::new(-2.0, 8.0)]);
        assert_eq!(single, vec![Point::new(0.0, 1.0)]);
    }

    #[test]
    fn test_empty() {
        assert!(normalize(&[]).is_empty());
    }
}
