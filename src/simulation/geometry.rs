#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

/// Shoelace formula over a closed polygon.
pub fn polygon_area(points: &[Point]) -> f64 {
    let n = points.len();
    let mut twice_area = 0.0;
    for i in 0..n {
        let curr = points[i];
        let next = points[(i + 1) % n];
        twice_area += curr.x * next.y - next.x * curr.y;
    }
    twice_area.abs() / 2.0
}

/// Same as [`polygon_area`] for coordinates held in separate slices.
pub fn polygon_area_xy(xs: &[f64], ys: &[f64]) -> f64 {
    debug_assert_eq!(xs.len(), ys.len());
    let n = xs.len();
    let mut twice_area = 0.0;
    for i in 0..n - 1 {
        twice_area += xs[i] * ys[i + 1] - xs[i + 1] * ys[i];
    }
    twice_area += xs[n - 1] * ys[0] - xs[0] * ys[n - 1];
    twice_area.abs() / 2.0
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub bottom_left: Point,
    pub top_right: Point,
}

impl BoundingBox {
    /// `None` for an empty point set.
    pub fn of(points: &[Point]) -> Option<Self> {
        let first = *points.first()?;
        let mut bbox = BoundingBox {
            bottom_left: first,
            top_right: first,
        };
        for point in &points[1..] {
            bbox.bottom_left.x = bbox.bottom_left.x.min(point.x);
            bbox.bottom_left.y = bbox.bottom_left.y.min(point.y);
            bbox.top_right.x = bbox.top_right.x.max(point.x);
            bbox.top_right.y = bbox.top_right.y.max(point.y);
        }
        Some(bbox)
    }

    pub fn of_xy(xs: &[f64], ys: &[f64]) -> Option<Self> {
        let (min_x, max_x) = min_max(xs)?;
        let (min_y, max_y) = min_max(ys)?;
        Some(BoundingBox {
            bottom_left: Point::new(min_x, min_y),
            top_right: Point::new(max_x, max_y),
        })
    }

    pub fn width(&self) -> f64 {
        self.top_right.x - self.bottom_left.x
    }

    pub fn height(&self) -> f64 {
        self.top_right.y - self.bottom_left.y
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }
}

fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    let first = *values.first()?;
    Some(
        values[1..]
            .iter()
            .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v))),
    )
}

/// Polygon area over bounding-box area. Callers pass at least three points.
pub fn area_ratio(points: &[Point]) -> f64 {
    match BoundingBox::of(points) {
        Some(bbox) => polygon_area(points) / bbox.area(),
        None => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_square_fills_its_box() {
        let square = [
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 1.0),
        ];
        assert_eq!(polygon_area(&square), 1.0);
        assert_eq!(area_ratio(&square), 1.0);
    }

    #[test]
    fn winding_order_does_not_change_area() {
        let ccw = [
            Point::new(1.0, 1.0),
            Point::new(2.0, 1.0),
            Point::new(2.0, 2.0),
        ];
        let cw = [ccw[2], ccw[1], ccw[0]];
        assert_eq!(polygon_area(&ccw), 0.5);
        assert_eq!(polygon_area(&cw), 0.5);
    }

    #[test]
    fn triangles_against_their_boxes() {
        let right = [
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
        ];
        let thin = [
            Point::new(0.0, 0.0),
            Point::new(0.5, 0.0),
            Point::new(1.0, 1.0),
        ];
        assert_eq!(area_ratio(&right), 0.5);
        assert_eq!(area_ratio(&thin), 0.25);
    }

    #[test]
    fn split_coordinates_agree_with_points() {
        let points = [
            Point::new(1.2, 1.9),
            Point::new(1.7, 1.1),
            Point::new(1.9, 1.6),
            Point::new(1.4, 1.3),
        ];
        let xs: Vec<f64> = points.iter().map(|p| p.x).collect();
        let ys: Vec<f64> = points.iter().map(|p| p.y).collect();
        assert!((polygon_area(&points) - polygon_area_xy(&xs, &ys)).abs() < 1e-12);
        assert_eq!(BoundingBox::of(&points), BoundingBox::of_xy(&xs, &ys));
    }

    #[test]
    fn empty_set_has_no_box() {
        assert_eq!(BoundingBox::of(&[]), None);
        assert_eq!(BoundingBox::of_xy(&[], &[]), None);
    }
}
