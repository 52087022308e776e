//! Contour geometry: enclosed area, bounding box and closed-curve simplification.

use super::Region;
use imageproc::point::Point;

/// Area enclosed by a closed point sequence (shoelace formula)
pub(crate) fn polygon_area(points: &[Point<u32>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }

    let twice_area: f64 = points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(p, q)| p.x as f64 * q.y as f64 - q.x as f64 * p.y as f64)
        .sum();

    twice_area.abs() / 2.0
}

/// Smallest axis-aligned rectangle containing every point (inclusive pixel bounds)
pub(crate) fn bounding_box(points: &[Point<u32>]) -> Option<Region> {
    let first = points.first()?;
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);

    for p in &points[1..] {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }

    Some(Region {
        x: min_x,
        y: min_y,
        width: max_x - min_x + 1,
        height: max_y - min_y + 1,
    })
}

/// Douglas-Peucker simplification of a closed curve.
///
/// The curve is split at the point farthest from its first point and both
/// halves are simplified as open chains, so the result has no repeated
/// closing vertex.
pub(crate) fn simplify_closed(points: &[Point<u32>], epsilon: f64) -> Vec<Point<u32>> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let anchor = points[0];
    let mut far = 0;
    let mut far_distance = 0.0;
    for (i, p) in points.iter().enumerate().skip(1) {
        let d = distance(anchor, *p);
        if d > far_distance {
            far = i;
            far_distance = d;
        }
    }

    if far == 0 {
        return vec![anchor];
    }

    let mut ring = points.to_vec();
    ring.push(anchor);

    let mut simplified = simplify_open(&ring[..=far], epsilon);
    let second = simplify_open(&ring[far..], epsilon);

    // Both halves share the far point, and the second half ends on the anchor
    simplified.pop();
    simplified.extend(second);
    simplified.pop();
    simplified
}

/// Douglas-Peucker on an open chain; endpoints are always kept
fn simplify_open(points: &[Point<u32>], epsilon: f64) -> Vec<Point<u32>> {
    if points.len() <= 2 {
        return points.to_vec();
    }

    let last = points.len() - 1;
    let mut keep = vec![false; points.len()];
    keep[0] = true;
    keep[last] = true;

    let mut stack = vec![(0, last)];
    while let Some((start, end)) = stack.pop() {
        if end <= start + 1 {
            continue;
        }

        let mut max_distance = 0.0;
        let mut max_index = start;
        for i in (start + 1)..end {
            let d = distance_to_line(points[i], points[start], points[end]);
            if d > max_distance {
                max_distance = d;
                max_index = i;
            }
        }

        if max_distance > epsilon {
            keep[max_index] = true;
            stack.push((start, max_index));
            stack.push((max_index, end));
        }
    }

    points
        .iter()
        .zip(keep)
        .filter_map(|(p, kept)| kept.then_some(*p))
        .collect()
}

fn distance(a: Point<u32>, b: Point<u32>) -> f64 {
    let dx = a.x as f64 - b.x as f64;
    let dy = a.y as f64 - b.y as f64;
    (dx * dx + dy * dy).sqrt()
}

/// Distance from `p` to the line through `a` and `b` (or to `a` if they coincide)
fn distance_to_line(p: Point<u32>, a: Point<u32>, b: Point<u32>) -> f64 {
    let (ax, ay) = (a.x as f64, a.y as f64);
    let (dx, dy) = (b.x as f64 - ax, b.y as f64 - ay);
    let length = (dx * dx + dy * dy).sqrt();
    if length == 0.0 {
        return distance(p, a);
    }
    ((p.x as f64 - ax) * dy - (p.y as f64 - ay) * dx).abs() / length
}
