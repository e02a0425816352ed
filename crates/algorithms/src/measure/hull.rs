//! Convex hull measures: maximum Feret diameter and convex area

use geo::{ConvexHull, Coord, Intersects, MultiPoint, Point, Polygon};

/// Convex hull of `(row, col)` points, with x = col and y = row
fn hull_of(points: impl IntoIterator<Item = (f64, f64)>) -> Polygon<f64> {
    let points: MultiPoint<f64> = points
        .into_iter()
        .map(|(r, c)| Point::new(c, r))
        .collect::<Vec<_>>()
        .into();
    points.convex_hull()
}

/// Largest distance between two points on the region outline.
///
/// The outline is sampled at the midpoints of every pixel edge shared with
/// background, which is where a half-level contour of the region passes.
pub(crate) fn feret_diameter_max(region: &[(usize, usize)], contains: impl Fn(isize, isize) -> bool) -> f64 {
    let mut midpoints = Vec::new();
    for &(r, c) in region {
        let (ri, ci) = (r as isize, c as isize);
        let (rf, cf) = (r as f64, c as f64);
        if !contains(ri - 1, ci) {
            midpoints.push((rf - 0.5, cf));
        }
        if !contains(ri + 1, ci) {
            midpoints.push((rf + 0.5, cf));
        }
        if !contains(ri, ci - 1) {
            midpoints.push((rf, cf - 0.5));
        }
        if !contains(ri, ci + 1) {
            midpoints.push((rf, cf + 0.5));
        }
    }

    let hull = hull_of(midpoints);
    let vertices: Vec<Coord<f64>> = hull.exterior().coords().copied().collect();

    let mut best = 0.0f64;
    for (i, a) in vertices.iter().enumerate() {
        for b in &vertices[i + 1..] {
            best = best.max((a.x - b.x).hypot(a.y - b.y));
        }
    }
    best
}

/// Number of pixel centers inside the convex hull of the region's pixel
/// squares. Centers on the hull boundary count.
pub(crate) fn convex_area(
    region: &[(usize, usize)],
    bounds: (usize, usize, usize, usize),
    contains: impl Fn(isize, isize) -> bool,
) -> usize {
    let corners = region
        .iter()
        .filter(|&&(r, c)| {
            let (r, c) = (r as isize, c as isize);
            !(contains(r - 1, c) && contains(r + 1, c) && contains(r, c - 1) && contains(r, c + 1))
        })
        .flat_map(|&(r, c)| {
            let (r, c) = (r as f64, c as f64);
            [(r - 0.5, c - 0.5), (r - 0.5, c + 0.5), (r + 0.5, c - 0.5), (r + 0.5, c + 0.5)]
        });
    let hull = hull_of(corners);

    let (min_row, min_col, max_row, max_col) = bounds;
    (min_row..max_row)
        .flat_map(|r| (min_col..max_col).map(move |c| (r, c)))
        .filter(|&(r, c)| Point::new(c as f64, r as f64).intersects(&hull))
        .count()
}
