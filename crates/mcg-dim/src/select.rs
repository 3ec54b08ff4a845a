/// K with the largest perpendicular distance from the chord joining the first
/// and last points.
///
/// Both axes are rescaled to the unit interval first so the K spacing and the
/// AUC range weigh equally. Needs at least three points; ties go to the
/// smaller K.
pub fn elbow_k(points: &[(usize, f64)]) -> Option<usize> {
    if points.len() < 3 {
        return None;
    }
    let (k_first, auc_first) = points[0];
    let (k_last, auc_last) = points[points.len() - 1];
    let k_span = unit_span(k_last as f64 - k_first as f64);
    let auc_span = unit_span(auc_last - auc_first);
    let scale = |(k, auc): (usize, f64)| {
        (
            (k as f64 - k_first as f64) / k_span,
            (auc - auc_first) / auc_span,
        )
    };

    let (end_x, end_y) = scale(points[points.len() - 1]);
    let chord = (end_x * end_x + end_y * end_y).sqrt();
    if chord == 0.0 {
        return None;
    }
    let mut best: Option<(usize, f64)> = None;
    for &point in &points[1..points.len() - 1] {
        let (x, y) = scale(point);
        let distance = (end_y * x - end_x * y).abs() / chord;
        if best.map_or(true, |(_, current)| distance > current) {
            best = Some((point.0, distance));
        }
    }
    best.map(|(k, _)| k)
}

fn unit_span(span: f64) -> f64 {
    if span.abs() > 0.0 {
        span.abs()
    } else {
        1.0
    }
}

/// Smallest K after which the next gain in mean AUC falls below `epsilon`;
/// the last K when the gain never drops that low.
pub fn plateau_k(points: &[(usize, f64)], epsilon: f64) -> Option<usize> {
    for window in points.windows(2) {
        if window[1].1 - window[0].1 < epsilon {
            return Some(window[0].0);
        }
    }
    points.last().map(|(k, _)| *k)
}
