use crate::geometry::Point;

/// Student clicks that line up with expected points, in expected order.
///
/// Greedy single pass: each expected point takes the first student point
/// within `tolerance` on both axes that no earlier expected point has
/// taken. With `tolerance == 0.0` matching is exact equality.
pub fn order_student_points(expected: &[Point], student: &[Point], tolerance: f64) -> Vec<Point> {
    let mut used = vec![false; student.len()];
    let mut ordered = Vec::with_capacity(expected.len().min(student.len()));

    for exp in expected {
        let found = student
            .iter()
            .enumerate()
            .find(|(i, stu)| !used[*i] && exp.within(stu, tolerance));
        if let Some((i, stu)) = found {
            used[i] = true;
            ordered.push(*stu);
        }
    }
    ordered
}
