//! Hit-testing of pointer positions against painted task markers.
use glam::DVec2;

use crate::{Task, layout::RenderedPoints};

/// Find the task whose marker contains `cursor`.
///
/// Tasks are tested in list order and the first hit wins, so when markers overlap the
/// earlier task shadows the later ones. Tasks the renderer has not painted yet are skipped.
pub fn hit_test<P>(points: &P, tasks: &[Task], cursor: DVec2) -> Option<usize>
where
    P: RenderedPoints + ?Sized,
{
    tasks.iter().enumerate().find_map(|(index, task)| {
        let center = points.center(index)?;
        let radius = task.radius();
        (center.distance_squared(cursor) < radius * radius).then_some(index)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::IconRef;

    fn task(importance: f64) -> Task {
        Task::new("t", 5.0, importance, IconRef::default())
    }

    #[test]
    fn overlapping_markers_resolve_to_first() {
        // Radii 18 and 28, centers 10 px apart.
        let tasks = vec![task(5.0), task(10.0)];
        let points = vec![Some(DVec2::new(100.0, 100.0)), Some(DVec2::new(110.0, 100.0))];
        for _ in 0..10 {
            assert_eq!(hit_test(&points, &tasks, DVec2::new(105.0, 100.0)), Some(0));
        }
        // Only inside the second marker.
        assert_eq!(hit_test(&points, &tasks, DVec2::new(130.0, 100.0)), Some(1));
    }

    #[test]
    fn boundary_is_a_miss() {
        let tasks = vec![task(0.0)];
        let points = vec![Some(DVec2::new(0.0, 0.0))];
        assert_eq!(hit_test(&points, &tasks, DVec2::new(8.0, 0.0)), None);
        assert_eq!(hit_test(&points, &tasks, DVec2::new(7.9, 0.0)), Some(0));
    }

    #[test]
    fn unpainted_tasks_are_skipped() {
        let tasks = vec![task(5.0), task(5.0)];
        let points = vec![None, Some(DVec2::new(50.0, 50.0))];
        assert_eq!(hit_test(&points, &tasks, DVec2::new(50.0, 50.0)), Some(1));
        let none: Vec<Option<DVec2>> = Vec::new();
        assert_eq!(hit_test(&none, &tasks, DVec2::new(50.0, 50.0)), None);
    }
}
