use glam::DVec2;
use iced::Size;
use quadrant_planner::{
    ChartControls, ChartEvent, ChartLayout, IconRef, InteractionController, Planner,
    PointerId, PointerInput, SavedState, Task,
    mapper::Margins,
    transfer::{self, Format},
};

/// Plot area at (40, 20) with a 400x300 extent.
fn layout(tasks: &[Task], revision: u64) -> ChartLayout {
    let margins = Margins {
        top: 20.0,
        right: 10.0,
        bottom: 10.0,
        left: 40.0,
    };
    ChartLayout::compute(tasks, Size::new(450.0, 330.0), margins, revision)
}

fn planner_with(tasks: Vec<Task>) -> Planner {
    Planner::from_saved(SavedState {
        tasks,
        ..SavedState::default()
    })
}

#[test]
fn dragging_past_the_plot_clamps_to_the_corner() {
    let mut planner = planner_with(vec![Task::new("Draft report", 5.0, 5.0, IconRef::default())]);
    let layout = layout(planner.tasks(), planner.revision());
    let mut controller = InteractionController::new(ChartControls::default().with_quick_edit(true));
    controller.set_mapper(layout.mapper().copied());

    let down = PointerInput::Down {
        pointer: PointerId::Mouse,
        position: DVec2::new(240.0, 170.0),
    };
    assert_eq!(controller.handle(down, planner.tasks(), &layout), None);
    assert!(controller.is_dragging());

    // Inverts to (12.3, -1.0).
    let moved = PointerInput::Move {
        pointer: PointerId::Mouse,
        position: DVec2::new(532.0, 350.0),
    };
    let event = controller.handle(moved, planner.tasks(), &layout);
    assert_eq!(
        event,
        Some(ChartEvent::DragUpdate {
            index: 0,
            urgency: 10.0,
            importance: 0.0,
        })
    );
    let _ = planner.apply_chart_event(event.unwrap());
    assert_eq!(planner.tasks()[0].urgency, 10.0);
    assert_eq!(planner.tasks()[0].importance, 0.0);

    let up = PointerInput::Up {
        pointer: PointerId::Mouse,
    };
    assert_eq!(controller.handle(up, planner.tasks(), &layout), None);
    assert!(!controller.is_dragging());
}

#[test]
fn without_quick_edit_a_press_only_selects() {
    let planner = planner_with(vec![Task::new("Draft report", 5.0, 5.0, IconRef::default())]);
    let layout = layout(planner.tasks(), planner.revision());
    let mut controller = InteractionController::new(ChartControls::default());
    controller.set_mapper(layout.mapper().copied());

    let down = PointerInput::Down {
        pointer: PointerId::Mouse,
        position: DVec2::new(240.0, 170.0),
    };
    assert_eq!(controller.handle(down, planner.tasks(), &layout), None);
    assert!(!controller.is_dragging());

    let click = PointerInput::Click {
        position: DVec2::new(240.0, 170.0),
    };
    assert_eq!(
        controller.handle(click, planner.tasks(), &layout),
        Some(ChartEvent::Select(0))
    );
}

#[test]
fn second_finger_cannot_steal_a_drag() {
    let tasks = vec![
        Task::new("a", 2.0, 2.0, IconRef::default()),
        Task::new("b", 8.0, 8.0, IconRef::default()),
    ];
    let layout = layout(&tasks, 0);
    let mut controller = InteractionController::new(ChartControls::default().with_quick_edit(true));
    controller.set_mapper(layout.mapper().copied());

    let a = DVec2::new(120.0, 260.0);
    let b = DVec2::new(360.0, 80.0);
    controller.handle(
        PointerInput::Down {
            pointer: PointerId::Finger(1),
            position: a,
        },
        &tasks,
        &layout,
    );
    controller.handle(
        PointerInput::Down {
            pointer: PointerId::Finger(2),
            position: b,
        },
        &tasks,
        &layout,
    );
    let stray = controller.handle(
        PointerInput::Move {
            pointer: PointerId::Finger(2),
            position: DVec2::new(300.0, 100.0),
        },
        &tasks,
        &layout,
    );
    assert_eq!(stray, None);

    let owned = controller.handle(
        PointerInput::Move {
            pointer: PointerId::Finger(1),
            position: DVec2::new(240.0, 170.0),
        },
        &tasks,
        &layout,
    );
    assert_eq!(
        owned,
        Some(ChartEvent::DragUpdate {
            index: 0,
            urgency: 5.0,
            importance: 5.0,
        })
    );
}

#[test]
fn json_export_round_trips_through_the_planner() {
    let mut planner = planner_with(Vec::new());
    let _ = planner.add_task();
    let _ = planner.apply_chart_event(ChartEvent::DragUpdate {
        index: 0,
        urgency: 7.5,
        importance: 2.5,
    });
    let json = transfer::export(planner.tasks(), Format::Json).unwrap();

    let mut restored = planner_with(Vec::new());
    let _ = restored.replace_all(transfer::import(json.as_bytes(), Format::Json).unwrap());
    assert_eq!(restored.tasks(), planner.tasks());
}
