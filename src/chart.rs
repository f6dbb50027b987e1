//! The quadrant chart: a canvas program that paints tasks and turns pointer input into
//! [`ChartEvent`]s.
use std::borrow::Cow;

use glam::DVec2;
use iced::alignment::{Horizontal, Vertical};
use iced::widget::canvas::{self, Frame, Geometry, Path, Stroke, Text};
use iced::{Color, Element, Length, Point, Rectangle, Renderer, Size, Theme, mouse, touch};

use crate::{
    ChartControls, ChartEvent, IconRef, PointerId, PointerInput, Task,
    icon::BuiltinShape,
    icon_cache::{IconCache, LoadedIcon},
    interaction::{GestureRecognizer, InteractionController},
    layout::{ChartLayout, RenderedPoints},
    mapper::{CoordinateMapper, Margins},
    picking,
    ticks::{self, PositionedTick, TickWeight},
};

const MARKER_ALPHA: f32 = 0.7;
/// Icons are drawn inside this fraction of the marker radius.
const ICON_SCALE: f64 = 0.8;
const TITLE_SIZE: f32 = 12.0;
const TICK_LABEL_SIZE: f32 = 10.0;
const AXIS_TITLE_SIZE: f32 = 11.0;

fn grid_color() -> Color {
    Color::from_rgb8(0xbb, 0xbb, 0xbb)
}

fn ink_color() -> Color {
    Color::from_rgb8(0x33, 0x33, 0x33)
}

/// Chart widget borrowing the planner's task list for one frame.
pub struct TaskChart<'a> {
    tasks: &'a [Task],
    revision: u64,
    icons: &'a IconCache,
    controls: ChartControls,
    editing: Option<usize>,
    margins: Margins,
}

impl<'a> TaskChart<'a> {
    pub fn new(tasks: &'a [Task], revision: u64, icons: &'a IconCache) -> Self {
        Self {
            tasks,
            revision,
            icons,
            controls: ChartControls::default(),
            editing: None,
            margins: Margins::default(),
        }
    }

    pub fn controls(mut self, controls: ChartControls) -> Self {
        self.controls = controls;
        self
    }

    /// Task drawn with the editing ring.
    pub fn editing(mut self, editing: Option<usize>) -> Self {
        self.editing = editing;
        self
    }

    pub fn margins(mut self, margins: Margins) -> Self {
        self.margins = margins;
        self
    }

    pub fn view(self) -> Element<'a, ChartEvent> {
        canvas::Canvas::new(self)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    fn layout_for<'s>(&self, state: &'s ChartState, size: Size) -> Cow<'s, ChartLayout> {
        if state.layout.is_current(size, self.revision) {
            Cow::Borrowed(&state.layout)
        } else {
            Cow::Owned(ChartLayout::compute(
                self.tasks,
                size,
                self.margins,
                self.revision,
            ))
        }
    }
}

/// Per-widget interaction state kept by the canvas between events.
#[derive(Debug, Clone)]
pub struct ChartState {
    layout: ChartLayout,
    controller: InteractionController,
    gesture: GestureRecognizer,
    hover: Option<usize>,
    cursor: Option<DVec2>,
}

impl Default for ChartState {
    fn default() -> Self {
        Self {
            layout: ChartLayout::default(),
            controller: InteractionController::new(ChartControls::default()),
            gesture: GestureRecognizer::default(),
            hover: None,
            cursor: None,
        }
    }
}

impl ChartState {
    /// Translate an iced event into controller inputs, in order.
    fn pointer_inputs(
        &mut self,
        event: &iced::Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Vec<PointerInput> {
        let controls = self.controller.controls();
        let now = iced::time::Instant::now();
        let mut inputs = Vec::new();
        match event {
            iced::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                if let Some(p) = cursor.position_in(bounds) {
                    let position = DVec2::new(p.x as f64, p.y as f64);
                    self.gesture.press(PointerId::Mouse, position);
                    inputs.push(PointerInput::Down {
                        pointer: PointerId::Mouse,
                        position,
                    });
                }
            }
            iced::Event::Mouse(mouse::Event::CursorMoved { position }) => {
                let position = local(*position, bounds);
                self.gesture
                    .track(PointerId::Mouse, position, controls.click_slop_px);
                inputs.push(PointerInput::Move {
                    pointer: PointerId::Mouse,
                    position,
                });
            }
            iced::Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
                inputs.push(PointerInput::Up {
                    pointer: PointerId::Mouse,
                });
                inputs.extend(self.gesture.release(PointerId::Mouse, now, &controls));
            }
            iced::Event::Touch(touch::Event::FingerPressed { id, position }) => {
                if bounds.contains(*position) {
                    let pointer = PointerId::Finger(id.0);
                    let position = local(*position, bounds);
                    self.gesture.press(pointer, position);
                    inputs.push(PointerInput::Down { pointer, position });
                }
            }
            iced::Event::Touch(touch::Event::FingerMoved { id, position }) => {
                let pointer = PointerId::Finger(id.0);
                let position = local(*position, bounds);
                self.gesture.track(pointer, position, controls.click_slop_px);
                inputs.push(PointerInput::Move { pointer, position });
            }
            iced::Event::Touch(touch::Event::FingerLifted { id, .. }) => {
                let pointer = PointerId::Finger(id.0);
                inputs.push(PointerInput::Up { pointer });
                inputs.extend(self.gesture.release(pointer, now, &controls));
            }
            iced::Event::Touch(touch::Event::FingerLost { id, .. }) => {
                inputs.push(PointerInput::Up {
                    pointer: PointerId::Finger(id.0),
                });
                self.gesture.cancel();
            }
            _ => {}
        }
        inputs
    }
}

fn local(point: Point, bounds: Rectangle) -> DVec2 {
    DVec2::new((point.x - bounds.x) as f64, (point.y - bounds.y) as f64)
}

fn to_point(v: DVec2) -> Point {
    Point::new(v.x as f32, v.y as f32)
}

impl canvas::Program<ChartEvent> for TaskChart<'_> {
    type State = ChartState;

    fn update(
        &self,
        state: &mut Self::State,
        event: &iced::Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<canvas::Action<ChartEvent>> {
        let size = bounds.size();
        if !state.layout.is_current(size, self.revision) {
            state.layout = ChartLayout::compute(self.tasks, size, self.margins, self.revision);
            state
                .controller
                .set_mapper(state.layout.mapper().copied());
        }
        if state.controller.controls() != self.controls {
            state.controller.set_controls(self.controls);
        }

        let mut published = None;
        for input in state.pointer_inputs(event, bounds, cursor) {
            if let Some(event) = state.controller.handle(input, self.tasks, &state.layout) {
                published = Some(event);
            }
        }

        let cursor_local = cursor
            .position_in(bounds)
            .map(|p| DVec2::new(p.x as f64, p.y as f64));
        let hover = cursor_local.and_then(|p| picking::hit_test(&state.layout, self.tasks, p));
        let needs_redraw = hover != state.hover || (hover.is_some() && cursor_local != state.cursor);
        state.hover = hover;
        state.cursor = cursor_local;

        match published {
            Some(event) => Some(canvas::Action::publish(event).and_capture()),
            None => needs_redraw.then(canvas::Action::request_redraw),
        }
    }

    fn draw(
        &self,
        state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        let layout = self.layout_for(state, bounds.size());

        let Some(mapper) = layout.mapper() else {
            return vec![frame.into_geometry()];
        };
        draw_axes(&mut frame, mapper, bounds.size());

        if self.tasks.is_empty() {
            let center = mapper.origin() + mapper.extent() / 2.0;
            frame.fill_text(Text {
                content: "No tasks yet. Add one to start planning.".to_string(),
                position: to_point(center),
                color: Color::from_rgb(0.5, 0.5, 0.5),
                size: 14.0.into(),
                align_x: Horizontal::Center.into(),
                align_y: Vertical::Center.into(),
                ..Text::default()
            });
        }

        for (index, task) in self.tasks.iter().enumerate() {
            let Some(center) = layout.center(index) else {
                continue;
            };
            self.draw_task(&mut frame, task, center, self.editing == Some(index));
        }

        // Tooltip last so it sits above every marker.
        if let (Some(index), Some(cursor)) = (state.hover, state.cursor)
            && let Some(task) = self.tasks.get(index)
        {
            draw_tooltip(&mut frame, task, cursor, bounds.size());
        }

        vec![frame.into_geometry()]
    }

    fn mouse_interaction(
        &self,
        state: &Self::State,
        _bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        if state.controller.is_dragging() {
            mouse::Interaction::Grabbing
        } else if state.hover.is_some() && self.controls.quick_edit {
            mouse::Interaction::Grab
        } else if state.hover.is_some() {
            mouse::Interaction::Pointer
        } else {
            mouse::Interaction::default()
        }
    }
}

impl TaskChart<'_> {
    fn draw_task(&self, frame: &mut Frame, task: &Task, center: DVec2, editing: bool) {
        let radius = task.radius();
        let marker = Path::circle(to_point(center), radius as f32);
        frame.fill(
            &marker,
            Color {
                a: MARKER_ALPHA,
                ..task.color()
            },
        );
        if editing {
            frame.stroke(
                &Path::circle(to_point(center), radius as f32 + 3.0),
                Stroke::default().with_color(ink_color()).with_width(2.0),
            );
        }

        self.draw_icon(frame, &task.icon, center, radius * ICON_SCALE);

        frame.fill_text(Text {
            content: task.title.clone(),
            position: Point::new(center.x as f32, (center.y + radius + 2.0) as f32),
            color: ink_color(),
            size: TITLE_SIZE.into(),
            align_x: Horizontal::Center.into(),
            align_y: Vertical::Top.into(),
            ..Text::default()
        });
    }

    fn draw_icon(&self, frame: &mut Frame, icon: &IconRef, center: DVec2, radius: f64) {
        let r = radius as f32;
        let rect = Rectangle::new(
            Point::new(center.x as f32 - r, center.y as f32 - r),
            Size::new(2.0 * r, 2.0 * r),
        );
        match icon {
            IconRef::Builtin(shape) => draw_shape(frame, *shape, to_point(center), r),
            other => match self.icons.get(other) {
                Some(LoadedIcon::Raster(handle)) => frame.draw_image(rect, handle),
                Some(LoadedIcon::Vector(handle)) => frame.draw_svg(rect, handle),
                Some(LoadedIcon::Pending | LoadedIcon::Failed) | None => {}
            },
        }
    }
}

fn draw_axes(frame: &mut Frame, mapper: &CoordinateMapper, size: Size) {
    let origin = mapper.origin();
    let extent = mapper.extent();
    frame.fill_rectangle(
        to_point(origin),
        Size::new(extent.x as f32, extent.y as f32),
        Color::from_rgb8(0xfa, 0xfa, 0xfa),
    );

    let levels = ticks::level_ticks();
    let top = origin.y as f32;
    let bottom = (origin.y + extent.y) as f32;
    let left = origin.x as f32;
    let right = (origin.x + extent.x) as f32;

    let urgency = ticks::position_urgency(mapper, &levels, &ticks::urgency_formatter());
    for tick in &urgency {
        grid_line(
            frame,
            tick,
            Point::new(tick.screen_pos, top),
            Point::new(tick.screen_pos, bottom),
        );
        frame.fill_text(Text {
            content: tick.label.clone(),
            position: Point::new(tick.screen_pos, bottom + 3.0),
            color: ink_color(),
            size: TICK_LABEL_SIZE.into(),
            align_x: Horizontal::Center.into(),
            align_y: Vertical::Top.into(),
            ..Text::default()
        });
    }

    let importance = ticks::position_importance(mapper, &levels, &ticks::importance_formatter());
    for tick in &importance {
        grid_line(
            frame,
            tick,
            Point::new(left, tick.screen_pos),
            Point::new(right, tick.screen_pos),
        );
        frame.fill_text(Text {
            content: tick.label.clone(),
            position: Point::new(left - 4.0, tick.screen_pos),
            color: ink_color(),
            size: TICK_LABEL_SIZE.into(),
            align_x: Horizontal::Right.into(),
            align_y: Vertical::Center.into(),
            ..Text::default()
        });
    }

    draw_quadrant_captions(frame, mapper);

    frame.fill_text(Text {
        content: "Urgency →".to_string(),
        position: Point::new((left + right) / 2.0, size.height - 2.0),
        color: ink_color(),
        size: AXIS_TITLE_SIZE.into(),
        align_x: Horizontal::Center.into(),
        align_y: Vertical::Bottom.into(),
        ..Text::default()
    });
    frame.fill_text(Text {
        content: "↑ Importance".to_string(),
        position: Point::new(4.0, 1.0),
        color: ink_color(),
        size: AXIS_TITLE_SIZE.into(),
        ..Text::default()
    });
}

/// Quadrant names, each anchored at the outer corner of its quadrant.
const QUADRANT_CAPTIONS: [(&str, f64, f64, Horizontal); 4] = [
    ("Schedule", 0.0, 10.0, Horizontal::Left),
    ("Do first", 10.0, 10.0, Horizontal::Right),
    ("Eliminate", 0.0, 0.0, Horizontal::Left),
    ("Delegate", 10.0, 0.0, Horizontal::Right),
];

fn draw_quadrant_captions(frame: &mut Frame, mapper: &CoordinateMapper) {
    for (caption, urgency, importance, align) in QUADRANT_CAPTIONS {
        let corner = mapper.data_to_screen(DVec2::new(urgency, importance));
        let dx = if align == Horizontal::Left { 6.0 } else { -6.0 };
        let (dy, align_y) = if importance > ticks::QUADRANT_SPLIT {
            (4.0, Vertical::Top)
        } else {
            (-4.0, Vertical::Bottom)
        };
        frame.fill_text(Text {
            content: caption.to_string(),
            position: Point::new(corner.x as f32 + dx, corner.y as f32 + dy),
            color: Color::from_rgba8(0x33, 0x33, 0x33, 0.35),
            size: 14.0.into(),
            align_x: align.into(),
            align_y,
            ..Text::default()
        });
    }
}

fn grid_line(frame: &mut Frame, tick: &PositionedTick, from: Point, to: Point) {
    let width = match tick.tick.weight {
        TickWeight::Major => 1.5,
        TickWeight::Minor => 0.5,
    };
    frame.stroke(
        &Path::line(from, to),
        Stroke::default().with_color(grid_color()).with_width(width),
    );
}

fn draw_shape(frame: &mut Frame, shape: BuiltinShape, center: Point, r: f32) {
    let outline = Stroke::default().with_color(ink_color()).with_width(2.0);
    match shape {
        // The marker itself is the circle.
        BuiltinShape::Circle => {}
        BuiltinShape::Rect => {
            let side = r * std::f32::consts::FRAC_1_SQRT_2 * 2.0;
            frame.stroke(
                &Path::rectangle(
                    Point::new(center.x - side / 2.0, center.y - side / 2.0),
                    Size::new(side, side),
                ),
                outline,
            );
        }
        BuiltinShape::Triangle => {
            let path = Path::new(|b| {
                for (i, angle) in [90.0_f32, 210.0, 330.0].into_iter().enumerate() {
                    let p = polar(center, r, angle);
                    if i == 0 {
                        b.move_to(p);
                    } else {
                        b.line_to(p);
                    }
                }
                b.close();
            });
            frame.stroke(&path, outline);
        }
        BuiltinShape::Star => {
            let path = Path::new(|b| {
                for i in 0..5 {
                    let outer = polar(center, r, 18.0 + i as f32 * 72.0);
                    let inner = polar(center, r * 0.5, 54.0 + i as f32 * 72.0);
                    if i == 0 {
                        b.move_to(outer);
                    } else {
                        b.line_to(outer);
                    }
                    b.line_to(inner);
                }
                b.close();
            });
            frame.fill(&path, Color::from_rgb8(0xff, 0xd7, 0x00));
            frame.stroke(&path, outline);
        }
        BuiltinShape::Cross => {
            let red = Stroke::default()
                .with_color(Color::from_rgb8(0xd3, 0x2f, 0x2f))
                .with_width(4.0);
            frame.stroke(
                &Path::line(
                    Point::new(center.x - r, center.y - r),
                    Point::new(center.x + r, center.y + r),
                ),
                red,
            );
            frame.stroke(
                &Path::line(
                    Point::new(center.x - r, center.y + r),
                    Point::new(center.x + r, center.y - r),
                ),
                red,
            );
        }
    }
}

/// Point at `angle_deg` (counter-clockwise from +x, screen y pointing down).
fn polar(center: Point, r: f32, angle_deg: f32) -> Point {
    let a = angle_deg.to_radians();
    Point::new(center.x + a.cos() * r, center.y - a.sin() * r)
}

/// Hover text for a task.
pub fn tooltip_text(task: &Task) -> String {
    format!(
        "{} (urgency: {}, importance: {})",
        task.title,
        task.urgency_label(),
        task.importance_label()
    )
}

fn draw_tooltip(frame: &mut Frame, task: &Task, cursor: DVec2, canvas: Size) {
    const PAD: f32 = 6.0;
    const CHAR_WIDTH: f32 = 6.5;
    const HEIGHT: f32 = 22.0;

    let content = tooltip_text(task);
    let width = content.chars().count() as f32 * CHAR_WIDTH + 2.0 * PAD;
    let mut x = cursor.x as f32 + 12.0;
    let mut y = cursor.y as f32 + 12.0;
    if x + width > canvas.width {
        x = (canvas.width - width).max(0.0);
    }
    if y + HEIGHT > canvas.height {
        y = (cursor.y as f32 - 12.0 - HEIGHT).max(0.0);
    }

    let background = Path::rectangle(Point::new(x, y), Size::new(width, HEIGHT));
    frame.fill(&background, Color::from_rgba8(0x20, 0x20, 0x20, 0.85));
    frame.fill_text(Text {
        content,
        position: Point::new(x + PAD, y + HEIGHT / 2.0),
        color: Color::WHITE,
        size: 12.0.into(),
        align_y: Vertical::Center.into(),
        ..Text::default()
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tooltip_uses_level_labels() {
        let task = Task::new("Draft report", 9.0, 2.0, IconRef::default());
        assert_eq!(
            tooltip_text(&task),
            format!(
                "Draft report (urgency: {}, importance: {})",
                task.urgency_label(),
                task.importance_label()
            )
        );
    }

    #[test]
    fn mouse_press_release_becomes_click() {
        let mut state = ChartState::default();
        let bounds = Rectangle::new(Point::new(10.0, 20.0), Size::new(300.0, 200.0));
        let cursor = mouse::Cursor::Available(Point::new(60.0, 70.0));

        let down = state.pointer_inputs(
            &iced::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)),
            bounds,
            cursor,
        );
        assert_eq!(
            down,
            vec![PointerInput::Down {
                pointer: PointerId::Mouse,
                position: DVec2::new(50.0, 50.0)
            }]
        );

        let up = state.pointer_inputs(
            &iced::Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)),
            bounds,
            cursor,
        );
        assert_eq!(
            up,
            vec![
                PointerInput::Up {
                    pointer: PointerId::Mouse
                },
                PointerInput::Click {
                    position: DVec2::new(50.0, 50.0)
                },
            ]
        );
    }

    #[test]
    fn press_outside_bounds_is_ignored() {
        let mut state = ChartState::default();
        let bounds = Rectangle::new(Point::ORIGIN, Size::new(100.0, 100.0));
        let inputs = state.pointer_inputs(
            &iced::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)),
            bounds,
            mouse::Cursor::Available(Point::new(150.0, 50.0)),
        );
        assert!(inputs.is_empty());
    }

    #[test]
    fn touches_are_tagged_by_finger() {
        let mut state = ChartState::default();
        let bounds = Rectangle::new(Point::ORIGIN, Size::new(100.0, 100.0));
        let inputs = state.pointer_inputs(
            &iced::Event::Touch(touch::Event::FingerPressed {
                id: touch::Finger(7),
                position: Point::new(5.0, 6.0),
            }),
            bounds,
            mouse::Cursor::Unavailable,
        );
        assert_eq!(
            inputs,
            vec![PointerInput::Down {
                pointer: PointerId::Finger(7),
                position: DVec2::new(5.0, 6.0)
            }]
        );
    }
}
