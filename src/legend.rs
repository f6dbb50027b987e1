use iced::alignment::{Horizontal, Vertical};
use iced::widget::{Container, button, column, container, row, text};
use iced::{Color, Element, Length};

use crate::task::{urgency_bands, urgency_color};

/// An entry in the urgency legend.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: &'static str,
    pub color: Color,
}

pub fn legend_entries() -> Vec<LegendEntry> {
    urgency_bands()
        .into_iter()
        .map(|(lower, label)| LegendEntry {
            label,
            color: urgency_color(lower),
        })
        .collect()
}

/// Collapsible legend of the urgency colors. `on_toggle` flips `collapsed`.
pub fn urgency_legend<'a, M: Clone + 'a>(collapsed: bool, on_toggle: M) -> Element<'a, M> {
    if collapsed {
        return legend_container(label_button("▶ Urgency", on_toggle)).into();
    }

    let mut col = column![label_button("▼ Urgency", on_toggle)]
        .spacing(4.0)
        .width(Length::Shrink)
        .height(Length::Shrink);

    for entry in legend_entries() {
        let swatch_color = entry.color;
        let swatch = container("")
            .width(Length::Fixed(12.0))
            .height(Length::Fixed(12.0))
            .style(move |_| swatch_color.into());

        col = col.push(
            row![swatch, text(entry.label).size(12.0)]
                .spacing(4.0)
                .width(Length::Shrink),
        );
    }

    legend_container(col).style(container::bordered_box).into()
}

fn label_button<'a, M: Clone + 'a>(label: &'a str, on_toggle: M) -> Element<'a, M> {
    button(text(label).size(12.0)).on_press(on_toggle).into()
}

fn legend_container<'a, M: 'a>(content: impl Into<Element<'a, M>>) -> Container<'a, M> {
    container(content)
        .padding(4.0)
        .align_x(Horizontal::Left)
        .align_y(Vertical::Top)
}
