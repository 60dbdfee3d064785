use ratatui::style::Color;

/// Background of the status bar and the selected dropdown row.
pub const BAR_BG: Color = Color::Rgb(0, 95, 135);

pub fn border_color(focused: bool) -> Color {
    if focused {
        Color::Cyan
    } else {
        Color::DarkGray
    }
}
