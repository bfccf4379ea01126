use colored::Color;

pub const PRIMARY: Color = Color::BrightGreen;
pub const ACCENT: Color = Color::BrightYellow;
pub const SEPARATOR: Color = Color::BrightBlack;
pub const TEXT_DEFAULT: Color = Color::White;

pub const ADDRESS: Color = Color::Cyan;
pub const STATE_ONLINE: Color = Color::Green;
pub const STATE_OFFLINE: Color = Color::Red;
