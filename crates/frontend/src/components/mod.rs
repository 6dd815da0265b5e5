pub mod back_button;
pub mod content_panel;
pub mod help_overlay;
pub mod loading_pulse;
pub mod map_view;
