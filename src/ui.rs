pub mod notification_box;
pub mod small_help_widget;
