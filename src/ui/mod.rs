// UI Layer
pub mod components;
pub mod layout;
pub mod theme;

pub use layout::{stack_view_areas, LayoutManager, LayoutMode};
pub use theme::{Theme, ThemeManager};

pub use components::{
    CommandBar, CompressPanel, Dialog, DialogKind, SettingsPanel, StatusBar, WarningScreen,
};
