// MP4J bootstrap library - everything that has to happen before the UI
// owns the process: on-disk state, connectivity, theme, session hand-off

pub mod bootstrap; // ordered startup steps and the UI seam
pub mod config;    // properties file, two groups, defaults
pub mod net;       // connectivity probe + persisted flag
pub mod resource;  // data-root layout and directory lifecycle
pub mod session;   // previous-session marker
pub mod theme;     // config key -> theme descriptor table

// Export the stuff the binary and the UI shell actually use
pub use bootstrap::{Bootstrap, BootstrapError, Launch, Shell, SPLASH_DURATION};
pub use config::Settings;
pub use resource::AppPaths;
pub use theme::{Theme, ThemeDescriptor};
