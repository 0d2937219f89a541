pub mod hosts;
pub mod menu;
pub mod settings;
pub mod urls;
pub mod worker;

pub use hosts::{
    HostError, MenuHost, MenuOp, Navigation, Navigator, RecordingMenu, RecordingNavigator,
};
pub use menu::{render, Activation, ActivationError, IgnoreReason, MenuSynchronizer, SyncError};
pub use settings::{LocationEditor, SettingsError, SettingsResult};
pub use urls::{directions_url, encode_component, search_url};
pub use worker::{is_relevant, SyncWorker};
