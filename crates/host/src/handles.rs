use serde::{Deserialize, Serialize};

macro_rules! handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub u64);
    };
}

handle!(
    /// An engine window.
    WindowHandle
);
handle!(WorldHandle);
handle!(ViewportHandle);
handle!(
    /// A screen-space GUI attached to a world.
    GuiHandle
);
handle!(UnitHandle);
handle!(
    /// A camera component on a unit.
    CameraHandle
);
handle!(LevelHandle);
handle!(ShadingEnvironmentHandle);
handle!(MaterialHandle);
handle!(
    /// A bitmap drawn by a GUI. Owned by that GUI.
    BitmapHandle
);
handle!(WebViewHandle);
