use glam::{Vec2, Vec3};

use crate::handles::{
    BitmapHandle, GuiHandle, MaterialHandle, ViewportHandle, WebViewHandle, WindowHandle,
};

/// Screen placement of a GUI bitmap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BitmapRect {
    pub position: Vec2,
    /// Draw order; higher is on top.
    pub layer: u32,
    pub size: Vec2,
}

/// GUI bitmaps and web views composited over the world.
pub trait Overlay {
    fn gui_material(&mut self, gui: GuiHandle, name: &str) -> Option<MaterialHandle>;

    /// Pixel resolution of the viewport within the window.
    fn gui_resolution(&self, viewport: ViewportHandle, window: WindowHandle) -> Vec2;

    fn create_bitmap(
        &mut self,
        gui: GuiHandle,
        material: MaterialHandle,
        rect: BitmapRect,
    ) -> Option<BitmapHandle>;
    fn update_bitmap(
        &mut self,
        gui: GuiHandle,
        bitmap: BitmapHandle,
        material: MaterialHandle,
        rect: BitmapRect,
    );
    fn destroy_bitmap(&mut self, gui: GuiHandle, bitmap: BitmapHandle);

    /// Load `url` into a web view that renders into `material`.
    fn create_web_view(
        &mut self,
        url: &str,
        window: WindowHandle,
        material: MaterialHandle,
    ) -> Option<WebViewHandle>;
    fn render_web_view(&mut self, view: WebViewHandle);

    /// Forward a click to whichever web view the ray hits.
    fn pick_web_view(&mut self, click: Vec2, origin: Vec3, ray: Vec3);
    fn destroy_web_view(&mut self, view: WebViewHandle);
}
