mod encoder;
mod export_overlay;
mod export_target;
mod frame;
mod headless_surface;
mod primitives;
mod surface;

pub use encoder::{EncodedImage, ImageEncoder, SvgEncoder};
pub use export_overlay::{ExportOverlay, NO_DATA_TEXT, OverlayCorner, OverlayStyle};
pub use export_target::{DirectoryExportTarget, ExportTarget, ExportedFile, InMemoryExportTarget};
pub use frame::RenderFrame;
pub use headless_surface::HeadlessSurface;
pub use primitives::{
    Color, LinePrimitive, RectPrimitive, TextHAlign, TextPrimitive, estimate_text_width_px,
};
pub use surface::{LineTraceOptions, PanelRenderSpec, RenderSurface, SurfaceHandle};

#[cfg(feature = "cairo-backend")]
mod cairo_backend;
#[cfg(feature = "cairo-backend")]
pub use cairo_backend::{CairoPngEncoder, CairoRenderStats};
