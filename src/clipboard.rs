use crate::error::{AnnotatorError, Result};
use crate::raster::RasterBuffer;

/// Where clipboard images come from and go to.
pub trait ClipboardImageSource {
    /// The image currently on the clipboard, or `None` if there is none.
    fn read_image(&mut self) -> Option<RasterBuffer>;

    fn write_image(&mut self, buffer: &RasterBuffer) -> Result<()>;
}

/// The OS clipboard, via arboard.
///
/// One handle is opened on first use and kept, since on X11 and Wayland the
/// copied image is only served while it is alive. A handle that errors is
/// dropped and reopened on the next call.
#[derive(Default)]
pub struct SystemClipboard {
    handle: Option<arboard::Clipboard>,
}

impl std::fmt::Debug for SystemClipboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemClipboard")
            .field("connected", &self.is_connected())
            .finish()
    }
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a clipboard handle is currently open.
    pub fn is_connected(&self) -> bool {
        self.handle.is_some()
    }

    fn handle(&mut self) -> Result<&mut arboard::Clipboard> {
        if self.handle.is_none() {
            let clipboard =
                arboard::Clipboard::new().map_err(|err| AnnotatorError::Clipboard(err.to_string()))?;
            log::debug!("Opened system clipboard");
            self.handle = Some(clipboard);
        }
        self.handle
            .as_mut()
            .ok_or_else(|| AnnotatorError::Clipboard("clipboard unavailable".to_owned()))
    }

    fn disconnect(&mut self, err: &arboard::Error) {
        // Content-free reads are not a broken handle.
        if !matches!(err, arboard::Error::ContentNotAvailable) {
            self.handle = None;
        }
    }
}

impl ClipboardImageSource for SystemClipboard {
    fn read_image(&mut self) -> Option<RasterBuffer> {
        let result = match self.handle() {
            Ok(clipboard) => clipboard.get_image(),
            Err(err) => {
                log::debug!("Clipboard unavailable: {}", err);
                return None;
            }
        };

        match result {
            Ok(data) => RasterBuffer::from_clipboard_image(data),
            Err(err) => {
                log::debug!("No image on clipboard: {}", err);
                self.disconnect(&err);
                None
            }
        }
    }

    fn write_image(&mut self, buffer: &RasterBuffer) -> Result<()> {
        let result = self.handle()?.set_image(buffer.to_clipboard_image());
        result.map_err(|err| {
            self.disconnect(&err);
            AnnotatorError::Clipboard(err.to_string())
        })
    }
}
