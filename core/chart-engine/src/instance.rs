//! FILENAME: core/chart-engine/src/instance.rs
//! PURPOSE: A mounted chart and its event contract with the host.
//! CONTEXT: Backends report clicks in their own payload shapes. The instance
//! decodes them through its backend and the encoded plan, so handlers always
//! receive an index into the processed data's `labels`.

use engine::{ChartLibrary, ProcessedData, Widget};
use serde_json::Value;
use std::fmt;

use crate::backend::{backend_for, ChartBackend, ChartRender};
use crate::encoding::{Hit, Placeholder};

/// Element click. `None` means the click hit empty space.
pub type ClickHandler = Box<dyn FnMut(Option<usize>) + Send>;
/// Element right-click with the originating pointer event.
pub type ContextMenuHandler = Box<dyn FnMut(&PointerEvent, Option<usize>) + Send>;

/// Pointer event as delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub client_x: f64,
    pub client_y: f64,
    default_prevented: bool,
}

impl PointerEvent {
    pub fn at(client_x: f64, client_y: f64) -> Self {
        PointerEvent {
            client_x,
            client_y,
            default_prevented: false,
        }
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

#[derive(Default)]
pub struct ChartHandlers {
    pub on_element_click: Option<ClickHandler>,
    pub on_element_context_menu: Option<ContextMenuHandler>,
}

impl ChartHandlers {
    pub fn on_click(mut self, handler: impl FnMut(Option<usize>) + Send + 'static) -> Self {
        self.on_element_click = Some(Box::new(handler));
        self
    }

    pub fn on_context_menu(
        mut self,
        handler: impl FnMut(&PointerEvent, Option<usize>) + Send + 'static,
    ) -> Self {
        self.on_element_context_menu = Some(Box::new(handler));
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerSize {
    pub width: f64,
    pub height: f64,
}

pub struct ChartInstance {
    backend: &'static dyn ChartBackend,
    render: ChartRender,
    handlers: ChartHandlers,
    size: Option<ContainerSize>,
    redraws: u32,
    disposed: bool,
}

impl fmt::Debug for ChartInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChartInstance")
            .field("library", &self.backend.library())
            .field("render", &self.render)
            .field("size", &self.size)
            .field("redraws", &self.redraws)
            .field("disposed", &self.disposed)
            .finish()
    }
}

/// Renders a widget through its configured library (ECharts when unset).
pub fn render(widget: &Widget, data: &ProcessedData, handlers: ChartHandlers) -> ChartInstance {
    let library = widget.chart_library.unwrap_or_default();
    ChartInstance::mount(backend_for(library), widget, data, handlers)
}

impl ChartInstance {
    pub fn mount(
        backend: &'static dyn ChartBackend,
        widget: &Widget,
        data: &ProcessedData,
        handlers: ChartHandlers,
    ) -> Self {
        ChartInstance {
            backend,
            render: backend.render(widget, data),
            handlers,
            size: None,
            redraws: 0,
            disposed: false,
        }
    }

    /// Re-renders in place after a data or configuration change.
    pub fn update(&mut self, widget: &Widget, data: &ProcessedData) {
        if self.disposed {
            return;
        }
        self.render = self.backend.render(widget, data);
        self.redraws += 1;
    }

    pub fn library(&self) -> ChartLibrary {
        self.backend.library()
    }

    pub fn rendered(&self) -> &ChartRender {
        &self.render
    }

    pub fn options(&self) -> Option<&Value> {
        self.render.options()
    }

    pub fn placeholder(&self) -> Option<&Placeholder> {
        self.render.placeholder()
    }

    /// Decodes a native payload to a position in `labels`.
    pub fn label_index(&self, native: Option<&Value>) -> Option<usize> {
        let hit = self.backend.resolve_hit(native?)?;
        self.render.encoded()?.label_index(hit)
    }

    pub fn handle_click(&mut self, native: Option<&Value>) {
        let index = self.label_index(native);
        if let Some(handler) = self.handlers.on_element_click.as_mut() {
            handler(index);
        }
    }

    /// Suppresses the browser menu and forwards the event.
    pub fn handle_context_menu(&mut self, event: &mut PointerEvent, native: Option<&Value>) {
        event.prevent_default();
        let index = self.label_index(native);
        if let Some(handler) = self.handlers.on_element_context_menu.as_mut() {
            handler(&*event, index);
        }
    }

    /// Tooltip text for a series / data position in render order.
    pub fn tooltip(&self, series: usize, index: usize) -> Option<String> {
        self.render.encoded()?.tooltip(Hit { series, data: index })
    }

    /// Tooltip text for a native hover payload.
    pub fn tooltip_for(&self, native: &Value) -> Option<String> {
        let hit = self.backend.resolve_hit(native)?;
        self.tooltip(hit.series, hit.data)
    }

    /// Applies a container size. Returns whether a redraw happened.
    pub fn resize(&mut self, width: f64, height: f64) -> bool {
        if self.disposed || width <= 0.0 || height <= 0.0 {
            return false;
        }
        let size = ContainerSize { width, height };
        if self.size == Some(size) {
            return false;
        }
        self.size = Some(size);
        self.redraws += 1;
        true
    }

    pub fn size(&self) -> Option<ContainerSize> {
        self.size
    }

    pub fn redraw_count(&self) -> u32 {
        self.redraws
    }

    /// Releases handlers. Later events and resizes are ignored.
    pub fn dispose(&mut self) {
        self.disposed = true;
        self.handlers = ChartHandlers::default();
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}
