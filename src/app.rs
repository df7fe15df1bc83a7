//! Main application module for tocrail
//!
//! This module contains the eframe App implementation: it owns the rendered
//! page, drives the TOC controller once per frame, and feeds the controller's
//! scroll commands back into the reading view and the TOC panel.

use eframe::egui::{self, Id, Vec2};
use log::{debug, info, warn};
use std::time::{Duration, Instant};

use crate::config::{save_config_silent, Settings};
use crate::content::{render_markdown, ContentTree, LayoutMetrics, NodeId, Page, Viewport};
use crate::document::Document;
use crate::toc::{TocCommand, TocController};
use crate::ui::{
    apply_theme, HoverChange, Palette, ReadingView, TocPanel, TocPanelOutput, TocRail,
};
use crate::watcher::{DocumentEvent, DocumentWatcher};

/// Tag of the element the note is rendered into.
const CONTENT_TAG: &str = "article";

/// Smallest gap between the window edge and the rail/panel.
const EDGE_MARGIN: f32 = 8.0;

/// Panel slide-in time.
const REVEAL_SECONDS: f32 = 0.15;

/// Repaint cadence while a watcher may deliver events.
const WATCH_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// The content container: first `article` under the document.
pub fn locate_content_root(tree: &ContentTree) -> Option<NodeId> {
    tree.children(tree.document())
        .iter()
        .copied()
        .find(|n| tree.tag(*n) == Some(CONTENT_TAG))
}

/// Reading metrics scaled from the configured body font size.
pub fn layout_metrics(settings: &Settings) -> LayoutMetrics {
    let defaults = LayoutMetrics::default();
    let scale = settings.font_size / defaults.body_font_size;
    LayoutMetrics {
        body_font_size: settings.font_size,
        code_font_size: defaults.code_font_size * scale,
        block_spacing: defaults.block_spacing * scale,
        item_spacing: defaults.item_spacing * scale,
        list_indent: defaults.list_indent * scale,
        quote_indent: defaults.quote_indent * scale,
        ..defaults
    }
}

/// Top edge shared by the rail and the panel: vertically centered, kept off
/// the window edge.
pub fn overlay_top(viewport_height: f32, rail_height: f32) -> f32 {
    ((viewport_height - rail_height) / 2.0).max(EDGE_MARGIN)
}

// ─────────────────────────────────────────────────────────────────────────────
// TocRailApp
// ─────────────────────────────────────────────────────────────────────────────

/// The reader window.
pub struct TocRailApp {
    settings: Settings,
    document: Document,
    watcher: Option<DocumentWatcher>,

    page: Page,
    root: NodeId,
    toc: TocController,

    reading_view: ReadingView,
    rail: TocRail,
    panel: TocPanel,

    /// Column width the page was last laid out for
    layout_width: Option<f32>,
    layout_dirty: bool,
    last_viewport: Option<Vec2>,
    title: String,
    focused: bool,
    minimized: bool,
}

impl TocRailApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        settings: Settings,
        document: Document,
        watcher: Option<DocumentWatcher>,
    ) -> Self {
        apply_theme(&cc.egui_ctx, settings.theme);

        let mut page = Page::new(Viewport::new(
            settings.window_size.width,
            settings.window_size.height,
        ));
        let root = page.tree.create_element(CONTENT_TAG);
        let doc = page.tree.document();
        page.tree.append_child(doc, root);
        render_markdown(&mut page.tree, root, &document.source);

        let toc = TocController::new(settings.toc.to_options(), locate_content_root);
        let reading_view = ReadingView::new(layout_metrics(&settings), settings.reading_width);

        info!("Opened {}", document.title());

        Self {
            settings,
            document,
            watcher,
            page,
            root,
            toc,
            reading_view,
            rail: TocRail::new(),
            panel: TocPanel::new(),
            layout_width: None,
            layout_dirty: true,
            last_viewport: None,
            title: String::new(),
            focused: true,
            minimized: false,
        }
    }

    fn window_title(&self) -> String {
        format!("{} - tocrail", self.document.title())
    }

    /// Re-read the note after the watcher saw it change.
    fn handle_watcher_events(&mut self, now: Instant) {
        let Some(watcher) = &self.watcher else {
            return;
        };
        for event in watcher.poll_events() {
            match event {
                DocumentEvent::Changed => match self.document.reload() {
                    Ok(true) => {
                        info!("Reloaded {}", self.document.title());
                        render_markdown(&mut self.page.tree, self.root, &self.document.source);
                        self.layout_dirty = true;
                        self.toc.notify_content_changed(now);
                    }
                    Ok(false) => debug!("Watcher event without content change"),
                    Err(e) => warn!("Failed to reload note: {}", e),
                },
                DocumentEvent::Removed => {
                    warn!("{} was removed; keeping the last content", watcher.path().display())
                }
                DocumentEvent::Error(message) => warn!("File watcher error: {}", message),
            }
        }
    }

    /// Focus gained and minimize/restore both ask the TOC to resync.
    fn handle_window_state(&mut self, ctx: &egui::Context, now: Instant) {
        let (focused, minimized, inner, maximized) = ctx.input(|i| {
            let viewport = i.viewport();
            (
                viewport.focused.unwrap_or(self.focused),
                viewport.minimized.unwrap_or(false),
                viewport.inner_rect,
                viewport.maximized.unwrap_or(false),
            )
        });

        if focused && !self.focused {
            debug!("Window focused");
            self.toc.on_focus(now, &self.page);
        }
        if minimized != self.minimized {
            self.toc.on_visibility_change(now, &self.page, !minimized);
        }
        self.focused = focused;
        self.minimized = minimized;

        if let Some(rect) = inner {
            self.settings.window_size.maximized = maximized;
            if !maximized && !minimized {
                self.settings.window_size.width = rect.width();
                self.settings.window_size.height = rect.height();
            }
        }
    }

    /// Push the scroll area's size and offset into the page.
    fn sync_viewport(&mut self, now: Instant, size: Vec2, scroll_y: f32) {
        let resized = self
            .last_viewport
            .map(|last| (last - size).length() > 0.5)
            .unwrap_or(true);
        if resized {
            self.last_viewport = Some(size);
            self.page.viewport.width = size.x;
            self.page.viewport.height = size.y;
            self.toc.on_resize(now, &self.page);
        }

        if (self.page.viewport.scroll_y - scroll_y).abs() > f32::EPSILON {
            self.page.viewport.scroll_y = scroll_y;
            self.toc.on_scroll(&self.page);
        }
    }

    /// Paint the rail and panel and route their input to the controller.
    fn show_toc(&mut self, ctx: &egui::Context, palette: &Palette, now: Instant) {
        if self.toc.items().is_empty() {
            if self.rail.update_hover(false) == Some(HoverChange::Left) {
                self.toc.on_rail_pointer_leave();
            }
            return;
        }

        let expanded = self.toc.expand_state().is_expanded();
        let top = overlay_top(self.page.viewport.height, self.toc.rail_height_px());
        let reveal =
            ctx.animate_bool_with_time(Id::new("toc_panel_reveal"), expanded, REVEAL_SECONDS);

        let rail_output = self.rail.show(ctx, &self.toc, top, palette);
        let panel_output = if expanded || reveal > 0.0 {
            self.panel.show(ctx, &self.toc, top, reveal, palette, now)
        } else {
            TocPanelOutput::default()
        };

        if expanded {
            self.toc.set_panel_height(panel_output.panel_height);
            self.toc.register_list_geometry(panel_output.geometry);
        }

        match self.rail.update_hover(rail_output.hovered || panel_output.hovered) {
            Some(HoverChange::Entered) => self.toc.on_rail_pointer_enter(),
            Some(HoverChange::Left) => self.toc.on_rail_pointer_leave(),
            None => {}
        }

        if let Some(index) = rail_output.clicked_marker {
            self.toc.on_marker_click(index, &self.page);
        }
        if let Some(index) = panel_output.clicked_item {
            self.toc.on_item_click(index, &self.page);
        }
    }

    fn apply_commands(&mut self, now: Instant) {
        for command in self.toc.take_commands() {
            match command {
                TocCommand::ScrollWindowTo { top, smooth } => {
                    self.reading_view.scroll_to(top, smooth, now)
                }
                TocCommand::ScrollListTo { offset, smooth } => {
                    self.panel.scroll_to(offset, smooth, now)
                }
            }
        }
    }

    fn schedule_repaint(&self, ctx: &egui::Context, now: Instant) {
        if self.reading_view.is_animating()
            || self.panel.is_animating()
            || self.toc.has_pending_frame_work()
        {
            ctx.request_repaint();
            return;
        }
        let mut wait = self
            .toc
            .next_deadline()
            .map(|deadline| deadline.saturating_duration_since(now));
        if self.watcher.is_some() {
            wait = Some(wait.map_or(WATCH_POLL_INTERVAL, |w| w.min(WATCH_POLL_INTERVAL)));
        }
        if let Some(wait) = wait {
            ctx.request_repaint_after(wait);
        }
    }
}

impl eframe::App for TocRailApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        let palette = Palette::new(apply_theme(ctx, self.settings.theme));

        let title = self.window_title();
        if title != self.title {
            ctx.send_viewport_cmd(egui::ViewportCommand::Title(title.clone()));
            self.title = title;
        }

        self.handle_watcher_events(now);
        self.handle_window_state(ctx, now);

        let output = egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(palette.background))
            .show(ctx, |ui| {
                let width = ui.available_width();
                if self.layout_dirty || self.layout_width != Some(width) {
                    self.reading_view.relayout(ctx, &mut self.page, self.root, width);
                    self.layout_width = Some(width);
                    self.layout_dirty = false;
                }
                self.reading_view.show(ui, &self.page, self.root, &palette, now)
            })
            .inner;

        self.sync_viewport(now, output.viewport_size, output.scroll_y);

        if self.settings.toc.enabled {
            if !self.toc.is_mounted() {
                self.toc.mount(now, &self.page);
            }
            self.toc.tick(now, &self.page);
            self.show_toc(ctx, &palette, now);
            self.apply_commands(now);
        }

        self.schedule_repaint(ctx, now);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!("Application exiting");
        self.toc.unmount();
        if !save_config_silent(&self.settings) {
            warn!("Window size was not saved");
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
