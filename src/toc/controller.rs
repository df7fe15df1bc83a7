//! TOC controller
//!
//! Owns everything the rail and panel views read: the heading list, markers,
//! active range, expand state and layout. It binds to a content root supplied
//! by the host, watches it for changes and turns view events into
//! [`TocCommand`]s the host applies.
//!
//! # Event flow
//!
//! ```ignore
//! let mut toc = TocController::new(TocOptions::default(), find_article);
//! toc.mount(Instant::now(), &page);
//!
//! // every frame
//! toc.tick(Instant::now(), &page);
//! for command in toc.take_commands() {
//!     // apply scroll commands
//! }
//! ```
//!
//! Scrolling only recomputes positions. Content changes are debounced into a
//! single rescan per quiet period. Resize, focus and visibility rebind the
//! root before rescanning, since the host may have swapped it out.

use log::{debug, trace};
use std::time::{Duration, Instant};

use super::active_range::{resolve_active_range, ActiveRange};
use super::geometry::clamp;
use super::heading::{extract_toc_items, min_heading_level, signature, HeadingItem};
use super::layout::{compute_toc_layout, TocLayout, MIN_RAIL_HEIGHT_PX};
use super::markers::{compute_markers, redistribute_markers, TocMarker};
use super::resolver::resolve_heading_el;
use super::schedule::{Debouncer, IntervalTimer};
use crate::content::{ContentTree, NodeId, Page, Rect};

// ─────────────────────────────────────────────────────────────────────────────
// Options
// ─────────────────────────────────────────────────────────────────────────────

/// Padding band at the edges of the expanded list that triggers a keep-visible scroll.
pub const KEEP_VISIBLE_PADDING_PX: f32 = 32.0;

/// Runtime tuning for a [`TocController`].
#[derive(Debug, Clone, PartialEq)]
pub struct TocOptions {
    /// Cap on rail/panel height as a percentage of the window height
    pub max_vh: f32,
    /// Quiet period after the last content change before rescanning
    pub mutation_debounce: Duration,
    /// How often to look for the content root until it appears
    pub root_poll_interval: Duration,
    /// Distance between the window top and a heading after navigation
    pub reading_offset_px: f32,
    /// Inset from the window top where the reading band starts
    pub visible_top_inset_px: f32,
    /// Inset from the window bottom where the reading band ends
    pub visible_bottom_inset_px: f32,
}

impl Default for TocOptions {
    fn default() -> Self {
        Self {
            max_vh: 100.0,
            mutation_debounce: Duration::from_millis(250),
            root_poll_interval: Duration::from_millis(300),
            reading_offset_px: 80.0,
            visible_top_inset_px: 80.0,
            visible_bottom_inset_px: 40.0,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Read model types
// ─────────────────────────────────────────────────────────────────────────────

/// Side effects for the host to perform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TocCommand {
    /// Scroll the reading view so `top` (page coordinates) is at the window top
    ScrollWindowTo { top: f32, smooth: bool },
    /// Scroll the expanded heading list to `offset`
    ScrollListTo { offset: f32, smooth: bool },
}

/// How the TOC is currently presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExpandState {
    /// Only the rail of markers is shown
    #[default]
    Collapsed,
    /// The panel is open because the pointer is over the rail
    HoverExpanded,
    /// The panel stays open because there is room beside the content
    DefaultExpanded,
}

impl ExpandState {
    pub fn is_expanded(self) -> bool {
        !matches!(self, ExpandState::Collapsed)
    }
}

/// Vertical extent of one row in the expanded list, relative to the list's content top.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowSpan {
    pub top: f32,
    pub height: f32,
}

impl RowSpan {
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }
}

/// Measurements of the expanded list reported by the panel view each frame.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListGeometry {
    pub scroll_offset: f32,
    pub viewport_height: f32,
    /// One entry per heading, in list order
    pub rows: Vec<RowSpan>,
}

impl ListGeometry {
    fn max_offset(&self) -> f32 {
        let content = self.rows.last().map(RowSpan::bottom).unwrap_or(0.0);
        (content - self.viewport_height).max(0.0)
    }
}

/// What the rail view needs to draw one dot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RailMarker {
    pub index: usize,
    pub display_top_ratio: f32,
    /// Indentation relative to the shallowest heading
    pub depth: usize,
    pub active: bool,
    pub in_visible_range: bool,
}

/// Work deferred to the next frame so the panel has been laid out first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameTask {
    CenterActiveItem,
    KeepActiveItemVisible,
}

// ─────────────────────────────────────────────────────────────────────────────
// TocController
// ─────────────────────────────────────────────────────────────────────────────

type RootLocator = Box<dyn Fn(&ContentTree) -> Option<NodeId>>;

/// Stateful TOC orchestrator, one per mounted reading view.
pub struct TocController {
    options: TocOptions,
    locate_root: RootLocator,

    mounted: bool,
    root: Option<NodeId>,
    observed_epoch: Option<u64>,
    debounce: Debouncer,
    root_poll: IntervalTimer,
    frame_tasks: Vec<FrameTask>,
    commands: Vec<TocCommand>,

    items: Vec<HeadingItem>,
    items_signature: String,
    markers: Vec<TocMarker>,
    markers_rail_height: f32,
    active_index: usize,
    visible_range: ActiveRange,
    hover_expanded: bool,
    last_expand_state: ExpandState,
    layout: TocLayout,
    panel_height_px: Option<f32>,
    list_geometry: Option<ListGeometry>,
    viewport_height: f32,
    position_tick: u64,
    extraction_count: u64,
}

impl TocController {
    /// Create a controller. `locate_root` returns the content container
    /// currently mounted in the tree, or `None` before it exists.
    pub fn new<F>(options: TocOptions, locate_root: F) -> Self
    where
        F: Fn(&ContentTree) -> Option<NodeId> + 'static,
    {
        let debounce = Debouncer::new(options.mutation_debounce);
        let root_poll = IntervalTimer::new(options.root_poll_interval);
        Self {
            options,
            locate_root: Box::new(locate_root),
            mounted: false,
            root: None,
            observed_epoch: None,
            debounce,
            root_poll,
            frame_tasks: Vec::new(),
            commands: Vec::new(),
            items: Vec::new(),
            items_signature: String::new(),
            markers: Vec::new(),
            markers_rail_height: 0.0,
            active_index: 0,
            visible_range: ActiveRange::default(),
            hover_expanded: false,
            last_expand_state: ExpandState::Collapsed,
            layout: TocLayout::default(),
            panel_height_px: None,
            list_geometry: None,
            viewport_height: 0.0,
            position_tick: 0,
            extraction_count: 0,
        }
    }

    pub fn options(&self) -> &TocOptions {
        &self.options
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Lifecycle
    // ─────────────────────────────────────────────────────────────────────────

    /// Bind to the root if it exists (polling for it otherwise) and scan.
    pub fn mount(&mut self, now: Instant, page: &Page) {
        debug!("TOC mounted");
        self.mounted = true;
        self.viewport_height = page.viewport.height;
        self.rebind_and_rescan(now, page);
    }

    /// Stop all timers and forget the root and every derived value.
    pub fn unmount(&mut self) {
        debug!("TOC unmounted");
        self.mounted = false;
        self.root = None;
        self.observed_epoch = None;
        self.debounce.cancel();
        self.root_poll.stop();
        self.frame_tasks.clear();
        self.commands.clear();
        self.items.clear();
        self.items_signature.clear();
        self.markers.clear();
        self.active_index = 0;
        self.visible_range = ActiveRange::default();
        self.hover_expanded = false;
        self.last_expand_state = ExpandState::Collapsed;
        self.panel_height_px = None;
        self.list_geometry = None;
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn is_bound(&self) -> bool {
        self.root.is_some()
    }

    /// Advance timers and deferred work. Call once per frame.
    ///
    /// Order: deferred frame tasks, root polling, change observation,
    /// then the debounced rescan.
    pub fn tick(&mut self, now: Instant, page: &Page) {
        if !self.mounted {
            return;
        }

        self.run_frame_tasks();

        if self.root_poll.fire_due(now) && self.bind(now, page) {
            self.rescan(page);
        }

        if let Some(root) = self.root {
            if !page.tree.is_connected(root) {
                debug!("TOC root went away, rebinding");
                self.root = None;
                self.observed_epoch = None;
                if self.bind(now, page) {
                    self.rescan(page);
                }
            }
        }

        if self.root.is_some() {
            let epoch = page.tree.mutation_epoch();
            if self.observed_epoch != Some(epoch) {
                self.observed_epoch = Some(epoch);
                self.debounce.schedule(now);
            }
        }

        if self.debounce.fire_due(now) {
            self.rescan(page);
        }
    }

    /// Earliest instant a timer wants to fire, for scheduling the next repaint.
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.debounce.next_deadline(), self.root_poll.next_deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Whether deferred list scrolls are waiting for the next frame. Hosts
    /// should repaint promptly while this holds.
    pub fn has_pending_frame_work(&self) -> bool {
        self.mounted && !self.frame_tasks.is_empty()
    }

    /// Drain queued side effects.
    pub fn take_commands(&mut self) -> Vec<TocCommand> {
        std::mem::take(&mut self.commands)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Host events
    // ─────────────────────────────────────────────────────────────────────────

    /// The content changed outside the tree's own change tracking.
    pub fn notify_content_changed(&mut self, now: Instant) {
        if self.mounted {
            self.debounce.schedule(now);
        }
    }

    pub fn on_resize(&mut self, now: Instant, page: &Page) {
        if !self.mounted {
            return;
        }
        self.viewport_height = page.viewport.height;
        self.rebind_and_rescan(now, page);
    }

    pub fn on_focus(&mut self, now: Instant, page: &Page) {
        if self.mounted {
            self.rebind_and_rescan(now, page);
        }
    }

    /// Only becoming visible matters; hidden views keep their stale state.
    pub fn on_visibility_change(&mut self, now: Instant, page: &Page, visible: bool) {
        if self.mounted && visible {
            self.rebind_and_rescan(now, page);
        }
    }

    /// Hot path: recompute the active range and nothing else.
    pub fn on_scroll(&mut self, page: &Page) {
        if !self.mounted {
            return;
        }
        trace!("TOC scroll at {:.1}", page.viewport.scroll_y);
        self.recompute_positions(page);
    }

    pub fn on_rail_pointer_enter(&mut self) {
        if self.expand_state() == ExpandState::DefaultExpanded {
            return;
        }
        self.hover_expanded = true;
        self.apply_expand_state();
    }

    pub fn on_rail_pointer_leave(&mut self) {
        self.hover_expanded = false;
        self.apply_expand_state();
    }

    /// Scroll the reading view to the heading at `index`. Returns whether a
    /// scroll was queued.
    pub fn on_item_click(&mut self, index: usize, page: &Page) -> bool {
        let Some(item) = self.items.get(index) else {
            return false;
        };
        // Detached headings have no meaningful geometry.
        let Some(rect) = resolve_heading_el(&page.tree, item, self.root)
            .filter(|el| page.tree.is_connected(*el))
            .and_then(|el| page.tree.rect(el))
        else {
            debug!("TOC click on unresolvable heading '{}'", item.text);
            return false;
        };

        let top = clamp(
            rect.top - self.options.reading_offset_px,
            0.0,
            page.max_scroll(),
        );
        debug!("TOC navigate to '{}' at {:.0}", item.text, top);
        self.commands
            .push(TocCommand::ScrollWindowTo { top, smooth: true });
        true
    }

    pub fn on_marker_click(&mut self, marker_index: usize, page: &Page) -> bool {
        self.on_item_click(marker_index, page)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Measurements
    // ─────────────────────────────────────────────────────────────────────────

    /// Rendered height of the expanded panel. Ignored while collapsed.
    pub fn set_panel_height(&mut self, height_px: f32) {
        if !self.expand_state().is_expanded() || !height_px.is_finite() {
            return;
        }
        if self.panel_height_px != Some(height_px) {
            self.panel_height_px = Some(height_px);
            self.sync_marker_spacing();
        }
    }

    pub fn register_list_geometry(&mut self, geometry: ListGeometry) {
        if self.expand_state().is_expanded() {
            self.list_geometry = Some(geometry);
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Read model
    // ─────────────────────────────────────────────────────────────────────────

    pub fn items(&self) -> &[HeadingItem] {
        &self.items
    }

    pub fn markers(&self) -> &[TocMarker] {
        &self.markers
    }

    /// Markers flattened for drawing.
    pub fn rail_markers(&self) -> Vec<RailMarker> {
        let min_level = self.min_heading_level();
        self.markers
            .iter()
            .map(|m| RailMarker {
                index: m.index,
                display_top_ratio: m.display_top_ratio,
                depth: m.item.depth(min_level),
                active: m.index == self.active_index,
                in_visible_range: self.visible_range.contains(m.index),
            })
            .collect()
    }

    /// Display ratios bounding the visible range on the rail, `(0, 0)` when empty.
    pub fn visible_band_ratios(&self) -> (f32, f32) {
        let ratio_at = |i: usize| self.markers.get(i).map(|m| m.display_top_ratio);
        match (
            ratio_at(self.visible_range.start_idx),
            ratio_at(self.visible_range.end_idx),
        ) {
            (Some(start), Some(end)) => (start, end.max(start)),
            _ => (0.0, 0.0),
        }
    }

    pub fn active_index(&self) -> usize {
        self.active_index
    }

    pub fn visible_range(&self) -> ActiveRange {
        self.visible_range
    }

    pub fn expand_state(&self) -> ExpandState {
        if self.layout.show_expanded_by_default {
            ExpandState::DefaultExpanded
        } else if self.hover_expanded {
            ExpandState::HoverExpanded
        } else {
            ExpandState::Collapsed
        }
    }

    /// Rail height: follows the measured panel while expanded, else the
    /// heading-count derived height.
    pub fn rail_height_px(&self) -> f32 {
        match (self.expand_state().is_expanded(), self.panel_height_px) {
            (true, Some(panel)) => clamp(
                panel,
                MIN_RAIL_HEIGHT_PX,
                self.layout.viewport_max_height_px,
            ),
            _ => self.layout.rail_height_px,
        }
    }

    pub fn rail_left_px(&self) -> f32 {
        self.layout.rail_left_px
    }

    pub fn panel_width_px(&self) -> f32 {
        self.layout.panel_width_px
    }

    pub fn panel_left_px(&self) -> f32 {
        self.layout.panel_left_px
    }

    pub fn panel_offset_px(&self) -> f32 {
        self.layout.panel_offset_px
    }

    /// CSS-style max-height expression, for hosts that speak CSS.
    pub fn panel_max_height_css(&self) -> String {
        format!("min(calc(100vh - 0.75rem), {}vh)", self.options.max_vh)
    }

    pub fn panel_max_height_px(&self) -> f32 {
        self.layout.viewport_max_height_px
    }

    pub fn min_heading_level(&self) -> u8 {
        min_heading_level(&self.items)
    }

    /// Bumped on every position recompute, including pure scrolls.
    pub fn position_tick(&self) -> u64 {
        self.position_tick
    }

    /// Number of extraction passes run since creation.
    pub fn extraction_count(&self) -> u64 {
        self.extraction_count
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internals
    // ─────────────────────────────────────────────────────────────────────────

    /// Look the root up again. Starts polling when it is missing.
    fn bind(&mut self, now: Instant, page: &Page) -> bool {
        let found = (self.locate_root)(&page.tree).filter(|r| page.tree.is_connected(*r));
        match found {
            Some(root) => {
                if self.root != Some(root) {
                    debug!("TOC bound to content root {:?}", root);
                }
                self.root = Some(root);
                self.observed_epoch = Some(page.tree.mutation_epoch());
                self.root_poll.stop();
                true
            }
            None => {
                self.root = None;
                self.observed_epoch = None;
                if !self.root_poll.is_running() {
                    debug!("TOC root not mounted yet, polling");
                    self.root_poll.start(now);
                }
                false
            }
        }
    }

    fn rebind_and_rescan(&mut self, now: Instant, page: &Page) {
        self.bind(now, page);
        self.rescan(page);
    }

    /// Extraction, layout refresh and position recompute.
    fn rescan(&mut self, page: &Page) {
        self.debounce.cancel();
        self.extraction_count += 1;

        let fresh = extract_toc_items(&page.tree, self.root);
        let fresh_signature = signature(&fresh);
        if fresh_signature != self.items_signature {
            debug!("TOC headings changed: {} items", fresh.len());
            self.items = fresh;
            self.items_signature = fresh_signature;
        } else {
            // Same headings; only refresh the cached element handles.
            for (item, fresh) in self.items.iter_mut().zip(fresh) {
                item.element = fresh.element;
            }
        }

        self.refresh_layout(page);
        self.refresh_markers(&page.tree);
        self.recompute_positions(page);
    }

    fn refresh_layout(&mut self, page: &Page) {
        let root_rect = self
            .root
            .and_then(|r| page.client_rect(r))
            .unwrap_or_default();
        self.layout = compute_toc_layout(
            root_rect,
            &page.viewport,
            self.options.max_vh,
            self.items.len(),
        );
        self.apply_expand_state();
    }

    fn refresh_markers(&mut self, tree: &ContentTree) {
        let rail_height = self.rail_height_px();
        let root = self.root;
        self.markers = compute_markers(tree, &self.items, root, rail_height, |item| {
            resolve_heading_el(tree, item, root)
        });
        self.markers_rail_height = rail_height;
    }

    /// Respread marker display ratios when the rail height moved.
    fn sync_marker_spacing(&mut self) {
        let rail_height = self.rail_height_px();
        if (rail_height - self.markers_rail_height).abs() > f32::EPSILON {
            redistribute_markers(&mut self.markers, rail_height);
            self.markers_rail_height = rail_height;
        }
    }

    /// React to a change of expand state.
    fn apply_expand_state(&mut self) {
        let state = self.expand_state();
        if state != self.last_expand_state {
            if state.is_expanded() {
                self.frame_tasks.retain(|t| *t != FrameTask::KeepActiveItemVisible);
                if !self.frame_tasks.contains(&FrameTask::CenterActiveItem) {
                    self.frame_tasks.push(FrameTask::CenterActiveItem);
                }
            } else {
                self.panel_height_px = None;
                self.list_geometry = None;
                self.frame_tasks.clear();
            }
            self.last_expand_state = state;
        }
        self.sync_marker_spacing();
    }

    /// Absolute heading tops; unresolved headings reuse the previous top so
    /// the sequence stays sorted.
    fn heading_tops(&self, tree: &ContentTree, root_rect: Rect) -> Vec<f32> {
        let mut previous = root_rect.top;
        self.items
            .iter()
            .map(|item| {
                let top = resolve_heading_el(tree, item, self.root)
                    .filter(|el| tree.is_connected(*el))
                    .and_then(|el| tree.rect(el))
                    .map(|r| r.top)
                    .unwrap_or(previous);
                previous = top;
                top
            })
            .collect()
    }

    fn recompute_positions(&mut self, page: &Page) {
        self.position_tick += 1;

        let root_rect = self.root.and_then(|r| page.tree.rect(r));
        let range = match root_rect {
            Some(root_rect) if !self.items.is_empty() => {
                let tops = self.heading_tops(&page.tree, root_rect);
                let viewport = &page.viewport;
                let band_top = (viewport.scroll_y + self.options.visible_top_inset_px)
                    .max(root_rect.top);
                let band_bottom = (viewport.scroll_y + viewport.height
                    - self.options.visible_bottom_inset_px)
                    .min(root_rect.bottom())
                    .max(band_top);
                resolve_active_range(&tops, band_top, band_bottom)
            }
            _ => ActiveRange::default(),
        };

        self.visible_range = range;
        if range.start_idx != self.active_index {
            trace!("TOC active heading {} -> {}", self.active_index, range.start_idx);
            self.active_index = range.start_idx;
            if self.expand_state().is_expanded()
                && !self.frame_tasks.contains(&FrameTask::CenterActiveItem)
                && !self.frame_tasks.contains(&FrameTask::KeepActiveItemVisible)
            {
                self.frame_tasks.push(FrameTask::KeepActiveItemVisible);
            }
        }
    }

    /// Run work queued for this frame. Tasks that need list geometry wait
    /// until the panel has reported it.
    fn run_frame_tasks(&mut self) {
        if self.frame_tasks.is_empty() {
            return;
        }
        let tasks = std::mem::take(&mut self.frame_tasks);
        for task in tasks {
            let geometry = match &self.list_geometry {
                Some(g) if g.rows.len() > self.active_index => g,
                _ => {
                    if self.expand_state().is_expanded() {
                        self.frame_tasks.push(task);
                    }
                    continue;
                }
            };
            let row = geometry.rows[self.active_index];
            let command = match task {
                FrameTask::CenterActiveItem => {
                    let centered = row.top + row.height / 2.0 - geometry.viewport_height / 2.0;
                    Some(TocCommand::ScrollListTo {
                        offset: clamp(centered, 0.0, geometry.max_offset()),
                        smooth: false,
                    })
                }
                FrameTask::KeepActiveItemVisible => {
                    keep_visible_offset(geometry, row).map(|offset| TocCommand::ScrollListTo {
                        offset,
                        smooth: true,
                    })
                }
            };
            if let Some(command) = command {
                self.commands.push(command);
            }
        }
    }
}

/// New list offset when `row` sits inside the padding band at either edge.
fn keep_visible_offset(geometry: &ListGeometry, row: RowSpan) -> Option<f32> {
    let view_top = geometry.scroll_offset;
    let view_bottom = view_top + geometry.viewport_height;
    let target = if row.top < view_top + KEEP_VISIBLE_PADDING_PX {
        row.top - KEEP_VISIBLE_PADDING_PX
    } else if row.bottom() > view_bottom - KEEP_VISIBLE_PADDING_PX {
        row.bottom() - geometry.viewport_height + KEEP_VISIBLE_PADDING_PX
    } else {
        return None;
    };
    let offset = clamp(target, 0.0, geometry.max_offset());
    ((offset - view_top).abs() > 0.5).then_some(offset)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{
        layout_blocks, render_markdown, EstimatedMeasure, LayoutMetrics, Viewport,
    };

    fn find_article(tree: &ContentTree) -> Option<NodeId> {
        tree.children(tree.document())
            .iter()
            .copied()
            .find(|n| tree.tag(*n) == Some("article"))
    }

    fn long_note() -> String {
        let mut source = String::from("# Title\n\n");
        for section in 1..=12 {
            source.push_str(&format!("## Section {section}\n\n"));
            for _ in 0..6 {
                source.push_str("Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do eiusmod tempor incididunt ut labore et dolore magna aliqua.\n\n");
            }
        }
        source
    }

    fn relayout(page: &mut Page, root: NodeId) {
        layout_blocks(
            &mut page.tree,
            root,
            300.0,
            0.0,
            700.0,
            &LayoutMetrics::default(),
            &EstimatedMeasure::default(),
        );
    }

    fn mount_note(page: &mut Page, source: &str) -> NodeId {
        let root = page.tree.create_element("article");
        let doc = page.tree.document();
        page.tree.append_child(doc, root);
        render_markdown(&mut page.tree, root, source);
        relayout(page, root);
        root
    }

    fn mounted(width: f32) -> (Page, NodeId, TocController, Instant) {
        let mut page = Page::new(Viewport::new(width, 800.0));
        let root = mount_note(&mut page, &long_note());
        let mut toc = TocController::new(TocOptions::default(), find_article);
        let now = Instant::now();
        toc.mount(now, &page);
        (page, root, toc, now)
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_mount_extracts_headings_without_title() {
        let (_page, _root, toc, _) = mounted(1600.0);
        assert!(toc.is_bound());
        assert_eq!(toc.items().len(), 12);
        assert_eq!(toc.items()[0].text, "Section 1");
        assert_eq!(toc.markers().len(), 12);
        assert_eq!(toc.min_heading_level(), 2);
        assert_eq!(toc.extraction_count(), 1);
    }

    #[test]
    fn test_debounce_coalesces_mutations_into_one_extraction() {
        let (mut page, root, mut toc, start) = mounted(1600.0);
        let paragraph = page.tree.children(root)[2];

        for i in 0..10u64 {
            page.tree.set_text(paragraph, &format!("edit {i}"));
            toc.tick(start + ms(i * 20), &page);
        }
        assert_eq!(toc.extraction_count(), 1);

        toc.tick(start + ms(180 + 249), &page);
        assert_eq!(toc.extraction_count(), 1);
        toc.tick(start + ms(180 + 250), &page);
        assert_eq!(toc.extraction_count(), 2);

        toc.tick(start + ms(2000), &page);
        assert_eq!(toc.extraction_count(), 2);
    }

    #[test]
    fn test_notify_content_changed_is_debounced() {
        let (page, _root, mut toc, start) = mounted(1600.0);
        for i in 0..5u64 {
            toc.notify_content_changed(start + ms(i * 10));
        }
        toc.tick(start + ms(100), &page);
        assert_eq!(toc.extraction_count(), 1);
        toc.tick(start + ms(40 + 250), &page);
        assert_eq!(toc.extraction_count(), 2);
    }

    #[test]
    fn test_polls_until_root_appears() {
        let mut page = Page::new(Viewport::new(1600.0, 800.0));
        let mut toc = TocController::new(TocOptions::default(), find_article);
        let start = Instant::now();
        toc.mount(start, &page);
        assert!(!toc.is_bound());
        assert!(toc.items().is_empty());
        assert!(toc.markers().is_empty());
        assert!(toc.next_deadline().is_some());

        mount_note(&mut page, &long_note());
        toc.tick(start + ms(299), &page);
        assert!(!toc.is_bound());

        toc.tick(start + ms(300), &page);
        assert!(toc.is_bound());
        assert_eq!(toc.items().len(), 12);
        assert_eq!(toc.next_deadline(), None);
    }

    #[test]
    fn test_rerendered_root_is_rebound() {
        let (mut page, root, mut toc, start) = mounted(1600.0);
        page.tree.remove(root);
        let source = "## Only\n\ntext\n\n## Two\n\nmore";
        mount_note(&mut page, source);

        toc.tick(start + ms(16), &page);
        assert!(toc.is_bound());
        assert_eq!(toc.items().len(), 2);
    }

    #[test]
    fn test_unchanged_headings_keep_list_but_refresh_handles() {
        let (mut page, root, mut toc, start) = mounted(1600.0);
        let before = toc.items()[3].element;

        render_markdown(&mut page.tree, root, &long_note());
        relayout(&mut page, root);
        toc.tick(start, &page);
        toc.tick(start + ms(250), &page);

        assert_eq!(toc.extraction_count(), 2);
        assert_eq!(toc.items().len(), 12);
        assert_ne!(toc.items()[3].element, before);
        assert!(page.tree.is_connected(toc.items()[3].element));
    }

    #[test]
    fn test_scroll_moves_active_index() {
        let (mut page, _root, mut toc, _) = mounted(1600.0);
        assert_eq!(toc.active_index(), 0);
        let tick = toc.position_tick();

        let fifth = page.tree.rect(toc.items()[4].element).map(|r| r.top).unwrap_or(0.0);
        page.scroll_to(fifth - 80.0 + 1.0);
        toc.on_scroll(&page);

        assert_eq!(toc.active_index(), 4);
        assert!(toc.visible_range().end_idx >= 4);
        assert!(toc.position_tick() > tick);
        assert_eq!(toc.extraction_count(), 1);

        let (band_top, band_bottom) = toc.visible_band_ratios();
        assert!(band_top <= band_bottom);
        let active: Vec<usize> = toc
            .rail_markers()
            .iter()
            .filter(|m| m.active)
            .map(|m| m.index)
            .collect();
        assert_eq!(active, vec![4]);
    }

    #[test]
    fn test_item_click_scrolls_to_reading_offset() {
        let (page, _root, mut toc, _) = mounted(1600.0);
        let top = page.tree.rect(toc.items()[6].element).map(|r| r.top).unwrap_or(0.0);

        assert!(toc.on_item_click(6, &page));
        let expected = (top - 80.0).clamp(0.0, page.max_scroll());
        assert_eq!(
            toc.take_commands(),
            vec![TocCommand::ScrollWindowTo {
                top: expected,
                smooth: true
            }]
        );
        assert!(toc.take_commands().is_empty());
    }

    #[test]
    fn test_click_on_missing_heading_is_noop() {
        let (mut page, root, mut toc, _) = mounted(1600.0);
        assert!(!toc.on_item_click(99, &page));

        page.tree.clear_children(root);
        assert!(!toc.on_marker_click(0, &page));
        assert!(toc.take_commands().is_empty());
    }

    #[test]
    fn test_wide_window_is_default_expanded_and_ignores_hover() {
        let (_page, _root, mut toc, _) = mounted(1600.0);
        assert_eq!(toc.expand_state(), ExpandState::DefaultExpanded);
        toc.on_rail_pointer_enter();
        toc.on_rail_pointer_leave();
        assert_eq!(toc.expand_state(), ExpandState::DefaultExpanded);
    }

    #[test]
    fn test_hover_expands_and_centers_active_item() {
        let (page, _root, mut toc, start) = mounted(1100.0);
        assert_eq!(toc.expand_state(), ExpandState::Collapsed);

        toc.on_rail_pointer_enter();
        assert_eq!(toc.expand_state(), ExpandState::HoverExpanded);

        // Nothing to center against until the panel reports its rows.
        toc.tick(start + ms(16), &page);
        assert!(toc.take_commands().is_empty());

        let rows = (0..12)
            .map(|i| RowSpan {
                top: i as f32 * 24.0,
                height: 24.0,
            })
            .collect();
        toc.register_list_geometry(ListGeometry {
            scroll_offset: 0.0,
            viewport_height: 120.0,
            rows,
        });
        toc.tick(start + ms(32), &page);
        assert_eq!(
            toc.take_commands(),
            vec![TocCommand::ScrollListTo {
                offset: 0.0,
                smooth: false
            }]
        );

        toc.on_rail_pointer_leave();
        assert_eq!(toc.expand_state(), ExpandState::Collapsed);
    }

    fn twelve_rows(viewport_height: f32) -> ListGeometry {
        ListGeometry {
            scroll_offset: 0.0,
            viewport_height,
            rows: (0..12)
                .map(|i| RowSpan {
                    top: i as f32 * 24.0,
                    height: 24.0,
                })
                .collect(),
        }
    }

    fn replace_root(page: &mut Page, root: NodeId) {
        page.tree.remove(root);
        mount_note(page, "## Only\n\ntext\n\n## Two\n\nmore");
    }

    #[test]
    fn test_active_change_while_expanded_scrolls_list_on_next_tick() {
        let (mut page, _root, mut toc, start) = mounted(1600.0);
        assert_eq!(toc.expand_state(), ExpandState::DefaultExpanded);
        assert!(toc.has_pending_frame_work());

        toc.register_list_geometry(twelve_rows(120.0));
        toc.tick(start + ms(16), &page);
        assert_eq!(
            toc.take_commands(),
            vec![TocCommand::ScrollListTo {
                offset: 0.0,
                smooth: false
            }]
        );
        assert!(!toc.has_pending_frame_work());

        let tenth = page.tree.rect(toc.items()[9].element).map(|r| r.top).unwrap_or(0.0);
        page.scroll_to(tenth - 80.0 + 1.0);
        toc.on_scroll(&page);
        assert_eq!(toc.active_index(), 9);
        // Pending until the host runs another frame; no timer covers it.
        assert!(toc.has_pending_frame_work());
        assert_eq!(toc.next_deadline(), None);

        toc.tick(start + ms(32), &page);
        assert_eq!(
            toc.take_commands(),
            vec![TocCommand::ScrollListTo {
                offset: 152.0,
                smooth: true
            }]
        );
        assert!(!toc.has_pending_frame_work());
    }

    #[test]
    fn test_collapsed_active_change_queues_no_frame_work() {
        let (mut page, _root, mut toc, _) = mounted(1100.0);
        let fifth = page.tree.rect(toc.items()[4].element).map(|r| r.top).unwrap_or(0.0);
        page.scroll_to(fifth - 80.0 + 1.0);
        toc.on_scroll(&page);
        assert_eq!(toc.active_index(), 4);
        assert!(!toc.has_pending_frame_work());
    }

    #[test]
    fn test_resize_rebinds_replaced_root() {
        let (mut page, root, mut toc, start) = mounted(1600.0);
        replace_root(&mut page, root);

        toc.on_resize(start, &page);
        assert!(toc.is_bound());
        assert_eq!(toc.items().len(), 2);
        assert_eq!(toc.extraction_count(), 2);
        assert_eq!(toc.expand_state(), ExpandState::DefaultExpanded);
    }

    #[test]
    fn test_focus_rebinds_replaced_root() {
        let (mut page, root, mut toc, start) = mounted(1600.0);
        replace_root(&mut page, root);

        toc.on_focus(start, &page);
        assert!(toc.is_bound());
        assert_eq!(toc.items().len(), 2);
        assert_eq!(toc.extraction_count(), 2);
    }

    #[test]
    fn test_only_becoming_visible_rebinds() {
        let (mut page, root, mut toc, start) = mounted(1600.0);
        replace_root(&mut page, root);

        toc.on_visibility_change(start, &page, false);
        assert_eq!(toc.extraction_count(), 1);
        assert_eq!(toc.items().len(), 12);

        toc.on_visibility_change(start, &page, true);
        assert!(toc.is_bound());
        assert_eq!(toc.extraction_count(), 2);
        assert_eq!(toc.items().len(), 2);
    }

    #[test]
    fn test_hover_to_default_expanded_recenters_list() {
        let (mut page, _root, mut toc, start) = mounted(1100.0);
        toc.on_rail_pointer_enter();
        toc.register_list_geometry(twelve_rows(120.0));
        toc.tick(start + ms(16), &page);
        assert_eq!(toc.take_commands().len(), 1);
        assert!(!toc.has_pending_frame_work());

        page.viewport.width = 1600.0;
        toc.on_resize(start + ms(20), &page);
        assert_eq!(toc.expand_state(), ExpandState::DefaultExpanded);
        assert!(toc.has_pending_frame_work());

        toc.tick(start + ms(32), &page);
        assert_eq!(
            toc.take_commands(),
            vec![TocCommand::ScrollListTo {
                offset: 0.0,
                smooth: false
            }]
        );
    }

    #[test]
    fn test_click_on_detached_heading_is_noop() {
        let (mut page, _root, mut toc, _) = mounted(1600.0);
        let element = toc.items()[3].element;
        page.tree.detach(element);
        assert!(page.tree.is_alive(element));

        assert!(!toc.on_item_click(3, &page));
        assert!(toc.take_commands().is_empty());
        // Other headings still navigate.
        assert!(toc.on_item_click(4, &page));
    }

    #[test]
    fn test_keep_visible_only_near_edges() {
        let geometry = ListGeometry {
            scroll_offset: 100.0,
            viewport_height: 200.0,
            rows: (0..20)
                .map(|i| RowSpan {
                    top: i as f32 * 20.0,
                    height: 20.0,
                })
                .collect(),
        };
        // Row fully inside the comfortable middle.
        assert_eq!(keep_visible_offset(&geometry, geometry.rows[9]), None);
        // Row in the bottom padding band.
        assert_eq!(keep_visible_offset(&geometry, geometry.rows[14]), Some(132.0));
        // Row above the top padding band.
        assert_eq!(keep_visible_offset(&geometry, geometry.rows[5]), Some(68.0));
    }

    #[test]
    fn test_panel_height_drives_rail_height_while_expanded() {
        let (_page, _root, mut toc, _) = mounted(1100.0);
        let collapsed = toc.rail_height_px();

        toc.set_panel_height(500.0);
        assert_eq!(toc.rail_height_px(), collapsed);

        toc.on_rail_pointer_enter();
        toc.set_panel_height(500.0);
        assert_eq!(toc.rail_height_px(), 500.0);
        toc.set_panel_height(5000.0);
        assert_eq!(toc.rail_height_px(), toc.panel_max_height_px());

        toc.on_rail_pointer_leave();
        assert_eq!(toc.rail_height_px(), collapsed);
    }

    #[test]
    fn test_unmount_clears_state_and_stops_ticking() {
        let (page, _root, mut toc, start) = mounted(1600.0);
        toc.notify_content_changed(start);
        toc.unmount();

        assert!(toc.items().is_empty());
        assert!(!toc.is_bound());
        assert_eq!(toc.next_deadline(), None);
        toc.tick(start + ms(1000), &page);
        assert_eq!(toc.extraction_count(), 1);
    }

    #[test]
    fn test_instances_are_independent() {
        let (page, _root, mut a, start) = mounted(1600.0);
        let mut b = TocController::new(TocOptions::default(), |_| None);
        b.mount(start, &page);

        assert_eq!(a.items().len(), 12);
        assert!(b.items().is_empty());
        a.notify_content_changed(start);
        assert!(b.next_deadline().is_some());
        assert!(!b.is_bound());
    }

    #[test]
    fn test_panel_max_height_css() {
        let toc = TocController::new(
            TocOptions {
                max_vh: 70.0,
                ..TocOptions::default()
            },
            find_article,
        );
        assert_eq!(
            toc.panel_max_height_css(),
            "min(calc(100vh - 0.75rem), 70vh)"
        );
    }
}
