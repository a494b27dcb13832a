//! A [`RenderSurface`] that keeps an in-memory scene and writes it as SVG.

use blockflow_canvas::{ConnectionCurve, RenderSurface};
use blockflow_core::{Block, BlockId};
use blockflow_graphics::{Path, Point, Rect, Size};
use blockflow_sanitize::sanitize_xhtml;
use std::collections::BTreeMap;
use std::fmt::Write as _;

const LINE_HEIGHT: f32 = 16.0;
const CHARS_PER_LINE: usize = 34;
const BODY_PADDING: f32 = 8.0;
const MARGIN: f32 = 40.0;
const XHTML_ROOT: &str =
    r#"<div xmlns="http://www.w3.org/1999/xhtml" xmlns:xlink="http://www.w3.org/1999/xlink">"#;

struct SvgBlock {
    name: String,
    /// Sanitized body re-serialized as XML so it can sit in the SVG tree.
    body: String,
    origin: Point,
    outline: Path,
    selected: bool,
}

/// Scene built from the canvas' surface calls.
pub struct SvgSurface {
    blocks: BTreeMap<BlockId, SvgBlock>,
    curves: Vec<ConnectionCurve>,
    preview: Option<(Point, Path)>,
    transform: (Point, f32),
    frames_requested: usize,
}

impl SvgSurface {
    pub fn new() -> Self {
        Self {
            blocks: BTreeMap::new(),
            curves: Vec::new(),
            preview: None,
            transform: (Point::ZERO, 1.0),
            frames_requested: 0,
        }
    }

    pub fn frames_requested(&self) -> usize {
        self.frames_requested
    }

    fn content_bounds(&self) -> Rect {
        self.blocks
            .values()
            .filter_map(|block| {
                block
                    .outline
                    .bounds()
                    .map(|rect| rect.translate(block.origin.x, block.origin.y))
            })
            .chain(self.curves.iter().filter_map(|curve| curve.path.bounds()))
            .reduce(|acc, rect| acc.union(&rect))
            .unwrap_or(Rect::new(0.0, 0.0, 0.0, 0.0))
    }

    /// Serializes the scene. The canvas transform is applied to one root group.
    pub fn to_svg(&self) -> String {
        let bounds = self.content_bounds();
        let (pan, zoom) = self.transform;
        let width = (bounds.right() + MARGIN) * zoom + pan.x;
        let height = (bounds.bottom() + MARGIN) * zoom + pan.y;

        let mut out = String::new();
        let _ = writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width:.0}" height="{height:.0}">"#
        );
        out.push_str(
            "<style>.block{fill:#4c97ff;stroke:#3373cc}.hat{fill:#ffbf00}.cap{fill:#cf63cf}\
             .c-block{fill:#ffab19}.selected{stroke:#000;stroke-width:2}\
             .connection{fill:none;stroke:#888;stroke-dasharray:4 3}\
             .preview{fill:#000;opacity:.15}</style>\n",
        );
        let _ = writeln!(
            out,
            r#"<g transform="translate({} {}) scale({})">"#,
            pan.x, pan.y, zoom
        );
        for curve in &self.curves {
            let _ = writeln!(
                out,
                r#"<path class="connection" d="{}"/>"#,
                curve.path.to_svg_d()
            );
        }
        if let Some((origin, outline)) = &self.preview {
            let _ = writeln!(
                out,
                r#"<path class="preview" transform="translate({} {})" d="{}"/>"#,
                origin.x,
                origin.y,
                outline.to_svg_d()
            );
        }
        for (id, block) in &self.blocks {
            let class = if block.selected {
                format!("block {} selected", block.name)
            } else {
                format!("block {}", block.name)
            };
            let _ = writeln!(
                out,
                r#"<g id="block-{id}" transform="translate({} {})"><path class="{}" d="{}"/><foreignObject x="8" y="24" width="224" height="{}">{XHTML_ROOT}{}</div></foreignObject></g>"#,
                block.origin.x,
                block.origin.y,
                escape_attribute(&class),
                block.outline.to_svg_d(),
                estimate_body(&block.body).map_or(24.0, |size| size.height),
                block.body
            );
        }
        out.push_str("</g>\n</svg>\n");
        out
    }
}

impl RenderSurface for SvgSurface {
    fn mount_block(&mut self, block: &Block, body: &str) {
        let entry = self.blocks.entry(block.id()).or_insert_with(|| SvgBlock {
            name: String::new(),
            body: String::new(),
            origin: block.position(),
            outline: Path::new(),
            selected: false,
        });
        entry.name = block.name().to_owned();
        entry.body = sanitize_xhtml(body);
    }

    fn unmount_block(&mut self, id: BlockId) {
        self.blocks.remove(&id);
    }

    fn place_block(&mut self, id: BlockId, origin: Point, outline: &Path) {
        if let Some(block) = self.blocks.get_mut(&id) {
            block.origin = origin;
            block.outline = outline.clone();
        }
    }

    fn measure_content(&mut self, id: BlockId, _width: f32) -> Option<Size> {
        estimate_body(&self.blocks.get(&id)?.body)
    }

    fn set_selected(&mut self, id: BlockId, selected: bool) {
        if let Some(block) = self.blocks.get_mut(&id) {
            block.selected = selected;
        }
    }

    fn set_transform(&mut self, pan: Point, zoom: f32) {
        self.transform = (pan, zoom);
    }

    fn draw_connections(&mut self, curves: &[ConnectionCurve]) {
        self.curves = curves.to_vec();
    }

    fn show_snap_preview(&mut self, origin: Point, outline: &Path) {
        self.preview = Some((origin, outline.clone()));
    }

    fn hide_snap_preview(&mut self) {
        self.preview = None;
    }

    fn request_frame(&mut self) {
        self.frames_requested += 1;
    }
}

/// Rough text metrics: visible characters wrapped at a fixed column.
fn estimate_body(body: &str) -> Option<Size> {
    let mut visible = 0usize;
    let mut in_tag = false;
    for ch in body.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => visible += 1,
            _ => {}
        }
    }
    if visible == 0 {
        return None;
    }
    let lines = visible.div_ceil(CHARS_PER_LINE);
    Some(Size::new(
        224.0,
        lines as f32 * LINE_HEIGHT + BODY_PADDING,
    ))
}

fn escape_attribute(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
}
