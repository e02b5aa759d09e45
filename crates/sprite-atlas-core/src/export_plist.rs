use serde::{Deserialize, Serialize};

use crate::model::{FrameDescriptor, Point, Rect, Size};

/// Atlas-level fields written next to the frames.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AtlasMeta {
    pub texture_file_name: String,
    pub real_texture_file_name: String,
    pub size: Size,
}

impl AtlasMeta {
    pub fn new(texture_file_name: impl Into<String>, canvas_size: u32) -> Self {
        let name = texture_file_name.into();
        Self {
            real_texture_file_name: name.clone(),
            texture_file_name: name,
            size: Size::new(canvas_size, canvas_size),
        }
    }
}

/// `{{x,y},{w,h}}`
pub fn format_rect(r: &Rect) -> String {
    format!("{{{{{},{}}},{{{},{}}}}}", r.x, r.y, r.w, r.h)
}

/// `{x,y}`
pub fn format_point(p: &Point) -> String {
    format!("{{{},{}}}", p.x, p.y)
}

/// `{w,h}`
pub fn format_size(s: &Size) -> String {
    format!("{{{},{}}}", s.w, s.h)
}

/// Build an Apple plist (XML, format 2) with frames in a dict keyed by file name.
///
/// Layout: `frames` (per-name `frame`, `offset`, `rotated`, `sourceColorRect`,
/// `sourceSize`), `metadata` (`format`, `textureFileName`, `realTextureFileName`,
/// `size`) and `texture` (`width`, `height`).
pub fn to_plist(frames: &[FrameDescriptor], meta: &AtlasMeta) -> String {
    let mut w = PlistWriter::default();
    w.line(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    w.line(r#"<!DOCTYPE plist PUBLIC "-//Apple Computer//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">"#);
    w.open(r#"plist version="1.0""#);
    w.open("dict");

    w.text("key", "frames");
    w.open("dict");
    for fr in frames {
        w.text("key", &fr.name);
        w.open("dict");
        w.text("key", "frame");
        w.text("string", &format_rect(&fr.frame));
        w.text("key", "offset");
        w.text("string", &format_point(&fr.offset));
        w.text("key", "rotated");
        w.empty(if fr.rotated { "true" } else { "false" });
        w.text("key", "sourceColorRect");
        w.text("string", &format_rect(&fr.source_color_rect));
        w.text("key", "sourceSize");
        w.text("string", &format_size(&fr.source_size));
        w.close("dict");
    }
    w.close("dict");

    w.text("key", "metadata");
    w.open("dict");
    w.text("key", "format");
    w.text("integer", "2");
    w.text("key", "textureFileName");
    w.text("string", &meta.texture_file_name);
    w.text("key", "realTextureFileName");
    w.text("string", &meta.real_texture_file_name);
    w.text("key", "size");
    w.text("string", &format_size(&meta.size));
    w.close("dict");

    w.text("key", "texture");
    w.open("dict");
    w.text("key", "width");
    w.text("integer", &meta.size.w.to_string());
    w.text("key", "height");
    w.text("integer", &meta.size.h.to_string());
    w.close("dict");

    w.close("dict");
    w.close("plist");
    w.out
}

/// Minimal indenting XML emitter; four spaces per level.
#[derive(Default)]
struct PlistWriter {
    out: String,
    depth: usize,
}

impl PlistWriter {
    fn line(&mut self, s: &str) {
        for _ in 0..self.depth {
            self.out.push_str("    ");
        }
        self.out.push_str(s);
        self.out.push('\n');
    }
    fn open(&mut self, start_tag: &str) {
        self.line(&format!("<{}>", start_tag));
        self.depth += 1;
    }
    fn close(&mut self, tag: &str) {
        self.depth = self.depth.saturating_sub(1);
        self.line(&format!("</{}>", tag));
    }
    fn text(&mut self, tag: &str, text: &str) {
        self.line(&format!("<{tag}>{}</{tag}>", xml_escape(text)));
    }
    fn empty(&mut self, tag: &str) {
        self.line(&format!("<{}/>", tag));
    }
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
