use serde_json::{Value, json};

use crate::export_plist::{AtlasMeta, format_point, format_rect, format_size};
use crate::model::FrameDescriptor;

/// JSON mirror of the plist: `{ frames: { name: {...} }, metadata, texture }`.
///
/// Frame values keep the plist string literals (`{{x,y},{w,h}}`), so loaders
/// written for the plist can reuse their parsing.
pub fn to_json_hash(frames: &[FrameDescriptor], meta: &AtlasMeta) -> Value {
    let mut map = serde_json::Map::new();
    for fr in frames {
        map.insert(
            fr.name.clone(),
            json!({
                "frame": format_rect(&fr.frame),
                "offset": format_point(&fr.offset),
                "rotated": fr.rotated,
                "sourceColorRect": format_rect(&fr.source_color_rect),
                "sourceSize": format_size(&fr.source_size),
            }),
        );
    }
    json!({
        "frames": map,
        "metadata": {
            "format": 2,
            "textureFileName": meta.texture_file_name,
            "realTextureFileName": meta.real_texture_file_name,
            "size": format_size(&meta.size),
        },
        "texture": {
            "width": meta.size.w,
            "height": meta.size.h,
        },
    })
}
