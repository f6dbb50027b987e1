//! Task icons.
//!
//! Icons are persisted as plain strings (`circle`, `data:...`, `url:...`, `svg:...`) and decoded
//! into [`IconRef`] once, when a task is loaded or imported.
use std::{fmt, path::Path};

use base64::{Engine, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};

const DATA_PREFIX: &str = "data:";
const URL_PREFIX: &str = "url:";
const SVG_PREFIX: &str = "svg:";

/// Vector shapes drawn directly by the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BuiltinShape {
    #[default]
    Circle,
    Rect,
    Triangle,
    Star,
    Cross,
}

impl BuiltinShape {
    pub const ALL: [BuiltinShape; 5] = [
        BuiltinShape::Circle,
        BuiltinShape::Rect,
        BuiltinShape::Triangle,
        BuiltinShape::Star,
        BuiltinShape::Cross,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BuiltinShape::Circle => "circle",
            BuiltinShape::Rect => "rect",
            BuiltinShape::Triangle => "triangle",
            BuiltinShape::Star => "star",
            BuiltinShape::Cross => "cross",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|shape| shape.name() == name)
    }
}

impl fmt::Display for BuiltinShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Reference to the icon drawn inside a task's marker.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum IconRef {
    /// One of the shapes the chart draws itself.
    Builtin(BuiltinShape),
    /// A self-contained raster image (`data:<mime>;base64,<payload>`).
    Embedded { mime: String, payload: String },
    /// An image fetched from a URL when first drawn.
    Remote(String),
    /// Base64-encoded SVG markup without the `<svg>` root element.
    InlineVector(String),
}

impl Default for IconRef {
    fn default() -> Self {
        IconRef::Builtin(BuiltinShape::default())
    }
}

/// Errors that can occur when decoding icon payloads.
#[derive(Debug, thiserror::Error)]
pub enum IconError {
    #[error("icon payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("vector icon markup is not valid UTF-8")]
    NotUtf8,
    #[error("icon has no inline payload")]
    NoPayload,
    #[error("no icon source given")]
    EmptySource,
    #[error("failed to read icon file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to fetch icon: {0}")]
    Fetch(#[from] reqwest::Error),
}

impl IconRef {
    /// Decode the persisted string form. Unknown names fall back to the default shape.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if let Some(rest) = raw.strip_prefix(URL_PREFIX) {
            return IconRef::Remote(rest.to_string());
        }
        if let Some(rest) = raw.strip_prefix(SVG_PREFIX) {
            return IconRef::InlineVector(rest.to_string());
        }
        if let Some(rest) = raw.strip_prefix(DATA_PREFIX)
            && let Some((mime, payload)) = rest.split_once(";base64,")
        {
            return IconRef::Embedded {
                mime: mime.to_string(),
                payload: payload.to_string(),
            };
        }
        BuiltinShape::from_name(raw)
            .map(IconRef::Builtin)
            .unwrap_or_default()
    }

    /// Build an inline vector icon from raw SVG markup.
    pub fn from_svg_markup(markup: &str) -> Self {
        IconRef::InlineVector(STANDARD.encode(markup.as_bytes()))
    }

    /// Build an embedded icon from raw image bytes.
    pub fn from_image_bytes(mime: impl Into<String>, bytes: &[u8]) -> Self {
        IconRef::Embedded {
            mime: mime.into(),
            payload: STANDARD.encode(bytes),
        }
    }

    /// Read an image file and embed it, guessing the mime type from the extension.
    pub fn from_image_file(path: &Path) -> Result<Self, IconError> {
        let bytes = std::fs::read(path)?;
        let mime = match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("jpg" | "jpeg") => "image/jpeg",
            Some("gif") => "image/gif",
            Some("webp") => "image/webp",
            Some("bmp") => "image/bmp",
            _ => "image/png",
        };
        Ok(Self::from_image_bytes(mime, &bytes))
    }

    /// Whether the icon needs an image load before it can be painted.
    pub fn needs_load(&self) -> bool {
        matches!(self, IconRef::Embedded { .. } | IconRef::Remote(_))
    }

    /// Decoded bytes of an embedded raster or inline vector.
    pub fn decode_payload(&self) -> Result<Vec<u8>, IconError> {
        match self {
            IconRef::Embedded { payload, .. } | IconRef::InlineVector(payload) => {
                Ok(STANDARD.decode(payload.trim())?)
            }
            IconRef::Builtin(_) | IconRef::Remote(_) => Err(IconError::NoPayload),
        }
    }

    /// The SVG fragment of an inline vector icon.
    pub fn svg_markup(&self) -> Result<String, IconError> {
        String::from_utf8(self.decode_payload()?).map_err(|_| IconError::NotUtf8)
    }

    /// A standalone SVG document of the given pixel size wrapping the inline fragment.
    pub fn svg_document(&self, size: f32) -> Result<String, IconError> {
        let markup = self.svg_markup()?;
        Ok(format!(
            "<svg xmlns='http://www.w3.org/2000/svg' width='{size}' height='{size}'>{markup}</svg>"
        ))
    }

    /// Short human-readable description of the icon kind.
    pub fn kind_description(&self) -> &'static str {
        match self {
            IconRef::Builtin(_) => "built-in shape",
            IconRef::Embedded { .. } => "local image",
            IconRef::Remote(_) => "web image",
            IconRef::InlineVector(_) => "custom SVG",
        }
    }
}

impl From<String> for IconRef {
    fn from(raw: String) -> Self {
        IconRef::parse(&raw)
    }
}

impl From<IconRef> for String {
    fn from(icon: IconRef) -> Self {
        icon.to_string()
    }
}

impl fmt::Display for IconRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IconRef::Builtin(shape) => write!(f, "{shape}"),
            IconRef::Embedded { mime, payload } => write!(f, "{DATA_PREFIX}{mime};base64,{payload}"),
            IconRef::Remote(url) => write!(f, "{URL_PREFIX}{url}"),
            IconRef::InlineVector(payload) => write!(f, "{SVG_PREFIX}{payload}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_each_variant() {
        assert_eq!(IconRef::parse("star"), IconRef::Builtin(BuiltinShape::Star));
        assert_eq!(
            IconRef::parse("url:https://example.com/a.png"),
            IconRef::Remote("https://example.com/a.png".into())
        );
        assert_eq!(
            IconRef::parse("svg:PGNpcmNsZS8+"),
            IconRef::InlineVector("PGNpcmNsZS8+".into())
        );
        assert_eq!(
            IconRef::parse("data:image/png;base64,AAAA"),
            IconRef::Embedded {
                mime: "image/png".into(),
                payload: "AAAA".into()
            }
        );
    }

    #[test]
    fn unknown_names_fall_back_to_circle() {
        assert_eq!(IconRef::parse("hexagon"), IconRef::default());
        assert_eq!(IconRef::parse(""), IconRef::default());
    }

    #[test]
    fn display_restores_persisted_form() {
        for raw in [
            "cross",
            "url:http://x/y.png",
            "svg:PGNpcmNsZS8+",
            "data:image/gif;base64,R0lG",
        ] {
            assert_eq!(IconRef::parse(raw).to_string(), raw);
        }
    }

    #[test]
    fn svg_markup_is_wrapped_in_document() {
        let icon = IconRef::from_svg_markup("<circle r='4'/>");
        assert_eq!(icon.svg_markup().unwrap(), "<circle r='4'/>");
        let doc = icon.svg_document(16.0).unwrap();
        assert!(doc.starts_with("<svg"));
        assert!(doc.contains("width='16'"));
        assert!(doc.ends_with("<circle r='4'/></svg>"));
    }

    #[test]
    fn builtin_and_remote_have_no_payload() {
        assert!(matches!(
            IconRef::default().decode_payload(),
            Err(IconError::NoPayload)
        ));
        assert!(IconRef::Remote("x".into()).needs_load());
        assert!(!IconRef::from_svg_markup("<g/>").needs_load());
    }

    #[test]
    fn serde_uses_string_form() {
        let json = serde_json::to_string(&IconRef::Builtin(BuiltinShape::Rect)).unwrap();
        assert_eq!(json, "\"rect\"");
        let icon: IconRef = serde_json::from_str("\"url:http://a\"").unwrap();
        assert_eq!(icon, IconRef::Remote("http://a".into()));
    }
}
