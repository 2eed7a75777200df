use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context as _;

use crate::assets::provider::{FsAssetProvider, normalize_rel_path};
use crate::assets::slots::TextureRole;
use crate::foundation::core::Canvas;
use crate::foundation::error::{StampError, StampResult};
use crate::render::frame::RenderThreading;
use crate::session::editor::EditorSession;
use crate::state::controller::TransformController;
use crate::state::render_state::RenderState;

/// A stamped-product scene as stored on disk (JSON).
///
/// Asset paths are relative to the directory holding the scene file.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SceneConfig {
    /// Display canvas the composite is evaluated in.
    pub viewport: Canvas,
    /// Product color image.
    pub product: String,
    /// Depth map aligned with the product. The product's red channel is used when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth: Option<String>,
    /// Pattern image; the product renders alone when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Initial state; values are clamped when the session starts.
    #[serde(default)]
    pub state: RenderState,
    /// Export resolution; the viewport size when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export: Option<Canvas>,
    /// Size the pattern to a third of the viewport's shorter side and center it, overriding the
    /// scale and translate in `state`.
    #[serde(default)]
    pub fit_pattern: bool,
    /// Per-pixel dispatch.
    #[serde(default)]
    pub threading: RenderThreading,
}

impl SceneConfig {
    /// Parse a scene from JSON text. Does not validate.
    pub fn from_json_str(s: &str) -> StampResult<Self> {
        serde_json::from_str(s).map_err(|e| StampError::serde(format!("parse scene JSON: {e}")))
    }

    /// Read and parse a scene file. Does not validate.
    pub fn load(path: &Path) -> StampResult<Self> {
        let f = File::open(path).with_context(|| format!("open scene '{}'", path.display()))?;
        serde_json::from_reader(BufReader::new(f))
            .map_err(|e| StampError::serde(format!("parse scene '{}': {e}", path.display())))
    }

    /// Pretty-printed JSON.
    pub fn to_json_pretty(&self) -> StampResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| StampError::serde(format!("serialize scene: {e}")))
    }

    /// Starter scene printed by `stampwarp defaults`.
    pub fn example() -> Self {
        Self {
            viewport: Canvas {
                width: 800,
                height: 600,
            },
            product: "product.png".to_owned(),
            depth: Some("product_depth.png".to_owned()),
            pattern: Some("pattern.png".to_owned()),
            state: RenderState::default(),
            export: None,
            fit_pattern: true,
            threading: RenderThreading::default(),
        }
    }

    /// Size frames are exported at.
    pub fn export_size(&self) -> Canvas {
        self.export.unwrap_or(self.viewport)
    }

    /// Reject empty canvases, unsafe asset paths and out-of-range state.
    pub fn validate(&self) -> StampResult<()> {
        if self.viewport.is_empty() {
            return Err(StampError::validation("scene viewport width and height must be > 0"));
        }
        if let Some(export) = self.export
            && export.is_empty()
        {
            return Err(StampError::validation("scene export width and height must be > 0"));
        }
        self.export_size().rgba8_len()?;

        normalize_rel_path(&self.product)
            .map_err(|e| StampError::validation(format!("scene product path: {e}")))?;
        for (role, path) in [
            (TextureRole::Depth, &self.depth),
            (TextureRole::Pattern, &self.pattern),
        ] {
            if let Some(p) = path {
                normalize_rel_path(p)
                    .map_err(|e| StampError::validation(format!("scene {role} path: {e}")))?;
            }
        }

        self.state.validate()?;
        if self.threading.threads == Some(0) {
            return Err(StampError::validation(
                "render threading 'threads' must be >= 1 when set",
            ));
        }
        Ok(())
    }

    /// Build a session with every asset loaded from `root`.
    ///
    /// Blocks until loads finish. Unlike the interactive path, a product that fails to load is
    /// an error here: there would be nothing to render.
    #[tracing::instrument(skip(self), fields(product = %self.product))]
    pub fn open_session(&self, root: &Path) -> StampResult<EditorSession> {
        self.validate()?;
        let provider = Arc::new(FsAssetProvider::new(root));
        let mut session = EditorSession::new(self.viewport, provider, self.threading.clone())?
            .with_controller(TransformController::from_state(self.state));

        session.select_product(&self.product, self.depth.as_deref());
        if let Some(pattern) = &self.pattern {
            session.select_pattern(pattern);
        }
        session.wait_for_loads();

        if !session.renderer().slots().is_bound(TextureRole::Product) {
            return Err(StampError::asset(format!(
                "product '{}' could not be loaded",
                self.product
            )));
        }
        if self.fit_pattern && !session.fit_pattern() {
            tracing::warn!("fit_pattern requested but no pattern is bound");
        }
        Ok(session)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/config.rs"]
mod tests;
