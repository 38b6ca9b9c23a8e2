//! Theme layout steps
//!
//! The release ships every theme under `templates/<theme>/`. The selected
//! theme replaces the default assets and views, its build config moves to
//! the project root and the templates tree is dropped.

use std::path::{Path, PathBuf};

use crate::app::models::ThemeName;
use crate::app::pipeline::PipelineStep;
use crate::constants::layout;

/// The five layout steps for `theme`, in execution order
pub fn theme_layout_steps(theme: &ThemeName) -> Vec<PipelineStep> {
    let theme_root = theme_directory(theme);

    vec![
        PipelineStep::remove([layout::ASSETS_DIR, layout::VIEWS_DIR]),
        PipelineStep::rename(theme_root.join(layout::THEME_ASSETS), layout::ASSETS_DIR),
        PipelineStep::rename(theme_root.join(layout::THEME_VIEWS), layout::VIEWS_DIR),
        PipelineStep::rename(theme_root.join(layout::BUILD_CONFIG), layout::BUILD_CONFIG),
        PipelineStep::remove([layout::TEMPLATES_DIR]),
    ]
}

/// `templates/<theme>` relative to the project root
pub fn theme_directory(theme: &ThemeName) -> PathBuf {
    Path::new(layout::TEMPLATES_DIR).join(theme.as_str())
}
