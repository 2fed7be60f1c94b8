use std::path::PathBuf;

use anyhow::{Context, Result, bail};

use crate::capture::{CompositionSurface, SurfaceStyle};
use crate::cli::Cli;
use crate::config::StickerConfig;
use crate::core::picker::{self, AssetPicker, DialogPicker, PathPicker};
use crate::domain::{ImageReference, Size};
use crate::error::{ExportError, PickError};
use crate::export::{
    DirectoryAuthority, ExportPipeline, ExportResult, ExportTarget, FsStorage, PermissionAuthority,
    Storage,
};
use crate::render::Scene;
use crate::session::{GestureMsg, GestureTracker, OverlayStore};

/// Default surface size when there is no base image to take it from
pub const DEFAULT_VIEWPORT: Size = Size::new(400.0, 400.0);

/// One editing session: a base image, one sticker, and the export button
pub struct Editor<A, S> {
    store: OverlayStore,
    tracker: GestureTracker,
    surface: CompositionSurface,
    pipeline: ExportPipeline<A, S>,
}

impl<A: PermissionAuthority, S: Storage> Editor<A, S> {
    pub fn new(config: &StickerConfig, pipeline: ExportPipeline<A, S>) -> Self {
        let store = OverlayStore::new(config.default_position);
        let surface = CompositionSurface::new(store.reader(), SurfaceStyle::from(config));
        Self {
            tracker: GestureTracker::new(config.sticker_size),
            store,
            surface,
            pipeline,
        }
    }

    pub fn surface(&self) -> &CompositionSurface {
        &self.surface
    }

    pub fn store(&self) -> &OverlayStore {
        &self.store
    }

    pub fn pipeline(&self) -> &ExportPipeline<A, S> {
        &self.pipeline
    }

    /// Ask the picker for a base image; returns whether it changed
    pub async fn choose_base(&mut self, picker: &impl AssetPicker) -> Result<bool, PickError> {
        match picker.pick_image().await? {
            Some(image) => {
                log::info!("Base image selected: {:?}", image);
                self.surface.set_base(image);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Ask the picker for a sticker; returns whether it changed
    pub async fn choose_sticker(&mut self, picker: &impl AssetPicker) -> Result<bool, PickError> {
        match picker.pick_overlay().await? {
            Some(image) => {
                self.select_sticker(image);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn select_sticker(&mut self, image: ImageReference) {
        log::info!("Sticker selected: {:?}", image);
        self.tracker.cancel(&mut self.store);
        self.store.select_overlay(image);
    }

    pub fn clear_sticker(&mut self) {
        self.tracker.cancel(&mut self.store);
        self.store.clear_overlay();
    }

    /// Forward a pointer event from the presentation layer
    pub fn gesture(&mut self, msg: GestureMsg) {
        self.tracker.handle(&mut self.store, msg);
    }

    pub fn render(&self) -> Scene {
        self.surface.render()
    }

    /// The user left the view: stop dragging and detach the surface
    pub fn navigate_away(&mut self) {
        self.tracker.cancel(&mut self.store);
        self.surface.unmount();
    }

    pub async fn export(&self) -> Result<ExportResult, ExportError> {
        self.pipeline.export_composition(&self.surface).await
    }
}

/// Surface size: explicit, else the base image's own size
fn viewport(cli: &Cli, base: Option<&ImageReference>) -> Size {
    if let Some(size) = cli.viewport {
        return size;
    }
    base.and_then(ImageReference::path)
        .and_then(|p| image::image_dimensions(p).ok())
        .map(|(w, h)| Size::new(w as f32, h as f32))
        .unwrap_or(DEFAULT_VIEWPORT)
}

fn load_config(cli: &Cli) -> Result<StickerConfig> {
    let mut config = match &cli.config {
        Some(path) => StickerConfig::load_from(path)?,
        None => StickerConfig::load(),
    };
    cli.apply(&mut config);
    if cli.save_config {
        match &cli.config {
            Some(path) => config.save_to(path)?,
            None => config.save(),
        }
    }
    Ok(config)
}

async fn choose_assets<A, S, P>(editor: &mut Editor<A, S>, picker: &P) -> Result<()>
where
    A: PermissionAuthority,
    S: Storage,
    P: AssetPicker,
{
    if !editor.choose_base(picker).await.context("Could not pick an image")? {
        log::warn!("No base image selected");
    }
    if !editor
        .choose_sticker(picker)
        .await
        .context("Could not pick a sticker")?
    {
        log::warn!("No sticker selected");
    }
    Ok(())
}

/// Run one session from the command line
pub async fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;

    let target = match cli.output_target(&config) {
        Some(target) => target,
        None => ExportTarget::from_config(&config)
            .context("Could not determine a folder to save exports in")?,
    };
    let authority = DirectoryAuthority::new(target.dir.clone());
    let pipeline = ExportPipeline::new(authority, FsStorage, target);
    let mut editor = Editor::new(&config, pipeline);

    if cli.pick {
        choose_assets(&mut editor, &DialogPicker).await?;
    } else {
        let sticker: Option<PathBuf> = match (&cli.sticker, &cli.sticker_id) {
            (Some(path), _) => Some(path.clone()),
            (None, Some(id)) => Some(picker::catalog_sticker(&config, id)?),
            (None, None) => None,
        };
        let picker = PathPicker::new(cli.base.clone(), sticker);
        choose_assets(&mut editor, &picker).await?;
    }

    let size = viewport(&cli, editor.surface().base().as_ref());
    editor.surface().mount(size);

    for msg in cli.gestures()? {
        editor.gesture(msg);
    }

    let scene = editor.render();
    if scene.layers.is_empty() {
        bail!("Nothing to export: pass --base and/or --sticker");
    }
    if let Some(sticker) = scene.sticker() {
        log::info!("Sticker placed at {:?}", sticker.bounds.origin());
    }

    let result = editor.export().await?;
    println!("{}", result.locator.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use crate::domain::Position;
    use crate::export::{Access, Preapproved};

    fn write_png(dir: &std::path::Path, name: &str, w: u32, h: u32, rgba: [u8; 4]) -> PathBuf {
        let path = dir.join(name);
        image::RgbaImage::from_pixel(w, h, image::Rgba(rgba))
            .save(&path)
            .unwrap();
        path
    }

    fn editor(dir: &std::path::Path) -> Editor<Preapproved, FsStorage> {
        let config = StickerConfig::default();
        let target = ExportTarget {
            dir: dir.join("exports"),
            naming: config.naming.clone(),
            format: config.format,
        };
        Editor::new(
            &config,
            ExportPipeline::new(Preapproved(Access::Granted), FsStorage, target),
        )
    }

    #[tokio::test]
    async fn test_full_session() {
        let tmp = tempfile::tempdir().unwrap();
        let base = write_png(tmp.path(), "base.png", 300, 300, [0, 128, 0, 255]);
        let sticker = write_png(tmp.path(), "sticker.png", 50, 50, [255, 255, 0, 255]);

        let mut editor = editor(tmp.path());
        let picker = PathPicker::new(Some(base), Some(sticker));
        assert!(editor.choose_base(&picker).await.unwrap());
        assert!(editor.choose_sticker(&picker).await.unwrap());
        editor.surface().mount(Size::new(300.0, 300.0));

        editor.gesture(GestureMsg::Start(100.0, 100.0));
        editor.gesture(GestureMsg::Move(150.0, 140.0));
        editor.gesture(GestureMsg::End(150.0, 140.0));
        assert_eq!(editor.store().position(), Position::new(100.0, 90.0));

        let first = editor.export().await.unwrap();
        let second = editor.export().await.unwrap();
        assert_eq!(first.locator, second.locator);
        assert_eq!((second.width, second.height), (300, 300));
        assert!(second.locator.exists());
    }

    #[tokio::test]
    async fn test_canceled_pick_keeps_previous_sticker() {
        let tmp = tempfile::tempdir().unwrap();
        let sticker = write_png(tmp.path(), "s.png", 10, 10, [1, 2, 3, 255]);

        let mut editor = editor(tmp.path());
        editor
            .choose_sticker(&PathPicker::new(None, Some(sticker.clone())))
            .await
            .unwrap();
        let changed = editor.choose_sticker(&PathPicker::new(None, None)).await.unwrap();

        assert!(!changed);
        assert_eq!(
            editor.store().state().overlay,
            Some(ImageReference::from_path(sticker))
        );
    }

    #[tokio::test]
    async fn test_navigate_away_discards_and_stops_drag() {
        let tmp = tempfile::tempdir().unwrap();
        let sticker = write_png(tmp.path(), "s.png", 10, 10, [1, 2, 3, 255]);
        let mut editor = editor(tmp.path());
        editor.select_sticker(ImageReference::from_path(sticker));
        editor.surface().mount(Size::new(100.0, 100.0));

        editor.gesture(GestureMsg::Start(0.0, 0.0));
        editor.navigate_away();
        editor.gesture(GestureMsg::Move(90.0, 90.0));
        assert_eq!(editor.store().position(), Position::default());

        let err = editor.export().await.unwrap_err();
        assert!(matches!(err, ExportError::Capture(_)));
    }

    #[test]
    fn test_save_config_writes_back_to_given_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("custom.json");
        StickerConfig::default().save_to(&path).unwrap();

        let cli = Cli::try_parse_from([
            "stickerpea",
            "--config",
            path.to_str().unwrap(),
            "--sticker-size",
            "64x48",
            "--save-config",
        ])
        .unwrap();
        let config = load_config(&cli).unwrap();
        assert_eq!(config.sticker_size, Size::new(64.0, 48.0));

        let saved = StickerConfig::load_from(&path).unwrap();
        assert_eq!(saved.sticker_size, Size::new(64.0, 48.0));
    }

    #[test]
    fn test_clear_sticker_renders_base_only() {
        let tmp = tempfile::tempdir().unwrap();
        let mut editor = editor(tmp.path());
        editor.surface().set_base(ImageReference::from_path("/base.png"));
        editor.select_sticker(ImageReference::from_path("/sticker.png"));
        editor.clear_sticker();

        let scene = editor.render();
        assert!(scene.sticker().is_none());
        assert!(scene.base().is_some());
    }
}
