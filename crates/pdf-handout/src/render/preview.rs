//! Raster preview of handout sheets
//!
//! Draws each planned sheet into an RGBA image: page images scaled into
//! their slots, slot frames and ruled notes lines. Labels are left to the
//! PDF export.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use image::imageops::{self, FilterType};
use image::{Pixel, Rgba, RgbaImage};

use crate::constants::{
    PIXELS_PER_MM, PREVIEW_FRAME_COLOR, PREVIEW_MAX_ZOOM, PREVIEW_MIN_CONTENT_PX,
    PREVIEW_MIN_ZOOM, PREVIEW_NOTES_LINE_COLOR,
};
use crate::layout::{
    LayoutCache, LayoutPlan, Origin, Rect, calculate_notes_layout, content_area, fit_page,
    notes_lines,
};
use crate::output_plan::{OutputPagePlan, OutputPlan};
use crate::source::RasterPageProvider;
use crate::types::*;

const ORIGIN: Origin = Origin::TopLeft;

/// Monotonic render generation shared between a preview and its owner.
///
/// Advancing the generation (for example when a new source is loaded)
/// makes every render started under an older generation stop with
/// [`HandoutError::Superseded`]. The last request wins.
#[derive(Debug, Default)]
pub struct PreviewGeneration(AtomicU64);

impl PreviewGeneration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> u64 {
        self.0.load(Ordering::Acquire)
    }

    /// Start a new generation and return it
    pub fn advance(&self) -> u64 {
        self.0.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Fail with `Superseded` unless `generation` is still current
    pub fn ensure_current(&self, generation: u64) -> Result<()> {
        if self.current() == generation {
            Ok(())
        } else {
            Err(HandoutError::Superseded { generation })
        }
    }
}

/// Renders planned sheets into raster images
#[derive(Debug, Clone)]
pub struct PreviewRenderer {
    zoom: f64,
    generation: Arc<PreviewGeneration>,
}

impl PreviewRenderer {
    pub fn new(generation: Arc<PreviewGeneration>) -> Self {
        Self {
            zoom: 1.0,
            generation,
        }
    }

    /// Set the zoom factor, clamped to the supported range
    pub fn with_zoom(mut self, zoom: f64) -> Self {
        self.zoom = if zoom.is_finite() {
            zoom.clamp(PREVIEW_MIN_ZOOM, PREVIEW_MAX_ZOOM)
        } else {
            1.0
        };
        self
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn generation(&self) -> &Arc<PreviewGeneration> {
        &self.generation
    }

    /// Render every sheet of a plan, one image per sheet.
    ///
    /// Each call starts a new generation, so an earlier render still in
    /// flight stops with `Superseded` at its next page.
    pub async fn render<P: RasterPageProvider>(
        &self,
        plan: &OutputPlan,
        source: &P,
    ) -> Result<Vec<RgbaImage>> {
        let generation = self.generation.advance();
        let mut layouts = LayoutCache::new();
        let mut sheets = Vec::with_capacity(plan.len());

        for sheet in plan {
            let layout = layouts.get_or_build(&sheet.settings)?;
            sheets.push(self.render_sheet(sheet, layout, source, generation).await?);
        }

        log::info!(
            "Rendered {} preview sheets at {:.0}% (generation {})",
            sheets.len(),
            self.zoom * 100.0,
            generation
        );
        Ok(sheets)
    }

    /// Render one sheet under the given generation
    pub async fn render_sheet<P: RasterPageProvider>(
        &self,
        sheet: &OutputPagePlan,
        layout: &LayoutPlan,
        source: &P,
        generation: u64,
    ) -> Result<RgbaImage> {
        self.generation.ensure_current(generation)?;

        let zoom = self.zoom;
        let to_px = |mm: f64| mm * PIXELS_PER_MM * zoom;
        let width = scaled_extent(layout.sheet_width_px, zoom);
        let height = scaled_extent(layout.sheet_height_px, zoom);
        let mut canvas = RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255]));
        let settings = &sheet.settings;
        let min_content = PREVIEW_MIN_CONTENT_PX * zoom;

        let slots = layout.slots_mm.iter().zip(&layout.slots_px);
        for ((slot_mm, slot_px), &page_index) in slots.zip(&sheet.page_indices) {
            let slot = ORIGIN.rect(height as f64, &slot_px.to_rect().map(|v| v * zoom));
            let notes = calculate_notes_layout(slot_mm.width, slot_mm.height, &settings.notes);

            let mut content = content_area(&slot, &notes, to_px);
            content.width = content.width.max(min_content);
            content.height = content.height.max(min_content);

            let image = source.page_image(page_index).await?;
            self.generation.ensure_current(generation)?;

            let fitted = fit_page(
                &content,
                image.width() as f64,
                image.height() as f64,
                settings.scale,
            );
            let target_w = fitted.rect.width.round().max(1.0) as u32;
            let target_h = fitted.rect.height.round().max(1.0) as u32;
            let resized = imageops::resize(&*image, target_w, target_h, FilterType::Triangle);
            imageops::overlay(
                &mut canvas,
                &resized,
                fitted.rect.x.round() as i64,
                fitted.rect.y.round() as i64,
            );

            if settings.show_frame {
                let thickness = (1.2 * zoom).max(1.0);
                stroke_rect(&mut canvas, &slot, thickness, Rgba(PREVIEW_FRAME_COLOR));
            }

            let thickness = (0.9 * zoom).max(1.0);
            for line in notes_lines(slot_mm, &notes) {
                let y = ORIGIN.point_y(height as f64, to_px(line.y1));
                fill_rect(
                    &mut canvas,
                    &Rect::new(
                        to_px(line.x1),
                        y - thickness / 2.0,
                        to_px(line.x2 - line.x1),
                        thickness,
                    ),
                    Rgba(PREVIEW_NOTES_LINE_COLOR),
                );
            }
        }

        Ok(canvas)
    }
}

fn scaled_extent(px: i64, zoom: f64) -> u32 {
    (px as f64 * zoom).round().max(1.0) as u32
}

/// Blend a color over every pixel the rectangle covers, clipped to the image
fn fill_rect(image: &mut RgbaImage, rect: &Rect, color: Rgba<u8>) {
    let x0 = rect.x.round().max(0.0) as u32;
    let y0 = rect.y.round().max(0.0) as u32;
    let x1 = (rect.right().round().max(0.0) as u32).min(image.width());
    let y1 = (rect.bottom().round().max(0.0) as u32).min(image.height());

    for y in y0..y1 {
        for x in x0..x1 {
            image.get_pixel_mut(x, y).blend(&color);
        }
    }
}

fn stroke_rect(image: &mut RgbaImage, rect: &Rect, thickness: f64, color: Rgba<u8>) {
    let t = thickness.min(rect.width / 2.0).min(rect.height / 2.0).max(0.0);
    let inner_height = rect.height - 2.0 * t;
    fill_rect(image, &Rect::new(rect.x, rect.y, rect.width, t), color);
    fill_rect(image, &Rect::new(rect.x, rect.bottom() - t, rect.width, t), color);
    fill_rect(image, &Rect::new(rect.x, rect.y + t, t, inner_height), color);
    fill_rect(
        image,
        &Rect::new(rect.right() - t, rect.y + t, t, inner_height),
        color,
    );
}
