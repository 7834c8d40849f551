use std::{fs, path::Path};

use birdpoly_domain::{PtI, ShapeI};
use image::{Rgb, RgbImage};
use rusttype::{Font, Scale};
use tracing::info;

use crate::{
    annotation::Annotation,
    cfg::RenderCfg,
    file_util,
    result::{BirdError, BirdResult},
    store::AnnotationStore,
};

const TITLE_BG: Rgb<u8> = Rgb([255, 255, 255]);
const TITLE_FG: Rgb<u8> = Rgb([0, 0, 0]);
const DEFAULT_FONT_DATA: &[u8] = include_bytes!("../../resources/DejaVuSans/DejaVuSans.ttf");

/// Finds the annotation of an image that can be drawn, i.e., one that exists and is not
/// inconclusive.
pub fn drawable_annotation<'a>(
    store: &'a AnnotationStore,
    image_id: &str,
) -> BirdResult<&'a Annotation> {
    let anno = store
        .get(image_id)
        .ok_or_else(|| BirdError::MissingAnnotation {
            image_id: image_id.to_string(),
        })?;
    if anno.is_inconclusive() {
        Err(BirdError::InconclusiveRenderRequested {
            image_id: image_id.to_string(),
        })
    } else {
        Ok(anno)
    }
}

pub fn load_font(path: &Path) -> BirdResult<Font<'static>> {
    let bytes = fs::read(path)?;
    Font::try_from_vec(bytes).ok_or_else(|| BirdError::Other(format!("{path:?} is not a font")))
}

/// DejaVu Sans, shipped with the crate
pub fn default_font() -> BirdResult<Font<'static>> {
    Font::try_from_bytes(DEFAULT_FONT_DATA).ok_or_else(|| BirdError::new("bundled font broken"))
}

/// Pixel position on the figure, i.e., shifted down below the title band.
fn figure_coords(p: PtI, y_offset: u32) -> (f32, f32) {
    (p.x as f32, p.y as f32 + y_offset as f32)
}

fn draw_polyline(im: &mut RgbImage, pixels: &[PtI], y_offset: u32, color: Rgb<u8>) {
    for seg in pixels.windows(2) {
        imageproc::drawing::draw_line_segment_mut(
            im,
            figure_coords(seg[0], y_offset),
            figure_coords(seg[1], y_offset),
            color,
        );
    }
}

fn draw_title(im: &mut RgbImage, title: &str, height: u32, font: &Font) {
    let scale = Scale::uniform(height as f32 * 0.75);
    let (text_w, text_h) = imageproc::drawing::text_size(scale, font, title);
    let x = (im.width() as i32 - text_w).max(0) / 2;
    let y = (height as i32 - text_h).max(0) / 2;
    imageproc::drawing::draw_text_mut(im, TITLE_FG, x, y, scale, font, title);
}

/// Composes the figure: the image with the annotation's polygon drawn as polyline on top and
/// a band above the image carrying the image filename.
pub fn draw_overlay(
    im: &RgbImage,
    anno: &Annotation,
    font: &Font,
    render_cfg: &RenderCfg,
) -> BirdResult<RgbImage> {
    let polygon = anno.polygon().ok_or_else(|| BirdError::DegeneratePolygon {
        image_id: anno.image_id().to_string(),
        n_points: anno.points().len(),
    })?;
    let shape = ShapeI::from_im(im);
    let pixels = polygon.to_pixels(shape);
    let title_height = render_cfg.title_height;
    let mut figure = RgbImage::from_pixel(shape.w, shape.h + title_height, TITLE_BG);
    image::imageops::replace(&mut figure, im, 0, i64::from(title_height));
    draw_polyline(&mut figure, &pixels, title_height, Rgb(render_cfg.color));
    if title_height > 0 {
        draw_title(&mut figure, anno.image_id(), title_height, font);
    }
    Ok(figure)
}

/// Draws the annotation of the image at `img_path` and writes the figure to `output_path`.
/// Nothing is written if the image has no drawable annotation.
pub fn render_overlay(
    img_path: &Path,
    store: &AnnotationStore,
    output_path: &Path,
    render_cfg: &RenderCfg,
) -> BirdResult<()> {
    let image_id = file_util::filename(img_path)?;
    let anno = drawable_annotation(store, image_id)?;
    let font = match &render_cfg.font_path {
        Some(font_path) => load_font(font_path)?,
        None => default_font()?,
    };
    let im = image::open(img_path)?.to_rgb8();
    info!(
        "drawing {} points with label {} on {image_id} of shape {}x{}",
        anno.points().len(),
        anno.label(),
        im.width(),
        im.height()
    );
    let figure = draw_overlay(&im, anno, &font, render_cfg)?;
    figure.save(output_path)?;
    info!("saved figure to {output_path:?}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{annotation::pts, species::AbbrvTable};

    const GRAY: Rgb<u8> = Rgb([128, 128, 128]);

    fn make_store() -> AnnotationStore {
        let table = AbbrvTable::default();
        [
            Annotation::new(
                "BF045_x.jpg".to_string(),
                "present".to_string(),
                pts(&[(0.0, 0.0), (0.5, 0.0), (0.5, 0.5)]),
                &table,
            ),
            Annotation::inconclusive("WGR002.jpg".to_string(), &table),
        ]
        .into_iter()
        .collect::<Result<_, _>>()
        .unwrap()
    }

    #[test]
    fn test_drawable() {
        let store = make_store();
        assert!(drawable_annotation(&store, "BF045_x.jpg").is_ok());
        assert!(matches!(
            drawable_annotation(&store, "WGR002.jpg"),
            Err(BirdError::InconclusiveRenderRequested { .. })
        ));
        assert!(matches!(
            drawable_annotation(&store, "AMAV123.jpg"),
            Err(BirdError::MissingAnnotation { .. })
        ));
    }

    #[test]
    fn test_draw_overlay() {
        let store = make_store();
        let anno = store.get("BF045_x.jpg").unwrap();
        let im = RgbImage::from_pixel(100, 50, GRAY);
        let render_cfg = RenderCfg {
            title_height: 0,
            ..RenderCfg::default()
        };
        let font = default_font().unwrap();
        let figure = draw_overlay(&im, anno, &font, &render_cfg).unwrap();
        assert_eq!(figure.dimensions(), (100, 50));
        let red = Rgb([255, 0, 0]);
        // (0, 0) -> (50, 0) -> (50, 25)
        assert_eq!(*figure.get_pixel(0, 0), red);
        assert_eq!(*figure.get_pixel(25, 0), red);
        assert_eq!(*figure.get_pixel(50, 10), red);
        assert_eq!(*figure.get_pixel(50, 20), red);
        // the polyline is not closed
        assert_eq!(*figure.get_pixel(20, 10), GRAY);
        assert_eq!(*figure.get_pixel(90, 40), GRAY);
    }

    #[test]
    fn test_title_band() {
        let store = make_store();
        let anno = store.get("BF045_x.jpg").unwrap();
        let im = RgbImage::from_pixel(200, 50, GRAY);
        let render_cfg = RenderCfg::default();
        let th = render_cfg.title_height;
        let font = default_font().unwrap();
        let figure = draw_overlay(&im, anno, &font, &render_cfg).unwrap();
        assert_eq!(figure.dimensions(), (200, 50 + th));
        // the image sits below the band, the polygon moves with it
        assert_eq!(*figure.get_pixel(25, th), Rgb([255, 0, 0]));
        assert_eq!(*figure.get_pixel(20, th + 10), GRAY);
        assert_eq!(*figure.get_pixel(199, th + 49), GRAY);
        assert_eq!(*figure.get_pixel(0, 0), TITLE_BG);
        assert_eq!(*figure.get_pixel(199, th - 1), TITLE_BG);
        let n_text_pixels = (0..200)
            .flat_map(|x| (0..th).map(move |y| (x, y)))
            .filter(|(x, y)| *figure.get_pixel(*x, *y) != TITLE_BG)
            .count();
        assert!(n_text_pixels > 0);
    }

    #[test]
    fn test_figure_coords() {
        assert_eq!(figure_coords(PtI { x: 3, y: 4 }, 24), (3.0, 28.0));
        // far outside of the image
        let (x, y) = figure_coords(
            PtI {
                x: i32::MAX,
                y: i32::MAX,
            },
            24,
        );
        assert!(x > 2e9 && y > 2e9);
    }

    #[test]
    fn test_load_font() {
        assert!(matches!(
            load_font(Path::new("does/not/exist.ttf")),
            Err(BirdError::Io(_))
        ));
        let font_path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("resources/DejaVuSans/DejaVuSans.ttf");
        assert!(load_font(&font_path).is_ok());
        let not_a_font = crate::get_test_folder().join("birdpoly.toml");
        assert!(matches!(load_font(&not_a_font), Err(BirdError::Other(_))));
    }
}
