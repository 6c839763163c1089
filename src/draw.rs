//! Rasterize a [ViewTree] onto any [DrawTarget]. Layout is tuned for a
//! 296x128 panel, but the grid stretches to the target width.

use crate::{
    forecast::{ConditionIcon, ForecastPoint},
    view::{Toggle, ViewTree},
};
use anyhow::anyhow;
use embedded_graphics::{
    prelude::*,
    primitives::{
        Circle, Line, PrimitiveStyle, Rectangle, RoundedRectangle,
    },
};
use std::fmt::Debug;
use u8g2_fonts::{
    fonts,
    types::{FontColor, HorizontalAlignment, VerticalPosition},
    FontRenderer,
};

/// Monospace, 6px per character
fn font_small() -> FontRenderer {
    FontRenderer::new::<fonts::u8g2_font_6x10_tf>()
}

fn font_bold() -> FontRenderer {
    FontRenderer::new::<fonts::u8g2_font_helvB10_tf>()
}

/// Height of the title/toggle bar
const HEADER_HEIGHT: i32 = 14;
/// Height of the notice line under the grid
const NOTICE_HEIGHT: i32 = 10;
const GRID_COLUMNS: i32 = 3;
const GRID_ROWS: i32 = 2;
const GAP: i32 = 2;
/// Icons are drawn in a square box this big
pub const ICON_SIZE: u32 = 20;

/// Foreground and background colors, so we can draw on any color type
#[derive(Copy, Clone, Debug)]
pub struct Palette<C> {
    pub ink: C,
    pub paper: C,
}

/// Clear the target and draw the whole view on it
pub fn draw_view<D>(
    tree: &ViewTree,
    target: &mut D,
    palette: Palette<D::Color>,
) -> anyhow::Result<()>
where
    D: DrawTarget,
    D::Error: Debug,
{
    let bounds = target.bounding_box();
    target.clear(palette.paper).map_err(map_error)?;

    // Header: title on the left, mode toggles on the right
    font_small()
        .render_aligned(
            tree.title,
            Point::new(0, 2),
            VerticalPosition::Top,
            HorizontalAlignment::Left,
            FontColor::Transparent(palette.ink),
            target,
        )
        .map_err(map_error)?;
    let mut right = bounds.size.width as i32;
    for toggle in tree.toggles.iter().rev() {
        right -= draw_toggle(toggle, right, target, palette)? + GAP;
    }

    // 3x2 grid of cells, row by row
    let grid_top = HEADER_HEIGHT + GAP;
    let grid_height =
        bounds.size.height as i32 - grid_top - NOTICE_HEIGHT - GAP;
    let cell_size = Size::new(
        ((bounds.size.width as i32 - GAP * (GRID_COLUMNS - 1)) / GRID_COLUMNS)
            as u32,
        ((grid_height - GAP * (GRID_ROWS - 1)) / GRID_ROWS) as u32,
    );
    for (i, cell) in tree.cells.iter().enumerate() {
        let (column, row) = (i as i32 % GRID_COLUMNS, i as i32 / GRID_COLUMNS);
        let top_left = Point::new(
            column * (cell_size.width as i32 + GAP),
            grid_top + row * (cell_size.height as i32 + GAP),
        );
        draw_cell(
            cell,
            Rectangle::new(top_left, cell_size),
            target,
            palette,
        )?;
    }

    if let Some(notice) = &tree.notice {
        font_small()
            .render_aligned(
                notice.as_str(),
                Point::new(
                    bounds.size.width as i32 / 2,
                    bounds.size.height as i32 - NOTICE_HEIGHT,
                ),
                VerticalPosition::Top,
                HorizontalAlignment::Center,
                FontColor::Transparent(palette.ink),
                target,
            )
            .map_err(map_error)?;
    }
    Ok(())
}

/// Draw a toggle button with its right edge at `right`. Return its width.
/// The active toggle is drawn inverted.
fn draw_toggle<D>(
    toggle: &Toggle,
    right: i32,
    target: &mut D,
    palette: Palette<D::Color>,
) -> anyhow::Result<i32>
where
    D: DrawTarget,
    D::Error: Debug,
{
    // 6x10 font is monospace
    let width = toggle.label.len() as i32 * 6 + 8;
    let rect = Rectangle::new(
        Point::new(right - width, 0),
        Size::new(width as u32, HEADER_HEIGHT as u32),
    );
    let (style, text_color) = if toggle.active {
        (PrimitiveStyle::with_fill(palette.ink), palette.paper)
    } else {
        (PrimitiveStyle::with_stroke(palette.ink, 1), palette.ink)
    };
    RoundedRectangle::with_equal_corners(rect, Size::new(3, 3))
        .into_styled(style)
        .draw(target)
        .map_err(map_error)?;
    font_small()
        .render_aligned(
            toggle.label,
            rect.center(),
            VerticalPosition::Center,
            HorizontalAlignment::Center,
            FontColor::Transparent(text_color),
            target,
        )
        .map_err(map_error)?;
    Ok(width)
}

/// Draw one grid cell: label on top, icon bottom-left, temperature and
/// feels-like temperature bottom-right
fn draw_cell<D>(
    cell: &ForecastPoint,
    rect: Rectangle,
    target: &mut D,
    palette: Palette<D::Color>,
) -> anyhow::Result<()>
where
    D: DrawTarget,
    D::Error: Debug,
{
    RoundedRectangle::with_equal_corners(rect, Size::new(4, 4))
        .into_styled(PrimitiveStyle::with_stroke(palette.ink, 1))
        .draw(target)
        .map_err(map_error)?;

    let center_x = rect.top_left.x + rect.size.width as i32 / 2;
    font_small()
        .render_aligned(
            cell.label.as_str(),
            Point::new(center_x, rect.top_left.y + 3),
            VerticalPosition::Top,
            HorizontalAlignment::Center,
            FontColor::Transparent(palette.ink),
            target,
        )
        .map_err(map_error)?;

    let body_top = rect.top_left.y + 15;
    draw_icon(
        cell.condition_icon,
        Point::new(center_x - ICON_SIZE as i32 - 4, body_top),
        target,
        palette.ink,
    )
    .map_err(map_error)?;
    font_bold()
        .render_aligned(
            format_args!("{}°C", cell.temperature),
            Point::new(center_x + 2, body_top),
            VerticalPosition::Top,
            HorizontalAlignment::Left,
            FontColor::Transparent(palette.ink),
            target,
        )
        .map_err(map_error)?;
    font_small()
        .render_aligned(
            format_args!("{}°C", cell.feels_like),
            Point::new(center_x + 2, body_top + 13),
            VerticalPosition::Top,
            HorizontalAlignment::Left,
            FontColor::Transparent(palette.ink),
            target,
        )
        .map_err(map_error)?;
    Ok(())
}

/// Draw a condition glyph in the [ICON_SIZE] box at `top_left`. Every variant
/// has its own glyph; unrecognized names were already mapped to
/// [ConditionIcon::Cloud] when the data was parsed.
pub fn draw_icon<D: DrawTarget>(
    icon: ConditionIcon,
    top_left: Point,
    target: &mut D,
    color: D::Color,
) -> Result<(), D::Error> {
    let fill = PrimitiveStyle::with_fill(color);
    let stroke = PrimitiveStyle::with_stroke(color, 1);
    let at = |x, y| top_left + Point::new(x, y);

    match icon {
        ConditionIcon::Sun => {
            Circle::new(at(5, 5), 10).into_styled(fill).draw(target)?;
            let center = at(9, 9);
            for (dx, dy) in [
                (0, -1),
                (1, -1),
                (1, 0),
                (1, 1),
                (0, 1),
                (-1, 1),
                (-1, 0),
                (-1, -1),
            ] {
                Line::new(
                    center + Point::new(dx * 7, dy * 7),
                    center + Point::new(dx * 9, dy * 9),
                )
                .into_styled(stroke)
                .draw(target)?;
            }
        }
        ConditionIcon::Cloud => draw_cloud(at(0, 4), target, fill)?,
        ConditionIcon::Rain => {
            draw_cloud(at(0, 0), target, fill)?;
            for x in [5, 10, 15] {
                Line::new(at(x, 15), at(x - 2, 19))
                    .into_styled(stroke)
                    .draw(target)?;
            }
        }
        ConditionIcon::Snow => {
            draw_cloud(at(0, 0), target, fill)?;
            for (x, y) in [(4, 15), (10, 18), (16, 15)] {
                Rectangle::new(at(x, y), Size::new(2, 2))
                    .into_styled(fill)
                    .draw(target)?;
            }
        }
        ConditionIcon::Wind => {
            for (y, length) in [(5, 16), (10, 19), (15, 12)] {
                Line::new(at(0, y), at(length, y))
                    .into_styled(stroke)
                    .draw(target)?;
            }
            Line::new(at(16, 5), at(18, 3)).into_styled(stroke).draw(target)?;
            Line::new(at(12, 15), at(14, 17))
                .into_styled(stroke)
                .draw(target)?;
        }
    }
    Ok(())
}

/// Three puffs on a flat base, 20x13
fn draw_cloud<D: DrawTarget>(
    top_left: Point,
    target: &mut D,
    style: PrimitiveStyle<D::Color>,
) -> Result<(), D::Error> {
    let at = |x, y| top_left + Point::new(x, y);
    Circle::new(at(0, 5), 8).into_styled(style).draw(target)?;
    Circle::new(at(5, 0), 11).into_styled(style).draw(target)?;
    Circle::new(at(12, 4), 8).into_styled(style).draw(target)?;
    Rectangle::new(at(3, 8), Size::new(14, 5))
        .into_styled(style)
        .draw(target)
}

/// Drawing errors don't always implement Error so we have to map manually
fn map_error<E: Debug>(error: E) -> anyhow::Error {
    anyhow!("{error:?}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        forecast::{tests::fixed_forecast, ViewMode},
        frame::Frame,
        view::ForecastView,
    };
    use embedded_graphics::{
        mock_display::MockDisplay, pixelcolor::BinaryColor,
        primitives::ContainsPoint,
    };
    use rstest::rstest;

    const PALETTE: Palette<BinaryColor> = Palette {
        ink: BinaryColor::On,
        paper: BinaryColor::Off,
    };
    const PANEL: Size = Size::new(296, 128);

    fn icon_frame(icon: ConditionIcon) -> Frame {
        let mut frame = Frame::new(Size::new(ICON_SIZE, ICON_SIZE));
        draw_icon(icon, Point::zero(), &mut frame, BinaryColor::On).unwrap();
        frame
    }

    fn view_frame(view: &ForecastView) -> Frame {
        let mut frame = Frame::new(PANEL);
        draw_view(&view.render(), &mut frame, PALETTE).unwrap();
        frame
    }

    #[rstest]
    #[case::sun(ConditionIcon::Sun)]
    #[case::cloud(ConditionIcon::Cloud)]
    #[case::rain(ConditionIcon::Rain)]
    #[case::snow(ConditionIcon::Snow)]
    #[case::wind(ConditionIcon::Wind)]
    fn test_icon_fits_box(#[case] icon: ConditionIcon) {
        let mut display = MockDisplay::<BinaryColor>::new();
        display.set_allow_overdraw(true);
        draw_icon(icon, Point::zero(), &mut display, BinaryColor::On).unwrap();
        let area = display.affected_area();
        assert!(area.size.width <= ICON_SIZE);
        assert!(area.size.height <= ICON_SIZE);
    }

    #[test]
    fn test_icons_distinct() {
        let frames: Vec<Frame> =
            ConditionIcon::ALL.into_iter().map(icon_frame).collect();
        for (i, a) in frames.iter().enumerate() {
            for b in &frames[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_unknown_icon_draws_cloud() {
        assert_eq!(
            icon_frame(ConditionIcon::from_name("Hurricane")),
            icon_frame(ConditionIcon::Cloud)
        );
    }

    #[test]
    fn test_draw_view() {
        let frame = view_frame(&ForecastView::new(fixed_forecast(), None));
        // Every cell got something drawn in it
        let cell = Size::new(90, 45);
        for (x, y) in [(0, 16), (100, 16), (200, 16), (0, 70), (100, 70)] {
            assert!(
                frame.count_in(Point::new(x + 4, y + 4), cell, BinaryColor::On)
                    > 0
            );
        }
    }

    /// Every pixel that differs between two frames of the panel
    fn changed_points(a: &Frame, b: &Frame) -> Vec<Point> {
        (0..PANEL.height as i32)
            .flat_map(|y| (0..PANEL.width as i32).map(move |x| Point::new(x, y)))
            .filter(|&point| a.pixel(point) != b.pixel(point))
            .collect()
    }

    #[rstest]
    #[case::label(|point: &mut ForecastPoint| point.label = "09:00 PM".into())]
    #[case::icon(|point: &mut ForecastPoint| {
        point.condition_icon = ConditionIcon::Snow
    })]
    #[case::temperature(|point: &mut ForecastPoint| point.temperature = -3)]
    #[case::feels_like(|point: &mut ForecastPoint| point.feels_like = -8)]
    fn test_cell_value_drawn(#[case] edit: fn(&mut ForecastPoint)) {
        let before = view_frame(&ForecastView::new(fixed_forecast(), None));
        let mut forecast = fixed_forecast();
        edit(&mut forecast.hourly[0]);
        let after = view_frame(&ForecastView::new(forecast, None));

        // First cell is at the top-left of the grid
        let first_cell = Rectangle::new(Point::new(0, 16), Size::new(97, 49));
        let changed = changed_points(&before, &after);
        assert!(!changed.is_empty());
        assert!(changed.iter().all(|&point| first_cell.contains(point)));
    }

    #[test]
    fn test_temperatures_drawn_separately() {
        let draw_with = |temperature, feels_like| {
            let mut forecast = fixed_forecast();
            forecast.hourly[0].temperature = temperature;
            forecast.hourly[0].feels_like = feels_like;
            view_frame(&ForecastView::new(forecast, None))
        };
        // Same two numbers, swapped, must not look the same
        assert_ne!(draw_with(18, 14), draw_with(14, 18));
    }

    #[test]
    fn test_draw_view_by_mode() {
        let mut view = ForecastView::new(fixed_forecast(), None);
        let hourly = view_frame(&view);
        view.set_view_mode(ViewMode::Daily);
        let daily = view_frame(&view);
        assert_ne!(hourly, daily);
        view.set_view_mode(ViewMode::Hourly);
        assert_eq!(view_frame(&view), hourly);
    }

    #[test]
    fn test_draw_notice() {
        let plain = view_frame(&ForecastView::new(fixed_forecast(), None));
        let noticed = view_frame(&ForecastView::new(
            fixed_forecast(),
            Some("Forecast unavailable".into()),
        ));
        // Notice only touches the bottom line
        let grid = Size::new(296, 110);
        assert_eq!(
            plain.count_in(Point::zero(), grid, BinaryColor::On),
            noticed.count_in(Point::zero(), grid, BinaryColor::On)
        );
        assert_ne!(plain, noticed);
    }
}
