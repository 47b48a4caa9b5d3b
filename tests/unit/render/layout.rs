use super::*;
use crate::series::EntitySeries;

fn years() -> YearRange {
    YearRange {
        start: 2000,
        end: 2024,
    }
}

fn series(name: &str, values: Vec<f64>) -> EntitySeries {
    EntitySeries {
        name: name.to_string(),
        years: (0..values.len()).map(|i| 2000.0 + i as f64).collect(),
        values,
    }
}

#[test]
fn panel_edges_and_grid_lines() {
    assert_eq!(GRAPH.right(), 980);
    assert_eq!(GRAPH.bottom(), 1800);
    let xs: Vec<i32> = GRAPH.vertical_lines().collect();
    assert_eq!(xs.len(), 9);
    assert_eq!(xs.first(), Some(&100));
    assert_eq!(xs.last(), Some(&900));
    let ys: Vec<i32> = GRAPH.horizontal_lines().collect();
    assert_eq!(ys.len(), 15);
    assert_eq!(ys.first(), Some(&1800));
    assert_eq!(ys.last(), Some(&400));
}

#[test]
fn shared_axis_max_uses_headroom() {
    let set = SeriesSet::new(
        vec![series("a", vec![1.0, 10.0]), series("b", vec![20.0, 2.0])],
        "a",
    )
    .unwrap();
    let axis = AxisScale::from_series(&set).unwrap();
    assert_eq!(axis.data_max, 20.0);
    assert!((axis.axis_max - 22.0).abs() < 1e-9);
}

#[test]
fn axis_rejects_non_positive_max() {
    assert!(AxisScale::from_max(0.0).is_err());
    assert!(AxisScale::from_max(-3.0).is_err());
    assert!(AxisScale::from_max(f64::NAN).is_err());
    let set = SeriesSet::new(vec![series("a", vec![0.0, 0.0])], "a").unwrap();
    assert!(AxisScale::from_series(&set).is_err());
}

#[test]
fn mapper_hits_panel_corners() {
    let axis = AxisScale::from_max(100.0).unwrap();
    let m = GraphMapper::new(GRAPH, years(), axis).unwrap();
    assert_eq!(m.to_pixel(2000.0, 0.0), (100, 1800));
    assert_eq!(m.to_pixel(2024.0, 0.0), (980, 1800));
    assert_eq!(m.to_pixel(2000.0, 110.0), (100, 400));
    assert_eq!(m.to_pixel(2012.0, 55.0), (540, 1100));
}

#[test]
fn mapper_rejects_zero_span() {
    let axis = AxisScale::from_max(1.0).unwrap();
    let flat = YearRange {
        start: 2000,
        end: 2000,
    };
    assert!(GraphMapper::new(GRAPH, flat, axis).is_err());
}

#[test]
fn x_ticks_label_years() {
    let m = GraphMapper::new(GRAPH, years(), AxisScale::from_max(1.0).unwrap()).unwrap();
    let ticks = m.x_ticks();
    assert_eq!(ticks.len(), 9);
    assert_eq!(ticks[0], (100, 2000));
    // 100px of 880px over 24 years = 2.727 years, truncated.
    assert_eq!(ticks[1], (200, 2002));
    assert_eq!(ticks[8], (900, 2021));
}

#[test]
fn y_ticks_are_relative_to_data_max() {
    let m = GraphMapper::new(GRAPH, years(), AxisScale::from_max(1400.0).unwrap()).unwrap();
    let ticks = m.y_ticks();
    assert_eq!(ticks.len(), 8);
    assert_eq!(ticks[0], (1800, 0));
    assert_eq!(ticks[1].0, 1600);
    assert!((ticks[1].1 - 200).abs() <= 1);
    assert_eq!(ticks[7].0, 400);
    assert!((ticks[7].1 - 1400).abs() <= 1);
}

#[test]
fn smoothing_averages_last_window() {
    assert_eq!(smooth_position(&[], 5), None);
    assert_eq!(smooth_position(&[(1, 2), (3, 4)], 5), Some((3, 4)));
    let pts = [(0, 0), (10, 10), (20, 20), (30, 30), (40, 40), (50, 50)];
    assert_eq!(smooth_position(&pts, 5), Some((30, 30)));
    let uneven = [(0, 0), (1, 1), (1, 1), (1, 1), (2, 3)];
    // mean x = 1.0, mean y = 1.2 -> truncated
    assert_eq!(smooth_position(&uneven, 5), Some((1, 1)));
}

#[test]
fn gradient_rows_follow_floor_formula() {
    let bytes = vertical_gradient_rgba8(Rgb8::new(230, 230, 230), Rgb8::new(240, 240, 240), 2, 10);
    assert_eq!(bytes.len(), 2 * 10 * 4);
    let row = |y: usize| &bytes[y * 8..y * 8 + 4];
    assert_eq!(row(0), &[230, 230, 230, 255]);
    assert_eq!(row(5), &[235, 235, 235, 255]);
    assert_eq!(row(9), &[239, 239, 239, 255]);
    // Both pixels of a row match.
    assert_eq!(&bytes[0..4], &bytes[4..8]);
}

#[test]
fn gradient_floors_toward_negative_for_darkening() {
    let bytes = vertical_gradient_rgba8(Rgb8::new(10, 0, 0), Rgb8::new(0, 0, 0), 1, 3);
    // 10 + (-10 * 1) // 3 = 10 + (-4) = 6
    assert_eq!(bytes[4], 6);
}
