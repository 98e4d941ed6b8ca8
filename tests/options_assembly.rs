use echarts_opts::charts::{
    BarMode, BarOptions, LegendOrient, Orientation, PieLabelMode, PieOptions, RadarIndicator,
    RadarOptions, bar, pie, radar,
};
use echarts_opts::{Cell, ChartError, Table};
use serde_json::json;

fn admissions_table() -> Table {
    let mut t = Table::new(["ward", "quarter", "count"]);
    for (w, q, n) in [
        ("Cardiology", "Q1", 12.0),
        ("Cardiology", "Q2", 8.0),
        ("Oncology", "Q1", 5.0),
        ("Day Surgery", "Q2", 9.0),
        ("Cardiology", "Q1", 3.0),
    ] {
        t.push_row([Cell::str(w), Cell::str(q), Cell::num(n)])
            .unwrap();
    }
    t
}

#[test]
fn pie_outside_labels_and_bottom_legend() {
    let opts = PieOptions {
        title: Some("Admissions".into()),
        label: PieLabelMode::Outside,
        legend_orient: LegendOrient::Horizontal,
        legend_left: "center".into(),
        legend_bottom: Some("5%".into()),
        ..Default::default()
    };
    let opt = pie(&admissions_table(), "ward", "count", &opts).unwrap();

    assert_eq!(opt["title"], json!({"text": "Admissions", "left": "center"}));
    assert_eq!(opt["legend"]["orient"], "horizontal");
    assert_eq!(opt["legend"]["bottom"], "5%");
    assert!(opt["legend"].get("top").is_none());
    let series = &opt["series"][0];
    assert_eq!(series["label"]["position"], "outside");
    assert_eq!(series["labelLine"]["length"], 15);
    assert_eq!(series["data"].as_array().unwrap().len(), 5);
}

#[test]
fn pie_center_on_hover_hides_resting_labels() {
    let opts = PieOptions {
        inner_radius: Some("30%".into()),
        label: PieLabelMode::CenterOnHover,
        ..Default::default()
    };
    let opt = pie(&admissions_table(), "ward", "count", &opts).unwrap();
    let series = &opt["series"][0];
    assert_eq!(series["label"]["show"], false);
    assert_eq!(series["emphasis"]["label"]["show"], true);
    assert_eq!(series["emphasis"]["label"]["position"], "center");
}

#[test]
fn bar_pivot_is_dense_over_all_pairs() {
    let table = admissions_table();
    let opts = BarOptions {
        hue: Some("quarter".into()),
        mode: BarMode::Stacked,
        ..Default::default()
    };
    let opt = bar(&table, "ward", "count", &opts).unwrap();

    let cats = opt["xAxis"]["data"].as_array().unwrap();
    let series = opt["series"].as_array().unwrap();
    assert_eq!(cats.len(), 3);
    assert_eq!(series.len(), 2);
    // Every series spans every category; absent combinations are zero.
    for s in series {
        assert_eq!(s["data"].as_array().unwrap().len(), cats.len());
        assert_eq!(s["stack"], "total");
    }
    // Cardiology Q1 = 12 + 3; Oncology Q2 absent -> 0.
    assert_eq!(series[0]["name"], "Q1");
    assert_eq!(series[0]["data"][0], 15.0);
    assert_eq!(series[1]["data"][1], 0.0);
    // Total across the pivot equals the summed value column.
    let total: f64 = series
        .iter()
        .flat_map(|s| s["data"].as_array().unwrap())
        .map(|v| v.as_f64().unwrap())
        .sum();
    assert_eq!(total, 37.0);
}

#[test]
fn bar_extra_overrides_replace_sections() {
    let mut opts = BarOptions::default();
    opts.extra
        .insert("grid".into(), json!({"left": "2%"}));
    let opt = bar(&admissions_table(), "ward", "count", &opts).unwrap();
    assert_eq!(opt["grid"], json!({"left": "2%"}));
}

#[test]
fn bar_gradient_and_palette() {
    let opts = BarOptions {
        palette: Some(vec!["#2563eb".into(), "#22c55e".into()]),
        use_gradient: true,
        ..Default::default()
    };
    let opt = bar(&admissions_table(), "ward", "count", &opts).unwrap();
    assert_eq!(opt["color"], json!(["#2563eb", "#22c55e"]));
    let stops = &opt["series"][0]["itemStyle"]["color"]["colorStops"];
    assert_eq!(stops[0]["color"], "#83bff6");
    assert_eq!(stops[1]["color"], "#188df0");
}

#[test]
fn radar_dimension_mismatch_is_an_error() {
    let indicators = vec![
        RadarIndicator::new("Rent", 100.0),
        RadarIndicator::new("Salary", 100.0),
        RadarIndicator::new("Commute", 100.0),
    ];
    let err = radar(&indicators, &[vec![40.0, 80.0]], &RadarOptions::default()).unwrap_err();
    assert!(matches!(
        err,
        ChartError::DimensionMismatch {
            expected: 3,
            got: 2
        }
    ));
}

#[test]
fn radar_full_option_shape() {
    let indicators = vec![
        RadarIndicator::new("Rent", 100.0),
        RadarIndicator::new("Salary", 100.0),
    ];
    let opts = RadarOptions {
        series_names: Some(vec!["Dublin".into(), "Cork".into()]),
        ..Default::default()
    };
    let opt = radar(
        &indicators,
        &[vec![40.0, 80.0], vec![55.0, 68.0]],
        &opts,
    )
    .unwrap();
    assert_eq!(opt["radar"]["indicator"][0]["name"], "Rent");
    assert_eq!(opt["tooltip"]["confine"], true);
    assert_eq!(opt["series"][0]["data"][1]["name"], "Cork");
}

#[test]
fn missing_columns_are_reported_by_name() {
    let table = admissions_table();
    match pie(&table, "speciality", "count", &PieOptions::default()) {
        Err(ChartError::MissingColumn(name)) => assert_eq!(name, "speciality"),
        other => panic!("unexpected: {other:?}"),
    }
    assert!(matches!(
        bar(&table, "ward", "beds", &BarOptions::default()),
        Err(ChartError::MissingColumn(_))
    ));
}

#[test]
fn horizontal_bar_puts_categories_on_y() {
    let opts = BarOptions {
        orientation: Orientation::Horizontal,
        ..Default::default()
    };
    let opt = bar(&admissions_table(), "ward", "count", &opts).unwrap();
    assert_eq!(opt["yAxis"]["type"], "category");
    assert_eq!(opt["xAxis"]["type"], "value");
    assert_eq!(opt["series"][0]["label"]["position"], "right");
}
