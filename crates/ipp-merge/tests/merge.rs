use chrono::NaiveDate;

use ipp_merge::{MergeError, coverage_conflicts, is_covered, merge};
use ipp_model::{
    Interval, Node, NodeKind, Origin, ParamValue, Scale, Series, Slice, SliceComponent,
    ValueType,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn closed(start: NaiveDate, stop: NaiveDate, value: ParamValue) -> Interval {
    Interval::new(start, Some(stop), value)
}

fn raw(value: &str) -> ParamValue {
    ParamValue::Raw(value.to_string())
}

fn group(code: &str, origin: Origin, children: Vec<Node>) -> Node {
    let mut node = Node::group(code, origin);
    for child in children {
        node.insert_child(child).expect("group node");
    }
    node
}

fn series_of(node: &Node) -> &Series {
    match &node.kind {
        NodeKind::Scalar(series) => series,
        other => panic!("expected a scalar, got {other:?}"),
    }
}

#[test]
fn equal_values_are_covered() {
    let baseline = closed(date(2010, 1, 1), date(2010, 12, 31), raw("0.1"));
    let same = closed(date(2010, 1, 1), date(2010, 12, 31), ParamValue::Float(0.1));
    assert!(is_covered(&baseline, &same));
    assert!(coverage_conflicts(&[baseline], &[same]).is_empty());
}

#[test]
fn different_value_yields_one_descriptor() {
    let baseline = closed(date(2010, 1, 1), date(2010, 12, 31), raw("0.1"));
    let changed = closed(date(2010, 1, 1), date(2010, 12, 31), ParamValue::Float(0.2));
    let conflicts = coverage_conflicts(&[baseline], &[changed]);
    assert_eq!(conflicts.len(), 1);
    insta::assert_snapshot!(
        conflicts.joined().expect("one conflict"),
        @"children:baseline-not-covered(baseline_start=2010-01-01,baseline_stop=2010-12-31,baseline_value=0.1,new_value=0.2)"
    );
}

#[test]
fn fuzzy_open_source_covers_closed_baseline() {
    let baseline = closed(date(2012, 1, 1), date(2013, 12, 31), raw("5"));
    let open = Interval::new(date(2011, 1, 1), None, ParamValue::Integer(5));
    assert!(open.fuzzy);
    assert!(is_covered(&baseline, &open));

    let precise_open = Interval::declared(date(2011, 1, 1), None, ParamValue::Integer(5), false);
    assert!(!is_covered(&baseline, &precise_open));

    let later = Interval::new(date(2012, 6, 1), None, ParamValue::Integer(5));
    assert!(!is_covered(&baseline, &later));
}

#[test]
fn fuzzy_open_baseline_is_covered_by_closed_source() {
    let baseline = Interval::declared(date(2015, 1, 1), None, raw("3"), true);
    let source = closed(date(2014, 1, 1), date(2016, 12, 31), ParamValue::Integer(3));
    assert!(is_covered(&baseline, &source));

    let exact_open = Interval::declared(date(2015, 1, 1), None, raw("3"), false);
    let conflicts = coverage_conflicts(&[exact_open], &[source]);
    insta::assert_snapshot!(
        conflicts.joined().expect("one conflict"),
        @"children:baseline-not-covered(baseline_start=2015-01-01,baseline_stop=open,baseline_value=3,new_value=unknown)"
    );
}

#[test]
fn baseline_only_children_are_preserved() {
    let kept = Node::scalar(
        "ancien",
        Origin::Baseline,
        Series::new(vec![closed(date(1990, 1, 1), date(1999, 12, 31), raw("42"))]),
    )
    .with_description("Ancien paramètre");
    let baseline = group(
        "root",
        Origin::Baseline,
        vec![group("impots", Origin::Baseline, vec![kept.clone()])],
    );
    let source = group(
        "root",
        Origin::NewSource,
        vec![group(
            "impots",
            Origin::NewSource,
            vec![Node::scalar(
                "taux",
                Origin::NewSource,
                Series::new(vec![Interval::new(date(2000, 1, 1), None, ParamValue::Float(0.2))]),
            )],
        )],
    );

    let merged = merge(source, baseline).expect("merge");
    assert_eq!(merged.get(&["impots", "ancien"]), Some(&kept));
    let taux = merged.get(&["impots", "taux"]).expect("source child");
    assert_eq!(taux.origin, Origin::NewSource);
    assert_eq!(merged.get(&["impots"]).map(|node| node.origin), Some(Origin::NewSource));
    assert_eq!(merged.conflict_count(), 0);
}

#[test]
fn scalar_conflicts_include_type_and_keep_description() {
    let mut baseline_series =
        Series::new(vec![closed(date(2010, 1, 1), date(2010, 12, 31), raw("100"))]);
    baseline_series.value_type = Some(ValueType::Other("age".to_string()));
    let baseline = group(
        "root",
        Origin::Baseline,
        vec![Node::scalar("plafond", Origin::Baseline, baseline_series).with_description("Plafond")],
    );

    let mut source_series =
        Series::new(vec![Interval::new(date(2010, 1, 1), None, ParamValue::Integer(100))]);
    source_series.value_type = Some(ValueType::Monetary);
    let source = group(
        "root",
        Origin::NewSource,
        vec![Node::scalar("plafond", Origin::NewSource, source_series)],
    );

    let merged = merge(source, baseline).expect("merge");
    let plafond = merged.get(&["plafond"]).expect("plafond");
    assert_eq!(plafond.description.as_deref(), Some("Plafond"));
    insta::assert_snapshot!(series_of(plafond).conflicts.joined().expect("conflicts"), @"attrib:type(age)");
}

fn slice(code: &str, threshold: Vec<Interval>, rate: Vec<Interval>) -> Slice {
    let mut slice = Slice::new(code);
    slice.set_component(SliceComponent::Threshold, Series::new(threshold));
    slice.set_component(SliceComponent::Rate, Series::new(rate));
    slice
}

fn scale_root(origin: Origin, slices: Vec<Slice>) -> Node {
    group("root", origin, vec![Node::scale("bareme", origin, Scale::new(slices))])
}

#[test]
fn zero_first_baseline_slice_is_ignored() {
    let start = date(2015, 1, 1);
    let baseline = scale_root(
        Origin::Baseline,
        vec![
            slice(
                "tranche0",
                vec![Interval::new(start, None, raw("0"))],
                vec![Interval::new(start, None, raw("0"))],
            ),
            slice(
                "tranche1",
                vec![Interval::new(start, None, raw("9700"))],
                vec![Interval::new(start, None, raw("0.14"))],
            ),
        ],
    );
    let source = scale_root(
        Origin::NewSource,
        vec![slice(
            "tranche1",
            vec![Interval::new(start, None, ParamValue::Integer(9700))],
            vec![Interval::new(start, None, ParamValue::Float(0.15))],
        )],
    );

    let merged = merge(source, baseline).expect("merge");
    let NodeKind::Scale(scale) = &merged.get(&["bareme"]).expect("scale").kind else {
        panic!("expected a scale");
    };
    assert!(scale.conflicts.is_empty());
    let threshold = scale.slices[0].component(SliceComponent::Threshold).expect("threshold");
    assert!(threshold.conflicts.is_empty());
    let rate = scale.slices[0].component(SliceComponent::Rate).expect("rate");
    insta::assert_snapshot!(
        rate.conflicts.joined().expect("rate conflict"),
        @"children:baseline-not-covered(baseline_start=2015-01-01,baseline_stop=open,baseline_value=0.14,new_value=0.15)"
    );
}

#[test]
fn slice_count_mismatch_is_a_single_conflict() {
    let start = date(2015, 1, 1);
    let one = || {
        slice(
            "tranche1",
            vec![Interval::new(start, None, raw("9700"))],
            vec![Interval::new(start, None, raw("0.14"))],
        )
    };
    let baseline = scale_root(Origin::Baseline, vec![one(), one()]);
    let source = scale_root(Origin::NewSource, vec![one()]);
    let merged = merge(source, baseline).expect("merge");
    assert_eq!(merged.conflict_count(), 1);
    let NodeKind::Scale(scale) = &merged.get(&["bareme"]).expect("scale").kind else {
        panic!("expected a scale");
    };
    assert!(scale.conflicts.contains("children:different-number-of-slices"));
}

#[test]
fn mismatched_kinds_are_fatal() {
    let baseline = group(
        "root",
        Origin::Baseline,
        vec![group("csg", Origin::Baseline, Vec::new())],
    );
    let source = group(
        "root",
        Origin::NewSource,
        vec![Node::scalar(
            "csg",
            Origin::NewSource,
            Series::new(vec![Interval::new(date(2000, 1, 1), None, ParamValue::Integer(1))]),
        )],
    );
    let err = merge(source, baseline).expect_err("kind mismatch");
    assert!(matches!(
        err,
        MergeError::KindMismatch { ref path, expected: "group", found: "scalar" } if path == "root.csg"
    ));
}

#[test]
fn mismatched_roots_are_fatal() {
    let err = merge(
        Node::group("root", Origin::NewSource),
        Node::group("parametres", Origin::Baseline),
    )
    .expect_err("identifier mismatch");
    assert!(matches!(err, MergeError::IdentifierMismatch { .. }));
}

#[test]
fn baseline_rate_missing_from_source_slice_is_a_scale_conflict() {
    let start = date(2015, 1, 1);
    let baseline = scale_root(
        Origin::Baseline,
        vec![slice(
            "tranche1",
            vec![Interval::new(start, None, raw("9700"))],
            vec![Interval::new(start, None, raw("0.14"))],
        )],
    );
    let mut threshold_only = Slice::new("tranche1");
    threshold_only.set_component(
        SliceComponent::Threshold,
        Series::new(vec![Interval::new(start, None, ParamValue::Integer(9700))]),
    );
    let source = scale_root(Origin::NewSource, vec![threshold_only]);

    let merged = merge(source, baseline).expect("merge");
    let NodeKind::Scale(scale) = &merged.get(&["bareme"]).expect("scale").kind else {
        panic!("expected a scale");
    };
    insta::assert_snapshot!(
        scale.conflicts.joined().expect("scale conflict"),
        @"children:missing-rate(slice=tranche1)"
    );
    assert_eq!(merged.conflict_count(), 1);
}

#[test]
fn scale_type_mismatch_is_reported_on_the_scale() {
    let start = date(2015, 1, 1);
    let one = |threshold: ParamValue, rate: ParamValue| {
        slice(
            "tranche1",
            vec![Interval::new(start, None, threshold)],
            vec![Interval::new(start, None, rate)],
        )
    };
    let mut baseline_scale = Scale::new(vec![one(raw("9700"), raw("0.14"))]);
    baseline_scale.value_type = Some(ValueType::Other("age".to_string()));
    let baseline = group(
        "root",
        Origin::Baseline,
        vec![Node::scale("bareme", Origin::Baseline, baseline_scale)],
    );
    let mut source_scale =
        Scale::new(vec![one(ParamValue::Integer(9700), ParamValue::Float(0.14))]);
    source_scale.value_type = Some(ValueType::Monetary);
    let source = group(
        "root",
        Origin::NewSource,
        vec![Node::scale("bareme", Origin::NewSource, source_scale)],
    );

    let merged = merge(source, baseline).expect("merge");
    let NodeKind::Scale(scale) = &merged.get(&["bareme"]).expect("scale").kind else {
        panic!("expected a scale");
    };
    insta::assert_snapshot!(scale.conflicts.joined().expect("scale conflict"), @"attrib:type(age)");
    assert_eq!(merged.conflict_count(), 1);
}
