use std::fs;

use chrono::NaiveDate;

use ipp_model::{
    Interval, Node, Origin, ParamValue, Scale, Series, Slice, SliceComponent, ValueFormat,
};
use ipp_output::{ROOT_FILE_NAME, render_document, write_tree};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn rate_series() -> Series {
    let mut series = Series::new(vec![
        Interval::new(date(2019, 1, 1), Some(date(2020, 12, 31)), ParamValue::Float(0.1)),
        Interval::new(date(2021, 1, 1), None, ParamValue::Float(0.12)),
    ]);
    series.format = Some(ValueFormat::Percent);
    series
}

fn sample_tree() -> Node {
    let mut impots = Node::group("impots", Origin::NewSource);
    impots
        .insert_child(Node::scalar("taux", Origin::NewSource, rate_series()))
        .expect("group");

    let mut tranche = Slice::new("tranche_1");
    tranche.set_component(
        SliceComponent::Threshold,
        Series::new(vec![Interval::new(date(2015, 1, 1), None, ParamValue::Integer(9700))]),
    );
    let mut rate = Series::new(vec![Interval::new(date(2015, 1, 1), None, ParamValue::Float(0.14))]);
    rate.conflicts.insert("children:different-value");
    tranche.set_component(SliceComponent::Rate, rate);
    impots
        .insert_child(Node::scale("bareme", Origin::NewSource, Scale::new(vec![tranche])))
        .expect("group");

    let mut ancien = Node::group("ancien", Origin::Baseline).with_description("Anciens paramètres");
    ancien
        .insert_child(Node::scalar(
            "plafond",
            Origin::Baseline,
            Series::new(vec![Interval::declared(
                date(1990, 1, 1),
                Some(date(1999, 12, 31)),
                ParamValue::Raw("1500".to_string()),
                false,
            )]),
        ))
        .expect("group");

    let mut root = Node::group("root", Origin::NewSource);
    root.insert_child(impots).expect("group");
    root.insert_child(ancien).expect("group");
    root
}

#[test]
fn renders_groups_scalars_and_scales() {
    let tree = sample_tree();
    let impots = tree.get(&["impots"]).expect("impots");
    insta::assert_snapshot!(render_document(impots).expect("render"), @r#"
    <?xml version="1.0" encoding="utf-8"?>
    <NODE code="impots" origin="new-source">
      <BAREME code="bareme" origin="new-source">
        <TRANCHE code="tranche_1">
          <SEUIL>
            <VALUE deb="2015-01-01" valeur="9700" fuzzy="true"/>
          </SEUIL>
          <TAUX conflicts="children:different-value">
            <VALUE deb="2015-01-01" valeur="0.14" fuzzy="true"/>
          </TAUX>
        </TRANCHE>
      </BAREME>
      <CODE code="taux" origin="new-source" format="percent">
        <VALUE deb="2021-01-01" valeur="0.12" fuzzy="true"/>
        <VALUE deb="2019-01-01" fin="2020-12-31" valeur="0.1"/>
      </CODE>
    </NODE>
    "#);
}

#[test]
fn writes_one_file_per_top_level_node() {
    let dir = tempfile::tempdir().expect("temp dir");
    fs::write(dir.path().join("stale.xml"), "<NODE/>").expect("write stale file");
    fs::write(dir.path().join("keep.txt"), "notes").expect("write other file");

    let written = write_tree(dir.path(), &sample_tree()).expect("write tree");
    let names: Vec<String> = written
        .iter()
        .filter_map(|path| path.file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["ancien.xml", "impots.xml", ROOT_FILE_NAME]);

    assert!(!dir.path().join("stale.xml").exists());
    assert!(dir.path().join("keep.txt").exists());

    let root = fs::read_to_string(dir.path().join(ROOT_FILE_NAME)).expect("read root");
    assert!(root.contains(r#"<NODE code="root" origin="new-source"/>"#));

    let ancien = fs::read_to_string(dir.path().join("ancien.xml")).expect("read ancien");
    assert!(ancien.contains(r#"origin="baseline""#));
    assert!(ancien.contains(r#"description="Anciens paramètres""#));
    assert!(ancien.contains(r#"<VALUE deb="1990-01-01" fin="1999-12-31" valeur="1500"/>"#));
}
