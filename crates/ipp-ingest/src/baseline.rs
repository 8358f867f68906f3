//! Baseline parameter document.
//!
//! The document uses the legacy XML vocabulary:
//!
//! - `NODE code=..`: a group
//! - `CODE code=.. format=.. type=..`: a scalar parameter
//! - `BAREME code=.. type=..`: a bracket scale, made of `TRANCHE` slices
//! - `SEUIL` / `MONTANT` / `TAUX` / `ASSIETTE`: the series of a slice
//! - `VALUE deb=.. fin=.. valeur=.. fuzzy=..`: one interval
//!
//! Values are kept as written and compared numerically during the merge.
//! Every node is tagged [`Origin::Baseline`].

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::debug;

use ipp_model::{
    Interval, Node, NodeKind, Origin, ParamValue, Scale, Series, Slice, SliceComponent,
    ValueFormat, ValueType,
};

use crate::error::IngestError;

/// Read and parse the baseline document at `path`.
pub fn load_baseline(path: &Path) -> Result<Node, IngestError> {
    let text = fs::read_to_string(path).map_err(|source| IngestError::io(path, source))?;
    let root = parse_baseline(&text)?;
    debug!(
        path = %path.display(),
        parameters = root.parameter_count(),
        "loaded baseline"
    );
    Ok(root)
}

enum Frame {
    Node(Node),
    Slice(Slice),
    Component(SliceComponent, Series),
    Value,
}

type Attributes = BTreeMap<String, String>;

pub fn parse_baseline(text: &str) -> Result<Node, IngestError> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Frame> = Vec::new();
    let mut root: Option<Node> = None;

    loop {
        let location = format!("byte {}", reader.buffer_position());
        let event = reader
            .read_event()
            .map_err(|source| IngestError::Xml {
                location: location.clone(),
                source,
            })?;
        match event {
            Event::Start(start) => {
                let frame = open_element(&start, &reader, &mut stack, &location)?;
                stack.push(frame);
            }
            Event::Empty(start) => {
                let frame = open_element(&start, &reader, &mut stack, &location)?;
                close_frame(frame, &mut stack, &mut root, &location)?;
            }
            Event::End(_) => {
                if let Some(frame) = stack.pop() {
                    close_frame(frame, &mut stack, &mut root, &location)?;
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    root.ok_or(IngestError::EmptyBaseline)
}

fn open_element(
    start: &BytesStart<'_>,
    reader: &Reader<&[u8]>,
    stack: &mut [Frame],
    location: &str,
) -> Result<Frame, IngestError> {
    let element = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let attributes = read_attributes(start, reader, location)?;
    let unexpected = || IngestError::UnexpectedElement {
        element: element.clone(),
        location: location.to_string(),
    };

    let frame = match element.as_str() {
        "NODE" => {
            let code = required(&attributes, "code", &element, location)?;
            Frame::Node(described(Node::group(code, Origin::Baseline), &attributes))
        }
        "CODE" => {
            let code = required(&attributes, "code", &element, location)?;
            let series = declared_series(&attributes);
            Frame::Node(described(Node::scalar(code, Origin::Baseline, series), &attributes))
        }
        "BAREME" => {
            let scale = Scale {
                value_type: attributes.get("type").map(|raw| ValueType::parse(raw)),
                ..Scale::default()
            };
            let code = required(&attributes, "code", &element, location)?;
            Frame::Node(described(Node::scale(code, Origin::Baseline, scale), &attributes))
        }
        "TRANCHE" => {
            let in_scale = matches!(
                stack.last(),
                Some(Frame::Node(Node {
                    kind: NodeKind::Scale(_),
                    ..
                }))
            );
            if !in_scale {
                return Err(unexpected());
            }
            Frame::Slice(Slice::new(required(&attributes, "code", &element, location)?))
        }
        "VALUE" => {
            let interval = read_interval(&attributes, &element, location)?;
            let series = match stack.last_mut() {
                Some(Frame::Node(Node {
                    kind: NodeKind::Scalar(series),
                    ..
                })) => series,
                Some(Frame::Component(_, series)) => series,
                _ => return Err(unexpected()),
            };
            series.intervals.push(interval);
            Frame::Value
        }
        tag => match SliceComponent::from_tag(tag) {
            Some(component) if matches!(stack.last(), Some(Frame::Slice(_))) => {
                Frame::Component(component, declared_series(&attributes))
            }
            _ => return Err(unexpected()),
        },
    };
    Ok(frame)
}

fn close_frame(
    frame: Frame,
    stack: &mut [Frame],
    root: &mut Option<Node>,
    location: &str,
) -> Result<(), IngestError> {
    match frame {
        Frame::Value => Ok(()),
        Frame::Node(mut node) => {
            if let NodeKind::Scalar(series) = &mut node.kind {
                series.intervals.sort_by_key(|interval| interval.start);
            }
            match stack.last_mut() {
                None => {
                    *root = Some(node);
                    Ok(())
                }
                Some(Frame::Node(parent)) => parent.insert_child(node).map_err(|child| {
                    IngestError::UnexpectedElement {
                        element: format!("{} {}", child.kind_name(), child.code),
                        location: location.to_string(),
                    }
                }),
                Some(_) => Err(IngestError::UnexpectedElement {
                    element: node.code,
                    location: location.to_string(),
                }),
            }
        }
        Frame::Slice(slice) => match stack.last_mut() {
            Some(Frame::Node(Node {
                kind: NodeKind::Scale(scale),
                ..
            })) => {
                scale.slices.push(slice);
                Ok(())
            }
            _ => Err(IngestError::UnexpectedElement {
                element: "TRANCHE".to_string(),
                location: location.to_string(),
            }),
        },
        Frame::Component(component, mut series) => match stack.last_mut() {
            Some(Frame::Slice(slice)) => {
                series.intervals.sort_by_key(|interval| interval.start);
                slice.set_component(component, series);
                Ok(())
            }
            _ => Err(IngestError::UnexpectedElement {
                element: component.tag().to_string(),
                location: location.to_string(),
            }),
        },
    }
}

fn read_attributes(
    start: &BytesStart<'_>,
    reader: &Reader<&[u8]>,
    location: &str,
) -> Result<Attributes, IngestError> {
    let xml_error = |source: quick_xml::Error| IngestError::Xml {
        location: location.to_string(),
        source,
    };
    let mut attributes = Attributes::new();
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|err| xml_error(err.into()))?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute
            .decode_and_unescape_value(reader.decoder())
            .map_err(|err| xml_error(err.into()))?;
        attributes.insert(key, value.into_owned());
    }
    Ok(attributes)
}

fn read_interval(
    attributes: &Attributes,
    element: &str,
    location: &str,
) -> Result<Interval, IngestError> {
    let start = parse_date(required(attributes, "deb", element, location)?, element, location)?;
    let stop = attributes
        .get("fin")
        .map(|raw| parse_date(raw, element, location))
        .transpose()?;
    let value = ParamValue::Raw(required(attributes, "valeur", element, location)?.to_string());
    // The attribute marks a fuzzy bound whatever its value.
    let fuzzy = attributes.contains_key("fuzzy");
    Ok(Interval::declared(start, stop, value, fuzzy))
}

fn parse_date(raw: &str, element: &str, location: &str) -> Result<NaiveDate, IngestError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| IngestError::InvalidDate {
        value: raw.to_string(),
        element: element.to_string(),
        location: location.to_string(),
    })
}

fn required<'a>(
    attributes: &'a Attributes,
    attribute: &'static str,
    element: &str,
    location: &str,
) -> Result<&'a str, IngestError> {
    attributes
        .get(attribute)
        .map(String::as_str)
        .ok_or_else(|| IngestError::MissingAttribute {
            attribute,
            element: element.to_string(),
            location: location.to_string(),
        })
}

fn declared_series(attributes: &Attributes) -> Series {
    Series {
        format: attributes.get("format").map(|raw| ValueFormat::parse(raw)),
        value_type: attributes.get("type").map(|raw| ValueType::parse(raw)),
        ..Series::default()
    }
}

fn described(node: Node, attributes: &Attributes) -> Node {
    match attributes.get("description") {
        Some(description) => node.with_description(description.clone()),
        None => node,
    }
}
