//! Parameter XML writer.

use std::fs;
use std::path::{Path, PathBuf};

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesStart, Event};
use tracing::{debug, info};

use ipp_model::{Interval, Node, NodeKind, Scale, Series, Slice, SliceComponent};

use crate::error::OutputError;

/// File holding the root element once its children are written apart.
pub const ROOT_FILE_NAME: &str = "__root__.xml";

type Xml = Writer<Vec<u8>>;

/// Write `root` into `target_dir`: one `<code>.xml` per child of the root,
/// then the bare root element. Existing `*.xml` files are removed first.
pub fn write_tree(target_dir: &Path, root: &Node) -> Result<Vec<PathBuf>, OutputError> {
    fs::create_dir_all(target_dir).map_err(|source| OutputError::io(target_dir, source))?;
    clear_xml_files(target_dir)?;

    let mut written = Vec::new();
    let root_element = match root.children() {
        Some(children) => {
            for child in children.values() {
                let path = target_dir.join(format!("{}.xml", child.code));
                write_document(&path, child)?;
                written.push(path);
            }
            let mut bare = Node::group(root.code.clone(), root.origin);
            bare.description = root.description.clone();
            bare
        }
        None => root.clone(),
    };
    let root_path = target_dir.join(ROOT_FILE_NAME);
    write_document(&root_path, &root_element)?;
    written.push(root_path);

    info!(
        target = %target_dir.display(),
        files = written.len(),
        "wrote parameter files"
    );
    Ok(written)
}

fn clear_xml_files(target_dir: &Path) -> Result<(), OutputError> {
    let entries = fs::read_dir(target_dir).map_err(|source| OutputError::io(target_dir, source))?;
    for entry in entries {
        let path = entry
            .map_err(|source| OutputError::io(target_dir, source))?
            .path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "xml") {
            fs::remove_file(&path).map_err(|source| OutputError::io(&path, source))?;
            debug!(path = %path.display(), "removed previous output");
        }
    }
    Ok(())
}

fn write_document(path: &Path, node: &Node) -> Result<(), OutputError> {
    let document = render_document(node)?;
    fs::write(path, document).map_err(|source| OutputError::io(path, source))
}

/// Serialize one node and its descendants as a standalone XML document.
pub fn render_document(node: &Node) -> Result<String, OutputError> {
    let mut xml = Writer::new_with_indent(Vec::new(), b' ', 2);
    emit(
        &mut xml,
        Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)),
        &node.code,
    )?;
    write_node(&mut xml, node)?;
    let mut bytes = xml.into_inner();
    bytes.push(b'\n');
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn write_node(xml: &mut Xml, node: &Node) -> Result<(), OutputError> {
    match &node.kind {
        NodeKind::Group { children } => {
            let start = node_start("NODE", node);
            write_element(xml, start, !children.is_empty(), &node.code, |xml| {
                children.values().try_for_each(|child| write_node(xml, child))
            })
        }
        NodeKind::Scalar(series) => {
            let mut start = node_start("CODE", node);
            push_series_attributes(&mut start, series);
            write_values(xml, start, series, &node.code)
        }
        NodeKind::Scale(scale) => write_scale(xml, node, scale),
    }
}

fn write_scale(xml: &mut Xml, node: &Node, scale: &Scale) -> Result<(), OutputError> {
    let mut start = node_start("BAREME", node);
    if let Some(value_type) = &scale.value_type {
        start.push_attribute(("type", value_type.as_str()));
    }
    if let Some(conflicts) = scale.conflicts.joined() {
        start.push_attribute(("conflicts", conflicts.as_str()));
    }
    write_element(xml, start, !scale.slices.is_empty(), &node.code, |xml| {
        scale
            .slices
            .iter()
            .try_for_each(|slice| write_slice(xml, slice, &node.code))
    })
}

fn write_slice(xml: &mut Xml, slice: &Slice, code: &str) -> Result<(), OutputError> {
    let mut start = BytesStart::new("TRANCHE");
    start.push_attribute(("code", slice.code.as_str()));
    write_element(xml, start, !slice.is_empty(), code, |xml| {
        for component in SliceComponent::ALL {
            let Some(series) = slice.component(component) else {
                continue;
            };
            let mut start = BytesStart::new(component.tag());
            push_series_attributes(&mut start, series);
            write_values(xml, start, series, code)?;
        }
        Ok(())
    })
}

fn write_values(
    xml: &mut Xml,
    start: BytesStart<'_>,
    series: &Series,
    code: &str,
) -> Result<(), OutputError> {
    write_element(xml, start, !series.is_empty(), code, |xml| {
        series
            .newest_first()
            .into_iter()
            .try_for_each(|interval| emit(xml, Event::Empty(value_element(interval)), code))
    })
}

fn value_element(interval: &Interval) -> BytesStart<'static> {
    let mut value = BytesStart::new("VALUE");
    value.push_attribute(("deb", interval.start.to_string().as_str()));
    if let Some(stop) = interval.stop {
        value.push_attribute(("fin", stop.to_string().as_str()));
    }
    value.push_attribute(("valeur", interval.value.to_string().as_str()));
    if interval.fuzzy {
        value.push_attribute(("fuzzy", "true"));
    }
    value
}

fn node_start(tag: &'static str, node: &Node) -> BytesStart<'static> {
    let mut start = BytesStart::new(tag);
    start.push_attribute(("code", node.code.as_str()));
    start.push_attribute(("origin", node.origin.as_str()));
    if let Some(description) = &node.description {
        start.push_attribute(("description", description.as_str()));
    }
    start
}

fn push_series_attributes(start: &mut BytesStart<'_>, series: &Series) {
    if let Some(format) = &series.format {
        start.push_attribute(("format", format.as_str()));
    }
    if let Some(value_type) = &series.value_type {
        start.push_attribute(("type", value_type.as_str()));
    }
    if let Some(conflicts) = series.conflicts.joined() {
        start.push_attribute(("conflicts", conflicts.as_str()));
    }
}

fn write_element<F>(
    xml: &mut Xml,
    start: BytesStart<'_>,
    has_children: bool,
    code: &str,
    body: F,
) -> Result<(), OutputError>
where
    F: FnOnce(&mut Xml) -> Result<(), OutputError>,
{
    if !has_children {
        return emit(xml, Event::Empty(start), code);
    }
    let end = start.to_end().into_owned();
    emit(xml, Event::Start(start), code)?;
    body(xml)?;
    emit(xml, Event::End(end), code)
}

fn emit(xml: &mut Xml, event: Event<'_>, code: &str) -> Result<(), OutputError> {
    xml.write_event(event)
        .map_err(|source| OutputError::Xml {
            code: code.to_string(),
            source: quick_xml::Error::from(source),
        })
}
