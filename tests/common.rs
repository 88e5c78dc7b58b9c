#![allow(dead_code)]

use std::path::PathBuf;
use std::rc::Rc;

use gffkit::prelude::*;

pub fn data_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

pub fn load(
    registry: &Rc<NameRegistry>,
    name: &str,
    config: GffReaderConfig,
) -> anyhow::Result<Vec<GffObj>> {
    let mut reader = GffReader::from_path(data_path(name), registry, config)?;
    Ok(reader.load()?)
}

/// Exon geometry and CDS extent, the part of a model that must survive
/// every load path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Geometry {
    pub id:    String,
    pub exons: Vec<(u32, u32)>,
    pub cds:   (u32, u32),
}

impl From<&GffObj> for Geometry {
    fn from(obj: &GffObj) -> Self {
        Self {
            id:    obj.id().to_string(),
            exons: obj.exons().iter().map(|e| e.coords()).collect(),
            cds:   (obj.cds_start(), obj.cds_end()),
        }
    }
}

pub fn geometry(features: &[GffObj]) -> Vec<Geometry> {
    features
        .iter()
        .filter(|obj| obj.exon_count() > 0)
        .map(Geometry::from)
        .collect()
}
