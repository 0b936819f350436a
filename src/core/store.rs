//! Record store - keyed, read-only access to the records scoring needs
//!
//! `RecordStore` is the seam between the engines and wherever records live.
//! `Snapshot` is the in-memory implementation: built programmatically or
//! loaded once from a project directory, then shared read-only for the
//! duration of a batch.

use std::collections::BTreeMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::loader::{self, SkippedFile};
use crate::core::project::{Project, RecordKind};
use crate::entities::{
    Bom, BomError, ClientOverride, ClientRecord, ComponentMaterialLink, ComponentRecord,
    CriticalMaterial,
};

/// Canonical form of a part number or client id
pub fn normalize_key(key: &str) -> String {
    key.trim().to_uppercase()
}

fn material_key(id: &str) -> String {
    id.trim().to_lowercase()
}

/// Keyed lookups against a consistent set of records
pub trait RecordStore: Sync {
    fn component(&self, part_number: &str) -> Option<&ComponentRecord>;

    fn client(&self, client_id: &str) -> Option<&ClientRecord>;

    fn client_override(&self, client_id: &str, part_number: &str) -> Option<&ClientOverride>;

    /// Explicit material links of a part (empty when none)
    fn material_links(&self, part_number: &str) -> &[ComponentMaterialLink];

    fn material(&self, id: &str) -> Option<&CriticalMaterial>;

    /// Every material the store defines beyond the configured catalog
    fn materials(&self) -> Vec<CriticalMaterial>;
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("BOM '{0}' not found")]
    BomNotFound(String),

    #[error("failed to read {path}: {message}")]
    Read { path: PathBuf, message: String },

    #[error("invalid BOM CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: BomError,
    },
}

/// In-memory record store
#[derive(Debug, Default)]
pub struct Snapshot {
    components: BTreeMap<String, ComponentRecord>,
    clients: BTreeMap<String, ClientRecord>,
    overrides: BTreeMap<(String, String), ClientOverride>,
    links: BTreeMap<String, Vec<ComponentMaterialLink>>,
    materials: BTreeMap<String, CriticalMaterial>,
    skipped: Vec<SkippedFile>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every record of a project once
    pub fn load(project: &Project) -> Self {
        let mut snapshot = Self::new();

        let (components, mut skipped) = loader::load_all::<ComponentRecord>(project, RecordKind::Component);
        for c in components {
            snapshot.insert_component(c);
        }
        let (clients, mut s) = loader::load_all::<ClientRecord>(project, RecordKind::Client);
        skipped.append(&mut s);
        for c in clients {
            snapshot.insert_client(c);
        }
        let (overrides, mut s) = loader::load_all::<ClientOverride>(project, RecordKind::Override);
        skipped.append(&mut s);
        for o in overrides {
            snapshot.insert_override(o);
        }
        let (materials, mut s) = loader::load_all::<CriticalMaterial>(project, RecordKind::Material);
        skipped.append(&mut s);
        for m in materials {
            snapshot.insert_material(m);
        }
        let (links, mut s) = loader::load_all::<ComponentMaterialLink>(project, RecordKind::Link);
        skipped.append(&mut s);
        for l in links {
            snapshot.insert_link(l);
        }

        snapshot.skipped = skipped;
        log::debug!(
            "Snapshot: {} component(s), {} client(s), {} override(s), {} material(s)",
            snapshot.components.len(),
            snapshot.clients.len(),
            snapshot.overrides.len(),
            snapshot.materials.len()
        );
        snapshot
    }

    pub fn insert_component(&mut self, record: ComponentRecord) {
        if let Some(previous) = self.components.insert(record.key(), record) {
            log::warn!("Duplicate component '{}', keeping the last one", previous.part_number());
        }
    }

    pub fn insert_client(&mut self, client: ClientRecord) {
        self.clients.insert(client.key(), client);
    }

    pub fn insert_override(&mut self, o: ClientOverride) {
        self.overrides.insert(o.key(), o);
    }

    pub fn insert_material(&mut self, material: CriticalMaterial) {
        self.materials.insert(material_key(&material.id), material);
    }

    pub fn insert_link(&mut self, link: ComponentMaterialLink) {
        self.links
            .entry(normalize_key(&link.part_number))
            .or_default()
            .push(link);
    }

    pub fn with_component(mut self, record: ComponentRecord) -> Self {
        self.insert_component(record);
        self
    }

    pub fn with_client(mut self, client: ClientRecord) -> Self {
        self.insert_client(client);
        self
    }

    pub fn with_override(mut self, o: ClientOverride) -> Self {
        self.insert_override(o);
        self
    }

    pub fn with_material(mut self, material: CriticalMaterial) -> Self {
        self.insert_material(material);
        self
    }

    pub fn with_link(mut self, link: ComponentMaterialLink) -> Self {
        self.insert_link(link);
        self
    }

    pub fn components(&self) -> impl Iterator<Item = &ComponentRecord> {
        self.components.values()
    }

    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Files that could not be parsed during `load`
    pub fn skipped(&self) -> &[SkippedFile] {
        &self.skipped
    }
}

impl RecordStore for Snapshot {
    fn component(&self, part_number: &str) -> Option<&ComponentRecord> {
        self.components.get(&normalize_key(part_number))
    }

    fn client(&self, client_id: &str) -> Option<&ClientRecord> {
        self.clients.get(&normalize_key(client_id))
    }

    fn client_override(&self, client_id: &str, part_number: &str) -> Option<&ClientOverride> {
        self.overrides
            .get(&(normalize_key(client_id), normalize_key(part_number)))
    }

    fn material_links(&self, part_number: &str) -> &[ComponentMaterialLink] {
        self.links
            .get(&normalize_key(part_number))
            .map_or(&[], |l| l.as_slice())
    }

    fn material(&self, id: &str) -> Option<&CriticalMaterial> {
        self.materials.get(&material_key(id))
    }

    fn materials(&self) -> Vec<CriticalMaterial> {
        self.materials.values().cloned().collect()
    }
}

/// Resolve a BOM reference
///
/// The reference may be a path to a `.csv` or `.yaml` file, or the id (file
/// stem) of a record under `boms/`.
pub fn load_bom(project: Option<&Project>, reference: &str) -> Result<Bom, StoreError> {
    let as_path = Path::new(reference);
    if as_path.is_file() {
        return load_bom_file(as_path);
    }
    if let Some(project) = project {
        if let Some(path) = loader::find_record_file(project, RecordKind::Bom, reference) {
            return load_bom_file(&path);
        }
        // fall back to matching the id inside the files
        let (boms, _) = loader::load_all::<Bom>(project, RecordKind::Bom);
        if let Some(bom) = boms
            .into_iter()
            .find(|b| b.id.eq_ignore_ascii_case(reference.trim()))
        {
            return Ok(bom);
        }
    }
    Err(StoreError::BomNotFound(reference.to_string()))
}

fn load_bom_file(path: &Path) -> Result<Bom, StoreError> {
    let is_csv = path
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
    if is_csv {
        let id = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("bom")
            .to_string();
        let file = File::open(path).map_err(|e| StoreError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        return Bom::from_csv(id, file).map_err(|source| StoreError::Csv {
            path: path.to_path_buf(),
            source,
        });
    }
    loader::load_file::<Bom>(path).map_err(|message| StoreError::Read {
        path: path.to_path_buf(),
        message,
    })
}
